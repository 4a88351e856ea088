//! Structured output envelope for all CLI commands.
//!
//! Every command prints one result envelope on stdout:
//!
//! ```json
//! {
//!   "ok": true,
//!   "command": "nav.navigate",
//!   "data": { ... },
//!   "timings": { "durationMs": 1234 }
//! }
//! ```
//!
//! On failure `ok` is false, `data` is absent and `error` carries a stable
//! code plus a human-readable message.

use std::io::{self, Write};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

/// Output format for CLI results.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
	/// TOON output (default, token-efficient for LLMs)
	#[default]
	Toon,
	/// JSON output
	Json,
	/// Human-readable text
	Text,
}

impl std::str::FromStr for OutputFormat {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_lowercase().as_str() {
			"toon" => Ok(OutputFormat::Toon),
			"json" => Ok(OutputFormat::Json),
			"text" => Ok(OutputFormat::Text),
			_ => Err(format!("unknown format: {s}")),
		}
	}
}

impl std::fmt::Display for OutputFormat {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			OutputFormat::Toon => write!(f, "toon"),
			OutputFormat::Json => write!(f, "json"),
			OutputFormat::Text => write!(f, "text"),
		}
	}
}

/// The result envelope returned by all commands.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandResult<T: Serialize> {
	/// Whether the command succeeded
	pub ok: bool,

	/// Command name (e.g. "nav.navigate", "input.click")
	pub command: String,

	/// Command-specific result data (only present on success)
	#[serde(skip_serializing_if = "Option::is_none")]
	pub data: Option<T>,

	/// Error information (only present on failure)
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error: Option<CommandError>,

	/// Timing information
	#[serde(skip_serializing_if = "Option::is_none")]
	pub timings: Option<Timings>,
}

/// Error information for failed commands
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandError {
	/// Error code (e.g. "NAVIGATION_FAILED", "OUT_OF_RANGE")
	pub code: ErrorCode,

	/// Human-readable error message
	pub message: String,

	/// Additional error details (indices, ids, conditions)
	#[serde(skip_serializing_if = "Option::is_none")]
	pub details: Option<serde_json::Value>,
}

/// Standardized error codes for programmatic handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
	/// Browser failed to launch or connect
	BrowserLaunchFailed,
	/// Navigation to URL failed
	NavigationFailed,
	/// Element uid/selector did not match anything
	ElementNotFound,
	/// Stored record id did not match anything
	NotFound,
	/// Page index outside the current page list
	OutOfRange,
	/// Refused to close the last remaining page
	LastPage,
	/// Operation not valid in the current state
	InvalidState,
	/// Operation timed out
	Timeout,
	/// JavaScript evaluation failed
	JsEvalFailed,
	/// Screenshot capture failed
	ScreenshotFailed,
	/// File I/O error
	IoError,
	/// Session/connection error
	SessionError,
	/// Invalid input provided
	InvalidInput,
	/// Unknown/internal error
	InternalError,
}

impl std::fmt::Display for ErrorCode {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			ErrorCode::BrowserLaunchFailed => write!(f, "BROWSER_LAUNCH_FAILED"),
			ErrorCode::NavigationFailed => write!(f, "NAVIGATION_FAILED"),
			ErrorCode::ElementNotFound => write!(f, "ELEMENT_NOT_FOUND"),
			ErrorCode::NotFound => write!(f, "NOT_FOUND"),
			ErrorCode::OutOfRange => write!(f, "OUT_OF_RANGE"),
			ErrorCode::LastPage => write!(f, "LAST_PAGE"),
			ErrorCode::InvalidState => write!(f, "INVALID_STATE"),
			ErrorCode::Timeout => write!(f, "TIMEOUT"),
			ErrorCode::JsEvalFailed => write!(f, "JS_EVAL_FAILED"),
			ErrorCode::ScreenshotFailed => write!(f, "SCREENSHOT_FAILED"),
			ErrorCode::IoError => write!(f, "IO_ERROR"),
			ErrorCode::SessionError => write!(f, "SESSION_ERROR"),
			ErrorCode::InvalidInput => write!(f, "INVALID_INPUT"),
			ErrorCode::InternalError => write!(f, "INTERNAL_ERROR"),
		}
	}
}

/// Timing information for the command
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timings {
	/// Total duration in milliseconds
	pub duration_ms: u64,
}

impl From<Duration> for Timings {
	fn from(duration: Duration) -> Self {
		Timings {
			duration_ms: duration.as_millis() as u64,
		}
	}
}

/// Builder for constructing command results
pub struct ResultBuilder<T: Serialize> {
	command: String,
	data: Option<T>,
	error: Option<CommandError>,
	start_time: Instant,
}

impl<T: Serialize> ResultBuilder<T> {
	pub fn new(command: impl Into<String>) -> Self {
		Self {
			command: command.into(),
			data: None,
			error: None,
			start_time: Instant::now(),
		}
	}

	/// Set the successful result data
	pub fn data(mut self, data: T) -> Self {
		self.data = Some(data);
		self
	}

	/// Set an error
	pub fn error(mut self, code: ErrorCode, message: impl Into<String>) -> Self {
		self.error = Some(CommandError {
			code,
			message: message.into(),
			details: None,
		});
		self
	}

	/// Build the final result
	pub fn build(self) -> CommandResult<T> {
		let ok = self.error.is_none() && self.data.is_some();
		CommandResult {
			ok,
			command: self.command,
			data: self.data,
			error: self.error,
			timings: Some(Timings::from(self.start_time.elapsed())),
		}
	}
}

/// Print a command result to stdout in the specified format
pub fn print_result<T: Serialize>(result: &CommandResult<T>, format: OutputFormat) {
	match format {
		OutputFormat::Toon => {
			if let Ok(json_value) = serde_json::to_value(result) {
				println!("{}", toon::encode(&json_value, None));
			}
		}
		OutputFormat::Json => {
			if let Ok(json) = serde_json::to_string_pretty(result) {
				println!("{json}");
			}
		}
		OutputFormat::Text => {
			print_result_text(result);
		}
	}
}

/// Print a command result in human-readable text format
fn print_result_text<T: Serialize>(result: &CommandResult<T>) {
	let mut stdout = io::stdout().lock();

	if result.ok {
		if let Some(ref data) = result.data {
			if let Ok(json) = serde_json::to_string_pretty(data) {
				let _ = writeln!(stdout, "{json}");
			}
		}
	} else if let Some(ref error) = result.error {
		let _ = writeln!(stdout, "Error [{}]: {}", error.code, error.message);
		if let Some(ref details) = error.details {
			if let Ok(json) = serde_json::to_string_pretty(details) {
				let _ = writeln!(stdout, "Details: {json}");
			}
		}
	}
}

/// Print an error to stderr for human consumption
pub fn print_error_stderr(error: &CommandError) {
	eprintln!("Error: {}", error.message);
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn success_envelope_has_data_and_no_error() {
		let result = ResultBuilder::new("nav.list-pages")
			.data(json!({ "pages": [] }))
			.build();
		assert!(result.ok);
		assert_eq!(result.command, "nav.list-pages");
		assert!(result.error.is_none());
		assert!(result.timings.is_some());
	}

	#[test]
	fn error_envelope_is_not_ok() {
		let result: CommandResult<()> = ResultBuilder::new("debug.get-console")
			.error(ErrorCode::NotFound, "record not found: msg-9")
			.build();
		assert!(!result.ok);
		assert!(result.data.is_none());
		assert_eq!(result.error.unwrap().code, ErrorCode::NotFound);
	}

	#[test]
	fn builder_without_data_is_not_ok() {
		let result: CommandResult<()> = ResultBuilder::new("close").build();
		assert!(!result.ok);
	}

	#[test]
	fn error_codes_serialize_screaming_snake() {
		let json = serde_json::to_string(&ErrorCode::OutOfRange).unwrap();
		assert_eq!(json, "\"OUT_OF_RANGE\"");
		assert_eq!(ErrorCode::LastPage.to_string(), "LAST_PAGE");
	}

	#[test]
	fn envelope_serializes_camel_case() {
		let result = ResultBuilder::new("x").data(json!({})).build();
		let value = serde_json::to_value(&result).unwrap();
		assert!(value.get("timings").unwrap().get("durationMs").is_some());
	}

	#[test]
	fn output_format_parses_known_names() {
		assert_eq!("toon".parse::<OutputFormat>().unwrap(), OutputFormat::Toon);
		assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
		assert!("yaml".parse::<OutputFormat>().is_err());
	}
}
