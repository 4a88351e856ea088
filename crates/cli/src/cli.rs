use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "cdt")]
#[command(about = "Chrome DevTools CLI - drive and inspect a Chromium browser")]
#[command(version)]
pub struct Cli {
	/// Increase verbosity (-v info, -vv debug)
	#[arg(short, long, global = true, action = clap::ArgAction::Count)]
	pub verbose: u8,

	/// Output format
	#[arg(long, global = true, value_enum, default_value_t = OutputFormat::Toon)]
	pub format: OutputFormat,

	/// Connect to a running browser over its WebSocket endpoint instead of
	/// launching one
	#[arg(long, global = true, value_name = "ENDPOINT")]
	pub ws_endpoint: Option<String>,

	/// Run the browser headless
	#[arg(long, global = true)]
	pub headless: bool,

	/// Path to the browser executable
	#[arg(long, global = true, value_name = "PATH")]
	pub executable_path: Option<PathBuf>,

	/// Chrome release channel to launch
	#[arg(long, global = true, value_enum)]
	pub channel: Option<CliChannel>,

	/// Initial viewport size as WIDTHxHEIGHT (e.g. 1280x720)
	#[arg(long, global = true, value_name = "WxH")]
	pub viewport: Option<String>,

	/// Proxy server for the browser
	#[arg(long, global = true, value_name = "PROXY")]
	pub proxy_server: Option<String>,

	/// Ignore certificate errors
	#[arg(long, global = true)]
	pub accept_insecure_certs: bool,

	/// Extra argument passed to the browser (repeatable)
	#[arg(long = "chrome-arg", global = true, value_name = "ARG", allow_hyphen_values = true)]
	pub chrome_args: Vec<String>,

	#[command(subcommand)]
	pub command: Commands,
}

impl Cli {
	pub fn browser_options(&self) -> cdt::BrowserOptions {
		cdt::BrowserOptions {
			ws_endpoint: self.ws_endpoint.clone(),
			headless: self.headless,
			executable_path: self.executable_path.clone(),
			channel: self.channel.map(Into::into),
			viewport: self.viewport.clone(),
			proxy_server: self.proxy_server.clone(),
			accept_insecure_certs: self.accept_insecure_certs,
			chrome_args: self.chrome_args.clone(),
		}
	}
}

/// Chrome release channel (CLI wrapper for [`cdt::Channel`]).
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum CliChannel {
	Stable,
	Beta,
	Dev,
	Canary,
}

impl From<CliChannel> for cdt::Channel {
	fn from(channel: CliChannel) -> Self {
		match channel {
			CliChannel::Stable => cdt::Channel::Stable,
			CliChannel::Beta => cdt::Channel::Beta,
			CliChannel::Dev => cdt::Channel::Dev,
			CliChannel::Canary => cdt::Channel::Canary,
		}
	}
}

/// Screenshot image format (CLI wrapper for the core format enum).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum CliImageFormat {
	#[default]
	Png,
	Jpeg,
	Webp,
}

impl std::fmt::Display for CliImageFormat {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			CliImageFormat::Png => write!(f, "png"),
			CliImageFormat::Jpeg => write!(f, "jpeg"),
			CliImageFormat::Webp => write!(f, "webp"),
		}
	}
}

impl From<CliImageFormat> for cdt::debugging::ImageFormat {
	fn from(format: CliImageFormat) -> Self {
		match format {
			CliImageFormat::Png => cdt::debugging::ImageFormat::Png,
			CliImageFormat::Jpeg => cdt::debugging::ImageFormat::Jpeg,
			CliImageFormat::Webp => cdt::debugging::ImageFormat::Webp,
		}
	}
}

/// What to do with the next JavaScript dialog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum DialogAction {
	Accept,
	Dismiss,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
	/// Page navigation and the page directory
	#[command(subcommand)]
	Nav(NavCommand),

	/// Mouse, keyboard and dialog input
	#[command(subcommand)]
	Input(InputCommand),

	/// Device emulation and viewport control
	#[command(subcommand)]
	Emulate(EmulateCommand),

	/// Performance tracing and metrics
	#[command(subcommand)]
	Perf(PerfCommand),

	/// Network request capture
	#[command(subcommand)]
	Network(NetworkCommand),

	/// Console capture, evaluation and page inspection
	#[command(subcommand)]
	Debug(DebugCommand),

	/// Close the browser and release the session
	Close,
}

#[derive(Subcommand, Debug)]
pub enum NavCommand {
	/// List all open pages with their indices
	ListPages,

	/// Make the page at the given index the active page
	SelectPage {
		/// Position in the current page list
		#[arg(long)]
		index: usize,
	},

	/// Close the page at the given index
	ClosePage {
		/// Position in the current page list
		#[arg(long)]
		index: usize,
	},

	/// Open a new page and make it active
	NewPage {
		/// URL to load in the new page
		#[arg(long)]
		url: String,

		/// Navigation timeout in milliseconds
		#[arg(long)]
		timeout: Option<u64>,
	},

	/// Navigate the active page
	Navigate {
		#[arg(long)]
		url: String,

		/// Navigation timeout in milliseconds
		#[arg(long)]
		timeout: Option<u64>,
	},

	/// Wait for a selector to match or for page text to appear
	WaitFor {
		/// CSS selector to wait for
		#[arg(long)]
		selector: Option<String>,

		/// Text content to wait for
		#[arg(long)]
		text: Option<String>,

		/// Timeout in milliseconds (default 30000)
		#[arg(long)]
		timeout: Option<u64>,
	},
}

#[derive(Subcommand, Debug)]
pub enum InputCommand {
	/// Click an element
	Click {
		/// Element uid (data-uid attribute value)
		#[arg(long)]
		uid: String,

		/// Double-click instead of single click
		#[arg(long)]
		dbl_click: bool,
	},

	/// Hover over an element
	Hover {
		#[arg(long)]
		uid: String,
	},

	/// Fill an input field
	Fill {
		#[arg(long)]
		uid: String,

		#[arg(long)]
		value: String,
	},

	/// Fill several fields at once
	FillForm {
		/// Fields as UID=VALUE pairs
		#[arg(value_name = "UID=VALUE", required = true)]
		fields: Vec<String>,
	},

	/// Press a keyboard key (e.g. Enter, Tab, a)
	PressKey {
		#[arg(long)]
		key: String,
	},

	/// Drag one element onto another
	Drag {
		/// Source element uid
		#[arg(long)]
		from: String,

		/// Target element uid
		#[arg(long)]
		to: String,
	},

	/// Attach a file to a file input element
	UploadFile {
		#[arg(long)]
		uid: String,

		#[arg(long)]
		file: PathBuf,
	},

	/// Handle the next JavaScript dialog
	HandleDialog {
		#[arg(long, value_enum)]
		action: DialogAction,

		/// Text to enter into a prompt (implies accept)
		#[arg(long)]
		prompt_text: Option<String>,
	},
}

#[derive(Subcommand, Debug)]
pub enum EmulateCommand {
	/// Emulate a known device (viewport + user agent)
	Device {
		/// Device name, e.g. "iPhone 13" or "Pixel 5"
		#[arg(long)]
		name: String,
	},

	/// Resize the viewport
	Resize {
		#[arg(long)]
		width: u32,

		#[arg(long)]
		height: u32,
	},
}

#[derive(Subcommand, Debug)]
pub enum PerfCommand {
	/// Start recording a performance trace
	StartTrace,

	/// Stop the recording and emit the trace
	StopTrace {
		/// Write the trace JSON to this file instead of stdout
		#[arg(long)]
		output: Option<PathBuf>,
	},

	/// Record a trace around a navigation and report metrics
	Analyze {
		/// URL to navigate to while tracing
		#[arg(long)]
		url: Option<String>,

		/// Extra settle time in milliseconds before stopping
		#[arg(long)]
		duration: Option<u64>,
	},
}

#[derive(Subcommand, Debug)]
pub enum NetworkCommand {
	/// Start capturing network requests on the active page
	StartMonitoring,

	/// List captured requests
	ListRequests {
		#[arg(long)]
		limit: Option<usize>,

		#[arg(long)]
		offset: Option<usize>,

		/// Comma-separated URL fragments to filter by
		#[arg(long, value_delimiter = ',')]
		types: Option<Vec<String>>,
	},

	/// Show one captured request by id (e.g. req-3)
	GetRequest {
		#[arg(long)]
		id: String,
	},

	/// Drop all captured requests and reset ids
	Clear,
}

#[derive(Subcommand, Debug)]
pub enum DebugCommand {
	/// Start capturing console messages on the active page
	StartConsoleMonitoring,

	/// List captured console messages
	ListConsole {
		#[arg(long)]
		limit: Option<usize>,

		#[arg(long)]
		offset: Option<usize>,

		/// Comma-separated message types to keep (log, error, warning, ...)
		#[arg(long, value_delimiter = ',')]
		types: Option<Vec<String>>,
	},

	/// Show one captured console message by id (e.g. msg-3)
	GetConsole {
		#[arg(long)]
		id: String,
	},

	/// Drop all captured console messages and reset ids
	ClearConsole,

	/// Evaluate JavaScript on the active page
	Evaluate {
		#[arg(long)]
		script: String,
	},

	/// Capture a screenshot of the active page
	Screenshot {
		/// Write the image here; omit to get base64 on stdout
		#[arg(long)]
		path: Option<PathBuf>,

		/// Capture the full scrollable page
		#[arg(long)]
		full_page: bool,

		/// Image format
		#[arg(long = "type", value_enum, default_value_t = CliImageFormat::Png)]
		format: CliImageFormat,

		/// Compression quality 0-100 (jpeg/webp only)
		#[arg(long)]
		quality: Option<i64>,
	},

	/// Dump the page HTML, optionally with the accessibility tree
	Snapshot {
		/// Include the accessibility tree
		#[arg(long)]
		verbose: bool,
	},
}

#[cfg(test)]
mod tests {
	use super::*;

	fn parse(args: &[&str]) -> Cli {
		Cli::try_parse_from(args.iter().copied()).expect("should parse")
	}

	#[test]
	fn nav_select_page_parses_index() {
		let cli = parse(&["cdt", "nav", "select-page", "--index", "2"]);
		match cli.command {
			Commands::Nav(NavCommand::SelectPage { index }) => assert_eq!(index, 2),
			other => panic!("unexpected command: {other:?}"),
		}
	}

	#[test]
	fn negative_index_is_rejected_at_parse_time() {
		assert!(Cli::try_parse_from(["cdt", "nav", "select-page", "--index", "-1"]).is_err());
	}

	#[test]
	fn global_flags_apply_after_subcommand() {
		let cli = parse(&[
			"cdt",
			"nav",
			"navigate",
			"--url",
			"https://example.com",
			"--headless",
			"--viewport",
			"1280x720",
			"-vv",
		]);
		assert!(cli.headless);
		assert_eq!(cli.verbose, 2);
		let options = cli.browser_options();
		assert_eq!(options.viewport.as_deref(), Some("1280x720"));
	}

	#[test]
	fn format_defaults_to_toon() {
		let cli = parse(&["cdt", "close"]);
		assert_eq!(cli.format, OutputFormat::Toon);
	}

	#[test]
	fn chrome_args_are_repeatable() {
		let cli = parse(&[
			"cdt",
			"--chrome-arg",
			"--no-sandbox",
			"--chrome-arg",
			"--disable-gpu",
			"close",
		]);
		assert_eq!(cli.chrome_args.len(), 2);
	}

	#[test]
	fn console_types_split_on_commas() {
		let cli = parse(&["cdt", "debug", "list-console", "--types", "log,error"]);
		match cli.command {
			Commands::Debug(DebugCommand::ListConsole { types, .. }) => {
				assert_eq!(types.unwrap(), vec!["log", "error"]);
			}
			other => panic!("unexpected command: {other:?}"),
		}
	}

	#[test]
	fn fill_form_requires_at_least_one_field() {
		assert!(Cli::try_parse_from(["cdt", "input", "fill-form"]).is_err());
		let cli = parse(&["cdt", "input", "fill-form", "name=Jo", "email=jo@x.test"]);
		match cli.command {
			Commands::Input(InputCommand::FillForm { fields }) => assert_eq!(fields.len(), 2),
			other => panic!("unexpected command: {other:?}"),
		}
	}

	#[test]
	fn channel_maps_to_core_channel() {
		let cli = parse(&["cdt", "--channel", "dev", "close"]);
		assert_eq!(cli.browser_options().channel, Some(cdt::Channel::Dev));
	}
}
