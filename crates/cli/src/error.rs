use cdt::CdtError;
use serde_json::json;

use crate::output::{CommandError, ErrorCode};

/// Map a core error onto the envelope's stable error codes.
pub fn to_command_error(err: &CdtError) -> CommandError {
	let (code, message, details) = match err {
		CdtError::BrowserLaunch(msg) => (ErrorCode::BrowserLaunchFailed, msg.clone(), None),
		CdtError::Navigation { url, source } => (
			ErrorCode::NavigationFailed,
			format!("Navigation to {url} failed: {source}"),
			Some(json!({ "url": url })),
		),
		CdtError::ElementNotFound { selector } => (
			ErrorCode::ElementNotFound,
			format!("No elements matched selector: {selector}"),
			Some(json!({ "selector": selector })),
		),
		CdtError::RecordNotFound { id } => (
			ErrorCode::NotFound,
			format!("No record with id: {id}"),
			Some(json!({ "id": id })),
		),
		CdtError::PageIndexOutOfRange { index, count } => (
			ErrorCode::OutOfRange,
			err.to_string(),
			Some(json!({ "index": index, "count": count })),
		),
		CdtError::LastPage => (ErrorCode::LastPage, err.to_string(), None),
		CdtError::InvalidState(msg) => (ErrorCode::InvalidState, msg.clone(), None),
		CdtError::Timeout { ms, condition } => (
			ErrorCode::Timeout,
			err.to_string(),
			Some(json!({ "timeoutMs": ms, "condition": condition })),
		),
		CdtError::InvalidInput(msg) => (ErrorCode::InvalidInput, msg.clone(), None),
		CdtError::JsEval(msg) => (ErrorCode::JsEvalFailed, msg.clone(), None),
		CdtError::Screenshot(msg) => (ErrorCode::ScreenshotFailed, msg.clone(), None),
		CdtError::Transport(msg) => (ErrorCode::SessionError, msg.clone(), None),
		CdtError::Io(err) => (ErrorCode::IoError, err.to_string(), None),
		CdtError::Json(err) => (ErrorCode::InternalError, format!("JSON error: {err}"), None),
	};

	CommandError {
		code,
		message,
		details,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn out_of_range_maps_to_its_code_with_details() {
		let err = CdtError::PageIndexOutOfRange { index: 4, count: 2 };
		let cmd_error = to_command_error(&err);
		assert_eq!(cmd_error.code, ErrorCode::OutOfRange);
		assert_eq!(cmd_error.details.unwrap()["count"], 2);
	}

	#[test]
	fn last_page_and_invalid_state_have_distinct_codes() {
		assert_eq!(to_command_error(&CdtError::LastPage).code, ErrorCode::LastPage);
		let err = CdtError::InvalidState("tracing is already active".into());
		assert_eq!(to_command_error(&err).code, ErrorCode::InvalidState);
	}

	#[test]
	fn timeout_is_not_reported_as_not_found() {
		let err = CdtError::Timeout {
			ms: 100,
			condition: "selector .spinner".into(),
		};
		let cmd_error = to_command_error(&err);
		assert_eq!(cmd_error.code, ErrorCode::Timeout);
		assert_ne!(cmd_error.code, ErrorCode::ElementNotFound);
	}

	#[test]
	fn record_lookup_miss_maps_to_not_found() {
		let err = CdtError::RecordNotFound { id: "req-9".into() };
		let cmd_error = to_command_error(&err);
		assert_eq!(cmd_error.code, ErrorCode::NotFound);
		assert_eq!(cmd_error.details.unwrap()["id"], "req-9");
	}
}
