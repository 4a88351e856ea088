use thiserror::Error;

pub type Result<T> = std::result::Result<T, CdtError>;

#[derive(Debug, Error)]
pub enum CdtError {
	#[error("browser launch failed: {0}")]
	BrowserLaunch(String),

	#[error("navigation failed: {url}")]
	Navigation {
		url: String,
		#[source]
		source: anyhow::Error,
	},

	#[error("element not found: {selector}")]
	ElementNotFound { selector: String },

	#[error("record not found: {id}")]
	RecordNotFound { id: String },

	#[error("page index {index} out of range (0-{})", .count.saturating_sub(1))]
	PageIndexOutOfRange { index: usize, count: usize },

	#[error("cannot close the last page")]
	LastPage,

	#[error("invalid state: {0}")]
	InvalidState(String),

	#[error("timeout after {ms}ms waiting for: {condition}")]
	Timeout { ms: u64, condition: String },

	#[error("invalid input: {0}")]
	InvalidInput(String),

	#[error("javascript evaluation failed: {0}")]
	JsEval(String),

	#[error("screenshot failed: {0}")]
	Screenshot(String),

	#[error("browser transport error: {0}")]
	Transport(String),

	#[error(transparent)]
	Io(#[from] std::io::Error),

	#[error(transparent)]
	Json(#[from] serde_json::Error),
}

impl From<chromiumoxide::error::CdpError> for CdtError {
	fn from(err: chromiumoxide::error::CdpError) -> Self {
		CdtError::Transport(err.to_string())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn out_of_range_message_names_valid_bounds() {
		let err = CdtError::PageIndexOutOfRange { index: 5, count: 3 };
		assert_eq!(err.to_string(), "page index 5 out of range (0-2)");
	}

	#[test]
	fn out_of_range_message_handles_empty_directory() {
		let err = CdtError::PageIndexOutOfRange { index: 0, count: 0 };
		assert_eq!(err.to_string(), "page index 0 out of range (0-0)");
	}

	#[test]
	fn timeout_message_includes_condition() {
		let err = CdtError::Timeout {
			ms: 5000,
			condition: "selector .login".into(),
		};
		assert_eq!(err.to_string(), "timeout after 5000ms waiting for: selector .login");
	}
}
