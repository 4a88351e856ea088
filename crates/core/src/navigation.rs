//! Navigation and wait primitives for the active page.

use std::time::Duration;

use chromiumoxide::Page;
use tokio::time::Instant;
use tracing::debug;

use crate::error::{CdtError, Result};

pub const DEFAULT_WAIT_TIMEOUT_MS: u64 = 30_000;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Navigate `page` to `url` and wait for the navigation to settle. An
/// elapsed timeout is reported as [`CdtError::Timeout`], distinct from a
/// navigation failure.
pub async fn goto(page: &Page, url: &str, timeout_ms: Option<u64>) -> Result<()> {
	let navigate = async {
		page.goto(url).await?;
		// goto resolves on the frame event; settle on the load state too
		let _ = page.wait_for_navigation().await;
		Ok::<(), chromiumoxide::error::CdpError>(())
	};

	let result = match timeout_ms {
		Some(ms) => match tokio::time::timeout(Duration::from_millis(ms), navigate).await {
			Ok(result) => result,
			Err(_) => {
				return Err(CdtError::Timeout {
					ms,
					condition: format!("navigation to {url}"),
				});
			}
		},
		None => navigate.await,
	};

	result.map_err(|e| CdtError::Navigation {
		url: url.to_string(),
		source: anyhow::Error::new(e),
	})
}

/// Poll until `selector` matches an element or the page text contains
/// `text`. Timing out yields [`CdtError::Timeout`] naming the condition;
/// it does not claim the element never existed.
pub async fn wait_for(
	page: &Page,
	selector: Option<&str>,
	text: Option<&str>,
	timeout_ms: Option<u64>,
) -> Result<()> {
	let condition = match (selector, text) {
		(Some(selector), _) => format!("selector {selector}"),
		(None, Some(text)) => format!("text {text:?}"),
		(None, None) => {
			return Err(CdtError::InvalidInput(
				"wait-for requires a selector or text".to_string(),
			));
		}
	};

	let ms = timeout_ms.unwrap_or(DEFAULT_WAIT_TIMEOUT_MS);
	let deadline = Instant::now() + Duration::from_millis(ms);
	debug!(target: "cdt.session", %condition, timeout_ms = ms, "waiting");

	loop {
		let found = match (selector, text) {
			(Some(selector), _) => page.find_element(selector).await.is_ok(),
			(None, Some(text)) => text_is_present(page, text).await?,
			(None, None) => false,
		};
		if found {
			return Ok(());
		}
		if Instant::now() >= deadline {
			return Err(CdtError::Timeout { ms, condition });
		}
		tokio::time::sleep(POLL_INTERVAL).await;
	}
}

async fn text_is_present(page: &Page, text: &str) -> Result<bool> {
	let script = format!(
		"!!document.body && document.body.textContent.includes({})",
		serde_json::to_string(text)?
	);
	let present = page
		.evaluate(script)
		.await
		.ok()
		.map(|result| result.value().and_then(|v| v.as_bool()).unwrap_or(false))
		.unwrap_or(false);
	Ok(present)
}
