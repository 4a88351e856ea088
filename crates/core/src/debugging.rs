//! Script evaluation, screenshots, and page snapshots.

use chromiumoxide::Page;
use chromiumoxide::cdp::browser_protocol::accessibility::{
	EnableParams as AxEnableParams, GetFullAxTreeParams,
};
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::page::ScreenshotParams;
use serde::Serialize;
use serde_json::json;

use crate::error::{CdtError, Result};

/// Evaluate a script on the page and return its JSON value. Non-serializable
/// results come back as null.
pub async fn evaluate(page: &Page, script: &str) -> Result<serde_json::Value> {
	let result = page
		.evaluate(script.to_string())
		.await
		.map_err(|e| CdtError::JsEval(e.to_string()))?;
	Ok(result.value().cloned().unwrap_or(serde_json::Value::Null))
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
	#[default]
	Png,
	Jpeg,
	Webp,
}

impl ImageFormat {
	fn to_cdp(self) -> CaptureScreenshotFormat {
		match self {
			ImageFormat::Png => CaptureScreenshotFormat::Png,
			ImageFormat::Jpeg => CaptureScreenshotFormat::Jpeg,
			ImageFormat::Webp => CaptureScreenshotFormat::Webp,
		}
	}
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ScreenshotOptions {
	pub format: ImageFormat,
	pub full_page: bool,
	/// Compression quality 0-100, jpeg and webp only.
	pub quality: Option<i64>,
}

/// Capture the page as encoded image bytes.
pub async fn screenshot(page: &Page, options: &ScreenshotOptions) -> Result<Vec<u8>> {
	let mut builder = ScreenshotParams::builder()
		.format(options.format.to_cdp())
		.full_page(options.full_page);
	if let Some(quality) = options.quality {
		if options.format != ImageFormat::Png {
			builder = builder.quality(quality);
		}
	}
	page.screenshot(builder.build())
		.await
		.map_err(|e| CdtError::Screenshot(e.to_string()))
}

/// Snapshot the page's serialized HTML; with `verbose` the full
/// accessibility tree is included as well.
pub async fn snapshot(page: &Page, verbose: bool) -> Result<serde_json::Value> {
	let content = page.content().await?;
	if !verbose {
		return Ok(serde_json::Value::String(content));
	}
	page.execute(AxEnableParams::default()).await?;
	let tree = page.execute(GetFullAxTreeParams::default()).await?;
	Ok(json!({
		"content": content,
		"accessibility": serde_json::to_value(&tree.result.nodes)?,
	}))
}
