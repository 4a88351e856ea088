//! Input primitives addressed by `data-uid` element ids.

use chromiumoxide::Page;
use chromiumoxide::cdp::browser_protocol::dom::SetFileInputFilesParams;
use chromiumoxide::cdp::browser_protocol::input::{
	DispatchKeyEventParams, DispatchKeyEventType, DispatchMouseEventParams,
	DispatchMouseEventType, MouseButton,
};
use chromiumoxide::cdp::browser_protocol::page::{
	EventJavascriptDialogOpening, HandleJavaScriptDialogParams,
};
use futures::StreamExt;
use tracing::debug;

use crate::error::{CdtError, Result};

/// CSS selector for an element tagged with the given uid.
pub fn uid_selector(uid: &str) -> String {
	format!("[data-uid=\"{uid}\"]")
}

/// Click the center of the element tagged `uid`.
pub async fn click(page: &Page, uid: &str, double: bool) -> Result<()> {
	let selector = uid_selector(uid);
	let (x, y) = element_center(page, &selector).await?;
	mouse_event(page, DispatchMouseEventType::MouseMoved, x, y, None, None).await?;
	let clicks: i64 = if double { 2 } else { 1 };
	for count in 1..=clicks {
		mouse_event(
			page,
			DispatchMouseEventType::MousePressed,
			x,
			y,
			Some(MouseButton::Left),
			Some(count),
		)
		.await?;
		mouse_event(
			page,
			DispatchMouseEventType::MouseReleased,
			x,
			y,
			Some(MouseButton::Left),
			Some(count),
		)
		.await?;
	}
	Ok(())
}

/// Move the pointer over the element tagged `uid`.
pub async fn hover(page: &Page, uid: &str) -> Result<()> {
	let selector = uid_selector(uid);
	let (x, y) = element_center(page, &selector).await?;
	mouse_event(page, DispatchMouseEventType::MouseMoved, x, y, None, None).await
}

/// Focus the element tagged `uid` and type `value` one character at a time.
pub async fn fill(page: &Page, uid: &str, value: &str) -> Result<()> {
	let selector = uid_selector(uid);
	focus(page, &selector).await?;
	for ch in value.chars() {
		for kind in [DispatchKeyEventType::KeyDown, DispatchKeyEventType::KeyUp] {
			let params = DispatchKeyEventParams::builder()
				.r#type(kind)
				.text(ch.to_string())
				.build()
				.map_err(CdtError::Transport)?;
			page.execute(params).await?;
		}
	}
	Ok(())
}

/// Fill several fields in order; stops at the first failure.
pub async fn fill_form(page: &Page, fields: &[(String, String)]) -> Result<()> {
	for (uid, value) in fields {
		fill(page, uid, value).await?;
	}
	Ok(())
}

/// Press a named key (`Enter`, `Tab`, `a`, ...) on whatever has focus.
pub async fn press_key(page: &Page, key: &str) -> Result<()> {
	for kind in [DispatchKeyEventType::KeyDown, DispatchKeyEventType::KeyUp] {
		let mut builder = DispatchKeyEventParams::builder()
			.r#type(kind)
			.key(key.to_string());
		// Single printable characters also carry text so inputs receive them
		if key.chars().count() == 1 {
			builder = builder.text(key.to_string());
		}
		let params = builder.build().map_err(CdtError::Transport)?;
		page.execute(params).await?;
	}
	Ok(())
}

/// Drag from the center of one element to the center of another with a
/// single uninterrupted move-press-move-release sequence.
pub async fn drag(page: &Page, from_uid: &str, to_uid: &str) -> Result<()> {
	let from_selector = uid_selector(from_uid);
	let to_selector = uid_selector(to_uid);
	let (from_x, from_y) = element_center(page, &from_selector).await?;
	let (to_x, to_y) = element_center(page, &to_selector).await?;

	mouse_event(page, DispatchMouseEventType::MouseMoved, from_x, from_y, None, None).await?;
	mouse_event(
		page,
		DispatchMouseEventType::MousePressed,
		from_x,
		from_y,
		Some(MouseButton::Left),
		Some(1),
	)
	.await?;
	mouse_event(page, DispatchMouseEventType::MouseMoved, to_x, to_y, Some(MouseButton::Left), None).await?;
	mouse_event(
		page,
		DispatchMouseEventType::MouseReleased,
		to_x,
		to_y,
		Some(MouseButton::Left),
		Some(1),
	)
	.await
}

/// Attach `path` to the file input tagged `uid`.
pub async fn upload_file(page: &Page, uid: &str, path: &std::path::Path) -> Result<()> {
	let selector = uid_selector(uid);
	let element = page
		.find_element(selector.as_str())
		.await
		.map_err(|_| CdtError::ElementNotFound { selector: selector.clone() })?;
	let params = SetFileInputFilesParams::builder()
		.files(vec![path.display().to_string()])
		.backend_node_id(element.backend_node_id)
		.build()
		.map_err(CdtError::Transport)?;
	page.execute(params).await?;
	Ok(())
}

/// Arm a one-shot handler for the next JavaScript dialog on the page.
/// Supplying prompt text implies accepting.
pub async fn handle_dialog(page: &Page, accept: bool, prompt_text: Option<String>) -> Result<()> {
	let mut dialogs = page.event_listener::<EventJavascriptDialogOpening>().await?;
	let page = page.clone();
	tokio::spawn(async move {
		if let Some(dialog) = dialogs.next().await {
			let mut builder =
				HandleJavaScriptDialogParams::builder().accept(accept || prompt_text.is_some());
			if let Some(text) = prompt_text {
				builder = builder.prompt_text(text);
			}
			match builder.build() {
				Ok(params) => {
					if let Err(err) = page.execute(params).await {
						debug!(target: "cdt.session", error = %err, "dialog handling failed");
					} else {
						debug!(target: "cdt.session", message = %dialog.message, "handled dialog");
					}
				}
				Err(err) => debug!(target: "cdt.session", error = %err, "invalid dialog params"),
			}
		}
	});
	Ok(())
}

/// Viewport-relative center of the first element matching `selector`.
async fn element_center(page: &Page, selector: &str) -> Result<(f64, f64)> {
	let script = format!(
		r#"(() => {{
			const el = document.querySelector({selector});
			if (!el) return null;
			const rect = el.getBoundingClientRect();
			return {{ x: rect.x + rect.width / 2, y: rect.y + rect.height / 2 }};
		}})()"#,
		selector = serde_json::to_string(selector)?
	);
	let result = page
		.evaluate(script)
		.await
		.map_err(|e| CdtError::JsEval(e.to_string()))?;
	let value = result.value().cloned().unwrap_or(serde_json::Value::Null);
	if value.is_null() {
		return Err(CdtError::ElementNotFound { selector: selector.to_string() });
	}
	let x = value
		.get("x")
		.and_then(serde_json::Value::as_f64)
		.ok_or_else(|| CdtError::JsEval("element center missing x".to_string()))?;
	let y = value
		.get("y")
		.and_then(serde_json::Value::as_f64)
		.ok_or_else(|| CdtError::JsEval("element center missing y".to_string()))?;
	Ok((x, y))
}

async fn focus(page: &Page, selector: &str) -> Result<()> {
	let script = format!(
		r#"(() => {{
			const el = document.querySelector({selector});
			if (!el) return false;
			el.focus();
			return true;
		}})()"#,
		selector = serde_json::to_string(selector)?
	);
	let result = page
		.evaluate(script)
		.await
		.map_err(|e| CdtError::JsEval(e.to_string()))?;
	let focused = result.value().and_then(|v| v.as_bool()).unwrap_or(false);
	if !focused {
		return Err(CdtError::ElementNotFound { selector: selector.to_string() });
	}
	Ok(())
}

async fn mouse_event(
	page: &Page,
	kind: DispatchMouseEventType,
	x: f64,
	y: f64,
	button: Option<MouseButton>,
	click_count: Option<i64>,
) -> Result<()> {
	let mut builder = DispatchMouseEventParams::builder().r#type(kind).x(x).y(y);
	if let Some(button) = button {
		builder = builder.button(button);
	}
	if let Some(count) = click_count {
		builder = builder.click_count(count);
	}
	let params = builder.build().map_err(CdtError::Transport)?;
	page.execute(params).await?;
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn uid_selector_uses_data_uid_attribute() {
		assert_eq!(uid_selector("btn-7"), "[data-uid=\"btn-7\"]");
	}
}
