use cdt::options::BrowserOptions;
use cdt::{CdtError, Result, Session, input};
use serde_json::json;

use super::emit;
use crate::cli::{DialogAction, InputCommand};
use crate::output::OutputFormat;

pub async fn execute(
	command: InputCommand,
	session: &mut Session,
	options: &BrowserOptions,
	format: OutputFormat,
) -> Result<()> {
	let page = session.acquire_page(options).await?;
	match command {
		InputCommand::Click { uid, dbl_click } => {
			input::click(&page, &uid, dbl_click).await?;
			emit(format, "input.click", json!({ "uid": uid, "doubleClick": dbl_click }));
		}
		InputCommand::Hover { uid } => {
			input::hover(&page, &uid).await?;
			emit(format, "input.hover", json!({ "uid": uid }));
		}
		InputCommand::Fill { uid, value } => {
			input::fill(&page, &uid, &value).await?;
			emit(format, "input.fill", json!({ "uid": uid }));
		}
		InputCommand::FillForm { fields } => {
			let fields = parse_fields(&fields)?;
			input::fill_form(&page, &fields).await?;
			emit(format, "input.fill-form", json!({ "filled": fields.len() }));
		}
		InputCommand::PressKey { key } => {
			input::press_key(&page, &key).await?;
			emit(format, "input.press-key", json!({ "key": key }));
		}
		InputCommand::Drag { from, to } => {
			input::drag(&page, &from, &to).await?;
			emit(format, "input.drag", json!({ "from": from, "to": to }));
		}
		InputCommand::UploadFile { uid, file } => {
			input::upload_file(&page, &uid, &file).await?;
			emit(format, "input.upload-file", json!({ "uid": uid, "file": file }));
		}
		InputCommand::HandleDialog { action, prompt_text } => {
			let accept = action == DialogAction::Accept;
			input::handle_dialog(&page, accept, prompt_text).await?;
			emit(format, "input.handle-dialog", json!({ "armed": true, "accept": accept }));
		}
	}
	Ok(())
}

/// Split `UID=VALUE` pairs; values may contain further `=` signs.
fn parse_fields(raw: &[String]) -> Result<Vec<(String, String)>> {
	raw.iter()
		.map(|pair| {
			pair.split_once('=')
				.map(|(uid, value)| (uid.to_string(), value.to_string()))
				.ok_or_else(|| {
					CdtError::InvalidInput(format!("expected UID=VALUE, got '{pair}'"))
				})
		})
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn fields_split_on_first_equals() {
		let raw = vec!["name=Jo".to_string(), "motto=a=b".to_string()];
		let fields = parse_fields(&raw).unwrap();
		assert_eq!(fields[0], ("name".to_string(), "Jo".to_string()));
		assert_eq!(fields[1], ("motto".to_string(), "a=b".to_string()));
	}

	#[test]
	fn field_without_equals_is_invalid_input() {
		let raw = vec!["nonsense".to_string()];
		assert!(matches!(parse_fields(&raw), Err(CdtError::InvalidInput(_))));
	}
}
