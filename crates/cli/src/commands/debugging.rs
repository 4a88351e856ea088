use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use cdt::capture::console::ConsoleQuery;
use cdt::debugging::{self, ScreenshotOptions};
use cdt::options::BrowserOptions;
use cdt::{CdtError, Result, Session};
use serde_json::json;

use super::emit;
use crate::cli::DebugCommand;
use crate::output::OutputFormat;

pub async fn execute(
	command: DebugCommand,
	session: &mut Session,
	options: &BrowserOptions,
	format: OutputFormat,
) -> Result<()> {
	match command {
		DebugCommand::StartConsoleMonitoring => {
			let page = session.acquire_page(options).await?;
			session.console().start_monitoring(&page).await?;
			emit(format, "debug.start-console-monitoring", json!({ "monitoring": true }));
		}
		DebugCommand::ListConsole { limit, offset, types } => {
			let query = ConsoleQuery { limit, offset, types };
			let messages = session.console().list(&query);
			emit(
				format,
				"debug.list-console",
				json!({ "count": messages.len(), "messages": messages }),
			);
		}
		DebugCommand::GetConsole { id } => {
			let record = session
				.console()
				.get(&id)
				.ok_or(CdtError::RecordNotFound { id })?;
			emit(format, "debug.get-console", json!({ "message": record }));
		}
		DebugCommand::ClearConsole => {
			session.console().clear();
			emit(format, "debug.clear-console", json!({ "cleared": true }));
		}
		DebugCommand::Evaluate { script } => {
			let page = session.acquire_page(options).await?;
			let value = debugging::evaluate(&page, &script).await?;
			emit(format, "debug.evaluate", json!({ "result": value }));
		}
		DebugCommand::Screenshot { path, full_page, format: image_format, quality } => {
			let page = session.acquire_page(options).await?;
			let screenshot_options = ScreenshotOptions {
				format: image_format.into(),
				full_page,
				quality,
			};
			let bytes = debugging::screenshot(&page, &screenshot_options).await?;
			match path {
				Some(path) => {
					std::fs::write(&path, &bytes)?;
					emit(
						format,
						"debug.screenshot",
						json!({ "path": path, "bytes": bytes.len() }),
					);
				}
				None => {
					emit(
						format,
						"debug.screenshot",
						json!({ "base64": BASE64.encode(&bytes) }),
					);
				}
			}
		}
		DebugCommand::Snapshot { verbose } => {
			let page = session.acquire_page(options).await?;
			let snapshot = debugging::snapshot(&page, verbose).await?;
			emit(format, "debug.snapshot", json!({ "snapshot": snapshot }));
		}
	}
	Ok(())
}
