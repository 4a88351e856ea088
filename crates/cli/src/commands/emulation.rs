use cdt::options::BrowserOptions;
use cdt::{Result, Session, emulation};
use serde_json::json;

use super::emit;
use crate::cli::EmulateCommand;
use crate::output::OutputFormat;

pub async fn execute(
	command: EmulateCommand,
	session: &mut Session,
	options: &BrowserOptions,
	format: OutputFormat,
) -> Result<()> {
	let page = session.acquire_page(options).await?;
	match command {
		EmulateCommand::Device { name } => {
			let device = emulation::emulate_device(&page, &name).await?;
			emit(format, "emulate.device", json!({ "device": device }));
		}
		EmulateCommand::Resize { width, height } => {
			emulation::resize(&page, width, height).await?;
			emit(format, "emulate.resize", json!({ "width": width, "height": height }));
		}
	}
	Ok(())
}
