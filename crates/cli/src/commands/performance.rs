use cdt::options::BrowserOptions;
use cdt::performance::TraceRecorder;
use cdt::{Result, Session, performance};
use serde_json::json;

use super::emit;
use crate::cli::PerfCommand;
use crate::output::OutputFormat;

pub async fn execute(
	command: PerfCommand,
	session: &mut Session,
	options: &BrowserOptions,
	format: OutputFormat,
) -> Result<()> {
	let page = session.acquire_page(options).await?;
	// Recorder state lives in this process; a trace cannot span invocations.
	let mut recorder = TraceRecorder::new();

	match command {
		PerfCommand::StartTrace => {
			recorder.start(&page).await?;
			emit(format, "perf.start-trace", json!({ "tracing": true }));
		}
		PerfCommand::StopTrace { output } => {
			let trace = recorder.stop(&page).await?;
			match output {
				Some(path) => {
					std::fs::write(&path, &trace)?;
					emit(
						format,
						"perf.stop-trace",
						json!({ "path": path, "bytes": trace.len() }),
					);
				}
				None => {
					let trace: serde_json::Value = serde_json::from_slice(&trace)?;
					emit(format, "perf.stop-trace", json!({ "trace": trace }));
				}
			}
		}
		PerfCommand::Analyze { url, duration } => {
			let report = performance::analyze(&page, url.as_deref(), duration).await?;
			emit(format, "perf.analyze", json!({ "report": report }));
		}
	}
	Ok(())
}
