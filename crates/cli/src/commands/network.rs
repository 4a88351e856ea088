use cdt::capture::network::NetworkQuery;
use cdt::options::BrowserOptions;
use cdt::{CdtError, Result, Session};
use serde_json::json;

use super::emit;
use crate::cli::NetworkCommand;
use crate::output::OutputFormat;

pub async fn execute(
	command: NetworkCommand,
	session: &mut Session,
	options: &BrowserOptions,
	format: OutputFormat,
) -> Result<()> {
	match command {
		NetworkCommand::StartMonitoring => {
			let page = session.acquire_page(options).await?;
			session.network().start_monitoring(&page).await?;
			emit(format, "network.start-monitoring", json!({ "monitoring": true }));
		}
		NetworkCommand::ListRequests { limit, offset, types } => {
			let query = NetworkQuery {
				limit,
				offset,
				resource_types: types,
			};
			let requests = session.network().list(&query);
			emit(
				format,
				"network.list-requests",
				json!({ "count": requests.len(), "requests": requests }),
			);
		}
		NetworkCommand::GetRequest { id } => {
			let record = session
				.network()
				.get(&id)
				.ok_or(CdtError::RecordNotFound { id })?;
			emit(format, "network.get-request", json!({ "request": record }));
		}
		NetworkCommand::Clear => {
			session.network().clear();
			emit(format, "network.clear", json!({ "cleared": true }));
		}
	}
	Ok(())
}
