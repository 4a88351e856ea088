use cdt::options::BrowserOptions;
use cdt::{Result, Session, navigation, pages};
use serde_json::json;

use super::emit;
use crate::cli::NavCommand;
use crate::output::OutputFormat;

pub async fn execute(
	command: NavCommand,
	session: &mut Session,
	options: &BrowserOptions,
	format: OutputFormat,
) -> Result<()> {
	match command {
		NavCommand::ListPages => {
			let pages = pages::list(session, options).await?;
			emit(format, "nav.list-pages", json!({ "count": pages.len(), "pages": pages }));
		}
		NavCommand::SelectPage { index } => {
			let page = pages::select(session, options, index).await?;
			emit(format, "nav.select-page", json!({ "page": page }));
		}
		NavCommand::ClosePage { index } => {
			pages::close(session, options, index).await?;
			emit(format, "nav.close-page", json!({ "closedIndex": index }));
		}
		NavCommand::NewPage { url, timeout } => {
			let page = pages::create(session, options, Some(&url), timeout).await?;
			emit(format, "nav.new-page", json!({ "page": page }));
		}
		NavCommand::Navigate { url, timeout } => {
			let page = session.acquire_page(options).await?;
			navigation::goto(&page, &url, timeout).await?;
			let title = page.get_title().await.ok().flatten().unwrap_or_default();
			emit(format, "nav.navigate", json!({ "url": url, "title": title }));
		}
		NavCommand::WaitFor { selector, text, timeout } => {
			let page = session.acquire_page(options).await?;
			navigation::wait_for(&page, selector.as_deref(), text.as_deref(), timeout).await?;
			emit(
				format,
				"nav.wait-for",
				json!({ "found": true, "selector": selector, "text": text }),
			);
		}
	}
	Ok(())
}
