//! Session lifecycle: one browser handle and one active page per process.

use chromiumoxide::Page;
use chromiumoxide::browser::Browser;
use futures::StreamExt;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::capture::console::ConsoleStore;
use crate::capture::network::NetworkStore;
use crate::error::{CdtError, Result};
use crate::options::BrowserOptions;

/// Explicit context object owning all per-process browser state: at most
/// one browser handle, at most one active page, and the capture stores fed
/// by page subscriptions.
///
/// Commands receive a `&mut Session`; there is no global session.
pub struct Session {
	handle: Option<BrowserHandle>,
	active_page: Option<Page>,
	console: ConsoleStore,
	network: NetworkStore,
}

struct BrowserHandle {
	browser: Browser,
	/// Drives the CDP connection; aborted on release.
	event_loop: JoinHandle<()>,
}

impl Session {
	pub fn new() -> Self {
		Self {
			handle: None,
			active_page: None,
			console: ConsoleStore::new(),
			network: NetworkStore::new(),
		}
	}

	/// Return the live browser handle, connecting or launching on first
	/// use. Once a handle exists the options are ignored until
	/// [`Session::release`]: repeated calls with different options reuse
	/// the existing browser unchanged.
	pub async fn acquire_browser(&mut self, options: &BrowserOptions) -> Result<&Browser> {
		if self.handle.is_none() {
			let (browser, mut handler) = if let Some(endpoint) = &options.ws_endpoint {
				debug!(target: "cdt.session", %endpoint, "connecting to running browser");
				Browser::connect(endpoint).await.map_err(|e| {
					CdtError::BrowserLaunch(format!("failed to connect to {endpoint}: {e}"))
				})?
			} else {
				let config = options.launch_config()?;
				debug!(target: "cdt.session", headless = options.headless, "launching browser");
				Browser::launch(config)
					.await
					.map_err(|e| CdtError::BrowserLaunch(e.to_string()))?
			};

			let event_loop = tokio::spawn(async move {
				while let Some(event) = handler.next().await {
					let _ = event;
				}
				debug!(target: "cdt.session", "browser event loop ended");
			});

			self.handle = Some(BrowserHandle { browser, event_loop });
		}

		Ok(&self.handle.as_ref().expect("handle just ensured").browser)
	}

	/// Return the active page, adopting the browser's first page or
	/// creating one when none is set. The returned page becomes (or
	/// remains) the active page.
	pub async fn acquire_page(&mut self, options: &BrowserOptions) -> Result<Page> {
		if let Some(page) = &self.active_page {
			return Ok(page.clone());
		}

		let browser = self.acquire_browser(options).await?;
		let page = match browser.pages().await?.into_iter().next() {
			Some(page) => page,
			None => browser.new_page("about:blank").await?,
		};
		self.active_page = Some(page.clone());
		Ok(page)
	}

	pub fn active_page(&self) -> Option<&Page> {
		self.active_page.as_ref()
	}

	pub fn set_active_page(&mut self, page: Page) {
		self.active_page = Some(page);
	}

	pub(crate) fn clear_active_page(&mut self) {
		self.active_page = None;
	}

	pub fn browser(&self) -> Option<&Browser> {
		self.handle.as_ref().map(|h| &h.browser)
	}

	pub fn console(&self) -> &ConsoleStore {
		&self.console
	}

	pub fn network(&self) -> &NetworkStore {
		&self.network
	}

	/// Close the browser if one is held. Handle and active-page state are
	/// cleared before the close result is inspected, so the session
	/// behaves as never-launched afterwards even when the close fails.
	pub async fn release(&mut self) -> Result<()> {
		self.active_page = None;
		if let Some(mut handle) = self.handle.take() {
			let closed = handle.browser.close().await;
			handle.event_loop.abort();
			closed.map_err(|e| CdtError::Transport(e.to_string()))?;
		}
		Ok(())
	}
}

impl Default for Session {
	fn default() -> Self {
		Self::new()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn new_session_holds_nothing() {
		let session = Session::new();
		assert!(session.browser().is_none());
		assert!(session.active_page().is_none());
		assert!(session.console().is_empty());
		assert!(session.network().is_empty());
	}

	#[tokio::test]
	async fn release_without_browser_is_a_no_op() {
		let mut session = Session::new();
		session.release().await.unwrap();
		assert!(session.browser().is_none());
	}

	#[test]
	fn stores_persist_across_page_changes() {
		let mut session = Session::new();
		session.console().record_message("log", "kept", None);
		session.clear_active_page();
		assert_eq!(session.console().len(), 1);
	}
}
