//! Ordinal page directory over the browser's current page list.
//!
//! Indices are positions in a point-in-time listing, not stable ids. Every
//! indexed operation re-fetches the list before bound-checking, but indices
//! printed by an earlier `list` can still go stale if pages are opened or
//! closed in between.

use chromiumoxide::Page;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CdtError, Result};
use crate::navigation;
use crate::options::BrowserOptions;
use crate::session::Session;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
	pub index: usize,
	pub url: String,
	pub title: String,
	pub active: bool,
}

/// Snapshot of all open pages in browser order.
pub async fn list(session: &mut Session, options: &BrowserOptions) -> Result<Vec<PageInfo>> {
	let active_target = session.active_page().map(|p| p.target_id().clone());
	let browser = session.acquire_browser(options).await?;
	let pages = browser.pages().await?;

	let mut infos = Vec::with_capacity(pages.len());
	for (index, page) in pages.iter().enumerate() {
		infos.push(PageInfo {
			index,
			url: page_url(page).await,
			title: page_title(page).await,
			active: active_target.as_ref() == Some(page.target_id()),
		});
	}
	Ok(infos)
}

/// Make the page at `index` the active page and bring it to the front.
/// Focus is best-effort; headless targets may not honor it.
pub async fn select(session: &mut Session, options: &BrowserOptions, index: usize) -> Result<PageInfo> {
	let browser = session.acquire_browser(options).await?;
	let mut pages = browser.pages().await?;
	ensure_index(index, pages.len())?;

	let page = pages.swap_remove(index);
	if let Err(err) = page.bring_to_front().await {
		debug!(target: "cdt.session", error = %err, "bring_to_front failed");
	}
	let info = PageInfo {
		index,
		url: page_url(&page).await,
		title: page_title(&page).await,
		active: true,
	};
	session.set_active_page(page);
	Ok(info)
}

/// Close the page at `index`. Closing the last remaining page is refused.
/// When the closed page was the active one, page 0 of a freshly fetched
/// list is adopted in its place.
pub async fn close(session: &mut Session, options: &BrowserOptions, index: usize) -> Result<()> {
	let browser = session.acquire_browser(options).await?;
	let mut pages = browser.pages().await?;
	ensure_not_last(pages.len())?;
	ensure_index(index, pages.len())?;

	let closing = pages.remove(index);
	let was_active = match session.active_page() {
		Some(active) => active.target_id() == closing.target_id(),
		None => false,
	};
	closing.close().await?;

	if was_active {
		session.clear_active_page();
		// Indices shifted; re-adopt from the post-close list.
		let remaining = session.acquire_browser(options).await?.pages().await?;
		if let Some(first) = remaining.into_iter().next() {
			session.set_active_page(first);
		}
	}
	Ok(())
}

/// Open a new page, make it active, and optionally navigate it.
pub async fn create(
	session: &mut Session,
	options: &BrowserOptions,
	url: Option<&str>,
	timeout_ms: Option<u64>,
) -> Result<PageInfo> {
	let browser = session.acquire_browser(options).await?;
	let page = browser.new_page("about:blank").await?;
	let index = browser.pages().await?.len().saturating_sub(1);
	session.set_active_page(page.clone());

	if let Some(url) = url {
		navigation::goto(&page, url, timeout_ms).await?;
	}
	Ok(PageInfo {
		index,
		url: page_url(&page).await,
		title: page_title(&page).await,
		active: true,
	})
}

fn ensure_index(index: usize, count: usize) -> Result<()> {
	if index >= count {
		return Err(CdtError::PageIndexOutOfRange { index, count });
	}
	Ok(())
}

fn ensure_not_last(count: usize) -> Result<()> {
	if count == 1 {
		return Err(CdtError::LastPage);
	}
	Ok(())
}

pub(crate) async fn page_url(page: &Page) -> String {
	page.url().await.ok().flatten().unwrap_or_default()
}

pub(crate) async fn page_title(page: &Page) -> String {
	page.get_title().await.ok().flatten().unwrap_or_default()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn index_within_bounds_is_accepted() {
		assert!(ensure_index(0, 3).is_ok());
		assert!(ensure_index(2, 3).is_ok());
	}

	#[test]
	fn index_at_or_past_count_is_out_of_range() {
		let err = ensure_index(3, 3).unwrap_err();
		assert!(matches!(err, CdtError::PageIndexOutOfRange { index: 3, count: 3 }));
		assert!(ensure_index(10, 3).is_err());
	}

	#[test]
	fn empty_directory_rejects_index_zero() {
		assert!(ensure_index(0, 0).is_err());
	}

	#[test]
	fn closing_the_last_page_is_refused() {
		assert!(matches!(ensure_not_last(1), Err(CdtError::LastPage)));
		assert!(ensure_not_last(2).is_ok());
	}
}
