//! Console message capture over `Runtime.consoleAPICalled`.

use std::sync::Arc;

use chromiumoxide::Page;
use chromiumoxide::cdp::js_protocol::runtime::{
	ConsoleApiCalledType, EnableParams, EventConsoleApiCalled, RemoteObject, StackTrace,
};
use futures::StreamExt;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::{EventLog, epoch_ms, window};
use crate::error::Result;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsoleRecord {
	pub id: String,
	#[serde(rename = "type")]
	pub kind: String,
	pub text: String,
	/// Capture time, milliseconds since the Unix epoch.
	pub timestamp: u64,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub location: Option<SourceLocation>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceLocation {
	pub url: String,
	pub line_number: i64,
	pub column_number: i64,
}

#[derive(Clone, Debug, Default)]
pub struct ConsoleQuery {
	pub limit: Option<usize>,
	pub offset: Option<usize>,
	/// Exact message types to keep (e.g. `log`, `error`, `warning`).
	pub types: Option<Vec<String>>,
}

/// Append-only store of captured console messages, shared between the
/// subscription task and readers.
#[derive(Clone)]
pub struct ConsoleStore {
	inner: Arc<Mutex<EventLog<ConsoleRecord>>>,
}

impl ConsoleStore {
	pub fn new() -> Self {
		Self {
			inner: Arc::new(Mutex::new(EventLog::new("msg"))),
		}
	}

	/// Subscribe to console events on `page` and feed them into the store.
	///
	/// Each call adds another independent subscription; calling twice
	/// without a release in between records every message twice.
	pub async fn start_monitoring(&self, page: &Page) -> Result<()> {
		page.execute(EnableParams::default()).await?;
		let mut events = page.event_listener::<EventConsoleApiCalled>().await?;
		let store = self.clone();
		tokio::spawn(async move {
			while let Some(event) = events.next().await {
				let kind = api_type_name(&event.r#type);
				let text = render_args(&event.args);
				let location = event.stack_trace.as_ref().and_then(top_frame);
				let id = store.record_message(kind, text, location);
				trace!(target: "cdt.console", %id, "captured console message");
			}
			debug!(target: "cdt.console", "console subscription ended");
		});
		Ok(())
	}

	/// Append a message and return its assigned id. This is the single
	/// ingestion point; the subscription task goes through it too.
	pub fn record_message(
		&self,
		kind: impl Into<String>,
		text: impl Into<String>,
		location: Option<SourceLocation>,
	) -> String {
		let mut log = self.inner.lock();
		let id = log.next_id();
		log.records.push(ConsoleRecord {
			id: id.clone(),
			kind: kind.into(),
			text: text.into(),
			timestamp: epoch_ms(),
			location,
		});
		id
	}

	/// List captured messages: type filter first (order preserved), then
	/// the pagination window.
	pub fn list(&self, query: &ConsoleQuery) -> Vec<ConsoleRecord> {
		let log = self.inner.lock();
		let filtered: Vec<ConsoleRecord> = match &query.types {
			Some(types) => log
				.records
				.iter()
				.filter(|r| types.iter().any(|t| t == &r.kind))
				.cloned()
				.collect(),
			None => log.records.clone(),
		};
		drop(log);
		window(filtered, query.offset, query.limit)
	}

	pub fn get(&self, id: &str) -> Option<ConsoleRecord> {
		self.inner.lock().records.iter().find(|r| r.id == id).cloned()
	}

	pub fn len(&self) -> usize {
		self.inner.lock().records.len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Empty the store and restart id allocation at `msg-1`. Active
	/// subscriptions are unaffected and keep appending.
	pub fn clear(&self) {
		self.inner.lock().clear();
	}
}

impl Default for ConsoleStore {
	fn default() -> Self {
		Self::new()
	}
}

fn api_type_name(kind: &ConsoleApiCalledType) -> String {
	// The protocol enum serializes to its wire name ("log", "error", ...)
	serde_json::to_value(kind)
		.ok()
		.and_then(|v| v.as_str().map(str::to_string))
		.unwrap_or_else(|| "log".to_string())
}

/// Render console arguments the way DevTools does: primitive values
/// verbatim, everything else by its description, joined with spaces.
fn render_args(args: &[RemoteObject]) -> String {
	args.iter()
		.map(|arg| {
			if let Some(value) = &arg.value {
				match value {
					serde_json::Value::String(s) => s.clone(),
					other => other.to_string(),
				}
			} else if let Some(description) = &arg.description {
				description.clone()
			} else {
				String::new()
			}
		})
		.collect::<Vec<_>>()
		.join(" ")
}

fn top_frame(stack: &StackTrace) -> Option<SourceLocation> {
	stack.call_frames.first().map(|frame| SourceLocation {
		url: frame.url.clone(),
		line_number: frame.line_number,
		column_number: frame.column_number,
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	fn seeded_store() -> ConsoleStore {
		let store = ConsoleStore::new();
		store.record_message("log", "first", None);
		store.record_message("error", "boom", None);
		store.record_message("log", "second", None);
		store
	}

	#[test]
	fn records_get_sequential_msg_ids() {
		let store = ConsoleStore::new();
		assert_eq!(store.record_message("log", "a", None), "msg-1");
		assert_eq!(store.record_message("log", "b", None), "msg-2");
	}

	#[test]
	fn type_filter_keeps_matching_records_in_order() {
		let store = seeded_store();
		let query = ConsoleQuery {
			types: Some(vec!["error".into()]),
			..Default::default()
		};
		let records = store.list(&query);
		assert_eq!(records.len(), 1);
		assert_eq!(records[0].id, "msg-2");
		assert_eq!(records[0].text, "boom");
	}

	#[test]
	fn pagination_applies_after_filtering() {
		let store = seeded_store();
		let query = ConsoleQuery {
			limit: Some(1),
			offset: Some(1),
			..Default::default()
		};
		let records = store.list(&query);
		assert_eq!(records.len(), 1);
		assert_eq!(records[0].id, "msg-2");
	}

	#[test]
	fn offset_past_end_yields_empty() {
		let store = seeded_store();
		let query = ConsoleQuery {
			offset: Some(10),
			..Default::default()
		};
		assert!(store.list(&query).is_empty());
	}

	#[test]
	fn get_by_id_and_missing_id() {
		let store = seeded_store();
		assert_eq!(store.get("msg-3").unwrap().text, "second");
		assert!(store.get("msg-99").is_none());
	}

	#[test]
	fn clear_empties_and_restarts_ids() {
		let store = seeded_store();
		store.clear();
		assert!(store.list(&ConsoleQuery::default()).is_empty());
		assert_eq!(store.record_message("log", "fresh", None), "msg-1");
	}

	#[test]
	fn location_survives_round_trip() {
		let store = ConsoleStore::new();
		let id = store.record_message(
			"warning",
			"deprecated",
			Some(SourceLocation {
				url: "https://example.com/app.js".into(),
				line_number: 42,
				column_number: 7,
			}),
		);
		let record = store.get(&id).unwrap();
		assert_eq!(record.location.unwrap().line_number, 42);
	}
}
