//! Network request/response capture over `Network.requestWillBeSent` and
//! `Network.responseReceived`.

use std::collections::BTreeMap;
use std::sync::Arc;

use chromiumoxide::Page;
use chromiumoxide::cdp::browser_protocol::network::{
	EnableParams, EventRequestWillBeSent, EventResponseReceived,
};
use futures::StreamExt;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::{EventLog, epoch_ms, window};
use crate::error::Result;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkRecord {
	pub id: String,
	pub url: String,
	pub method: String,
	pub headers: BTreeMap<String, String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub post_data: Option<String>,
	/// Unset until a response is correlated; stays unset for requests that
	/// never complete.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub response: Option<ResponseInfo>,
	/// Capture time, milliseconds since the Unix epoch.
	pub timestamp: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseInfo {
	pub status: i64,
	pub status_text: String,
	pub headers: BTreeMap<String, String>,
}

#[derive(Clone, Debug, Default)]
pub struct NetworkQuery {
	pub limit: Option<usize>,
	pub offset: Option<usize>,
	/// URL substring filters: a record is kept when any entry occurs in
	/// its URL.
	pub resource_types: Option<Vec<String>>,
}

/// Append-only store of captured request records, shared between the
/// subscription tasks and readers.
#[derive(Clone)]
pub struct NetworkStore {
	inner: Arc<Mutex<EventLog<NetworkRecord>>>,
}

impl NetworkStore {
	pub fn new() -> Self {
		Self {
			inner: Arc::new(Mutex::new(EventLog::new("req"))),
		}
	}

	/// Subscribe to request and response events on `page` and feed them
	/// into the store.
	///
	/// Each call adds another pair of subscriptions; calling twice without
	/// a release in between records every request twice.
	pub async fn start_monitoring(&self, page: &Page) -> Result<()> {
		page.execute(EnableParams::default()).await?;
		let mut requests = page.event_listener::<EventRequestWillBeSent>().await?;
		let mut responses = page.event_listener::<EventResponseReceived>().await?;

		let store = self.clone();
		tokio::spawn(async move {
			while let Some(event) = requests.next().await {
				let request_json = serde_json::to_value(&event.request).unwrap_or_default();
				let headers = header_map(request_json.get("headers"));
				let post_data = request_json
					.get("postData")
					.and_then(|v| v.as_str())
					.map(str::to_string);
				let id = store.record_request(
					event.request.url.clone(),
					event.request.method.clone(),
					headers,
					post_data,
				);
				trace!(target: "cdt.network", %id, url = %event.request.url, "captured request");
			}
			debug!(target: "cdt.network", "request subscription ended");
		});

		let store = self.clone();
		tokio::spawn(async move {
			while let Some(event) = responses.next().await {
				let response_json = serde_json::to_value(&event.response).unwrap_or_default();
				let headers = header_map(response_json.get("headers"));
				let matched = store.record_response(
					&event.response.url,
					event.response.status,
					event.response.status_text.clone(),
					headers,
				);
				if !matched {
					trace!(target: "cdt.network", url = %event.response.url, "response without pending request, dropped");
				}
			}
			debug!(target: "cdt.network", "response subscription ended");
		});

		Ok(())
	}

	/// Append a request record with no response attached; returns its id.
	pub fn record_request(
		&self,
		url: impl Into<String>,
		method: impl Into<String>,
		headers: BTreeMap<String, String>,
		post_data: Option<String>,
	) -> String {
		let mut log = self.inner.lock();
		let id = log.next_id();
		log.records.push(NetworkRecord {
			id: id.clone(),
			url: url.into(),
			method: method.into(),
			headers,
			post_data,
			response: None,
			timestamp: epoch_ms(),
		});
		id
	}

	/// Attach a response to the earliest stored record with the same URL
	/// and no response yet. Returns false when no such record exists and
	/// the event is dropped.
	///
	/// Correlation is by URL equality only. Concurrent requests to the
	/// same URL can have their responses attributed to the wrong record.
	pub fn record_response(
		&self,
		url: &str,
		status: i64,
		status_text: impl Into<String>,
		headers: BTreeMap<String, String>,
	) -> bool {
		let mut log = self.inner.lock();
		match log
			.records
			.iter_mut()
			.find(|r| r.url == url && r.response.is_none())
		{
			Some(record) => {
				record.response = Some(ResponseInfo {
					status,
					status_text: status_text.into(),
					headers,
				});
				true
			}
			None => false,
		}
	}

	/// List captured requests: URL-substring filter first (order
	/// preserved), then the pagination window.
	pub fn list(&self, query: &NetworkQuery) -> Vec<NetworkRecord> {
		let log = self.inner.lock();
		let filtered: Vec<NetworkRecord> = match &query.resource_types {
			Some(fragments) => log
				.records
				.iter()
				.filter(|r| fragments.iter().any(|f| r.url.contains(f.as_str())))
				.cloned()
				.collect(),
			None => log.records.clone(),
		};
		drop(log);
		window(filtered, query.offset, query.limit)
	}

	pub fn get(&self, id: &str) -> Option<NetworkRecord> {
		self.inner.lock().records.iter().find(|r| r.id == id).cloned()
	}

	pub fn len(&self) -> usize {
		self.inner.lock().records.len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Empty the store and restart id allocation at `req-1`. Active
	/// subscriptions are unaffected and keep appending.
	pub fn clear(&self) {
		self.inner.lock().clear();
	}
}

impl Default for NetworkStore {
	fn default() -> Self {
		Self::new()
	}
}

fn header_map(value: Option<&serde_json::Value>) -> BTreeMap<String, String> {
	value
		.and_then(|v| v.as_object())
		.map(|map| {
			map.iter()
				.map(|(k, v)| {
					let value = match v {
						serde_json::Value::String(s) => s.clone(),
						other => other.to_string(),
					};
					(k.clone(), value)
				})
				.collect()
		})
		.unwrap_or_default()
}

#[cfg(test)]
mod tests {
	use super::*;

	fn record(store: &NetworkStore, url: &str) -> String {
		store.record_request(url, "GET", BTreeMap::new(), None)
	}

	#[test]
	fn requests_get_sequential_req_ids() {
		let store = NetworkStore::new();
		assert_eq!(record(&store, "https://a.test/"), "req-1");
		assert_eq!(record(&store, "https://b.test/"), "req-2");
	}

	#[test]
	fn response_attaches_to_matching_request() {
		let store = NetworkStore::new();
		let id = record(&store, "https://api.test/data");
		assert!(store.get(&id).unwrap().response.is_none());

		let matched = store.record_response("https://api.test/data", 200, "OK", BTreeMap::new());
		assert!(matched);
		let response = store.get(&id).unwrap().response.unwrap();
		assert_eq!(response.status, 200);
		assert_eq!(response.status_text, "OK");
	}

	#[test]
	fn second_response_for_same_url_is_dropped() {
		let store = NetworkStore::new();
		let id = record(&store, "https://api.test/data");
		assert!(store.record_response("https://api.test/data", 200, "OK", BTreeMap::new()));
		assert!(!store.record_response("https://api.test/data", 304, "Not Modified", BTreeMap::new()));
		assert_eq!(store.get(&id).unwrap().response.unwrap().status, 200);
	}

	#[test]
	fn response_without_request_is_dropped() {
		let store = NetworkStore::new();
		assert!(!store.record_response("https://nowhere.test/", 200, "OK", BTreeMap::new()));
		assert!(store.is_empty());
	}

	#[test]
	fn earliest_pending_record_wins_on_duplicate_urls() {
		let store = NetworkStore::new();
		let first = record(&store, "https://dup.test/");
		let second = record(&store, "https://dup.test/");
		store.record_response("https://dup.test/", 200, "OK", BTreeMap::new());
		assert!(store.get(&first).unwrap().response.is_some());
		assert!(store.get(&second).unwrap().response.is_none());
	}

	#[test]
	fn url_fragment_filter_then_pagination() {
		let store = NetworkStore::new();
		record(&store, "https://cdn.test/app.js");
		record(&store, "https://api.test/users");
		record(&store, "https://cdn.test/style.css");

		let query = NetworkQuery {
			resource_types: Some(vec!["cdn.test".into()]),
			..Default::default()
		};
		let records = store.list(&query);
		assert_eq!(records.len(), 2);
		assert_eq!(records[0].id, "req-1");
		assert_eq!(records[1].id, "req-3");

		let query = NetworkQuery {
			resource_types: Some(vec!["cdn.test".into()]),
			offset: Some(1),
			limit: Some(1),
		};
		let records = store.list(&query);
		assert_eq!(records.len(), 1);
		assert_eq!(records[0].id, "req-3");
	}

	#[test]
	fn clear_empties_and_restarts_ids() {
		let store = NetworkStore::new();
		record(&store, "https://a.test/");
		store.clear();
		assert!(store.list(&NetworkQuery::default()).is_empty());
		assert_eq!(record(&store, "https://b.test/"), "req-1");
	}
}
