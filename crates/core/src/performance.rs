//! Performance tracing and metrics via the Tracing and Performance domains.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use chromiumoxide::Page;
use chromiumoxide::cdp::browser_protocol::performance::{
	EnableParams as PerfEnableParams, GetMetricsParams,
};
use chromiumoxide::cdp::browser_protocol::tracing::{
	EndParams, EventDataCollected, EventTracingComplete, StartParams, TraceConfig,
};
use futures::StreamExt;
use parking_lot::Mutex;
use serde::Serialize;
use serde_json::json;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::debugging;
use crate::error::{CdtError, Result};
use crate::navigation;

const TRACE_CATEGORIES: &str =
	"devtools.timeline,v8.execute,disabled-by-default-devtools.timeline,disabled-by-default-devtools.timeline.frame";

const TRACE_COMPLETE_TIMEOUT_MS: u64 = 30_000;

/// One tracing session at a time. Starting while active or stopping while
/// idle is an invalid-state error and leaves the recorder unchanged.
pub struct TraceRecorder {
	active: Option<ActiveTrace>,
}

struct ActiveTrace {
	chunks: Arc<Mutex<Vec<serde_json::Value>>>,
	collector: JoinHandle<()>,
}

impl TraceRecorder {
	pub fn new() -> Self {
		Self { active: None }
	}

	pub fn is_active(&self) -> bool {
		self.active.is_some()
	}

	pub async fn start(&mut self, page: &Page) -> Result<()> {
		if self.active.is_some() {
			return Err(CdtError::InvalidState("tracing is already active".to_string()));
		}

		let mut events = page.event_listener::<EventDataCollected>().await?;
		let chunks = Arc::new(Mutex::new(Vec::new()));
		let sink = chunks.clone();
		let collector = tokio::spawn(async move {
			while let Some(event) = events.next().await {
				sink.lock().extend(event.value.iter().cloned());
			}
		});

		let params = StartParams {
			trace_config: Some(TraceConfig {
				included_categories: Some(
					TRACE_CATEGORIES.split(',').map(str::to_string).collect(),
				),
				..Default::default()
			}),
			..Default::default()
		};
		page.execute(params).await?;
		debug!(target: "cdt.session", "tracing started");
		self.active = Some(ActiveTrace { chunks, collector });
		Ok(())
	}

	/// End the tracing session and return the collected trace as a JSON
	/// document (`{"traceEvents": [...]}`).
	pub async fn stop(&mut self, page: &Page) -> Result<Vec<u8>> {
		let active = self
			.active
			.take()
			.ok_or_else(|| CdtError::InvalidState("no active tracing session".to_string()))?;

		let mut complete = page.event_listener::<EventTracingComplete>().await?;
		page.execute(EndParams::default()).await?;

		let wait = Duration::from_millis(TRACE_COMPLETE_TIMEOUT_MS);
		match tokio::time::timeout(wait, complete.next()).await {
			Ok(Some(_)) => {}
			Ok(None) => {
				active.collector.abort();
				return Err(CdtError::Transport("trace stream closed before completion".to_string()));
			}
			Err(_) => {
				active.collector.abort();
				return Err(CdtError::Timeout {
					ms: TRACE_COMPLETE_TIMEOUT_MS,
					condition: "tracing completion".to_string(),
				});
			}
		}

		// Data chunks are delivered on the collector task; let it drain
		// before snapshotting.
		tokio::time::sleep(Duration::from_millis(200)).await;
		active.collector.abort();

		let events = active.chunks.lock().clone();
		debug!(target: "cdt.session", chunks = events.len(), "tracing stopped");
		Ok(serde_json::to_vec(&json!({ "traceEvents": events }))?)
	}
}

impl Default for TraceRecorder {
	fn default() -> Self {
		Self::new()
	}
}

/// Runtime metrics from `Performance.getMetrics`, keyed by metric name.
pub async fn metrics(page: &Page) -> Result<BTreeMap<String, f64>> {
	page.execute(PerfEnableParams::default()).await?;
	let response = page.execute(GetMetricsParams::default()).await?;
	Ok(response
		.result
		.metrics
		.iter()
		.map(|m| (m.name.clone(), m.value))
		.collect())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeReport {
	pub trace: serde_json::Value,
	pub metrics: BTreeMap<String, f64>,
	pub timing: serde_json::Value,
}

/// Record a trace around an optional navigation and settle period, then
/// bundle it with runtime metrics and the legacy navigation timing object.
pub async fn analyze(
	page: &Page,
	url: Option<&str>,
	duration_ms: Option<u64>,
) -> Result<AnalyzeReport> {
	let mut recorder = TraceRecorder::new();
	recorder.start(page).await?;

	if let Some(url) = url {
		navigation::goto(page, url, None).await?;
	}
	if let Some(ms) = duration_ms {
		tokio::time::sleep(Duration::from_millis(ms)).await;
	}

	let trace = recorder.stop(page).await?;
	let metrics = metrics(page).await?;
	let timing =
		debugging::evaluate(page, "JSON.parse(JSON.stringify(window.performance.timing))").await?;

	Ok(AnalyzeReport {
		trace: serde_json::from_slice(&trace)?,
		metrics,
		timing,
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn recorder_starts_idle() {
		let recorder = TraceRecorder::new();
		assert!(!recorder.is_active());
	}
}
