//! Append-only event capture stores fed by page subscriptions.
//!
//! Both stores share the same shape: records carry monotonically increasing
//! string ids (`msg-1`, `req-1`, ...), listing filters first and paginates
//! second, and `clear` resets the id counter along with the records.

pub mod console;
pub mod network;

use std::time::{SystemTime, UNIX_EPOCH};

pub(crate) struct EventLog<T> {
	pub records: Vec<T>,
	prefix: &'static str,
	next_id: u64,
}

impl<T> EventLog<T> {
	pub fn new(prefix: &'static str) -> Self {
		Self {
			records: Vec::new(),
			prefix,
			next_id: 0,
		}
	}

	pub fn next_id(&mut self) -> String {
		self.next_id += 1;
		format!("{}-{}", self.prefix, self.next_id)
	}

	pub fn clear(&mut self) {
		self.records.clear();
		self.next_id = 0;
	}
}

/// Apply an `[offset, offset+limit)` window. Offset defaults to 0, limit to
/// everything remaining; an offset past the end yields an empty list.
pub(crate) fn window<T>(items: Vec<T>, offset: Option<usize>, limit: Option<usize>) -> Vec<T> {
	items
		.into_iter()
		.skip(offset.unwrap_or(0))
		.take(limit.unwrap_or(usize::MAX))
		.collect()
}

pub(crate) fn epoch_ms() -> u64 {
	SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.map(|d| d.as_millis() as u64)
		.unwrap_or(0)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn ids_are_sequential_per_prefix() {
		let mut log: EventLog<u8> = EventLog::new("msg");
		assert_eq!(log.next_id(), "msg-1");
		assert_eq!(log.next_id(), "msg-2");
		assert_eq!(log.next_id(), "msg-3");
	}

	#[test]
	fn clear_resets_the_id_counter() {
		let mut log: EventLog<u8> = EventLog::new("req");
		log.records.push(1);
		log.next_id();
		log.next_id();
		log.clear();
		assert!(log.records.is_empty());
		assert_eq!(log.next_id(), "req-1");
	}

	#[test]
	fn window_defaults_to_everything() {
		assert_eq!(window(vec![1, 2, 3], None, None), vec![1, 2, 3]);
	}

	#[test]
	fn window_slices_like_offset_limit() {
		assert_eq!(window(vec![1, 2, 3, 4], Some(1), Some(2)), vec![2, 3]);
		assert_eq!(window(vec![1, 2, 3], Some(2), None), vec![3]);
		assert_eq!(window(vec![1, 2, 3], None, Some(2)), vec![1, 2]);
	}

	#[test]
	fn window_past_the_end_is_empty() {
		assert_eq!(window(vec![1, 2, 3], Some(3), None), Vec::<i32>::new());
		assert_eq!(window(vec![1, 2, 3], Some(10), Some(5)), Vec::<i32>::new());
	}
}
