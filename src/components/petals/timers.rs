//! Deadline queue for the engine's periodic and one-shot timers.
//!
//! Dust respawn and mote expiry run on their own clock, independent of the
//! frame loop. The engine keeps them here and asks the host for a single
//! wake-up at the earliest deadline.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use super::dust::MoteId;

/// Work to do when a deadline elapses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerEvent {
	/// Spawn one dust mote and schedule the next period.
	DustRespawn,
	/// Remove a mote whose lifetime is over.
	DustExpire(MoteId),
}

#[derive(Debug)]
struct Scheduled {
	due: f64,
	seq: u64,
	event: TimerEvent,
}

// Reversed so the max-heap yields the earliest deadline, FIFO among equals.
impl Ord for Scheduled {
	fn cmp(&self, other: &Self) -> Ordering {
		other
			.due
			.total_cmp(&self.due)
			.then_with(|| other.seq.cmp(&self.seq))
	}
}

impl PartialOrd for Scheduled {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl PartialEq for Scheduled {
	fn eq(&self, other: &Self) -> bool {
		self.cmp(other) == Ordering::Equal
	}
}

impl Eq for Scheduled {}

/// Min-queue of timer deadlines (ms).
#[derive(Debug, Default)]
pub struct TimerQueue {
	heap: BinaryHeap<Scheduled>,
	next_seq: u64,
}

impl TimerQueue {
	/// Empty queue.
	pub fn new() -> Self {
		Self::default()
	}

	/// Queue `event` to fire at `due` (ms).
	pub fn schedule(&mut self, due: f64, event: TimerEvent) {
		let seq = self.next_seq;
		self.next_seq += 1;
		self.heap.push(Scheduled { due, seq, event });
	}

	/// Pop the earliest event whose deadline is at or before `now`.
	pub fn pop_due(&mut self, now: f64) -> Option<(f64, TimerEvent)> {
		if self.heap.peek()?.due > now {
			return None;
		}
		self.heap.pop().map(|s| (s.due, s.event))
	}

	/// Deadline of the earliest pending event.
	pub fn next_due(&self) -> Option<f64> {
		self.heap.peek().map(|s| s.due)
	}

	/// Number of pending events.
	pub fn len(&self) -> usize {
		self.heap.len()
	}

	/// Whether nothing is pending.
	pub fn is_empty(&self) -> bool {
		self.heap.is_empty()
	}

	/// Drop every pending event.
	pub fn clear(&mut self) {
		self.heap.clear();
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn events_pop_in_deadline_order() {
		let mut timers = TimerQueue::new();
		timers.schedule(700.0, TimerEvent::DustRespawn);
		timers.schedule(300.0, TimerEvent::DustRespawn);
		timers.schedule(500.0, TimerEvent::DustRespawn);

		assert_eq!(timers.next_due(), Some(300.0));
		assert_eq!(timers.pop_due(299.0), None);

		let due: Vec<f64> = std::iter::from_fn(|| timers.pop_due(1000.0))
			.map(|(due, _)| due)
			.collect();
		assert_eq!(due, vec![300.0, 500.0, 700.0]);
		assert!(timers.is_empty());
	}

	#[test]
	fn equal_deadlines_keep_schedule_order() {
		let mut timers = TimerQueue::new();
		timers.schedule(100.0, TimerEvent::DustRespawn);
		timers.schedule(100.0, TimerEvent::DustRespawn);
		timers.schedule(50.0, TimerEvent::DustRespawn);

		let mut seen = Vec::new();
		while let Some((due, _)) = timers.pop_due(100.0) {
			seen.push(due);
		}
		assert_eq!(seen, vec![50.0, 100.0, 100.0]);
	}

	#[test]
	fn clear_drops_everything() {
		let mut timers = TimerQueue::new();
		timers.schedule(1.0, TimerEvent::DustRespawn);
		timers.clear();
		assert_eq!(timers.len(), 0);
		assert_eq!(timers.next_due(), None);
	}
}
