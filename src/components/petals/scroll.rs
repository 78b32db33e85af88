//! Scroll velocity to wind gust conversion.

use super::config::ScrollConfig;

/// A gust derived from a fast scroll.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollGust {
	/// `1.0` when scrolling down (or not moving), `-1.0` when scrolling up.
	pub direction: f64,
	/// Gust strength in px/s, within `(threshold, max_strength]`.
	pub strength: f64,
}

/// Tracks the previous scroll sample and turns fast scrolls into gusts.
#[derive(Clone, Debug)]
pub struct ScrollGustDetector {
	last_y: f64,
	last_t: f64,
	config: ScrollConfig,
}

impl ScrollGustDetector {
	/// Start tracking from the given scroll offset and timestamp (ms).
	pub fn new(config: ScrollConfig, scroll_y: f64, now: f64) -> Self {
		Self {
			last_y: scroll_y,
			last_t: now,
			config,
		}
	}

	/// Feed a new scroll position. Returns a gust when the scroll was fast
	/// enough to stir the wind.
	pub fn sample(&mut self, now: f64, scroll_y: f64) -> Option<ScrollGust> {
		let dy = scroll_y - self.last_y;
		let elapsed = (now - self.last_t).max(self.config.min_elapsed_ms);
		self.last_y = scroll_y;
		self.last_t = now;

		let speed = dy.abs() / elapsed;
		let strength = (speed * self.config.strength_per_speed).clamp(0.0, self.config.max_strength);
		if strength <= self.config.threshold {
			return None;
		}

		Some(ScrollGust {
			direction: if dy >= 0.0 { 1.0 } else { -1.0 },
			strength,
		})
	}
}
