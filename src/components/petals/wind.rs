//! Stochastic horizontal wind with gust windows.
//!
//! The wind drifts towards a randomly chosen target that is redrawn every few
//! seconds. While a gust window is open the targets are wider, redrawn sooner
//! and approached faster, and the wind is allowed a larger magnitude.

use super::config::{WindConfig, WindRegime};
use super::random::RandomSource;
use super::scroll::ScrollGust;

/// Wind state shared by every petal.
#[derive(Clone, Debug)]
pub struct WindModel {
	wind: f64,
	target: f64,
	/// Timestamp (ms) after which a new target is drawn.
	retarget_at: f64,
	/// Gusting while `now < gust_until` (ms).
	gust_until: f64,
	config: WindConfig,
}

impl WindModel {
	/// Still air with a target due on the first update.
	pub fn new(config: WindConfig) -> Self {
		Self {
			wind: 0.0,
			target: 0.0,
			retarget_at: 0.0,
			gust_until: 0.0,
			config,
		}
	}

	/// Current wind in px/s. Positive blows to the right.
	pub fn wind(&self) -> f64 {
		self.wind
	}

	/// Value the wind is currently easing towards.
	pub fn target(&self) -> f64 {
		self.target
	}

	/// End of the current gust window (ms).
	pub fn gust_until(&self) -> f64 {
		self.gust_until
	}

	/// Whether a gust window is open at `now` (ms).
	pub fn is_gusting(&self, now: f64) -> bool {
		now < self.gust_until
	}

	fn regime(&self, now: f64) -> &WindRegime {
		if self.is_gusting(now) {
			&self.config.gusting
		} else {
			&self.config.calm
		}
	}

	/// Advance the wind to `now` (ms).
	pub fn update<R: RandomSource>(&mut self, now: f64, rng: &mut R) {
		let regime = self.regime(now).clone();

		if now > self.retarget_at {
			self.retarget_at = now + rng.span(regime.retarget_ms);
			self.target = rng.range(-regime.amplitude, regime.amplitude);
		}

		self.wind += (self.target - self.wind) * regime.smoothing;
		self.wind = self.wind.clamp(-regime.limit, regime.limit);
	}

	/// Open (or extend) a gust window and push the target by `strength` in a
	/// random direction.
	pub fn register_gust<R: RandomSource>(
		&mut self,
		now: f64,
		strength: f64,
		duration_ms: f64,
		rng: &mut R,
	) {
		let delta = strength * rng.sign();
		self.push_target(now, delta, duration_ms);
	}

	/// Apply a scroll-derived gust: the push follows the scroll direction with
	/// a random sign layered on top.
	pub fn apply_scroll_gust<R: RandomSource>(
		&mut self,
		now: f64,
		gust: ScrollGust,
		window_ms: f64,
		rng: &mut R,
	) {
		let delta = rng.sign() * gust.direction * gust.strength;
		self.push_target(now, delta, window_ms);
	}

	fn push_target(&mut self, now: f64, delta: f64, window_ms: f64) {
		let limit = self.config.gusting.limit;
		self.gust_until = self.gust_until.max(now + window_ms);
		self.target = (self.target + delta).clamp(-limit, limit);
	}
}
