//! Tap and click handling: debounce, interactive-target exclusion, bursts.

use super::config::InputConfig;
use super::particles::{Origin, ParticleId, ParticlePool};
use super::random::RandomSource;
use super::surface::Surface;

/// Elements whose taps belong to the page, not the effect.
pub const INTERACTIVE_TAGS: [&str; 6] = ["button", "a", "input", "textarea", "select", "label"];

/// Whether an element tag name (any case) is one of [`INTERACTIVE_TAGS`].
pub fn is_interactive_tag(tag: &str) -> bool {
	INTERACTIVE_TAGS
		.iter()
		.any(|candidate| candidate.eq_ignore_ascii_case(tag))
}

/// Outcome of offering a tap to the bridge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TapDecision {
	/// The tap should produce a burst.
	Accepted,
	/// Too soon after the previous tap that passed the debounce.
	Debounced,
	/// The tap landed on (or inside) an interactive element. It still
	/// restarts the debounce window.
	Interactive,
}

/// Turns pointer events into petal bursts.
#[derive(Clone, Debug)]
pub struct InputBridge {
	last_tap: Option<f64>,
	config: InputConfig,
}

impl InputBridge {
	/// Bridge that has not seen a tap yet.
	pub fn new(config: InputConfig) -> Self {
		Self {
			last_tap: None,
			config,
		}
	}

	/// Time of the last tap that got past the debounce.
	pub fn last_tap(&self) -> Option<f64> {
		self.last_tap
	}

	/// Decide whether a tap at `now` (ms, monotonic) should burst.
	pub fn admit(&mut self, now: f64, on_interactive: bool) -> TapDecision {
		if let Some(last) = self.last_tap {
			if now - last < self.config.debounce_ms {
				return TapDecision::Debounced;
			}
		}
		self.last_tap = Some(now);
		if on_interactive {
			return TapDecision::Interactive;
		}
		TapDecision::Accepted
	}

	/// Spawn two or three burst petals scattered around `(x, y)`.
	pub fn burst<S: Surface, R: RandomSource>(
		&self,
		x: f64,
		y: f64,
		pool: &mut ParticlePool,
		rng: &mut R,
		surface: &mut S,
	) -> Vec<ParticleId> {
		let count = if rng.chance(self.config.pair_chance) { 2 } else { 3 };
		let jitter = self.config.jitter;

		(0..count)
			.filter_map(|_| {
				let px = x + rng.range(-jitter, jitter);
				let py = y + rng.range(-jitter, jitter);
				pool.spawn(Some((px, py)), Origin::Burst, rng, surface)
			})
			.collect()
	}
}

#[cfg(test)]
mod tests {
	use proptest::prelude::*;

	use super::*;
	use crate::components::petals::config::PetalConfig;
	use crate::components::petals::random::SmallRngSource;
	use crate::components::petals::testing::{RecordingSurface, ScriptedRandom};

	#[test]
	fn taps_inside_the_debounce_window_are_rejected() {
		let mut bridge = InputBridge::new(InputConfig::default());
		assert_eq!(bridge.admit(1000.0, false), TapDecision::Accepted);
		assert_eq!(bridge.admit(1119.0, false), TapDecision::Debounced);
		assert_eq!(bridge.admit(1120.0, false), TapDecision::Accepted);
		assert_eq!(bridge.last_tap(), Some(1120.0));
	}

	#[test]
	fn interactive_taps_start_the_debounce_window() {
		let mut bridge = InputBridge::new(InputConfig::default());
		assert_eq!(bridge.admit(0.0, true), TapDecision::Interactive);
		assert_eq!(bridge.last_tap(), Some(0.0));
		assert_eq!(bridge.admit(50.0, false), TapDecision::Debounced);
		assert_eq!(bridge.admit(120.0, false), TapDecision::Accepted);
	}

	#[test]
	fn debounced_taps_do_not_extend_the_window() {
		let mut bridge = InputBridge::new(InputConfig::default());
		assert_eq!(bridge.admit(0.0, false), TapDecision::Accepted);
		assert_eq!(bridge.admit(100.0, true), TapDecision::Debounced);
		assert_eq!(bridge.last_tap(), Some(0.0));
		assert_eq!(bridge.admit(130.0, false), TapDecision::Accepted);
	}

	proptest! {
		#[test]
		fn accepted_taps_are_at_least_the_debounce_apart(
			taps in prop::collection::vec((0.0f64..300.0, any::<bool>()), 1..400),
		) {
			let mut bridge = InputBridge::new(InputConfig::default());
			let mut now = 0.0;
			let mut passed = Vec::new();
			for (gap, interactive) in taps {
				now += gap;
				if bridge.admit(now, interactive) != TapDecision::Debounced {
					passed.push(now);
				}
			}
			prop_assert!(passed.windows(2).all(|w| w[1] - w[0] >= 120.0));
		}
	}

	#[test]
	fn burst_size_depends_on_the_first_draw() {
		let bridge = InputBridge::new(InputConfig::default());
		let mut pool = ParticlePool::new(PetalConfig::default(), 40, 800.0, 600.0);
		let mut surface = RecordingSurface::new();

		let pair = bridge.burst(100.0, 100.0, &mut pool, &mut ScriptedRandom::new([0.59, 0.5]), &mut surface);
		let triple = bridge.burst(100.0, 100.0, &mut pool, &mut ScriptedRandom::new([0.6, 0.5]), &mut surface);

		assert_eq!(pair.len(), 2);
		assert_eq!(triple.len(), 3);
		for id in pair.iter().chain(&triple) {
			let p = pool.get(*id).unwrap();
			assert_eq!(p.origin, Origin::Burst);
			assert_eq!((p.x, p.y), (100.0, 100.0));
		}
	}

	#[test]
	fn burst_petals_land_within_the_jitter_box() {
		let bridge = InputBridge::new(InputConfig::default());
		let mut pool = ParticlePool::new(PetalConfig::default(), 40, 800.0, 600.0);
		let mut surface = RecordingSurface::new();
		let mut rng = SmallRngSource::seeded(21);

		for _ in 0..10 {
			for id in bridge.burst(300.0, 200.0, &mut pool, &mut rng, &mut surface) {
				let p = pool.get(id).unwrap();
				assert!((p.x - 300.0).abs() <= 14.0);
				assert!((p.y - 200.0).abs() <= 14.0);
				assert!((140.0..240.0).contains(&p.vy));
			}
		}
	}

	#[test]
	fn interactive_tags_match_case_insensitively() {
		assert!(is_interactive_tag("BUTTON"));
		assert!(is_interactive_tag("a"));
		assert!(is_interactive_tag("Label"));
		assert!(!is_interactive_tag("div"));
		assert!(!is_interactive_tag("article"));
	}
}
