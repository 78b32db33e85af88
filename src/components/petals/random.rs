//! Injectable randomness.
//!
//! Every stochastic decision in the engine goes through [`RandomSource`], so
//! wind, kinematics and spawn rolls can be driven by a fixed sequence in tests.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use super::config::Span;

/// A source of uniform samples in `[0, 1)`.
pub trait RandomSource {
	/// Next uniform sample in `[0, 1)`.
	fn next_unit(&mut self) -> f64;

	/// Uniform sample in `[min, max)`.
	fn range(&mut self, min: f64, max: f64) -> f64 {
		self.next_unit() * (max - min) + min
	}

	/// Uniform sample over a configured span.
	fn span(&mut self, (min, max): Span) -> f64 {
		self.range(min, max)
	}

	/// `true` with probability `p`.
	fn chance(&mut self, p: f64) -> bool {
		self.next_unit() < p
	}

	/// `-1.0` or `1.0` with equal probability.
	fn sign(&mut self) -> f64 {
		if self.chance(0.5) { -1.0 } else { 1.0 }
	}
}

/// Fast non-cryptographic generator used in the browser.
pub struct SmallRngSource(SmallRng);

impl SmallRngSource {
	/// Deterministic generator for `seed`.
	pub fn seeded(seed: u64) -> Self {
		Self(SmallRng::seed_from_u64(seed))
	}
}

impl RandomSource for SmallRngSource {
	fn next_unit(&mut self) -> f64 {
		self.0.random::<f64>()
	}
}
