//! Tuning constants for the petal effect.
//!
//! Every value here is fixed at build time. The engine takes an [`FxConfig`]
//! once at construction and never mutates it; only the viewport-dependent
//! budgets are recomputed on resize.

/// Viewports narrower than this (in CSS pixels) get the reduced budgets.
pub const NARROW_VIEWPORT_WIDTH: f64 = 520.0;

/// Sampling interval `(min, max)` for a uniform draw.
pub type Span = (f64, f64);

/// Kinematic ranges that differ between ambient and burst petals.
#[derive(Clone, Debug)]
pub struct MotionRanges {
	/// Fall speed in px/s.
	pub fall_speed: Span,
	/// Horizontal drift in px/s, added to the wind.
	pub drift: Span,
	/// Sway amplitude in px/s.
	pub sway_amplitude: Span,
}

/// Configuration for falling petals.
#[derive(Clone, Debug)]
pub struct PetalConfig {
	/// Petal budget below [`NARROW_VIEWPORT_WIDTH`].
	pub max_narrow: usize,
	/// Petal budget at or above [`NARROW_VIEWPORT_WIDTH`].
	pub max_wide: usize,
	/// Rendered size in px.
	pub size: Span,
	/// Opacity, 0 to 1.
	pub opacity: Span,
	/// Sway angular speed in rad/s.
	pub sway_speed: Span,
	/// Initial rotation in degrees.
	pub rotation: Span,
	/// Rotation speed in deg/s.
	pub rotation_speed: Span,
	/// How far above the top edge ambient petals start, in px.
	pub spawn_height: Span,
	/// Motion of petals spawned by the scheduler.
	pub ambient: MotionRanges,
	/// Motion of petals spawned at a tap.
	pub burst: MotionRanges,
	/// Petals are dropped once they fall this far below the viewport.
	pub exit_margin_bottom: f64,
	/// Petals are dropped once they drift this far past either side.
	pub exit_margin_side: f64,
}

impl Default for PetalConfig {
	fn default() -> Self {
		Self {
			max_narrow: 28,
			max_wide: 40,
			size: (12.0, 22.0),
			opacity: (0.55, 0.95),
			sway_speed: (0.8, 1.5),
			rotation: (0.0, 360.0),
			rotation_speed: (-70.0, 70.0),
			spawn_height: (40.0, 140.0),
			ambient: MotionRanges {
				fall_speed: (35.0, 85.0),
				drift: (-12.0, 12.0),
				sway_amplitude: (10.0, 26.0),
			},
			burst: MotionRanges {
				fall_speed: (140.0, 240.0),
				drift: (-30.0, 30.0),
				sway_amplitude: (8.0, 18.0),
			},
			exit_margin_bottom: 120.0,
			exit_margin_side: 200.0,
		}
	}
}

/// One of the two wind behaviours (calm or gusting).
#[derive(Clone, Debug)]
pub struct WindRegime {
	/// Delay before the next target is drawn, in ms.
	pub retarget_ms: Span,
	/// Targets are drawn from `[-amplitude, amplitude]`.
	pub amplitude: f64,
	/// Fraction of the remaining gap closed per update.
	pub smoothing: f64,
	/// Hard bound on the wind magnitude.
	pub limit: f64,
}

/// Wind model configuration.
#[derive(Clone, Debug)]
pub struct WindConfig {
	/// Behaviour outside gust windows.
	pub calm: WindRegime,
	/// Behaviour inside a gust window.
	pub gusting: WindRegime,
	/// Strength used by `gust` when the caller has no preference, in px/s.
	pub default_gust_strength: f64,
	/// Gust window used by `gust` when the caller has no preference, in ms.
	pub default_gust_ms: f64,
}

impl Default for WindConfig {
	fn default() -> Self {
		Self {
			calm: WindRegime {
				retarget_ms: (1800.0, 3500.0),
				amplitude: 45.0,
				smoothing: 0.02,
				limit: 55.0,
			},
			gusting: WindRegime {
				retarget_ms: (1200.0, 2400.0),
				amplitude: 120.0,
				smoothing: 0.035,
				limit: 140.0,
			},
			default_gust_strength: 80.0,
			default_gust_ms: 900.0,
		}
	}
}

/// Ambient spawning.
#[derive(Clone, Debug)]
pub struct SpawnConfig {
	/// Expected ambient petals per second.
	pub base_per_sec: f64,
	/// Petals spawned eagerly at start.
	pub initial_fill: usize,
}

impl Default for SpawnConfig {
	fn default() -> Self {
		Self {
			base_per_sec: 0.9,
			initial_fill: 10,
		}
	}
}

/// Background dust motes.
#[derive(Clone, Debug)]
pub struct DustConfig {
	/// Motes seeded on start below the narrow breakpoint.
	pub seed_narrow: usize,
	/// Motes seeded on start at or above it.
	pub seed_wide: usize,
	/// Period of the recurring single-mote spawn, in ms.
	pub respawn_interval_ms: f64,
	/// Diameter in px.
	pub size: Span,
	/// Opacity, 0 to 1.
	pub opacity: Span,
	/// CSS animation duration in seconds.
	pub duration_s: Span,
	/// Horizontal drift over one animation cycle, in px.
	pub drift: Span,
	/// Offset from the bottom edge, in px.
	pub bottom: Span,
	/// Number of animation cycles before a mote is removed.
	pub lifetime_cycles: f64,
}

impl Default for DustConfig {
	fn default() -> Self {
		Self {
			seed_narrow: 12,
			seed_wide: 18,
			respawn_interval_ms: 700.0,
			size: (2.0, 4.5),
			opacity: (0.25, 0.7),
			duration_s: (4.5, 8.5),
			drift: (-18.0, 18.0),
			bottom: (0.0, 40.0),
			lifetime_cycles: 2.0,
		}
	}
}

/// Tap handling.
#[derive(Clone, Debug)]
pub struct InputConfig {
	/// Minimum spacing between accepted taps, in ms.
	pub debounce_ms: f64,
	/// Each burst petal lands within `±jitter` px of the pointer on both axes.
	pub jitter: f64,
	/// Probability that a burst has two petals rather than three.
	pub pair_chance: f64,
}

impl Default for InputConfig {
	fn default() -> Self {
		Self {
			debounce_ms: 120.0,
			jitter: 14.0,
			pair_chance: 0.6,
		}
	}
}

/// Scroll-to-gust conversion.
#[derive(Clone, Debug)]
pub struct ScrollConfig {
	/// Floor on the elapsed time between samples, in ms.
	pub min_elapsed_ms: f64,
	/// Multiplier from px/ms to gust strength.
	pub strength_per_speed: f64,
	/// Cap on gust strength, in px/s.
	pub max_strength: f64,
	/// Gusts at or below this strength are ignored.
	pub threshold: f64,
	/// Gust window opened by a qualifying scroll, in ms.
	pub gust_ms: f64,
}

impl Default for ScrollConfig {
	fn default() -> Self {
		Self {
			min_elapsed_ms: 16.0,
			strength_per_speed: 1800.0,
			max_strength: 110.0,
			threshold: 18.0,
			gust_ms: 450.0,
		}
	}
}

/// Complete effect configuration.
#[derive(Clone, Debug, Default)]
pub struct FxConfig {
	/// Petal look, motion and budgets.
	pub petals: PetalConfig,
	/// Wind regimes and gust defaults.
	pub wind: WindConfig,
	/// Ambient spawn rate and initial fill.
	pub spawn: SpawnConfig,
	/// Background dust.
	pub dust: DustConfig,
	/// Tap handling.
	pub input: InputConfig,
	/// Scroll gust detection.
	pub scroll: ScrollConfig,
}

impl FxConfig {
	/// Petal capacity for a viewport of the given width.
	pub fn max_petals(&self, width: f64) -> usize {
		if width < NARROW_VIEWPORT_WIDTH {
			self.petals.max_narrow
		} else {
			self.petals.max_wide
		}
	}

	/// Number of dust motes seeded at start for a viewport of the given width.
	pub fn dust_seed_count(&self, width: f64) -> usize {
		if width < NARROW_VIEWPORT_WIDTH {
			self.dust.seed_narrow
		} else {
			self.dust.seed_wide
		}
	}
}
