//! The petal engine: one instance owns the wind, the petal pool, the dust
//! field and the timers, and is driven from outside by frames, timer wake-ups
//! and input events.
//!
//! All entry points run on the host's single UI thread, so the engine holds no
//! locks. Input handlers mutate the wind and the pool directly; their effects
//! show up on the next frame.

use log::{debug, info, trace};

use super::config::FxConfig;
use super::dust::DustField;
use super::input::{InputBridge, TapDecision};
use super::particles::ParticlePool;
use super::random::RandomSource;
use super::scroll::ScrollGustDetector;
use super::spawn::SpawnScheduler;
use super::surface::{Layer, Surface};
use super::timers::{TimerEvent, TimerQueue};
use super::wind::WindModel;

/// Scheduling capabilities the host provides to the engine.
pub trait FrameHost {
	/// Call [`PetalsEngine::frame`] before the next repaint.
	fn request_frame(&mut self);
	/// Drop a pending frame request, if any.
	fn cancel_frame(&mut self);
	/// Call [`PetalsEngine::run_timers`] at `due` (ms, same clock as frames).
	/// Replaces any previously armed wake-up.
	fn arm_timer(&mut self, due: f64);
	/// Disarm the pending wake-up, if any.
	fn cancel_timer(&mut self);
}

/// Visible area in CSS pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
	/// Width in px.
	pub width: f64,
	/// Height in px.
	pub height: f64,
}

/// Turns frame timestamps into frame deltas.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameClock {
	last: Option<f64>,
}

impl FrameClock {
	/// Record a frame at `now` (ms) and return the elapsed seconds since the
	/// previous one. The first frame only sets the baseline.
	pub fn advance(&mut self, now: f64) -> Option<f64> {
		let last = self.last.replace(now)?;
		Some(((now - last) / 1000.0).max(0.0))
	}

	/// Forget the baseline; the next frame starts a new one.
	pub fn reset(&mut self) {
		self.last = None;
	}
}

/// Owns all effect state and composes the per-frame update.
pub struct PetalsEngine<S, R, H> {
	config: FxConfig,
	surface: S,
	rng: R,
	host: H,
	viewport: Viewport,
	wind: WindModel,
	pool: ParticlePool,
	dust: DustField,
	spawner: SpawnScheduler,
	input: InputBridge,
	scroll: ScrollGustDetector,
	timers: TimerQueue,
	clock: FrameClock,
	running: bool,
}

impl<S: Surface, R: RandomSource, H: FrameHost> PetalsEngine<S, R, H> {
	/// Build an idle engine. Nothing is spawned until [`start`](Self::start).
	pub fn new(
		config: FxConfig,
		surface: S,
		rng: R,
		host: H,
		viewport: Viewport,
		scroll_y: f64,
		now: f64,
	) -> Self {
		let capacity = config.max_petals(viewport.width);
		Self {
			wind: WindModel::new(config.wind.clone()),
			pool: ParticlePool::new(
				config.petals.clone(),
				capacity,
				viewport.width,
				viewport.height,
			),
			dust: DustField::new(config.dust.clone(), viewport.width),
			spawner: SpawnScheduler::new(config.spawn.clone(), config.dust.respawn_interval_ms),
			input: InputBridge::new(config.input.clone()),
			scroll: ScrollGustDetector::new(config.scroll.clone(), scroll_y, now),
			timers: TimerQueue::new(),
			clock: FrameClock::default(),
			running: false,
			config,
			surface,
			rng,
			host,
			viewport,
		}
	}

	/// Whether the engine is between `start` and `stop`.
	pub fn is_running(&self) -> bool {
		self.running
	}

	/// Shared wind state.
	pub fn wind(&self) -> &WindModel {
		&self.wind
	}

	/// Live petals.
	pub fn pool(&self) -> &ParticlePool {
		&self.pool
	}

	/// Live dust motes.
	pub fn dust(&self) -> &DustField {
		&self.dust
	}

	/// Last known viewport.
	pub fn viewport(&self) -> Viewport {
		self.viewport
	}

	/// The surface the engine draws into.
	pub fn surface(&self) -> &S {
		&self.surface
	}

	/// The scheduling host.
	pub fn host(&self) -> &H {
		&self.host
	}

	/// Seed dust, fill the sky and start the frame loop. Calling it while
	/// already running does nothing.
	pub fn start(&mut self, now: f64) {
		if self.running {
			return;
		}

		if self.surface.has_layer(Layer::Dust) {
			let count = self.config.dust_seed_count(self.viewport.width);
			self.spawner.seed_dust(
				now,
				count,
				&mut self.dust,
				&mut self.timers,
				&mut self.rng,
				&mut self.surface,
			);
		}

		let filled = self.spawner.initial_fill(
			self.spawner.initial_count(),
			&mut self.pool,
			&mut self.rng,
			&mut self.surface,
		);

		self.running = true;
		self.clock.reset();
		self.host.request_frame();
		self.rearm_timer();

		info!(
			"petals-fx: started with {} petals (capacity {}), {} dust motes",
			filled,
			self.pool.capacity(),
			self.dust.len()
		);
	}

	/// Frame callback. The first frame after start only records the baseline
	/// timestamp; later frames advance the simulation.
	pub fn frame(&mut self, now: f64) {
		if !self.running {
			return;
		}
		if let Some(dt) = self.clock.advance(now) {
			self.tick(now, dt);
		}
		self.host.request_frame();
	}

	/// Advance the simulation by `dt` seconds at timestamp `now` (ms).
	/// Negative steps are treated as zero.
	pub fn tick(&mut self, now: f64, dt: f64) {
		let dt = dt.max(0.0);
		self.wind.update(now, &mut self.rng);
		self.pool.tick(dt, self.wind.wind(), &mut self.surface);
		self.spawner
			.per_frame_spawn(dt, &mut self.pool, &mut self.rng, &mut self.surface);
	}

	/// Fire every timer due at `now` (ms) and re-arm the host for the next one.
	pub fn run_timers(&mut self, now: f64) {
		if !self.running {
			return;
		}
		while let Some((due, event)) = self.timers.pop_due(now) {
			match event {
				TimerEvent::DustRespawn => self.spawner.respawn_dust(
					due,
					now,
					&mut self.dust,
					&mut self.timers,
					&mut self.rng,
					&mut self.surface,
				),
				TimerEvent::DustExpire(id) => {
					self.dust.expire(id, &mut self.surface);
				}
			}
		}
		self.rearm_timer();
	}

	/// Pointer-down or touch-start at client coordinates `(x, y)`. Returns
	/// whether a burst was spawned.
	pub fn on_tap(&mut self, now: f64, x: f64, y: f64, on_interactive: bool) -> bool {
		if !self.running {
			return false;
		}
		match self.input.admit(now, on_interactive) {
			TapDecision::Accepted => {
				let spawned = self
					.input
					.burst(x, y, &mut self.pool, &mut self.rng, &mut self.surface);
				trace!("petals-fx: burst of {} at ({}, {})", spawned.len(), x, y);
				true
			}
			TapDecision::Debounced | TapDecision::Interactive => false,
		}
	}

	/// New vertical scroll offset.
	pub fn on_scroll(&mut self, now: f64, scroll_y: f64) {
		let Some(gust) = self.scroll.sample(now, scroll_y) else {
			return;
		};
		trace!("petals-fx: scroll gust {:.1}", gust.strength);
		self.wind
			.apply_scroll_gust(now, gust, self.config.scroll.gust_ms, &mut self.rng);
	}

	/// Viewport resized: update bounds and the petal budget.
	pub fn on_resize(&mut self, viewport: Viewport) {
		self.viewport = viewport;
		self.pool.resize(viewport.width, viewport.height);
		self.dust.resize(viewport.width);

		let capacity = self.config.max_petals(viewport.width);
		if capacity != self.pool.capacity() {
			debug!(
				"petals-fx: petal capacity {} -> {}",
				self.pool.capacity(),
				capacity
			);
			self.pool.set_capacity(capacity, &mut self.surface);
		}
	}

	/// Open a gust window of `duration_ms` and push the wind by `strength`.
	pub fn gust(&mut self, now: f64, strength: f64, duration_ms: f64) {
		debug!("petals-fx: gust {} for {}ms", strength, duration_ms);
		self.wind
			.register_gust(now, strength, duration_ms, &mut self.rng);
	}

	/// [`gust`](Self::gust) with the configured default strength and window.
	pub fn default_gust(&mut self, now: f64) {
		let (strength, duration_ms) = (
			self.config.wind.default_gust_strength,
			self.config.wind.default_gust_ms,
		);
		self.gust(now, strength, duration_ms);
	}

	/// Cancel the frame loop and every timer, and remove all rendered nodes.
	pub fn stop(&mut self) {
		if !self.running {
			return;
		}
		self.running = false;
		self.clock.reset();
		self.host.cancel_frame();
		self.host.cancel_timer();
		self.timers.clear();
		self.pool.clear(&mut self.surface);
		self.dust.clear(&mut self.surface);
		info!("petals-fx: stopped");
	}

	fn rearm_timer(&mut self) {
		match self.timers.next_due() {
			Some(due) => self.host.arm_timer(due),
			None => self.host.cancel_timer(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::petals::testing::{ManualHost, RecordingSurface, ScriptedRandom};

	type TestEngine = PetalsEngine<RecordingSurface, ScriptedRandom, ManualHost>;

	const WIDE: Viewport = Viewport {
		width: 1024.0,
		height: 768.0,
	};

	fn engine_with(surface: RecordingSurface, viewport: Viewport) -> TestEngine {
		PetalsEngine::new(
			FxConfig::default(),
			surface,
			ScriptedRandom::new([0.5]),
			ManualHost::default(),
			viewport,
			0.0,
			0.0,
		)
	}

	fn engine() -> TestEngine {
		engine_with(RecordingSurface::new(), WIDE)
	}

	#[test]
	fn frame_clock_skips_the_first_frame() {
		let mut clock = FrameClock::default();
		assert_eq!(clock.advance(100.0), None);
		assert_eq!(clock.advance(116.0), Some(0.016));
		assert_eq!(clock.advance(116.0), Some(0.0));
		assert_eq!(clock.advance(50.0), Some(0.0));
	}

	#[test]
	fn idle_engine_ignores_frames_and_taps() {
		let mut engine = engine();
		engine.frame(16.0);
		assert!(!engine.on_tap(16.0, 10.0, 10.0, false));
		assert_eq!(engine.host().frame_requests, 0);
		assert!(engine.pool().is_empty());
	}

	#[test]
	fn start_fills_seeds_dust_and_requests_a_frame() {
		let mut engine = engine();
		engine.start(0.0);

		assert!(engine.is_running());
		assert_eq!(engine.pool().len(), 10);
		assert_eq!(engine.dust().len(), 18);
		assert_eq!(engine.host().frame_requests, 1);
		assert_eq!(engine.host().timer_due, Some(700.0));

		// Starting twice changes nothing.
		engine.start(5.0);
		assert_eq!(engine.pool().len(), 10);
		assert_eq!(engine.host().frame_requests, 1);
	}

	#[test]
	fn narrow_viewport_uses_smaller_budgets() {
		let mut engine = engine_with(
			RecordingSurface::new(),
			Viewport {
				width: 390.0,
				height: 844.0,
			},
		);
		engine.start(0.0);
		assert_eq!(engine.pool().capacity(), 28);
		assert_eq!(engine.dust().len(), 12);
	}

	#[test]
	fn missing_dust_root_disables_dust_only() {
		let mut engine = engine_with(RecordingSurface::without_dust(), WIDE);
		engine.start(0.0);
		assert_eq!(engine.pool().len(), 10);
		assert!(engine.dust().is_empty());
		assert_eq!(engine.host().timer_due, None);
	}

	#[test]
	fn frames_advance_petals_after_the_baseline() {
		let mut engine = engine();
		engine.start(0.0);
		let id = engine.pool().ids().next().unwrap();
		let y0 = engine.pool().get(id).unwrap().y;

		engine.frame(1000.0);
		assert_eq!(engine.pool().get(id).unwrap().y, y0);

		engine.frame(1500.0);
		let p = engine.pool().get(id).unwrap();
		assert_eq!(p.y, y0 + p.vy * 0.5);
		assert_eq!(engine.host().frame_requests, 3);
	}

	#[test]
	fn negative_steps_never_rewind_petals() {
		let mut engine = engine();
		engine.start(0.0);
		let before: Vec<(f64, f64)> = engine
			.pool()
			.ids()
			.map(|id| {
				let p = engine.pool().get(id).unwrap();
				(p.y, p.age)
			})
			.collect();

		engine.tick(100.0, -0.5);

		let after: Vec<(f64, f64)> = engine
			.pool()
			.ids()
			.take(before.len())
			.map(|id| {
				let p = engine.pool().get(id).unwrap();
				(p.y, p.age)
			})
			.collect();
		assert_eq!(after, before);
	}

	#[test]
	fn dust_mote_expires_after_twice_its_duration() {
		let mut engine = engine();
		engine.start(0.0);
		// Scripted 0.5 -> 6.5s cycle -> 13000ms lifetime for every seeded mote.
		assert_eq!(engine.dust().len(), 18);

		engine.run_timers(12_999.0);
		let seeded_alive = engine.dust().len();
		assert!(seeded_alive >= 18);

		engine.run_timers(13_000.0);
		assert_eq!(engine.dust().len(), seeded_alive - 18);
	}

	#[test]
	fn respawn_keeps_adding_motes_every_interval() {
		let mut engine = engine();
		engine.start(0.0);

		engine.run_timers(700.0);
		assert_eq!(engine.dust().len(), 19);
		assert_eq!(engine.host().timer_due, Some(1400.0));

		engine.run_timers(2100.0);
		assert_eq!(engine.dust().len(), 21);
		assert_eq!(engine.host().timer_due, Some(2800.0));
	}

	#[test]
	fn taps_burst_with_debounce_and_interactive_exclusion() {
		let mut engine = engine();
		engine.start(0.0);
		let base = engine.pool().len();

		assert!(engine.on_tap(500.0, 200.0, 200.0, false));
		let after_first = engine.pool().len();
		// Scripted 0.5 < 0.6 -> pairs.
		assert_eq!(after_first, base + 2);

		assert!(!engine.on_tap(550.0, 200.0, 200.0, false));
		// A tap on a control bursts nothing but still restarts the window.
		assert!(!engine.on_tap(700.0, 200.0, 200.0, true));
		assert!(!engine.on_tap(750.0, 200.0, 200.0, false));
		assert_eq!(engine.pool().len(), after_first);

		assert!(engine.on_tap(820.0, 200.0, 200.0, false));
		assert_eq!(engine.pool().len(), after_first + 2);
	}

	#[test]
	fn fast_scroll_opens_a_gust_window() {
		let mut engine = engine();
		engine.start(0.0);
		assert!(!engine.wind().is_gusting(100.0));

		engine.on_scroll(100.0, 500.0);
		assert!(engine.wind().is_gusting(100.0));
		assert_eq!(engine.wind().gust_until(), 550.0);
		// Scripted sign is +1, scroll direction is down.
		assert_eq!(engine.wind().target(), 110.0);
	}

	#[test]
	fn default_gust_uses_configured_strength_and_window() {
		let mut engine = engine();
		engine.default_gust(1000.0);
		assert_eq!(engine.wind().gust_until(), 1900.0);
		assert_eq!(engine.wind().target(), 80.0);
	}

	#[test]
	fn shrinking_viewport_lowers_capacity_immediately() {
		let mut engine = engine();
		engine.start(0.0);
		for i in 0..30 {
			engine.on_tap(1000.0 + i as f64 * 200.0, 300.0, 300.0, false);
		}
		assert_eq!(engine.pool().len(), 40);

		engine.on_resize(Viewport {
			width: 400.0,
			height: 700.0,
		});
		assert_eq!(engine.pool().capacity(), 28);
		assert_eq!(engine.pool().len(), 28);
		assert_eq!(engine.surface().live(Layer::Petals), 28);
	}

	#[test]
	fn stop_cancels_everything_and_clears_nodes() {
		let mut engine = engine();
		engine.start(0.0);
		engine.frame(16.0);

		engine.stop();

		assert!(!engine.is_running());
		assert!(!engine.host().frame_pending);
		assert_eq!(engine.host().timer_due, None);
		assert!(engine.pool().is_empty());
		assert!(engine.dust().is_empty());
		assert_eq!(engine.surface().live(Layer::Petals), 0);
		assert_eq!(engine.surface().live(Layer::Dust), 0);

		let requests = engine.host().frame_requests;
		engine.frame(32.0);
		engine.run_timers(10_000.0);
		assert_eq!(engine.host().frame_requests, requests);
		assert!(engine.dust().is_empty());
	}

	#[test]
	fn rendered_nodes_carry_their_layer_classes() {
		let mut engine = engine();
		engine.start(0.0);
		let id = engine.pool().ids().next().unwrap();
		let node = engine.pool().get(id).unwrap().node();
		assert_eq!(engine.surface().node(node).unwrap().class, "petal");
	}
}
