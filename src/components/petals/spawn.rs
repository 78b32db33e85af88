//! Ambient petal spawning and dust seeding.

use super::config::SpawnConfig;
use super::dust::DustField;
use super::particles::{Origin, ParticleId, ParticlePool};
use super::random::RandomSource;
use super::surface::Surface;
use super::timers::{TimerEvent, TimerQueue};

/// Decides when ambient petals and dust motes appear.
#[derive(Clone, Debug)]
pub struct SpawnScheduler {
	config: SpawnConfig,
	dust_interval_ms: f64,
}

impl SpawnScheduler {
	/// Scheduler respawning dust every `dust_interval_ms`.
	pub fn new(config: SpawnConfig, dust_interval_ms: f64) -> Self {
		Self {
			config,
			dust_interval_ms,
		}
	}

	/// One Bernoulli trial per frame: succeeds with probability
	/// `base_per_sec * dt`, which approximates a Poisson arrival process.
	pub fn roll<R: RandomSource>(&self, dt: f64, rng: &mut R) -> bool {
		rng.next_unit() < self.config.base_per_sec * dt
	}

	/// Possibly spawn one ambient petal for a frame of `dt` seconds.
	pub fn per_frame_spawn<S: Surface, R: RandomSource>(
		&self,
		dt: f64,
		pool: &mut ParticlePool,
		rng: &mut R,
		surface: &mut S,
	) -> Option<ParticleId> {
		if !self.roll(dt, rng) {
			return None;
		}
		pool.spawn(None, Origin::Ambient, rng, surface)
	}

	/// Spawn `n` ambient petals right away so the first frame is not empty.
	pub fn initial_fill<S: Surface, R: RandomSource>(
		&self,
		n: usize,
		pool: &mut ParticlePool,
		rng: &mut R,
		surface: &mut S,
	) -> usize {
		(0..n)
			.filter_map(|_| pool.spawn(None, Origin::Ambient, rng, surface))
			.count()
	}

	/// Petals spawned by [`initial_fill`](Self::initial_fill) at start.
	pub fn initial_count(&self) -> usize {
		self.config.initial_fill
	}

	/// Spawn `count` motes at `now` and start the recurring respawn.
	pub fn seed_dust<S: Surface, R: RandomSource>(
		&self,
		now: f64,
		count: usize,
		dust: &mut DustField,
		timers: &mut TimerQueue,
		rng: &mut R,
		surface: &mut S,
	) {
		for _ in 0..count {
			Self::spawn_mote(now, dust, timers, rng, surface);
		}
		timers.schedule(now + self.dust_interval_ms, TimerEvent::DustRespawn);
	}

	/// Handle a respawn deadline `due` that fired at `now`: spawn one mote and
	/// schedule the next period. Periods already missed are skipped rather
	/// than replayed.
	pub fn respawn_dust<S: Surface, R: RandomSource>(
		&self,
		due: f64,
		now: f64,
		dust: &mut DustField,
		timers: &mut TimerQueue,
		rng: &mut R,
		surface: &mut S,
	) {
		Self::spawn_mote(now, dust, timers, rng, surface);

		let mut next = due + self.dust_interval_ms;
		if next < now {
			next = now + self.dust_interval_ms;
		}
		timers.schedule(next, TimerEvent::DustRespawn);
	}

	fn spawn_mote<S: Surface, R: RandomSource>(
		now: f64,
		dust: &mut DustField,
		timers: &mut TimerQueue,
		rng: &mut R,
		surface: &mut S,
	) {
		let (id, expires_at) = dust.spawn(now, rng, surface);
		timers.schedule(expires_at, TimerEvent::DustExpire(id));
	}
}
