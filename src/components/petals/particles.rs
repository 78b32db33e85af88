//! Falling petals and the bounded pool that owns them.
//!
//! The pool keeps petals in an id-keyed map plus a FIFO queue of ids in
//! insertion order. Destroyed ids are left in the queue and skipped lazily, so
//! both eviction of the oldest petal and removal of an arbitrary one are O(1)
//! amortized.

use std::collections::{HashMap, VecDeque};
use std::f64::consts::TAU;

use log::trace;

use super::config::PetalConfig;
use super::random::RandomSource;
use super::surface::{Layer, NodeId, Surface};

/// CSS class applied to every petal node.
pub const PETAL_CLASS: &str = "petal";

/// Stable petal identifier. Ids increase with insertion order, starting at 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParticleId(u64);

impl ParticleId {
	/// Insertion index of this petal (1-based).
	pub fn sequence(self) -> u64 {
		self.0
	}
}

/// What caused a petal to appear.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Origin {
	/// Spawned by the ambient scheduler.
	Ambient,
	/// Spawned at a tap.
	Burst,
}

/// A single falling petal.
#[derive(Clone, Debug)]
pub struct Particle {
	/// Left edge in viewport px.
	pub x: f64,
	/// Top edge in viewport px; grows as the petal falls.
	pub y: f64,
	/// Horizontal drift in px/s, added to the wind.
	pub vx: f64,
	/// Fall speed in px/s.
	pub vy: f64,
	/// Peak sway speed in px/s.
	pub sway_amplitude: f64,
	/// Sway angular speed in rad/s.
	pub sway_speed: f64,
	/// Sway phase offset in radians.
	pub sway_phase: f64,
	/// Rotation in degrees.
	pub rotation: f64,
	/// Degrees per second.
	pub rotation_speed: f64,
	/// Seconds since spawn.
	pub age: f64,
	/// Rendered size in px.
	pub size: f64,
	/// Opacity, 0 to 1.
	pub opacity: f64,
	/// What spawned the petal.
	pub origin: Origin,
	node: NodeId,
}

impl Particle {
	/// Surface node drawing this petal.
	pub fn node(&self) -> NodeId {
		self.node
	}

	fn advance(&mut self, dt: f64, wind: f64) {
		self.y += self.vy * dt;
		let sway = (self.age * self.sway_speed + self.sway_phase).sin() * self.sway_amplitude;
		self.x += (wind + self.vx) * dt + sway * dt;
		self.rotation += self.rotation_speed * dt;
		self.age += dt;
	}

	fn render<S: Surface>(&self, surface: &mut S) {
		surface.set_style(self.node, "left", &format!("{}px", self.x));
		surface.set_style(self.node, "top", &format!("{}px", self.y));
		surface.set_style(
			self.node,
			"transform",
			&format!("translate3d(0,0,0) rotate({}deg)", self.rotation),
		);
	}
}

/// Capacity-bounded set of live petals.
pub struct ParticlePool {
	particles: HashMap<ParticleId, Particle>,
	/// Insertion order. May contain ids that were already destroyed.
	order: VecDeque<ParticleId>,
	next_id: u64,
	capacity: usize,
	width: f64,
	height: f64,
	config: PetalConfig,
}

impl ParticlePool {
	/// Empty pool for a `width` x `height` viewport.
	pub fn new(config: PetalConfig, capacity: usize, width: f64, height: f64) -> Self {
		Self {
			particles: HashMap::with_capacity(capacity),
			order: VecDeque::with_capacity(capacity),
			next_id: 1,
			capacity,
			width,
			height,
			config,
		}
	}

	/// Number of live petals.
	pub fn len(&self) -> usize {
		self.particles.len()
	}

	/// Whether no petal is alive.
	pub fn is_empty(&self) -> bool {
		self.particles.is_empty()
	}

	/// Maximum number of live petals.
	pub fn capacity(&self) -> usize {
		self.capacity
	}

	/// Look up a live petal.
	pub fn get(&self, id: ParticleId) -> Option<&Particle> {
		self.particles.get(&id)
	}

	/// Whether petal `id` is still alive.
	pub fn contains(&self, id: ParticleId) -> bool {
		self.particles.contains_key(&id)
	}

	/// Live petal ids, oldest first.
	pub fn ids(&self) -> impl Iterator<Item = ParticleId> + '_ {
		self.order
			.iter()
			.copied()
			.filter(|id| self.particles.contains_key(id))
	}

	/// Change the capacity, evicting the oldest petals if the pool is over it.
	pub fn set_capacity<S: Surface>(&mut self, capacity: usize, surface: &mut S) {
		self.capacity = capacity;
		while self.len() > self.capacity {
			if self.evict_oldest(surface).is_none() {
				break;
			}
		}
	}

	/// Update the viewport bounds used for spawning and exit checks.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}

	/// Spawn a petal at `at`, or at a random position above the viewport.
	///
	/// When the pool is full the oldest petal is evicted first. Returns `None`
	/// only when the capacity is zero.
	pub fn spawn<S: Surface, R: RandomSource>(
		&mut self,
		at: Option<(f64, f64)>,
		origin: Origin,
		rng: &mut R,
		surface: &mut S,
	) -> Option<ParticleId> {
		if self.capacity == 0 {
			return None;
		}
		while self.len() >= self.capacity {
			if self.evict_oldest(surface).is_none() {
				break;
			}
		}

		let cfg = &self.config;
		let motion = match origin {
			Origin::Ambient => &cfg.ambient,
			Origin::Burst => &cfg.burst,
		};

		let size = rng.span(cfg.size);
		let opacity = rng.span(cfg.opacity);
		let x = match at {
			Some((x, _)) => x,
			None => rng.range(0.0, self.width),
		};
		let y = match at {
			Some((_, y)) => y,
			None => -rng.span(cfg.spawn_height),
		};
		let vy = rng.span(motion.fall_speed);
		let vx = rng.span(motion.drift);
		let sway_amplitude = rng.span(motion.sway_amplitude);
		let sway_speed = rng.span(cfg.sway_speed);
		let rotation = rng.span(cfg.rotation);
		let rotation_speed = rng.span(cfg.rotation_speed);
		let sway_phase = rng.range(0.0, TAU);

		let node = surface.create(Layer::Petals, PETAL_CLASS);
		surface.set_style(node, "--size", &format!("{size}px"));
		surface.set_style(node, "--op", &format!("{opacity}"));

		let particle = Particle {
			x,
			y,
			vx,
			vy,
			sway_amplitude,
			sway_speed,
			sway_phase,
			rotation,
			rotation_speed,
			age: 0.0,
			size,
			opacity,
			origin,
			node,
		};
		particle.render(surface);

		let id = ParticleId(self.next_id);
		self.next_id += 1;
		self.particles.insert(id, particle);
		self.order.push_back(id);
		Some(id)
	}

	/// Remove a petal and release its node. Returns `false` for unknown ids.
	pub fn destroy<S: Surface>(&mut self, id: ParticleId, surface: &mut S) -> bool {
		let Some(particle) = self.particles.remove(&id) else {
			return false;
		};
		surface.remove(particle.node);
		self.compact();
		true
	}

	/// Destroy the petal with the smallest insertion index.
	pub fn evict_oldest<S: Surface>(&mut self, surface: &mut S) -> Option<ParticleId> {
		while let Some(id) = self.order.pop_front() {
			if let Some(particle) = self.particles.remove(&id) {
				surface.remove(particle.node);
				trace!("petals-fx: evicted petal #{}", id.0);
				return Some(id);
			}
		}
		None
	}

	/// Integrate every petal over `dt` seconds under `wind` (px/s), then drop
	/// the ones that left the viewport. Returns how many were dropped.
	/// Negative steps are treated as zero so age never decreases.
	pub fn tick<S: Surface>(&mut self, dt: f64, wind: f64, surface: &mut S) -> usize {
		let dt = dt.max(0.0);
		let floor = self.height + self.config.exit_margin_bottom;
		let (left, right) = (
			-self.config.exit_margin_side,
			self.width + self.config.exit_margin_side,
		);

		let mut exited = Vec::new();
		for id in &self.order {
			let Some(p) = self.particles.get_mut(id) else {
				continue;
			};
			p.advance(dt, wind);
			p.render(surface);
			if p.y > floor || p.x < left || p.x > right {
				exited.push(*id);
			}
		}

		for id in &exited {
			self.destroy(*id, surface);
		}
		exited.len()
	}

	/// Destroy every petal.
	pub fn clear<S: Surface>(&mut self, surface: &mut S) {
		for (_, particle) in self.particles.drain() {
			surface.remove(particle.node);
		}
		self.order.clear();
	}

	fn compact(&mut self) {
		if self.order.len() > self.particles.len() * 2 + 32 {
			let particles = &self.particles;
			self.order.retain(|id| particles.contains_key(id));
		}
	}
}
