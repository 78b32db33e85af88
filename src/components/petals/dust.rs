//! Background dust motes.
//!
//! Motes are purely decorative: the stylesheet animates them from the custom
//! properties set here, and the engine only decides when they appear and when
//! they are removed. They ignore the wind and the petal budget.

use std::collections::HashMap;

use super::config::DustConfig;
use super::random::RandomSource;
use super::surface::{Layer, NodeId, Surface};

/// CSS class applied to every mote node.
pub const DUST_CLASS: &str = "dust-dot";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
/// Stable dust mote identifier.
pub struct MoteId(u64);

/// A single mote and its sampled look.
#[derive(Clone, Debug)]
pub struct DustMote {
	/// Horizontal position in px.
	pub left: f64,
	/// Offset from the bottom edge in px.
	pub bottom: f64,
	/// Diameter in px.
	pub size: f64,
	/// Opacity, 0 to 1.
	pub opacity: f64,
	/// Animation cycle length in seconds.
	pub duration_s: f64,
	/// Horizontal drift over one cycle, in px.
	pub drift: f64,
	/// Timestamp (ms) at which the mote is removed.
	pub expires_at: f64,
	node: NodeId,
}

/// Self-cleaning collection of motes.
pub struct DustField {
	motes: HashMap<MoteId, DustMote>,
	next_id: u64,
	width: f64,
	config: DustConfig,
}

impl DustField {
	/// Empty field spanning `width` px.
	pub fn new(config: DustConfig, width: f64) -> Self {
		Self {
			motes: HashMap::new(),
			next_id: 1,
			width,
			config,
		}
	}

	/// Number of live motes.
	pub fn len(&self) -> usize {
		self.motes.len()
	}

	/// Whether no mote is alive.
	pub fn is_empty(&self) -> bool {
		self.motes.is_empty()
	}

	/// Whether mote `id` is still alive.
	pub fn contains(&self, id: MoteId) -> bool {
		self.motes.contains_key(&id)
	}

	/// Look up a live mote.
	pub fn get(&self, id: MoteId) -> Option<&DustMote> {
		self.motes.get(&id)
	}

	/// Update the width new motes are spread across.
	pub fn resize(&mut self, width: f64) {
		self.width = width;
	}

	/// Create a mote at `now` (ms). The caller is responsible for removing it
	/// at the returned mote's `expires_at`.
	pub fn spawn<S: Surface, R: RandomSource>(
		&mut self,
		now: f64,
		rng: &mut R,
		surface: &mut S,
	) -> (MoteId, f64) {
		let cfg = &self.config;
		let left = rng.range(0.0, self.width);
		let size = rng.span(cfg.size);
		let opacity = rng.span(cfg.opacity);
		let duration_s = rng.span(cfg.duration_s);
		let drift = rng.span(cfg.drift);
		let bottom = rng.span(cfg.bottom);
		let expires_at = now + (duration_s * cfg.lifetime_cycles * 1000.0).ceil();

		let node = surface.create(Layer::Dust, DUST_CLASS);
		surface.set_style(node, "left", &format!("{left}px"));
		surface.set_style(node, "bottom", &format!("{bottom}px"));
		surface.set_style(node, "--d", &format!("{size}px"));
		surface.set_style(node, "--op", &format!("{opacity:.2}"));
		surface.set_style(node, "--t", &format!("{duration_s:.2}s"));
		surface.set_style(node, "--dx", &format!("{drift:.1}px"));

		let id = MoteId(self.next_id);
		self.next_id += 1;
		self.motes.insert(
			id,
			DustMote {
				left,
				bottom,
				size,
				opacity,
				duration_s,
				drift,
				expires_at,
				node,
			},
		);
		(id, expires_at)
	}

	/// Remove a mote. Returns `false` if it was already gone.
	pub fn expire<S: Surface>(&mut self, id: MoteId, surface: &mut S) -> bool {
		match self.motes.remove(&id) {
			Some(mote) => {
				surface.remove(mote.node);
				true
			}
			None => false,
		}
	}

	/// Remove every mote.
	pub fn clear<S: Surface>(&mut self, surface: &mut S) {
		for (_, mote) in self.motes.drain() {
			surface.remove(mote.node);
		}
	}
}
