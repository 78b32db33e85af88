//! Test doubles for the engine's injected collaborators.

use std::collections::HashMap;

use super::engine::FrameHost;
use super::random::RandomSource;
use super::surface::{Layer, NodeId, Surface};

/// Replays a fixed list of samples, then keeps returning the last one.
pub struct ScriptedRandom {
	values: Vec<f64>,
	cursor: usize,
}

impl ScriptedRandom {
	pub fn new(values: impl IntoIterator<Item = f64>) -> Self {
		let values: Vec<f64> = values.into_iter().collect();
		assert!(!values.is_empty(), "script needs at least one value");
		Self { values, cursor: 0 }
	}
}

impl RandomSource for ScriptedRandom {
	fn next_unit(&mut self) -> f64 {
		let value = self.values[self.cursor.min(self.values.len() - 1)];
		self.cursor += 1;
		value
	}
}

#[derive(Debug)]
pub struct RecordedNode {
	pub layer: Layer,
	pub class: String,
	pub styles: HashMap<String, String>,
}

/// In-memory surface that records every node and style write.
pub struct RecordingSurface {
	dust_layer: bool,
	nodes: HashMap<NodeId, RecordedNode>,
	removed: Vec<NodeId>,
	next: u64,
}

impl RecordingSurface {
	pub fn new() -> Self {
		Self {
			dust_layer: true,
			nodes: HashMap::new(),
			removed: Vec::new(),
			next: 0,
		}
	}

	pub fn without_dust() -> Self {
		Self {
			dust_layer: false,
			..Self::new()
		}
	}

	pub fn live(&self, layer: Layer) -> usize {
		self.nodes.values().filter(|n| n.layer == layer).count()
	}

	pub fn removed(&self) -> &[NodeId] {
		&self.removed
	}

	pub fn node(&self, id: NodeId) -> Option<&RecordedNode> {
		self.nodes.get(&id)
	}

	pub fn style(&self, id: NodeId, property: &str) -> Option<&str> {
		self.nodes
			.get(&id)?
			.styles
			.get(property)
			.map(String::as_str)
	}
}

impl Surface for RecordingSurface {
	fn has_layer(&self, layer: Layer) -> bool {
		match layer {
			Layer::Petals => true,
			Layer::Dust => self.dust_layer,
		}
	}

	fn create(&mut self, layer: Layer, class: &str) -> NodeId {
		self.next += 1;
		let id = NodeId(self.next);
		self.nodes.insert(
			id,
			RecordedNode {
				layer,
				class: class.to_string(),
				styles: HashMap::new(),
			},
		);
		id
	}

	fn set_style(&mut self, node: NodeId, property: &str, value: &str) {
		if let Some(n) = self.nodes.get_mut(&node) {
			n.styles.insert(property.to_string(), value.to_string());
		}
	}

	fn remove(&mut self, node: NodeId) {
		if self.nodes.remove(&node).is_some() {
			self.removed.push(node);
		}
	}
}

/// Frame host that records requests instead of scheduling anything.
#[derive(Debug, Default)]
pub struct ManualHost {
	pub frame_requests: usize,
	pub frame_pending: bool,
	pub timer_due: Option<f64>,
}

impl FrameHost for ManualHost {
	fn request_frame(&mut self) {
		self.frame_requests += 1;
		self.frame_pending = true;
	}

	fn cancel_frame(&mut self) {
		self.frame_pending = false;
	}

	fn arm_timer(&mut self, due: f64) {
		self.timer_due = Some(due);
	}

	fn cancel_timer(&mut self) {
		self.timer_due = None;
	}
}
