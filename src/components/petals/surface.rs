//! Rendering surface abstraction.
//!
//! The engine never touches the DOM directly. It creates, styles and removes
//! nodes through [`Surface`], which the browser binding implements on top of
//! `web-sys` and tests implement as an in-memory recorder.

/// Mount point a node is appended to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Layer {
	/// The `#petals` root.
	Petals,
	/// The `#glowDust` root.
	Dust,
}

/// Opaque handle to a rendered node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub u64);

/// Node creation and styling on the host page.
pub trait Surface {
	/// Whether the given mount point exists.
	fn has_layer(&self, layer: Layer) -> bool;

	/// Create a node with the given class under `layer`.
	fn create(&mut self, layer: Layer, class: &str) -> NodeId;

	/// Set a style property. Custom properties (`--name`) are accepted.
	fn set_style(&mut self, node: NodeId, property: &str, value: &str);

	/// Detach the node and forget the handle. Unknown handles are ignored.
	fn remove(&mut self, node: NodeId);
}
