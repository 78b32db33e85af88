//! Browser binding: a DOM-backed [`Surface`], a `requestAnimationFrame` /
//! `setTimeout` backed [`FrameHost`], and the listeners that feed taps,
//! scrolls and resizes into the engine.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use log::{debug, info};
use wasm_bindgen::prelude::*;
use web_sys::{
	AddEventListenerOptions, Document, Element, Event, EventTarget, HtmlElement, MouseEvent,
	TouchEvent, Window,
};

use super::config::FxConfig;
use super::engine::{FrameHost, PetalsEngine, Viewport};
use super::error::MountError;
use super::input::is_interactive_tag;
use super::random::SmallRngSource;
use super::surface::{Layer, NodeId, Surface};

/// Id of the element petals are appended to. Required.
pub const PETALS_ROOT_ID: &str = "petals";
/// Id of the element dust motes are appended to. Optional.
pub const DUST_ROOT_ID: &str = "glowDust";

/// Engine wired to the real page.
pub type BrowserEngine = PetalsEngine<DomSurface, SmallRngSource, BrowserHost>;

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;
type TimerCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// Milliseconds on the same clock as `requestAnimationFrame` timestamps.
fn now_ms(window: &Window) -> f64 {
	window.performance().map(|p| p.now()).unwrap_or(0.0)
}

fn viewport_of(window: &Window, document: &Document) -> Viewport {
	let (client_w, client_h) = document
		.document_element()
		.map(|el| (el.client_width() as f64, el.client_height() as f64))
		.unwrap_or((0.0, 0.0));
	let inner = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);

	Viewport {
		width: client_w.max(inner(window.inner_width())),
		height: client_h.max(inner(window.inner_height())),
	}
}

/// Whether `target` or any of its ancestors is an interactive element.
fn within_interactive(target: &Element) -> bool {
	let mut current = Some(target.clone());
	while let Some(el) = current {
		if is_interactive_tag(&el.tag_name()) {
			return true;
		}
		current = el.parent_element();
	}
	false
}

/// Client coordinates of a click or of the first touch point.
fn pointer_position(ev: &Event) -> Option<(f64, f64)> {
	if ev.type_() == "touchstart" {
		let touch = ev.unchecked_ref::<TouchEvent>().touches().get(0)?;
		return Some((touch.client_x() as f64, touch.client_y() as f64));
	}
	ev.dyn_ref::<MouseEvent>()
		.map(|m| (m.client_x() as f64, m.client_y() as f64))
}

/// [`Surface`] that renders nodes as absolutely positioned `span`s.
pub struct DomSurface {
	document: Document,
	petals_root: Element,
	dust_root: Option<Element>,
	nodes: HashMap<NodeId, HtmlElement>,
	next_node: u64,
}

impl DomSurface {
	/// Draw into `petals_root`, and into `dust_root` when the page has one.
	pub fn new(document: Document, petals_root: Element, dust_root: Option<Element>) -> Self {
		Self {
			document,
			petals_root,
			dust_root,
			nodes: HashMap::new(),
			next_node: 0,
		}
	}
}

impl Surface for DomSurface {
	fn has_layer(&self, layer: Layer) -> bool {
		match layer {
			Layer::Petals => true,
			Layer::Dust => self.dust_root.is_some(),
		}
	}

	fn create(&mut self, layer: Layer, class: &str) -> NodeId {
		self.next_node += 1;
		let id = NodeId(self.next_node);

		let root = match layer {
			Layer::Petals => Some(&self.petals_root),
			Layer::Dust => self.dust_root.as_ref(),
		};
		let Some(root) = root else {
			return id;
		};
		let Some(el) = self
			.document
			.create_element("span")
			.ok()
			.and_then(|el| el.dyn_into::<HtmlElement>().ok())
		else {
			return id;
		};

		el.set_class_name(class);
		if root.append_child(&el).is_ok() {
			self.nodes.insert(id, el);
		}
		id
	}

	fn set_style(&mut self, node: NodeId, property: &str, value: &str) {
		if let Some(el) = self.nodes.get(&node) {
			let _ = el.style().set_property(property, value);
		}
	}

	fn remove(&mut self, node: NodeId) {
		if let Some(el) = self.nodes.remove(&node) {
			el.remove();
		}
	}
}

/// [`FrameHost`] backed by `requestAnimationFrame` and a single `setTimeout`.
pub struct BrowserHost {
	window: Window,
	on_frame: FrameCallback,
	on_timer: TimerCallback,
	frame_request: Option<i32>,
	timer_handle: Option<i32>,
}

impl FrameHost for BrowserHost {
	fn request_frame(&mut self) {
		if let Some(ref cb) = *self.on_frame.borrow() {
			self.frame_request = self
				.window
				.request_animation_frame(cb.as_ref().unchecked_ref())
				.ok();
		}
	}

	fn cancel_frame(&mut self) {
		if let Some(id) = self.frame_request.take() {
			let _ = self.window.cancel_animation_frame(id);
		}
	}

	fn arm_timer(&mut self, due: f64) {
		self.cancel_timer();
		let delay = (due - now_ms(&self.window)).max(0.0).ceil() as i32;
		if let Some(ref cb) = *self.on_timer.borrow() {
			self.timer_handle = self
				.window
				.set_timeout_with_callback_and_timeout_and_arguments_0(
					cb.as_ref().unchecked_ref(),
					delay,
				)
				.ok();
		}
	}

	fn cancel_timer(&mut self) {
		if let Some(handle) = self.timer_handle.take() {
			self.window.clear_timeout_with_handle(handle);
		}
	}
}

struct Listener {
	target: EventTarget,
	event: &'static str,
	capture: bool,
	callback: Closure<dyn FnMut(Event)>,
}

/// A running effect attached to the page.
///
/// Dropping the mount (or calling [`stop`](Self::stop)) detaches every
/// listener, cancels the frame loop and timers, and removes all nodes.
pub struct PetalsMount {
	engine: Rc<RefCell<BrowserEngine>>,
	window: Window,
	listeners: Vec<Listener>,
	on_frame: FrameCallback,
	on_timer: TimerCallback,
}

/// Attach the effect to the `#petals` (and, if present, `#glowDust`) roots of
/// the current document and start it.
pub fn mount(config: FxConfig, seed: Option<u64>) -> Result<PetalsMount, MountError> {
	let window = web_sys::window().ok_or(MountError::NoWindow)?;
	let document = window.document().ok_or(MountError::NoDocument)?;
	let petals_root = document
		.get_element_by_id(PETALS_ROOT_ID)
		.ok_or(MountError::MissingRoot(PETALS_ROOT_ID))?;
	let dust_root = document.get_element_by_id(DUST_ROOT_ID);
	if dust_root.is_none() {
		debug!("petals-fx: #{} not found, dust disabled", DUST_ROOT_ID);
	}

	let now = now_ms(&window);
	let viewport = viewport_of(&window, &document);
	let seed = seed.unwrap_or_else(|| (js_sys::Math::random() * u64::MAX as f64) as u64);

	let on_frame: FrameCallback = Rc::new(RefCell::new(None));
	let on_timer: TimerCallback = Rc::new(RefCell::new(None));
	let host = BrowserHost {
		window: window.clone(),
		on_frame: on_frame.clone(),
		on_timer: on_timer.clone(),
		frame_request: None,
		timer_handle: None,
	};

	let engine = Rc::new(RefCell::new(PetalsEngine::new(
		config,
		DomSurface::new(document.clone(), petals_root, dust_root),
		SmallRngSource::seeded(seed),
		host,
		viewport,
		window.scroll_y().unwrap_or(0.0),
		now,
	)));

	let engine_frame = engine.clone();
	*on_frame.borrow_mut() = Some(Closure::new(move |ts: f64| {
		engine_frame.borrow_mut().frame(ts);
	}));
	let (engine_timer, window_timer) = (engine.clone(), window.clone());
	*on_timer.borrow_mut() = Some(Closure::new(move || {
		engine_timer.borrow_mut().run_timers(now_ms(&window_timer));
	}));

	let mut mount = PetalsMount {
		engine,
		window,
		listeners: Vec::new(),
		on_frame,
		on_timer,
	};
	mount.attach_listeners(&document)?;
	mount.engine.borrow_mut().start(now);

	info!(
		"petals-fx: mounted on {}x{} viewport",
		viewport.width, viewport.height
	);
	Ok(mount)
}

impl PetalsMount {
	fn attach_listeners(&mut self, document: &Document) -> Result<(), MountError> {
		let (engine, window) = (self.engine.clone(), self.window.clone());
		let on_tap = move |ev: Event| {
			let Some(target) = ev.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
				return;
			};
			let Some((x, y)) = pointer_position(&ev) else {
				return;
			};
			let interactive = within_interactive(&target);
			engine
				.borrow_mut()
				.on_tap(now_ms(&window), x, y, interactive);
		};
		self.listen(document.as_ref(), "click", true, on_tap.clone())?;
		self.listen(document.as_ref(), "touchstart", true, on_tap)?;

		let (engine, window) = (self.engine.clone(), self.window.clone());
		let on_scroll = move |_: Event| {
			let y = window.scroll_y().unwrap_or(0.0);
			engine.borrow_mut().on_scroll(now_ms(&window), y);
		};
		let target = self.window.clone();
		self.listen(target.as_ref(), "scroll", false, on_scroll)?;

		let (engine, window) = (self.engine.clone(), self.window.clone());
		let on_resize = move |_: Event| {
			if let Some(document) = window.document() {
				engine
					.borrow_mut()
					.on_resize(viewport_of(&window, &document));
			}
		};
		self.listen(target.as_ref(), "resize", false, on_resize)
	}

	fn listen(
		&mut self,
		target: &EventTarget,
		event: &'static str,
		capture: bool,
		handler: impl FnMut(Event) + 'static,
	) -> Result<(), MountError> {
		let callback = Closure::<dyn FnMut(Event)>::new(handler);
		let options = AddEventListenerOptions::new();
		options.set_capture(capture);
		options.set_passive(true);

		target
			.add_event_listener_with_callback_and_add_event_listener_options(
				event,
				callback.as_ref().unchecked_ref(),
				&options,
			)
			.map_err(|err| MountError::Listener {
				event,
				message: format!("{:?}", err),
			})?;

		self.listeners.push(Listener {
			target: target.clone(),
			event,
			capture,
			callback,
		});
		Ok(())
	}

	/// Open a gust window now. See [`PetalsEngine::gust`].
	pub fn gust(&self, strength: f64, duration_ms: f64) {
		self.engine
			.borrow_mut()
			.gust(now_ms(&self.window), strength, duration_ms);
	}

	/// Whether the engine is still animating.
	pub fn is_running(&self) -> bool {
		self.engine.borrow().is_running()
	}

	/// Detach listeners, stop the engine and release the callbacks.
	pub fn stop(&mut self) {
		for listener in self.listeners.drain(..) {
			let _ = listener.target.remove_event_listener_with_callback_and_bool(
				listener.event,
				listener.callback.as_ref().unchecked_ref(),
				listener.capture,
			);
		}
		if let Ok(mut engine) = self.engine.try_borrow_mut() {
			engine.stop();
		}
		// Breaks the engine <-> callback reference cycle.
		self.on_frame.borrow_mut().take();
		self.on_timer.borrow_mut().take();
	}
}

impl Drop for PetalsMount {
	fn drop(&mut self) {
		self.stop();
	}
}
