//! petals-fx: ambient falling-petal effect for the web.
//!
//! This crate provides a WASM-based overlay that drops petals through the
//! page, pushes them around with a stochastic wind, bursts new ones where the
//! user taps and stirs up gusts when the page is scrolled quickly.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info};

/// UI components.
pub mod components;

pub use components::petals::{FxConfig, MountError, PetalsEngine, PetalsMount, PetalsOverlay};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("petals-fx: logging initialized");
}

/// Main application component.
/// Renders the petal overlay behind a minimal landing page.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	view! {
		<Html attr:lang="en" attr:dir="ltr" />
		<Title text="Petals" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<main class="petals-page">
			<PetalsOverlay />
			<section class="petals-content">
				<h1>"Petals"</h1>
				<p class="subtitle">"Tap anywhere to scatter petals. Scroll fast to stir the wind."</p>
			</section>
		</main>
	}
}
