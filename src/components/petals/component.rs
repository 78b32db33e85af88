//! Leptos component hosting the petal effect.
//!
//! The component renders the two mount points, attaches the engine once they
//! are in the document, and tears it down when the component is unmounted.

use leptos::prelude::*;
use log::warn;

use super::config::FxConfig;
use super::dom::{self, DUST_ROOT_ID, PETALS_ROOT_ID, PetalsMount};

/// Full-page overlay of falling petals and glowing dust.
///
/// Pass a `seed` for a reproducible sequence; by default the effect seeds
/// itself from `Math.random()`. Style the `.petals`, `.petal`, `.glow-dust`
/// and `.dust-dot` classes in the host stylesheet.
#[component]
pub fn PetalsOverlay(#[prop(default = None)] seed: Option<u64>) -> impl IntoView {
	let mount = StoredValue::new_local(None::<PetalsMount>);

	Effect::new(move |_| {
		if mount.with_value(Option::is_some) {
			return;
		}
		match dom::mount(FxConfig::default(), seed) {
			Ok(m) => mount.set_value(Some(m)),
			Err(err) => warn!("petals-fx: effect inactive: {}", err),
		}
	});

	on_cleanup(move || {
		let _ = mount.try_update_value(|m| {
			if let Some(mut m) = m.take() {
				m.stop();
			}
		});
	});

	view! {
		<div id=PETALS_ROOT_ID class="petals" aria-hidden="true"></div>
		<div id=DUST_ROOT_ID class="glow-dust" aria-hidden="true"></div>
	}
}
