//! Ambient falling-petal effect.
//!
//! Petals fall from above the viewport, swaying and spinning in a shared,
//! slowly shifting wind. Taps scatter small bursts of faster petals, fast
//! scrolling whips up short gusts, and a layer of glowing dust motes drifts
//! along the bottom edge.
//!
//! The simulation ([`PetalsEngine`]) is independent of the browser: it draws
//! through a [`Surface`], schedules itself through a [`FrameHost`] and takes
//! its randomness from a [`RandomSource`]. The [`dom`] module binds it to a
//! real page and [`PetalsOverlay`] wraps that binding in a Leptos component.
//!
//! # Example
//!
//! ```ignore
//! use petals_fx::PetalsOverlay;
//!
//! view! { <PetalsOverlay /> }
//! ```

mod component;
/// Tuning constants.
pub mod config;
/// Browser binding.
pub mod dom;
mod dust;
mod engine;
mod error;
mod input;
mod particles;
mod random;
mod scroll;
mod spawn;
mod surface;
mod timers;
mod wind;

#[cfg(test)]
mod testing;

pub use component::PetalsOverlay;
pub use config::FxConfig;
pub use dom::{PetalsMount, mount};
pub use dust::{DustField, DustMote, MoteId};
pub use engine::{FrameClock, FrameHost, PetalsEngine, Viewport};
pub use error::MountError;
pub use input::{InputBridge, TapDecision, is_interactive_tag};
pub use particles::{Origin, Particle, ParticleId, ParticlePool};
pub use random::{RandomSource, SmallRngSource};
pub use scroll::{ScrollGust, ScrollGustDetector};
pub use spawn::SpawnScheduler;
pub use surface::{Layer, NodeId, Surface};
pub use timers::{TimerEvent, TimerQueue};
pub use wind::WindModel;
