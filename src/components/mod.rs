//! UI components.

/// The falling-petal overlay.
pub mod petals;
