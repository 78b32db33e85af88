//! Errors raised while attaching the effect to a page.

use thiserror::Error;

/// Why the effect could not be mounted. The engine itself never fails; these
/// only describe a host page that cannot carry the effect.
#[derive(Debug, Error)]
pub enum MountError {
	#[error("no browser window available")]
	/// Not running in a browser window.
	NoWindow,

	#[error("window has no document")]
	/// The window has no document.
	NoDocument,

	#[error("mount point #{0} not found")]
	MissingRoot(&'static str),

	#[error("failed to attach {event} listener: {message}")]
	Listener {
		event: &'static str,
		message: String,
	},
}
