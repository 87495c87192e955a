//! Video output for a 320x240 handheld: takes decoded pictures from the
//! player, turns them a quarter turn and paints them into a fullscreen
//! toolkit window driven by its own thread.

pub mod chroma;
pub mod config;
pub mod error;
pub mod host;
pub mod image;
pub mod painter;
pub mod pattern;
pub mod picture;
pub mod placement;
pub mod plane;
pub mod rotate;
pub mod surface;
pub mod toolkit;
pub mod vout;
mod vout_display;

pub use config::VoutConfig;
pub use error::{Result, VoutError};
pub use host::{VoutHost, VoutModule};
pub use vout::VideoOutput;
