//! Traces an image's edges into another application by replaying them as
//! mouse clicks.
//!
//! The flow is linear: [`preprocess`] loads and normalizes the picture,
//! [`edges`] finds its outline under a user-tuned threshold pair shown live
//! by [`gui`], [`region`] captures where to draw from two cursor samples, and
//! [`replay`] turns every edge pixel into a click inside that region.

pub mod cue;
pub mod edges;
pub mod error;
pub mod gui;
pub mod input;
pub mod preprocess;
pub mod region;
pub mod replay;
pub mod session;
pub mod utils;

pub use edges::{detect_edges, EdgeMask, Thresholds};
pub use error::{Result, TracerError};
