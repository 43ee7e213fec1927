//! Keyboard state for the spindle demos.
//!
//! # Invariants
//! - A close request is observed at the top of the next frame, never
//!   mid-frame.
//! - Dolly stepping is per-frame and unbounded in both directions.

pub mod keys;

pub use keys::{DollyControl, KeyTracker};
