//! Core frame-timing types for the grass field viewer.
//!
//! - Frame time bookkeeping
//! - The shader clock driving the grass time uniform
//! - Frame rate measurement for the performance readout

pub mod clock;
pub mod time;

pub use clock::*;
pub use time::*;
