//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Input events (keyboard and pointer mapped to simulation input)
//! - Time/ticks (fixed-step accumulator, real-time intervals)
//!
//! Storage lives in `persistence`.

pub mod input;
pub mod time;

pub use input::{InputState, Key};
pub use time::{FixedStep, Interval};
