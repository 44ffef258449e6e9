//! Platform abstraction layer
//!
//! Turns browser pointer and keyboard events into per-tick simulation input.

pub mod input;

pub use input::{KeyAction, PointerInput, Viewport, key_action};
