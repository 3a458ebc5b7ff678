//! Audio engine: the `MediaEngine` capability and its rodio implementation.
//!
//! The controller only ever talks to the trait; `RodioEngine` runs decoding
//! and output on its own thread and reports back through an event queue.

mod player;
mod sink;
mod thread;
mod types;

pub use player::RodioEngine;
pub use types::{EngineEvent, LoadId, MediaEngine};

#[cfg(test)]
pub(crate) mod mock;
