//! Live broadcast state.
//!
//! All mutable state of the running service lives in [`Broadcast`], behind a
//! single async mutex. Every operation holds that lock for its whole
//! duration, fetch included, so merges into the outward playlist never
//! interleave.

mod broadcast;
mod registry;

pub use broadcast::{Broadcast, BroadcastStatus};
pub use registry::StreamRegistry;
