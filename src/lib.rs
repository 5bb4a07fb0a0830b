//! Switchcast - live HLS source switching
//!
//! This library crate exposes the service internals for integration testing.

pub mod config;
pub mod server;
pub mod source;
pub mod state;
