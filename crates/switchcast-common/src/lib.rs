//! Switchcast-Common: shared types used across switchcast.
//!
//! - **Error Handling**: a service-level [`Error`] that knows its HTTP status
//! - **Stream Names**: the [`StreamName`] of a publishing upstream
//!
//! # Examples
//!
//! ```
//! use switchcast_common::{Error, Result, StreamName};
//!
//! let name = StreamName::from("camera-1");
//! assert_eq!(name.as_str(), "camera-1");
//!
//! fn lookup(name: &StreamName) -> Result<()> {
//!     Err(Error::not_found("source", name))
//! }
//! assert_eq!(lookup(&name).unwrap_err().http_status(), 404);
//! ```

pub mod error;
pub mod names;

pub use error::{Error, Result};
pub use names::StreamName;
