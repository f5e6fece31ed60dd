//! Common utilities shared across the crate
//!
//! Domain error types live in [`error`] so that low-level modules can use
//! them without pulling in the unified [`crate::error::Error`].

pub mod error;
