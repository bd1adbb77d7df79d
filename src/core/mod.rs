//! Core Service Layer
//!
//! Shared infrastructure: the error taxonomy, the per-request auth
//! context, and the middleware that produces it.

pub mod ctx;
pub mod error;
pub mod middleware;

// Re-exports for convenience
pub use ctx::Ctx;
pub use error::{Error, Result};
