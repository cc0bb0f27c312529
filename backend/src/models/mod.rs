//! Batch models for the AyurChain dashboard
//!
//! Re-exports the record model, analytics and lookup helpers from the shared
//! crate so the backend and the browser agree on every shape.

pub use shared::analytics::*;
pub use shared::lookup::*;
pub use shared::models::*;
pub use shared::validation::*;
