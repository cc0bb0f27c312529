//! Shared types and analytics for the AyurChain supply-chain dashboard
//!
//! This crate holds the batch record model and the pure analytics shared
//! between the backend and the browser (via WASM).

pub mod analytics;
pub mod lookup;
pub mod models;
pub mod types;
pub mod validation;

pub use analytics::*;
pub use lookup::*;
pub use models::*;
pub use types::*;
pub use validation::*;
