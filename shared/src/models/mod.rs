//! Domain models for the AyurChain supply-chain dashboard

mod batch;
mod dashboard;
mod detail;

pub use batch::*;
pub use dashboard::*;
pub use detail::*;
