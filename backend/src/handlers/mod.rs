//! HTTP request handlers

pub mod batch;
pub mod dashboard;
pub mod health;

pub use batch::*;
pub use dashboard::*;
pub use health::*;
