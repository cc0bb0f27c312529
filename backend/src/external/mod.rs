//! External API integrations

pub mod batch_api;

pub use batch_api::HttpBatchSource;
