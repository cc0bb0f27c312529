//! Business logic services for the AyurChain dashboard

pub mod batch_source;
pub mod batch_store;
pub mod dashboard;

pub use batch_source::BatchSource;
pub use batch_store::PgBatchStore;
pub use dashboard::DashboardService;
