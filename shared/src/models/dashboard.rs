//! Dashboard view models derived from batch records

use serde::{Deserialize, Serialize};

use crate::types::Month;

/// Number of batches recorded for one species label
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SpeciesCount {
    pub name: String,
    pub count: usize,
}

/// Batch count for one calendar month
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct MonthlyFlow {
    pub month: Month,
    pub batch_count: usize,
}

impl MonthlyFlow {
    pub fn empty(month: Month) -> Self {
        Self {
            month,
            batch_count: 0,
        }
    }
}

/// Fixed compliance categories shown on the dashboard
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceCategory {
    /// Batches with a non-empty owner history
    Traceability,
    /// Batches with at least one logged processing step
    ProcessingLogged,
    /// Batches with origin, harvest date and current owner recorded
    DataCompleteness,
}

impl std::fmt::Display for ComplianceCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ComplianceCategory::Traceability => write!(f, "Traceability"),
            ComplianceCategory::ProcessingLogged => write!(f, "Processing Logged"),
            ComplianceCategory::DataCompleteness => write!(f, "Data Completeness"),
        }
    }
}

/// Completeness score for one category, 0-100
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ComplianceMetric {
    pub category: ComplianceCategory,
    pub label: String,
    pub percent: u8,
}

impl ComplianceMetric {
    pub fn new(category: ComplianceCategory, percent: u8) -> Self {
        Self {
            category,
            label: category.to_string(),
            percent,
        }
    }
}

/// Status shown next to a recent batch.
///
/// Always `Compliant`: no per-batch verdict is computed yet, so this is a
/// display placeholder and must not be read as a pass/fail result.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum ActivityStatus {
    #[default]
    Compliant,
}

/// A batch as shown in the recent activity table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecentActivity {
    pub id: String,
    pub herb_name: Option<String>,
    pub farmer_name: Option<String>,
    pub created_at: Option<String>,
    pub status: ActivityStatus,
}

/// Headline counters plus the recent activity feed
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActivitySummary {
    pub total_batches: usize,
    pub distinct_farmers: usize,
    pub recent: Vec<RecentActivity>,
}

/// Secondary percentages derived from the summary and monthly flow, 0-100
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct DashboardStats {
    /// Busiest month's share of all batches
    pub peak_month_throughput: u8,
    /// Distinct farmers per batch
    pub farmer_batch_ratio: u8,
}

/// Every dashboard view computed from one batch snapshot
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DashboardView {
    pub summary: ActivitySummary,
    pub species_distribution: Vec<SpeciesCount>,
    pub monthly_flow: [MonthlyFlow; 12],
    pub compliance: [ComplianceMetric; 3],
    pub stats: DashboardStats,
}
