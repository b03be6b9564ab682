//! # Expense Report Builder
//!
//! A library for turning sparse monthly expense snapshots (one record per
//! month, one amount per category) into a stacked chart dataset and
//! month-over-month spending narratives.
//!
//! ## Core Concepts
//!
//! - **Raw Records**: `{ "month": "YYYY-MM", "categories": { "food": 120, ... } }` as served by the data source
//! - **Normalized Months**: ordered months with zero-filled amounts and totals
//! - **Category Series**: one aligned amount series per category seen in any month
//! - **Chart Dataset**: labels plus colored series whose stacks add up to each month's total
//! - **Narratives**: per-category and overall comparison of the last two months
//!
//! ## Example
//!
//! ```rust,ignore
//! use expense_report_builder::*;
//!
//! let records = parse_snapshot(r#"[
//!     {"month": "2024-02", "categories": {"food": 100, "rent": 500}},
//!     {"month": "2024-03", "categories": {"food": 150, "rent": 500}}
//! ]"#)?;
//!
//! let report = process_expense_snapshot(&records, &ReportConfig::default())?;
//! assert_eq!(
//!     report.overall_narrative,
//!     "Overall, you spent ₹50 more than the previous month."
//! );
//! ```

pub mod aggregator;
pub mod dashboard;
pub mod engine;
pub mod error;
pub mod narrative;
pub mod normalizer;
pub mod orchestrator;
pub mod schema;
pub mod series;
pub mod source;
pub mod utils;

pub use aggregator::{aggregate_categories, collect_categories, CategorySeries};
pub use dashboard::{AmountRange, DashboardContext, DashboardSummary, DateRange, Transaction};
pub use engine::{ExpenseReport, ReportEngine};
pub use error::{ExpenseReportError, Result};
pub use narrative::{
    category_narrative, compare_latest_months, overall_narrative, CategoryDelta,
    ComparisonReport, SpendingTrend, INSUFFICIENT_HISTORY_TEXT,
};
pub use normalizer::{normalize_records, NormalizationResult, NormalizedMonth};
pub use orchestrator::{ReportOrchestrator, ReportState};
pub use schema::*;
pub use series::{build_chart_dataset, category_color, ChartDataset, ChartSeries};
pub use source::*;

use log::{debug, info};

pub struct ExpenseReportProcessor;

impl ExpenseReportProcessor {
    pub fn process(records: &[RawMonthRecord], config: &ReportConfig) -> Result<ExpenseReport> {
        config.validate()?;

        info!("Building expense report from {} monthly records", records.len());

        let report = ReportEngine::new(config.clone()).build(records);

        if !report.warnings.is_empty() {
            for warning in &report.warnings {
                debug!("Snapshot warning: {}", warning);
            }
        }

        Ok(report)
    }

    /// Like [`process`](Self::process), but also checks that every stacked bar
    /// matches its month total and every series covers every month.
    pub fn process_with_verification(
        records: &[RawMonthRecord],
        config: &ReportConfig,
    ) -> Result<ExpenseReport> {
        let report = Self::process(records, config)?;
        verify_report(&report)?;
        Ok(report)
    }
}

pub fn process_expense_snapshot(
    records: &[RawMonthRecord],
    config: &ReportConfig,
) -> Result<ExpenseReport> {
    ExpenseReportProcessor::process(records, config)
}

pub fn process_with_verification(
    records: &[RawMonthRecord],
    config: &ReportConfig,
) -> Result<ExpenseReport> {
    ExpenseReportProcessor::process_with_verification(records, config)
}

/// Checks the chart against the normalized months it was built from.
pub fn verify_report(report: &ExpenseReport) -> Result<()> {
    let month_count = report.months.len();

    if report.chart.labels.len() != month_count {
        return Err(ExpenseReportError::InconsistentReport(format!(
            "chart has {} labels for {} months",
            report.chart.labels.len(),
            month_count
        )));
    }

    for series in &report.chart.series {
        if series.amounts.len() != month_count {
            return Err(ExpenseReportError::InconsistentReport(format!(
                "series '{}' has {} amounts for {} months",
                series.category,
                series.amounts.len(),
                month_count
            )));
        }
    }

    for (index, month) in report.months.iter().enumerate() {
        let stacked = report.chart.stacked_total(index);
        if stacked != month.total {
            return Err(ExpenseReportError::InconsistentReport(format!(
                "stacked total {} for {} does not match month total {}",
                stacked, month.key, month.total
            )));
        }
    }

    Ok(())
}
