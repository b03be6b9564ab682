use crate::aggregator::aggregate_categories;
use crate::narrative::{category_narrative, compare_latest_months, overall_narrative, ComparisonReport};
use crate::normalizer::{normalize_records, NormalizedMonth};
use crate::schema::{RawMonthRecord, ReportConfig};
use crate::series::{build_chart_dataset, ChartDataset};
use log::debug;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Everything the display layer needs from one snapshot. Published as a unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseReport {
    pub months: Vec<NormalizedMonth>,
    pub chart: ChartDataset,
    pub comparison: Option<ComparisonReport>,
    pub category_narrative: String,
    pub overall_narrative: String,
    pub warnings: Vec<String>,
}

impl ExpenseReport {
    pub fn latest_month(&self) -> Option<&NormalizedMonth> {
        self.months.last()
    }

    /// Total of the most recent month, zero when there is no data.
    pub fn latest_total(&self) -> Decimal {
        self.latest_month()
            .map(|m| m.total)
            .unwrap_or(Decimal::ZERO)
    }
}

pub struct ReportEngine {
    config: ReportConfig,
}

impl ReportEngine {
    pub fn new(config: ReportConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    pub fn build(&self, records: &[RawMonthRecord]) -> ExpenseReport {
        let normalized = normalize_records(records, self.config.ordering);
        let months = normalized.months;

        let aggregated = aggregate_categories(&months);
        debug!(
            "Aggregated {} categories across {} months",
            aggregated.len(),
            months.len()
        );

        let chart = build_chart_dataset(&months, aggregated, self.config.color_alpha);

        let comparison = compare_latest_months(&months);
        let symbol = self.config.currency_symbol.as_str();
        let category_text = category_narrative(comparison.as_ref(), symbol);
        let overall_text = overall_narrative(comparison.as_ref(), symbol);

        ExpenseReport {
            months,
            chart,
            comparison,
            category_narrative: category_text,
            overall_narrative: overall_text,
            warnings: normalized.warnings,
        }
    }
}

impl Default for ReportEngine {
    fn default() -> Self {
        Self::new(ReportConfig::default())
    }
}
