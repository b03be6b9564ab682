use crate::normalizer::NormalizedMonth;
use crate::utils::{capitalize_category, format_amount};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

pub const INSUFFICIENT_HISTORY_TEXT: &str = "Not enough data to compare with the previous month.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryDelta {
    pub category: String,
    pub current: Decimal,
    pub previous: Decimal,
    /// `current - previous`, saturating at the `Decimal` bounds.
    pub delta: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpendingTrend {
    Increased,
    Decreased,
    Unchanged,
}

impl SpendingTrend {
    fn of(delta: Decimal) -> Self {
        match delta.cmp(&Decimal::ZERO) {
            Ordering::Greater => SpendingTrend::Increased,
            Ordering::Less => SpendingTrend::Decreased,
            Ordering::Equal => SpendingTrend::Unchanged,
        }
    }
}

/// Month-over-month comparison between the last two normalized months.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub current_month: String,
    pub previous_month: String,
    /// One entry per category of the current month, in its order.
    pub per_category: Vec<CategoryDelta>,
    pub current_total: Decimal,
    pub previous_total: Decimal,
    pub overall_delta: Decimal,
}

impl ComparisonReport {
    pub fn trend(&self) -> SpendingTrend {
        SpendingTrend::of(self.overall_delta)
    }
}

/// Compares the last month against the one before it. `None` when fewer than
/// two months are available.
pub fn compare_latest_months(months: &[NormalizedMonth]) -> Option<ComparisonReport> {
    let [.., previous, current] = months else {
        return None;
    };

    let per_category = current
        .categories
        .iter()
        .map(|(category, &amount)| {
            let previous_amount = previous.amount(category);
            CategoryDelta {
                category: category.clone(),
                current: amount,
                previous: previous_amount,
                delta: amount.saturating_sub(previous_amount),
            }
        })
        .collect();

    Some(ComparisonReport {
        current_month: current.month_name.clone(),
        previous_month: previous.month_name.clone(),
        per_category,
        current_total: current.total,
        previous_total: previous.total,
        overall_delta: current.total.saturating_sub(previous.total),
    })
}

pub fn category_narrative(report: Option<&ComparisonReport>, currency_symbol: &str) -> String {
    let Some(report) = report else {
        return INSUFFICIENT_HISTORY_TEXT.to_string();
    };

    let mut text = format!("In {}, you spent ", report.current_month);
    for entry in &report.per_category {
        let label = capitalize_category(&entry.category);
        let sentence = match SpendingTrend::of(entry.delta) {
            SpendingTrend::Increased => format!(
                "{} more on {}. ",
                format_amount(currency_symbol, entry.delta),
                label
            ),
            SpendingTrend::Decreased => format!(
                "{} less on {}. ",
                format_amount(currency_symbol, entry.delta.abs()),
                label
            ),
            SpendingTrend::Unchanged => format!(
                "No change on {} ({}). ",
                label,
                format_amount(currency_symbol, entry.current)
            ),
        };
        text.push_str(&sentence);
    }

    text
}

pub fn overall_narrative(report: Option<&ComparisonReport>, currency_symbol: &str) -> String {
    let Some(report) = report else {
        return INSUFFICIENT_HISTORY_TEXT.to_string();
    };

    match report.trend() {
        SpendingTrend::Increased => format!(
            "Overall, you spent {} more than the previous month.",
            format_amount(currency_symbol, report.overall_delta)
        ),
        SpendingTrend::Decreased => format!(
            "Overall, you spent {} less than the previous month.",
            format_amount(currency_symbol, report.overall_delta.abs())
        ),
        SpendingTrend::Unchanged => format!(
            "Overall, your spending remained the same at {}.",
            format_amount(currency_symbol, report.current_total)
        ),
    }
}
