use crate::error::{ExpenseReportError, Result};
use crate::schema::{CalendarMonthKey, CategoryAmounts, MonthOrdering, RawMonthRecord};
use crate::utils::{checked_sum, month_name};
use log::{debug, warn};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedMonth {
    pub key: CalendarMonthKey,
    /// Display name, e.g. "March".
    pub month_name: String,
    /// 0 = January, 11 = December.
    pub month_index: u32,
    pub categories: CategoryAmounts,
    pub total: Decimal,
}

impl NormalizedMonth {
    /// Fails with `AmountOverflow` when the category amounts sum past `Decimal::MAX`.
    pub fn new(key: CalendarMonthKey, categories: CategoryAmounts) -> Result<Self> {
        let total = checked_sum(categories.values()).ok_or_else(|| {
            ExpenseReportError::AmountOverflow(format!("total for {} exceeds {}", key, Decimal::MAX))
        })?;
        Ok(Self {
            key,
            month_name: month_name(key.month0()),
            month_index: key.month0(),
            categories,
            total,
        })
    }

    /// Amount spent on `category`, zero when the month has no entry for it.
    pub fn amount(&self, category: &str) -> Decimal {
        self.categories
            .get(category)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }
}

#[derive(Debug, Clone, Default)]
pub struct NormalizationResult {
    pub months: Vec<NormalizedMonth>,
    /// Recoverable problems found while reading the snapshot.
    pub warnings: Vec<String>,
}

pub fn normalize_records(records: &[RawMonthRecord], ordering: MonthOrdering) -> NormalizationResult {
    let mut result = NormalizationResult::default();

    for (index, record) in records.iter().enumerate() {
        let key = match parse_record_month(index, record) {
            Ok(key) => key,
            Err(e) => {
                warn!("Dropping record: {}", e);
                result.warnings.push(e.to_string());
                continue;
            }
        };

        let mut categories = CategoryAmounts::with_capacity(record.categories.len());
        for (category, amount) in &record.categories {
            let amount = if *amount < Decimal::ZERO {
                let e = ExpenseReportError::MalformedRecord {
                    index,
                    reason: format!(
                        "negative amount {} for category '{}' in {} treated as zero",
                        amount, category, key
                    ),
                };
                warn!("{}", e);
                result.warnings.push(e.to_string());
                Decimal::ZERO
            } else {
                *amount
            };
            if amount == Decimal::MAX {
                let e = ExpenseReportError::MalformedRecord {
                    index,
                    reason: format!(
                        "amount for category '{}' in {} clamped to the largest supported amount",
                        category, key
                    ),
                };
                warn!("{}", e);
                result.warnings.push(e.to_string());
            }
            categories.insert(category.clone(), amount);
        }

        match NormalizedMonth::new(key, categories) {
            Ok(month) => result.months.push(month),
            Err(e) => {
                let e = ExpenseReportError::MalformedRecord {
                    index,
                    reason: e.to_string(),
                };
                warn!("Dropping record: {}", e);
                result.warnings.push(e.to_string());
            }
        }
    }

    // Both sorts are stable, so duplicate months keep their snapshot order.
    match ordering {
        MonthOrdering::Chronological => result.months.sort_by_key(|m| m.key),
        MonthOrdering::CalendarMonth => result.months.sort_by_key(|m| m.month_index),
    }

    debug!(
        "Normalized {} of {} records ({:?} ordering)",
        result.months.len(),
        records.len(),
        ordering
    );

    result
}

fn parse_record_month(index: usize, record: &RawMonthRecord) -> Result<CalendarMonthKey> {
    let month = record
        .month
        .as_deref()
        .ok_or_else(|| ExpenseReportError::MalformedRecord {
            index,
            reason: "missing month".to_string(),
        })?;

    month
        .parse::<CalendarMonthKey>()
        .map_err(|e| ExpenseReportError::MalformedRecord {
            index,
            reason: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::indexmap;
    use rust_decimal_macros::dec;

    fn record(month: &str, categories: CategoryAmounts) -> RawMonthRecord {
        RawMonthRecord::new(month, categories)
    }

    #[test]
    fn test_totals_and_month_names() {
        let records = vec![record(
            "2024-03",
            indexmap! { "food".to_string() => dec!(120.5), "rent".to_string() => dec!(500) },
        )];

        let result = normalize_records(&records, MonthOrdering::Chronological);
        assert!(result.warnings.is_empty());
        let march = &result.months[0];
        assert_eq!(march.month_name, "March");
        assert_eq!(march.month_index, 2);
        assert_eq!(march.total, dec!(620.5));
        assert_eq!(march.amount("food"), dec!(120.5));
        assert_eq!(march.amount("transport"), Decimal::ZERO);
    }

    #[test]
    fn test_sorting_within_one_year() {
        let records = vec![
            record("2024-05", indexmap! { "food".to_string() => dec!(1) }),
            record("2024-01", indexmap! { "food".to_string() => dec!(2) }),
            record("2024-03", indexmap! { "food".to_string() => dec!(3) }),
        ];

        for ordering in [MonthOrdering::Chronological, MonthOrdering::CalendarMonth] {
            let result = normalize_records(&records, ordering);
            let names: Vec<&str> = result.months.iter().map(|m| m.month_name.as_str()).collect();
            assert_eq!(names, vec!["January", "March", "May"]);
        }
    }

    #[test]
    fn test_sorting_across_year_boundary() {
        let records = vec![
            record("2024-01", indexmap! { "food".to_string() => dec!(1) }),
            record("2023-12", indexmap! { "food".to_string() => dec!(2) }),
        ];

        let chronological = normalize_records(&records, MonthOrdering::Chronological);
        let names: Vec<&str> = chronological
            .months
            .iter()
            .map(|m| m.month_name.as_str())
            .collect();
        assert_eq!(names, vec!["December", "January"]);

        let calendar = normalize_records(&records, MonthOrdering::CalendarMonth);
        let names: Vec<&str> = calendar.months.iter().map(|m| m.month_name.as_str()).collect();
        assert_eq!(names, vec!["January", "December"]);
    }

    #[test]
    fn test_malformed_records_are_dropped_with_warnings() {
        let records = vec![
            RawMonthRecord {
                month: None,
                categories: indexmap! { "food".to_string() => dec!(10) },
            },
            record("not-a-month", CategoryAmounts::new()),
            record("2024-02", indexmap! { "food".to_string() => dec!(-5), "rent".to_string() => dec!(7) }),
        ];

        let result = normalize_records(&records, MonthOrdering::Chronological);
        assert_eq!(result.months.len(), 1);
        assert_eq!(result.warnings.len(), 3);
        assert!(result.warnings[0].contains("missing month"));

        let feb = &result.months[0];
        assert_eq!(feb.amount("food"), Decimal::ZERO);
        assert_eq!(feb.total, dec!(7));
    }

    #[test]
    fn test_overflowing_month_is_dropped() {
        let records = vec![
            record(
                "2024-01",
                indexmap! {
                    "food".to_string() => dec!(50000000000000000000000000000),
                    "rent".to_string() => dec!(50000000000000000000000000000),
                },
            ),
            record("2024-02", indexmap! { "food".to_string() => dec!(12) }),
        ];

        let result = normalize_records(&records, MonthOrdering::Chronological);
        assert_eq!(result.months.len(), 1);
        assert_eq!(result.months[0].month_name, "February");
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("Amount overflow"));
    }

    #[test]
    fn test_clamped_amount_is_reported() {
        let records = vec![record(
            "2024-03",
            indexmap! { "food".to_string() => Decimal::MAX },
        )];

        let result = normalize_records(&records, MonthOrdering::Chronological);
        assert_eq!(result.months[0].total, Decimal::MAX);
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("largest supported amount"));
    }

    #[test]
    fn test_empty_input() {
        let result = normalize_records(&[], MonthOrdering::Chronological);
        assert!(result.months.is_empty());
        assert!(result.warnings.is_empty());
    }
}
