use crate::normalizer::NormalizedMonth;
use indexmap::IndexSet;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Amounts for one category, aligned index-for-index with the ordered months.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySeries {
    pub category: String,
    pub amounts: Vec<Decimal>,
}

/// Every category seen in any month, in first-seen order.
pub fn collect_categories(months: &[NormalizedMonth]) -> IndexSet<String> {
    months
        .iter()
        .flat_map(|month| month.categories.keys())
        .cloned()
        .collect()
}

/// Builds one zero-filled series per category across `months`.
pub fn aggregate_categories(months: &[NormalizedMonth]) -> Vec<CategorySeries> {
    collect_categories(months)
        .into_iter()
        .map(|category| {
            let amounts = months.iter().map(|month| month.amount(&category)).collect();
            CategorySeries { category, amounts }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{CalendarMonthKey, CategoryAmounts};
    use indexmap::indexmap;
    use rust_decimal_macros::dec;

    fn month(key: &str, categories: CategoryAmounts) -> NormalizedMonth {
        NormalizedMonth::new(key.parse::<CalendarMonthKey>().unwrap(), categories).unwrap()
    }

    #[test]
    fn test_union_and_zero_fill() {
        let months = vec![
            month("2024-01", indexmap! { "food".to_string() => dec!(100) }),
            month(
                "2024-02",
                indexmap! { "food".to_string() => dec!(80), "transport".to_string() => dec!(30) },
            ),
            month("2024-03", indexmap! { "rent".to_string() => dec!(0) }),
        ];

        let series = aggregate_categories(&months);
        let names: Vec<&str> = series.iter().map(|s| s.category.as_str()).collect();
        assert_eq!(names, vec!["food", "transport", "rent"]);

        assert_eq!(series[0].amounts, vec![dec!(100), dec!(80), dec!(0)]);
        assert_eq!(series[1].amounts, vec![dec!(0), dec!(30), dec!(0)]);
        // Always-zero categories are still charted.
        assert_eq!(series[2].amounts, vec![dec!(0), dec!(0), dec!(0)]);

        for s in &series {
            assert_eq!(s.amounts.len(), months.len());
        }
    }

    #[test]
    fn test_no_months() {
        assert!(aggregate_categories(&[]).is_empty());
    }
}
