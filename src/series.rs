use crate::aggregator::CategorySeries;
use crate::normalizer::NormalizedMonth;
use crate::utils::capitalize_category;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub category: String,
    /// Legend label, e.g. "Food".
    pub label: String,
    pub amounts: Vec<Decimal>,
    /// CSS color, `rgba(r, g, b, a)`.
    pub color: String,
}

/// Labels plus one series per category, ready for a stacked bar chart.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChartDataset {
    pub labels: Vec<String>,
    pub series: Vec<ChartSeries>,
}

impl ChartDataset {
    /// Height of the stacked bar at `index`, saturating at `Decimal::MAX`.
    pub fn stacked_total(&self, index: usize) -> Decimal {
        self.series
            .iter()
            .filter_map(|s| s.amounts.get(index))
            .fold(Decimal::ZERO, |total, amount| total.saturating_add(*amount))
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

pub fn build_chart_dataset(
    months: &[NormalizedMonth],
    aggregated: Vec<CategorySeries>,
    color_alpha: f64,
) -> ChartDataset {
    let labels = months.iter().map(|m| m.month_name.clone()).collect();

    let series = aggregated
        .into_iter()
        .map(|CategorySeries { category, amounts }| ChartSeries {
            label: capitalize_category(&category),
            color: category_color(&category, color_alpha),
            category,
            amounts,
        })
        .collect();

    ChartDataset { labels, series }
}

/// Picks a color for `category` that is stable across runs and processes.
pub fn category_color(category: &str, alpha: f64) -> String {
    let mut rng = StdRng::seed_from_u64(fnv1a(category.as_bytes()));
    let (r, g, b): (u8, u8, u8) = (rng.gen(), rng.gen(), rng.gen());
    format!("rgba({}, {}, {}, {})", r, g, b, alpha)
}

fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET_BASIS, |hash, &byte| {
        (hash ^ u64::from(byte)).wrapping_mul(FNV_PRIME)
    })
}
