use crate::error::{ExpenseReportError, Result};
use crate::utils::lenient_amount;
use chrono::{Datelike, NaiveDate};
use indexmap::IndexMap;
use log::debug;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:5000/api/v1/getMonthlyExpense";
pub const DEFAULT_CURRENCY_SYMBOL: &str = "₹";
pub const DEFAULT_COLOR_ALPHA: f64 = 0.6;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Category name to amount, in the order the data source listed them.
pub type CategoryAmounts = IndexMap<String, Decimal>;

/// One month of expenses as delivered by the data source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RawMonthRecord {
    #[serde(default, deserialize_with = "deserialize_lenient_month")]
    #[schemars(description = "Calendar month in YYYY-MM format (e.g. '2024-03').")]
    pub month: Option<String>,

    #[serde(default, deserialize_with = "deserialize_lenient_categories")]
    #[schemars(
        with = "std::collections::BTreeMap<String, f64>",
        description = "Expense amount per category for the month. Categories may differ from month to month; missing or non-numeric amounts count as zero."
    )]
    pub categories: CategoryAmounts,
}

impl RawMonthRecord {
    pub fn new(month: impl Into<String>, categories: CategoryAmounts) -> Self {
        Self {
            month: Some(month.into()),
            categories,
        }
    }

    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(RawMonthRecord)
    }

    pub fn schema_as_json() -> std::result::Result<String, serde_json::Error> {
        let schema = Self::generate_json_schema();
        serde_json::to_string_pretty(&schema)
    }
}

fn deserialize_lenient_month<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|value| value.as_str().map(str::to_string)))
}

fn deserialize_lenient_categories<'de, D>(
    deserializer: D,
) -> std::result::Result<CategoryAmounts, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<IndexMap<String, serde_json::Value>> = Option::deserialize(deserializer)?;

    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(|(category, value)| {
            let amount = lenient_amount(&value).unwrap_or_else(|| {
                debug!(
                    "Coercing non-numeric amount {} for category '{}' to zero",
                    value, category
                );
                Decimal::ZERO
            });
            (category, amount)
        })
        .collect())
}

/// Parses a wire payload (a JSON array of monthly records).
pub fn parse_snapshot(json: &str) -> Result<Vec<RawMonthRecord>> {
    Ok(serde_json::from_str(json)?)
}

/// A year-month identifier such as `2024-03`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CalendarMonthKey {
    year: i32,
    month: u32,
}

impl CalendarMonthKey {
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(ExpenseReportError::InvalidMonthKey(format!(
                "{:04}-{:02}",
                year, month
            )));
        }
        Ok(Self { year, month })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// Calendar month, 1 = January.
    pub fn month(&self) -> u32 {
        self.month
    }

    /// Calendar month, 0 = January.
    pub fn month0(&self) -> u32 {
        self.month - 1
    }
}

impl FromStr for CalendarMonthKey {
    type Err = ExpenseReportError;

    fn from_str(s: &str) -> Result<Self> {
        let first_day = format!("{}-01", s.trim());
        let date = NaiveDate::parse_from_str(&first_day, "%Y-%m-%d")
            .map_err(|_| ExpenseReportError::InvalidMonthKey(s.to_string()))?;
        Ok(Self {
            year: date.year(),
            month: date.month(),
        })
    }
}

impl TryFrom<String> for CalendarMonthKey {
    type Error = ExpenseReportError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<CalendarMonthKey> for String {
    fn from(key: CalendarMonthKey) -> Self {
        key.to_string()
    }
}

impl fmt::Display for CalendarMonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// How normalized months are ordered before charting and comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MonthOrdering {
    /// Year first, then month.
    #[default]
    Chronological,
    /// Month of year only. December of one year sorts after January of the
    /// next, which is how the legacy dashboard ordered its bars.
    CalendarMonth,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub ordering: MonthOrdering,
    pub currency_symbol: String,
    pub endpoint: String,
    pub request_timeout_secs: u64,
    pub color_alpha: f64,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            ordering: MonthOrdering::default(),
            currency_symbol: DEFAULT_CURRENCY_SYMBOL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            color_alpha: DEFAULT_COLOR_ALPHA,
        }
    }
}

impl ReportConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: ReportConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<()> {
        if self.currency_symbol.trim().is_empty() {
            return Err(ExpenseReportError::InvalidConfig(
                "currency_symbol must not be empty".to_string(),
            ));
        }

        if !(0.0..=1.0).contains(&self.color_alpha) {
            return Err(ExpenseReportError::InvalidConfig(format!(
                "color_alpha {} must be between 0.0 and 1.0",
                self.color_alpha
            )));
        }

        if self.request_timeout_secs == 0 {
            return Err(ExpenseReportError::InvalidConfig(
                "request_timeout_secs must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}
