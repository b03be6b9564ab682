use crate::error::Result;
use crate::schema::{parse_snapshot, RawMonthRecord};
use log::debug;
use std::future::Future;
use std::path::PathBuf;

/// Where monthly expense snapshots come from.
pub trait ExpenseSource: Send + Sync {
    fn fetch_monthly_expenses(&self) -> impl Future<Output = Result<Vec<RawMonthRecord>>> + Send;
}

/// A fixed, in-memory snapshot.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    records: Vec<RawMonthRecord>,
}

impl StaticSource {
    pub fn new(records: Vec<RawMonthRecord>) -> Self {
        Self { records }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(Self::new(parse_snapshot(json)?))
    }
}

impl ExpenseSource for StaticSource {
    async fn fetch_monthly_expenses(&self) -> Result<Vec<RawMonthRecord>> {
        Ok(self.records.clone())
    }
}

/// Reads the wire payload from a JSON file on every fetch.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ExpenseSource for JsonFileSource {
    async fn fetch_monthly_expenses(&self) -> Result<Vec<RawMonthRecord>> {
        let raw = tokio::fs::read_to_string(&self.path).await?;
        let records = parse_snapshot(&raw)?;
        debug!(
            "Read {} monthly records from {}",
            records.len(),
            self.path.display()
        );
        Ok(records)
    }
}

#[cfg(feature = "remote")]
pub use remote::HttpExpenseSource;

#[cfg(feature = "remote")]
mod remote {
    use super::ExpenseSource;
    use crate::error::{ExpenseReportError, Result};
    use crate::schema::{RawMonthRecord, ReportConfig};
    use log::debug;
    use reqwest::Client;
    use std::time::Duration;

    /// Fetches the snapshot from the monthly-expense HTTP endpoint.
    #[derive(Clone)]
    pub struct HttpExpenseSource {
        client: Client,
        endpoint: String,
    }

    impl HttpExpenseSource {
        pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
            let client = Client::builder().timeout(timeout).build()?;
            Ok(Self {
                client,
                endpoint: endpoint.into(),
            })
        }

        pub fn from_config(config: &ReportConfig) -> Result<Self> {
            Self::new(
                config.endpoint.clone(),
                Duration::from_secs(config.request_timeout_secs),
            )
        }
    }

    impl ExpenseSource for HttpExpenseSource {
        async fn fetch_monthly_expenses(&self) -> Result<Vec<RawMonthRecord>> {
            let res = self.client.get(&self.endpoint).send().await?;
            let status = res.status();

            if !status.is_success() {
                let body = res.text().await.unwrap_or_default();
                return Err(ExpenseReportError::UnexpectedStatus {
                    status: status.as_u16(),
                    body,
                });
            }

            let records: Vec<RawMonthRecord> = res.json().await?;
            debug!("Fetched {} monthly records from {}", records.len(), self.endpoint);
            Ok(records)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExpenseReportError;

    #[tokio::test]
    async fn test_static_source_from_json() {
        let source = StaticSource::from_json(
            r#"[{"month": "2024-01", "categories": {"food": 12}}]"#,
        )
        .unwrap();
        let records = source.fetch_monthly_expenses().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].month.as_deref(), Some("2024-01"));
    }

    #[tokio::test]
    async fn test_json_file_source() {
        let path = std::env::temp_dir().join(format!(
            "expense-report-builder-source-{}.json",
            std::process::id()
        ));
        std::fs::write(
            &path,
            r#"[{"month": "2024-02", "categories": {"rent": 500}}]"#,
        )
        .unwrap();

        let records = JsonFileSource::new(&path)
            .fetch_monthly_expenses()
            .await
            .unwrap();
        assert_eq!(records[0].categories["rent"].to_string(), "500");

        std::fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn test_missing_file_is_an_io_error() {
        let err = JsonFileSource::new("/definitely/not/here.json")
            .fetch_monthly_expenses()
            .await
            .unwrap_err();
        assert!(matches!(err, ExpenseReportError::IoError(_)));
    }
}
