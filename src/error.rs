use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExpenseReportError {
    #[error("Invalid month key '{0}': expected YYYY-MM")]
    InvalidMonthKey(String),

    #[error("Malformed record #{index}: {reason}")]
    MalformedRecord { index: usize, reason: String },

    #[error("Invalid report configuration: {0}")]
    InvalidConfig(String),

    #[error("Amount overflow: {0}")]
    AmountOverflow(String),

    #[error("Inconsistent report: {0}")]
    InconsistentReport(String),

    #[error("Failed to fetch monthly expenses: {0}")]
    FetchFailed(String),

    #[error("Data source responded with status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[cfg(feature = "remote")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ExpenseReportError>;
