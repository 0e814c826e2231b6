use axum::http::StatusCode;
use chrono::NaiveDate;
use std::path::PathBuf;
use thiserror::Error;

/// Failures of loading or aggregating the rental table.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// A row is missing a field or carries an unparsable or out-of-range value.
    #[error("malformed input at row {row}: {reason}")]
    MalformedInput { row: u64, reason: String },

    #[error("invalid date range: start {start} is after end {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("invalid hour range: {start}..={end} (hours must be 0..=23, start <= end)")]
    InvalidHourRange { start: u8, end: u8 },

    #[error("failed to read data file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn internal(err: impl std::error::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
        }
    }
}

impl From<DashboardError> for AppError {
    fn from(err: DashboardError) -> Self {
        match err {
            DashboardError::InvalidRange { .. } | DashboardError::InvalidHourRange { .. } => {
                Self::bad_request(err.to_string())
            }
            other => Self::internal(other),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::internal(err)
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}
