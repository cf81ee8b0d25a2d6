//! JSON shapes of the `datasets/{code}/data.json` endpoint.

use serde::Deserialize;
use serde_json::Value;

/// Top-level success body.
#[derive(Debug, Clone, Deserialize)]
pub struct DatasetEnvelope {
    /// The table itself.
    pub dataset_data: DatasetData,
}

/// Column names plus row-major data; the first column is normally `Date`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct DatasetData {
    /// Column headers, including the date column.
    pub column_names: Vec<String>,
    /// Rows aligned with `column_names`; values are strings, numbers or null.
    #[serde(default)]
    pub data: Vec<Vec<Value>>,
}

/// Error body, e.g. `{"quandl_error": {"code": "QECx02", "message": "..."}}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorEnvelope {
    /// Structured error.
    pub quandl_error: ApiError,
}

/// Structured API error.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiError {
    /// Vendor error code.
    pub code: String,
    /// Human-readable message.
    pub message: String,
}
