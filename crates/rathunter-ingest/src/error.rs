use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("snapshot serialization error: {0}")]
    SnapshotSerialize(#[source] serde_json::Error),

    #[error("snapshot I/O error at {path}: {source}")]
    SnapshotIo {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// A row that could not be augmented. `row` is the zero-based input index.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("row {row}: missing required field {field}")]
    MissingField { row: usize, field: &'static str },

    #[error("row {row}: field {field} value \"{value}\" is not a YYYY-MM-DDTHH:MM:SS.sssZ timestamp")]
    InvalidTimestamp {
        row: usize,
        field: &'static str,
        value: String,
    },

    #[error("row {row}: field {field} has the wrong JSON type: {value}")]
    InvalidField {
        row: usize,
        field: String,
        value: String,
    },
}

impl NormalizeError {
    #[must_use]
    pub fn row(&self) -> usize {
        match self {
            NormalizeError::MissingField { row, .. }
            | NormalizeError::InvalidTimestamp { row, .. }
            | NormalizeError::InvalidField { row, .. } => *row,
        }
    }
}
