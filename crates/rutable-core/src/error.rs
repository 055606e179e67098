use thiserror::Error;

/// Errors raised by table model and engine operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    /// Column index outside `0..column_count`
    #[error("Column index {index} out of range (table has {count} columns)")]
    ColumnOutOfRange { index: usize, count: usize },

    /// Row index outside `0..row_count`
    #[error("Row index {index} out of range (table has {count} rows)")]
    RowOutOfRange { index: usize, count: usize },

    /// No row carries the given handle
    #[error("Unknown row handle {0}")]
    UnknownRow(u64),

    /// Page number outside `1..=total_pages`
    #[error("Page {page} out of range (1..={total})")]
    PageOutOfRange { page: usize, total: usize },

    /// Column order is not a permutation of the current columns
    #[error("Invalid column order: {0}")]
    InvalidOrder(String),

    /// Sorting is disabled globally or for the column
    #[error("Column {0} is not sortable")]
    NotSortable(usize),

    /// Searching is disabled in the configuration
    #[error("Search is disabled")]
    SearchDisabled,

    /// Configuration failed validation
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Import payload could not be parsed
    #[error(transparent)]
    Import(#[from] ImportError),

    /// Export text could not be written
    #[error("Export failed: {0}")]
    Export(String),
}

impl GridError {
    /// Stable machine-readable code for the error
    pub fn code(&self) -> &'static str {
        match self {
            GridError::ColumnOutOfRange { .. } => "COLUMN_OUT_OF_RANGE",
            GridError::RowOutOfRange { .. } => "ROW_OUT_OF_RANGE",
            GridError::UnknownRow(_) => "UNKNOWN_ROW",
            GridError::PageOutOfRange { .. } => "PAGE_OUT_OF_RANGE",
            GridError::InvalidOrder(_) => "INVALID_ORDER",
            GridError::NotSortable(_) => "NOT_SORTABLE",
            GridError::SearchDisabled => "SEARCH_DISABLED",
            GridError::InvalidConfig(_) => "INVALID_CONFIG",
            GridError::Import(_) => "IMPORT_FAILED",
            GridError::Export(_) => "EXPORT_FAILED",
        }
    }
}

/// Errors raised while parsing imported text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImportError {
    #[error("Invalid JSON: {0}")]
    Json(String),

    #[error("JSON payload must be an array of objects or arrays")]
    UnexpectedJsonShape,

    #[error("Invalid CSV: {0}")]
    Csv(String),

    #[error("Import payload is empty")]
    Empty,
}

impl From<serde_json::Error> for ImportError {
    fn from(err: serde_json::Error) -> Self {
        ImportError::Json(err.to_string())
    }
}

impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::Csv(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GridError>;
