use thiserror::Error as ThisError;

/// Pipeline failures, one variant per stage. The run aborts on the first
/// error; nothing here is retried.
#[derive(Debug, ThisError)]
pub enum Error {
    #[error("fetching {url}: {message}")]
    Fetch { url: String, message: String },

    #[error("table extraction: {0}")]
    Extraction(String),

    #[error("cleaning row {row}: {message}")]
    Cleaning { row: usize, message: String },

    #[error("database error: {0}")]
    Persistence(#[from] rusqlite::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
