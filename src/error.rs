use thiserror::Error;

#[derive(Error, Debug)]
pub enum FolioError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[cfg(feature = "xlsx")]
    #[error("Spreadsheet error: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("The report file is empty")]
    EmptyFile,

    #[error("The report has no data rows")]
    NoDataRows,

    #[error("No table with Title, Royalty and Date columns found in {0}")]
    UnrecognizedColumns(String),

    #[error("Unsupported file type '{0}'. Import a CSV or Excel (.xlsx/.xls) report")]
    UnsupportedFileType(String),

    #[error("This report was already imported (as {0})")]
    DuplicateImport(String),

    #[error("No rows matched any book in the catalog")]
    NoMatchingRows,

    #[error("Import cancelled; unmatched titles were not resolved")]
    ImportCancelled,

    #[error("Invalid backup format: books, sales and imports must all be arrays")]
    InvalidBackupFormat,

    #[error("{0}")]
    Validation(String),

    #[error("Unknown book: {0}")]
    UnknownBook(String),
}

pub type Result<T> = std::result::Result<T, FolioError>;
