use thiserror::Error;

#[derive(Debug, Error)]
pub enum StretchUtilsError {
    #[error("I/O Error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("CSV Error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("CSV must have {0} column")]
    MissingColumn(&'static str),
}
