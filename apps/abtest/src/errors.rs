use thiserror::Error;

/// Application-level error type.
/// Anything that should abort the whole run maps into one of these variants;
/// per-item generation failures never do (the runner converts them to
/// placeholder outputs instead).
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),
}
