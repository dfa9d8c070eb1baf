use std::path::PathBuf;
use thiserror::Error;

/// Which structural check an upload failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    MissingSection,
    MissingColumn,
    MissingValue,
    InvalidNumber,
}

/// An upload that cannot be scored. Nothing is computed or persisted.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Missing section '{0}'")]
    MissingSection(String),

    #[error("Missing column '{field}' in section '{section}'")]
    MissingColumn { section: String, field: String },

    #[error("Section '{section}' has no value for '{field}'")]
    MissingValue { section: String, field: String },

    #[error("Invalid number '{value}' in column '{field}' at row {row}")]
    InvalidNumber {
        field: String,
        row: usize,
        value: String,
    },
}

impl ValidationError {
    pub fn kind(&self) -> ValidationErrorKind {
        match self {
            ValidationError::MissingSection(_) => ValidationErrorKind::MissingSection,
            ValidationError::MissingColumn { .. } => ValidationErrorKind::MissingColumn,
            ValidationError::MissingValue { .. } => ValidationErrorKind::MissingValue,
            ValidationError::InvalidNumber { .. } => ValidationErrorKind::InvalidNumber,
        }
    }

    /// The section or column the check was about.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::MissingSection(section) => section,
            ValidationError::MissingColumn { field, .. }
            | ValidationError::MissingValue { field, .. }
            | ValidationError::InvalidNumber { field, .. } => field,
        }
    }
}

/// Failures reported by a score store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Deleting '{0}' requires confirmation")]
    ConfirmationRequired(String),

    #[error("Fund not found: {0}")]
    NotFound(String),

    #[error("Snapshot not found: {}", .0.display())]
    SnapshotNotFound(PathBuf),

    #[error("Snapshot error: {0}")]
    Snapshot(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
