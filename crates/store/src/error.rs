//! The module contains the errors the store can return.
//!
//! Every error belongs to one of three kinds (see [`ErrorKind`]):
//!
//! - validation: the input was rejected, nothing was written;
//! - not found: a point lookup missed;
//! - storage: the database or the flat file failed and the error is
//!   reported as is, without retry.
use sea_orm::DbErr;
use thiserror::Error;

use crate::validation::ValidationErrors;

/// Store custom errors.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{0}")]
    Validation(ValidationErrors),
    #[error("\"{0}\" not found!")]
    NotFound(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error(transparent)]
    Database(#[from] DbErr),
    #[error("Flat file error: {0}")]
    FlatFile(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Coarse classification of a [`StoreError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Storage,
}

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) | Self::InvalidAmount(_) => ErrorKind::Validation,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Database(_) | Self::FlatFile(_) | Self::Io(_) => ErrorKind::Storage,
        }
    }

    /// Shortcut for a single-field validation failure.
    pub(crate) fn invalid(field: &str, message: impl Into<String>) -> Self {
        let mut errors = ValidationErrors::default();
        errors.push(field, message);
        Self::Validation(errors)
    }
}

impl From<ValidationErrors> for StoreError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value)
    }
}

impl From<csv::Error> for StoreError {
    fn from(value: csv::Error) -> Self {
        Self::FlatFile(value.to_string())
    }
}

impl PartialEq for StoreError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Validation(a), Self::Validation(b)) => a == b,
            (Self::NotFound(a), Self::NotFound(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            (Self::FlatFile(a), Self::FlatFile(b)) => a == b,
            (Self::Io(a), Self::Io(b)) => a.kind() == b.kind(),
            _ => false,
        }
    }
}
