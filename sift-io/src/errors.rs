//! Loader and writer errors.

use std::path::PathBuf;

use sift_core::ShapeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("no tick files found in {dir}")]
    NoTickFiles { dir: PathBuf },

    #[error("schedule file {path} is missing column {name:?}")]
    MissingColumn { path: PathBuf, name: &'static str },

    #[error("schedule file {path} has a malformed start row: {line:?}")]
    BadStartRow { path: PathBuf, line: String },

    #[error("unparsable number {value:?} in {path}")]
    BadNumber { path: PathBuf, value: String },

    #[error("found {found} expiry month(s); need at least two for a near/next split")]
    TooFewExpiries { found: usize },

    #[error(transparent)]
    Shape(#[from] ShapeError),
}
