//! Library error type.
//!
//! Only ingestion and file access can fail. Resolution reports everything else as [`crate::Problem`] values.

pub type Result<T> = std::result::Result<T, Error>;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
	#[error("IO error: {0}")]
	IO(#[from] std::io::Error),
	#[error("JSON error: {0}")]
	SerdeJSON(#[from] serde_json::Error),
	#[error("parsing error: {0}")]
	Parse(String),
	#[error("validation error: {0}")]
	Validation(String),
}
