//! Domain-specific errors for the account collection.
//!
//! Every variant is a terminal, caller-visible outcome:
//! - Malformed or missing input ([`Error::BadRequest`])
//! - Lookups of identifiers that do not exist ([`Error::NotFound`])
//! - Pagination requests past the last page ([`Error::OutOfRange`])
//!
//! Technical failures such as I/O or CSV parsing are not represented here.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("{0}")]
    BadRequest(String),
    #[error("resource not found")]
    NotFound,
    #[error("page {page} is out of range, {pages} page(s) available")]
    OutOfRange { page: usize, pages: usize },
}

impl Error {
    /// A required field was absent.
    pub fn missing(field: &str) -> Self {
        Error::BadRequest(format!("{field} should not be null"))
    }
}
