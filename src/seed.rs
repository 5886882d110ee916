//! Preloads the store from a CSV file at startup.
//!
//! The file has a single `amount` column. Each row goes through the regular
//! create path, so an empty amount is rejected the same way an HTTP create
//! without an amount would be.

use std::path::Path;

use thiserror::Error;
use tracing::info;

use crate::csv_utils::read_csv;
use crate::dto::SeedRow;
use crate::stores::Account;
use crate::{Error, RequestHandler};

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("failed to read seed file: {0}")]
    Csv(#[from] csv::Error),
    /// `row` is 1-based and does not count the header.
    #[error("seed row {row} rejected: {source}")]
    Rejected { row: usize, source: Error },
}

/// Creates one account per CSV row, in file order.
/// Stops at the first malformed or rejected row; accounts created before it are kept.
pub fn load_accounts<P>(handler: &RequestHandler, path: P) -> Result<Vec<Account>, SeedError>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let mut created = Vec::new();
    for (index, row) in read_csv::<SeedRow, _>(path)?.enumerate() {
        let account = handler
            .create(row?.into())
            .map_err(|source| SeedError::Rejected {
                row: index + 1,
                source,
            })?;
        created.push(account);
    }
    info!(path = %path.display(), count = created.len(), "seeded accounts");
    Ok(created)
}
