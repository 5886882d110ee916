//! Storage layer for the account service. Provides:
//! - The shared, insertion-ordered account collection ([`AccountsStore`])
//! - Page partitioning over the current collection (`pagination`)
//!
//! Current implementation keeps everything in process memory behind a single
//! lock; nothing survives a restart.

mod accounts;
mod pagination;

pub use accounts::{Account, AccountNumber, AccountsStore};
