//! Command-line and environment configuration.

use std::net::SocketAddr;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use crate::handler::DEFAULT_PAGE_SIZE;
use crate::stores::{AccountNumber, AccountsStore};
use crate::RequestHandler;

#[derive(Debug, Clone, Parser)]
#[command(name = "rusty-accounts", version, about = "In-memory account collection over HTTP")]
pub struct Config {
    /// Address the HTTP server binds to
    #[arg(long, env = "ACCOUNTS_BIND", default_value = "127.0.0.1:8080")]
    pub bind: SocketAddr,

    /// Number of accounts per page when listing with `?p=`
    #[arg(long, env = "ACCOUNTS_PAGE_SIZE", default_value_t = DEFAULT_PAGE_SIZE)]
    pub page_size: NonZeroUsize,

    /// Account number given to the first created account
    #[arg(long, env = "ACCOUNTS_FIRST_ACCOUNT_NUMBER", default_value_t = 0)]
    pub first_account_number: AccountNumber,

    /// CSV file with an `amount` column to preload accounts from
    #[arg(long, env = "ACCOUNTS_SEED")]
    pub seed: Option<PathBuf>,
}

impl Config {
    /// Builds a handler over a fresh, empty store. Seeding is left to the caller.
    pub fn handler(&self) -> RequestHandler {
        let store = AccountsStore::starting_at(self.first_account_number);
        RequestHandler::new(Arc::new(store), self.page_size)
    }
}
