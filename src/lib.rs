mod config;
mod csv_utils;
mod dto;
mod error;
mod handler;
mod http;
mod seed;
mod stores;
mod telemetry;

pub use config::Config;
pub use dto::AccountDto;
pub use error::Error;
pub use handler::{Command, Outcome, RequestHandler, DEFAULT_PAGE_SIZE};
pub use http::{router, serve};
pub use seed::{load_accounts, SeedError};
pub use stores::{Account, AccountNumber, AccountsStore};
pub use telemetry::init as init_telemetry;
