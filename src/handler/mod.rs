//! Translates typed commands from the transport layer into store calls, and
//! store results into outcomes the transport layer renders.
//!
//! Validation happens here through the [`preconditions`] guards; the store
//! itself never rejects input.

mod preconditions;

use std::num::{IntErrorKind, NonZeroUsize};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::dto::AccountDto;
use crate::stores::{Account, AccountNumber, AccountsStore};
use crate::Error;
use preconditions::{check_found, check_not_null};

/// Page size used when none is configured.
pub const DEFAULT_PAGE_SIZE: NonZeroUsize = match NonZeroUsize::new(2) {
    Some(size) => size,
    None => panic!("page size must be non-zero"),
};

/// A request, already parsed by the transport layer.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// `page` is the raw query value; absent or empty lists everything.
    List { page: Option<String> },
    Get { account_number: AccountNumber },
    Create { account: AccountDto },
    Update {
        account_number: AccountNumber,
        account: AccountDto,
    },
    Delete { account_number: AccountNumber },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Accounts(Vec<Account>),
    Account(Account),
    /// `location` is the identifier the transport turns into a locator.
    Created {
        account: Account,
        location: AccountNumber,
    },
    Updated,
    Deleted,
}

#[derive(Debug, Clone)]
pub struct RequestHandler {
    store: Arc<AccountsStore>,
    page_size: NonZeroUsize,
}

impl Default for RequestHandler {
    fn default() -> Self {
        Self::new(Arc::new(AccountsStore::new()), DEFAULT_PAGE_SIZE)
    }
}

impl RequestHandler {
    pub fn new(store: Arc<AccountsStore>, page_size: NonZeroUsize) -> Self {
        Self { store, page_size }
    }

    pub fn store(&self) -> &AccountsStore {
        &self.store
    }

    pub fn page_size(&self) -> NonZeroUsize {
        self.page_size
    }

    pub fn handle(&self, command: Command) -> Result<Outcome, Error> {
        let result = match command {
            Command::List { page } => self.list(page.as_deref()).map(Outcome::Accounts),
            Command::Get { account_number } => self.get(account_number).map(Outcome::Account),
            Command::Create { account } => self
                .create(account)
                .map(|account| Outcome::Created {
                    location: account.account_number,
                    account,
                }),
            Command::Update {
                account_number,
                account,
            } => self
                .update(account_number, account)
                .map(|_| Outcome::Updated),
            Command::Delete { account_number } => {
                self.delete(account_number);
                Ok(Outcome::Deleted)
            }
        };
        if let Err(e) = &result {
            warn!(error = %e, "command rejected");
        }
        result
    }

    /// Lists every account, or a single page of them when `page` is given.
    pub fn list(&self, page: Option<&str>) -> Result<Vec<Account>, Error> {
        match page.filter(|p| !p.is_empty()) {
            None => {
                debug!("listing all accounts");
                Ok(self.store.list())
            }
            Some(raw) => {
                let page = match raw.trim().parse::<usize>() {
                    Ok(page) => page,
                    // Too large to address any page
                    Err(e) if *e.kind() == IntErrorKind::PosOverflow => usize::MAX,
                    Err(_) => {
                        return Err(Error::BadRequest(format!(
                            "p should be a non-negative integer, got `{raw}`"
                        )))
                    }
                };
                debug!(page, page_size = self.page_size.get(), "listing account page");
                self.store.list_page(page, self.page_size)
            }
        }
    }

    pub fn get(&self, account_number: AccountNumber) -> Result<Account, Error> {
        debug!(account_number, "fetching account");
        check_found(self.store.get(account_number))
    }

    pub fn create(&self, account: AccountDto) -> Result<Account, Error> {
        let amount = check_not_null(account.amount, "Amount")?;
        let account = self.store.create(amount);
        info!(
            account_number = account.account_number,
            amount = %account.amount,
            "account created"
        );
        Ok(account)
    }

    /// A missing account is reported as a bad request, not as not-found,
    /// and takes precedence over a missing amount.
    pub fn update(
        &self,
        account_number: AccountNumber,
        account: AccountDto,
    ) -> Result<Account, Error> {
        let updated = self
            .store
            .update_with(account_number, |_| check_not_null(account.amount, "Amount"));
        let account = check_not_null(updated, "Account")??;
        info!(account_number, amount = %account.amount, "account updated");
        Ok(account)
    }

    /// Idempotent; deleting an unknown account succeeds.
    pub fn delete(&self, account_number: AccountNumber) {
        let removed = self.store.delete(account_number);
        info!(account_number, removed, "account deleted");
    }
}
