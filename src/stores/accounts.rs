use parking_lot::Mutex;
use rust_decimal::Decimal;
use serde::Serialize;
use std::num::NonZeroUsize;

use super::pagination;
use crate::Error;

pub type AccountNumber = u64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub account_number: AccountNumber,
    pub amount: Decimal,
}

/// Collection and identifier counter, always mutated together.
#[derive(Debug)]
struct Inner {
    accounts: Vec<Account>,
    next_account_number: AccountNumber,
}

impl Inner {
    fn find_mut(&mut self, account_number: AccountNumber) -> Option<&mut Account> {
        self.accounts
            .iter_mut()
            .find(|account| account.account_number == account_number)
    }
}

/// In-memory, insertion-ordered account collection shared between requests.
///
/// Every operation takes the lock exactly once, so readers never observe a
/// half-applied mutation and identifier allocation is atomic with the append.
#[derive(Debug)]
pub struct AccountsStore {
    inner: Mutex<Inner>,
}

impl Default for AccountsStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AccountsStore {
    pub fn new() -> Self {
        Self::starting_at(0)
    }

    /// Creates an empty store whose first account receives `first_account_number`.
    pub fn starting_at(first_account_number: AccountNumber) -> Self {
        Self {
            inner: Mutex::new(Inner {
                accounts: Vec::new(),
                next_account_number: first_account_number,
            }),
        }
    }

    /// Snapshot of all accounts in insertion order.
    pub fn list(&self) -> Vec<Account> {
        self.inner.lock().accounts.clone()
    }

    /// Snapshot of one page of the current list.
    pub fn list_page(&self, page: usize, page_size: NonZeroUsize) -> Result<Vec<Account>, Error> {
        let inner = self.inner.lock();
        pagination::page(&inner.accounts, page, page_size).map(<[Account]>::to_vec)
    }

    pub fn get(&self, account_number: AccountNumber) -> Option<Account> {
        self.inner
            .lock()
            .accounts
            .iter()
            .find(|account| account.account_number == account_number)
            .cloned()
    }

    /// Allocates the next account number and appends a new account.
    /// Account numbers are never reused, even after deletion.
    pub fn create(&self, amount: Decimal) -> Account {
        let mut inner = self.inner.lock();
        let account = Account {
            account_number: inner.next_account_number,
            amount,
        };
        inner.next_account_number += 1;
        inner.accounts.push(account.clone());
        account
    }

    /// Replaces the amount of an existing account.
    /// Returns the updated account, or `None` if it doesn't exist.
    pub fn update(&self, account_number: AccountNumber, amount: Decimal) -> Option<Account> {
        let mut inner = self.inner.lock();
        let account = inner.find_mut(account_number)?;
        account.amount = amount;
        Some(account.clone())
    }

    /// Looks up an account and lets `f` replace its amount, under one lock.
    /// Returns `None` if the account doesn't exist; `f` is not called then.
    /// When `f` fails the amount is left as it was.
    pub fn update_with<F, E>(&self, account_number: AccountNumber, f: F) -> Option<Result<Account, E>>
    where
        F: FnOnce(Decimal) -> Result<Decimal, E>,
    {
        let mut inner = self.inner.lock();
        let account = inner.find_mut(account_number)?;
        Some(f(account.amount).map(|amount| {
            account.amount = amount;
            account.clone()
        }))
    }

    /// Removes the account if present. Returns whether anything was removed;
    /// deleting an unknown account is not an error.
    pub fn delete(&self, account_number: AccountNumber) -> bool {
        let mut inner = self.inner.lock();
        let before = inner.accounts.len();
        inner
            .accounts
            .retain(|account| account.account_number != account_number);
        inner.accounts.len() != before
    }

    pub fn len(&self) -> usize {
        self.inner.lock().accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    fn page_size(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn test_new_store_is_empty() {
        let store = AccountsStore::new();
        assert!(store.is_empty());
        assert!(store.list().is_empty());
        assert_eq!(store.get(0), None);
    }

    #[test]
    fn test_create_assigns_sequential_numbers() {
        let store = AccountsStore::new();

        let first = store.create(dec!(10.00));
        let second = store.create(dec!(5.00));
        let third = store.create(dec!(7.00));

        assert_eq!(first.account_number, 0);
        assert_eq!(second.account_number, 1);
        assert_eq!(third.account_number, 2);
        assert_eq!(store.list(), vec![first, second, third]);
    }

    #[test]
    fn test_create_from_configured_base() {
        let store = AccountsStore::starting_at(1000);
        assert_eq!(store.create(dec!(1)).account_number, 1000);
        assert_eq!(store.create(dec!(2)).account_number, 1001);
    }

    #[test]
    fn test_get_after_create_returns_same_amount() {
        let store = AccountsStore::new();
        let created = store.create(dec!(100.50));

        let fetched = store.get(created.account_number).unwrap();
        assert_eq!(fetched.amount, dec!(100.50));
        assert_eq!(fetched, created);
    }

    #[test]
    fn test_update_replaces_amount_only() {
        let store = AccountsStore::new();
        let created = store.create(dec!(10));

        let updated = store.update(created.account_number, dec!(42.42)).unwrap();
        assert_eq!(updated.account_number, created.account_number);
        assert_eq!(updated.amount, dec!(42.42));

        // Verify change persists
        assert_eq!(store.get(created.account_number).unwrap().amount, dec!(42.42));
    }

    #[test]
    fn test_update_nonexistent_account() {
        let store = AccountsStore::new();
        assert_eq!(store.update(5, dec!(3.00)), None);
        assert!(store.is_empty());
    }

    #[test]
    fn test_update_with_replaces_amount() {
        let store = AccountsStore::new();
        let created = store.create(dec!(10));

        let updated = store
            .update_with(created.account_number, |old| Ok::<_, Error>(old + dec!(0.50)))
            .unwrap()
            .unwrap();
        assert_eq!(updated.amount, dec!(10.50));
        assert_eq!(store.get(created.account_number).unwrap().amount, dec!(10.50));
    }

    #[test]
    fn test_update_with_failure_keeps_amount() {
        let store = AccountsStore::new();
        let created = store.create(dec!(10));

        let result = store.update_with(created.account_number, |_| Err(Error::missing("Amount")));
        assert_eq!(result, Some(Err(Error::missing("Amount"))));
        assert_eq!(store.get(created.account_number).unwrap().amount, dec!(10));
    }

    #[test]
    fn test_update_with_skips_missing_account() {
        let store = AccountsStore::new();
        let mut called = false;
        let result = store.update_with(5, |amount| {
            called = true;
            Ok::<_, Error>(amount)
        });
        assert_eq!(result, None);
        assert!(!called);
    }

    #[test]
    fn test_delete_is_idempotent() {
        let store = AccountsStore::new();
        let account = store.create(dec!(1));

        assert!(store.delete(account.account_number));
        assert_eq!(store.get(account.account_number), None);

        // Second delete is a no-op
        assert!(!store.delete(account.account_number));
        assert!(!store.delete(99));
    }

    #[test]
    fn test_account_numbers_not_reused_after_delete() {
        let store = AccountsStore::new();
        let first = store.create(dec!(1));
        let second = store.create(dec!(2));
        store.delete(first.account_number);
        store.delete(second.account_number);

        assert_eq!(store.create(dec!(3)).account_number, 2);
    }

    #[test]
    fn test_len_tracks_creates_minus_deletes() {
        let store = AccountsStore::new();
        for i in 0..10 {
            store.create(Decimal::from(i));
        }
        store.delete(3);
        store.delete(7);
        store.delete(7);
        store.delete(1234);
        assert_eq!(store.len(), 8);
        assert_eq!(store.list().len(), 8);
    }

    #[test]
    fn test_list_preserves_insertion_order_after_delete() {
        let store = AccountsStore::new();
        for i in 0..5 {
            store.create(Decimal::from(i));
        }
        store.delete(2);

        let numbers: Vec<_> = store.list().iter().map(|a| a.account_number).collect();
        assert_eq!(numbers, vec![0, 1, 3, 4]);
    }

    #[test]
    fn test_list_page() {
        let store = AccountsStore::new();
        let a = store.create(dec!(10.00));
        let b = store.create(dec!(5.00));
        let c = store.create(dec!(7.00));

        assert_eq!(store.list_page(0, page_size(2)).unwrap(), vec![a, b]);
        assert_eq!(store.list_page(1, page_size(2)).unwrap(), vec![c]);
        assert_eq!(
            store.list_page(2, page_size(2)),
            Err(Error::OutOfRange { page: 2, pages: 2 })
        );
    }

    #[test]
    fn test_list_page_reflects_current_state() {
        let store = AccountsStore::new();
        for i in 0..4 {
            store.create(Decimal::from(i));
        }
        assert_eq!(store.list_page(1, page_size(2)).unwrap()[0].account_number, 2);

        // Deleting from the first page shifts the boundaries
        store.delete(0);
        assert_eq!(store.list_page(1, page_size(2)).unwrap()[0].account_number, 3);
    }

    #[test]
    fn test_concurrent_creates_produce_distinct_numbers() {
        let store = Arc::new(AccountsStore::new());

        let handles: Vec<_> = (0..100)
            .map(|i| {
                let store = Arc::clone(&store);
                thread::spawn(move || store.create(Decimal::from(i)).account_number)
            })
            .collect();

        let numbers: HashSet<AccountNumber> =
            handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(numbers.len(), 100);
        assert_eq!(numbers, (0..100).collect());
        assert_eq!(store.len(), 100);
    }

    #[test]
    fn test_concurrent_mixed_operations_keep_store_consistent() {
        let store = Arc::new(AccountsStore::new());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for i in 0..50 {
                        let account = store.create(Decimal::from(i));
                        store.update(account.account_number, Decimal::from(i * 2));
                        if i % 2 == 0 {
                            store.delete(account.account_number);
                        }
                        let _ = store.list_page(0, NonZeroUsize::MIN);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let accounts = store.list();
        assert_eq!(accounts.len(), 8 * 25);
        let unique: HashSet<_> = accounts.iter().map(|a| a.account_number).collect();
        assert_eq!(unique.len(), accounts.len());
        // Insertion order follows allocation order
        assert!(accounts
            .windows(2)
            .all(|pair| pair[0].account_number < pair[1].account_number));
    }
}
