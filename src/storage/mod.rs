mod account_storage;

use std::sync::Arc;

use crate::models::Account;
use crate::types::AccountId;

pub use account_storage::AccountStorage;

/// Where the bank keeps its accounts. Accounts are never removed.
pub trait AccountDirectory: Send + Sync + 'static {
    /// Registers `account` under `account_id`, handing the account back if the
    /// identifier is already taken.
    fn create(&self, account_id: AccountId, account: Account) -> Result<Arc<Account>, Account>;
    fn find(&self, account_id: &AccountId) -> Option<Arc<Account>>;
}
