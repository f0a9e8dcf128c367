use crate::models::Account;
use crate::storage::AccountDirectory;
use crate::types::AccountId;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;

/// In-memory directory. Lookups hand out `Arc`s so no shard lock is held
/// while an account operation runs.
#[derive(Default)]
pub struct AccountStorage {
    accounts: DashMap<AccountId, Arc<Account>>
}

impl AccountStorage {
    pub fn new() -> Self {
        Self {
            accounts: DashMap::new()
        }
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

impl AccountDirectory for AccountStorage {
    fn create(&self, account_id: AccountId, account: Account) -> Result<Arc<Account>, Account> {
        match self.accounts.entry(account_id) {
            Entry::Occupied(_) => Err(account),
            Entry::Vacant(entry) => {
                let account = Arc::new(account);
                entry.insert(account.clone());
                Ok(account)
            }
        }
    }

    fn find(&self, account_id: &AccountId) -> Option<Arc<Account>> {
        self.accounts.get(account_id).map(|entry| entry.value().clone())
    }
}
