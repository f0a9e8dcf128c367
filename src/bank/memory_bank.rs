use std::sync::Arc;

use tracing::debug;

use crate::bank::BankError;
use crate::identifiers::{IdentifierGenerator, RandomIdentifierGenerator};
use crate::models::{Account, Transaction};
use crate::storage::{AccountDirectory, AccountStorage};
use crate::types::{AccountId, Amount, TransactionId};

/// Directory of accounts addressed by generated identifiers.
///
/// Every operation looks the account up and hands over to it; the bank holds
/// no lock of its own beyond what the directory needs.
pub struct Bank<D: AccountDirectory = AccountStorage> {
    directory: D,
    generator: Arc<dyn IdentifierGenerator>
}

impl Bank {
    pub fn new() -> Self {
        Self::with_parts(AccountStorage::new(), Arc::new(RandomIdentifierGenerator::default()))
    }
}

impl Default for Bank {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: AccountDirectory> Bank<D> {
    pub fn with_parts(directory: D, generator: Arc<dyn IdentifierGenerator>) -> Self {
        Self {
            directory,
            generator
        }
    }

    /// Opens an account and returns its freshly generated identifier.
    /// Identifiers already present in the directory are skipped.
    pub fn open_account(&self, initial_balance: Amount) -> Result<AccountId, BankError> {
        let mut account = Account::with_generator(initial_balance, self.generator.clone())?;

        loop {
            let account_id = self.generator.new_account_id();

            match self.directory.create(account_id.clone(), account) {
                Ok(_) => {
                    debug!("Account [{account_id}] opened with balance [{initial_balance}]");
                    return Ok(account_id);
                }
                Err(rejected) => {
                    debug!("Account id [{account_id}] already taken, generating another");
                    account = rejected;
                }
            }
        }
    }

    pub fn deposit(&self, account_id: &AccountId, amount: Amount) -> Result<(), BankError> {
        Ok(self.account(account_id)?.deposit(amount)?)
    }

    pub fn withdraw(&self, account_id: &AccountId, amount: Amount) -> Result<(), BankError> {
        Ok(self.account(account_id)?.withdraw(amount)?)
    }

    pub fn balance(&self, account_id: &AccountId) -> Result<Amount, BankError> {
        Ok(self.account(account_id)?.balance())
    }

    pub fn authorized_amount(&self, account_id: &AccountId) -> Result<Amount, BankError> {
        Ok(self.account(account_id)?.authorized_amount())
    }

    pub fn authorize(&self, account_id: &AccountId, amount: Amount) -> Result<TransactionId, BankError> {
        Ok(self.account(account_id)?.authorize(amount)?)
    }

    pub fn capture(&self, account_id: &AccountId, transaction_id: TransactionId, amount: Amount) -> Result<(), BankError> {
        Ok(self.account(account_id)?.capture(transaction_id, amount)?)
    }

    pub fn cancel(&self, account_id: &AccountId, transaction_id: TransactionId) -> Result<(), BankError> {
        Ok(self.account(account_id)?.cancel(transaction_id)?)
    }

    pub fn refund(&self, account_id: &AccountId, transaction_id: TransactionId, amount: Amount) -> Result<(), BankError> {
        Ok(self.account(account_id)?.refund(transaction_id, amount)?)
    }

    pub fn transaction(&self, account_id: &AccountId, transaction_id: TransactionId) -> Result<Transaction, BankError> {
        Ok(self.account(account_id)?.transaction(transaction_id)?)
    }

    fn account(&self, account_id: &AccountId) -> Result<Arc<Account>, BankError> {
        self.directory.find(account_id)
            .ok_or_else(|| BankError::AccountNotFound { account_id: account_id.clone() })
    }
}
