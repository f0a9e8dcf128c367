use std::collections::HashMap;

use serde::Serialize;

use crate::bank::Bank;
use crate::engine::{Command, CommandError, Operation};
use crate::types::{AccountId, Amount, TransactionId};

/// Final state of one scripted account, serialized as one results row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountSummary {
    #[serde(rename = "account")]
    pub alias: String,
    #[serde(rename = "number")]
    pub account_id: AccountId,
    pub balance: Amount,
    #[serde(rename = "authorized")]
    pub authorized_amount: Amount
}

/// Script-side view of one account alias: the identifier the bank generated
/// for it and the authorizations its references point at.
#[derive(Debug)]
pub struct AccountSession {
    alias: String,
    account_id: Option<AccountId>,
    references: HashMap<String, TransactionId>
}

impl AccountSession {
    pub fn new(alias: String) -> Self {
        Self {
            alias,
            account_id: None,
            references: HashMap::new()
        }
    }

    /// Applies one script row against the bank.
    ///
    /// # Errors
    /// Returns `CommandError` if the row is incomplete, refers to an alias or
    /// reference that does not exist yet, or the bank rejects the operation.
    pub fn apply(&mut self, bank: &Bank, command: &Command) -> Result<(), CommandError> {
        match command.operation {
            Operation::Open => self.open(bank, command),
            Operation::Deposit => {
                let account_id = self.opened(command)?;
                bank.deposit(account_id, required_amount(command)?)
                    .map_err(|error| CommandError::bank(command, error))
            }
            Operation::Withdraw => {
                let account_id = self.opened(command)?;
                bank.withdraw(account_id, required_amount(command)?)
                    .map_err(|error| CommandError::bank(command, error))
            }
            Operation::Authorize => self.authorize(bank, command),
            Operation::Capture => {
                let account_id = self.opened(command)?;
                let transaction_id = self.resolve(command)?;
                bank.capture(account_id, transaction_id, required_amount(command)?)
                    .map_err(|error| CommandError::bank(command, error))
            }
            Operation::Cancel => {
                let account_id = self.opened(command)?;
                let transaction_id = self.resolve(command)?;
                bank.cancel(account_id, transaction_id)
                    .map_err(|error| CommandError::bank(command, error))
            }
            Operation::Refund => {
                let account_id = self.opened(command)?;
                let transaction_id = self.resolve(command)?;
                bank.refund(account_id, transaction_id, required_amount(command)?)
                    .map_err(|error| CommandError::bank(command, error))
            }
        }
    }

    /// `None` for an alias that was never opened.
    pub fn summary(&self, bank: &Bank) -> Option<AccountSummary> {
        let account_id = self.account_id.clone()?;

        Some(AccountSummary {
            alias: self.alias.clone(),
            balance: bank.balance(&account_id).ok()?,
            authorized_amount: bank.authorized_amount(&account_id).ok()?,
            account_id
        })
    }

    fn open(&mut self, bank: &Bank, command: &Command) -> Result<(), CommandError> {
        if self.account_id.is_some() {
            return Err(CommandError::account_already_open(command));
        }

        let account_id = bank.open_account(command.amount.unwrap_or_default())
            .map_err(|error| CommandError::bank(command, error))?;

        self.account_id = Some(account_id);

        Ok(())
    }

    fn authorize(&mut self, bank: &Bank, command: &Command) -> Result<(), CommandError> {
        let account_id = self.opened(command)?;
        let reference = required_reference(command)?;

        if self.references.contains_key(reference) {
            return Err(CommandError::duplicate_reference(command, reference));
        }

        let transaction_id = bank.authorize(account_id, required_amount(command)?)
            .map_err(|error| CommandError::bank(command, error))?;

        self.references.insert(reference.to_string(), transaction_id);

        Ok(())
    }

    fn opened(&self, command: &Command) -> Result<&AccountId, CommandError> {
        self.account_id.as_ref().ok_or_else(|| CommandError::account_not_opened(command))
    }

    fn resolve(&self, command: &Command) -> Result<TransactionId, CommandError> {
        let reference = required_reference(command)?;

        self.references.get(reference).copied()
            .ok_or_else(|| CommandError::unknown_reference(command, reference))
    }
}

fn required_amount(command: &Command) -> Result<Amount, CommandError> {
    command.amount.ok_or_else(|| CommandError::amount_required(command))
}

fn required_reference(command: &Command) -> Result<&str, CommandError> {
    command.reference.as_deref()
        .filter(|reference| !reference.is_empty())
        .ok_or_else(|| CommandError::reference_required(command))
}
