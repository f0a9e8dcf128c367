use crate::bank::BankError;
use crate::engine::{Command, Operation};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Account [{account}] was used before being opened")]
    AccountNotOpened {
        account: String,
        operation: Operation
    },
    #[error("Account [{account}] is already open")]
    AccountAlreadyOpen {
        account: String
    },
    #[error("Amount is required for [{operation:?}] on account [{account}]")]
    AmountRequired {
        account: String,
        operation: Operation
    },
    #[error("Reference is required for [{operation:?}] on account [{account}]")]
    ReferenceRequired {
        account: String,
        operation: Operation
    },
    #[error("Reference [{reference}] is not known for account [{account}]")]
    UnknownReference {
        account: String,
        reference: String
    },
    #[error("Reference [{reference}] is already in use for account [{account}]")]
    DuplicateReference {
        account: String,
        reference: String
    },
    #[error("[{operation:?}] on account [{account}] failed: {source}")]
    Bank {
        account: String,
        operation: Operation,
        #[source]
        source: BankError
    }
}

impl CommandError {
    pub fn account_not_opened(command: &Command) -> Self {
        Self::AccountNotOpened { account: command.account.clone(), operation: command.operation }
    }

    pub fn account_already_open(command: &Command) -> Self {
        Self::AccountAlreadyOpen { account: command.account.clone() }
    }

    pub fn amount_required(command: &Command) -> Self {
        Self::AmountRequired { account: command.account.clone(), operation: command.operation }
    }

    pub fn reference_required(command: &Command) -> Self {
        Self::ReferenceRequired { account: command.account.clone(), operation: command.operation }
    }

    pub fn unknown_reference(command: &Command, reference: &str) -> Self {
        Self::UnknownReference { account: command.account.clone(), reference: reference.to_string() }
    }

    pub fn duplicate_reference(command: &Command, reference: &str) -> Self {
        Self::DuplicateReference { account: command.account.clone(), reference: reference.to_string() }
    }

    pub fn bank(command: &Command, source: BankError) -> Self {
        Self::Bank { account: command.account.clone(), operation: command.operation, source }
    }

    /// Distinct code per failure kind; bank failures keep the bank's code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::AccountNotOpened { .. } => "account_not_opened",
            Self::AccountAlreadyOpen { .. } => "account_already_open",
            Self::AmountRequired { .. } => "amount_required",
            Self::ReferenceRequired { .. } => "reference_required",
            Self::UnknownReference { .. } => "unknown_reference",
            Self::DuplicateReference { .. } => "duplicate_reference",
            Self::Bank { source, .. } => source.code()
        }
    }
}
