use crate::models::{AccountError, TransactionError};
use crate::types::AccountId;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BankError {
    #[error("Account [{account_id}] does not exist")]
    AccountNotFound {
        account_id: AccountId
    },
    #[error(transparent)]
    Account(#[from] AccountError)
}

impl BankError {
    /// Stable, distinct code per failure kind for anything that reports
    /// failures outside the process.
    pub fn code(&self) -> &'static str {
        match self {
            Self::AccountNotFound { .. } => "account_not_found",
            Self::Account(AccountError::InvalidAmount { .. }) => "invalid_amount",
            Self::Account(AccountError::InsufficientFunds { .. }) => "insufficient_funds",
            Self::Account(AccountError::TransactionNotFound { .. }) => "transaction_not_found",
            Self::Account(AccountError::Overflow { .. }) => "overflow",
            Self::Account(AccountError::Transaction(error)) => match error {
                TransactionError::CaptureNotAuthorized { .. } => "capture_not_authorized",
                TransactionError::CannotCaptureMoreThanAuthorized { .. } => "cannot_capture_more_than_authorized",
                TransactionError::CancelationNotAuthorized { .. } => "cancelation_not_authorized",
                TransactionError::CannotCancelCapturedTransaction { .. } => "cannot_cancel_captured_transaction",
                TransactionError::CannotRefundMoreThanCaptured { .. } => "cannot_refund_more_than_captured"
            }
        }
    }
}
