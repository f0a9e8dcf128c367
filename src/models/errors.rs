use crate::types::{Amount, TransactionId};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransactionError {
    #[error("Transaction [{transaction_id}] is not authorized and cannot be captured")]
    CaptureNotAuthorized {
        transaction_id: TransactionId
    },
    #[error("Cannot capture [{requested}] on transaction [{transaction_id}]: [{captured}] of [{authorized}] already captured")]
    CannotCaptureMoreThanAuthorized {
        transaction_id: TransactionId,
        authorized: Amount,
        captured: Amount,
        requested: Amount
    },
    #[error("Transaction [{transaction_id}] is not authorized and cannot be cancelled")]
    CancelationNotAuthorized {
        transaction_id: TransactionId
    },
    #[error("Transaction [{transaction_id}] has captures and cannot be cancelled")]
    CannotCancelCapturedTransaction {
        transaction_id: TransactionId
    },
    #[error("Cannot refund [{requested}] on transaction [{transaction_id}]: [{refunded}] of [{captured}] captured already refunded")]
    CannotRefundMoreThanCaptured {
        transaction_id: TransactionId,
        captured: Amount,
        refunded: Amount,
        requested: Amount
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AccountError {
    #[error("Invalid amount [{amount}]: amounts must not be negative")]
    InvalidAmount {
        amount: Amount
    },
    #[error("Insufficient funds: [{requested}] requested, [{available}] available")]
    InsufficientFunds {
        available: Amount,
        requested: Amount
    },
    #[error("Transaction [{transaction_id}] was not found")]
    TransactionNotFound {
        transaction_id: TransactionId
    },
    #[error("Numeric overflow applying [{amount}] to the balance")]
    Overflow {
        amount: Amount
    },
    #[error(transparent)]
    Transaction(#[from] TransactionError)
}
