mod account;
mod errors;
#[cfg(test)]
mod tests;
mod transaction;

pub use account::Account;
pub use errors::{AccountError, TransactionError};
pub use transaction::{Capture, Refund, Transaction};

/// `Created` only exists between construction and authorization inside an
/// account; callers always see `Authorized` or `Cancelled`.
#[derive(Debug, Eq, PartialEq, Clone, Copy)]
pub enum TransactionStatus {
    Created,
    Authorized,
    Cancelled
}
