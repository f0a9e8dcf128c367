//! In-memory payment bank: accounts with a spendable balance and held
//! authorizations that can be captured, cancelled and refunded.

pub mod actors;
pub mod bank;
pub mod engine;
pub mod identifiers;
pub mod models;
pub mod storage;
pub mod types;

pub use bank::{Bank, BankError};
pub use models::{Account, AccountError, Transaction, TransactionError, TransactionStatus};
pub use types::{AccountId, Amount, TransactionId};
