mod errors;
mod generator;

use uuid::Uuid;

use crate::types::{AccountId, TransactionId};

pub use errors::IdentifierError;
pub use generator::{luhn_check_digit, RandomIdentifierGenerator};

/// Source of every opaque token the bank hands out.
///
/// Formats are not meaningful to the account logic; implementations only need
/// to be cheap and safe to call from many threads at once.
pub trait IdentifierGenerator: Send + Sync + 'static {
    fn new_account_id(&self) -> AccountId;
    fn new_authorization_code(&self) -> String;

    fn new_transaction_id(&self) -> TransactionId {
        Uuid::new_v4()
    }
}
