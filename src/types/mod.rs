
use std::fmt;
use std::fmt::{Display, Formatter};

use serde::Serialize;
use uuid::Uuid;

/// Whole currency units. Every balance, hold and transaction amount uses it.
pub type Amount = i64;

pub type TransactionId = Uuid;

/// Opaque identifier addressing an account in the bank directory.
///
/// The default generator produces card-number-like digit strings, but nothing
/// in the account logic depends on the format.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for AccountId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

impl From<String> for AccountId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for AccountId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}
