use serde::Deserialize;

use crate::types::Amount;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Open,
    Deposit,
    Withdraw,
    Authorize,
    Capture,
    Cancel,
    Refund
}

/// A single row of a bank script.
///
/// `account` is an alias local to the script; the bank generates the real
/// account identifier when the alias is opened. `reference` names an
/// authorization so later captures, cancels and refunds can point back at it.
#[derive(Debug, Clone, Deserialize)]
pub struct Command {
    #[serde(rename = "op")]
    pub operation: Operation,
    pub account: String,
    #[serde(rename = "ref")]
    pub reference: Option<String>,
    pub amount: Option<Amount>
}
