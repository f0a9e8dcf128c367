mod errors;
mod memory_bank;

pub use errors::BankError;
pub use memory_bank::Bank;
