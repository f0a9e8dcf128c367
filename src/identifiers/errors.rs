use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdentifierError {
    #[error("Identifier error: BIN [{bin}] must contain only digits")]
    InvalidBin {
        bin: String
    },
    #[error("Identifier error: BIN [{bin}] does not fit in a card number of {length} digits")]
    BinTooLong {
        bin: String,
        length: usize
    },
    #[error("Identifier error: card number length must be at least 1")]
    EmptyCardNumber
}
