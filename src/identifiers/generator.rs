use rand::Rng;

use crate::identifiers::errors::IdentifierError;
use crate::identifiers::IdentifierGenerator;
use crate::types::AccountId;

const DEFAULT_CARD_LENGTH: usize = 15;
const AUTHORIZATION_CODE_LENGTH: usize = 6;

/// Produces card-number-like account ids (Luhn check digit appended) and
/// numeric authorization codes from the thread-local RNG.
#[derive(Debug, Clone)]
pub struct RandomIdentifierGenerator {
    /// Digits before the check digit, BIN included.
    length: usize,
    bin: Vec<u8>
}

impl RandomIdentifierGenerator {
    pub fn new(length: usize) -> Result<Self, IdentifierError> {
        if length == 0 {
            return Err(IdentifierError::EmptyCardNumber);
        }

        Ok(Self { length, bin: Vec::new() })
    }

    /// Every generated account id starts with `bin`.
    pub fn with_bin(bin: &str, length: usize) -> Result<Self, IdentifierError> {
        let mut generator = Self::new(length)?;

        let digits = bin.chars()
            .map(|c| c.to_digit(10).map(|d| d as u8))
            .collect::<Option<Vec<u8>>>()
            .filter(|digits| !digits.is_empty())
            .ok_or_else(|| IdentifierError::InvalidBin { bin: bin.to_string() })?;

        if digits.len() > length {
            return Err(IdentifierError::BinTooLong { bin: bin.to_string(), length });
        }

        generator.bin = digits;

        Ok(generator)
    }

    fn card_number(&self) -> String {
        let mut rng = rand::thread_rng();
        let mut digits = self.bin.clone();

        digits.extend((digits.len()..self.length).map(|_| rng.gen_range(0..10u8)));
        digits.push(luhn_check_digit(&digits));

        concat(&digits)
    }
}

impl Default for RandomIdentifierGenerator {
    fn default() -> Self {
        Self { length: DEFAULT_CARD_LENGTH, bin: Vec::new() }
    }
}

impl IdentifierGenerator for RandomIdentifierGenerator {
    fn new_account_id(&self) -> AccountId {
        AccountId::new(self.card_number())
    }

    fn new_authorization_code(&self) -> String {
        let mut rng = rand::thread_rng();
        let digits: Vec<u8> = (0..AUTHORIZATION_CODE_LENGTH).map(|_| rng.gen_range(0..10u8)).collect();

        concat(&digits)
    }
}

/// Check digit that makes `payload` followed by it pass the Luhn test.
pub fn luhn_check_digit(payload: &[u8]) -> u8 {
    // The digit right before the check digit is the first one doubled.
    let sum: u32 = payload.iter().rev().enumerate()
        .map(|(position, &digit)| {
            let digit = u32::from(digit);

            if position % 2 == 0 {
                let doubled = digit * 2;
                if doubled > 9 { doubled - 9 } else { doubled }
            } else {
                digit
            }
        })
        .sum();

    ((10 - sum % 10) % 10) as u8
}

fn concat(digits: &[u8]) -> String {
    digits.iter().map(|digit| char::from(b'0' + digit)).collect()
}
