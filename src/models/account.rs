use crate::identifiers::{IdentifierGenerator, RandomIdentifierGenerator};
use crate::models::errors::AccountError;
use crate::models::Transaction;
use crate::types::{Amount, TransactionId};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Balances and authorizations of a single account.
///
/// Every operation takes the account's own lock for its whole duration, so
/// concurrent callers never observe a half-applied update and accounts never
/// contend with each other. Errors are returned before anything is mutated.
pub struct Account {
    state: Mutex<AccountState>,
    generator: Arc<dyn IdentifierGenerator>
}

struct AccountState {
    /// Funds available for withdrawal or new authorizations.
    balance: Amount,
    /// Funds held by authorizations that are neither captured nor released.
    authorized_amount: Amount,
    /// Every authorization ever made on the account, mapped by transaction ID.
    transactions: HashMap<TransactionId, Transaction>
}

impl Account {
    /// Opens an account with `initial_balance` and random authorization codes.
    pub fn new(initial_balance: Amount) -> Result<Self, AccountError> {
        Self::with_generator(initial_balance, Arc::new(RandomIdentifierGenerator::default()))
    }

    pub fn with_generator(initial_balance: Amount, generator: Arc<dyn IdentifierGenerator>) -> Result<Self, AccountError> {
        validate_amount(initial_balance)?;

        Ok(Self {
            state: Mutex::new(AccountState {
                balance: initial_balance,
                authorized_amount: 0,
                transactions: HashMap::new()
            }),
            generator
        })
    }

    pub fn deposit(&self, amount: Amount) -> Result<(), AccountError> {
        validate_amount(amount)?;

        let mut state = self.state.lock();
        state.balance = state.credit(amount)?;

        Ok(())
    }

    /// # Errors
    /// - `InvalidAmount` for a negative amount.
    /// - `InsufficientFunds` if the balance does not cover `amount`.
    pub fn withdraw(&self, amount: Amount) -> Result<(), AccountError> {
        validate_amount(amount)?;

        let mut state = self.state.lock();
        state.check_available(amount)?;
        state.balance -= amount;

        Ok(())
    }

    pub fn balance(&self) -> Amount {
        self.state.lock().balance
    }

    pub fn authorized_amount(&self) -> Amount {
        self.state.lock().authorized_amount
    }

    /// Places a hold of `amount`, moving it from the balance into the
    /// authorized amount, and returns the new transaction's id.
    ///
    /// # Errors
    /// - `InvalidAmount` for a negative amount.
    /// - `InsufficientFunds` if the balance does not cover `amount`.
    pub fn authorize(&self, amount: Amount) -> Result<TransactionId, AccountError> {
        validate_amount(amount)?;

        let mut state = self.state.lock();
        state.check_available(amount)?;

        let transaction_id = state.fresh_transaction_id(self.generator.as_ref());
        let mut transaction = Transaction::new(transaction_id, amount, self.generator.new_authorization_code());
        transaction.authorize();

        state.balance -= amount;
        state.authorized_amount += amount;
        state.transactions.insert(transaction_id, transaction);

        Ok(transaction_id)
    }

    /// Settles `amount` of an authorization. The funds already left the
    /// balance at authorization, so only the hold shrinks.
    ///
    /// # Errors
    /// - `InvalidAmount` for a negative amount.
    /// - `TransactionNotFound` for an unknown transaction.
    /// - Any `TransactionError` raised by the capture itself.
    pub fn capture(&self, transaction_id: TransactionId, amount: Amount) -> Result<(), AccountError> {
        validate_amount(amount)?;

        let mut state = self.state.lock();
        let capture = state.transaction_mut(transaction_id)?.capture(amount)?;
        state.reduce_hold(capture.amount);

        Ok(())
    }

    /// Voids an authorization and returns its hold to the balance. Cancelling
    /// an already cancelled transaction succeeds without releasing anything.
    ///
    /// # Errors
    /// - `TransactionNotFound` for an unknown transaction.
    /// - `CancelationNotAuthorized` or `CannotCancelCapturedTransaction` from
    ///   the transaction.
    pub fn cancel(&self, transaction_id: TransactionId) -> Result<(), AccountError> {
        let mut state = self.state.lock();
        let transaction = state.transaction_mut(transaction_id)?;

        if transaction.cancel()? {
            let amount = transaction.amount();
            state.release_hold(amount);
        }

        Ok(())
    }

    /// Returns previously captured funds to the balance.
    ///
    /// # Errors
    /// - `InvalidAmount` for a negative amount.
    /// - `TransactionNotFound` for an unknown transaction.
    /// - `CannotRefundMoreThanCaptured` from the transaction.
    /// - `Overflow` if the account total would no longer fit.
    pub fn refund(&self, transaction_id: TransactionId, amount: Amount) -> Result<(), AccountError> {
        validate_amount(amount)?;

        let mut state = self.state.lock();
        state.transaction(transaction_id)?.check_refund(amount)?;

        let balance = state.credit(amount)?;
        state.transaction_mut(transaction_id)?.refund(amount)?;
        state.balance = balance;

        Ok(())
    }

    /// Snapshot of a transaction and its capture/refund history.
    pub fn transaction(&self, transaction_id: TransactionId) -> Result<Transaction, AccountError> {
        self.state.lock().transaction(transaction_id).cloned()
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();

        formatter.debug_struct("Account")
            .field("balance", &state.balance)
            .field("authorized_amount", &state.authorized_amount)
            .field("transactions", &state.transactions.len())
            .finish_non_exhaustive()
    }
}

impl AccountState {
    fn check_available(&self, amount: Amount) -> Result<(), AccountError> {
        if self.balance < amount {
            return Err(AccountError::InsufficientFunds { available: self.balance, requested: amount });
        }

        Ok(())
    }

    /// New balance after adding `amount`. The sum of balance and holds has to
    /// stay representable, which keeps every later release overflow-free.
    fn credit(&self, amount: Amount) -> Result<Amount, AccountError> {
        let balance = self.balance.checked_add(amount)
            .filter(|balance| balance.checked_add(self.authorized_amount).is_some())
            .ok_or(AccountError::Overflow { amount })?;

        Ok(balance)
    }

    fn transaction(&self, transaction_id: TransactionId) -> Result<&Transaction, AccountError> {
        self.transactions.get(&transaction_id)
            .ok_or(AccountError::TransactionNotFound { transaction_id })
    }

    fn transaction_mut(&mut self, transaction_id: TransactionId) -> Result<&mut Transaction, AccountError> {
        self.transactions.get_mut(&transaction_id)
            .ok_or(AccountError::TransactionNotFound { transaction_id })
    }

    fn fresh_transaction_id(&self, generator: &dyn IdentifierGenerator) -> TransactionId {
        loop {
            let transaction_id = generator.new_transaction_id();

            if !self.transactions.contains_key(&transaction_id) {
                return transaction_id;
            }
        }
    }

    fn reduce_hold(&mut self, amount: Amount) {
        // Captures never exceed their authorization, so the hold always covers them.
        debug_assert!(
            self.authorized_amount >= amount,
            "hold of {} cannot cover a capture of {}",
            self.authorized_amount,
            amount
        );

        self.authorized_amount -= amount;
    }

    fn release_hold(&mut self, amount: Amount) {
        debug_assert!(self.authorized_amount >= amount);

        self.authorized_amount -= amount;
        self.balance += amount;
    }
}

fn validate_amount(amount: Amount) -> Result<(), AccountError> {
    if amount < 0 {
        return Err(AccountError::InvalidAmount { amount });
    }

    Ok(())
}
