use crate::models::errors::TransactionError;
use crate::models::TransactionStatus;
use crate::types::{Amount, TransactionId};

/// A settlement of part or all of an authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capture {
    pub amount: Amount
}

/// Captured funds returned to the account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Refund {
    pub amount: Amount
}

/// One authorization and everything settled or returned against it.
///
/// Read-only outside the crate: the owning account drives every capture,
/// cancellation and refund so its balance and hold move together with the
/// transaction. Captures and refunds are append-only. Accounts keep
/// transactions for their whole lifetime so later capture and refund calls can
/// still be checked against the history.
#[derive(Debug, Clone)]
pub struct Transaction {
    id: TransactionId,
    amount: Amount,
    status: TransactionStatus,
    authorization_code: String,
    captures: Vec<Capture>,
    refunds: Vec<Refund>
}

impl Transaction {
    pub(crate) fn new(id: TransactionId, amount: Amount, authorization_code: String) -> Self {
        debug_assert!(amount >= 0, "transaction amount must not be negative");

        Self {
            id,
            amount,
            status: TransactionStatus::Created,
            authorization_code,
            captures: Vec::new(),
            refunds: Vec::new()
        }
    }

    /// Moves a freshly created transaction into `Authorized`.
    pub(crate) fn authorize(&mut self) {
        debug_assert_eq!(self.status, TransactionStatus::Created);
        self.status = TransactionStatus::Authorized;
    }

    pub fn id(&self) -> TransactionId {
        self.id
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn status(&self) -> TransactionStatus {
        self.status
    }

    pub fn authorization_code(&self) -> &str {
        &self.authorization_code
    }

    pub fn captures(&self) -> &[Capture] {
        &self.captures
    }

    pub fn refunds(&self) -> &[Refund] {
        &self.refunds
    }

    pub fn captured_amount(&self) -> Amount {
        self.captures.iter().map(|capture| capture.amount).sum()
    }

    pub fn refunded_amount(&self) -> Amount {
        self.refunds.iter().map(|refund| refund.amount).sum()
    }

    pub fn is_authorized(&self) -> bool {
        self.status == TransactionStatus::Authorized
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == TransactionStatus::Cancelled
    }

    pub fn has_captures(&self) -> bool {
        !self.captures.is_empty()
    }

    /// Settles `amount` of the authorization. Any number of partial captures
    /// is accepted as long as their sum stays within the authorized amount.
    ///
    /// # Errors
    /// - `CaptureNotAuthorized` unless the transaction is `Authorized`.
    /// - `CannotCaptureMoreThanAuthorized` if the captures would exceed `amount`.
    pub(crate) fn capture(&mut self, amount: Amount) -> Result<Capture, TransactionError> {
        debug_assert!(amount >= 0, "capture amount must not be negative");

        if !self.is_authorized() {
            return Err(TransactionError::CaptureNotAuthorized { transaction_id: self.id });
        }

        let captured = self.captured_amount();

        if amount > self.amount - captured {
            return Err(TransactionError::CannotCaptureMoreThanAuthorized {
                transaction_id: self.id,
                authorized: self.amount,
                captured,
                requested: amount
            });
        }

        let capture = Capture { amount };
        self.captures.push(capture);

        Ok(capture)
    }

    /// Voids the authorization.
    ///
    /// Returns `true` when this call moved the transaction to `Cancelled` and
    /// `false` when it was already cancelled, so callers release the hold once.
    ///
    /// # Errors
    /// - `CancelationNotAuthorized` unless the transaction is `Authorized`.
    /// - `CannotCancelCapturedTransaction` once anything has been captured.
    pub(crate) fn cancel(&mut self) -> Result<bool, TransactionError> {
        if self.is_cancelled() {
            return Ok(false);
        }

        if !self.is_authorized() {
            return Err(TransactionError::CancelationNotAuthorized { transaction_id: self.id });
        }

        if self.has_captures() {
            return Err(TransactionError::CannotCancelCapturedTransaction { transaction_id: self.id });
        }

        self.status = TransactionStatus::Cancelled;

        Ok(true)
    }

    /// Checks that `amount` still fits within the captured funds not yet
    /// refunded, without recording anything.
    ///
    /// # Errors
    /// - `CannotRefundMoreThanCaptured` if the refunds would exceed the captures.
    pub(crate) fn check_refund(&self, amount: Amount) -> Result<(), TransactionError> {
        debug_assert!(amount >= 0, "refund amount must not be negative");

        let captured = self.captured_amount();
        let refunded = self.refunded_amount();

        if amount > captured - refunded {
            return Err(TransactionError::CannotRefundMoreThanCaptured {
                transaction_id: self.id,
                captured,
                refunded,
                requested: amount
            });
        }

        Ok(())
    }

    /// Returns `amount` of the captured funds. Status is not checked: a
    /// transaction without captures has nothing to refund.
    ///
    /// # Errors
    /// - `CannotRefundMoreThanCaptured` if the refunds would exceed the captures.
    pub(crate) fn refund(&mut self, amount: Amount) -> Result<Refund, TransactionError> {
        self.check_refund(amount)?;

        let refund = Refund { amount };
        self.refunds.push(refund);

        Ok(refund)
    }
}
