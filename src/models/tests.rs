use super::{Account, AccountError, Transaction, TransactionError, TransactionStatus};

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;

use anyhow::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use uuid::Uuid;

use crate::identifiers::IdentifierGenerator;
use crate::types::{AccountId, Amount, TransactionId};

struct SequentialGenerator {
    counter: AtomicU64
}

impl SequentialGenerator {
    fn new() -> Self {
        Self { counter: AtomicU64::new(1) }
    }
}

impl IdentifierGenerator for SequentialGenerator {
    fn new_account_id(&self) -> AccountId {
        AccountId::new(format!("{:016}", self.counter.fetch_add(1, Ordering::Relaxed)))
    }

    fn new_authorization_code(&self) -> String {
        format!("{:06}", self.counter.fetch_add(1, Ordering::Relaxed))
    }
}

fn authorized_transaction(amount: Amount) -> Transaction {
    let mut transaction = Transaction::new(Uuid::new_v4(), amount, "000000".to_string());
    transaction.authorize();
    transaction
}

fn expected_hold(account: &Account, transaction_ids: &[TransactionId]) -> Result<Amount> {
    let mut hold = 0;

    for transaction_id in transaction_ids {
        let transaction = account.transaction(*transaction_id)?;

        if transaction.is_authorized() {
            hold += transaction.amount() - transaction.captured_amount();
        }
    }

    Ok(hold)
}

// Transaction

#[test]
fn test_new_transaction_starts_created_and_authorizes() {
    let mut transaction = Transaction::new(Uuid::new_v4(), 100, "123456".to_string());

    assert_eq!(transaction.status(), TransactionStatus::Created);
    assert!(!transaction.is_authorized());

    transaction.authorize();

    assert!(transaction.is_authorized());
    assert!(!transaction.is_cancelled());
    assert!(!transaction.has_captures());
    assert_eq!(transaction.authorization_code(), "123456");
}

#[test]
fn test_transaction_accepts_partial_captures_up_to_the_authorized_amount() -> Result<()> {
    let mut transaction = authorized_transaction(100);

    transaction.capture(30)?;
    transaction.capture(30)?;
    transaction.capture(40)?;

    assert_eq!(transaction.captured_amount(), 100);
    assert_eq!(transaction.captures().len(), 3);

    let result = transaction.capture(1);

    assert!(matches!(result, Err(TransactionError::CannotCaptureMoreThanAuthorized { captured: 100, requested: 1, .. })));
    assert_eq!(transaction.captures().len(), 3);

    Ok(())
}

#[test]
fn test_created_transaction_cannot_be_captured_or_cancelled() {
    let mut transaction = Transaction::new(Uuid::new_v4(), 100, "123456".to_string());

    assert!(matches!(transaction.capture(10), Err(TransactionError::CaptureNotAuthorized { .. })));
    assert!(matches!(transaction.cancel(), Err(TransactionError::CancelationNotAuthorized { .. })));
    assert_eq!(transaction.status(), TransactionStatus::Created);
}

#[test]
fn test_transaction_cancel_is_idempotent() -> Result<()> {
    let mut transaction = authorized_transaction(100);

    assert!(transaction.cancel()?);
    assert!(!transaction.cancel()?);
    assert!(transaction.is_cancelled());

    Ok(())
}

#[test]
fn test_cancelled_transaction_rejects_captures_and_refunds() -> Result<()> {
    let mut transaction = authorized_transaction(100);
    transaction.cancel()?;

    assert!(matches!(transaction.capture(10), Err(TransactionError::CaptureNotAuthorized { .. })));
    assert!(matches!(transaction.refund(10), Err(TransactionError::CannotRefundMoreThanCaptured { captured: 0, .. })));
    assert!(transaction.captures().is_empty());
    assert!(transaction.refunds().is_empty());

    Ok(())
}

#[test]
fn test_captured_transaction_cannot_be_cancelled() -> Result<()> {
    let mut transaction = authorized_transaction(100);
    transaction.capture(10)?;

    assert!(matches!(transaction.cancel(), Err(TransactionError::CannotCancelCapturedTransaction { .. })));
    assert!(transaction.is_authorized());

    Ok(())
}

#[test]
fn test_transaction_refunds_are_bounded_by_captures() -> Result<()> {
    let mut transaction = authorized_transaction(100);
    transaction.capture(60)?;

    transaction.refund(20)?;
    transaction.refund(40)?;

    assert_eq!(transaction.refunded_amount(), 60);

    let result = transaction.refund(1);

    assert!(matches!(result, Err(TransactionError::CannotRefundMoreThanCaptured { captured: 60, refunded: 60, requested: 1, .. })));
    assert_eq!(transaction.refunds().len(), 2);

    Ok(())
}

// Account

#[test]
#[cfg(debug_assertions)]
#[should_panic(expected = "capture amount must not be negative")]
fn test_transaction_capture_panics_on_negative_amount() {
    let mut transaction = authorized_transaction(100);

    let _ = transaction.capture(-1);
}

#[test]
#[cfg(debug_assertions)]
#[should_panic(expected = "refund amount must not be negative")]
fn test_transaction_refund_panics_on_negative_amount() {
    let mut transaction = authorized_transaction(100);

    let _ = transaction.refund(-1);
}

#[test]
fn test_deposit_updates_balance() -> Result<()> {
    let account = Account::new(1000)?;
    account.deposit(100)?;

    assert_eq!(account.balance(), 1100);
    assert_eq!(account.authorized_amount(), 0);

    Ok(())
}

#[test]
fn test_negative_amounts_are_rejected_without_effect() -> Result<()> {
    let account = Account::new(1000)?;
    let transaction_id = account.authorize(100)?;

    assert_eq!(account.deposit(-100), Err(AccountError::InvalidAmount { amount: -100 }));
    assert_eq!(account.withdraw(-100), Err(AccountError::InvalidAmount { amount: -100 }));
    assert!(matches!(account.authorize(-1), Err(AccountError::InvalidAmount { .. })));
    assert!(matches!(account.capture(transaction_id, -1), Err(AccountError::InvalidAmount { .. })));
    assert!(matches!(account.refund(transaction_id, -1), Err(AccountError::InvalidAmount { .. })));

    assert_eq!(account.balance(), 900);
    assert_eq!(account.authorized_amount(), 100);

    Ok(())
}

#[test]
fn test_negative_initial_balance_is_rejected() {
    assert!(matches!(Account::new(-1), Err(AccountError::InvalidAmount { amount: -1 })));
}

#[test]
fn test_withdraw_everything() -> Result<()> {
    let account = Account::new(1000)?;
    account.withdraw(1000)?;

    assert_eq!(account.balance(), 0);
    assert_eq!(account.authorized_amount(), 0);

    Ok(())
}

#[test]
fn test_withdraw_too_much_fails() -> Result<()> {
    let account = Account::new(1000)?;

    assert_eq!(account.withdraw(1001), Err(AccountError::InsufficientFunds { available: 1000, requested: 1001 }));
    assert_eq!(account.balance(), 1000);

    Ok(())
}

#[test]
fn test_authorization_moves_funds_into_the_hold() -> Result<()> {
    let account = Account::new(1000)?;
    account.authorize(100)?;

    assert_eq!(account.balance(), 900);
    assert_eq!(account.authorized_amount(), 100);

    Ok(())
}

#[test]
fn test_authorization_beyond_balance_fails() -> Result<()> {
    let account = Account::new(100)?;

    assert!(matches!(account.authorize(101), Err(AccountError::InsufficientFunds { .. })));
    assert_eq!(account.balance(), 100);
    assert_eq!(account.authorized_amount(), 0);

    Ok(())
}

#[test]
fn test_held_funds_cannot_be_withdrawn() -> Result<()> {
    let account = Account::new(100)?;
    account.authorize(80)?;

    assert!(matches!(account.withdraw(30), Err(AccountError::InsufficientFunds { available: 20, .. })));

    Ok(())
}

#[test]
fn test_authorize_then_cancel_restores_previous_state() -> Result<()> {
    let account = Account::new(1000)?;
    let transaction_id = account.authorize(100)?;
    account.cancel(transaction_id)?;

    assert_eq!(account.balance(), 1000);
    assert_eq!(account.authorized_amount(), 0);
    assert!(account.transaction(transaction_id)?.is_cancelled());

    Ok(())
}

#[test]
fn test_repeated_cancel_does_not_double_credit() -> Result<()> {
    let account = Account::new(1000)?;
    let transaction_id = account.authorize(100)?;

    account.cancel(transaction_id)?;
    account.cancel(transaction_id)?;
    account.cancel(transaction_id)?;

    assert_eq!(account.balance(), 1000);
    assert_eq!(account.authorized_amount(), 0);

    Ok(())
}

#[test]
fn test_single_full_refund() -> Result<()> {
    let account = Account::new(1000)?;
    let transaction_id = account.authorize(100)?;
    account.capture(transaction_id, 100)?;
    account.refund(transaction_id, 100)?;

    assert_eq!(account.balance(), 1000);
    assert_eq!(account.authorized_amount(), 0);

    Ok(())
}

#[test]
fn test_partial_refunds_until_nothing_is_left() -> Result<()> {
    let account = Account::new(1000)?;
    let transaction_id = account.authorize(100)?;

    assert_eq!((account.balance(), account.authorized_amount()), (900, 100));

    account.capture(transaction_id, 100)?;
    assert_eq!((account.balance(), account.authorized_amount()), (900, 0));

    account.refund(transaction_id, 50)?;
    assert_eq!(account.balance(), 950);

    account.refund(transaction_id, 50)?;
    assert_eq!(account.balance(), 1000);

    let result = account.refund(transaction_id, 1);

    assert!(matches!(result, Err(AccountError::Transaction(TransactionError::CannotRefundMoreThanCaptured { .. }))));
    assert_eq!(account.balance(), 1000);
    assert_eq!(account.authorized_amount(), 0);

    Ok(())
}

#[test]
fn test_multiple_captures_consume_the_hold() -> Result<()> {
    let account = Account::new(1000)?;
    let transaction_id = account.authorize(100)?;
    account.capture(transaction_id, 60)?;
    account.capture(transaction_id, 40)?;

    assert_eq!(account.balance(), 900);
    assert_eq!(account.authorized_amount(), 0);

    Ok(())
}

#[test]
fn test_cannot_capture_more_than_authorized() -> Result<()> {
    let account = Account::new(1000)?;
    let transaction_id = account.authorize(100)?;

    let result = account.capture(transaction_id, 110);

    assert!(matches!(result, Err(AccountError::Transaction(TransactionError::CannotCaptureMoreThanAuthorized { .. }))));
    assert_eq!(account.balance(), 900);
    assert_eq!(account.authorized_amount(), 100);

    Ok(())
}

#[test]
fn test_cannot_cancel_captured_transaction() -> Result<()> {
    let account = Account::new(1000)?;
    let transaction_id = account.authorize(100)?;
    account.capture(transaction_id, 100)?;

    let result = account.cancel(transaction_id);

    assert!(matches!(result, Err(AccountError::Transaction(TransactionError::CannotCancelCapturedTransaction { .. }))));
    assert_eq!(account.balance(), 900);
    assert_eq!(account.authorized_amount(), 0);

    Ok(())
}

#[test]
fn test_cannot_refund_non_captured_transaction() -> Result<()> {
    let account = Account::new(1000)?;
    let transaction_id = account.authorize(100)?;

    assert!(account.refund(transaction_id, 100).is_err());
    assert_eq!(account.balance(), 900);
    assert_eq!(account.authorized_amount(), 100);

    Ok(())
}

#[test]
fn test_cannot_refund_or_capture_cancelled_transaction() -> Result<()> {
    let account = Account::new(1000)?;
    let transaction_id = account.authorize(100)?;
    account.cancel(transaction_id)?;

    assert!(matches!(account.refund(transaction_id, 100), Err(AccountError::Transaction(TransactionError::CannotRefundMoreThanCaptured { .. }))));
    assert!(matches!(account.capture(transaction_id, 100), Err(AccountError::Transaction(TransactionError::CaptureNotAuthorized { .. }))));
    assert_eq!(account.balance(), 1000);
    assert_eq!(account.authorized_amount(), 0);

    Ok(())
}

#[test]
fn test_unknown_transaction_is_reported() -> Result<()> {
    let account = Account::new(1000)?;
    let transaction_id = Uuid::new_v4();

    assert_eq!(account.capture(transaction_id, 1), Err(AccountError::TransactionNotFound { transaction_id }));
    assert_eq!(account.cancel(transaction_id), Err(AccountError::TransactionNotFound { transaction_id }));
    assert_eq!(account.refund(transaction_id, 1), Err(AccountError::TransactionNotFound { transaction_id }));
    assert!(account.transaction(transaction_id).is_err());

    Ok(())
}

#[test]
fn test_transactions_belong_to_their_account() -> Result<()> {
    let first = Account::new(1000)?;
    let second = Account::new(1000)?;
    let transaction_id = first.authorize(100)?;

    assert!(matches!(second.capture(transaction_id, 100), Err(AccountError::TransactionNotFound { .. })));
    assert_eq!(first.authorized_amount(), 100);

    Ok(())
}

#[test]
fn test_authorization_gets_fresh_id_and_generated_code() -> Result<()> {
    let account = Account::with_generator(1000, Arc::new(SequentialGenerator::new()))?;

    let first = account.authorize(10)?;
    let second = account.authorize(10)?;

    assert_ne!(first, second);
    assert_eq!(account.transaction(first)?.authorization_code(), "000001");
    assert_eq!(account.transaction(second)?.authorization_code(), "000002");
    assert_eq!(account.transaction(first)?.amount(), 10);

    Ok(())
}

#[test]
fn test_balance_overflow_is_rejected() -> Result<()> {
    let account = Account::new(Amount::MAX - 10)?;

    assert_eq!(account.deposit(11), Err(AccountError::Overflow { amount: 11 }));
    assert_eq!(account.balance(), Amount::MAX - 10);

    let transaction_id = account.authorize(100)?;
    account.capture(transaction_id, 100)?;
    account.deposit(100)?;

    assert_eq!(account.refund(transaction_id, 50), Err(AccountError::Overflow { amount: 50 }));
    assert_eq!(account.transaction(transaction_id)?.refunded_amount(), 0);

    Ok(())
}

#[test]
fn test_refund_near_the_limit_reports_transaction_errors_first() -> Result<()> {
    let account = Account::new(Amount::MAX - 10)?;

    let transaction_id = account.authorize(100)?;
    account.capture(transaction_id, 100)?;
    account.deposit(100)?;

    let unknown = Uuid::from_u128(7);

    assert_eq!(
        account.refund(unknown, 50),
        Err(AccountError::TransactionNotFound { transaction_id: unknown })
    );

    assert_eq!(
        account.refund(transaction_id, 101),
        Err(AccountError::Transaction(TransactionError::CannotRefundMoreThanCaptured {
            transaction_id,
            captured: 100,
            refunded: 0,
            requested: 101
        }))
    );

    assert_eq!(account.refund(transaction_id, 50), Err(AccountError::Overflow { amount: 50 }));
    assert_eq!(account.transaction(transaction_id)?.refunded_amount(), 0);

    Ok(())
}

#[test]
fn test_capture_and_refund_invariants_hold_under_random_interleavings() -> Result<()> {
    let mut rng = StdRng::seed_from_u64(0x5eed);

    for _ in 0..50 {
        let account = Account::new(10_000)?;
        let mut transaction_ids = Vec::new();

        for _ in 0..200 {
            let balance = account.balance();
            let hold = account.authorized_amount();

            if transaction_ids.is_empty() || rng.gen_bool(0.15) {
                let amount = rng.gen_range(0..=3_000);
                match account.authorize(amount) {
                    Ok(transaction_id) => transaction_ids.push(transaction_id),
                    Err(error) => {
                        assert!(amount > balance);
                        assert!(matches!(error, AccountError::InsufficientFunds { .. }));
                    }
                }

                continue;
            }

            let transaction_id = transaction_ids[rng.gen_range(0..transaction_ids.len())];
            let before = account.transaction(transaction_id)?;
            let remaining = before.amount() - before.captured_amount();
            let refundable = before.captured_amount() - before.refunded_amount();

            let result = match rng.gen_range(0..3) {
                0 => {
                    let amount = rng.gen_range(0..=remaining + 20);
                    let result = account.capture(transaction_id, amount);
                    match &result {
                        Ok(()) => assert_eq!(account.authorized_amount(), hold - amount),
                        Err(AccountError::Transaction(TransactionError::CaptureNotAuthorized { .. })) => assert!(before.is_cancelled()),
                        Err(AccountError::Transaction(TransactionError::CannotCaptureMoreThanAuthorized { .. })) => assert!(amount > remaining),
                        Err(error) => panic!("unexpected capture error: {error}")
                    }
                    result
                }
                1 => {
                    let amount = rng.gen_range(0..=refundable + 20);
                    let result = account.refund(transaction_id, amount);
                    match &result {
                        Ok(()) => assert_eq!(account.balance(), balance + amount),
                        Err(AccountError::Transaction(TransactionError::CannotRefundMoreThanCaptured { .. })) => assert!(amount > refundable),
                        Err(error) => panic!("unexpected refund error: {error}")
                    }
                    result
                }
                _ => account.cancel(transaction_id)
            };

            if result.is_err() {
                let after = account.transaction(transaction_id)?;

                assert_eq!(account.balance(), balance);
                assert_eq!(account.authorized_amount(), hold);
                assert_eq!(after.captures(), before.captures());
                assert_eq!(after.refunds(), before.refunds());
                assert_eq!(after.status(), before.status());
            }

            let after = account.transaction(transaction_id)?;

            assert!(after.captured_amount() <= after.amount());
            assert!(after.refunded_amount() <= after.captured_amount());
            assert!(account.balance() >= 0);
            assert!(account.authorized_amount() >= 0);
            assert_eq!(account.authorized_amount(), expected_hold(&account, &transaction_ids)?);
        }
    }

    Ok(())
}

#[test]
fn test_concurrent_authorizations_never_overshoot_balance() -> Result<()> {
    let account = Account::new(1000)?;

    let successes = thread::scope(|scope| {
        let handles: Vec<_> = (0..50)
            .map(|_| scope.spawn(|| account.authorize(30).is_ok()))
            .collect();

        handles.into_iter().map(|handle| handle.join()).filter(|joined| matches!(joined, Ok(true))).count()
    });

    assert_eq!(successes, 33);
    assert_eq!(account.balance(), 10);
    assert_eq!(account.authorized_amount(), 990);

    Ok(())
}

#[test]
fn test_concurrent_captures_on_one_transaction_respect_the_authorization() -> Result<()> {
    let account = Account::new(1000)?;
    let transaction_id = account.authorize(100)?;

    let successes = thread::scope(|scope| {
        let handles: Vec<_> = (0..25)
            .map(|_| scope.spawn(|| account.capture(transaction_id, 10).is_ok()))
            .collect();

        handles.into_iter().map(|handle| handle.join()).filter(|joined| matches!(joined, Ok(true))).count()
    });

    assert_eq!(successes, 10);
    assert_eq!(account.authorized_amount(), 0);
    assert_eq!(account.transaction(transaction_id)?.captured_amount(), 100);

    Ok(())
}

#[test]
fn test_concurrent_deposits_and_withdrawals_lose_no_updates() -> Result<()> {
    let account = Account::new(0)?;

    thread::scope(|scope| {
        for _ in 0..8 {
            scope.spawn(|| {
                for _ in 0..1_000 {
                    let _ = account.deposit(2);
                    let _ = account.withdraw(1);
                }
            });
        }
    });

    assert_eq!(account.balance(), 8_000);

    Ok(())
}
