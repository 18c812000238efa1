//! End-to-end lending flows against the in-memory store
//!
//! - request -> fund -> repay lifecycle with one and several lenders
//! - reputation and reward point effects of on-time and late repayment
//! - rejected calls leave the ledger untouched

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use lendwise_common::{
    Borrower, BorrowerId, ConsistencyError, Lender, LenderId, LendwiseError, LoanId, ManualClock,
    RequestId, RequestStatus, SequentialIdGenerator, ValidationError,
};
use lendwise_market::{
    InMemoryLedgerStore, LedgerEvent, LedgerStore, LendingMarket, LoanRequestReceipt,
    RepaymentOutcome,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

struct Harness {
    market: LendingMarket,
    store: Arc<InMemoryLedgerStore>,
    clock: Arc<ManualClock>,
}

impl Harness {
    async fn new() -> Self {
        let store = Arc::new(InMemoryLedgerStore::new());
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        ));
        let market = LendingMarket::new(
            store.clone(),
            clock.clone(),
            Arc::new(SequentialIdGenerator::new()),
        );

        store
            .register_borrower(Borrower::new("bea", dec!(0)))
            .await
            .unwrap();
        for (id, balance) in [("alice", dec!(5000)), ("bob", dec!(5000)), ("carol", dec!(5000))] {
            store.register_lender(Lender::new(id, balance)).await.unwrap();
        }

        Self {
            market,
            store,
            clock,
        }
    }

    async fn request(&self, amount: Decimal, months: u32) -> LoanRequestReceipt {
        self.market
            .request_loan(amount, "working capital", months, &BorrowerId::new("bea"))
            .await
            .unwrap()
    }

    async fn fund(
        &self,
        receipt: &LoanRequestReceipt,
        lender: &str,
        amount: Decimal,
    ) -> Result<lendwise_market::FundingReceipt, LendwiseError> {
        self.market
            .fund_loan(
                &receipt.loan_id,
                &receipt.request_id,
                &LenderId::new(lender),
                amount,
            )
            .await
    }

    async fn repay(
        &self,
        receipt: &LoanRequestReceipt,
        lender: &str,
        amount: Decimal,
    ) -> Result<lendwise_market::RepaymentReceipt, LendwiseError> {
        self.market
            .repay_loan(
                &receipt.loan_id,
                &receipt.request_id,
                &LenderId::new(lender),
                amount,
            )
            .await
    }

    async fn borrower(&self) -> Borrower {
        self.store.borrower(&BorrowerId::new("bea")).await.unwrap()
    }

    async fn lender(&self, id: &str) -> Lender {
        self.store.lender(&LenderId::new(id)).await.unwrap()
    }
}

#[tokio::test]
async fn test_single_lender_funds_full_request() {
    let h = Harness::new().await;
    let receipt = h.request(dec!(1000), 6).await;
    assert_eq!(receipt.interest_rate, dec!(13));

    let funding = h.fund(&receipt, "alice", dec!(1000)).await.unwrap();
    assert!(funding.fully_funded);

    let snapshot = h.market.loan_snapshot(&receipt.loan_id).await.unwrap();
    assert!(snapshot.request.is_done);
    assert_eq!(snapshot.request.amount_fulfilled, dec!(1000));
    assert_eq!(snapshot.loan.lenders.len(), 1);
    // ceil(1000 + 1000 * 13/100 * 6/12)
    assert_eq!(snapshot.loan.lenders[0].amount, dec!(1065));

    let bea = h.borrower().await;
    assert_eq!(bea.account_balance, dec!(1000));
    assert_eq!(bea.total, 1);
    assert_eq!(h.lender("alice").await.account_balance, dec!(4000));
}

#[tokio::test]
async fn test_two_lenders_split_request() {
    let h = Harness::new().await;
    let receipt = h.request(dec!(1000), 6).await;

    let first = h.fund(&receipt, "alice", dec!(600)).await.unwrap();
    assert!(!first.fully_funded);
    let snapshot = h.market.loan_snapshot(&receipt.loan_id).await.unwrap();
    assert!(!snapshot.request.is_done);
    assert_eq!(h.borrower().await.account_balance, dec!(0));

    let second = h.fund(&receipt, "bob", dec!(400)).await.unwrap();
    assert!(second.fully_funded);

    let snapshot = h.market.loan_snapshot(&receipt.loan_id).await.unwrap();
    assert_eq!(snapshot.request.status(), RequestStatus::Funded);
    assert_eq!(snapshot.request.amount_fulfilled, dec!(1000));
    assert_eq!(snapshot.request.interest_amount, dec!(65));
    let lenders: Vec<_> = snapshot.loan.lenders.iter().map(|l| l.lender.as_str()).collect();
    assert_eq!(lenders, vec!["alice", "bob"]);
    assert_eq!(snapshot.loan.lenders[0].amount, dec!(639));
    assert_eq!(snapshot.loan.lenders[1].amount, dec!(426));

    let fulfilled: Vec<_> = h
        .market
        .journal()
        .events_for_loan(&receipt.loan_id)
        .into_iter()
        .filter(|e| matches!(e, LedgerEvent::RequestFulfilled { .. }))
        .collect();
    assert_eq!(fulfilled.len(), 1);
}

#[tokio::test]
async fn test_repeat_lender_keeps_single_line() {
    let h = Harness::new().await;
    let receipt = h.request(dec!(1000), 6).await;

    h.fund(&receipt, "alice", dec!(300)).await.unwrap();
    h.fund(&receipt, "bob", dec!(300)).await.unwrap();
    h.fund(&receipt, "alice", dec!(400)).await.unwrap();

    let snapshot = h.market.loan_snapshot(&receipt.loan_id).await.unwrap();
    assert_eq!(snapshot.loan.lenders.len(), 2);
    let alice = snapshot.loan.lender_line(&LenderId::new("alice")).unwrap();
    // 300 -> 320 (19.5 rounded up), 400 -> 426
    assert_eq!(alice.amount, dec!(746));
    assert_eq!(h.lender("alice").await.account_balance, dec!(4300));
}

#[tokio::test]
async fn test_end_date_tracks_latest_contribution() {
    let h = Harness::new().await;
    let receipt = h.request(dec!(1000), 6).await;

    h.fund(&receipt, "alice", dec!(500)).await.unwrap();
    h.clock.advance_days(10);
    h.fund(&receipt, "bob", dec!(500)).await.unwrap();

    let snapshot = h.market.loan_snapshot(&receipt.loan_id).await.unwrap();
    assert_eq!(
        snapshot.loan.start_date,
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    );
    assert_eq!(
        snapshot.loan.end_date,
        Utc.with_ymd_and_hms(2024, 7, 11, 0, 0, 0).unwrap()
    );
}

#[tokio::test]
async fn test_funding_rejections() {
    let h = Harness::new().await;
    let receipt = h.request(dec!(1000), 6).await;

    let zero = h.fund(&receipt, "alice", dec!(0)).await.unwrap_err();
    assert!(matches!(
        zero,
        LendwiseError::Validation(ValidationError::InvalidAmount)
    ));

    let too_much = h.fund(&receipt, "alice", dec!(1200)).await.unwrap_err();
    assert!(matches!(
        too_much,
        LendwiseError::Validation(ValidationError::AmountExceedsRemaining { .. })
    ));

    h.store
        .register_lender(Lender::new("dan", dec!(50)))
        .await
        .unwrap();
    let broke = h.fund(&receipt, "dan", dec!(100)).await.unwrap_err();
    assert!(matches!(
        broke,
        LendwiseError::Validation(ValidationError::InsufficientBalance { .. })
    ));

    h.fund(&receipt, "alice", dec!(1000)).await.unwrap();
    let closed = h.fund(&receipt, "bob", dec!(1)).await.unwrap_err();
    assert!(matches!(
        closed,
        LendwiseError::Validation(ValidationError::RequestAlreadyFulfilled)
    ));

    assert_eq!(h.lender("bob").await.account_balance, dec!(5000));
    assert_eq!(h.lender("dan").await.account_balance, dec!(50));
}

#[tokio::test]
async fn test_on_time_repayment_awards_reward_points() {
    let h = Harness::new().await;
    let receipt = h.request(dec!(1000), 6).await;
    h.fund(&receipt, "alice", dec!(600)).await.unwrap();
    h.fund(&receipt, "bob", dec!(400)).await.unwrap();

    // Borrower needs the interest on top of the principal received
    h.store
        .commit(lendwise_market::LedgerWrite::new().update_borrower({
            let mut bea = h.borrower().await;
            bea.account_balance += dec!(65);
            bea
        }))
        .await
        .unwrap();

    h.clock.advance_days(100);
    let partial = h.repay(&receipt, "alice", dec!(639)).await.unwrap();
    assert!(!partial.fully_repaid);
    assert_eq!(partial.outstanding, dec!(426));

    let last = h.repay(&receipt, "bob", dec!(426)).await.unwrap();
    assert!(last.fully_repaid);
    // 2024-04-10 to 2024-07-01
    assert_eq!(
        last.outcome,
        Some(RepaymentOutcome::OnTime { reward_points: 82 })
    );

    let bea = h.borrower().await;
    assert_eq!(bea.success, 1);
    assert_eq!(bea.fail, 0);
    assert_eq!(bea.reward_points, 82);
    assert_eq!(bea.account_balance, dec!(0));
    assert_eq!(h.lender("alice").await.account_balance, dec!(5039));
    assert_eq!(h.lender("bob").await.account_balance, dec!(5026));

    let snapshot = h.market.loan_snapshot(&receipt.loan_id).await.unwrap();
    assert_eq!(snapshot.request.status(), RequestStatus::Repaid);
    assert_eq!(snapshot.loan.lenders[0].repaid, dec!(639));
    assert_eq!(snapshot.loan.lenders[1].repaid, dec!(426));

    let again = h.repay(&receipt, "bob", dec!(1)).await.unwrap_err();
    assert!(matches!(
        again,
        LendwiseError::Validation(ValidationError::RequestAlreadyRepaid)
    ));
    let snapshot = h.market.loan_snapshot(&receipt.loan_id).await.unwrap();
    assert_eq!(snapshot.request.amount_repaid, dec!(1065));
}

#[tokio::test]
async fn test_late_repayment_counts_failure() {
    let h = Harness::new().await;
    let receipt = h.request(dec!(300), 1).await;
    h.fund(&receipt, "alice", dec!(300)).await.unwrap();

    let mut bea = h.borrower().await;
    bea.account_balance += dec!(100);
    bea.reward_points = 12;
    h.store
        .commit(lendwise_market::LedgerWrite::new().update_borrower(bea))
        .await
        .unwrap();

    h.clock.advance_days(45);
    // 300 * 12% / 12 = 3
    let receipt = h.repay(&receipt, "alice", dec!(303)).await.unwrap();
    assert_eq!(receipt.outcome, Some(RepaymentOutcome::Late));

    let bea = h.borrower().await;
    assert_eq!(bea.fail, 1);
    assert_eq!(bea.success, 0);
    assert_eq!(bea.reward_points, 12);
}

#[tokio::test]
async fn test_reward_points_consumed_by_next_request() {
    let h = Harness::new().await;
    let mut bea = h.borrower().await;
    bea.total = 1;
    bea.success = 1;
    bea.reward_points = 82;
    h.store
        .commit(lendwise_market::LedgerWrite::new().update_borrower(bea))
        .await
        .unwrap();

    let receipt = h.request(dec!(500), 3).await;
    assert_eq!(receipt.interest_rate, dec!(11.18));
    assert_eq!(h.borrower().await.reward_points, 0);

    let next = h.request(dec!(500), 3).await;
    assert_eq!(next.interest_rate, dec!(12));
}

#[tokio::test]
async fn test_repayment_from_unfunded_lender_is_fatal() {
    let h = Harness::new().await;
    let receipt = h.request(dec!(1000), 6).await;
    h.fund(&receipt, "alice", dec!(1000)).await.unwrap();

    let err = h.repay(&receipt, "carol", dec!(100)).await.unwrap_err();
    assert!(err.is_consistency());
    assert!(matches!(
        err,
        LendwiseError::Consistency(ConsistencyError::LenderNotFunded { .. })
    ));
    assert_eq!(h.borrower().await.account_balance, dec!(1000));
    assert_eq!(h.lender("carol").await.account_balance, dec!(5000));
}

#[tokio::test]
async fn test_mismatched_loan_and_request() {
    let h = Harness::new().await;
    let first = h.request(dec!(100), 3).await;
    let second = h.request(dec!(100), 3).await;

    let err = h
        .market
        .fund_loan(
            &first.loan_id,
            &second.request_id,
            &LenderId::new("alice"),
            dec!(10),
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        LendwiseError::Consistency(ConsistencyError::LoanRequestMismatch { .. })
    ));
}

#[tokio::test]
async fn test_unknown_loan_is_storage_error() {
    let h = Harness::new().await;
    let err = h
        .market
        .fund_loan(
            &LoanId::new("loan-404"),
            &RequestId::new("req-404"),
            &LenderId::new("alice"),
            dec!(10),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, LendwiseError::Storage(_)));
}

#[tokio::test]
async fn test_invalid_request_inputs_rejected() {
    let h = Harness::new().await;
    let bea = BorrowerId::new("bea");

    let err = h
        .market
        .request_loan(dec!(0), "nothing", 6, &bea)
        .await
        .unwrap_err();
    assert!(err.is_validation());

    let err = h
        .market
        .request_loan(dec!(100), "nothing", 0, &bea)
        .await
        .unwrap_err();
    assert!(err.is_validation());
    assert_eq!(h.store.stats().requests, 0);
}

#[tokio::test]
async fn test_month_end_funding_rolls_end_date_over() {
    let h = Harness::new().await;
    h.clock
        .set(Utc.with_ymd_and_hms(2024, 1, 31, 12, 0, 0).unwrap());
    let receipt = h.request(dec!(300), 1).await;
    let funding = h.fund(&receipt, "alice", dec!(300)).await.unwrap();
    assert_eq!(
        funding.end_date,
        Utc.with_ymd_and_hms(2024, 3, 2, 12, 0, 0).unwrap()
    );

    let mut bea = h.borrower().await;
    bea.account_balance += dec!(3);
    h.store
        .commit(lendwise_market::LedgerWrite::new().update_borrower(bea))
        .await
        .unwrap();

    // Past the last day of February but before the rolled-over end date
    h.clock
        .set(Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap());
    let repayment = h.repay(&receipt, "alice", dec!(303)).await.unwrap();
    assert_eq!(
        repayment.outcome,
        Some(RepaymentOutcome::OnTime { reward_points: 1 })
    );
    assert_eq!(h.borrower().await.success, 1);
}

#[tokio::test]
async fn test_non_positive_amounts_leave_ledger_untouched() {
    let h = Harness::new().await;
    let receipt = h.request(dec!(1000), 6).await;

    for amount in [dec!(0), dec!(-250)] {
        let err = h.fund(&receipt, "alice", amount).await.unwrap_err();
        assert!(matches!(
            err,
            LendwiseError::Validation(ValidationError::InvalidAmount)
        ));
    }
    assert_eq!(h.lender("alice").await.account_balance, dec!(5000));
    let snapshot = h.market.loan_snapshot(&receipt.loan_id).await.unwrap();
    assert_eq!(snapshot.request.amount_fulfilled, dec!(0));
    assert!(snapshot.loan.lenders.is_empty());

    h.fund(&receipt, "alice", dec!(1000)).await.unwrap();
    h.repay(&receipt, "alice", dec!(100)).await.unwrap();

    for amount in [dec!(0), dec!(-100)] {
        let err = h.repay(&receipt, "alice", amount).await.unwrap_err();
        assert!(matches!(
            err,
            LendwiseError::Validation(ValidationError::InvalidAmount)
        ));
    }
    assert_eq!(h.borrower().await.account_balance, dec!(900));
    assert_eq!(h.lender("alice").await.account_balance, dec!(4100));
    let snapshot = h.market.loan_snapshot(&receipt.loan_id).await.unwrap();
    assert_eq!(snapshot.request.amount_repaid, dec!(100));
    assert_eq!(snapshot.loan.lenders[0].repaid, dec!(100));
}
