use crate::bidding::BiddingRound;
use crate::tests::gen_random_csr;
use crate::{AssignmentState, AuctionError, CsrMatrix, DenseMatrix, PriceLedger};
use approx::assert_abs_diff_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;

#[test]
fn price_ledger_raise_and_reset() {
    let mut prices = PriceLedger::new(3);
    assert_eq!(prices.as_slice(), &[0.0, 0.0, 0.0]);

    prices.raise(1, 2.5);
    prices.raise(1, 2.5);
    prices.raise(2, 0.5);
    assert_eq!(prices.get(1), 2.5);
    assert_eq!(prices.max(), 2.5);

    prices.reset();
    assert_eq!(prices.into_vec(), vec![0.0; 3]);
}

#[test]
#[should_panic]
#[cfg(debug_assertions)]
fn price_ledger_rejects_decrease() {
    let mut prices = PriceLedger::new(1);
    prices.raise(0, 1.0);
    prices.raise(0, 0.5);
}

#[test]
fn assignment_bumps_previous_holder() {
    let mut state = AssignmentState::new(3);
    assert_eq!(state.unassigned_rows().collect::<Vec<_>>(), vec![0, 1, 2]);

    assert_eq!(state.assign(0, 1), None);
    assert_eq!(state.assign(2, 0), None);
    assert_eq!(state.num_assigned(), 2);
    assert_eq!(state.col_to_row(1), Some(0));

    // Row 1 takes column 1 from row 0
    assert_eq!(state.assign(1, 1), Some(0));
    assert_eq!(state.row_to_col(0), None);
    assert_eq!(state.row_to_col(1), Some(1));
    assert_eq!(state.num_assigned(), 2);
    assert_eq!(state.unassigned_rows().collect::<Vec<_>>(), vec![0]);
    assert!(!state.is_complete());

    assert_eq!(state.assign(0, 2), None);
    assert!(state.is_complete());
    assert_eq!(state.clone().into_assignment(), Some(vec![2, 1, 0]));
}

#[test]
fn assignment_moving_row_frees_old_column() {
    let mut state = AssignmentState::new(2);
    state.assign(0, 0);
    state.assign(0, 1);
    assert_eq!(state.col_to_row(0), None);
    assert_eq!(state.col_to_row(1), Some(0));
    assert_eq!(state.num_assigned(), 1);

    // Re-assigning the same pair is a no-op
    assert_eq!(state.assign(0, 1), None);
    assert_eq!(state.num_assigned(), 1);
}

#[test]
fn assignment_clear_and_partial() {
    let mut state = AssignmentState::new(2);
    state.assign(1, 0);
    assert_eq!(state.to_partial(), vec![None, Some(0)]);
    assert_eq!(state.clone().into_assignment(), None);

    state.clear();
    assert_eq!(state.num_assigned(), 0);
    assert_eq!(state.to_partial(), vec![None, None]);
}

#[test]
fn round_resolves_conflicts_by_highest_bid() {
    // Both rows prefer column 0; row 1 gains more over its second choice
    let a = DenseMatrix::from_rows(&[[5.0, 4.0], [5.0, 1.0]]).unwrap();
    let mut prices = PriceLedger::new(2);
    let mut state = AssignmentState::new(2);

    let round = BiddingRound::new(&a, 0.5, 1.0, None, false);
    let stats = round.run(&mut prices, &mut state).unwrap();
    assert_eq!(stats.bids, 2);
    assert_eq!(stats.won, 1);
    assert_eq!(stats.bumped, 0);
    assert_eq!(state.row_to_col(1), Some(0));
    // Winning bid: 0 + (5 - 1) + 0.5
    assert_abs_diff_eq!(prices.get(0), 4.5);

    // Row 0 now takes column 1
    let stats = round.run(&mut prices, &mut state).unwrap();
    assert_eq!(stats.bids, 1);
    assert!(state.is_complete());
    assert_eq!(state.into_assignment(), Some(vec![1, 0]));
}

#[test]
fn round_tie_goes_to_lowest_row() {
    let a = DenseMatrix::from_rows(&[[3.0, 1.0], [3.0, 1.0]]).unwrap();
    let mut prices = PriceLedger::new(2);
    let mut state = AssignmentState::new(2);
    BiddingRound::new(&a, 0.1, 1.0, None, true)
        .run(&mut prices, &mut state)
        .unwrap();
    assert_eq!(state.to_partial(), vec![Some(0), None]);
}

#[test]
fn round_lone_candidate_uses_gap() {
    let a = CsrMatrix::new(1, vec![0, 1], vec![0], vec![2.0]).unwrap();
    let mut prices = PriceLedger::new(1);
    let mut state = AssignmentState::new(1);
    BiddingRound::new(&a, 0.25, 1.0, None, false)
        .run(&mut prices, &mut state)
        .unwrap();
    assert_abs_diff_eq!(prices.get(0), 1.25);
}

#[test]
fn round_reports_rows_below_floor() {
    let a = CsrMatrix::new(2, vec![0, 1, 2], vec![0, 0], vec![1.0, 1.0]).unwrap();
    let mut prices = PriceLedger::new(2);
    prices.raise(0, 10.0);
    let mut state = AssignmentState::new(2);
    let err = BiddingRound::new(&a, 0.1, 1.0, Some(-5.0), true)
        .run(&mut prices, &mut state)
        .unwrap_err();
    assert_eq!(err, AuctionError::Infeasible { row: 0 });
}

/// Prices never decrease from one round to the next.
#[test]
fn prices_are_monotone_within_a_run() {
    let mut rng = StdRng::seed_from_u64(7);
    let a = gen_random_csr(60, 0.2, &mut rng);
    let mut prices = PriceLedger::new(60);
    let mut state = AssignmentState::new(60);
    let round = BiddingRound::new(&a, 0.05, 1.0, None, true);

    let mut rounds = 0;
    while !state.is_complete() {
        let before = prices.as_slice().to_vec();
        round.run(&mut prices, &mut state).unwrap();
        for (old, new) in before.iter().zip(prices.as_slice()) {
            assert!(new >= old, "price dropped from {} to {}", old, new);
        }
        rounds += 1;
        assert!(rounds < 1_000_000, "auction failed to converge");
    }
}
