use crate::{AuctionError, EpsilonScaler};
use approx::assert_relative_eq;
use rstest::rstest;

#[rstest]
// max == min always runs once, whatever the factor and run count
#[case::degenerate(1.0, 1.0, 0.0, 3, vec![1.0])]
#[case::degenerate_half(1.0, 1.0, 0.5, 10, vec![1.0])]
#[case::factor_zero(1.0, 0.01, 0.0, 3, vec![1.0, 0.01])]
#[case::geometric(1.0, 0.001, 0.1, 3, vec![1.0, 0.1, 0.01])]
#[case::clamped(1.0, 0.05, 0.1, 5, vec![1.0, 0.1, 0.05])]
#[case::run_limited(1.0, 0.001, 0.5, 2, vec![1.0, 0.5])]
#[case::factor_one(2.0, 1.0, 1.0, 4, vec![2.0])]
fn schedule(
    #[case] max_eps: f64,
    #[case] min_eps: f64,
    #[case] factor: f64,
    #[case] num_runs: usize,
    #[case] expected: Vec<f64>,
) {
    let scaler = EpsilonScaler::new(max_eps, min_eps, factor, num_runs).unwrap();
    let eps: Vec<f64> = scaler.schedule().collect();
    assert_eq!(eps.len(), expected.len(), "schedule {:?}", eps);
    for (a, b) in eps.iter().zip(&expected) {
        assert_relative_eq!(*a, *b, max_relative = 1e-12);
    }
    assert_relative_eq!(
        scaler.final_eps(),
        *expected.last().unwrap(),
        max_relative = 1e-12
    );
}

#[test]
fn schedule_is_restartable() {
    let scaler = EpsilonScaler::new(1.0, 0.01, 0.1, 3).unwrap();
    let first: Vec<f64> = scaler.schedule().collect();
    let second: Vec<f64> = scaler.schedule().collect();
    assert_eq!(first, second);
}

#[test]
fn fixed_is_a_single_run() {
    let scaler = EpsilonScaler::fixed(0.25).unwrap();
    assert_eq!(scaler.schedule().collect::<Vec<_>>(), vec![0.25]);
    assert_eq!(scaler.max_eps(), 0.25);
    assert_eq!(scaler.min_eps(), 0.25);
}

#[rstest]
#[case::zero_min(1.0, 0.0, 0.5, 3)]
#[case::negative_min(1.0, -1.0, 0.5, 3)]
#[case::max_below_min(0.1, 1.0, 0.5, 3)]
#[case::infinite_max(f64::INFINITY, 1.0, 0.5, 3)]
#[case::nan_factor(1.0, 0.1, f64::NAN, 3)]
#[case::factor_above_one(1.0, 0.1, 1.5, 3)]
#[case::negative_factor(1.0, 0.1, -0.5, 3)]
#[case::no_runs(1.0, 0.1, 0.5, 0)]
fn rejects_bad_configuration(
    #[case] max_eps: f64,
    #[case] min_eps: f64,
    #[case] factor: f64,
    #[case] num_runs: usize,
) {
    assert!(matches!(
        EpsilonScaler::new(max_eps, min_eps, factor, num_runs),
        Err(AuctionError::InvalidInput(_))
    ));
}
