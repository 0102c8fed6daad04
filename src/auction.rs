use crate::assignment::AssignmentState;
use crate::bidding::{BiddingRound, RoundStats};
use crate::errcode::AuctionError;
use crate::matrix_util::unmatched_row;
use crate::prices::PriceLedger;
use crate::scaling::EpsilonScaler;
use crate::view::{CsrMatrix, DenseMatrix, DotProduct, WeightView};
use num_traits::ToPrimitive;
use std::time::{Duration, Instant};
use tracing::{debug, info, trace};

/// Options for the auction solvers.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AuctionOptions {
    /// Epsilon of the first run. Also the bid increment used for rows that
    /// have a single candidate column.
    pub auction_max_eps: f64,
    /// Smallest epsilon of the schedule. Single-run solvers use this value.
    pub auction_min_eps: f64,
    /// Multiplicative decay of epsilon between runs, in `[0, 1]`.
    pub auction_factor: f64,
    /// Maximum number of runs of the epsilon schedule.
    pub num_runs: usize,
    /// Report per-run diagnostics at `info` rather than `debug` level.
    pub verbose: bool,
    /// Compute the bids of a round on the rayon thread pool.
    pub parallel: bool,
    /// Carry prices from one run into the next.
    pub warm_start: bool,
    /// Maximum number of bidding rounds per run.
    pub max_rounds: usize,
    /// Wall-clock budget for the whole solve.
    pub time_limit: Option<Duration>,
}

impl Default for AuctionOptions {
    fn default() -> Self {
        Self {
            auction_max_eps: 1.0,
            auction_min_eps: 0.01,
            auction_factor: 0.1,
            num_runs: 3,
            verbose: false,
            parallel: true,
            warm_start: true,
            max_rounds: 1_000_000,
            time_limit: None,
        }
    }
}

/// Result of a converged auction.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AuctionSolution {
    /// `assignment[row]` is the column assigned to `row`.
    pub assignment: Vec<usize>,
    /// Final column prices.
    pub prices: Vec<f64>,
    /// Total weight of the assignment.
    pub objective: f64,
    /// Epsilon of the last run. The objective is within `n * eps` of the
    /// optimum.
    pub eps: f64,
    /// Number of runs performed.
    pub runs: usize,
    /// Total number of bidding rounds over all runs.
    pub rounds: usize,
}

/// Drives bidding rounds to convergence for each epsilon of a schedule.
///
/// Every call to [`AuctionEngine::solve`] owns its prices and assignment, so
/// one engine may be shared by concurrent solves.
#[derive(Debug, Clone, Default)]
pub struct AuctionEngine {
    options: AuctionOptions,
}

impl AuctionEngine {
    pub fn new(options: AuctionOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &AuctionOptions {
        &self.options
    }

    /// Solve the maximum weight assignment problem on `view`, running one
    /// auction per epsilon of `scaler`.
    pub fn solve<V: WeightView>(
        &self,
        view: &V,
        scaler: &EpsilonScaler,
    ) -> Result<AuctionSolution, AuctionError> {
        let n = view.size();
        if let Some(row) = (0..n).find(|&row| view.row_len(row) == 0) {
            return Err(AuctionError::EmptyRow { row });
        }
        // Bidding only detects a missing perfect matching after prices fall
        // by about n * C / eps, so check the pattern up front.
        if !view.fully_connected() {
            if let Some(row) = unmatched_row(view) {
                return Err(AuctionError::Infeasible { row });
            }
        }

        let mut prices = PriceLedger::new(n);
        let mut state = AssignmentState::new(n);
        let started = Instant::now();
        let mut rounds = 0;
        let mut runs = 0;
        let mut eps = scaler.max_eps();

        for run_eps in scaler.schedule() {
            if runs > 0 {
                state.clear();
                if !self.options.warm_start {
                    prices.reset();
                }
            }
            eps = run_eps;
            let run_started = Instant::now();
            let run_rounds = self.run(view, eps, &mut prices, &mut state, started, rounds)?;
            rounds += run_rounds;
            runs += 1;

            let objective = view.partial_objective(&state.to_partial());
            let elapsed_ms = run_started.elapsed().as_secs_f64() * 1e3;
            if self.options.verbose {
                info!(run = runs, eps, rounds = run_rounds, elapsed_ms, objective, "auction run converged");
            } else {
                debug!(run = runs, eps, rounds = run_rounds, elapsed_ms, objective, "auction run converged");
            }
        }

        let prices = prices.into_vec();
        let assignment = state
            .into_assignment()
            .ok_or(AuctionError::NotConverged {
                partial: Vec::new(),
                rounds,
            })?;
        let objective = view.objective(&assignment);
        Ok(AuctionSolution {
            assignment,
            prices,
            objective,
            eps,
            runs,
            rounds,
        })
    }

    // Bid until every row holds a column, returning the number of rounds.
    //
    // For sparse views a best net value under
    //     -((2n - 1) * (C + P) + n * eps)
    // where C bounds |a_ij| and P bounds the starting prices, proves that no
    // perfect matching exists. Dense views always have one, so skip the test.
    fn run<V: WeightView>(
        &self,
        view: &V,
        eps: f64,
        prices: &mut PriceLedger,
        state: &mut AssignmentState,
        started: Instant,
        prior_rounds: usize,
    ) -> Result<usize, AuctionError> {
        let n = view.size();
        let floor = if view.fully_connected() {
            None
        } else {
            let bound = view.max_abs_weight() + prices.max().max(0.0);
            let nf = n as f64;
            Some(-((2.0 * nf - 1.0) * bound + nf * eps))
        };
        let round = BiddingRound::new(
            view,
            eps,
            self.options.auction_max_eps,
            floor,
            self.options.parallel,
        );

        let mut rounds = 0;
        while !state.is_complete() {
            let timed_out = self
                .options
                .time_limit
                .is_some_and(|limit| started.elapsed() >= limit);
            if rounds >= self.options.max_rounds || timed_out {
                return Err(AuctionError::NotConverged {
                    partial: state.to_partial(),
                    rounds: prior_rounds + rounds,
                });
            }
            let RoundStats { bids, won, bumped } = round.run(prices, state)?;
            rounds += 1;
            trace!(round = rounds, bids, won, bumped, assigned = state.num_assigned(), "bidding round");
        }
        Ok(rounds)
    }
}

/// Auction on a dense row-major `n x n` profit matrix.
///
/// A single run at `options.auction_min_eps`. Every entry, including zeros,
/// is a valid choice.
pub fn dense_lap_auction(
    n: usize,
    weights: &[f64],
    options: &AuctionOptions,
) -> Result<AuctionSolution, AuctionError> {
    let matrix = DenseMatrix::new(n, weights.to_vec())?;
    let scaler = EpsilonScaler::fixed(options.auction_min_eps)?;
    AuctionEngine::new(*options).solve(&matrix, &scaler)
}

/// Auction on an `n x n` CSR profit matrix with epsilon scaling.
///
/// Absent entries can never be chosen, so a row without entries or a
/// pattern without a perfect matching is an error.
pub fn csr_lap_auction<P, I>(
    n: usize,
    indptr: &[P],
    indices: &[I],
    data: &[f64],
    options: &AuctionOptions,
) -> Result<AuctionSolution, AuctionError>
where
    P: ToPrimitive,
    I: ToPrimitive,
{
    let matrix = CsrMatrix::from_raw(n, indptr, indices, data)?;
    let scaler = EpsilonScaler::new(
        options.auction_max_eps,
        options.auction_min_eps,
        options.auction_factor,
        options.num_runs,
    )?;
    AuctionEngine::new(*options).solve(&matrix, &scaler)
}

/// Auction on the implicit matrix `W = R * C^T`.
///
/// `row_factors` and `col_factors` are row-major `n x dim` arrays. Entries
/// of `W` are computed when a row bids and never stored. A single run at
/// `options.auction_min_eps`.
pub fn dot_auction(
    n: usize,
    dim: usize,
    row_factors: &[f64],
    col_factors: &[f64],
    options: &AuctionOptions,
) -> Result<AuctionSolution, AuctionError> {
    let view = DotProduct::new(n, dim, row_factors.to_vec(), col_factors.to_vec())?;
    let scaler = EpsilonScaler::fixed(options.auction_min_eps)?;
    AuctionEngine::new(*options).solve(&view, &scaler)
}
