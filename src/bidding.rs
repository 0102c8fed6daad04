// One synchronous (Jacobi) round of the auction.
//
// Every unassigned row computes its bid against the prices as they stood at
// the start of the round. Those computations are independent and run in
// parallel. The bids are then applied serially: for each contested column
// the highest bid wins (lowest row on ties), the column's price becomes the
// winning bid and its previous holder is bumped.

use crate::assignment::AssignmentState;
use crate::errcode::AuctionError;
use crate::prices::PriceLedger;
use crate::view::WeightView;
use rayon::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Bid {
    pub row: usize,
    pub col: usize,
    /// Price the row offers for `col`.
    pub price: f64,
}

/// Summary of a single bidding round.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundStats {
    /// Number of rows that submitted a bid.
    pub bids: usize,
    /// Number of columns that changed hands.
    pub won: usize,
    /// Number of previously assigned rows that lost their column.
    pub bumped: usize,
}

pub(crate) struct BiddingRound<'a, V: WeightView> {
    view: &'a V,
    eps: f64,
    // Stand-in for best - second_best when a row has a single candidate
    lone_gap: f64,
    // Best net value below which no perfect matching can exist
    floor: Option<f64>,
    parallel: bool,
}

impl<'a, V: WeightView> BiddingRound<'a, V> {
    pub fn new(view: &'a V, eps: f64, lone_gap: f64, floor: Option<f64>, parallel: bool) -> Self {
        Self {
            view,
            eps,
            lone_gap,
            floor,
            parallel,
        }
    }

    // Compute the bid of a single row against a price snapshot.
    pub fn bid(&self, row: usize, prices: &[f64]) -> Result<Bid, AuctionError> {
        let (col, v1, v2) = self
            .view
            .best_two(row, prices)
            .ok_or(AuctionError::EmptyRow { row })?;
        if let Some(floor) = self.floor {
            if v1 < floor {
                return Err(AuctionError::Infeasible { row });
            }
        }
        let v2 = if v2 == f64::NEG_INFINITY {
            v1 - self.lone_gap
        } else {
            v2
        };
        Ok(Bid {
            row,
            col,
            price: prices[col] + (v1 - v2) + self.eps,
        })
    }

    fn collect_bids(&self, rows: &[usize], prices: &[f64]) -> Result<Vec<Bid>, AuctionError> {
        let bids: Vec<Result<Bid, AuctionError>> = if self.parallel {
            rows.par_iter().map(|&row| self.bid(row, prices)).collect()
        } else {
            rows.iter().map(|&row| self.bid(row, prices)).collect()
        };
        // Report the lowest failing row regardless of scheduling
        bids.into_iter().collect()
    }

    /// Run one round over every currently unassigned row.
    pub fn run(
        &self,
        prices: &mut PriceLedger,
        state: &mut AssignmentState,
    ) -> Result<RoundStats, AuctionError> {
        let rows: Vec<usize> = state.unassigned_rows().collect();
        let mut bids = self.collect_bids(&rows, prices.as_slice())?;

        let mut stats = RoundStats {
            bids: bids.len(),
            ..Default::default()
        };

        // Group by column, best offer first
        bids.sort_unstable_by(|a, b| {
            a.col
                .cmp(&b.col)
                .then(b.price.total_cmp(&a.price))
                .then(a.row.cmp(&b.row))
        });
        bids.dedup_by_key(|bid| bid.col);

        for Bid { row, col, price } in bids {
            prices.raise(col, price);
            if state.assign(row, col).is_some() {
                stats.bumped += 1;
            }
            stats.won += 1;
        }
        Ok(stats)
    }
}
