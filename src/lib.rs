//! This package solves the linear sum assignment problem with the auction
//! algorithm.
//!
//! Given a square profit matrix `A`, it finds a permutation `σ` such that
//!
//! ```text
//! Σ_i a_{i σ(i)}
//! ```
//!
//! is within `n·ε` of its maximum. Rows bid for their most profitable column,
//! prices rise as columns are contested, and the bidding stops once every
//! row holds a column.
//!
//! Three representations of `A` are supported:
//!
//! **Dense** ([`dense_lap_auction`])
//!    a row-major array where every entry, including zero, may be chosen.
//!
//! **Sparse** ([`csr_lap_auction`])
//!    a CSR matrix where only stored entries may be chosen. Absent entries
//!    act as `-∞`. Runs follow an epsilon-scaling schedule, each run warm
//!    started from the prices of the previous one.
//!
//! **Implicit** ([`dot_auction`])
//!    `A = R·Cᵀ` given by its factors. Entries are computed on demand so the
//!    `n × n` matrix is never stored.
//!
//! Within a bidding round all bids are computed in parallel and then applied
//! in a single serial pass, so results do not depend on thread scheduling.
//!
//! An exact [`hungarian_lap`] solver is included for validation.

mod assignment;
mod auction;
mod bidding;
mod errcode;
mod hungarian;
mod matrix_util;
mod prices;
mod scaling;
mod view;

#[cfg(test)]
mod tests;

pub use assignment::*;
pub use auction::*;
pub use bidding::RoundStats;
pub use errcode::*;
pub use hungarian::*;
pub use matrix_util::{
    assigned_rank, dense_to_csr, eliminate_zeros, is_permutation, max_assigned_rank, top_k,
    unmatched_row,
};
pub use prices::*;
pub use scaling::*;
pub use view::*;
