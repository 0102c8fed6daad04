use thiserror::Error;

/// Status flag for a successful solve.
pub const SUCCESS: i32 = 0;
/// Input was structurally invalid (shape, CSR layout or non-finite values).
pub const ERROR_INVALID_INPUT: i32 = -1;
/// A row has no candidate columns.
pub const ERROR_EMPTY_ROW: i32 = -2;
/// No perfect matching exists.
pub const ERROR_INFEASIBLE: i32 = -3;
/// Round or time budget exhausted before every row was assigned.
pub const WARNING_NOT_CONVERGED: i32 = 1;

/// Errors returned by the auction solvers.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AuctionError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("row {row} has no candidate columns")]
    EmptyRow { row: usize },

    #[error("no perfect matching exists (row {row} ran out of profitable columns)")]
    Infeasible { row: usize },

    #[error("auction did not converge after {rounds} rounds")]
    NotConverged {
        /// Best assignment reached when the budget ran out.
        partial: Vec<Option<usize>>,
        rounds: usize,
    },
}

impl AuctionError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Numeric status code. Negative values are fatal, positive values are
    /// warnings that still carry a usable (partial) result.
    pub fn flag(&self) -> i32 {
        match self {
            Self::InvalidInput(_) => ERROR_INVALID_INPUT,
            Self::EmptyRow { .. } => ERROR_EMPTY_ROW,
            Self::Infeasible { .. } => ERROR_INFEASIBLE,
            Self::NotConverged { .. } => WARNING_NOT_CONVERGED,
        }
    }

    /// The partial assignment attached to a [`AuctionError::NotConverged`].
    pub fn partial(&self) -> Option<&[Option<usize>]> {
        match self {
            Self::NotConverged { partial, .. } => Some(partial),
            _ => None,
        }
    }
}
