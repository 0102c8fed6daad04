use crate::errcode::AuctionError;

/// Sequence of epsilon values used by successive auction runs.
///
/// The first run uses `max_eps`; each following run multiplies the previous
/// epsilon by `factor`, clamped below at `min_eps`. The sequence ends after
/// `num_runs` values, after a run at `min_eps`, or as soon as epsilon would
/// stop decreasing, whichever comes first. In particular
/// `max_eps == min_eps` always yields a single run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpsilonScaler {
    max_eps: f64,
    min_eps: f64,
    factor: f64,
    num_runs: usize,
}

impl EpsilonScaler {
    pub fn new(
        max_eps: f64,
        min_eps: f64,
        factor: f64,
        num_runs: usize,
    ) -> Result<Self, AuctionError> {
        if !(min_eps.is_finite() && min_eps > 0.0) {
            return Err(AuctionError::invalid(format!(
                "auction_min_eps must be positive and finite, got {}",
                min_eps
            )));
        }
        if !(max_eps.is_finite() && max_eps >= min_eps) {
            return Err(AuctionError::invalid(format!(
                "auction_max_eps ({}) must be finite and at least auction_min_eps ({})",
                max_eps, min_eps
            )));
        }
        if !(0.0..=1.0).contains(&factor) {
            return Err(AuctionError::invalid(format!(
                "auction_factor must lie in [0, 1], got {}",
                factor
            )));
        }
        if num_runs == 0 {
            return Err(AuctionError::invalid("num_runs must be at least 1"));
        }
        Ok(Self {
            max_eps,
            min_eps,
            factor,
            num_runs,
        })
    }

    /// A single run at `eps`.
    pub fn fixed(eps: f64) -> Result<Self, AuctionError> {
        Self::new(eps, eps, 0.0, 1)
    }

    pub fn max_eps(&self) -> f64 {
        self.max_eps
    }

    pub fn min_eps(&self) -> f64 {
        self.min_eps
    }

    pub fn schedule(&self) -> Schedule {
        Schedule {
            next: Some(self.max_eps),
            min_eps: self.min_eps,
            factor: self.factor,
            remaining: self.num_runs,
        }
    }

    /// Epsilon of the last run in the schedule.
    pub fn final_eps(&self) -> f64 {
        self.schedule().last().unwrap_or(self.max_eps)
    }
}

/// Iterator over the epsilon values of an [`EpsilonScaler`].
#[derive(Debug, Clone)]
pub struct Schedule {
    next: Option<f64>,
    min_eps: f64,
    factor: f64,
    remaining: usize,
}

impl Iterator for Schedule {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        if self.remaining == 0 {
            return None;
        }
        let eps = self.next.take()?;
        self.remaining -= 1;
        if eps > self.min_eps {
            let following = f64::max(eps * self.factor, self.min_eps);
            self.next = (following < eps).then_some(following);
        }
        Some(eps)
    }
}
