/// Per-column prices of an auction run.
///
/// Within a run prices only ever rise. Between runs the engine either keeps
/// them (warm start) or calls [`PriceLedger::reset`].
#[derive(Debug, Clone, PartialEq)]
pub struct PriceLedger {
    price: Vec<f64>,
}

impl PriceLedger {
    pub fn new(n: usize) -> Self {
        Self {
            price: vec![0.0; n],
        }
    }

    pub fn get(&self, col: usize) -> f64 {
        self.price[col]
    }

    /// Set the price of `col`. The caller must not lower it.
    pub fn raise(&mut self, col: usize, new_price: f64) {
        debug_assert!(
            new_price >= self.price[col],
            "price of column {} would drop from {} to {}",
            col,
            self.price[col],
            new_price
        );
        self.price[col] = new_price;
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.price
    }

    pub fn reset(&mut self) {
        self.price.fill(0.0);
    }

    pub fn max(&self) -> f64 {
        self.price.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.price
    }
}
