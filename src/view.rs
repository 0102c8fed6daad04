// Weight matrix representations the auction bids against.

use crate::errcode::AuctionError;
use crate::matrix_util::{check_csr, check_finite, to_index_vec};
use num_traits::ToPrimitive;

/// Read-only access to the candidate columns of each row of a square profit
/// matrix.
///
/// A candidate is a column the row may be assigned to. Dense and implicit
/// views offer every column; sparse views offer only stored entries, so an
/// absent entry behaves as a profit of `-inf`.
pub trait WeightView: Sync {
    /// Order of the (square) matrix.
    fn size(&self) -> usize;

    /// Call `f(col, weight)` for every candidate column of `row`.
    fn scan_row<F: FnMut(usize, f64)>(&self, row: usize, f: F);

    /// Number of candidate columns in `row`.
    fn row_len(&self, row: usize) -> usize;

    /// Weight of entry `(row, col)`, or `None` if it is not a candidate.
    fn weight(&self, row: usize, col: usize) -> Option<f64>;

    /// Largest absolute weight in the matrix.
    fn max_abs_weight(&self) -> f64;

    /// `true` if every row can reach every column. Such views always admit
    /// a perfect matching.
    fn fully_connected(&self) -> bool {
        false
    }

    /// Best and second best net value `weight - price` over the candidates
    /// of `row`, as `(best_col, v1, v2)`.
    ///
    /// `v2` is `-inf` when the row has a single candidate. Ties keep the
    /// first column visited.
    fn best_two(&self, row: usize, prices: &[f64]) -> Option<(usize, f64, f64)> {
        let mut best = None;
        let mut v1 = f64::NEG_INFINITY;
        let mut v2 = f64::NEG_INFINITY;
        self.scan_row(row, |col, w| {
            let v = w - prices[col];
            if best.is_none() || v > v1 {
                v2 = v1;
                v1 = v;
                best = Some(col);
            } else if v > v2 {
                v2 = v;
            }
        });
        best.map(|col| (col, v1, v2))
    }

    /// Total weight of a complete assignment (`-inf` if it uses an absent
    /// entry).
    fn objective(&self, assignment: &[usize]) -> f64 {
        assignment
            .iter()
            .enumerate()
            .map(|(row, &col)| self.weight(row, col).unwrap_or(f64::NEG_INFINITY))
            .sum()
    }

    /// Total weight over the assigned rows of a partial assignment.
    fn partial_objective(&self, assignment: &[Option<usize>]) -> f64 {
        assignment
            .iter()
            .enumerate()
            .filter_map(|(row, col)| col.and_then(|col| self.weight(row, col)))
            .sum()
    }
}

/// Row-major dense `n x n` matrix. Every entry, zeros included, is a
/// candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseMatrix {
    n: usize,
    data: Vec<f64>,
}

impl DenseMatrix {
    pub fn new(n: usize, data: Vec<f64>) -> Result<Self, AuctionError> {
        if n.checked_mul(n) != Some(data.len()) {
            return Err(AuctionError::invalid(format!(
                "dense matrix is not square: {} values for order {}",
                data.len(),
                n
            )));
        }
        check_finite(&data)?;
        Ok(Self { n, data })
    }

    /// Build from a slice of rows, which must all have `rows.len()` entries.
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self, AuctionError> {
        let n = rows.len();
        let mut data = Vec::with_capacity(n * n);
        for (i, r) in rows.iter().enumerate() {
            let r = r.as_ref();
            if r.len() != n {
                return Err(AuctionError::invalid(format!(
                    "row {} has {} entries, expected {}",
                    i,
                    r.len(),
                    n
                )));
            }
            data.extend_from_slice(r);
        }
        Self::new(n, data)
    }

    pub fn row(&self, row: usize) -> &[f64] {
        &self.data[row * self.n..(row + 1) * self.n]
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }
}

impl WeightView for DenseMatrix {
    fn size(&self) -> usize {
        self.n
    }

    fn scan_row<F: FnMut(usize, f64)>(&self, row: usize, mut f: F) {
        for (col, &w) in self.row(row).iter().enumerate() {
            f(col, w);
        }
    }

    fn row_len(&self, _row: usize) -> usize {
        self.n
    }

    fn weight(&self, row: usize, col: usize) -> Option<f64> {
        (row < self.n && col < self.n).then(|| self.data[row * self.n + col])
    }

    fn max_abs_weight(&self) -> f64 {
        self.data.iter().fold(0.0, |a, &b| f64::max(a, b.abs()))
    }

    fn fully_connected(&self) -> bool {
        true
    }
}

/// Compressed sparse row matrix. Only stored entries are candidates.
#[derive(Debug, Clone, PartialEq)]
pub struct CsrMatrix {
    n: usize,
    indptr: Vec<usize>,
    indices: Vec<usize>,
    data: Vec<f64>,
}

impl CsrMatrix {
    /// Build from a CSR triple, validating the layout.
    pub fn new(
        n: usize,
        indptr: Vec<usize>,
        indices: Vec<usize>,
        data: Vec<f64>,
    ) -> Result<Self, AuctionError> {
        check_csr(n, &indptr, &indices, &data)?;
        Ok(Self {
            n,
            indptr,
            indices,
            data,
        })
    }

    // Caller guarantees a valid layout.
    pub(crate) fn from_parts_unchecked(
        n: usize,
        indptr: Vec<usize>,
        indices: Vec<usize>,
        data: Vec<f64>,
    ) -> Self {
        debug_assert!(check_csr(n, &indptr, &indices, &data).is_ok());
        Self {
            n,
            indptr,
            indices,
            data,
        }
    }

    /// Build from a CSR triple whose index arrays use any primitive integer
    /// type (e.g. `i32` offsets exported by another tool).
    pub fn from_raw<P, I>(
        n: usize,
        indptr: &[P],
        indices: &[I],
        data: &[f64],
    ) -> Result<Self, AuctionError>
    where
        P: ToPrimitive,
        I: ToPrimitive,
    {
        let indptr = to_index_vec(indptr, "indptr")?;
        let indices = to_index_vec(indices, "indices")?;
        Self::new(n, indptr, indices, data.to_vec())
    }

    /// Column indices and values stored for `row`.
    pub fn row(&self, row: usize) -> (&[usize], &[f64]) {
        let range = self.indptr[row]..self.indptr[row + 1];
        (&self.indices[range.clone()], &self.data[range])
    }

    pub fn nnz(&self) -> usize {
        self.indptr[self.n]
    }

    pub fn indptr(&self) -> &[usize] {
        &self.indptr
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }
}

impl WeightView for CsrMatrix {
    fn size(&self) -> usize {
        self.n
    }

    fn scan_row<F: FnMut(usize, f64)>(&self, row: usize, mut f: F) {
        let (cols, vals) = self.row(row);
        for (&col, &w) in cols.iter().zip(vals) {
            f(col, w);
        }
    }

    fn row_len(&self, row: usize) -> usize {
        self.indptr[row + 1] - self.indptr[row]
    }

    fn weight(&self, row: usize, col: usize) -> Option<f64> {
        let (cols, vals) = self.row(row);
        cols.iter().position(|&c| c == col).map(|k| vals[k])
    }

    fn max_abs_weight(&self) -> f64 {
        self.data.iter().fold(0.0, |a, &b| f64::max(a, b.abs()))
    }
}

/// Implicit matrix `W = R * C^T` given by row factors `R` (`n x dim`) and
/// column factors `C` (`n x dim`), both row-major. Entries are computed on
/// demand and never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct DotProduct {
    n: usize,
    dim: usize,
    rows: Vec<f64>,
    cols: Vec<f64>,
}

impl DotProduct {
    pub fn new(n: usize, dim: usize, rows: Vec<f64>, cols: Vec<f64>) -> Result<Self, AuctionError> {
        if dim == 0 && n > 0 {
            return Err(AuctionError::invalid("factor dimension must be positive"));
        }
        let len = n
            .checked_mul(dim)
            .ok_or_else(|| AuctionError::invalid(format!("factor shape {} x {} overflows", n, dim)))?;
        if rows.len() != len {
            return Err(AuctionError::invalid(format!(
                "row factors have {} values, expected {} x {}",
                rows.len(),
                n,
                dim
            )));
        }
        if cols.len() != len {
            return Err(AuctionError::invalid(format!(
                "column factors have {} values, expected {} x {}",
                cols.len(),
                n,
                dim
            )));
        }
        check_finite(&rows)?;
        check_finite(&cols)?;
        Ok(Self { n, dim, rows, cols })
    }

    fn dot(&self, row: usize, col: usize) -> f64 {
        let r = &self.rows[row * self.dim..(row + 1) * self.dim];
        let c = &self.cols[col * self.dim..(col + 1) * self.dim];
        r.iter().zip(c).map(|(a, b)| a * b).sum()
    }

    /// Materialise the full matrix. Only sensible for small problems.
    pub fn to_dense(&self) -> DenseMatrix {
        let mut data = Vec::with_capacity(self.n * self.n);
        for i in 0..self.n {
            for j in 0..self.n {
                data.push(self.dot(i, j));
            }
        }
        DenseMatrix { n: self.n, data }
    }
}

impl WeightView for DotProduct {
    fn size(&self) -> usize {
        self.n
    }

    fn scan_row<F: FnMut(usize, f64)>(&self, row: usize, mut f: F) {
        for col in 0..self.n {
            f(col, self.dot(row, col));
        }
    }

    fn row_len(&self, _row: usize) -> usize {
        self.n
    }

    fn weight(&self, row: usize, col: usize) -> Option<f64> {
        (row < self.n && col < self.n).then(|| self.dot(row, col))
    }

    // O(n^2 dim). The engine never asks, since the view is fully connected.
    fn max_abs_weight(&self) -> f64 {
        let mut m: f64 = 0.0;
        for i in 0..self.n {
            self.scan_row(i, |_, w| m = m.max(w.abs()));
        }
        m
    }

    fn fully_connected(&self) -> bool {
        true
    }
}
