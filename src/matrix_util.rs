use crate::errcode::AuctionError;
use crate::view::{CsrMatrix, DenseMatrix, WeightView};
use num_traits::ToPrimitive;
use std::collections::VecDeque;

// Validate a CSR triple for an n x n matrix.
//
// indptr must hold n+1 non-decreasing offsets starting at 0, indices and data
// must both hold indptr[n] entries, every column index must be < n and
// appear at most once per row, and all values must be finite.
pub(crate) fn check_csr(
    n: usize,
    indptr: &[usize],
    indices: &[usize],
    data: &[f64],
) -> Result<(), AuctionError> {
    if indptr.len() != n + 1 {
        return Err(AuctionError::invalid(format!(
            "indptr has length {}, expected {}",
            indptr.len(),
            n + 1
        )));
    }
    if indptr[0] != 0 {
        return Err(AuctionError::invalid("indptr[0] must be 0"));
    }
    if let Some(i) = indptr.windows(2).position(|w| w[0] > w[1]) {
        return Err(AuctionError::invalid(format!(
            "indptr decreases between rows {} and {}",
            i,
            i + 1
        )));
    }
    let nnz = indptr[n];
    if indices.len() != nnz || data.len() != nnz {
        return Err(AuctionError::invalid(format!(
            "indptr[n] = {} but indices has {} and data has {} entries",
            nnz,
            indices.len(),
            data.len()
        )));
    }

    // Last row that referenced each column, offset by one so 0 means never
    let mut seen = vec![0; n];
    for i in 0..n {
        for &col in &indices[indptr[i]..indptr[i + 1]] {
            if col >= n {
                return Err(AuctionError::invalid(format!(
                    "column index {} in row {} is out of range for order {}",
                    col, i, n
                )));
            }
            if seen[col] == i + 1 {
                return Err(AuctionError::invalid(format!(
                    "duplicate column {} in row {}",
                    col, i
                )));
            }
            seen[col] = i + 1;
        }
    }
    check_finite(data)
}

pub(crate) fn check_finite(val: &[f64]) -> Result<(), AuctionError> {
    match val.iter().position(|v| !v.is_finite()) {
        Some(k) => Err(AuctionError::invalid(format!(
            "entry {} is not finite ({})",
            k, val[k]
        ))),
        None => Ok(()),
    }
}

// Convert an index array of any primitive integer type to usize, rejecting
// negative or unrepresentable values.
pub(crate) fn to_index_vec<T: ToPrimitive>(
    idx: &[T],
    name: &str,
) -> Result<Vec<usize>, AuctionError> {
    idx.iter()
        .enumerate()
        .map(|(k, v)| {
            v.to_usize().ok_or_else(|| {
                AuctionError::invalid(format!("{}[{}] is not a valid index", name, k))
            })
        })
        .collect()
}

/// Convert a dense matrix to CSR, dropping explicit zeros.
///
/// Zero entries of the dense matrix become *absent* entries of the result,
/// which the auction treats as unreachable rather than as zero profit.
pub fn dense_to_csr(dense: &DenseMatrix) -> CsrMatrix {
    let n = dense.size();
    let mut indptr = Vec::with_capacity(n + 1);
    let mut indices = Vec::new();
    let mut data = Vec::new();

    indptr.push(0);
    for i in 0..n {
        for (j, &v) in dense.row(i).iter().enumerate() {
            if v == 0.0 {
                continue;
            }
            indices.push(j);
            data.push(v);
        }
        indptr.push(indices.len());
    }
    CsrMatrix::from_parts_unchecked(n, indptr, indices, data)
}

/// Return a copy of `csr` with explicitly stored zeros removed.
pub fn eliminate_zeros(csr: &CsrMatrix) -> CsrMatrix {
    let n = csr.size();
    let mut indptr = Vec::with_capacity(n + 1);
    let mut indices = Vec::with_capacity(csr.nnz());
    let mut data = Vec::with_capacity(csr.nnz());

    indptr.push(0);
    for i in 0..n {
        let (cols, vals) = csr.row(i);
        for (&j, &v) in cols.iter().zip(vals) {
            if v == 0.0 {
                continue;
            }
            indices.push(j);
            data.push(v);
        }
        indptr.push(indices.len());
    }
    CsrMatrix::from_parts_unchecked(n, indptr, indices, data)
}

/// Keep only the `k` largest entries of each row of `view`.
///
/// This bounds the work per bidding round at `k` candidates per row. The
/// optimum survives the truncation as long as `k` is at least
/// [`max_assigned_rank`] of an optimal assignment.
pub fn top_k<V: WeightView>(view: &V, k: usize) -> CsrMatrix {
    let n = view.size();
    let mut indptr = Vec::with_capacity(n + 1);
    let mut indices = Vec::with_capacity(n * k.min(n));
    let mut data = Vec::with_capacity(n * k.min(n));
    let mut row = Vec::with_capacity(n);

    indptr.push(0);
    for i in 0..n {
        row.clear();
        view.scan_row(i, |j, w| row.push((j, w)));
        // Largest first, lowest column on ties
        row.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        row.truncate(k);
        row.sort_unstable_by_key(|&(j, _)| j);
        for &(j, w) in &row {
            indices.push(j);
            data.push(w);
        }
        indptr.push(indices.len());
    }
    CsrMatrix::from_parts_unchecked(n, indptr, indices, data)
}

/// 1-based rank of the assigned entry within its row: the number of
/// candidates of `row` whose weight is at least the assigned weight.
///
/// Returns `None` if `(row, col)` is not a candidate.
pub fn assigned_rank<V: WeightView>(view: &V, row: usize, col: usize) -> Option<usize> {
    let assigned = view.weight(row, col)?;
    let mut rank = 0;
    view.scan_row(row, |_, w| {
        if w >= assigned {
            rank += 1;
        }
    });
    Some(rank)
}

/// Worst [`assigned_rank`] over all rows of a complete assignment.
pub fn max_assigned_rank<V: WeightView>(view: &V, assignment: &[usize]) -> Option<usize> {
    assignment
        .iter()
        .enumerate()
        .map(|(row, &col)| assigned_rank(view, row, col))
        .try_fold(0, |worst, rank| rank.map(|r| usize::max(worst, r)))
}

/// `true` if `assignment` is a permutation of `0..assignment.len()`.
pub fn is_permutation(assignment: &[usize]) -> bool {
    let n = assignment.len();
    let mut seen = vec![false; n];
    for &col in assignment {
        if col >= n || seen[col] {
            return false;
        }
        seen[col] = true;
    }
    true
}

/// First row left unmatched by a maximum cardinality matching on the
/// candidate pattern of `view`, or `None` if a perfect matching exists.
///
/// Weights are ignored. Uses Hopcroft-Karp: a BFS from the free rows builds
/// layers, then an iterative DFS augments along vertex-disjoint shortest
/// paths until no augmenting path is left.
pub fn unmatched_row<V: WeightView>(view: &V) -> Option<usize> {
    let n = view.size();
    let mut ptr = Vec::with_capacity(n + 1);
    let mut adj = Vec::new();
    ptr.push(0);
    for row in 0..n {
        view.scan_row(row, |col, _| adj.push(col));
        ptr.push(adj.len());
    }

    let mut row_match: Vec<Option<usize>> = vec![None; n];
    let mut col_match: Vec<Option<usize>> = vec![None; n];
    // Greedy start
    for row in 0..n {
        if let Some(&col) = adj[ptr[row]..ptr[row + 1]]
            .iter()
            .find(|&&col| col_match[col].is_none())
        {
            row_match[row] = Some(col);
            col_match[col] = Some(row);
        }
    }

    let mut dist = vec![usize::MAX; n];
    let mut next = vec![0; n];
    let mut queue = VecDeque::new();
    let mut path = Vec::new();
    loop {
        for row in 0..n {
            if row_match[row].is_none() {
                dist[row] = 0;
                queue.push_back(row);
            } else {
                dist[row] = usize::MAX;
            }
        }
        let mut found = false;
        while let Some(row) = queue.pop_front() {
            for &col in &adj[ptr[row]..ptr[row + 1]] {
                match col_match[col] {
                    None => found = true,
                    Some(r) if dist[r] == usize::MAX => {
                        dist[r] = dist[row] + 1;
                        queue.push_back(r);
                    }
                    Some(_) => {}
                }
            }
        }
        if !found {
            break;
        }

        next.copy_from_slice(&ptr[..n]);
        for root in 0..n {
            if row_match[root].is_some() {
                continue;
            }
            path.clear();
            path.push(root);
            while let Some(&row) = path.last() {
                if next[row] == ptr[row + 1] {
                    // Dead end for the rest of this phase
                    dist[row] = usize::MAX;
                    path.pop();
                    continue;
                }
                let col = adj[next[row]];
                next[row] += 1;
                match col_match[col] {
                    None => {
                        // Each row on the path takes the column it came through
                        for &r in &path {
                            let c = adj[next[r] - 1];
                            row_match[r] = Some(c);
                            col_match[c] = Some(r);
                            dist[r] = usize::MAX;
                        }
                        path.clear();
                    }
                    Some(r) if dist[r] != usize::MAX && dist[r] == dist[row] + 1 => path.push(r),
                    Some(_) => {}
                }
            }
        }
    }
    row_match.iter().position(Option::is_none)
}
