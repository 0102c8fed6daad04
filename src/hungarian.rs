// Hungarian Algorithm implementation (exact reference solver)

use crate::errcode::AuctionError;
use crate::view::WeightView;

/// Exact maximum weight assignment on `view` using the Hungarian method.
///
/// Absent entries of sparse views are never chosen. Returns
/// [`AuctionError::Infeasible`] if no perfect matching exists.
///
/// This is an O(n^3) dense algorithm that materialises an `n x n` cost
/// matrix. It is meant for validating the auction solvers, not for large
/// problems.
pub fn hungarian_lap<V: WeightView>(view: &V) -> Result<Vec<usize>, AuctionError> {
    let n = view.size();
    if let Some(row) = (0..n).find(|&row| view.row_len(row) == 0) {
        return Err(AuctionError::EmptyRow { row });
    }

    // Transform to a minimum sum problem; absent entries cost +inf
    let mut cost = vec![f64::INFINITY; n * n];
    for i in 0..n {
        view.scan_row(i, |j, w| cost[i * n + j] = -w);
    }

    hungarian_match(n, &cost)
}

// Shortest augmenting path with row (u) and column (v) potentials.
//
// Rows are added one at a time. Each pass is a Dijkstra-like search over
// reduced costs cost[i][j] - u[i] - v[j] from the new row to a free column,
// after which the matching is flipped along the path. At every step the
// matching is optimal on the rows added so far.
//
// Internally columns are numbered from 1, with column 0 a virtual root that
// holds the row currently being inserted.
fn hungarian_match(n: usize, cost: &[f64]) -> Result<Vec<usize>, AuctionError> {
    let mut u = vec![0.0; n + 1];
    let mut v = vec![0.0; n + 1];
    // owner[j] is the 1-based row matched with column j, 0 if free
    let mut owner = vec![0usize; n + 1];
    // way[j] is the previous column on the shortest path to column j
    let mut way = vec![0usize; n + 1];
    let mut minv = vec![f64::INFINITY; n + 1];
    let mut used = vec![false; n + 1];

    for i in 1..=n {
        owner[0] = i;
        let mut j0 = 0;
        minv.fill(f64::INFINITY);
        used.fill(false);

        loop {
            used[j0] = true;
            let i0 = owner[j0];
            let mut delta = f64::INFINITY;
            let mut j1 = 0;
            for j in 1..=n {
                if used[j] {
                    continue;
                }
                let cur = cost[(i0 - 1) * n + (j - 1)] - u[i0] - v[j];
                if cur < minv[j] {
                    minv[j] = cur;
                    way[j] = j0;
                }
                if minv[j] < delta {
                    delta = minv[j];
                    j1 = j;
                }
            }
            // No free column reachable from the search tree
            if delta == f64::INFINITY {
                return Err(AuctionError::Infeasible { row: i - 1 });
            }
            for j in 0..=n {
                if used[j] {
                    u[owner[j]] += delta;
                    v[j] -= delta;
                } else {
                    minv[j] -= delta;
                }
            }
            j0 = j1;
            if owner[j0] == 0 {
                break;
            }
        }

        // Flip the matching along the path back to the root
        loop {
            let j1 = way[j0];
            owner[j0] = owner[j1];
            j0 = j1;
            if j0 == 0 {
                break;
            }
        }
    }

    let mut assignment = vec![0; n];
    for j in 1..=n {
        assignment[owner[j] - 1] = j - 1;
    }
    Ok(assignment)
}
