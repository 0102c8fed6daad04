use crate::{CsrMatrix, DenseMatrix};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;

mod scaling;
mod state;

/// Generate a random dense matrix with integer entries in `0..max_value`.
fn gen_random_dense(n: usize, max_value: i32, rng: &mut StdRng) -> DenseMatrix {
    let data = (0..n * n)
        .map(|_| rng.random_range(0..max_value) as f64)
        .collect();
    DenseMatrix::new(n, data).unwrap()
}

/// Generate a random sparse matrix with entries in `(0, 1]`.
///
/// Each entry is present with probability `density`. A random permutation
/// is always stored so that a perfect matching exists.
fn gen_random_csr(n: usize, density: f64, rng: &mut StdRng) -> CsrMatrix {
    let mut perm: Vec<usize> = (0..n).collect();
    perm.shuffle(rng);

    let mut indptr = vec![0];
    let mut indices = Vec::new();
    let mut data = Vec::new();
    for i in 0..n {
        for j in 0..n {
            if j == perm[i] || rng.random_bool(density) {
                indices.push(j);
                data.push(1.0 - rng.random::<f64>());
            }
        }
        indptr.push(indices.len());
    }
    CsrMatrix::new(n, indptr, indices, data).unwrap()
}

/// Optimal objective by enumerating every permutation. Absent entries are
/// skipped; returns `-inf` if no perfect matching exists.
fn brute_force_objective<V: crate::WeightView>(view: &V) -> f64 {
    fn search<V: crate::WeightView>(view: &V, row: usize, used: &mut [bool]) -> f64 {
        let n = view.size();
        if row == n {
            return 0.0;
        }
        let mut best = f64::NEG_INFINITY;
        for col in 0..n {
            if used[col] {
                continue;
            }
            let Some(w) = view.weight(row, col) else {
                continue;
            };
            used[col] = true;
            best = best.max(w + search(view, row + 1, used));
            used[col] = false;
        }
        best
    }
    let mut used = vec![false; view.size()];
    search(view, 0, &mut used)
}
