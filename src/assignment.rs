/// Row to column assignment with reverse lookup.
///
/// At most one row holds each column at any time: assigning a held column
/// bumps its previous holder back to unassigned.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentState {
    row_to_col: Vec<Option<usize>>,
    col_to_row: Vec<Option<usize>>,
    assigned: usize,
}

impl AssignmentState {
    pub fn new(n: usize) -> Self {
        Self {
            row_to_col: vec![None; n],
            col_to_row: vec![None; n],
            assigned: 0,
        }
    }

    /// Assign `row` to `col`, returning the row that previously held `col`
    /// (if any, and if different from `row`).
    pub fn assign(&mut self, row: usize, col: usize) -> Option<usize> {
        // Release whatever row currently holds
        if let Some(old) = self.row_to_col[row].take() {
            self.col_to_row[old] = None;
            self.assigned -= 1;
        }
        let bumped = self.col_to_row[col].replace(row);
        if let Some(prev) = bumped {
            self.row_to_col[prev] = None;
        } else {
            self.assigned += 1;
        }
        self.row_to_col[row] = Some(col);
        bumped
    }

    pub fn row_to_col(&self, row: usize) -> Option<usize> {
        self.row_to_col[row]
    }

    pub fn col_to_row(&self, col: usize) -> Option<usize> {
        self.col_to_row[col]
    }

    /// Rows without a column, in increasing order. Each call starts a fresh
    /// enumeration.
    pub fn unassigned_rows(&self) -> impl Iterator<Item = usize> + '_ {
        self.row_to_col
            .iter()
            .enumerate()
            .filter_map(|(row, col)| col.is_none().then_some(row))
    }

    pub fn num_assigned(&self) -> usize {
        self.assigned
    }

    pub fn is_complete(&self) -> bool {
        self.assigned == self.row_to_col.len()
    }

    pub fn clear(&mut self) {
        self.row_to_col.fill(None);
        self.col_to_row.fill(None);
        self.assigned = 0;
    }

    pub fn to_partial(&self) -> Vec<Option<usize>> {
        self.row_to_col.clone()
    }

    /// The assignment as a permutation, or `None` if some row is unassigned.
    pub fn into_assignment(self) -> Option<Vec<usize>> {
        self.row_to_col.into_iter().collect()
    }
}
