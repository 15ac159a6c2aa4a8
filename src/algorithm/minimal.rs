//! Edit-distance table diff.
//!
//! Builds the full `(n + 1) x (m + 1)` Levenshtein table and walks it back
//! from the bottom-right corner. Slower and hungrier than Myers, but the
//! table also yields the substitution-aware distance used for similarity
//! scoring.

use super::DiffResult;

/// Diff two sequences using `==`.
pub fn diff<T: PartialEq + Clone>(old: &[T], new: &[T]) -> Vec<DiffResult<T>> {
    diff_by(old, new, |a, b| a == b)
}

/// Diff two sequences with a caller-supplied equality predicate.
///
/// At each step of the backtrack a match is taken first, then an insertion
/// when it costs no more than a deletion, then a deletion.
pub fn diff_by<T, F>(old: &[T], new: &[T], mut eq: F) -> Vec<DiffResult<T>>
where
    T: Clone,
    F: FnMut(&T, &T) -> bool,
{
    let n = old.len();
    let m = new.len();

    let mut dp = vec![vec![0usize; m + 1]; n + 1];
    for (i, row) in dp.iter_mut().enumerate() {
        row[0] = i;
    }
    for (j, cell) in dp[0].iter_mut().enumerate() {
        *cell = j;
    }

    for i in 1..=n {
        for j in 1..=m {
            let cost = if eq(&old[i - 1], &new[j - 1]) { 0 } else { 1 };
            dp[i][j] = (dp[i - 1][j] + 1)
                .min(dp[i][j - 1] + 1)
                .min(dp[i - 1][j - 1] + cost);
        }
    }

    let mut results = Vec::with_capacity(n.max(m));
    let (mut i, mut j) = (n, m);

    while i > 0 || j > 0 {
        if i > 0 && j > 0 && eq(&old[i - 1], &new[j - 1]) {
            results.push(DiffResult::equal(old[i - 1].clone(), i - 1, j - 1));
            i -= 1;
            j -= 1;
        } else if j > 0 && (i == 0 || dp[i][j - 1] <= dp[i - 1][j]) {
            results.push(DiffResult::insert(new[j - 1].clone(), j - 1));
            j -= 1;
        } else {
            results.push(DiffResult::delete(old[i - 1].clone(), i - 1));
            i -= 1;
        }
    }

    results.reverse();
    results
}

/// Levenshtein distance using `==`.
pub fn edit_distance<T: PartialEq>(old: &[T], new: &[T]) -> usize {
    edit_distance_by(old, new, |a, b| a == b)
}

/// Levenshtein distance keeping only two rows of the table.
pub fn edit_distance_by<T, F>(old: &[T], new: &[T], mut eq: F) -> usize
where
    F: FnMut(&T, &T) -> bool,
{
    let m = new.len();
    let mut prev: Vec<usize> = (0..=m).collect();
    let mut curr = vec![0usize; m + 1];

    for (i, a) in old.iter().enumerate() {
        curr[0] = i + 1;
        for (j, b) in new.iter().enumerate() {
            let cost = if eq(a, b) { 0 } else { 1 };
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[m]
}
