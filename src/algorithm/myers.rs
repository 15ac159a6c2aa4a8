//! Myers' shortest edit script.
//!
//! The forward pass records, for every edit count `d`, the furthest x
//! reached on each diagonal `k = x - y`. Frontier `d` has `2d + 1` slots and
//! diagonal `k` lives at index `k + d`. The backtrack walks those frontiers
//! from the last one to the first, re-deriving the snake and the single edit
//! taken at each step.
//!
//! Time and memory are O((N + M) * D) where D is the number of edits, which
//! degrades to quadratic when the inputs share nothing.

use super::DiffResult;

/// Diff two sequences using `==`.
///
/// # Examples
///
/// ```
/// use diffkit::algorithm::{DiffOp, myers};
///
/// let ops: Vec<_> = myers::diff(&["a", "b", "c"], &["a", "x", "c"])
///     .into_iter()
///     .map(|r| (r.op, r.value))
///     .collect();
/// assert_eq!(ops, vec![
///     (DiffOp::Equal, "a"),
///     (DiffOp::Delete, "b"),
///     (DiffOp::Insert, "x"),
///     (DiffOp::Equal, "c"),
/// ]);
/// ```
pub fn diff<T: PartialEq + Clone>(old: &[T], new: &[T]) -> Vec<DiffResult<T>> {
    diff_by(old, new, |a, b| a == b)
}

/// Diff two sequences with a caller-supplied equality predicate.
pub fn diff_by<T, F>(old: &[T], new: &[T], mut eq: F) -> Vec<DiffResult<T>>
where
    T: Clone,
    F: FnMut(&T, &T) -> bool,
{
    let n = old.len();
    let m = new.len();

    if n == 0 {
        return new
            .iter()
            .enumerate()
            .map(|(j, v)| DiffResult::insert(v.clone(), j))
            .collect();
    }
    if m == 0 {
        return old
            .iter()
            .enumerate()
            .map(|(i, v)| DiffResult::delete(v.clone(), i))
            .collect();
    }

    let trace = forward(old, new, &mut eq);
    let results = backtrack(old, new, &trace);

    debug!(
        old_len = n,
        new_len = m,
        edits = trace.len() - 1,
        "myers diff computed"
    );
    results
}

/// Slot of diagonal `k` in the frontier for edit count `d`.
fn slot(k: isize, d: usize) -> usize {
    (k + d as isize) as usize
}

/// Whether step `d` reaches diagonal `k` by moving down from `k + 1`.
fn came_from_above(prev: &[usize], k: isize, d: usize) -> bool {
    let d_signed = d as isize;
    k == -d_signed || (k != d_signed && prev[slot(k - 1, d - 1)] < prev[slot(k + 1, d - 1)])
}

/// Run the forward pass, returning one frontier per edit count up to and
/// including the one that reaches the end of both sequences.
fn forward<T, F>(old: &[T], new: &[T], eq: &mut F) -> Vec<Vec<usize>>
where
    F: FnMut(&T, &T) -> bool,
{
    let n = old.len();
    let m = new.len();
    let mut trace: Vec<Vec<usize>> = Vec::new();

    for d in 0..=(n + m) {
        let mut v = vec![0usize; 2 * d + 1];
        let d_signed = d as isize;

        for k in (-d_signed..=d_signed).step_by(2) {
            let mut x = match trace.last() {
                None => 0,
                Some(prev) if came_from_above(prev, k, d) => prev[slot(k + 1, d - 1)],
                Some(prev) => prev[slot(k - 1, d - 1)] + 1,
            };
            let mut y = x as isize - k;

            while x < n && y >= 0 && (y as usize) < m && eq(&old[x], &new[y as usize]) {
                x += 1;
                y += 1;
            }

            v[slot(k, d)] = x;

            if x >= n && y >= m as isize {
                trace.push(v);
                return trace;
            }
        }

        trace.push(v);
    }

    trace
}

fn backtrack<T: Clone>(old: &[T], new: &[T], trace: &[Vec<usize>]) -> Vec<DiffResult<T>> {
    let mut x = old.len();
    let mut y = new.len();
    let mut results = Vec::with_capacity(x.max(y));

    for d in (1..trace.len()).rev() {
        let prev = &trace[d - 1];
        let k = x as isize - y as isize;

        let prev_k = if came_from_above(prev, k, d) { k + 1 } else { k - 1 };
        let prev_x = prev[slot(prev_k, d - 1)];
        let prev_y = (prev_x as isize - prev_k) as usize;

        while x > prev_x && y > prev_y {
            x -= 1;
            y -= 1;
            results.push(DiffResult::equal(old[x].clone(), x, y));
        }

        if prev_k == k + 1 {
            results.push(DiffResult::insert(new[prev_y].clone(), prev_y));
        } else {
            results.push(DiffResult::delete(old[prev_x].clone(), prev_x));
        }

        x = prev_x;
        y = prev_y;
    }

    // d == 0: whatever is left is the common prefix
    while x > 0 && y > 0 {
        x -= 1;
        y -= 1;
        results.push(DiffResult::equal(old[x].clone(), x, y));
    }

    results.reverse();
    results
}
