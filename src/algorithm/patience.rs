//! Patience diff.
//!
//! Lines that occur exactly once on each side are matched up as anchors.
//! The anchors that keep their relative order (the longest increasing
//! subsequence by new position) are fixed as `Equal`, and the gaps between
//! them are diffed recursively. A range without anchors falls back to Myers.

use std::collections::HashMap;
use std::hash::Hash;
use std::ops::Range;

use super::{DiffResult, myers};

/// Diff two sequences, anchoring on elements unique to both sides.
pub fn diff<T>(old: &[T], new: &[T]) -> Vec<DiffResult<T>>
where
    T: Hash + Eq + Clone,
{
    let mut results = Vec::with_capacity(old.len().max(new.len()));
    diff_range(old, 0..old.len(), new, 0..new.len(), &mut results);
    results
}

fn diff_range<T>(
    old: &[T],
    old_range: Range<usize>,
    new: &[T],
    new_range: Range<usize>,
    out: &mut Vec<DiffResult<T>>,
) where
    T: Hash + Eq + Clone,
{
    let old_slice = &old[old_range.clone()];
    let new_slice = &new[new_range.clone()];

    let anchors = if old_slice.is_empty() || new_slice.is_empty() {
        Vec::new()
    } else {
        find_anchors(old_slice, new_slice)
    };

    if anchors.is_empty() {
        out.extend(
            myers::diff(old_slice, new_slice)
                .into_iter()
                .map(|r| r.offset(old_range.start, new_range.start)),
        );
        return;
    }

    trace!(
        old_start = old_range.start,
        new_start = new_range.start,
        anchors = anchors.len(),
        "patience anchors"
    );

    let mut old_pos = old_range.start;
    let mut new_pos = new_range.start;
    for (old_offset, new_offset) in anchors {
        let old_anchor = old_range.start + old_offset;
        let new_anchor = new_range.start + new_offset;

        diff_range(old, old_pos..old_anchor, new, new_pos..new_anchor, out);
        out.push(DiffResult::equal(
            old[old_anchor].clone(),
            old_anchor,
            new_anchor,
        ));

        old_pos = old_anchor + 1;
        new_pos = new_anchor + 1;
    }
    diff_range(old, old_pos..old_range.end, new, new_pos..new_range.end, out);
}

/// Matched positions of elements that occur once in `old` and once in
/// `new`, reduced to the longest run that is increasing on both sides.
fn find_anchors<T: Hash + Eq>(old: &[T], new: &[T]) -> Vec<(usize, usize)> {
    // element -> (count in old, position in old, count in new, position in new)
    let mut seen: HashMap<&T, (usize, usize, usize, usize)> = HashMap::new();
    for (i, item) in old.iter().enumerate() {
        let entry = seen.entry(item).or_insert((0, i, 0, 0));
        entry.0 += 1;
    }
    for (j, item) in new.iter().enumerate() {
        if let Some(entry) = seen.get_mut(item) {
            entry.2 += 1;
            entry.3 = j;
        }
    }

    let mut pairs: Vec<(usize, usize)> = seen
        .into_values()
        .filter(|&(old_count, _, new_count, _)| old_count == 1 && new_count == 1)
        .map(|(_, i, _, j)| (i, j))
        .collect();
    pairs.sort_unstable();

    longest_increasing(&pairs)
}

/// Longest subsequence of `pairs` (already sorted by the first element)
/// whose second elements strictly increase. Patience sorting with back
/// pointers, O(n log n).
fn longest_increasing(pairs: &[(usize, usize)]) -> Vec<(usize, usize)> {
    // tails[len - 1] = index into pairs of the smallest tail of a run of length len
    let mut tails: Vec<usize> = Vec::new();
    let mut back: Vec<Option<usize>> = vec![None; pairs.len()];

    for (idx, &(_, new_pos)) in pairs.iter().enumerate() {
        let len = tails.partition_point(|&t| pairs[t].1 < new_pos);
        if len > 0 {
            back[idx] = Some(tails[len - 1]);
        }
        if len == tails.len() {
            tails.push(idx);
        } else {
            tails[len] = idx;
        }
    }

    let mut run = Vec::with_capacity(tails.len());
    let mut cursor = tails.last().copied();
    while let Some(idx) = cursor {
        run.push(pairs[idx]);
        cursor = back[idx];
    }
    run.reverse();
    run
}
