//! Line-oriented diffs with line numbers, hunks and unified patch text.

pub mod hunk;
pub mod unified;

pub use hunk::Hunk;
pub use unified::{UnifiedDiff, UnifiedDiffOptions, format};

use crate::algorithm::{DiffOp, myers};

/// 1-indexed position of a line on each side of the diff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LineNumber {
    /// Line in the old text (`None` for insertions)
    pub old: Option<usize>,
    /// Line in the new text (`None` for deletions)
    pub new: Option<usize>,
}

/// A single line of a line diff.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LineDiff {
    pub op: DiffOp,
    pub line_number: LineNumber,
    pub content: String,
}

impl LineDiff {
    pub fn equal(old: usize, new: usize, content: impl Into<String>) -> Self {
        Self {
            op: DiffOp::Equal,
            line_number: LineNumber {
                old: Some(old),
                new: Some(new),
            },
            content: content.into(),
        }
    }

    pub fn insert(new: usize, content: impl Into<String>) -> Self {
        Self {
            op: DiffOp::Insert,
            line_number: LineNumber {
                old: None,
                new: Some(new),
            },
            content: content.into(),
        }
    }

    pub fn delete(old: usize, content: impl Into<String>) -> Self {
        Self {
            op: DiffOp::Delete,
            line_number: LineNumber {
                old: Some(old),
                new: None,
            },
            content: content.into(),
        }
    }

    /// The same line seen from the other direction.
    pub fn reversed(&self) -> Self {
        Self {
            op: self.op.invert(),
            line_number: LineNumber {
                old: self.line_number.new,
                new: self.line_number.old,
            },
            content: self.content.clone(),
        }
    }
}

/// Split text into lines on `\n` or `\r\n`.
///
/// A trailing line break produces a final empty line, and empty input is a
/// single empty line.
pub fn split_lines(text: &str) -> Vec<&str> {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect()
}

/// Line diff with hunk grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LineDiffWithContext {
    context_lines: usize,
}

impl Default for LineDiffWithContext {
    fn default() -> Self {
        Self { context_lines: 3 }
    }
}

impl LineDiffWithContext {
    pub fn new(context_lines: usize) -> Self {
        Self { context_lines }
    }

    pub fn context_lines(&self) -> usize {
        self.context_lines
    }

    /// Diff two texts line by line, numbering lines from 1 on each side.
    pub fn diff(old_text: &str, new_text: &str) -> Vec<LineDiff> {
        let old_lines = split_lines(old_text);
        let new_lines = split_lines(new_text);

        let mut old_line = 1;
        let mut new_line = 1;

        myers::diff(&old_lines, &new_lines)
            .into_iter()
            .map(|result| match result.op {
                DiffOp::Equal => {
                    let line = LineDiff::equal(old_line, new_line, result.value);
                    old_line += 1;
                    new_line += 1;
                    line
                }
                DiffOp::Delete => {
                    let line = LineDiff::delete(old_line, result.value);
                    old_line += 1;
                    line
                }
                DiffOp::Insert => {
                    let line = LineDiff::insert(new_line, result.value);
                    new_line += 1;
                    line
                }
            })
            .collect()
    }

    /// Diff two texts and group the changes into hunks.
    pub fn hunks(&self, old_text: &str, new_text: &str) -> Vec<Hunk> {
        self.group(&Self::diff(old_text, new_text))
    }

    /// Group a flat line diff into hunks.
    ///
    /// Leading context never reaches back into lines that closed the
    /// previous hunk, so no line appears in two hunks.
    pub fn group(&self, lines: &[LineDiff]) -> Vec<Hunk> {
        let mut hunks = Vec::new();
        let mut current: Option<Vec<LineDiff>> = None;
        let mut last_change = 0;
        let mut previous_end = 0;

        for (i, line) in lines.iter().enumerate() {
            if line.op != DiffOp::Equal {
                let hunk = current.get_or_insert_with(|| {
                    let start = i.saturating_sub(self.context_lines).max(previous_end);
                    lines[start..i].to_vec()
                });
                hunk.push(line.clone());
                last_change = i;
            } else if let Some(mut hunk) = current.take() {
                if i - last_change <= self.context_lines {
                    hunk.push(line.clone());
                    current = Some(hunk);
                } else {
                    hunks.push(Hunk::new(hunk));
                    previous_end = i;
                }
            }
        }

        if let Some(hunk) = current {
            hunks.push(Hunk::new(hunk));
        }

        debug!(
            lines = lines.len(),
            hunks = hunks.len(),
            context = self.context_lines,
            "grouped line diff"
        );
        hunks
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use similar_asserts::assert_eq;

    fn numbered(count: usize) -> Vec<String> {
        (1..=count).map(|i| format!("line {i}")).collect()
    }

    #[test]
    fn split_handles_crlf_and_trailing_newline() {
        assert_eq!(split_lines("a\r\nb\nc"), vec!["a", "b", "c"]);
        assert_eq!(split_lines("a\n"), vec!["a", ""]);
        assert_eq!(split_lines(""), vec![""]);
    }

    #[test]
    fn diff_numbers_lines_per_side() {
        let lines = LineDiffWithContext::diff("a\nb\nc", "a\nx\nc\nd");
        assert_eq!(
            lines,
            vec![
                LineDiff::equal(1, 1, "a"),
                LineDiff::delete(2, "b"),
                LineDiff::insert(2, "x"),
                LineDiff::equal(3, 3, "c"),
                LineDiff::insert(4, "d"),
            ]
        );
    }

    #[test]
    fn identical_texts_have_no_hunks() {
        let hunks = LineDiffWithContext::default().hunks("a\nb\n", "a\nb\n");
        assert!(hunks.is_empty());
    }

    #[test]
    fn single_change_hunk_window() {
        let old = numbered(10);
        let mut new = old.clone();
        new[4] = "changed".to_string();

        let hunks = LineDiffWithContext::new(2).hunks(&old.join("\n"), &new.join("\n"));

        assert_eq!(hunks.len(), 1);
        let hunk = &hunks[0];
        assert_eq!(hunk.old_start(), 3);
        assert_eq!(hunk.old_count(), 5);
        assert_eq!(hunk.new_start(), 3);
        assert_eq!(hunk.new_count(), 5);
        assert_eq!(hunk.lines.first().unwrap().content, "line 3");
        assert_eq!(hunk.lines.last().unwrap().content, "line 7");
    }

    #[test]
    fn distant_changes_split_into_hunks() {
        let old = numbered(20);
        let mut new = old.clone();
        new[1] = "second".to_string();
        new[17] = "eighteenth".to_string();

        let hunks = LineDiffWithContext::new(3).hunks(&old.join("\n"), &new.join("\n"));

        assert_eq!(hunks.len(), 2);
        assert_eq!(hunks[0].old_start(), 1);
        assert_eq!(hunks[0].old_count(), 5);
        assert_eq!(hunks[1].old_start(), 15);
        assert_eq!(hunks[1].old_count(), 6);
    }

    #[test]
    fn close_changes_share_a_hunk() {
        let old = numbered(10);
        let mut new = old.clone();
        new[2] = "three".to_string();
        new[5] = "six".to_string();

        let hunks = LineDiffWithContext::new(3).hunks(&old.join("\n"), &new.join("\n"));
        assert_eq!(hunks.len(), 1);
        assert_eq!(hunks[0].old_start(), 1);
        assert_eq!(hunks[0].old_count(), 9);
    }

    #[test]
    fn leading_context_stops_at_previous_hunk() {
        // Gap of exactly 2 * context lines: the second hunk picks up the
        // lines the first one left behind, without repeating any
        let old = numbered(12);
        let mut new = old.clone();
        new[1] = "two".to_string();
        new[6] = "seven".to_string();

        let hunks = LineDiffWithContext::new(2).hunks(&old.join("\n"), &new.join("\n"));
        assert_eq!(hunks.len(), 2);

        let first_last = hunks[0].lines.last().unwrap().line_number.old;
        let second_first = hunks[1].lines.first().unwrap().line_number.old;
        assert_eq!(first_last, Some(4));
        assert_eq!(second_first, Some(5));
    }

    #[test]
    fn zero_context_keeps_only_changes() {
        let hunks = LineDiffWithContext::new(0).hunks("a\nb\nc", "a\nB\nc");
        assert_eq!(hunks.len(), 1);
        assert_eq!(
            hunks[0].lines,
            vec![LineDiff::delete(2, "b"), LineDiff::insert(2, "B")]
        );
    }

    #[test]
    fn reversed_line_swaps_sides() {
        let line = LineDiff::delete(4, "gone");
        assert_eq!(line.reversed(), LineDiff::insert(4, "gone"));
    }
}
