//! Two-column rendering of a line diff.

use std::ops::Range;

use crate::algorithm::DiffOp;
use crate::diff::{LineDiff, LineDiffWithContext};
use crate::granularity::CharacterDiff;

/// One cell of a side-by-side column.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SideEntry {
    /// `None` for blank padding
    pub line_number: Option<usize>,
    pub content: String,
    pub op: DiffOp,
}

impl SideEntry {
    fn blank() -> Self {
        Self {
            line_number: None,
            content: String::new(),
            op: DiffOp::Equal,
        }
    }

    fn old_side(line: &LineDiff) -> Self {
        Self {
            line_number: line.line_number.old,
            content: line.content.clone(),
            op: line.op,
        }
    }

    fn new_side(line: &LineDiff) -> Self {
        Self {
            line_number: line.line_number.new,
            content: line.content.clone(),
            op: line.op,
        }
    }

    pub fn is_blank(&self) -> bool {
        self.line_number.is_none()
    }
}

/// Aligned old (`left`) and new (`right`) columns. Both always have the
/// same length.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SideBySideDiff {
    pub left: Vec<SideEntry>,
    pub right: Vec<SideEntry>,
}

impl SideBySideDiff {
    fn push(&mut self, left: SideEntry, right: SideEntry) {
        self.left.push(left);
        self.right.push(right);
    }

    pub fn len(&self) -> usize {
        self.left.len()
    }

    pub fn is_empty(&self) -> bool {
        self.left.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = (&SideEntry, &SideEntry)> {
        self.left.iter().zip(&self.right)
    }
}

/// Character ranges that changed on each side of a line pair.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InlineHighlights {
    /// Deleted ranges, in chars of the old line
    pub old: Vec<Range<usize>>,
    /// Inserted ranges, in chars of the new line
    pub new: Vec<Range<usize>>,
}

/// Align a line diff of two texts into two columns.
///
/// Equal lines share a row. A deletion directly followed by an insertion
/// shares a row as a replacement; any other change gets a blank cell on the
/// opposite side.
pub fn format(old_text: &str, new_text: &str) -> SideBySideDiff {
    let lines = LineDiffWithContext::diff(old_text, new_text);
    let mut columns = SideBySideDiff::default();
    let mut iter = lines.iter().peekable();

    while let Some(line) = iter.next() {
        match line.op {
            DiffOp::Equal => columns.push(SideEntry::old_side(line), SideEntry::new_side(line)),
            DiffOp::Delete => {
                if let Some(insert) = iter.next_if(|next| next.op == DiffOp::Insert) {
                    columns.push(SideEntry::old_side(line), SideEntry::new_side(insert));
                } else {
                    columns.push(SideEntry::old_side(line), SideEntry::blank());
                }
            }
            DiffOp::Insert => columns.push(SideEntry::blank(), SideEntry::new_side(line)),
        }
    }

    columns
}

/// Find the changed character ranges between two versions of a line.
///
/// ```
/// use diffkit::side_by_side::inline_highlights;
///
/// let highlights = inline_highlights("foo bar", "foo baz");
/// assert_eq!(highlights.old, vec![6..7]);
/// assert_eq!(highlights.new, vec![6..7]);
/// ```
pub fn inline_highlights(old_line: &str, new_line: &str) -> InlineHighlights {
    let mut highlights = InlineHighlights::default();
    let mut old_cursor = 0;
    let mut new_cursor = 0;

    for run in CharacterDiff::diff_merged(old_line, new_line) {
        let len = run.value.chars().count();
        match run.op {
            DiffOp::Equal => {
                old_cursor += len;
                new_cursor += len;
            }
            DiffOp::Delete => {
                extend_ranges(&mut highlights.old, old_cursor..old_cursor + len);
                old_cursor += len;
            }
            DiffOp::Insert => {
                extend_ranges(&mut highlights.new, new_cursor..new_cursor + len);
                new_cursor += len;
            }
        }
    }

    highlights
}

fn extend_ranges(ranges: &mut Vec<Range<usize>>, range: Range<usize>) {
    match ranges.last_mut() {
        Some(last) if last.end == range.start => last.end = range.end,
        _ => ranges.push(range),
    }
}

/// Render two texts as a fixed-width table, one diff row per line.
///
/// Each cell shows the line number, the change marker and the content cut
/// to `width` characters.
pub fn format_as_table(old_text: &str, new_text: &str, width: usize) -> String {
    let mut table = String::new();

    for (left, right) in format(old_text, new_text).rows() {
        let row = format!("{} | {}", cell(left, width), cell(right, width));
        table.push_str(row.trim_end());
        table.push('\n');
    }

    table
}

fn cell(entry: &SideEntry, width: usize) -> String {
    let number = entry
        .line_number
        .map(|n| n.to_string())
        .unwrap_or_default();
    let content: String = entry.content.chars().take(width).collect();
    format!(
        "{:>4} {}{:<width$}",
        number,
        entry.op.prefix(),
        content,
        width = width
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use similar_asserts::assert_eq;

    fn column(entries: &[SideEntry]) -> Vec<(Option<usize>, &str, DiffOp)> {
        entries
            .iter()
            .map(|e| (e.line_number, e.content.as_str(), e.op))
            .collect()
    }

    #[test]
    fn equal_lines_share_rows() {
        let columns = format("a\nb", "a\nb");
        assert_eq!(columns.len(), 2);
        assert_eq!(columns.left, columns.right);
    }

    #[test]
    fn replacement_shares_a_row() {
        let columns = format("a\nb\nc", "a\nx\nc");
        assert_eq!(
            column(&columns.left),
            vec![
                (Some(1), "a", DiffOp::Equal),
                (Some(2), "b", DiffOp::Delete),
                (Some(3), "c", DiffOp::Equal),
            ]
        );
        assert_eq!(
            column(&columns.right),
            vec![
                (Some(1), "a", DiffOp::Equal),
                (Some(2), "x", DiffOp::Insert),
                (Some(3), "c", DiffOp::Equal),
            ]
        );
    }

    #[test]
    fn lone_changes_are_padded() {
        let columns = format("a\ngone\nb", "a\nb\nadded");
        assert_eq!(columns.left.len(), columns.right.len());
        assert_eq!(
            column(&columns.left),
            vec![
                (Some(1), "a", DiffOp::Equal),
                (Some(2), "gone", DiffOp::Delete),
                (Some(3), "b", DiffOp::Equal),
                (None, "", DiffOp::Equal),
            ]
        );
        assert_eq!(
            column(&columns.right),
            vec![
                (Some(1), "a", DiffOp::Equal),
                (None, "", DiffOp::Equal),
                (Some(2), "b", DiffOp::Equal),
                (Some(3), "added", DiffOp::Insert),
            ]
        );
        assert!(columns.right[1].is_blank());
    }

    #[test]
    fn only_adjacent_delete_insert_pairs() {
        // Two deletions then two insertions: only the middle pair touches
        let columns = format("a\nb", "c\nd");
        assert_eq!(columns.len(), 3);
        assert!(columns.right[0].is_blank());
        assert_eq!(columns.left[1].content, "b");
        assert_eq!(columns.right[1].content, "c");
        assert!(columns.left[2].is_blank());
    }

    #[test]
    fn highlights_identical_lines() {
        assert_eq!(inline_highlights("same", "same"), InlineHighlights::default());
    }

    #[test]
    fn highlights_insertion_only() {
        let highlights = inline_highlights("ac", "abc");
        assert!(highlights.old.is_empty());
        assert_eq!(highlights.new, vec![1..2]);
    }

    #[test]
    fn highlights_use_char_offsets() {
        let highlights = inline_highlights("naïve x", "naïve y");
        assert_eq!(highlights.old, vec![6..7]);
        assert_eq!(highlights.new, vec![6..7]);
    }

    #[test]
    fn highlights_whole_line_change() {
        let highlights = inline_highlights("abc", "xyz");
        assert_eq!(highlights.old, vec![0..3]);
        assert_eq!(highlights.new, vec![0..3]);
    }

    #[test]
    fn touching_ranges_coalesce() {
        let mut ranges = vec![0..2];
        extend_ranges(&mut ranges, 2..3);
        extend_ranges(&mut ranges, 5..6);
        assert_eq!(ranges, vec![0..3, 5..6]);
    }

    #[test]
    fn table_rows() {
        let table = format_as_table("a\nb", "a\nc", 5);
        assert_eq!(
            table,
            "   1  a     |    1  a\n   2 -b     |    2 +c\n"
        );
    }

    #[test]
    fn table_truncates_and_pads_blanks() {
        let table = format_as_table("abcdefgh", "abcdefgh\nxy", 3);
        assert_eq!(
            table,
            "   1  abc |    1  abc\n          |    2 +xy\n"
        );
    }
}
