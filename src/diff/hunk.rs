use std::fmt;

use super::LineDiff;
use crate::algorithm::DiffOp;

/// A contiguous block of a line diff: one or more changes plus the
/// unchanged lines around them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Hunk {
    pub lines: Vec<LineDiff>,
}

impl Hunk {
    pub fn new(lines: Vec<LineDiff>) -> Self {
        Self { lines }
    }

    /// First old line covered by the hunk, or 1 if it only inserts.
    pub fn old_start(&self) -> usize {
        self.lines
            .iter()
            .filter_map(|l| l.line_number.old)
            .min()
            .unwrap_or(1)
    }

    /// First new line covered by the hunk, or 1 if it only deletes.
    pub fn new_start(&self) -> usize {
        self.lines
            .iter()
            .filter_map(|l| l.line_number.new)
            .min()
            .unwrap_or(1)
    }

    /// Lines read from the old text (context and deletions).
    pub fn old_count(&self) -> usize {
        self.lines.iter().filter(|l| l.op != DiffOp::Insert).count()
    }

    /// Lines written to the new text (context and insertions).
    pub fn new_count(&self) -> usize {
        self.lines.iter().filter(|l| l.op != DiffOp::Delete).count()
    }

    /// Whether the hunk contains anything besides context.
    pub fn has_changes(&self) -> bool {
        self.lines.iter().any(|l| l.op != DiffOp::Equal)
    }

    /// The hunk that undoes this one.
    pub fn reversed(&self) -> Self {
        Self {
            lines: self.lines.iter().map(LineDiff::reversed).collect(),
        }
    }

    /// The `@@ -a,b +c,d @@` line for this hunk.
    pub fn header(&self) -> String {
        format!(
            "@@ -{},{} +{},{} @@",
            self.old_start(),
            self.old_count(),
            self.new_start(),
            self.new_count()
        )
    }
}

impl fmt::Display for Hunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.header())?;
        for line in &self.lines {
            writeln!(f, "{}{}", line.op.prefix(), line.content)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use similar_asserts::assert_eq;

    fn replacement() -> Hunk {
        Hunk::new(vec![
            LineDiff::equal(9, 9, "context"),
            LineDiff::delete(10, "old version"),
            LineDiff::insert(10, "new version"),
            LineDiff::insert(11, "extra"),
            LineDiff::equal(11, 12, "after"),
        ])
    }

    #[test]
    fn counts_per_side() {
        let hunk = replacement();
        assert_eq!(hunk.old_start(), 9);
        assert_eq!(hunk.old_count(), 3);
        assert_eq!(hunk.new_start(), 9);
        assert_eq!(hunk.new_count(), 4);
    }

    #[test]
    fn render_replacement() {
        assert_eq!(
            replacement().to_string(),
            "@@ -9,3 +9,4 @@\n context\n-old version\n+new version\n+extra\n after\n"
        );
    }

    #[test]
    fn render_pure_insertion_defaults_old_start() {
        let hunk = Hunk::new(vec![LineDiff::insert(4, "new line here")]);
        assert_eq!(hunk.to_string(), "@@ -1,0 +4,1 @@\n+new line here\n");
    }

    #[test]
    fn render_pure_deletion_defaults_new_start() {
        let hunk = Hunk::new(vec![LineDiff::delete(7, "old line removed")]);
        assert_eq!(hunk.to_string(), "@@ -7,1 +1,0 @@\n-old line removed\n");
    }

    #[test]
    fn render_empty_line_content() {
        let hunk = Hunk::new(vec![
            LineDiff::insert(11, "first"),
            LineDiff::insert(12, ""),
            LineDiff::insert(13, "third"),
        ]);
        assert_eq!(hunk.to_string(), "@@ -1,0 +11,3 @@\n+first\n+\n+third\n");
    }

    #[test]
    fn reversed_swaps_counts() {
        let reversed = replacement().reversed();
        assert_eq!(reversed.old_count(), 4);
        assert_eq!(reversed.new_count(), 3);
        assert_eq!(reversed.header(), "@@ -9,4 +9,3 @@");
    }

    #[test]
    fn context_only_hunk_has_no_changes() {
        let hunk = Hunk::new(vec![LineDiff::equal(1, 1, "same")]);
        assert!(!hunk.has_changes());
        assert!(replacement().has_changes());
    }
}
