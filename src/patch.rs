//! Apply unified diffs to text in memory.

use error_set::error_set;

use crate::algorithm::DiffOp;
use crate::diff::{Hunk, UnifiedDiff, split_lines};

error_set! {
    /// Errors from applying a diff to text
    PatchError := {
        /// Hunks must be sorted and must not share lines
        #[display("Hunk {hunk} starts before the end of the previous hunk")]
        OverlappingHunk { hunk: usize },
        #[display("Hunk {hunk} reaches past the end of the input at line {line}")]
        OutOfRange { hunk: usize, line: usize },
        #[display("Context mismatch on line {line}: expected '{expected}', found '{actual}'")]
        ContextMismatch {
            line: usize,
            expected: String,
            actual: String,
        },
    }
}

/// Apply `diff` to `old_text`, producing the new text.
///
/// Every context and deleted line must match the input exactly. Lines
/// between hunks are copied through unchanged.
///
/// # Examples
///
/// ```
/// use diffkit::diff::{UnifiedDiff, UnifiedDiffOptions};
/// use diffkit::patch::apply;
///
/// let diff = UnifiedDiff::from_texts("a\nb\n", "a\nc\n", &UnifiedDiffOptions::default());
/// assert_eq!(apply("a\nb\n", &diff).unwrap(), "a\nc\n");
/// ```
///
/// # Errors
///
/// Returns a [`PatchError`] when a hunk is out of order, runs past the end
/// of the input, or its context does not match.
pub fn apply(old_text: &str, diff: &UnifiedDiff) -> Result<String, PatchError> {
    let old_lines = split_lines(old_text);
    let mut output: Vec<&str> = Vec::with_capacity(old_lines.len());
    let mut cursor = 0;

    for (index, hunk) in diff.hunks.iter().enumerate() {
        let number = index + 1;
        let anchor = hunk_anchor(hunk, cursor, output.len())
            .filter(|anchor| *anchor >= cursor)
            .ok_or(PatchError::OverlappingHunk { hunk: number })?;

        if anchor > old_lines.len() {
            return Err(PatchError::OutOfRange {
                hunk: number,
                line: anchor + 1,
            });
        }

        output.extend_from_slice(&old_lines[cursor..anchor]);
        cursor = anchor;

        for line in &hunk.lines {
            if line.op == DiffOp::Insert {
                output.push(&line.content);
                continue;
            }

            let actual = *old_lines.get(cursor).ok_or(PatchError::OutOfRange {
                hunk: number,
                line: cursor + 1,
            })?;
            if actual != line.content {
                return Err(PatchError::ContextMismatch {
                    line: cursor + 1,
                    expected: line.content.clone(),
                    actual: actual.to_string(),
                });
            }
            if line.op == DiffOp::Equal {
                output.push(actual);
            }
            cursor += 1;
        }

        trace!(hunk = number, cursor, "applied hunk");
    }

    output.extend_from_slice(&old_lines[cursor..]);

    debug!(
        hunks = diff.hunks.len(),
        old_lines = old_lines.len(),
        new_lines = output.len(),
        "applied diff"
    );
    Ok(output.join("\n"))
}

/// Undo `diff` on `new_text`, recovering the old text.
///
/// # Errors
///
/// Same as [`apply`], against the reversed diff.
pub fn revert(new_text: &str, diff: &UnifiedDiff) -> Result<String, PatchError> {
    apply(new_text, &diff.reversed())
}

/// 0-based old line where the hunk begins.
///
/// A hunk that reads no old lines is placed by its new line numbers, using
/// the offset between input and output built up so far.
fn hunk_anchor(hunk: &Hunk, cursor: usize, written: usize) -> Option<usize> {
    if let Some(first_old) = hunk.lines.iter().filter_map(|l| l.line_number.old).min() {
        return Some(first_old.saturating_sub(1));
    }
    (cursor + hunk.new_start().saturating_sub(1)).checked_sub(written)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::diff::{LineDiff, UnifiedDiffOptions};
    use similar_asserts::assert_eq;

    fn diff_of(old: &str, new: &str, context: usize) -> UnifiedDiff {
        UnifiedDiff::from_texts(old, new, &UnifiedDiffOptions::default().context_lines(context))
    }

    fn single(lines: Vec<LineDiff>) -> UnifiedDiff {
        UnifiedDiff {
            hunks: vec![Hunk::new(lines)],
            ..UnifiedDiff::default()
        }
    }

    #[test]
    fn apply_generated_diff() {
        let old = "fn main() {\n    println!(\"hi\");\n}\n";
        let new = "fn main() {\n    let x = 1;\n    println!(\"{x}\");\n}\n";
        assert_eq!(apply(old, &diff_of(old, new, 3)).unwrap(), new);
    }

    #[test]
    fn apply_empty_diff_is_identity() {
        let text = "unchanged\ntext";
        assert_eq!(apply(text, &UnifiedDiff::default()).unwrap(), text);
    }

    #[test]
    fn apply_pure_insertion_without_context() {
        let diff = diff_of("a\nb", "a\nx\nb", 0);
        assert_eq!(diff.hunks[0].lines, vec![LineDiff::insert(2, "x")]);
        assert_eq!(apply("a\nb", &diff).unwrap(), "a\nx\nb");
    }

    #[test]
    fn apply_several_hunks_without_context() {
        let old = "1\n2\n3\n4\n5\n6\n7\n8";
        let new = "1\nnew\n2\n3\n5\n6\n7\nlast\n8";
        let diff = diff_of(old, new, 0);
        assert_eq!(apply(old, &diff).unwrap(), new);
        assert_eq!(revert(new, &diff).unwrap(), old);
    }

    #[test]
    fn apply_parsed_text() {
        let patch = "--- a\n+++ b\n@@ -2,2 +2,2 @@\n b\n-c\n+C\n";
        let diff = UnifiedDiff::parse(patch);
        assert_eq!(apply("a\nb\nc\nd", &diff).unwrap(), "a\nb\nC\nd");
    }

    #[test]
    fn revert_restores_old() {
        let old = "alpha\nbeta\ngamma\n";
        let new = "alpha\ngamma\ndelta\n";
        let diff = diff_of(old, new, 1);
        assert_eq!(revert(new, &diff).unwrap(), old);
    }

    #[test]
    fn context_mismatch() {
        let diff = single(vec![LineDiff::delete(2, "x"), LineDiff::insert(2, "y")]);
        let err = apply("a\nb\nc", &diff).unwrap_err();
        assert!(matches!(
            &err,
            PatchError::ContextMismatch { line: 2, expected, actual }
                if expected == "x" && actual == "b"
        ));
        assert_eq!(
            err.to_string(),
            "Context mismatch on line 2: expected 'x', found 'b'"
        );
    }

    #[test]
    fn hunk_past_end_of_input() {
        let diff = single(vec![LineDiff::delete(5, "x")]);
        let result = apply("a", &diff);
        assert!(matches!(
            result,
            Err(PatchError::OutOfRange { hunk: 1, line: 5 })
        ));
    }

    #[test]
    fn hunk_body_past_end_of_input() {
        let diff = single(vec![LineDiff::equal(2, 2, "b"), LineDiff::delete(3, "c")]);
        let result = apply("a\nb", &diff);
        assert!(matches!(
            result,
            Err(PatchError::OutOfRange { hunk: 1, line: 3 })
        ));
    }

    #[test]
    fn overlapping_hunks() {
        let diff = UnifiedDiff {
            hunks: vec![
                Hunk::new(vec![LineDiff::delete(3, "c")]),
                Hunk::new(vec![LineDiff::delete(2, "b")]),
            ],
            ..UnifiedDiff::default()
        };
        let result = apply("a\nb\nc\nd", &diff);
        assert!(matches!(
            result,
            Err(PatchError::OverlappingHunk { hunk: 2 })
        ));
    }
}
