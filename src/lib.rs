//! Sequence, line, word and character diffing.
//!
//! - [`algorithm`]: Myers, dynamic-programming and patience diffs over any
//!   slice, plus Levenshtein distance
//! - [`granularity`]: word and character diffs of single strings
//! - [`diff`]: numbered line diffs, hunks and unified diff text
//! - [`side_by_side`]: two aligned columns with inline change ranges
//! - [`patch`]: applying a unified diff to text
//!
//! # Examples
//!
//! ```
//! use diffkit::diff::{UnifiedDiff, UnifiedDiffOptions, format};
//! use diffkit::patch::apply;
//!
//! let old = "one\ntwo\nthree\n";
//! let new = "one\n2\nthree\n";
//!
//! let text = format(old, new, &UnifiedDiffOptions::new("a/numbers", "b/numbers"));
//! assert!(text.contains("-two\n+2\n"));
//!
//! let parsed = UnifiedDiff::parse_strict(&text)?;
//! assert_eq!(apply(old, &parsed)?, new);
//! # Ok::<(), diffkit::DiffkitError>(())
//! ```

use error_set::error_set;

#[macro_use]
mod tracing_macros;

pub mod algorithm;
pub mod diff;
pub mod granularity;
pub mod parse;
pub mod patch;
pub mod side_by_side;

pub use algorithm::{DiffOp, DiffResult};
pub use diff::{Hunk, LineDiff, LineDiffWithContext, LineNumber, UnifiedDiff, UnifiedDiffOptions};
pub use granularity::{CharacterDiff, WordDiff};
pub use parse::ParseError;
pub use patch::PatchError;
pub use side_by_side::{InlineHighlights, SideBySideDiff, SideEntry};

error_set! {
    /// Top-level error for diffkit operations
    DiffkitError := {
        ParseError(ParseError),
        PatchError(PatchError),
    }
}
