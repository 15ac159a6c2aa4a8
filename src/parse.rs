//! Parsers for the header lines of unified diff text.
//!
//! # Syntax
//!
//! - `--- NAME[\tTIMESTAMP]` - old file header
//! - `+++ NAME[\tTIMESTAMP]` - new file header
//! - `@@ -A[,B] +C[,D] @@[ SECTION]` - hunk header, counts optional
//!
//! # Examples
//!
//! ```
//! use diffkit::parse::{hunk_header, old_file_header};
//!
//! let (_, header) = hunk_header("@@ -136,0 +137 @@ fn main").unwrap();
//! assert_eq!(header.old_start, 136);
//! assert_eq!(header.old_count, Some(0));
//! assert_eq!(header.new_start, 137);
//! assert_eq!(header.new_count, None);
//!
//! let (_, file) = old_file_header("--- a/flake.nix\t2024-01-01").unwrap();
//! assert_eq!(file.name, "a/flake.nix");
//! assert_eq!(file.timestamp, Some("2024-01-01"));
//! ```

use error_set::error_set;
use nom::{
    IResult, Parser,
    bytes::complete::{tag, take_till},
    character::complete::{char, digit1},
    combinator::{map_res, opt, rest},
    sequence::preceded,
};

error_set! {
    /// Errors from strict parsing of unified diff text
    ParseError := {
        /// No `--- ` line before the first hunk
        #[display("Missing '--- ' file header")]
        MissingOldHeader,
        /// No `+++ ` line before the first hunk
        #[display("Missing '+++ ' file header")]
        MissingNewHeader,
        /// Line starts with `@@` but is not a valid hunk header
        #[display("Invalid hunk header on line {line}: '{text}'")]
        InvalidHunkHeader { line: usize, text: String },
        /// Line is neither a header nor a valid hunk body line
        #[display("Unexpected content on line {line}: '{text}'")]
        UnexpectedLine { line: usize, text: String },
        /// Hunk body length disagrees with the counts in its header
        #[display("Hunk on line {line} declares -{expected_old} +{expected_new} but has -{actual_old} +{actual_new}")]
        CountMismatch {
            line: usize,
            expected_old: usize,
            expected_new: usize,
            actual_old: usize,
            actual_new: usize,
        },
    }
}

/// Parsed `@@` line. Counts are `None` when the header omits them, which
/// means a count of one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HunkHeader {
    pub old_start: usize,
    pub old_count: Option<usize>,
    pub new_start: usize,
    pub new_count: Option<usize>,
}

impl HunkHeader {
    pub fn old_len(&self) -> usize {
        self.old_count.unwrap_or(1)
    }

    pub fn new_len(&self) -> usize {
        self.new_count.unwrap_or(1)
    }
}

/// Parsed `---` or `+++` line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FileHeader<'a> {
    /// Everything up to the first tab
    pub name: &'a str,
    /// Everything after the first tab, if there is one
    #[cfg_attr(feature = "serde", serde(borrow))]
    pub timestamp: Option<&'a str>,
}

fn number(input: &str) -> IResult<&str, usize> {
    map_res(digit1, |digits: &str| digits.parse::<usize>()).parse(input)
}

/// `START[,COUNT]`
fn range(input: &str) -> IResult<&str, (usize, Option<usize>)> {
    (number, opt(preceded(char(','), number))).parse(input)
}

/// Parse a `@@ -A[,B] +C[,D] @@` line. Anything after the closing `@@`
/// is left in the remaining input.
pub fn hunk_header(input: &str) -> IResult<&str, HunkHeader> {
    let (remaining, (_, (old_start, old_count), _, (new_start, new_count), _)) =
        (tag("@@ -"), range, tag(" +"), range, tag(" @@")).parse(input)?;

    Ok((
        remaining,
        HunkHeader {
            old_start,
            old_count,
            new_start,
            new_count,
        },
    ))
}

fn file_header<'a>(marker: &'static str, input: &'a str) -> IResult<&'a str, FileHeader<'a>> {
    let (remaining, (name, timestamp)) = preceded(
        tag(marker),
        (take_till(|c: char| c == '\t'), opt(preceded(char('\t'), rest))),
    )
    .parse(input)?;

    Ok((remaining, FileHeader { name, timestamp }))
}

/// Parse a `--- NAME[\tTIMESTAMP]` line.
pub fn old_file_header(input: &str) -> IResult<&str, FileHeader<'_>> {
    file_header("--- ", input)
}

/// Parse a `+++ NAME[\tTIMESTAMP]` line.
pub fn new_file_header(input: &str) -> IResult<&str, FileHeader<'_>> {
    file_header("+++ ", input)
}
