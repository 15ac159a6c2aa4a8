//! Word and character level diffs of single strings.

use nom::{
    IResult, Parser, branch::alt, bytes::complete::take_while1, multi::many0,
};

use crate::algorithm::{DiffOp, DiffResult, minimal, myers};

/// Split text into alternating runs of whitespace and non-whitespace.
///
/// Whitespace runs are kept as tokens so that spacing changes show up in
/// the diff.
pub fn tokenize(text: &str) -> Vec<&str> {
    many0(token)
        .parse(text)
        .map(|(_, tokens)| tokens)
        .unwrap_or_default()
}

fn token(input: &str) -> IResult<&str, &str> {
    alt((
        take_while1(char::is_whitespace),
        take_while1(|c: char| !c.is_whitespace()),
    ))
    .parse(input)
}

/// A token with the emphasis it should receive on one side of a diff.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HighlightedToken<'a> {
    pub text: &'a str,
    pub op: DiffOp,
}

/// The two sides of a word diff, each in its own order.
///
/// `old` only holds `Equal`/`Delete` tokens, `new` only `Equal`/`Insert`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WordHighlight<'a> {
    #[cfg_attr(feature = "serde", serde(borrow))]
    pub old: Vec<HighlightedToken<'a>>,
    #[cfg_attr(feature = "serde", serde(borrow))]
    pub new: Vec<HighlightedToken<'a>>,
}

/// Diffs text word by word.
pub struct WordDiff;

impl WordDiff {
    pub fn diff<'a>(old: &'a str, new: &'a str) -> Vec<DiffResult<&'a str>> {
        myers::diff(&tokenize(old), &tokenize(new))
    }

    /// Partition a word diff into per-side token lists for emphasis.
    pub fn diff_with_highlight<'a>(old: &'a str, new: &'a str) -> WordHighlight<'a> {
        let mut highlight = WordHighlight::default();

        for result in Self::diff(old, new) {
            let token = HighlightedToken {
                text: result.value,
                op: result.op,
            };
            match result.op {
                DiffOp::Equal => {
                    highlight.old.push(token.clone());
                    highlight.new.push(token);
                }
                DiffOp::Delete => highlight.old.push(token),
                DiffOp::Insert => highlight.new.push(token),
            }
        }

        highlight
    }
}

/// Diffs text character by character.
pub struct CharacterDiff;

impl CharacterDiff {
    pub fn diff(old: &str, new: &str) -> Vec<DiffResult<char>> {
        let old: Vec<char> = old.chars().collect();
        let new: Vec<char> = new.chars().collect();
        myers::diff(&old, &new)
    }

    /// Character diff with consecutive entries of the same kind joined into
    /// one string. Each run keeps the indices of its first character.
    pub fn diff_merged(old: &str, new: &str) -> Vec<DiffResult<String>> {
        let mut merged: Vec<DiffResult<String>> = Vec::new();

        for result in Self::diff(old, new) {
            match merged.last_mut() {
                Some(last) if last.op == result.op => last.value.push(result.value),
                _ => merged.push(DiffResult {
                    op: result.op,
                    value: result.value.to_string(),
                    old_index: result.old_index,
                    new_index: result.new_index,
                }),
            }
        }

        merged
    }

    /// Normalized similarity in `[0, 1]` based on Levenshtein distance.
    ///
    /// Two empty strings are identical (`1.0`); an empty string against a
    /// non-empty one scores `0.0`.
    ///
    /// ```
    /// use diffkit::granularity::CharacterDiff;
    ///
    /// assert_eq!(CharacterDiff::similarity("abcd", "abce"), 0.75);
    /// assert_eq!(CharacterDiff::similarity("", ""), 1.0);
    /// ```
    pub fn similarity(a: &str, b: &str) -> f64 {
        let a: Vec<char> = a.chars().collect();
        let b: Vec<char> = b.chars().collect();

        let max_len = a.len().max(b.len());
        if max_len == 0 {
            return 1.0;
        }

        1.0 - minimal::edit_distance(&a, &b) as f64 / max_len as f64
    }
}
