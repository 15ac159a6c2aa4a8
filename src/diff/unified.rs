use std::fmt;

use super::hunk::Hunk;
use super::{LineDiff, LineDiffWithContext};
use crate::parse::{ParseError, hunk_header, new_file_header, old_file_header};

/// Labels and context size for unified diff output.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnifiedDiffOptions {
    /// Unchanged lines kept around each change
    pub context_lines: usize,
    pub old_file_name: String,
    pub new_file_name: String,
    pub old_timestamp: Option<String>,
    pub new_timestamp: Option<String>,
}

impl Default for UnifiedDiffOptions {
    fn default() -> Self {
        Self {
            context_lines: 3,
            old_file_name: String::new(),
            new_file_name: String::new(),
            old_timestamp: None,
            new_timestamp: None,
        }
    }
}

impl UnifiedDiffOptions {
    pub fn new(old_file_name: impl Into<String>, new_file_name: impl Into<String>) -> Self {
        Self {
            old_file_name: old_file_name.into(),
            new_file_name: new_file_name.into(),
            ..Self::default()
        }
    }

    pub fn context_lines(mut self, context_lines: usize) -> Self {
        self.context_lines = context_lines;
        self
    }

    pub fn timestamps(mut self, old: impl Into<String>, new: impl Into<String>) -> Self {
        self.old_timestamp = Some(old.into());
        self.new_timestamp = Some(new.into());
        self
    }
}

/// Render the unified diff between two texts.
///
/// Returns an empty string when the texts have no differences.
///
/// # Examples
///
/// ```
/// use diffkit::diff::{UnifiedDiffOptions, format};
///
/// let patch = format("a\nb\nc", "a\nx\nc", &UnifiedDiffOptions::new("old.txt", "new.txt"));
/// assert_eq!(patch, "--- old.txt\n+++ new.txt\n@@ -1,3 +1,3 @@\n a\n-b\n+x\n c\n");
/// ```
pub fn format(old_text: &str, new_text: &str, options: &UnifiedDiffOptions) -> String {
    let diff = UnifiedDiff::from_texts(old_text, new_text, options);
    if diff.hunks.is_empty() {
        String::new()
    } else {
        diff.to_string()
    }
}

/// A single-file unified diff: two file headers and the hunks between them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnifiedDiff {
    pub old_file: String,
    pub new_file: String,
    pub old_timestamp: Option<String>,
    pub new_timestamp: Option<String>,
    pub hunks: Vec<Hunk>,
}

/// Hunk being filled while parsing.
struct OpenHunk {
    lines: Vec<LineDiff>,
    old_line: usize,
    new_line: usize,
}

impl OpenHunk {
    fn new(old_start: usize, new_start: usize) -> Self {
        Self {
            lines: Vec::new(),
            old_line: old_start,
            new_line: new_start,
        }
    }

    /// Add a body line by its prefix. Returns `false` for lines that are not
    /// hunk body lines.
    fn push(&mut self, line: &str) -> bool {
        if let Some(content) = line.strip_prefix('-') {
            self.lines.push(LineDiff::delete(self.old_line, content));
            self.old_line += 1;
        } else if let Some(content) = line.strip_prefix('+') {
            self.lines.push(LineDiff::insert(self.new_line, content));
            self.new_line += 1;
        } else if line.is_empty() || line.starts_with(' ') {
            let content = line.strip_prefix(' ').unwrap_or(line);
            self.lines
                .push(LineDiff::equal(self.old_line, self.new_line, content));
            self.old_line += 1;
            self.new_line += 1;
        } else {
            return false;
        }
        true
    }

    fn finish(self, hunks: &mut Vec<Hunk>) {
        if !self.lines.is_empty() {
            hunks.push(Hunk::new(self.lines));
        }
    }
}

impl UnifiedDiff {
    /// Diff two texts into a structured unified diff.
    pub fn from_texts(old_text: &str, new_text: &str, options: &UnifiedDiffOptions) -> Self {
        Self {
            old_file: options.old_file_name.clone(),
            new_file: options.new_file_name.clone(),
            old_timestamp: options.old_timestamp.clone(),
            new_timestamp: options.new_timestamp.clone(),
            hunks: LineDiffWithContext::new(options.context_lines).hunks(old_text, new_text),
        }
    }

    /// Parse unified diff text, skipping anything that isn't recognized.
    ///
    /// Hunk header counts are not checked; only the start lines are used to
    /// number the body. A `--- ` line inside a hunk counts as a file header
    /// only when a `+++ ` line follows it, otherwise it is a deletion.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let lines: Vec<&str> = text.lines().collect();
        let mut diff = UnifiedDiff::default();
        let mut current: Option<OpenHunk> = None;
        let mut i = 0;

        while i < lines.len() {
            let line = lines[i];
            i += 1;

            let next_is_new_header = lines
                .get(i)
                .is_some_and(|next| new_file_header(next).is_ok());

            if let Ok((_, header)) = old_file_header(line)
                && (current.is_none() || next_is_new_header)
            {
                if let Some(hunk) = current.take() {
                    hunk.finish(&mut diff.hunks);
                }
                diff.old_file = header.name.to_string();
                diff.old_timestamp = header.timestamp.map(str::to_string);
                continue;
            }

            if current.is_none()
                && let Ok((_, header)) = new_file_header(line)
            {
                diff.new_file = header.name.to_string();
                diff.new_timestamp = header.timestamp.map(str::to_string);
                continue;
            }

            if let Ok((_, header)) = hunk_header(line) {
                if let Some(hunk) = current.take() {
                    hunk.finish(&mut diff.hunks);
                }
                current = Some(OpenHunk::new(header.old_start, header.new_start));
                continue;
            }

            let accepted = current.as_mut().is_some_and(|hunk| hunk.push(line));
            if !accepted {
                trace!(line = i, text = line, "skipping unrecognized line");
            }
        }

        if let Some(hunk) = current {
            hunk.finish(&mut diff.hunks);
        }

        debug!(hunks = diff.hunks.len(), "parsed unified diff");
        diff
    }

    /// Parse unified diff text, rejecting anything that isn't well formed.
    ///
    /// Both file headers must precede the first hunk, every `@@` line must
    /// be a valid header, and each hunk body must contain exactly the number
    /// of lines its header declares. `diff ` and `index ` preamble lines and
    /// `\ No newline at end of file` markers are accepted and ignored.
    ///
    /// # Errors
    ///
    /// Returns the first [`ParseError`] encountered.
    pub fn parse_strict(text: &str) -> Result<Self, ParseError> {
        struct Pending {
            hunk: OpenHunk,
            header_line: usize,
            expected_old: usize,
            expected_new: usize,
            actual_old: usize,
            actual_new: usize,
        }

        impl Pending {
            fn is_complete(&self) -> bool {
                self.actual_old == self.expected_old && self.actual_new == self.expected_new
            }

            fn mismatch(&self) -> ParseError {
                ParseError::CountMismatch {
                    line: self.header_line,
                    expected_old: self.expected_old,
                    expected_new: self.expected_new,
                    actual_old: self.actual_old,
                    actual_new: self.actual_new,
                }
            }
        }

        let mut diff = UnifiedDiff::default();
        let mut seen_old = false;
        let mut seen_new = false;
        let mut pending: Option<Pending> = None;

        for (idx, line) in text.lines().enumerate() {
            let line_no = idx + 1;
            let unexpected = || ParseError::UnexpectedLine {
                line: line_no,
                text: line.to_string(),
            };

            if line.starts_with('\\') {
                continue;
            }

            // Inside an incomplete hunk every line belongs to the body
            if let Some(open) = pending.as_mut().filter(|p| !p.is_complete()) {
                let (old_delta, new_delta) = match line.chars().next() {
                    Some('-') => (1, 0),
                    Some('+') => (0, 1),
                    Some(' ') | None => (1, 1),
                    _ => return Err(unexpected()),
                };
                open.actual_old += old_delta;
                open.actual_new += new_delta;
                if open.actual_old > open.expected_old || open.actual_new > open.expected_new {
                    return Err(open.mismatch());
                }
                open.hunk.push(line);
                continue;
            }

            if let Ok((_, header)) = hunk_header(line) {
                if !seen_old {
                    return Err(ParseError::MissingOldHeader);
                }
                if !seen_new {
                    return Err(ParseError::MissingNewHeader);
                }
                if let Some(done) = pending.take() {
                    done.hunk.finish(&mut diff.hunks);
                }
                pending = Some(Pending {
                    hunk: OpenHunk::new(header.old_start, header.new_start),
                    header_line: line_no,
                    expected_old: header.old_len(),
                    expected_new: header.new_len(),
                    actual_old: 0,
                    actual_new: 0,
                });
            } else if line.starts_with("@@") {
                return Err(ParseError::InvalidHunkHeader {
                    line: line_no,
                    text: line.to_string(),
                });
            } else if let Ok((_, header)) = old_file_header(line) {
                if seen_old {
                    return Err(unexpected());
                }
                seen_old = true;
                diff.old_file = header.name.to_string();
                diff.old_timestamp = header.timestamp.map(str::to_string);
            } else if let Ok((_, header)) = new_file_header(line) {
                if !seen_old || seen_new {
                    return Err(unexpected());
                }
                seen_new = true;
                diff.new_file = header.name.to_string();
                diff.new_timestamp = header.timestamp.map(str::to_string);
            } else if pending.is_none() && (line.starts_with("diff ") || line.starts_with("index ")) {
                continue;
            } else {
                return Err(unexpected());
            }
        }

        if let Some(last) = pending {
            if !last.is_complete() {
                return Err(last.mismatch());
            }
            last.hunk.finish(&mut diff.hunks);
        }

        if seen_old && !seen_new {
            return Err(ParseError::MissingNewHeader);
        }

        Ok(diff)
    }

    /// The diff that turns the new text back into the old one.
    pub fn reversed(&self) -> Self {
        Self {
            old_file: self.new_file.clone(),
            new_file: self.old_file.clone(),
            old_timestamp: self.new_timestamp.clone(),
            new_timestamp: self.old_timestamp.clone(),
            hunks: self.hunks.iter().map(Hunk::reversed).collect(),
        }
    }
}

impl fmt::Display for UnifiedDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "--- {}", self.old_file)?;
        if let Some(timestamp) = &self.old_timestamp {
            write!(f, "\t{}", timestamp)?;
        }
        writeln!(f)?;

        write!(f, "+++ {}", self.new_file)?;
        if let Some(timestamp) = &self.new_timestamp {
            write!(f, "\t{}", timestamp)?;
        }
        writeln!(f)?;

        for hunk in &self.hunks {
            write!(f, "{}", hunk)?;
        }

        Ok(())
    }
}
