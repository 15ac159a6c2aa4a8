//! Sequence diff algorithms and the values they produce.
//!
//! Every algorithm returns an ordered `Vec<DiffResult<T>>`. Walking it front
//! to back, the `old_index` of the [`DiffOp::Equal`] and [`DiffOp::Delete`]
//! entries visits every position of the old sequence exactly once in
//! increasing order; `new_index` does the same for the new sequence on
//! [`DiffOp::Equal`] and [`DiffOp::Insert`].

pub mod minimal;
pub mod myers;
pub mod patience;

/// What happened to a single element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DiffOp {
    /// Present in both sequences
    Equal,
    /// Only present in the new sequence
    Insert,
    /// Only present in the old sequence
    Delete,
}

impl DiffOp {
    /// The single-character prefix used by the unified format.
    pub fn prefix(self) -> char {
        match self {
            DiffOp::Equal => ' ',
            DiffOp::Insert => '+',
            DiffOp::Delete => '-',
        }
    }

    /// Swap the roles of insertions and deletions.
    pub fn invert(self) -> Self {
        match self {
            DiffOp::Equal => DiffOp::Equal,
            DiffOp::Insert => DiffOp::Delete,
            DiffOp::Delete => DiffOp::Insert,
        }
    }
}

/// One element of an edit script.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DiffResult<T> {
    pub op: DiffOp,
    pub value: T,
    /// Position in the old sequence (set for `Equal` and `Delete`)
    pub old_index: Option<usize>,
    /// Position in the new sequence (set for `Equal` and `Insert`)
    pub new_index: Option<usize>,
}

impl<T> DiffResult<T> {
    pub fn equal(value: T, old_index: usize, new_index: usize) -> Self {
        Self {
            op: DiffOp::Equal,
            value,
            old_index: Some(old_index),
            new_index: Some(new_index),
        }
    }

    pub fn insert(value: T, new_index: usize) -> Self {
        Self {
            op: DiffOp::Insert,
            value,
            old_index: None,
            new_index: Some(new_index),
        }
    }

    pub fn delete(value: T, old_index: usize) -> Self {
        Self {
            op: DiffOp::Delete,
            value,
            old_index: Some(old_index),
            new_index: None,
        }
    }

    /// Move both indices forward, used when a sub-range was diffed on its own.
    pub(crate) fn offset(mut self, old_offset: usize, new_offset: usize) -> Self {
        self.old_index = self.old_index.map(|i| i + old_offset);
        self.new_index = self.new_index.map(|i| i + new_offset);
        self
    }
}

/// Rebuild the new sequence by keeping `Equal` and `Insert` values.
pub fn apply_new<T: Clone>(results: &[DiffResult<T>]) -> Vec<T> {
    results
        .iter()
        .filter(|r| r.op != DiffOp::Delete)
        .map(|r| r.value.clone())
        .collect()
}

/// Rebuild the old sequence by keeping `Equal` and `Delete` values.
pub fn apply_old<T: Clone>(results: &[DiffResult<T>]) -> Vec<T> {
    results
        .iter()
        .filter(|r| r.op != DiffOp::Insert)
        .map(|r| r.value.clone())
        .collect()
}

/// Turn a diff of `a -> b` into a diff of `b -> a`.
pub fn invert<T: Clone>(results: &[DiffResult<T>]) -> Vec<DiffResult<T>> {
    results
        .iter()
        .map(|r| DiffResult {
            op: r.op.invert(),
            value: r.value.clone(),
            old_index: r.new_index,
            new_index: r.old_index,
        })
        .collect()
}
