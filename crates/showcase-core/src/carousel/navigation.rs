//! Wraparound stepping over a selection.

use crate::error::CoreError;

/// One navigation request against the active index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Next,
    Previous,
    Jump(usize),
}

/// Who asked for a step. User steps interrupt autoplay; autoplay steps don't.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Origin {
    User,
    Autoplay,
}

impl Step {
    /// Resolve the target index for a collection of `len` items with
    /// `active` currently selected. `len` must be at least 1.
    pub fn resolve(self, active: usize, len: usize) -> Result<usize, CoreError> {
        match self {
            Self::Next => Ok(next_index(active, len)),
            Self::Previous => Ok(previous_index(active, len)),
            Self::Jump(index) if index < len => Ok(index),
            Self::Jump(index) => Err(CoreError::OutOfRange { index, len }),
        }
    }
}

pub fn next_index(active: usize, len: usize) -> usize {
    (active + 1) % len
}

pub fn previous_index(active: usize, len: usize) -> usize {
    (active + len - 1) % len
}
