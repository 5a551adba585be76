//! Active index plus the set of expanded indices over a fixed-size collection.

use std::collections::BTreeSet;

use crate::error::CoreError;

/// Selection and expansion state for `len` items.
///
/// Invariants: `len >= 1`, `active < len`, every expanded index `< len`.
/// Expansion is independent of the active index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    active: usize,
    len: usize,
    expanded: BTreeSet<usize>,
}

impl Selection {
    /// Build a selection over `len` items with item 0 active.
    pub fn new(len: usize) -> Result<Self, CoreError> {
        if len == 0 {
            return Err(CoreError::OutOfRange { index: 0, len: 0 });
        }
        Ok(Self {
            active: 0,
            len,
            expanded: BTreeSet::new(),
        })
    }

    /// Same as [`Selection::new`] with a chosen starting index and expansion set.
    pub fn with_state(
        len: usize,
        active: usize,
        expanded: impl IntoIterator<Item = usize>,
    ) -> Result<Self, CoreError> {
        let mut selection = Self::new(len)?;
        selection.set_active(active)?;
        for index in expanded {
            selection.check(index)?;
            selection.expanded.insert(index);
        }
        Ok(selection)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    /// Always `false`; present for API symmetry with collections.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn active(&self) -> usize {
        self.active
    }

    pub fn expanded(&self) -> &BTreeSet<usize> {
        &self.expanded
    }

    pub fn is_expanded(&self, index: usize) -> bool {
        self.expanded.contains(&index)
    }

    /// Make `index` the active item.
    pub fn set_active(&mut self, index: usize) -> Result<(), CoreError> {
        self.check(index)?;
        self.active = index;
        Ok(())
    }

    /// Flip the expansion of `index`, returning the new membership.
    pub fn toggle_expanded(&mut self, index: usize) -> Result<bool, CoreError> {
        self.check(index)?;
        if self.expanded.remove(&index) {
            Ok(false)
        } else {
            self.expanded.insert(index);
            Ok(true)
        }
    }

    /// Collapse every item. The active index is untouched.
    pub fn collapse_all(&mut self) {
        self.expanded.clear();
    }

    fn check(&self, index: usize) -> Result<(), CoreError> {
        if index < self.len {
            Ok(())
        } else {
            Err(CoreError::OutOfRange {
                index,
                len: self.len,
            })
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn zero_items_rejected() {
        let err = Selection::new(0).unwrap_err();
        assert!(matches!(err, CoreError::OutOfRange { index: 0, len: 0 }));
    }

    #[test]
    fn set_active_out_of_range_leaves_state() {
        let mut s = Selection::new(3).unwrap();
        s.set_active(2).unwrap();
        let err = s.set_active(3).unwrap_err();
        assert!(matches!(err, CoreError::OutOfRange { index: 3, len: 3 }));
        assert_eq!(s.active(), 2);
    }

    #[test]
    fn toggle_twice_is_identity() {
        let mut s = Selection::new(4).unwrap();
        s.toggle_expanded(1).unwrap();
        let before = s.clone();
        assert!(s.toggle_expanded(3).unwrap());
        assert!(!s.toggle_expanded(3).unwrap());
        assert_eq!(s, before);
    }

    #[test]
    fn toggle_does_not_move_active() {
        let mut s = Selection::with_state(5, 2, []).unwrap();
        s.toggle_expanded(4).unwrap();
        assert_eq!(s.active(), 2);
        assert!(s.is_expanded(4));
    }

    #[test]
    fn toggle_out_of_range_leaves_expansion() {
        let mut s = Selection::with_state(2, 0, [1]).unwrap();
        assert!(s.toggle_expanded(7).is_err());
        assert_eq!(s.expanded().iter().copied().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn with_state_validates_every_index() {
        assert!(Selection::with_state(3, 3, []).is_err());
        assert!(Selection::with_state(3, 0, [0, 5]).is_err());
    }

    #[test]
    fn collapse_all_clears_expansion_only() {
        let mut s = Selection::with_state(3, 1, [0, 2]).unwrap();
        s.collapse_all();
        assert!(s.expanded().is_empty());
        assert_eq!(s.active(), 1);
    }
}
