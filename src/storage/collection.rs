//! Collection Trait
//!
//! Membership API shared by `UnorderedSet` and `OrderedSet`, with set
//! algebra provided on top of it.

use crate::error::Result;

/// A named collection of unique strings
///
/// The algebra methods read both operands and build a fresh collection of
/// the same kind; neither input is modified.
pub trait Collection: Default {
    /// Number of elements
    fn size(&self) -> usize;

    /// Insert an element, returns `false` if it was already present
    fn add(&mut self, element: String) -> bool;

    fn contains(&self, element: &str) -> bool;

    /// Remove an element, failing with `ElementNotExists` if absent
    fn remove(&mut self, element: &str) -> Result<()>;

    /// All elements, materialized
    fn members(&self) -> Vec<String>;

    fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Elements of either collection
    fn union(&self, other: &Self) -> Self {
        let mut out = Self::default();
        for element in self.members().into_iter().chain(other.members()) {
            out.add(element);
        }
        out
    }

    /// Elements present in both collections
    fn intersection(&self, other: &Self) -> Self {
        let mut out = Self::default();
        for element in self.members() {
            if other.contains(&element) {
                out.add(element);
            }
        }
        out
    }

    /// Elements of `self` missing from `other`
    fn difference(&self, other: &Self) -> Self {
        let mut out = Self::default();
        for element in self.members() {
            if !other.contains(&element) {
                out.add(element);
            }
        }
        out
    }

    /// True iff every element of `self` is in `other` (vacuous when empty)
    fn is_subset(&self, other: &Self) -> bool {
        self.members().iter().all(|element| other.contains(element))
    }
}
