//! Ordered Set
//!
//! Sorted string set on top of `OrderedTree`. Members come back in
//! ascending lexicographic order, and so do algebra results.

use super::rbtree::{Iter, OrderedTree};
use super::Collection;
use crate::error::{Result, StoreError};

#[derive(Debug, Clone, Default)]
pub struct OrderedSet {
    tree: OrderedTree,
}

impl OrderedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn iter(&self) -> Iter<'_> {
        self.tree.iter()
    }
}

impl Collection for OrderedSet {
    fn size(&self) -> usize {
        self.tree.len()
    }

    fn add(&mut self, element: String) -> bool {
        self.tree.insert(element)
    }

    fn contains(&self, element: &str) -> bool {
        self.tree.contains(element)
    }

    fn remove(&mut self, element: &str) -> Result<()> {
        if self.tree.delete(element) {
            Ok(())
        } else {
            Err(StoreError::ElementNotExists(element.to_string()))
        }
    }

    fn members(&self) -> Vec<String> {
        self.tree.members()
    }
}

impl PartialEq for OrderedSet {
    fn eq(&self, other: &Self) -> bool {
        self.size() == other.size() && self.iter().eq(other.iter())
    }
}

impl Eq for OrderedSet {}

impl<S: Into<String>> FromIterator<S> for OrderedSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        for element in iter {
            set.tree.insert(element);
        }
        set
    }
}
