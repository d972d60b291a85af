//! Unordered Set
//!
//! Hash-based string set. Iteration order is unspecified.

use hashbrown::HashSet;

use super::Collection;
use crate::error::{Result, StoreError};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnorderedSet {
    elements: HashSet<String>,
}

impl UnorderedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.elements.iter().map(String::as_str)
    }
}

impl Collection for UnorderedSet {
    fn size(&self) -> usize {
        self.elements.len()
    }

    fn add(&mut self, element: String) -> bool {
        self.elements.insert(element)
    }

    fn contains(&self, element: &str) -> bool {
        self.elements.contains(element)
    }

    fn remove(&mut self, element: &str) -> Result<()> {
        if self.elements.remove(element) {
            Ok(())
        } else {
            Err(StoreError::ElementNotExists(element.to_string()))
        }
    }

    fn members(&self) -> Vec<String> {
        self.elements.iter().cloned().collect()
    }
}

impl<S: Into<String>> FromIterator<S> for UnorderedSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            elements: iter.into_iter().map(Into::into).collect(),
        }
    }
}
