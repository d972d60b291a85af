//! Set and Sorted-Set Commands
//!
//! `S*` commands address the unordered table, `Z*` commands the ordered
//! one. Both families share the generic helpers below; the `Keyspace` trait
//! picks the table a collection type lives in.

use hashbrown::HashMap;

use super::store::Tables;
use super::{Collection, OrderedSet, Store, UnorderedSet};
use crate::error::{Result, StoreError};

trait Keyspace: Collection + Sized {
    fn table(tables: &Tables) -> &HashMap<String, Self>;
    fn table_mut(tables: &mut Tables) -> &mut HashMap<String, Self>;
}

impl Keyspace for UnorderedSet {
    fn table(tables: &Tables) -> &HashMap<String, Self> {
        &tables.sets
    }

    fn table_mut(tables: &mut Tables) -> &mut HashMap<String, Self> {
        &mut tables.sets
    }
}

impl Keyspace for OrderedSet {
    fn table(tables: &Tables) -> &HashMap<String, Self> {
        &tables.ordered_sets
    }

    fn table_mut(tables: &mut Tables) -> &mut HashMap<String, Self> {
        &mut tables.ordered_sets
    }
}

fn missing(name: &str) -> StoreError {
    StoreError::CollectionNotExists(name.to_string())
}

impl Store {
    fn add_to<C: Keyspace>(&self, name: &str, element: String) -> bool {
        let mut tables = self.inner.write();
        C::table_mut(&mut tables)
            .entry_ref(name)
            .or_default()
            .add(element)
    }

    fn extend<C: Keyspace>(&self, name: &str, elements: Vec<String>) {
        let mut tables = self.inner.write();
        let collection = C::table_mut(&mut tables).entry_ref(name).or_default();
        for element in elements {
            collection.add(element);
        }
    }

    fn remove_from<C: Keyspace>(&self, name: &str, element: &str) -> Result<()> {
        let mut tables = self.inner.write();
        C::table_mut(&mut tables)
            .get_mut(name)
            .ok_or_else(|| missing(name))?
            .remove(element)
    }

    fn read<C: Keyspace, R>(&self, name: &str, f: impl FnOnce(&C) -> R) -> Result<R> {
        let tables = self.inner.read();
        C::table(&tables).get(name).map(f).ok_or_else(|| missing(name))
    }

    fn combine<C: Keyspace>(
        &self,
        first: &str,
        second: &str,
        op: impl FnOnce(&C, &C) -> C,
    ) -> Result<Vec<String>> {
        let tables = self.inner.read();
        let table = C::table(&tables);
        let a = table.get(first).ok_or_else(|| missing(first))?;
        let b = table.get(second).ok_or_else(|| missing(second))?;
        Ok(op(a, b).members())
    }

    /// Compute under the read lock, then accumulate into `dest` under the
    /// write lock. Not atomic across the two steps.
    fn combine_store<C: Keyspace>(
        &self,
        first: &str,
        second: &str,
        dest: &str,
        op: impl FnOnce(&C, &C) -> C,
    ) -> Result<()> {
        let elements = self.combine(first, second, op)?;
        self.extend::<C>(dest, elements);
        Ok(())
    }

    /// Add an element to a set, creating the set on first use
    pub fn sadd(&self, set: &str, element: impl Into<String>) -> bool {
        self.add_to::<UnorderedSet>(set, element.into())
    }

    pub fn srem(&self, set: &str, element: &str) -> Result<()> {
        self.remove_from::<UnorderedSet>(set, element)
    }

    pub fn smembers(&self, set: &str) -> Result<Vec<String>> {
        self.read(set, UnorderedSet::members)
    }

    /// Cardinality of a set
    pub fn scard(&self, set: &str) -> Result<usize> {
        self.read(set, UnorderedSet::size)
    }

    pub fn sismember(&self, set: &str, element: &str) -> Result<bool> {
        self.read(set, |s: &UnorderedSet| s.contains(element))
    }

    /// Elements of `first` not present in `second`
    pub fn sdiff(&self, first: &str, second: &str) -> Result<Vec<String>> {
        self.combine(first, second, UnorderedSet::difference)
    }

    pub fn sinter(&self, first: &str, second: &str) -> Result<Vec<String>> {
        self.combine(first, second, UnorderedSet::intersection)
    }

    pub fn sunion(&self, first: &str, second: &str) -> Result<Vec<String>> {
        self.combine(first, second, UnorderedSet::union)
    }

    /// Add the difference of two sets into `dest`. Existing elements of
    /// `dest` are kept.
    pub fn sdiffstore(&self, first: &str, second: &str, dest: &str) -> Result<()> {
        self.combine_store(first, second, dest, UnorderedSet::difference)
    }

    pub fn sinterstore(&self, first: &str, second: &str, dest: &str) -> Result<()> {
        self.combine_store(first, second, dest, UnorderedSet::intersection)
    }

    /// Add an element to a sorted set, creating it on first use
    pub fn zadd(&self, set: &str, element: impl Into<String>) -> bool {
        self.add_to::<OrderedSet>(set, element.into())
    }

    pub fn zrem(&self, set: &str, element: &str) -> Result<()> {
        self.remove_from::<OrderedSet>(set, element)
    }

    /// Members of a sorted set in ascending order
    pub fn zmembers(&self, set: &str) -> Result<Vec<String>> {
        self.read(set, OrderedSet::members)
    }

    pub fn zcard(&self, set: &str) -> Result<usize> {
        self.read(set, OrderedSet::size)
    }

    pub fn zismember(&self, set: &str, element: &str) -> Result<bool> {
        self.read(set, |s: &OrderedSet| s.contains(element))
    }

    pub fn zdiff(&self, first: &str, second: &str) -> Result<Vec<String>> {
        self.combine(first, second, OrderedSet::difference)
    }

    pub fn zinter(&self, first: &str, second: &str) -> Result<Vec<String>> {
        self.combine(first, second, OrderedSet::intersection)
    }

    pub fn zunion(&self, first: &str, second: &str) -> Result<Vec<String>> {
        self.combine(first, second, OrderedSet::union)
    }

    pub fn zdiffstore(&self, first: &str, second: &str, dest: &str) -> Result<()> {
        self.combine_store(first, second, dest, OrderedSet::difference)
    }

    pub fn zinterstore(&self, first: &str, second: &str, dest: &str) -> Result<()> {
        self.combine_store(first, second, dest, OrderedSet::intersection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn sorted(mut members: Vec<String>) -> Vec<String> {
        members.sort();
        members
    }

    #[test]
    fn test_sadd_creates_set() {
        let store = Store::new();
        assert_eq!(store.scard("s"), Err(StoreError::CollectionNotExists("s".into())));

        assert!(store.sadd("s", "a"));
        assert!(store.sadd("s", "b"));
        assert!(!store.sadd("s", "a"));

        assert_eq!(store.scard("s").unwrap(), 2);
        assert!(store.sismember("s", "a").unwrap());
        assert!(!store.sismember("s", "c").unwrap());
        assert_eq!(sorted(store.smembers("s").unwrap()), vec!["a", "b"]);
    }

    #[test]
    fn test_set_survives_being_emptied() {
        let store = Store::new();
        store.sadd("s", "a");
        store.srem("s", "a").unwrap();

        assert_eq!(store.scard("s").unwrap(), 0);
        assert_eq!(
            store.srem("s", "a"),
            Err(StoreError::ElementNotExists("a".into()))
        );
        assert_eq!(
            store.srem("nope", "a"),
            Err(StoreError::CollectionNotExists("nope".into()))
        );
    }

    #[test]
    fn test_set_algebra() {
        let store = Store::new();
        store.sadd("x", "a");
        store.sadd("x", "b");
        store.sadd("y", "b");
        store.sadd("y", "c");

        assert_eq!(store.sdiff("x", "y").unwrap(), vec!["a"]);
        assert_eq!(store.sinter("x", "y").unwrap(), vec!["b"]);
        assert_eq!(sorted(store.sunion("x", "y").unwrap()), vec!["a", "b", "c"]);

        assert_eq!(
            store.sdiff("x", "missing"),
            Err(StoreError::CollectionNotExists("missing".into()))
        );
        assert_eq!(
            store.sunion("missing", "x"),
            Err(StoreError::CollectionNotExists("missing".into()))
        );
    }

    #[test]
    fn test_store_variants_accumulate() {
        let store = Store::new();
        store.sadd("x", "a");
        store.sadd("x", "b");
        store.sadd("y", "b");
        store.sadd("z", "old");

        store.sdiffstore("x", "y", "z").unwrap();
        assert_eq!(sorted(store.smembers("z").unwrap()), vec!["a", "old"]);

        store.sinterstore("x", "y", "w").unwrap();
        assert_eq!(store.smembers("w").unwrap(), vec!["b"]);

        // an empty result still creates the destination
        store.sdiffstore("y", "x", "empty").unwrap();
        assert_eq!(store.scard("empty").unwrap(), 0);

        assert!(store.sdiffstore("x", "nope", "v").is_err());
        assert!(store.smembers("v").is_err());
    }

    #[test]
    fn test_sorted_sets() {
        let store = Store::new();
        store.zadd("z", "b");
        store.zadd("z", "a");
        store.zadd("z", "c");
        store.zadd("z", "a");

        assert_eq!(store.zmembers("z").unwrap(), vec!["a", "b", "c"]);
        assert_eq!(store.zcard("z").unwrap(), 3);
        assert!(store.zismember("z", "b").unwrap());

        store.zrem("z", "b").unwrap();
        assert_eq!(store.zmembers("z").unwrap(), vec!["a", "c"]);
        assert!(store.zmembers("other").is_err());
    }

    #[test]
    fn test_sorted_set_algebra() {
        let store = Store::new();
        for e in ["d", "a", "c"] {
            store.zadd("p", e);
        }
        for e in ["c", "b", "d"] {
            store.zadd("q", e);
        }

        assert_eq!(store.zunion("p", "q").unwrap(), vec!["a", "b", "c", "d"]);
        assert_eq!(store.zinter("p", "q").unwrap(), vec!["c", "d"]);
        assert_eq!(store.zdiff("p", "q").unwrap(), vec!["a"]);

        store.zinterstore("p", "q", "r").unwrap();
        store.zdiffstore("q", "p", "r").unwrap();
        assert_eq!(store.zmembers("r").unwrap(), vec!["b", "c", "d"]);
    }

    #[test]
    fn test_tables_are_separate() {
        let store = Store::new();
        store.set("name", "v").unwrap();
        store.sadd("name", "a");
        store.zadd("name", "b");

        assert_eq!(store.smembers("name").unwrap(), vec!["a"]);
        assert_eq!(store.zmembers("name").unwrap(), vec!["b"]);
        assert!(store.exists("name"));
    }

    #[test]
    fn test_concurrent_sadd() {
        let store = Store::new();

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let s = store.clone();
                thread::spawn(move || {
                    for j in 0..50 {
                        s.sadd("shared", format!("{}-{}", i, j));
                        s.zadd("ordered", format!("{:02}", j));
                    }
                })
            })
            .collect();

        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(store.scard("shared").unwrap(), 400);
        assert_eq!(store.zcard("ordered").unwrap(), 50);
    }
}
