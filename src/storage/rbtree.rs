//! Red-Black Tree
//!
//! Ordered string membership backed by a red-black tree. Nodes live in an
//! arena and refer to each other by index, so rotations only rewrite
//! indices and parent back-links never own anything. Absent children are
//! treated as BLACK leaves throughout.

use std::cmp::Ordering;
use std::mem;

type NodeId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    Red,
    Black,
}

#[derive(Debug, Clone)]
struct Node {
    value: String,
    color: Color,
    parent: Option<NodeId>,
    left: Option<NodeId>,
    right: Option<NodeId>,
}

/// Red-black tree over strings in lexicographic order
#[derive(Debug, Clone, Default)]
pub struct OrderedTree {
    nodes: Vec<Node>,
    /// Vacated arena slots, reused by the next insert
    free: Vec<NodeId>,
    root: Option<NodeId>,
    count: usize,
}

impl OrderedTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live nodes
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Find a value, returning the stored copy
    pub fn search(&self, value: &str) -> Option<&str> {
        self.find(value).map(|id| self.nodes[id].value.as_str())
    }

    pub fn contains(&self, value: &str) -> bool {
        self.find(value).is_some()
    }

    /// In-order traversal, ascending
    pub fn iter(&self) -> Iter<'_> {
        Iter::new(self)
    }

    /// Every value in ascending order
    pub fn members(&self) -> Vec<String> {
        self.iter().map(str::to_string).collect()
    }

    /// Insert a value. Returns `false` and leaves the tree untouched if the
    /// value is already present.
    pub fn insert(&mut self, value: impl Into<String>) -> bool {
        let value = value.into();
        let mut parent = None;
        let mut cursor = self.root;
        let mut goes_left = false;

        while let Some(id) = cursor {
            parent = Some(id);
            let node = &self.nodes[id];
            match value.as_str().cmp(node.value.as_str()) {
                Ordering::Equal => return false,
                Ordering::Less => {
                    goes_left = true;
                    cursor = node.left;
                }
                Ordering::Greater => {
                    goes_left = false;
                    cursor = node.right;
                }
            }
        }

        let id = self.alloc(Node {
            value,
            color: Color::Red,
            parent,
            left: None,
            right: None,
        });
        match parent {
            None => self.root = Some(id),
            Some(p) if goes_left => self.nodes[p].left = Some(id),
            Some(p) => self.nodes[p].right = Some(id),
        }
        self.count += 1;
        self.insert_fixup(id);
        true
    }

    /// Remove a value. Returns `false` if it was not present.
    pub fn delete(&mut self, value: &str) -> bool {
        let Some(target) = self.find(value) else {
            return false;
        };

        // Node physically unlinked: the target itself when it has at most
        // one child, otherwise its in-order successor.
        let removed = match (self.nodes[target].left, self.nodes[target].right) {
            (Some(_), Some(right)) => self.minimum(right),
            _ => target,
        };
        let child = self.nodes[removed].left.or(self.nodes[removed].right);
        let parent = self.nodes[removed].parent;

        if let Some(c) = child {
            self.nodes[c].parent = parent;
        }
        self.replace_child(parent, removed, child);

        if removed != target {
            let moved = mem::take(&mut self.nodes[removed].value);
            self.nodes[target].value = moved;
        }

        let removed_color = self.nodes[removed].color;
        self.release(removed);
        self.count -= 1;

        if removed_color == Color::Black {
            self.delete_fixup(child, parent);
        }
        if self.count == 0 {
            self.nodes.clear();
            self.free.clear();
        }
        true
    }

    fn find(&self, value: &str) -> Option<NodeId> {
        let mut cursor = self.root;
        while let Some(id) = cursor {
            let node = &self.nodes[id];
            cursor = match value.cmp(node.value.as_str()) {
                Ordering::Equal => return Some(id),
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
            };
        }
        None
    }

    fn minimum(&self, mut id: NodeId) -> NodeId {
        while let Some(left) = self.nodes[id].left {
            id = left;
        }
        id
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        match self.free.pop() {
            Some(id) => {
                self.nodes[id] = node;
                id
            }
            None => {
                self.nodes.push(node);
                self.nodes.len() - 1
            }
        }
    }

    fn release(&mut self, id: NodeId) {
        let node = &mut self.nodes[id];
        node.value = String::new();
        node.parent = None;
        node.left = None;
        node.right = None;
        self.free.push(id);
    }

    fn is_red(&self, id: Option<NodeId>) -> bool {
        id.is_some_and(|id| self.nodes[id].color == Color::Red)
    }

    fn paint(&mut self, id: Option<NodeId>, color: Color) {
        if let Some(id) = id {
            self.nodes[id].color = color;
        }
    }

    fn parent_of(&self, id: NodeId) -> NodeId {
        self.nodes[id]
            .parent
            .expect("red-black tree corrupted: missing parent")
    }

    /// Point `parent`'s link to `old` (or the root) at `new`
    fn replace_child(&mut self, parent: Option<NodeId>, old: NodeId, new: Option<NodeId>) {
        match parent {
            None => self.root = new,
            Some(p) if self.nodes[p].left == Some(old) => self.nodes[p].left = new,
            Some(p) => self.nodes[p].right = new,
        }
    }

    fn rotate_left(&mut self, x: NodeId) {
        let y = self.nodes[x]
            .right
            .expect("red-black tree corrupted: left rotation without right child");
        let inner = self.nodes[y].left;

        self.nodes[x].right = inner;
        if let Some(inner) = inner {
            self.nodes[inner].parent = Some(x);
        }
        let parent = self.nodes[x].parent;
        self.nodes[y].parent = parent;
        self.replace_child(parent, x, Some(y));
        self.nodes[y].left = Some(x);
        self.nodes[x].parent = Some(y);
    }

    fn rotate_right(&mut self, x: NodeId) {
        let y = self.nodes[x]
            .left
            .expect("red-black tree corrupted: right rotation without left child");
        let inner = self.nodes[y].right;

        self.nodes[x].left = inner;
        if let Some(inner) = inner {
            self.nodes[inner].parent = Some(x);
        }
        let parent = self.nodes[x].parent;
        self.nodes[y].parent = parent;
        self.replace_child(parent, x, Some(y));
        self.nodes[y].right = Some(x);
        self.nodes[x].parent = Some(y);
    }

    fn insert_fixup(&mut self, mut node: NodeId) {
        while let Some(mut parent) = self.nodes[node].parent.filter(|&p| self.is_red(Some(p))) {
            // a red parent is never the root
            let grandparent = self.parent_of(parent);

            if self.nodes[grandparent].left == Some(parent) {
                let uncle = self.nodes[grandparent].right;
                if self.is_red(uncle) {
                    self.paint(Some(parent), Color::Black);
                    self.paint(uncle, Color::Black);
                    self.paint(Some(grandparent), Color::Red);
                    node = grandparent;
                    continue;
                }
                if self.nodes[parent].right == Some(node) {
                    // inner grandchild: straighten into the outer case
                    node = parent;
                    self.rotate_left(node);
                    parent = self.parent_of(node);
                }
                self.paint(Some(parent), Color::Black);
                self.paint(Some(grandparent), Color::Red);
                self.rotate_right(grandparent);
            } else {
                let uncle = self.nodes[grandparent].left;
                if self.is_red(uncle) {
                    self.paint(Some(parent), Color::Black);
                    self.paint(uncle, Color::Black);
                    self.paint(Some(grandparent), Color::Red);
                    node = grandparent;
                    continue;
                }
                if self.nodes[parent].left == Some(node) {
                    node = parent;
                    self.rotate_right(node);
                    parent = self.parent_of(node);
                }
                self.paint(Some(parent), Color::Black);
                self.paint(Some(grandparent), Color::Red);
                self.rotate_left(grandparent);
            }
        }
        self.paint(self.root, Color::Black);
    }

    /// Restore the black height after unlinking a black node. `node` is the
    /// child spliced into the vacated slot (possibly a nil leaf) and
    /// `parent` its parent, tracked separately because nil has no links.
    fn delete_fixup(&mut self, mut node: Option<NodeId>, mut parent: Option<NodeId>) {
        while node != self.root && !self.is_red(node) {
            let p = parent.expect("red-black tree corrupted: doubly black node without parent");

            if self.nodes[p].left == node {
                let mut sibling = self.sibling(p, false);
                if self.is_red(Some(sibling)) {
                    self.paint(Some(sibling), Color::Black);
                    self.paint(Some(p), Color::Red);
                    self.rotate_left(p);
                    sibling = self.sibling(p, false);
                }

                let (near, far) = (self.nodes[sibling].left, self.nodes[sibling].right);
                if !self.is_red(near) && !self.is_red(far) {
                    self.paint(Some(sibling), Color::Red);
                    node = Some(p);
                    parent = self.nodes[p].parent;
                    continue;
                }
                if !self.is_red(far) {
                    self.paint(near, Color::Black);
                    self.paint(Some(sibling), Color::Red);
                    self.rotate_right(sibling);
                    sibling = self.sibling(p, false);
                }
                self.nodes[sibling].color = self.nodes[p].color;
                self.paint(Some(p), Color::Black);
                self.paint(self.nodes[sibling].right, Color::Black);
                self.rotate_left(p);
            } else {
                let mut sibling = self.sibling(p, true);
                if self.is_red(Some(sibling)) {
                    self.paint(Some(sibling), Color::Black);
                    self.paint(Some(p), Color::Red);
                    self.rotate_right(p);
                    sibling = self.sibling(p, true);
                }

                let (near, far) = (self.nodes[sibling].right, self.nodes[sibling].left);
                if !self.is_red(near) && !self.is_red(far) {
                    self.paint(Some(sibling), Color::Red);
                    node = Some(p);
                    parent = self.nodes[p].parent;
                    continue;
                }
                if !self.is_red(far) {
                    self.paint(near, Color::Black);
                    self.paint(Some(sibling), Color::Red);
                    self.rotate_left(sibling);
                    sibling = self.sibling(p, true);
                }
                self.nodes[sibling].color = self.nodes[p].color;
                self.paint(Some(p), Color::Black);
                self.paint(self.nodes[sibling].left, Color::Black);
                self.rotate_right(p);
            }

            node = self.root;
            parent = None;
        }
        self.paint(node, Color::Black);
    }

    /// Sibling of a doubly black child of `parent`. It always exists: the
    /// other side carries at least one more black node.
    fn sibling(&self, parent: NodeId, on_left: bool) -> NodeId {
        let sibling = if on_left {
            self.nodes[parent].left
        } else {
            self.nodes[parent].right
        };
        sibling.expect("red-black tree corrupted: doubly black node without sibling")
    }
}

/// Lazy in-order iterator holding the pending ancestors on a stack
#[derive(Debug, Clone)]
pub struct Iter<'a> {
    tree: &'a OrderedTree,
    stack: Vec<NodeId>,
}

impl<'a> Iter<'a> {
    fn new(tree: &'a OrderedTree) -> Self {
        let mut iter = Self {
            tree,
            stack: Vec::new(),
        };
        iter.descend_left(tree.root);
        iter
    }

    fn descend_left(&mut self, mut cursor: Option<NodeId>) {
        while let Some(id) = cursor {
            self.stack.push(id);
            cursor = self.tree.nodes[id].left;
        }
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let tree = self.tree;
        self.descend_left(tree.nodes[id].right);
        Some(tree.nodes[id].value.as_str())
    }
}

impl<'a> IntoIterator for &'a OrderedTree {
    type Item = &'a str;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::BTreeSet;

    const MEMBERS: [&str; 5] = ["hello", "secctan", "how", "are", "you"];

    fn sample_tree() -> OrderedTree {
        let mut tree = OrderedTree::new();
        for member in MEMBERS {
            tree.insert(member);
        }
        tree
    }

    /// Walk the whole tree checking every red-black and BST invariant,
    /// returning the black height.
    fn check_invariants(tree: &OrderedTree) -> usize {
        let Some(root) = tree.root else {
            assert_eq!(tree.count, 0);
            return 0;
        };
        assert_eq!(tree.nodes[root].color, Color::Black, "root must be black");
        assert_eq!(tree.nodes[root].parent, None);

        fn walk(tree: &OrderedTree, id: NodeId, seen: &mut usize) -> usize {
            *seen += 1;
            let node = &tree.nodes[id];
            let mut heights = [0, 0];
            for (slot, child) in [node.left, node.right].into_iter().enumerate() {
                if let Some(c) = child {
                    assert_eq!(tree.nodes[c].parent, Some(id), "broken parent link");
                    if node.color == Color::Red {
                        assert_eq!(tree.nodes[c].color, Color::Black, "red node with red child");
                    }
                    heights[slot] = walk(tree, c, seen);
                }
            }
            assert_eq!(heights[0], heights[1], "unequal black height under {}", node.value);
            heights[0] + usize::from(node.color == Color::Black)
        }

        let mut seen = 0;
        let height = walk(tree, root, &mut seen);
        assert_eq!(seen, tree.len(), "count out of sync");

        let members = tree.members();
        assert!(members.windows(2).all(|w| w[0] < w[1]), "not strictly ascending");
        height
    }

    #[test]
    fn test_insert() {
        let tree = sample_tree();
        assert_eq!(tree.members(), vec!["are", "hello", "how", "secctan", "you"]);
        assert_eq!(tree.len(), 5);
        check_invariants(&tree);
    }

    #[test]
    fn test_insert_is_idempotent() {
        let mut tree = sample_tree();
        assert!(!tree.insert("how"));
        assert_eq!(tree.len(), 5);
        assert_eq!(tree.members(), vec!["are", "hello", "how", "secctan", "you"]);
    }

    #[test]
    fn test_delete() {
        let mut tree = sample_tree();
        assert!(tree.delete("hello"));
        assert_eq!(tree.members(), vec!["are", "how", "secctan", "you"]);
        assert_eq!(tree.len(), 4);
        check_invariants(&tree);

        assert!(!tree.delete("hello"));
        assert_eq!(tree.len(), 4);
    }

    #[test]
    fn test_search() {
        let tree = sample_tree();
        assert_eq!(tree.search("secctan"), Some("secctan"));
        assert_eq!(tree.search("world"), None);
        assert!(!OrderedTree::new().contains("x"));
    }

    #[test]
    fn test_delete_last_node_empties_tree() {
        let mut tree = OrderedTree::new();
        tree.insert("only");
        assert!(tree.delete("only"));
        assert!(tree.is_empty());
        assert_eq!(tree.root, None);
        assert_eq!(tree.members(), Vec::<String>::new());

        // arena is reusable afterwards
        tree.insert("again");
        assert_eq!(tree.members(), vec!["again"]);
    }

    #[test]
    fn test_delete_with_leaf_sibling() {
        // black leaf siblings with no children exercise the nil-nephew path
        let mut tree = OrderedTree::new();
        for value in ["d", "b", "f", "a", "c", "e", "g"] {
            tree.insert(value);
        }
        for value in ["a", "c", "b", "g", "e"] {
            assert!(tree.delete(value));
            check_invariants(&tree);
        }
        assert_eq!(tree.members(), vec!["d", "f"]);
    }

    #[test]
    fn test_ascending_inserts_stay_balanced() {
        let mut tree = OrderedTree::new();
        for i in 0..1024 {
            tree.insert(format!("{:05}", i));
        }
        let black_height = check_invariants(&tree);
        // height <= 2 * black height, and 2^bh - 1 <= n
        assert!(black_height <= 11);
        assert_eq!(tree.len(), 1024);
    }

    #[test]
    fn test_iter_is_lazy_and_droppable() {
        let tree = sample_tree();
        let first_two: Vec<&str> = tree.iter().take(2).collect();
        assert_eq!(first_two, vec!["are", "hello"]);
        assert_eq!((&tree).into_iter().count(), 5);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Insert(String),
        Delete(String),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            "[a-p]{1,2}".prop_map(Op::Insert),
            "[a-p]{1,2}".prop_map(Op::Delete),
        ]
    }

    proptest! {
        #[test]
        fn prop_invariants_hold_after_every_mutation(ops in proptest::collection::vec(op_strategy(), 0..200)) {
            let mut tree = OrderedTree::new();
            let mut model = BTreeSet::new();

            for op in ops {
                match op {
                    Op::Insert(v) => {
                        prop_assert_eq!(tree.insert(v.clone()), model.insert(v));
                    }
                    Op::Delete(v) => {
                        let before = tree.len();
                        let present = model.remove(&v);
                        prop_assert_eq!(tree.delete(&v), present);
                        prop_assert_eq!(tree.len(), if present { before - 1 } else { before });
                    }
                }
                check_invariants(&tree);
            }

            let expected: Vec<String> = model.into_iter().collect();
            prop_assert_eq!(tree.members(), expected);
        }

        #[test]
        fn prop_count_matches_distinct_inserts(values in proptest::collection::vec("[a-z]{1,3}", 0..100)) {
            let mut tree = OrderedTree::new();
            for v in &values {
                tree.insert(v.as_str());
            }
            let distinct: BTreeSet<_> = values.iter().cloned().collect();
            prop_assert_eq!(tree.len(), distinct.len());
            prop_assert_eq!(tree.members(), distinct.into_iter().collect::<Vec<_>>());
        }
    }
}
