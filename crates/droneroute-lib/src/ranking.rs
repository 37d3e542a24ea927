//! Route popularity index.
//!
//! [`FrequencyTree`] is an AVL tree keyed by [`RouteSignature`]. Every time a
//! route is computed its signature is inserted; inserting an existing
//! signature bumps its count instead of adding a node.

use std::cmp::Ordering;

use serde::Serialize;

use crate::domain::RouteSignature;

/// A signature and how many times it was recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrequencyRecord {
    pub signature: RouteSignature,
    pub count: u64,
}

#[derive(Debug, Clone)]
struct Node {
    signature: RouteSignature,
    count: u64,
    height: usize,
    left: Option<Box<Node>>,
    right: Option<Box<Node>>,
}

impl Node {
    fn leaf(signature: RouteSignature) -> Box<Self> {
        Box::new(Self {
            signature,
            count: 1,
            height: 1,
            left: None,
            right: None,
        })
    }

    fn update_height(&mut self) {
        self.height = 1 + height(&self.left).max(height(&self.right));
    }

    fn balance(&self) -> isize {
        height(&self.left) as isize - height(&self.right) as isize
    }
}

fn height(node: &Option<Box<Node>>) -> usize {
    node.as_ref().map_or(0, |node| node.height)
}

fn rotate_right(mut node: Box<Node>) -> Box<Node> {
    let Some(mut pivot) = node.left.take() else {
        return node;
    };
    node.left = pivot.right.take();
    node.update_height();
    pivot.right = Some(node);
    pivot.update_height();
    pivot
}

fn rotate_left(mut node: Box<Node>) -> Box<Node> {
    let Some(mut pivot) = node.right.take() else {
        return node;
    };
    node.right = pivot.left.take();
    node.update_height();
    pivot.left = Some(node);
    pivot.update_height();
    pivot
}

fn rebalance(mut node: Box<Node>) -> Box<Node> {
    node.update_height();
    let balance = node.balance();
    if balance > 1 {
        if node.left.as_ref().is_some_and(|left| left.balance() < 0) {
            node.left = node.left.take().map(rotate_left);
        }
        return rotate_right(node);
    }
    if balance < -1 {
        if node.right.as_ref().is_some_and(|right| right.balance() > 0) {
            node.right = node.right.take().map(rotate_right);
        }
        return rotate_left(node);
    }
    node
}

/// Insert or bump `signature`; returns the subtree root, the new count and
/// whether a node was created.
fn insert(node: Option<Box<Node>>, signature: RouteSignature) -> (Box<Node>, u64, bool) {
    let Some(mut node) = node else {
        return (Node::leaf(signature), 1, true);
    };
    match signature.cmp(&node.signature) {
        Ordering::Equal => {
            node.count += 1;
            let count = node.count;
            (node, count, false)
        }
        Ordering::Less => {
            let (child, count, created) = insert(node.left.take(), signature);
            node.left = Some(child);
            (rebalance(node), count, created)
        }
        Ordering::Greater => {
            let (child, count, created) = insert(node.right.take(), signature);
            node.right = Some(child);
            (rebalance(node), count, created)
        }
    }
}

/// Height-balanced tree of route signatures and their counts.
#[derive(Debug, Clone, Default)]
pub struct FrequencyTree {
    root: Option<Box<Node>>,
    len: usize,
    total: u64,
}

impl FrequencyTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one use of `signature` and return its updated count.
    pub fn insert(&mut self, signature: RouteSignature) -> u64 {
        let (root, count, created) = insert(self.root.take(), signature);
        self.root = Some(root);
        if created {
            self.len += 1;
        }
        self.total += 1;
        count
    }

    /// Count recorded for `signature`, if any.
    pub fn get(&self, signature: &RouteSignature) -> Option<u64> {
        let mut current = self.root.as_ref();
        while let Some(node) = current {
            current = match signature.cmp(&node.signature) {
                Ordering::Equal => return Some(node.count),
                Ordering::Less => node.left.as_ref(),
                Ordering::Greater => node.right.as_ref(),
            };
        }
        None
    }

    /// Number of distinct signatures.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Height of the tree; 0 when empty.
    pub fn height(&self) -> usize {
        height(&self.root)
    }

    /// Sum of every count.
    pub fn total_count(&self) -> u64 {
        self.total
    }

    /// Records in ascending signature order.
    pub fn in_order(&self) -> Vec<FrequencyRecord> {
        let mut records = Vec::with_capacity(self.len);
        let mut stack: Vec<&Node> = Vec::new();
        let mut current = self.root.as_deref();
        while current.is_some() || !stack.is_empty() {
            while let Some(node) = current {
                stack.push(node);
                current = node.left.as_deref();
            }
            if let Some(node) = stack.pop() {
                records.push(FrequencyRecord {
                    signature: node.signature.clone(),
                    count: node.count,
                });
                current = node.right.as_deref();
            }
        }
        records
    }

    /// The `k` most frequent records, highest count first; equal counts are
    /// ordered by signature.
    pub fn top_k(&self, k: usize) -> Vec<FrequencyRecord> {
        let mut records = self.in_order();
        // Stable sort keeps ascending signature order among equal counts.
        records.sort_by(|a, b| b.count.cmp(&a.count));
        records.truncate(k);
        records
    }

    pub fn clear(&mut self) {
        self.root = None;
        self.len = 0;
        self.total = 0;
    }

    #[cfg(test)]
    fn assert_balanced(&self) {
        fn check(node: &Option<Box<Node>>) -> usize {
            let Some(node) = node else {
                return 0;
            };
            let left = check(&node.left);
            let right = check(&node.right);
            assert!(left.abs_diff(right) <= 1, "unbalanced at {}", node.signature);
            if let Some(l) = &node.left {
                assert!(l.signature < node.signature);
            }
            if let Some(r) = &node.right {
                assert!(r.signature > node.signature);
            }
            assert_eq!(node.height, 1 + left.max(right));
            node.height
        }
        check(&self.root);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sig(value: &str) -> RouteSignature {
        RouteSignature::from(value)
    }

    #[test]
    fn repeated_inserts_accumulate() {
        let mut tree = FrequencyTree::new();
        for expected in 1..=50 {
            assert_eq!(tree.insert(sig("W1->C1")), expected);
        }
        assert_eq!(tree.get(&sig("W1->C1")), Some(50));
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.total_count(), 50);
        assert_eq!(tree.height(), 1);
    }

    #[test]
    fn top_one_after_a_a_b() {
        let mut tree = FrequencyTree::new();
        tree.insert(sig("A"));
        tree.insert(sig("A"));
        tree.insert(sig("B"));

        let top = tree.top_k(1);
        assert_eq!(
            top,
            vec![FrequencyRecord {
                signature: sig("A"),
                count: 2
            }]
        );
    }

    #[test]
    fn sorted_inserts_stay_balanced() {
        let mut tree = FrequencyTree::new();
        let n = 1000usize;
        for i in 0..n {
            tree.insert(sig(&format!("W1->C{i:04}")));
            tree.assert_balanced();
        }
        let bound = 1.44 * ((n + 2) as f64).log2();
        assert!((tree.height() as f64) <= bound, "height {}", tree.height());
        assert_eq!(tree.len(), n);

        let ordered: Vec<_> = tree.in_order().into_iter().map(|r| r.signature).collect();
        let mut expected = ordered.clone();
        expected.sort();
        assert_eq!(ordered, expected);
    }

    #[test]
    fn top_k_orders_by_count_then_signature() {
        let mut tree = FrequencyTree::new();
        for (signature, times) in [("C", 3), ("A", 1), ("B", 3), ("D", 2)] {
            for _ in 0..times {
                tree.insert(sig(signature));
            }
        }
        let top: Vec<_> = tree
            .top_k(3)
            .into_iter()
            .map(|record| (record.signature.to_string(), record.count))
            .collect();
        assert_eq!(
            top,
            vec![("B".to_string(), 3), ("C".to_string(), 3), ("D".to_string(), 2)]
        );
        assert_eq!(tree.top_k(10).len(), 4);
    }

    #[test]
    fn clear_empties_the_tree() {
        let mut tree = FrequencyTree::new();
        tree.insert(sig("A"));
        tree.clear();
        assert!(tree.is_empty());
        assert_eq!(tree.get(&sig("A")), None);
        assert_eq!(tree.height(), 0);
    }
}
