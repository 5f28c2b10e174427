//! Immutable deterministic trie over `u32` input units.
//!
//! `CodeUnitTrie` maps sequences of transformed input units to non-negative
//! integer weights. It is built once with `TrieBuilder`, serialized inside
//! dictionary blobs, and never mutated at match time, so a single trie can be
//! shared read-only across concurrent matches.

use serde::{Deserialize, Serialize};

/// Outcome of advancing a [`TrieCursor`] by one input unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrieResult {
    /// No transition exists for the unit. The cursor is dead afterwards.
    NoMatch,
    /// A transition was taken; the reached node carries no value.
    NoValue,
    /// A transition was taken; the reached node carries a value and has
    /// further continuations.
    Intermediate(i32),
    /// A transition was taken; the reached node carries a value and has no
    /// continuation. The cursor is dead afterwards.
    FinalValue(i32),
}

impl TrieResult {
    pub fn value(self) -> Option<i32> {
        match self {
            TrieResult::Intermediate(v) | TrieResult::FinalValue(v) => Some(v),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Node {
    value: Option<i32>,
    /// Index of this node's first edge in `edges`.
    first_edge: u32,
    edge_count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Edge {
    label: u32,
    target: u32,
}

/// Serialized deterministic trie. Node 0 is the root; each node's outgoing
/// edges occupy a contiguous, label-sorted slice of `edges`, so there is at
/// most one transition per input unit from any node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeUnitTrie {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

impl CodeUnitTrie {
    /// A cursor positioned at the root, before any input.
    pub fn cursor(&self) -> TrieCursor<'_> {
        TrieCursor {
            trie: self,
            node: Some(0),
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// True when the trie contains no entries at all.
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty() && self.nodes[0].value.is_none()
    }

    fn edges_of(&self, node: usize) -> &[Edge] {
        let n = &self.nodes[node];
        let first = n.first_edge as usize;
        &self.edges[first..first + n.edge_count as usize]
    }
}

/// Forward-only walk state over a [`CodeUnitTrie`]. Cheap to create; one per
/// match attempt.
pub struct TrieCursor<'a> {
    trie: &'a CodeUnitTrie,
    node: Option<usize>,
}

impl TrieCursor<'_> {
    /// Consume one input unit.
    ///
    /// After `NoMatch` or `FinalValue` the cursor is dead: every further
    /// `step` returns `NoMatch`.
    pub fn step(&mut self, unit: u32) -> TrieResult {
        let Some(node) = self.node else {
            return TrieResult::NoMatch;
        };
        let edges = self.trie.edges_of(node);
        let Ok(i) = edges.binary_search_by_key(&unit, |e| e.label) else {
            self.node = None;
            return TrieResult::NoMatch;
        };
        let target = edges[i].target as usize;
        let reached = &self.trie.nodes[target];
        match reached.value {
            Some(v) if reached.edge_count == 0 => {
                self.node = None;
                TrieResult::FinalValue(v)
            }
            Some(v) => {
                self.node = Some(target);
                TrieResult::Intermediate(v)
            }
            None => {
                self.node = Some(target);
                TrieResult::NoValue
            }
        }
    }

    /// True while the cursor can still take some transition.
    pub fn is_live(&self) -> bool {
        self.node.is_some()
    }
}

#[derive(Default)]
struct BuildNode {
    value: Option<i32>,
    children: std::collections::BTreeMap<u32, BuildNode>,
}

/// Incremental construction of a [`CodeUnitTrie`].
///
/// Insertion order does not affect the built trie; children are kept in a
/// `BTreeMap` and flattened in label order.
#[derive(Default)]
pub struct TrieBuilder {
    root: BuildNode,
}

impl TrieBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Associate `value` with the unit sequence. Re-inserting the same
    /// sequence overwrites the previous value.
    pub fn insert(&mut self, units: impl IntoIterator<Item = u32>, value: i32) {
        let mut node = &mut self.root;
        for unit in units {
            node = node.children.entry(unit).or_default();
        }
        node.value = Some(value);
    }

    pub fn build(self) -> CodeUnitTrie {
        let mut nodes = Vec::new();
        let mut edges = Vec::new();
        // Breadth-first flatten keeps each node's edges contiguous.
        let mut queue = std::collections::VecDeque::new();
        nodes.push(Node {
            value: self.root.value,
            first_edge: 0,
            edge_count: 0,
        });
        queue.push_back((0usize, self.root.children));
        while let Some((idx, children)) = queue.pop_front() {
            nodes[idx].first_edge = edges.len() as u32;
            nodes[idx].edge_count = children.len() as u32;
            for (label, child) in children {
                let target = nodes.len() as u32;
                edges.push(Edge { label, target });
                nodes.push(Node {
                    value: child.value,
                    first_edge: 0,
                    edge_count: 0,
                });
                queue.push_back((target as usize, child.children));
            }
        }
        CodeUnitTrie { nodes, edges }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CodeUnitTrie {
        let mut b = TrieBuilder::new();
        b.insert("ab".chars().map(u32::from), 10);
        b.insert("abc".chars().map(u32::from), 20);
        b.insert("c".chars().map(u32::from), 30);
        b.build()
    }

    fn walk(trie: &CodeUnitTrie, s: &str) -> Vec<TrieResult> {
        let mut cur = trie.cursor();
        s.chars().map(|c| cur.step(u32::from(c))).collect()
    }

    #[test]
    fn test_walk_results() {
        let trie = sample();
        assert_eq!(
            walk(&trie, "abc"),
            vec![
                TrieResult::NoValue,
                TrieResult::Intermediate(10),
                TrieResult::FinalValue(20),
            ]
        );
        assert_eq!(walk(&trie, "c"), vec![TrieResult::FinalValue(30)]);
    }

    #[test]
    fn test_no_match_kills_cursor() {
        let trie = sample();
        let mut cur = trie.cursor();
        assert_eq!(cur.step(u32::from('x')), TrieResult::NoMatch);
        assert!(!cur.is_live());
        // Dead cursors stay dead, even for units that exist at the root.
        assert_eq!(cur.step(u32::from('a')), TrieResult::NoMatch);
    }

    #[test]
    fn test_final_value_kills_cursor() {
        let trie = sample();
        let mut cur = trie.cursor();
        assert_eq!(cur.step(u32::from('c')), TrieResult::FinalValue(30));
        assert_eq!(cur.step(u32::from('a')), TrieResult::NoMatch);
    }

    #[test]
    fn test_insert_order_irrelevant() {
        let mut b = TrieBuilder::new();
        b.insert("c".chars().map(u32::from), 30);
        b.insert("abc".chars().map(u32::from), 20);
        b.insert("ab".chars().map(u32::from), 10);
        let reordered = b.build();
        assert_eq!(walk(&reordered, "abc"), walk(&sample(), "abc"));
        assert_eq!(reordered.node_count(), sample().node_count());
    }

    #[test]
    fn test_reinsert_overwrites() {
        let mut b = TrieBuilder::new();
        b.insert("ab".chars().map(u32::from), 1);
        b.insert("ab".chars().map(u32::from), 2);
        let trie = b.build();
        assert_eq!(
            walk(&trie, "ab"),
            vec![TrieResult::NoValue, TrieResult::FinalValue(2)]
        );
    }

    #[test]
    fn test_empty_trie() {
        let trie = TrieBuilder::new().build();
        assert!(trie.is_empty());
        let mut cur = trie.cursor();
        assert_eq!(cur.step(0), TrieResult::NoMatch);
    }

    #[test]
    fn test_serialize_roundtrip() {
        let trie = sample();
        let bytes = bincode::serialize(&trie).unwrap();
        let back: CodeUnitTrie = bincode::deserialize(&bytes).unwrap();
        assert_eq!(walk(&back, "abc"), walk(&trie, "abc"));
        assert_eq!(back.edge_count(), trie.edge_count());
    }
}
