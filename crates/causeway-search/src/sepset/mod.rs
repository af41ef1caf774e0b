//! Separating sets recorded during adjacency search.
//!
//! Keys are unordered pairs, stored as name-sorted tuples, so lookups are
//! symmetric and iteration order is independent of node-list order.

use std::collections::{BTreeMap, BTreeSet};

use causeway_core::Node;
use serde::Serialize;

use crate::error::{SearchError, SearchResult};

type PairKey = (String, String);

fn key(x: &Node, y: &Node) -> PairKey {
    if x.name() <= y.name() {
        (x.name().to_string(), y.name().to_string())
    } else {
        (y.name().to_string(), x.name().to_string())
    }
}

/// Triples are keyed with the middle node fixed and the ends sorted.
fn triple_key(x: &Node, y: &Node, z: &Node) -> (String, String, String) {
    let (a, c) = key(x, z);
    (a, y.name().to_string(), c)
}

#[derive(Debug, Clone, PartialEq)]
struct SepsetEntry {
    set: Vec<Node>,
    p_value: Option<f64>,
}

/// Pair → conditioning set, plus the ambiguous triples found by
/// conservative collider discovery.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SepsetMap {
    entries: BTreeMap<PairKey, SepsetEntry>,
    ambiguous: BTreeSet<(String, String, String)>,
}

impl SepsetMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `z` as the separating set of `{x, y}`. A pair can be recorded
    /// once; re-runs must [`clear`](Self::clear) first.
    pub fn put(&mut self, x: &Node, y: &Node, z: Vec<Node>) -> SearchResult<()> {
        self.insert(x, y, z, None)
    }

    pub fn put_with_p_value(
        &mut self,
        x: &Node,
        y: &Node,
        z: Vec<Node>,
        p_value: f64,
    ) -> SearchResult<()> {
        self.insert(x, y, z, Some(p_value))
    }

    fn insert(
        &mut self,
        x: &Node,
        y: &Node,
        set: Vec<Node>,
        p_value: Option<f64>,
    ) -> SearchResult<()> {
        let k = key(x, y);
        if self.entries.contains_key(&k) {
            return Err(SearchError::SepsetAlreadyRecorded { x: k.0, y: k.1 });
        }
        self.entries.insert(k, SepsetEntry { set, p_value });
        Ok(())
    }

    /// The separating set of `{x, y}`, or `None` if the pair was never
    /// separated.
    pub fn get(&self, x: &Node, y: &Node) -> Option<&[Node]> {
        self.entries.get(&key(x, y)).map(|e| e.set.as_slice())
    }

    pub fn contains(&self, x: &Node, y: &Node) -> bool {
        self.entries.contains_key(&key(x, y))
    }

    pub fn p_value(&self, x: &Node, y: &Node) -> Option<f64> {
        self.entries.get(&key(x, y)).and_then(|e| e.p_value)
    }

    /// `Some(true)` if `y` is outside sepset(x, z), `Some(false)` if inside,
    /// `None` when no sepset was recorded.
    pub fn collider_status(&self, x: &Node, y: &Node, z: &Node) -> Option<bool> {
        self.get(x, z).map(|set| !set.contains(y))
    }

    /// True iff a sepset for `{x, z}` exists and does not contain `y`. A
    /// missing entry means "unknown" and answers `false`.
    pub fn is_unshielded_collider(&self, x: &Node, y: &Node, z: &Node) -> bool {
        self.collider_status(x, y, z).unwrap_or(false)
    }

    pub fn mark_ambiguous(&mut self, x: &Node, y: &Node, z: &Node) {
        self.ambiguous.insert(triple_key(x, y, z));
    }

    pub fn is_ambiguous(&self, x: &Node, y: &Node, z: &Node) -> bool {
        self.ambiguous.contains(&triple_key(x, y, z))
    }

    /// Ambiguous triples as `(end, middle, end)` names.
    pub fn ambiguous_triples(&self) -> impl Iterator<Item = (&str, &str, &str)> + '_ {
        self.ambiguous
            .iter()
            .map(|(a, b, c)| (a.as_str(), b.as_str(), c.as_str()))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.ambiguous.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Separated pairs, name-sorted.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.entries.keys().map(|(a, b)| (a.as_str(), b.as_str()))
    }

    /// The separating set of a pair addressed by name.
    pub fn get_by_name(&self, x: &str, y: &str) -> Option<&[Node]> {
        let k = if x <= y {
            (x.to_string(), y.to_string())
        } else {
            (y.to_string(), x.to_string())
        };
        self.entries.get(&k).map(|e| e.set.as_slice())
    }
}

#[derive(Serialize)]
struct SepsetRecord<'a> {
    x: &'a str,
    y: &'a str,
    set: Vec<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    p_value: Option<f64>,
}

#[derive(Serialize)]
struct SepsetView<'a> {
    sepsets: Vec<SepsetRecord<'a>>,
    ambiguous_triples: Vec<[&'a str; 3]>,
}

impl Serialize for SepsetMap {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        SepsetView {
            sepsets: self
                .entries
                .iter()
                .map(|((x, y), entry)| SepsetRecord {
                    x,
                    y,
                    set: entry.set.iter().map(Node::name).collect(),
                    p_value: entry.p_value,
                })
                .collect(),
            ambiguous_triples: self.ambiguous_triples().map(|(a, b, c)| [a, b, c]).collect(),
        }
        .serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_is_unordered() {
        let (x, y, z) = (Node::new("X"), Node::new("Y"), Node::new("Z"));
        let mut map = SepsetMap::new();
        map.put(&z, &x, vec![]).unwrap();
        assert_eq!(map.get(&x, &z), Some(&[][..]));
        assert!(map.is_unshielded_collider(&x, &y, &z));
        assert!(matches!(
            map.put(&x, &z, vec![y.clone()]),
            Err(SearchError::SepsetAlreadyRecorded { .. })
        ));
    }

    #[test]
    fn missing_entry_is_not_a_collider() {
        let (x, y, z) = (Node::new("X"), Node::new("Y"), Node::new("Z"));
        let map = SepsetMap::new();
        assert_eq!(map.collider_status(&x, &y, &z), None);
        assert!(!map.is_unshielded_collider(&x, &y, &z));
    }
}
