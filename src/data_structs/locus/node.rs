use std::collections::BTreeMap;
use std::fmt::Display;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::data_structs::coords::GenomeInterval;
use crate::data_structs::typedef::CountType;

/// Breakpoint-evidence region of a locus graph.
///
/// `K` identifies other nodes of the same locus: a [`NodeIndex`] inside a
/// standalone [`Locus`], a [`NodeKey`] once the node is stored in a
/// [`LocusSet`].
///
/// Edges are kept as directed evidence counts. Edge *existence* is
/// symmetric: whenever `a` holds an entry for `b`, `b` holds one for `a`,
/// possibly with a zero count. An entry pointing at the node itself is a
/// self-edge.
///
/// [`NodeIndex`]: crate::data_structs::typedef::NodeIndex
/// [`NodeKey`]: crate::data_structs::typedef::NodeKey
/// [`Locus`]: super::Locus
/// [`LocusSet`]: crate::LocusSet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocusNode<K>
where
    K: Ord + Copy, {
    interval: GenomeInterval,
    count:    CountType,
    edges:    BTreeMap<K, CountType>,
}

impl<K> LocusNode<K>
where
    K: Ord + Copy,
{
    /// Creates a new node without edges.
    pub fn new(
        interval: GenomeInterval,
        count: CountType,
    ) -> Self {
        Self {
            interval,
            count,
            edges: BTreeMap::new(),
        }
    }

    pub fn interval(&self) -> &GenomeInterval {
        &self.interval
    }

    /// Returns the evidence count accumulated by this node.
    pub fn count(&self) -> CountType {
        self.count
    }

    /// Outgoing edges and their evidence counts.
    pub fn edges(&self) -> &BTreeMap<K, CountType> {
        &self.edges
    }

    pub fn edge_count(
        &self,
        to: &K,
    ) -> Option<CountType> {
        self.edges.get(to).copied()
    }

    pub fn has_edge(
        &self,
        to: &K,
    ) -> bool {
        self.edges.contains_key(to)
    }

    /// Number of distinct nodes this node links to, itself included.
    pub fn degree(&self) -> usize {
        self.edges.len()
    }

    /// Sum of all outgoing edge counts.
    pub fn total_edge_count(&self) -> u64 {
        self.edges.values().map(|c| *c as u64).sum()
    }

    pub(crate) fn set_interval(
        &mut self,
        interval: GenomeInterval,
    ) {
        self.interval = interval;
    }

    pub(crate) fn add_count(
        &mut self,
        count: CountType,
    ) {
        self.count = self.count.saturating_add(count);
    }

    /// Adds `count` to the edge towards `to`, creating it if needed.
    pub(crate) fn add_edge_count(
        &mut self,
        to: K,
        count: CountType,
    ) {
        let entry = self.edges.entry(to).or_insert(0);
        *entry = entry.saturating_add(count);
    }

    pub(crate) fn remove_edge(
        &mut self,
        to: &K,
    ) -> Option<CountType> {
        self.edges.remove(to)
    }
}

impl<K> Display for LocusNode<K>
where
    K: Ord + Copy + std::fmt::Debug,
{
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(
            f,
            "{} count={} edges=[{}]",
            self.interval,
            self.count,
            self.edges
                .iter()
                .map(|(to, count)| format!("{:?}:{}", to, count))
                .join(", ")
        )
    }
}
