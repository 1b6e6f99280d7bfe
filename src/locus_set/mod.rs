//! The locus set: a growing collection of mutually non-overlapping locus
//! graphs.
//!
//! Loci are absorbed one at a time with [`LocusSet::merge`]. Whenever a
//! node of the incoming locus overlaps a node already in the set, the two
//! nodes are merged and, if they belong to different loci, the loci are
//! fused. Once a merge returns the set satisfies:
//!
//! 1. no two live nodes have overlapping intervals;
//! 2. the [`IntervalIndex`] maps exactly the live nodes to the slot that
//!    stores them;
//! 3. the empty slot set holds exactly the slots without nodes;
//! 4. every locus is a single connected component.
//!
//! All nodes live in one arena owned by the set. A slot only holds the
//! handles of its nodes, in insertion order, and the index only holds
//! handles too.
//!
//! Submodules:
//! - `index`: the [`IntervalIndex`].
//! - `merge`: the merge engine.
//! - `check`: invariant verification ([`StateViolation`]).
//! - `config`: [`LocusSetConfig`].
//! - `stats`: [`LocusSetStats`].
//! - `partition`: parallel construction from independent partitions.

mod check;
mod config;
mod dump;
mod index;
mod merge;
mod partition;
mod stats;

use std::collections::BTreeSet;

use indexmap::IndexSet;
use itertools::Itertools;
use slotmap::SlotMap;

pub use check::StateViolation;
pub use config::{LocusSetConfig, CHECK_INTERVAL_ENV};
pub use index::IntervalIndex;
pub use partition::build_partitioned;
pub use stats::LocusSetStats;

use crate::data_structs::coords::GenomeInterval;
use crate::data_structs::locus::{Locus, LocusNode};
use crate::data_structs::typedef::{CountType, LocusIndex, NodeKey};
use crate::getter_fn;

/// Collection of non-overlapping locus graphs with an interval index over
/// their nodes.
#[derive(Debug, Clone, Default)]
pub struct LocusSet {
    pub(crate) config:      LocusSetConfig,
    pub(crate) nodes:       SlotMap<NodeKey, LocusNode<NodeKey>>,
    pub(crate) loci:        Vec<IndexSet<NodeKey>>,
    pub(crate) empty_loci:  BTreeSet<LocusIndex>,
    pub(crate) index:       IntervalIndex,
    pub(crate) merge_count: usize,
}

impl LocusSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: LocusSetConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    getter_fn!(config, LocusSetConfig);

    getter_fn!(index, IntervalIndex);

    /// Number of storage slots, retired (empty) slots included.
    pub fn slot_count(&self) -> usize {
        self.loci.len()
    }

    /// Number of live (non-empty) loci.
    pub fn len(&self) -> usize {
        self.loci.len() - self.empty_loci.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of live nodes over all loci.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of merges performed since construction or the last
    /// [`clear`](Self::clear).
    pub fn merge_count(&self) -> usize {
        self.merge_count
    }

    /// Slots currently retired and available for reuse, in ascending order.
    pub fn empty_slots(&self) -> impl Iterator<Item = LocusIndex> + '_ {
        self.empty_loci.iter().copied()
    }

    /// Returns the locus stored in slot `index`.
    pub fn get(
        &self,
        index: LocusIndex,
    ) -> Option<LocusRef<'_>> {
        self.loci.get(index).map(|keys| {
            LocusRef {
                set: self,
                index,
                keys,
            }
        })
    }

    /// Iterates over all slots in storage order. Retired slots appear as
    /// empty loci.
    pub fn iter(&self) -> impl Iterator<Item = LocusRef<'_>> {
        self.loci.iter().enumerate().map(|(index, keys)| {
            LocusRef {
                set: self,
                index,
                keys,
            }
        })
    }

    /// Iterates over non-empty loci in storage order.
    pub fn iter_live(&self) -> impl Iterator<Item = LocusRef<'_>> {
        self.iter().filter(|locus| !locus.is_empty())
    }

    /// Returns the node behind `key`, if it is live.
    pub fn node(
        &self,
        key: NodeKey,
    ) -> Option<&LocusNode<NodeKey>> {
        self.nodes.get(key)
    }

    /// Returns the slot owning the live node `key`.
    pub fn locus_of(
        &self,
        key: NodeKey,
    ) -> Option<LocusIndex> {
        self.nodes
            .get(key)
            .and_then(|node| self.index.get(node.interval(), key))
    }

    /// Drops every locus, the empty slot set and the index. The
    /// configuration is kept.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.loci.clear();
        self.empty_loci.clear();
        self.index.clear();
        self.merge_count = 0;
    }

    /// Rebuilds the standalone form of the locus in slot `index`. Node
    /// order follows slot order.
    pub fn export_locus(
        &self,
        index: LocusIndex,
    ) -> Option<Locus> {
        self.get(index).map(|locus| locus.to_locus())
    }

    /// Consumes the set, yielding every live locus in storage order.
    pub fn into_loci(self) -> impl Iterator<Item = Locus> {
        let loci = self.iter_live().map(|locus| locus.to_locus()).collect_vec();
        loci.into_iter()
    }

    /// Slot to start the next merge in: the lowest retired slot if any,
    /// otherwise a new slot at the end of storage.
    pub(crate) fn start_locus_index(&self) -> LocusIndex {
        self.empty_loci
            .first()
            .copied()
            .unwrap_or(self.loci.len())
    }

    /// Takes the slot returned by [`start_locus_index`](Self::start_locus_index)
    /// out of the free pool.
    pub(crate) fn claim_locus_index(&mut self) -> LocusIndex {
        let index = self.start_locus_index();
        if index == self.loci.len() {
            self.loci.push(IndexSet::new());
        }
        else {
            self.empty_loci.remove(&index);
        }
        index
    }

    /// Copies a node into slot `locus_index` and indexes it. Edges are
    /// attached by the caller once every node of the locus has a handle.
    ///
    /// # Panics
    ///
    /// If `locus_index` is not a valid slot.
    pub(crate) fn insert_locus_node(
        &mut self,
        locus_index: LocusIndex,
        interval: GenomeInterval,
        count: CountType,
    ) -> NodeKey {
        assert!(
            locus_index < self.loci.len(),
            "Locus index {} out of bounds ({} slots)",
            locus_index,
            self.loci.len()
        );
        let key = self.nodes.insert(LocusNode::new(interval, count));
        self.loci[locus_index].insert(key);
        self.index.insert(interval, key, locus_index);
        self.empty_loci.remove(&locus_index);
        key
    }

    /// Copies every node and edge of `locus` into slot `locus_index`.
    /// Returns the new handles in locus order.
    pub(crate) fn copy_locus_in(
        &mut self,
        locus_index: LocusIndex,
        locus: &Locus,
    ) -> Vec<NodeKey> {
        let keys = locus
            .nodes()
            .map(|node| self.insert_locus_node(locus_index, *node.interval(), node.count()))
            .collect_vec();
        for (from, node) in locus.nodes().enumerate() {
            for (to, count) in node.edges() {
                self.nodes[keys[from]].add_edge_count(keys[*to], *count);
            }
        }
        keys
    }

    /// Appends a slot holding a copy of `locus` without indexing its nodes.
    /// Used when restoring a snapshot; the index is rebuilt afterwards with
    /// [`reconstruct_index`](Self::reconstruct_index).
    pub(crate) fn restore_locus(
        &mut self,
        locus: &Locus,
    ) -> LocusIndex {
        let locus_index = self.loci.len();
        let keys = locus
            .nodes()
            .map(|node| self.nodes.insert(LocusNode::new(*node.interval(), node.count())))
            .collect_vec();
        for (from, node) in locus.nodes().enumerate() {
            for (to, count) in node.edges() {
                self.nodes[keys[from]].add_edge_count(keys[*to], *count);
            }
        }
        self.loci.push(keys.into_iter().collect());
        locus_index
    }

    /// Removes a node from its slot, the arena and the index. Edges of
    /// other nodes pointing at it are left to the caller. A slot losing its
    /// last node is retired. Removing an absent node does nothing.
    pub(crate) fn remove_node(
        &mut self,
        key: NodeKey,
    ) -> Option<LocusNode<NodeKey>> {
        let node = self.nodes.remove(key)?;
        let locus_index = self
            .index
            .remove(node.interval(), key)
            .expect("Live node missing from the interval index");
        let keys = &mut self.loci[locus_index];
        keys.shift_remove(&key);
        if keys.is_empty() {
            self.empty_loci.insert(locus_index);
        }
        Some(node)
    }

    /// Moves every node of slot `from` into slot `to`, re-registers them in
    /// the index and retires `from`.
    ///
    /// # Panics
    ///
    /// If either slot is invalid or `from == to`.
    pub(crate) fn combine_loci(
        &mut self,
        from: LocusIndex,
        to: LocusIndex,
    ) {
        assert_ne!(from, to, "Cannot combine a locus with itself");
        assert!(
            from < self.loci.len() && to < self.loci.len(),
            "Locus index out of bounds ({} -> {}, {} slots)",
            from,
            to,
            self.loci.len()
        );
        let moved = std::mem::take(&mut self.loci[from]);
        for key in moved.iter() {
            let interval = self.nodes[*key].interval();
            let reindexed = self.index.set_locus(interval, *key, to);
            assert!(reindexed, "Node {} missing from the interval index", interval);
        }
        self.loci[to].extend(moved);
        self.empty_loci.insert(from);
        self.empty_loci.remove(&to);
    }
}

/// Read-only view of one storage slot of a [`LocusSet`].
#[derive(Debug, Clone, Copy)]
pub struct LocusRef<'a> {
    set:   &'a LocusSet,
    index: LocusIndex,
    keys:  &'a IndexSet<NodeKey>,
}

impl<'a> LocusRef<'a> {
    /// Storage slot of this locus.
    pub fn index(&self) -> LocusIndex {
        self.index
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn contains(
        &self,
        key: NodeKey,
    ) -> bool {
        self.keys.contains(&key)
    }

    /// Node handles in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = NodeKey> + 'a {
        self.keys.iter().copied()
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeKey, &'a LocusNode<NodeKey>)> + 'a {
        let set = self.set;
        self.keys.iter().map(move |key| (*key, &set.nodes[*key]))
    }

    /// Number of directed edge entries, self-edges included.
    pub fn edge_count(&self) -> usize {
        self.nodes().map(|(_, node)| node.degree()).sum()
    }

    /// Rebuilds a standalone [`Locus`] with the same nodes and edges.
    pub fn to_locus(&self) -> Locus {
        let mut locus = Locus::new();
        for (_, node) in self.nodes() {
            locus.add_node(*node.interval(), node.count());
        }
        for (from, (_, node)) in self.nodes().enumerate() {
            for (to, count) in node.edges() {
                let to = self
                    .keys
                    .get_index_of(to)
                    .expect("Edge points outside of its locus");
                // reverse count is added when `to` is visited
                locus.link_nodes(from, to, *count, 0);
            }
        }
        locus
    }
}

#[cfg(test)]
mod tests;
