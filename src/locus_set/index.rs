use std::collections::BTreeMap;
use std::io::Write;
use std::ops::Bound;

use crate::data_structs::coords::GenomeInterval;
use crate::data_structs::typedef::{LocusIndex, NodeKey, PosType};

/// Key of the interval index: node interval first, node handle second, so
/// that nodes with equal intervals still get distinct, deterministically
/// ordered entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct IndexKey {
    interval: GenomeInterval,
    node:     NodeKey,
}

impl IndexKey {
    pub(crate) fn new(
        interval: GenomeInterval,
        node: NodeKey,
    ) -> Self {
        Self { interval, node }
    }

    pub(crate) fn interval(&self) -> &GenomeInterval {
        &self.interval
    }

    pub(crate) fn node(&self) -> NodeKey {
        self.node
    }
}

/// Ordered map from stored nodes to the slot of the locus owning them.
///
/// Only live nodes are indexed. Lookups need the node's current interval,
/// so a node must be removed before its interval changes and re-inserted
/// afterwards.
#[derive(Debug, Clone, Default)]
pub struct IntervalIndex {
    map:      BTreeMap<IndexKey, LocusIndex>,
    /// Longest interval indexed since the last reset. Bounds how far back
    /// an overlap scan has to look.
    max_span: PosType,
}

impl IntervalIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn clear(&mut self) {
        self.map.clear();
        self.max_span = 0;
    }

    /// Registers `node` as owned by `locus`. Returns the previous owner if
    /// the node was already indexed under the same interval.
    pub(crate) fn insert(
        &mut self,
        interval: GenomeInterval,
        node: NodeKey,
        locus: LocusIndex,
    ) -> Option<LocusIndex> {
        self.max_span = self.max_span.max(interval.len());
        self.map.insert(IndexKey::new(interval, node), locus)
    }

    pub(crate) fn remove(
        &mut self,
        interval: &GenomeInterval,
        node: NodeKey,
    ) -> Option<LocusIndex> {
        self.map.remove(&IndexKey::new(*interval, node))
    }

    pub fn get(
        &self,
        interval: &GenomeInterval,
        node: NodeKey,
    ) -> Option<LocusIndex> {
        self.map.get(&IndexKey::new(*interval, node)).copied()
    }

    /// Changes the owner of an indexed node. Returns false if the node is
    /// not indexed.
    pub(crate) fn set_locus(
        &mut self,
        interval: &GenomeInterval,
        node: NodeKey,
        locus: LocusIndex,
    ) -> bool {
        match self.map.get_mut(&IndexKey::new(*interval, node)) {
            Some(owner) => {
                *owner = locus;
                true
            },
            None => false,
        }
    }

    /// Returns every indexed node, other than `exclude`, whose interval
    /// overlaps `interval`, together with its owning slot. Results follow
    /// index order.
    pub fn intersect(
        &self,
        interval: &GenomeInterval,
        exclude: Option<NodeKey>,
    ) -> Vec<(NodeKey, LocusIndex)> {
        let lower = IndexKey::new(
            GenomeInterval::probe(
                interval.tid(),
                interval.start().saturating_sub(self.max_span),
            ),
            NodeKey::default(),
        );
        let upper = IndexKey::new(
            GenomeInterval::probe(interval.tid(), interval.end()),
            NodeKey::default(),
        );
        self.map
            .range((Bound::Included(lower), Bound::Excluded(upper)))
            .filter(|(key, _)| {
                Some(key.node) != exclude && key.interval.overlaps(interval)
            })
            .map(|(key, locus)| (key.node, *locus))
            .collect()
    }

    /// Iterates over `(interval, node, locus)` entries in index order.
    pub fn iter(
        &self
    ) -> impl Iterator<Item = (&GenomeInterval, NodeKey, LocusIndex)> {
        self.map
            .iter()
            .map(|(key, locus)| (key.interval(), key.node(), *locus))
    }

    /// Writes one line per entry. Intended for debugging only.
    pub fn dump<W: Write>(
        &self,
        writer: &mut W,
    ) -> std::io::Result<()> {
        writeln!(writer, "IntervalIndex entries={}", self.map.len())?;
        for (interval, node, locus) in self.iter() {
            writeln!(writer, "\t{} {:?} -> locus {}", interval, node, locus)?;
        }
        Ok(())
    }
}
