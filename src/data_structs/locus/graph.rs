use std::fmt::Display;

use serde::{Deserialize, Serialize};

use super::LocusNode;
use crate::data_structs::coords::GenomeInterval;
use crate::data_structs::typedef::{CountType, NodeIndex};
use crate::locus_set::StateViolation;
use crate::utils::reachable_count;

/// A standalone locus graph: one connected component of breakpoint regions
/// linked by evidence edges.
///
/// Loci are assembled by the evidence-gathering stage and handed over to
/// [`LocusSet::merge`](crate::LocusSet::merge), which consumes them. Nodes
/// are addressed by their insertion position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locus {
    nodes: Vec<LocusNode<NodeIndex>>,
}

impl Locus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an unlinked node and returns its index.
    ///
    /// Every node but the first must be linked with
    /// [`link_nodes`](Self::link_nodes) before the locus is merged.
    pub fn add_node(
        &mut self,
        interval: GenomeInterval,
        count: CountType,
    ) -> NodeIndex {
        self.nodes.push(LocusNode::new(interval, count));
        self.nodes.len() - 1
    }

    /// Links two nodes, adding `from_count` to the `from -> to` edge and
    /// `to_count` to the `to -> from` edge. Linking a node to itself records
    /// both counts on its self-edge.
    ///
    /// # Panics
    ///
    /// If either index is out of bounds.
    pub fn link_nodes(
        &mut self,
        from: NodeIndex,
        to: NodeIndex,
        from_count: CountType,
        to_count: CountType,
    ) {
        assert!(
            from < self.nodes.len() && to < self.nodes.len(),
            "Node index out of bounds ({}, {}) for locus of {} nodes",
            from,
            to,
            self.nodes.len()
        );
        if from == to {
            self.nodes[from].add_edge_count(from, from_count.saturating_add(to_count));
        }
        else {
            self.nodes[from].add_edge_count(to, from_count);
            self.nodes[to].add_edge_count(from, to_count);
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(
        &self,
        index: NodeIndex,
    ) -> Option<&LocusNode<NodeIndex>> {
        self.nodes.get(index)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &LocusNode<NodeIndex>> {
        self.nodes.iter()
    }

    /// Number of directed edge entries, self-edges included.
    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(|n| n.degree()).sum()
    }

    /// Total evidence count over all nodes.
    pub fn total_count(&self) -> u64 {
        self.nodes.iter().map(|n| n.count() as u64).sum()
    }

    pub fn is_connected(&self) -> bool {
        if self.nodes.is_empty() {
            return true;
        }
        let nodes = &self.nodes;
        let len = nodes.len();
        reachable_count(0, move |i| {
            nodes[i]
                .edges()
                .keys()
                .copied()
                .filter(move |to| *to < len)
        }) == len
    }

    /// Checks that every edge points inside the locus, that edges exist in
    /// both directions and that the locus is a single component.
    pub fn validate(&self) -> Result<(), StateViolation> {
        for (index, node) in self.nodes.iter().enumerate() {
            for to in node.edges().keys() {
                let Some(target) = self.nodes.get(*to) else {
                    return Err(StateViolation::DanglingEdge {
                        locus: None,
                        from:  *node.interval(),
                    });
                };
                if !target.has_edge(&index) {
                    return Err(StateViolation::AsymmetricEdge {
                        locus: None,
                        from:  *node.interval(),
                        to:    *target.interval(),
                    });
                }
            }
        }
        if !self.is_connected() {
            return Err(StateViolation::Disconnected {
                locus: None,
                nodes: self.nodes.len(),
            });
        }
        Ok(())
    }
}

impl Display for Locus {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        writeln!(f, "Locus nodes={}", self.nodes.len())?;
        for (index, node) in self.nodes.iter().enumerate() {
            writeln!(f, "\t{}: {}", index, node)?;
        }
        Ok(())
    }
}
