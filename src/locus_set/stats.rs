use std::collections::BTreeMap;
use std::fmt::Display;

use serde::{Deserialize, Serialize};

use super::LocusSet;
use crate::data_structs::typedef::TidType;

/// Summary of the content of a [`LocusSet`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocusSetStats {
    /// Storage slots, retired ones included.
    pub slots:            usize,
    /// Non-empty loci.
    pub live_loci:        usize,
    /// Retired slots awaiting reuse.
    pub empty_slots:      usize,
    pub nodes:            usize,
    /// Directed edge entries, self-edges included.
    pub edges:            usize,
    pub self_edges:       usize,
    /// Sum of node evidence counts.
    pub node_evidence:    u64,
    /// Sum of edge evidence counts.
    pub edge_evidence:    u64,
    /// Node count of the largest locus.
    pub max_locus_nodes:  usize,
    /// Live nodes per contig.
    pub nodes_per_contig: BTreeMap<TidType, usize>,
}

impl LocusSet {
    pub fn stats(&self) -> LocusSetStats {
        let mut stats = LocusSetStats {
            slots: self.slot_count(),
            live_loci: self.len(),
            empty_slots: self.empty_loci.len(),
            ..Default::default()
        };
        for locus in self.iter_live() {
            stats.max_locus_nodes = stats.max_locus_nodes.max(locus.len());
            for (key, node) in locus.nodes() {
                stats.nodes += 1;
                stats.edges += node.degree();
                stats.node_evidence += node.count() as u64;
                stats.edge_evidence += node.total_edge_count();
                if node.has_edge(&key) {
                    stats.self_edges += 1;
                }
                *stats
                    .nodes_per_contig
                    .entry(node.interval().tid())
                    .or_insert(0) += 1;
            }
        }
        stats
    }
}

impl Display for LocusSetStats {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        writeln!(f, "{:<20}{}", "slots", self.slots)?;
        writeln!(f, "{:<20}{}", "live_loci", self.live_loci)?;
        writeln!(f, "{:<20}{}", "empty_slots", self.empty_slots)?;
        writeln!(f, "{:<20}{}", "nodes", self.nodes)?;
        writeln!(f, "{:<20}{}", "edges", self.edges)?;
        writeln!(f, "{:<20}{}", "self_edges", self.self_edges)?;
        writeln!(f, "{:<20}{}", "node_evidence", self.node_evidence)?;
        writeln!(f, "{:<20}{}", "edge_evidence", self.edge_evidence)?;
        writeln!(f, "{:<20}{}", "max_locus_nodes", self.max_locus_nodes)?;
        for (tid, nodes) in self.nodes_per_contig.iter() {
            writeln!(f, "{:<20}{}", format!("nodes[tid={}]", tid), nodes)?;
        }
        Ok(())
    }
}
