use itertools::Itertools;
use log::{debug, trace};

use super::LocusSet;
use crate::data_structs::locus::Locus;
use crate::data_structs::typedef::{LocusIndex, NodeKey};

impl LocusSet {
    /// Absorbs `locus` into the set.
    ///
    /// The locus is copied into a free slot (the working locus). Every node
    /// of the working locus is then checked against the index; each
    /// overlapping node is merged into it, fusing its whole locus into the
    /// working one first when it lives elsewhere. Merged nodes grow, so the
    /// scan repeats until no node of the working locus overlaps anything.
    ///
    /// # Panics
    ///
    /// If `locus` is malformed (disconnected, dangling or one-sided edges),
    /// or if an overlap survives the merge.
    pub fn merge(
        &mut self,
        locus: Locus,
    ) {
        if locus.is_empty() {
            trace!("Skipping merge of an empty locus");
            return;
        }
        if let Err(violation) = locus.validate() {
            panic!("Cannot merge malformed locus: {}", violation);
        }

        let head = self.claim_locus_index();
        self.copy_locus_in(head, &locus);

        let mut absorbed_loci = 0;
        let mut merged_nodes = 0;
        loop {
            let mut changed = false;
            let working = self.loci[head].iter().copied().collect_vec();
            for key in working {
                // `key` may have been merged into an earlier node of this pass
                while self.nodes.contains_key(key) {
                    let hits = self.get_node_intersect(key);
                    if hits.is_empty() {
                        break;
                    }
                    for (other, _) in hits {
                        // owners are resolved again, earlier hits may have
                        // fused their locus into the working one
                        let owner = self
                            .locus_of(other)
                            .expect("Intersecting node is not live");
                        if owner != head {
                            self.combine_loci(owner, head);
                            absorbed_loci += 1;
                        }
                        self.merge_node(other, key);
                        merged_nodes += 1;
                        changed = true;
                    }
                }
            }
            if !changed {
                break;
            }
        }

        for key in self.loci[head].iter() {
            let residual = self.get_node_intersect(*key);
            if let Some((other, locus_index)) = residual.first() {
                panic!(
                    "Residual overlap after merge: {} overlaps {} in locus {}",
                    self.nodes[*key].interval(),
                    self.nodes[*other].interval(),
                    locus_index
                );
            }
        }

        self.merge_count += 1;
        debug!(
            "Merged locus #{} into slot {}: {} nodes after absorbing {} loci \
             and {} node merges",
            self.merge_count,
            head,
            self.loci[head].len(),
            absorbed_loci,
            merged_nodes
        );
        if self.config.should_check(self.merge_count) {
            self.check_state();
        }
    }

    /// Merges every live locus of `other` into this set.
    pub fn merge_set(
        &mut self,
        other: LocusSet,
    ) {
        let n_loci = other.len();
        for locus in other.into_loci() {
            self.merge(locus);
        }
        debug!(
            "Merged {} loci from another set, {} live loci now",
            n_loci,
            self.len()
        );
    }

    /// Live nodes, other than `key` itself, whose intervals overlap the
    /// interval of `key`, with the slot owning each of them.
    pub(crate) fn get_node_intersect(
        &self,
        key: NodeKey,
    ) -> Vec<(NodeKey, LocusIndex)> {
        match self.nodes.get(key) {
            Some(node) => self.index.intersect(node.interval(), Some(key)),
            None => Vec::new(),
        }
    }

    /// Merges node `from` into node `to`, both in the same locus.
    ///
    /// `to` survives with the hull of both intervals and the sum of both
    /// evidence counts. Edges of `from` are moved onto `to`, counts of
    /// shared neighbours are summed and an edge between the two nodes
    /// becomes a self-edge of `to`.
    ///
    /// # Panics
    ///
    /// If the nodes are equal, not live, or owned by different loci.
    pub(crate) fn merge_node(
        &mut self,
        from: NodeKey,
        to: NodeKey,
    ) {
        assert_ne!(from, to, "Cannot merge a node with itself");
        let from_locus = self.locus_of(from).expect("Merged node is not live");
        let to_interval = *self.nodes[to].interval();
        let locus_index = self
            .index
            .remove(&to_interval, to)
            .expect("Merge target missing from the interval index");
        assert_eq!(
            from_locus, locus_index,
            "Merged nodes belong to different loci"
        );
        let from_node = self
            .remove_node(from)
            .expect("Merged node is not live");
        trace!(
            "Merging node {} into {} (locus {})",
            from_node.interval(),
            to_interval,
            locus_index
        );

        for (target, count) in from_node.edges() {
            let target = *target;
            if target == from {
                self.nodes[to].add_edge_count(to, *count);
            }
            else if target == to {
                let back = self.nodes[to].remove_edge(&from).unwrap_or(0);
                self.nodes[to].add_edge_count(to, count.saturating_add(back));
            }
            else {
                let back = self.nodes[target].remove_edge(&from).unwrap_or(0);
                self.nodes[target].add_edge_count(to, back);
                self.nodes[to].add_edge_count(target, *count);
            }
        }

        let merged_interval = to_interval.hull(from_node.interval());
        let node = &mut self.nodes[to];
        node.set_interval(merged_interval);
        node.add_count(from_node.count());
        self.index.insert(merged_interval, to, locus_index);
    }
}
