use std::fmt::Display;

use hashbrown::HashMap;
use log::trace;

use super::LocusSet;
use crate::data_structs::coords::GenomeInterval;
use crate::data_structs::typedef::{LocusIndex, PosType, TidType};
use crate::utils::reachable_count;

/// A broken structural invariant of a locus or locus set.
///
/// `locus` is the offending storage slot, or `None` for a standalone
/// [`Locus`](crate::Locus).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateViolation {
    /// A slot lists a node handle that is not in the node arena.
    MissingNode { locus: LocusIndex },
    /// A stored node is not indexed, or indexed under another slot.
    IndexMismatch {
        interval: GenomeInterval,
        locus:    LocusIndex,
        indexed:  Option<LocusIndex>,
    },
    /// Node arena, slots and index disagree on the number of live nodes.
    NodeCountMismatch {
        stored:  usize,
        arena:   usize,
        indexed: usize,
    },
    /// Two live nodes overlap.
    Overlap {
        first:  GenomeInterval,
        second: GenomeInterval,
    },
    /// An edge points outside of its locus.
    DanglingEdge {
        locus: Option<LocusIndex>,
        from:  GenomeInterval,
    },
    /// An edge has no counterpart in the opposite direction.
    AsymmetricEdge {
        locus: Option<LocusIndex>,
        from:  GenomeInterval,
        to:    GenomeInterval,
    },
    /// A locus is split into several components.
    Disconnected {
        locus: Option<LocusIndex>,
        nodes: usize,
    },
    /// A slot without nodes is not recorded as empty.
    UnrecordedEmptySlot { locus: LocusIndex },
    /// A slot recorded as empty holds nodes or does not exist.
    InvalidEmptySlot { locus: LocusIndex },
}

impl StateViolation {
    /// Name of the invariant this violation breaks.
    pub fn invariant(&self) -> &'static str {
        match self {
            StateViolation::MissingNode { .. }
            | StateViolation::IndexMismatch { .. }
            | StateViolation::NodeCountMismatch { .. } => "index/storage bijection",
            StateViolation::Overlap { .. } => "no overlapping nodes",
            StateViolation::DanglingEdge { .. }
            | StateViolation::AsymmetricEdge { .. }
            | StateViolation::Disconnected { .. } => "locus connectivity",
            StateViolation::UnrecordedEmptySlot { .. }
            | StateViolation::InvalidEmptySlot { .. } => "empty slot bookkeeping",
        }
    }
}

fn fmt_locus(locus: &Option<LocusIndex>) -> String {
    match locus {
        Some(index) => format!("locus {}", index),
        None => "standalone locus".to_string(),
    }
}

impl Display for StateViolation {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(f, "[{}] ", self.invariant())?;
        match self {
            StateViolation::MissingNode { locus } => {
                write!(f, "locus {} references a node missing from storage", locus)
            },
            StateViolation::IndexMismatch {
                interval,
                locus,
                indexed,
            } => {
                match indexed {
                    Some(indexed) => {
                        write!(
                            f,
                            "node {} of locus {} is indexed under locus {}",
                            interval, locus, indexed
                        )
                    },
                    None => {
                        write!(f, "node {} of locus {} is not indexed", interval, locus)
                    },
                }
            },
            StateViolation::NodeCountMismatch {
                stored,
                arena,
                indexed,
            } => {
                write!(
                    f,
                    "{} nodes in loci, {} in storage, {} in index",
                    stored, arena, indexed
                )
            },
            StateViolation::Overlap { first, second } => {
                write!(f, "nodes {} and {} overlap", first, second)
            },
            StateViolation::DanglingEdge { locus, from } => {
                write!(
                    f,
                    "node {} of {} has an edge leaving the locus",
                    from,
                    fmt_locus(locus)
                )
            },
            StateViolation::AsymmetricEdge { locus, from, to } => {
                write!(
                    f,
                    "edge {} -> {} of {} has no reverse edge",
                    from,
                    to,
                    fmt_locus(locus)
                )
            },
            StateViolation::Disconnected { locus, nodes } => {
                write!(
                    f,
                    "{} with {} nodes is not connected",
                    fmt_locus(locus),
                    nodes
                )
            },
            StateViolation::UnrecordedEmptySlot { locus } => {
                write!(f, "locus {} is empty but not marked as empty", locus)
            },
            StateViolation::InvalidEmptySlot { locus } => {
                write!(f, "locus {} is marked as empty but is not", locus)
            },
        }
    }
}

impl std::error::Error for StateViolation {}

impl LocusSet {
    /// Checks every structural invariant of the set, in order: index/storage
    /// bijection, absence of overlapping nodes, connectivity of every locus
    /// and empty slot bookkeeping.
    pub fn verify(&self) -> Result<(), StateViolation> {
        self.verify_index()?;
        self.verify_no_overlap()?;
        self.verify_connectivity()?;
        self.verify_empty_slots()?;
        trace!(
            "Locus set state verified: {} slots, {} nodes",
            self.slot_count(),
            self.node_count()
        );
        Ok(())
    }

    /// Same as [`verify`](Self::verify), but a violation is fatal.
    ///
    /// # Panics
    ///
    /// If any invariant does not hold.
    pub fn check_state(&self) {
        if let Err(violation) = self.verify() {
            panic!("Locus set consistency check failed: {}", violation);
        }
    }

    /// Rebuilds the interval index from the stored loci.
    ///
    /// Fails if two live nodes overlap; the index is left rebuilt.
    pub fn reconstruct_index(&mut self) -> Result<(), StateViolation> {
        self.index.clear();
        for (locus_index, keys) in self.loci.iter().enumerate() {
            for key in keys {
                let node = self
                    .nodes
                    .get(*key)
                    .ok_or(StateViolation::MissingNode { locus: locus_index })?;
                self.index.insert(*node.interval(), *key, locus_index);
            }
        }
        self.verify_no_overlap()
    }

    fn verify_index(&self) -> Result<(), StateViolation> {
        let mut stored = 0;
        for (locus_index, keys) in self.loci.iter().enumerate() {
            for key in keys {
                let node = self
                    .nodes
                    .get(*key)
                    .ok_or(StateViolation::MissingNode { locus: locus_index })?;
                let indexed = self.index.get(node.interval(), *key);
                if indexed != Some(locus_index) {
                    return Err(StateViolation::IndexMismatch {
                        interval: *node.interval(),
                        locus: locus_index,
                        indexed,
                    });
                }
                stored += 1;
            }
        }
        if stored != self.nodes.len() || stored != self.index.len() {
            return Err(StateViolation::NodeCountMismatch {
                stored,
                arena: self.nodes.len(),
                indexed: self.index.len(),
            });
        }
        Ok(())
    }

    /// Index order sorts nodes by start, so a node overlaps an earlier one
    /// exactly when it starts before the furthest end seen so far.
    fn verify_no_overlap(&self) -> Result<(), StateViolation> {
        let mut furthest: Option<(TidType, PosType, &GenomeInterval)> = None;
        for (interval, _, _) in self.index.iter() {
            if let Some((tid, end, previous)) = furthest {
                if tid == interval.tid() && interval.start() < end {
                    return Err(StateViolation::Overlap {
                        first:  *previous,
                        second: *interval,
                    });
                }
            }
            let extends = match furthest {
                Some((tid, end, _)) => tid != interval.tid() || interval.end() > end,
                None => true,
            };
            if extends {
                furthest = Some((interval.tid(), interval.end(), interval));
            }
        }
        Ok(())
    }

    fn verify_connectivity(&self) -> Result<(), StateViolation> {
        let owner: HashMap<_, _> = self
            .loci
            .iter()
            .enumerate()
            .flat_map(|(locus_index, keys)| keys.iter().map(move |k| (*k, locus_index)))
            .collect();

        for (locus_index, keys) in self.loci.iter().enumerate() {
            for key in keys {
                let node = &self.nodes[*key];
                for to in node.edges().keys() {
                    if owner.get(to) != Some(&locus_index) {
                        return Err(StateViolation::DanglingEdge {
                            locus: Some(locus_index),
                            from:  *node.interval(),
                        });
                    }
                    let target = &self.nodes[*to];
                    if !target.has_edge(key) {
                        return Err(StateViolation::AsymmetricEdge {
                            locus: Some(locus_index),
                            from:  *node.interval(),
                            to:    *target.interval(),
                        });
                    }
                }
            }

            let Some(first) = keys.first() else {
                continue;
            };
            let nodes = &self.nodes;
            let reached =
                reachable_count(*first, move |k| nodes[k].edges().keys().copied());
            if reached != keys.len() {
                return Err(StateViolation::Disconnected {
                    locus: Some(locus_index),
                    nodes: keys.len(),
                });
            }
        }
        Ok(())
    }

    fn verify_empty_slots(&self) -> Result<(), StateViolation> {
        for locus_index in self.empty_loci.iter() {
            match self.loci.get(*locus_index) {
                Some(keys) if keys.is_empty() => {},
                _ => {
                    return Err(StateViolation::InvalidEmptySlot {
                        locus: *locus_index,
                    })
                },
            }
        }
        for (locus_index, keys) in self.loci.iter().enumerate() {
            if keys.is_empty() && !self.empty_loci.contains(&locus_index) {
                return Err(StateViolation::UnrecordedEmptySlot { locus: locus_index });
            }
        }
        Ok(())
    }
}
