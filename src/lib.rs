//! Structural-variant locus graphs and the set that merges them.
//!
//! Candidate breakpoint evidence is gathered upstream into small locus
//! graphs ([`Locus`]). A [`LocusSet`] absorbs them one at a time, merging
//! overlapping nodes and fusing the loci they belong to, so that the set
//! always holds mutually non-overlapping, connected loci indexed by genome
//! position.
//!
//! ```
//! use svlocus::prelude::*;
//!
//! let mut locus = Locus::new();
//! let a = locus.add_node(GenomeInterval::new(0, 100, 200), 3);
//! let b = locus.add_node(GenomeInterval::new(1, 500, 600), 3);
//! locus.link_nodes(a, b, 3, 0);
//!
//! let mut set = LocusSet::new();
//! set.merge(locus);
//! assert_eq!(set.len(), 1);
//! assert!(set.verify().is_ok());
//! ```

pub mod data_structs;
pub mod io;
pub mod locus_set;
pub mod prelude;
pub mod utils;

pub use data_structs::coords::GenomeInterval;
pub use data_structs::locus::{Locus, LocusNode};
pub use data_structs::typedef::{LocusIndex, NodeIndex, NodeKey};
pub use locus_set::{
    build_partitioned,
    IntervalIndex,
    LocusRef,
    LocusSet,
    LocusSetConfig,
    LocusSetStats,
    StateViolation,
};
