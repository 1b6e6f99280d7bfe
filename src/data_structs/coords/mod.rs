//! Genome coordinates used by locus nodes.
//!
//! [`GenomeInterval`] is a half-open range on a numbered contig. It is the
//! only coordinate type the merge engine relies on: a strict total order for
//! the interval index and an overlap test for node merging.

mod interval;

pub use interval::GenomeInterval;
