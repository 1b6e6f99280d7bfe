//! Locus graphs.
//!
//! A locus is a small connected graph whose nodes are genomic regions
//! ([`LocusNode`]) and whose edges count the read evidence linking pairs of
//! regions. [`Locus`] is the standalone form produced upstream and fed into
//! a [`LocusSet`](crate::LocusSet).

mod graph;
mod node;

pub use graph::Locus;
pub use node::LocusNode;
