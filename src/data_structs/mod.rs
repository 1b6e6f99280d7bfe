//! Core data structures of the `svlocus` crate.
//!
//! - [`coords`]: genome coordinates, namely [`GenomeInterval`].
//! - [`locus`]: standalone locus graphs ([`Locus`]) and their nodes
//!   ([`LocusNode`]).
//! - [`typedef`]: type aliases for positions, counts and node handles.
//!
//! [`GenomeInterval`]: coords::GenomeInterval
//! [`Locus`]: locus::Locus
//! [`LocusNode`]: locus::LocusNode

pub mod coords;
pub mod locus;
pub mod typedef;
