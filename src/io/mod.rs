//! Persistence of locus sets.
//!
//! A snapshot is a [`SnapshotHeader`] (magic tag and format version)
//! followed by every storage slot, retired ones included, and the list of
//! retired slots. Both parts are encoded with bincode's standard
//! configuration. The interval index is not stored, it is rebuilt on load.

mod snapshot;

pub use snapshot::{SnapshotHeader, SNAPSHOT_MAGIC, SNAPSHOT_VERSION};
