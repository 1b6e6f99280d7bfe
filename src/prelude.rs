pub use crate::data_structs::coords::GenomeInterval;
pub use crate::data_structs::locus::{Locus, LocusNode};
pub use crate::data_structs::typedef::*;
pub use crate::io::{SnapshotHeader, SNAPSHOT_MAGIC, SNAPSHOT_VERSION};
pub use crate::locus_set::{
    build_partitioned,
    IntervalIndex,
    LocusRef,
    LocusSet,
    LocusSetConfig,
    LocusSetStats,
    StateViolation,
    CHECK_INTERVAL_ENV,
};
