use std::cmp::{max, min};
use std::fmt::Display;
use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::data_structs::typedef::{PosType, TidType};

/// Half-open genomic range `[start, end)` on the contig `tid`.
///
/// Intervals are totally ordered by contig, then start, then end. Note that
/// overlap is a weaker relation than equality and is not transitive.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct GenomeInterval {
    tid:   TidType,
    start: PosType,
    end:   PosType,
}

impl GenomeInterval {
    /// Creates a new `GenomeInterval`.
    ///
    /// # Panics
    ///
    /// If the range is empty (`start >= end`).
    pub fn new(
        tid: TidType,
        start: PosType,
        end: PosType,
    ) -> Self {
        assert!(
            start < end,
            "Interval start must be less than end ({}:{}-{})",
            tid,
            start,
            end
        );
        Self { tid, start, end }
    }

    /// Zero-length interval at `pos`. Only valid as a search bound: it sorts
    /// before every real interval starting at `pos`.
    pub(crate) fn probe(
        tid: TidType,
        pos: PosType,
    ) -> Self {
        Self {
            tid,
            start: pos,
            end: pos,
        }
    }

    /// Returns the contig identifier.
    pub fn tid(&self) -> TidType {
        self.tid
    }

    /// Returns the start position (inclusive).
    pub fn start(&self) -> PosType {
        self.start
    }

    /// Returns the end position (exclusive).
    pub fn end(&self) -> PosType {
        self.end
    }

    pub fn len(&self) -> PosType {
        self.end - self.start
    }

    /// Always false, empty intervals cannot be constructed.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn range(&self) -> Range<PosType> {
        self.start..self.end
    }

    /// Checks whether both intervals share at least one position.
    pub fn overlaps(
        &self,
        other: &Self,
    ) -> bool {
        self.tid == other.tid && self.start < other.end && other.start < self.end
    }

    pub fn contains_pos(
        &self,
        pos: PosType,
    ) -> bool {
        self.start <= pos && pos < self.end
    }

    /// Smallest interval covering both `self` and `other`.
    ///
    /// # Panics
    ///
    /// If the intervals lie on different contigs.
    pub fn hull(
        &self,
        other: &Self,
    ) -> Self {
        assert_eq!(
            self.tid, other.tid,
            "Cannot take the hull of intervals on different contigs"
        );
        Self {
            tid:   self.tid,
            start: min(self.start, other.start),
            end:   max(self.end, other.end),
        }
    }
}

impl Display for GenomeInterval {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(f, "{}:{}-{}", self.tid, self.start, self.end)
    }
}

impl From<(TidType, Range<PosType>)> for GenomeInterval {
    fn from(value: (TidType, Range<PosType>)) -> Self {
        Self::new(value.0, value.1.start, value.1.end)
    }
}
