use slotmap::new_key_type;

/// Reference sequence (contig) identifier.
pub type TidType = u32;
/// Zero-based genome coordinate.
pub type PosType = u32;
/// Evidence count carried by nodes and edges.
pub type CountType = u32;
/// Position of a node within a standalone [`Locus`](super::locus::Locus).
pub type NodeIndex = usize;
/// Storage slot of a locus within a [`LocusSet`](crate::LocusSet).
pub type LocusIndex = usize;

new_key_type! {
    /// Generation-checked handle of a node stored in a
    /// [`LocusSet`](crate::LocusSet).
    pub struct NodeKey;
}
