use std::io::Write;

use itertools::Itertools;

use super::LocusSet;

impl LocusSet {
    /// Writes a human readable rendering of every slot. The output format
    /// is meant for debugging and may change at any time.
    pub fn dump<W: Write>(
        &self,
        writer: &mut W,
    ) -> std::io::Result<()> {
        writeln!(
            writer,
            "LocusSet slots={} live={} nodes={}",
            self.slot_count(),
            self.len(),
            self.node_count()
        )?;
        writeln!(
            writer,
            "EmptySlots: [{}]",
            self.empty_slots().join(", ")
        )?;
        for locus in self.iter() {
            if locus.is_empty() {
                writeln!(writer, "Locus {} (empty)", locus.index())?;
                continue;
            }
            writeln!(
                writer,
                "Locus {} nodes={} edges={}",
                locus.index(),
                locus.len(),
                locus.edge_count()
            )?;
            for (key, node) in locus.nodes() {
                writeln!(writer, "\t{:?} {}", key, node)?;
            }
        }
        Ok(())
    }

    /// Writes the interval index only. Debugging output.
    pub fn dump_index<W: Write>(
        &self,
        writer: &mut W,
    ) -> std::io::Result<()> {
        self.index.dump(writer)
    }
}
