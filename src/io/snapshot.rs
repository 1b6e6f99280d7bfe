use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, ensure, Context};
use itertools::Itertools;
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::data_structs::locus::Locus;
use crate::data_structs::typedef::LocusIndex;
use crate::locus_set::{LocusSet, LocusSetConfig};

/// Tag opening every snapshot.
pub const SNAPSHOT_MAGIC: [u8; 8] = *b"SVLOCSET";
/// Current snapshot format version. Snapshots with any other version are
/// rejected.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Fixed-layout prefix of a snapshot, decoded before the body so that
/// foreign or newer files are rejected without being interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotHeader {
    pub magic:   [u8; 8],
    pub version: u32,
}

impl Default for SnapshotHeader {
    fn default() -> Self {
        Self {
            magic:   SNAPSHOT_MAGIC,
            version: SNAPSHOT_VERSION,
        }
    }
}

/// Every storage slot in order, retired ones as empty loci.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SnapshotBody {
    loci:       Vec<Locus>,
    empty_loci: Vec<LocusIndex>,
}

fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

fn decode_snapshot<R: Read>(
    reader: &mut R,
    config: LocusSetConfig,
) -> anyhow::Result<LocusSet> {
    let bincode_config = bincode::config::standard();
    let header: SnapshotHeader =
        bincode::serde::decode_from_std_read(reader, bincode_config)
            .context("Failed to read snapshot header")?;
    ensure!(
        header.magic == SNAPSHOT_MAGIC,
        "Not a locus set snapshot (bad magic tag)"
    );
    ensure!(
        header.version == SNAPSHOT_VERSION,
        "Unsupported snapshot version {} (expected {})",
        header.version,
        SNAPSHOT_VERSION
    );
    let body: SnapshotBody =
        bincode::serde::decode_from_std_read(reader, bincode_config)
            .context("Failed to decode snapshot body")?;

    let mut set = LocusSet::with_config(config);
    for (slot, locus) in body.loci.iter().enumerate() {
        // intervals are deserialized without going through the constructor
        for node in locus.nodes() {
            let interval = node.interval();
            ensure!(
                interval.start() < interval.end(),
                "Empty interval {} in slot {}",
                interval,
                slot
            );
        }
        if !locus.is_empty() {
            locus
                .validate()
                .with_context(|| format!("Malformed locus in slot {}", slot))?;
        }
        set.restore_locus(locus);
    }

    let recorded = body.empty_loci.into_iter().sorted().dedup().collect_vec();
    let expected = body
        .loci
        .iter()
        .positions(|locus| locus.is_empty())
        .collect_vec();
    ensure!(
        recorded == expected,
        "Snapshot empty slot list {:?} does not match empty slots {:?}",
        recorded,
        expected
    );
    set.empty_loci = recorded.into_iter().collect();

    set.reconstruct_index()
        .context("Snapshot contains overlapping nodes")?;
    if set.config.verify_on_load {
        set.verify()
            .context("Snapshot failed the consistency check")?;
    }
    Ok(set)
}

impl LocusSet {
    /// Serializes the whole set into `writer`.
    pub fn write_to<W: Write>(
        &self,
        writer: &mut W,
    ) -> anyhow::Result<()> {
        let bincode_config = bincode::config::standard();
        let body = SnapshotBody {
            loci:       self.iter().map(|locus| locus.to_locus()).collect(),
            empty_loci: self.empty_slots().collect(),
        };
        bincode::serde::encode_into_std_write(
            SnapshotHeader::default(),
            writer,
            bincode_config,
        )?;
        bincode::serde::encode_into_std_write(&body, writer, bincode_config)?;
        Ok(())
    }

    /// Replaces the content of the set with a snapshot read from `reader`.
    /// The configuration is kept.
    ///
    /// On error the set is left cleared.
    pub fn read_from<R: Read>(
        &mut self,
        reader: &mut R,
    ) -> anyhow::Result<()> {
        match decode_snapshot(reader, self.config.clone()) {
            Ok(set) => {
                *self = set;
                Ok(())
            },
            Err(e) => {
                warn!("Snapshot rejected, locus set cleared: {:#}", e);
                self.clear();
                Err(e)
            },
        }
    }

    /// Writes a snapshot of the set to `path`.
    ///
    /// The snapshot is written to a temporary file next to `path` first and
    /// renamed into place once complete.
    pub fn save<P: AsRef<Path>>(
        &self,
        path: P,
    ) -> anyhow::Result<()> {
        let path = path.as_ref();
        let temp_path = temp_sibling(path);
        if let Err(e) = self.write_file(&temp_path) {
            let _ = fs::remove_file(&temp_path);
            return Err(e);
        }
        fs::rename(&temp_path, path).with_context(|| {
            format!("Failed to move snapshot into place at {}", path.display())
        })?;
        info!(
            "Saved locus set ({} slots, {} nodes) to {}",
            self.slot_count(),
            self.node_count(),
            path.display()
        );
        Ok(())
    }

    /// Replaces the content of the set with the snapshot at `path`.
    ///
    /// On error the set is left cleared.
    pub fn load<P: AsRef<Path>>(
        &mut self,
        path: P,
    ) -> anyhow::Result<()> {
        let path = path.as_ref();
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) => {
                self.clear();
                return Err(anyhow!(e)
                    .context(format!("Failed to open snapshot {}", path.display())));
            },
        };
        self.read_from(&mut BufReader::new(file))
            .with_context(|| format!("Failed to load snapshot {}", path.display()))?;
        info!(
            "Loaded locus set ({} slots, {} nodes) from {}",
            self.slot_count(),
            self.node_count(),
            path.display()
        );
        Ok(())
    }

    /// Creates a set with the given configuration from the snapshot at
    /// `path`.
    pub fn from_file<P: AsRef<Path>>(
        path: P,
        config: LocusSetConfig,
    ) -> anyhow::Result<Self> {
        let mut set = Self::with_config(config);
        set.load(path)?;
        Ok(set)
    }

    fn write_file(
        &self,
        path: &Path,
    ) -> anyhow::Result<()> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        self.write_to(&mut writer)?;
        writer.flush()?;
        Ok(())
    }
}
