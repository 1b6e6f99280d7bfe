use log::info;
use rayon::prelude::*;

use super::{LocusSet, LocusSetConfig};
use crate::data_structs::locus::Locus;
use crate::utils::{n_threads, THREAD_POOL};

/// Builds one locus set per partition on the shared thread pool, then folds
/// them, in partition order, into the set of the first partition.
///
/// Partitions share no state while they are built, the fold goes through
/// [`LocusSet::merge_set`]. An empty partition list yields an empty set.
///
/// # Panics
///
/// If the combined set fails [`LocusSet::check_state`].
pub fn build_partitioned(
    partitions: Vec<Vec<Locus>>,
    config: &LocusSetConfig,
) -> LocusSet {
    let n_partitions = partitions.len();
    info!(
        "Building locus sets for {} partitions on {} threads",
        n_partitions,
        n_threads()
    );

    let sets: Vec<LocusSet> = THREAD_POOL.install(|| {
        partitions
            .into_par_iter()
            .map(|loci| {
                let mut set = LocusSet::with_config(config.clone());
                for locus in loci {
                    set.merge(locus);
                }
                set
            })
            .collect()
    });

    let mut sets = sets.into_iter();
    let mut result = sets
        .next()
        .unwrap_or_else(|| LocusSet::with_config(config.clone()));
    for set in sets {
        result.merge_set(set);
    }
    result.check_state();
    info!(
        "Partitioned build finished: {} live loci, {} nodes",
        result.len(),
        result.node_count()
    );
    result
}
