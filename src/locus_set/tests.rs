use itertools::Itertools;

use super::*;
use crate::data_structs::coords::GenomeInterval;
use crate::data_structs::locus::Locus;

fn iv(
    tid: u32,
    start: u32,
    end: u32,
) -> GenomeInterval {
    GenomeInterval::new(tid, start, end)
}

fn single(
    interval: GenomeInterval,
    count: u32,
) -> Locus {
    let mut locus = Locus::new();
    locus.add_node(interval, count);
    locus
}

/// Two linked nodes, `a -> b` carrying `forward` and `b -> a` carrying
/// `backward`.
fn pair(
    a: GenomeInterval,
    b: GenomeInterval,
    forward: u32,
    backward: u32,
) -> Locus {
    let mut locus = Locus::new();
    let first = locus.add_node(a, 1);
    let second = locus.add_node(b, 1);
    locus.link_nodes(first, second, forward, backward);
    locus
}

fn test_set() -> LocusSet {
    LocusSet::with_config(LocusSetConfig::default().with_check_interval(Some(1)))
}

fn intervals(locus: &Locus) -> Vec<GenomeInterval> {
    locus.nodes().map(|node| *node.interval()).collect()
}

#[test]
fn test_merge_disjoint_loci() {
    let mut set = test_set();
    set.merge(pair(iv(0, 100, 200), iv(0, 1000, 1100), 1, 0));
    set.merge(pair(iv(0, 300, 400), iv(1, 100, 200), 2, 2));

    assert_eq!(set.len(), 2);
    assert_eq!(set.slot_count(), 2);
    assert_eq!(set.node_count(), 4);
    assert_eq!(set.index().len(), 4);
    assert_eq!(set.merge_count(), 2);
    assert_eq!(set.empty_slots().count(), 0);
    assert!(set.verify().is_ok());

    let first = set.export_locus(0).unwrap();
    assert_eq!(intervals(&first), vec![iv(0, 100, 200), iv(0, 1000, 1100)]);
    assert_eq!(first.node(0).unwrap().edge_count(&1), Some(1));
    assert_eq!(first.node(1).unwrap().edge_count(&0), Some(0));
}

#[test]
fn test_merge_empty_locus_is_noop() {
    let mut set = test_set();
    set.merge(Locus::new());
    assert_eq!(set.slot_count(), 0);
    assert_eq!(set.merge_count(), 0);
    assert!(set.is_empty());
}

#[test]
fn test_merge_duplicate_collapses() {
    let mut set = test_set();
    let locus = pair(iv(0, 100, 200), iv(0, 1000, 1100), 1, 0);
    set.merge(locus.clone());
    set.merge(locus);

    assert_eq!(set.len(), 1);
    assert_eq!(set.slot_count(), 2);
    assert_eq!(set.empty_slots().collect_vec(), vec![0]);
    assert_eq!(set.node_count(), 2);
    assert!(set.get(0).unwrap().is_empty());

    let merged = set.export_locus(1).unwrap();
    assert_eq!(intervals(&merged), vec![iv(0, 100, 200), iv(0, 1000, 1100)]);
    assert_eq!(merged.node(0).unwrap().count(), 2);
    assert_eq!(merged.node(1).unwrap().count(), 2);
    assert_eq!(merged.node(0).unwrap().edge_count(&1), Some(2));
    assert_eq!(merged.node(1).unwrap().edge_count(&0), Some(0));
    assert!(merged.validate().is_ok());
}

#[test]
fn test_cascade_fuses_bridged_loci() {
    let mut set = test_set();
    set.merge(single(iv(0, 100, 200), 1));
    set.merge(single(iv(1, 100, 200), 1));
    set.merge(single(iv(0, 300, 400), 1));

    // one node overlapping the first and third locus
    set.merge(single(iv(0, 150, 350), 1));

    assert_eq!(set.len(), 2);
    assert_eq!(set.slot_count(), 4);
    assert_eq!(set.empty_slots().collect_vec(), vec![0, 2]);

    let untouched = set.export_locus(1).unwrap();
    assert_eq!(intervals(&untouched), vec![iv(1, 100, 200)]);

    let fused = set.export_locus(3).unwrap();
    assert_eq!(intervals(&fused), vec![iv(0, 100, 400)]);
    assert_eq!(fused.total_count(), 3);
}

#[test]
fn test_cascade_keeps_bridge_structure() {
    let mut set = test_set();
    set.merge(single(iv(0, 100, 200), 1));
    set.merge(single(iv(0, 1000, 1100), 1));
    set.merge(single(iv(0, 400, 500), 1));

    set.merge(pair(iv(0, 150, 250), iv(0, 350, 450), 1, 1));

    assert_eq!(set.len(), 2);
    let fused = set.export_locus(3).unwrap();
    assert_eq!(intervals(&fused), vec![iv(0, 100, 250), iv(0, 350, 500)]);
    assert_eq!(fused.node(0).unwrap().count(), 2);
    assert_eq!(fused.node(1).unwrap().count(), 2);
    assert_eq!(fused.node(0).unwrap().edge_count(&1), Some(1));
    assert_eq!(fused.node(1).unwrap().edge_count(&0), Some(1));
    assert!(set.verify().is_ok());
}

#[test]
fn test_edge_between_merged_nodes_becomes_self_edge() {
    let mut set = test_set();
    let mut locus = Locus::new();
    let p = locus.add_node(iv(0, 0, 100), 4);
    let q = locus.add_node(iv(0, 200, 300), 5);
    locus.link_nodes(p, q, 2, 1);
    set.merge(locus);

    set.merge(single(iv(0, 50, 250), 1));

    assert_eq!(set.len(), 1);
    assert_eq!(set.node_count(), 1);
    let merged = set.export_locus(1).unwrap();
    let node = merged.node(0).unwrap();
    assert_eq!(*node.interval(), iv(0, 0, 300));
    assert_eq!(node.count(), 10);
    assert_eq!(node.edge_count(&0), Some(3));
    assert_eq!(node.degree(), 1);
    assert!(merged.validate().is_ok());
}

#[test]
fn test_shared_neighbour_counts_are_summed() {
    let mut set = test_set();
    set.merge(pair(iv(0, 0, 100), iv(1, 0, 100), 2, 1));
    set.merge(pair(iv(0, 50, 150), iv(1, 0, 100), 3, 4));

    assert_eq!(set.len(), 1);
    assert_eq!(set.node_count(), 2);
    let merged = set.export_locus(1).unwrap();
    assert_eq!(intervals(&merged), vec![iv(0, 0, 150), iv(1, 0, 100)]);
    assert_eq!(merged.node(0).unwrap().edge_count(&1), Some(5));
    assert_eq!(merged.node(1).unwrap().edge_count(&0), Some(5));
    assert_eq!(merged.total_count(), 4);
}

#[test]
fn test_overlap_inside_incoming_locus() {
    let mut set = test_set();
    set.merge(pair(iv(0, 0, 100), iv(0, 50, 150), 1, 1));

    assert_eq!(set.len(), 1);
    let merged = set.export_locus(0).unwrap();
    assert_eq!(merged.len(), 1);
    let node = merged.node(0).unwrap();
    assert_eq!(*node.interval(), iv(0, 0, 150));
    assert_eq!(node.edge_count(&0), Some(2));
}

#[test]
fn test_adjacent_intervals_do_not_merge() {
    let mut set = test_set();
    set.merge(single(iv(0, 0, 100), 1));
    set.merge(single(iv(0, 100, 200), 1));
    assert_eq!(set.len(), 2);
    assert_eq!(set.node_count(), 2);
}

#[test]
fn test_retired_slot_is_reused() {
    let mut set = test_set();
    let locus = pair(iv(0, 100, 200), iv(0, 1000, 1100), 1, 0);
    set.merge(locus.clone());
    set.merge(locus);
    assert_eq!(set.empty_slots().collect_vec(), vec![0]);

    set.merge(single(iv(2, 0, 10), 1));
    assert_eq!(set.slot_count(), 2);
    assert_eq!(set.empty_slots().count(), 0);
    let reused = set.export_locus(0).unwrap();
    assert_eq!(intervals(&reused), vec![iv(2, 0, 10)]);
}

#[test]
fn test_locus_ref_and_lookup() {
    let mut set = test_set();
    set.merge(pair(iv(0, 100, 200), iv(3, 0, 50), 1, 1));
    let locus = set.get(0).unwrap();
    assert_eq!(locus.index(), 0);
    assert_eq!(locus.len(), 2);
    assert_eq!(locus.edge_count(), 2);
    for key in locus.keys() {
        assert!(locus.contains(key));
        assert_eq!(set.locus_of(key), Some(0));
        assert!(set.node(key).is_some());
    }
    assert!(set.get(1).is_none());
    assert!(set.export_locus(1).is_none());
}

#[test]
fn test_clear_resets_set() {
    let config = LocusSetConfig::default()
        .with_check_interval(Some(2))
        .with_verify_on_load(false);
    let mut set = LocusSet::with_config(config.clone());
    set.merge(single(iv(0, 0, 10), 1));
    set.merge(single(iv(0, 5, 20), 1));
    set.clear();

    assert!(set.is_empty());
    assert_eq!(set.slot_count(), 0);
    assert_eq!(set.node_count(), 0);
    assert_eq!(set.merge_count(), 0);
    assert!(set.index().is_empty());
    assert_eq!(set.config(), &config);

    set.merge(single(iv(0, 0, 10), 1));
    assert_eq!(set.slot_count(), 1);
    assert_eq!(set.len(), 1);
    assert!(set.verify().is_ok());
}

#[test]
fn test_merge_set_and_into_loci() {
    let mut first = test_set();
    first.merge(single(iv(0, 0, 100), 1));

    let mut second = test_set();
    second.merge(single(iv(0, 50, 150), 2));
    second.merge(single(iv(1, 0, 100), 1));

    first.merge_set(second);
    assert_eq!(first.len(), 2);
    assert!(first.verify().is_ok());

    // the second locus lands in the slot retired by the first merge
    let loci = first.into_loci().collect_vec();
    assert_eq!(loci.len(), 2);
    assert_eq!(intervals(&loci[0]), vec![iv(1, 0, 100)]);
    assert_eq!(intervals(&loci[1]), vec![iv(0, 0, 150)]);
    assert_eq!(loci[1].total_count(), 3);
}

#[test]
#[should_panic(expected = "Cannot merge malformed locus")]
fn test_merge_disconnected_locus_panics() {
    let mut locus = Locus::new();
    locus.add_node(iv(0, 0, 10), 1);
    locus.add_node(iv(0, 20, 30), 1);
    LocusSet::new().merge(locus);
}

#[test]
fn test_verify_detects_bad_empty_slot() {
    let mut set = test_set();
    set.merge(single(iv(0, 0, 10), 1));
    set.empty_loci.insert(0);
    assert_eq!(
        set.verify(),
        Err(StateViolation::InvalidEmptySlot { locus: 0 })
    );
}

#[test]
fn test_verify_detects_unindexed_node() {
    let mut set = test_set();
    set.merge(single(iv(0, 0, 10), 1));
    set.index.clear();
    let violation = set.verify().unwrap_err();
    assert_eq!(
        violation,
        StateViolation::IndexMismatch {
            interval: iv(0, 0, 10),
            locus:    0,
            indexed:  None,
        }
    );
    assert_eq!(violation.invariant(), "index/storage bijection");
    assert!(violation.to_string().contains("is not indexed"));
}

#[test]
#[should_panic(expected = "Locus set consistency check failed")]
fn test_check_state_panics_on_corruption() {
    let mut set = test_set();
    set.merge(single(iv(0, 0, 10), 1));
    set.loci.push(Default::default());
    set.check_state();
}

#[test]
fn test_reconstruct_index_reports_overlap() {
    let mut set = test_set();
    set.merge(single(iv(0, 0, 100), 1));
    set.merge(single(iv(0, 200, 300), 1));
    let key = set.get(1).unwrap().keys().next().unwrap();
    set.nodes[key].set_interval(iv(0, 50, 300));

    assert_eq!(
        set.reconstruct_index(),
        Err(StateViolation::Overlap {
            first:  iv(0, 0, 100),
            second: iv(0, 50, 300),
        })
    );
    assert_eq!(set.index().len(), 2);
    assert!(matches!(
        set.verify(),
        Err(StateViolation::Overlap { .. })
    ));
}

#[test]
fn test_reconstruct_index_restores_lookups() {
    let mut set = test_set();
    set.merge(pair(iv(0, 0, 100), iv(0, 500, 600), 1, 1));
    set.index.clear();
    assert!(set.verify().is_err());
    assert!(set.reconstruct_index().is_ok());
    assert!(set.verify().is_ok());
}

#[test]
fn test_dump_output() {
    let mut set = test_set();
    let locus = pair(iv(0, 100, 200), iv(0, 1000, 1100), 1, 0);
    set.merge(locus.clone());
    set.merge(locus);

    let mut out = Vec::new();
    set.dump(&mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    let lines = text.lines().collect_vec();
    assert_eq!(lines[0], "LocusSet slots=2 live=1 nodes=2");
    assert_eq!(lines[1], "EmptySlots: [0]");
    assert_eq!(lines[2], "Locus 0 (empty)");
    assert_eq!(lines[3], "Locus 1 nodes=2 edges=2");
    assert!(lines[4].contains("0:100-200 count=2"));
    assert!(lines[5].contains("0:1000-1100 count=2"));

    let mut out = Vec::new();
    set.dump_index(&mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.starts_with("IntervalIndex entries=2"));
}

#[test]
fn test_stats() {
    let mut set = test_set();
    let locus = pair(iv(0, 100, 200), iv(0, 1000, 1100), 1, 0);
    set.merge(locus.clone());
    set.merge(locus);
    set.merge(pair(iv(1, 0, 10), iv(1, 5, 20), 1, 1));

    let stats = set.stats();
    assert_eq!(stats.slots, 2);
    assert_eq!(stats.live_loci, 2);
    assert_eq!(stats.empty_slots, 0);
    assert_eq!(stats.nodes, 3);
    assert_eq!(stats.edges, 3);
    assert_eq!(stats.self_edges, 1);
    assert_eq!(stats.node_evidence, 6);
    assert_eq!(stats.edge_evidence, 4);
    assert_eq!(stats.max_locus_nodes, 2);
    assert_eq!(stats.nodes_per_contig.get(&0), Some(&2));
    assert_eq!(stats.nodes_per_contig.get(&1), Some(&1));

    let text = stats.to_string();
    assert!(text.contains("live_loci"));
    assert!(text.contains("nodes[tid=1]"));
}

#[test]
fn test_build_partitioned_matches_sequential() {
    let partitions = vec![
        vec![single(iv(0, 0, 100), 1), single(iv(0, 200, 300), 1)],
        vec![],
        vec![single(iv(0, 50, 250), 1), single(iv(1, 0, 10), 1)],
    ];
    let mut sequential = test_set();
    for locus in partitions.iter().flatten() {
        sequential.merge(locus.clone());
    }

    let built = build_partitioned(partitions, sequential.config());
    assert!(built.verify().is_ok());
    let mut expected = sequential.into_loci().map(|l| intervals(&l)).collect_vec();
    let mut actual = built.into_loci().map(|l| intervals(&l)).collect_vec();
    expected.sort();
    actual.sort();
    assert_eq!(actual, expected);
    assert_eq!(actual, vec![vec![iv(0, 0, 300)], vec![iv(1, 0, 10)]]);
}

#[test]
fn test_build_partitioned_without_partitions() {
    let set = build_partitioned(Vec::new(), &LocusSetConfig::default());
    assert!(set.is_empty());
}
