//! §4.J Driver loop: drains the cluster queue seeded by (C), running B
//! through I over each cluster and re-enqueueing any sub-clusters a later
//! stage reveals. Clusters are independent and each cluster's D-I span is
//! pure over its inputs, so ready clusters run on a `rayon` pool sized by
//! `PipelineConfig::jobs`; the queue itself is a `Mutex`-guarded FIFO shared
//! by every worker (§5 "Hidden mutation of the iteration queue").

use crate::config::PipelineConfig;
use crate::model::AlignmentRecord;
use crate::pipeline::cluster::{cluster, cluster_edges};
use crate::pipeline::orientation::resolve_orientation;
use crate::pipeline::recovery::recover_matches;
use crate::pipeline::reframe::reframe;
use crate::pipeline::repeat::filter_repeats;
use crate::pipeline::scaffold::{build_scaffolds, ScaffoldRow};
use crate::pipeline::split::{split, Split};
use crate::pipeline::verify::verify;
use crate::utils::intern::{ContigId, Interner};
use crate::utils::FastSet;
use std::collections::VecDeque;
use std::sync::{Condvar, Mutex};

/// A FIFO of not-yet-processed clusters, shared by every worker. `pop`
/// blocks until either an item is available or every worker is idle with an
/// empty queue, at which point the run is over and `pop` returns `None` to
/// all of them.
struct ClusterQueue {
    items: Mutex<VecDeque<Vec<ContigId>>>,
    in_flight: Mutex<usize>,
    activity: Condvar,
}

impl ClusterQueue {
    fn new(seed: Vec<Vec<ContigId>>) -> ClusterQueue {
        ClusterQueue {
            items: Mutex::new(seed.into_iter().collect()),
            in_flight: Mutex::new(0),
            activity: Condvar::new(),
        }
    }

    fn push(&self, item: Vec<ContigId>) {
        self.items.lock().unwrap().push_back(item);
        self.activity.notify_all();
    }

    fn pop(&self) -> Option<Vec<ContigId>> {
        let mut items = self.items.lock().unwrap();
        loop {
            if let Some(item) = items.pop_front() {
                *self.in_flight.lock().unwrap() += 1;
                return Some(item);
            }
            if *self.in_flight.lock().unwrap() == 0 {
                self.activity.notify_all();
                return None;
            }
            items = self.activity.wait(items).unwrap();
        }
    }

    /// Marks one previously-popped item as finished. Any `push` calls the
    /// item's processing made must happen before this.
    fn done(&self) {
        let mut in_flight = self.in_flight.lock().unwrap();
        *in_flight -= 1;
        if *in_flight == 0 {
            drop(in_flight);
            self.activity.notify_all();
        }
    }
}

/// Runs the full pipeline spine over one ingest table and returns one
/// scaffold (a row list) per cluster that survives to the end. With
/// `PipelineConfig::jobs == 1` this produces scaffolds in exactly the order
/// a single sequential pass over the FIFO would (ties broken by `cluster()`
/// and `clean_relations`'s own deterministic sorts); with more jobs the
/// *set* of scaffolds is identical but emission order may interleave.
pub fn run(records: &[AlignmentRecord], interner: &Interner, config: &PipelineConfig) -> Vec<Vec<ScaffoldRow>> {
    let split_result = split(records, config.nb_match_min, config.id_seq_min);
    let queue = ClusterQueue::new(cluster(&split_result.strict));
    let scaffolds: Mutex<Vec<Vec<ScaffoldRow>>> = Mutex::new(Vec::new());

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.jobs.get())
        .build()
        .expect("thread count is validated non-zero by PipelineConfig");

    pool.scope(|scope| {
        for _ in 0..config.jobs.get() {
            scope.spawn(|_| worker(&queue, &scaffolds, records, &split_result, interner, config));
        }
    });

    scaffolds.into_inner().unwrap()
}

fn worker(
    queue: &ClusterQueue,
    scaffolds: &Mutex<Vec<Vec<ScaffoldRow>>>,
    records: &[AlignmentRecord],
    split_result: &Split,
    interner: &Interner,
    config: &PipelineConfig,
) {
    while let Some(t_ids) = queue.pop() {
        if let Some(rows) = process_cluster(t_ids, queue, records, split_result, interner, config) {
            scaffolds.lock().unwrap().push(rows);
        }
        queue.done();
    }
}

/// Runs D-I over one cluster. Sub-clusters revealed by the repeat filter,
/// the verifier, or the scaffolder's own non-first chains are pushed back
/// onto `queue` rather than processed inline.
fn process_cluster(
    t_ids: Vec<ContigId>,
    queue: &ClusterQueue,
    records: &[AlignmentRecord],
    split_result: &Split,
    interner: &Interner,
    config: &PipelineConfig,
) -> Option<Vec<ScaffoldRow>> {
    let tset: FastSet<ContigId> = t_ids.into_iter().collect();

    let strict_cluster: Vec<AlignmentRecord> =
        split_result.strict.iter().copied().filter(|r| tset.contains(&r.tname)).collect();
    if strict_cluster.is_empty() {
        log::debug!("driver: cluster has no strict records, skipping (EmptyCluster)");
        return None;
    }

    let recovered = recover_matches(records, &strict_cluster, config.relaxed_id_seq_min);
    let classes = resolve_orientation(&recovered);
    let filtered = filter_repeats(&recovered, config.repeat_spread_threshold);
    if filtered.is_empty() {
        log::debug!("driver: cluster has no records left after the repeat filter, skipping (EmptyCluster)");
        return None;
    }

    let filtered = take_first_subcluster(queue, cluster(&filtered), filtered, |r| r.tname, "repeat filter")?;

    let reframed = reframe(&filtered, &classes);
    let pairs = verify(&reframed, config.end_proximity);
    if pairs.is_empty() {
        log::debug!("driver: cluster has no verified pairs, skipping (EmptyCluster)");
        return None;
    }

    let pair_clusters = cluster_edges(pairs.iter().map(|p| (p.tname, p.qname)));
    let pairs = take_first_subcluster(queue, pair_clusters, pairs, |p| p.tname, "verifier")?;

    let mut built = build_scaffolds(&pairs, interner, config);
    if built.is_empty() {
        log::debug!("driver: cluster produced no scaffold (DegenerateScaffold)");
        return None;
    }

    log::info!("driver: cluster emitted {} scaffold table(s)", built.len());
    let first = built.remove(0);
    for extra in built {
        queue.push(extra.contigs);
    }
    Some(first.rows)
}

/// If `sub_clusters` names more than one component, keeps only the items of
/// `items` belonging to the first and pushes the rest onto `queue` for a
/// later iteration (§4.J "keep only the first and enqueue the others").
/// Returns `None` when the first sub-cluster is empty (should not happen
/// given `sub_clusters` is derived from `items`, but kept for robustness).
fn take_first_subcluster<T: Copy>(
    queue: &ClusterQueue,
    mut sub_clusters: Vec<Vec<ContigId>>,
    items: Vec<T>,
    tname_of: impl Fn(&T) -> ContigId,
    stage: &str,
) -> Option<Vec<T>> {
    if sub_clusters.is_empty() {
        return None;
    }
    if sub_clusters.len() > 1 {
        log::info!("driver: {stage} split a cluster into {} sub-clusters", sub_clusters.len());
        for extra in sub_clusters.drain(1..) {
            queue.push(extra);
        }
    }
    let first_tset: FastSet<ContigId> = sub_clusters.remove(0).into_iter().collect();
    let kept: Vec<T> = items.into_iter().filter(|item| first_tset.contains(&tname_of(item))).collect();
    if kept.is_empty() {
        None
    } else {
        Some(kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Strand;
    use crate::utils::intern::Interner;

    fn rec(
        interner: &mut Interner,
        q: &str,
        t: &str,
        qlen: u32,
        qstart: u32,
        qstop: u32,
        tlen: u32,
        tstart: u32,
        tstop: u32,
        nb_match: u32,
        nb_base: u32,
    ) -> AlignmentRecord {
        AlignmentRecord {
            qname: interner.intern(q),
            qlen,
            qstart,
            qstop,
            strand: Strand::Forward,
            tname: interner.intern(t),
            tlen,
            tstart,
            tstop,
            nb_match,
            nb_base,
            id_seq: nb_match as f64 / nb_base as f64,
            reverse_t: false,
            reverse_q: false,
        }
    }

    #[test]
    fn s1_single_pair_forward_yields_one_target_row() {
        let mut interner = Interner::new();
        let records = vec![rec(&mut interner, "s1$qA", "tA", 200_000, 10_000, 60_000, 180_000, 5_000, 55_000, 50_000, 51_000)];
        let config = PipelineConfig { nb_match_min: 10_000, id_seq_min: 0.90, ..PipelineConfig::for_tests() };
        let scaffolds = run(&records, &interner, &config);
        assert_eq!(scaffolds.len(), 1);
        assert_eq!(scaffolds[0].len(), 1);
        assert_eq!(scaffolds[0][0].contig_name, "tA");
        assert_eq!(scaffolds[0][0].end, 180_000);
    }

    #[test]
    fn s2_two_targets_bridged_by_one_query_end_to_end() {
        let mut interner = Interner::new();
        let records = vec![
            rec(&mut interner, "qA", "tA", 200_000, 0, 80_000, 100_000, 10_000, 90_000, 80_000, 90_000),
            rec(&mut interner, "qA", "tB", 200_000, 100_000, 190_000, 120_000, 20_000, 110_000, 80_000, 90_000),
        ];
        let config = PipelineConfig { nb_match_min: 10_000, id_seq_min: 0.80, ..PipelineConfig::for_tests() };
        let scaffolds = run(&records, &interner, &config);
        assert_eq!(scaffolds.len(), 1);
        assert_eq!(scaffolds[0].len(), 3);
        assert_eq!(scaffolds[0][0].contig_name, "tA");
        assert_eq!(scaffolds[0][1].contig_name, "qA");
        assert_eq!(scaffolds[0][2].contig_name, "tB");
    }

    #[test]
    fn disjoint_clusters_each_emit_a_scaffold() {
        let mut interner = Interner::new();
        let records = vec![
            rec(&mut interner, "qA", "tA", 200_000, 10_000, 60_000, 180_000, 5_000, 55_000, 50_000, 51_000),
            rec(&mut interner, "qB", "tC", 200_000, 10_000, 60_000, 180_000, 5_000, 55_000, 50_000, 51_000),
        ];
        let config = PipelineConfig { nb_match_min: 10_000, id_seq_min: 0.90, ..PipelineConfig::for_tests() };
        let scaffolds = run(&records, &interner, &config);
        assert_eq!(scaffolds.len(), 2);
    }

    #[test]
    fn a_single_worker_drains_the_queue_in_fifo_order() {
        let mut interner = Interner::new();
        let records = vec![
            rec(&mut interner, "qA", "tA", 200_000, 10_000, 60_000, 180_000, 5_000, 55_000, 50_000, 51_000),
            rec(&mut interner, "qB", "tC", 200_000, 10_000, 60_000, 180_000, 5_000, 55_000, 50_000, 51_000),
            rec(&mut interner, "qD", "tE", 200_000, 10_000, 60_000, 180_000, 5_000, 55_000, 50_000, 51_000),
        ];
        let config = PipelineConfig {
            nb_match_min: 10_000,
            id_seq_min: 0.90,
            jobs: std::num::NonZeroUsize::new(1).unwrap(),
            ..PipelineConfig::for_tests()
        };
        let ordered = run(&records, &interner, &config);
        assert_eq!(ordered.len(), 3);
        let names: Vec<&str> = ordered.iter().map(|s| s[0].contig_name.as_str()).collect();
        assert_eq!(names, vec!["tA", "tC", "tE"]);
    }
}
