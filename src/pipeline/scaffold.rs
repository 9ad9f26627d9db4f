//! §4.I Scaffolder: adjacency extraction, score cleaning, chain
//! linearisation, and row emission.

use crate::config::PipelineConfig;
use crate::pipeline::verify::AggregatedPair;
use crate::utils::intern::{ContigId, Interner};
use crate::utils::{FastMap, FastSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaffoldType {
    Target,
    Query,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScaffoldRow {
    pub contig_name: String,
    pub start: u32,
    pub end: u32,
    pub reverse: bool,
    pub len: u32,
    pub ty: ScaffoldType,
}

/// One emitted scaffold table plus the T-contigs it covers, so the driver
/// can re-enqueue every table but the first without re-resolving names back
/// to ids.
#[derive(Debug, Clone)]
pub struct ScaffoldSet {
    pub contigs: Vec<ContigId>,
    pub rows: Vec<ScaffoldRow>,
}

#[derive(Debug, Clone, Copy)]
struct Adjacency {
    t1: ContigId,
    t2: ContigId,
    qname: ContigId,
    inter_contig: (u32, u32),
    len_inter_contig: i64,
    score: f64,
    t1_len: u32,
    t1_reverse: bool,
    t2_len: u32,
    t2_reverse: bool,
    reverse_q: bool,
}

const TAIL_MIN_OVERHANG: u32 = 100_000;

/// Builds one or more scaffold tables from the verified pairs of a single
/// cluster. The caller treats the first table as this cluster's scaffold
/// and re-enqueues the rest, by their `contigs`, as fresh clusters.
pub fn build_scaffolds(pairs: &[AggregatedPair], interner: &Interner, config: &PipelineConfig) -> Vec<ScaffoldSet> {
    if pairs.is_empty() {
        return Vec::new();
    }

    let adjacencies = clean_relations(extract_adjacencies(pairs));
    let chains = linearize(&adjacencies);

    let mut scaffolds: Vec<ScaffoldSet> = chains
        .iter()
        .map(|chain| {
            let mut contigs: Vec<ContigId> = chain.iter().flat_map(|e| [e.t1, e.t2]).collect();
            contigs.sort_unstable();
            contigs.dedup();
            ScaffoldSet { contigs, rows: emit_rows(chain, interner) }
        })
        .collect();

    let mut covered: FastSet<ContigId> = FastSet::default();
    for chain in &chains {
        for edge in chain {
            covered.insert(edge.t1);
            covered.insert(edge.t2);
        }
    }

    let mut contig_info: FastMap<ContigId, (u32, bool)> = FastMap::default();
    for pair in pairs {
        contig_info.entry(pair.tname).or_insert((pair.tlen, pair.reverse_t));
    }
    let mut isolated: Vec<ContigId> = contig_info.keys().copied().filter(|t| !covered.contains(t)).collect();
    isolated.sort_unstable();
    for t in isolated {
        let (len, reverse) = contig_info[&t];
        scaffolds.push(ScaffoldSet {
            contigs: vec![t],
            rows: vec![ScaffoldRow {
                contig_name: interner.resolve(t).to_string(),
                start: 0,
                end: len,
                reverse,
                len,
                ty: ScaffoldType::Target,
            }],
        });
    }

    if config.enable_tails {
        for scaffold in &mut scaffolds {
            apply_tails(&mut scaffold.rows, pairs, interner);
        }
    }

    scaffolds
}

fn extract_adjacencies(pairs: &[AggregatedPair]) -> Vec<Adjacency> {
    let mut by_q: FastMap<ContigId, Vec<AggregatedPair>> = FastMap::default();
    for &pair in pairs {
        by_q.entry(pair.qname).or_default().push(pair);
    }

    let mut qnames: Vec<ContigId> = by_q.keys().copied().collect();
    qnames.sort_unstable();

    let mut adjacencies = Vec::new();
    for q in qnames {
        let mut group = by_q.remove(&q).expect("key just collected from this map");
        group.sort_by_key(|p| p.qstart);
        for w in group.windows(2) {
            let (p1, p2) = (w[0], w[1]);
            let len_inter_contig = p2.qstart as i64 - p1.qstop as i64;
            let id_seq = (p1.id_seq + p2.id_seq) / 2.0;
            let cover = (p1.qcover() + p1.tcover() + p2.qcover() + p2.tcover()) / 4.0;
            let dist_end_t1 = p1.tlen - p1.tstop;
            let score = ((dist_end_t1 as f64 + 1.0) / (id_seq * cover) * 1000.0).round() / 1000.0;

            adjacencies.push(Adjacency {
                t1: p1.tname,
                t2: p2.tname,
                qname: q,
                inter_contig: (p1.qstop, p2.qstart),
                len_inter_contig,
                score,
                t1_len: p1.tlen,
                t1_reverse: p1.reverse_t,
                t2_len: p2.tlen,
                t2_reverse: p2.reverse_t,
                reverse_q: p1.reverse_q,
            });
        }
    }
    adjacencies
}

fn clean_relations(mut adjacencies: Vec<Adjacency>) -> Vec<Adjacency> {
    adjacencies.sort_by(|a, b| {
        a.score
            .partial_cmp(&b.score)
            .expect("scores are finite: cover/id_seq are bounded away from zero by the verifier's gate")
            .then(a.len_inter_contig.cmp(&b.len_inter_contig))
    });

    let mut seen_pairs: FastSet<(ContigId, ContigId)> = FastSet::default();
    adjacencies.retain(|a| seen_pairs.insert((a.t1, a.t2)));

    let pair_set: FastSet<(ContigId, ContigId)> = adjacencies.iter().map(|a| (a.t1, a.t2)).collect();
    adjacencies.retain(|a| !pair_set.contains(&(a.t2, a.t1)));

    let mut seen_as_t1: FastSet<ContigId> = FastSet::default();
    let mut seen_as_t2: FastSet<ContigId> = FastSet::default();
    let mut seen_any: FastSet<ContigId> = FastSet::default();
    let mut kept = Vec::new();
    for a in adjacencies {
        let both_seen = seen_any.contains(&a.t1) && seen_any.contains(&a.t2);
        if !seen_as_t1.contains(&a.t1) && !seen_as_t2.contains(&a.t2) && !both_seen {
            seen_as_t1.insert(a.t1);
            seen_as_t2.insert(a.t2);
            seen_any.insert(a.t1);
            seen_any.insert(a.t2);
            kept.push(a);
        }
    }
    kept
}

/// Stitches conflict-free adjacencies into maximal chains. `clean_relations`
/// guarantees each T appears at most once as a `T1` and at most once as a
/// `T2`, so the edge set is a disjoint union of simple paths; the subtlety is
/// that `clean_relations`'s score sort means a run can be discovered in any
/// order relative to its neighbours, so a freshly built run may need to fuse
/// onto an already-built chain from either end (or bridge two chains when it
/// is the missing middle segment).
fn linearize(adjacencies: &[Adjacency]) -> Vec<Vec<Adjacency>> {
    let succ: FastMap<ContigId, usize> = adjacencies.iter().enumerate().map(|(i, a)| (a.t1, i)).collect();

    let mut chains: FastMap<usize, Vec<usize>> = FastMap::default();
    let mut chain_of_head: FastMap<ContigId, usize> = FastMap::default();
    let mut chain_of_tail: FastMap<ContigId, usize> = FastMap::default();
    let mut consumed: FastSet<usize> = FastSet::default();
    let mut next_chain_id = 0usize;

    for start in 0..adjacencies.len() {
        if consumed.contains(&start) {
            continue;
        }
        let mut run = vec![start];
        consumed.insert(start);
        let mut tail = adjacencies[start].t2;
        while let Some(&next) = succ.get(&tail) {
            if consumed.contains(&next) {
                break;
            }
            run.push(next);
            consumed.insert(next);
            tail = adjacencies[next].t2;
        }
        let head = adjacencies[start].t1;

        let left = chain_of_tail.get(&head).copied();
        let right = chain_of_head.get(&tail).copied();

        if let (Some(left_id), Some(right_id)) = (left, right) {
            if left_id != right_id {
                // `run` is the missing middle segment bridging two chains
                // built from opposite directions: splice them together.
                let mut left_chain = chains.remove(&left_id).expect("chain_of_tail points to a live chain");
                let right_chain = chains.remove(&right_id).expect("chain_of_head points to a live chain");
                let new_tail = adjacencies[*right_chain.last().expect("chains are never empty")].t2;
                chain_of_tail.remove(&head);
                chain_of_head.remove(&tail);
                left_chain.extend(run);
                left_chain.extend(right_chain);
                chain_of_tail.insert(new_tail, left_id);
                chains.insert(left_id, left_chain);
                continue;
            }
        }

        if let Some(left_id) = left {
            chains.get_mut(&left_id).expect("chain_of_tail points to a live chain").extend(run);
            chain_of_tail.remove(&head);
            chain_of_tail.insert(tail, left_id);
            continue;
        }

        if let Some(right_id) = right {
            let existing = chains.get_mut(&right_id).expect("chain_of_head points to a live chain");
            let mut fused = run;
            fused.append(existing);
            *existing = fused;
            chain_of_head.remove(&tail);
            chain_of_head.insert(head, right_id);
            continue;
        }

        let chain_id = next_chain_id;
        next_chain_id += 1;
        chain_of_head.insert(head, chain_id);
        chain_of_tail.insert(tail, chain_id);
        chains.insert(chain_id, run);
    }

    let mut ids: Vec<usize> = chains.keys().copied().collect();
    ids.sort_unstable();
    ids.into_iter()
        .map(|id| chains.remove(&id).expect("id collected from this map").into_iter().map(|i| adjacencies[i]).collect())
        .collect()
}

fn emit_rows(chain: &[Adjacency], interner: &Interner) -> Vec<ScaffoldRow> {
    let first = &chain[0];
    let mut rows = vec![ScaffoldRow {
        contig_name: interner.resolve(first.t1).to_string(),
        start: 0,
        end: first.t1_len,
        reverse: first.t1_reverse,
        len: first.t1_len,
        ty: ScaffoldType::Target,
    }];

    for edge in chain {
        if edge.len_inter_contig > 0 {
            rows.push(ScaffoldRow {
                contig_name: interner.resolve(edge.qname).to_string(),
                start: edge.inter_contig.0,
                end: edge.inter_contig.1,
                reverse: edge.reverse_q,
                len: edge.len_inter_contig as u32,
                ty: ScaffoldType::Query,
            });
        }
        rows.push(ScaffoldRow {
            contig_name: interner.resolve(edge.t2).to_string(),
            start: 0,
            end: edge.t2_len,
            reverse: edge.t2_reverse,
            len: edge.t2_len,
            ty: ScaffoldType::Target,
        });
    }
    rows
}

/// §9(c) opt-in extension: prepend/append a Q-row when a terminal T has a Q
/// aligned to its extremity with at least 100kb of overhang beyond the used
/// interval.
fn apply_tails(rows: &mut Vec<ScaffoldRow>, pairs: &[AggregatedPair], interner: &Interner) {
    let Some(first) = rows.first() else { return };
    if first.ty == ScaffoldType::Target {
        let name = first.contig_name.clone();
        if let Some(pair) = pairs.iter().find(|p| interner.resolve(p.tname) == name && p.qstart >= TAIL_MIN_OVERHANG) {
            rows.insert(
                0,
                ScaffoldRow {
                    contig_name: interner.resolve(pair.qname).to_string(),
                    start: 0,
                    end: pair.qstart,
                    reverse: pair.reverse_q,
                    len: pair.qstart,
                    ty: ScaffoldType::Query,
                },
            );
        }
    }

    let Some(last) = rows.last() else { return };
    if last.ty == ScaffoldType::Target {
        let name = last.contig_name.clone();
        if let Some(pair) = pairs.iter().find(|p| interner.resolve(p.tname) == name && p.qlen - p.qstop >= TAIL_MIN_OVERHANG) {
            rows.push(ScaffoldRow {
                contig_name: interner.resolve(pair.qname).to_string(),
                start: pair.qstop,
                end: pair.qlen,
                reverse: pair.reverse_q,
                len: pair.qlen - pair.qstop,
                ty: ScaffoldType::Query,
            });
        }
    }
}
