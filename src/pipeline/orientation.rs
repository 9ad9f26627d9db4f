//! §4.E Orientation resolver (`Direction_assignment`).
//!
//! Ties are broken by first-occurrence order in the input record slice — the
//! concrete stand-in for §5's "lexicographic order of contig ids, then
//! insertion order" (contig ids here are opaque interned integers, not
//! strings, so row-arrival order is the only available, deterministic proxy
//! — see DESIGN.md).

use crate::model::{AlignmentRecord, Strand};
use crate::utils::intern::ContigId;
use crate::utils::{FastMap, FastSet};

#[derive(Debug, Default, Clone)]
pub struct OrientationClasses {
    pub tsens: FastSet<ContigId>,
    pub tinv: FastSet<ContigId>,
    pub qsens: FastSet<ContigId>,
    pub qinv: FastSet<ContigId>,
}

impl OrientationClasses {
    pub fn classify_t(&self, t: ContigId) -> Option<bool> {
        if self.tsens.contains(&t) {
            Some(true)
        } else if self.tinv.contains(&t) {
            Some(false)
        } else {
            None
        }
    }

    pub fn classify_q(&self, q: ContigId) -> Option<bool> {
        if self.qsens.contains(&q) {
            Some(true)
        } else if self.qinv.contains(&q) {
            Some(false)
        } else {
            None
        }
    }
}

#[derive(Clone, Copy)]
struct StrandMaxRow {
    strand: Strand,
    nb_match_sum: u32,
    first_seen: usize,
}

#[derive(Clone, Copy)]
struct Candidate {
    partner: ContigId,
    strand: Strand,
    score: u32,
    first_seen: usize,
}

fn better(candidate: &Candidate, existing: &Candidate) -> bool {
    candidate.score > existing.score || (candidate.score == existing.score && candidate.first_seen < existing.first_seen)
}

fn pick_dominant(candidates: impl Iterator<Item = (ContigId, Candidate)>) -> FastMap<ContigId, Candidate> {
    let mut best: FastMap<ContigId, Candidate> = FastMap::default();
    for (key, candidate) in candidates {
        best.entry(key)
            .and_modify(|existing| {
                if better(&candidate, existing) {
                    *existing = candidate;
                }
            })
            .or_insert(candidate);
    }
    best
}

/// Runs the orientation BFS over one cluster's records and returns the four
/// disjoint classes. Contigs unreachable from the reference through frontier
/// evidence are left out of all four classes — expected per §9(a)/(d).
pub fn resolve_orientation(records: &[AlignmentRecord]) -> OrientationClasses {
    // Step 1: group by (T, Q, Strand), sum NbMatch.
    let mut strand_sums: FastMap<(ContigId, ContigId, Strand), (u32, usize)> = FastMap::default();
    for (i, r) in records.iter().enumerate() {
        let entry = strand_sums.entry((r.tname, r.qname, r.strand)).or_insert((0, i));
        entry.0 += r.nb_match;
    }

    // For each (T, Q), keep the row whose strand has the greater sum: `strand_max`.
    let mut strand_max: FastMap<(ContigId, ContigId), StrandMaxRow> = FastMap::default();
    for (&(t, q, strand), &(sum, first_seen)) in &strand_sums {
        let candidate = StrandMaxRow { strand, nb_match_sum: sum, first_seen };
        strand_max
            .entry((t, q))
            .and_modify(|existing| {
                if sum > existing.nb_match_sum || (sum == existing.nb_match_sum && first_seen < existing.first_seen) {
                    *existing = candidate;
                }
            })
            .or_insert(candidate);
    }

    let mut classes = OrientationClasses::default();
    if strand_max.is_empty() {
        return classes;
    }

    // Reference T: the T maximising the sum of NbMatch in strand_max.
    let mut t_totals: FastMap<ContigId, (u32, usize)> = FastMap::default();
    for (&(t, _q), row) in &strand_max {
        let entry = t_totals.entry(t).or_insert((0, row.first_seen));
        entry.0 += row.nb_match_sum;
        entry.1 = entry.1.min(row.first_seen);
    }
    let reference = *t_totals
        .iter()
        .max_by(|a, b| a.1.0.cmp(&b.1.0).then_with(|| b.1.1.cmp(&a.1.1)))
        .map(|(t, _)| t)
        .expect("strand_max is non-empty");

    let mut classified: FastSet<ContigId> = FastSet::default();
    classified.insert(reference);
    classes.tsens.insert(reference);

    let mut frontier_t: FastSet<ContigId> = FastSet::default();
    frontier_t.insert(reference);

    loop {
        // T -> Q half-step.
        let candidates_q = strand_max.iter().filter(|((t, _), _)| frontier_t.contains(t)).map(|(&(t, q), row)| {
            (
                q,
                Candidate { partner: t, strand: row.strand, score: row.nb_match_sum, first_seen: row.first_seen },
            )
        });
        let dominant_q = pick_dominant(candidates_q);

        let mut frontier_q: FastSet<ContigId> = FastSet::default();
        let mut newly_classified_q: Vec<(ContigId, Candidate)> = dominant_q.into_iter().collect();
        newly_classified_q.sort_by_key(|(q, _)| *q);
        for (q, candidate) in newly_classified_q {
            if classified.contains(&q) {
                continue;
            }
            let sens = (candidate.strand == Strand::Forward && classes.tsens.contains(&candidate.partner))
                || (candidate.strand == Strand::Reverse && classes.tinv.contains(&candidate.partner));
            if sens {
                classes.qsens.insert(q);
            } else {
                classes.qinv.insert(q);
            }
            classified.insert(q);
            frontier_q.insert(q);
        }

        if frontier_q.is_empty() {
            break;
        }

        // Q -> T half-step.
        let candidates_t = strand_max.iter().filter(|((_, q), _)| frontier_q.contains(q)).map(|(&(t, q), row)| {
            (
                t,
                Candidate { partner: q, strand: row.strand, score: row.nb_match_sum, first_seen: row.first_seen },
            )
        });
        let dominant_t = pick_dominant(candidates_t);

        let mut frontier_t_new: FastSet<ContigId> = FastSet::default();
        let mut newly_classified_t: Vec<(ContigId, Candidate)> = dominant_t.into_iter().collect();
        newly_classified_t.sort_by_key(|(t, _)| *t);
        for (t, candidate) in newly_classified_t {
            if classified.contains(&t) {
                continue;
            }
            let sens = (candidate.strand == Strand::Forward && classes.qsens.contains(&candidate.partner))
                || (candidate.strand == Strand::Reverse && classes.qinv.contains(&candidate.partner));
            if sens {
                classes.tsens.insert(t);
            } else {
                classes.tinv.insert(t);
            }
            classified.insert(t);
            frontier_t_new.insert(t);
        }

        if frontier_t_new.is_empty() {
            break;
        }
        frontier_t = frontier_t_new;
    }

    classes
}
