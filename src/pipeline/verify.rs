//! §4.H Verifier (`Verification`).

use crate::model::AlignmentRecord;
use crate::utils::intern::ContigId;
use crate::utils::FastMap;

/// One row per `(T, Q)` inside a cluster after verification (§3
/// `AggregatedPair`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregatedPair {
    pub tname: ContigId,
    pub qname: ContigId,
    pub qlen: u32,
    pub tlen: u32,
    pub qstart: u32,
    pub qstop: u32,
    pub tstart: u32,
    pub tstop: u32,
    pub nb_match: u32,
    pub id_seq: f64,
    pub reverse_t: bool,
    pub reverse_q: bool,
}

impl AggregatedPair {
    pub fn qcover(&self) -> f64 {
        self.nb_match as f64 / (self.qstop - self.qstart) as f64
    }

    pub fn tcover(&self) -> f64 {
        self.nb_match as f64 / (self.tstop - self.tstart) as f64
    }
}

/// Aggregates reframed records by `(T, Q)` and keeps only the pairs whose
/// coverage and end-proximity clear the gates of §4.H.
pub fn verify(records: &[AlignmentRecord], end_proximity: u32) -> Vec<AggregatedPair> {
    let mut groups: FastMap<(ContigId, ContigId), Vec<AlignmentRecord>> = FastMap::default();
    for &r in records {
        groups.entry((r.tname, r.qname)).or_default().push(r);
    }

    let mut pairs: Vec<AggregatedPair> = groups
        .into_iter()
        .map(|((tname, qname), group)| aggregate(tname, qname, &group))
        .filter(|pair| passes_gate(pair, end_proximity))
        .collect();

    pairs.sort_by_key(|p| (p.tname, p.qname));
    pairs
}

fn aggregate(tname: ContigId, qname: ContigId, group: &[AlignmentRecord]) -> AggregatedPair {
    // §9(b): Qlen/Tlen should be per-contig constants; take the first
    // and assert consistency rather than averaging over potential noise.
    let first = group[0];
    debug_assert!(group.iter().all(|r| r.qlen == first.qlen), "inconsistent Qlen within a (T,Q) group");
    debug_assert!(group.iter().all(|r| r.tlen == first.tlen), "inconsistent Tlen within a (T,Q) group");

    let qstart = group.iter().map(|r| r.qstart).min().unwrap();
    let qstop = group.iter().map(|r| r.qstop).max().unwrap();
    let tstart = group.iter().map(|r| r.tstart).min().unwrap();
    let tstop = group.iter().map(|r| r.tstop).max().unwrap();
    let nb_match: u32 = group.iter().map(|r| r.nb_match).sum();
    let id_seq = group.iter().map(|r| r.id_seq).sum::<f64>() / group.len() as f64;

    AggregatedPair {
        tname,
        qname,
        qlen: first.qlen,
        tlen: first.tlen,
        qstart,
        qstop,
        tstart,
        tstop,
        nb_match,
        id_seq,
        reverse_t: first.reverse_t,
        reverse_q: first.reverse_q,
    }
}

fn passes_gate(pair: &AggregatedPair, end_proximity: u32) -> bool {
    let qcover = pair.qcover();
    let tcover = pair.tcover();
    let q_near_end = pair.qstart < end_proximity || pair.qlen - pair.qstop < end_proximity;
    let t_near_end = pair.tstart < end_proximity || pair.tlen - pair.tstop < end_proximity;
    qcover > 0.3 && tcover > 0.3 && q_near_end && t_near_end
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Strand;
    use crate::utils::intern::Interner;

    fn rec(interner: &mut Interner, qstart: u32, qstop: u32, tstart: u32, tstop: u32, nb_match: u32) -> AlignmentRecord {
        AlignmentRecord {
            qname: interner.intern("qA"),
            qlen: 200_000,
            qstart,
            qstop,
            strand: Strand::Forward,
            tname: interner.intern("tA"),
            tlen: 100_000,
            tstart,
            tstop,
            nb_match,
            nb_base: nb_match,
            id_seq: 1.0,
            reverse_t: false,
            reverse_q: false,
        }
    }

    #[test]
    fn a_well_covered_end_touching_pair_is_verified() {
        let mut interner = Interner::new();
        let r = rec(&mut interner, 0, 80_000, 10_000, 90_000, 80_000);
        let pairs = verify(&[r], 100_000);
        assert_eq!(pairs.len(), 1);
        assert!(pairs[0].qcover() > 0.3);
    }

    #[test]
    fn low_coverage_pair_is_dropped() {
        let mut interner = Interner::new();
        let r = rec(&mut interner, 0, 200_000, 0, 100_000, 1_000);
        let pairs = verify(&[r], 100_000);
        assert!(pairs.is_empty());
    }

    #[test]
    fn a_pair_not_touching_any_contig_end_is_dropped() {
        let mut interner = Interner::new();
        // Both sides sit squarely in the middle of a contig much longer than
        // 2x the end-proximity window.
        let r = rec(&mut interner, 500_000, 580_000, 500_000, 580_000, 80_000);
        let mut r = r;
        r.qlen = 1_200_000;
        r.tlen = 1_200_000;
        let pairs = verify(&[r], 100_000);
        assert!(pairs.is_empty());
    }

    #[test]
    fn aggregation_takes_min_start_max_stop_and_sums_matches() {
        let mut interner = Interner::new();
        let r1 = rec(&mut interner, 0, 40_000, 10_000, 50_000, 35_000);
        let r2 = rec(&mut interner, 30_000, 80_000, 40_000, 90_000, 35_000);
        let pairs = verify(&[r1, r2], 100_000);
        assert_eq!(pairs.len(), 1);
        let pair = pairs[0];
        assert_eq!(pair.qstart, 0);
        assert_eq!(pair.qstop, 80_000);
        assert_eq!(pair.tstart, 10_000);
        assert_eq!(pair.tstop, 90_000);
        assert_eq!(pair.nb_match, 70_000);
    }
}
