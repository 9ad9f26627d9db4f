//! §4.D Match recovery (`Recup_match`).

use crate::model::AlignmentRecord;
use crate::utils::intern::ContigId;
use crate::utils::FastSet;

/// Re-admits, from `global`, every row whose `(Qname, Tname)` pair already
/// appears in `strict_cluster`, filtered to `NbMatch > 1000 ∧ IdSeq >
/// id_seq_min`, and unions the result with `strict_cluster` itself.
///
/// `global` is typically the full ingest table `strict_cluster` was filtered
/// from, so every row of `strict_cluster` also appears in `global` and must
/// not be counted twice: each global row that exactly matches a
/// not-yet-consumed `strict_cluster` row is treated as that same row (and
/// skipped), rather than re-admitted as a second, low-confidence fragment.
pub fn recover_matches(global: &[AlignmentRecord], strict_cluster: &[AlignmentRecord], id_seq_min: f64) -> Vec<AlignmentRecord> {
    let pairs: FastSet<(ContigId, ContigId)> = strict_cluster.iter().map(|r| (r.qname, r.tname)).collect();

    let mut remaining_strict = strict_cluster.to_vec();
    let mut out = strict_cluster.to_vec();
    for &record in global {
        if let Some(pos) = remaining_strict.iter().position(|r| *r == record) {
            remaining_strict.swap_remove(pos);
            continue;
        }
        if pairs.contains(&(record.qname, record.tname)) && record.nb_match > 1000 && record.id_seq > id_seq_min {
            out.push(record);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Strand;
    use crate::utils::intern::Interner;

    fn rec(interner: &mut Interner, q: &str, t: &str, nb_match: u32, id_seq: f64) -> AlignmentRecord {
        AlignmentRecord {
            qname: interner.intern(q),
            qlen: 1000,
            qstart: 0,
            qstop: 500,
            strand: Strand::Forward,
            tname: interner.intern(t),
            tlen: 1000,
            tstart: 0,
            tstop: 500,
            nb_match,
            nb_base: 500,
            id_seq,
            reverse_t: false,
            reverse_q: false,
        }
    }

    #[test]
    fn readmits_matching_low_confidence_fragments() {
        let mut interner = Interner::new();
        let strict = vec![rec(&mut interner, "qA", "tA", 20_000, 0.95)];
        let global = vec![
            strict[0],
            rec(&mut interner, "qA", "tA", 1_500, 0.65),
            rec(&mut interner, "qB", "tB", 5_000, 0.99),
        ];
        let out = recover_matches(&global, &strict, 0.60);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn rejects_fragments_below_nbmatch_or_idseq_floor() {
        let mut interner = Interner::new();
        let strict = vec![rec(&mut interner, "qA", "tA", 20_000, 0.95)];
        let global = vec![
            strict[0],
            rec(&mut interner, "qA", "tA", 900, 0.99),
            rec(&mut interner, "qA", "tA", 5_000, 0.50),
        ];
        let out = recover_matches(&global, &strict, 0.60);
        assert_eq!(out.len(), 1);
    }
}
