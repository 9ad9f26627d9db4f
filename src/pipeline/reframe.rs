//! §4.G Reframer (`Reverse`): rewrite coordinates/strand to the resolved
//! orientation frame.

use crate::model::AlignmentRecord;
use crate::pipeline::orientation::OrientationClasses;

/// Reframes every record whose T and Q both belong to a resolved
/// orientation class. Records touching a contig the BFS left unclassified
/// (§9(a)/(d)) are dropped — there is no frame to reframe them into.
pub fn reframe(records: &[AlignmentRecord], classes: &OrientationClasses) -> Vec<AlignmentRecord> {
    records.iter().filter_map(|r| reframe_one(r, classes)).collect()
}

fn reframe_one(r: &AlignmentRecord, classes: &OrientationClasses) -> Option<AlignmentRecord> {
    let t_sens = classes.classify_t(r.tname)?;
    let q_sens = classes.classify_q(r.qname)?;

    let mut out = *r;
    match (t_sens, q_sens) {
        (true, true) => {}
        (true, false) => {
            out.qstart = out.qlen - r.qstop;
            out.qstop = out.qlen - r.qstart;
            out.strand = out.strand.flip();
            out.reverse_q = true;
        }
        (false, true) => {
            out.tstart = out.tlen - r.tstop;
            out.tstop = out.tlen - r.tstart;
            out.strand = out.strand.flip();
            out.reverse_t = true;
        }
        (false, false) => {
            out.qstart = out.qlen - r.qstop;
            out.qstop = out.qlen - r.qstart;
            out.tstart = out.tlen - r.tstop;
            out.tstop = out.tlen - r.tstart;
            // double flip cancels: strand is left unchanged.
            out.reverse_q = true;
            out.reverse_t = true;
        }
    }

    debug_assert!(out.check_invariants());
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Strand;
    use crate::utils::intern::Interner;

    fn rec(interner: &mut Interner) -> AlignmentRecord {
        AlignmentRecord {
            qname: interner.intern("qA"),
            qlen: 200_000,
            qstart: 100_000,
            qstop: 190_000,
            strand: Strand::Forward,
            tname: interner.intern("tA"),
            tlen: 180_000,
            tstart: 10_000,
            tstop: 90_000,
            nb_match: 80_000,
            nb_base: 90_000,
            id_seq: 0.95,
            reverse_t: false,
            reverse_q: false,
        }
    }

    fn classes_with(interner: &mut Interner, t_sens: bool, q_sens: bool) -> OrientationClasses {
        let mut classes = OrientationClasses::default();
        let t = interner.intern("tA");
        let q = interner.intern("qA");
        if t_sens {
            classes.tsens.insert(t);
        } else {
            classes.tinv.insert(t);
        }
        if q_sens {
            classes.qsens.insert(q);
        } else {
            classes.qinv.insert(q);
        }
        classes
    }

    #[test]
    fn tsens_qsens_is_unchanged() {
        let mut interner = Interner::new();
        let r = rec(&mut interner);
        let classes = classes_with(&mut interner, true, true);
        let out = reframe(&[r], &classes);
        assert_eq!(out[0], r);
    }

    #[test]
    fn tsens_qinv_flips_q_coordinates_and_strand() {
        let mut interner = Interner::new();
        let r = rec(&mut interner);
        let classes = classes_with(&mut interner, true, false);
        let out = reframe(&[r], &classes)[0];
        assert_eq!(out.qstart, r.qlen - r.qstop);
        assert_eq!(out.qstop, r.qlen - r.qstart);
        assert_eq!(out.strand, Strand::Reverse);
        assert!(out.reverse_q);
        assert!(!out.reverse_t);
        assert_eq!(out.tstart, r.tstart);
    }

    #[test]
    fn tinv_qsens_flips_t_coordinates_and_strand() {
        let mut interner = Interner::new();
        let r = rec(&mut interner);
        let classes = classes_with(&mut interner, false, true);
        let out = reframe(&[r], &classes)[0];
        assert_eq!(out.tstart, r.tlen - r.tstop);
        assert_eq!(out.tstop, r.tlen - r.tstart);
        assert_eq!(out.strand, Strand::Reverse);
        assert!(out.reverse_t);
    }

    #[test]
    fn tinv_qinv_flips_both_but_cancels_strand() {
        let mut interner = Interner::new();
        let r = rec(&mut interner);
        let classes = classes_with(&mut interner, false, false);
        let out = reframe(&[r], &classes)[0];
        assert_eq!(out.tstart, r.tlen - r.tstop);
        assert_eq!(out.qstart, r.qlen - r.qstop);
        assert_eq!(out.strand, r.strand);
        assert!(out.reverse_t);
        assert!(out.reverse_q);
    }

    #[test]
    fn unclassified_contigs_are_dropped() {
        let mut interner = Interner::new();
        let r = rec(&mut interner);
        let classes = OrientationClasses::default();
        assert!(reframe(&[r], &classes).is_empty());
    }

    #[test]
    fn reframe_coordinates_and_strand_are_an_involution_over_each_case() {
        // The Reverse/ReverseT/ReverseQ flags record "was this case applied",
        // so re-applying the same case a second time sets them again rather
        // than toggling them back off. The coordinate + strand transform
        // itself, though, must be self-inverse (§8 invariant 4).
        let mut interner = Interner::new();
        let r = rec(&mut interner);
        for (t_sens, q_sens) in [(true, true), (true, false), (false, true), (false, false)] {
            let classes = classes_with(&mut interner, t_sens, q_sens);
            let once = reframe(&[r], &classes)[0];
            let twice = reframe_one(&once, &classes).unwrap();
            assert_eq!((twice.qstart, twice.qstop, twice.tstart, twice.tstop, twice.strand), (r.qstart, r.qstop, r.tstart, r.tstop, r.strand));
        }
    }

    #[test]
    fn reframe_preserves_start_le_stop() {
        let mut interner = Interner::new();
        let r = rec(&mut interner);
        for (t_sens, q_sens) in [(true, true), (true, false), (false, true), (false, false)] {
            let classes = classes_with(&mut interner, t_sens, q_sens);
            let out = reframe(&[r], &classes)[0];
            assert!(out.check_invariants());
        }
    }
}
