//! §4.B High-confidence split. Pure, total.

use crate::model::AlignmentRecord;

pub struct Split {
    pub strict: Vec<AlignmentRecord>,
    pub rest: Vec<AlignmentRecord>,
}

pub fn split(records: &[AlignmentRecord], nb_match_min: u32, id_seq_min: f64) -> Split {
    let mut strict = Vec::new();
    let mut rest = Vec::new();
    for &record in records {
        if record.nb_match >= nb_match_min && record.id_seq >= id_seq_min {
            strict.push(record);
        } else {
            rest.push(record);
        }
    }
    Split { strict, rest }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::intern::Interner;

    fn record(interner: &mut Interner, nb_match: u32, id_seq: f64) -> AlignmentRecord {
        AlignmentRecord {
            qname: interner.intern("q"),
            qlen: 100,
            qstart: 0,
            qstop: 100,
            strand: crate::model::Strand::Forward,
            tname: interner.intern("t"),
            tlen: 100,
            tstart: 0,
            tstop: 100,
            nb_match,
            nb_base: 100,
            id_seq,
            reverse_t: false,
            reverse_q: false,
        }
    }

    #[test]
    fn partitions_on_both_thresholds() {
        let mut interner = Interner::new();
        let records = vec![
            record(&mut interner, 20_000, 0.95),
            record(&mut interner, 5_000, 0.95),
            record(&mut interner, 20_000, 0.50),
        ];
        let Split { strict, rest } = split(&records, 10_000, 0.90);
        assert_eq!(strict.len(), 1);
        assert_eq!(rest.len(), 2);
    }

    #[test]
    fn boundary_values_pass() {
        let mut interner = Interner::new();
        let records = vec![record(&mut interner, 10_000, 0.90)];
        let Split { strict, rest } = split(&records, 10_000, 0.90);
        assert_eq!(strict.len(), 1);
        assert!(rest.is_empty());
    }
}
