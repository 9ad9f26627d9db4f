//! §4.F Repeat filter (`Del_repeat`).

use crate::model::AlignmentRecord;
use crate::utils::intern::ContigId;
use crate::utils::{FastMap, FastSet};

fn spread(values: impl Iterator<Item = u32>) -> u32 {
    let (min, max) = values.fold((u32::MAX, 0u32), |(min, max), v| (min.min(v), max.max(v)));
    max - min
}

/// Flags T/Q-contigs whose `(Tname, Qname)` group shows a repeat/low-
/// complexity coordinate signature, then drops every record touching a
/// flagged contig (both the flagged multi-record groups and any
/// single-record group sharing a flagged T or Q).
pub fn filter_repeats(records: &[AlignmentRecord], threshold: u32) -> Vec<AlignmentRecord> {
    let mut groups: FastMap<(ContigId, ContigId), Vec<AlignmentRecord>> = FastMap::default();
    for &r in records {
        groups.entry((r.tname, r.qname)).or_default().push(r);
    }

    let mut flagged_t: FastSet<ContigId> = FastSet::default();
    let mut flagged_q: FastSet<ContigId> = FastSet::default();

    for (&(t, q), group) in &groups {
        if group.len() < 2 {
            continue;
        }
        let tstart_spread = spread(group.iter().map(|r| r.tstart));
        let tstop_spread = spread(group.iter().map(|r| r.tstop));
        let qstart_spread = spread(group.iter().map(|r| r.qstart));
        let qstop_spread = spread(group.iter().map(|r| r.qstop));

        if tstart_spread < threshold && tstop_spread < threshold {
            flagged_t.insert(t);
        }
        if qstart_spread < threshold && qstop_spread < threshold {
            flagged_q.insert(q);
        }
    }

    groups
        .into_iter()
        .filter(|((t, q), _)| !flagged_t.contains(t) && !flagged_q.contains(q))
        .flat_map(|(_, group)| group)
        .collect()
}
