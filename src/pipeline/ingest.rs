//! §4.A Ingest & normalise.

use crate::error::IngestError;
use crate::io::{paf::read_paf_file, sample::extract_sample_name};
use crate::model::{AlignmentRecord, Strand};
use crate::utils::intern::Interner;
use std::path::Path;

const MAPPING_QUALITY_MIN: u8 = 40;

/// Loads every PAF file in `paf_dir`, applies the mapping-quality gate,
/// prefixes `Qname` with `"<sample>$"`, and computes `IdSeq`.
///
/// Fails with [`IngestError`] when a file is unreadable, has fewer than 12
/// columns, or its name carries no sample suffix. Bad rows within a readable
/// file are not skipped — the whole file aborts (§4.A).
pub fn ingest(paf_dir: &Path, interner: &mut Interner) -> Result<Vec<AlignmentRecord>, IngestError> {
    let entries = std::fs::read_dir(paf_dir)
        .map_err(|source| IngestError::Directory { path: paf_dir.to_owned(), source })?;

    let mut paths: Vec<_> = entries
        .map(|e| e.map(|e| e.path()).map_err(|source| IngestError::Directory { path: paf_dir.to_owned(), source }))
        .collect::<Result<_, _>>()?;
    paths.sort();

    let mut records = Vec::new();
    for path in paths {
        if !path.is_file() {
            continue;
        }
        let sample = extract_sample_name(&path)?;
        let rows = read_paf_file(&path)?;
        log::info!("ingest: {} rows from {} (sample={sample})", rows.len(), path.display());

        for row in rows {
            if row.mapping_quality <= MAPPING_QUALITY_MIN {
                continue;
            }
            let qname = interner.intern(&format!("{sample}${}", row.qname));
            let tname = interner.intern(&row.tname);
            let id_seq = row.nb_match as f64 / row.nb_base as f64;

            let record = AlignmentRecord {
                qname,
                qlen: row.qlen,
                qstart: row.qstart,
                qstop: row.qstop,
                strand: Strand::from_char(row.strand).expect("validated by io::paf"),
                tname,
                tlen: row.tlen,
                tstart: row.tstart,
                tstop: row.tstop,
                nb_match: row.nb_match,
                nb_base: row.nb_base,
                id_seq,
                reverse_t: false,
                reverse_q: false,
            };
            debug_assert!(record.check_invariants());
            records.push(record);
        }
    }

    Ok(records)
}
