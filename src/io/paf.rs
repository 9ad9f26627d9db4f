//! Byte-level PAF parsing: an ordinary line-oriented TSV grammar, not part of
//! the scaffolding algorithm itself.

use crate::error::IngestError;
use std::io::BufRead;
use std::path::Path;

/// One raw PAF row, columns 0..=11, before sample-prefixing or interning.
#[derive(Debug, Clone)]
pub struct RawPafRow {
    pub qname: String,
    pub qlen: u32,
    pub qstart: u32,
    pub qstop: u32,
    pub strand: char,
    pub tname: String,
    pub tlen: u32,
    pub tstart: u32,
    pub tstop: u32,
    pub nb_match: u32,
    pub nb_base: u32,
    pub mapping_quality: u8,
}

/// Reads every row of one PAF file, keeping the first 12 columns and
/// discarding columns >= 12 (SAM-style optional tags) unparsed.
///
/// Aborts the *whole file* with [`IngestError`] on the first malformed row —
/// bad rows are not skipped or retried (§4.A).
pub fn read_paf_file(path: &Path) -> Result<Vec<RawPafRow>, IngestError> {
    let file = std::fs::File::open(path).map_err(|source| IngestError::Io { path: path.to_owned(), source })?;
    let reader = std::io::BufReader::new(file);

    let mut rows = Vec::new();
    for (line_no, line) in reader.lines().enumerate() {
        let line_no = line_no as u64 + 1;
        let line = line.map_err(|source| IngestError::Io { path: path.to_owned(), source })?;
        if line.is_empty() {
            continue;
        }
        rows.push(parse_row(path, line_no, &line)?);
    }
    Ok(rows)
}

fn parse_row(path: &Path, line_no: u64, line: &str) -> Result<RawPafRow, IngestError> {
    let columns: Vec<&str> = line.split('\t').collect();
    if columns.len() < 12 {
        return Err(malformed(path, line_no, format!("expected >= 12 tab-separated columns, found {}", columns.len())));
    }

    let parse_u32 = |col: usize, name: &str| -> Result<u32, IngestError> {
        columns[col]
            .parse::<u32>()
            .map_err(|_| malformed(path, line_no, format!("column {col} ({name}) is not a non-negative integer: {:?}", columns[col])))
    };
    let parse_u8 = |col: usize, name: &str| -> Result<u8, IngestError> {
        columns[col]
            .parse::<u8>()
            .map_err(|_| malformed(path, line_no, format!("column {col} ({name}) is not a valid integer: {:?}", columns[col])))
    };

    let strand = columns[4]
        .chars()
        .next()
        .filter(|c| *c == '+' || *c == '-')
        .ok_or_else(|| malformed(path, line_no, format!("column 4 (strand) must be '+' or '-', got {:?}", columns[4])))?;

    Ok(RawPafRow {
        qname: columns[0].to_string(),
        qlen: parse_u32(1, "Qlen")?,
        qstart: parse_u32(2, "Qstart")?,
        qstop: parse_u32(3, "Qstop")?,
        strand,
        tname: columns[5].to_string(),
        tlen: parse_u32(6, "Tlen")?,
        tstart: parse_u32(7, "Tstart")?,
        tstop: parse_u32(8, "Tstop")?,
        nb_match: parse_u32(9, "NbMatch")?,
        nb_base: parse_u32(10, "NbBase")?,
        mapping_quality: parse_u8(11, "MappingQuality")?,
    })
}

fn malformed(path: &Path, line: u64, reason: String) -> IngestError {
    IngestError::MalformedRow { path: path.to_owned(), line, reason }
}
