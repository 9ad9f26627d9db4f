//! Scaffold table serialisation: writes the final scaffold rows out as a
//! delimited table, one per emitted scaffold.

use crate::pipeline::scaffold::{ScaffoldRow, ScaffoldType};
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Csv,
    Tsv,
}

impl OutputFormat {
    fn delimiter(self) -> u8 {
        match self {
            OutputFormat::Csv => b',',
            OutputFormat::Tsv => b'\t',
        }
    }
}

/// Writes every scaffold to `out`, one `csv`/`tsv` table per scaffold, each
/// with its own header row, separated by a blank line, mirroring the
/// reference driver printing one table per cluster.
pub fn write_scaffolds<W: Write>(mut out: W, scaffolds: &[Vec<ScaffoldRow>], format: OutputFormat) -> std::io::Result<()> {
    for (i, scaffold) in scaffolds.iter().enumerate() {
        if i > 0 {
            writeln!(out)?;
        }

        let mut writer = csv::WriterBuilder::new().delimiter(format.delimiter()).from_writer(&mut out);
        writer.write_record(["Contig_name", "Start", "End", "reverse", "len", "Type"])?;
        for row in scaffold {
            writer.write_record(&[
                row.contig_name.clone(),
                row.start.to_string(),
                row.end.to_string(),
                row.reverse.to_string(),
                row.len.to_string(),
                match row.ty {
                    ScaffoldType::Target => "T".to_string(),
                    ScaffoldType::Query => "Q".to_string(),
                },
            ])?;
        }
        writer.flush()?;
    }
    Ok(())
}
