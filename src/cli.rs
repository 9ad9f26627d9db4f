use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct ScaffoldArgs {
    /// Directory of PAF alignment files, one per sample.
    pub paf_dir: PathBuf,

    #[arg(long)]
    /// Minimum matching-base count for a record to be considered
    /// high-confidence (§4.B `NbMatchMin`).
    pub nbmatch: i64,

    #[arg(long)]
    /// Minimum identity ratio in [0, 1] for a record to be considered
    /// high-confidence (§4.B `IdSeqMin`).
    pub idseq: f64,

    #[arg(long)]
    /// Print a per-cluster trace (BFS/linearisation detail) at debug level.
    pub display: bool,

    #[arg(short, long)]
    /// Output file for the scaffold table; defaults to stdout.
    pub output: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormatArg::Tsv)]
    /// Output table delimiter.
    pub format: OutputFormatArg,

    #[arg(long)]
    /// Number of worker threads for the per-cluster pool (§5). Defaults
    /// to the available parallelism.
    pub jobs: Option<i64>,

    #[arg(long, default_value_t = 3_000)]
    /// Coordinate-spread threshold for the repeat filter (§4.F).
    pub repeat_threshold: u32,

    #[arg(long, default_value_t = 100_000)]
    /// End-proximity gate used by the verifier (§4.H), overridable for
    /// tests against small synthetic contigs.
    pub end_proximity: u32,

    #[arg(long)]
    /// Enable the optional `tails` extension (§9(c)), disabled by
    /// default in the reference driver.
    pub enable_tails: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Csv,
    Tsv,
}

impl From<OutputFormatArg> for crate::io::writer::OutputFormat {
    fn from(value: OutputFormatArg) -> Self {
        match value {
            OutputFormatArg::Csv => crate::io::writer::OutputFormat::Csv,
            OutputFormatArg::Tsv => crate::io::writer::OutputFormat::Tsv,
        }
    }
}
