//! Fatal error kinds. Everything else (`EmptyCluster`, `DegenerateScaffold`)
//! is a local, non-fatal skip represented with plain control flow — see
//! `pipeline::driver`.

use std::path::PathBuf;
use thiserror::Error;

/// Failures while reading the PAF directory. Aborts the whole run.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to read PAF directory {path}: {source}")]
    Directory { path: PathBuf, source: std::io::Error },

    #[error("failed to open PAF file {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },

    #[error("{path}: malformed row at line {line}: {reason}")]
    MalformedRow { path: PathBuf, line: u64, reason: String },

    #[error("{path}: could not determine a sample name from the file name")]
    NoSampleName { path: PathBuf },
}

/// Failures validating CLI-supplied thresholds. Aborts before any I/O.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("--idseq must be in [0, 1], got {0}")]
    IdSeqOutOfRange(f64),

    #[error("--nbmatch must be a non-negative integer, got {0}")]
    NegativeNbMatch(i64),

    #[error("--jobs must be at least 1, got {0}")]
    InvalidJobs(i64),
}

/// Top-level error returned by `main`.
#[derive(Debug, Error)]
pub enum ScaffLinkerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error("failed to write scaffold output: {0}")]
    Output(#[from] std::io::Error),
}
