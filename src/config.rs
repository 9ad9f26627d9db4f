//! Validated, immutable pipeline configuration (§3 `PipelineConfig`,
//! §4.K). This is the one place user-supplied thresholds are rejected,
//! before any file is opened.

use crate::cli::ScaffoldArgs;
use crate::error::ConfigError;
use std::num::NonZeroUsize;

#[derive(Debug, Clone, Copy)]
pub struct PipelineConfig {
    pub nb_match_min: u32,
    pub id_seq_min: f64,
    /// §4.D relaxed threshold for match recovery; defaults to three quarters
    /// of `id_seq_min` when not overridden.
    pub relaxed_id_seq_min: f64,
    /// §4.F repeat-filter coordinate-spread threshold.
    pub repeat_spread_threshold: u32,
    /// §4.H end-proximity gate (the `100_000` constant), overridable for
    /// tests on small synthetic contigs.
    pub end_proximity: u32,
    pub display: bool,
    /// §9(c) `tails` extension, opt-in only.
    pub enable_tails: bool,
    pub jobs: NonZeroUsize,
}

impl PipelineConfig {
    pub fn try_from_args(args: &ScaffoldArgs) -> Result<PipelineConfig, ConfigError> {
        if args.nbmatch < 0 {
            return Err(ConfigError::NegativeNbMatch(args.nbmatch));
        }
        if !(0.0..=1.0).contains(&args.idseq) {
            return Err(ConfigError::IdSeqOutOfRange(args.idseq));
        }
        let jobs = match args.jobs {
            Some(j) if j < 1 => return Err(ConfigError::InvalidJobs(j)),
            Some(j) => NonZeroUsize::new(j as usize).expect("checked positive above"),
            None => std::thread::available_parallelism().unwrap_or(NonZeroUsize::new(1).unwrap()),
        };

        Ok(PipelineConfig {
            nb_match_min: args.nbmatch as u32,
            id_seq_min: args.idseq,
            relaxed_id_seq_min: args.idseq * 0.75,
            repeat_spread_threshold: args.repeat_threshold,
            end_proximity: args.end_proximity,
            display: args.display,
            enable_tails: args.enable_tails,
            jobs,
        })
    }

    #[cfg(test)]
    pub fn for_tests() -> PipelineConfig {
        PipelineConfig {
            nb_match_min: 10_000,
            id_seq_min: 0.90,
            relaxed_id_seq_min: 0.60,
            repeat_spread_threshold: 3_000,
            end_proximity: 100_000,
            display: false,
            enable_tails: false,
            jobs: NonZeroUsize::new(1).unwrap(),
        }
    }
}
