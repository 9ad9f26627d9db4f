use clap::Parser;
use scafflinker::cli::ScaffoldArgs;
use scafflinker::config::PipelineConfig;
use scafflinker::error::ScaffLinkerError;
use scafflinker::io::writer::{write_scaffolds, OutputFormat};
use scafflinker::pipeline::{driver, ingest};
use scafflinker::utils::intern::Interner;
use std::io::Write;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = ScaffoldArgs::parse();

    let level = if args.display { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &ScaffoldArgs) -> Result<(), ScaffLinkerError> {
    let config = PipelineConfig::try_from_args(args)?;

    let mut interner = Interner::new();
    let records = ingest::ingest(&args.paf_dir, &mut interner)?;
    log::info!("ingested {} records from {}", records.len(), args.paf_dir.display());

    let scaffolds = driver::run(&records, &interner, &config);
    log::info!("emitted {} scaffold(s)", scaffolds.len());

    let format: OutputFormat = args.format.into();
    match &args.output {
        Some(path) => {
            let file = std::fs::File::create(path)?;
            write_scaffolds(file, &scaffolds, format)?;
        }
        None => {
            let stdout = std::io::stdout();
            write_scaffolds(stdout.lock(), &scaffolds, format)?;
            std::io::stdout().flush()?;
        }
    }

    Ok(())
}
