pub mod bootstrap_config;
mod config;
mod pipeline;

use crate::config::load_config;
use crate::pipeline::{run_pipeline, PipelineOutput};
use bootstrap_config::BootstrapConfig;
use common::util::df::write_df_to_file;
use common::util::logging;
use data_harvester::step1_load::LoadError;
use data_harvester::step2_enrich_time::EnrichError;
use data_harvester::step3_label_trips::LabelError;
use data_harvester::step4_summarize::SummarizeError;
use log::{error, info};
use polars::error::PolarsError;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::process::ExitCode;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(target: "main", "{}", err);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), CabtraceError> {
    let bootstrap_config = BootstrapConfig::read();

    if let Err(err) = logging::initialize_logging(bootstrap_config.log_level.clone().into()) {
        eprintln!("Could not initialize logging: {err}");
    }
    print_startup_message();

    let config = load_config(&bootstrap_config)?;

    let PipelineOutput { reports, .. } = run_pipeline(&config)?;

    if let Some(output) = bootstrap_config.output {
        let path = PathBuf::from(output);
        logging::run_with_spinner("main", "Writing labeled reports", || {
            write_df_to_file(path.clone(), bootstrap_config.output_format.into(), reports)
        })
        .map_err(CabtraceError::Write)?;
        info!(target: "main", "Labeled reports written to {:?}", path);
    }

    Ok(())
}

fn print_startup_message() {
    info!(target: "main", "cabtrace {}: taxi trace labeling", env!("CARGO_PKG_VERSION"));
}

#[derive(thiserror::Error, Debug)]
pub enum CabtraceError {
    Config(#[from] config::ConfigError),
    Load(#[from] LoadError),
    Enrich(#[from] EnrichError),
    Label(#[from] LabelError),
    Summarize(#[from] SummarizeError),
    Write(PolarsError),
}

impl Display for CabtraceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let err: &dyn Display = match self {
            CabtraceError::Config(err) => err,
            CabtraceError::Load(err) => err,
            CabtraceError::Enrich(err) => err,
            CabtraceError::Label(err) => err,
            CabtraceError::Summarize(err) => err,
            CabtraceError::Write(err) => err,
        };
        let prefix = match self {
            CabtraceError::Config(_) => "Reading config",
            CabtraceError::Load(_) => "Loading traces",
            CabtraceError::Enrich(_) => "Formatting time fields",
            CabtraceError::Label(_) => "Labeling trips",
            CabtraceError::Summarize(_) => "Summarizing trips",
            CabtraceError::Write(_) => "Writing output",
        };
        write!(f, "{}: {}", prefix, err)
    }
}
