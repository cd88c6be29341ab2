use std::time::Instant;
use common::types::config::PipelineConfig;
use common::util::logging;
use data_harvester::step1_load::{load_data, LoadStepOutput};
use data_harvester::step2_enrich_time::{enrich_time, EnrichStepOutput};
use data_harvester::step3_label_trips::{label_trips, LabelStepOutput};
use data_harvester::step4_summarize::{summarize, SummaryStepOutput, Totals};
use log::{debug, info};
use polars::frame::DataFrame;
use crate::CabtraceError;

pub struct PipelineOutput {
    pub reports: DataFrame,
    pub totals: Totals,
}

/// Loads the traces, adds the time fields and labels pick ups and drop offs
pub fn run_pipeline(config: &PipelineConfig) -> Result<PipelineOutput, CabtraceError> {
    info!(target: "main", "Reading traces from {:?}", config.data_path);
    let start_time = Instant::now();

    let LoadStepOutput { reports, files } =
        logging::run_with_spinner("load", "Loading trace files", || load_data(&config.data_path))?;
    debug!(target: "load", "Loaded {} files", files.len());

    let EnrichStepOutput { reports } =
        logging::run_with_spinner("enrich", "Formatting time related fields", || {
            enrich_time(reports, config.time_reference)
        })?;

    let LabelStepOutput { reports } = logging::run_with_spinner(
        "label",
        "Adding pick up and drop off flags and miles",
        || label_trips(reports),
    )?;

    let SummaryStepOutput { per_vehicle, totals } = summarize(&reports)?;
    debug!(target: "summary", "Per vehicle summary:\n{}", per_vehicle);

    let elapsed = indicatif::HumanDuration(start_time.elapsed());
    info!(target: "summary", "{} (took {})", totals, elapsed);

    Ok(PipelineOutput { reports, totals })
}
