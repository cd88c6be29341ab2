use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use indicatif_log_bridge::LogWrapper;
use log::{info, LevelFilter, SetLoggerError};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

static MULTI: OnceLock<MultiProgress> = OnceLock::new();

pub fn initialize_logging(log_level: LevelFilter) -> Result<(), SetLoggerError> {
    let logger = env_logger::builder()
        .filter_level(log_level)
        .parse_default_env() // Allow overriding log level through RUST_LOG env var
        .build();
    let max_level = logger.filter();

    let multi = MULTI.get_or_init(MultiProgress::new).clone();

    LogWrapper::new(multi, logger).try_init()?;
    log::set_max_level(max_level);

    Ok(())
}

pub fn run_with_spinner<'a, F, Out>(
    target: &'a str, task_desc: &'a str, function: F,
) -> Out where
    F: FnOnce() -> Out,
{
    let start_time = Instant::now();

    let pb = ProgressBar::new_spinner()
        .with_message(format!("{}...", task_desc))
        .with_style(
            ProgressStyle::with_template("{spinner:.white} [{elapsed:.green}] {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );

    // Set up connection with log library so that progress bars don't jump around
    let pb = match MULTI.get() {
        Some(multi) => multi.add(pb),
        None => pb,
    };
    pb.enable_steady_tick(Duration::from_millis(100));

    let out = function();

    pb.finish_and_clear();
    if let Some(multi) = MULTI.get() {
        multi.remove(&pb);
    }
    let elapsed = indicatif::HumanDuration(start_time.elapsed());
    info!(target: target, "{} finished (took {})", task_desc, elapsed);

    out
}
