use clap::Parser;
use common::types::config::TimeReference;
use common::util::df::FileType;
use log::LevelFilter;

#[derive(Parser, Clone)]
#[command(version, about)]
pub struct BootstrapConfig {
    /// Directory with the trace files, or a single trace file. Overrides `data_path` of the config file.
    #[clap(short('d'), long("data"), env("CABTRACE_DATA"))]
    pub data_path: Option<String>,
    #[clap(short('c'), long("config"), env("CABTRACE_CONFIG"))]
    pub config_file: Option<String>,
    #[clap(short('l'), long("log-level"), env("CABTRACE_LOG_LEVEL"), default_value_t, value_enum)]
    pub log_level: LogLevel,
    #[clap(short('t'), long("time-reference"), env("CABTRACE_TIME_REFERENCE"), value_enum)]
    pub time_reference: Option<TimeReferenceArg>,
    /// Write the labeled reports to this file
    #[clap(short('o'), long("output"))]
    pub output: Option<String>,
    #[clap(short('f'), long("output-format"), default_value_t, value_enum)]
    pub output_format: OutputFormat,
}

impl BootstrapConfig {
    pub fn read() -> Self {
        BootstrapConfig::parse()
    }
}


#[derive(clap::ValueEnum, Clone, Default)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Off => Self::Off,
            LogLevel::Error => Self::Error,
            LogLevel::Warn => Self::Warn,
            LogLevel::Info => Self::Info,
            LogLevel::Debug => Self::Debug,
            LogLevel::Trace => Self::Trace,
        }
    }
}

#[derive(clap::ValueEnum, Clone, Copy)]
pub enum TimeReferenceArg {
    Local,
    Utc,
}

impl From<TimeReferenceArg> for TimeReference {
    fn from(value: TimeReferenceArg) -> Self {
        match value {
            TimeReferenceArg::Local => Self::Local,
            TimeReferenceArg::Utc => Self::Utc,
        }
    }
}

#[derive(clap::ValueEnum, Clone, Copy, Default)]
pub enum OutputFormat {
    #[default]
    Csv,
    Parquet,
    Ipc,
}

impl From<OutputFormat> for FileType {
    fn from(value: OutputFormat) -> Self {
        match value {
            OutputFormat::Csv => Self::CSV,
            OutputFormat::Parquet => Self::PARQUET,
            OutputFormat::Ipc => Self::IPC,
        }
    }
}
