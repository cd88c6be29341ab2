use crate::bootstrap_config::BootstrapConfig;
use common::types::config::PipelineConfig;
use log::info;
use std::fmt::{Display, Formatter};
use std::fs::File;
use std::path::{Path, PathBuf};

/// Builds the pipeline config from the optional config file, with command line values taking
/// precedence over the file.
pub(super) fn load_config(bootstrap_config: &BootstrapConfig) -> Result<PipelineConfig, ConfigError> {
    let from_file = match &bootstrap_config.config_file {
        Some(path) => Some(read_config_file(Path::new(path))?),
        None => None,
    };

    let data_path = bootstrap_config.data_path.clone().map(PathBuf::from)
        .or_else(|| from_file.as_ref().map(|config| config.data_path.clone()))
        .ok_or(ConfigError::MissingDataPath)?;

    let time_reference = bootstrap_config.time_reference.map(Into::into)
        .or_else(|| from_file.as_ref().map(|config| config.time_reference))
        .unwrap_or_default();

    Ok(PipelineConfig { data_path, time_reference })
}

fn read_config_file(path: &Path) -> Result<PipelineConfig, ConfigError> {
    let config_file = File::open(path)?;
    let config: PipelineConfig = serde_yml::from_reader(config_file)?;

    info!(target: "main", "Config read successfully from '{path:?}'");

    Ok(config)
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    IO(#[from] std::io::Error),
    Yaml(#[from] serde_yml::Error),
    MissingDataPath,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IO(err) => write!(f, "{err}"),
            ConfigError::Yaml(err) => write!(f, "Invalid config file: {err}"),
            ConfigError::MissingDataPath => write!(f, "No data path given. Use --data or set `data_path` in the config file"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use common::types::config::TimeReference;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn config_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_command_line_only() {
        let bootstrap = BootstrapConfig::try_parse_from(["cabtrace", "-d", "traces"]).unwrap();

        let config = load_config(&bootstrap).unwrap();

        assert_eq!(config.data_path, PathBuf::from("traces"));
        assert_eq!(config.time_reference, TimeReference::Local);
    }

    #[test]
    fn test_command_line_overrides_file() {
        let file = config_file("data_path: ./from-file\ntime_reference: utc\n");
        let path = file.path().to_str().unwrap();

        let from_file = load_config(&BootstrapConfig::try_parse_from(["cabtrace", "-c", path]).unwrap()).unwrap();
        assert_eq!(from_file.data_path, PathBuf::from("./from-file"));
        assert_eq!(from_file.time_reference, TimeReference::Utc);

        let overridden = load_config(
            &BootstrapConfig::try_parse_from(["cabtrace", "-c", path, "-d", "./cli", "-t", "local"]).unwrap()
        ).unwrap();
        assert_eq!(overridden.data_path, PathBuf::from("./cli"));
        assert_eq!(overridden.time_reference, TimeReference::Local);
    }

    #[test]
    fn test_missing_data_path() {
        let bootstrap = BootstrapConfig::try_parse_from(["cabtrace"]).unwrap();

        assert!(matches!(load_config(&bootstrap), Err(ConfigError::MissingDataPath)));
    }

    #[test]
    fn test_invalid_file() {
        let file = config_file("time_reference: sometimes\n");
        let bootstrap = BootstrapConfig::try_parse_from(["cabtrace", "-c", file.path().to_str().unwrap()]).unwrap();

        assert!(matches!(load_config(&bootstrap), Err(ConfigError::Yaml(_))));
    }
}
