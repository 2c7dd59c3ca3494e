use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;

use crate::data::refine::RefineOptions;

// ---------------------------------------------------------------------------
// Command-line / environment configuration
// ---------------------------------------------------------------------------

/// Climate Impact and Correlation Analyzer API server.
#[derive(Debug, Clone, Parser)]
#[command(name = "climate-analyzer", version, about)]
pub struct Config {
    /// Dataset file (.json, .csv or .parquet).
    #[arg(long, env = "CLIMATE_DATA", default_value = "data/jsondata.json")]
    pub data: PathBuf,

    /// Address the HTTP server binds to.
    #[arg(long, env = "CLIMATE_BIND", default_value = "127.0.0.1:5000")]
    pub bind: SocketAddr,

    /// Column rename applied after loading, as OLD=NEW. Repeatable.
    #[arg(long = "rename", env = "CLIMATE_RENAME", value_delimiter = ',')]
    pub renames: Vec<String>,

    /// Default log filter when RUST_LOG is unset.
    #[arg(long, env = "CLIMATE_LOG", default_value = "info")]
    pub log_level: String,
}

impl Config {
    /// Parse `--rename` pairs into refine options.
    pub fn refine_options(&self) -> Result<RefineOptions> {
        let mut renames = Vec::with_capacity(self.renames.len());
        for pair in &self.renames {
            let Some((old, new)) = pair.split_once('=') else {
                bail!("Invalid rename '{pair}': expected OLD=NEW");
            };
            let (old, new) = (old.trim(), new.trim());
            if old.is_empty() || new.is_empty() {
                bail!("Invalid rename '{pair}': column names must not be empty");
            }
            renames.push((old.to_string(), new.to_string()));
        }
        Ok(RefineOptions { renames })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::try_parse_from(["climate-analyzer"]).unwrap();
        assert_eq!(config.bind, "127.0.0.1:5000".parse().unwrap());
        assert_eq!(config.log_level, "info");
        assert!(config.refine_options().unwrap().renames.is_empty());
    }

    #[test]
    fn test_renames() {
        let config = Config::try_parse_from([
            "climate-analyzer",
            "--data",
            "climate.parquet",
            "--rename",
            "Country=country, Region =region",
            "--rename",
            "topic=theme",
        ])
        .unwrap();
        assert_eq!(config.data, PathBuf::from("climate.parquet"));
        assert_eq!(
            config.refine_options().unwrap().renames,
            vec![
                ("Country".to_string(), "country".to_string()),
                ("Region".to_string(), "region".to_string()),
                ("topic".to_string(), "theme".to_string()),
            ]
        );
    }

    #[test]
    fn test_invalid_rename() {
        let config = Config::try_parse_from(["climate-analyzer", "--rename", "country"]).unwrap();
        assert!(config.refine_options().is_err());
        let config = Config::try_parse_from(["climate-analyzer", "--rename", "=country"]).unwrap();
        assert!(config.refine_options().is_err());
    }
}
