use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use coin_shooter_session::SessionConfig;
use coin_shooter_system_claim::ClaimConfig;
use serde::{Deserialize, Serialize};

/// File looked up in the data directory when no `--config` is given.
pub(crate) const DEFAULT_CONFIG_FILE: &str = "coin-shooter.toml";

/// Settings read from the optional TOML file.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct CliConfig {
    /// Arena and pacing parameters.
    pub(crate) session: SessionConfig,
    /// Reward contract description.
    pub(crate) claim: ClaimConfig,
    /// Name credited by the offline ledger.
    pub(crate) player: Option<String>,
}

impl CliConfig {
    /// Loads `explicit` when given, otherwise the default file in `data_dir` if it exists.
    pub(crate) fn load(explicit: Option<&Path>, data_dir: &Path) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let fallback: PathBuf = data_dir.join(DEFAULT_CONFIG_FILE);
                if !fallback.exists() {
                    log::debug!("no config file at {}, using defaults", fallback.display());
                    return Ok(Self::default());
                }
                fallback
            }
        };

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("could not read config file {}", path.display()))?;
        Self::parse(&contents).with_context(|| format!("invalid config file {}", path.display()))
    }

    fn parse(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }
}
