use std::{fs, path::Path};

use serde::Deserialize;
use tracing::debug;

use crate::{
    error::{Error, Result},
    DEFAULT_CONFIG_FILE,
};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCfg {
    #[serde(default)]
    pub cnote: RawCnoteCfg,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RawCnoteCfg {
    /// Overrides the SCM base URL from the project descriptor.
    pub repository: Option<String>,
    /// Overrides `$EDITOR` for the interactive selection.
    pub editor: Option<String>,
}

impl RawCfg {
    /// Loads the optional config file from the repository root; a missing
    /// file simply yields the defaults.
    pub fn load(root: &Path) -> Result<RawCfg> {
        let file = root.join(DEFAULT_CONFIG_FILE);
        if !file.is_file() {
            return Ok(RawCfg::default());
        }
        debug!("reading config file {}", file.display());
        let raw = fs::read_to_string(&file)?;
        toml::from_str(&raw).map_err(|_| Error::ConfigParse(file))
    }
}
