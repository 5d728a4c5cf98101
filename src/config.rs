// File: src/config.rs
//! Alignment settings, loaded from TOML.
//!
//! ```toml
//! multi_unit = true
//! vowel_threshold = 0.3
//! consonant_threshold = 0.2
//! tables = "data/costs.json"
//! cache = "data/costs.bin"
//! ```

use crate::error::{Error, Result};
use crate::fuzzy::cost::Thresholds;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Environment variable naming a config file when none is given explicitly.
pub const CONFIG_ENV_VAR: &str = "HANGUL_ALIGN_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AlignConfig {
    /// Allow a reference vowel to absorb a run of stretched raw vowels.
    pub multi_unit: bool,
    pub vowel_threshold: f64,
    pub consonant_threshold: f64,
    /// JSON table document; the built-in uniform tables when absent.
    pub tables: Option<PathBuf>,
    /// bincode cache of the compiled tables.
    pub cache: Option<PathBuf>,
}

impl Default for AlignConfig {
    fn default() -> Self {
        let thresholds = Thresholds::default();
        Self {
            multi_unit: true,
            vowel_threshold: thresholds.vowel,
            consonant_threshold: thresholds.consonant,
            tables: None,
            cache: None,
        }
    }
}

impl AlignConfig {
    pub fn from_toml_str(toml: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(toml).map_err(|e| Error::Config(format!("invalid TOML: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let toml = std::fs::read_to_string(path)?;
        Self::from_toml_str(&toml)
    }

    /// Resolution order:
    /// 1. `cli_path`, when given
    /// 2. the file named by [`CONFIG_ENV_VAR`]
    /// 3. defaults
    ///
    /// A named file that does not exist falls back to defaults with a
    /// warning; a file that exists but does not parse is an error.
    pub fn resolve(cli_path: Option<&Path>) -> Result<Self> {
        let env_path = std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from);
        let Some(path) = cli_path.map(Path::to_path_buf).or(env_path) else {
            debug!("no config file named, using defaults");
            return Ok(Self::default());
        };
        if !path.exists() {
            warn!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }
        debug!(path = %path.display(), "loading config");
        Self::from_file(&path)
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("vowel_threshold", self.vowel_threshold),
            ("consonant_threshold", self.consonant_threshold),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::Config(format!(
                    "{name} must be a finite, non-negative number, got {value}"
                )));
            }
        }
        Ok(())
    }

    pub fn thresholds(&self) -> Thresholds {
        Thresholds {
            vowel: self.vowel_threshold,
            consonant: self.consonant_threshold,
        }
    }
}
