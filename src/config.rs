use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::{HistoryError, HistoryResult};

pub const DEFAULT_OUTPUT: &str = "ssq_history.csv";
pub const DEFAULT_COUNT: i64 = 5000;
pub const DEFAULT_SEED: u64 = 42;

/// Generator settings after merging config file and command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    pub output: PathBuf,
    pub count: i64,
    pub seed: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            output: PathBuf::from(DEFAULT_OUTPUT),
            count: DEFAULT_COUNT,
            seed: DEFAULT_SEED,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawGenerate {
    #[serde(default)]
    pub output: Option<PathBuf>,
    #[serde(default)]
    pub count: Option<i64>,
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    #[serde(default)]
    pub generate: RawGenerate,
}

impl GeneratorConfig {
    /// Apply command-line values on top of `self`; `None` keeps the current value.
    pub fn with_overrides(
        mut self,
        output: Option<PathBuf>,
        count: Option<i64>,
        seed: Option<u64>,
    ) -> Self {
        if let Some(o) = output {
            self.output = o;
        }
        if let Some(c) = count {
            self.count = c;
        }
        if let Some(s) = seed {
            self.seed = s;
        }
        self
    }
}

pub fn parse_generator_config(s: &str) -> HistoryResult<GeneratorConfig> {
    let raw: RawConfig = toml::from_str(s).map_err(|e| HistoryError::Message(e.to_string()))?;
    Ok(GeneratorConfig::default().with_overrides(
        raw.generate.output,
        raw.generate.count,
        raw.generate.seed,
    ))
}

pub fn load_generator_config(path: &Path) -> HistoryResult<GeneratorConfig> {
    let s = std::fs::read_to_string(path).map_err(|e| HistoryError::io(path, e))?;
    parse_generator_config(&s)
}
