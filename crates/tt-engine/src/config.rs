//! Engine configuration loaded from YAML or JSON.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tt_core::{from_json_slice, ErrorInfo, TimetableError};
use tt_search::{CancelToken, SearchOptions};

use crate::materialize::Naming;

fn config_error(code: &str, message: impl Into<String>) -> TimetableError {
    TimetableError::Config(ErrorInfo::new(code, message))
}

/// How materialized schedules are named.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamingStyle {
    /// `<rank>`.
    Rank,
    /// `<label>_<rank>`; requires `label`.
    Label,
    /// `credits-<total credit>_<rank>`.
    #[default]
    Credits,
}

/// Naming section of [`EngineConfig`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NamingConfig {
    /// Identifier style.
    pub style: NamingStyle,
    /// Label used by [`NamingStyle::Label`].
    pub label: Option<String>,
}

impl NamingConfig {
    /// Resolves the configured naming scheme.
    pub fn naming(&self) -> Result<Naming, TimetableError> {
        match (self.style, &self.label) {
            (NamingStyle::Rank, _) => Ok(Naming::RankOnly),
            (NamingStyle::Credits, _) => Ok(Naming::Credits),
            (NamingStyle::Label, Some(label)) if !label.trim().is_empty() => {
                Ok(Naming::Label(label.clone()))
            }
            (NamingStyle::Label, _) => Err(TimetableError::Config(
                ErrorInfo::new("config-naming-label", "label naming needs a non-empty label")
                    .with_hint("set naming.label or pick style rank or credits"),
            )),
        }
    }
}

/// Runtime knobs of the [`Engine`](crate::Engine). Every field has a default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Search worker threads; `1` searches on the calling thread.
    pub threads: usize,
    /// Wall-clock budget per run in milliseconds.
    pub deadline_ms: Option<u64>,
    /// Cap on feasible schedules examined per run.
    pub max_feasible: Option<u64>,
    /// Append a history record when results come from the cache.
    pub history_on_cache_hit: bool,
    /// Identifier scheme for materialized schedules.
    pub naming: NamingConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            threads: 1,
            deadline_ms: None,
            max_feasible: None,
            history_on_cache_hit: true,
            naming: NamingConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Checks value ranges and the naming section.
    pub fn validate(&self) -> Result<(), TimetableError> {
        if self.threads == 0 {
            return Err(config_error("config-threads", "threads must be at least 1"));
        }
        if self.max_feasible == Some(0) {
            return Err(config_error("config-max-feasible", "max_feasible must be at least 1"));
        }
        self.naming.naming().map(|_| ())
    }

    /// Search options for one run, layering the configured deadline on top
    /// of the caller's token.
    pub fn search_options(&self, cancel: &CancelToken) -> SearchOptions {
        let cancel = match self.deadline_ms {
            Some(ms) => cancel.limited_to(Duration::from_millis(ms)),
            None => cancel.clone(),
        };
        let options = SearchOptions::sequential()
            .with_threads(self.threads)
            .with_cancel(cancel);
        match self.max_feasible {
            Some(max) => options.with_max_feasible(max),
            None => options,
        }
    }
}

/// Loads and validates a configuration; `.yaml`/`.yml` are read as YAML and
/// `.json` as JSON.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<EngineConfig, TimetableError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|err| {
        TimetableError::Config(
            ErrorInfo::new("config-read", "failed to read engine configuration")
                .with_context("path", path.display().to_string())
                .with_hint(err.to_string()),
        )
    })?;
    let config: EngineConfig = match path.extension().and_then(|ext| ext.to_str()) {
        Some("yaml") | Some("yml") => serde_yaml::from_slice(&bytes).map_err(|err| {
            TimetableError::Config(
                ErrorInfo::new("config-parse", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })?,
        Some("json") => from_json_slice(&bytes).map_err(|err| {
            TimetableError::Config(
                ErrorInfo::new("config-parse", err.info().message.clone())
                    .with_context("path", path.display().to_string()),
            )
        })?,
        _ => {
            return Err(TimetableError::Config(
                ErrorInfo::new("config-format", "unsupported configuration format")
                    .with_context("path", path.display().to_string())
                    .with_hint("use a .yaml, .yml or .json file"),
            ))
        }
    };
    config.validate()?;
    Ok(config)
}
