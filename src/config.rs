//! Service configuration.
//!
//! Precedence: CLI flags > environment > config file > defaults.

use crate::errors::ServiceError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_BIND: &str = "127.0.0.1:8080";
pub const DEFAULT_COLLECTION: &str = "pmData";
pub const CONFIG_FILE_NAME: &str = "pmservice.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub bind: String,
    pub collection: String,
    pub seed_file: Option<PathBuf>,
    pub log_dir: Option<PathBuf>,
    pub log_level: Option<String>,
    pub log_retention: Option<usize>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            collection: DEFAULT_COLLECTION.to_string(),
            seed_file: None,
            log_dir: None,
            log_level: None,
            log_retention: None,
        }
    }
}

/// Values supplied on the command line; `None` leaves the lower layer alone.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub bind: Option<String>,
    pub collection: Option<String>,
    pub seed_file: Option<PathBuf>,
    pub log_dir: Option<PathBuf>,
    pub log_level: Option<String>,
}

impl ServiceConfig {
    /// # Errors
    /// `Config` when the TOML does not describe a valid configuration.
    pub fn from_toml_str(s: &str) -> Result<Self, ServiceError> {
        Ok(toml::from_str(s)?)
    }

    /// Loads the file layer. An explicitly named file must exist and parse;
    /// `PMSERVICE_CONFIG` and `./pmservice.toml` are used when present and
    /// skipped with a warning when they do not parse.
    ///
    /// # Errors
    /// `Config` / `Io` for a bad explicit file.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ServiceError> {
        if let Some(p) = explicit {
            let s = std::fs::read_to_string(p).map_err(|e| ServiceError::Io(format!("{}: {e}", p.display())))?;
            return Self::from_toml_str(&s);
        }
        let mut candidates: Vec<PathBuf> = Vec::new();
        if let Ok(p) = std::env::var("PMSERVICE_CONFIG") {
            candidates.push(PathBuf::from(p));
        }
        if let Ok(cur) = std::env::current_dir() {
            candidates.push(cur.join(CONFIG_FILE_NAME));
        }
        for p in candidates.iter().filter(|p| p.exists()) {
            match std::fs::read_to_string(p).map_err(ServiceError::from).and_then(|s| Self::from_toml_str(&s)) {
                Ok(cfg) => return Ok(cfg),
                Err(e) => log::warn!("ignoring config {}: {e}", p.display()),
            }
        }
        Ok(Self::default())
    }

    pub fn apply_env(&mut self) {
        self.apply_env_from(|k| std::env::var(k).ok());
    }

    /// Applies `PMSERVICE_*` variables through `lookup`.
    pub fn apply_env_from<F: Fn(&str) -> Option<String>>(&mut self, lookup: F) {
        if let Some(s) = lookup("PMSERVICE_BIND") {
            self.bind = s;
        }
        if let Some(s) = lookup("PMSERVICE_COLLECTION") {
            self.collection = s;
        }
        if let Some(s) = lookup("PMSERVICE_SEED") {
            self.seed_file = Some(PathBuf::from(s));
        }
        if let Some(s) = lookup("PMSERVICE_LOG_DIR") {
            self.log_dir = Some(PathBuf::from(s));
        }
        if let Some(s) = lookup("PMSERVICE_LOG_LEVEL") {
            self.log_level = Some(s);
        }
        if let Some(n) = lookup("PMSERVICE_LOG_RETENTION").and_then(|s| s.parse::<usize>().ok()) {
            self.log_retention = Some(n);
        }
    }

    pub fn apply_overrides(&mut self, o: ConfigOverrides) {
        if let Some(v) = o.bind {
            self.bind = v;
        }
        if let Some(v) = o.collection {
            self.collection = v;
        }
        if o.seed_file.is_some() {
            self.seed_file = o.seed_file;
        }
        if o.log_dir.is_some() {
            self.log_dir = o.log_dir;
        }
        if o.log_level.is_some() {
            self.log_level = o.log_level;
        }
    }
}
