//! Layered desk configuration
//!
//! Built-in defaults, then an optional TOML file, then `TICKET_DESK__*`
//! environment variables (`__` separates nested keys, e.g.
//! `TICKET_DESK__LIST__PAGE_SIZE=25` or `TICKET_DESK__BOARD__WIP_LIMITS__OPEN=3`).

use crate::board::WipLimits;
use crate::core::{AuthorRole, Status, ValidationRules};
use crate::error::{DeskError, Result};
use crate::pipeline::Author;
use config::{Config, Environment, File, FileFormat};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Name of the per-directory config file
pub const CONFIG_FILE_NAME: &str = "ticket-desk.toml";

const ENV_PREFIX: &str = "TICKET_DESK";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeskConfig {
    pub board: BoardConfig,
    pub list: ListConfig,
    pub backend: BackendConfig,
    pub validation: ValidationRules,
    pub session: SessionConfig,
}

/// Board settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Column capacity by status name; columns not listed are unbounded
    pub wip_limits: BTreeMap<String, usize>,
}

/// Ticket list settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListConfig {
    pub page_size: usize,
    pub search_debounce_ms: u64,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            page_size: crate::core::DEFAULT_PAGE_SIZE,
            search_debounce_ms: 250,
        }
    }
}

/// Simulated backend settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub latency_ms: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self { latency_ms: 500 }
    }
}

/// The person operating this session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub user_name: String,
    pub role: AuthorRole,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            user_name: "Support Agent".to_string(),
            role: AuthorRole::Agent,
        }
    }
}

impl DeskConfig {
    /// Loads configuration from defaults, `path` (if any) and the environment
    ///
    /// An explicitly given `path` must exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let defaults = serde_json::to_string(&Self::default())?;
        let mut builder = Config::builder().add_source(File::from_str(&defaults, FileFormat::Json));

        if let Some(path) = path {
            if !path.exists() {
                return Err(DeskError::Config(config::ConfigError::NotFound(
                    path.display().to_string(),
                )));
            }
            tracing::debug!("Config: reading {}", path.display());
            builder = builder.add_source(File::from(path).format(FileFormat::Toml));
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Loads from the first config file found in the standard locations
    pub fn load_default() -> Result<Self> {
        Self::load(Self::find_config_file().as_deref())
    }

    /// `./ticket-desk.toml`, then the platform config directory
    #[must_use]
    pub fn find_config_file() -> Option<PathBuf> {
        let local = PathBuf::from(CONFIG_FILE_NAME);
        if local.exists() {
            return Some(local);
        }
        Self::user_config_path().filter(|path| path.exists())
    }

    #[must_use]
    pub fn user_config_path() -> Option<PathBuf> {
        ProjectDirs::from("dev", "ticket-desk", "ticket-desk")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Parses a TOML document on top of the defaults, ignoring the environment
    pub fn from_toml_str(toml: &str) -> Result<Self> {
        let defaults = serde_json::to_string(&Self::default())?;
        let config: Self = Config::builder()
            .add_source(File::from_str(&defaults, FileFormat::Json))
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values the desk cannot run with
    pub fn validate(&self) -> Result<()> {
        self.page_size()?;
        self.wip_limits()?;
        Ok(())
    }

    pub fn page_size(&self) -> Result<NonZeroUsize> {
        NonZeroUsize::new(self.list.page_size)
            .ok_or_else(|| DeskError::InvalidInput("list.page_size must be greater than zero".to_string()))
    }

    /// WIP limits keyed by parsed status
    pub fn wip_limits(&self) -> Result<WipLimits> {
        self.board
            .wip_limits
            .iter()
            .map(|(name, limit)| -> Result<(Status, usize)> {
                let status: Status = name.parse().map_err(|_| {
                    DeskError::InvalidInput(format!("board.wip_limits: unknown status '{name}'"))
                })?;
                Ok((status, *limit))
            })
            .collect()
    }

    #[must_use]
    pub const fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.list.search_debounce_ms)
    }

    #[must_use]
    pub const fn backend_latency(&self) -> Duration {
        Duration::from_millis(self.backend.latency_ms)
    }

    #[must_use]
    pub fn author(&self) -> Author {
        Author {
            name: self.session.user_name.clone(),
            role: self.session.role,
        }
    }
}
