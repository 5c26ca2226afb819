//! Configuration file loading.
//!
//! Settings come from a TOML file, by default
//! `<config_dir>/irida-sistr-results/config.toml`:
//!
//! ```toml
//! [irida]
//! url = "http://localhost:8080/irida"
//! client_id = "client"
//! client_secret = "secret"
//! username = "admin"
//! timeout = 600
//!
//! [sistr]
//! reportable_serovars = ["Enteritidis", "Heidelberg", "Typhimurium"]
//! workflows = ["0.3"]
//!
//! [sistr.workflow_ids]
//! "0.4" = "a1b2c3d4-0000-0000-0000-000000000000"
//! ```
//!
//! Command-line flags take precedence over every value in the file.

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::core::sample::ReportableSerovars;
use crate::irida::client::{ConnectionSettings, DEFAULT_TIMEOUT_SECS};
use crate::workflow::WorkflowTable;

/// Directory under the platform config dir holding our config file
pub const CONFIG_DIR_NAME: &str = "irida-sistr-results";

pub const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Missing required setting: pass {flag} or set '{key}' in the config file")]
    MissingSetting {
        flag: &'static str,
        key: &'static str,
    },

    #[error("Failed to read password: {0}")]
    Password(#[source] io::Error),
}

/// Contents of the TOML config file
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub irida: IridaSection,
    pub sistr: SistrSection,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IridaSection {
    pub url: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Request timeout in seconds
    pub timeout: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SistrSection {
    pub reportable_serovars: Vec<String>,
    /// Workflow versions or ids used when none are given on the command line
    pub workflows: Vec<String>,
    /// Extra workflow releases: version → workflow id
    pub workflow_ids: BTreeMap<String, String>,
}

/// Connection values given on the command line
#[derive(Debug, Clone, Default)]
pub struct ConnectionOverrides {
    pub url: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub timeout: Option<u64>,
}

impl FileConfig {
    /// Load a config file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Read` if the file cannot be read and
    /// `ConfigError::Parse` if it is not a valid config.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Location of the config file when none is given explicitly
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Load `explicit` if given, else the default file if it exists
    ///
    /// # Errors
    ///
    /// Fails if the explicit file is missing or either file is invalid.
    pub fn discover(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            debug!("Loading config from {}", path.display());
            return Self::load(path);
        }

        match Self::default_path() {
            Some(path) if path.is_file() => {
                debug!("Loading config from {}", path.display());
                Self::load(&path)
            }
            _ => {
                debug!("No config file found, using command-line settings only");
                Ok(Self::default())
            }
        }
    }

    /// The SISTR workflow table extended with `[sistr.workflow_ids]`
    pub fn workflow_table(&self) -> WorkflowTable {
        self.sistr
            .workflow_ids
            .iter()
            .fold(WorkflowTable::sistr(), |table, (version, id)| {
                table.with_entry(version.clone(), id.clone())
            })
    }

    pub fn reportable_serovars(&self) -> ReportableSerovars {
        ReportableSerovars::new(self.sistr.reportable_serovars.iter().cloned())
    }

    /// Combine command-line values with the file's `[irida]` table
    ///
    /// `prompt` is called for the password only when neither source has one.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingSetting` naming the first absent setting,
    /// or whatever `prompt` fails with.
    pub fn connection_settings<F>(
        &self,
        overrides: ConnectionOverrides,
        prompt: F,
    ) -> Result<ConnectionSettings, ConfigError>
    where
        F: FnOnce(&str, &str) -> Result<String, ConfigError>,
    {
        let irida = &self.irida;

        let base_url = require(overrides.url, irida.url.as_deref(), "--irida-url", "irida.url")?;
        let client_id = require(
            overrides.client_id,
            irida.client_id.as_deref(),
            "--client-id",
            "irida.client_id",
        )?;
        let client_secret = require(
            overrides.client_secret,
            irida.client_secret.as_deref(),
            "--client-secret",
            "irida.client_secret",
        )?;
        let username = require(
            overrides.username,
            irida.username.as_deref(),
            "--username",
            "irida.username",
        )?;

        let password = match overrides.password.or_else(|| irida.password.clone()) {
            Some(password) => password,
            None => prompt(&username, &base_url)?,
        };

        let timeout = overrides
            .timeout
            .or(irida.timeout)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Ok(ConnectionSettings {
            base_url,
            client_id,
            client_secret,
            username,
            password,
            timeout: Duration::from_secs(timeout),
        })
    }
}

fn require(
    cli: Option<String>,
    file: Option<&str>,
    flag: &'static str,
    key: &'static str,
) -> Result<String, ConfigError> {
    cli.or_else(|| file.map(str::to_string))
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::MissingSetting { flag, key })
}

fn password_prompt(username: &str, irida_url: &str) -> String {
    format!("Enter password for user={username} on IRIDA={irida_url}: ")
}

/// Ask for the IRIDA password on the terminal without echoing it
///
/// # Errors
///
/// Returns `ConfigError::Password` if the terminal cannot be read.
pub fn prompt_password(username: &str, irida_url: &str) -> Result<String, ConfigError> {
    rpassword::prompt_password(password_prompt(username, irida_url)).map_err(ConfigError::Password)
}

/// Parse a reportable serovars list: one serovar per line, `#` starts a comment
pub fn parse_reportable_serovars(text: &str) -> ReportableSerovars {
    ReportableSerovars::new(
        text.lines()
            .map(|line| line.split('#').next().unwrap_or_default().trim())
            .filter(|line| !line.is_empty()),
    )
}

/// # Errors
///
/// Returns `ConfigError::Read` if the file cannot be read.
pub fn read_reportable_serovars(path: &Path) -> Result<ReportableSerovars, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_reportable_serovars(&text))
}
