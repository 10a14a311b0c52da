//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults (nothing set)
//! 2. Global config: `$XDG_CONFIG_HOME/zitadel-cli/zitadel-cli.toml` (or `--config`)
//! 3. Dotenv file: `./.env` (or `--env-file`)
//! 4. Environment variables: `ZITADEL_*` prefix
//! 5. Command line flags: `--base-url`, `--admin-token`

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::Credentials;

/// Prefix shared by all environment variables read by the tool.
pub const ENV_PREFIX: &str = "ZITADEL";

/// Environment variable holding the management API base URL.
pub const BASE_URL_VAR: &str = "ZITADEL_BASE_URL";

/// Environment variable holding the admin bearer token.
pub const ADMIN_TOKEN_VAR: &str = "ZITADEL_ADMIN_TOKEN";

/// Default dotenv file, relative to the working directory.
pub const DEFAULT_ENV_FILE: &str = ".env";

/// Where to look for configuration files.
///
/// `None` means "use the default location, if it exists"; an explicit path must exist.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub env_file: Option<PathBuf>,
}

/// Unified configuration for zitadel-cli.
#[derive(Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Base URL of the management API, e.g. `https://my-instance.zitadel.cloud`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Bearer token of an administrative user
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_token: Option<String>,
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("base_url", &self.base_url)
            .field("admin_token", &self.admin_token.as_ref().map(|_| "***"))
            .finish()
    }
}

/// Get the XDG config directory for zitadel-cli.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "zitadel-cli").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("zitadel-cli.toml"))
}

/// Load a TOML config file.
fn load_file_settings(path: &Path) -> ApplicationResult<Settings> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| ApplicationError::config(format!("read {}: {}", path.display(), e)))?;
    toml::from_str(&content)
        .map_err(|e| ApplicationError::config(format!("parse {}: {}", path.display(), e)))
}

/// Variables read from a dotenv file.
///
/// Parsing (quotes, escapes, `export`, `${VAR}` interpolation) is done by
/// `dotenvy`; the process environment is never modified.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvFile {
    /// Path the variables were read from
    pub path: PathBuf,
    /// Parsed variables; a later assignment of the same key wins
    pub variables: BTreeMap<String, String>,
}

impl EnvFile {
    /// Read a dotenv file.
    pub fn load(path: &Path) -> ApplicationResult<Self> {
        let iter = dotenvy::from_path_iter(path)
            .map_err(|e| ApplicationError::config(format!("read {}: {}", path.display(), e)))?;
        Self::collect(path, iter)
    }

    /// Parse dotenv content from any reader; `path` is only used in messages.
    pub fn from_reader<R: Read>(path: &Path, reader: R) -> ApplicationResult<Self> {
        Self::collect(path, dotenvy::from_read_iter(reader))
    }

    fn collect<R: Read>(path: &Path, iter: dotenvy::Iter<R>) -> ApplicationResult<Self> {
        let mut variables = BTreeMap::new();
        for item in iter {
            match item {
                Ok((key, value)) => {
                    variables.insert(key, value);
                }
                Err(dotenvy::Error::LineParse(line, index)) => {
                    warn!("{}: skipping unparsable line at {}: {}", path.display(), index, line);
                }
                Err(e) => {
                    return Err(ApplicationError::config(format!(
                        "read {}: {}",
                        path.display(),
                        e
                    )))
                }
            }
        }
        Ok(Self {
            path: path.to_path_buf(),
            variables,
        })
    }
}

/// Process environment as UTF-8 pairs; variables that are not valid Unicode are skipped.
fn unicode_vars(
    vars: impl IntoIterator<Item = (OsString, OsString)>,
) -> impl Iterator<Item = (String, String)> {
    vars.into_iter()
        .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
}

impl Settings {
    /// Load settings from all layers using the real process environment.
    pub fn load(options: &LoadOptions) -> ApplicationResult<Self> {
        Self::load_with_env(options, unicode_vars(std::env::vars_os()))
    }

    /// Load settings from all layers with an explicit process environment.
    pub fn load_with_env(
        options: &LoadOptions,
        process_env: impl IntoIterator<Item = (String, String)>,
    ) -> ApplicationResult<Self> {
        // 2. Config file
        let file_settings = match &options.config_path {
            Some(path) => load_file_settings(path)?,
            None => match global_config_path() {
                Some(path) if path.exists() => load_file_settings(&path)?,
                _ => Settings::default(),
            },
        };

        // 3. Dotenv file
        let env_file = match &options.env_file {
            Some(path) => Some(EnvFile::load(path)?),
            None => {
                let path = Path::new(DEFAULT_ENV_FILE);
                if path.is_file() {
                    Some(EnvFile::load(path)?)
                } else {
                    None
                }
            }
        };

        // 4. Process environment
        Self::resolve(file_settings, env_file.as_ref(), process_env)
    }

    /// Layer dotenv values and process environment on top of file settings.
    ///
    /// Dotenv values never override variables already set in the process environment.
    pub fn resolve(
        file_settings: Settings,
        env_file: Option<&EnvFile>,
        process_env: impl IntoIterator<Item = (String, String)>,
    ) -> ApplicationResult<Self> {
        let mut vars: config::Map<String, String> = config::Map::new();
        if let Some(env_file) = env_file {
            debug!("dotenv: {}", env_file.path.display());
            vars.extend(env_file.variables.clone());
        }
        vars.extend(process_env);

        file_settings.apply_env_overrides(vars)
    }

    /// Apply `ZITADEL_*` variables as explicit overrides.
    fn apply_env_overrides(mut self, vars: config::Map<String, String>) -> ApplicationResult<Self> {
        let config = Config::builder()
            .add_source(Environment::with_prefix(ENV_PREFIX).source(Some(vars)))
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("base_url") {
            self.base_url = Some(val);
        }
        if let Ok(val) = config.get_string("admin_token") {
            self.admin_token = Some(val);
        }

        Ok(self)
    }

    /// Apply command line overrides (highest precedence).
    pub fn with_overrides(mut self, base_url: Option<String>, admin_token: Option<String>) -> Self {
        if base_url.is_some() {
            self.base_url = base_url;
        }
        if admin_token.is_some() {
            self.admin_token = admin_token;
        }
        self
    }

    /// Validated credentials for the management API.
    pub fn credentials(&self) -> ApplicationResult<Credentials> {
        let base_url = non_blank(self.base_url.as_deref())
            .ok_or_else(|| ApplicationError::config(format!("{BASE_URL_VAR} is not set")))?;
        let admin_token = non_blank(self.admin_token.as_deref())
            .ok_or_else(|| ApplicationError::config(format!("{ADMIN_TOKEN_VAR} is not set")))?;
        Ok(Credentials::new(base_url, admin_token))
    }

    /// Copy with the admin token masked, for display.
    pub fn redacted(&self) -> Self {
        Self {
            base_url: self.base_url.clone(),
            admin_token: self.admin_token.as_ref().map(|_| "***".to_string()),
        }
    }

    /// Serialize settings to TOML.
    pub fn to_toml(&self) -> ApplicationResult<String> {
        toml::to_string_pretty(self)
            .map_err(|e| ApplicationError::config(format!("serialize: {}", e)))
    }

    /// Generate a template config file with comments.
    pub fn template() -> String {
        r#"# zitadel-cli configuration
# Location: ~/.config/zitadel-cli/zitadel-cli.toml (or --config PATH)
#
# Values here are overridden by .env, by ZITADEL_* environment variables
# and by --base-url / --admin-token.

# Base URL of the Zitadel instance
# base_url = "https://my-instance.zitadel.cloud"

# Personal access token of an administrative user
# admin_token = "..."
"#
        .to_string()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Convert config crate errors to ApplicationError.
fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::config(e.to_string())
}
