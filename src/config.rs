//! Configuration and credential storage for tchmusic.
//!
//! All settings live in a single YAML file in the user's home directory
//! (`~/.tchmusic.yaml`). The file doubles as the credential store: the OAuth
//! token obtained at login, and every refreshed token afterwards, is written
//! back into it.
//!
//! Values are layered, highest priority first:
//! 1. Command-line flags
//! 2. Environment variables prefixed with `TCH_` (a `.env` file in the working
//!    directory is loaded into the environment beforehand)
//! 3. The YAML file
//! 4. Built-in defaults for the optional keys

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing_subscriber::filter::LevelFilter;

use crate::{
    error::{Error, Res},
    notice,
    types::Token,
    warning,
};

pub const CONFIG_NAME: &str = ".tchmusic";
pub const CONFIG_TYPE: &str = "yaml";
pub const ENV_PREFIX: &str = "TCH";

pub const DEFAULT_LOG_LEVEL: &str = "error";
pub const DEFAULT_MARKET: &str = "VN";
pub const DEFAULT_FEED_URL: &str = "https://api.thecoffeehouse.com/api/get_music_info";

/// Contents of the config file after all layers have been merged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub secret_key: String,
    #[serde(default)]
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token_expiry: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feed_url: Option<String>,
    /// Seconds to wait for the browser to complete the login; unbounded when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub login_timeout: Option<u64>,
}

/// Values given on the command line. `None` leaves the lower layers untouched.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub client_id: Option<String>,
    pub secret_key: Option<String>,
    pub log_level: Option<String>,
    pub login_timeout: Option<u64>,
}

impl Config {
    /// Returns the cached token, if the store holds an access token with an expiry.
    pub fn token(&self) -> Option<Token> {
        if self.access_token.is_empty() {
            return None;
        }

        self.access_token_expiry.map(|expiry| Token {
            access_token: self.access_token.clone(),
            refresh_token: self.refresh_token.clone(),
            expiry,
        })
    }

    pub fn set_token(&mut self, token: &Token) {
        self.access_token = token.access_token.clone();
        self.refresh_token = token.refresh_token.clone();
        self.access_token_expiry = Some(token.expiry);
    }

    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    /// The merged log level as a filter.
    ///
    /// An unknown level name falls back to [`DEFAULT_LOG_LEVEL`] with a console
    /// warning, so error records are never filtered out by a typo.
    pub fn level_filter(&self) -> LevelFilter {
        parse_log_level(self.log_level()).unwrap_or_else(|e| {
            warning!("{}, using log level {:?}", e, DEFAULT_LOG_LEVEL);
            LevelFilter::ERROR
        })
    }

    pub fn market(&self) -> &str {
        self.market.as_deref().unwrap_or(DEFAULT_MARKET)
    }

    pub fn feed_url(&self) -> &str {
        self.feed_url.as_deref().unwrap_or(DEFAULT_FEED_URL)
    }

    pub fn login_timeout(&self) -> Option<Duration> {
        self.login_timeout.map(Duration::from_secs)
    }

    /// Checks that the client credentials survived the merge.
    ///
    /// Must run before anything talks to the network.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingFields`] naming every empty required key.
    pub fn validate(&self) -> Res<()> {
        let mut missing = Vec::new();
        if self.client_id.trim().is_empty() {
            missing.push("client_id");
        }
        if self.secret_key.trim().is_empty() {
            missing.push("secret_key");
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(Error::MissingFields(missing))
        }
    }

    /// Applies `TCH_*` variables on top of the current values.
    ///
    /// Takes the variables as an iterator so callers can pass
    /// `std::env::vars()` or a fixed list. Empty values are treated as unset.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidValue`] when a timestamp or number does not parse.
    pub fn apply_env<I, K, V>(&mut self, vars: I) -> Res<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let prefix = format!("{ENV_PREFIX}_");

        for (key, value) in vars {
            let Some(name) = key.as_ref().strip_prefix(&prefix) else {
                continue;
            };
            let value: String = value.into();
            if value.is_empty() {
                continue;
            }

            match name.to_ascii_lowercase().as_str() {
                "client_id" => self.client_id = value,
                "secret_key" => self.secret_key = value,
                "access_token" => self.access_token = value,
                "refresh_token" => self.refresh_token = value,
                "access_token_expiry" => {
                    let expiry = DateTime::parse_from_rfc3339(&value).map_err(|_| {
                        Error::InvalidValue {
                            key: "access_token_expiry",
                            value: value.clone(),
                        }
                    })?;
                    self.access_token_expiry = Some(expiry.with_timezone(&Utc));
                }
                "log_level" => self.log_level = Some(value),
                "market" => self.market = Some(value),
                "feed_url" => self.feed_url = Some(value),
                "login_timeout" => {
                    let secs = value.parse().map_err(|_| Error::InvalidValue {
                        key: "login_timeout",
                        value: value.clone(),
                    })?;
                    self.login_timeout = Some(secs);
                }
                _ => {}
            }
        }

        Ok(())
    }

    pub fn apply_overrides(&mut self, overrides: &Overrides) {
        if let Some(client_id) = &overrides.client_id {
            self.client_id = client_id.clone();
        }
        if let Some(secret_key) = &overrides.secret_key {
            self.secret_key = secret_key.clone();
        }
        if let Some(log_level) = &overrides.log_level {
            self.log_level = Some(log_level.clone());
        }
        if let Some(login_timeout) = overrides.login_timeout {
            self.login_timeout = Some(login_timeout);
        }
    }
}

/// The config file on disk together with its merged contents.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
    config: Config,
}

impl ConfigStore {
    /// `~/.tchmusic.yaml`
    pub fn default_path() -> Res<PathBuf> {
        let mut path = dirs::home_dir().ok_or(Error::NoHomeDir)?;
        path.push(format!("{CONFIG_NAME}.{CONFIG_TYPE}"));
        Ok(path)
    }

    /// Reads the config file at `path`, creating an empty one if it does not exist.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be created or read, or is not valid YAML.
    pub async fn open(path: impl Into<PathBuf>) -> Res<Self> {
        let path = path.into();

        let content = match async_fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                if let Some(parent) = path.parent() {
                    async_fs::create_dir_all(parent).await?;
                }
                async_fs::write(&path, "").await?;
                notice!("Created empty config file at {}", path.display());
                String::new()
            }
            Err(e) => return Err(e.into()),
        };

        let config = if content.trim().is_empty() {
            Config::default()
        } else {
            serde_yaml::from_str(&content)?
        };

        Ok(Self { path, config })
    }

    /// Layers the process environment and the command-line flags over the file.
    pub fn merge(&mut self, overrides: &Overrides) -> Res<()> {
        self.config.apply_env(std::env::vars())?;
        self.config.apply_overrides(overrides);
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    /// Writes the merged config back to disk.
    pub async fn persist(&self) -> Res<()> {
        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        let yaml = serde_yaml::to_string(&self.config)?;
        async_fs::write(&self.path, yaml).await?;
        tracing::debug!(path = %self.path.display(), "config saved");
        Ok(())
    }

    /// Stores `token` and rewrites the file.
    pub async fn save_token(&mut self, token: &Token) -> Res<()> {
        self.config.set_token(token);
        self.persist().await
    }
}

/// Parses a log level name (`off`, `error`, `warn`, `info`, `debug`, `trace`).
/// Case and surrounding whitespace are ignored.
///
/// # Errors
///
/// Returns [`Error::InvalidValue`] for anything else.
pub fn parse_log_level(level: &str) -> Res<LevelFilter> {
    level
        .trim()
        .to_ascii_lowercase()
        .parse()
        .map_err(|_| Error::InvalidValue {
            key: "log_level",
            value: level.to_string(),
        })
}

/// Loads a `.env` file from the working directory into the process environment.
///
/// A missing file is not an error; `TCH_*` values may simply come from the
/// shell instead. Runs before logging is set up, so problems go to the console.
pub fn load_env() {
    match dotenv::dotenv() {
        Ok(_) => {}
        Err(e) if e.not_found() => {}
        Err(e) => warning!("can not load .env: {}", e),
    }
}
