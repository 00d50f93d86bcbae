//! Configuration module for ydsync.
//!
//! Provides typed configuration structs that map to the YAML configuration file,
//! with loading, environment overrides, validation, defaults, and a builder
//! pattern for programmatic use.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Config struct with sub-sections
// ---------------------------------------------------------------------------

/// Top-level configuration for ydsync.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub remote: RemoteConfig,
    pub sync: SyncConfig,
    pub logging: LoggingConfig,
}

/// Which JSON key of an API error body carries the human-readable message.
///
/// Older API versions put it in `message`, newer ones in `description`.
/// The configured key is preferred and the other one is used as a fallback.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorMessageField {
    #[default]
    Message,
    Description,
}

impl ErrorMessageField {
    /// The JSON key to try first.
    pub fn primary(self) -> &'static str {
        match self {
            Self::Message => "message",
            Self::Description => "description",
        }
    }

    /// The JSON key to try when the primary one is absent.
    pub fn fallback(self) -> &'static str {
        match self {
            Self::Message => "description",
            Self::Description => "message",
        }
    }
}

/// Remote storage (Yandex Disk REST API) settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// API root, e.g. `https://cloud-api.yandex.net`.
    pub base_url: String,
    /// Remote directory prefix mirroring the tracked directory, e.g. `disk:/Backup/`.
    pub directory: String,
    /// OAuth token. Usually supplied through `YDSYNC_TOKEN` rather than the file.
    pub token: Option<String>,
    /// Key of the error message in API error bodies.
    pub error_message_field: ErrorMessageField,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Maximum number of entries requested from the listing endpoint.
    pub list_limit: u32,
}

/// Synchronization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Tracked local directory. A leading `~` is expanded to the home directory.
    pub root: PathBuf,
    /// Seconds between synchronization passes.
    pub poll_interval: u64,
    /// Maximum number of uploads/deletes running at once within a pass.
    pub max_concurrent_transfers: usize,
}

/// Output format of the log sinks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Logging / tracing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: `trace`, `debug`, `info`, `warn`, or `error`.
    pub level: String,
    /// Output format for every sink.
    pub format: LogFormat,
    /// Optional file receiving INFO and above.
    pub info_file: Option<PathBuf>,
    /// Optional file receiving ERROR events only.
    pub error_file: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// Config::load()
// ---------------------------------------------------------------------------

impl Config {
    /// Load configuration from a YAML file at `path`.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Load from `path` when the file exists, otherwise start from
    /// [`Config::default`]. A file that exists but cannot be parsed is an error.
    pub fn load_if_exists(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Platform-appropriate default path for the configuration file.
    ///
    /// Typically `$XDG_CONFIG_HOME/ydsync/config.yaml` on Linux.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("ydsync")
            .join("config.yaml")
    }
}

// ---------------------------------------------------------------------------
// Config::default()
// ---------------------------------------------------------------------------

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://cloud-api.yandex.net".to_string(),
            directory: "disk:/ydsync/".to_string(),
            token: None,
            error_message_field: ErrorMessageField::Message,
            request_timeout_secs: 10,
            list_limit: 10_000,
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("~/ydsync"),
            poll_interval: 60,
            max_concurrent_transfers: 1,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
            info_file: None,
            error_file: None,
        }
    }
}

impl RemoteConfig {
    /// Request timeout as a [`Duration`].
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl SyncConfig {
    /// The tracked directory with a leading `~` expanded.
    pub fn resolved_root(&self) -> PathBuf {
        expand_tilde(&self.root)
    }

    /// Poll interval as a [`Duration`].
    pub fn poll_duration(&self) -> Duration {
        Duration::from_secs(self.poll_interval)
    }
}

/// Expands a leading `~` component to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => match dirs::home_dir() {
            Some(home) => home.join(rest),
            None => path.to_path_buf(),
        },
        Err(_) => path.to_path_buf(),
    }
}

// ---------------------------------------------------------------------------
// Environment overrides
// ---------------------------------------------------------------------------

/// Environment variable holding the OAuth token.
pub const ENV_TOKEN: &str = "YDSYNC_TOKEN";
/// Environment variable overriding `remote.base_url`.
pub const ENV_BASE_URL: &str = "YDSYNC_BASE_URL";
/// Environment variable overriding `remote.directory`.
pub const ENV_REMOTE_DIR: &str = "YDSYNC_REMOTE_DIR";
/// Environment variable overriding `sync.root`.
pub const ENV_SYNC_DIR: &str = "YDSYNC_SYNC_DIR";
/// Environment variable overriding `sync.poll_interval`.
pub const ENV_POLL_INTERVAL: &str = "YDSYNC_POLL_INTERVAL";
/// Environment variable overriding `logging.info_file`.
pub const ENV_INFO_LOG: &str = "YDSYNC_INFO_LOG";
/// Environment variable overriding `logging.error_file`.
pub const ENV_ERROR_LOG: &str = "YDSYNC_ERROR_LOG";

impl Config {
    /// Apply overrides from the process environment.
    ///
    /// Returns the overrides that could not be applied (e.g. a non-numeric
    /// poll interval); they should be reported together with [`Config::validate`].
    pub fn apply_env_overrides(&mut self) -> Vec<ValidationError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup. Empty values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Vec<ValidationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut errors = Vec::new();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(token) = get(ENV_TOKEN) {
            self.remote.token = Some(token);
        }
        if let Some(url) = get(ENV_BASE_URL) {
            self.remote.base_url = url;
        }
        if let Some(dir) = get(ENV_REMOTE_DIR) {
            self.remote.directory = dir;
        }
        if let Some(root) = get(ENV_SYNC_DIR) {
            self.sync.root = PathBuf::from(root);
        }
        if let Some(raw) = get(ENV_POLL_INTERVAL) {
            match raw.trim().parse::<u64>() {
                Ok(secs) => self.sync.poll_interval = secs,
                Err(_) => errors.push(ValidationError {
                    field: ENV_POLL_INTERVAL.into(),
                    message: format!("expected a number of seconds, got '{raw}'"),
                }),
            }
        }
        if let Some(file) = get(ENV_INFO_LOG) {
            self.logging.info_file = Some(PathBuf::from(file));
        }
        if let Some(file) = get(ENV_ERROR_LOG) {
            self.logging.error_file = Some(PathBuf::from(file));
        }

        errors
    }
}

// ---------------------------------------------------------------------------
// Config::validate()
// ---------------------------------------------------------------------------

/// A single validation error found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path to the offending field, e.g. `"sync.poll_interval"`.
    pub field: String,
    /// Human-readable explanation.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Valid values for `logging.level`.
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

impl Config {
    /// Validate the configuration and return all errors found.
    ///
    /// An empty vector means the configuration is valid.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        // --- remote ---
        match self.remote.token.as_deref() {
            Some(token) if !token.trim().is_empty() => {}
            _ => errors.push(ValidationError {
                field: "remote.token".into(),
                message: format!("is required (set it in the config file or via {ENV_TOKEN})"),
            }),
        }
        match url::Url::parse(&self.remote.base_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(url) => errors.push(ValidationError {
                field: "remote.base_url".into(),
                message: format!("unsupported scheme '{}'", url.scheme()),
            }),
            Err(e) => errors.push(ValidationError {
                field: "remote.base_url".into(),
                message: format!("invalid URL '{}': {e}", self.remote.base_url),
            }),
        }
        if self.remote.directory.trim().is_empty() {
            errors.push(ValidationError {
                field: "remote.directory".into(),
                message: "must not be empty".into(),
            });
        }
        if self.remote.request_timeout_secs == 0 {
            errors.push(ValidationError {
                field: "remote.request_timeout_secs".into(),
                message: "must be greater than 0".into(),
            });
        }
        if self.remote.list_limit == 0 {
            errors.push(ValidationError {
                field: "remote.list_limit".into(),
                message: "must be greater than 0".into(),
            });
        }

        // --- sync ---
        if self.sync.poll_interval == 0 {
            errors.push(ValidationError {
                field: "sync.poll_interval".into(),
                message: "must be greater than 0".into(),
            });
        }
        if self.sync.max_concurrent_transfers == 0 {
            errors.push(ValidationError {
                field: "sync.max_concurrent_transfers".into(),
                message: "must be greater than 0".into(),
            });
        }
        let root = self.sync.resolved_root();
        if !root.is_dir() {
            errors.push(ValidationError {
                field: "sync.root".into(),
                message: format!("directory does not exist: {}", root.display()),
            });
        }

        // --- logging ---
        if !VALID_LOG_LEVELS.contains(&self.logging.level.as_str()) {
            errors.push(ValidationError {
                field: "logging.level".into(),
                message: format!(
                    "invalid level '{}'; valid options: {}",
                    self.logging.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            });
        }

        errors
    }
}

// ---------------------------------------------------------------------------
// ConfigBuilder
// ---------------------------------------------------------------------------

/// Builder for constructing a [`Config`] programmatically.
///
/// Starts from [`Config::default`] and allows selective overrides.
///
/// # Example
///
/// ```rust,no_run
/// use ydsync_core::config::ConfigBuilder;
/// use std::path::PathBuf;
///
/// let config = ConfigBuilder::new()
///     .remote_token("AQAAAA...")
///     .sync_root(PathBuf::from("/home/user/Backup"))
///     .sync_poll_interval(10)
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder initialised with [`Config::default`] values.
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    // --- remote ---

    pub fn remote_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.remote.base_url = url.into();
        self
    }

    pub fn remote_directory(mut self, dir: impl Into<String>) -> Self {
        self.config.remote.directory = dir.into();
        self
    }

    pub fn remote_token(mut self, token: impl Into<String>) -> Self {
        self.config.remote.token = Some(token.into());
        self
    }

    pub fn remote_error_message_field(mut self, field: ErrorMessageField) -> Self {
        self.config.remote.error_message_field = field;
        self
    }

    pub fn remote_request_timeout_secs(mut self, seconds: u64) -> Self {
        self.config.remote.request_timeout_secs = seconds;
        self
    }

    // --- sync ---

    pub fn sync_root(mut self, root: PathBuf) -> Self {
        self.config.sync.root = root;
        self
    }

    pub fn sync_poll_interval(mut self, seconds: u64) -> Self {
        self.config.sync.poll_interval = seconds;
        self
    }

    pub fn sync_max_concurrent_transfers(mut self, n: usize) -> Self {
        self.config.sync.max_concurrent_transfers = n;
        self
    }

    // --- logging ---

    pub fn logging_level(mut self, level: impl Into<String>) -> Self {
        self.config.logging.level = level.into();
        self
    }

    pub fn logging_info_file(mut self, file: PathBuf) -> Self {
        self.config.logging.info_file = Some(file);
        self
    }

    pub fn logging_error_file(mut self, file: PathBuf) -> Self {
        self.config.logging.error_file = Some(file);
        self
    }

    // --- build ---

    /// Consume the builder and return the finished [`Config`].
    pub fn build(self) -> Config {
        self.config
    }

    /// Build and validate in one step. Returns `Err` with the list of
    /// validation errors if the configuration is invalid.
    pub fn build_validated(self) -> Result<Config, Vec<ValidationError>> {
        let config = self.build();
        let errors = config.validate();
        if errors.is_empty() {
            Ok(config)
        } else {
            Err(errors)
        }
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
