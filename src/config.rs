//! Configuration types for backend.
//!
//! Config is loaded once at startup from an optional TOML file and validated
//! before the server opens any ports. Every key has a default, so an empty
//! file (or no file at all) yields a runnable service.
//!
//! # Example
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 8000
//!
//! [logging]
//! format = "json"
//! ```

use std::{
    net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr},
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "BACKEND_CONFIG";

/// Environment variable overriding `server.port`.
pub const PORT_ENV: &str = "BACKEND_PORT";

/// Config file used when [`CONFIG_ENV`] is unset, if it exists.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/backend/config.toml";

/// Log filter used when neither `RUST_LOG` nor `logging.level` is set.
pub const DEFAULT_LOG_FILTER: &str = "backend=info,tower_http=warn";

/// Top-level service configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where the running config came from. Logged at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    Defaults,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Defaults => f.write_str("built-in defaults"),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content =
            std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let config: Self = toml::from_str(&content).context("parsing config TOML")?;
        config.validate()?;
        Ok(config)
    }

    /// Resolve the config from the process environment.
    ///
    /// Lookup order:
    /// 1. `BACKEND_CONFIG` names a file, which must exist and parse.
    /// 2. [`DEFAULT_CONFIG_PATH`], if present on disk.
    /// 3. Built-in defaults.
    ///
    /// `BACKEND_PORT` is applied on top of whichever source wins.
    pub fn resolve() -> anyhow::Result<(Self, ConfigSource)> {
        Self::resolve_from(
            std::env::var_os(CONFIG_ENV).map(PathBuf::from),
            Path::new(DEFAULT_CONFIG_PATH),
            std::env::var(PORT_ENV).ok(),
        )
    }

    fn resolve_from(
        explicit: Option<PathBuf>,
        fallback: &Path,
        port: Option<String>,
    ) -> anyhow::Result<(Self, ConfigSource)> {
        let (config, source) = match explicit {
            Some(path) => (Self::load(&path)?, ConfigSource::File(path)),
            None if fallback.is_file() => (
                Self::load(fallback)?,
                ConfigSource::File(fallback.to_path_buf()),
            ),
            None => (Self::default(), ConfigSource::Defaults),
        };
        Ok((config.with_port_override(port)?, source))
    }

    /// Replace `server.port` with a raw override value, if one is given.
    pub fn with_port_override(mut self, raw: Option<String>) -> anyhow::Result<Self> {
        if let Some(raw) = raw {
            self.server.port = raw
                .trim()
                .parse()
                .with_context(|| format!("{PORT_ENV} `{raw}` is not a valid port"))?;
        }
        Ok(self)
    }

    fn validate(&self) -> anyhow::Result<()> {
        self.server.ip()?;
        anyhow::ensure!(
            self.server.request_timeout_ms > 0,
            "server.request_timeout_ms must be greater than zero"
        );
        Ok(())
    }
}

/// Listener settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`). Must be an IP literal.
    #[serde(default = "defaults::host")]
    pub host: String,

    /// Bind port (default: 8000).
    #[serde(default = "defaults::port")]
    pub port: u16,

    /// Per-request deadline in milliseconds (default: 10 000).
    ///
    /// Requests exceeding it are answered with `408 Request Timeout`.
    #[serde(default = "defaults::request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: defaults::host(),
            port: defaults::port(),
            request_timeout_ms: defaults::request_timeout_ms(),
        }
    }
}

impl ServerConfig {
    fn ip(&self) -> anyhow::Result<IpAddr> {
        self.host
            .parse()
            .with_context(|| format!("server.host `{}` is not an IP address", self.host))
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(SocketAddr::new(self.ip()?, self.port))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// URL of this service's health endpoint, as seen from the same host.
    ///
    /// Wildcard bind addresses are not connectable, so they map to loopback.
    pub fn probe_url(&self) -> anyhow::Result<String> {
        let target = match self.ip()? {
            IpAddr::V4(v4) if v4.is_unspecified() => IpAddr::V4(Ipv4Addr::LOCALHOST),
            IpAddr::V6(v6) if v6.is_unspecified() => IpAddr::V6(Ipv6Addr::LOCALHOST),
            other => other,
        };
        Ok(format!("http://{}/health", SocketAddr::new(target, self.port)))
    }
}

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Filter directive, e.g. `backend=debug`. `RUST_LOG` takes precedence.
    #[serde(default)]
    pub level: Option<String>,

    #[serde(default)]
    pub format: LogFormat,
}

impl LoggingConfig {
    /// Effective filter directive: `RUST_LOG`, then `level`, then the default.
    pub fn filter(&self, rust_log: Option<String>) -> String {
        rust_log
            .filter(|v| !v.trim().is_empty())
            .or_else(|| self.level.clone())
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string())
    }
}

mod defaults {
    pub fn host() -> String { "0.0.0.0".into() }
    pub fn port() -> u16 { 8000 }
    pub fn request_timeout_ms() -> u64 { 10_000 }
}
