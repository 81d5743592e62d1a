//! Daemon configuration.
//!
//! Sources, highest precedence first: CLI flags and `PURLED_*` environment
//! variables, then `{data_dir}/config.toml`, then built-in defaults.  A
//! malformed config file is logged and skipped rather than refusing to start.

use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::{error, warn};

pub const DEFAULT_PORT: u16 = 4310;
pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1";
pub const DEFAULT_MAX_SESSIONS: usize = 32;
pub const DEFAULT_UPSTREAM_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Optional overrides read from `{data_dir}/config.toml`.
#[derive(Debug, Default, Deserialize)]
pub struct TomlConfig {
    pub port: Option<u16>,
    pub bind_address: Option<String>,
    pub log: Option<String>,
    pub log_format: Option<String>,
    pub max_sessions: Option<usize>,
    pub upstream_url: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub api_token: Option<String>,
}

/// Fully resolved daemon configuration.
#[derive(Debug, Clone)]
pub struct DaemonConfig {
    pub port: u16,
    pub bind_address: String,
    pub data_dir: PathBuf,
    pub log: String,
    pub log_format: String,
    pub max_sessions: usize,
    pub upstream_url: String,
    pub request_timeout: Duration,
    pub api_token: Option<String>,
}

fn load_toml(data_dir: &Path) -> TomlConfig {
    let path = data_dir.join("config.toml");
    let Ok(raw) = std::fs::read_to_string(&path) else {
        return TomlConfig::default();
    };
    match toml::from_str(&raw) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(path = %path.display(), error = %e, "ignoring malformed config file");
            TomlConfig::default()
        }
    }
}

/// Per-platform default data directory, `~/.local/share/purled` style.
pub fn default_data_dir() -> PathBuf {
    if let Ok(dir) = env::var("XDG_DATA_HOME") {
        if !dir.is_empty() {
            return PathBuf::from(dir).join("purled");
        }
    }
    if cfg!(target_os = "macos") {
        if let Ok(home) = env::var("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("purled");
        }
    } else if cfg!(target_os = "windows") {
        if let Ok(appdata) = env::var("APPDATA") {
            return PathBuf::from(appdata).join("purled");
        }
    } else if let Ok(home) = env::var("HOME") {
        return PathBuf::from(home).join(".local").join("share").join("purled");
    }
    PathBuf::from(".purled")
}

impl DaemonConfig {
    /// Resolve the effective configuration.  `None` arguments fall through to
    /// the config file, then to defaults.
    pub fn new(
        port: Option<u16>,
        data_dir: Option<PathBuf>,
        log: Option<String>,
        max_sessions: Option<usize>,
        bind_address: Option<String>,
    ) -> Self {
        let data_dir = data_dir.unwrap_or_else(default_data_dir);
        let file = load_toml(&data_dir);

        let upstream_url = env::var("PURLED_UPSTREAM_URL")
            .ok()
            .filter(|v| !v.is_empty())
            .or(file.upstream_url)
            .unwrap_or_else(|| DEFAULT_UPSTREAM_URL.to_string());
        let api_token = env::var("PURLED_API_TOKEN")
            .ok()
            .filter(|v| !v.is_empty())
            .or(file.api_token);
        let log_format = env::var("PURLED_LOG_FORMAT")
            .ok()
            .filter(|v| !v.is_empty())
            .or(file.log_format)
            .unwrap_or_else(|| "pretty".to_string());
        let bind_address = bind_address
            .or_else(|| env::var("PURLED_BIND").ok().filter(|v| !v.is_empty()))
            .or(file.bind_address)
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());

        if api_token.is_none() && bind_address != DEFAULT_BIND_ADDRESS {
            warn!("binding beyond loopback without an API token; the API is open");
        }

        Self {
            port: port.or(file.port).unwrap_or(DEFAULT_PORT),
            bind_address,
            data_dir,
            log: log.or(file.log).unwrap_or_else(|| "info".to_string()),
            log_format,
            max_sessions: max_sessions.or(file.max_sessions).unwrap_or(DEFAULT_MAX_SESSIONS),
            upstream_url,
            request_timeout: Duration::from_secs(
                file.request_timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
            ),
            api_token,
        }
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_apply_without_config_file() {
        let dir = TempDir::new().unwrap();
        let cfg = DaemonConfig::new(None, Some(dir.path().to_path_buf()), None, None, None);
        assert_eq!(cfg.port, DEFAULT_PORT);
        assert_eq!(cfg.max_sessions, DEFAULT_MAX_SESSIONS);
        assert_eq!(cfg.upstream_url, DEFAULT_UPSTREAM_URL);
        assert_eq!(cfg.request_timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn config_file_values_are_picked_up() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("config.toml"),
            "port = 9000\nmax_sessions = 3\nupstream_url = \"http://configs.internal:5000\"\n",
        )
        .unwrap();
        let cfg = DaemonConfig::new(None, Some(dir.path().to_path_buf()), None, None, None);
        assert_eq!(cfg.port, 9000);
        assert_eq!(cfg.max_sessions, 3);
        assert_eq!(cfg.upstream_url, "http://configs.internal:5000");
    }

    #[test]
    fn cli_arguments_override_the_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("config.toml"), "port = 9000\n").unwrap();
        let cfg = DaemonConfig::new(Some(4444), Some(dir.path().to_path_buf()), None, None, None);
        assert_eq!(cfg.port, 4444);
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("config.toml"), "port = \"not a number").unwrap();
        let cfg = DaemonConfig::new(None, Some(dir.path().to_path_buf()), None, None, None);
        assert_eq!(cfg.port, DEFAULT_PORT);
    }

    #[test]
    fn listen_addr_joins_bind_and_port() {
        let dir = TempDir::new().unwrap();
        let cfg = DaemonConfig::new(
            Some(8080),
            Some(dir.path().to_path_buf()),
            None,
            None,
            Some("0.0.0.0".to_string()),
        );
        assert_eq!(cfg.listen_addr(), "0.0.0.0:8080");
    }
}
