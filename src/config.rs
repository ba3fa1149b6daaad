use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

// =============================================================================
// Constants
// =============================================================================

/// Cached responses older than this are refetched (1 hour)
pub const DEFAULT_CACHE_TTL_SECS: u64 = 3600;

/// Timeout for a single network request in milliseconds (30 seconds)
pub const FETCH_TIMEOUT_MS: u64 = 30_000;

/// Upper bound on packages resolved at the same time
pub const DEFAULT_CONCURRENCY: usize = 16;

/// Browser-like identification; some upstreams reject unknown agents
pub const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0";

/// Environment variable overriding the cache directory
pub const CACHE_DIR_ENV: &str = "UPSTREAM_VERSION_CACHE_DIR";

/// Environment variable enabling a JSON log file at the given path
pub const LOG_FILE_ENV: &str = "UPSTREAM_VERSION_LOG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Engine configuration structure
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    pub cache: CacheConfig,
    pub fetch: FetchConfig,
}

/// Cache-related configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct CacheConfig {
    /// Freshness window in seconds
    pub ttl_secs: u64,
    /// Cache directory; the environment variable still takes precedence
    pub dir: Option<PathBuf>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: DEFAULT_CACHE_TTL_SECS,
            dir: None,
        }
    }
}

/// Network-related configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct FetchConfig {
    /// Per-request timeout in milliseconds
    pub timeout_ms: u64,
    /// Maximum number of packages resolved concurrently
    pub concurrency: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_ms: FETCH_TIMEOUT_MS,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

impl Config {
    /// Load configuration from a JSON file; missing fields use defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache.ttl_secs)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch.timeout_ms)
    }

    /// Concurrency ceiling, never below one
    pub fn concurrency(&self) -> usize {
        self.fetch.concurrency.max(1)
    }

    /// Returns the cache directory, honoring the environment override first
    pub fn cache_dir(&self) -> PathBuf {
        cache_dir_with_env(
            std::env::var(CACHE_DIR_ENV).ok(),
            self.cache.dir.clone(),
            std::env::var("XDG_CACHE_HOME").ok(),
            dirs::home_dir(),
        )
    }
}

/// Returns the path of the optional JSON log file.
pub fn log_path() -> Option<PathBuf> {
    std::env::var(LOG_FILE_ENV)
        .ok()
        .filter(|path| !path.is_empty())
        .map(PathBuf::from)
}

fn cache_dir_with_env(
    env_override: Option<String>,
    configured: Option<PathBuf>,
    xdg_cache_home: Option<String>,
    home_dir: Option<PathBuf>,
) -> PathBuf {
    if let Some(dir) = env_override.filter(|dir| !dir.is_empty()) {
        return PathBuf::from(dir);
    }
    if let Some(dir) = configured {
        return dir;
    }

    xdg_cache_home
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".cache")))
        .unwrap_or_else(std::env::temp_dir)
        .join("upstream-version")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use serial_test::serial;
    use tempfile::TempDir;

    #[test]
    fn config_from_partial_object_uses_defaults_for_missing_fields() {
        let result = serde_json::from_value::<Config>(json!({
            "cache": {
                "ttlSecs": 60
            }
        }))
        .unwrap();

        assert_eq!(result.cache.ttl_secs, 60);
        assert_eq!(result.cache.dir, None);
        assert_eq!(result.fetch, FetchConfig::default());
    }

    #[test]
    fn config_from_full_object_parses_all_fields() {
        let result = serde_json::from_value::<Config>(json!({
            "cache": {
                "ttlSecs": 120,
                "dir": "/var/cache/uv"
            },
            "fetch": {
                "timeoutMs": 5000,
                "concurrency": 4
            }
        }))
        .unwrap();

        assert_eq!(
            result,
            Config {
                cache: CacheConfig {
                    ttl_secs: 120,
                    dir: Some(PathBuf::from("/var/cache/uv")),
                },
                fetch: FetchConfig {
                    timeout_ms: 5000,
                    concurrency: 4,
                },
            }
        );
    }

    #[test]
    fn concurrency_is_at_least_one() {
        let mut config = Config::default();
        config.fetch.concurrency = 0;
        assert_eq!(config.concurrency(), 1);
    }

    #[test]
    fn load_reads_json_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        std::fs::write(&path, r#"{"fetch": {"concurrency": 2}}"#).unwrap();

        let config = Config::load(&path).unwrap();

        assert_eq!(config.fetch.concurrency, 2);
        assert_eq!(config.cache, CacheConfig::default());
    }

    #[test]
    fn load_reports_invalid_json() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        std::fs::write(&path, "{not json").unwrap();

        assert!(matches!(
            Config::load(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn load_reports_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("absent.json");

        assert!(matches!(Config::load(&path), Err(ConfigError::Read { .. })));
    }

    #[test]
    fn cache_dir_with_env_prefers_env_override() {
        let path = cache_dir_with_env(
            Some("/tmp/override".to_string()),
            Some(PathBuf::from("/configured")),
            Some("/xdg".to_string()),
            Some(PathBuf::from("/home/user")),
        );
        assert_eq!(path, PathBuf::from("/tmp/override"));
    }

    #[test]
    fn cache_dir_with_env_uses_configured_dir_before_xdg() {
        let path = cache_dir_with_env(
            None,
            Some(PathBuf::from("/configured")),
            Some("/xdg".to_string()),
            None,
        );
        assert_eq!(path, PathBuf::from("/configured"));
    }

    #[test]
    fn cache_dir_with_env_uses_xdg_cache_home_when_set() {
        let path = cache_dir_with_env(
            None,
            None,
            Some("/tmp/test-cache".to_string()),
            Some(PathBuf::from("/home/user")),
        );
        assert_eq!(path, PathBuf::from("/tmp/test-cache/upstream-version"));
    }

    #[test]
    fn cache_dir_with_env_falls_back_to_home_cache() {
        let path = cache_dir_with_env(None, None, None, Some(PathBuf::from("/home/user")));
        assert_eq!(path, PathBuf::from("/home/user/.cache/upstream-version"));
    }

    #[test]
    fn cache_dir_with_env_falls_back_to_temp_dir() {
        let path = cache_dir_with_env(None, None, None, None);
        assert_eq!(path, std::env::temp_dir().join("upstream-version"));
    }

    #[test]
    #[serial]
    fn cache_dir_reads_environment_override() {
        // SAFETY: serialized with every other test touching this variable
        unsafe { std::env::set_var(CACHE_DIR_ENV, "/tmp/from-env") };
        let dir = Config::default().cache_dir();
        unsafe { std::env::remove_var(CACHE_DIR_ENV) };

        assert_eq!(dir, PathBuf::from("/tmp/from-env"));
    }

    #[test]
    #[serial]
    fn log_path_ignores_empty_value() {
        unsafe { std::env::set_var(LOG_FILE_ENV, "") };
        let path = log_path();
        unsafe { std::env::remove_var(LOG_FILE_ENV) };

        assert_eq!(path, None);
    }
}
