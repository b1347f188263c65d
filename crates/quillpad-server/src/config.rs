//! Server configuration.
//!
//! Deserialized from a TOML file with per-field defaults, then overridden by
//! environment variables with the `QUILLPAD` prefix and `__` separator, e.g.
//! `QUILLPAD__SERVER__PORT=9090` or `QUILLPAD__AUTH__SECRET=...`.

use std::net::SocketAddr;
use std::time::Duration;

use quillpad_auth::CookieSettings;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub auth: AuthSettings,
    #[serde(default)]
    pub redis: RedisConfig,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub bootstrap: BootstrapConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.server.port == 0 {
            return Err("server.port must be > 0".into());
        }
        // The signing secret is the one setting with no usable default:
        // a guessable secret would let anyone mint admin tokens.
        match self.auth.secret.as_deref() {
            None | Some("") => {
                return Err(
                    "auth.secret is required (set it in the config file or QUILLPAD__AUTH__SECRET)"
                        .into(),
                );
            }
            Some(_) => {}
        }
        if self.auth.token_ttl_secs == 0 {
            return Err("auth.token_ttl_secs must be > 0".into());
        }
        let same_site = self.auth.cookie.same_site.as_str();
        if !["Strict", "Lax", "None"].contains(&same_site) {
            return Err("auth.cookie.same_site must be one of Strict, Lax, None".into());
        }
        if self.cache.list_ttl_secs == 0 || self.cache.item_ttl_secs == 0 {
            return Err("cache TTLs must be > 0".into());
        }
        if self.redis.enabled {
            if self.redis.url.is_empty() {
                return Err("redis.enabled=true requires redis.url".into());
            }
            if self.redis.pool_size == 0 {
                return Err("redis.pool_size must be > 0".into());
            }
            if self.redis.timeout_ms == 0 {
                return Err("redis.timeout_ms must be > 0".into());
            }
        }
        let lvl = self.logging.level.to_ascii_lowercase();
        let valid_levels = ["trace", "debug", "info", "warn", "error", "off"];
        if !valid_levels.contains(&lvl.as_str()) {
            return Err(format!("logging.level must be one of {valid_levels:?}"));
        }
        Ok(())
    }

    pub fn addr(&self) -> SocketAddr {
        use std::net::{IpAddr, Ipv4Addr};
        let host: IpAddr = self
            .server
            .host
            .parse()
            .unwrap_or(IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)));
        SocketAddr::from((host, self.server.port))
    }

    pub fn token_validity(&self) -> Duration {
        Duration::from_secs(self.auth.token_ttl_secs)
    }

    pub fn list_ttl(&self) -> Duration {
        Duration::from_secs(self.cache.list_ttl_secs)
    }

    pub fn item_ttl(&self) -> Duration {
        Duration::from_secs(self.cache.item_ttl_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_body_limit")]
    pub body_limit_bytes: usize,
}

fn default_host() -> String {
    "0.0.0.0".into()
}
fn default_port() -> u16 {
    8080
}
fn default_body_limit() -> usize {
    1024 * 1024
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            body_limit_bytes: default_body_limit(),
        }
    }
}

/// Token issuing and session cookie settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSettings {
    /// HMAC signing secret for tokens. Required; validation fails without it.
    #[serde(default)]
    pub secret: Option<String>,

    /// Validity window for issued tokens, in seconds.
    #[serde(default = "default_token_ttl_secs")]
    pub token_ttl_secs: u64,

    #[serde(default)]
    pub cookie: CookieSettings,
}

fn default_token_ttl_secs() -> u64 {
    3600
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            secret: None,
            token_ttl_secs: default_token_ttl_secs(),
            cookie: CookieSettings::default(),
        }
    }
}

/// Redis cache backend settings. Disabled by default; the server falls back
/// to the in-process cache, which is correct but not shared across instances.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisConfig {
    #[serde(default = "default_redis_enabled")]
    pub enabled: bool,

    #[serde(default = "default_redis_url")]
    pub url: String,

    #[serde(default = "default_redis_pool_size")]
    pub pool_size: usize,

    /// Per-operation timeout in milliseconds. Each operation is retried at
    /// most once, so a cache outage delays a request by at most two timeouts.
    #[serde(default = "default_redis_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_redis_enabled() -> bool {
    false
}
fn default_redis_url() -> String {
    "redis://localhost:6379".to_string()
}
fn default_redis_pool_size() -> usize {
    10
}
fn default_redis_timeout_ms() -> u64 {
    250
}

impl RedisConfig {
    pub fn op_timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            enabled: default_redis_enabled(),
            url: default_redis_url(),
            pool_size: default_redis_pool_size(),
            timeout_ms: default_redis_timeout_ms(),
        }
    }
}

/// TTLs for cached reads. Lists change on every note write, so they stay
/// fresh for tens of seconds; single items tolerate minutes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheSettings {
    #[serde(default = "default_list_ttl_secs")]
    pub list_ttl_secs: u64,

    #[serde(default = "default_item_ttl_secs")]
    pub item_ttl_secs: u64,
}

fn default_list_ttl_secs() -> u64 {
    30
}
fn default_item_ttl_secs() -> u64 {
    300
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            list_ttl_secs: default_list_ttl_secs(),
            item_ttl_secs: default_item_ttl_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".into()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// First-startup seeding.
///
/// Credentials can come from environment variables:
/// - `QUILLPAD__BOOTSTRAP__ADMIN_USER__EMAIL`
/// - `QUILLPAD__BOOTSTRAP__ADMIN_USER__PASSWORD`
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BootstrapConfig {
    /// If set, an admin account is created when the user store is empty.
    #[serde(default)]
    pub admin_user: Option<AdminUserConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminUserConfig {
    pub email: String,
    /// Plain text; hashed before storage. Prefer the env var over the file.
    pub password: String,
}

pub mod loader {
    use super::AppConfig;
    use config::{Config, Environment, File};
    use std::path::PathBuf;

    pub fn load_config(path: Option<&str>) -> Result<AppConfig, String> {
        let mut builder = Config::builder();
        match path {
            Some(p) => {
                let pathbuf = PathBuf::from(p);
                if pathbuf.exists() {
                    builder = builder.add_source(File::from(pathbuf));
                }
            }
            None => {
                let default_path = PathBuf::from("quillpad.toml");
                if default_path.exists() {
                    builder = builder.add_source(File::from(default_path));
                }
            }
        }
        // Environment variable overrides, e.g., QUILLPAD__SERVER__PORT=9090
        builder = builder.add_source(
            Environment::with_prefix("QUILLPAD")
                .try_parsing(true)
                .separator("__"),
        );
        let cfg = builder
            .build()
            .map_err(|e| format!("config build error: {e}"))?;
        let merged: AppConfig = cfg
            .try_deserialize()
            .map_err(|e| format!("config deserialize error: {e}"))?;
        merged.validate()?;
        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::{Config, File, FileFormat};

    fn parse(toml: &str) -> AppConfig {
        Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_defaults() {
        let cfg = parse("");
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.auth.token_ttl_secs, 3600);
        assert_eq!(cfg.cache.list_ttl_secs, 30);
        assert_eq!(cfg.cache.item_ttl_secs, 300);
        assert!(!cfg.redis.enabled);
        assert_eq!(cfg.logging.level, "info");
        assert!(cfg.bootstrap.admin_user.is_none());
    }

    #[test]
    fn test_validate_requires_secret() {
        let cfg = parse("");
        let err = cfg.validate().unwrap_err();
        assert!(err.contains("auth.secret"));

        let cfg = parse("[auth]\nsecret = \"\"");
        assert!(cfg.validate().is_err());

        let cfg = parse("[auth]\nsecret = \"s3cret\"");
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_validate_redis_settings() {
        let cfg = parse(
            "[auth]\nsecret = \"s\"\n[redis]\nenabled = true\nurl = \"\"",
        );
        assert!(cfg.validate().unwrap_err().contains("redis.url"));

        let cfg = parse(
            "[auth]\nsecret = \"s\"\n[redis]\nenabled = true\ntimeout_ms = 0",
        );
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_validate_logging_level() {
        let cfg = parse("[auth]\nsecret = \"s\"\n[logging]\nlevel = \"loud\"");
        assert!(cfg.validate().unwrap_err().contains("logging.level"));
    }

    #[test]
    fn test_parse_full_file() {
        let cfg = parse(
            r#"
            [server]
            host = "127.0.0.1"
            port = 3000

            [auth]
            secret = "s3cret"
            token_ttl_secs = 600

            [auth.cookie]
            secure = false

            [cache]
            list_ttl_secs = 10

            [bootstrap.admin_user]
            email = "admin@example.com"
            password = "changeme123"
            "#,
        );
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.addr().to_string(), "127.0.0.1:3000");
        assert_eq!(cfg.token_validity().as_secs(), 600);
        assert_eq!(cfg.list_ttl().as_secs(), 10);
        assert!(!cfg.auth.cookie.secure);
        assert_eq!(
            cfg.bootstrap.admin_user.unwrap().email,
            "admin@example.com"
        );
    }
}
