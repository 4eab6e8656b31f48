use std::path::PathBuf;

use axum::http::HeaderValue;

/// Configuration errors detected while loading the environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} must be set")]
    Missing { var: &'static str },

    #[error("{var} has an invalid value '{value}': {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Labels shown by the administrative console.
///
/// Set once at startup and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminSiteConfig {
    /// Path segment the console is mounted under (no slashes).
    pub path: String,
    pub site_header: String,
    pub site_title: String,
    pub index_title: String,
}

impl Default for AdminSiteConfig {
    fn default() -> Self {
        Self {
            path: "supersecret".into(),
            site_header: "Real Coop Admin".into(),
            site_title: "Real Coop Admin Portal".into(),
            index_title: "Welcome to the Real Coop Portal".into(),
        }
    }
}

/// Where uploaded media lives and the URL prefix it is served under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaConfig {
    /// URL prefix, always starting with `/` and never ending with one.
    pub url: String,
    /// Filesystem directory files are served from.
    pub root: PathBuf,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            url: "/media".into(),
            root: PathBuf::from("media"),
        }
    }
}

impl MediaConfig {
    /// Public URL of a file stored under the media root.
    pub fn url_for(&self, relative_path: &str) -> String {
        format!("{}/{}", self.url, relative_path.trim_start_matches('/'))
    }
}

/// Server configuration loaded from environment variables.
///
/// All fields except the database URL have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// PostgreSQL connection string (required).
    pub database_url: String,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    pub media: MediaConfig,
    pub admin: AdminSiteConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                             |
    /// |------------------------|-------------------------------------|
    /// | `HOST`                 | `0.0.0.0`                           |
    /// | `PORT`                 | `3000`                              |
    /// | `DATABASE_URL`         | required                            |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`             |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                                |
    /// | `MEDIA_URL`            | `/media`                            |
    /// | `MEDIA_ROOT`           | `media`                             |
    /// | `ADMIN_PATH`           | `supersecret`                       |
    /// | `ADMIN_SITE_HEADER`    | `Real Coop Admin`                   |
    /// | `ADMIN_SITE_TITLE`     | `Real Coop Admin Portal`            |
    /// | `ADMIN_INDEX_TITLE`    | `Welcome to the Real Coop Portal`   |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let or_default = |var: &str, default: &str| lookup(var).unwrap_or_else(|| default.into());

        let host = or_default("HOST", "0.0.0.0");
        let port = parse_var("PORT", or_default("PORT", "3000"))?;
        let database_url = lookup("DATABASE_URL").ok_or(ConfigError::Missing {
            var: "DATABASE_URL",
        })?;

        let cors_origins: Vec<String> = or_default("CORS_ORIGINS", "http://localhost:5173")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        for origin in &cors_origins {
            HeaderValue::from_str(origin).map_err(|e| ConfigError::Invalid {
                var: "CORS_ORIGINS",
                value: origin.clone(),
                reason: e.to_string(),
            })?;
        }

        let request_timeout_secs =
            parse_var("REQUEST_TIMEOUT_SECS", or_default("REQUEST_TIMEOUT_SECS", "30"))?;

        let media_defaults = MediaConfig::default();
        let media = MediaConfig {
            url: normalize_url_prefix("MEDIA_URL", &or_default("MEDIA_URL", &media_defaults.url))?,
            root: lookup("MEDIA_ROOT")
                .map(PathBuf::from)
                .unwrap_or(media_defaults.root),
        };

        let admin_defaults = AdminSiteConfig::default();
        let admin_path = or_default("ADMIN_PATH", &admin_defaults.path)
            .trim_matches('/')
            .to_string();
        if admin_path.is_empty() || admin_path.contains('/') {
            return Err(ConfigError::Invalid {
                var: "ADMIN_PATH",
                value: admin_path,
                reason: "must be a single non-empty path segment".into(),
            });
        }
        let admin = AdminSiteConfig {
            path: admin_path,
            site_header: or_default("ADMIN_SITE_HEADER", &admin_defaults.site_header),
            site_title: or_default("ADMIN_SITE_TITLE", &admin_defaults.site_title),
            index_title: or_default("ADMIN_INDEX_TITLE", &admin_defaults.index_title),
        };

        Ok(Self {
            host,
            port,
            database_url,
            cors_origins,
            request_timeout_secs,
            media,
            admin,
        })
    }
}

fn parse_var<T>(var: &'static str, value: String) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.parse().map_err(|e: T::Err| ConfigError::Invalid {
        var,
        reason: e.to_string(),
        value,
    })
}

/// `media/` -> `/media`. The root prefix `/` is refused.
fn normalize_url_prefix(var: &'static str, raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim_matches('/');
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid {
            var,
            value: raw.to_string(),
            reason: "must not be empty or '/'".into(),
        });
    }
    Ok(format!("/{trimmed}"))
}
