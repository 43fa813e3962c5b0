//! Application configuration loaded from environment variables.

use std::env;
use std::time::Duration;

/// Primary environment variable holding the REST backend base URL.
pub const API_URL_VAR: &str = "API_URL";

/// Fallback name for the REST base URL, shared with the web front end.
pub const API_URL_FALLBACK_VAR: &str = "NEXT_PUBLIC_API_URL";

/// Development default values - NEVER use in production.
pub mod defaults {
    pub const DEV_API_URL: &str = "http://localhost:5000/api";
    pub const DEV_PAGE_SIZE: usize = 10;
    pub const DEV_QUERY_STALE_SECS: u64 = 300; // 5 minutes
    pub const DEV_QUERY_GC_SECS: u64 = 600; // 10 minutes
    pub const DEV_LIST_RETRIES: u32 = 1;
    pub const DIRECTORY_URL: &str = "https://graph.microsoft.com/v1.0";
}

/// Runtime environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    /// Parse environment from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Some(Self::Development),
            "production" | "prod" => Some(Self::Production),
            _ => None,
        }
    }

    /// Check if this is a development environment.
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    /// Check if this is a production environment.
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
        }
    }
}

/// Query cache timing configuration.
#[derive(Debug, Clone, Copy)]
pub struct QuerySettings {
    /// How long a cached list stays fresh before it is refetched
    pub stale_after: Duration,
    /// How long an unused entry is kept before garbage collection
    pub gc_after: Duration,
    /// Automatic retries for list queries (mutations never retry)
    pub list_retries: u32,
}

impl Default for QuerySettings {
    fn default() -> Self {
        Self {
            stale_after: Duration::from_secs(defaults::DEV_QUERY_STALE_SECS),
            gc_after: Duration::from_secs(defaults::DEV_QUERY_GC_SECS),
            list_retries: defaults::DEV_LIST_RETRIES,
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Runtime environment
    pub environment: Environment,
    /// Base URL for every REST call (no trailing slash)
    pub api_url: String,
    /// Base URL of the identity provider (defaults to `api_url`)
    pub auth_url: String,
    /// Default page size for management tables
    pub page_size: usize,
    /// Query cache settings
    pub query: QuerySettings,
    /// Enterprise directory API used to check group membership
    pub directory_url: String,
    /// Directory groups allowed to sign in through the enterprise directory
    pub directory_groups: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `RUST_ENV`: Environment (development/production) - REQUIRED
    /// - `API_URL` (or `NEXT_PUBLIC_API_URL`): REST base URL
    /// - `AUTH_URL`: identity provider base URL (default: API URL)
    /// - `CONSOLE_PAGE_SIZE`: table page size (default: 10)
    /// - `CONSOLE_QUERY_STALE_SECS`: list cache stale window (default: 300)
    /// - `CONSOLE_QUERY_GC_SECS`: list cache gc window (default: 600)
    /// - `CONSOLE_LIST_RETRIES`: list query retries (default: 1)
    /// - `DIRECTORY_URL`: enterprise directory API base URL
    /// - `CONSOLE_DIRECTORY_GROUPS`: comma separated directory groups
    pub fn from_env() -> Result<Self, ConfigError> {
        let env_str = env::var("RUST_ENV").map_err(|_| ConfigError::MissingEnvVar("RUST_ENV"))?;

        let environment = Environment::parse(&env_str).ok_or(ConfigError::InvalidValue(
            "RUST_ENV must be 'development' or 'production'",
        ))?;

        let api_url = env::var(API_URL_VAR)
            .or_else(|_| env::var(API_URL_FALLBACK_VAR))
            .unwrap_or_else(|_| defaults::DEV_API_URL.to_string());
        let api_url = normalize_base_url(&api_url);

        let auth_url = env::var("AUTH_URL")
            .map(|url| normalize_base_url(&url))
            .unwrap_or_else(|_| api_url.clone());

        let page_size = env::var("CONSOLE_PAGE_SIZE")
            .unwrap_or_else(|_| defaults::DEV_PAGE_SIZE.to_string())
            .parse::<usize>()
            .ok()
            .filter(|size| *size > 0)
            .ok_or(ConfigError::InvalidValue(
                "CONSOLE_PAGE_SIZE must be a positive number",
            ))?;

        let stale_secs = env::var("CONSOLE_QUERY_STALE_SECS")
            .unwrap_or_else(|_| defaults::DEV_QUERY_STALE_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| {
                ConfigError::InvalidValue("CONSOLE_QUERY_STALE_SECS must be a valid number")
            })?;

        let gc_secs = env::var("CONSOLE_QUERY_GC_SECS")
            .unwrap_or_else(|_| defaults::DEV_QUERY_GC_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidValue("CONSOLE_QUERY_GC_SECS must be a valid number"))?;

        if gc_secs < stale_secs {
            return Err(ConfigError::InvalidValue(
                "CONSOLE_QUERY_GC_SECS must not be shorter than CONSOLE_QUERY_STALE_SECS",
            ));
        }

        let list_retries = env::var("CONSOLE_LIST_RETRIES")
            .unwrap_or_else(|_| defaults::DEV_LIST_RETRIES.to_string())
            .parse::<u32>()
            .map_err(|_| ConfigError::InvalidValue("CONSOLE_LIST_RETRIES must be a valid number"))?;

        let directory_url = env::var("DIRECTORY_URL")
            .map(|url| normalize_base_url(&url))
            .unwrap_or_else(|_| defaults::DIRECTORY_URL.to_string());

        let directory_groups = env::var("CONSOLE_DIRECTORY_GROUPS")
            .map(|raw| parse_list(&raw))
            .unwrap_or_default();

        let config = Config {
            environment,
            api_url,
            auth_url,
            page_size,
            query: QuerySettings {
                stale_after: Duration::from_secs(stale_secs),
                gc_after: Duration::from_secs(gc_secs),
                list_retries,
            },
            directory_url,
            directory_groups,
        };

        if environment.is_production() {
            config.validate_production()?;
        }

        Ok(config)
    }

    /// Build a development configuration pointing at the given backend.
    pub fn for_api(api_url: &str) -> Self {
        let api_url = normalize_base_url(api_url);
        Self {
            environment: Environment::Development,
            auth_url: api_url.clone(),
            api_url,
            page_size: defaults::DEV_PAGE_SIZE,
            query: QuerySettings::default(),
            directory_url: defaults::DIRECTORY_URL.to_string(),
            directory_groups: Vec::new(),
        }
    }

    /// Validate that production configuration does not use development defaults.
    fn validate_production(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.api_url == defaults::DEV_API_URL {
            errors.push(format!(
                "{} is using development default '{}'. Set the production backend URL.",
                API_URL_VAR,
                defaults::DEV_API_URL
            ));
        }

        if !self.api_url.starts_with("https://") {
            errors.push(format!("{} must use https in production.", API_URL_VAR));
        }

        if !self.auth_url.starts_with("https://") {
            errors.push("AUTH_URL must use https in production.".to_string());
        }

        if !errors.is_empty() {
            return Err(ConfigError::ProductionValidation(errors));
        }

        Ok(())
    }

    /// Join a resource path onto the API base URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_url, path.trim_start_matches('/'))
    }

    /// Check if running in development mode.
    pub fn is_development(&self) -> bool {
        self.environment.is_development()
    }
}

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(&'static str),

    #[error("Production configuration validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    ProductionValidation(Vec<String>),
}
