use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Connection details for the hosted Supabase project.
#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    /// Base project URL, without a trailing slash (e.g. `https://abc.supabase.co`).
    pub url: String,
    pub anon_key: String,
    /// Needed for storage uploads and the admin user API.
    pub service_role_key: Option<String>,
    /// Legacy projects sign JWTs with HS256; when set it replaces JWKS verification.
    pub jwt_secret: Option<String>,
}

/// Bounded retry for read queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: Duration::from_millis(200),
        }
    }
}

/// Cache TTLs for the Redis query cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    pub finance_ttl: Duration,
    pub roster_ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            finance_ttl: Duration::from_secs(60),
            roster_ttl: Duration::from_secs(300),
        }
    }
}

/// Application configuration, built once at startup and shared through `web::Data`.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub supabase: SupabaseConfig,
    pub redis_url: Option<String>,
    pub port: u16,
    pub run_migrations: bool,
    pub read_retry: RetryPolicy,
    pub cache: CacheConfig,
    /// Commission percentage printed on contracts when an event carries none.
    pub default_commission_rate: f64,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any key lookup (the process environment in production).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let database_url = get("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let supabase_url = get("SUPABASE_URL").ok_or(ConfigError::Missing("SUPABASE_URL"))?;
        if !supabase_url.starts_with("http://") && !supabase_url.starts_with("https://") {
            return Err(ConfigError::Invalid {
                name: "SUPABASE_URL",
                value: supabase_url,
            });
        }
        let anon_key = get("SUPABASE_ANON_KEY").ok_or(ConfigError::Missing("SUPABASE_ANON_KEY"))?;

        let defaults = RetryPolicy::default();
        let cache_defaults = CacheConfig::default();

        Ok(Self {
            database_url,
            supabase: SupabaseConfig {
                url: supabase_url.trim_end_matches('/').to_string(),
                anon_key,
                service_role_key: get("SUPABASE_SERVICE_ROLE_KEY"),
                jwt_secret: get("SUPABASE_JWT_SECRET"),
            },
            redis_url: get("REDIS_URL"),
            port: parse_or("PORT", get("PORT"), 8080)?,
            run_migrations: parse_bool("RUN_MIGRATIONS", get("RUN_MIGRATIONS"))?,
            read_retry: RetryPolicy {
                max_attempts: parse_or(
                    "READ_RETRY_ATTEMPTS",
                    get("READ_RETRY_ATTEMPTS"),
                    defaults.max_attempts,
                )?
                .max(1),
                backoff: Duration::from_millis(parse_or(
                    "READ_RETRY_BACKOFF_MS",
                    get("READ_RETRY_BACKOFF_MS"),
                    defaults.backoff.as_millis() as u64,
                )?),
            },
            cache: CacheConfig {
                finance_ttl: Duration::from_secs(parse_or(
                    "CACHE_TTL_FINANCE",
                    get("CACHE_TTL_FINANCE"),
                    cache_defaults.finance_ttl.as_secs(),
                )?),
                roster_ttl: Duration::from_secs(parse_or(
                    "CACHE_TTL_ROSTER",
                    get("CACHE_TTL_ROSTER"),
                    cache_defaults.roster_ttl.as_secs(),
                )?),
            },
            default_commission_rate: parse_or(
                "DEFAULT_COMMISSION_RATE",
                get("DEFAULT_COMMISSION_RATE"),
                20.0,
            )?,
        })
    }

    /// Storage uploads and admin user deletion need the service-role key.
    pub fn privileged_backend_configured(&self) -> bool {
        self.supabase.service_role_key.is_some()
    }
}

fn parse_or<T: std::str::FromStr>(
    name: &'static str,
    raw: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
    }
}

fn parse_bool(name: &'static str, raw: Option<String>) -> Result<bool, ConfigError> {
    match raw.as_deref().map(|v| v.trim().to_ascii_lowercase()) {
        None => Ok(false),
        Some(v) if matches!(v.as_str(), "1" | "true" | "yes") => Ok(true),
        Some(v) if matches!(v.as_str(), "0" | "false" | "no") => Ok(false),
        Some(value) => Err(ConfigError::Invalid { name, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const REQUIRED: [(&str, &str); 3] = [
        ("DATABASE_URL", "postgres://localhost/bookings"),
        ("SUPABASE_URL", "https://demo.supabase.co/"),
        ("SUPABASE_ANON_KEY", "anon"),
    ];

    #[test]
    fn defaults_apply_when_optional_vars_are_absent() {
        let config = AppConfig::from_lookup(lookup(&REQUIRED)).unwrap();

        assert_eq!(config.supabase.url, "https://demo.supabase.co");
        assert_eq!(config.port, 8080);
        assert!(!config.run_migrations);
        assert_eq!(config.read_retry, RetryPolicy::default());
        assert_eq!(config.cache, CacheConfig::default());
        assert_eq!(config.default_commission_rate, 20.0);
        assert!(config.redis_url.is_none());
        assert!(!config.privileged_backend_configured());
    }

    #[test]
    fn missing_required_var_is_reported() {
        let err = AppConfig::from_lookup(lookup(&REQUIRED[1..])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("DATABASE_URL"));
    }

    #[test]
    fn blank_values_count_as_missing() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("SUPABASE_SERVICE_ROLE_KEY", "   "));
        let config = AppConfig::from_lookup(lookup(&pairs)).unwrap();
        assert!(config.supabase.service_role_key.is_none());
    }

    #[test]
    fn invalid_numbers_are_rejected() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("PORT", "eighty"));
        let err = AppConfig::from_lookup(lookup(&pairs)).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "PORT", .. }));
    }

    #[test]
    fn overrides_are_parsed() {
        let mut pairs = REQUIRED.to_vec();
        pairs.extend([
            ("RUN_MIGRATIONS", "true"),
            ("READ_RETRY_ATTEMPTS", "0"),
            ("READ_RETRY_BACKOFF_MS", "50"),
            ("DEFAULT_COMMISSION_RATE", "15"),
            ("SUPABASE_JWT_SECRET", "secret"),
        ]);
        let config = AppConfig::from_lookup(lookup(&pairs)).unwrap();

        assert!(config.run_migrations);
        assert_eq!(config.read_retry.max_attempts, 1);
        assert_eq!(config.read_retry.backoff, Duration::from_millis(50));
        assert_eq!(config.default_commission_rate, 15.0);
        assert_eq!(config.supabase.jwt_secret.as_deref(), Some("secret"));
    }

    #[test]
    fn non_http_supabase_url_is_invalid() {
        let pairs = [
            ("DATABASE_URL", "postgres://localhost/bookings"),
            ("SUPABASE_URL", "demo.supabase.co"),
            ("SUPABASE_ANON_KEY", "anon"),
        ];
        let err = AppConfig::from_lookup(lookup(&pairs)).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "SUPABASE_URL", .. }));
    }
}
