use std::time::Duration;

use crate::cache::CacheConfig;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("Invalid SUPABASE_URL format. Expected: https://PROJECT.supabase.co")]
    BadSupabaseUrl,
    #[error("{0} is not a valid number")]
    BadNumber(&'static str),
}

/// Process configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub redis_url: String,
    pub supabase_url: String,
    pub project_ref: String,
    pub anon_key: String,
    /// Used for storage writes; falls back to the anon key.
    pub service_role_key: String,
    /// Enables HS256 validation next to the JWKS keys.
    pub jwt_secret: Option<String>,
    pub storage_bucket: String,
    /// Origin of the web client, used for the password reset redirect.
    pub public_app_url: String,
    pub port: u16,
    pub run_migrations: bool,
    pub cache: CacheConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any key lookup (the environment in production).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing(key))
        };

        let supabase_url = required("SUPABASE_URL")?
            .trim_end_matches('/')
            .to_string();
        let project_ref = project_ref(&supabase_url)
            .ok_or(ConfigError::BadSupabaseUrl)?
            .to_string();
        let anon_key = required("SUPABASE_ANON_KEY")?;

        let port = match lookup("PORT") {
            Some(p) => p.parse().map_err(|_| ConfigError::BadNumber("PORT"))?,
            None => 8080,
        };

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            redis_url: required("REDIS_URL")?,
            service_role_key: lookup("SUPABASE_SERVICE_ROLE_KEY").unwrap_or_else(|| anon_key.clone()),
            jwt_secret: lookup("SUPABASE_JWT_SECRET").filter(|s| !s.is_empty()),
            storage_bucket: lookup("STORAGE_BUCKET").unwrap_or_else(|| "user-images".to_string()),
            public_app_url: lookup("PUBLIC_APP_URL")
                .unwrap_or_else(|| "http://localhost:5173".to_string())
                .trim_end_matches('/')
                .to_string(),
            run_migrations: lookup("RUN_MIGRATIONS").is_some_and(|v| v == "true" || v == "1"),
            cache: CacheConfig {
                directory_ttl: duration_secs(&lookup, "CACHE_TTL_DIRECTORY", 300),
                profile_ttl: duration_secs(&lookup, "CACHE_TTL_PROFILES", 900),
            },
            supabase_url,
            project_ref,
            anon_key,
            port,
        })
    }

    /// Where the reset email sends the user.
    pub fn password_reset_redirect(&self) -> String {
        format!("{}/reset-password", self.public_app_url)
    }
}

/// Extract `PROJECT` from `https://PROJECT.supabase.co`.
pub fn project_ref(supabase_url: &str) -> Option<&str> {
    supabase_url
        .strip_prefix("https://")
        .and_then(|s| s.strip_suffix(".supabase.co"))
        .filter(|s| !s.is_empty())
}

fn duration_secs<F>(lookup: &F, key: &str, default: u64) -> Duration
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .and_then(|v| v.parse().ok())
        .map(Duration::from_secs)
        .unwrap_or_else(|| Duration::from_secs(default))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    const BASE: &[(&str, &str)] = &[
        ("DATABASE_URL", "postgres://localhost/journata"),
        ("REDIS_URL", "redis://localhost"),
        ("SUPABASE_URL", "https://abcd1234.supabase.co/"),
        ("SUPABASE_ANON_KEY", "anon"),
    ];

    #[test]
    fn defaults_apply() {
        let config = AppConfig::from_lookup(env(BASE)).unwrap();
        assert_eq!(config.project_ref, "abcd1234");
        assert_eq!(config.supabase_url, "https://abcd1234.supabase.co");
        assert_eq!(config.port, 8080);
        assert_eq!(config.storage_bucket, "user-images");
        assert_eq!(config.service_role_key, "anon");
        assert!(config.jwt_secret.is_none());
        assert!(!config.run_migrations);
        assert_eq!(config.cache.directory_ttl, Duration::from_secs(300));
        assert_eq!(
            config.password_reset_redirect(),
            "http://localhost:5173/reset-password"
        );
    }

    #[test]
    fn missing_database_url_is_reported() {
        let pairs: Vec<_> = BASE
            .iter()
            .copied()
            .filter(|(k, _)| *k != "DATABASE_URL")
            .collect();
        let err = AppConfig::from_lookup(env(&pairs)).unwrap_err();
        assert_eq!(err, ConfigError::Missing("DATABASE_URL"));
    }

    #[test]
    fn non_supabase_url_is_rejected() {
        assert_eq!(project_ref("http://localhost:54321"), None);
        assert_eq!(project_ref("https://.supabase.co"), None);
        assert_eq!(project_ref("https://xyz.supabase.co"), Some("xyz"));
    }

    #[test]
    fn bad_port_is_an_error() {
        let mut pairs = BASE.to_vec();
        pairs.push(("PORT", "eighty"));
        assert_eq!(
            AppConfig::from_lookup(env(&pairs)).unwrap_err(),
            ConfigError::BadNumber("PORT")
        );
    }
}
