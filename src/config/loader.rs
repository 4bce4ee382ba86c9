//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::{ApiConfig, StoreBackend};
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid environment variable {name}={value}")]
    Env { name: &'static str, value: String },

    #[error("Unsupported database URL: {0}")]
    UnsupportedDatabase(String),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}

/// Load configuration: TOML file (if any), then environment overrides, then validation.
pub fn load_config(path: Option<&Path>) -> Result<ApiConfig, ConfigError> {
    load_config_with(path, |name| std::env::var(name).ok())
}

/// `load_config` with the environment lookup supplied by the caller.
pub fn load_config_with(
    path: Option<&Path>,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<ApiConfig, ConfigError> {
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => ApiConfig::default(),
    };

    apply_env(&mut config, lookup)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Apply `DATABASE_URL` and `PORT` overrides using the given lookup.
pub fn apply_env(config: &mut ApiConfig, lookup: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
    if let Some(url) = lookup("DATABASE_URL") {
        config.database.path = sqlite_path(&url)?;
        config.database.backend = StoreBackend::Sqlite;
        tracing::debug!(path = %config.database.path, "Database path taken from DATABASE_URL");
    }

    if let Some(port) = lookup("PORT") {
        let port: u16 = port.trim().parse().map_err(|_| ConfigError::Env {
            name: "PORT",
            value: port.clone(),
        })?;
        let host = config
            .listener
            .bind_address
            .rsplit_once(':')
            .map_or("0.0.0.0", |(host, _)| host);
        config.listener.bind_address = format!("{host}:{port}");
    }

    Ok(())
}

/// Resolve a database URL to a SQLite file path.
///
/// Accepts `sqlite:///relative.db`, `sqlite:////absolute.db`, `sqlite://`
/// (in-memory), `sqlite::memory:` and bare paths.
pub fn sqlite_path(url: &str) -> Result<String, ConfigError> {
    if url == "sqlite::memory:" || url == ":memory:" {
        return Ok(":memory:".to_string());
    }
    if let Some(rest) = url.strip_prefix("sqlite://") {
        if rest.is_empty() {
            return Ok(":memory:".to_string());
        }
        return Ok(rest.strip_prefix('/').unwrap_or(rest).to_string());
    }
    if url.contains("://") {
        return Err(ConfigError::UnsupportedDatabase(url.to_string()));
    }
    Ok(url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_sqlite_urls() {
        assert_eq!(sqlite_path("sqlite:////tmp/test.db").unwrap(), "/tmp/test.db");
        assert_eq!(sqlite_path("sqlite:///data/app.db").unwrap(), "data/app.db");
        assert_eq!(sqlite_path("sqlite://").unwrap(), ":memory:");
        assert_eq!(sqlite_path("sqlite::memory:").unwrap(), ":memory:");
        assert_eq!(sqlite_path("/var/lib/starwars.db").unwrap(), "/var/lib/starwars.db");
    }

    #[test]
    fn test_postgres_rejected() {
        let err = sqlite_path("postgres://user:pw@localhost/db").unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedDatabase(_)));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = ApiConfig::default();
        config.database.backend = StoreBackend::Memory;

        apply_env(&mut config, env(&[("DATABASE_URL", "sqlite:////srv/app.db"), ("PORT", "8000")])).unwrap();

        assert_eq!(config.database.backend, StoreBackend::Sqlite);
        assert_eq!(config.database.path, "/srv/app.db");
        assert_eq!(config.listener.bind_address, "0.0.0.0:8000");
    }

    #[test]
    fn test_bad_port() {
        let mut config = ApiConfig::default();
        let err = apply_env(&mut config, env(&[("PORT", "eighty")])).unwrap_err();
        assert_eq!(err.to_string(), "Invalid environment variable PORT=eighty");
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("api.toml");
        fs::write(
            &path,
            r#"
            [listener]
            bind_address = "127.0.0.1:4000"

            [database]
            backend = "memory"

            [observability]
            log_format = "json"
            "#,
        )
        .unwrap();

        let config = load_config_with(Some(path.as_path()), env(&[])).unwrap();

        assert_eq!(config.listener.bind_address, "127.0.0.1:4000");
        assert_eq!(config.database.backend, StoreBackend::Memory);
        assert_eq!(config.database.path, "/tmp/test.db");
        assert_eq!(config.timeouts.request_secs, 30);

        let config = load_config_with(Some(path.as_path()), env(&[("PORT", "4100")])).unwrap();
        assert_eq!(config.listener.bind_address, "127.0.0.1:4100");
    }

    #[test]
    fn test_invalid_file_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("api.toml");
        fs::write(&path, "[timeouts]\nrequest_secs = 0\n").unwrap();

        let err = load_config_with(Some(path.as_path()), env(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref errors) if errors[0].field == "timeouts.request_secs"));
    }

    #[test]
    fn test_missing_file() {
        let err = load_config(Some(Path::new("/nonexistent/starwars.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
