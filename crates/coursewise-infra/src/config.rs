//! Configuration loading.
//!
//! Config comes from an optional TOML file; the Bedrock API key comes from
//! the environment only and never appears in the file or in logs.

use std::path::Path;

use secrecy::SecretString;

use coursewise_types::config::AppConfig;

/// Environment variables checked for the Bedrock bearer token, in order.
const API_KEY_VARS: [&str; 2] = ["COURSEWISE_BEDROCK_API_KEY", "AWS_BEARER_TOKEN_BEDROCK"];

/// Load configuration from a TOML file.
///
/// A missing or unreadable file falls back to defaults, as does a file
/// that fails to parse; the service should start with a usable config in
/// every case.
pub async fn load_config(path: impl AsRef<Path>) -> AppConfig {
    let path = path.as_ref();
    let raw = match tokio::fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "no config file, using defaults");
            return AppConfig::default();
        }
    };

    match toml::from_str(&raw) {
        Ok(config) => {
            tracing::info!(path = %path.display(), "configuration loaded");
            config
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "config file unparsable, using defaults");
            AppConfig::default()
        }
    }
}

/// Read the Bedrock API key from the environment.
///
/// Checks `COURSEWISE_BEDROCK_API_KEY` first, then
/// `AWS_BEARER_TOKEN_BEDROCK`. Returns None when neither is set or the
/// value is blank.
pub fn bedrock_api_key_from_env() -> Option<SecretString> {
    for var in API_KEY_VARS {
        if let Ok(value) = std::env::var(var) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                return Some(SecretString::from(trimmed.to_string()));
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    #[tokio::test]
    async fn test_missing_file_uses_defaults() {
        let config = load_config("/nonexistent/config.toml").await;
        assert_eq!(config.server.port, 8080);
    }

    #[tokio::test]
    async fn test_valid_file_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"[server]\nport = 3000\n").unwrap();

        let config = load_config(file.path()).await;
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.bedrock.region, "us-east-1");
    }

    #[tokio::test]
    async fn test_unparsable_file_uses_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"this is { not toml").unwrap();

        let config = load_config(file.path()).await;
        assert_eq!(config.server.port, 8080);
    }
}
