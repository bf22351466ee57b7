use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Errors that can occur when loading configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to read the config file.
    ReadFile { path: PathBuf, source: std::io::Error },
    /// Failed to parse JSON.
    ParseJson { path: PathBuf, source: serde_json::Error },
    /// Validation error.
    Validation(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadFile { path, source } => {
                write!(f, "failed to read config file '{}': {}", path.display(), source)
            }
            Self::ParseJson { path, source } => {
                write!(f, "failed to parse config file '{}': {}", path.display(), source)
            }
            Self::Validation(msg) => write!(f, "config validation error: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ReadFile { source, .. } => Some(source),
            Self::ParseJson { source, .. } => Some(source),
            Self::Validation(_) => None,
        }
    }
}

#[derive(Deserialize, Default)]
struct ConfigFile {
    /// Bot token. May be omitted when the BOT_TOKEN environment variable is set.
    telegram_bot_token: Option<String>,
    /// Directory for state files (shopping lists, logs). Defaults to current directory.
    data_dir: Option<String>,
}

pub struct Config {
    pub telegram_bot_token: String,
    /// Directory for state files (shopping lists, logs).
    pub data_dir: PathBuf,
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Self::load_with_env(path, std::env::var("BOT_TOKEN").ok())
    }

    fn load_with_env<P: AsRef<Path>>(path: P, env_token: Option<String>) -> Result<Self, ConfigError> {
        let config_path = path.as_ref().to_path_buf();
        let file: ConfigFile = match std::fs::read_to_string(&config_path) {
            Ok(content) => serde_json::from_str(&content)
                .map_err(|e| ConfigError::ParseJson { path: config_path.clone(), source: e })?,
            // A token from the environment is enough to run without a config file.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound && env_token.is_some() => {
                ConfigFile::default()
            }
            Err(e) => return Err(ConfigError::ReadFile { path: config_path, source: e }),
        };

        let token = file
            .telegram_bot_token
            .filter(|t| !t.is_empty())
            .or(env_token)
            .ok_or_else(|| {
                ConfigError::Validation(
                    "telegram_bot_token is required (config file or BOT_TOKEN environment variable)".into(),
                )
            })?;

        // Telegram tokens are formatted as {bot_id}:{secret} where bot_id is numeric
        let token_parts: Vec<&str> = token.split(':').collect();
        if token_parts.len() != 2 || token_parts[0].parse::<u64>().is_err() || token_parts[1].is_empty() {
            return Err(ConfigError::Validation(
                "telegram_bot_token appears invalid (expected format: 123456789:ABCdefGHI...)".into()
            ));
        }

        let data_dir = file
            .data_dir
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));

        Ok(Self {
            telegram_bot_token: token,
            data_dir,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    fn assert_err<T>(result: Result<T, ConfigError>) -> ConfigError {
        match result {
            Ok(_) => panic!("expected error, got Ok"),
            Err(e) => e,
        }
    }

    #[test]
    fn test_valid_config() {
        let file = write_config(r#"{
            "telegram_bot_token": "123456789:ABCdefGHIjklMNOpqrsTUVwxyz",
            "data_dir": "/tmp/cartbot"
        }"#);
        let config = Config::load_with_env(file.path(), None).expect("should load valid config");
        assert_eq!(config.telegram_bot_token, "123456789:ABCdefGHIjklMNOpqrsTUVwxyz");
        assert_eq!(config.data_dir, PathBuf::from("/tmp/cartbot"));
    }

    #[test]
    fn test_data_dir_defaults_to_current_dir() {
        let file = write_config(r#"{
            "telegram_bot_token": "123456789:ABCdef"
        }"#);
        let config = Config::load_with_env(file.path(), None).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("."));
    }

    #[test]
    fn test_missing_token() {
        let file = write_config("{}");
        let err = assert_err(Config::load_with_env(file.path(), None));
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("telegram_bot_token"));
    }

    #[test]
    fn test_env_token_fallback() {
        let file = write_config("{}");
        let config =
            Config::load_with_env(file.path(), Some("123456789:ABCdef".to_string())).unwrap();
        assert_eq!(config.telegram_bot_token, "123456789:ABCdef");
    }

    #[test]
    fn test_file_token_wins_over_env() {
        let file = write_config(r#"{
            "telegram_bot_token": "111111:FromFile"
        }"#);
        let config =
            Config::load_with_env(file.path(), Some("222222:FromEnv".to_string())).unwrap();
        assert_eq!(config.telegram_bot_token, "111111:FromFile");
    }

    #[test]
    fn test_env_token_allows_missing_config_file() {
        let config = Config::load_with_env(
            "/nonexistent/path/cartbot.json",
            Some("123456789:ABCdef".to_string()),
        )
        .unwrap();
        assert_eq!(config.telegram_bot_token, "123456789:ABCdef");
        assert_eq!(config.data_dir, PathBuf::from("."));
    }

    #[test]
    fn test_invalid_token_format_no_colon() {
        let file = write_config(r#"{
            "telegram_bot_token": "invalid_token_no_colon"
        }"#);
        let err = assert_err(Config::load_with_env(file.path(), None));
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("invalid"));
    }

    #[test]
    fn test_invalid_token_format_non_numeric_id() {
        let file = write_config(r#"{
            "telegram_bot_token": "notanumber:ABCdef"
        }"#);
        let err = assert_err(Config::load_with_env(file.path(), None));
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_invalid_token_format_empty_secret() {
        let file = write_config(r#"{
            "telegram_bot_token": "123456789:"
        }"#);
        let err = assert_err(Config::load_with_env(file.path(), None));
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_file_not_found_without_env() {
        let err = assert_err(Config::load_with_env("/nonexistent/path/config.json", None));
        assert!(matches!(err, ConfigError::ReadFile { .. }));
    }

    #[test]
    fn test_invalid_json() {
        let file = write_config("{ invalid json }");
        let err = assert_err(Config::load_with_env(file.path(), None));
        assert!(matches!(err, ConfigError::ParseJson { .. }));
    }
}
