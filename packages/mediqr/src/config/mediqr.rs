use super::{ApiConfig, LogConfig, QrConfig, StoreConfig, MEDIQR_PREFIX};
use crate::error::{ConfigError, Error};
use crate::Args;
use config::{Config, Environment};
use regex::Regex;
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Clone, Debug, Default, Deserialize)]
pub struct MediqrConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub qr: QrConfig,
    #[serde(default)]
    pub log: LogConfig,
}

/// Config defaults to a file called `mediqr.toml` in the current directory.
/// Supports TOML and JSON.
/// Variable names should match the struct field names.
///
/// ENV vars can be used to override file settings.
///
/// ENV vars must be prefixed with `MEDIQR_`.
///
impl MediqrConfig {
    pub fn load(args: &Args) -> Result<MediqrConfig, Error> {
        if !PathBuf::from(&args.config_file_path).exists() {
            eprintln!(
                "Configuration file was not found: {}",
                args.config_file_path
            );
            eprintln!("Loading config values from environment variables.");
        }
        let mut config = MediqrConfig::build(&args.config_file_path)?;

        // If log level is default, it has not been set by the user in config
        if config.log.level == LogConfig::default_log_level() {
            config.log.level = args.log_level;
        }

        // If log format is default, it has not been set by the user in config
        if config.log.format == LogConfig::default_log_format() {
            config.log.format = args.log_format;
        }

        Ok(config)
    }

    pub fn build(path: &str) -> Result<Self, Error> {
        // For parsing nested env values such as MEDIQR_STORE__BACKEND, MEDIQR_API__LATENCY_MS
        let env_source = Environment::with_prefix(MEDIQR_PREFIX)
            .try_parsing(true)
            .separator("__")
            .prefix_separator("_");

        let config: Self = Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(env_source)
            .build()?
            .try_deserialize()
            .map_err(|err| match err {
                config::ConfigError::Message(ref s) => match s {
                    s if s.contains("missing field") => {
                        let name = extract_field_name(s).unwrap_or_else(|| "unknown".to_string());
                        ConfigError::MissingParameter { name }
                    }
                    s if s.contains("unknown variant") => {
                        let (name, value) = extract_invalid_variant(s);
                        ConfigError::InvalidParameter { name, value }
                    }
                    _ => err.into(),
                },
                _ => err.into(),
            })?;

        Ok(config)
    }
}

///
/// Extracts a field name (if present) from a config::ConfigError::Message
/// This is called in `build` if a ConfigError message contains the string `missing field`
///
fn extract_field_name(input: &str) -> Option<String> {
    let re = Regex::new(r"`(\w+)`").ok()?;
    re.captures(input)
        .and_then(|caps| caps.get(1).map(|m| m.as_str().to_string()))
}

///
/// Extracts the rejected value and the enclosing key from a config::ConfigError::Message
/// This is called in `build` if a ConfigError message contains the string `unknown variant`
///
/// Error string is ``unknown variant `{value}`, expected one of ... for key `{name}` ``
///
fn extract_invalid_variant(input: &str) -> (String, String) {
    let re = match Regex::new(r"`([^`]+)`") {
        Ok(re) => re,
        Err(_) => return ("unknown".to_string(), "".to_string()),
    };

    let quoted = re
        .captures_iter(input)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str().to_string()))
        .collect::<Vec<_>>();

    let value = quoted.first().cloned().unwrap_or_default();

    let name = input
        .rsplit_once("for key")
        .and_then(|(_, key)| re.captures(key))
        .and_then(|caps| caps.get(1).map(|m| m.as_str().to_string()))
        .unwrap_or_else(|| "unknown".to_string());

    (name, value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{StoreBackend, DEFAULT_LATENCY_MS};
    use crate::test_helpers::with_no_mediqr_vars;
    use std::time::Duration;

    const TEST_CONFIG: &str = "tests/config/mediqr-test.toml";

    #[test]
    fn loads_values_from_file() {
        with_no_mediqr_vars(|| {
            let config = MediqrConfig::build(TEST_CONFIG).unwrap();

            assert_eq!(config.store.backend, StoreBackend::Memory);
            assert_eq!(config.store.quota_bytes, Some(1_048_576));
            assert_eq!(config.api.latency(), Duration::from_millis(0));
            assert_eq!(config.qr.endpoint, "http://localhost:9999/read-qr-code/");
            assert_eq!(
                config.qr.create_endpoint,
                "http://localhost:9999/create-qr-code/"
            );
            assert_eq!(config.qr.card_size, 200);
        });
    }

    #[test]
    fn defaults_without_file() {
        with_no_mediqr_vars(|| {
            let config = MediqrConfig::build("tests/config/unknown.toml").unwrap();

            assert_eq!(config.store.backend, StoreBackend::Sled);
            assert_eq!(config.store.path, "mediqr-data");
            assert_eq!(config.api.latency_ms, DEFAULT_LATENCY_MS);
            assert_eq!(
                config.qr.endpoint,
                "https://api.qrserver.com/v1/read-qr-code/"
            );
            assert_eq!(
                config.qr.create_endpoint,
                "https://api.qrserver.com/v1/create-qr-code/"
            );
        });
    }

    #[test]
    fn environment_overrides_file() {
        with_no_mediqr_vars(|| {
            temp_env::with_vars(
                [
                    ("MEDIQR_API__LATENCY_MS", Some("250")),
                    ("MEDIQR_STORE__BACKEND", Some("sled")),
                    ("MEDIQR_STORE__PATH", Some("/tmp/mediqr")),
                ],
                || {
                    let config = MediqrConfig::build(TEST_CONFIG).unwrap();
                    assert_eq!(config.api.latency(), Duration::from_millis(250));
                    assert_eq!(config.store.backend, StoreBackend::Sled);
                    assert_eq!(config.store.path, "/tmp/mediqr");
                },
            );
        });
    }

    #[test]
    fn unknown_backend_is_a_config_error() {
        with_no_mediqr_vars(|| {
            let config = MediqrConfig::build("tests/config/mediqr-bad-backend.toml");

            assert!(config.is_err());
            assert!(matches!(config.unwrap_err(), Error::Config(_)));
        });
    }

    #[test]
    fn extracts_invalid_variant() {
        let msg = "unknown variant `postgres`, expected `memory` or `sled` for key `store.backend`";
        let (name, value) = extract_invalid_variant(msg);
        assert_eq!(name, "store.backend");
        assert_eq!(value, "postgres");
    }

    #[test]
    fn extracts_missing_field() {
        let name = extract_field_name("missing field `endpoint`");
        assert_eq!(name, Some("endpoint".to_string()));
    }
}
