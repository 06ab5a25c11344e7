use std::time::Duration;

const DEFAULT_SUBMIT_BASE_URL: &str = "http://127.0.0.1:5000";
const DEFAULT_SUBMIT_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} must be a whole number of seconds, got {value:?}")]
    InvalidTimeout { name: &'static str, value: String },
    #[error("{name} must start with http:// or https://, got {value:?}")]
    InvalidUrl { name: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub submit_base_url: String,
    pub submit_timeout: Duration,
}

impl Config {
    /// Reads the process environment. Call `dotenv()` first to pick up `.env`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let submit_base_url = lookup("SUBMIT_BASE_URL")
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_SUBMIT_BASE_URL.to_string());
        if !submit_base_url.starts_with("http://") && !submit_base_url.starts_with("https://") {
            return Err(ConfigError::InvalidUrl {
                name: "SUBMIT_BASE_URL",
                value: submit_base_url,
            });
        }

        let submit_timeout = match lookup("SUBMIT_TIMEOUT_SECS") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(ConfigError::InvalidTimeout {
                        name: "SUBMIT_TIMEOUT_SECS",
                        value: raw,
                    })
                }
            },
            None => Duration::from_secs(DEFAULT_SUBMIT_TIMEOUT_SECS),
        };

        Ok(Self {
            submit_base_url,
            submit_timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_with(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = config_with(&[]).unwrap();
        assert_eq!(config.submit_base_url, DEFAULT_SUBMIT_BASE_URL);
        assert_eq!(config.submit_timeout, Duration::from_secs(15));
    }

    #[test]
    fn values_are_read_and_normalised() {
        let config = config_with(&[
            ("SUBMIT_BASE_URL", "https://quiz.example.com/"),
            ("SUBMIT_TIMEOUT_SECS", " 30 "),
        ])
        .unwrap();
        assert_eq!(config.submit_base_url, "https://quiz.example.com");
        assert_eq!(config.submit_timeout, Duration::from_secs(30));
    }

    #[test]
    fn bad_values_are_rejected() {
        assert!(matches!(
            config_with(&[("SUBMIT_TIMEOUT_SECS", "0")]),
            Err(ConfigError::InvalidTimeout { .. })
        ));
        assert!(matches!(
            config_with(&[("SUBMIT_TIMEOUT_SECS", "soon")]),
            Err(ConfigError::InvalidTimeout { .. })
        ));
        assert!(matches!(
            config_with(&[("SUBMIT_BASE_URL", "localhost:5000")]),
            Err(ConfigError::InvalidUrl { .. })
        ));
    }
}
