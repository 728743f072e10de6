//! Server configuration from environment variables.
//!
//! `HOST` (default 0.0.0.0), `PORT` (8080), `COURTS` (8), `LEVEL_MODE` (`single` or
//! `three`, default `single`) and `DATA_DIR` (`data`).

use std::path::PathBuf;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub courts: usize,
    /// Assign courts by three overlapping level tiers instead of one.
    pub three_level: bool,
    pub data_dir: PathBuf,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_courts() -> usize {
    8
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            courts: default_courts(),
            three_level: false,
            data_dir: default_data_dir(),
        }
    }
}

impl ServerConfig {
    /// Read the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Values that do not parse fall back to their default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let parsed = |key: &str| -> Option<String> {
            lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
        };
        let port = match parsed("PORT") {
            Some(v) => v.parse().unwrap_or_else(|_| {
                log::warn!("Invalid PORT '{}', using {}", v, default_port());
                default_port()
            }),
            None => default_port(),
        };
        let courts = match parsed("COURTS") {
            Some(v) => match v.parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    log::warn!("Invalid COURTS '{}', using {}", v, default_courts());
                    default_courts()
                }
            },
            None => default_courts(),
        };
        let three_level = match parsed("LEVEL_MODE").as_deref() {
            Some("three") => true,
            Some("single") | None => false,
            Some(other) => {
                log::warn!("Unknown LEVEL_MODE '{}', using single", other);
                false
            }
        };
        Self {
            host: parsed("HOST").unwrap_or_else(default_host),
            port,
            courts,
            three_level,
            data_dir: parsed("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(default_data_dir),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> ServerConfig {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        assert_eq!(config_from(&[]), ServerConfig::default());
    }

    #[test]
    fn reads_all_variables() {
        let cfg = config_from(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "9000"),
            ("COURTS", "3"),
            ("LEVEL_MODE", "three"),
            ("DATA_DIR", "/tmp/club"),
        ]);
        assert_eq!(cfg.host, "127.0.0.1");
        assert_eq!(cfg.port, 9000);
        assert_eq!(cfg.courts, 3);
        assert!(cfg.three_level);
        assert_eq!(cfg.data_dir, PathBuf::from("/tmp/club"));
    }

    #[test]
    fn bad_values_fall_back() {
        let cfg = config_from(&[("PORT", "http"), ("COURTS", "0"), ("LEVEL_MODE", "five")]);
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.courts, 8);
        assert!(!cfg.three_level);
    }
}
