//! Service configuration loaded from environment variables.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use serde::{de, Deserialize, Deserializer};
use strum::{Display, EnumString};

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LogFormat {
    /// Human readable, multi-field lines.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // === Server Configuration ===
    /// Host address the HTTP server binds to.
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP server port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Enable debug logging.
    #[serde(default)]
    pub debug: bool,

    // === Observability ===
    /// Log level filter (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub rust_log: String,

    /// Log output format, case-insensitive.
    #[serde(default, deserialize_with = "deserialize_log_format")]
    pub log_format: LogFormat,

    /// Port for the Prometheus exporter. Disabled when unset.
    #[serde(default)]
    pub metrics_port: Option<u16>,
}

fn deserialize_log_format<'de, D>(deserializer: D) -> Result<LogFormat, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    raw.trim()
        .parse()
        .map_err(|_| de::Error::custom(format!("unknown LOG_FORMAT {:?}, expected pretty or json", raw)))
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            debug: false,
            rust_log: default_log_level(),
            log_format: LogFormat::default(),
            metrics_port: None,
        }
    }
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> Result<(), String> {
        if self.host.trim().is_empty() {
            return Err("HOST must not be empty".to_string());
        }

        if self.port == 0 {
            return Err("PORT must be greater than 0".to_string());
        }

        if let Some(metrics_port) = self.metrics_port {
            if metrics_port == 0 {
                return Err("METRICS_PORT must be greater than 0".to_string());
            }
            if metrics_port == self.port {
                return Err("METRICS_PORT must differ from PORT".to_string());
            }
        }

        self.bind_addr()?;

        Ok(())
    }

    /// Resolve the HTTP listen address.
    pub fn bind_addr(&self) -> Result<SocketAddr, String> {
        Ok(SocketAddr::new(self.host_ip()?, self.port))
    }

    /// Resolve the Prometheus exporter address, sharing the HTTP host.
    pub fn metrics_addr(&self) -> Option<Result<SocketAddr, String>> {
        self.metrics_port
            .map(|port| self.host_ip().map(|ip| SocketAddr::new(ip, port)))
    }

    fn host_ip(&self) -> Result<IpAddr, String> {
        let host = self.host.trim();
        if host.eq_ignore_ascii_case("localhost") {
            return Ok(IpAddr::V4(Ipv4Addr::LOCALHOST));
        }
        host.parse()
            .map_err(|e| format!("invalid HOST {:?}: {}", self.host, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values_are_sensible() {
        let config = Config::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 5000);
        assert_eq!(config.rust_log, "info");
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert!(config.metrics_port.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_zero_port() {
        let config = Config {
            port: 0,
            ..Config::default()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_empty_host() {
        let config = Config {
            host: "  ".to_string(),
            ..Config::default()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_metrics_port_clash() {
        let config = Config {
            metrics_port: Some(5000),
            ..Config::default()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_unparseable_host() {
        let config = Config {
            host: "not a host".to_string(),
            ..Config::default()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn localhost_resolves_to_loopback() {
        let config = Config {
            host: "localhost".to_string(),
            port: 8080,
            ..Config::default()
        };

        let addr = config.bind_addr().unwrap();
        assert_eq!(addr, "127.0.0.1:8080".parse::<SocketAddr>().unwrap());
    }

    #[test]
    fn metrics_addr_shares_host() {
        let config = Config {
            host: "127.0.0.1".to_string(),
            metrics_port: Some(9100),
            ..Config::default()
        };

        let addr = config.metrics_addr().unwrap().unwrap();
        assert_eq!(addr, "127.0.0.1:9100".parse::<SocketAddr>().unwrap());
    }

    #[test]
    fn log_format_parses_case_insensitively() {
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("pretty".parse::<LogFormat>().unwrap(), LogFormat::Pretty);
        assert!("xml".parse::<LogFormat>().is_err());
        assert_eq!(LogFormat::Json.to_string(), "json");
    }

    #[test]
    fn log_format_env_is_case_insensitive() {
        let vars = vec![("LOG_FORMAT".to_string(), "JSON".to_string())];
        let config: Config = envy::from_iter(vars).unwrap();
        assert_eq!(config.log_format, LogFormat::Json);

        let vars = vec![("LOG_FORMAT".to_string(), "Pretty".to_string())];
        let config: Config = envy::from_iter(vars).unwrap();
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn log_format_env_rejects_unknown_values() {
        let vars = vec![("LOG_FORMAT".to_string(), "xml".to_string())];
        assert!(envy::from_iter::<_, Config>(vars).is_err());
    }

    #[test]
    fn loads_from_env_iterator() {
        let vars = vec![
            ("PORT".to_string(), "8081".to_string()),
            ("LOG_FORMAT".to_string(), "json".to_string()),
            ("METRICS_PORT".to_string(), "9100".to_string()),
        ];

        let config: Config = envy::from_iter(vars).unwrap();
        assert_eq!(config.port, 8081);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.metrics_port, Some(9100));
    }
}
