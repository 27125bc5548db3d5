//! Configuration loaded from environment variables

use std::time::Duration;

use crate::capture::DEFAULT_JPEG_QUALITY;

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {value:?} ({reason})")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub recognition: RecognitionConfig,
    pub capture: CaptureConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Maximum accepted upload size in megabytes
    pub max_upload_mb: usize,
}

/// Remote recognition service settings
#[derive(Debug, Clone)]
pub struct RecognitionConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl RecognitionConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone)]
pub struct CaptureConfig {
    /// JPEG quality (1-100) for captured regions
    pub jpeg_quality: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
                max_upload_mb: 64,
            },
            recognition: RecognitionConfig {
                base_url: "http://127.0.0.1:5000".to_string(),
                timeout_secs: 30,
            },
            capture: CaptureConfig {
                jpeg_quality: DEFAULT_JPEG_QUALITY,
            },
        }
    }
}

impl Config {
    /// Load from the process environment. Unset variables keep their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(host) = lookup("FAIR_HOST") {
            config.server.host = host;
        }
        if let Some(port) = lookup("FAIR_PORT") {
            config.server.port = parse_var("FAIR_PORT", &port)?;
        }
        if let Some(mb) = lookup("FAIR_MAX_UPLOAD_MB") {
            config.server.max_upload_mb = parse_var("FAIR_MAX_UPLOAD_MB", &mb)?;
        }
        if let Some(url) = lookup("FAIR_OCR_BASE_URL") {
            config.recognition.base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(secs) = lookup("FAIR_OCR_TIMEOUT_SECS") {
            let secs: u64 = parse_var("FAIR_OCR_TIMEOUT_SECS", &secs)?;
            if secs == 0 {
                return Err(ConfigError::Invalid {
                    var: "FAIR_OCR_TIMEOUT_SECS",
                    value: secs.to_string(),
                    reason: "timeout must be at least one second".to_string(),
                });
            }
            config.recognition.timeout_secs = secs;
        }
        if let Some(quality) = lookup("FAIR_JPEG_QUALITY") {
            let parsed: u8 = parse_var("FAIR_JPEG_QUALITY", &quality)?;
            if !(1..=100).contains(&parsed) {
                return Err(ConfigError::Invalid {
                    var: "FAIR_JPEG_QUALITY",
                    value: quality,
                    reason: "must be between 1 and 100".to_string(),
                });
            }
            config.capture.jpeg_quality = parsed;
        }

        Ok(config)
    }
}

fn parse_var<T>(var: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        var,
        value: value.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.recognition.base_url, "http://127.0.0.1:5000");
        assert_eq!(config.recognition.timeout(), Duration::from_secs(30));
        assert_eq!(config.capture.jpeg_quality, 90);
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("FAIR_PORT", "9000"),
            ("FAIR_OCR_BASE_URL", "http://ocr.local:5000/"),
            ("FAIR_OCR_TIMEOUT_SECS", "5"),
            ("FAIR_JPEG_QUALITY", "75"),
        ]))
        .unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.recognition.base_url, "http://ocr.local:5000");
        assert_eq!(config.recognition.timeout_secs, 5);
        assert_eq!(config.capture.jpeg_quality, 75);
    }

    #[test]
    fn test_invalid_values() {
        assert!(Config::from_lookup(lookup(&[("FAIR_PORT", "http")])).is_err());
        assert!(Config::from_lookup(lookup(&[("FAIR_JPEG_QUALITY", "0")])).is_err());
        assert!(Config::from_lookup(lookup(&[("FAIR_OCR_TIMEOUT_SECS", "0")])).is_err());
    }
}
