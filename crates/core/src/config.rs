use std::time::Duration;

use crate::error::ConfigError;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000/analyze_video";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

pub const ENDPOINT_ENV_VAR: &str = "DYNAMOCARDS_ENDPOINT";
pub const TIMEOUT_ENV_VAR: &str = "DYNAMOCARDS_TIMEOUT_SECS";

/// Where and how to reach the video analysis service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub endpoint: String,
    /// `None` leaves the timeout to the transport.
    pub timeout: Option<Duration>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: Some(DEFAULT_TIMEOUT),
        }
    }
}

impl ServiceConfig {
    /// Read the configuration from the process environment, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(endpoint) = lookup(ENDPOINT_ENV_VAR) {
            config = config.with_endpoint(endpoint)?;
        }
        if let Some(raw) = lookup(TIMEOUT_ENV_VAR) {
            config.timeout = parse_timeout(&raw)?;
        }

        Ok(config)
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Result<Self, ConfigError> {
        let endpoint = endpoint.into();
        if endpoint.trim().is_empty() {
            return Err(ConfigError::EmptyEndpoint);
        }
        self.endpoint = endpoint.trim().to_string();
        Ok(self)
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = (secs > 0).then(|| Duration::from_secs(secs));
        self
    }
}

/// `0` disables the client-side timeout.
fn parse_timeout(raw: &str) -> Result<Option<Duration>, ConfigError> {
    let secs: u64 = raw
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidTimeout {
            value: raw.to_string(),
        })?;
    Ok((secs > 0).then(|| Duration::from_secs(secs)))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_environment_is_empty() {
        let config = ServiceConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, ServiceConfig::default());
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
    }

    #[test]
    fn environment_overrides_defaults() {
        let config = ServiceConfig::from_lookup(lookup_from(&[
            (ENDPOINT_ENV_VAR, " http://cards.internal/analyze "),
            (TIMEOUT_ENV_VAR, "30"),
        ]))
        .unwrap();
        assert_eq!(config.endpoint, "http://cards.internal/analyze");
        assert_eq!(config.timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn zero_timeout_disables_it() {
        let config = ServiceConfig::from_lookup(lookup_from(&[(TIMEOUT_ENV_VAR, "0")])).unwrap();
        assert_eq!(config.timeout, None);
    }

    #[test]
    fn rejects_bad_values() {
        assert_eq!(
            ServiceConfig::from_lookup(lookup_from(&[(TIMEOUT_ENV_VAR, "soon")])),
            Err(ConfigError::InvalidTimeout {
                value: "soon".into()
            })
        );
        assert_eq!(
            ServiceConfig::default().with_endpoint("   "),
            Err(ConfigError::EmptyEndpoint)
        );
    }
}
