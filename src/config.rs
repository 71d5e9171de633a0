//! Platform configuration: domains used for generated URLs, the notification sender
//! and actor mailbox sizes.

use std::env;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("invalid {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlatformConfig {
    /// Parent domain of merchant subdomains (default: "storefront.local")
    pub base_domain: String,
    /// Merchant dashboards live under this URL (default: "https://dashboard.storefront.local/merchants")
    pub dashboard_base_url: String,
    /// Sender of merchant emails (default: "no-reply@storefront.local")
    pub notify_from: String,
    /// Mailbox size of every record actor (default: 32)
    pub actor_buffer: usize,
}

const DEFAULT_BASE_DOMAIN: &str = "storefront.local";
const DEFAULT_DASHBOARD_URL: &str = "https://dashboard.storefront.local/merchants";
const DEFAULT_NOTIFY_FROM: &str = "no-reply@storefront.local";
const DEFAULT_ACTOR_BUFFER: usize = 32;

impl Default for PlatformConfig {
    fn default() -> Self {
        Self::local()
    }
}

impl PlatformConfig {
    /// Load configuration from environment variables.
    ///
    /// # Optional Environment Variables
    /// - `STOREFRONT_BASE_DOMAIN` - Parent domain of store subdomains
    /// - `STOREFRONT_DASHBOARD_URL` - Base URL of merchant dashboards
    /// - `STOREFRONT_NOTIFY_FROM` - Sender address of merchant emails
    /// - `STOREFRONT_ACTOR_BUFFER` - Record actor mailbox size, at least 1
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from any variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base_domain = lookup("STOREFRONT_BASE_DOMAIN")
            .map(|v| v.trim().trim_matches('.').to_lowercase())
            .unwrap_or_else(|| DEFAULT_BASE_DOMAIN.to_string());
        if base_domain.is_empty() {
            return Err(ConfigError::Invalid {
                name: "STOREFRONT_BASE_DOMAIN",
                reason: "must not be empty".to_string(),
            });
        }

        let dashboard_base_url = lookup("STOREFRONT_DASHBOARD_URL")
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_DASHBOARD_URL.to_string());
        if !dashboard_base_url.starts_with("http://") && !dashboard_base_url.starts_with("https://") {
            return Err(ConfigError::Invalid {
                name: "STOREFRONT_DASHBOARD_URL",
                reason: format!("{dashboard_base_url} is not an http(s) URL"),
            });
        }

        let notify_from =
            lookup("STOREFRONT_NOTIFY_FROM").unwrap_or_else(|| DEFAULT_NOTIFY_FROM.to_string());

        let actor_buffer = match lookup("STOREFRONT_ACTOR_BUFFER") {
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(0) => {
                    return Err(ConfigError::Invalid {
                        name: "STOREFRONT_ACTOR_BUFFER",
                        reason: "must be at least 1".to_string(),
                    })
                }
                Ok(size) => size,
                Err(e) => {
                    return Err(ConfigError::Invalid {
                        name: "STOREFRONT_ACTOR_BUFFER",
                        reason: e.to_string(),
                    })
                }
            },
            None => DEFAULT_ACTOR_BUFFER,
        };

        Ok(Self {
            base_domain,
            dashboard_base_url,
            notify_from,
            actor_buffer,
        })
    }

    /// Defaults for local development and tests.
    pub fn local() -> Self {
        Self {
            base_domain: DEFAULT_BASE_DOMAIN.to_string(),
            dashboard_base_url: DEFAULT_DASHBOARD_URL.to_string(),
            notify_from: DEFAULT_NOTIFY_FROM.to_string(),
            actor_buffer: DEFAULT_ACTOR_BUFFER,
        }
    }

    pub fn with_base_domain(mut self, domain: impl Into<String>) -> Self {
        self.base_domain = domain.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = PlatformConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, PlatformConfig::local());
    }

    #[test]
    fn test_overrides_are_normalized() {
        let config = PlatformConfig::from_lookup(lookup(&[
            ("STOREFRONT_BASE_DOMAIN", " Shops.Example.COM. "),
            ("STOREFRONT_DASHBOARD_URL", "https://admin.example.com/m/"),
            ("STOREFRONT_ACTOR_BUFFER", "64"),
        ]))
        .unwrap();
        assert_eq!(config.base_domain, "shops.example.com");
        assert_eq!(config.dashboard_base_url, "https://admin.example.com/m");
        assert_eq!(config.actor_buffer, 64);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let zero = PlatformConfig::from_lookup(lookup(&[("STOREFRONT_ACTOR_BUFFER", "0")]));
        assert!(matches!(zero, Err(ConfigError::Invalid { name: "STOREFRONT_ACTOR_BUFFER", .. })));

        let url = PlatformConfig::from_lookup(lookup(&[("STOREFRONT_DASHBOARD_URL", "dashboard")]));
        assert!(matches!(url, Err(ConfigError::Invalid { name: "STOREFRONT_DASHBOARD_URL", .. })));
    }
}
