//! Client configuration.
//!
//! Defaults are compile-time constants; the binary may override the two base
//! URLs from the environment.

/// Gateway aggregating the user, doctor, patient, appointment and
/// consultation services.
pub const GATEWAY_URL: &str = "http://localhost:8080";

/// Message-queue publisher used for account deletion.
pub const QUEUE_URL: &str = "http://localhost:8090";

pub const COOKIE_NAME: &str = "jwt";
pub const COOKIE_DURATION_DAYS: i64 = 1;
pub const COOKIE_SAME_SITE: &str = "None";
pub const COOKIE_SECURE: bool = true;

/// Appended to `yyyy-mm-dd` form dates before they are sent.
pub const TIMESTAMP_SUFFIX: &str = "T00:00:00Z";

pub const GATEWAY_URL_ENV: &str = "MEDPORTAL_GATEWAY_URL";
pub const QUEUE_URL_ENV: &str = "MEDPORTAL_QUEUE_URL";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub gateway_url: String,
    pub queue_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            gateway_url: GATEWAY_URL.to_string(),
            queue_url: QUEUE_URL.to_string(),
        }
    }
}

impl ClientConfig {
    pub fn new(gateway_url: impl Into<String>, queue_url: impl Into<String>) -> Self {
        Self {
            gateway_url: trim_base(gateway_url.into()),
            queue_url: trim_base(queue_url.into()),
        }
    }

    /// Defaults, overridden by `MEDPORTAL_GATEWAY_URL` / `MEDPORTAL_QUEUE_URL`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let pick = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };
        Self::new(pick(GATEWAY_URL_ENV, GATEWAY_URL), pick(QUEUE_URL_ENV, QUEUE_URL))
    }
}

fn trim_base(url: String) -> String {
    url.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_localhost() {
        let cfg = ClientConfig::default();
        assert_eq!(cfg.gateway_url, "http://localhost:8080");
        assert_eq!(cfg.queue_url, "http://localhost:8090");
    }

    #[test]
    fn environment_overrides_and_trims() {
        let cfg = ClientConfig::from_lookup(|key| match key {
            GATEWAY_URL_ENV => Some("https://gw.example/ ".to_string()),
            QUEUE_URL_ENV => Some("   ".to_string()),
            _ => None,
        });
        assert_eq!(cfg.gateway_url, "https://gw.example");
        assert_eq!(cfg.queue_url, QUEUE_URL);
    }
}
