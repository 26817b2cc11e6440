use std::time::Duration;

use crate::storage::DEFAULT_QUOTA_BYTES;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: Option<String>,
    pub storage_quota_bytes: usize,
    pub storage_key_prefix: String,
    pub match_presentation: Duration,
    pub reply_delay_min: Duration,
    pub reply_delay_max: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            storage_quota_bytes: DEFAULT_QUOTA_BYTES,
            storage_key_prefix: "swipematch".to_string(),
            match_presentation: Duration::from_millis(2500),
            reply_delay_min: Duration::from_millis(1000),
            reply_delay_max: Duration::from_millis(3000),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let database_url = std::env::var("DATABASE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty());

        let storage_key_prefix = std::env::var("STORAGE_KEY_PREFIX")
            .ok()
            .filter(|p| !p.trim().is_empty())
            .unwrap_or(defaults.storage_key_prefix);

        let reply_delay_min = env_millis("REPLY_DELAY_MIN_MS").unwrap_or(defaults.reply_delay_min);
        let reply_delay_max = env_millis("REPLY_DELAY_MAX_MS")
            .unwrap_or(defaults.reply_delay_max)
            .max(reply_delay_min);

        Self {
            database_url,
            storage_quota_bytes: env_parse("STORAGE_QUOTA_BYTES")
                .unwrap_or(defaults.storage_quota_bytes),
            storage_key_prefix,
            match_presentation: env_millis("MATCH_PRESENTATION_MS")
                .unwrap_or(defaults.match_presentation),
            reply_delay_min,
            reply_delay_max,
        }
    }

    pub fn immediate() -> Self {
        Self {
            match_presentation: Duration::ZERO,
            reply_delay_min: Duration::ZERO,
            reply_delay_max: Duration::ZERO,
            ..Self::default()
        }
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    let raw = std::env::var(name).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("Ignoring invalid value for {}: {}", name, raw);
            None
        }
    }
}

fn env_millis(name: &str) -> Option<Duration> {
    env_parse::<u64>(name).map(Duration::from_millis)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert!(config.database_url.is_none());
        assert_eq!(config.storage_quota_bytes, 5 * 1024 * 1024);
        assert_eq!(config.match_presentation, Duration::from_millis(2500));
        assert!(config.reply_delay_min <= config.reply_delay_max);
    }

    #[test]
    fn test_immediate_has_no_delays() {
        let config = AppConfig::immediate();
        assert_eq!(config.match_presentation, Duration::ZERO);
        assert_eq!(config.reply_delay_max, Duration::ZERO);
        assert_eq!(config.storage_key_prefix, "swipematch");
    }
}
