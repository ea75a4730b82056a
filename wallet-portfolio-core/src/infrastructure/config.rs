//! Core configuration
//!
//! Values come from built-in defaults overridden by `PORTFOLIO_CORE_*`
//! environment variables (a `.env` file is honoured), e.g.
//! `PORTFOLIO_CORE_CACHE_LIMIT=20`.

use config::{Config, Environment};
use dotenv::dotenv;
use serde::{Deserialize, Serialize};
use crate::shared::constants::{
    COMPUTED_CACHE_LIMIT, CONFIG_ENV_PREFIX, DEFAULT_CACHE_CONCURRENCY, DEFAULT_DATA_TTL_SECS, DEFAULT_LOG_LEVEL,
    DEFAULT_REALTIME_CONCURRENCY,
};
use crate::shared::error::PortfolioError;
use crate::shared::types::PortfolioResult;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreConfig {
    /// Views kept per kind before the least recently registered is evicted
    pub cache_limit: usize,
    /// Parallel cached-list reads during a multi-address refresh
    pub cache_concurrency: usize,
    /// Parallel per-chain realtime reads
    pub realtime_concurrency: usize,
    /// Age after which a realtime list is refetched by the non-forced refresh
    pub data_ttl_secs: u64,
    pub log_level: String,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            cache_limit: COMPUTED_CACHE_LIMIT,
            cache_concurrency: DEFAULT_CACHE_CONCURRENCY,
            realtime_concurrency: DEFAULT_REALTIME_CONCURRENCY,
            data_ttl_secs: DEFAULT_DATA_TTL_SECS,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl CoreConfig {
    /// Load `.env` if present, then read the process environment
    pub fn load() -> PortfolioResult<Self> {
        dotenv().ok();
        Self::from_environment(Environment::with_prefix(CONFIG_ENV_PREFIX))
    }

    pub fn from_environment(environment: Environment) -> PortfolioResult<Self> {
        let defaults = Self::default();
        let settings = Config::builder()
            .set_default("cache_limit", defaults.cache_limit as i64)?
            .set_default("cache_concurrency", defaults.cache_concurrency as i64)?
            .set_default("realtime_concurrency", defaults.realtime_concurrency as i64)?
            .set_default("data_ttl_secs", defaults.data_ttl_secs as i64)?
            .set_default("log_level", defaults.log_level)?
            .add_source(environment.try_parsing(true))
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn data_ttl(&self) -> chrono::Duration {
        let secs = self.data_ttl_secs.min((i64::MAX / 1000) as u64) as i64;
        chrono::Duration::seconds(secs)
    }

    pub fn validate(&self) -> PortfolioResult<()> {
        if self.cache_limit == 0 {
            return Err(PortfolioError::validation("cache_limit must be greater than zero"));
        }
        if self.cache_concurrency == 0 {
            return Err(PortfolioError::validation("cache_concurrency must be greater than zero"));
        }
        if self.realtime_concurrency == 0 {
            return Err(PortfolioError::validation("realtime_concurrency must be greater than zero"));
        }
        if self.log_level.trim().is_empty() {
            return Err(PortfolioError::validation("log_level must not be empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn environment(vars: &[(&str, &str)]) -> Environment {
        let source: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        Environment::with_prefix(CONFIG_ENV_PREFIX).source(Some(source))
    }

    #[test]
    fn test_defaults_without_overrides() {
        let config = CoreConfig::from_environment(environment(&[])).expect("config");
        assert_eq!(config, CoreConfig::default());
        assert_eq!(config.cache_limit, 10);
        assert_eq!(config.cache_concurrency, 5);
        assert_eq!(config.realtime_concurrency, 15);
        assert_eq!(config.data_ttl(), chrono::Duration::seconds(300));
    }

    #[test]
    fn test_environment_overrides() {
        let config = CoreConfig::from_environment(environment(&[
            ("PORTFOLIO_CORE_CACHE_LIMIT", "25"),
            ("PORTFOLIO_CORE_LOG_LEVEL", "warn"),
        ]))
        .expect("config");
        assert_eq!(config.cache_limit, 25);
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.realtime_concurrency, 15);
    }

    #[test]
    fn test_zero_limit_is_rejected() {
        let result = CoreConfig::from_environment(environment(&[("PORTFOLIO_CORE_CACHE_LIMIT", "0")]));
        assert!(matches!(result, Err(PortfolioError::Validation(_))));
    }

    #[test]
    fn test_unparsable_value_is_config_error() {
        let result = CoreConfig::from_environment(environment(&[("PORTFOLIO_CORE_REALTIME_CONCURRENCY", "many")]));
        assert!(matches!(result, Err(PortfolioError::Config(_))));
    }
}
