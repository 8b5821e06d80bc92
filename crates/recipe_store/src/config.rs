//! Store configuration.

use std::{env, str::FromStr};

use costing::PricingDefaults;

use crate::{RecipeStoreError, StoreResult, DEFAULT_PAGE_LIMIT};

/// Store configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Database URL.
    pub database_url: String,
    /// Maximum number of pooled connections.
    pub max_connections: u32,
    /// Page size used when a listing sets no limit.
    pub default_page_limit: u32,
    /// Profit margin applied when a draft sets none.
    pub default_profit_margin: f64,
    /// Log level.
    pub log_level: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite:recipes.db?mode=rwc".to_string(),
            max_connections: 5,
            default_page_limit: DEFAULT_PAGE_LIMIT,
            default_profit_margin: entities::DEFAULT_PROFIT_MARGIN,
            log_level: "info".to_string(),
        }
    }
}

impl StoreConfig {
    /// Loads `.env` if present, then reads the environment.
    pub fn load() -> StoreResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_env()
    }

    /// Loads configuration from environment variables.
    pub fn from_env() -> StoreResult<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Loads configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> StoreResult<Self> {
        let defaults = Self::default();

        Ok(Self {
            database_url: lookup("RECIPE_DATABASE_URL").unwrap_or(defaults.database_url),
            max_connections: parse_var(
                &lookup,
                "RECIPE_DB_MAX_CONNECTIONS",
                defaults.max_connections,
            )?,
            default_page_limit: parse_var(
                &lookup,
                "RECIPE_DEFAULT_PAGE_LIMIT",
                defaults.default_page_limit,
            )?,
            default_profit_margin: parse_var(
                &lookup,
                "RECIPE_DEFAULT_PROFIT_MARGIN",
                defaults.default_profit_margin,
            )?,
            log_level: lookup("RECIPE_LOG_LEVEL").unwrap_or(defaults.log_level),
        })
    }

    /// Sets the database URL.
    pub fn with_database_url(mut self, database_url: impl Into<String>) -> Self {
        self.database_url = database_url.into();
        self
    }

    /// Sets the connection pool size.
    pub fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self
    }

    /// Returns the pricing defaults handed to the stores.
    pub fn pricing_defaults(&self) -> PricingDefaults {
        PricingDefaults::default().with_profit_margin(self.default_profit_margin)
    }
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: T,
) -> StoreResult<T> {
    match lookup(name) {
        Some(raw) => raw.trim().parse().map_err(|_| {
            RecipeStoreError::Configuration(format!("{name} has invalid value {raw:?}"))
        }),
        None => Ok(default),
    }
}

/// Initializes tracing with the given log level.
///
/// `RUST_LOG` takes precedence when set. Returns false if a global subscriber
/// was already installed.
pub fn init_tracing(log_level: &str) -> bool {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = StoreConfig::from_lookup(lookup_from(&[])).unwrap();

        assert_eq!(config.database_url, "sqlite:recipes.db?mode=rwc");
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.default_page_limit, 100);
        assert_eq!(config.pricing_defaults().profit_margin, 30.0);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_reads_overrides() {
        let config = StoreConfig::from_lookup(lookup_from(&[
            ("RECIPE_DATABASE_URL", "sqlite::memory:"),
            ("RECIPE_DB_MAX_CONNECTIONS", "1"),
            ("RECIPE_DEFAULT_PAGE_LIMIT", "25"),
            ("RECIPE_DEFAULT_PROFIT_MARGIN", "42.5"),
            ("RECIPE_LOG_LEVEL", "debug"),
        ]))
        .unwrap();

        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.max_connections, 1);
        assert_eq!(config.default_page_limit, 25);
        assert_eq!(config.default_profit_margin, 42.5);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_rejects_unparseable_values() {
        let lookup = lookup_from(&[("RECIPE_DB_MAX_CONNECTIONS", "many")]);
        let result = StoreConfig::from_lookup(lookup);

        assert!(matches!(result, Err(RecipeStoreError::Configuration(_))));
    }

    #[test]
    fn test_init_tracing_installs_once() {
        init_tracing("warn");

        assert!(!init_tracing("warn"));
    }
}
