use envconfig::Envconfig;

use crate::error::AttributionError;

#[derive(Envconfig, Clone, Debug)]
pub struct Config {
    // Matches the upstream default of Integer.MAX_VALUE / 8 entries. Entries
    // are small, and the dual 5-minute expiry keeps the working set bounded.
    #[envconfig(from = "RESULT_CACHE_MAX_ENTRIES", default = "268435456")]
    pub result_cache_max_entries: u64,

    #[envconfig(from = "RESULT_CACHE_TTL_SECS", default = "300")]
    pub result_cache_ttl_secs: u64,

    #[envconfig(from = "RESULT_CACHE_TTI_SECS", default = "300")]
    pub result_cache_tti_secs: u64,
}

impl Config {
    pub fn init_with_defaults() -> Result<Self, AttributionError> {
        Ok(Self::init_from_env()?)
    }

    /// Defaults without touching the environment, for embedders that wire
    /// configuration themselves.
    pub fn default_config() -> Self {
        Self {
            result_cache_max_entries: 268_435_456,
            result_cache_ttl_secs: 300,
            result_cache_tti_secs: 300,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unparseable_env_value_is_a_config_error() {
        std::env::set_var("RESULT_CACHE_TTL_SECS", "not-a-number");
        let err = Config::init_with_defaults().unwrap_err();
        assert!(matches!(err, AttributionError::ConfigError(_)));
        std::env::remove_var("RESULT_CACHE_TTL_SECS");
    }
}
