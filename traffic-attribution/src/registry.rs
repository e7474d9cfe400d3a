use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use tracing::info;

use crate::cache::ResultCache;
use crate::config::Config;
use crate::error::AttributionError;
use crate::resolver::RuleBasedResolver;
use crate::types::RuleConfig;

/// Keyed store of per-application resolvers sharing one result cache.
///
/// Resolvers are constructed lazily on first use and reused afterwards.
/// Construction happens under the write lock so concurrent callers for the
/// same app id get the same instance.
pub struct ResolverRegistry {
    resolvers: RwLock<HashMap<String, Arc<RuleBasedResolver>>>,
    cache: Arc<ResultCache>,
}

impl ResolverRegistry {
    pub fn new(config: &Config) -> Self {
        let cache = Arc::new(ResultCache::new(
            config.result_cache_max_entries,
            Duration::from_secs(config.result_cache_ttl_secs),
            Duration::from_secs(config.result_cache_tti_secs),
        ));
        Self {
            resolvers: RwLock::new(HashMap::new()),
            cache,
        }
    }

    /// Returns the resolver for `app_id`, constructing it on first use.
    /// `rule_config` only matters for that first construction; later calls
    /// return the existing instance unchanged.
    pub fn get_or_create(
        &self,
        app_id: &str,
        rule_config: Option<&RuleConfig>,
    ) -> Result<Arc<RuleBasedResolver>, AttributionError> {
        if let Some(resolver) = self
            .resolvers
            .read()
            .expect("resolver registry lock poisoned")
            .get(app_id)
        {
            return Ok(resolver.clone());
        }

        let mut resolvers = self
            .resolvers
            .write()
            .expect("resolver registry lock poisoned");
        // Another caller may have won the race between the locks.
        if let Some(resolver) = resolvers.get(app_id) {
            return Ok(resolver.clone());
        }

        let resolver = Arc::new(RuleBasedResolver::new(
            app_id,
            rule_config,
            self.cache.clone(),
        )?);
        resolvers.insert(app_id.to_string(), resolver.clone());
        Ok(resolver)
    }

    /// Replaces the application's resolver wholesale with one built from the
    /// given rule overrides. The old instance stays valid for holders of its
    /// `Arc` but is no longer handed out.
    pub fn reconfigure(
        &self,
        app_id: &str,
        rule_config: Option<&RuleConfig>,
    ) -> Result<Arc<RuleBasedResolver>, AttributionError> {
        let resolver = Arc::new(RuleBasedResolver::new(
            app_id,
            rule_config,
            self.cache.clone(),
        )?);
        info!(app_id, "reconfigured resolver");
        self.resolvers
            .write()
            .expect("resolver registry lock poisoned")
            .insert(app_id.to_string(), resolver.clone());
        Ok(resolver)
    }

    pub fn result_cache(&self) -> &Arc<ResultCache> {
        &self.cache
    }
}
