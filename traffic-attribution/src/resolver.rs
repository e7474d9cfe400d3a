use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use tracing::debug;

use crate::cache::ResultCache;
use crate::error::AttributionError;
use crate::metric_consts::RESOLVER_CONSTRUCTED_COUNTER;
use crate::rules::{
    CategoryRuleEvaluator, ChannelEvalInput, ChannelRuleEvaluator, UNASSIGNED,
};
use crate::types::{CategoryTrafficSource, RawAttribution, RuleConfig};
use crate::uri::referrer_host;
use crate::utm::{extract_from_url, MediumPolicy};

/// Sentinel written into source/category/channelGroup when no attribution
/// signal exists at all. The default resolver uses the lower-case `"direct"`
/// variant; the case difference is observable and intentional.
pub const DIRECT: &str = "Direct";

const DEFAULT_CATEGORY_RULES: &str = include_str!("rules/default_category_rules.json");
const DEFAULT_CHANNEL_RULES: &str = include_str!("rules/default_channel_rules.json");

/// Rule-driven traffic-source resolver for one application.
///
/// Rule sets are loaded once at construction (per-application overrides via
/// [`RuleConfig`], bundled defaults otherwise) and are immutable afterwards.
/// Results are memoized in the shared [`ResultCache`]. `parse` never fails:
/// malformed inputs degrade to absent fields.
#[derive(Debug)]
pub struct RuleBasedResolver {
    app_id: String,
    category_rules: CategoryRuleEvaluator,
    channel_rules: ChannelRuleEvaluator,
    cache: Arc<ResultCache>,
}

impl RuleBasedResolver {
    pub fn new(
        app_id: impl Into<String>,
        rule_config: Option<&RuleConfig>,
        cache: Arc<ResultCache>,
    ) -> Result<Self, AttributionError> {
        let category_json = rule_config
            .and_then(|c| c.category_rule_json.as_deref())
            .unwrap_or(DEFAULT_CATEGORY_RULES);
        let channel_json = rule_config
            .and_then(|c| c.channel_rule_json.as_deref())
            .unwrap_or(DEFAULT_CHANNEL_RULES);

        let resolver = Self {
            app_id: app_id.into(),
            category_rules: CategoryRuleEvaluator::from_json(category_json)?,
            channel_rules: ChannelRuleEvaluator::from_json(channel_json)?,
            cache,
        };
        metrics::counter!(RESOLVER_CONSTRUCTED_COUNTER).increment(1);
        Ok(resolver)
    }

    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    /// Attribute a visit from its landing URL and referrers.
    pub fn parse(
        &self,
        page_url: Option<&str>,
        page_referrer: Option<&str>,
        latest_referrer: Option<&str>,
        latest_referrer_host: Option<&str>,
    ) -> CategoryTrafficSource {
        debug!(
            ?page_url,
            ?page_referrer,
            ?latest_referrer,
            ?latest_referrer_host,
            "parse"
        );

        let key = [
            page_url.unwrap_or(""),
            page_referrer.unwrap_or(""),
            latest_referrer.unwrap_or(""),
        ]
        .join("|");
        if let Some(cached) = self.cache.get(&key) {
            return cached;
        }

        let raw = match non_empty(page_url) {
            Some(url) => extract_from_url(url, MediumPolicy::FillMediumIfAbsent),
            None => RawAttribution::default(),
        };
        let result = self.resolve(raw, page_referrer, latest_referrer, latest_referrer_host);
        self.cache.put(key, result.clone());
        result
    }

    /// Attribute a visit from an already-extracted attribution record.
    pub fn parse_attribution(
        &self,
        attribution: &RawAttribution,
        page_referrer: Option<&str>,
        latest_referrer: Option<&str>,
        latest_referrer_host: Option<&str>,
    ) -> CategoryTrafficSource {
        let mut hasher = DefaultHasher::new();
        attribution.hash(&mut hasher);
        let key = format!(
            "{:x}|{}|{}",
            hasher.finish(),
            page_referrer.unwrap_or(""),
            latest_referrer.unwrap_or("")
        );
        if let Some(cached) = self.cache.get(&key) {
            return cached;
        }

        let result = self.resolve(
            attribution.clone(),
            page_referrer,
            latest_referrer,
            latest_referrer_host,
        );
        self.cache.put(key, result.clone());
        result
    }

    /// Precedence policy: explicit attribution first, then UTM/click-id
    /// extraction from the session-latest referrer, then from the page
    /// referrer. Rules are evaluated against the latest referrer when
    /// present, the page referrer otherwise.
    fn resolve(
        &self,
        raw_input: RawAttribution,
        page_referrer: Option<&str>,
        latest_referrer: Option<&str>,
        latest_referrer_host: Option<&str>,
    ) -> CategoryTrafficSource {
        let mut raw = normalize(raw_input);

        // Replacement is wholesale: a record without a source is discarded
        // entirely, any supplied medium/campaign included.
        if raw.source.is_none() {
            raw = normalize(extract_from_referrer(latest_referrer));
        }
        if raw.source.is_none() {
            raw = normalize(extract_from_referrer(page_referrer));
        }

        let mut result = if let Some(referrer) = non_empty(latest_referrer) {
            // The caller-supplied host is taken as-is, absent included.
            let host = latest_referrer_host.map(str::to_string);
            self.classify(raw, Some(referrer), host.as_deref())
        } else if let Some(referrer) = non_empty(page_referrer) {
            let host = referrer_host(referrer);
            self.classify(raw, Some(referrer), host.as_deref())
        } else {
            self.classify(raw, None, None)
        };

        if result.attribution.source.is_some() {
            if result.category.is_none() {
                result.category = Some(UNASSIGNED.to_string());
            }
            if result.channel_group.is_none() {
                result.channel_group = Some(UNASSIGNED.to_string());
            }
        } else {
            result.attribution.source = Some(DIRECT.to_string());
            result.category = Some(DIRECT.to_string());
            result.channel_group = Some(DIRECT.to_string());
        }

        if result.attribution.medium.is_none() {
            result.attribution.medium = result.channel_group.clone();
        }

        debug!(?result, "resolved traffic source");
        result
    }

    fn classify(
        &self,
        mut raw: RawAttribution,
        referrer: Option<&str>,
        referrer_host: Option<&str>,
    ) -> CategoryTrafficSource {
        let evaluated = self.category_rules.evaluate(referrer);
        debug!(
            source = ?evaluated.source,
            terms = ?evaluated.terms,
            category = %evaluated.category,
            "category evaluation"
        );

        if raw.source.is_none() {
            raw.source = evaluated.source;
        }
        if raw.term.is_none() {
            raw.term = evaluated.terms;
        }

        let category_for_eval = Some(evaluated.category.clone())
            .filter(|category| category != UNASSIGNED);
        let mut category = Some(evaluated.category);
        if raw.source.is_some() && category_for_eval.is_none() {
            category = raw
                .source
                .as_deref()
                .and_then(|source| self.category_rules.category_by_source(source))
                .map(str::to_string);
        }

        let input = ChannelEvalInput::from_attribution(
            &raw,
            category_for_eval.as_deref(),
            referrer,
            referrer_host,
        );
        let channel_group = self.channel_rules.evaluate(&input);

        let mut result = CategoryTrafficSource {
            attribution: raw,
            category,
            channel_group,
        };

        if result.attribution.source.is_none() {
            if referrer.is_some() {
                result.attribution.source = referrer_host.map(str::to_string);
            } else {
                result.attribution.campaign = Some(DIRECT.to_string());
            }
        }
        result
    }
}

/// Empty strings and case-insensitive `"Direct"` (for source/medium/campaign)
/// are input sentinels, not real values; a `clid` of `{}` likewise.
fn normalize(raw: RawAttribution) -> RawAttribution {
    fn scrub(value: Option<String>) -> Option<String> {
        value.filter(|v| !v.is_empty())
    }
    fn scrub_direct(value: Option<String>) -> Option<String> {
        value.filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case(DIRECT))
    }

    RawAttribution {
        source: scrub_direct(raw.source),
        medium: scrub_direct(raw.medium),
        campaign: scrub_direct(raw.campaign),
        content: scrub(raw.content),
        term: scrub(raw.term),
        campaign_id: scrub(raw.campaign_id),
        clid_platform: scrub(raw.clid_platform),
        clid: raw.clid.filter(|v| !v.is_empty() && v != "{}"),
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

fn extract_from_referrer(referrer: Option<&str>) -> RawAttribution {
    match non_empty(referrer) {
        Some(url) => extract_from_url(url, MediumPolicy::FillMediumIfAbsent),
        None => RawAttribution::default(),
    }
}
