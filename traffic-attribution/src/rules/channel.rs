use serde::Deserialize;
use tracing::debug;

use crate::error::AttributionError;
use crate::rules::{PAID_MEDIUMS, PAID_SEARCH_SITES, PAID_SHOPPING_SITES, PAID_SOCIAL_SITES};
use crate::types::RawAttribution;

/// Everything a channel rule may look at: the normalized attribution record,
/// the resolved category (None when unassigned), and the referrer.
#[derive(Debug, Clone, Default)]
pub struct ChannelEvalInput<'a> {
    pub source: Option<&'a str>,
    pub medium: Option<&'a str>,
    pub campaign: Option<&'a str>,
    pub clid: Option<&'a str>,
    pub category: Option<&'a str>,
    pub referrer: Option<&'a str>,
    pub referrer_host: Option<&'a str>,
}

impl<'a> ChannelEvalInput<'a> {
    pub fn from_attribution(
        attribution: &'a RawAttribution,
        category: Option<&'a str>,
        referrer: Option<&'a str>,
        referrer_host: Option<&'a str>,
    ) -> Self {
        Self {
            source: attribution.source.as_deref(),
            medium: attribution.medium.as_deref(),
            campaign: attribution.campaign.as_deref(),
            clid: attribution.clid.as_deref(),
            category,
            referrer,
            referrer_host,
        }
    }
}

/// Predicate over a [`ChannelEvalInput`]. The paid-site and paid-medium
/// variants consult the fixed tables in [`crate::rules`].
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChannelPredicate {
    All { predicates: Vec<ChannelPredicate> },
    Any { predicates: Vec<ChannelPredicate> },
    Not { predicate: Box<ChannelPredicate> },
    SourceEquals { value: String },
    SourceIn { values: Vec<String> },
    SourceInPaidSearchSites,
    SourceInPaidSocialSites,
    SourceInPaidShoppingSites,
    MediumEquals { value: String },
    MediumIn { values: Vec<String> },
    MediumIsPaid,
    CampaignIcontains { value: String },
    CategoryEquals { value: String },
    ReferrerHostContains { value: String },
    HasClid,
}

impl ChannelPredicate {
    fn matches(&self, input: &ChannelEvalInput<'_>) -> bool {
        match self {
            ChannelPredicate::All { predicates } => {
                predicates.iter().all(|p| p.matches(input))
            }
            ChannelPredicate::Any { predicates } => {
                predicates.iter().any(|p| p.matches(input))
            }
            ChannelPredicate::Not { predicate } => !predicate.matches(input),
            ChannelPredicate::SourceEquals { value } => input.source == Some(value.as_str()),
            ChannelPredicate::SourceIn { values } => input
                .source
                .is_some_and(|s| values.iter().any(|v| v == s)),
            ChannelPredicate::SourceInPaidSearchSites => {
                input.source.is_some_and(|s| PAID_SEARCH_SITES.contains(&s))
            }
            ChannelPredicate::SourceInPaidSocialSites => {
                input.source.is_some_and(|s| PAID_SOCIAL_SITES.contains(&s))
            }
            ChannelPredicate::SourceInPaidShoppingSites => input
                .source
                .is_some_and(|s| PAID_SHOPPING_SITES.contains(&s)),
            ChannelPredicate::MediumEquals { value } => input.medium == Some(value.as_str()),
            ChannelPredicate::MediumIn { values } => input
                .medium
                .is_some_and(|m| values.iter().any(|v| v == m)),
            ChannelPredicate::MediumIsPaid => input
                .medium
                .is_some_and(|m| PAID_MEDIUMS.contains(&m.to_lowercase().as_str())),
            ChannelPredicate::CampaignIcontains { value } => input
                .campaign
                .is_some_and(|c| c.to_lowercase().contains(&value.to_lowercase())),
            ChannelPredicate::CategoryEquals { value } => input.category == Some(value.as_str()),
            ChannelPredicate::ReferrerHostContains { value } => input
                .referrer_host
                .is_some_and(|h| h.contains(value.as_str())),
            ChannelPredicate::HasClid => input.clid.is_some(),
        }
    }
}

/// One ordered channel rule: a predicate plus the channel-group label it
/// produces.
#[derive(Debug, Clone, Deserialize)]
pub struct ChannelRule {
    pub channel: String,
    pub condition: ChannelPredicate,
}

/// First-match-wins evaluator over an ordered channel rule list, loaded once
/// from JSON. Immutable after construction.
#[derive(Debug)]
pub struct ChannelRuleEvaluator {
    rules: Vec<ChannelRule>,
}

impl ChannelRuleEvaluator {
    pub fn from_json(json: &str) -> Result<Self, AttributionError> {
        let rules: Vec<ChannelRule> =
            serde_json::from_str(json).map_err(AttributionError::InvalidChannelRules)?;
        Ok(Self { rules })
    }

    /// Returns the channel group of the first matching rule, or `None` when
    /// no rule matched.
    pub fn evaluate(&self, input: &ChannelEvalInput<'_>) -> Option<String> {
        for rule in &self.rules {
            if rule.condition.matches(input) {
                debug!(channel = %rule.channel, "channel rule matched");
                return Some(rule.channel.clone());
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RULES: &str = r#"[
        {
            "channel": "Paid Shopping",
            "condition": { "type": "any", "predicates": [
                { "type": "source_in_paid_shopping_sites" },
                { "type": "all", "predicates": [
                    { "type": "campaign_icontains", "value": "shop" },
                    { "type": "medium_is_paid" }
                ]}
            ]}
        },
        {
            "channel": "Paid Search",
            "condition": { "type": "all", "predicates": [
                { "type": "source_in_paid_search_sites" },
                { "type": "medium_is_paid" }
            ]}
        },
        {
            "channel": "Referral",
            "condition": { "type": "medium_equals", "value": "referral" }
        }
    ]"#;

    fn input<'a>(
        source: Option<&'a str>,
        medium: Option<&'a str>,
        campaign: Option<&'a str>,
    ) -> ChannelEvalInput<'a> {
        ChannelEvalInput {
            source,
            medium,
            campaign,
            ..Default::default()
        }
    }

    #[test]
    fn shopping_site_membership_wins_without_paid_medium() {
        let evaluator = ChannelRuleEvaluator::from_json(RULES).unwrap();
        let channel = evaluator.evaluate(&input(Some("amazon"), None, None));
        assert_eq!(channel.as_deref(), Some("Paid Shopping"));
    }

    #[test]
    fn shop_campaign_with_paid_medium_is_paid_shopping() {
        let evaluator = ChannelRuleEvaluator::from_json(RULES).unwrap();
        let channel = evaluator.evaluate(&input(
            Some("example"),
            Some("CPC"),
            Some("Spring-Shopping"),
        ));
        assert_eq!(channel.as_deref(), Some("Paid Shopping"));
    }

    #[test]
    fn paid_search_needs_both_site_and_medium() {
        let evaluator = ChannelRuleEvaluator::from_json(RULES).unwrap();
        assert_eq!(
            evaluator
                .evaluate(&input(Some("google"), Some("cpc"), None))
                .as_deref(),
            Some("Paid Search")
        );
        assert_eq!(evaluator.evaluate(&input(Some("google"), None, None)), None);
    }

    #[test]
    fn paid_medium_check_is_case_insensitive() {
        let evaluator = ChannelRuleEvaluator::from_json(RULES).unwrap();
        assert_eq!(
            evaluator
                .evaluate(&input(Some("google"), Some("PPC"), None))
                .as_deref(),
            Some("Paid Search")
        );
    }

    #[test]
    fn no_match_is_none() {
        let evaluator = ChannelRuleEvaluator::from_json(RULES).unwrap();
        assert_eq!(evaluator.evaluate(&input(Some("example"), None, None)), None);
    }

    #[test]
    fn malformed_json_is_fatal() {
        let err = ChannelRuleEvaluator::from_json("{").unwrap_err();
        assert!(matches!(err, AttributionError::InvalidChannelRules(_)));
    }
}
