use serde::Deserialize;
use tracing::debug;

use crate::error::AttributionError;
use crate::rules::{category_by_source, UNASSIGNED};
use crate::types::SourceCategoryAndTerms;
use crate::uri::decompose;

/// Predicate over a referrer and its derived host.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CategoryPredicate {
    HostContains { value: String },
    HostEquals { value: String },
    HostSuffix { value: String },
    UrlContains { value: String },
}

impl CategoryPredicate {
    fn matches(&self, referrer: &str, host: Option<&str>) -> bool {
        match self {
            CategoryPredicate::HostContains { value } => {
                host.is_some_and(|h| h.contains(value.as_str()))
            }
            CategoryPredicate::HostEquals { value } => host == Some(value.as_str()),
            CategoryPredicate::HostSuffix { value } => {
                host.is_some_and(|h| h.ends_with(value.as_str()))
            }
            CategoryPredicate::UrlContains { value } => referrer.contains(value.as_str()),
        }
    }
}

/// One ordered category rule: a referrer predicate plus the source/category
/// it implies. `term_params` lists referrer query parameters that carry the
/// search terms; the first one present wins.
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryRule {
    #[serde(rename = "match")]
    pub predicate: CategoryPredicate,
    pub source: String,
    pub category: String,
    #[serde(default)]
    pub term_params: Vec<String>,
}

/// First-match-wins evaluator over an ordered category rule list, loaded once
/// from JSON. Immutable after construction.
#[derive(Debug)]
pub struct CategoryRuleEvaluator {
    rules: Vec<CategoryRule>,
}

impl CategoryRuleEvaluator {
    pub fn from_json(json: &str) -> Result<Self, AttributionError> {
        let rules: Vec<CategoryRule> =
            serde_json::from_str(json).map_err(AttributionError::InvalidCategoryRules)?;
        Ok(Self { rules })
    }

    /// Evaluate the rule list against a referrer. No referrer or no matching
    /// rule yields the [`UNASSIGNED`] category with no inferred source.
    pub fn evaluate(&self, referrer: Option<&str>) -> SourceCategoryAndTerms {
        let unassigned = SourceCategoryAndTerms {
            source: None,
            terms: None,
            category: UNASSIGNED.to_string(),
        };

        let Some(referrer) = referrer.filter(|r| !r.is_empty()) else {
            return unassigned;
        };

        let uri = decompose(referrer);
        let host = uri.as_ref().and_then(|u| u.host.as_deref());

        for rule in &self.rules {
            if rule.predicate.matches(referrer, host) {
                let terms = uri.as_ref().and_then(|u| {
                    rule.term_params
                        .iter()
                        .find_map(|p| u.parameters.joined(p))
                });
                debug!(
                    source = %rule.source,
                    category = %rule.category,
                    ?terms,
                    "category rule matched"
                );
                return SourceCategoryAndTerms {
                    source: Some(rule.source.clone()),
                    terms,
                    category: rule.category.clone(),
                };
            }
        }
        unassigned
    }

    /// Direct source -> category dictionary lookup, used when referrer-based
    /// evaluation produced no usable category.
    pub fn category_by_source(&self, source: &str) -> Option<&'static str> {
        category_by_source(source)
    }
}
