use serde::{Deserialize, Serialize};

/// Raw UTM-style attribution record extracted from a landing URL, before any
/// rule evaluation or fallback policy has been applied.
///
/// All fields are optional; absence is always `None`, never an empty string.
/// `clid`, when present, holds the JSON string of a [`ClickId`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAttribution {
    pub source: Option<String>,
    pub medium: Option<String>,
    pub campaign: Option<String>,
    pub content: Option<String>,
    pub term: Option<String>,
    pub campaign_id: Option<String>,
    pub clid_platform: Option<String>,
    pub clid: Option<String>,
}

/// A platform click identifier found in the landing URL query string,
/// e.g. `{"type":"gclid","value":"abc"}`. A parameter that is present but
/// empty still identifies its platform; `value` is then `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClickId {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: Option<String>,
}

/// Immutable (source, medium) pair used as a lookup-table value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceMedium {
    pub source: &'static str,
    pub medium: &'static str,
}

/// Output of the category rule evaluator. `category` is the
/// [`crate::rules::UNASSIGNED`] sentinel when no rule matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceCategoryAndTerms {
    pub source: Option<String>,
    pub terms: Option<String>,
    pub category: String,
}

/// The final attributed record: the UTM fields plus the resolved category and
/// channel group.
///
/// The rule-based resolver guarantees that whenever `source` is set,
/// `category` and `channel_group` are set too (defaulting to `Unassigned`),
/// and that a signal-free input yields the `"Direct"` sentinel for all three.
/// The default resolver leaves `category`/`channel_group` unset when its
/// fixed dictionaries have no entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTrafficSource {
    #[serde(flatten)]
    pub attribution: RawAttribution,
    pub category: Option<String>,
    pub channel_group: Option<String>,
}

impl CategoryTrafficSource {
    pub fn new(attribution: RawAttribution) -> Self {
        Self {
            attribution,
            category: None,
            channel_group: None,
        }
    }

    pub fn source(&self) -> Option<&str> {
        self.attribution.source.as_deref()
    }

    pub fn medium(&self) -> Option<&str> {
        self.attribution.medium.as_deref()
    }
}

/// Per-application rule overrides. When a field is `None` the bundled default
/// rule set is used instead.
#[derive(Debug, Clone, Default)]
pub struct RuleConfig {
    pub category_rule_json: Option<String>,
    pub channel_rule_json: Option<String>,
}
