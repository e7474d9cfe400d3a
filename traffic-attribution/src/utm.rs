use tracing::{debug, error};

use crate::clid::known_click_id;
use crate::types::{ClickId, RawAttribution};
use crate::uri::{decompose, QueryParams};

pub const GCLID: &str = "gclid";
const CLID_SUFFIX: &str = "clid";

/// How a known click-id's implied medium interacts with an explicit
/// `utm_medium`. The two call sites in this engine intentionally differ; see
/// the resolver docs. Do not unify.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediumPolicy {
    /// The click-id table's medium replaces any extracted `utm_medium`
    /// (default-resolver path).
    OverwriteMedium,
    /// The click-id table's medium is used only when `utm_medium` is absent
    /// (rule-based resolver path).
    FillMediumIfAbsent,
}

/// Extract a raw attribution record from a landing URL. A URL that fails to
/// parse yields an empty record.
pub fn extract_from_url(url: &str, policy: MediumPolicy) -> RawAttribution {
    match decompose(url) {
        Some(uri) => extract(&uri.parameters, policy),
        None => RawAttribution::default(),
    }
}

/// Extract a raw attribution record from decomposed query parameters.
pub fn extract(params: &QueryParams, policy: MediumPolicy) -> RawAttribution {
    let utm_id = params.first("utm_id").map(str::to_string);
    let mut utm_source = params.first("utm_source").map(str::to_string);
    let mut utm_medium = params.first("utm_medium").map(str::to_string);
    let utm_content = params.first("utm_content").map(str::to_string);
    let mut utm_term = params.first("utm_term").map(str::to_string);
    let utm_campaign = params.first("utm_campaign").map(str::to_string);
    let utm_source_platform = params.first("utm_source_platform").map(str::to_string);
    let query_q = params.joined("q");

    debug!(
        ?utm_source,
        ?utm_medium,
        ?utm_content,
        ?utm_term,
        ?utm_campaign,
        ?utm_id,
        ?utm_source_platform,
        ?query_q,
        "extracted utm parameters"
    );

    let click_id = find_click_id(params);

    if utm_source.is_none() {
        if let Some(mapped) = click_id
            .as_ref()
            .and_then(|clid| known_click_id(&clid.kind))
        {
            utm_source = Some(mapped.source.to_string());
            match policy {
                MediumPolicy::OverwriteMedium => {
                    utm_medium = Some(mapped.medium.to_string());
                }
                MediumPolicy::FillMediumIfAbsent => {
                    if utm_medium.is_none() {
                        utm_medium = Some(mapped.medium.to_string());
                    }
                }
            }
        }
    }

    if utm_source.is_some() && utm_term.is_none() {
        utm_term = query_q;
    }

    let clid = click_id.and_then(|clid| match serde_json::to_string(&clid) {
        Ok(json) => Some(json),
        Err(e) => {
            error!("Error converting click id to string: {}", e);
            None
        }
    });

    RawAttribution {
        source: utm_source,
        medium: utm_medium,
        campaign: utm_campaign,
        content: utm_content,
        term: utm_term,
        campaign_id: utm_id,
        clid_platform: utm_source_platform,
        clid,
    }
}

/// A `gclid` parameter always wins; otherwise the first parameter (in query
/// insertion order) whose name ends with `clid` is taken. When several
/// non-gclid candidates are present the URL's parameter order decides, which
/// is a documented ambiguity inherited from the upstream contract. An empty
/// value still identifies the platform; only the value is left unset.
fn find_click_id(params: &QueryParams) -> Option<ClickId> {
    if let Some(value) = params.first(GCLID) {
        return Some(ClickId {
            kind: GCLID.to_string(),
            value: Some(value.to_string()),
        });
    }

    for (key, values) in params.iter() {
        if key.ends_with(CLID_SUFFIX) {
            let value = values
                .first()
                .filter(|v| !v.is_empty())
                .map(|v| v.to_string());
            return Some(ClickId {
                kind: key.to_string(),
                value,
            });
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_first_values_only() {
        let raw = extract_from_url(
            "https://shop.example.com/?utm_source=google&utm_source=bing&utm_medium=cpc\
             &utm_campaign=spring&utm_content=ad1&utm_term=shoes&utm_id=c42&utm_source_platform=ads",
            MediumPolicy::FillMediumIfAbsent,
        );
        assert_eq!(raw.source.as_deref(), Some("google"));
        assert_eq!(raw.medium.as_deref(), Some("cpc"));
        assert_eq!(raw.campaign.as_deref(), Some("spring"));
        assert_eq!(raw.content.as_deref(), Some("ad1"));
        assert_eq!(raw.term.as_deref(), Some("shoes"));
        assert_eq!(raw.campaign_id.as_deref(), Some("c42"));
        assert_eq!(raw.clid_platform.as_deref(), Some("ads"));
    }

    #[test]
    fn gclid_fills_source_and_medium_when_utm_source_absent() {
        let raw = extract_from_url(
            "https://example.com/?gclid=abc123",
            MediumPolicy::FillMediumIfAbsent,
        );
        assert_eq!(raw.source.as_deref(), Some("google"));
        assert_eq!(raw.medium.as_deref(), Some("cpc"));
        assert_eq!(
            raw.clid.as_deref(),
            Some(r#"{"type":"gclid","value":"abc123"}"#)
        );
    }

    #[test]
    fn explicit_utm_source_wins_over_click_id() {
        let raw = extract_from_url(
            "https://example.com/?utm_source=newsletter&gclid=abc",
            MediumPolicy::FillMediumIfAbsent,
        );
        assert_eq!(raw.source.as_deref(), Some("newsletter"));
        // The click id is still recorded even though it did not drive source.
        assert!(raw.clid.is_some());
    }

    #[test]
    fn fill_policy_keeps_explicit_medium() {
        let raw = extract_from_url(
            "https://example.com/?dclid=x&utm_medium=banner",
            MediumPolicy::FillMediumIfAbsent,
        );
        assert_eq!(raw.source.as_deref(), Some("google"));
        assert_eq!(raw.medium.as_deref(), Some("banner"));
    }

    #[test]
    fn overwrite_policy_replaces_explicit_medium() {
        let raw = extract_from_url(
            "https://example.com/?dclid=x&utm_medium=banner",
            MediumPolicy::OverwriteMedium,
        );
        assert_eq!(raw.source.as_deref(), Some("google"));
        assert_eq!(raw.medium.as_deref(), Some("display"));
    }

    #[test]
    fn gclid_wins_over_other_click_ids() {
        let raw = extract_from_url(
            "https://example.com/?fbclid=f1&gclid=g1",
            MediumPolicy::FillMediumIfAbsent,
        );
        assert_eq!(
            raw.clid.as_deref(),
            Some(r#"{"type":"gclid","value":"g1"}"#)
        );
        assert_eq!(raw.source.as_deref(), Some("google"));
    }

    #[test]
    fn first_clid_suffixed_parameter_wins_without_gclid() {
        let raw = extract_from_url(
            "https://example.com/?tikclid=t1&fbclid=f1",
            MediumPolicy::FillMediumIfAbsent,
        );
        assert_eq!(
            raw.clid.as_deref(),
            Some(r#"{"type":"tikclid","value":"t1"}"#)
        );
        assert_eq!(raw.source.as_deref(), Some("tiktok"));
        assert_eq!(raw.medium.as_deref(), Some("video"));
    }

    #[test]
    fn empty_clid_value_still_identifies_the_platform() {
        let raw = extract_from_url(
            "https://example.com/?fbclid=&utm_medium=newsfeed",
            MediumPolicy::FillMediumIfAbsent,
        );
        assert_eq!(raw.source.as_deref(), Some("facebook"));
        assert_eq!(raw.medium.as_deref(), Some("newsfeed"));
        assert_eq!(
            raw.clid.as_deref(),
            Some(r#"{"type":"fbclid","value":null}"#)
        );
    }

    #[test]
    fn unknown_clid_is_recorded_but_does_not_imply_source() {
        let raw = extract_from_url(
            "https://example.com/?myclid=m1",
            MediumPolicy::FillMediumIfAbsent,
        );
        assert_eq!(raw.source, None);
        assert_eq!(
            raw.clid.as_deref(),
            Some(r#"{"type":"myclid","value":"m1"}"#)
        );
    }

    #[test]
    fn q_parameter_fills_term_when_source_resolved() {
        let raw = extract_from_url(
            "https://example.com/?utm_source=google&q=red+shoes&q=blue",
            MediumPolicy::FillMediumIfAbsent,
        );
        assert_eq!(raw.term.as_deref(), Some("red shoes,blue"));
    }

    #[test]
    fn q_parameter_ignored_without_source() {
        let raw = extract_from_url(
            "https://example.com/?q=red+shoes",
            MediumPolicy::FillMediumIfAbsent,
        );
        assert_eq!(raw.term, None);
    }

    #[test]
    fn malformed_url_yields_empty_record() {
        let raw = extract_from_url("http://exa mple.com", MediumPolicy::FillMediumIfAbsent);
        assert_eq!(raw, RawAttribution::default());
    }
}
