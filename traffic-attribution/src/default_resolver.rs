use tracing::debug;

use crate::rules::{
    category_by_source, PAID_MEDIUMS, PAID_SEARCH_SITES, PAID_SHOPPING_SITES, PAID_SOCIAL_SITES,
};
use crate::types::{CategoryTrafficSource, RawAttribution};
use crate::uri::{decompose, DecomposedUri};
use crate::utm::{extract, MediumPolicy};

/// Lower-case sentinel of the non-rule resolver, intentionally distinct from
/// the rule-based resolver's `"Direct"`.
pub const DIRECT_LOWERCASE: &str = "direct";

const ORGANIC: &str = "organic";
const REFERRAL: &str = "referral";

pub const PAID_SEARCH: &str = "Paid Search";
pub const PAID_SOCIAL: &str = "Paid Social";
pub const PAID_SHOPPING: &str = "Paid Shopping";

/// Referrer hosts that imply an organic source when no UTM data is present.
const HOST_SUFFIX_SOURCES: [(&str, &str); 10] = [
    ("google.com", "google"),
    ("facebook.com", "facebook"),
    ("microsoft.com", "microsoft"),
    ("twitter.com", "twitter"),
    ("pinterest.com", "pinterest"),
    ("linkedin.com", "linkedin"),
    ("youtube.com", "youtube"),
    ("tiktok.com", "tiktok"),
    ("bing.com", "bing"),
    ("baidu.com", "baidu"),
];

/// Output of the default resolver: the attributed record plus the decomposed
/// landing URL for callers that want the parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseResult {
    pub traffic_source: CategoryTrafficSource,
    pub uri: Option<DecomposedUri>,
}

/// Out-of-the-box attribution without JSON rules: fixed dictionaries only,
/// stateless, no caching. Classification diverges observably from the
/// rule-based resolver (lower-case `"direct"`, no `Unassigned` defaulting).
pub fn parse(url: Option<&str>, referrer: Option<&str>) -> ParseResult {
    let uri = url.and_then(decompose);

    let mut attribution = match &uri {
        Some(uri) => extract(&uri.parameters, MediumPolicy::OverwriteMedium),
        None => RawAttribution::default(),
    };

    if attribution.source.is_none() {
        if let Some(referrer) = referrer.filter(|r| !r.is_empty()) {
            attribution = from_referrer(referrer);
        }
    }

    if attribution.source.is_none() {
        attribution.source = Some(DIRECT_LOWERCASE.to_string());
        attribution.campaign = Some(DIRECT_LOWERCASE.to_string());
    }

    let category = attribution
        .source
        .as_deref()
        .and_then(category_by_source)
        .map(str::to_string);
    let channel_group = channel_group_for(
        attribution.source.as_deref(),
        attribution.campaign.as_deref(),
        attribution.medium.as_deref(),
    );

    debug!(?attribution, ?category, ?channel_group, "default resolver");

    ParseResult {
        traffic_source: CategoryTrafficSource {
            attribution,
            category,
            channel_group,
        },
        uri,
    }
}

/// Channel classification over the fixed site lists. Shopping-site
/// membership wins outright; search and social additionally require a paid
/// medium.
pub fn channel_group_for(
    source: Option<&str>,
    campaign: Option<&str>,
    medium: Option<&str>,
) -> Option<String> {
    let medium_lower = medium.map(str::to_lowercase);
    let paid_medium = medium_lower
        .as_deref()
        .is_some_and(|m| PAID_MEDIUMS.contains(&m));
    let shop_campaign = campaign.is_some_and(|c| c.to_lowercase().contains("shop"));

    let channel = if source.is_some_and(|s| PAID_SHOPPING_SITES.contains(&s))
        || (shop_campaign && paid_medium)
    {
        PAID_SHOPPING
    } else if source.is_some_and(|s| PAID_SEARCH_SITES.contains(&s)) && paid_medium {
        PAID_SEARCH
    } else if source.is_some_and(|s| PAID_SOCIAL_SITES.contains(&s)) && paid_medium {
        PAID_SOCIAL
    } else {
        return None;
    };
    Some(channel.to_string())
}

fn from_referrer(referrer: &str) -> RawAttribution {
    let mut attribution = RawAttribution::default();
    let Some(host) = decompose(referrer).and_then(|uri| uri.host) else {
        return attribution;
    };

    for (suffix, source) in HOST_SUFFIX_SOURCES {
        if host.contains(suffix) {
            attribution.source = Some(source.to_string());
            attribution.medium = Some(ORGANIC.to_string());
            return attribution;
        }
    }

    attribution.source = Some(host);
    attribution.medium = Some(REFERRAL.to_string());
    attribution.content = Some(referrer.to_string());
    attribution
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utm_parameters_drive_the_result() {
        let result = parse(
            Some("https://shop.example.com/?utm_source=google&utm_medium=cpc&q=boots"),
            None,
        );
        let ts = result.traffic_source;
        assert_eq!(ts.source(), Some("google"));
        assert_eq!(ts.medium(), Some("cpc"));
        assert_eq!(ts.attribution.term.as_deref(), Some("boots"));
        assert_eq!(ts.category.as_deref(), Some("search"));
        assert_eq!(ts.channel_group.as_deref(), Some(PAID_SEARCH));
        assert!(result.uri.is_some());
    }

    #[test]
    fn no_signal_is_lowercase_direct() {
        let result = parse(Some("https://example.com/landing"), None);
        let ts = result.traffic_source;
        assert_eq!(ts.source(), Some(DIRECT_LOWERCASE));
        assert_eq!(ts.attribution.campaign.as_deref(), Some(DIRECT_LOWERCASE));
        assert_eq!(ts.category, None);
        assert_eq!(ts.channel_group, None);
    }

    #[test]
    fn known_referrer_host_is_organic() {
        let result = parse(None, Some("https://www.youtube.com/watch?v=abc"));
        let ts = result.traffic_source;
        assert_eq!(ts.source(), Some("youtube"));
        assert_eq!(ts.medium(), Some("organic"));
        assert_eq!(ts.category.as_deref(), Some("social"));
    }

    #[test]
    fn unknown_referrer_host_is_referral() {
        let referrer = "https://blog.partner.example/post";
        let result = parse(None, Some(referrer));
        let ts = result.traffic_source;
        assert_eq!(ts.source(), Some("blog.partner.example"));
        assert_eq!(ts.medium(), Some("referral"));
        assert_eq!(ts.attribution.content.as_deref(), Some(referrer));
    }

    #[test]
    fn shopping_site_wins_over_paid_medium_checks() {
        assert_eq!(
            channel_group_for(Some("amazon"), None, Some("cpc")).as_deref(),
            Some(PAID_SHOPPING)
        );
        // even without a paid medium
        assert_eq!(
            channel_group_for(Some("amazon"), None, None).as_deref(),
            Some(PAID_SHOPPING)
        );
    }

    #[test]
    fn review_directory_source_with_paid_medium_is_paid_social() {
        let result = parse(
            Some("https://example.com/?utm_source=angieslist&utm_medium=cpc"),
            None,
        );
        let ts = result.traffic_source;
        assert_eq!(ts.category.as_deref(), Some("social"));
        assert_eq!(ts.channel_group.as_deref(), Some(PAID_SOCIAL));
    }

    #[test]
    fn shop_campaign_with_paid_medium_is_paid_shopping() {
        assert_eq!(
            channel_group_for(Some("example"), Some("Summer-Shop"), Some("retargeting")).as_deref(),
            Some(PAID_SHOPPING)
        );
    }

    #[test]
    fn search_and_social_require_a_paid_medium() {
        assert_eq!(channel_group_for(Some("google"), None, None), None);
        assert_eq!(
            channel_group_for(Some("google"), None, Some("CPC")).as_deref(),
            Some(PAID_SEARCH)
        );
        assert_eq!(channel_group_for(Some("facebook"), None, Some("social")), None);
        assert_eq!(
            channel_group_for(Some("facebook"), None, Some("paid")).as_deref(),
            Some(PAID_SOCIAL)
        );
    }

    #[test]
    fn overwrite_medium_policy_applies_on_this_path() {
        let result = parse(Some("https://example.com/?dclid=x&utm_medium=banner"), None);
        let ts = result.traffic_source;
        assert_eq!(ts.source(), Some("google"));
        assert_eq!(ts.medium(), Some("display"));
    }

    #[test]
    fn malformed_url_still_produces_a_record() {
        let result = parse(Some("http://exa mple.com"), Some(""));
        assert_eq!(result.uri, None);
        assert_eq!(result.traffic_source.source(), Some(DIRECT_LOWERCASE));
    }
}
