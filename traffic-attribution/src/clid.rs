use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::types::SourceMedium;

/// Known click-identifier parameter names and the (source, medium) each one
/// implies. Built once, never mutated.
static KNOWN_CLICK_IDS: Lazy<HashMap<&'static str, SourceMedium>> = Lazy::new(|| {
    HashMap::from([
        (
            "gclid",
            SourceMedium {
                source: "google",
                medium: "cpc",
            },
        ),
        (
            "dclid",
            SourceMedium {
                source: "google",
                medium: "display",
            },
        ),
        (
            "fbclid",
            SourceMedium {
                source: "facebook",
                medium: "social",
            },
        ),
        (
            "msclid",
            SourceMedium {
                source: "microsoft",
                medium: "cpc",
            },
        ),
        (
            "twclid",
            SourceMedium {
                source: "twitter",
                medium: "cpc",
            },
        ),
        (
            "pintclid",
            SourceMedium {
                source: "pinterest",
                medium: "cpc",
            },
        ),
        (
            "linclid",
            SourceMedium {
                source: "linkedin",
                medium: "cpc",
            },
        ),
        (
            "ytclid",
            SourceMedium {
                source: "youtube",
                medium: "video",
            },
        ),
        (
            "tikclid",
            SourceMedium {
                source: "tiktok",
                medium: "video",
            },
        ),
        (
            "bingclid",
            SourceMedium {
                source: "bing",
                medium: "cpc",
            },
        ),
        (
            "baiduclid",
            SourceMedium {
                source: "baidu",
                medium: "cpc",
            },
        ),
    ])
});

/// Look up the (source, medium) implied by a click-id parameter name.
pub fn known_click_id(kind: &str) -> Option<SourceMedium> {
    KNOWN_CLICK_IDS.get(kind).copied()
}
