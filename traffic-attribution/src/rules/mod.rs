pub mod category;
pub mod channel;

pub use category::{CategoryRuleEvaluator, CategoryRule};
pub use channel::{ChannelEvalInput, ChannelRule, ChannelRuleEvaluator};

/// Sentinel output meaning "no rule matched", distinct from "no data".
pub const UNASSIGNED: &str = "Unassigned";

pub const CATEGORY_SEARCH: &str = "search";
pub const CATEGORY_SOCIAL: &str = "social";
pub const CATEGORY_SHOPPING: &str = "shopping";

/// Media that indicate paid traffic, compared case-insensitively.
pub const PAID_MEDIUMS: [&str; 4] = ["cpc", "ppc", "retargeting", "paid"];

pub const PAID_SEARCH_SITES: [&str; 22] = [
    "google",
    "bing",
    "yahoo",
    "baidu",
    "yandex",
    "naver",
    "daum",
    "sogou",
    "duckduckgo",
    "ecosia",
    "aol",
    "ask",
    "dogpile",
    "excite",
    "lycos",
    "webcrawler",
    "info",
    "infospace",
    "search",
    "searchlock",
    "searchencrypt",
    "searchy",
];

pub const PAID_SOCIAL_SITES: [&str; 41] = [
    "facebook",
    "instagram",
    "twitter",
    "linkedin",
    "pinterest",
    "tiktok",
    "snapchat",
    "youtube",
    "vimeo",
    "flickr",
    "tumblr",
    "reddit",
    "quora",
    "digg",
    "delicious",
    "stumbleupon",
    "myspace",
    "hi5",
    "tagged",
    "meetup",
    "meetme",
    "vk",
    "weibo",
    "wechat",
    "qq",
    "renren",
    "kaixin",
    "douban",
    "mixi",
    "cyworld",
    "orkut",
    "bebo",
    "friendster",
    "xanga",
    "livejournal",
    "plurk",
    "foursquare",
    "yelp",
    "tripadvisor",
    "angieslist",
    "nextdoor",
];

pub const PAID_SHOPPING_SITES: [&str; 16] = [
    "amazon",
    "ebay",
    "etsy",
    "aliexpress",
    "walmart",
    "bestbuy",
    "target",
    "overstock",
    "wayfair",
    "homedepot",
    "lowes",
    "costco",
    "sears",
    "kmart",
    "macys",
    "nordstrom",
];

/// Fixed source -> category dictionary, used when referrer-based category
/// evaluation yields nothing usable.
pub fn category_by_source(source: &str) -> Option<&'static str> {
    const SEARCH_SOURCES: [&str; 12] = [
        "google",
        "bing",
        "yahoo",
        "baidu",
        "yandex",
        "naver",
        "daum",
        "sogou",
        "duckduckgo",
        "ecosia",
        "aol",
        "ask",
    ];
    const SOCIAL_SOURCES: [&str; 41] = [
        "facebook",
        "instagram",
        "twitter",
        "linkedin",
        "pinterest",
        "tiktok",
        "snapchat",
        "youtube",
        "vimeo",
        "flickr",
        "tumblr",
        "reddit",
        "quora",
        "digg",
        "delicious",
        "stumbleupon",
        "myspace",
        "hi5",
        "tagged",
        "meetup",
        "meetme",
        "vk",
        "weibo",
        "wechat",
        "qq",
        "renren",
        "kaixin",
        "douban",
        "mixi",
        "cyworld",
        "orkut",
        "bebo",
        "friendster",
        "xanga",
        "livejournal",
        "plurk",
        "foursquare",
        "yelp",
        "tripadvisor",
        "angieslist",
        "nextdoor",
    ];
    const SHOPPING_SOURCES: [&str; 10] = [
        "amazon",
        "ebay",
        "etsy",
        "aliexpress",
        "walmart",
        "bestbuy",
        "target",
        "overstock",
        "wayfair",
        "homedepot",
    ];

    if SEARCH_SOURCES.contains(&source) {
        Some(CATEGORY_SEARCH)
    } else if SOCIAL_SOURCES.contains(&source) {
        Some(CATEGORY_SOCIAL)
    } else if SHOPPING_SOURCES.contains(&source) {
        Some(CATEGORY_SHOPPING)
    } else {
        None
    }
}
