pub const RESULT_CACHE_COUNTER: &str = "attribution_result_cache_total";
pub const RESOLVER_CONSTRUCTED_COUNTER: &str = "attribution_resolver_constructed_total";
pub const URL_PARSE_FAILURE_COUNTER: &str = "attribution_url_parse_failure_total";
