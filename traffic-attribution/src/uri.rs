use tracing::warn;
use url::Url;

use crate::metric_consts::URL_PARSE_FAILURE_COUNTER;

/// Multi-valued query-parameter map. Keys keep first-occurrence order and
/// values keep their order of appearance, so "first `*clid` parameter wins"
/// style scans are deterministic for a given URL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(Vec<(String, Vec<String>)>);

impl QueryParams {
    fn insert(&mut self, key: &str, value: String) {
        if let Some((_, values)) = self.0.iter_mut().find(|(k, _)| k == key) {
            values.push(value);
        } else {
            self.0.push((key.to_string(), vec![value]));
        }
    }

    /// First value for `name`. An empty first value counts as absent.
    pub fn first(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == name)
            .and_then(|(_, values)| values.first())
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// All values for `name` joined with `,`, or `None` when absent.
    pub fn joined(&self, name: &str) -> Option<String> {
        self.0
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, values)| values.join(","))
            .filter(|v| !v.is_empty())
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.0.iter().any(|(k, _)| k == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A landing URL or referrer decomposed into its parts. Read-only once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecomposedUri {
    pub protocol: Option<String>,
    pub host: Option<String>,
    /// `None` when the path is empty or just `/`.
    pub path: Option<String>,
    pub query: Option<String>,
    pub parameters: QueryParams,
}

/// Decompose a URL string. Missing schemes are tolerated: when `://` does not
/// appear within the first 10 characters, `http://` is prefixed before
/// parsing. Malformed URLs are non-fatal and yield `None`.
pub fn decompose(input: &str) -> Option<DecomposedUri> {
    if input.is_empty() {
        return None;
    }

    let head = &input.as_bytes()[..input.len().min(10)];
    let has_scheme = head.windows(3).any(|w| w == b"://");
    let normalized = if has_scheme {
        input.to_string()
    } else {
        format!("http://{input}")
    };

    let url = match Url::parse(&normalized) {
        Ok(url) => url,
        Err(e) => {
            warn!("cannot parse url: {}, error: {}", input, e);
            metrics::counter!(URL_PARSE_FAILURE_COUNTER).increment(1);
            return None;
        }
    };

    let mut parameters = QueryParams::default();
    for (key, value) in url.query_pairs() {
        parameters.insert(&key, value.into_owned());
    }

    let path = match url.path() {
        "" | "/" => None,
        p => Some(p.to_string()),
    };

    Some(DecomposedUri {
        protocol: Some(url.scheme().to_string()),
        host: url.host_str().map(str::to_string),
        path,
        query: url.query().map(str::to_string),
        parameters,
    })
}

/// Host of a referrer string, when it parses.
pub fn referrer_host(referrer: &str) -> Option<String> {
    decompose(referrer).and_then(|uri| uri.host)
}
