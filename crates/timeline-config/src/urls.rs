//! URL helpers derived from the resolved config.

use url::form_urlencoded;

use crate::EnvironmentConfig;

fn is_absolute(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}

fn join(base: &str, rest: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), rest)
}

impl EnvironmentConfig {
    /// Full URL for a media path returned by the server.
    ///
    /// Absolute URLs pass through. A leading `/` and then a leading
    /// `static/` are stripped before joining onto the media base, so
    /// `/static/avatars/a.png` and `avatars/a.png` land on the same URL.
    pub fn full_media_url(&self, path: &str) -> String {
        if path.is_empty() {
            return String::new();
        }
        if is_absolute(path) {
            return path.to_string();
        }
        let path = path.strip_prefix('/').unwrap_or(path);
        let path = path.strip_prefix("static/").unwrap_or(path);
        join(&self.media_base_url, path)
    }

    /// Full URL for an API endpoint.
    ///
    /// Empty input yields the API base itself; a leading `/` and then a
    /// leading `api/` are stripped before joining.
    pub fn full_api_url(&self, endpoint: &str) -> String {
        if endpoint.is_empty() {
            return self.api_base_url.clone();
        }
        if is_absolute(endpoint) {
            return endpoint.to_string();
        }
        let endpoint = endpoint.strip_prefix('/').unwrap_or(endpoint);
        let endpoint = endpoint.strip_prefix("api/").unwrap_or(endpoint);
        join(&self.api_base_url, endpoint)
    }
}

/// Collapse runs of `/` and drop a single trailing `/`.
pub fn normalize_path(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    for c in path.chars() {
        if c == '/' && out.ends_with('/') {
            continue;
        }
        out.push(c);
    }
    if out.ends_with('/') {
        out.pop();
    }
    out
}

/// Build a `?k=v&...` query string, skipping empty values.
///
/// Returns an empty string when no parameter survives.
pub fn build_query_string<I, K, V>(params: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    let mut any = false;
    for (key, value) in params {
        if value.as_ref().is_empty() {
            continue;
        }
        serializer.append_pair(key.as_ref(), value.as_ref());
        any = true;
    }
    if any {
        format!("?{}", serializer.finish())
    } else {
        String::new()
    }
}
