//! Hosted backend configuration and endpoint layout.

use std::time::Duration;

use reqwest::Url;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};

/// Hosted backend connection configuration.
#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    /// Project URL (e.g., https://abcd.supabase.co)
    pub url: String,
    /// Public anon key, sent as `apikey` and bearer token
    pub anon_key: String,
    /// Database schema of the posts table
    pub schema: String,
    /// Table holding the posts
    pub table: String,
    /// Storage bucket for post images
    pub bucket: String,
    /// Interval between realtime heartbeats
    pub heartbeat_interval: Duration,
}

impl SupabaseConfig {
    pub fn new(url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            url: url.into().trim_end_matches('/').to_string(),
            anon_key: anon_key.into(),
            schema: "public".to_string(),
            table: "posts".to_string(),
            bucket: "post-images".to_string(),
            heartbeat_interval: Duration::from_secs(25),
        }
    }

    /// Load configuration from environment variables.
    /// Returns `None` unless both `SUPABASE_URL` and `SUPABASE_ANON_KEY` are set.
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`SupabaseConfig::from_env`], reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let url = lookup("SUPABASE_URL")?;
        let anon_key = lookup("SUPABASE_ANON_KEY")?;
        let mut config = Self::new(url, anon_key);

        if let Some(table) = lookup("WALL_TABLE") {
            config.table = table;
        }
        if let Some(bucket) = lookup("WALL_BUCKET") {
            config.bucket = bucket;
        }
        if let Some(secs) = lookup("REALTIME_HEARTBEAT_SECS").and_then(|s| s.parse().ok()) {
            config.heartbeat_interval = Duration::from_secs(secs);
        }

        Some(config)
    }

    /// `{url}/rest/v1/{table}`
    pub fn table_url(&self) -> Result<Url, String> {
        self.join(&["rest", "v1", &self.table])
    }

    /// `{url}/storage/v1/object/{bucket}/{path}`
    pub fn object_url(&self, path: &str) -> Result<Url, String> {
        self.join(&["storage", "v1", "object", &self.bucket, path])
    }

    /// `{url}/storage/v1/object/public/{bucket}/{path}`
    pub fn public_object_url(&self, path: &str) -> Result<Url, String> {
        self.join(&["storage", "v1", "object", "public", &self.bucket, path])
    }

    /// Websocket endpoint of the realtime service.
    pub fn realtime_url(&self) -> Result<Url, String> {
        let mut url = self.join(&["realtime", "v1", "websocket"])?;
        let scheme = match url.scheme() {
            "https" => "wss",
            "http" => "ws",
            other => return Err(format!("unsupported scheme: {other}")),
        };
        url.set_scheme(scheme)
            .map_err(|_| format!("cannot switch {} to {scheme}", self.url))?;
        url.query_pairs_mut()
            .append_pair("apikey", &self.anon_key)
            .append_pair("vsn", "1.0.0");
        Ok(url)
    }

    /// `apikey` and bearer headers sent with every request.
    pub fn auth_headers(&self) -> Result<HeaderMap, String> {
        let key = HeaderValue::from_str(&self.anon_key).map_err(|e| e.to_string())?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", self.anon_key))
            .map_err(|e| e.to_string())?;

        let mut headers = HeaderMap::new();
        headers.insert("apikey", key);
        headers.insert(AUTHORIZATION, bearer);
        Ok(headers)
    }

    /// Append percent-encoded path segments to the project URL.
    fn join(&self, segments: &[&str]) -> Result<Url, String> {
        let mut url = Url::parse(&self.url).map_err(|e| format!("{}: {e}", self.url))?;
        url.path_segments_mut()
            .map_err(|_| format!("{} cannot be a base URL", self.url))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config() -> SupabaseConfig {
        SupabaseConfig::new("https://demo.supabase.co/", "anon-key")
    }

    #[test]
    fn test_from_lookup() {
        let vars = HashMap::from([
            ("SUPABASE_URL", "https://demo.supabase.co"),
            ("SUPABASE_ANON_KEY", "anon-key"),
            ("WALL_BUCKET", "wall-images"),
            ("REALTIME_HEARTBEAT_SECS", "10"),
        ]);
        let config = SupabaseConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string()))
            .expect("url and key set");

        assert_eq!(config.table, "posts");
        assert_eq!(config.bucket, "wall-images");
        assert_eq!(config.heartbeat_interval, Duration::from_secs(10));

        assert!(SupabaseConfig::from_lookup(|key| {
            (key == "SUPABASE_URL").then(|| "https://demo.supabase.co".to_string())
        })
        .is_none());
    }

    #[test]
    fn test_table_url() {
        assert_eq!(
            config().table_url().unwrap().as_str(),
            "https://demo.supabase.co/rest/v1/posts"
        );
    }

    #[test]
    fn test_object_urls_encode_file_names() {
        let config = config();
        assert_eq!(
            config.object_url("1714564800123-my photo.png").unwrap().as_str(),
            "https://demo.supabase.co/storage/v1/object/post-images/1714564800123-my%20photo.png"
        );
        assert_eq!(
            config
                .public_object_url("1714564800123-cat.png")
                .unwrap()
                .as_str(),
            "https://demo.supabase.co/storage/v1/object/public/post-images/1714564800123-cat.png"
        );
    }

    #[test]
    fn test_path_separators_are_escaped() {
        let url = config().object_url("1-a/b.png").unwrap();
        assert!(url.as_str().ends_with("/post-images/1-a%2Fb.png"));
    }

    #[test]
    fn test_realtime_url() {
        assert_eq!(
            config().realtime_url().unwrap().as_str(),
            "wss://demo.supabase.co/realtime/v1/websocket?apikey=anon-key&vsn=1.0.0"
        );

        let local = SupabaseConfig::new("http://127.0.0.1:54321", "k");
        assert!(local.realtime_url().unwrap().as_str().starts_with("ws://127.0.0.1:54321/"));
    }

    #[test]
    fn test_auth_headers() {
        let headers = config().auth_headers().unwrap();
        assert_eq!(headers["apikey"], "anon-key");
        assert_eq!(headers[AUTHORIZATION], "Bearer anon-key");
    }
}
