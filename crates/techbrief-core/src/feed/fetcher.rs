use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::{Client, Proxy};
use url::Url;

use super::models::{Article, FeedEntry, FeedSource};
use super::parser::parse_entries;
use crate::config::AppConfig;
use crate::digest::Digest;
use crate::{Error, Result};

const RSSHUB_SCHEME: &str = "rsshub";
const MAX_FEED_BYTES: usize = 5 * 1024 * 1024;

/// Feed fetcher with HTTP client and RSSHub support
pub struct FeedFetcher {
    client: Client,
    rsshub_base_url: String,
    rsshub_access_key: Option<String>,
    max_entries: usize,
    max_feed_bytes: usize,
}

impl FeedFetcher {
    /// Create a new feed fetcher with configuration
    pub fn new(config: &AppConfig) -> Result<Self> {
        let client = Self::build_client(
            config.sync.request_timeout_secs,
            &config.sync.proxy_url,
            &config.sync.user_agent,
        )?;

        Ok(Self {
            client,
            rsshub_base_url: config.rsshub.base_url.clone(),
            rsshub_access_key: config.rsshub.access_key.clone(),
            max_entries: config.digest.max_entries_per_feed,
            max_feed_bytes: MAX_FEED_BYTES,
        })
    }

    /// Build HTTP client with optional proxy
    fn build_client(timeout_secs: u64, proxy_url: &Option<String>, user_agent: &str) -> Result<Client> {
        let mut builder = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(user_agent)
            .gzip(true)
            .deflate(true)
            .brotli(true)
            .redirect(reqwest::redirect::Policy::limited(10));

        if let Some(ref proxy) = proxy_url {
            let proxy = Proxy::all(proxy)
                .map_err(|e| Error::Config(format!("Invalid proxy URL: {}", e)))?;
            builder = builder.proxy(proxy);
            tracing::info!("Using HTTP proxy for feed fetching");
        }

        builder.build().map_err(Error::Http)
    }

    /// Resolve a URL, converting rsshub:// protocol or rsshub.app URLs to the configured instance
    pub fn resolve_url(&self, url: &str) -> Result<String> {
        let rsshub_prefix = format!("{}://", RSSHUB_SCHEME);

        if let Some(path) = url.strip_prefix(&rsshub_prefix) {
            if path.trim_matches('/').is_empty() {
                return Err(Error::InvalidRsshubUrl(url.to_string()));
            }
            Ok(self.convert_rsshub_path(path))
        } else if let Some(path) = url
            .strip_prefix("https://rsshub.app/")
            .or_else(|| url.strip_prefix("http://rsshub.app/"))
        {
            Ok(self.convert_rsshub_path(path))
        } else {
            Url::parse(url)?;
            Ok(url.to_string())
        }
    }

    /// Map an RSSHub route onto the configured instance, appending the access key if any
    fn convert_rsshub_path(&self, path: &str) -> String {
        let base = self.rsshub_base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');

        let mut resolved_url = format!("{}/{}", base, path);

        if let Some(ref key) = self.rsshub_access_key {
            let separator = if resolved_url.contains('?') { "&" } else { "?" };
            resolved_url = format!("{}{}key={}", resolved_url, separator, key);
        }

        resolved_url
    }

    /// Fetch and parse a feed from URL. Single attempt, no retries.
    ///
    /// Errors name `url` as configured, never the resolved URL, which may carry
    /// the RSSHub access key.
    pub async fn fetch(&self, url: &str) -> Result<Vec<FeedEntry>> {
        let resolved_url = self.resolve_url(url)?;

        tracing::debug!("Fetching feed from: {}", url);

        let mut response = self
            .client
            .get(&resolved_url)
            .send()
            .await
            .map_err(|e| Error::Http(e.without_url()))?;
        let status = response.status();

        if let Some(len) = response.content_length() {
            if len > self.max_feed_bytes as u64 {
                return Err(self.too_large(url));
            }
        }

        let mut content = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| Error::Http(e.without_url()))?
        {
            if content.len() + chunk.len() > self.max_feed_bytes {
                return Err(self.too_large(url));
            }
            content.extend_from_slice(&chunk);
        }

        if is_cloudflare_challenge(&content) {
            return Err(Error::FeedParse(format!(
                "Cloudflare challenge detected for URL: {}. \
                If this is an RSSHub URL, configure another instance \
                under [rsshub] base_url, or configure a proxy.",
                url
            )));
        }

        if !status.is_success() {
            return Err(Error::FeedParse(format!("HTTP {} for URL: {}", status, url)));
        }

        parse_entries(&content)
    }

    fn too_large(&self, url: &str) -> Error {
        Error::FeedParse(format!(
            "Feed too large (over {} bytes) for URL: {}",
            self.max_feed_bytes, url
        ))
    }

    /// Fetch one source and keep its recent articles
    pub async fn fetch_source(
        &self,
        source: &FeedSource,
        now: DateTime<Utc>,
        window: chrono::Duration,
    ) -> Result<Vec<Article>> {
        let entries = self.fetch(&source.url).await?;
        Ok(select_recent(entries, now, window, self.max_entries))
    }

    /// Fetch every source in order. Failing sources are logged and skipped;
    /// sources with no recent articles are left out of the digest.
    pub async fn fetch_all(&self, sources: &[FeedSource], recency_hours: u32) -> Digest {
        let now = Utc::now();
        let window = chrono::Duration::hours(i64::from(recency_hours));
        let mut digest = Digest::new();

        for source in sources {
            tracing::info!("Fetching: {}", source.name);

            match self.fetch_source(source, now, window).await {
                Ok(articles) => {
                    let count = articles.len();
                    if digest.push(&source.name, articles) {
                        tracing::info!("  {}: {} recent articles", source.name, count);
                    } else {
                        tracing::info!("  {}: nothing new", source.name);
                    }
                }
                Err(e) => {
                    tracing::warn!("Failed to fetch feed '{}': {}", source.name, e);
                }
            }
        }

        digest
    }
}

/// Keep the first `limit` entries whose time is unknown or within `window` of `now`.
/// Future-dated entries are kept.
pub fn select_recent(
    entries: Vec<FeedEntry>,
    now: DateTime<Utc>,
    window: chrono::Duration,
    limit: usize,
) -> Vec<Article> {
    let cutoff = now - window;

    entries
        .into_iter()
        .take(limit)
        .filter(|entry| entry.timestamp().map_or(true, |ts| ts >= cutoff))
        .map(FeedEntry::into_article)
        .collect()
}

/// Check if content is a Cloudflare challenge page
fn is_cloudflare_challenge(content: &[u8]) -> bool {
    let check_len = content.len().min(2048);
    let preview = String::from_utf8_lossy(&content[..check_len]);

    preview.contains("Just a moment...")
        || preview.contains("cf-browser-verification")
        || preview.contains("_cf_chl_opt")
        || preview.contains("challenge-platform")
}
