use chrono::Utc;

use crate::config::AppConfig;
use crate::digest::{digest_title, DigestRenderer};
use crate::feed::{FeedFetcher, FeedSource};
use crate::push::{Dispatcher, PushMessage};
use crate::translate::Translator;
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Render and push through the configured backend
    Deliver,
    /// Render only; no credentials needed
    Preview,
}

/// What one run produced
#[derive(Debug, Clone)]
pub struct RunReport {
    pub sources: usize,
    pub articles: usize,
    /// None when there was nothing new to send
    pub message: Option<PushMessage>,
    /// None unless a push was attempted
    pub delivered: Option<bool>,
}

/// Fetch, translate, render and (in deliver mode) push one digest.
///
/// Credentials are validated before any network activity; that is the only
/// error this returns for a well-formed config. Feed, translation and push
/// failures are logged and absorbed.
pub async fn run_digest(config: &AppConfig, sources: &[FeedSource], mode: RunMode) -> Result<RunReport> {
    let dispatcher = match mode {
        RunMode::Deliver => {
            let credentials = config.push.credentials()?;
            Some(Dispatcher::from_credentials(&credentials, &config.push)?)
        }
        RunMode::Preview => None,
    };

    let started = Utc::now();
    tracing::info!(
        "Starting digest run - {}",
        started.with_timezone(&config.display_offset()).format("%Y-%m-%d %H:%M")
    );

    let fetcher = FeedFetcher::new(config)?;
    let digest = fetcher.fetch_all(sources, config.digest.recency_hours).await;

    let articles = digest.total_articles();
    let source_count = digest.source_count();
    tracing::info!("Fetched {} articles from {} sources", articles, source_count);

    if articles == 0 {
        tracing::info!("No new articles, skipping push");
        return Ok(RunReport {
            sources: 0,
            articles: 0,
            message: None,
            delivered: None,
        });
    }

    let digest = if config.translate.enabled {
        tracing::info!("Translating digest to {}", config.translate.target_lang);
        Translator::new(config)?.localize_digest(digest).await
    } else {
        digest
    };

    let body = DigestRenderer::new(config).render(&digest);
    let message = PushMessage::new(digest_title(started, config.display_offset()), body);

    let delivered = match &dispatcher {
        Some(dispatcher) => Some(dispatcher.dispatch(&message).await),
        None => None,
    };

    Ok(RunReport {
        sources: source_count,
        articles,
        message: Some(message),
        delivered,
    })
}
