use std::sync::Arc;

use super::names::localized_source_name;
use super::{GoogleTranslateProvider, TranslationProvider};
use crate::config::{AppConfig, DigestConfig};
use crate::digest::{Digest, SUMMARY_CHARS};
use crate::feed::Article;
use crate::text::{collapse_whitespace, is_cjk, truncate_chars};
use crate::Result;

/// Best-effort translator: never fails, falls back to the input text
pub struct Translator {
    provider: Arc<dyn TranslationProvider>,
    source_lang: String,
    target_lang: String,
    /// Articles per section worth translating; the rest are never rendered
    max_articles: usize,
    summary_chars: usize,
}

impl Translator {
    /// Create a translator backed by the configured endpoint
    pub fn new(config: &AppConfig) -> Result<Self> {
        let provider = Arc::new(GoogleTranslateProvider::new(&config.translate)?);
        Ok(Self::with_provider(
            provider,
            &config.translate.source_lang,
            &config.translate.target_lang,
        )
        .with_limits(config.digest.max_articles_per_source, SUMMARY_CHARS))
    }

    pub fn with_provider(
        provider: Arc<dyn TranslationProvider>,
        source_lang: &str,
        target_lang: &str,
    ) -> Self {
        Self {
            provider,
            source_lang: source_lang.to_string(),
            target_lang: target_lang.to_string(),
            max_articles: DigestConfig::default().max_articles_per_source,
            summary_chars: SUMMARY_CHARS,
        }
    }

    /// Only translate what the renderer will show
    pub fn with_limits(mut self, max_articles: usize, summary_chars: usize) -> Self {
        self.max_articles = max_articles;
        self.summary_chars = summary_chars;
        self
    }

    /// Translate with the configured languages
    pub async fn translate(&self, text: &str) -> String {
        self.translate_with(text, &self.source_lang, &self.target_lang).await
    }

    pub async fn translate_with(&self, text: &str, source_lang: &str, target_lang: &str) -> String {
        if !needs_translation(text, target_lang) {
            return text.to_string();
        }

        match self.provider.translate(text, source_lang, target_lang).await {
            Ok(translated) if !translated.trim().is_empty() => translated,
            Ok(_) => text.to_string(),
            Err(e) => {
                tracing::warn!("Translation via {} failed, keeping original: {}", self.provider.name(), e);
                text.to_string()
            }
        }
    }

    /// Localize source names, titles and summaries of the articles that get
    /// rendered. Articles past the per-section limit are dropped and summaries
    /// are cut to the rendered length before translation.
    pub async fn localize_digest(&self, digest: Digest) -> Digest {
        let mut localized = Digest::new();

        for section in digest.into_sections() {
            let mut articles = Vec::with_capacity(section.articles.len().min(self.max_articles));
            for article in section.articles.into_iter().take(self.max_articles) {
                articles.push(self.localize_article(article).await);
            }
            localized.push(localized_source_name(&section.source), articles);
        }

        localized
    }

    async fn localize_article(&self, article: Article) -> Article {
        let title = self.translate(&article.title).await;
        let summary = match article.summary {
            Some(summary) => {
                let summary = collapse_whitespace(&summary);
                Some(self.translate(truncate_chars(&summary, self.summary_chars)).await)
            }
            None => None,
        };

        Article {
            title,
            summary,
            ..article
        }
    }
}

/// Skip blank text, and text already written in Chinese when targeting Chinese
fn needs_translation(text: &str, target_lang: &str) -> bool {
    if text.trim().is_empty() {
        return false;
    }
    if target_lang.to_ascii_lowercase().starts_with("zh") {
        return !text.chars().any(is_cjk);
    }
    true
}
