use chrono::{DateTime, FixedOffset, Utc};

use super::models::Digest;
use crate::config::AppConfig;
use crate::feed::Article;
use crate::text::{collapse_whitespace, truncate_chars};

/// Body used when no source produced anything
pub const EMPTY_DIGEST: &str = "今日暂无新资讯";
pub const UNKNOWN_TIME: &str = "未知时间";
/// Characters of summary shown per article
pub const SUMMARY_CHARS: usize = 200;
const READ_MORE: &str = "阅读原文";

/// Renders a digest as push-backend markdown
pub struct DigestRenderer {
    max_articles: usize,
    offset: FixedOffset,
}

impl DigestRenderer {
    pub fn new(config: &AppConfig) -> Self {
        Self::with_options(config.digest.max_articles_per_source, config.display_offset())
    }

    pub fn with_options(max_articles: usize, offset: FixedOffset) -> Self {
        Self { max_articles, offset }
    }

    pub fn render(&self, digest: &Digest) -> String {
        if digest.is_empty() {
            return EMPTY_DIGEST.to_string();
        }

        let mut lines: Vec<String> = Vec::new();

        for section in digest.sections() {
            lines.push(format!("## {}", section.source));
            lines.push(String::new());

            for (i, article) in section.articles.iter().take(self.max_articles).enumerate() {
                self.render_article(&mut lines, i + 1, article);
                lines.push(String::new());
            }

            lines.push("---".to_string());
            lines.push(String::new());
        }

        lines.join("\n")
    }

    fn render_article(&self, lines: &mut Vec<String>, index: usize, article: &Article) {
        lines.push(format!("### {}. {}", index, escape_title(&article.title)));

        if let Some(summary) = article.summary.as_deref().map(collapse_whitespace) {
            if !summary.is_empty() {
                lines.push(format!("> {}...", truncate_chars(&summary, SUMMARY_CHARS)));
            }
        }

        let time = format_timestamp(article.published_at, self.offset);
        if article.link.is_empty() {
            lines.push(format!("_{}_", time));
        } else {
            lines.push(format!("[{}]({}) · _{}_", READ_MORE, article.link, time));
        }
    }
}

/// Swap square brackets for full-width ones so titles cannot form markdown links
pub fn escape_title(title: &str) -> String {
    title.replace('[', "【").replace(']', "】")
}

pub fn format_timestamp(published_at: Option<DateTime<Utc>>, offset: FixedOffset) -> String {
    match published_at {
        Some(ts) => ts.with_timezone(&offset).format("%m-%d %H:%M").to_string(),
        None => UNKNOWN_TIME.to_string(),
    }
}

/// Push title for a digest produced at `now`, e.g. "05月01日科技资讯速递"
pub fn digest_title(now: DateTime<Utc>, offset: FixedOffset) -> String {
    format!("{}科技资讯速递", now.with_timezone(&offset).format("%m月%d日"))
}
