use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::text::truncate_chars;

pub const UNTITLED: &str = "无标题";
/// Character budget for a summary derived from the description
pub const DESCRIPTION_SUMMARY_CHARS: usize = 300;

/// Topical grouping of the built-in sources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Community,
    OpenSource,
    ChineseTech,
    GlobalTech,
}

impl Category {
    pub fn label(&self) -> &'static str {
        match self {
            Category::Community => "Developer communities",
            Category::OpenSource => "Open source",
            Category::ChineseTech => "Chinese tech media",
            Category::GlobalTech => "Global tech media",
        }
    }
}

/// A configured feed to pull articles from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedSource {
    pub name: String,
    pub url: String,
    pub category: Category,
}

impl FeedSource {
    pub fn new(name: &str, url: &str, category: Category) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
            category,
        }
    }
}

/// One entry as read from a feed document. Every field may be missing;
/// fallbacks are applied by [`FeedEntry::into_article`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedEntry {
    pub title: Option<String>,
    pub link: Option<String>,
    pub published: Option<DateTime<Utc>>,
    pub updated: Option<DateTime<Utc>>,
    pub summary: Option<String>,
    pub description: Option<String>,
}

impl FeedEntry {
    /// Published time, falling back to the updated time
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.published.or(self.updated)
    }

    pub fn into_article(self) -> Article {
        let published_at = self.timestamp();

        let summary = self.summary.or_else(|| {
            self.description
                .map(|d| truncate_chars(&d, DESCRIPTION_SUMMARY_CHARS).to_string())
        });

        Article {
            title: self.title.unwrap_or_else(|| UNTITLED.to_string()),
            link: self.link.unwrap_or_default(),
            published_at,
            summary,
        }
    }
}

/// A recent article ready for the digest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub link: String,
    pub published_at: Option<DateTime<Utc>>,
    pub summary: Option<String>,
}
