use feed_rs::model::Entry;
use feed_rs::parser;

use super::models::FeedEntry;
use crate::text::html_to_text;
use crate::{Error, Result};

/// Parse RSS/Atom/JSON feed content into loose entry records, in document order
pub fn parse_entries(content: &[u8]) -> Result<Vec<FeedEntry>> {
    let feed = parser::parse(content).map_err(|e| Error::FeedParse(e.to_string()))?;

    Ok(feed.entries.into_iter().map(to_entry).collect())
}

fn to_entry(entry: Entry) -> FeedEntry {
    let title = entry.title.map(|t| t.content.trim().to_string());

    let link = entry.links.first().map(|l| l.href.trim().to_string());

    let summary = entry.summary.map(|s| html_to_text(&s.content));

    let description = entry.content.and_then(|c| c.body).map(|body| html_to_text(&body));

    FeedEntry {
        title: non_empty(title),
        link: non_empty(link),
        published: entry.published,
        updated: entry.updated,
        summary: non_empty(summary),
        description: non_empty(description),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
