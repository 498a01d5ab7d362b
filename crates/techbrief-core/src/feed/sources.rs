use super::models::{Category, FeedSource};

/// Built-in feeds, in digest order.
/// RSSHub-backed entries are rewritten to `[rsshub] base_url` at fetch time.
const SOURCES: &[(&str, &str, Category)] = &[
    ("Hacker News Front Page", "https://hnrss.org/frontpage?points=100", Category::Community),
    ("Hacker News Best", "https://hnrss.org/best", Category::Community),
    ("V2EX Hot", "https://rsshub.app/v2ex/topics/hot", Category::Community),
    ("GitHub Trending", "https://rsshub.app/github/trending/daily/all", Category::OpenSource),
    ("SSPAI", "https://sspai.com/feed", Category::ChineseTech),
    ("36Kr Newsflash", "https://rsshub.app/36kr/newsflashes", Category::ChineseTech),
    ("TechCrunch", "https://techcrunch.com/feed/", Category::GlobalTech),
    ("The Verge", "https://www.theverge.com/rss/index.xml", Category::GlobalTech),
    ("Ars Technica", "https://feeds.arstechnica.com/arstechnica/index", Category::GlobalTech),
];

pub fn default_sources() -> Vec<FeedSource> {
    SOURCES
        .iter()
        .map(|(name, url, category)| FeedSource::new(name, url, *category))
        .collect()
}

/// Group sources by category, keeping first-seen category order
pub fn group_by_category(sources: &[FeedSource]) -> Vec<(Category, Vec<&FeedSource>)> {
    let mut groups: Vec<(Category, Vec<&FeedSource>)> = Vec::new();

    for source in sources {
        match groups.iter_mut().find(|(c, _)| *c == source.category) {
            Some((_, members)) => members.push(source),
            None => groups.push((source.category, vec![source])),
        }
    }

    groups
}
