/// Localized display names for the built-in sources
const LOCALIZED_NAMES: &[(&str, &str)] = &[
    ("Hacker News Front Page", "Hacker News 热门"),
    ("Hacker News Best", "Hacker News 最佳"),
    ("V2EX Hot", "V2EX 热门"),
    ("GitHub Trending", "GitHub 今日趋势"),
    ("SSPAI", "少数派"),
    ("36Kr Newsflash", "36氪快讯"),
    ("TechCrunch", "TechCrunch 科技新闻"),
    ("The Verge", "The Verge 科技"),
    ("Ars Technica", "Ars Technica 科技"),
];

/// Look up the localized name of a source, passing unknown names through
pub fn localized_source_name(name: &str) -> &str {
    LOCALIZED_NAMES
        .iter()
        .find(|(from, _)| *from == name)
        .map(|(_, to)| *to)
        .unwrap_or(name)
}
