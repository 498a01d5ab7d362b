use serde::{Deserialize, Serialize};

use crate::feed::Article;

/// Articles gathered from one source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DigestSection {
    pub source: String,
    pub articles: Vec<Article>,
}

/// Per-source articles for one run, in feed order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Digest {
    sections: Vec<DigestSection>,
}

impl Digest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a section. Returns false (and stores nothing) when `articles` is empty.
    pub fn push(&mut self, source: &str, articles: Vec<Article>) -> bool {
        if articles.is_empty() {
            return false;
        }
        self.sections.push(DigestSection {
            source: source.to_string(),
            articles,
        });
        true
    }

    pub fn sections(&self) -> &[DigestSection] {
        &self.sections
    }

    pub fn into_sections(self) -> Vec<DigestSection> {
        self.sections
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn source_count(&self) -> usize {
        self.sections.len()
    }

    pub fn total_articles(&self) -> usize {
        self.sections.iter().map(|s| s.articles.len()).sum()
    }
}
