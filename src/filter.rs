use crate::types::Article;
use tracing::debug;

/// Default allow-list used to classify an article as AI-relevant.
const AI_KEYWORDS: &[&str] = &[
    "ai",
    "artificial intelligence",
    "machine learning",
    "deep learning",
    "neural",
    "llm",
    "large language model",
    "gpt",
    "transformer",
    "openai",
    "anthropic",
    "deepmind",
    "generative",
    "foundation model",
];

/// Keyword relevance classifier. Pure: same input always yields the same
/// boolean, and a non-match is a normal `false`, not an error.
#[derive(Debug, Clone)]
pub struct ContentFilter {
    keywords: Vec<String>,
}

impl ContentFilter {
    pub fn new() -> Self {
        Self::with_keywords(AI_KEYWORDS.iter().map(|k| k.to_string()).collect())
    }

    pub fn with_keywords(keywords: Vec<String>) -> Self {
        Self {
            keywords: keywords.into_iter().map(|k| k.to_lowercase()).collect(),
        }
    }

    /// Case-insensitive substring match against title + body.
    pub fn is_relevant(&self, article: &Article) -> bool {
        let haystack = format!("{} {}", article.title, article.raw_text).to_lowercase();
        self.keywords.iter().any(|k| haystack.contains(k.as_str()))
    }

    /// Drop irrelevant articles, preserving order.
    pub fn retain_relevant(&self, articles: Vec<Article>) -> Vec<Article> {
        let before = articles.len();
        let kept: Vec<Article> = articles.into_iter().filter(|a| self.is_relevant(a)).collect();
        if kept.len() < before {
            debug!("Filter dropped {} of {} articles", before - kept.len(), before);
        }
        kept
    }
}

impl Default for ContentFilter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Article;

    fn article(title: &str, body: &str) -> Article {
        Article::new(title.to_string(), "https://example.com/a".to_string(), "test".to_string())
            .with_raw_text(body.to_string())
    }

    #[test]
    fn matches_keyword_in_title() {
        let filter = ContentFilter::new();
        assert!(filter.is_relevant(&article("New LLM beats benchmarks", "")));
    }

    #[test]
    fn matches_keyword_in_body_case_insensitive() {
        let filter = ContentFilter::new();
        assert!(filter.is_relevant(&article("Quarterly report", "Heavy Machine Learning use")));
    }

    #[test]
    fn excludes_items_without_any_keyword() {
        let filter = ContentFilter::new();
        let item = article("Football championship results", "Local team wins big game");
        assert!(!filter.is_relevant(&item));
        // Pure: asking again yields the same answer.
        assert!(!filter.is_relevant(&item));
    }

    #[test]
    fn retain_relevant_preserves_order() {
        let filter = ContentFilter::new();
        let kept = filter.retain_relevant(vec![
            article("AI breakthrough", ""),
            article("Gardening tips", ""),
            article("Neural architecture search", ""),
        ]);
        let titles: Vec<&str> = kept.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["AI breakthrough", "Neural architecture search"]);
    }
}
