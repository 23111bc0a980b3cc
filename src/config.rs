use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Parse strategy tag for a source. Adapters register against these in the
/// source registry; adding a source kind means adding an adapter, not a
/// branch in the fetch stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceKind {
    /// RSS or Atom feed, parsed with feed-rs.
    Feed,
    /// JSON listing endpoint (Hacker News Algolia search contract).
    JsonApi,
    /// HTML page without a feed; articles harvested from anchors.
    Scrape,
}

/// Static per-source configuration, loaded once at process start.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceDescriptor {
    pub name: String,
    pub url: String,
    pub kind: SourceKind,
    /// Cap on items taken from this source per run.
    pub limit: usize,
    /// Extra pre-filter for broad sources (e.g. a vendor blog that covers
    /// more than AI). Empty means no pre-filter.
    pub require_keywords: Vec<String>,
}

impl SourceDescriptor {
    pub fn new(name: &str, url: &str, kind: SourceKind, limit: usize) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
            kind,
            limit,
            require_keywords: Vec::new(),
        }
    }

    pub fn with_require_keywords(mut self, keywords: &[&str]) -> Self {
        self.require_keywords = keywords.iter().map(|k| k.to_string()).collect();
        self
    }
}

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub user_agent: String,
    pub timeout_seconds: u64,
    pub max_response_size_mb: usize,
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "ai-news-digest/0.1".to_string(),
            timeout_seconds: 30,
            max_response_size_mb: 10,
            max_redirects: 5,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Absent key puts the pipeline in degraded mode: fallback summaries and
    /// heuristic ranking, never a crash.
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub request_timeout: Duration,
    pub max_retries: u32,
    pub retry_initial_delay: Duration,
    /// Pause before each completion call, to stay under provider rate limits.
    pub inter_call_delay: Duration,
    /// Input truncation bound, in characters, applied to article bodies.
    pub max_input_chars: usize,
    pub summary_max_tokens: u32,
    pub ranking_max_tokens: u32,
    pub max_concurrent_summaries: usize,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openai.com/v1/chat/completions".to_string(),
            model: "gpt-4o-mini".to_string(),
            request_timeout: Duration::from_secs(30),
            max_retries: 2,
            retry_initial_delay: Duration::from_millis(500),
            inter_call_delay: Duration::from_millis(1000),
            max_input_chars: 1000,
            summary_max_tokens: 60,
            ranking_max_tokens: 50,
            max_concurrent_summaries: 3,
        }
    }
}

/// Immutable run configuration, constructed once in main and passed
/// explicitly into the pipeline. Nothing in the pipeline reads ambient
/// environment state.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    pub sources: Vec<SourceDescriptor>,
    pub fetch: FetchConfig,
    pub llm: LlmConfig,
    pub top_n: usize,
    pub max_concurrent_fetches: usize,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            sources: default_sources(),
            fetch: FetchConfig::default(),
            llm: LlmConfig::default(),
            top_n: 10,
            max_concurrent_fetches: 4,
        }
    }
}

impl AgentConfig {
    /// Build the default configuration, picking up LLM credentials from the
    /// environment (`.env` is loaded by the binary before this runs).
    pub fn from_env() -> Self {
        let mut config = Self::default();

        config.llm.api_key = env::var("OPENAI_API_KEY").ok().filter(|k| !k.is_empty());
        if let Ok(base_url) = env::var("OPENAI_BASE_URL") {
            config.llm.base_url = base_url;
        }
        if let Ok(model) = env::var("OPENAI_MODEL") {
            config.llm.model = model;
        }

        config
    }
}

/// The production source catalog. Limits are deliberately small per source;
/// quality over volume keeps the summarization bill bounded.
pub fn default_sources() -> Vec<SourceDescriptor> {
    vec![
        SourceDescriptor::new(
            "arXiv cs.AI",
            "http://export.arxiv.org/rss/cs.AI",
            SourceKind::Feed,
            3,
        ),
        SourceDescriptor::new(
            "arXiv cs.LG",
            "http://export.arxiv.org/rss/cs.LG",
            SourceKind::Feed,
            3,
        ),
        SourceDescriptor::new(
            "Hacker News",
            "https://hn.algolia.com/api/v1/search?query=AI%20OR%20artificial%20intelligence%20OR%20machine%20learning&tags=story&hitsPerPage=5",
            SourceKind::JsonApi,
            5,
        ),
        SourceDescriptor::new(
            "TechCrunch AI",
            "https://techcrunch.com/tag/artificial-intelligence/feed/",
            SourceKind::Feed,
            5,
        ),
        SourceDescriptor::new(
            "NVIDIA Blog",
            "https://blogs.nvidia.com/feed/",
            SourceKind::Feed,
            5,
        )
        .with_require_keywords(&[
            "AI",
            "artificial intelligence",
            "machine learning",
            "GPU",
            "deep learning",
        ]),
        SourceDescriptor::new(
            "Hugging Face",
            "https://huggingface.co/blog/feed.xml",
            SourceKind::Feed,
            5,
        ),
        SourceDescriptor::new(
            "OpenAI Blog",
            "https://openai.com/blog/rss.xml",
            SourceKind::Feed,
            5,
        ),
        SourceDescriptor::new(
            "DeepMind",
            "https://deepmind.google/discover/blog/",
            SourceKind::Scrape,
            5,
        ),
        SourceDescriptor::new(
            "Anthropic",
            "https://www.anthropic.com/news",
            SourceKind::Scrape,
            5,
        ),
        SourceDescriptor::new(
            "Mistral AI",
            "https://mistral.ai/news/",
            SourceKind::Scrape,
            5,
        ),
        SourceDescriptor::new(
            "AI News",
            "https://artificialintelligence-news.com/feed/",
            SourceKind::Feed,
            5,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_sources_cover_all_kinds() {
        let sources = default_sources();
        assert!(sources.iter().any(|s| s.kind == SourceKind::Feed));
        assert!(sources.iter().any(|s| s.kind == SourceKind::JsonApi));
        assert!(sources.iter().any(|s| s.kind == SourceKind::Scrape));
    }

    #[test]
    fn default_top_n_is_ten() {
        assert_eq!(AgentConfig::default().top_n, 10);
    }
}
