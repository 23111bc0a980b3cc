use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One discovered article, before filtering and dedup.
///
/// `url` is the identity key for deduplication. `summary` starts empty and
/// is written exactly once by the summarizer stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    pub id: Uuid,
    pub title: String,
    pub url: String,
    pub source: String,
    pub published_at: Option<DateTime<Utc>>,
    pub fetched_at: DateTime<Utc>,
    pub raw_text: String,
    pub summary: Option<String>,
}

impl Article {
    pub fn new(title: String, url: String, source: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            url,
            source,
            published_at: None,
            fetched_at: Utc::now(),
            raw_text: String::new(),
            summary: None,
        }
    }

    pub fn with_published_at(mut self, published_at: Option<DateTime<Utc>>) -> Self {
        self.published_at = published_at;
        self
    }

    pub fn with_raw_text(mut self, raw_text: String) -> Self {
        self.raw_text = raw_text;
        self
    }

    /// Summary if present, else the deterministic fallback text used when
    /// the LLM is unavailable.
    pub fn summary_or_fallback(&self) -> &str {
        match &self.summary {
            Some(s) => s,
            None => {
                if self.raw_text.is_empty() {
                    &self.title
                } else {
                    &self.raw_text
                }
            }
        }
    }
}

/// One entry of the final digest: an article plus its 1-based rank position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DigestEntry {
    pub position: usize,
    pub article: Article,
}

/// The final ordered result of a run.
///
/// Positions are contiguous starting at 1 and entries are unique by URL;
/// both are enforced by `from_ordered`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedDigest {
    pub date: NaiveDate,
    pub generated_at: DateTime<Utc>,
    pub entries: Vec<DigestEntry>,
}

impl RankedDigest {
    /// Build a digest from an already-ordered article list, assigning
    /// positions 1..=len. Later duplicates by URL are dropped.
    pub fn from_ordered(date: NaiveDate, articles: Vec<Article>) -> Self {
        let mut seen_urls = std::collections::HashSet::new();
        let entries = articles
            .into_iter()
            .filter(|a| seen_urls.insert(a.url.clone()))
            .enumerate()
            .map(|(i, article)| DigestEntry {
                position: i + 1,
                article,
            })
            .collect();

        Self {
            date,
            generated_at: Utc::now(),
            entries,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Recoverable failures accumulated during a run. None of these aborts the
/// pipeline; the caller gets the full list alongside the digest.
#[derive(Debug, Clone)]
pub enum PipelineFailure {
    SourceUnavailable { source: String, reason: String },

    SummarizationFailed { title: String, reason: String },

    RankingMalformed { reason: String },

    ConfigurationMissing { what: String },
}

// Manual impls instead of `thiserror::Error`: thiserror would treat the
// `source` field of `SourceUnavailable` as the error cause, and `String`
// does not implement `std::error::Error`.
impl std::fmt::Display for PipelineFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SourceUnavailable { source, reason } => {
                write!(f, "source '{source}' unavailable: {reason}")
            }
            Self::SummarizationFailed { title, reason } => {
                write!(f, "summarization failed for '{title}': {reason}")
            }
            Self::RankingMalformed { reason } => {
                write!(f, "ranking response malformed: {reason}")
            }
            Self::ConfigurationMissing { what } => {
                write!(f, "configuration missing: {what}")
            }
        }
    }
}

impl std::error::Error for PipelineFailure {}

#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    #[error("Feed parse error: {0}")]
    Feed(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Response exceeds size limit: {size_mb}MB")]
    ResponseTooLarge { size_mb: usize },

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Missing credential: {0}")]
    MissingCredential(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AgentError>;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn article(title: &str, url: &str) -> Article {
        Article::new(title.to_string(), url.to_string(), "test".to_string())
    }

    #[test]
    fn digest_positions_are_contiguous_from_one() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let digest = RankedDigest::from_ordered(
            date,
            vec![
                article("a", "https://a.example/1"),
                article("b", "https://b.example/2"),
                article("c", "https://c.example/3"),
            ],
        );

        let positions: Vec<usize> = digest.entries.iter().map(|e| e.position).collect();
        assert_eq!(positions, vec![1, 2, 3]);
    }

    #[test]
    fn digest_drops_duplicate_urls() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let digest = RankedDigest::from_ordered(
            date,
            vec![
                article("a", "https://a.example/1"),
                article("a again", "https://a.example/1"),
            ],
        );

        assert_eq!(digest.len(), 1);
        assert_eq!(digest.entries[0].article.title, "a");
    }

    #[test]
    fn fallback_summary_prefers_raw_text() {
        let a = article("title only", "https://a.example/1");
        assert_eq!(a.summary_or_fallback(), "title only");

        let b = article("t", "https://a.example/2").with_raw_text("body text".to_string());
        assert_eq!(b.summary_or_fallback(), "body text");
    }
}
