use crate::config::SourceDescriptor;
use crate::fetcher::Fetcher;
use crate::sources::SourceAdapter;
use crate::types::{Article, Result};
use crate::utils::truncate_chars;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::debug;

/// Wire shape of the Algolia Hacker News search endpoint. Only the fields
/// we consume are declared.
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    hits: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    title: Option<String>,
    url: Option<String>,
    #[serde(rename = "objectID")]
    object_id: Option<String>,
    created_at: Option<DateTime<Utc>>,
    comment_text: Option<String>,
}

/// JSON API adapter for the Hacker News Algolia search contract.
pub struct HackerNewsAdapter;

impl HackerNewsAdapter {
    pub fn new() -> Self {
        Self
    }

    /// Parse an Algolia search response. Hits without a title are dropped;
    /// hits without an external URL fall back to the HN item page.
    pub fn parse(&self, body: &str, descriptor: &SourceDescriptor) -> Result<Vec<Article>> {
        let response: SearchResponse = serde_json::from_str(body)?;

        let mut articles = Vec::new();
        for hit in response.hits.into_iter() {
            let title = match hit.title {
                Some(t) if !t.is_empty() => t,
                _ => {
                    debug!("Skipping HN hit without title");
                    continue;
                }
            };

            let url = match (hit.url, &hit.object_id) {
                (Some(u), _) if !u.is_empty() => u,
                (_, Some(id)) => format!("https://news.ycombinator.com/item?id={}", id),
                _ => continue,
            };

            let raw_text = hit
                .comment_text
                .map(|t| truncate_chars(&t, 200))
                .unwrap_or_default();

            articles.push(
                Article::new(title, url, descriptor.name.clone())
                    .with_published_at(hit.created_at)
                    .with_raw_text(raw_text),
            );

            if articles.len() >= descriptor.limit {
                break;
            }
        }

        Ok(articles)
    }
}

#[async_trait]
impl SourceAdapter for HackerNewsAdapter {
    async fn fetch(
        &self,
        fetcher: &Fetcher,
        descriptor: &SourceDescriptor,
    ) -> Result<Vec<Article>> {
        let body = fetcher.get_text(&descriptor.url).await?;
        self.parse(&body, descriptor)
    }
}

impl Default for HackerNewsAdapter {
    fn default() -> Self {
        Self::new()
    }
}
