use crate::config::SourceDescriptor;
use crate::fetcher::Fetcher;
use crate::sources::SourceAdapter;
use crate::types::{AgentError, Article, Result};
use async_trait::async_trait;
use chrono::Utc;
use feed_rs::parser;
use tracing::debug;

/// RSS/Atom adapter built on feed-rs. Covers the syndication sources
/// (arXiv, TechCrunch, vendor blogs, AI News).
pub struct FeedAdapter;

impl FeedAdapter {
    pub fn new() -> Self {
        Self
    }

    /// Parse raw feed bytes into articles. Entries without a link are
    /// dropped; the per-source limit is applied in feed order.
    pub fn parse(&self, body: &str, descriptor: &SourceDescriptor) -> Result<Vec<Article>> {
        let feed = parser::parse(body.as_bytes())
            .map_err(|e| AgentError::Feed(format!("failed to parse feed: {}", e)))?;

        let mut articles = Vec::new();
        for entry in feed.entries.into_iter() {
            let url = match entry.links.first() {
                Some(link) => link.href.clone(),
                None => {
                    debug!("Skipping feed entry without link in '{}'", descriptor.name);
                    continue;
                }
            };

            let title = entry
                .title
                .map(|t| t.content)
                .unwrap_or_else(|| "Untitled".to_string());

            // Prefer full content, fall back to the summary/abstract.
            let raw_text = entry
                .content
                .and_then(|c| c.body)
                .or_else(|| entry.summary.map(|s| s.content))
                .unwrap_or_default();

            let published_at = entry
                .published
                .or(entry.updated)
                .map(|dt| dt.with_timezone(&Utc));

            articles.push(
                Article::new(title, url, descriptor.name.clone())
                    .with_published_at(published_at)
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
impl SourceAdapter for FeedAdapter {
    async fn fetch(
        &self,
        fetcher: &Fetcher,
        descriptor: &SourceDescriptor,
    ) -> Result<Vec<Article>> {
        let body = fetcher.get_text(&descriptor.url).await?;
        self.parse(&body, descriptor)
    }
}

impl Default for FeedAdapter {
    fn default() -> Self {
        Self::new()
    }
}
