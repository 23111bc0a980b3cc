use crate::config::{SourceDescriptor, SourceKind};
use crate::fetcher::Fetcher;
use crate::filter::ContentFilter;
use crate::types::{AgentError, Article, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use tracing::debug;

pub mod feed;
pub mod hackernews;
pub mod scrape;

pub use feed::FeedAdapter;
pub use hackernews::HackerNewsAdapter;
pub use scrape::ScrapeAdapter;

/// Per-kind fetch capability: turn a source descriptor into candidate
/// articles. Items without a resolvable link must be dropped by the adapter.
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    async fn fetch(&self, fetcher: &Fetcher, descriptor: &SourceDescriptor)
        -> Result<Vec<Article>>;
}

/// Maps a source-kind tag to its adapter. Adding a source kind means
/// registering an adapter here, not branching in the fetch stage.
pub struct SourceRegistry {
    adapters: HashMap<SourceKind, Box<dyn SourceAdapter>>,
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self {
            adapters: HashMap::new(),
        }
    }

    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(SourceKind::Feed, Box::new(FeedAdapter::new()));
        registry.register(SourceKind::JsonApi, Box::new(HackerNewsAdapter::new()));
        registry.register(SourceKind::Scrape, Box::new(ScrapeAdapter::new()));
        registry
    }

    pub fn register(&mut self, kind: SourceKind, adapter: Box<dyn SourceAdapter>) {
        self.adapters.insert(kind, adapter);
    }

    /// Fetch one source. Applies the descriptor's keyword pre-filter, so a
    /// broad vendor blog only contributes its on-topic posts.
    pub async fn fetch_source(
        &self,
        fetcher: &Fetcher,
        descriptor: &SourceDescriptor,
    ) -> Result<Vec<Article>> {
        let adapter = self.adapters.get(&descriptor.kind).ok_or_else(|| {
            AgentError::Feed(format!("no adapter registered for {:?}", descriptor.kind))
        })?;

        let mut articles = adapter.fetch(fetcher, descriptor).await?;

        if !descriptor.require_keywords.is_empty() {
            let pre_filter = ContentFilter::with_keywords(descriptor.require_keywords.clone());
            articles = pre_filter.retain_relevant(articles);
        }

        debug!("Source '{}' yielded {} articles", descriptor.name, articles.len());
        Ok(articles)
    }
}

impl Default for SourceRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
