use crate::config::AgentConfig;
use crate::dedup::dedup;
use crate::fetcher::Fetcher;
use crate::filter::ContentFilter;
use crate::llm::{CompletionClient, OpenAiClient};
use crate::ranker::Ranker;
use crate::sources::SourceRegistry;
use crate::summarizer::Summarizer;
use crate::types::{Article, PipelineFailure, RankedDigest, Result};
use chrono::NaiveDate;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Outcome of one run: the (possibly empty) digest plus every recoverable
/// failure collected along the way. An empty digest means "nothing to
/// publish today", not an error.
#[derive(Debug)]
pub struct DigestRun {
    pub digest: RankedDigest,
    pub failures: Vec<PipelineFailure>,
}

/// Sequences Fetch → Filter → Dedup → Summarize → Rank, strictly forward,
/// one pass per run. Contract: `run` never fails; every recoverable error
/// degrades to a smaller or fallback result set.
pub struct DigestPipeline {
    config: AgentConfig,
    registry: SourceRegistry,
    client: Option<Arc<dyn CompletionClient>>,
}

impl DigestPipeline {
    /// Standard wiring: default adapters, OpenAI-compatible client when a
    /// key is configured, degraded mode otherwise.
    pub fn new(config: AgentConfig) -> Result<Self> {
        let client: Option<Arc<dyn CompletionClient>> = if config.llm.api_key.is_some() {
            Some(Arc::new(OpenAiClient::from_config(&config.llm)?))
        } else {
            None
        };

        Ok(Self {
            config,
            registry: SourceRegistry::with_defaults(),
            client,
        })
    }

    /// Test seam: explicit registry and completion client.
    pub fn with_components(
        config: AgentConfig,
        registry: SourceRegistry,
        client: Option<Arc<dyn CompletionClient>>,
    ) -> Self {
        Self {
            config,
            registry,
            client,
        }
    }

    pub async fn run(&self, date: NaiveDate) -> DigestRun {
        let mut failures = Vec::new();

        if self.client.is_none() {
            warn!("No LLM credential configured; running with fallback summaries and ranking");
            failures.push(PipelineFailure::ConfigurationMissing {
                what: "OPENAI_API_KEY".to_string(),
            });
        }

        let candidates = self.fetch_all(&mut failures).await;
        info!("Fetched {} candidate articles", candidates.len());

        let relevant = ContentFilter::new().retain_relevant(candidates);
        info!("{} articles after relevance filter", relevant.len());

        let unique = dedup(relevant);
        info!("{} articles after dedup", unique.len());

        let summarizer = Summarizer::new(self.client.clone(), self.config.llm.clone());
        let (summarized, summary_failures) = summarizer.summarize_all(unique).await;
        failures.extend(summary_failures);

        let ranker = Ranker::new(self.client.clone(), self.config.llm.clone());
        let (ordered, ranking_failures) = ranker.rank(summarized, self.config.top_n).await;
        failures.extend(ranking_failures);

        let digest = RankedDigest::from_ordered(date, ordered);
        info!(
            "Run done: {} entries, {} recoverable failures",
            digest.len(),
            failures.len()
        );

        DigestRun { digest, failures }
    }

    /// Gather every source with bounded concurrency. Source order is
    /// preserved so first-seen dedup stays deterministic; a failed source
    /// contributes zero items and one failure record.
    async fn fetch_all(&self, failures: &mut Vec<PipelineFailure>) -> Vec<Article> {
        let fetcher = match Fetcher::new(self.config.fetch.clone()) {
            Ok(fetcher) => fetcher,
            Err(e) => {
                error!("Could not build HTTP client: {}", e);
                failures.push(PipelineFailure::ConfigurationMissing {
                    what: format!("HTTP client: {}", e),
                });
                return Vec::new();
            }
        };

        let concurrency = self.config.max_concurrent_fetches.max(1);
        let outcomes: Vec<(String, Result<Vec<Article>>)> = stream::iter(&self.config.sources)
            .map(|descriptor| {
                let fetcher = &fetcher;
                async move {
                    let outcome = self.registry.fetch_source(fetcher, descriptor).await;
                    (descriptor.name.clone(), outcome)
                }
            })
            .buffered(concurrency)
            .collect()
            .await;

        let mut articles = Vec::new();
        for (source, outcome) in outcomes {
            match outcome {
                Ok(items) => {
                    info!("Source '{}' contributed {} articles", source, items.len());
                    articles.extend(items);
                }
                Err(e) => {
                    error!("Source '{}' failed: {}", source, e);
                    failures.push(PipelineFailure::SourceUnavailable {
                        source,
                        reason: e.to_string(),
                    });
                }
            }
        }
        articles
    }
}
