use crate::config::LlmConfig;
use crate::llm::CompletionClient;
use crate::types::{Article, PipelineFailure};
use crate::utils::{smart_truncate, truncate_chars};
use backoff::backoff::Backoff;
use backoff::ExponentialBackoff;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tracing::{debug, warn};

const SYSTEM_PROMPT: &str = "You are an expert AI researcher and technology analyst. \
    Provide clear, concise summaries of AI news articles.";

/// Per-item summarization with bounded concurrency, retry with exponential
/// backoff, and a deterministic fallback. A missing summary never aborts
/// the run.
pub struct Summarizer {
    client: Option<Arc<dyn CompletionClient>>,
    config: LlmConfig,
}

impl Summarizer {
    pub fn new(client: Option<Arc<dyn CompletionClient>>, config: LlmConfig) -> Self {
        Self { client, config }
    }

    /// Summarize every article, preserving input order. Failures are
    /// returned alongside, one per item that fell back.
    pub async fn summarize_all(
        &self,
        articles: Vec<Article>,
    ) -> (Vec<Article>, Vec<PipelineFailure>) {
        let concurrency = self.config.max_concurrent_summaries.max(1);

        let results: Vec<(Article, Option<PipelineFailure>)> = stream::iter(articles)
            .map(|article| self.summarize_one(article))
            .buffered(concurrency)
            .collect()
            .await;

        let mut summarized = Vec::with_capacity(results.len());
        let mut failures = Vec::new();
        for (article, failure) in results {
            if let Some(f) = failure {
                failures.push(f);
            }
            summarized.push(article);
        }
        (summarized, failures)
    }

    async fn summarize_one(&self, mut article: Article) -> (Article, Option<PipelineFailure>) {
        let client = match &self.client {
            Some(client) => client,
            None => {
                article.summary = Some(fallback_summary(&article));
                return (article, None);
            }
        };

        let prompt = self.build_prompt(&article);

        let mut backoff = ExponentialBackoff {
            current_interval: self.config.retry_initial_delay,
            initial_interval: self.config.retry_initial_delay,
            max_interval: self.config.retry_initial_delay * 8,
            multiplier: 2.0,
            max_elapsed_time: None,
            ..Default::default()
        };

        let mut last_error = String::new();
        for attempt in 0..=self.config.max_retries {
            tokio::time::sleep(self.config.inter_call_delay).await;

            match client
                .complete(SYSTEM_PROMPT, &prompt, self.config.summary_max_tokens)
                .await
            {
                Ok(summary) if !summary.is_empty() => {
                    debug!("Summarized '{}'", truncate_chars(&article.title, 50));
                    article.summary = Some(summary);
                    return (article, None);
                }
                Ok(_) => {
                    last_error = "empty completion".to_string();
                }
                Err(e) => {
                    last_error = e.to_string();
                }
            }

            if attempt < self.config.max_retries {
                if let Some(delay) = backoff.next_backoff() {
                    warn!(
                        "Summarization attempt {} failed for '{}', retrying in {:?}: {}",
                        attempt + 1,
                        truncate_chars(&article.title, 50),
                        delay,
                        last_error
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }

        warn!(
            "Summarization exhausted retries for '{}', using fallback",
            truncate_chars(&article.title, 50)
        );
        let failure = PipelineFailure::SummarizationFailed {
            title: article.title.clone(),
            reason: last_error,
        };
        article.summary = Some(fallback_summary(&article));
        (article, Some(failure))
    }

    fn build_prompt(&self, article: &Article) -> String {
        let content = if article.raw_text.is_empty() {
            &article.title
        } else {
            &article.raw_text
        };
        format!(
            "Please provide a concise 2-3 sentence summary of this AI-related article. \
             Focus on the key technical developments, business implications, or research breakthroughs.\n\n\
             Title: {}\n\
             Source: {}\n\
             Content: {}\n\n\
             Summary:",
            article.title,
            article.source,
            truncate_chars(content, self.config.max_input_chars)
        )
    }
}

/// Deterministic substitute used when the LLM call fails or no client is
/// configured: the truncated body, or the bare title when there is none.
fn fallback_summary(article: &Article) -> String {
    if article.raw_text.is_empty() {
        article.title.clone()
    } else {
        smart_truncate(&article.raw_text, 300)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AgentError, Result};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn article(title: &str, body: &str) -> Article {
        Article::new(title.to_string(), format!("https://e.example/{}", title), "t".to_string())
            .with_raw_text(body.to_string())
    }

    fn fast_config() -> LlmConfig {
        LlmConfig {
            inter_call_delay: std::time::Duration::from_millis(0),
            retry_initial_delay: std::time::Duration::from_millis(1),
            max_retries: 1,
            ..LlmConfig::default()
        }
    }

    struct FixedClient(String);

    #[async_trait]
    impl CompletionClient for FixedClient {
        async fn complete(&self, _system: &str, _user: &str, _max_tokens: u32) -> Result<String> {
            Ok(self.0.clone())
        }
    }

    struct FailingClient {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl CompletionClient for FailingClient {
        async fn complete(&self, _system: &str, _user: &str, _max_tokens: u32) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(AgentError::Llm("quota exceeded".to_string()))
        }
    }

    #[tokio::test]
    async fn summaries_are_written_once_per_item() {
        let summarizer = Summarizer::new(
            Some(Arc::new(FixedClient("A tidy summary.".to_string()))),
            fast_config(),
        );
        let (out, failures) = summarizer
            .summarize_all(vec![article("one", "body"), article("two", "body")])
            .await;

        assert!(failures.is_empty());
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|a| a.summary.as_deref() == Some("A tidy summary.")));
        // Order preserved despite concurrent execution.
        assert_eq!(out[0].title, "one");
        assert_eq!(out[1].title, "two");
    }

    #[tokio::test]
    async fn retry_exhaustion_falls_back_and_records_failure() {
        let client = Arc::new(FailingClient {
            calls: AtomicUsize::new(0),
        });
        let summarizer = Summarizer::new(Some(client.clone()), fast_config());

        let (out, failures) = summarizer
            .summarize_all(vec![article("stubborn", "the body text")])
            .await;

        // max_retries = 1 means two attempts total.
        assert_eq!(client.calls.load(Ordering::SeqCst), 2);
        assert_eq!(failures.len(), 1);
        assert_eq!(out[0].summary.as_deref(), Some("the body text"));
    }

    #[tokio::test]
    async fn missing_client_yields_fallback_without_failure_records() {
        let summarizer = Summarizer::new(None, fast_config());
        let (out, failures) = summarizer
            .summarize_all(vec![article("no key", "")])
            .await;

        assert!(failures.is_empty());
        assert_eq!(out[0].summary.as_deref(), Some("no key"));
    }
}
