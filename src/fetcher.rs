use crate::config::FetchConfig;
use crate::types::{AgentError, Result};
use reqwest::Client;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::debug;
use url::Url;

/// Bounded-timeout HTTP fetcher shared by all source adapters.
///
/// One attempt per call: a source that fails is recorded by the pipeline and
/// contributes zero items for the run. Retrying belongs to the LLM-facing
/// layers where the cost tradeoff justifies it.
pub struct Fetcher {
    client: Client,
    config: FetchConfig,
    rate_limiter: Arc<RwLock<HashMap<String, Instant>>>,
}

impl Fetcher {
    pub fn new(config: FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .gzip(true)
            .deflate(true)
            .brotli(true)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .build()?;

        Ok(Self {
            client,
            config,
            rate_limiter: Arc::new(RwLock::new(HashMap::new())),
        })
    }

    /// Fetch a URL as text. Non-2xx statuses and oversized bodies are errors;
    /// the caller decides whether they are fatal (they never are for a run).
    pub async fn get_text(&self, url: &str) -> Result<String> {
        self.apply_rate_limit(url).await?;

        debug!("Fetching {}", url);
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AgentError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        if let Some(content_length) = response.content_length() {
            let size_mb = content_length as usize / (1024 * 1024);
            if size_mb > self.config.max_response_size_mb {
                return Err(AgentError::ResponseTooLarge { size_mb });
            }
        }

        let body = response.text().await?;
        debug!("Fetched {} ({} bytes)", url, body.len());
        Ok(body)
    }

    /// Minimum 1s between requests to the same host.
    async fn apply_rate_limit(&self, url: &str) -> Result<()> {
        let parsed = Url::parse(url)?;
        let host = parsed.host_str().unwrap_or("").to_string();

        let min_interval = Duration::from_secs(1);
        let wait = {
            let mut rate_limiter = self.rate_limiter.write().await;
            let now = Instant::now();
            let wait = rate_limiter.get(&host).and_then(|last| {
                let elapsed = now.duration_since(*last);
                (elapsed < min_interval).then(|| min_interval - elapsed)
            });
            rate_limiter.insert(host.clone(), now);
            wait
        };

        if let Some(wait_time) = wait {
            debug!("Rate limiting {}: waiting {:?}", host, wait_time);
            tokio::time::sleep(wait_time).await;
        }

        Ok(())
    }
}
