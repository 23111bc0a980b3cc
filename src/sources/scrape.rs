use crate::config::SourceDescriptor;
use crate::fetcher::Fetcher;
use crate::sources::SourceAdapter;
use crate::types::{Article, Result};
use async_trait::async_trait;
use scraper::{Html, Selector};
use std::collections::HashSet;
use tracing::debug;
use url::Url;

/// Href schemes and nav/boilerplate text that never lead to an article.
const SKIP_HREF: &[&str] = &["#", "javascript:", "mailto:", "tel:"];
const SKIP_TITLE: &[&str] = &["skip", "menu", "navigation", "cookie", "privacy"];

/// Minimum anchor-text length for a link to count as an article headline.
const MIN_TITLE_LEN: usize = 10;

/// HTML adapter for sites without a feed (DeepMind, Anthropic, Mistral).
/// Harvests anchors, filters navigation noise, and absolutizes hrefs
/// against the page URL.
pub struct ScrapeAdapter;

impl ScrapeAdapter {
    pub fn new() -> Self {
        Self
    }

    pub fn parse(&self, body: &str, descriptor: &SourceDescriptor) -> Result<Vec<Article>> {
        let base = Url::parse(&descriptor.url)?;
        let document = Html::parse_document(body);
        let anchors = Selector::parse("a[href]").expect("static selector");

        let mut seen_titles = HashSet::new();
        let mut articles = Vec::new();

        for element in document.select(&anchors) {
            let href = match element.value().attr("href") {
                Some(h) => h,
                None => continue,
            };
            let title = element.text().collect::<String>().trim().to_string();

            if title.len() < MIN_TITLE_LEN {
                continue;
            }
            let href_lower = href.to_lowercase();
            if SKIP_HREF.iter().any(|skip| href_lower.contains(skip)) {
                continue;
            }
            let title_lower = title.to_lowercase();
            if SKIP_TITLE.iter().any(|skip| title_lower.contains(skip)) {
                continue;
            }

            let url = match base.join(href) {
                Ok(joined) => joined.to_string(),
                Err(e) => {
                    debug!("Skipping unjoinable href '{}' on {}: {}", href, descriptor.name, e);
                    continue;
                }
            };

            // The same headline often appears twice on landing pages (card
            // plus "read more" link).
            if !seen_titles.insert(title.clone()) {
                continue;
            }

            // Scraped landing pages carry no body text; the headline is the
            // only summarization input available.
            articles.push(
                Article::new(title.clone(), url, descriptor.name.clone()).with_raw_text(title),
            );

            if articles.len() >= descriptor.limit {
                break;
            }
        }

        Ok(articles)
    }
}

#[async_trait]
impl SourceAdapter for ScrapeAdapter {
    async fn fetch(
        &self,
        fetcher: &Fetcher,
        descriptor: &SourceDescriptor,
    ) -> Result<Vec<Article>> {
        let body = fetcher.get_text(&descriptor.url).await?;
        self.parse(&body, descriptor)
    }
}

impl Default for ScrapeAdapter {
    fn default() -> Self {
        Self::new()
    }
}
