use crate::types::{RankedDigest, Result};
use async_trait::async_trait;
use chrono::Utc;
use std::path::PathBuf;
use tracing::info;

/// Render the digest as markdown, one section per ranked story.
pub fn render_markdown(digest: &RankedDigest) -> String {
    let mut content = format!("# Top AI News - {}\n\n", digest.date);
    content.push_str(&format!(
        "Generated on: {}\n\n",
        digest.generated_at.format("%Y-%m-%d %H:%M:%S")
    ));
    content.push_str(&format!(
        "## Top {} AI Updates of the Day\n\n",
        digest.len()
    ));

    for entry in &digest.entries {
        let article = &entry.article;
        content.push_str(&format!("### {}. {}\n\n", entry.position, article.title));
        content.push_str(&format!("**Source:** {}\n\n", article.source));
        content.push_str(&format!("**Summary:** {}\n\n", article.summary_or_fallback()));
        content.push_str(&format!("**Link:** {}\n\n", article.url));
        content.push_str("---\n\n");
    }

    content
}

/// Delivery seam for the rendered digest. Notion, email and push delivery
/// would implement this same trait; only file and stdout ship here.
#[async_trait]
pub trait Sink: Send + Sync {
    async fn publish(&self, digest: &RankedDigest, content: &str) -> Result<()>;
}

pub struct FileSink {
    output_dir: PathBuf,
}

impl FileSink {
    pub fn new(output_dir: PathBuf) -> Self {
        Self { output_dir }
    }
}

#[async_trait]
impl Sink for FileSink {
    async fn publish(&self, digest: &RankedDigest, content: &str) -> Result<()> {
        let path = self
            .output_dir
            .join(format!("top_ai_news_{}.md", digest.date));
        tokio::fs::write(&path, content).await?;
        info!("Digest written to {}", path.display());
        Ok(())
    }
}

pub struct StdoutSink;

#[async_trait]
impl Sink for StdoutSink {
    async fn publish(&self, _digest: &RankedDigest, content: &str) -> Result<()> {
        println!("{}", content);
        Ok(())
    }
}

/// Default digest date when the caller does not pass one.
pub fn today() -> chrono::NaiveDate {
    Utc::now().date_naive()
}
