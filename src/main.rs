use ai_news_digest::output::{render_markdown, today, FileSink, Sink, StdoutSink};
use ai_news_digest::{AgentConfig, DigestPipeline};
use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputKind {
    File,
    Stdout,
}

/// Daily AI news aggregator: fetch, filter, dedup, summarize, rank, publish.
#[derive(Debug, Parser)]
#[command(name = "ai-news-digest")]
struct Args {
    /// Target date in YYYY-MM-DD format (default: today)
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Number of stories in the digest
    #[arg(long, default_value_t = 10)]
    top_n: usize,

    /// Where to publish the rendered digest
    #[arg(long, value_enum, default_value = "file")]
    output: OutputKind,

    /// Directory for file output
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let filter = if args.debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut config = AgentConfig::from_env();
    config.top_n = args.top_n;

    let date = args.date.unwrap_or_else(today);
    info!("Starting AI news digest run for {}", date);

    let pipeline = DigestPipeline::new(config).context("failed to build pipeline")?;
    let run = pipeline.run(date).await;

    for failure in &run.failures {
        warn!("Recoverable failure: {}", failure);
    }

    if run.digest.is_empty() {
        info!("No stories survived the pipeline; nothing to publish today");
        return Ok(());
    }

    let content = render_markdown(&run.digest);
    let sink: Box<dyn Sink> = match args.output {
        OutputKind::File => Box::new(FileSink::new(args.output_dir)),
        OutputKind::Stdout => Box::new(StdoutSink),
    };
    sink.publish(&run.digest, &content)
        .await
        .context("failed to publish digest")?;

    info!("Published {} stories", run.digest.len());
    Ok(())
}
