pub mod config;
pub mod dedup;
pub mod fetcher;
pub mod filter;
pub mod llm;
pub mod output;
pub mod pipeline;
pub mod ranker;
pub mod sources;
pub mod summarizer;
pub mod types;
pub mod utils;

pub use config::{AgentConfig, FetchConfig, LlmConfig, SourceDescriptor, SourceKind};
pub use fetcher::Fetcher;
pub use filter::ContentFilter;
pub use llm::{CompletionClient, OpenAiClient};
pub use output::{render_markdown, FileSink, Sink, StdoutSink};
pub use pipeline::{DigestPipeline, DigestRun};
pub use ranker::Ranker;
pub use sources::{SourceAdapter, SourceRegistry};
pub use summarizer::Summarizer;
pub use types::{AgentError, Article, DigestEntry, PipelineFailure, RankedDigest, Result};
