use crate::config::LlmConfig;
use crate::llm::CompletionClient;
use crate::types::{Article, PipelineFailure};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, warn};

const SYSTEM_PROMPT: &str = "You are an expert AI analyst. Select the most important AI news \
    stories based on technical significance, business impact, and research value.";

/// Single-shot importance ranking over the full summarized set. A malformed
/// response degrades to a deterministic recency ranking; the run always
/// produces a result.
pub struct Ranker {
    client: Option<Arc<dyn CompletionClient>>,
    config: LlmConfig,
}

impl Ranker {
    pub fn new(client: Option<Arc<dyn CompletionClient>>, config: LlmConfig) -> Self {
        Self { client, config }
    }

    /// Order the candidates and keep the `top_n` most important.
    pub async fn rank(
        &self,
        articles: Vec<Article>,
        top_n: usize,
    ) -> (Vec<Article>, Vec<PipelineFailure>) {
        if articles.is_empty() {
            return (articles, Vec::new());
        }

        let client = match &self.client {
            Some(client) => client,
            None => return (fallback_ranking(articles, top_n), Vec::new()),
        };

        let prompt = build_prompt(&articles, top_n);
        let response = match client
            .complete(SYSTEM_PROMPT, &prompt, self.config.ranking_max_tokens)
            .await
        {
            Ok(text) => text,
            Err(e) => {
                warn!("Ranking call failed, falling back to recency order: {}", e);
                let failure = PipelineFailure::RankingMalformed {
                    reason: e.to_string(),
                };
                return (fallback_ranking(articles, top_n), vec![failure]);
            }
        };

        match parse_ranking(&response, articles.len(), top_n) {
            Ok(indices) => {
                info!("Ranking selected {} of {} candidates", indices.len(), articles.len());
                let mut slots: Vec<Option<Article>> = articles.into_iter().map(Some).collect();
                let ordered = indices
                    .into_iter()
                    .filter_map(|i| slots[i].take())
                    .collect();
                (ordered, Vec::new())
            }
            Err(reason) => {
                warn!("Ranking response rejected ({}), falling back to recency order", reason);
                let failure = PipelineFailure::RankingMalformed { reason };
                (fallback_ranking(articles, top_n), vec![failure])
            }
        }
    }
}

fn build_prompt(articles: &[Article], top_n: usize) -> String {
    let mut candidates = String::new();
    for (i, article) in articles.iter().enumerate() {
        candidates.push_str(&format!("{}. {}\n", i + 1, article.title));
        candidates.push_str(&format!("   Source: {}\n", article.source));
        candidates.push_str(&format!("   Summary: {}\n\n", article.summary_or_fallback()));
    }

    format!(
        "Here are AI news summaries from today. Choose and rank the {top_n} most important ones \
         for AI researchers, builders, and investors. Consider:\n\
         - Technical significance and innovation\n\
         - Business and market impact\n\
         - Research breakthroughs\n\
         - Industry trends and developments\n\n\
         Return ONLY the numbers of the top {top_n} articles in order of importance \
         (1 being most important):\n\n\
         {candidates}\n\
         Top {top_n} article numbers (comma-separated):"
    )
}

/// Extract 1-based candidate numbers from the response and validate them
/// into 0-based indices: every reference in range, no duplicates, at most
/// `top_n` results. Any violation rejects the whole response.
fn parse_ranking(
    response: &str,
    candidate_count: usize,
    top_n: usize,
) -> std::result::Result<Vec<usize>, String> {
    let numbers: Vec<usize> = response
        .split(|c: char| !c.is_ascii_digit())
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<usize>().map_err(|e| e.to_string()))
        .collect::<std::result::Result<_, _>>()?;

    if numbers.is_empty() {
        return Err("no indices in response".to_string());
    }
    if numbers.len() > top_n {
        return Err(format!("{} indices, expected at most {}", numbers.len(), top_n));
    }

    let mut seen = HashSet::new();
    let mut indices = Vec::with_capacity(numbers.len());
    for number in numbers {
        if number == 0 || number > candidate_count {
            return Err(format!(
                "index {} outside candidate set of {}",
                number, candidate_count
            ));
        }
        if !seen.insert(number) {
            return Err(format!("duplicate index {}", number));
        }
        indices.push(number - 1);
    }

    Ok(indices)
}

/// Deterministic degraded-mode ranking: most recent first, undated items
/// after dated ones, ties stable by fetch order.
fn fallback_ranking(mut articles: Vec<Article>, top_n: usize) -> Vec<Article> {
    articles.sort_by(|a, b| match (a.published_at, b.published_at) {
        (Some(a_ts), Some(b_ts)) => b_ts.cmp(&a_ts),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
    articles.truncate(top_n);
    articles
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn article(title: &str, age_hours: Option<i64>) -> Article {
        Article::new(
            title.to_string(),
            format!("https://e.example/{}", title),
            "t".to_string(),
        )
        .with_published_at(age_hours.map(|h| Utc::now() - Duration::hours(h)))
    }

    #[test]
    fn parse_accepts_comma_separated_numbers() {
        assert_eq!(parse_ranking("3, 1, 2", 5, 3).unwrap(), vec![2, 0, 1]);
    }

    #[test]
    fn parse_accepts_prose_wrapped_numbers() {
        assert_eq!(parse_ranking("Top picks: 2 and 4.", 5, 3).unwrap(), vec![1, 3]);
    }

    #[test]
    fn parse_rejects_out_of_range_index() {
        assert!(parse_ranking("1, 99", 5, 5).is_err());
        assert!(parse_ranking("0, 1", 5, 5).is_err());
    }

    #[test]
    fn parse_rejects_duplicates_and_overflow() {
        assert!(parse_ranking("1, 1", 5, 5).is_err());
        assert!(parse_ranking("1, 2, 3, 4", 5, 3).is_err());
    }

    #[test]
    fn fallback_orders_most_recent_first_undated_last() {
        let ranked = fallback_ranking(
            vec![
                article("old", Some(48)),
                article("undated", None),
                article("fresh", Some(1)),
            ],
            10,
        );
        let titles: Vec<&str> = ranked.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["fresh", "old", "undated"]);
    }

    #[test]
    fn fallback_truncates_to_top_n() {
        let ranked = fallback_ranking(
            (0..12).map(|i| article(&format!("a{}", i), Some(i))).collect(),
            10,
        );
        assert_eq!(ranked.len(), 10);
    }
}
