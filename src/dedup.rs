use crate::types::Article;
use crate::utils::is_stop_word;
use std::collections::HashMap;
use tracing::debug;
use url::Url;

/// Canonical form of a link used as the primary dedup key: lowercased
/// scheme and host, no default port, no query string or fragment, no
/// trailing slash.
pub fn normalize_url(raw: &str) -> String {
    match Url::parse(raw) {
        Ok(url) => {
            let host = url.host_str().unwrap_or("").to_lowercase();
            let path = url.path().trim_end_matches('/');
            match url.port() {
                Some(port) => format!("{}:{}{}", host, port, path),
                None => format!("{}{}", host, path),
            }
        }
        // Unparseable links still dedup against byte-identical copies.
        Err(_) => raw.trim_end_matches('/').to_lowercase(),
    }
}

/// Best-effort secondary key: lowercase title with stopwords and
/// punctuation removed. Exact match only; link identity remains the only
/// guaranteed dedup rule.
pub fn normalize_title(title: &str) -> String {
    title
        .to_lowercase()
        .split_whitespace()
        .map(|word| {
            word.chars()
                .filter(|c| c.is_alphanumeric())
                .collect::<String>()
        })
        .filter(|word| !word.is_empty() && !is_stop_word(word))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Collapse candidates that refer to the same story, keeping the first-seen
/// item for each identity. When a kept item has an empty body and a later
/// duplicate carries one, the body is adopted into the kept slot.
pub fn dedup(articles: Vec<Article>) -> Vec<Article> {
    let before = articles.len();
    let mut kept: Vec<Article> = Vec::with_capacity(before);
    let mut by_url: HashMap<String, usize> = HashMap::new();
    let mut by_title: HashMap<String, usize> = HashMap::new();

    for article in articles {
        let url_key = normalize_url(&article.url);
        let title_key = normalize_title(&article.title);

        let existing = by_url.get(&url_key).copied().or_else(|| {
            if title_key.is_empty() {
                None
            } else {
                by_title.get(&title_key).copied()
            }
        });

        match existing {
            Some(index) => {
                if kept[index].raw_text.is_empty() && !article.raw_text.is_empty() {
                    kept[index].raw_text = article.raw_text;
                }
            }
            None => {
                let index = kept.len();
                by_url.insert(url_key, index);
                if !title_key.is_empty() {
                    by_title.entry(title_key).or_insert(index);
                }
                kept.push(article);
            }
        }
    }

    if kept.len() < before {
        debug!("Dedup removed {} of {} articles", before - kept.len(), before);
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Article;
    use std::collections::HashSet;

    fn article(title: &str, url: &str, body: &str) -> Article {
        Article::new(title.to_string(), url.to_string(), "test".to_string())
            .with_raw_text(body.to_string())
    }

    #[test]
    fn normalize_url_strips_query_fragment_and_trailing_slash() {
        assert_eq!(
            normalize_url("https://Example.com/story/?utm_source=x#frag"),
            "example.com/story"
        );
        assert_eq!(
            normalize_url("http://example.com/story"),
            "example.com/story"
        );
    }

    #[test]
    fn normalize_title_removes_stopwords_and_punctuation() {
        assert_eq!(
            normalize_title("The Rise of the Machines!"),
            "rise machines"
        );
    }

    #[test]
    fn dedup_collapses_same_link_keeps_first() {
        let out = dedup(vec![
            article("First copy", "https://example.com/story", "body"),
            article("Second copy", "https://example.com/story/?ref=rss", "other"),
        ]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].title, "First copy");
        assert_eq!(out[0].raw_text, "body");
    }

    #[test]
    fn dedup_adopts_body_from_later_duplicate() {
        let out = dedup(vec![
            article("Story", "https://example.com/story", ""),
            article("Story", "https://mirror.example/story-repost", "full body"),
        ]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].url, "https://example.com/story");
        assert_eq!(out[0].raw_text, "full body");
    }

    #[test]
    fn dedup_matches_republished_title_under_different_url() {
        let out = dedup(vec![
            article("The Big AI Announcement", "https://a.example/1", "x"),
            article("Big AI Announcement", "https://b.example/2", "y"),
        ]);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn dedup_is_idempotent_and_shrinking() {
        let input = vec![
            article("A", "https://a.example/1", "x"),
            article("B", "https://b.example/2", "y"),
            article("A", "https://a.example/1/", "z"),
        ];
        let once = dedup(input.clone());
        assert!(once.len() <= input.len());

        let twice = dedup(once.clone());
        assert_eq!(once.len(), twice.len());
        for (a, b) in once.iter().zip(twice.iter()) {
            assert_eq!(a.url, b.url);
        }
    }

    #[test]
    fn dedup_output_urls_unique_after_normalization() {
        let out = dedup(vec![
            article("One", "https://a.example/1", ""),
            article("Two", "https://a.example/1?q=2", ""),
            article("Three", "https://b.example/3", ""),
        ]);
        let keys: HashSet<String> = out.iter().map(|a| normalize_url(&a.url)).collect();
        assert_eq!(keys.len(), out.len());
    }
}
