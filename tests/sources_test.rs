use ai_news_digest::config::{SourceDescriptor, SourceKind};
use ai_news_digest::sources::{FeedAdapter, HackerNewsAdapter, ScrapeAdapter};

fn feed_descriptor(limit: usize) -> SourceDescriptor {
    SourceDescriptor::new("Test Feed", "https://example.com/feed.xml", SourceKind::Feed, limit)
}

const RSS_FIXTURE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Test Feed</title>
    <item>
      <title>New transformer architecture</title>
      <link>https://example.com/transformer</link>
      <description>A novel attention mechanism.</description>
      <pubDate>Mon, 03 Jun 2024 09:00:00 GMT</pubDate>
    </item>
    <item>
      <title>Entry without a link</title>
      <description>Should be dropped.</description>
    </item>
    <item>
      <title>Second story</title>
      <link>https://example.com/second</link>
      <description>More details.</description>
    </item>
    <item>
      <title>Third story past the limit</title>
      <link>https://example.com/third</link>
    </item>
  </channel>
</rss>"#;

#[test]
fn feed_adapter_parses_entries_and_drops_linkless() {
    let adapter = FeedAdapter::new();
    let articles = adapter.parse(RSS_FIXTURE, &feed_descriptor(10)).unwrap();

    let titles: Vec<&str> = articles.iter().map(|a| a.title.as_str()).collect();
    assert_eq!(
        titles,
        vec!["New transformer architecture", "Second story", "Third story past the limit"]
    );
    assert_eq!(articles[0].url, "https://example.com/transformer");
    assert_eq!(articles[0].raw_text, "A novel attention mechanism.");
    assert!(articles[0].published_at.is_some());
    assert_eq!(articles[0].source, "Test Feed");
}

#[test]
fn feed_adapter_applies_per_source_limit() {
    let adapter = FeedAdapter::new();
    let articles = adapter.parse(RSS_FIXTURE, &feed_descriptor(2)).unwrap();
    assert_eq!(articles.len(), 2);
}

#[test]
fn feed_adapter_rejects_garbage() {
    let adapter = FeedAdapter::new();
    assert!(adapter.parse("not xml at all", &feed_descriptor(5)).is_err());
}

const HN_FIXTURE: &str = r#"{
  "hits": [
    {
      "title": "Show HN: open-source LLM toolkit",
      "url": "https://github.com/example/toolkit",
      "objectID": "1001",
      "created_at": "2024-06-03T12:00:00Z",
      "comment_text": null
    },
    {
      "title": "Ask HN: best ML papers this year?",
      "url": null,
      "objectID": "1002",
      "created_at": "2024-06-03T11:00:00Z",
      "comment_text": "Long discussion about papers."
    },
    {
      "title": null,
      "url": "https://example.com/untitled",
      "objectID": "1003"
    }
  ]
}"#;

#[test]
fn hackernews_adapter_parses_hits_with_item_page_fallback() {
    let adapter = HackerNewsAdapter::new();
    let descriptor = SourceDescriptor::new(
        "Hacker News",
        "https://hn.algolia.com/api/v1/search",
        SourceKind::JsonApi,
        10,
    );
    let articles = adapter.parse(HN_FIXTURE, &descriptor).unwrap();

    // Untitled hit dropped, URL-less hit falls back to the HN item page.
    assert_eq!(articles.len(), 2);
    assert_eq!(articles[0].url, "https://github.com/example/toolkit");
    assert_eq!(articles[1].url, "https://news.ycombinator.com/item?id=1002");
    assert_eq!(articles[1].raw_text, "Long discussion about papers.");
    assert!(articles[0].published_at.is_some());
}

const HTML_FIXTURE: &str = r##"<!DOCTYPE html>
<html>
<body>
  <nav><a href="/about">About our company page</a></nav>
  <a href="#main">Skip to main content</a>
  <a href="mailto:press@example.com">Contact the press team</a>
  <a href="/news/model-launch">Announcing our newest frontier model</a>
  <a href="https://example.com/news/safety">Research update on model safety</a>
  <a href="/short">tiny</a>
  <a href="/news/model-launch">Announcing our newest frontier model</a>
</body>
</html>"##;

#[test]
fn scrape_adapter_harvests_article_anchors_only() {
    let adapter = ScrapeAdapter::new();
    let descriptor = SourceDescriptor::new(
        "Example Lab",
        "https://example.com/news",
        SourceKind::Scrape,
        10,
    );
    let articles = adapter.parse(HTML_FIXTURE, &descriptor).unwrap();

    let titles: Vec<&str> = articles.iter().map(|a| a.title.as_str()).collect();
    assert_eq!(
        titles,
        vec![
            "About our company page",
            "Announcing our newest frontier model",
            "Research update on model safety"
        ]
    );
    // Relative hrefs absolutized against the page URL.
    assert_eq!(articles[1].url, "https://example.com/news/model-launch");
    // Duplicate headline kept once; skip-listed and short anchors dropped.
    assert_eq!(articles.len(), 3);
}
