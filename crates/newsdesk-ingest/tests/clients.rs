//! Integration tests for the news source clients using wiremock HTTP mocks.

use newsdesk_ingest::{IngestError, NewsdataClient, WorldNewsClient};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn newsdata_client(base_url: &str) -> NewsdataClient {
    NewsdataClient::with_base_url("test-key", 30, "newsdesk-test", base_url)
        .expect("client construction should not fail")
        .with_retry_policy(0, 0)
}

fn worldnews_client(base_url: &str) -> WorldNewsClient {
    WorldNewsClient::with_base_url("test-key", 30, "newsdesk-test", base_url)
        .expect("client construction should not fail")
        .with_retry_policy(0, 0)
}

#[tokio::test]
async fn newsdata_latest_page_parses_articles() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "status": "success",
        "totalResults": 1,
        "results": [
            {
                "title": "Storm closes in on coast",
                "link": "https://example.com/storm",
                "description": "Residents told to prepare",
                "source_id": "example_news",
                "pubDate": "2026-08-07 06:30:00",
                "image_url": "https://example.com/storm.jpg",
                "creator": ["John Doe"]
            }
        ],
        "nextPage": null
    });

    Mock::given(method("GET"))
        .and(path("/latest"))
        .and(query_param("apikey", "test-key"))
        .and(query_param("country", "au"))
        .and(query_param("language", "en"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = newsdata_client(&server.uri());
    let page = client
        .latest_page("au", "en", None)
        .await
        .expect("should parse page");

    assert_eq!(page.results.len(), 1);
    assert_eq!(page.results[0].title.as_deref(), Some("Storm closes in on coast"));
    assert_eq!(page.results[0].link.as_deref(), Some("https://example.com/storm"));
    assert!(page.next_page.is_none());
}

#[tokio::test]
async fn newsdata_fetch_latest_follows_next_page_token() {
    let server = MockServer::start().await;

    let page1 = serde_json::json!({
        "status": "success",
        "results": [
            { "title": "A", "link": "https://example.com/a", "description": "a", "pubDate": "2026-08-07 01:00:00" }
        ],
        "nextPage": "token-2"
    });
    let page2 = serde_json::json!({
        "status": "success",
        "results": [
            { "title": "B", "link": "https://example.com/b", "description": "b", "pubDate": "2026-08-07 02:00:00" }
        ],
        "nextPage": null
    });

    Mock::given(method("GET"))
        .and(path("/latest"))
        .and(query_param("page", "token-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&page2))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/latest"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&page1))
        .mount(&server)
        .await;

    let client = newsdata_client(&server.uri());
    let articles = client
        .fetch_latest("au", "en", 2)
        .await
        .expect("should page through results");

    assert_eq!(articles.len(), 2);
    assert_eq!(articles[0].title.as_deref(), Some("A"));
    assert_eq!(articles[1].title.as_deref(), Some("B"));
}

#[tokio::test]
async fn newsdata_surfaces_api_error_status() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "status": "error",
        "results": { "message": "Invalid API key", "code": "Unauthorized" }
    });

    Mock::given(method("GET"))
        .and(path("/latest"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = newsdata_client(&server.uri());
    let result = client.latest_page("au", "en", None).await;

    match result {
        Err(IngestError::Api(msg)) => assert_eq!(msg, "Invalid API key"),
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn worldnews_search_page_sends_api_key_header() {
    let server = MockServer::start().await;

    let body = serde_json::json!({
        "offset": 0,
        "number": 1,
        "available": 1,
        "news": [
            {
                "title": "Markets rally",
                "text": "Long body",
                "summary": "Shares climbed",
                "url": "https://example.com/markets",
                "publish_date": "2026-08-07 08:00:00",
                "authors": ["Jane Smith"],
                "source_country": "au"
            }
        ]
    });

    Mock::given(method("GET"))
        .and(path("/search-news"))
        .and(header("x-api-key", "test-key"))
        .and(query_param("source-country", "au"))
        .and(query_param("sort", "publish-time"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = worldnews_client(&server.uri());
    let page = client
        .search_page("au", "en", "2026-08-06", 0)
        .await
        .expect("should parse page");

    assert_eq!(page.news.len(), 1);
    assert_eq!(page.news[0].url.as_deref(), Some("https://example.com/markets"));
}

#[tokio::test]
async fn worldnews_fetch_latest_stops_on_short_page() {
    let server = MockServer::start().await;

    // A single page smaller than the page size must terminate the loop even
    // though min_results was not reached.
    let body = serde_json::json!({
        "offset": 0,
        "number": 2,
        "available": 2,
        "news": [
            { "title": "A", "text": "a", "url": "https://example.com/a", "publish_date": "2026-08-07 01:00:00" },
            { "title": "B", "text": "b", "url": "https://example.com/b", "publish_date": "2026-08-07 02:00:00" }
        ]
    });

    Mock::given(method("GET"))
        .and(path("/search-news"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let client = worldnews_client(&server.uri());
    let articles = client
        .fetch_latest("au", "en", 100)
        .await
        .expect("should return the short page");

    assert_eq!(articles.len(), 2);
}

#[tokio::test]
async fn worldnews_first_page_failure_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search-news"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let client = worldnews_client(&server.uri());
    let result = client.fetch_latest("au", "en", 10).await;
    assert!(matches!(result, Err(IngestError::Http(_))));
}
