use std::time::Duration;

use bytes::Bytes;
use reqwest::Client;

use super::parse;
use super::types::NormalizedFeed;

pub const USER_AGENT: &str = concat!("gather/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("unexpected status code {status} ({status_text})")]
    Http { status: u16, status_text: String },
    #[error("not a feed: {0}")]
    Format(String),
}

impl FetchError {
    /// Stable label for log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Network(_) => "network",
            FetchError::Http { .. } => "http",
            FetchError::Format(_) => "format",
        }
    }
}

pub fn build_client() -> reqwest::Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(REQUEST_TIMEOUT)
        .build()
}

/// GET the url and produce a normalized feed. No side effects beyond the
/// request; database writes belong to ingestion.
pub async fn fetch_feed(client: &Client, url: &str) -> Result<NormalizedFeed, FetchError> {
    let response = client.get(url).send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Http {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or("unknown").to_string(),
        });
    }

    if let Some(ct) = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_ascii_lowercase())
    {
        if !(ct.contains("xml") || ct.contains("rss") || ct.contains("atom")) {
            return Err(FetchError::Format(format!("content-type {ct:?} is not a feed")));
        }
    }

    let body = response.bytes().await?;
    if looks_like_html(&body) {
        return Err(FetchError::Format("response body is an HTML document".to_string()));
    }

    parse::parse_feed(&body)
}

// Guards against silent redirects to login/block pages served with HTTP 200.
fn looks_like_html(body: &Bytes) -> bool {
    let head = &body[..body.len().min(512)];
    let head = String::from_utf8_lossy(head).to_ascii_lowercase();
    head.contains("<!doctype html") || head.trim_start().starts_with("<html")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Router;
    use axum::http::header;
    use axum::routing::get;

    const FEED_XML: &str = r#"<?xml version="1.0"?>
<rss version="2.0">
  <channel>
    <title>Blog</title>
    <link>https://b.example</link>
    <description>d</description>
    <item>
      <title>A</title>
      <link>https://b.example/a</link>
      <description>x</description>
      <pubDate>Mon, 01 Jan 2024 00:00:00 GMT</pubDate>
    </item>
  </channel>
</rss>"#;

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("listener should bind");
        let addr = listener.local_addr().expect("local addr should exist");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("server should run");
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn fetches_and_normalizes_a_feed() {
        let app = Router::new().route(
            "/feed.xml",
            get(|| async { ([(header::CONTENT_TYPE, "application/rss+xml")], FEED_XML) }),
        );
        let base = serve(app).await;
        let client = build_client().unwrap();

        let feed = fetch_feed(&client, &format!("{base}/feed.xml")).await.unwrap();
        assert_eq!(feed.title, "Blog");
        assert_eq!(feed.items.len(), 1);
        assert_eq!(feed.items[0].link, "https://b.example/a");
    }

    #[tokio::test]
    async fn a_404_is_an_http_error_with_the_status() {
        let base = serve(Router::new()).await;
        let client = build_client().unwrap();

        let err = fetch_feed(&client, &format!("{base}/gone.xml")).await.unwrap_err();
        match err {
            FetchError::Http { status, .. } => assert_eq!(status, 404),
            other => panic!("expected Http, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn html_body_is_a_format_error_despite_feed_content_type() {
        let app = Router::new().route(
            "/feed.xml",
            get(|| async {
                (
                    [(header::CONTENT_TYPE, "application/rss+xml")],
                    "<!DOCTYPE html><html><body>please log in</body></html>",
                )
            }),
        );
        let base = serve(app).await;
        let client = build_client().unwrap();

        let err = fetch_feed(&client, &format!("{base}/feed.xml")).await.unwrap_err();
        assert!(matches!(err, FetchError::Format(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn html_content_type_is_a_format_error() {
        let app = Router::new().route(
            "/feed.xml",
            get(|| async { ([(header::CONTENT_TYPE, "text/html; charset=utf-8")], FEED_XML) }),
        );
        let base = serve(app).await;
        let client = build_client().unwrap();

        let err = fetch_feed(&client, &format!("{base}/feed.xml")).await.unwrap_err();
        assert!(matches!(err, FetchError::Format(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn a_refused_connection_is_a_network_error() {
        // Bind then drop so nothing is listening on the port.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let client = build_client().unwrap();

        let err = fetch_feed(&client, &format!("http://{addr}/feed.xml")).await.unwrap_err();
        assert!(matches!(err, FetchError::Network(_)), "got {err:?}");
    }
}
