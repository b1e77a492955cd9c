use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use scraper::{Html, Node};
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::{config::WebContentConfig, domain::NormalizedDocument, text};

const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "template"];

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("timed out fetching {0}")]
    Timeout(String),
    #[error("failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} answered with status {status}")]
    Status { url: String, status: StatusCode },
    #[error("failed to read body of {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} announced {length} bytes, above the {limit} byte limit")]
    TooLarge { url: String, length: u64, limit: usize },
}

#[async_trait]
pub trait ContentExtractor: Send + Sync {
    async fn extract(&self, url: &Url) -> Result<NormalizedDocument, ExtractionError>;
}

/// Accepts only absolute http(s) URLs.
pub fn parse_target_url(raw: &str) -> Result<Url, ExtractionError> {
    match Url::parse(raw.trim()) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => Ok(url),
        _ => Err(ExtractionError::InvalidUrl(raw.to_string())),
    }
}

pub struct WebContentFetcher {
    client: Client,
    config: WebContentConfig,
}

impl WebContentFetcher {
    pub fn new(client: Client, config: WebContentConfig) -> Self {
        Self { client, config }
    }

    /// Downloads at most `max_body_bytes` of the page. Bodies that announce a
    /// larger `Content-Length` are refused before any of it is read.
    async fn fetch_html(&self, url: &Url) -> Result<String, ExtractionError> {
        let mut response = self
            .client
            .get(url.clone())
            .timeout(self.config.fetch_timeout)
            .send()
            .await
            .map_err(|source| fetch_error(url, source))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(ExtractionError::Status {
                url: url.to_string(),
                status,
            });
        }

        let limit = self.config.max_body_bytes;
        if let Some(length) = response.content_length() {
            if length > limit as u64 {
                return Err(ExtractionError::TooLarge {
                    url: url.to_string(),
                    length,
                    limit,
                });
            }
        }

        let mut body = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|source| body_error(url, source))?
        {
            let room = limit - body.len();
            if chunk.len() > room {
                body.extend_from_slice(&chunk[..room]);
                debug!(target: "web", url = %url, limit, "page body truncated");
                break;
            }
            body.extend_from_slice(&chunk);
            if body.len() == limit {
                break;
            }
        }

        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}

fn fetch_error(url: &Url, source: reqwest::Error) -> ExtractionError {
    if source.is_timeout() {
        ExtractionError::Timeout(url.to_string())
    } else {
        ExtractionError::Fetch {
            url: url.to_string(),
            source,
        }
    }
}

fn body_error(url: &Url, source: reqwest::Error) -> ExtractionError {
    if source.is_timeout() {
        ExtractionError::Timeout(url.to_string())
    } else {
        ExtractionError::Body {
            url: url.to_string(),
            source,
        }
    }
}

#[async_trait]
impl ContentExtractor for WebContentFetcher {
    async fn extract(&self, url: &Url) -> Result<NormalizedDocument, ExtractionError> {
        let html = self.fetch_html(url).await?;
        let raw = extract_visible_text(&html);
        let raw_chars = raw.chars().count();
        let normalized = text::normalize(&raw);

        debug!(
            target: "web",
            url = %url,
            raw_chars,
            normalized_chars = normalized.chars().count(),
            "page text extracted"
        );

        Ok(NormalizedDocument {
            url: url.to_string(),
            raw_chars,
            text: normalized,
        })
    }
}

/// Concatenates every text node of the document, skipping the content of
/// script-like elements.
pub fn extract_visible_text(html: &str) -> String {
    let document = Html::parse_document(html);
    if !document.errors.is_empty() {
        debug!(target: "web", errors = document.errors.len(), "html parsed with recoverable errors");
    }

    let mut text = String::new();
    for node in document.tree.root().descendants() {
        let Node::Text(fragment) = node.value() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|el| HIDDEN_ELEMENTS.contains(&el.name()))
        });
        if !hidden {
            text.push_str(fragment);
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use std::{
        sync::{
            atomic::{AtomicUsize, Ordering},
            Arc,
        },
        time::Duration,
    };

    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::TcpListener,
        task::JoinHandle,
    };

    use super::*;

    fn fetcher(max_body_bytes: usize) -> WebContentFetcher {
        WebContentFetcher::new(
            Client::new(),
            WebContentConfig {
                fetch_timeout: Duration::from_secs(5),
                max_body_bytes,
                user_agent: "test".into(),
            },
        )
    }

    /// Serves one connection: writes `head`, then `body` `repeat` times, counting
    /// the body bytes the socket accepted before the peer went away.
    async fn serve_once(
        head: String,
        body: Vec<u8>,
        repeat: usize,
    ) -> (Url, Arc<AtomicUsize>, JoinHandle<()>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let written = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&written);

        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = [0u8; 4096];
            let _ = socket.read(&mut request).await;
            if socket.write_all(head.as_bytes()).await.is_err() {
                return;
            }
            for _ in 0..repeat {
                if socket.write_all(&body).await.is_err() {
                    return;
                }
                counter.fetch_add(body.len(), Ordering::SeqCst);
            }
            let _ = socket.shutdown().await;
        });

        let url = Url::parse(&format!("http://{addr}/")).unwrap();
        (url, written, server)
    }

    #[test]
    fn visible_text_skips_scripts_and_styles() {
        let html = r#"<html><head><title>Login</title>
            <style>body { color: red; }</style>
            <script>var token = "abc";</script></head>
            <body><h1>Verify account</h1><p>Enter your <b>password</b></p>
            <template><p>hidden row</p></template></body></html>"#;
        let text = extract_visible_text(html);
        assert!(text.contains("Login"));
        assert!(text.contains("Verify account"));
        assert!(text.contains("Enter your password"));
        assert!(!text.contains("color"));
        assert!(!text.contains("token"));
        assert!(!text.contains("hidden row"));
    }

    #[test]
    fn noscript_fallback_text_is_kept() {
        let html = "<html><body><p>Sign in</p><noscript>Please enable JavaScript</noscript></body></html>";
        let text = extract_visible_text(html);
        assert!(text.contains("Sign in"));
        assert!(text.contains("Please enable JavaScript"));
    }

    #[test]
    fn malformed_html_is_tolerated() {
        let text = extract_visible_text("<p>unclosed <div>tags <span>everywhere");
        assert!(text.contains("unclosed"));
        assert!(text.contains("everywhere"));
    }

    #[test]
    fn empty_document_has_no_text() {
        assert_eq!(extract_visible_text("").trim(), "");
    }

    #[test]
    fn only_http_urls_are_accepted() {
        assert!(parse_target_url("https://example.com/path?q=1").is_ok());
        assert!(parse_target_url("http://example.com").is_ok());
        assert!(matches!(
            parse_target_url("ftp://example.com"),
            Err(ExtractionError::InvalidUrl(_))
        ));
        assert!(parse_target_url("not a url").is_err());
        assert!(parse_target_url("").is_err());
    }

    #[tokio::test]
    async fn unreachable_host_surfaces_fetch_error() {
        let url = Url::parse("http://127.0.0.1:9/").unwrap();
        let err = fetcher(1024).extract(&url).await.unwrap_err();
        assert!(matches!(
            err,
            ExtractionError::Fetch { .. } | ExtractionError::Timeout(_)
        ));
    }

    #[tokio::test]
    async fn page_is_fetched_and_normalized() {
        let page = "<html><body><h1>Verify account</h1>\n<script>steal()</script>\n<p>Enter your password</p></body></html>";
        let head = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            page.len()
        );
        let (url, _, _server) = serve_once(head, page.as_bytes().to_vec(), 1).await;

        let document = fetcher(1024 * 1024).extract(&url).await.unwrap();
        assert_eq!(document.text, "verifi account enter password");
        assert_eq!(document.url, url.to_string());
    }

    #[tokio::test]
    async fn non_ok_status_is_rejected() {
        let (url, _, _server) = serve_once(
            "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n".to_string(),
            Vec::new(),
            0,
        )
        .await;

        let err = fetcher(1024).extract(&url).await.unwrap_err();
        assert!(matches!(
            err,
            ExtractionError::Status { status, .. } if status == StatusCode::NOT_FOUND
        ));
    }

    #[tokio::test]
    async fn announced_length_above_limit_is_refused() {
        let (url, _, _server) = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: 10000000\r\nConnection: close\r\n\r\n".to_string(),
            vec![b'a'; 64 * 1024],
            4,
        )
        .await;

        let err = fetcher(1024).extract(&url).await.unwrap_err();
        assert!(matches!(
            err,
            ExtractionError::TooLarge { length: 10_000_000, limit: 1024, .. }
        ));
    }

    #[tokio::test]
    async fn streamed_body_download_stops_at_limit() {
        let chunk = "<p>claim your prize now</p>\n".repeat(2048).into_bytes();
        let repeat = 64 * 1024 * 1024 / chunk.len();
        let total = chunk.len() * repeat;
        let (url, written, server) = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nConnection: close\r\n\r\n".to_string(),
            chunk,
            repeat,
        )
        .await;

        let document = fetcher(1024).extract(&url).await.unwrap();
        assert!(document.raw_chars <= 1024);
        assert!(document.text.starts_with("claim prize"));

        tokio::time::timeout(Duration::from_secs(10), server)
            .await
            .expect("server notices the closed connection")
            .unwrap();
        assert!(written.load(Ordering::SeqCst) < total / 2);
    }
}
