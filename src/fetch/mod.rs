// src/fetch/mod.rs

use async_trait::async_trait;
use reqwest::Client;
use std::{fmt::Display, time::Duration};
use tokio::time::sleep;
use tracing::{debug, warn};
use url::Url;

use crate::{config::FetchConfig, error::ScrapeError};

/// Source of rendered page HTML, one call per job.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, ScrapeError>;
}

/// Plain HTTP fetcher with a browser user agent and a small retry loop.
pub struct HttpFetcher {
    client: Client,
    max_retries: usize,
    retry_delay: Duration,
}

impl HttpFetcher {
    pub fn new(cfg: &FetchConfig) -> Result<Self, ScrapeError> {
        let client = Client::builder()
            .user_agent(cfg.user_agent.as_str())
            .timeout(cfg.timeout())
            .cookie_store(true)
            .gzip(true)
            .build()
            .map_err(|e| ScrapeError::Config(format!("building http client: {}", e)))?;
        Ok(Self {
            client,
            max_retries: cfg.max_retries.max(1),
            retry_delay: cfg.retry_delay(),
        })
    }
}

fn fetch_error(url: &str, reason: impl Display) -> ScrapeError {
    ScrapeError::Fetch {
        url: url.to_string(),
        reason: reason.to_string(),
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, ScrapeError> {
        let parsed = Url::parse(url).map_err(|e| ScrapeError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        let mut attempt = 0;
        loop {
            attempt += 1;
            let can_retry = attempt < self.max_retries;

            // transport and body errors are retried; HTTP error statuses are not
            match self.client.get(parsed.clone()).send().await {
                Ok(resp) if resp.status().is_success() => match resp.text().await {
                    Ok(html) => {
                        debug!(url, attempt, bytes = html.len(), "fetched page");
                        return Ok(html);
                    }
                    Err(e) if can_retry => {
                        warn!(url, attempt, error = %e, "reading body failed; retrying");
                    }
                    Err(e) => return Err(fetch_error(url, e)),
                },
                Ok(resp) => {
                    return Err(fetch_error(url, format!("HTTP error: {}", resp.status())));
                }
                Err(e) if can_retry => {
                    warn!(url, attempt, error = %e, "request failed; retrying");
                }
                Err(e) => return Err(fetch_error(url, e)),
            }

            sleep(self.retry_delay).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::TcpListener,
    };

    /// Serve `response` verbatim to every connection, returning the base URL.
    async fn serve(response: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            loop {
                let Ok((mut sock, _)) = listener.accept().await else {
                    return;
                };
                let mut buf = [0u8; 4096];
                let _ = sock.read(&mut buf).await;
                let _ = sock.write_all(response.as_bytes()).await;
                let _ = sock.shutdown().await;
            }
        });
        format!("http://{}/page", addr)
    }

    fn quick_config() -> FetchConfig {
        FetchConfig {
            timeout_secs: 5,
            max_retries: 2,
            retry_delay_ms: 10,
            ..FetchConfig::default()
        }
    }

    #[tokio::test]
    async fn test_fetch_success() {
        let url = serve(
            "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: 13\r\nConnection: close\r\n\r\n<p>hello</p>\n",
        )
        .await;
        let fetcher = HttpFetcher::new(&quick_config()).unwrap();
        let body = fetcher.fetch(&url).await.unwrap();
        assert_eq!(body, "<p>hello</p>\n");
    }

    #[tokio::test]
    async fn test_fetch_http_error_status() {
        let url = serve(
            "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        )
        .await;
        let fetcher = HttpFetcher::new(&quick_config()).unwrap();
        let err = fetcher.fetch(&url).await.unwrap_err();
        assert_eq!(err.kind(), "fetch_failure");
        assert!(err.to_string().contains("404"));
    }

    #[tokio::test]
    async fn test_fetch_invalid_url() {
        let fetcher = HttpFetcher::new(&quick_config()).unwrap();
        let err = fetcher.fetch("not a url").await.unwrap_err();
        assert_eq!(err.kind(), "invalid_url");
    }
}
