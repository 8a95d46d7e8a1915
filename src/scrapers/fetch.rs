use crate::scrapers::error::ScrapeError;
use crate::scrapers::traits::Fetcher;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Plain HTTP GET fetcher
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn get_text(&self, url: &str) -> Result<String, ScrapeError> {
        debug!("Fetching URL: {}", url);

        let request_failed = |e: reqwest::Error| ScrapeError::Request {
            url: url.to_string(),
            source: Box::new(e),
        };

        let response = self.client.get(url).send().await.map_err(request_failed)?;

        if !response.status().is_success() {
            warn!("{} returned status: {}", url, response.status());
            return Err(ScrapeError::Status {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        let body = response.text().await.map_err(request_failed)?;
        debug!("Downloaded {} bytes from {}", body.len(), url);

        Ok(body)
    }
}
