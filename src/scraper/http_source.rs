// src/scraper/http_source.rs
use anyhow::{Context, Result};
use serde::Deserialize;
use std::time::Duration;
use tracing::{info, trace};

use super::{JobSource, JobTable};
use crate::search::ResolvedSearchParameters;

#[derive(Deserialize)]
struct ScraperErrorBody {
    error: String,
}

/// Calls a scraper bridge over HTTP (e.g. a small JobSpy service).
pub struct HttpJobSource {
    client: reqwest::Client,
    url: String,
}

impl HttpJobSource {
    pub fn new(url: String, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to create HTTP client")?;

        Ok(Self { client, url })
    }
}

#[rocket::async_trait]
impl JobSource for HttpJobSource {
    async fn scrape_jobs(&self, params: &ResolvedSearchParameters) -> Result<JobTable> {
        info!("Calling scraper service: {}", self.url);

        let response = self
            .client
            .post(&self.url)
            .json(params)
            .send()
            .await
            .context("Scraper request failed")?;

        let status = response.status();
        trace!("Scraper response status: {}", status);

        let body = response
            .text()
            .await
            .context("Failed to read scraper response")?;

        if !status.is_success() {
            let message = serde_json::from_str::<ScraperErrorBody>(&body)
                .map(|e| e.error)
                .unwrap_or(body);
            anyhow::bail!("Scraper returned status {}: {}", status, message);
        }

        serde_json::from_str::<JobTable>(&body).context("Failed to parse scraper response")
    }
}
