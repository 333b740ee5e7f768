// src/search/orchestrator.rs
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

use super::constraints::normalize_filters;
use super::location::resolve_location;
use super::types::{ResolvedSearchParameters, SearchRequest, SearchResult};
use crate::error::{JobSearchError, JobSearchResult};
use crate::scraper::JobSource;

impl SearchRequest {
    /// Applies country inference and the per-site filter rules.
    pub fn resolve(&self) -> ResolvedSearchParameters {
        let (location, country_indeed) = if self.site.requires_country() {
            let (country, location) = resolve_location(self.location.as_deref());
            (Some(location), Some(country))
        } else {
            (self.location.clone(), None)
        };

        let filters = normalize_filters(self.site, self.filters());

        ResolvedSearchParameters {
            site_name: vec![self.site],
            search_term: self.search_term.clone(),
            google_search_term: self.google_search_term.clone(),
            location,
            distance: self.distance,
            is_remote: filters.is_remote,
            job_type: filters.job_type,
            easy_apply: filters.easy_apply,
            results_wanted: self.results_wanted,
            description_format: self.description_format,
            linkedin_fetch_description: self.linkedin_fetch_description,
            linkedin_company_ids: self.linkedin_company_ids.clone(),
            hours_old: filters.hours_old,
            enforce_annual_salary: self.enforce_annual_salary,
            verbose: self.verbose,
            user_agent: self.user_agent.clone(),
            proxies: self.proxies.clone(),
            country_indeed,
        }
    }
}

/// Resolves searches and hands them to the configured scraper backend.
#[derive(Clone)]
pub struct JobSearchService {
    source: Arc<dyn JobSource>,
    timeout: Option<Duration>,
}

impl JobSearchService {
    pub fn new(source: Arc<dyn JobSource>) -> Self {
        Self {
            source,
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub async fn search(&self, request: &SearchRequest) -> JobSearchResult<SearchResult> {
        if request.search_term.trim().is_empty() {
            return Err(JobSearchError::validation(
                "Site name and search term are required",
            ));
        }

        let params = request.resolve();
        info!("Searching for: {} on {}", params.search_term, request.site);

        let scrape = self.source.scrape_jobs(&params);
        let outcome = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, scrape).await {
                Ok(outcome) => outcome,
                Err(_) => {
                    error!("Scraper timed out after {:?} for {}", limit, request.site);
                    return Err(JobSearchError::search_failed(format!(
                        "scraper did not answer within {} seconds",
                        limit.as_secs()
                    )));
                }
            },
            None => scrape.await,
        };

        let jobs = outcome.map_err(|e| {
            error!("Error during job search on {}: {:#}", request.site, e);
            JobSearchError::search_failed(format!("{:#}", e))
        })?;

        info!("Scraper returned {} jobs from {}", jobs.len(), request.site);
        Ok(SearchResult::new(jobs, params))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::scraper::{JobRecord, JobTable};
    use crate::search::location::Country;
    use crate::search::types::{JobType, Site};
    use anyhow::Result;
    use serde_json::json;
    use std::sync::Mutex;

    /// In-memory scraper that records what it was asked for.
    pub(crate) struct StubSource {
        pub table: JobTable,
        pub fail_with: Option<String>,
        pub delay: Option<Duration>,
        pub seen: Mutex<Vec<ResolvedSearchParameters>>,
    }

    impl StubSource {
        pub fn with_table(table: JobTable) -> Self {
            Self {
                table,
                fail_with: None,
                delay: None,
                seen: Mutex::new(Vec::new()),
            }
        }

        pub fn failing(message: &str) -> Self {
            Self {
                fail_with: Some(message.to_string()),
                ..Self::with_table(JobTable::default())
            }
        }

        pub fn last_params(&self) -> Option<ResolvedSearchParameters> {
            self.seen.lock().unwrap().last().cloned()
        }
    }

    #[rocket::async_trait]
    impl JobSource for StubSource {
        async fn scrape_jobs(&self, params: &ResolvedSearchParameters) -> Result<JobTable> {
            self.seen.lock().unwrap().push(params.clone());
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            match &self.fail_with {
                Some(message) => anyhow::bail!("{}", message),
                None => Ok(self.table.clone()),
            }
        }
    }

    pub(crate) fn sample_table() -> JobTable {
        let columns = ["id", "site", "job_url", "title", "company", "location", "date_posted", "job_type"];
        let rows = [
            json!(["in-1", "indeed", "https://example.com/jobs/1", "Software Engineer", "Acme", "Austin, TX", "2025-01-02", "fulltime"]),
            json!(["in-2", "indeed", null, "Platform Engineer", "Globex", "Remote", "2025-01-03", null]),
        ];

        let records = rows
            .iter()
            .map(|row| {
                let values = row.as_array().unwrap().iter().cloned();
                JobRecord::new(columns.iter().map(|c| c.to_string()).zip(values).collect())
            })
            .collect();

        JobTable::new(columns.iter().map(|c| c.to_string()).collect(), records)
    }

    #[test]
    fn test_indeed_resolution_infers_country_and_location() {
        let mut request = SearchRequest::new(Site::Indeed, "engineer");
        request.hours_old = Some(24);
        request.job_type = Some(JobType::Fulltime);

        let params = request.resolve();
        assert_eq!(params.country_indeed, Some(Country::Usa));
        assert_eq!(params.location.as_deref(), Some("United States"));
        assert_eq!(params.hours_old, Some(24));
        assert_eq!(params.job_type, None);
    }

    #[test]
    fn test_linkedin_location_is_left_alone() {
        let mut request = SearchRequest::new(Site::Linkedin, "engineer");
        request.hours_old = Some(48);
        request.easy_apply = true;

        let params = request.resolve();
        assert_eq!(params.location, None);
        assert_eq!(params.country_indeed, None);
        assert_eq!(params.hours_old, Some(48));
        assert!(!params.easy_apply);
    }

    #[test]
    fn test_glassdoor_keeps_explicit_location() {
        let mut request = SearchRequest::new(Site::Glassdoor, "data analyst");
        request.location = Some("Istanbul".to_string());

        let params = request.resolve();
        assert_eq!(params.country_indeed, Some(Country::Turkey));
        assert_eq!(params.location.as_deref(), Some("Istanbul"));
    }

    #[tokio::test]
    async fn test_search_returns_table_unchanged() {
        let stub = Arc::new(StubSource::with_table(sample_table()));
        let service = JobSearchService::new(stub.clone());

        let result = service
            .search(&SearchRequest::new(Site::Indeed, "engineer"))
            .await
            .unwrap();

        assert_eq!(result.jobs, sample_table());
        assert_eq!(result.params, stub.last_params().unwrap());
    }

    #[tokio::test]
    async fn test_blank_search_term_is_rejected_before_scraping() {
        let stub = Arc::new(StubSource::with_table(sample_table()));
        let service = JobSearchService::new(stub.clone());

        let err = service
            .search(&SearchRequest::new(Site::Indeed, "   "))
            .await
            .unwrap_err();

        assert!(matches!(err, JobSearchError::Validation(_)));
        assert!(stub.last_params().is_none());
    }

    #[tokio::test]
    async fn test_scraper_failure_becomes_search_failed() {
        let service = JobSearchService::new(Arc::new(StubSource::failing("HTTP 429")));

        let err = service
            .search(&SearchRequest::new(Site::Linkedin, "engineer"))
            .await
            .unwrap_err();

        match err {
            JobSearchError::SearchFailed(message) => assert!(message.contains("HTTP 429")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_becomes_search_failed() {
        let stub = StubSource {
            delay: Some(Duration::from_secs(600)),
            ..StubSource::with_table(sample_table())
        };
        let service =
            JobSearchService::new(Arc::new(stub)).with_timeout(Some(Duration::from_secs(5)));

        let err = service
            .search(&SearchRequest::new(Site::Google, "engineer"))
            .await
            .unwrap_err();

        assert!(matches!(err, JobSearchError::SearchFailed(_)));
    }
}
