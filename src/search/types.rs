// src/search/types.rs
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use super::location::Country;
use crate::error::JobSearchError;
use crate::scraper::JobTable;

pub const DEFAULT_RESULTS_WANTED: u32 = 50;
pub const DEFAULT_VERBOSE: u8 = 2;

/// Job boards the scraper knows how to query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Site {
    Linkedin,
    Indeed,
    Glassdoor,
    Google,
    ZipRecruiter,
    Bayt,
    Naukri,
}

impl Site {
    pub const ALL: [Site; 7] = [
        Site::Linkedin,
        Site::Indeed,
        Site::Glassdoor,
        Site::Google,
        Site::ZipRecruiter,
        Site::Bayt,
        Site::Naukri,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Site::Linkedin => "linkedin",
            Site::Indeed => "indeed",
            Site::Glassdoor => "glassdoor",
            Site::Google => "google",
            Site::ZipRecruiter => "zip_recruiter",
            Site::Bayt => "bayt",
            Site::Naukri => "naukri",
        }
    }

    /// Indeed and Glassdoor need an explicit country to pick their regional domain.
    pub fn requires_country(&self) -> bool {
        matches!(self, Site::Indeed | Site::Glassdoor)
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Site {
    type Err = JobSearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        Site::ALL
            .into_iter()
            .find(|site| site.as_str() == normalized)
            .ok_or_else(|| JobSearchError::validation(format!("Unsupported site: {}", s.trim())))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobType {
    Fulltime,
    Parttime,
    Internship,
    Contract,
}

impl JobType {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobType::Fulltime => "fulltime",
            JobType::Parttime => "parttime",
            JobType::Internship => "internship",
            JobType::Contract => "contract",
        }
    }
}

impl FromStr for JobType {
    type Err = JobSearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fulltime" => Ok(JobType::Fulltime),
            "parttime" => Ok(JobType::Parttime),
            "internship" => Ok(JobType::Internship),
            "contract" => Ok(JobType::Contract),
            other => Err(JobSearchError::validation(format!(
                "Unsupported job type: {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DescriptionFormat {
    #[default]
    Markdown,
    Html,
    Plain,
}

impl DescriptionFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            DescriptionFormat::Markdown => "markdown",
            DescriptionFormat::Html => "html",
            DescriptionFormat::Plain => "plain",
        }
    }
}

impl FromStr for DescriptionFormat {
    type Err = JobSearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "markdown" => Ok(DescriptionFormat::Markdown),
            "html" => Ok(DescriptionFormat::Html),
            "plain" => Ok(DescriptionFormat::Plain),
            other => Err(JobSearchError::validation(format!(
                "Unsupported description format: {}",
                other
            ))),
        }
    }
}

/// The filters that job boards restrict against each other
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet {
    pub hours_old: Option<u32>,
    pub job_type: Option<JobType>,
    pub is_remote: bool,
    pub easy_apply: bool,
}

/// A validated search as submitted by the user
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub site: Site,
    pub search_term: String,
    pub google_search_term: Option<String>,
    pub location: Option<String>,
    pub distance: Option<u32>,
    pub job_type: Option<JobType>,
    pub is_remote: bool,
    pub easy_apply: bool,
    pub results_wanted: u32,
    pub hours_old: Option<u32>,
    pub linkedin_company_ids: Option<Vec<u64>>,
    pub proxies: Option<Vec<String>>,
    pub user_agent: Option<String>,
    pub description_format: DescriptionFormat,
    pub linkedin_fetch_description: bool,
    pub enforce_annual_salary: bool,
    pub verbose: u8,
}

impl SearchRequest {
    pub fn new(site: Site, search_term: impl Into<String>) -> Self {
        Self {
            site,
            search_term: search_term.into(),
            google_search_term: None,
            location: None,
            distance: None,
            job_type: None,
            is_remote: false,
            easy_apply: false,
            results_wanted: DEFAULT_RESULTS_WANTED,
            hours_old: None,
            linkedin_company_ids: None,
            proxies: None,
            user_agent: None,
            description_format: DescriptionFormat::default(),
            linkedin_fetch_description: false,
            enforce_annual_salary: false,
            verbose: DEFAULT_VERBOSE,
        }
    }

    pub fn filters(&self) -> FilterSet {
        FilterSet {
            hours_old: self.hours_old,
            job_type: self.job_type,
            is_remote: self.is_remote,
            easy_apply: self.easy_apply,
        }
    }
}

/// Conflict-free parameters, serialized as-is for the scraper.
///
/// Unset options are skipped so the scraper falls back to its own defaults.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedSearchParameters {
    pub site_name: Vec<Site>,
    pub search_term: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub google_search_term: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<u32>,
    pub is_remote: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_type: Option<JobType>,
    pub easy_apply: bool,
    pub results_wanted: u32,
    pub description_format: DescriptionFormat,
    pub linkedin_fetch_description: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin_company_ids: Option<Vec<u64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hours_old: Option<u32>,
    pub enforce_annual_salary: bool,
    pub verbose: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxies: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_indeed: Option<Country>,
}

impl ResolvedSearchParameters {
    pub fn site(&self) -> Option<Site> {
        self.site_name.first().copied()
    }

    /// Ordered name/value pairs describing the search, for the parameters sheet.
    ///
    /// Unset options map to `Null`; flags and counts keep their native type.
    pub fn summary(&self, created_at: &DateTime<Local>) -> Vec<(&'static str, Value)> {
        let site = self.site().map(|s| s.to_string()).unwrap_or_default();

        let mut rows = vec![
            ("site_name", Value::from(site)),
            ("search_term", Value::from(self.search_term.as_str())),
            ("location", Value::from(self.location.clone())),
            ("distance", Value::from(self.distance)),
            ("job_type", Value::from(self.job_type.map(|t| t.as_str()))),
            ("results_wanted", Value::from(self.results_wanted)),
            ("hours_old", Value::from(self.hours_old)),
            ("is_remote", Value::Bool(self.is_remote)),
            ("easy_apply", Value::Bool(self.easy_apply)),
            (
                "linkedin_fetch_description",
                Value::Bool(self.linkedin_fetch_description),
            ),
            ("enforce_annual_salary", Value::Bool(self.enforce_annual_salary)),
            ("description_format", Value::from(self.description_format.as_str())),
            ("verbose", Value::from(self.verbose)),
            (
                "timestamp",
                Value::from(created_at.format("%Y-%m-%d %H:%M:%S").to_string()),
            ),
        ];

        if let Some(term) = &self.google_search_term {
            rows.push(("google_search_term", Value::from(term.as_str())));
        }
        if let Some(ids) = &self.linkedin_company_ids {
            let joined = ids.iter().map(u64::to_string).collect::<Vec<_>>().join(",");
            rows.push(("linkedin_company_ids", Value::from(joined)));
        }
        if let Some(agent) = &self.user_agent {
            rows.push(("user_agent", Value::from(agent.as_str())));
        }
        if let Some(proxies) = &self.proxies {
            rows.push(("proxies", Value::from(proxies.join(","))));
        }
        if let Some(country) = &self.country_indeed {
            rows.push(("country_indeed", Value::from(country.as_str())));
        }

        rows
    }
}

/// A finished search as held by the result cache
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub jobs: JobTable,
    pub params: ResolvedSearchParameters,
    pub created_at: DateTime<Local>,
}

impl SearchResult {
    pub fn new(jobs: JobTable, params: ResolvedSearchParameters) -> Self {
        Self {
            jobs,
            params,
            created_at: Local::now(),
        }
    }

    pub fn job_count(&self) -> usize {
        self.jobs.len()
    }

    pub fn parameter_summary(&self) -> Vec<(&'static str, Value)> {
        self.params.summary(&self.created_at)
    }
}
