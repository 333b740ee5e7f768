// src/web/types.rs
use rocket::http::ContentType;
use rocket::response::{self, Responder};
use rocket::serde::Serialize;
use rocket::{Request, Response};
use std::str::FromStr;

use crate::error::JobSearchError;
use crate::export::{ExportFile, ExportFormat};
use crate::search::{SearchRequest, DEFAULT_RESULTS_WANTED, DEFAULT_VERBOSE};

/// Raw search form as posted by the page; every field arrives as text.
#[derive(Debug, Default, rocket::FromForm)]
pub struct SearchForm {
    pub site_name: Option<String>,
    pub search_term: Option<String>,
    pub google_search_term: Option<String>,
    pub location: Option<String>,
    pub distance: Option<String>,
    pub job_type: Option<String>,
    pub results_wanted: Option<String>,
    pub hours_old: Option<String>,
    pub is_remote: Option<String>,
    pub easy_apply: Option<String>,
    pub linkedin_fetch_description: Option<String>,
    pub enforce_annual_salary: Option<String>,
    pub description_format: Option<String>,
    pub verbose: Option<String>,
    pub user_agent: Option<String>,
    pub linkedin_company_ids: Option<String>,
    pub proxies: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn is_checked(value: &Option<String>) -> bool {
    matches!(
        value.as_deref().map(str::trim),
        Some("on") | Some("true") | Some("1")
    )
}

fn parse_number<T: FromStr>(field: &str, value: Option<String>) -> Result<Option<T>, JobSearchError> {
    non_empty(value)
        .map(|v| {
            v.parse::<T>()
                .map_err(|_| JobSearchError::validation(format!("{} must be a whole number", field)))
        })
        .transpose()
}

fn parse_company_ids(value: Option<String>) -> Result<Option<Vec<u64>>, JobSearchError> {
    let Some(raw) = non_empty(value) else {
        return Ok(None);
    };

    let ids = raw
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(|id| id.parse::<u64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| {
            JobSearchError::validation("LinkedIn Company IDs must be comma-separated numbers")
        })?;

    Ok((!ids.is_empty()).then_some(ids))
}

fn parse_proxies(value: Option<String>) -> Option<Vec<String>> {
    let proxies: Vec<String> = non_empty(value)?
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();

    (!proxies.is_empty()).then_some(proxies)
}

impl TryFrom<SearchForm> for SearchRequest {
    type Error = JobSearchError;

    fn try_from(form: SearchForm) -> Result<Self, Self::Error> {
        let (Some(site), Some(search_term)) = (non_empty(form.site_name), non_empty(form.search_term))
        else {
            return Err(JobSearchError::validation(
                "Site name and search term are required",
            ));
        };

        let mut request = SearchRequest::new(site.parse()?, search_term);
        request.google_search_term = non_empty(form.google_search_term);
        request.location = non_empty(form.location);
        request.distance = parse_number("Distance", form.distance)?;
        request.job_type = non_empty(form.job_type).map(|t| t.parse()).transpose()?;
        request.results_wanted =
            parse_number("Results wanted", form.results_wanted)?.unwrap_or(DEFAULT_RESULTS_WANTED);
        request.hours_old = parse_number("Hours old", form.hours_old)?;
        request.is_remote = is_checked(&form.is_remote);
        request.easy_apply = is_checked(&form.easy_apply);
        request.linkedin_fetch_description = is_checked(&form.linkedin_fetch_description);
        request.enforce_annual_salary = is_checked(&form.enforce_annual_salary);
        request.description_format = non_empty(form.description_format)
            .map(|f| f.parse())
            .transpose()?
            .unwrap_or_default();
        request.verbose = parse_number("Verbose", form.verbose)?.unwrap_or(DEFAULT_VERBOSE);
        request.user_agent = non_empty(form.user_agent);
        request.linkedin_company_ids = parse_company_ids(form.linkedin_company_ids)?;
        request.proxies = parse_proxies(form.proxies);

        Ok(request)
    }
}

#[derive(Debug, Serialize)]
#[serde(crate = "rocket::serde")]
pub struct SearchResponse {
    pub success: bool,
    pub table_html: String,
    pub job_count: usize,
    pub result_id: String,
}

impl SearchResponse {
    pub fn success(table_html: String, job_count: usize, result_id: String) -> Self {
        Self {
            success: true,
            table_html,
            job_count,
            result_id,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(crate = "rocket::serde")]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: String) -> Self {
        Self { error }
    }
}

/// Attachment response for exported results.
pub struct FileDownload(pub ExportFile);

impl<'r> Responder<'r, 'static> for FileDownload {
    fn respond_to(self, _: &'r Request<'_>) -> response::Result<'static> {
        let ExportFile {
            data,
            filename,
            format,
        } = self.0;

        let content_type = match format {
            ExportFormat::Csv => ContentType::CSV,
            ExportFormat::Excel => ContentType::new(
                "application",
                "vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            ),
        };

        Response::build()
            .header(content_type)
            .raw_header(
                "Content-Disposition",
                format!("attachment; filename=\"{}\"", filename),
            )
            .sized_body(data.len(), std::io::Cursor::new(data))
            .ok()
    }
}
