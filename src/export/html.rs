// src/export/html.rs
use html_escape::{encode_double_quoted_attribute, encode_text};
use std::fmt::Write;

use super::cell_text;
use crate::search::SearchResult;

pub const NO_RESULTS_HTML: &str =
    r#"<p class="text-muted">No jobs found for your search criteria.</p>"#;

/// Columns shown in the results page, in display order.
pub const DISPLAY_COLUMNS: [&str; 7] = [
    "title",
    "company",
    "location",
    "job_type",
    "date_posted",
    "job_url",
    "site",
];

pub fn render_table(result: &SearchResult) -> String {
    let jobs = &result.jobs;
    if jobs.is_empty() {
        return NO_RESULTS_HTML.to_string();
    }

    let columns: Vec<&str> = DISPLAY_COLUMNS
        .into_iter()
        .filter(|column| jobs.has_column(column))
        .collect();

    let mut html = String::from(
        "<table border=\"1\" class=\"dataframe table table-striped table-hover\" id=\"jobsTable\">\n",
    );
    html.push_str("  <thead>\n    <tr style=\"text-align: right;\">\n");
    for column in &columns {
        let _ = writeln!(html, "      <th>{}</th>", encode_text(column));
    }
    html.push_str("    </tr>\n  </thead>\n  <tbody>\n");

    for record in jobs.records() {
        html.push_str("    <tr>\n");
        for column in &columns {
            let cell = if *column == "job_url" {
                record
                    .job_url()
                    .map(|url| {
                        format!(
                            "<a href=\"{}\" target=\"_blank\">View Job</a>",
                            encode_double_quoted_attribute(url)
                        )
                    })
                    .unwrap_or_default()
            } else {
                encode_text(&cell_text(record.get(column))).into_owned()
            };
            let _ = writeln!(html, "      <td>{}</td>", cell);
        }
        html.push_str("    </tr>\n");
    }

    html.push_str("  </tbody>\n</table>");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scraper::{JobRecord, JobTable};
    use crate::search::orchestrator::tests::sample_table;
    use crate::search::{SearchRequest, Site};
    use scraper::{Html, Selector};
    use serde_json::json;

    fn result_with(jobs: JobTable) -> SearchResult {
        SearchResult::new(jobs, SearchRequest::new(Site::Indeed, "engineer").resolve())
    }

    fn cells(html: &str, selector: &str) -> Vec<String> {
        let document = Html::parse_fragment(html);
        let selector = Selector::parse(selector).unwrap();
        document
            .select(&selector)
            .map(|e| e.text().collect::<String>())
            .collect()
    }

    #[test]
    fn test_empty_result_renders_no_results_message() {
        let html = render_table(&result_with(JobTable::new(
            vec!["title".to_string()],
            Vec::new(),
        )));
        assert_eq!(html, NO_RESULTS_HTML);
        assert!(!html.contains("<table"));
    }

    #[test]
    fn test_headers_follow_display_order_and_skip_missing_columns() {
        let html = render_table(&result_with(sample_table()));

        assert_eq!(
            cells(&html, "thead th"),
            ["title", "company", "location", "job_type", "date_posted", "job_url", "site"]
        );
        assert!(!html.contains("<th>id</th>"));
    }

    #[test]
    fn test_job_url_becomes_link_or_blank() {
        let html = render_table(&result_with(sample_table()));
        let document = Html::parse_fragment(&html);
        let link = Selector::parse("a").unwrap();

        let links: Vec<_> = document.select(&link).collect();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].value().attr("href"), Some("https://example.com/jobs/1"));
        assert_eq!(links[0].value().attr("target"), Some("_blank"));
        assert_eq!(links[0].text().collect::<String>(), "View Job");

        let second_row = cells(&html, "tbody tr:nth-child(2) td");
        assert_eq!(second_row[5], "");
        assert_eq!(second_row[3], "");
    }

    #[test]
    fn test_cell_text_is_escaped() {
        let columns = vec!["title".to_string(), "company".to_string()];
        let record = JobRecord::new(
            columns
                .iter()
                .cloned()
                .zip([json!("<script>alert(1)</script>"), json!("A&B")])
                .collect(),
        );
        let html = render_table(&result_with(JobTable::new(columns, vec![record])));

        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("A&amp;B"));
        assert_eq!(cells(&html, "tbody td"), ["<script>alert(1)</script>", "A&B"]);
    }
}
