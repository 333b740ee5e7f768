// src/scraper/command_source.rs
use anyhow::{Context, Result};
use std::io;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info, warn};

use super::{JobSource, JobTable};
use crate::search::ResolvedSearchParameters;

/// Runs a local scraper program: parameters as JSON on stdin, table as JSON on stdout.
pub struct CommandJobSource {
    program: String,
    args: Vec<String>,
}

impl CommandJobSource {
    pub fn new(program: String, args: Vec<String>) -> Self {
        Self { program, args }
    }
}

#[rocket::async_trait]
impl JobSource for CommandJobSource {
    async fn scrape_jobs(&self, params: &ResolvedSearchParameters) -> Result<JobTable> {
        let payload = serde_json::to_vec(params).context("Failed to encode search parameters")?;

        info!("Running scraper command: {} {:?}", self.program, self.args);

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("Failed to start scraper command: {}", self.program))?;

        // Programs that take their arguments elsewhere may exit without reading stdin.
        if let Some(mut stdin) = child.stdin.take() {
            match stdin.write_all(&payload).await {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
                    debug!("Scraper command closed stdin before reading parameters");
                }
                Err(e) => return Err(e).context("Failed to send parameters to scraper"),
            }
        }

        let output = child
            .wait_with_output()
            .await
            .context("Failed to wait for scraper command")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!("Scraper command exited with {}", output.status);
            anyhow::bail!("{}", stderr.trim());
        }

        serde_json::from_slice::<JobTable>(&output.stdout)
            .context("Failed to parse scraper output")
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::search::{ResolvedSearchParameters, SearchRequest, Site};

    fn params() -> ResolvedSearchParameters {
        SearchRequest::new(Site::Google, "rust developer").resolve()
    }

    #[tokio::test]
    async fn test_reads_table_from_stdout() {
        let source = CommandJobSource::new(
            "sh".to_string(),
            vec![
                "-c".to_string(),
                r#"cat > /dev/null; echo '{"columns":["title"],"data":[["Rustacean"]]}'"#
                    .to_string(),
            ],
        );

        let table = source.scrape_jobs(&params()).await.unwrap();
        assert_eq!(table.records()[0].title(), Some("Rustacean"));
    }

    #[tokio::test]
    async fn test_program_ignoring_stdin_still_succeeds() {
        let source = CommandJobSource::new(
            "sh".to_string(),
            vec![
                "-c".to_string(),
                r#"echo '{"columns":["title"],"data":[["X"]]}'"#.to_string(),
            ],
        );

        let table = source.scrape_jobs(&params()).await.unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.records()[0].title(), Some("X"));
    }

    #[tokio::test]
    async fn test_non_zero_exit_reports_stderr() {
        let source = CommandJobSource::new(
            "sh".to_string(),
            vec![
                "-c".to_string(),
                "cat > /dev/null; echo 'blocked by captcha' >&2; exit 3".to_string(),
            ],
        );

        let err = source.scrape_jobs(&params()).await.unwrap_err();
        assert!(err.to_string().contains("blocked by captcha"));
    }
}
