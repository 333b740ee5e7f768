// src/config.rs
//! Service configuration: optional `config.yaml` with per-environment
//! sections, then environment variable overrides.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::cache::{ResultCache, DEFAULT_CACHE_CAPACITY};
use crate::scraper::{CommandJobSource, HttpJobSource, JobSource};
use crate::search::JobSearchService;

pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";
pub const DEFAULT_SCRAPER_URL: &str = "http://127.0.0.1:5001/scrape";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub scraper: ScraperSettings,
    pub cache: CacheSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub debug: bool,
    /// JSON log file in addition to stdout
    pub log_file: Option<PathBuf>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            debug: false,
            log_file: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScraperSettings {
    pub backend: ScraperBackend,
    /// No limit when unset
    pub timeout_seconds: Option<u64>,
}

impl Default for ScraperSettings {
    fn default() -> Self {
        Self {
            backend: ScraperBackend::Http {
                url: DEFAULT_SCRAPER_URL.to_string(),
            },
            timeout_seconds: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ScraperBackend {
    Http {
        url: String,
    },
    Command {
        program: String,
        #[serde(default)]
        args: Vec<String>,
    },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    pub capacity: usize,
    pub ttl_seconds: Option<u64>,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CACHE_CAPACITY,
            ttl_seconds: None,
        }
    }
}

/// Where [`AppConfig::load`] found its settings.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    File(PathBuf),
    Defaults,
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    local: AppConfig,
    #[serde(default)]
    production: AppConfig,
}

impl AppConfig {
    /// Load the section for the current environment, falling back to
    /// defaults when the file does not exist.
    /// The caller logs the returned [`ConfigSource`].
    pub fn load(path: &Path) -> Result<(Self, ConfigSource)> {
        Self::load_with(path, &Self::get_environment(), |key| std::env::var(key).ok())
    }

    fn load_with<F>(path: &Path, environment: &str, lookup: F) -> Result<(Self, ConfigSource)>
    where
        F: Fn(&str) -> Option<String>,
    {
        let (mut config, source) = if path.exists() {
            (
                Self::load_from_file(path, environment)?,
                ConfigSource::File(path.to_path_buf()),
            )
        } else {
            (Self::default(), ConfigSource::Defaults)
        };

        config.apply_env_overrides(lookup)?;
        config.validate()?;
        Ok((config, source))
    }

    pub fn get_environment() -> String {
        std::env::var("JOBSPY_ENV")
            .or_else(|_| std::env::var("ENVIRONMENT"))
            .or_else(|_| std::env::var("ENV"))
            .unwrap_or_else(|_| "local".to_string())
    }

    fn load_from_file(path: &Path, environment: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        Self::from_yaml(&content, environment)
            .with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn from_yaml(content: &str, environment: &str) -> Result<Self> {
        let file: ConfigFile = serde_yaml::from_str(content)?;
        Ok(match environment {
            "production" => file.production,
            _ => file.local,
        })
    }

    /// `HOST`, `PORT`, `DEBUG`, `JOBSPY_SCRAPER_URL`, `JOBSPY_SCRAPER_COMMAND`
    /// and `JOBSPY_SCRAPER_TIMEOUT` win over the file.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(host) = lookup("HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .trim()
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid port number"))?;
        }
        if let Some(debug) = lookup("DEBUG") {
            self.server.debug = debug.trim().eq_ignore_ascii_case("true");
        }
        if let Some(url) = lookup("JOBSPY_SCRAPER_URL") {
            self.scraper.backend = ScraperBackend::Http { url };
        }
        if let Some(command) = lookup("JOBSPY_SCRAPER_COMMAND") {
            let mut parts = command.split_whitespace().map(str::to_string);
            let program = parts
                .next()
                .context("JOBSPY_SCRAPER_COMMAND must not be empty")?;
            self.scraper.backend = ScraperBackend::Command {
                program,
                args: parts.collect(),
            };
        }
        if let Some(timeout) = lookup("JOBSPY_SCRAPER_TIMEOUT") {
            let seconds = timeout
                .trim()
                .parse()
                .map_err(|_| anyhow::anyhow!("JOBSPY_SCRAPER_TIMEOUT must be a number of seconds"))?;
            self.scraper.timeout_seconds = Some(seconds);
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.cache.capacity == 0 {
            anyhow::bail!("cache.capacity must be greater than zero");
        }
        if self.scraper.timeout_seconds == Some(0) {
            anyhow::bail!("scraper.timeout_seconds must be greater than zero");
        }
        Ok(())
    }

    pub fn scraper_timeout(&self) -> Option<Duration> {
        self.scraper.timeout_seconds.map(Duration::from_secs)
    }

    pub fn job_source(&self) -> Result<Arc<dyn JobSource>> {
        let source: Arc<dyn JobSource> = match &self.scraper.backend {
            ScraperBackend::Http { url } => {
                Arc::new(HttpJobSource::new(url.clone(), self.scraper_timeout())?)
            }
            ScraperBackend::Command { program, args } => {
                Arc::new(CommandJobSource::new(program.clone(), args.clone()))
            }
        };
        Ok(source)
    }

    pub fn search_service(&self) -> Result<JobSearchService> {
        Ok(JobSearchService::new(self.job_source()?).with_timeout(self.scraper_timeout()))
    }

    pub fn result_cache(&self) -> Result<ResultCache> {
        let capacity = NonZeroUsize::new(self.cache.capacity)
            .context("cache.capacity must be greater than zero")?;
        Ok(ResultCache::new(
            capacity,
            self.cache.ttl_seconds.map(Duration::from_secs),
        ))
    }
}
