use crate::fetch::{FileSource, HttpSource, UserSource};
use crate::statics;
use anyhow::Context;
use std::{path::PathBuf, sync::Arc, time::Duration};

#[derive(Debug, Clone, PartialEq)]
pub enum SourceConfig {
    Http { url: String, timeout: Duration },
    File(PathBuf),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub source: SourceConfig,
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            source: SourceConfig::Http {
                url: statics::DEFAULT_USERS_URL.to_string(),
                timeout: Duration::from_secs(statics::DEFAULT_TIMEOUT_SECS),
            },
            log_filter: statics::DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from a key lookup. Empty values count as unset.
    /// A file source takes precedence over the URL.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(filter) = get(statics::ENV_LOG) {
            config.log_filter = filter;
        }

        if let Some(path) = get(statics::ENV_USERS_FILE) {
            config.source = SourceConfig::File(PathBuf::from(path));
            return Ok(config);
        }

        let url =
            get(statics::ENV_USERS_URL).unwrap_or_else(|| statics::DEFAULT_USERS_URL.to_string());
        let timeout_secs = match get(statics::ENV_TIMEOUT_SECS) {
            Some(raw) => raw.trim().parse::<u64>().with_context(|| {
                format!(
                    "{}={raw:?} is not a whole number of seconds",
                    statics::ENV_TIMEOUT_SECS
                )
            })?,
            None => statics::DEFAULT_TIMEOUT_SECS,
        };
        config.source = SourceConfig::Http {
            url,
            timeout: Duration::from_secs(timeout_secs),
        };
        Ok(config)
    }

    pub fn build_source(&self) -> Arc<dyn UserSource> {
        match &self.source {
            SourceConfig::Http { url, timeout } => Arc::new(HttpSource::new(url.clone(), *timeout)),
            SourceConfig::File(path) => Arc::new(FileSource::new(path.clone())),
        }
    }
}
