//! Run searches against an Elasticsearch node

use std::path::PathBuf;

use super::CliError;
use crate::{ElasticBackend, SearchService, SearchSpec, ServiceConfig};

/// Options for the search command
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    /// The request to run
    pub spec: SearchSpec,
    /// JSON config file; defaults apply when absent
    pub config_path: Option<PathBuf>,
    /// Overrides the configured backend URL
    pub backend_url: Option<String>,
    /// Overrides the configured page size
    pub page_size: Option<usize>,
}

/// Resolve the service config: file (if any), then command-line overrides.
pub fn load_config(options: &SearchOptions) -> Result<ServiceConfig, CliError> {
    let mut config = match &options.config_path {
        Some(path) => ServiceConfig::from_file(path)?,
        None => ServiceConfig::default(),
    };
    if let Some(url) = &options.backend_url {
        config = config.with_backend_url(url.clone());
    }
    if let Some(size) = options.page_size {
        config = config.with_page_size(size);
    }
    Ok(config)
}

/// Execute a search and return its results as a JSON object
pub fn execute_search(options: &SearchOptions) -> Result<serde_json::Value, CliError> {
    if options.spec.esl_text.trim().is_empty() {
        return Err(CliError::NoInput);
    }

    let config = load_config(options)?;
    let backend = ElasticBackend::new(&config).map_err(|e| CliError::Search(e.into()))?;
    let service = SearchService::new(backend, config);

    let results = service.search(&options.spec)?;
    Ok(serde_json::to_value(&results)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_apply_over_defaults() {
        let options = SearchOptions {
            backend_url: Some("http://es:9200".into()),
            page_size: Some(500),
            ..Default::default()
        };
        let config = load_config(&options).unwrap();
        assert_eq!(config.backend_url, "http://es:9200");
        assert_eq!(config.page_size, 500);
        assert_eq!(config.scroll_keepalive, "1m");
    }

    #[test]
    fn test_missing_config_file() {
        let options = SearchOptions {
            config_path: Some(PathBuf::from("/nonexistent/esl-search.json")),
            ..Default::default()
        };
        assert!(matches!(load_config(&options), Err(CliError::Config(_))));
    }

    #[test]
    fn test_empty_query_never_reaches_backend() {
        let options = SearchOptions::default();
        assert!(matches!(execute_search(&options), Err(CliError::NoInput)));
    }
}
