//! Elasticsearch backend over the HTTP search and scroll APIs.

use std::time::Duration;

use log::debug;
use reqwest::Url;
use reqwest::blocking::{Client, RequestBuilder};
use serde::Deserialize;
use serde_json::{Value, json};

use super::{BackendError, Hit, Page, PageRequest, SearchBackend};
use crate::config::ServiceConfig;
use crate::output;

/// `hits.total` is a bare number before Elasticsearch 7 and an object after.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Total {
    Count(u64),
    Object { value: u64 },
}

impl Total {
    fn value(&self) -> u64 {
        match self {
            Total::Count(n) | Total::Object { value: n } => *n,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawHit {
    #[serde(rename = "_id")]
    id: String,
    #[serde(rename = "_source")]
    source: Option<Value>,
    fields: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct RawHits {
    total: Total,
    #[serde(default)]
    hits: Vec<RawHit>,
}

#[derive(Debug, Deserialize)]
struct RawResponse {
    #[serde(rename = "_scroll_id")]
    scroll_id: Option<String>,
    hits: RawHits,
}

fn encode(value: Option<Value>) -> Result<Option<Vec<u8>>, BackendError> {
    value
        .filter(|v| !v.is_null())
        .map(|v| serde_json::to_vec(&v))
        .transpose()
        .map_err(BackendError::from)
}

/// Decodes a search or scroll response body.
pub fn parse_page(body: &[u8]) -> Result<Page, BackendError> {
    let raw: RawResponse = serde_json::from_slice(body)?;
    let hits = raw
        .hits
        .hits
        .into_iter()
        .map(|hit| {
            Ok(Hit {
                id: hit.id,
                fields: encode(hit.fields)?,
                source: encode(hit.source)?,
            })
        })
        .collect::<Result<Vec<_>, BackendError>>()?;

    Ok(Page {
        hits,
        total: raw.hits.total.value(),
        cursor: raw.scroll_id,
    })
}

/// Body of the initial search request.
pub fn search_body(request: &PageRequest<'_>) -> Value {
    let mut body = json!({
        "size": request.page_size,
        "query": {
            "bool": {
                "must": [{ "term": { request.app_key_field: request.app_key } }],
                "filter": [output::to_json(request.filter)],
            }
        }
    });
    if !request.fields.is_empty() {
        body["_source"] = Value::Bool(false);
        body["fields"] = json!(request.fields);
    }
    body
}

pub struct ElasticBackend {
    client: Client,
    base_url: Url,
    scroll: String,
}

impl ElasticBackend {
    pub fn new(config: &ServiceConfig) -> Result<Self, BackendError> {
        let base_url = Url::parse(&config.backend_url).map_err(|e| {
            BackendError::Other(format!("invalid backend url {}: {}", config.backend_url, e))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(BackendError::Other(format!(
                "backend url {} cannot take a path",
                config.backend_url
            )));
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(ElasticBackend {
            client,
            base_url,
            scroll: config.scroll_keepalive.clone(),
        })
    }

    /// Base URL with `segments` appended, each percent-encoded as one segment.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn search_url(&self, request: &PageRequest<'_>) -> Url {
        if request.doc_type.is_empty() {
            self.endpoint(&[request.index, "_search"])
        } else {
            self.endpoint(&[request.index, request.doc_type, "_search"])
        }
    }

    fn scroll_url(&self) -> Url {
        self.endpoint(&["_search", "scroll"])
    }

    fn send(&self, builder: RequestBuilder) -> Result<Vec<u8>, BackendError> {
        let response = builder.send()?;
        let status = response.status();
        let bytes = response.bytes()?;
        if !status.is_success() {
            return Err(BackendError::Status {
                code: status.as_u16(),
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }
        Ok(bytes.to_vec())
    }

    fn post(&self, url: Url, body: &Value) -> Result<Page, BackendError> {
        debug!("POST {} {}", url, body);
        let bytes = self.send(self.client.post(url).json(body))?;
        parse_page(&bytes)
    }
}

impl SearchBackend for ElasticBackend {
    fn run_query(&self, request: &PageRequest<'_>) -> Result<Page, BackendError> {
        let mut url = self.search_url(request);
        url.query_pairs_mut().append_pair("scroll", &self.scroll);
        self.post(url, &search_body(request))
    }

    fn resume(&self, cursor: &str) -> Result<Page, BackendError> {
        let body = json!({ "scroll": self.scroll, "scroll_id": cursor });
        self.post(self.scroll_url(), &body)
    }

    fn release(&self, cursor: &str) -> Result<(), BackendError> {
        let url = self.scroll_url();
        debug!("DELETE {}", url);
        let body = json!({ "scroll_id": [cursor] });
        self.send(self.client.delete(url).json(&body))?;
        Ok(())
    }
}
