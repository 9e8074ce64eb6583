//! HTTP clients for the remote situgraph services.
//!
//! The core is offline; everything remote goes through this crate:
//!
//! - `GET /stats`: corpus counts for the status display,
//! - `GET /forms`: per-shape form-field metadata (loaded once per session),
//! - `GET /lookup?verb=`: lemma lookup driving shape selection,
//! - `POST /infer`: inference/validation over the full buffer (plain text
//!   in, rewritten serialization + statistics out),
//! - `POST /save`: persist the buffer to the graph store.
//!
//! Failure policy: any non-success status or malformed JSON is surfaced as a
//! typed error and the caller leaves the buffer unmodified. There are no
//! retries and no partial application of a rewritten buffer.
//!
//! The [`KnowledgeService`] trait exists so session logic can be exercised
//! against [`MockService`] without a network.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use situgraph_model::ShapeCatalog;

/// Base URL override; falls back to the public demo deployment.
pub const SITUGRAPH_API_BASE_URL_ENV: &str = "SITUGRAPH_API_BASE_URL";
/// Request timeout override, in seconds.
pub const SITUGRAPH_API_TIMEOUT_SECS_ENV: &str = "SITUGRAPH_API_TIMEOUT_SECS";

const DEFAULT_API_BASE_URL: &str = "https://shacl-api-docker.onrender.com/api";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("failed to build http client: {0}")]
    Build(#[source] reqwest::Error),
    #[error("failed to reach {url} (is the service online?): {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} returned http {status}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },
    #[error("{url} returned invalid JSON: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("inference service reported failure (no rewritten data)")]
    InferenceRejected,
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceStats {
    #[serde(default)]
    pub shapes: u64,
    #[serde(default)]
    pub roles: u64,
    #[serde(default)]
    pub rules: u64,
    #[serde(default)]
    pub lemmas: u64,
    #[serde(default)]
    pub senses: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sense {
    pub id: String,
    #[serde(default)]
    pub gloss: String,
    /// Target shape identifiers this sense can be entered under.
    #[serde(default)]
    pub situations: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupResponse {
    #[serde(default)]
    pub found: bool,
    #[serde(default)]
    pub senses: Vec<Sense>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InferenceStats {
    #[serde(default)]
    pub input_count: u64,
    #[serde(default)]
    pub inferred_count: u64,
    #[serde(default)]
    pub total_count: u64,
}

/// Successful inference: the rewritten serialization replaces the buffer
/// wholesale, never merged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InferenceOutcome {
    pub rewritten: String,
    pub stats: InferenceStats,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    #[serde(default)]
    pub conforms: bool,
    #[serde(default)]
    pub report_text: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct InferenceResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    inferred_data: Option<String>,
    #[serde(default)]
    stats: InferenceStats,
    #[serde(default)]
    conforms: bool,
    #[serde(default)]
    report_text: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct FormsResponse {
    #[serde(default)]
    forms: ShapeCatalog,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct SaveResponse {
    #[serde(rename = "tripleCount", default)]
    triple_count: u64,
}

// ============================================================================
// Service trait
// ============================================================================

/// Everything the session controller needs from the remote side.
pub trait KnowledgeService {
    fn stats(&self) -> Result<ServiceStats, ClientError>;
    fn forms(&self) -> Result<ShapeCatalog, ClientError>;
    fn lookup(&self, verb: &str) -> Result<LookupResponse, ClientError>;
    fn infer(&self, turtle: &str) -> Result<InferenceOutcome, ClientError>;
    fn validate(&self, turtle: &str) -> Result<ValidationReport, ClientError>;
    /// Returns the persisted triple count.
    fn save(&self, turtle: &str) -> Result<u64, ClientError>;
}

// ============================================================================
// HTTP client
// ============================================================================

fn normalize_base_url(url: &str) -> String {
    let trimmed = url.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        DEFAULT_API_BASE_URL.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Resolve the base URL: env var when set and non-empty, else the default.
pub fn base_url_from_env() -> String {
    match std::env::var(SITUGRAPH_API_BASE_URL_ENV) {
        Ok(v) => normalize_base_url(&v),
        Err(_) => DEFAULT_API_BASE_URL.to_string(),
    }
}

fn timeout_from_env() -> Duration {
    let secs = std::env::var(SITUGRAPH_API_TIMEOUT_SECS_ENV)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(DEFAULT_TIMEOUT_SECS);
    Duration::from_secs(secs.max(1))
}

pub struct ApiClient {
    base_url: String,
    http: reqwest::blocking::Client,
}

impl ApiClient {
    /// Client against an explicit base URL (no trailing slash needed).
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(timeout_from_env())
            .build()
            .map_err(ClientError::Build)?;
        Ok(Self {
            base_url: normalize_base_url(base_url),
            http,
        })
    }

    /// Client configured from the environment.
    pub fn from_env() -> Result<Self, ClientError> {
        Self::new(&base_url_from_env())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ClientError> {
        let url = format!("{}/{path}", self.base_url);
        debug!(%url, "GET");
        let resp = self
            .http
            .get(&url)
            .query(query)
            .send()
            .map_err(|source| ClientError::Transport {
                url: url.clone(),
                source,
            })?;
        Self::decode(url, resp)
    }

    fn post_turtle<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        turtle: &str,
    ) -> Result<T, ClientError> {
        let url = format!("{}/{path}", self.base_url);
        debug!(%url, bytes = turtle.len(), "POST text/turtle body");
        let resp = self
            .http
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, "text/plain")
            .body(turtle.to_string())
            .send()
            .map_err(|source| ClientError::Transport {
                url: url.clone(),
                source,
            })?;
        Self::decode(url, resp)
    }

    fn decode<T: serde::de::DeserializeOwned>(
        url: String,
        resp: reqwest::blocking::Response,
    ) -> Result<T, ClientError> {
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(ClientError::Status {
                url,
                status: status.as_u16(),
                body,
            });
        }
        resp.json()
            .map_err(|source| ClientError::Decode { url, source })
    }
}

impl KnowledgeService for ApiClient {
    fn stats(&self) -> Result<ServiceStats, ClientError> {
        self.get_json("stats", &[])
    }

    fn forms(&self) -> Result<ShapeCatalog, ClientError> {
        let resp: FormsResponse = self.get_json("forms", &[])?;
        Ok(resp.forms)
    }

    fn lookup(&self, verb: &str) -> Result<LookupResponse, ClientError> {
        self.get_json("lookup", &[("verb", verb)])
    }

    fn infer(&self, turtle: &str) -> Result<InferenceOutcome, ClientError> {
        let resp: InferenceResponse = self.post_turtle("infer", turtle)?;
        match (resp.success, resp.inferred_data) {
            (true, Some(rewritten)) => Ok(InferenceOutcome {
                rewritten,
                stats: resp.stats,
            }),
            _ => Err(ClientError::InferenceRejected),
        }
    }

    fn validate(&self, turtle: &str) -> Result<ValidationReport, ClientError> {
        let resp: InferenceResponse = self.post_turtle("infer", turtle)?;
        Ok(ValidationReport {
            conforms: resp.conforms,
            report_text: resp.report_text,
        })
    }

    fn save(&self, turtle: &str) -> Result<u64, ClientError> {
        let resp: SaveResponse = self.post_turtle("save", turtle)?;
        Ok(resp.triple_count)
    }
}

// ============================================================================
// Mock service for tests
// ============================================================================

/// Canned-response service used by session tests; no network involved.
#[derive(Debug, Clone, Default)]
pub struct MockService {
    pub stats: ServiceStats,
    pub forms: ShapeCatalog,
    pub lookup: LookupResponse,
    /// `None` makes `infer` report a rejection.
    pub inferred_data: Option<String>,
    pub inference_stats: InferenceStats,
    pub validation: ValidationReport,
    pub triple_count: u64,
}

impl KnowledgeService for MockService {
    fn stats(&self) -> Result<ServiceStats, ClientError> {
        Ok(self.stats.clone())
    }

    fn forms(&self) -> Result<ShapeCatalog, ClientError> {
        Ok(self.forms.clone())
    }

    fn lookup(&self, _verb: &str) -> Result<LookupResponse, ClientError> {
        Ok(self.lookup.clone())
    }

    fn infer(&self, _turtle: &str) -> Result<InferenceOutcome, ClientError> {
        match &self.inferred_data {
            Some(rewritten) => Ok(InferenceOutcome {
                rewritten: rewritten.clone(),
                stats: self.inference_stats,
            }),
            None => Err(ClientError::InferenceRejected),
        }
    }

    fn validate(&self, _turtle: &str) -> Result<ValidationReport, ClientError> {
        Ok(self.validation.clone())
    }

    fn save(&self, _turtle: &str) -> Result<u64, ClientError> {
        Ok(self.triple_count)
    }
}
