//! tmVar RESTful client and response model.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};
use urlencoding::encode;

use super::{DenotationService, ServiceResponse, TagError};
use crate::{
    config::Settings,
    corpus::{char_slice, Annotation, Document, Part},
};

/// Default tmTools endpoint; `{id}` is replaced by the PubMed identifier.
pub const TMVAR_URL_TEMPLATE: &str =
    "https://www.ncbi.nlm.nih.gov/CBBresearch/Lu/Demo/RESTful/tmTool.cgi/Mutation/{id}/JSON/";

/// Class id assigned to every tmVar denotation.
pub const MUTATION_CLASS: &str = "e_2";

/// Name of the single part built from a tmVar response.
pub const ABSTRACT_PART: &str = "abstract";

/// The subset of a tmVar JSON response the tagger relies on.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TmVarResponse {
    pub text: String,
    pub denotations: Vec<Denotation>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Denotation {
    pub span: DenotationSpan,
}

/// Char offsets `[begin, end)` into the response text.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct DenotationSpan {
    pub begin: usize,
    pub end: usize,
}

impl TmVarResponse {
    /// Parse a raw body, keeping the untouched JSON for the cache.
    pub fn parse(body: &str) -> Result<(Value, Self), serde_json::Error> {
        let raw: Value = serde_json::from_str(body)?;
        let response = Self::deserialize(&raw)?;
        Ok((raw, response))
    }

    pub fn from_value(raw: &Value) -> Result<Self, serde_json::Error> {
        Self::deserialize(raw)
    }

    /// Build a document with one `"abstract"` part whose gold annotations are
    /// the denotations. Spans outside the text are dropped.
    pub fn into_document(self, id: &str) -> Document {
        let mut part = Part::new(self.text);
        for denotation in &self.denotations {
            let DenotationSpan { begin, end } = denotation.span;
            let Some(text) = char_slice(&part.text, begin, end) else {
                warn!(%id, begin, end, "denotation span outside text; skipping");
                continue;
            };
            if let Err(err) = part.push_annotation(Annotation::new(MUTATION_CLASS, begin, text)) {
                warn!(%id, error = %err, "rejected denotation");
            }
        }
        debug!(%id, annotations = part.annotations.len(), "built document from tmVar response");
        Document::new().with_part(ABSTRACT_PART, part)
    }
}

/// HTTP client for the tmVar RESTful API.
#[derive(Debug, Clone)]
pub struct TmVarClient {
    client: Client,
    url_template: String,
}

impl TmVarClient {
    pub fn new(settings: &Settings) -> Result<Self, TagError> {
        let client = Client::builder()
            .user_agent(format!("bioedge/0.1 (+{})", settings.contact_email))
            .gzip(true)
            .brotli(true)
            .build()?;
        Ok(Self {
            client,
            url_template: settings.tmvar_url.clone(),
        })
    }

    pub fn url_for(&self, id: &str) -> String {
        self.url_template.replace("{id}", &encode(id))
    }
}

#[async_trait]
impl DenotationService for TmVarClient {
    async fn fetch(&self, id: &str) -> Result<ServiceResponse, TagError> {
        let url = self.url_for(id);
        debug!(%url, "requesting tmVar annotations");
        let resp = self.client.get(&url).send().await?;
        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(ServiceResponse::NotFound);
        }
        if !status.is_success() {
            return Err(TagError::Status {
                id: id.to_string(),
                status,
            });
        }
        let body = resp.text().await?;
        if body.trim().is_empty() {
            return Ok(ServiceResponse::NotFound);
        }
        Ok(ServiceResponse::Body(body))
    }
}
