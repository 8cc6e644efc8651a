//! External entity tagging backed by the tmVar annotation service.
//!
//! Fetching and merging are separate steps: [`TmVarTagger::fetch`] fills the
//! response cache and reports what happened per identifier, and
//! [`TmVarTagger::merge_into`] turns cached responses into corpus documents.

pub mod cache;
pub mod tmvar;

pub use cache::AnnotationCache;
pub use tmvar::{TmVarClient, TmVarResponse, MUTATION_CLASS};

use std::{collections::HashSet, path::PathBuf};

use async_trait::async_trait;
use indexmap::IndexMap;
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::corpus::Corpus;

#[derive(Debug, Error)]
pub enum TagError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("annotation service returned {status} for {id}")]
    Status {
        id: String,
        status: reqwest::StatusCode,
    },

    #[error("cache I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cache serialisation failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Raw answer from an annotation service for one identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceResponse {
    Body(String),
    NotFound,
}

/// Source of raw denotation payloads, one request per identifier.
#[async_trait]
pub trait DenotationService: Send + Sync {
    async fn fetch(&self, id: &str) -> Result<ServiceResponse, TagError>;
}

/// What happened to one identifier during [`TmVarTagger::fetch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Already cached; no request issued.
    Cached,
    Fetched,
    NotFound,
    /// Response was not a usable JSON payload; nothing cached.
    Malformed,
}

/// Per-identifier outcomes of a fetch run, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchReport {
    pub outcomes: IndexMap<String, FetchOutcome>,
}

impl FetchReport {
    pub fn outcome(&self, id: &str) -> Option<FetchOutcome> {
        self.outcomes.get(id).copied()
    }

    fn count(&self, wanted: FetchOutcome) -> usize {
        self.outcomes.values().filter(|o| **o == wanted).count()
    }

    pub fn cached(&self) -> usize {
        self.count(FetchOutcome::Cached)
    }

    pub fn fetched(&self) -> usize {
        self.count(FetchOutcome::Fetched)
    }

    pub fn not_found(&self) -> usize {
        self.count(FetchOutcome::NotFound)
    }

    pub fn malformed(&self) -> usize {
        self.count(FetchOutcome::Malformed)
    }

    /// Requests issued against the service.
    pub fn requests(&self) -> usize {
        self.outcomes.len() - self.cached()
    }
}

/// Tags abstracts with mutation mentions from tmVar, caching raw responses.
pub struct TmVarTagger<S> {
    service: S,
    cache: AnnotationCache,
}

impl<S: DenotationService> TmVarTagger<S> {
    pub fn new(service: S, cache: AnnotationCache) -> Self {
        Self { service, cache }
    }

    pub fn cache(&self) -> &AnnotationCache {
        &self.cache
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// Request every identifier missing from the cache, then rewrite the
    /// cache file. Repeated identifiers are handled once. Transport failures
    /// abort the whole batch.
    #[instrument(skip_all, fields(ids = ids.len()))]
    pub async fn fetch(&mut self, ids: &[String]) -> Result<FetchReport, TagError> {
        let mut report = FetchReport::default();
        for id in ids {
            if report.outcomes.contains_key(id) {
                continue;
            }
            if self.cache.contains(id) {
                report.outcomes.insert(id.clone(), FetchOutcome::Cached);
                continue;
            }
            let outcome = match self.service.fetch(id).await? {
                ServiceResponse::NotFound => FetchOutcome::NotFound,
                ServiceResponse::Body(body) => match TmVarResponse::parse(&body) {
                    Ok((raw, _)) => {
                        self.cache.insert(id.clone(), raw);
                        FetchOutcome::Fetched
                    }
                    Err(err) => {
                        warn!(%id, error = %err, "malformed tmVar response");
                        FetchOutcome::Malformed
                    }
                },
            };
            report.outcomes.insert(id.clone(), outcome);
        }
        self.cache.save()?;
        info!(
            fetched = report.fetched(),
            cached = report.cached(),
            not_found = report.not_found(),
            malformed = report.malformed(),
            "tmVar fetch complete"
        );
        Ok(report)
    }

    /// Add one document per cached identifier to `corpus`, replacing any
    /// document with the same id. Returns the number of documents merged.
    pub fn merge_into(&self, ids: &[String], corpus: &mut Corpus) -> usize {
        let mut merged = 0;
        let mut seen = HashSet::new();
        for id in ids {
            if !seen.insert(id.as_str()) {
                continue;
            }
            let Some(raw) = self.cache.get(id) else {
                continue;
            };
            match TmVarResponse::from_value(raw) {
                Ok(response) => {
                    corpus.insert(id.clone(), response.into_document(id));
                    merged += 1;
                }
                Err(err) => warn!(%id, error = %err, "cached response unusable; skipping"),
            }
        }
        info!(merged, documents = corpus.len(), "merged tmVar documents");
        merged
    }

    /// Fetch then merge.
    pub async fn tag(&mut self, ids: &[String], corpus: &mut Corpus) -> Result<FetchReport, TagError> {
        let report = self.fetch(ids).await?;
        self.merge_into(ids, corpus);
        Ok(report)
    }
}
