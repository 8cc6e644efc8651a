//! Candidate edge generation between annotated entities.
//!
//! Each policy is immutable configuration plus a pure `edges_for_part`;
//! [`EdgePolicy::generate`] is the only place part edge lists are written.

pub mod distance;
pub mod word_filter;

pub use distance::SentenceDistance;
pub use word_filter::WordFilter;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::corpus::{Corpus, Edge, Part};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EdgeError {
    #[error("a combinator needs at least two policies, got {0}")]
    TooFewPolicies(usize),
}

/// Runs two or more policies over the same parts, concatenating their edges.
/// Duplicates across policies are kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CombinatorSpec")]
pub struct Combinator {
    policies: Vec<EdgePolicy>,
}

#[derive(Deserialize)]
struct CombinatorSpec {
    policies: Vec<EdgePolicy>,
}

impl TryFrom<CombinatorSpec> for Combinator {
    type Error = EdgeError;

    fn try_from(spec: CombinatorSpec) -> Result<Self, Self::Error> {
        Self::new(spec.policies)
    }
}

impl Combinator {
    pub fn new(policies: Vec<EdgePolicy>) -> Result<Self, EdgeError> {
        if policies.len() < 2 {
            return Err(EdgeError::TooFewPolicies(policies.len()));
        }
        Ok(Self { policies })
    }

    pub fn policies(&self) -> &[EdgePolicy] {
        &self.policies
    }
}

/// Closed set of edge generation policies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum EdgePolicy {
    SentenceDistance(SentenceDistance),
    WordFilter(WordFilter),
    Combinator(Combinator),
}

impl EdgePolicy {
    pub fn entity1_class(&self) -> &str {
        match self {
            Self::SentenceDistance(p) => &p.entity1_class,
            Self::WordFilter(p) => &p.entity1_class,
            Self::Combinator(c) => c.policies[0].entity1_class(),
        }
    }

    pub fn entity2_class(&self) -> &str {
        match self {
            Self::SentenceDistance(p) => &p.entity2_class,
            Self::WordFilter(p) => &p.entity2_class,
            Self::Combinator(c) => c.policies[0].entity2_class(),
        }
    }

    pub fn relation_type(&self) -> &str {
        match self {
            Self::SentenceDistance(p) => &p.relation_type,
            Self::WordFilter(p) => &p.relation_type,
            Self::Combinator(c) => c.policies[0].relation_type(),
        }
    }

    /// Edges this policy derives from one part, without touching the part.
    pub fn edges_for_part(&self, part: &Part) -> Vec<Edge> {
        match self {
            Self::SentenceDistance(p) => p.edges_for_part(part),
            Self::WordFilter(p) => p.edges_for_part(part),
            Self::Combinator(c) => c
                .policies
                .iter()
                .flat_map(|policy| policy.edges_for_part(part))
                .collect(),
        }
    }

    /// Whether `generate` drops existing edges before appending.
    fn clears_existing(&self) -> bool {
        match self {
            Self::SentenceDistance(p) => p.clear_existing,
            Self::WordFilter(_) | Self::Combinator(_) => true,
        }
    }

    /// Write edges into every part of the corpus. Returns the number of edges
    /// produced by this run.
    pub fn generate(&self, corpus: &mut Corpus) -> usize {
        let clear = self.clears_existing();
        let mut produced = 0;
        for part in corpus.parts_mut() {
            let edges = self.edges_for_part(part);
            produced += edges.len();
            if clear {
                part.edges.clear();
            }
            part.edges.extend(edges);
        }
        info!(
            relation = self.relation_type(),
            entity1 = self.entity1_class(),
            entity2 = self.entity2_class(),
            produced,
            "generated edges"
        );
        produced
    }
}

impl From<SentenceDistance> for EdgePolicy {
    fn from(policy: SentenceDistance) -> Self {
        Self::SentenceDistance(policy)
    }
}

impl From<WordFilter> for EdgePolicy {
    fn from(policy: WordFilter) -> Self {
        Self::WordFilter(policy)
    }
}

impl From<Combinator> for EdgePolicy {
    fn from(policy: Combinator) -> Self {
        Self::Combinator(policy)
    }
}
