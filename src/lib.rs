//! Corpus toolkit for biomedical relation extraction: tag abstracts with
//! tmVar, tokenize them, and generate entity-pair candidate edges.

pub mod cli;
pub mod config;
pub mod corpus;
pub mod edges;
pub mod logging;
pub mod tagger;
pub mod tokenize;

pub use corpus::{Annotation, Corpus, Document, Edge, Part, Token};
pub use edges::{Combinator, EdgePolicy, SentenceDistance, WordFilter};
