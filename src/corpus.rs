//! In-memory corpus model shared by the tagging, tokenization and edge stages.

use std::{fs, path::Path, path::PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

/// Errors raised while building or persisting a corpus.
#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("annotation [{offset}, {end}) lies outside part text of {len} chars")]
    AnnotationOutOfBounds { offset: usize, end: usize, len: usize },

    #[error("corpus I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("corpus JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Collection of documents keyed by external identifier, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Corpus {
    #[serde(default)]
    pub documents: IndexMap<String, Document>,
}

/// A document split into named parts such as `"abstract"`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub parts: IndexMap<String, Part>,
}

/// Named section of a document holding text, sentences, annotations and edges.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Part {
    pub text: String,
    /// Sentence strings prior to tokenization.
    #[serde(default)]
    pub raw_sentences: Vec<String>,
    #[serde(default)]
    pub sentences: Vec<Vec<Token>>,
    /// Gold annotations.
    #[serde(default)]
    pub annotations: Vec<Annotation>,
    #[serde(default)]
    pub predicted_annotations: Vec<Annotation>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

/// Tagged span; `offset` counts chars from the start of the part text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    pub class_id: String,
    pub offset: usize,
    pub text: String,
}

/// Word unit with char offsets into the owning part's text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub word: String,
    pub start: usize,
    pub end: usize,
}

/// Candidate relation between two annotations of the same part.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub relation_type: String,
    pub entity1: Annotation,
    pub entity2: Annotation,
    pub sentence1: usize,
    pub sentence2: usize,
}

impl Corpus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a document, replacing any previous document with the same id.
    pub fn insert(&mut self, id: impl Into<String>, document: Document) -> Option<Document> {
        self.documents.insert(id.into(), document)
    }

    pub fn get(&self, id: &str) -> Option<&Document> {
        self.documents.get(id)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn documents(&self) -> impl Iterator<Item = (&String, &Document)> {
        self.documents.iter()
    }

    /// Every part of every document, in document then part order.
    pub fn parts(&self) -> impl Iterator<Item = &Part> {
        self.documents.values().flat_map(|doc| doc.parts.values())
    }

    pub fn parts_mut(&mut self) -> impl Iterator<Item = &mut Part> {
        self.documents
            .values_mut()
            .flat_map(|doc| doc.parts.values_mut())
    }

    pub fn edge_count(&self) -> usize {
        self.parts().map(|part| part.edges.len()).sum()
    }

    /// Read a corpus previously written with [`Corpus::save`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CorpusError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| CorpusError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let corpus: Corpus = serde_json::from_str(&raw)?;
        info!(path = %path.display(), documents = corpus.len(), "loaded corpus");
        Ok(corpus)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), CorpusError> {
        let path = path.as_ref();
        let io_err = |source| CorpusError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let payload = serde_json::to_string_pretty(self)?;
        fs::write(path, payload).map_err(io_err)?;
        info!(path = %path.display(), documents = self.len(), "saved corpus");
        Ok(())
    }
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_part(mut self, name: impl Into<String>, part: Part) -> Self {
        self.parts.insert(name.into(), part);
        self
    }
}

impl Part {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Length of the text in chars, the unit annotation offsets are counted in.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn push_annotation(&mut self, annotation: Annotation) -> Result<(), CorpusError> {
        self.check_bounds(&annotation)?;
        self.annotations.push(annotation);
        Ok(())
    }

    pub fn push_predicted(&mut self, annotation: Annotation) -> Result<(), CorpusError> {
        self.check_bounds(&annotation)?;
        self.predicted_annotations.push(annotation);
        Ok(())
    }

    fn check_bounds(&self, annotation: &Annotation) -> Result<(), CorpusError> {
        let len = self.char_len();
        let end = annotation.end();
        if end > len {
            return Err(CorpusError::AnnotationOutOfBounds {
                offset: annotation.offset,
                end,
                len,
            });
        }
        Ok(())
    }

    /// Index of the first tokenized sentence whose token range
    /// `[first.start, last.end)` covers the annotation offset. `None` when the
    /// part is untokenized or no sentence covers it.
    pub fn sentence_index_for(&self, annotation: &Annotation) -> Option<usize> {
        self.sentences
            .iter()
            .position(|sentence| match (sentence.first(), sentence.last()) {
                (Some(first), Some(last)) => {
                    annotation.offset >= first.start && annotation.offset < last.end
                }
                _ => false,
            })
    }
}

impl Annotation {
    pub fn new(class_id: impl Into<String>, offset: usize, text: impl Into<String>) -> Self {
        Self {
            class_id: class_id.into(),
            offset,
            text: text.into(),
        }
    }

    /// Exclusive end offset in chars.
    pub fn end(&self) -> usize {
        self.offset + self.text.chars().count()
    }
}

impl Token {
    pub fn new(word: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            word: word.into(),
            start,
            end,
        }
    }
}

impl Edge {
    /// Build an edge with its entities ordered by offset.
    pub fn new(
        relation_type: impl Into<String>,
        entity1: Annotation,
        entity2: Annotation,
        sentence1: usize,
        sentence2: usize,
    ) -> Self {
        let (entity1, entity2) = if entity2.offset < entity1.offset {
            (entity2, entity1)
        } else {
            (entity1, entity2)
        };
        Self {
            relation_type: relation_type.into(),
            entity1,
            entity2,
            sentence1,
            sentence2,
        }
    }
}

/// Substring of `text` between char offsets `[begin, end)`, if in bounds.
pub fn char_slice(text: &str, begin: usize, end: usize) -> Option<String> {
    if begin > end || end > text.chars().count() {
        return None;
    }
    Some(text.chars().skip(begin).take(end - begin).collect())
}
