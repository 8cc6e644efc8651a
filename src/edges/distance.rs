//! Sentence-distance windowed pairing.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::corpus::{Annotation, Edge, Part};

/// Pairs entity1/entity2 spans of a part whose sentences are `distance`
/// apart. `distance: None` pairs every span in the part regardless of
/// sentence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentenceDistance {
    pub entity1_class: String,
    pub entity2_class: String,
    pub relation_type: String,
    pub distance: Option<usize>,
    /// Draw spans from predicted annotations as well as gold ones.
    pub use_predicted: bool,
    /// Drop a part's existing edges before appending new ones.
    pub clear_existing: bool,
}

impl SentenceDistance {
    pub fn new(
        entity1_class: impl Into<String>,
        entity2_class: impl Into<String>,
        relation_type: impl Into<String>,
        distance: Option<usize>,
    ) -> Self {
        Self {
            entity1_class: entity1_class.into(),
            entity2_class: entity2_class.into(),
            relation_type: relation_type.into(),
            distance,
            use_predicted: true,
            clear_existing: true,
        }
    }

    pub fn use_predicted(mut self, use_predicted: bool) -> Self {
        self.use_predicted = use_predicted;
        self
    }

    pub fn clear_existing(mut self, clear_existing: bool) -> Self {
        self.clear_existing = clear_existing;
        self
    }

    fn entities<'a>(&self, part: &'a Part) -> Vec<&'a Annotation> {
        let predicted: &[Annotation] = if self.use_predicted {
            &part.predicted_annotations
        } else {
            &[]
        };
        part.annotations.iter().chain(predicted).collect()
    }

    pub fn edges_for_part(&self, part: &Part) -> Vec<Edge> {
        let entities = self.entities(part);
        let mut edges = Vec::new();
        let mut unresolved = 0usize;

        for e1 in entities.iter().filter(|e| e.class_id == self.entity1_class) {
            for e2 in entities.iter().filter(|e| e.class_id == self.entity2_class) {
                let (Some(s1), Some(s2)) = (part.sentence_index_for(e1), part.sentence_index_for(e2))
                else {
                    unresolved += 1;
                    continue;
                };
                let (s1, s2) = if s2 < s1 { (s2, s1) } else { (s1, s2) };
                let pair_distance = s2 - s1;
                if self.distance.map_or(true, |d| d == pair_distance) {
                    edges.push(Edge::new(
                        self.relation_type.as_str(),
                        (*e1).clone(),
                        (*e2).clone(),
                        s1,
                        s2,
                    ));
                }
            }
        }

        if unresolved > 0 {
            debug!(unresolved, "skipped pairs without a sentence index");
        }
        edges
    }
}
