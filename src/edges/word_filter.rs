//! Same-sentence pairing gated on trigger words.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::corpus::{Edge, Part};

/// Pairs gold entity1/entity2 spans sharing a sentence that contains at least
/// one trigger word. Predicted annotations are never considered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordFilter {
    pub entity1_class: String,
    pub entity2_class: String,
    pub relation_type: String,
    pub words: BTreeSet<String>,
}

impl WordFilter {
    pub fn new<I, W>(
        entity1_class: impl Into<String>,
        entity2_class: impl Into<String>,
        relation_type: impl Into<String>,
        words: I,
    ) -> Self
    where
        I: IntoIterator<Item = W>,
        W: Into<String>,
    {
        Self {
            entity1_class: entity1_class.into(),
            entity2_class: entity2_class.into(),
            relation_type: relation_type.into(),
            words: words.into_iter().map(Into::into).collect(),
        }
    }

    pub fn edges_for_part(&self, part: &Part) -> Vec<Edge> {
        let mut edges = Vec::new();
        let gold = &part.annotations;

        for a1 in gold.iter().filter(|a| a.class_id == self.entity1_class) {
            for a2 in gold.iter().filter(|a| a.class_id == self.entity2_class) {
                let (Some(i1), Some(i2)) = (part.sentence_index_for(a1), part.sentence_index_for(a2))
                else {
                    continue;
                };
                if i1 != i2 {
                    continue;
                }
                let triggered = part.sentences[i1]
                    .iter()
                    .any(|token| self.words.contains(&token.word));
                if triggered {
                    edges.push(Edge::new(
                        self.relation_type.as_str(),
                        a1.clone(),
                        a2.clone(),
                        i1,
                        i2,
                    ));
                }
            }
        }
        edges
    }
}
