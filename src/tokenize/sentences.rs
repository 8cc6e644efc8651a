//! Coarse sentence splitting over part text.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::corpus::Corpus;

static BOUNDARY: Lazy<Regex> = Lazy::new(|| Regex::new(r"([.!?]+)\s+").expect("valid regex"));

/// Split text after terminal punctuation followed by whitespace.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut start = 0;
    for caps in BOUNDARY.captures_iter(text) {
        let (Some(punct), Some(whole)) = (caps.get(1), caps.get(0)) else {
            continue;
        };
        sentences.push(&text[start..punct.end()]);
        start = whole.end();
    }
    sentences.push(&text[start..]);
    sentences
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Fill every part's raw sentence list from its text.
pub fn split_corpus(corpus: &mut Corpus) -> usize {
    let mut total = 0;
    for part in corpus.parts_mut() {
        part.raw_sentences = split_sentences(&part.text);
        total += part.raw_sentences.len();
    }
    tracing::debug!(sentences = total, "split corpus into sentences");
    total
}
