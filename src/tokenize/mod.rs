//! Sentence splitting and tokenization of corpus parts.

pub mod segmenter;
pub mod sentences;

pub use segmenter::{UnicodeSegmenter, WordSegmenter};
pub use sentences::{split_corpus, split_sentences};

use tracing::info;

use crate::corpus::{Corpus, Token};

/// Replace every part's tokenized sentences with one token sequence per raw
/// sentence. Only `sentences` is written, so running it again recomputes the
/// same tokens from `raw_sentences`.
pub fn tokenize<S>(corpus: &mut Corpus, segmenter: &S) -> usize
where
    S: WordSegmenter + ?Sized,
{
    let mut tokens = 0;
    for part in corpus.parts_mut() {
        part.sentences = locate_sentences(&part.text, &part.raw_sentences, segmenter);
        tokens += part.sentences.iter().map(Vec::len).sum::<usize>();
    }
    info!(tokens, "tokenized corpus");
    tokens
}

/// Segment each sentence and pin every token to char offsets in `text`.
/// Lookups only move forward; a token that cannot be found is placed at the
/// current cursor.
fn locate_sentences<S>(text: &str, sentences: &[String], segmenter: &S) -> Vec<Vec<Token>>
where
    S: WordSegmenter + ?Sized,
{
    let mut cursor = 0usize;
    let mut out = Vec::with_capacity(sentences.len());
    for sentence in sentences {
        if let Some(found) = text[cursor..].find(sentence.as_str()) {
            cursor += found;
        }
        let mut tokens = Vec::new();
        for word in segmenter.segment(sentence) {
            let byte_start = match text[cursor..].find(word.as_str()) {
                Some(found) => cursor + found,
                None => cursor,
            };
            let start = char_offset(text, byte_start);
            let end = start + word.chars().count();
            if text[byte_start..].starts_with(word.as_str()) {
                cursor = byte_start + word.len();
            }
            tokens.push(Token { word, start, end });
        }
        out.push(tokens);
    }
    out
}

fn char_offset(text: &str, byte_idx: usize) -> usize {
    text[..byte_idx].chars().count()
}
