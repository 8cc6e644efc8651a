//! Word segmentation back-ends.

use unicode_segmentation::UnicodeSegmentation;

/// Anything that turns a sentence string into ordered word strings.
pub trait WordSegmenter: Send + Sync {
    fn segment(&self, text: &str) -> Vec<String>;
}

/// Unicode (UAX #29) word boundaries with whitespace segments dropped.
/// Punctuation ends up as standalone tokens; `p.V600E` stays whole.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnicodeSegmenter;

impl WordSegmenter for UnicodeSegmenter {
    fn segment(&self, text: &str) -> Vec<String> {
        text.split_word_bounds()
            .filter(|segment| !segment.trim().is_empty())
            .map(str::to_string)
            .collect()
    }
}

#[cfg(feature = "hf-tokenizers")]
pub use hf::HfPreTokenizer;

#[cfg(feature = "hf-tokenizers")]
mod hf {
    use tokenizers::pre_tokenizers::bert::BertPreTokenizer;
    use tokenizers::{OffsetReferential, OffsetType, PreTokenizedString, PreTokenizer};
    use tracing::warn;

    use super::{UnicodeSegmenter, WordSegmenter};

    /// BERT-style pre-tokenization from the `tokenizers` crate.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct HfPreTokenizer;

    impl WordSegmenter for HfPreTokenizer {
        fn segment(&self, text: &str) -> Vec<String> {
            let mut pretokenized = PreTokenizedString::from(text);
            if let Err(err) = BertPreTokenizer.pre_tokenize(&mut pretokenized) {
                warn!(error = %err, "bert pre-tokenizer failed; using unicode segmentation");
                return UnicodeSegmenter.segment(text);
            }
            pretokenized
                .get_splits(OffsetReferential::Original, OffsetType::Byte)
                .into_iter()
                .map(|(word, _, _)| word.to_string())
                .collect()
        }
    }
}
