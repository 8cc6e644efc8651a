//! CLI entry-point for sentence splitting and tokenization.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args as ClapArgs;
use tracing::instrument;

use crate::{
    config::Settings,
    corpus::Corpus,
    tokenize::{self, UnicodeSegmenter, WordSegmenter},
};

/// Args for the `tokenize` sub-command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// Corpus file, rewritten in place.
    #[arg(long, default_value = "corpus.json")]
    pub corpus: PathBuf,
    /// Use the BERT pre-tokenizer from `tokenizers`.
    #[cfg(feature = "hf-tokenizers")]
    #[arg(long)]
    pub bert: bool,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let path = settings.join_data(&args.corpus);
    let mut corpus =
        Corpus::load(&path).with_context(|| format!("load corpus from {}", path.display()))?;
    tokenize_corpus(&mut corpus, segmenter(&args).as_ref());
    corpus
        .save(&path)
        .with_context(|| format!("save corpus to {}", path.display()))?;
    Ok(())
}

/// Split sentences, then tokenize them with `segmenter`.
pub fn tokenize_corpus(corpus: &mut Corpus, segmenter: &dyn WordSegmenter) {
    tokenize::split_corpus(corpus);
    tokenize::tokenize(corpus, segmenter);
}

#[cfg(feature = "hf-tokenizers")]
fn segmenter(args: &Args) -> Box<dyn WordSegmenter> {
    if args.bert {
        Box::new(tokenize::segmenter::HfPreTokenizer)
    } else {
        Box::new(UnicodeSegmenter)
    }
}

#[cfg(not(feature = "hf-tokenizers"))]
fn segmenter(_args: &Args) -> Box<dyn WordSegmenter> {
    Box::new(UnicodeSegmenter)
}
