mod common;

use bioedge::tokenize::{self, split_sentences, UnicodeSegmenter, WordSegmenter};
use bioedge::Part;
use common::{first_part, single_part_corpus, TWO_SENTENCES};

#[test]
fn sentences_split_on_terminal_punctuation() {
    let sentences = split_sentences("BRAF p.V600E is common. Is it?  Yes!\nDone");
    assert_eq!(sentences, vec!["BRAF p.V600E is common.", "Is it?", "Yes!", "Done"]);
    assert!(split_sentences("   ").is_empty());
}

#[test]
fn unicode_segmenter_keeps_mutation_mentions_whole() {
    let words = UnicodeSegmenter.segment("BRAF p.V600E causes melanoma.");
    assert_eq!(words, vec!["BRAF", "p.V600E", "causes", "melanoma", "."]);
}

#[test]
fn tokens_carry_char_offsets_into_part_text() {
    let mut corpus = single_part_corpus(Part::new(TWO_SENTENCES));
    tokenize::split_corpus(&mut corpus);
    tokenize::tokenize(&mut corpus, &UnicodeSegmenter);

    let part = first_part(&corpus);
    assert_eq!(part.raw_sentences.len(), 2);
    assert_eq!(part.sentences.len(), 2);
    let second = &part.sentences[1];
    assert_eq!(second[0].word, "It");
    assert_eq!(second[0].start, 18);
    let beta = second.iter().find(|t| t.word == "BETA").unwrap();
    assert_eq!((beta.start, beta.end), (40, 44));
}

#[test]
fn offsets_count_chars_not_bytes() {
    let mut corpus = single_part_corpus(Part::new("β-catenin binds. Done."));
    tokenize::split_corpus(&mut corpus);
    tokenize::tokenize(&mut corpus, &UnicodeSegmenter);

    let first = &first_part(&corpus).sentences[0];
    let binds = first.iter().find(|t| t.word == "binds").unwrap();
    assert_eq!(binds.start, 10);
    assert_eq!(first_part(&corpus).sentences[1][0].start, 17);
}

#[test]
fn tokenize_only_touches_sentences_and_is_repeatable() {
    let mut corpus = single_part_corpus(Part::new(TWO_SENTENCES));
    tokenize::split_corpus(&mut corpus);
    tokenize::tokenize(&mut corpus, &UnicodeSegmenter);
    let once = corpus.clone();
    tokenize::tokenize(&mut corpus, &UnicodeSegmenter);
    assert_eq!(corpus, once);

    let part = first_part(&corpus);
    assert_eq!(part.text, TWO_SENTENCES);
    assert!(part.annotations.is_empty());
    assert!(part.edges.is_empty());
}

struct Whitespace;

impl WordSegmenter for Whitespace {
    fn segment(&self, text: &str) -> Vec<String> {
        text.split_whitespace().map(str::to_string).collect()
    }
}

#[test]
fn segmenter_is_pluggable() {
    let mut corpus = single_part_corpus(Part::new(TWO_SENTENCES));
    tokenize::split_corpus(&mut corpus);
    let count = tokenize::tokenize(&mut corpus, &Whitespace);
    assert_eq!(count, 9);
    assert_eq!(first_part(&corpus).sentences[0][2].word, "binds.");
}
