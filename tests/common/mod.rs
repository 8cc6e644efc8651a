#![allow(dead_code)]

use bioedge::{
    tokenize::{self, UnicodeSegmenter},
    Annotation, Corpus, Document, Part,
};

/// "Gene ALPHA binds." then "It is mutated through BETA here." with ALPHA at
/// offset 5 (sentence 0) and BETA at offset 40 (sentence 1).
pub const TWO_SENTENCES: &str = "Gene ALPHA binds. It is mutated through BETA here.";

/// Build a split and tokenized part with gold annotations located by text.
pub fn tokenized_part(text: &str, gold: &[(&str, &str)]) -> Part {
    let mut part = Part::new(text);
    for (class, needle) in gold {
        let offset = text.find(needle).expect("entity text present");
        part.push_annotation(Annotation::new(*class, offset, *needle))
            .expect("annotation in bounds");
    }
    let mut corpus = single_part_corpus(part);
    tokenize::split_corpus(&mut corpus);
    tokenize::tokenize(&mut corpus, &UnicodeSegmenter);
    first_part(&corpus).clone()
}

pub fn single_part_corpus(part: Part) -> Corpus {
    let mut corpus = Corpus::new();
    corpus.insert("doc-1", Document::new().with_part("abstract", part));
    corpus
}

pub fn first_part(corpus: &Corpus) -> &Part {
    corpus.parts().next().expect("corpus has a part")
}
