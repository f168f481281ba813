//! Turning raw documents into the lowercase token sentences the language model
//! and decoder consume.

use crate::types::Splitter;
use sentencex::segment;

/// Lowercases `line`, turns ASCII punctuation into whitespace and splits on
/// whitespace.
pub fn tokenize_line(line: &str) -> Vec<String> {
    line.chars()
        .map(|ch| if ch.is_ascii_punctuation() { ' ' } else { ch })
        .collect::<String>()
        .split_whitespace()
        .map(str::to_lowercase)
        .collect()
}

/// Splits every document into sentences and tokenizes them. Sentences that
/// end up with no tokens are dropped.
pub fn tokenize_documents(documents: &[String], splitter: Splitter<'_>) -> Vec<Vec<String>> {
    let mut sentences = Vec::new();

    for document in documents {
        let mut ingest_segment = |segment: &str| {
            let tokens = tokenize_line(segment);
            if tokens.is_empty() {
                return;
            }
            sentences.push(tokens);
        };

        match splitter {
            Splitter::Delimiter(Some(delim)) => {
                for segment in document.split(delim) {
                    ingest_segment(segment);
                }
            }
            Splitter::Delimiter(None) => ingest_segment(document),
            Splitter::Sentencex { language } => {
                for sentence in segment(language, document) {
                    ingest_segment(sentence);
                }
            }
        }
    }

    log::debug!(
        "tokenized {} documents into {} sentences",
        documents.len(),
        sentences.len()
    );
    sentences
}
