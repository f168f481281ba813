use std::io;

#[derive(Debug, thiserror::Error)]
pub enum TranslateError {
    #[error("{0}")]
    InvalidPruningPolicy(String),

    #[error("{0}")]
    InvalidConfig(String),

    #[error("malformed phrase-table record on line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },

    #[error("probability for {source_phrase:?} -> {target_phrase:?} must be in (0, 1], got {probability}")]
    InvalidProbability {
        source_phrase: String,
        target_phrase: String,
        probability: f64,
    },

    #[error("bigram ({prev:?}, {word:?}) was never observed")]
    UnknownBigram { prev: String, word: String },

    #[error("token vocabulary exceeded TokenId capacity (u32).")]
    VocabularyOverflow,

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}
