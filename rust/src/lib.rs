//! Phrase-based statistical machine translation: a stack (beam) decoder that
//! searches over partial translations built from a phrase table, scored with
//! a bigram language model.

mod bigram_data;
mod corpus;
mod coverage;
mod decoder;
mod direct;
mod error;
mod hypothesis;
mod interner;
mod language_model;
mod phrase_table;
#[cfg(feature = "python")]
mod py_bindings;
mod scoring;
mod stack;
mod types;

pub use corpus::{tokenize_documents, tokenize_line};
pub use decoder::{DecodeStatus, Decoder, DecoderConfig, Translation};
pub use direct::translate_word_by_word;
pub use error::TranslateError;
pub use language_model::{InterpolationWeights, LanguageModel};
pub use phrase_table::{PhraseTable, TranslationOption};
pub use stack::PruningPolicy;
pub use types::{Lookahead, PruneMethod, Span, Splitter};
