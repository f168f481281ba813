use crate::corpus::{tokenize_documents, tokenize_line};
use crate::decoder::{DecodeStatus, Decoder, DecoderConfig};
use crate::direct::translate_word_by_word;
use crate::error::TranslateError;
use crate::language_model::LanguageModel;
use crate::phrase_table::PhraseTable;
use crate::stack::PruningPolicy;
use crate::types::{Lookahead, Splitter, DEFAULT_BEAM_SIZE, DEFAULT_DISTORTION_ALPHA};
use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use std::panic::{catch_unwind, AssertUnwindSafe};

impl From<TranslateError> for PyErr {
    fn from(err: TranslateError) -> Self {
        PyValueError::new_err(err.to_string())
    }
}

#[pyclass(frozen)]
#[derive(Clone, Debug, PartialEq)]
pub struct TranslationResult {
    #[pyo3(get)]
    pub(crate) tokens: Vec<String>,
    #[pyo3(get)]
    pub(crate) score: f64,
    #[pyo3(get)]
    pub(crate) covered_words: usize,
    #[pyo3(get)]
    pub(crate) source_words: usize,
    #[pyo3(get)]
    pub(crate) budget_exhausted: bool,
}

impl TranslationResult {
    fn from_status(status: DecodeStatus) -> Option<Self> {
        match status {
            DecodeStatus::Translated(translation) => Some(Self {
                tokens: translation.tokens,
                score: translation.score,
                covered_words: translation.covered_words,
                source_words: translation.source_words,
                budget_exhausted: translation.budget_exhausted,
            }),
            DecodeStatus::NoTranslation => None,
        }
    }
}

fn panic_payload_to_string(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        return (*message).to_string();
    }
    if let Some(message) = payload.downcast_ref::<String>() {
        return message.clone();
    }
    "unknown panic payload".to_string()
}

#[pyclass(frozen)]
pub struct Translator {
    lm: LanguageModel,
    table: PhraseTable,
    config: DecoderConfig,
}

impl Translator {
    fn decoder(&self) -> Result<Decoder<'_>, TranslateError> {
        Decoder::new(&self.lm, &self.table, self.config)
    }
}

#[pymethods]
impl Translator {
    #[new]
    #[pyo3(signature = (
        corpus,
        phrase_table,
        prune="histogram",
        pthresh=DEFAULT_BEAM_SIZE as f64,
        distortion_alpha=DEFAULT_DISTORTION_ALPHA,
        lookahead="laplace",
        max_expansions=None,
        splitter="delimiter",
        line_delimiter=Some("\n"),
        sentencex_language="en",
    ))]
    #[allow(clippy::too_many_arguments)]
    fn new(
        corpus: Vec<String>,
        phrase_table: &str,
        prune: &str,
        pthresh: f64,
        distortion_alpha: f64,
        lookahead: &str,
        max_expansions: Option<usize>,
        splitter: &str,
        line_delimiter: Option<&str>,
        sentencex_language: &str,
    ) -> PyResult<Self> {
        let config = DecoderConfig::default()
            .with_pruning(PruningPolicy::parse(prune, pthresh)?)
            .with_distortion_alpha(distortion_alpha)
            .with_lookahead(Lookahead::parse(lookahead)?)
            .with_max_expansions(max_expansions);
        config.validate()?;

        let splitter = Splitter::parse(splitter, line_delimiter, sentencex_language)?;
        let sentences = tokenize_documents(&corpus, splitter);
        let lm = LanguageModel::from_corpus(&sentences)?;
        let table = PhraseTable::parse_str(phrase_table)?;

        Ok(Self { lm, table, config })
    }

    /// Returns `None` when no source word could be translated.
    fn translate(&self, py: Python<'_>, sentence: &str) -> PyResult<Option<TranslationResult>> {
        let decoder = self.decoder()?;
        let tokens = tokenize_line(sentence);
        let result = py.allow_threads(|| {
            catch_unwind(AssertUnwindSafe(|| decoder.translate(&tokens)))
                .map_err(panic_payload_to_string)
        });
        result
            .map(TranslationResult::from_status)
            .map_err(|message| {
                PyRuntimeError::new_err(format!(
                    "beamtrans decoder panicked during translate(): {message}"
                ))
            })
    }

    fn translate_batch(
        &self,
        py: Python<'_>,
        sentences: Vec<String>,
    ) -> PyResult<Vec<Option<TranslationResult>>> {
        let decoder = self.decoder()?;
        let sentences = sentences
            .iter()
            .map(|sentence| tokenize_line(sentence))
            .collect::<Vec<_>>();
        let result = py.allow_threads(|| {
            catch_unwind(AssertUnwindSafe(|| decoder.translate_batch(&sentences)))
                .map_err(panic_payload_to_string)
        });
        result
            .map(|statuses| {
                statuses
                    .into_iter()
                    .map(TranslationResult::from_status)
                    .collect()
            })
            .map_err(|message| {
                PyRuntimeError::new_err(format!(
                    "beamtrans decoder panicked during translate_batch(): {message}"
                ))
            })
    }

    fn translate_direct(&self, sentence: &str) -> Vec<String> {
        translate_word_by_word(&self.table, &tokenize_line(sentence))
    }
}

#[pymodule(gil_used = true)]
fn _core(_py: Python<'_>, module: &Bound<'_, PyModule>) -> PyResult<()> {
    module.add_class::<Translator>()?;
    module.add_class::<TranslationResult>()?;
    module.add("BOUNDARY_TOKEN", crate::types::BOUNDARY_TOKEN)?;
    Ok(())
}
