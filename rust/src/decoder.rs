use crate::coverage::Coverage;
use crate::error::TranslateError;
use crate::hypothesis::{Hypothesis, HypothesisArena, HypothesisId, PhraseChoice};
use crate::language_model::LanguageModel;
use crate::phrase_table::{PhraseTable, SentencePhrases};
use crate::scoring::Scorer;
use crate::stack::{HypothesisStack, PruningPolicy, StackEntry};
use crate::types::{Lookahead, Span, DEFAULT_DISTORTION_ALPHA, PARALLEL_DECODE_THRESHOLD};
use rayon::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DecoderConfig {
    pub pruning: PruningPolicy,
    pub distortion_alpha: f64,
    pub lookahead: Lookahead,
    /// Hypotheses generated per sentence before decoding stops early.
    pub max_expansions: Option<usize>,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            pruning: PruningPolicy::default(),
            distortion_alpha: DEFAULT_DISTORTION_ALPHA,
            lookahead: Lookahead::default(),
            max_expansions: None,
        }
    }
}

impl DecoderConfig {
    pub fn with_pruning(self, pruning: PruningPolicy) -> Self {
        Self { pruning, ..self }
    }

    pub fn with_distortion_alpha(self, distortion_alpha: f64) -> Self {
        Self {
            distortion_alpha,
            ..self
        }
    }

    pub fn with_lookahead(self, lookahead: Lookahead) -> Self {
        Self { lookahead, ..self }
    }

    pub fn with_max_expansions(self, max_expansions: Option<usize>) -> Self {
        Self {
            max_expansions,
            ..self
        }
    }

    pub fn validate(&self) -> Result<(), TranslateError> {
        self.pruning.validate()?;
        if !self.distortion_alpha.is_finite()
            || self.distortion_alpha <= 0.0
            || self.distortion_alpha > 1.0
        {
            return Err(TranslateError::InvalidConfig(format!(
                "distortion_alpha must be in (0, 1], got {}.",
                self.distortion_alpha
            )));
        }
        if self.max_expansions == Some(0) {
            return Err(TranslateError::InvalidConfig(
                "max_expansions must be greater than or equal to 1.".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Translation {
    pub tokens: Vec<String>,
    pub score: f64,
    pub covered_words: usize,
    pub source_words: usize,
    pub budget_exhausted: bool,
}

impl Translation {
    pub fn text(&self) -> String {
        self.tokens.join(" ")
    }

    pub fn is_complete(&self) -> bool {
        self.covered_words == self.source_words
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum DecodeStatus {
    Translated(Translation),
    NoTranslation,
}

impl DecodeStatus {
    pub fn translation(&self) -> Option<&Translation> {
        match self {
            Self::Translated(translation) => Some(translation),
            Self::NoTranslation => None,
        }
    }

    pub fn tokens(&self) -> Option<&[String]> {
        self.translation()
            .map(|translation| translation.tokens.as_slice())
    }
}

pub(crate) struct Search {
    pub(crate) phrases: SentencePhrases,
    pub(crate) arena: HypothesisArena,
    pub(crate) stacks: Vec<HypothesisStack>,
    pub(crate) expansions: usize,
    pub(crate) budget_exhausted: bool,
}

impl Search {
    fn new(phrases: SentencePhrases, policy: &PruningPolicy) -> Self {
        let sentence_len = phrases.len();
        let mut arena = HypothesisArena::default();
        let mut stacks = vec![HypothesisStack::default(); sentence_len + 1];

        let root = Hypothesis::root(sentence_len);
        let entry = StackEntry {
            score: root.score,
            present_cost: root.present_cost,
            id: arena.push(root),
        };
        stacks[0].insert(entry, policy);

        Self {
            phrases,
            arena,
            stacks,
            expansions: 0,
            budget_exhausted: false,
        }
    }

    fn covers_source_word(&self, id: HypothesisId) -> bool {
        let coverage = &self.arena.get(id).coverage;
        coverage.count() > usize::from(coverage.contains(0))
    }

    /// Best hypothesis of the fullest stack that holds one covering at least
    /// one real source word.
    pub(crate) fn select(&self) -> Option<HypothesisId> {
        self.stacks.iter().rev().find_map(|stack| {
            stack
                .entries()
                .iter()
                .rev()
                .find(|entry| self.covers_source_word(entry.id))
                .map(|entry| entry.id)
        })
    }

    pub(crate) fn backtrace(&self, id: HypothesisId) -> Vec<String> {
        let mut tokens = Vec::new();
        for step in self.arena.path_to(id) {
            let Some(choice) = self.arena.get(step).phrase else {
                continue;
            };
            let option = &self.phrases.options(choice.span)[choice.option];
            if option.is_boundary() {
                continue;
            }
            tokens.extend(option.target.split(' ').map(str::to_string));
        }
        tokens
    }

    fn result(&self) -> DecodeStatus {
        let Some(id) = self.select() else {
            return DecodeStatus::NoTranslation;
        };
        let hypothesis = self.arena.get(id);
        let coverage = &hypothesis.coverage;
        DecodeStatus::Translated(Translation {
            tokens: self.backtrace(id),
            score: hypothesis.score,
            covered_words: coverage.count() - usize::from(coverage.contains(0)),
            source_words: coverage.len() - 1,
            budget_exhausted: self.budget_exhausted,
        })
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Decoder<'a> {
    lm: &'a LanguageModel,
    table: &'a PhraseTable,
    config: DecoderConfig,
}

impl<'a> Decoder<'a> {
    pub fn new(
        lm: &'a LanguageModel,
        table: &'a PhraseTable,
        config: DecoderConfig,
    ) -> Result<Self, TranslateError> {
        config.validate()?;
        Ok(Self { lm, table, config })
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    pub fn translate<S: AsRef<str>>(&self, sentence: &[S]) -> DecodeStatus {
        log::info!("translating sentence of {} words", sentence.len());
        let search = self.search(sentence);
        let status = search.result();

        match &status {
            DecodeStatus::Translated(translation) => log::info!(
                "translated {}/{} words with score {:.4} ({} hypotheses)",
                translation.covered_words,
                translation.source_words,
                translation.score,
                search.arena.len()
            ),
            DecodeStatus::NoTranslation => log::info!("no translation found"),
        }
        status
    }

    pub fn translate_batch<S: AsRef<str> + Sync>(&self, sentences: &[Vec<S>]) -> Vec<DecodeStatus> {
        if sentences.len() >= PARALLEL_DECODE_THRESHOLD {
            sentences
                .par_iter()
                .map(|sentence| self.translate(sentence))
                .collect()
        } else {
            sentences
                .iter()
                .map(|sentence| self.translate(sentence))
                .collect()
        }
    }

    pub(crate) fn search<S: AsRef<str>>(&self, sentence: &[S]) -> Search {
        let phrases = SentencePhrases::for_sentence(self.table, sentence);
        let policy = self.config.pruning;
        let mut search = Search::new(phrases, &policy);
        let sentence_len = search.phrases.len();

        // Expansions always land in a fuller stack, so stack `covered` is
        // final by the time it is expanded.
        'stacks: for covered in 0..sentence_len {
            let frontier = search.stacks[covered].entries().to_vec();
            for entry in frontier {
                if let Some(limit) = self.config.max_expansions {
                    if search.expansions >= limit {
                        log::warn!(
                            "expansion budget of {limit} exhausted at stack {covered}; returning best so far"
                        );
                        search.budget_exhausted = true;
                        break 'stacks;
                    }
                }

                let expansions = self.expansions(&search, entry.id);
                for hypothesis in expansions {
                    search.expansions += 1;
                    let stack_ix = hypothesis.coverage.count();
                    let child = StackEntry {
                        score: hypothesis.score,
                        present_cost: hypothesis.present_cost,
                        id: search.arena.push(hypothesis),
                    };
                    search.stacks[stack_ix].insert(child, &policy);
                }
            }

            log::debug!(
                "expanded stack {covered}: {} hypotheses generated so far, next stack holds {}",
                search.expansions,
                search.stacks[covered + 1].len()
            );
        }

        search
    }

    pub(crate) fn expansions(&self, search: &Search, id: HypothesisId) -> Vec<Hypothesis> {
        let parent = search.arena.get(id);
        let scorer = Scorer {
            lm: self.lm,
            phrases: &search.phrases,
            distortion_alpha: self.config.distortion_alpha,
            lookahead: self.config.lookahead,
        };

        // Every path opens with the boundary token, so the first real phrase
        // pays the sentence-start transition.
        let spans = if parent.phrase.is_none() {
            vec![(0, 1)]
        } else {
            open_spans(search, &parent.coverage)
        };

        let mut expansions = Vec::new();
        for span in spans {
            let Some(coverage) = parent.coverage.with_span(span) else {
                continue;
            };

            let future_cost = scorer.future_cost(&coverage);
            for (option_ix, option) in search.phrases.options(span).iter().enumerate() {
                let present_cost = scorer.present_cost(parent, span, option);
                expansions.push(Hypothesis {
                    phrase: Some(PhraseChoice {
                        span,
                        option: option_ix,
                    }),
                    coverage: coverage.clone(),
                    present_cost,
                    score: present_cost + future_cost,
                    parent: Some(id),
                });
            }
        }

        expansions
    }
}

/// Uncovered contiguous spans that have at least one table option.
fn open_spans(search: &Search, coverage: &Coverage) -> Vec<Span> {
    let sentence_len = search.phrases.len();
    let mut spans = Vec::new();

    for start in 0..sentence_len {
        if coverage.contains(start) {
            continue;
        }
        for end in start + 1..=sentence_len {
            if coverage.contains(end - 1) {
                break;
            }
            if !search.phrases.options((start, end)).is_empty() {
                spans.push((start, end));
            }
        }
    }

    spans
}
