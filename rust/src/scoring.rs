use crate::coverage::Coverage;
use crate::hypothesis::Hypothesis;
use crate::language_model::LanguageModel;
use crate::phrase_table::{SentencePhrases, SpanOption};
use crate::types::{Lookahead, Span};

/// `log(alpha ^ |start - prev_end|)`: no penalty when the new phrase starts
/// right where the previous one ended.
pub(crate) fn distortion_log_prob(alpha: f64, start: usize, prev_end: usize) -> f64 {
    start.abs_diff(prev_end) as f64 * alpha.ln()
}

/// Everything a decode needs to score expansions of one sentence. All terms
/// are log-probabilities and combine by addition only.
pub(crate) struct Scorer<'a> {
    pub(crate) lm: &'a LanguageModel,
    pub(crate) phrases: &'a SentencePhrases,
    pub(crate) distortion_alpha: f64,
    pub(crate) lookahead: Lookahead,
}

impl Scorer<'_> {
    /// Parent's present cost plus the cost of emitting `option` for `span`.
    /// The first phrase after the root pays only its translation cost.
    pub(crate) fn present_cost(&self, parent: &Hypothesis, span: Span, option: &SpanOption) -> f64 {
        let Some(prev) = parent.phrase else {
            return option.log_prob;
        };
        let prev_option = &self.phrases.options(prev.span)[prev.option];

        parent.present_cost
            + option.log_prob
            + distortion_log_prob(self.distortion_alpha, span.0, prev.span.1)
            + self
                .lm
                .log_prob_laplace(prev_option.last_word(), option.first_word())
    }

    fn lookahead_transition(&self, prev: &str, word: &str) -> Option<f64> {
        match self.lookahead {
            Lookahead::Strict => self.lm.log_prob_observed(prev, word),
            Lookahead::Laplace => Some(self.lm.log_prob_laplace(prev, word)),
        }
    }

    /// Viterbi estimate of the best log-score for translating the uncovered
    /// words one by one, in source order. Zero when nothing is left; negative
    /// infinity when some uncovered word has no single-word translation or no
    /// option of it can follow any surviving option of its predecessor.
    pub(crate) fn future_cost(&self, coverage: &Coverage) -> f64 {
        let mut column: Option<Vec<(&SpanOption, f64)>> = None;

        for position in coverage.uncovered() {
            let options = self.phrases.options((position, position + 1));
            let next = match &column {
                None => options
                    .iter()
                    .map(|option| (option, option.log_prob))
                    .collect::<Vec<_>>(),
                Some(prev_column) => options
                    .iter()
                    .filter_map(|option| {
                        prev_column
                            .iter()
                            .filter_map(|(prev, prev_score)| {
                                self.lookahead_transition(prev.last_word(), option.first_word())
                                    .map(|transition| prev_score + transition)
                            })
                            .max_by(f64::total_cmp)
                            .map(|best| (option, best + option.log_prob))
                    })
                    .collect::<Vec<_>>(),
            };

            if next.is_empty() {
                return f64::NEG_INFINITY;
            }
            column = Some(next);
        }

        match column {
            None => 0.0,
            Some(last) => last
                .iter()
                .map(|(_, score)| *score)
                .fold(f64::NEG_INFINITY, f64::max),
        }
    }
}
