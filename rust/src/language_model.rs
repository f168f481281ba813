use crate::bigram_data::BigramCounts;
use crate::error::TranslateError;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InterpolationWeights {
    pub unigram: f64,
    pub bigram: f64,
}

impl Default for InterpolationWeights {
    fn default() -> Self {
        Self {
            unigram: 0.5,
            bigram: 0.5,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct LanguageModel {
    pub(crate) counts: BigramCounts,
}

impl LanguageModel {
    pub fn from_corpus<S: AsRef<str>>(corpus: &[Vec<S>]) -> Result<Self, TranslateError> {
        let mut model = Self::default();
        model.estimate(corpus)?;
        Ok(model)
    }

    pub fn estimate<S: AsRef<str>>(&mut self, corpus: &[Vec<S>]) -> Result<(), TranslateError> {
        self.counts = BigramCounts::from_corpus(corpus)?;
        log::info!(
            "estimated bigram model: {} sentences, {} tokens, {} unique unigrams, {} unique bigrams",
            corpus.len(),
            self.counts.total_unigrams,
            self.counts.unique_unigrams,
            self.counts.unique_bigrams
        );
        Ok(())
    }

    pub fn total_unigrams(&self) -> u64 {
        self.counts.total_unigrams
    }

    pub fn unique_unigrams(&self) -> u64 {
        self.counts.unique_unigrams
    }

    pub fn total_bigrams(&self) -> u64 {
        self.counts.total_bigrams
    }

    pub fn unique_bigrams(&self) -> u64 {
        self.counts.unique_bigrams
    }

    pub fn unigram_count(&self, word: &str) -> u64 {
        self.counts.unigram_freq(word)
    }

    pub fn bigram_count(&self, prev: &str, word: &str) -> u64 {
        self.counts.bigram_freq(prev, word)
    }

    /// Vocabulary size used by Laplace smoothing: unique words minus the
    /// boundary token, never below 1.
    pub fn vocabulary_size(&self) -> u64 {
        self.counts.unique_unigrams.saturating_sub(1).max(1)
    }

    /// `log((c(prev, word) + 1) / (N + V))` with `N` the number of observed
    /// successors of `prev`.
    pub fn log_prob_laplace(&self, prev: &str, word: &str) -> f64 {
        let n = self.counts.successor_total(prev) as f64;
        let v = self.vocabulary_size() as f64;
        let c = self.counts.bigram_freq(prev, word) as f64;
        ((c + 1.0) / (n + v)).ln()
    }

    pub fn log_prob_no_smooth(&self, prev: &str, word: &str) -> Result<f64, TranslateError> {
        self.log_prob_observed(prev, word)
            .ok_or_else(|| TranslateError::UnknownBigram {
                prev: prev.to_string(),
                word: word.to_string(),
            })
    }

    pub(crate) fn log_prob_observed(&self, prev: &str, word: &str) -> Option<f64> {
        let c = self.counts.bigram_freq(prev, word);
        if c == 0 {
            return None;
        }
        let n = self.counts.successor_total(prev);
        Some((c as f64 / n as f64).ln())
    }

    pub fn log_prob_interpolated(
        &self,
        prev: &str,
        word: &str,
        weights: InterpolationWeights,
    ) -> f64 {
        let n = self.counts.successor_total(prev);
        let p_bigram = if n == 0 {
            0.0
        } else {
            self.counts.bigram_freq(prev, word) as f64 / n as f64
        };
        let p_unigram = if self.counts.total_unigrams == 0 {
            0.0
        } else {
            self.counts.unigram_freq(word) as f64 / self.counts.total_unigrams as f64
        };
        (weights.unigram * p_unigram + weights.bigram * p_bigram).ln()
    }

    /// Deleted interpolation: every held-out bigram votes, with its count, for
    /// the larger of its leave-one-out bigram and unigram frequencies.
    pub fn estimate_interpolation_weights<S: AsRef<str>>(
        held_out: &[Vec<S>],
    ) -> Result<InterpolationWeights, TranslateError> {
        let counts = BigramCounts::from_corpus(held_out)?;
        let mut w_unigram = 0u64;
        let mut w_bigram = 0u64;

        for (bigram, freq) in &counts.bigrams_to_freqs {
            let left_freq = counts
                .unigrams_to_freqs
                .get(&bigram.left)
                .copied()
                .unwrap_or(0);
            let right_freq = counts
                .unigrams_to_freqs
                .get(&bigram.right)
                .copied()
                .unwrap_or(0);

            let case_bigram = leave_one_out(*freq, left_freq);
            let case_unigram = leave_one_out(right_freq, counts.total_unigrams);

            if case_bigram >= case_unigram {
                w_bigram += freq;
            } else {
                w_unigram += freq;
            }
        }

        let total = w_unigram + w_bigram;
        if total == 0 {
            log::warn!("held-out corpus has no bigrams; using even interpolation weights");
            return Ok(InterpolationWeights::default());
        }

        Ok(InterpolationWeights {
            unigram: w_unigram as f64 / total as f64,
            bigram: w_bigram as f64 / total as f64,
        })
    }
}

fn leave_one_out(numerator: u64, denominator: u64) -> f64 {
    if denominator <= 1 {
        return 0.0;
    }
    numerator.saturating_sub(1) as f64 / (denominator - 1) as f64
}
