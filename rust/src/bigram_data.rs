use crate::error::TranslateError;
use crate::interner::Vocabulary;
use crate::types::{TokenId, BOUNDARY_TOKEN};
use rustc_hash::FxHashMap;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub(crate) struct BigramId {
    pub(crate) left: TokenId,
    pub(crate) right: TokenId,
}

#[derive(Clone, Debug, Default)]
pub(crate) struct BigramCounts {
    pub(crate) vocabulary: Vocabulary,
    pub(crate) unigrams_to_freqs: FxHashMap<TokenId, u64>,
    pub(crate) bigrams_to_freqs: FxHashMap<BigramId, u64>,
    /// Sum of `bigrams_to_freqs` over every right word, per left word.
    pub(crate) successor_totals: FxHashMap<TokenId, u64>,
    pub(crate) total_unigrams: u64,
    pub(crate) total_bigrams: u64,
    pub(crate) unique_unigrams: u64,
    pub(crate) unique_bigrams: u64,
}

impl BigramCounts {
    /// Counts every token and every adjacent pair of each sentence, with the
    /// boundary token prepended to the sentence.
    pub(crate) fn from_corpus<S: AsRef<str>>(corpus: &[Vec<S>]) -> Result<Self, TranslateError> {
        let mut counts = Self::default();

        for sentence in corpus {
            if sentence.is_empty() {
                continue;
            }

            let mut prev = counts.add_unigram(BOUNDARY_TOKEN)?;
            for word in sentence {
                let id = counts.add_unigram(word.as_ref())?;
                counts.add_bigram(BigramId {
                    left: prev,
                    right: id,
                });
                prev = id;
            }
        }

        Ok(counts)
    }

    pub(crate) fn add_unigram(&mut self, word: &str) -> Result<TokenId, TranslateError> {
        let id = self.vocabulary.intern(word)?;
        let freq = self.unigrams_to_freqs.entry(id).or_insert(0);
        if *freq == 0 {
            self.unique_unigrams += 1;
        }
        *freq += 1;
        self.total_unigrams += 1;
        Ok(id)
    }

    pub(crate) fn add_bigram(&mut self, bigram: BigramId) {
        let freq = self.bigrams_to_freqs.entry(bigram).or_insert(0);
        if *freq == 0 {
            self.unique_bigrams += 1;
        }
        *freq += 1;
        *self.successor_totals.entry(bigram.left).or_insert(0) += 1;
        self.total_bigrams += 1;
    }

    pub(crate) fn unigram_freq(&self, word: &str) -> u64 {
        self.vocabulary
            .maybe_id_for(word)
            .and_then(|id| self.unigrams_to_freqs.get(&id).copied())
            .unwrap_or(0)
    }

    pub(crate) fn bigram_freq(&self, prev: &str, word: &str) -> u64 {
        let (Some(left), Some(right)) = (
            self.vocabulary.maybe_id_for(prev),
            self.vocabulary.maybe_id_for(word),
        ) else {
            return 0;
        };
        self.bigrams_to_freqs
            .get(&BigramId { left, right })
            .copied()
            .unwrap_or(0)
    }

    pub(crate) fn successor_total(&self, prev: &str) -> u64 {
        self.vocabulary
            .maybe_id_for(prev)
            .and_then(|id| self.successor_totals.get(&id).copied())
            .unwrap_or(0)
    }
}
