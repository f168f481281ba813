use crate::coverage::Coverage;
use crate::types::Span;

/// Stable handle into a [`HypothesisArena`]. Handles stay valid for the whole
/// decode, whatever the stacks prune.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub(crate) struct HypothesisId(usize);

/// The target phrase a hypothesis emitted: option `option` of the sentence
/// table entry for `span`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct PhraseChoice {
    pub(crate) span: Span,
    pub(crate) option: usize,
}

#[derive(Clone, Debug)]
pub(crate) struct Hypothesis {
    pub(crate) phrase: Option<PhraseChoice>,
    pub(crate) coverage: Coverage,
    /// Log-score of everything emitted so far.
    pub(crate) present_cost: f64,
    /// `present_cost` plus the lookahead estimate for the uncovered words.
    pub(crate) score: f64,
    pub(crate) parent: Option<HypothesisId>,
}

impl Hypothesis {
    pub(crate) fn root(sentence_len: usize) -> Self {
        Self {
            phrase: None,
            coverage: Coverage::empty(sentence_len),
            present_cost: 0.0,
            score: 0.0,
            parent: None,
        }
    }
}

/// Append-only storage for every hypothesis created while decoding one
/// sentence.
#[derive(Default)]
pub(crate) struct HypothesisArena {
    hypotheses: Vec<Hypothesis>,
}

impl HypothesisArena {
    pub(crate) fn push(&mut self, hypothesis: Hypothesis) -> HypothesisId {
        let id = HypothesisId(self.hypotheses.len());
        self.hypotheses.push(hypothesis);
        id
    }

    pub(crate) fn get(&self, id: HypothesisId) -> &Hypothesis {
        &self.hypotheses[id.0]
    }

    pub(crate) fn len(&self) -> usize {
        self.hypotheses.len()
    }

    /// Handles from the root down to `id`, root first.
    pub(crate) fn path_to(&self, id: HypothesisId) -> Vec<HypothesisId> {
        let mut path = vec![id];
        let mut current = id;
        while let Some(parent) = self.get(current).parent {
            path.push(parent);
            current = parent;
        }
        path.reverse();
        path
    }
}
