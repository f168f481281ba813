//! Hypothesis stacks: handles kept in ascending score order (best last) and
//! pruned after every insertion.

use crate::error::TranslateError;
use crate::hypothesis::HypothesisId;
use crate::types::{PruneMethod, DEFAULT_BEAM_SIZE};
use std::cmp::Ordering;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PruningPolicy {
    /// Drop entries scoring below `ratio * best`. Scores are log-probabilities,
    /// so a ratio above 1 keeps entries worse than the best.
    Threshold { ratio: f64 },
    /// Keep the `beam_size` best entries.
    Histogram { beam_size: usize },
}

impl Default for PruningPolicy {
    fn default() -> Self {
        Self::Histogram {
            beam_size: DEFAULT_BEAM_SIZE,
        }
    }
}

impl PruningPolicy {
    /// Builds a policy from its name and the `pthresh` parameter (ratio for
    /// threshold pruning, entry count for histogram pruning).
    pub fn parse(method: &str, pthresh: f64) -> Result<Self, TranslateError> {
        let policy = match PruneMethod::parse(method)? {
            PruneMethod::Threshold => Self::Threshold { ratio: pthresh },
            PruneMethod::Histogram => {
                if !pthresh.is_finite() || pthresh < 1.0 || pthresh.fract() != 0.0 {
                    return Err(TranslateError::InvalidConfig(format!(
                        "histogram pruning needs a positive whole number of entries, got {pthresh}."
                    )));
                }
                Self::Histogram {
                    beam_size: pthresh as usize,
                }
            }
        };
        policy.validate()?;
        Ok(policy)
    }

    pub fn method(&self) -> PruneMethod {
        match self {
            Self::Threshold { .. } => PruneMethod::Threshold,
            Self::Histogram { .. } => PruneMethod::Histogram,
        }
    }

    pub(crate) fn validate(&self) -> Result<(), TranslateError> {
        match *self {
            Self::Threshold { ratio } if !ratio.is_finite() || ratio <= 0.0 => {
                Err(TranslateError::InvalidConfig(format!(
                    "threshold ratio must be finite and greater than 0, got {ratio}."
                )))
            }
            Self::Histogram { beam_size: 0 } => Err(TranslateError::InvalidConfig(
                "histogram beam size must be greater than or equal to 1.".to_string(),
            )),
            _ => Ok(()),
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct StackEntry {
    pub(crate) score: f64,
    pub(crate) present_cost: f64,
    pub(crate) id: HypothesisId,
}

impl StackEntry {
    // Equal scores (typically two unreachable entries) fall back to present cost.
    fn rank_cmp(&self, other: &Self) -> Ordering {
        self.score
            .total_cmp(&other.score)
            .then_with(|| self.present_cost.total_cmp(&other.present_cost))
    }
}

#[derive(Clone, Debug, Default)]
pub(crate) struct HypothesisStack {
    entries: Vec<StackEntry>,
}

impl HypothesisStack {
    pub(crate) fn entries(&self) -> &[StackEntry] {
        &self.entries
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn best(&self) -> Option<StackEntry> {
        self.entries.last().copied()
    }

    /// Inserts in rank order and prunes. A new entry goes below every entry
    /// it ties with, so among ties the earliest insertion ranks best.
    pub(crate) fn insert(&mut self, entry: StackEntry, policy: &PruningPolicy) {
        let ix = self
            .entries
            .partition_point(|existing| existing.rank_cmp(&entry) == Ordering::Less);
        self.entries.insert(ix, entry);
        self.prune(policy);
    }

    pub(crate) fn prune(&mut self, policy: &PruningPolicy) {
        let drop = match *policy {
            PruningPolicy::Threshold { ratio } => {
                let Some(best) = self.best() else {
                    return;
                };
                if best.score.is_finite() {
                    let cutoff = (ratio * best.score).min(best.score);
                    self.entries.partition_point(|existing| existing.score < cutoff)
                } else {
                    // Every entry is unreachable; bound the stack by rank instead.
                    self.entries.len().saturating_sub(DEFAULT_BEAM_SIZE)
                }
            }
            PruningPolicy::Histogram { beam_size } => self.entries.len().saturating_sub(beam_size),
        };

        if drop > 0 {
            self.entries.drain(..drop);
        }
    }
}
