use crate::error::TranslateError;

pub(crate) const BOUNDARY_TOKEN: &str = "<s>";
pub(crate) const DEFAULT_DISTORTION_ALPHA: f64 = 0.5;
pub(crate) const DEFAULT_BEAM_SIZE: usize = 100;
pub(crate) const PARALLEL_DECODE_THRESHOLD: usize = 4;

pub(crate) type TokenId = u32;

/// Half-open range `[start, end)` of source positions.
pub type Span = (usize, usize);

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PruneMethod {
    Threshold,
    Histogram,
}

impl PruneMethod {
    pub fn parse(value: &str) -> Result<Self, TranslateError> {
        match value {
            "threshold" => Ok(Self::Threshold),
            "histogram" => Ok(Self::Histogram),
            _ => Err(TranslateError::InvalidPruningPolicy(format!(
                "Invalid pruning policy {value:?}. Expected one of: 'threshold', 'histogram'."
            ))),
        }
    }
}

/// Which bigram estimate the future-cost lookahead uses between consecutive
/// uncovered words.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Lookahead {
    /// Unsmoothed transitions; an unseen pair breaks the chain.
    Strict,
    #[default]
    Laplace,
}

impl Lookahead {
    pub fn parse(value: &str) -> Result<Self, TranslateError> {
        match value {
            "strict" => Ok(Self::Strict),
            "laplace" => Ok(Self::Laplace),
            _ => Err(TranslateError::InvalidConfig(format!(
                "Invalid lookahead {value:?}. Expected one of: 'strict', 'laplace'."
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Splitter<'a> {
    Delimiter(Option<&'a str>),
    Sentencex { language: &'a str },
}

impl<'a> Splitter<'a> {
    pub fn parse(
        splitter: &'a str,
        line_delimiter: Option<&'a str>,
        sentencex_language: &'a str,
    ) -> Result<Self, TranslateError> {
        match splitter {
            "delimiter" => Ok(Self::Delimiter(line_delimiter)),
            "sentencex" => {
                if sentencex_language.trim().is_empty() {
                    return Err(TranslateError::InvalidConfig(
                        "sentencex_language must be a non-empty language code.".to_string(),
                    ));
                }
                Ok(Self::Sentencex {
                    language: sentencex_language,
                })
            }
            _ => Err(TranslateError::InvalidConfig(format!(
                "Invalid splitter {splitter:?}. Expected one of: 'delimiter', 'sentencex'."
            ))),
        }
    }
}
