use crate::error::TranslateError;
use crate::types::{Span, BOUNDARY_TOKEN};
use rustc_hash::FxHashMap;
use std::io::BufRead;

const FIELD_SEPARATOR: &str = "|||";

#[derive(Clone, Debug, PartialEq)]
pub struct TranslationOption {
    pub target: String,
    pub probability: f64,
}

/// Options of one source phrase stay sorted by target text, so iteration
/// order never depends on insertion order.
#[derive(Clone, Debug, Default)]
pub struct PhraseTable {
    entries: FxHashMap<String, Vec<TranslationOption>>,
    max_source_words: usize,
}

fn normalize_phrase(phrase: &str) -> String {
    phrase.split_whitespace().collect::<Vec<_>>().join(" ")
}

impl PhraseTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        source: &str,
        target: &str,
        probability: f64,
    ) -> Result<(), TranslateError> {
        let source = normalize_phrase(source);
        let target = normalize_phrase(target);
        if !probability.is_finite() || probability <= 0.0 || probability > 1.0 {
            return Err(TranslateError::InvalidProbability {
                source_phrase: source,
                target_phrase: target,
                probability,
            });
        }
        if source.is_empty() || target.is_empty() {
            return Err(TranslateError::InvalidConfig(
                "phrase-table entries need a non-empty source and target phrase.".to_string(),
            ));
        }

        self.max_source_words = self
            .max_source_words
            .max(source.split(' ').count());

        let options = self.entries.entry(source).or_default();
        match options.binary_search_by(|option| option.target.as_str().cmp(&target)) {
            Ok(ix) => options[ix].probability = probability,
            Err(ix) => options.insert(
                ix,
                TranslationOption {
                    target,
                    probability,
                },
            ),
        }
        Ok(())
    }

    /// Reads one record per line. Plain records are three whitespace-separated
    /// columns `target source probability`; records containing `|||` are
    /// `source ||| target ||| probability` and may hold multi-word phrases.
    /// Blank lines and lines starting with `#` are skipped.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, TranslateError> {
        let mut table = Self::new();

        for (line_ix, line) in reader.lines().enumerate() {
            let line = line?;
            let record = line.trim();
            if record.is_empty() || record.starts_with('#') {
                continue;
            }

            let (source, target, probability) = parse_record(record, line_ix + 1)?;
            table.insert(source, target, probability)?;
        }

        log::info!(
            "loaded phrase table with {} source phrases (longest {} words)",
            table.len(),
            table.max_source_words
        );
        Ok(table)
    }

    pub fn parse_str(text: &str) -> Result<Self, TranslateError> {
        Self::from_reader(text.as_bytes())
    }

    pub fn get(&self, source: &str) -> Option<&[TranslationOption]> {
        self.entries.get(source).map(Vec::as_slice)
    }

    pub fn best_option(&self, source: &str) -> Option<&TranslationOption> {
        self.get(source)?.iter().fold(None, |best, option| match best {
            Some(current) if current.probability >= option.probability => Some(current),
            _ => Some(option),
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn parse_record(record: &str, line: usize) -> Result<(&str, &str, f64), TranslateError> {
    let malformed = |reason: String| TranslateError::MalformedRecord { line, reason };

    let (source, target, probability) = if record.contains(FIELD_SEPARATOR) {
        let fields = record.split(FIELD_SEPARATOR).map(str::trim).collect::<Vec<_>>();
        let &[source, target, probability] = fields.as_slice() else {
            return Err(malformed(format!(
                "expected 3 '|||'-separated fields, found {}",
                fields.len()
            )));
        };
        (source, target, probability)
    } else {
        let fields = record.split_whitespace().collect::<Vec<_>>();
        let &[target, source, probability] = fields.as_slice() else {
            return Err(malformed(format!(
                "expected 3 whitespace-separated columns, found {}",
                fields.len()
            )));
        };
        (source, target, probability)
    };

    let probability = probability
        .parse::<f64>()
        .map_err(|err| malformed(format!("invalid probability {probability:?}: {err}")))?;
    Ok((source, target, probability))
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct SpanOption {
    pub(crate) target: String,
    pub(crate) log_prob: f64,
}

impl SpanOption {
    pub(crate) fn first_word(&self) -> &str {
        self.target.split(' ').next().unwrap_or_default()
    }

    pub(crate) fn last_word(&self) -> &str {
        self.target.rsplit(' ').next().unwrap_or_default()
    }

    pub(crate) fn is_boundary(&self) -> bool {
        self.target == BOUNDARY_TOKEN
    }
}

/// The table restricted to one sentence's spans, in log space. Position 0 is
/// the boundary token.
#[derive(Clone, Debug)]
pub(crate) struct SentencePhrases {
    pub(crate) words: Vec<String>,
    by_span: FxHashMap<Span, Vec<SpanOption>>,
}

impl SentencePhrases {
    pub(crate) fn for_sentence<S: AsRef<str>>(table: &PhraseTable, sentence: &[S]) -> Self {
        let mut words = Vec::with_capacity(sentence.len() + 1);
        words.push(BOUNDARY_TOKEN.to_string());
        words.extend(sentence.iter().map(|word| word.as_ref().to_lowercase()));

        let mut by_span = FxHashMap::default();
        by_span.insert(
            (0, 1),
            vec![SpanOption {
                target: BOUNDARY_TOKEN.to_string(),
                log_prob: 0.0,
            }],
        );

        for start in 1..words.len() {
            let mut phrase = String::new();
            let max_end = words.len().min(start + table.max_source_words);
            for end in start..max_end {
                if end > start {
                    phrase.push(' ');
                }
                phrase.push_str(&words[end]);

                if let Some(options) = table.get(&phrase) {
                    let options = options
                        .iter()
                        .map(|option| SpanOption {
                            target: option.target.clone(),
                            log_prob: option.probability.ln(),
                        })
                        .collect();
                    by_span.insert((start, end + 1), options);
                }
            }
        }

        log::debug!(
            "{} of the sentence's spans have translations",
            by_span.len() - 1
        );
        Self { words, by_span }
    }

    pub(crate) fn len(&self) -> usize {
        self.words.len()
    }

    pub(crate) fn options(&self, span: Span) -> &[SpanOption] {
        self.by_span.get(&span).map(Vec::as_slice).unwrap_or(&[])
    }
}
