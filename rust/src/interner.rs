use crate::error::TranslateError;
use crate::types::TokenId;
use rustc_hash::FxHashMap;

pub(crate) fn validate_token_vocabulary_size(vocab_size: usize) -> Result<(), TranslateError> {
    let capacity = (u32::MAX as usize).saturating_add(1);
    if vocab_size > capacity {
        return Err(TranslateError::VocabularyOverflow);
    }
    Ok(())
}

/// Word <-> id mapping for the target-language vocabulary.
#[derive(Clone, Debug, Default)]
pub(crate) struct Vocabulary {
    str_to_id: FxHashMap<String, TokenId>,
    id_to_str: Vec<String>,
}

impl Vocabulary {
    /// Returns the id for `word`, assigning the next free id on first sight.
    pub(crate) fn intern(&mut self, word: &str) -> Result<TokenId, TranslateError> {
        if let Some(id) = self.str_to_id.get(word) {
            return Ok(*id);
        }

        validate_token_vocabulary_size(self.id_to_str.len() + 1)?;
        let id = TokenId::try_from(self.id_to_str.len())
            .map_err(|_| TranslateError::VocabularyOverflow)?;
        self.str_to_id.insert(word.to_string(), id);
        self.id_to_str.push(word.to_string());
        Ok(id)
    }

    pub(crate) fn maybe_id_for(&self, word: &str) -> Option<TokenId> {
        self.str_to_id.get(word).copied()
    }
}
