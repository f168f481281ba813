use crate::phrase_table::PhraseTable;

/// Baseline translator: every source word becomes its most probable
/// single-word table entry, in source order. Words without an entry are
/// dropped.
pub fn translate_word_by_word<S: AsRef<str>>(table: &PhraseTable, sentence: &[S]) -> Vec<String> {
    sentence
        .iter()
        .filter_map(|word| table.best_option(&word.as_ref().to_lowercase()))
        .flat_map(|option| option.target.split(' ').map(str::to_string))
        .collect()
}
