use crate::drill::{Word, WordType};

/// Stripped from the end of a token before it is compared to the target word.
pub const TRAILING_PUNCTUATION: &[char] = &['.', ',', '?', '!'];

/// Lower-cased token with trailing punctuation removed.
pub fn comparison_key(token: &str) -> String {
    token.trim_end_matches(TRAILING_PUNCTUATION).to_lowercase()
}

/// Split `sentence` on single spaces into display tokens.
///
/// Every token whose comparison key equals the target's becomes interactive
/// and receives `word_type` and `alternatives`; all other tokens are plain.
/// Each token but the last keeps one trailing space, so joining the texts
/// reproduces the sentence.
pub fn tokenize(
    sentence: &str,
    target: Option<&str>,
    word_type: Option<WordType>,
    alternatives: &[String],
) -> Vec<Word> {
    if sentence.is_empty() {
        return Vec::new();
    }

    let target_key = target.map(comparison_key).filter(|key| !key.is_empty());
    let tokens: Vec<&str> = sentence.split(' ').collect();
    let last = tokens.len() - 1;

    tokens
        .iter()
        .enumerate()
        .map(|(i, token)| {
            let text = if i < last {
                format!("{token} ")
            } else {
                token.to_string()
            };
            let is_target = target_key
                .as_deref()
                .is_some_and(|key| comparison_key(token) == key);
            if is_target {
                Word::interactive(text, word_type, alternatives.to_vec())
            } else {
                Word::plain(text)
            }
        })
        .collect()
}

/// Tokenize with no interactive target.
pub fn tokenize_plain(sentence: &str) -> Vec<Word> {
    tokenize(sentence, None, None, &[])
}
