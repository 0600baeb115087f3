use icu_normalizer::ComposingNormalizerBorrowed;

use crate::drill::ResponseDrill;

const IGNORED_PUNCTUATION: &[char] = &['.', ',', '!', '?'];

/// NFC, lower-case, punctuation removed, trimmed.
pub fn normalize(text: &str) -> String {
    let nfc = ComposingNormalizerBorrowed::new_nfc();
    let composed = nfc.normalize(text);
    let stripped: String = composed
        .to_lowercase()
        .chars()
        .filter(|c| !IGNORED_PUNCTUATION.contains(c))
        .collect();
    stripped.trim().to_string()
}

/// A response is accepted when it contains any of the expected responses.
///
/// Expectations that normalize to nothing are ignored. When none are left,
/// only a reply that also normalizes to nothing matches.
pub fn check_response(drill: &ResponseDrill, response: &str) -> bool {
    let response = normalize(response);
    let expected: Vec<String> = drill
        .expected_responses
        .iter()
        .map(|expected| normalize(expected))
        .filter(|expected| !expected.is_empty())
        .collect();
    if expected.is_empty() {
        return response.is_empty();
    }
    !response.is_empty() && expected.iter().any(|e| response.contains(e.as_str()))
}

/// Transformation and expansion answers must match exactly after normalization.
pub fn check_exact(expected: &str, answer: &str) -> bool {
    let answer = normalize(answer);
    !answer.is_empty() && answer == normalize(expected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drill::tokenizer::tokenize_plain;
    use crate::drill::{DrillKind, DrillSentence};

    fn response_drill(expected: &[&str]) -> ResponseDrill {
        ResponseDrill {
            kind: DrillKind::Response,
            sentence: DrillSentence {
                id: "resp-1".to_string(),
                english: tokenize_plain("I usually wake up at seven."),
                korean: String::new(),
                instruction: None,
                instruction_korean: None,
            },
            prompt: "When do you wake up?".to_string(),
            prompt_korean: String::new(),
            expected_responses: expected.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn normalize_strips_case_punctuation_and_whitespace() {
        assert_eq!(normalize("  Hello, World!  "), "hello world");
        assert_eq!(normalize("Really?"), "really");
    }

    #[test]
    fn normalize_composes_hangul() {
        // Decomposed jamo for "한" compose to the precomposed syllable.
        let decomposed = "\u{1112}\u{1161}\u{11AB}";
        assert_eq!(normalize(decomposed), "한");
    }

    #[test]
    fn response_accepts_containing_answer() {
        let drill = response_drill(&["wake up at seven"]);
        assert!(check_response(&drill, "Well, I usually wake up at seven."));
        assert!(!check_response(&drill, "I sleep in."));
    }

    #[test]
    fn response_accepts_any_expected() {
        let drill = response_drill(&["at seven", "at 7"]);
        assert!(check_response(&drill, "At 7!"));
    }

    #[test]
    fn blank_response_is_never_correct() {
        let drill = response_drill(&["yes"]);
        assert!(!check_response(&drill, "   "));
    }

    #[test]
    fn punctuation_only_expectation_does_not_accept_everything() {
        let drill = response_drill(&["?", "..."]);
        assert!(!check_response(&drill, "anything at all"));

        let mixed = response_drill(&["!", "at seven"]);
        assert!(check_response(&mixed, "At seven."));
        assert!(!check_response(&mixed, "at noon"));
    }

    #[test]
    fn empty_expectation_matches_only_an_empty_reply() {
        let drill = response_drill(&[""]);
        assert!(check_response(&drill, ""));
        assert!(check_response(&drill, " ... "));
        assert!(!check_response(&drill, "hello"));
    }

    #[test]
    fn exact_check_ignores_case_and_punctuation() {
        assert!(check_exact("She walked to school.", "she walked to school"));
        assert!(!check_exact("She walked to school.", "She walks to school."));
        assert!(!check_exact("", ""));
    }
}
