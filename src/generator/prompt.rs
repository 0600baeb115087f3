pub const DEFAULT_MAX_SOURCE_CHARS: usize = 3000;

/// Minimum number of drills requested for every category but integration.
pub const MIN_DRILLS_PER_CATEGORY: usize = 3;

/// First `max_chars` characters of `source`. Never splits a code point.
pub fn truncate_source(source: &str, max_chars: usize) -> &str {
    match source.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &source[..byte_index],
        None => source,
    }
}

pub fn build_prompt(source: &str, max_chars: usize) -> String {
    let excerpt = truncate_source(source, max_chars);
    format!(
        r#"You are an English teacher preparing Foreign Service Institute (FSI) style pattern drills for Korean-speaking learners.
Read the source text below and create drills that practice its vocabulary and sentence patterns.

Return ONLY a JSON object, with no commentary, in exactly this shape:
{{
  "title": "short English title",
  "titleKorean": "Korean title",
  "description": "one-sentence English description",
  "descriptionKorean": "Korean description",
  "substitution": [
    {{ "sentence": "English sentence", "korean": "Korean translation", "targetWord": "one word from the sentence", "wordType": "subject|verb|object|adjective|adverb", "alternatives": ["word", "word", "word"] }}
  ],
  "response": [
    {{ "prompt": "English question", "promptKorean": "Korean question", "answer": "model English answer", "answerKorean": "Korean answer", "expectedResponses": ["key phrase", "key phrase"] }}
  ],
  "transformation": [
    {{ "original": "English sentence", "originalKorean": "Korean translation", "instruction": "e.g. Change to past tense", "instructionKorean": "Korean instruction", "answer": "transformed sentence", "answerKorean": "Korean translation" }}
  ],
  "expansion": [
    {{ "original": "short English sentence", "originalKorean": "Korean translation", "cue": "phrase to add", "cueKorean": "Korean cue", "answer": "expanded sentence", "answerKorean": "Korean translation" }}
  ],
  "integration": [
    {{ "context": "situation", "contextKorean": "Korean situation", "dialogue": [ {{ "english": "line", "korean": "Korean line" }} ] }}
  ]
}}

Rules:
- Create at least {min} substitution, {min} response, {min} transformation and {min} expansion drills.
- Integration dialogues are optional; when you add one, give it several turns.
- "targetWord" must appear in "sentence" exactly as written.
- Keep sentences natural and suitable for intermediate learners.

Source text:
"""
{excerpt}
""""#,
        min = MIN_DRILLS_PER_CATEGORY,
    )
}
