//! Default-filling decode of the model's JSON reply.
//!
//! The model is asked for a fixed shape but nothing guarantees it. Every
//! field is read independently: a missing, `null` or wrong-typed value turns
//! into its default, numbers and booleans are stringified, and array items
//! that are not objects are skipped. Only a non-object top level is an error.

use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PayloadError {
    #[error("expected a JSON object at the top level, found {0}")]
    NotAnObject(&'static str),
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DrillPayload {
    pub title: Option<String>,
    pub title_korean: Option<String>,
    pub description: Option<String>,
    pub description_korean: Option<String>,
    pub substitution: Vec<SubstitutionItem>,
    pub response: Vec<ResponseItem>,
    pub transformation: Vec<TransformationItem>,
    pub expansion: Vec<ExpansionItem>,
    pub integration: Vec<IntegrationItem>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SubstitutionItem {
    pub sentence: String,
    pub korean: String,
    pub target_word: Option<String>,
    pub word_type: Option<String>,
    pub alternatives: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResponseItem {
    pub prompt: String,
    pub prompt_korean: String,
    pub answer: String,
    pub answer_korean: String,
    pub expected_responses: Option<Vec<String>>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransformationItem {
    pub original: String,
    pub original_korean: String,
    pub instruction: String,
    pub instruction_korean: String,
    pub answer: String,
    pub answer_korean: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExpansionItem {
    pub original: String,
    pub original_korean: String,
    pub cue: String,
    pub cue_korean: String,
    pub answer: String,
    pub answer_korean: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IntegrationItem {
    pub context: String,
    pub context_korean: String,
    pub dialogue: Vec<DialogueTurn>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DialogueTurn {
    pub english: String,
    pub korean: String,
}

impl DrillPayload {
    pub fn from_value(value: &Value) -> Result<Self, PayloadError> {
        let obj = value
            .as_object()
            .ok_or_else(|| PayloadError::NotAnObject(json_type_name(value)))?;

        Ok(Self {
            title: text(obj, &["title"]),
            title_korean: text(obj, &["titleKorean", "title_korean"]),
            description: text(obj, &["description"]),
            description_korean: text(obj, &["descriptionKorean", "description_korean"]),
            substitution: objects(obj, &["substitution", "substitutions"])
                .map(SubstitutionItem::from_object)
                .collect(),
            response: objects(obj, &["response", "responses"])
                .map(ResponseItem::from_object)
                .collect(),
            transformation: objects(obj, &["transformation", "transformations"])
                .map(TransformationItem::from_object)
                .collect(),
            expansion: objects(obj, &["expansion", "expansions"])
                .map(ExpansionItem::from_object)
                .collect(),
            integration: objects(obj, &["integration", "integrations"])
                .map(IntegrationItem::from_object)
                .collect(),
        })
    }
}

impl SubstitutionItem {
    fn from_object(obj: &Map<String, Value>) -> Self {
        Self {
            sentence: text_or_default(obj, &["sentence", "english"]),
            korean: text_or_default(obj, &["korean", "sentenceKorean", "sentence_korean"]),
            target_word: text(obj, &["targetWord", "target_word", "target"]),
            word_type: text(obj, &["wordType", "word_type", "type"]),
            alternatives: text_list(obj, &["alternatives"]).unwrap_or_default(),
        }
    }
}

impl ResponseItem {
    fn from_object(obj: &Map<String, Value>) -> Self {
        Self {
            prompt: text_or_default(obj, &["prompt"]),
            prompt_korean: text_or_default(obj, &["promptKorean", "prompt_korean"]),
            answer: text_or_default(obj, &["answer"]),
            answer_korean: text_or_default(obj, &["answerKorean", "answer_korean"]),
            expected_responses: text_list(obj, &["expectedResponses", "expected_responses"]),
        }
    }
}

impl TransformationItem {
    fn from_object(obj: &Map<String, Value>) -> Self {
        Self {
            original: text_or_default(obj, &["original", "sentence"]),
            original_korean: text_or_default(obj, &["originalKorean", "original_korean", "korean"]),
            instruction: text_or_default(obj, &["instruction"]),
            instruction_korean: text_or_default(obj, &["instructionKorean", "instruction_korean"]),
            answer: text_or_default(obj, &["answer"]),
            answer_korean: text_or_default(obj, &["answerKorean", "answer_korean"]),
        }
    }
}

impl ExpansionItem {
    fn from_object(obj: &Map<String, Value>) -> Self {
        Self {
            original: text_or_default(obj, &["original", "sentence"]),
            original_korean: text_or_default(obj, &["originalKorean", "original_korean", "korean"]),
            cue: text_or_default(obj, &["cue", "expansionCue", "expansion_cue"]),
            cue_korean: text_or_default(
                obj,
                &["cueKorean", "cue_korean", "expansionCueKorean", "expansion_cue_korean"],
            ),
            answer: text_or_default(obj, &["answer"]),
            answer_korean: text_or_default(obj, &["answerKorean", "answer_korean"]),
        }
    }
}

impl IntegrationItem {
    fn from_object(obj: &Map<String, Value>) -> Self {
        Self {
            context: text_or_default(obj, &["context"]),
            context_korean: text_or_default(obj, &["contextKorean", "context_korean"]),
            dialogue: objects(obj, &["dialogue", "turns", "sentences"])
                .map(DialogueTurn::from_object)
                .collect(),
        }
    }
}

impl DialogueTurn {
    fn from_object(obj: &Map<String, Value>) -> Self {
        Self {
            english: text_or_default(obj, &["english", "text", "sentence"]),
            korean: text_or_default(obj, &["korean"]),
        }
    }
}

/// First non-null value among `keys`.
fn field<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| obj.get(*key))
        .find(|value| !value.is_null())
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn text(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    field(obj, keys).and_then(scalar_text)
}

fn text_or_default(obj: &Map<String, Value>, keys: &[&str]) -> String {
    text(obj, keys).unwrap_or_default()
}

/// An array of scalars, or a lone string treated as a one-element list.
fn text_list(obj: &Map<String, Value>, keys: &[&str]) -> Option<Vec<String>> {
    match field(obj, keys)? {
        Value::Array(items) => Some(items.iter().filter_map(scalar_text).collect()),
        Value::String(s) => Some(vec![s.clone()]),
        _ => None,
    }
}

fn objects<'a>(
    obj: &'a Map<String, Value>,
    keys: &[&str],
) -> impl Iterator<Item = &'a Map<String, Value>> {
    field(obj, keys)
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_object)
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_object_gives_empty_payload() {
        let payload = DrillPayload::from_value(&json!({})).unwrap();
        assert_eq!(payload, DrillPayload::default());
    }

    #[test]
    fn non_object_is_rejected() {
        assert_eq!(
            DrillPayload::from_value(&json!([1, 2])),
            Err(PayloadError::NotAnObject("an array"))
        );
        assert!(DrillPayload::from_value(&json!("drills")).is_err());
    }

    #[test]
    fn reads_camel_case_fields() {
        let value = json!({
            "title": "Morning",
            "titleKorean": "아침",
            "substitution": [{
                "sentence": "I drink coffee.",
                "korean": "나는 커피를 마신다.",
                "targetWord": "coffee",
                "wordType": "object",
                "alternatives": ["tea", "juice"]
            }],
            "response": [{
                "prompt": "What do you drink?",
                "promptKorean": "무엇을 마셔요?",
                "answer": "I drink coffee.",
                "answerKorean": "커피를 마셔요.",
                "expectedResponses": ["coffee"]
            }]
        });
        let payload = DrillPayload::from_value(&value).unwrap();
        assert_eq!(payload.title.as_deref(), Some("Morning"));
        assert_eq!(payload.title_korean.as_deref(), Some("아침"));
        assert_eq!(payload.substitution[0].target_word.as_deref(), Some("coffee"));
        assert_eq!(payload.substitution[0].alternatives, vec!["tea", "juice"]);
        assert_eq!(
            payload.response[0].expected_responses,
            Some(vec!["coffee".to_string()])
        );
    }

    #[test]
    fn wrong_types_fall_back_to_defaults() {
        let value = json!({
            "title": null,
            "substitution": [
                "not an object",
                { "sentence": 42, "alternatives": "tea", "targetWord": ["x"] }
            ],
            "response": { "prompt": "not an array" },
            "integration": [{ "context": "Cafe", "dialogue": [{ "text": "Hi" }, 7] }]
        });
        let payload = DrillPayload::from_value(&value).unwrap();
        assert!(payload.title.is_none());
        assert_eq!(payload.substitution.len(), 1);
        assert_eq!(payload.substitution[0].sentence, "42");
        assert_eq!(payload.substitution[0].alternatives, vec!["tea"]);
        assert!(payload.substitution[0].target_word.is_none());
        assert!(payload.response.is_empty());
        assert_eq!(payload.integration[0].dialogue.len(), 1);
        assert_eq!(payload.integration[0].dialogue[0].english, "Hi");
    }

    #[test]
    fn snake_case_aliases_are_accepted() {
        let value = json!({
            "expansion": [{
                "original": "I run.",
                "expansion_cue": "every morning",
                "answer": "I run every morning."
            }]
        });
        let payload = DrillPayload::from_value(&value).unwrap();
        assert_eq!(payload.expansion[0].cue, "every morning");
    }
}
