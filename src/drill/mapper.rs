use chrono::Utc;

use crate::drill::check::normalize;
use crate::drill::payload::{
    DrillPayload, ExpansionItem, IntegrationItem, ResponseItem, SubstitutionItem,
    TransformationItem,
};
use crate::drill::tokenizer::{tokenize, tokenize_plain};
use crate::drill::{
    DrillKind, DrillSentence, DrillSet, ExpansionDrill, IntegrationDrill, ResponseDrill,
    SubstitutionDrill, TransformationDrill, WordType,
};

pub const SUBSTITUTION_INSTRUCTION: &str = "Select the highlighted word and swap in an alternative";
pub const SUBSTITUTION_INSTRUCTION_KOREAN: &str = "강조된 단어를 선택하여 다른 단어로 바꿔 보세요";
pub const RESPONSE_INSTRUCTION: &str = "Respond to the prompt";
pub const RESPONSE_INSTRUCTION_KOREAN: &str = "질문에 답하세요";
pub const EXPANSION_INSTRUCTION: &str = "Expand the sentence using the cue";
pub const EXPANSION_INSTRUCTION_KOREAN: &str = "단서를 사용하여 문장을 확장하세요";
pub const INTEGRATION_INSTRUCTION: &str = "Practice the dialogue";
pub const INTEGRATION_INSTRUCTION_KOREAN: &str = "대화를 연습하세요";

pub const DEFAULT_TITLE_KOREAN: &str = "업로드된 콘텐츠";
pub const DEFAULT_DESCRIPTION: &str = "Practice drills generated from your text";
pub const DEFAULT_DESCRIPTION_KOREAN: &str = "텍스트에서 생성된 연습 드릴";

/// Build a complete drill set from a decoded payload. Never fails: absent
/// categories are empty and absent strings take their defaults.
pub fn map_payload(payload: &DrillPayload, source_name: &str) -> DrillSet {
    DrillSet {
        id: new_drill_set_id(),
        title: non_blank(payload.title.as_deref()).unwrap_or(source_name).to_string(),
        title_korean: non_blank(payload.title_korean.as_deref())
            .unwrap_or(DEFAULT_TITLE_KOREAN)
            .to_string(),
        description: non_blank(payload.description.as_deref())
            .unwrap_or(DEFAULT_DESCRIPTION)
            .to_string(),
        description_korean: non_blank(payload.description_korean.as_deref())
            .unwrap_or(DEFAULT_DESCRIPTION_KOREAN)
            .to_string(),
        substitution: map_substitution(&payload.substitution),
        response: map_response(&payload.response),
        transformation: map_transformation(&payload.transformation),
        expansion: map_expansion(&payload.expansion),
        integration: map_integration(&payload.integration),
        created_at: Utc::now(),
    }
}

/// `<unix millis>-<random hex>`; unique per call.
pub fn new_drill_set_id() -> String {
    let suffix: u32 = rand::random();
    format!("{}-{suffix:08x}", Utc::now().timestamp_millis())
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn drill_id(prefix: &str, index: usize) -> String {
    format!("{prefix}-{}", index + 1)
}

fn map_substitution(items: &[SubstitutionItem]) -> Vec<SubstitutionDrill> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let word_type = item
                .word_type
                .as_deref()
                .and_then(WordType::parse)
                .unwrap_or(WordType::Object);
            SubstitutionDrill {
                kind: DrillKind::Substitution,
                sentence: DrillSentence {
                    id: drill_id("sub", i),
                    english: tokenize(
                        &item.sentence,
                        item.target_word.as_deref(),
                        Some(word_type),
                        &item.alternatives,
                    ),
                    korean: item.korean.clone(),
                    instruction: Some(SUBSTITUTION_INSTRUCTION.to_string()),
                    instruction_korean: Some(SUBSTITUTION_INSTRUCTION_KOREAN.to_string()),
                },
            }
        })
        .collect()
}

fn map_response(items: &[ResponseItem]) -> Vec<ResponseDrill> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            // Expectations with no letters left after normalizing would accept
            // any reply; fall back to the answer.
            let expected: Vec<String> = item
                .expected_responses
                .iter()
                .flatten()
                .filter(|r| !normalize(r).is_empty())
                .cloned()
                .collect();
            let expected_responses = if expected.is_empty() {
                vec![item.answer.clone()]
            } else {
                expected
            };
            ResponseDrill {
                kind: DrillKind::Response,
                sentence: DrillSentence {
                    id: drill_id("resp", i),
                    english: tokenize_plain(&item.answer),
                    korean: item.answer_korean.clone(),
                    instruction: Some(RESPONSE_INSTRUCTION.to_string()),
                    instruction_korean: Some(RESPONSE_INSTRUCTION_KOREAN.to_string()),
                },
                prompt: item.prompt.clone(),
                prompt_korean: item.prompt_korean.clone(),
                expected_responses,
            }
        })
        .collect()
}

fn map_transformation(items: &[TransformationItem]) -> Vec<TransformationDrill> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| TransformationDrill {
            kind: DrillKind::Transformation,
            sentence: DrillSentence {
                id: drill_id("trans", i),
                english: tokenize_plain(&item.original),
                korean: item.original_korean.clone(),
                instruction: Some(item.instruction.clone()),
                instruction_korean: Some(item.instruction_korean.clone()),
            },
            target_form: item.instruction.clone(),
            target_form_korean: item.instruction_korean.clone(),
            answer: item.answer.clone(),
            answer_korean: item.answer_korean.clone(),
        })
        .collect()
}

fn map_expansion(items: &[ExpansionItem]) -> Vec<ExpansionDrill> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| ExpansionDrill {
            kind: DrillKind::Expansion,
            sentence: DrillSentence {
                id: drill_id("exp", i),
                english: tokenize_plain(&item.original),
                korean: item.original_korean.clone(),
                instruction: Some(EXPANSION_INSTRUCTION.to_string()),
                instruction_korean: Some(EXPANSION_INSTRUCTION_KOREAN.to_string()),
            },
            expansion_cue: item.cue.clone(),
            expansion_cue_korean: item.cue_korean.clone(),
            answer: item.answer.clone(),
            answer_korean: item.answer_korean.clone(),
        })
        .collect()
}

fn map_integration(items: &[IntegrationItem]) -> Vec<IntegrationDrill> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| IntegrationDrill {
            id: drill_id("int", i),
            kind: DrillKind::Integration,
            context: item.context.clone(),
            context_korean: item.context_korean.clone(),
            instruction: INTEGRATION_INSTRUCTION.to_string(),
            instruction_korean: INTEGRATION_INSTRUCTION_KOREAN.to_string(),
            sentences: item
                .dialogue
                .iter()
                .enumerate()
                .map(|(j, turn)| DrillSentence {
                    id: format!("int-{}-{}", i + 1, j + 1),
                    english: tokenize_plain(&turn.english),
                    korean: turn.korean.clone(),
                    instruction: None,
                    instruction_korean: None,
                })
                .collect(),
        })
        .collect()
}
