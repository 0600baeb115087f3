pub mod check;
pub mod mapper;
pub mod payload;
pub mod sample;
pub mod tokenizer;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::drill::tokenizer::TRAILING_PUNCTUATION;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrillKind {
    Substitution,
    Response,
    Transformation,
    Expansion,
    Integration,
}

impl DrillKind {
    pub const ALL: [DrillKind; 5] = [
        DrillKind::Substitution,
        DrillKind::Response,
        DrillKind::Transformation,
        DrillKind::Expansion,
        DrillKind::Integration,
    ];

    pub fn label(self) -> &'static str {
        match self {
            DrillKind::Substitution => "Substitution",
            DrillKind::Response => "Response",
            DrillKind::Transformation => "Transformation",
            DrillKind::Expansion => "Expansion",
            DrillKind::Integration => "Integration",
        }
    }

    pub fn korean_label(self) -> &'static str {
        match self {
            DrillKind::Substitution => "대체",
            DrillKind::Response => "응답",
            DrillKind::Transformation => "변형",
            DrillKind::Expansion => "확장",
            DrillKind::Integration => "통합",
        }
    }

    pub fn index(self) -> usize {
        match self {
            DrillKind::Substitution => 0,
            DrillKind::Response => 1,
            DrillKind::Transformation => 2,
            DrillKind::Expansion => 3,
            DrillKind::Integration => 4,
        }
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Grammatical role of an interactive word.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WordType {
    Subject,
    Verb,
    Object,
    Adjective,
    Adverb,
}

impl WordType {
    /// Case-insensitive parse; `None` for anything outside the five roles.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "subject" => Some(WordType::Subject),
            "verb" => Some(WordType::Verb),
            "object" => Some(WordType::Object),
            "adjective" => Some(WordType::Adjective),
            "adverb" => Some(WordType::Adverb),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            WordType::Subject => "subject",
            WordType::Verb => "verb",
            WordType::Object => "object",
            WordType::Adjective => "adjective",
            WordType::Adverb => "adverb",
        }
    }

    pub fn korean_label(self) -> &'static str {
        match self {
            WordType::Subject => "주어",
            WordType::Verb => "동사",
            WordType::Object => "목적어",
            WordType::Adjective => "형용사",
            WordType::Adverb => "부사",
        }
    }
}

/// One display token of a sentence. `text` carries its trailing separator so
/// concatenating the tokens of a sentence rebuilds it exactly.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Word {
    pub text: String,
    pub is_interactive: bool,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub word_type: Option<WordType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternatives: Option<Vec<String>>,
}

impl Word {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_interactive: false,
            word_type: None,
            alternatives: None,
        }
    }

    pub fn interactive(
        text: impl Into<String>,
        word_type: Option<WordType>,
        alternatives: Vec<String>,
    ) -> Self {
        Self {
            text: text.into(),
            is_interactive: true,
            word_type,
            alternatives: Some(alternatives),
        }
    }

    /// The word without its trailing punctuation and whitespace.
    pub fn core(&self) -> &str {
        self.text.trim_end().trim_end_matches(TRAILING_PUNCTUATION)
    }

    /// Swap the word for `alternative`, keeping trailing punctuation and the
    /// separator so the sentence still reads correctly.
    pub fn substitute(&mut self, alternative: &str) {
        let suffix = self.text[self.core().len()..].to_string();
        self.text = format!("{}{suffix}", alternative.trim());
    }

    pub fn alternatives(&self) -> &[String] {
        self.alternatives.as_deref().unwrap_or(&[])
    }
}

pub fn sentence_text(words: &[Word]) -> String {
    words.iter().map(|w| w.text.as_str()).collect()
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrillSentence {
    pub id: String,
    pub english: Vec<Word>,
    pub korean: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instruction: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instruction_korean: Option<String>,
}

impl DrillSentence {
    pub fn text(&self) -> String {
        sentence_text(&self.english)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubstitutionDrill {
    #[serde(rename = "type")]
    pub kind: DrillKind,
    #[serde(flatten)]
    pub sentence: DrillSentence,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseDrill {
    #[serde(rename = "type")]
    pub kind: DrillKind,
    #[serde(flatten)]
    pub sentence: DrillSentence,
    pub prompt: String,
    pub prompt_korean: String,
    pub expected_responses: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformationDrill {
    #[serde(rename = "type")]
    pub kind: DrillKind,
    #[serde(flatten)]
    pub sentence: DrillSentence,
    pub target_form: String,
    pub target_form_korean: String,
    pub answer: String,
    pub answer_korean: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpansionDrill {
    #[serde(rename = "type")]
    pub kind: DrillKind,
    #[serde(flatten)]
    pub sentence: DrillSentence,
    pub expansion_cue: String,
    pub expansion_cue_korean: String,
    pub answer: String,
    pub answer_korean: String,
}

/// A multi-turn dialogue; every turn is itself a sentence.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrationDrill {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: DrillKind,
    pub context: String,
    pub context_korean: String,
    pub instruction: String,
    pub instruction_korean: String,
    pub sentences: Vec<DrillSentence>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrillSet {
    pub id: String,
    pub title: String,
    pub title_korean: String,
    pub description: String,
    pub description_korean: String,
    pub substitution: Vec<SubstitutionDrill>,
    pub response: Vec<ResponseDrill>,
    pub transformation: Vec<TransformationDrill>,
    pub expansion: Vec<ExpansionDrill>,
    pub integration: Vec<IntegrationDrill>,
    pub created_at: DateTime<Utc>,
}

impl DrillSet {
    pub fn count(&self, kind: DrillKind) -> usize {
        match kind {
            DrillKind::Substitution => self.substitution.len(),
            DrillKind::Response => self.response.len(),
            DrillKind::Transformation => self.transformation.len(),
            DrillKind::Expansion => self.expansion.len(),
            DrillKind::Integration => self.integration.len(),
        }
    }

    pub fn total(&self) -> usize {
        DrillKind::ALL.iter().map(|&k| self.count(k)).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}
