use std::sync::Mutex;

use fsidrill::drill::{DrillKind, WordType};
use fsidrill::drill::check::check_response;
use fsidrill::generator::{
    GenerationClient, GenerationError, GenerationRequest, GenerationSettings, GenerationState,
    Orchestrator,
};
use fsidrill::source::SourceText;

/// Replays a canned provider body and records every request it receives.
struct CannedClient {
    reply: Result<String, GenerationError>,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl CannedClient {
    fn with_model_text(text: &str) -> Self {
        let body = serde_json::json!({
            "candidates": [{ "content": { "parts": [{ "text": text }] } }]
        });
        Self::with_body(&body.to_string())
    }

    fn with_body(body: &str) -> Self {
        Self {
            reply: Ok(body.to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }

    fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

impl GenerationClient for CannedClient {
    fn send(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        self.requests.lock().unwrap().push(request.clone());
        self.reply.clone()
    }
}

fn settings(api_key: &str) -> GenerationSettings {
    GenerationSettings {
        api_key: api_key.to_string(),
        ..GenerationSettings::default()
    }
}

const CAT_MAT_REPLY: &str = r#"```json
{
  "title": "On the Mat",
  "titleKorean": "매트 위에서",
  "substitution": [
    {
      "sentence": "The cat sat on the mat.",
      "korean": "고양이가 매트 위에 앉았다.",
      "targetWord": "cat",
      "wordType": "subject",
      "alternatives": ["dog", "bird"]
    }
  ],
  "response": [
    {
      "prompt": "Where did the cat sit?",
      "promptKorean": "고양이는 어디에 앉았나요?",
      "answer": "On the mat.",
      "answerKorean": "매트 위에요."
    }
  ]
}
```"#;

#[test]
fn cat_on_the_mat_end_to_end() {
    let client = CannedClient::with_model_text(CAT_MAT_REPLY);
    let mut orchestrator = Orchestrator::new(settings("test-key"));
    let source = SourceText::inline("The cat sat on the mat.").unwrap();

    let set = orchestrator.generate(&source, &client).unwrap();

    assert_eq!(set.title, "On the Mat");
    assert_eq!(set.count(DrillKind::Substitution), 1);
    assert_eq!(set.count(DrillKind::Response), 1);
    assert_eq!(set.count(DrillKind::Integration), 0);

    let words = &set.substitution[0].sentence.english;
    let texts: Vec<&str> = words.iter().map(|w| w.text.as_str()).collect();
    assert_eq!(texts, vec!["The ", "cat ", "sat ", "on ", "the ", "mat."]);
    assert!(words[1].is_interactive);
    assert_eq!(words[1].word_type, Some(WordType::Subject));
    assert_eq!(words[1].alternatives(), &["dog".to_string(), "bird".to_string()]);
    assert!(words.iter().enumerate().all(|(i, w)| i == 1 || !w.is_interactive));

    let response = &set.response[0];
    assert_eq!(response.expected_responses, vec!["On the mat.".to_string()]);
    assert!(check_response(response, "It sat on the mat"));

    assert_eq!(
        orchestrator.state(),
        &GenerationState::Succeeded {
            drill_set_id: set.id.clone()
        }
    );

    let requests = client.requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].prompt.contains("The cat sat on the mat."));
    assert_eq!(requests[0].api_key, "test-key");
}

#[test]
fn missing_api_key_never_calls_the_service() {
    let client = CannedClient::with_model_text(CAT_MAT_REPLY);
    let mut orchestrator = Orchestrator::new(settings("   "));
    let source = SourceText::inline("The cat sat on the mat.").unwrap();

    let err = orchestrator.generate(&source, &client).unwrap_err();
    assert_eq!(err, GenerationError::MissingApiKey);
    assert_eq!(client.request_count(), 0);
    assert!(matches!(orchestrator.state(), GenerationState::Failed { .. }));
}

#[test]
fn malformed_reply_is_reported_and_orchestrator_recovers() {
    let mut orchestrator = Orchestrator::new(settings("test-key"));
    let source = SourceText::inline("Some text.").unwrap();

    let broken = CannedClient::with_model_text("Sorry, I can't help with that.");
    let err = orchestrator.generate(&source, &broken).unwrap_err();
    assert!(matches!(err, GenerationError::MalformedResponse(_)));
    assert!(!orchestrator.is_in_flight());

    let good = CannedClient::with_model_text(CAT_MAT_REPLY);
    let set = orchestrator.generate(&source, &good).unwrap();
    assert_eq!(set.title, "On the Mat");
}

#[test]
fn provider_error_message_is_surfaced() {
    let client = CannedClient::with_body(r#"{"error": {"code": 429, "message": "Quota exceeded"}}"#);
    let mut orchestrator = Orchestrator::new(settings("test-key"));
    let source = SourceText::inline("Some text.").unwrap();

    let err = orchestrator.generate(&source, &client).unwrap_err();
    assert_eq!(err, GenerationError::Provider("Quota exceeded".to_string()));
    assert_eq!(
        orchestrator.state(),
        &GenerationState::Failed {
            message: err.to_string()
        }
    );
}

#[test]
fn transport_failure_is_surfaced() {
    let client = CannedClient {
        reply: Err(GenerationError::Transport("connection refused".to_string())),
        requests: Mutex::new(Vec::new()),
    };
    let mut orchestrator = Orchestrator::new(settings("test-key"));
    let source = SourceText::inline("Some text.").unwrap();

    let err = orchestrator.generate(&source, &client).unwrap_err();
    assert!(err.to_string().contains("connection refused"));
}

#[test]
fn repeated_generations_get_distinct_ids() {
    let client = CannedClient::with_model_text(CAT_MAT_REPLY);
    let mut orchestrator = Orchestrator::new(settings("test-key"));
    let source = SourceText::inline("The cat sat on the mat.").unwrap();

    let first = orchestrator.generate(&source, &client).unwrap();
    let second = orchestrator.generate(&source, &client).unwrap();
    assert_ne!(first.id, second.id);
}

#[test]
fn long_sources_are_truncated_in_the_prompt() {
    let client = CannedClient::with_model_text("{}");
    let mut orchestrator = Orchestrator::new(GenerationSettings {
        max_source_chars: 200,
        ..settings("test-key")
    });
    let text = format!("{}TAIL_MARKER", "word ".repeat(100));
    let source = SourceText::inline(&text).unwrap();

    let set = orchestrator.generate(&source, &client).unwrap();
    assert!(set.is_empty());
    assert_eq!(set.title, "Pasted text");

    let requests = client.requests.lock().unwrap();
    assert!(!requests[0].prompt.contains("TAIL_MARKER"));
}

#[test]
fn source_files_are_named_after_their_stem() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cafe-lesson.md");
    std::fs::write(&path, "I ordered a latte.").unwrap();

    let client = CannedClient::with_model_text("{}");
    let mut orchestrator = Orchestrator::new(settings("test-key"));
    let source = SourceText::from_file(&path).unwrap();
    let set = orchestrator.generate(&source, &client).unwrap();
    assert_eq!(set.title, "cafe-lesson");
}
