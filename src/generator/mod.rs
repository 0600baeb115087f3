pub mod client;
pub mod error;
pub mod prompt;
pub mod response;

use crate::drill::mapper::map_payload;
use crate::drill::{DrillKind, DrillSet};
use crate::source::SourceText;

pub use client::{GeminiClient, GenerationClient, GenerationRequest};
pub use error::GenerationError;

/// Values the orchestrator needs from the configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerationSettings {
    pub api_key: String,
    pub endpoint: String,
    pub model: String,
    pub max_source_chars: usize,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            endpoint: client::DEFAULT_ENDPOINT.to_string(),
            model: client::DEFAULT_MODEL.to_string(),
            max_source_chars: prompt::DEFAULT_MAX_SOURCE_CHARS,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum GenerationState {
    #[default]
    Idle,
    InFlight {
        source_name: String,
    },
    Succeeded {
        drill_set_id: String,
    },
    Failed {
        message: String,
    },
}

/// A validated request, ready to run off the UI thread.
#[derive(Debug)]
pub struct GenerationJob {
    source_name: String,
    request: GenerationRequest,
}

/// What a finished job hands back to the orchestrator.
#[derive(Debug)]
pub struct GenerationOutcome {
    pub source_name: String,
    pub result: Result<DrillSet, GenerationError>,
}

impl GenerationJob {
    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    pub fn request(&self) -> &GenerationRequest {
        &self.request
    }

    /// One request, no retries. Blocks until the provider answers.
    pub fn run(self, client: &dyn GenerationClient) -> GenerationOutcome {
        let result = client
            .send(&self.request)
            .and_then(|body| response::decode_body(&body))
            .map(|payload| map_payload(&payload, &self.source_name));
        GenerationOutcome {
            source_name: self.source_name,
            result,
        }
    }
}

/// Turns source text into a drill set and tracks the progress of the
/// current request.
pub struct Orchestrator {
    settings: GenerationSettings,
    state: GenerationState,
}

impl Orchestrator {
    pub fn new(settings: GenerationSettings) -> Self {
        Self {
            settings,
            state: GenerationState::Idle,
        }
    }

    pub fn state(&self) -> &GenerationState {
        &self.state
    }

    pub fn is_in_flight(&self) -> bool {
        matches!(self.state, GenerationState::InFlight { .. })
    }

    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: GenerationSettings) {
        self.settings = settings;
    }

    pub fn begin(&mut self, source: &SourceText) -> Result<GenerationJob, GenerationError> {
        let api_key = self.settings.api_key.trim();
        if api_key.is_empty() {
            let err = GenerationError::MissingApiKey;
            tracing::warn!(source = %source.name, "generation refused: no API key");
            self.state = GenerationState::Failed {
                message: err.to_string(),
            };
            return Err(err);
        }

        let prompt = prompt::build_prompt(&source.content, self.settings.max_source_chars);
        let request = GenerationRequest {
            endpoint: self.settings.endpoint.clone(),
            model: self.settings.model.clone(),
            api_key: api_key.to_string(),
            prompt,
        };
        tracing::info!(
            source = %source.name,
            model = %request.model,
            source_chars = source.content.chars().count(),
            "starting drill generation"
        );

        self.state = GenerationState::InFlight {
            source_name: source.name.clone(),
        };
        Ok(GenerationJob {
            source_name: source.name.clone(),
            request,
        })
    }

    pub fn complete(&mut self, outcome: GenerationOutcome) -> Result<DrillSet, GenerationError> {
        match &outcome.result {
            Ok(set) => {
                tracing::info!(
                    source = %outcome.source_name,
                    id = %set.id,
                    substitution = set.count(DrillKind::Substitution),
                    response = set.count(DrillKind::Response),
                    transformation = set.count(DrillKind::Transformation),
                    expansion = set.count(DrillKind::Expansion),
                    integration = set.count(DrillKind::Integration),
                    "drill generation succeeded"
                );
                self.state = GenerationState::Succeeded {
                    drill_set_id: set.id.clone(),
                };
            }
            Err(err) => {
                tracing::error!(source = %outcome.source_name, error = %err, "drill generation failed");
                self.state = GenerationState::Failed {
                    message: err.to_string(),
                };
            }
        }
        outcome.result
    }

    /// `begin`, `run` and `complete` on the calling thread.
    pub fn generate(
        &mut self,
        source: &SourceText,
        client: &dyn GenerationClient,
    ) -> Result<DrillSet, GenerationError> {
        let job = self.begin(source)?;
        let outcome = job.run(client);
        self.complete(outcome)
    }
}
