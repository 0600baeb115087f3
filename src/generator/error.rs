use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GenerationError {
    #[error("no API key configured; add one in Settings")]
    MissingApiKey,
    #[error("could not reach the generation service: {0}")]
    Transport(String),
    #[error("the generation service returned an error: {0}")]
    Provider(String),
    #[error("could not understand the generated drills: {0}")]
    MalformedResponse(String),
}
