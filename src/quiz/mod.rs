pub mod generator;
pub mod parser;
pub mod round;

use thiserror::Error;

/// How many answer options every question carries.
pub const OPTION_COUNT: usize = 3;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("AI backend request failed: {0}")]
    Backend(#[from] chatgpt::err::Error),
    #[error("malformed AI response: {0}")]
    Malformed(&'static str),
}

/// One generated question. Lives for a single round: built from the parsed
/// backend response, rendered as a message with answer buttons, then dropped.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct QuizQuestion {
    pub prompt: String,
    pub options: [String; OPTION_COUNT],
    pub correct_index: usize,
    pub explanation: String,
}
