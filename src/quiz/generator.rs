use chatgpt::client::ChatGPT;
use chatgpt::types::CompletionResponse;

use super::{parser, GenerationError, QuizQuestion};

/// The fixed instruction sent to the backend on every round. The layout it
/// asks for is what [`parser`] is tuned to recognize.
const QUESTION_PROMPT: &str = "Generate a multiple-choice question about Cucumber and Capybara testing for freshers. \
The question should have three options and include a short explanation (one or two sentences) for the correct answer. \
Each option should be one word or a maximum of three words. \
Format the response as follows:\n\
Question: [question text]\n\
Options:\n\
1. [option 1]\n\
2. [option 2]\n\
3. [option 3]\n\
Answer: [number of the correct option]\n\
Explanation: [explanation]";

pub struct QuizGenerator {
    chat_gpt: ChatGPT,
}

impl QuizGenerator {
    pub fn new(chat_gpt: ChatGPT) -> Self {
        Self { chat_gpt }
    }

    /// Requests one fresh question from the backend and parses it. Fails if
    /// the call fails or the reply does not yield all four fields; the caller
    /// decides how to surface that.
    pub async fn generate(&self) -> Result<QuizQuestion, GenerationError> {
        log::debug!("Requesting a new quiz question");

        let response: CompletionResponse = self.chat_gpt.send_message(QUESTION_PROMPT).await?;
        let content = response.message().content.clone();

        log::debug!("Completion: {:?}", content);

        parser::parse_question(&content)
    }
}
