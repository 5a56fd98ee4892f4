//! Turns the free-form completion text into a [`QuizQuestion`].
//!
//! The backend is asked for a `Question / Options / Answer / Explanation`
//! layout but the reply is not guaranteed to follow it, so parsing runs as a
//! state machine over lines and fails loudly instead of guessing.

use super::{GenerationError, QuizQuestion, OPTION_COUNT};

enum State {
    Prompt,
    Options,
    Explanation,
}

pub fn parse_question(text: &str) -> Result<QuizQuestion, GenerationError> {
    let mut state = State::Prompt;
    let mut prompt_lines: Vec<&str> = Vec::new();
    let mut options: Vec<String> = Vec::new();
    let mut answer_token: Option<&str> = None;
    let mut explanation_lines: Vec<&str> = Vec::new();

    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        match state {
            State::Prompt => {
                if let Some(token) = answer_marker(line) {
                    answer_token = Some(token);
                    state = State::Explanation;
                } else if let Some(option) = option_text(line) {
                    options.push(option);
                    state = State::Options;
                } else if !line.eq_ignore_ascii_case("options:") {
                    prompt_lines.push(strip_label(line, "Question:"));
                }
            }
            State::Options => {
                if let Some(token) = answer_marker(line) {
                    answer_token = Some(token);
                    state = State::Explanation;
                } else if let Some(option) = option_text(line) {
                    // Keep the first three; the prompt asks for exactly three
                    // but the model occasionally pads the list.
                    if options.len() < OPTION_COUNT {
                        options.push(option);
                    }
                }
            }
            State::Explanation => explanation_lines.push(strip_label(line, "Explanation:")),
        }
    }

    if options.len() < OPTION_COUNT {
        return Err(GenerationError::Malformed("fewer than 3 answer options"));
    }
    let options: [String; OPTION_COUNT] = options
        .try_into()
        .map_err(|_| GenerationError::Malformed("fewer than 3 answer options"))?;

    let correct_index = match answer_token {
        Some(token) => resolve_correct(token, &options)?,
        None => return Err(GenerationError::Malformed("no correct-answer marker")),
    };

    let prompt = prompt_lines.join(" ").trim().to_string();
    if prompt.is_empty() {
        return Err(GenerationError::Malformed("empty question text"));
    }

    let explanation = explanation_lines.join(" ").trim().to_string();
    if explanation.is_empty() {
        return Err(GenerationError::Malformed("empty explanation"));
    }

    Ok(QuizQuestion {
        prompt,
        options,
        correct_index,
        explanation,
    })
}

/// `1. Given`, `2) Click`, `A) Submit`, `b. When` -> the option text.
fn option_text(line: &str) -> Option<String> {
    let mut chars = line.chars();
    let marker = chars.next()?;
    let delimiter = chars.next()?;
    if !marker.is_ascii_alphanumeric() || !matches!(delimiter, '.' | ')') {
        return None;
    }
    let rest = chars.as_str().trim();
    if rest.is_empty() {
        return None;
    }
    Some(rest.to_string())
}

/// `Correct Answer: B`, `Answer: 2`, `Correct: Given` -> the marker value.
fn answer_marker(line: &str) -> Option<&str> {
    // "Correct Answer" must be tried before "Correct".
    for label in ["Correct Answer", "Answer", "Correct"] {
        if let Some(head) = line.get(..label.len()) {
            if head.eq_ignore_ascii_case(label) {
                if let Some(value) = line[label.len()..].trim_start().strip_prefix(':') {
                    return Some(value.trim());
                }
            }
        }
    }
    None
}

fn strip_label<'a>(line: &'a str, label: &str) -> &'a str {
    match line.get(..label.len()) {
        Some(head) if head.eq_ignore_ascii_case(label) => line[label.len()..].trim_start(),
        _ => line,
    }
}

/// Maps the answer-marker value onto an option index, by letter, by number or
/// by exact option text. Anything unresolvable is an error, never a default.
fn resolve_correct(token: &str, options: &[String]) -> Result<usize, GenerationError> {
    let compact = token.trim_end_matches(['.', ')']);
    if compact.len() == 1 {
        if let Some(c) = compact.chars().next() {
            if c.is_ascii_alphabetic() {
                let index = (c.to_ascii_uppercase() as usize) - ('A' as usize);
                return if index < options.len() {
                    Ok(index)
                } else {
                    Err(GenerationError::Malformed("correct answer out of range"))
                };
            }
            if let Some(number) = c.to_digit(10) {
                let number = number as usize;
                return if (1..=options.len()).contains(&number) {
                    Ok(number - 1)
                } else {
                    Err(GenerationError::Malformed("correct answer out of range"))
                };
            }
        }
    }

    options
        .iter()
        .position(|option| option == token)
        .ok_or(GenerationError::Malformed("unrecognized correct-answer marker"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(question: &QuizQuestion) -> Vec<&str> {
        question.options.iter().map(String::as_str).collect()
    }

    #[test]
    fn parses_numbered_response() {
        let question = parse_question(
            "What is a Gherkin keyword?\n1. Given\n2. Click\n3. Submit\nAnswer: 1\nExplanation: Given sets up initial context.",
        )
        .unwrap();

        assert_eq!(question.prompt, "What is a Gherkin keyword?");
        assert_eq!(options(&question), ["Given", "Click", "Submit"]);
        assert_eq!(question.correct_index, 0);
        assert_eq!(question.explanation, "Given sets up initial context.");
    }

    #[test]
    fn parses_answer_by_number_two() {
        let question = parse_question(
            "What is a Gherkin keyword?\n1. Given\n2. Click\n3. Submit\nAnswer: 2\nExplanation: Given sets up initial context.",
        )
        .unwrap();

        assert_eq!(question.correct_index, 1);
    }

    #[test]
    fn parses_labelled_lettered_response() {
        let question = parse_question(
            "Question: Which tool drives the browser?\nOptions:\nA) Cucumber\nB) Capybara\nC) Gherkin\nCorrect Answer: B\nExplanation: Capybara simulates user interaction with web pages.",
        )
        .unwrap();

        assert_eq!(question.prompt, "Which tool drives the browser?");
        assert_eq!(options(&question), ["Cucumber", "Capybara", "Gherkin"]);
        assert_eq!(question.correct_index, 1);
        assert_eq!(
            question.explanation,
            "Capybara simulates user interaction with web pages."
        );
    }

    #[test]
    fn resolves_answer_by_exact_option_text() {
        let question = parse_question(
            "Which keyword starts a scenario?\n1. Given\n2. Scenario\n3. Then\nCorrect: Scenario\nExplanation: Scenario names one concrete test case.",
        )
        .unwrap();

        assert_eq!(question.correct_index, 1);
    }

    #[test]
    fn joins_multi_line_prompt_and_explanation() {
        let question = parse_question(
            "Question: In a Cucumber feature file,\nwhich keyword comes first?\n1. Feature\n2. Given\n3. When\nAnswer: 1\nExplanation: Every feature file opens\nwith the Feature keyword.",
        )
        .unwrap();

        assert_eq!(
            question.prompt,
            "In a Cucumber feature file, which keyword comes first?"
        );
        assert_eq!(
            question.explanation,
            "Every feature file opens with the Feature keyword."
        );
    }

    #[test]
    fn extra_options_beyond_three_are_ignored() {
        let question = parse_question(
            "Pick the Capybara method.\n1. visit\n2. Given\n3. Feature\n4. Scenario\nAnswer: 1\nExplanation: visit navigates the simulated browser.",
        )
        .unwrap();

        assert_eq!(options(&question), ["visit", "Given", "Feature"]);
    }

    #[test]
    fn missing_answer_marker_is_an_error() {
        let err = parse_question(
            "What is a Gherkin keyword?\n1. Given\n2. Click\n3. Submit\nExplanation: Given sets up initial context.",
        )
        .unwrap_err();

        assert!(matches!(err, GenerationError::Malformed(_)));
    }

    #[test]
    fn fewer_than_three_options_is_an_error() {
        let err = parse_question(
            "What is a Gherkin keyword?\n1. Given\n2. Click\nAnswer: 1\nExplanation: Given sets up initial context.",
        )
        .unwrap_err();

        assert!(matches!(err, GenerationError::Malformed(_)));
    }

    #[test]
    fn out_of_range_answer_is_an_error() {
        let err = parse_question(
            "What is a Gherkin keyword?\n1. Given\n2. Click\n3. Submit\nAnswer: D\nExplanation: Given sets up initial context.",
        )
        .unwrap_err();

        assert!(matches!(err, GenerationError::Malformed(_)));
    }

    #[test]
    fn unresolvable_answer_text_is_an_error() {
        let err = parse_question(
            "What is a Gherkin keyword?\n1. Given\n2. Click\n3. Submit\nAnswer: probably the first\nExplanation: Given sets up initial context.",
        )
        .unwrap_err();

        assert!(matches!(err, GenerationError::Malformed(_)));
    }

    #[test]
    fn missing_prompt_is_an_error() {
        let err = parse_question(
            "1. Given\n2. Click\n3. Submit\nAnswer: 1\nExplanation: Given sets up initial context.",
        )
        .unwrap_err();

        assert!(matches!(err, GenerationError::Malformed(_)));
    }

    #[test]
    fn missing_explanation_is_an_error() {
        let err = parse_question(
            "What is a Gherkin keyword?\n1. Given\n2. Click\n3. Submit\nAnswer: 1\nExplanation:",
        )
        .unwrap_err();

        assert!(matches!(err, GenerationError::Malformed(_)));
    }

    #[test]
    fn empty_response_is_an_error() {
        assert!(matches!(
            parse_question("").unwrap_err(),
            GenerationError::Malformed(_)
        ));
    }
}
