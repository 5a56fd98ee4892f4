use std::sync::Arc;

use teloxide::prelude::*;
use teloxide::types::{ChatId, InlineKeyboardButton, InlineKeyboardMarkup};
use teloxide::utils::command::BotCommands;

use crate::quiz::generator::QuizGenerator;
use crate::quiz::round::{ActiveRounds, Selection};
use crate::quiz::QuizQuestion;

pub type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase", description = "Supported commands:")]
pub enum Command {
    #[command(description = "show the welcome message.")]
    Start,
    #[command(description = "list the available commands.")]
    Help,
    #[command(description = "get a new question about Cucumber and Capybara testing.")]
    Quiz,
}

const GREETING_TEXT: &str = "\u{1F44B} Welcome to the Cucumber + Capybara Quiz Bot!\n\n\
    Use /quiz to get a new question about Cucumber and Capybara testing. \
    Each question has three options, and you'll get an explanation for the correct answer.";

const GENERATION_FAILED_TEXT: &str =
    "Sorry, failed to generate a quiz question. Please try /quiz again.";

const ROUND_FINISHED_TEXT: &str = "This question has already been answered.";

pub async fn handle_command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    generator: Arc<QuizGenerator>,
    rounds: Arc<ActiveRounds>,
) -> HandlerResult {
    match cmd {
        Command::Start => {
            bot.send_message(msg.chat.id, GREETING_TEXT).await?;
        }
        Command::Help => {
            bot.send_message(msg.chat.id, Command::descriptions().to_string())
                .await?;
        }
        Command::Quiz => send_quiz(&bot, msg.chat.id, &generator, &rounds).await?,
    }
    Ok(())
}

/// One round: ask the generator for a question, render it with one answer
/// button per option and remember the explanation for the verdict. A failed
/// generation turns into a friendly message; the user simply retries.
async fn send_quiz(
    bot: &Bot,
    chat_id: ChatId,
    generator: &QuizGenerator,
    rounds: &ActiveRounds,
) -> HandlerResult {
    match generator.generate().await {
        Ok(question) => {
            let sent = bot
                .send_message(chat_id, question.prompt.clone())
                .reply_markup(answer_keyboard(&question))
                .await?;
            rounds.begin(chat_id, sent.id, question.explanation).await;
        }
        Err(err) => {
            log::error!("Failed to generate a quiz question: {}", err);
            bot.send_message(chat_id, GENERATION_FAILED_TEXT).await?;
        }
    }
    Ok(())
}

/// A user pressed one of the answer buttons. Judges the selection from the
/// button payload, then replaces the quiz message with the verdict and the
/// stored explanation. Pressing again after the round resolved only gets a
/// short notice.
pub async fn handle_selection(
    bot: Bot,
    q: CallbackQuery,
    rounds: Arc<ActiveRounds>,
) -> HandlerResult {
    let (Some(data), Some(message)) = (q.data.as_deref(), q.message.as_ref()) else {
        bot.answer_callback_query(q.id.clone()).await?;
        return Ok(());
    };

    let Some(selection) = Selection::decode(data) else {
        log::warn!("Unrecognized callback payload: {:?}", data);
        bot.answer_callback_query(q.id.clone()).await?;
        return Ok(());
    };

    match rounds.resolve(message.chat.id, message.id).await {
        Some(explanation) => {
            bot.answer_callback_query(q.id.clone()).await?;

            let verdict = verdict_text(selection.is_correct(), &explanation);
            let text = match message.text() {
                Some(prompt) => format!("{}\n\n{}", prompt, verdict),
                None => verdict,
            };
            // Editing also drops the keyboard, closing the round.
            bot.edit_message_text(message.chat.id, message.id, text)
                .await?;
        }
        None => {
            bot.answer_callback_query(q.id.clone())
                .text(ROUND_FINISHED_TEXT)
                .await?;
        }
    }
    Ok(())
}

fn answer_keyboard(question: &QuizQuestion) -> InlineKeyboardMarkup {
    let rows = question
        .options
        .iter()
        .enumerate()
        .map(|(index, option)| {
            let payload = Selection {
                chosen: index,
                correct: question.correct_index,
            };
            vec![InlineKeyboardButton::callback(
                option.clone(),
                payload.encode(),
            )]
        })
        .collect::<Vec<_>>();
    InlineKeyboardMarkup::new(rows)
}

fn verdict_text(is_correct: bool, explanation: &str) -> String {
    if is_correct {
        format!("\u{2705} Correct!\n\n{}", explanation)
    } else {
        format!("\u{274C} Incorrect.\n\n{}", explanation)
    }
}
