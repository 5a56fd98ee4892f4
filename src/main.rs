mod bot;
mod config;
mod quiz;

use std::sync::Arc;
use std::time::Duration;

use chatgpt::client::ChatGPT;
use chatgpt::config::ChatGPTEngine;
use dotenv::dotenv;
use teloxide::prelude::*;

use bot::Command;
use config::Config;
use quiz::generator::QuizGenerator;
use quiz::round::ActiveRounds;

// Model creativity, carried over from the original bot.
const MODEL_TEMPERATURE: f32 = 0.85;

#[tokio::main]
async fn main() {
    dotenv().ok();
    pretty_env_logger::init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            log::error!("Configuration error: {}", err);
            std::process::exit(1);
        }
    };

    log::info!("Starting the Cucumber + Capybara quiz bot...");

    let bot = Bot::new(config.telegram_token);

    let gpt = {
        let mut gpt = match ChatGPT::new(config.chatgpt_api_key) {
            Ok(gpt) => gpt,
            Err(err) => {
                log::error!("Unable to set up the ChatGPT client: {}", err);
                std::process::exit(1);
            }
        };

        gpt.config.engine = ChatGPTEngine::Gpt35Turbo;
        gpt.config.temperature = MODEL_TEMPERATURE;
        gpt.config.timeout = Duration::from_secs(15);

        gpt
    };

    let generator = Arc::new(QuizGenerator::new(gpt));
    let rounds = Arc::new(ActiveRounds::default());

    let handler = dptree::entry()
        .branch(
            Update::filter_message()
                .filter_command::<Command>()
                .endpoint(bot::handle_command),
        )
        .branch(Update::filter_callback_query().endpoint(bot::handle_selection));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![generator, rounds])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}
