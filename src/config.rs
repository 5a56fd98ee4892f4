use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    MissingVar(&'static str),
}

/// Secrets read from the environment at startup. Both are required; there is
/// no other configuration surface.
pub struct Config {
    pub telegram_token: String,
    pub chatgpt_api_key: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            telegram_token: require("TELEGRAM_TOKEN")?,
            chatgpt_api_key: require("CHATGPT_API_KEY")?,
        })
    }
}

fn require(name: &'static str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingVar(name))
}
