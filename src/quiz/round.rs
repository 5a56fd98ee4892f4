//! Per-round correlation data: what a quiz message needs to carry so that a
//! later button press can be judged without any session store.

use std::collections::HashMap;

use teloxide::types::{ChatId, MessageId};
use tokio::sync::Mutex;

const PAYLOAD_PREFIX: &str = "answer:";

/// The payload attached to one answer button. Encodes which option the
/// button represents and which one is correct, so correctness is decidable
/// from the callback data alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub chosen: usize,
    pub correct: usize,
}

impl Selection {
    pub fn encode(&self) -> String {
        format!("{PAYLOAD_PREFIX}{}:{}", self.chosen, self.correct)
    }

    pub fn decode(data: &str) -> Option<Self> {
        let rest = data.strip_prefix(PAYLOAD_PREFIX)?;
        let (chosen, correct) = rest.split_once(':')?;
        Some(Self {
            chosen: chosen.parse().ok()?,
            correct: correct.parse().ok()?,
        })
    }

    pub fn is_correct(&self) -> bool {
        self.chosen == self.correct
    }
}

/// Explanations for quiz messages that have not been answered yet, keyed by
/// the message they are attached to. Telegram caps callback payloads at 64
/// bytes, so the explanation cannot ride along on the button itself.
#[derive(Default)]
pub struct ActiveRounds {
    explanations: Mutex<HashMap<(i64, i32), String>>,
}

impl ActiveRounds {
    pub async fn begin(&self, chat_id: ChatId, message_id: MessageId, explanation: String) {
        self.explanations
            .lock()
            .await
            .insert((chat_id.0, message_id.0), explanation);
    }

    /// Removes and returns the explanation for the given quiz message, so a
    /// second selection on the same message finds nothing to resolve.
    pub async fn resolve(&self, chat_id: ChatId, message_id: MessageId) -> Option<String> {
        self.explanations
            .lock()
            .await
            .remove(&(chat_id.0, message_id.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_round_trips() {
        let selection = Selection {
            chosen: 2,
            correct: 0,
        };
        assert_eq!(Selection::decode(&selection.encode()), Some(selection));
    }

    #[test]
    fn foreign_payloads_are_rejected() {
        assert_eq!(Selection::decode(""), None);
        assert_eq!(Selection::decode("answer:"), None);
        assert_eq!(Selection::decode("answer:one:two"), None);
        assert_eq!(Selection::decode("poll:1:2"), None);
    }

    #[test]
    fn correctness_matches_indices() {
        assert!(Selection {
            chosen: 1,
            correct: 1
        }
        .is_correct());
        assert!(!Selection {
            chosen: 0,
            correct: 1
        }
        .is_correct());
    }

    #[tokio::test]
    async fn explanation_resolves_exactly_once() {
        let rounds = ActiveRounds::default();
        let chat = ChatId(7);
        let message = MessageId(42);

        rounds.begin(chat, message, "Given sets up context.".into()).await;

        assert_eq!(
            rounds.resolve(chat, message).await.as_deref(),
            Some("Given sets up context.")
        );
        assert_eq!(rounds.resolve(chat, message).await, None);
    }

    #[tokio::test]
    async fn rounds_are_independent_per_message() {
        let rounds = ActiveRounds::default();
        let chat = ChatId(7);

        rounds.begin(chat, MessageId(1), "first".into()).await;
        rounds.begin(chat, MessageId(2), "second".into()).await;

        assert_eq!(rounds.resolve(chat, MessageId(2)).await.as_deref(), Some("second"));
        assert_eq!(rounds.resolve(chat, MessageId(1)).await.as_deref(), Some("first"));
    }
}
