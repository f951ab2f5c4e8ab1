use super::model::{ChatMessage, ChatReply};
use crate::gemini::model::{InferenceClient, InferenceError, InferenceRequest, Role, Turn};
use std::sync::Arc;
use tracing::debug;

pub const PERSONA: &str = "You are 'Lili', a local Parisian expert assistant for international students. You help with lifestyle, nightlife, bureaucracy, and socializing. Proactively check if the user is new to Paris; if so, prioritize advice on central, accessible, and well-documented locations. Keep your tone chic and helpful. 🇫🇷 ✨";
pub const EMPTY_REPLY: &str = "Pardon, I didn't quite catch that.";

pub struct ChatService {
    client: Arc<dyn InferenceClient>,
    model: String,
}

impl ChatService {
    pub fn new(client: Arc<dyn InferenceClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    /// Replays `history` ahead of `prompt`, so the model sees the whole
    /// conversation on every call.
    #[tracing::instrument(skip(self, prompt, history), fields(turns = history.len()))]
    pub async fn get_chat_response(
        &self,
        prompt: &str,
        history: &[ChatMessage],
    ) -> Result<ChatReply, InferenceError> {
        let turns = conversation_turns(prompt, history);

        debug!("Replaying {} turn(s)", turns.len() - 1);

        let request = InferenceRequest::new(self.model.clone(), prompt)
            .with_turns(turns)
            .with_system_instruction(PERSONA);

        let response = self.client.generate(request).await?;

        Ok(ChatReply {
            text: response
                .text
                .filter(|text| !text.trim().is_empty())
                .unwrap_or_else(|| EMPTY_REPLY.to_string()),
        })
    }
}

/// Model turns before the first user turn (the greeting) are left out, a
/// conversation has to open with the user.
pub fn conversation_turns(prompt: &str, history: &[ChatMessage]) -> Vec<Turn> {
    history
        .iter()
        .skip_while(|message| message.role == Role::Model)
        .map(Turn::from)
        .chain(std::iter::once(Turn::user(prompt)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test_log::test]
    fn should_replay_history_after_greeting() {
        let history = vec![
            ChatMessage::model("Bonjour ! I'm Lili"),
            ChatMessage::user("Where can I get a Navigo pass?"),
            ChatMessage::model("Any metro station counter."),
        ];

        let turns = conversation_turns("And for students?", &history);

        assert_eq!(
            turns,
            vec![
                Turn::user("Where can I get a Navigo pass?"),
                Turn::model("Any metro station counter."),
                Turn::user("And for students?"),
            ]
        );
    }

    #[test_log::test]
    fn when_history_is_empty_should_send_prompt_only() {
        assert_eq!(conversation_turns("Salut", &[]), vec![Turn::user("Salut")]);
    }
}
