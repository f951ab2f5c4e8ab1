use super::api::ChatService;
use super::model::ChatMessage;
use crate::loading::LoadingGuard;
use tracing::error;

pub const GREETING: &str = "Bonjour ! I'm Lili, your Parisian student pal. Need help with parties, finding an apartment, or just wondering where the best croissant is? Ask away! ✨";
pub const APOLOGY: &str =
    "Désolée, I had a little trouble processing that. Can you try again?";

/// The assistant's transcript. Append-only until [`ChatSession::reset`].
#[derive(Debug)]
pub struct ChatSession {
    messages: Vec<ChatMessage>,
    loading: bool,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self {
            messages: vec![ChatMessage::model(GREETING)],
            loading: false,
        }
    }
}

impl ChatSession {
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Blank input, or input while a reply is pending, is ignored. A failed
    /// call still gets an answer: the apology.
    pub async fn send(&mut self, service: &ChatService, input: &str) -> Option<&ChatMessage> {
        if input.trim().is_empty() || self.loading {
            return None;
        }

        let history = self.messages.clone();
        self.messages.push(ChatMessage::user(input));

        let reply = {
            let _loading = LoadingGuard::new(&mut self.loading);

            match service.get_chat_response(input, &history).await {
                Ok(reply) => ChatMessage::model(reply.text),
                Err(e) => {
                    error!("Chat request failed: {}", e);
                    ChatMessage::model(APOLOGY)
                }
            }
        };

        self.messages.push(reply);

        self.messages.last()
    }
}
