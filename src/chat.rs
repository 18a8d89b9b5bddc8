use crate::models::{HistoryEntry, Role};
use chrono::{DateTime, Local};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Assistant,
    Error,
}

/// Represents a chat message
#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub sender: Sender,
    pub content: String,
    pub timestamp: DateTime<Local>,
    /// Canned reply the backend sends when its model is offline.
    pub fallback: bool,
}

impl ChatMessage {
    pub fn new(sender: Sender, content: impl Into<String>) -> Self {
        Self {
            sender,
            content: content.into(),
            timestamp: Local::now(),
            fallback: false,
        }
    }

    pub fn fallback(content: impl Into<String>) -> Self {
        Self {
            fallback: true,
            ..Self::new(Sender::Assistant, content)
        }
    }
}

#[derive(Debug, Default)]
pub struct Conversation {
    pub messages: Vec<ChatMessage>,
}

impl Conversation {
    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// The turns the backend should see as context, newest `limit` entries,
    /// oldest first. A user message only counts once a real assistant reply
    /// answered it; questions that ended in an error or a fallback are dropped.
    pub fn history(&self, limit: usize) -> Vec<HistoryEntry> {
        let mut entries = Vec::new();
        let mut pending: Option<&ChatMessage> = None;

        for message in &self.messages {
            match message.sender {
                Sender::User => pending = Some(message),
                Sender::Assistant if !message.fallback => {
                    if let Some(question) = pending.take() {
                        entries.push(HistoryEntry {
                            role: Role::User,
                            content: question.content.clone(),
                        });
                        entries.push(HistoryEntry {
                            role: Role::Assistant,
                            content: message.content.clone(),
                        });
                    }
                }
                Sender::Assistant | Sender::Error => pending = None,
            }
        }

        let skip = entries.len().saturating_sub(limit);
        entries.into_iter().skip(skip).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_skips_errors_and_fallbacks() {
        let mut conv = Conversation::default();
        conv.push(ChatMessage::new(Sender::User, "what is jvara"));
        conv.push(ChatMessage::new(Sender::Error, "Server error 500: boom"));
        conv.push(ChatMessage::new(Sender::User, "what is jvara"));
        conv.push(ChatMessage::fallback("AI unavailable, but raw search is working."));
        conv.push(ChatMessage::new(Sender::User, "again"));
        conv.push(ChatMessage::new(Sender::Assistant, "Fever."));

        let history = conv.history(10);
        assert_eq!(
            history,
            vec![
                HistoryEntry {
                    role: Role::User,
                    content: "again".to_string(),
                },
                HistoryEntry {
                    role: Role::Assistant,
                    content: "Fever.".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_unanswered_question_is_not_history() {
        let mut conv = Conversation::default();
        conv.push(ChatMessage::new(Sender::User, "what is jvara"));
        assert!(conv.history(10).is_empty());

        conv.push(ChatMessage::new(Sender::Error, "Request failed: refused"));
        assert!(conv.history(10).is_empty());
    }

    #[test]
    fn test_history_keeps_most_recent_entries() {
        let mut conv = Conversation::default();
        for i in 0..6 {
            conv.push(ChatMessage::new(Sender::User, format!("q{}", i)));
            conv.push(ChatMessage::new(Sender::Assistant, format!("a{}", i)));
        }

        let history = conv.history(3);
        let contents: Vec<&str> = history.iter().map(|h| h.content.as_str()).collect();
        assert_eq!(contents, vec!["a4", "q5", "a5"]);
    }
}
