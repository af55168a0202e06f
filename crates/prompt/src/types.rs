//! Conversation types shared by prompt assembly and the assistant loop.

use serde::{Deserialize, Serialize};

/// Who produced a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Label used when rendering history into a prompt.
    pub fn prompt_label(&self) -> &'static str {
        match self {
            Role::User => "Person",
            Role::Assistant => "EchoMind",
        }
    }
}

/// One message in the conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
}

impl ConversationTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Number of user turns in a conversation.
pub fn user_turn_count(history: &[ConversationTurn]) -> usize {
    history.iter().filter(|t| t.role == Role::User).count()
}

/// Render history as labeled lines ("Person: ...", "EchoMind: ...").
pub fn render_history(history: &[ConversationTurn]) -> String {
    let mut rendered = String::new();
    for turn in history {
        rendered.push_str(turn.role.prompt_label());
        rendered.push_str(": ");
        rendered.push_str(&turn.content);
        rendered.push_str("\n\n");
    }
    rendered
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_turn_count() {
        let history = vec![
            ConversationTurn::user("hi"),
            ConversationTurn::assistant("hello"),
            ConversationTurn::user("how are you"),
        ];
        assert_eq!(user_turn_count(&history), 2);
    }

    #[test]
    fn test_render_history_labels() {
        let history = vec![
            ConversationTurn::user("I feel stuck"),
            ConversationTurn::assistant("Tell me more"),
        ];
        let rendered = render_history(&history);
        assert_eq!(rendered, "Person: I feel stuck\n\nEchoMind: Tell me more\n\n");
    }
}
