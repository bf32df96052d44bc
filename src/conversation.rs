// Conversation transcript of one planning cycle
//
// Turns are appended in the order they happen and never edited. Tool turns
// carry the name of the tool (specialist) that produced them.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Assistant,
    Tool,
}

impl fmt::Display for TurnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TurnRole::User => write!(f, "user"),
            TurnRole::Assistant => write!(f, "assistant"),
            TurnRole::Tool => write!(f, "tool"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: TurnRole,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool: Option<String>,
}

impl ConversationTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            content: content.into(),
            tool: None,
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Assistant,
            content: content.into(),
            tool: None,
        }
    }

    pub fn tool(tool: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Tool,
            content: content.into(),
            tool: Some(tool.into()),
        }
    }
}

/// Append-only list of turns
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    turns: Vec<ConversationTurn>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, turn: ConversationTurn) {
        tracing::debug!("transcript += {} ({} chars)", turn.role, turn.content.len());
        self.turns.push(turn);
    }

    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Tool turns produced by `tool`, in order
    pub fn tool_turns<'a>(&'a self, tool: &'a str) -> impl Iterator<Item = &'a ConversationTurn> {
        self.turns
            .iter()
            .filter(move |t| t.role == TurnRole::Tool && t.tool.as_deref() == Some(tool))
    }

    pub fn into_turns(self) -> Vec<ConversationTurn> {
        self.turns
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transcript_keeps_order() {
        let mut transcript = Transcript::new();
        transcript.push(ConversationTurn::user("5 days in Tokyo"));
        transcript.push(ConversationTurn::tool("planner_agent", "Day 1: Asakusa"));
        transcript.push(ConversationTurn::tool("budget_agent", "$1500"));
        transcript.push(ConversationTurn::assistant("{}"));

        let roles: Vec<TurnRole> = transcript.turns().iter().map(|t| t.role).collect();
        assert_eq!(
            roles,
            vec![TurnRole::User, TurnRole::Tool, TurnRole::Tool, TurnRole::Assistant]
        );
        assert_eq!(transcript.tool_turns("budget_agent").count(), 1);
    }

    #[test]
    fn test_turn_serialization() {
        let json = serde_json::to_string(&ConversationTurn::user("hi")).unwrap();
        assert_eq!(json, r#"{"role":"user","content":"hi"}"#);
    }
}
