//! Assembles retrieval output and conversation state into final prompts.

use crate::template::{render_template, REFLECTION_TEMPLATE, RESPONSE_TEMPLATE};
use crate::types::{render_history, ConversationTurn};
use echomind_core::{AppResult, Language};
use echomind_knowledge::Retrieval;
use serde_json::json;

/// Oldest turns beyond this bound are dropped before rendering.
pub const MAX_HISTORY_TURNS: usize = 20;

/// Builds response and reflection prompts.
#[derive(Debug, Clone, Default)]
pub struct ContextAssembler;

impl ContextAssembler {
    pub fn new() -> Self {
        Self
    }

    /// Build the response prompt for one user query.
    ///
    /// The knowledge-base section carries the retrieved segments joined by
    /// blank lines; when retrieval ran degraded it carries the localized
    /// degraded note instead. The history section appears only when there
    /// are prior turns, capped at the most recent `MAX_HISTORY_TURNS`.
    pub fn assemble_response(
        &self,
        query: &str,
        retrieval: &Retrieval,
        history: &[ConversationTurn],
        language: Language,
    ) -> AppResult<String> {
        let context = if retrieval.degraded {
            language.resources().degraded_note.to_string()
        } else {
            retrieval
                .results
                .iter()
                .map(|r| r.text.as_str())
                .collect::<Vec<_>>()
                .join("\n\n")
        };

        let recent = recent_turns(history);
        let history_block = if recent.is_empty() {
            None
        } else {
            Some(render_history(recent))
        };

        tracing::debug!(
            degraded = retrieval.degraded,
            segments = retrieval.results.len(),
            history_turns = recent.len(),
            "Assembling response prompt"
        );

        render_template(
            RESPONSE_TEMPLATE,
            &json!({
                "language": language.display_name(),
                "history": history_block,
                "context": context,
                "query": query,
            }),
        )
    }

    /// Build the reflection prompt over the conversation so far.
    pub fn assemble_reflection(
        &self,
        history: &[ConversationTurn],
        language: Language,
    ) -> AppResult<String> {
        let recent = recent_turns(history);

        render_template(
            REFLECTION_TEMPLATE,
            &json!({
                "language": language.display_name(),
                "history": render_history(recent),
            }),
        )
    }
}

/// The most recent `MAX_HISTORY_TURNS` turns, oldest dropped first.
fn recent_turns(history: &[ConversationTurn]) -> &[ConversationTurn] {
    let start = history.len().saturating_sub(MAX_HISTORY_TURNS);
    &history[start..]
}
