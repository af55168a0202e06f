//! Prompt assembly crate for the EchoMind assistant.
//!
//! Turns retrieval output, conversation history, and the language setting
//! into the final prompts sent to the generation provider.

pub mod assembler;
pub mod template;
pub mod types;

pub use assembler::{ContextAssembler, MAX_HISTORY_TURNS};
pub use template::{render_template, REFLECTION_TEMPLATE, RESPONSE_TEMPLATE};
pub use types::{render_history, user_turn_count, ConversationTurn, Role};
