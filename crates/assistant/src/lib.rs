//! Response orchestration for the EchoMind assistant.
//!
//! Drives one request through retrieval, prompt assembly, and generation.
//! The failure policy follows the supportive-assistant contract: only
//! invalid caller input surfaces as an error. Every downstream failure is
//! logged and converted into a localized apology so the conversation can
//! continue.

use echomind_core::{AppError, AppResult, Language};
use echomind_knowledge::Retriever;
use echomind_llm::{LlmClient, LlmRequest};
use echomind_prompt::{user_turn_count, ContextAssembler, ConversationTurn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Where a request currently is in the pipeline. Logged on every
/// transition so failures can be placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RequestState {
    Retrieving,
    Assembling,
    Generating,
    Done,
    Failed,
}

/// A generated response with its provenance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantResponse {
    /// The assistant's reply text
    pub response: String,

    /// Citations for the segments that informed the reply; empty when
    /// retrieval ran degraded or the reply is an apology
    pub sources: Vec<String>,
}

/// A generated conversation reflection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReflectionResponse {
    pub reflection: String,
}

/// Orchestrates retrieval, assembly, and generation for one session.
pub struct Assistant {
    retriever: Retriever,
    assembler: ContextAssembler,
    llm: Arc<dyn LlmClient>,
    model: String,
    temperature: f32,
}

impl Assistant {
    pub fn new(
        retriever: Retriever,
        llm: Arc<dyn LlmClient>,
        model: impl Into<String>,
        temperature: f32,
    ) -> Self {
        Self {
            retriever,
            assembler: ContextAssembler::new(),
            llm,
            model: model.into(),
            temperature: temperature.clamp(0.0, 1.0),
        }
    }

    /// Generate a response to one user query.
    ///
    /// Returns `Err` only for an empty query. Retrieval running degraded
    /// still produces a real response (with no sources); an embedding or
    /// generation failure produces the localized apology instead.
    pub async fn generate_response(
        &self,
        query: &str,
        history: &[ConversationTurn],
        language: Language,
    ) -> AppResult<AssistantResponse> {
        if query.trim().is_empty() {
            return Err(AppError::InvalidInput("Query must not be empty".to_string()));
        }

        let mut state = RequestState::Retrieving;
        tracing::debug!(?state, "Handling query");

        let retrieval = match self.retriever.retrieve(query).await {
            Ok(retrieval) => retrieval,
            Err(e) => {
                state = RequestState::Failed;
                tracing::error!(?state, error = %e, "Retrieval failed");
                return Ok(self.apology(language));
            }
        };

        state = RequestState::Assembling;
        tracing::debug!(?state, degraded = retrieval.degraded, "Assembling prompt");

        let prompt = match self
            .assembler
            .assemble_response(query, &retrieval, history, language)
        {
            Ok(prompt) => prompt,
            Err(e) => {
                state = RequestState::Failed;
                tracing::error!(?state, error = %e, "Prompt assembly failed");
                return Ok(self.apology(language));
            }
        };

        state = RequestState::Generating;
        tracing::debug!(?state, model = %self.model, "Requesting completion");

        let request =
            LlmRequest::new(prompt, self.model.clone()).with_temperature(self.temperature);

        match self.llm.complete(&request).await {
            Ok(llm_response) => {
                state = RequestState::Done;
                tracing::debug!(?state, "Query handled");

                let sources = retrieval.results.iter().map(|r| r.citation()).collect();
                Ok(AssistantResponse {
                    response: llm_response.content,
                    sources,
                })
            }
            Err(e) => {
                state = RequestState::Failed;
                tracing::error!(?state, error = %e, "Generation failed");
                Ok(self.apology(language))
            }
        }
    }

    /// Generate a positive reflection over the conversation so far.
    ///
    /// Fewer than two user turns yields the localized gate message without
    /// touching the generation provider.
    pub async fn generate_reflection(
        &self,
        history: &[ConversationTurn],
        language: Language,
    ) -> AppResult<ReflectionResponse> {
        if user_turn_count(history) < 2 {
            return Ok(ReflectionResponse {
                reflection: language.resources().reflection_gate.to_string(),
            });
        }

        let prompt = match self.assembler.assemble_reflection(history, language) {
            Ok(prompt) => prompt,
            Err(e) => {
                tracing::error!(error = %e, "Reflection assembly failed");
                return Ok(self.reflection_apology(language));
            }
        };

        let request =
            LlmRequest::new(prompt, self.model.clone()).with_temperature(self.temperature);

        match self.llm.complete(&request).await {
            Ok(llm_response) => Ok(ReflectionResponse {
                reflection: llm_response.content,
            }),
            Err(e) => {
                tracing::error!(error = %e, "Reflection generation failed");
                Ok(self.reflection_apology(language))
            }
        }
    }

    fn apology(&self, language: Language) -> AssistantResponse {
        AssistantResponse {
            response: language.resources().response_apology.to_string(),
            sources: Vec::new(),
        }
    }

    fn reflection_apology(&self, language: Language) -> ReflectionResponse {
        ReflectionResponse {
            reflection: language.resources().reflection_apology.to_string(),
        }
    }
}
