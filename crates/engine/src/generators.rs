//! Response generators, one per response type.
//!
//! A generator turns a routed, domain-gated, retrieval-complete
//! [`TurnState`] into the tutor's reply. Generators never fail: an empty
//! corpus yields the canned "nothing in my reference materials" response
//! and a model error yields an apologetic fallback.

use crate::prompts;
use async_trait::async_trait;
use biotutor_config::HistoryConfig;
use biotutor_context::{format_context_block, format_recent_messages, FilterProfile};
use biotutor_core::{ResponseType, RetrievalTarget, Role, TextGenerator, TurnState};
use std::sync::Arc;
use tracing::warn;

/// How many history messages each prompt carries verbatim.
const RECENT_MESSAGE_COUNT: usize = 6;

/// One response type's reply builder.
#[async_trait]
pub trait ResponseGenerator: Send + Sync {
    fn response_type(&self) -> ResponseType;

    /// Produce the reply for this turn. Infallible; failures degrade to
    /// canned text.
    async fn respond(&self, state: &TurnState) -> String;
}

/// The generator for a response type, configured with the history caps.
pub fn generator_for(
    response_type: ResponseType,
    generator: Arc<dyn TextGenerator>,
    history: &HistoryConfig,
) -> Box<dyn ResponseGenerator> {
    let profile = profile_from(history);
    match response_type {
        ResponseType::Teach => Box::new(TeachGenerator { generator, profile }),
        ResponseType::ContentCollector => Box::new(ContentGenerator { generator, profile }),
        ResponseType::Quiz => Box::new(QuizGenerator { generator, profile }),
        ResponseType::ExamQuestion => Box::new(ExamQuestionGenerator { generator, profile }),
        ResponseType::MarkScheme => Box::new(MarkSchemeGenerator { generator, profile }),
        ResponseType::Summary => Box::new(SummaryGenerator { generator }),
    }
}

fn profile_from(history: &HistoryConfig) -> FilterProfile {
    FilterProfile {
        max_messages: history.max_messages,
        max_tokens: history.max_tokens,
        user_messages: history.user_messages,
        ai_messages: history.ai_messages,
    }
}

/// Render the "Conversation Context" / "Recent Conversation" preamble the
/// document-backed prompts splice in. Empty when the turn has neither.
fn conversation_block(state: &TurnState, profile: &FilterProfile) -> String {
    let mut block = String::new();

    let context = format_context_block(&state.context);
    if !context.is_empty() {
        block.push_str("Conversation Context:\n");
        block.push_str(&context);
        block.push('\n');
    }

    let filtered = profile.apply(&state.messages);
    let recent = format_recent_messages(&filtered, RECENT_MESSAGE_COUNT);
    if !recent.is_empty() {
        block.push_str("Recent Conversation:\n");
        block.push_str(&recent);
        block.push_str("\n\n");
    }

    block
}

/// Shared path for the five document-backed generators.
async fn respond_from_documents(
    generator: &Arc<dyn TextGenerator>,
    profile: &FilterProfile,
    state: &TurnState,
    response_type: ResponseType,
    build_prompt: fn(&str, &str, &str) -> String,
) -> String {
    let documents = match response_type.retrieval_target() {
        RetrievalTarget::ExamPapers => &state.exam_documents,
        _ => &state.documents,
    };

    if documents.is_empty() {
        return prompts::no_documents(response_type).to_string();
    }

    let reference = documents
        .iter()
        .map(|doc| doc.page_content.as_str())
        .collect::<Vec<_>>()
        .join("\n\n");
    let conversation = conversation_block(state, profile);
    let prompt = build_prompt(&state.query, &reference, &conversation);

    match generator.generate(&prompt).await {
        Ok(generation) => generation.content,
        Err(err) => {
            warn!(
                error = %err,
                response_type = %response_type,
                "generation failed, using fallback response"
            );
            prompts::generation_failure(response_type).to_string()
        }
    }
}

pub struct TeachGenerator {
    generator: Arc<dyn TextGenerator>,
    profile: FilterProfile,
}

#[async_trait]
impl ResponseGenerator for TeachGenerator {
    fn response_type(&self) -> ResponseType {
        ResponseType::Teach
    }

    async fn respond(&self, state: &TurnState) -> String {
        respond_from_documents(
            &self.generator,
            &self.profile,
            state,
            ResponseType::Teach,
            prompts::teaching,
        )
        .await
    }
}

pub struct ContentGenerator {
    generator: Arc<dyn TextGenerator>,
    profile: FilterProfile,
}

#[async_trait]
impl ResponseGenerator for ContentGenerator {
    fn response_type(&self) -> ResponseType {
        ResponseType::ContentCollector
    }

    async fn respond(&self, state: &TurnState) -> String {
        respond_from_documents(
            &self.generator,
            &self.profile,
            state,
            ResponseType::ContentCollector,
            prompts::content,
        )
        .await
    }
}

pub struct QuizGenerator {
    generator: Arc<dyn TextGenerator>,
    profile: FilterProfile,
}

#[async_trait]
impl ResponseGenerator for QuizGenerator {
    fn response_type(&self) -> ResponseType {
        ResponseType::Quiz
    }

    async fn respond(&self, state: &TurnState) -> String {
        respond_from_documents(
            &self.generator,
            &self.profile,
            state,
            ResponseType::Quiz,
            prompts::quiz,
        )
        .await
    }
}

pub struct ExamQuestionGenerator {
    generator: Arc<dyn TextGenerator>,
    profile: FilterProfile,
}

#[async_trait]
impl ResponseGenerator for ExamQuestionGenerator {
    fn response_type(&self) -> ResponseType {
        ResponseType::ExamQuestion
    }

    async fn respond(&self, state: &TurnState) -> String {
        respond_from_documents(
            &self.generator,
            &self.profile,
            state,
            ResponseType::ExamQuestion,
            prompts::exam_questions,
        )
        .await
    }
}

pub struct MarkSchemeGenerator {
    generator: Arc<dyn TextGenerator>,
    profile: FilterProfile,
}

#[async_trait]
impl ResponseGenerator for MarkSchemeGenerator {
    fn response_type(&self) -> ResponseType {
        ResponseType::MarkScheme
    }

    async fn respond(&self, state: &TurnState) -> String {
        respond_from_documents(
            &self.generator,
            &self.profile,
            state,
            ResponseType::MarkScheme,
            prompts::mark_scheme,
        )
        .await
    }
}

/// Summarizes the conversation itself; ignores retrieval entirely and uses
/// the wider summary history window.
pub struct SummaryGenerator {
    generator: Arc<dyn TextGenerator>,
}

#[async_trait]
impl ResponseGenerator for SummaryGenerator {
    fn response_type(&self) -> ResponseType {
        ResponseType::Summary
    }

    async fn respond(&self, state: &TurnState) -> String {
        let filtered = FilterProfile::summary().apply(&state.messages);
        if filtered.is_empty() {
            return "We haven't discussed any biology topics yet in this \
                    conversation, so there is nothing to summarize."
                .to_string();
        }

        let transcript = filtered
            .iter()
            .map(|msg| {
                let speaker = match msg.role {
                    Role::User => "USER",
                    Role::Ai => "AI",
                };
                format!("{speaker}: {}", msg.content)
            })
            .collect::<Vec<_>>()
            .join("\n\n");

        let prompt = prompts::summary(&transcript);
        match self.generator.generate(&prompt).await {
            Ok(generation) => generation.content,
            Err(err) => {
                warn!(error = %err, "summary generation failed");
                prompts::generation_failure(ResponseType::Summary).to_string()
            }
        }
    }
}
