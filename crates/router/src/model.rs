//! The model-backed router.
//!
//! Sends the query to the configured generator with a prompt that asks for
//! exactly one response-type name, then maps the reply back onto the enum by
//! case-insensitive substring. Anything unexpected, including a failed model
//! call, falls back to teach.

use std::sync::Arc;

use async_trait::async_trait;
use biotutor_core::{ResponseType, RoutingDecision, TextGenerator};
use tracing::{debug, warn};

use crate::IntentRouter;

pub struct ModelRouter {
    generator: Arc<dyn TextGenerator>,
}

impl ModelRouter {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }
}

fn router_prompt(query: &str) -> String {
    format!(
        "You are a Router Agent for a biology tutoring application. Your job is to \
         determine the user's intent and route their request to the appropriate agent.\n\n\
         User Query: {query}\n\n\
         Analyze the query and determine which of the following intents it matches:\n\
         1. TEACHING - User wants to learn about a biology topic, get an explanation, or understand a concept\n\
         2. INFORMATION - User wants factual information, definitions, or textbook-like information\n\
         3. QUIZ - User wants to be tested on their knowledge\n\
         4. EXAM_QUESTION - User wants past exam questions on a specific topic\n\
         5. MARK_SCHEME - User wants mark schemes or model answers for an exam question\n\
         6. SUMMARY - User wants a summary of the conversation so far\n\n\
         Respond with ONLY ONE of these exact strings: \"teach\", \"contentCollector\", \
         \"quiz\", \"examQuestion\", \"markScheme\", or \"summary\""
    )
}

/// Map model output onto a response type. Checks are ordered so the more
/// specific spellings win before loose synonyms.
fn parse_response(content: &str) -> Option<ResponseType> {
    let content = content.trim().to_lowercase();

    let matches = |terms: &[&str]| terms.iter().any(|t| content.contains(t));

    if matches(&["contentcollector", "information", "info", "content"]) {
        Some(ResponseType::ContentCollector)
    } else if matches(&["quiz", "test", "assessment"]) {
        Some(ResponseType::Quiz)
    } else if matches(&["examquestion", "exam_question", "exam question", "past paper", "pastpaper"]) {
        Some(ResponseType::ExamQuestion)
    } else if matches(&["markscheme", "mark_scheme", "mark scheme", "marking", "answers"]) {
        Some(ResponseType::MarkScheme)
    } else if matches(&["summary", "summarize", "summarise"]) {
        Some(ResponseType::Summary)
    } else if matches(&["teach", "teaching", "explain", "tutor"]) {
        Some(ResponseType::Teach)
    } else {
        None
    }
}

#[async_trait]
impl IntentRouter for ModelRouter {
    fn name(&self) -> &str {
        "model"
    }

    async fn route(&self, query: &str) -> RoutingDecision {
        let prompt = router_prompt(query);
        match self.generator.generate(&prompt).await {
            Ok(generation) => match parse_response(&generation.content) {
                Some(response_type) => {
                    debug!(query, %response_type, "model routing decision");
                    RoutingDecision::for_type(response_type)
                }
                None => {
                    warn!(
                        answer = %generation.content,
                        "unrecognized router answer, defaulting to teach"
                    );
                    RoutingDecision::fallback()
                }
            },
            Err(err) => {
                warn!(error = %err, "model routing failed, defaulting to teach");
                RoutingDecision::fallback()
            }
        }
    }
}
