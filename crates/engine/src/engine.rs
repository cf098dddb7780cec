//! The turn pipeline.
//!
//! One call per user message: load the thread's context, detect and resolve
//! contextual references, route, gate on domain, retrieve, generate, fold
//! the turn back into the context, and save. Every stage degrades rather
//! than fails, so the caller always gets a reply.

use crate::generators::generator_for;
use crate::prompts;
use biotutor_config::{AppConfig, HistoryConfig};
use biotutor_context::{
    domain_topics_in, has_contextual_reference, resolve_and_rewrite, ContextUpdater,
    DomainClassifier,
};
use biotutor_core::{
    ChatMessage, ContextStore, ConversationContext, Document, DocumentRetriever, ResponseType,
    RetrievalTarget, TextGenerator, ThreadId, TurnState,
};
use biotutor_router::IntentRouter;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// The result of handling one user message.
#[derive(Debug)]
pub struct TurnOutcome {
    /// The tutor's reply
    pub response: String,

    /// How the message was routed
    pub response_type: ResponseType,

    /// Final turn state; the reply is already appended to `messages` and
    /// `context` holds what was saved
    pub state: TurnState,
}

/// The tutoring engine. Owns the routing, classification, retrieval, and
/// generation collaborators for a configured deployment.
pub struct TutorEngine {
    generator: Arc<dyn TextGenerator>,
    router: Arc<dyn IntentRouter>,
    classifier: DomainClassifier,
    updater: ContextUpdater,
    content_retriever: Arc<dyn DocumentRetriever>,
    exam_retriever: Arc<dyn DocumentRetriever>,
    store: Arc<dyn ContextStore>,
    history: HistoryConfig,
}

impl TutorEngine {
    /// Wire an engine from configuration and its injected collaborators.
    pub fn new(
        config: &AppConfig,
        generator: Arc<dyn TextGenerator>,
        router: Arc<dyn IntentRouter>,
        content_retriever: Arc<dyn DocumentRetriever>,
        exam_retriever: Arc<dyn DocumentRetriever>,
        store: Arc<dyn ContextStore>,
    ) -> Self {
        Self {
            classifier: DomainClassifier::new(generator.clone(), config.classifier.fail_open),
            updater: ContextUpdater::new(generator.clone()),
            generator,
            router,
            content_retriever,
            exam_retriever,
            store,
            history: config.history.clone(),
        }
    }

    /// Handle one user message for a thread.
    ///
    /// `history` is the thread's prior messages plus the current user
    /// message, oldest first; the reply is appended before returning.
    pub async fn handle_message(
        &self,
        thread_id: ThreadId,
        query: &str,
        history: Vec<ChatMessage>,
    ) -> TurnOutcome {
        let context = self.load_context(&thread_id).await;

        let mut state = TurnState::new(thread_id, query)
            .with_messages(history)
            .with_context(context);
        state.has_contextual_reference = has_contextual_reference(query);

        let decision = self.router.route(&state.query).await;
        state.response_type = Some(decision.response_type);
        info!(
            thread_id = %state.thread_id,
            response_type = %decision.response_type,
            contextual = state.has_contextual_reference,
            "routed message"
        );

        let resolved_topic = resolve_and_rewrite(&mut state, decision.response_type);

        // Summaries are about the conversation itself, so the domain gate
        // does not apply to them. The gate sees the student's own wording:
        // a rewritten query has lost the contextual reference the
        // classifier's context shortcut keys on.
        let gate_query = state
            .original_query
            .clone()
            .unwrap_or_else(|| state.query.clone());
        if decision.response_type != ResponseType::Summary
            && !self
                .classifier
                .is_in_domain(&gate_query, &state.context)
                .await
        {
            info!(
                thread_id = %state.thread_id,
                topic = resolved_topic.as_deref().unwrap_or("unknown"),
                "query is outside the tutoring domain"
            );
            let response = prompts::out_of_domain(resolved_topic.as_deref());
            return self.finish(state, decision.response_type, response);
        }

        match decision.retrieval_target {
            RetrievalTarget::Content => {
                state.documents = self.fetch(&self.content_retriever, &state.query).await;
            }
            RetrievalTarget::ExamPapers => {
                state.exam_documents = self.fetch(&self.exam_retriever, &state.query).await;
            }
            RetrievalTarget::None => {}
        }

        let generator = generator_for(
            decision.response_type,
            self.generator.clone(),
            &self.history,
        );
        let response = generator.respond(&state).await;

        // A summary turn does not change what the conversation is about.
        if decision.response_type != ResponseType::Summary {
            let topic = resolved_topic
                .clone()
                .or_else(|| domain_topics_in(&state.query).map(String::from));
            state.context = self
                .updater
                .update(&state.context, &state.query, topic.as_deref())
                .await;

            if let Err(err) = self.store.save(&state.thread_id, &state.context).await {
                warn!(
                    error = %err,
                    thread_id = %state.thread_id,
                    "context save failed, reply still goes out"
                );
            }
        }

        self.finish(state, decision.response_type, response)
    }

    fn finish(
        &self,
        mut state: TurnState,
        response_type: ResponseType,
        response: String,
    ) -> TurnOutcome {
        state.restore_query();
        state.messages.push(ChatMessage::ai(response.clone()));
        TurnOutcome {
            response,
            response_type,
            state,
        }
    }

    async fn load_context(&self, thread_id: &ThreadId) -> ConversationContext {
        match self.store.load(thread_id).await {
            Ok(Some(context)) => context,
            Ok(None) => ConversationContext::empty(),
            Err(err) => {
                warn!(
                    error = %err,
                    thread_id = %thread_id,
                    "context load failed, starting the turn with an empty context"
                );
                ConversationContext::empty()
            }
        }
    }

    async fn fetch(
        &self,
        retriever: &Arc<dyn DocumentRetriever>,
        query: &str,
    ) -> Vec<Document> {
        match retriever.relevant_documents(query).await {
            Ok(documents) => {
                debug!(
                    retriever = retriever.name(),
                    count = documents.len(),
                    "retrieved documents"
                );
                documents
            }
            Err(err) => {
                warn!(
                    error = %err,
                    retriever = retriever.name(),
                    "retrieval failed, continuing without documents"
                );
                Vec::new()
            }
        }
    }
}
