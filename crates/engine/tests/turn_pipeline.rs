//! End-to-end turns through the engine with scripted collaborators.

use async_trait::async_trait;
use biotutor_config::AppConfig;
use biotutor_core::{
    ChatMessage, ContextStore, ConversationContext, Document, DocumentRetriever, ResponseType,
    RetrievalError, ThreadId,
};
use biotutor_engine::{StaticRetriever, TutorEngine};
use biotutor_providers::testing::SequentialGenerator;
use biotutor_router::LexicalRouter;
use biotutor_store::InMemoryStore;
use std::sync::Arc;

struct FailingRetriever;

#[async_trait]
impl DocumentRetriever for FailingRetriever {
    fn name(&self) -> &str {
        "failing"
    }

    async fn relevant_documents(&self, _query: &str) -> Result<Vec<Document>, RetrievalError> {
        Err(RetrievalError::Unavailable("index offline".into()))
    }
}

fn content_corpus() -> Vec<Document> {
    vec![
        Document::new("Osmosis is the diffusion of water across a partially permeable membrane."),
        Document::new("Photosynthesis converts light energy into chemical energy in chloroplasts."),
    ]
}

fn exam_corpus() -> Vec<Document> {
    vec![Document::new(
        "01.1 Describe how water moves through osmosis. [2 marks] Mark scheme: movement down a water potential gradient.",
    )]
}

fn engine_with(
    generator: Arc<SequentialGenerator>,
    store: Arc<InMemoryStore>,
    content: Arc<dyn DocumentRetriever>,
    exam: Arc<dyn DocumentRetriever>,
) -> TutorEngine {
    TutorEngine::new(
        &AppConfig::default(),
        generator,
        Arc::new(LexicalRouter),
        content,
        exam,
        store,
    )
}

#[tokio::test]
async fn teach_turn_runs_the_full_pipeline() {
    let generator = Arc::new(SequentialGenerator::new(vec![
        // domain check
        "yes",
        // teaching response
        "Osmosis is the net movement of water molecules...",
        // topic extraction
        r#"{"mainTopic": "osmosis", "subtopics": [], "entities": {"osmosis": "water movement"}}"#,
    ]));
    let store = Arc::new(InMemoryStore::new());
    let engine = engine_with(
        generator.clone(),
        store.clone(),
        Arc::new(StaticRetriever::new("content", content_corpus())),
        Arc::new(StaticRetriever::new("exam-papers", exam_corpus())),
    );

    let thread = ThreadId::from("thread-1");
    let query = "Explain how osmosis works";
    let outcome = engine
        .handle_message(thread.clone(), query, vec![ChatMessage::user(query)])
        .await;

    assert_eq!(outcome.response_type, ResponseType::Teach);
    assert_eq!(
        outcome.response,
        "Osmosis is the net movement of water molecules..."
    );
    assert_eq!(generator.remaining(), 0);

    // The teaching prompt carried the retrieved reference text.
    let prompts = generator.prompts();
    assert!(prompts[1].contains("partially permeable membrane"));
    assert!(prompts[1].contains("Explain how osmosis works"));

    // The extracted topic was persisted for the thread.
    let saved = store.load(&thread).await.unwrap().unwrap();
    assert_eq!(saved.last_topic, "osmosis");
    assert_eq!(
        saved.key_entities.get("osmosis").map(String::as_str),
        Some("water movement")
    );

    // The reply landed in the history.
    let last = outcome.state.messages.last().unwrap();
    assert_eq!(last.content, outcome.response);
}

#[tokio::test]
async fn contextual_quiz_resolves_topic_without_domain_model_call() {
    let store = Arc::new(InMemoryStore::new());
    let thread = ThreadId::from("thread-2");
    let mut prior = ConversationContext::empty();
    prior.record_topic("photosynthesis");
    store.save(&thread, &prior).await.unwrap();

    // One scripted response: the quiz itself. Domain gating and topic
    // recording must not touch the model on this path.
    let generator = Arc::new(SequentialGenerator::new(vec!["Q1: What is a chloroplast?"]));
    let engine = engine_with(
        generator.clone(),
        store.clone(),
        Arc::new(StaticRetriever::new("content", content_corpus())),
        Arc::new(StaticRetriever::new("exam-papers", exam_corpus())),
    );

    let query = "Give me a quiz about it";
    let outcome = engine
        .handle_message(thread.clone(), query, vec![ChatMessage::user(query)])
        .await;

    assert_eq!(outcome.response_type, ResponseType::Quiz);
    assert_eq!(outcome.response, "Q1: What is a chloroplast?");
    assert_eq!(generator.remaining(), 0);

    // The quiz prompt was built from the rewritten, explicit query.
    assert!(generator.prompts()[0].contains("Create a quiz about photosynthesis"));

    // The caller's wording was restored on the outgoing state.
    assert_eq!(outcome.state.query, query);

    // The resolved topic was recorded again.
    let saved = store.load(&thread).await.unwrap().unwrap();
    assert_eq!(saved.last_topic, "photosynthesis");
    assert_eq!(saved.recent_topics.len(), 2);
}

#[tokio::test]
async fn contextual_reference_to_non_biology_topic_is_refused() {
    let store = Arc::new(InMemoryStore::new());
    let thread = ThreadId::from("thread-3");
    let mut prior = ConversationContext::empty();
    prior.record_topic("computer networks");
    store.save(&thread, &prior).await.unwrap();

    // No scripted responses: the whole turn must run without the model.
    let generator = Arc::new(SequentialGenerator::new(vec![]));
    let engine = engine_with(
        generator.clone(),
        store.clone(),
        Arc::new(StaticRetriever::new("content", content_corpus())),
        Arc::new(StaticRetriever::new("exam-papers", exam_corpus())),
    );

    let query = "tell me more about it";
    let outcome = engine
        .handle_message(thread.clone(), query, vec![ChatMessage::user(query)])
        .await;

    assert!(outcome.response.contains("computer networks"));
    assert!(outcome.response.contains("biology"));

    // The refusal left the stored context untouched.
    let saved = store.load(&thread).await.unwrap().unwrap();
    assert_eq!(saved.last_topic, "computer networks");
}

#[tokio::test]
async fn retrieval_failure_degrades_to_no_documents_response() {
    let generator = Arc::new(SequentialGenerator::new(vec![
        // domain check; the enzyme query records its topic lexically, so
        // no extraction call follows
        "yes",
    ]));
    let store = Arc::new(InMemoryStore::new());
    let engine = engine_with(
        generator.clone(),
        store.clone(),
        Arc::new(FailingRetriever),
        Arc::new(StaticRetriever::empty("exam-papers")),
    );

    let thread = ThreadId::from("thread-4");
    let query = "Explain how enzyme inhibition works";
    let outcome = engine
        .handle_message(thread.clone(), query, vec![ChatMessage::user(query)])
        .await;

    assert!(outcome.response.contains("reference materials"));
    assert_eq!(generator.remaining(), 0);

    let saved = store.load(&thread).await.unwrap().unwrap();
    assert_eq!(saved.last_topic, "enzyme");
}

#[tokio::test]
async fn mark_scheme_turn_uses_the_exam_corpus() {
    let generator = Arc::new(SequentialGenerator::new(vec![
        "yes",
        "Question 01.1 (2 marks): movement down a water potential gradient.",
        r#"{"mainTopic": "osmosis", "subtopics": [], "entities": {}}"#,
    ]));
    let store = Arc::new(InMemoryStore::new());
    let engine = engine_with(
        generator.clone(),
        store,
        Arc::new(StaticRetriever::empty("content")),
        Arc::new(StaticRetriever::new("exam-papers", exam_corpus())),
    );

    let query = "Find the mark scheme for the osmosis question";
    let outcome = engine
        .handle_message(ThreadId::from("thread-5"), query, vec![ChatMessage::user(query)])
        .await;

    assert_eq!(outcome.response_type, ResponseType::MarkScheme);
    assert!(generator.prompts()[1].contains("water potential gradient"));
}

#[tokio::test]
async fn summary_turn_skips_gate_retrieval_and_context_update() {
    let generator = Arc::new(SequentialGenerator::new(vec![
        "You asked about osmosis and photosynthesis.",
    ]));
    let store = Arc::new(InMemoryStore::new());
    let engine = engine_with(
        generator.clone(),
        store.clone(),
        Arc::new(FailingRetriever),
        Arc::new(FailingRetriever),
    );

    let history = vec![
        ChatMessage::user("What is osmosis?"),
        ChatMessage::ai("Osmosis is the diffusion of water."),
        ChatMessage::user("summarize our conversation"),
    ];
    let outcome = engine
        .handle_message(
            ThreadId::from("thread-6"),
            "summarize our conversation",
            history,
        )
        .await;

    assert_eq!(outcome.response_type, ResponseType::Summary);
    assert_eq!(outcome.response, "You asked about osmosis and photosynthesis.");
    assert_eq!(generator.remaining(), 0);

    // The transcript drove the prompt; no retrieval, no context write.
    assert!(generator.prompts()[0].contains("USER: What is osmosis?"));
    assert!(store.is_empty().await);
}
