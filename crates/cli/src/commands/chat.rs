//! `biotutor chat` — interactive or single-message tutoring turns.

use biotutor_config::AppConfig;
use biotutor_core::{ChatMessage, Document, DocumentRetriever, ThreadId};
use biotutor_engine::{StaticRetriever, TutorEngine};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

pub async fn run(
    message: Option<String>,
    thread: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    // Check for an API key early and give a clear error
    if config.api_key.is_none() {
        eprintln!();
        eprintln!("  ERROR: No API key configured!");
        eprintln!();
        eprintln!("  Set one of these environment variables:");
        eprintln!("    BIOTUTOR_API_KEY = 'sk-...'");
        eprintln!("    OPENAI_API_KEY   = 'sk-...'");
        eprintln!();
        eprintln!("  Or add api_key to your config file:");
        eprintln!(
            "    {}",
            AppConfig::config_dir().join("config.toml").display()
        );
        eprintln!();
        return Err("No API key found. See above for setup instructions.".into());
    }

    let generator = biotutor_providers::build_from_config(&config)?;
    let router = biotutor_router::build_from_config(&config.router, generator.clone());
    let store = biotutor_store::build_from_config(&config.store).await?;

    let content_retriever = corpus_retriever("content", &AppConfig::config_dir().join("reference"));
    let exam_retriever =
        corpus_retriever("exam-papers", &AppConfig::config_dir().join("exam_papers"));

    let engine = TutorEngine::new(
        &config,
        generator,
        router,
        content_retriever,
        exam_retriever,
        store,
    );

    let thread_id = ThreadId::ensure(thread.as_deref());
    let mut history: Vec<ChatMessage> = Vec::new();

    if let Some(msg) = message {
        // Single message mode
        history.push(ChatMessage::user(&msg));
        let outcome = engine
            .handle_message(thread_id.clone(), &msg, history)
            .await;
        println!("{}", outcome.response);
        eprintln!("  [thread: {thread_id}]");
        return Ok(());
    }

    // Interactive mode
    println!();
    println!("  biotutor — A-Level biology tutor");
    println!("  model:  {}", config.model);
    println!("  store:  {}", config.store.backend);
    println!("  thread: {thread_id}");
    println!();
    println!("  Type your question and press Enter. Type 'exit' to quit.");
    println!();

    loop {
        print!("  You > ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if std::io::stdin().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
            break;
        }

        history.push(ChatMessage::user(line));
        let outcome = engine
            .handle_message(thread_id.clone(), line, history.clone())
            .await;
        history = outcome.state.messages.clone();

        println!();
        for text_line in outcome.response.lines() {
            println!("  Tutor > {text_line}");
        }
        println!();
    }

    println!();
    println!("  Goodbye!");
    Ok(())
}

/// Load a document corpus from a directory of text files, one document per
/// file. Missing or empty directories yield an empty retriever; the engine
/// then answers with its canned "nothing in my reference materials" text.
fn corpus_retriever(name: &str, dir: &Path) -> Arc<dyn DocumentRetriever> {
    let mut documents = Vec::new();

    if let Ok(entries) = std::fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            let is_text = matches!(
                path.extension().and_then(|ext| ext.to_str()),
                Some("txt") | Some("md")
            );
            if !is_text {
                continue;
            }
            match std::fs::read_to_string(&path) {
                Ok(content) if !content.trim().is_empty() => {
                    let source = path
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_default();
                    documents.push(
                        Document::new(content).with_metadata("source", serde_json::json!(source)),
                    );
                }
                Ok(_) => {}
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "skipping unreadable corpus file");
                }
            }
        }
    }

    if documents.is_empty() {
        tracing::info!(corpus = name, dir = %dir.display(), "no corpus files found");
        return Arc::new(StaticRetriever::empty(name));
    }

    tracing::info!(corpus = name, count = documents.len(), "loaded corpus");
    Arc::new(StaticRetriever::new(name, documents))
}
