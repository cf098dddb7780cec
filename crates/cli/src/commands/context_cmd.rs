//! `biotutor context` — inspect the stored context for a thread.

use biotutor_config::AppConfig;
use biotutor_core::ThreadId;

pub async fn run(thread: &str) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let store = biotutor_store::build_from_config(&config.store).await?;

    let thread_id = ThreadId::from(thread);
    match store.load(&thread_id).await? {
        Some(context) => {
            println!("thread:        {thread_id}");
            println!(
                "last topic:    {}",
                if context.last_topic.is_empty() {
                    "(none)"
                } else {
                    &context.last_topic
                }
            );
            println!(
                "recent topics: {}",
                if context.recent_topics.is_empty() {
                    "(none)".to_string()
                } else {
                    context.recent_topics.join(", ")
                }
            );
            if context.key_entities.is_empty() {
                println!("key entities:  (none)");
            } else {
                println!("key entities:");
                for (name, description) in &context.key_entities {
                    if description.is_empty() {
                        println!("  - {name}");
                    } else {
                        println!("  - {name}: {description}");
                    }
                }
            }
        }
        None => {
            println!("No stored context for thread {thread_id}");
        }
    }

    Ok(())
}
