//! biotutor CLI — the main entry point.
//!
//! Commands:
//! - `route`   — Print the routing decision for a query without any model call
//! - `chat`    — Run tutoring turns against the configured provider and store
//! - `context` — Show the stored conversation context for a thread

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "biotutor",
    about = "A-Level biology tutoring assistant",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show how a query would be routed, without calling any model
    Route {
        /// The query to classify
        query: String,
    },

    /// Chat with the tutor
    Chat {
        /// Send a single message instead of entering interactive mode
        #[arg(short, long)]
        message: Option<String>,

        /// Conversation thread to continue; a new one is minted when absent
        #[arg(short, long)]
        thread: Option<String>,
    },

    /// Print the stored conversation context for a thread
    Context {
        /// The thread id to inspect
        thread: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Route { query } => commands::route::run(&query),
        Commands::Chat { message, thread } => commands::chat::run(message, thread).await?,
        Commands::Context { thread } => commands::context_cmd::run(&thread).await?,
    }

    Ok(())
}
