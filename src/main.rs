//! DocSage command-line entry point.
//!
//! Usage:
//!   docsage serve                 # Start the retrieval tool server
//!   docsage chat                  # Interactive Q&A session
//!   docsage ask "your question"   # One-shot question

use std::io::Write;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use docsage_agent::ManagerAgent;
use docsage_core::config::DocsageConfig;

const BANNER: &str = "
╔══════════════════════════════════════════════════════════════╗
║        DocSage: Agentic Document Q&A                         ║
║        ─────────────────────────────                         ║
║        Manager Agent  →  Tool Server  →  Specialist          ║
╚══════════════════════════════════════════════════════════════╝
";

const HELP_TEXT: &str = "
Commands:
  Type a question and press Enter to get an answer.
  Type 'quit' or 'exit' to stop.
  Type 'help' to see this message.
";

#[derive(Parser)]
#[command(
    name = "docsage",
    version,
    about = "📄 DocSage: agentic Q&A over an internal knowledge base"
)]
struct Cli {
    /// Config file path (default: ~/.docsage/config.toml)
    #[arg(short, long)]
    config: Option<String>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the document retrieval tool server
    Serve,
    /// Interactive Q&A session (requires a running tool server)
    Chat,
    /// Ask one question and print the answer
    Ask {
        /// The question to ask
        question: Vec<String>,
    },
}

fn expand_path(p: &str) -> String {
    shellexpand::tilde(p).to_string()
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so answers on stdout stay clean.
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = match &cli.config {
        Some(path) => DocsageConfig::load_from(std::path::Path::new(&expand_path(path)))?,
        None => DocsageConfig::load()?,
    };

    match cli.command {
        Command::Serve => docsage_server::start(config).await,
        Command::Chat => run_chat(config).await,
        Command::Ask { question } => run_ask(config, question.join(" ")).await,
    }
}

/// The serve path skips this: the server must come up even without a key
/// so indexing failures surface in its logs instead of killing it.
fn validate_api_key(config: &DocsageConfig) -> Result<()> {
    if config.llm.requires_api_key() && config.llm.resolved_api_key().is_none() {
        anyhow::bail!(
            "No API key configured for {}. Set OPENAI_API_KEY or add api_key under [llm] in {}",
            config.llm.endpoint,
            DocsageConfig::default_path().display()
        );
    }
    Ok(())
}

async fn run_chat(config: DocsageConfig) -> Result<()> {
    validate_api_key(&config)?;

    println!("{BANNER}");
    tracing::info!("Tool server URL: {}", config.server.url());

    let manager = ManagerAgent::new(&config)?;

    println!("Connecting to the tool server...");
    match manager.discover_tools().await {
        Ok(tools) => {
            let names: Vec<&str> = tools.iter().map(|t| t.name.as_str()).collect();
            println!(
                "Connected! Discovered {} tool(s): {}",
                tools.len(),
                names.join(", ")
            );
        }
        Err(e) => {
            eprintln!("\nERROR: {e}");
            eprintln!("Please start the tool server in a separate terminal:");
            eprintln!("  docsage serve");
            std::process::exit(1);
        }
    }

    println!("{HELP_TEXT}");

    let stdin = std::io::stdin();
    loop {
        print!("> Ask a question (or 'quit' to exit): ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.read_line(&mut line)? == 0 {
            break;
        }
        let question = line.trim();
        if question.is_empty() {
            continue;
        }
        let lowered = question.to_lowercase();
        if matches!(lowered.as_str(), "quit" | "exit" | "q") {
            break;
        }
        if lowered == "help" {
            println!("{HELP_TEXT}");
            continue;
        }

        println!("\nProcessing...\n");

        match manager.run(question).await {
            Ok(answer) => {
                let rule = "─".repeat(60);
                println!("{rule}");
                println!("ANSWER:");
                println!("{rule}");
                println!("{answer}");
                println!("{rule}");
                println!();
            }
            Err(e) => {
                tracing::error!("Error processing question: {e}");
                eprintln!("\nError: {e}\n");
            }
        }
    }

    println!("Goodbye!");
    Ok(())
}

async fn run_ask(config: DocsageConfig, question: String) -> Result<()> {
    let question = question.trim().to_string();
    if question.is_empty() {
        anyhow::bail!("Usage: docsage ask <question>");
    }
    validate_api_key(&config)?;

    let manager = ManagerAgent::new(&config)?;
    let answer = manager.run(&question).await?;
    println!("{answer}");
    Ok(())
}
