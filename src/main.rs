use std::io::{BufRead, Write};
use std::path::PathBuf;

use aging_core::bootstrap::resolve_config_path;
use aging_core::config::Config;
use aging_core::{AgingGptService, Status};
use aging_memory::document::PubMedSampleLoader;
use anyhow::{Context, bail};
use clap::{Parser, Subcommand};

mod init;

const DEMO_QUERIES: &[&str] = &[
    "What are the hallmarks of aging?",
    "How does caloric restriction affect lifespan?",
    "What is cellular senescence?",
    "Tell me about rapamycin and aging.",
    "How do mitochondria affect aging?",
];

#[derive(Parser)]
#[command(name = "aging-gpt")]
#[command(version)]
#[command(about = "Retrieval-augmented question answering about the biology of aging")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask a single question
    Query {
        #[arg(required = true)]
        text: Vec<String>,
    },

    /// Add a knowledge snippet attributed to a source
    Add {
        #[arg(long)]
        source: String,
        content: String,
    },

    /// Create the knowledge base and load sample data
    InitKb {
        /// Knowledge base directory (defaults to the configured path)
        #[arg(long)]
        kb_path: Option<PathBuf>,

        /// JSON file of documents to load
        #[arg(long)]
        sample_json: Option<PathBuf>,

        /// Plain-text or markdown files to load as paragraph chunks
        #[arg(long)]
        text: Vec<PathBuf>,
    },

    /// Load the sample abstracts and run the demonstration queries
    Demo,

    /// Interactive question loop on stdin
    Chat,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_subscriber();

    let cli = Cli::parse();
    let config_path = resolve_config_path(cli.config.as_deref());
    let config = Config::load(&config_path)
        .with_context(|| format!("failed to load config from {}", config_path.display()))?;

    match cli.command {
        Commands::Query { text } => {
            let service = AgingGptService::new(config);
            let resp = service.query(&text.join(" ")).await;
            println!("{}", resp.response);
            if resp.status == Status::Error {
                bail!("query failed");
            }
        }
        Commands::Add { source, content } => {
            let service = AgingGptService::new(config);
            let resp = service.add_knowledge(&content, &source).await;
            println!("{}", resp.message);
            if resp.status == Status::Error {
                bail!("failed to add knowledge");
            }
        }
        Commands::InitKb {
            kb_path,
            sample_json,
            text,
        } => {
            let options = init::InitOptions {
                kb_path,
                sample_json,
                text,
            };
            let report = init::run(&config, &options).await;
            println!(
                "Knowledge base ready: {} documents ({} added, {} already present)",
                report.total, report.added, report.skipped
            );
        }
        Commands::Demo => run_demo(AgingGptService::new(config)).await,
        Commands::Chat => run_chat(&AgingGptService::new(config)).await?,
    }

    Ok(())
}

async fn run_demo(service: AgingGptService) {
    for doc in PubMedSampleLoader.load() {
        let source = doc.metadata.title.as_deref().unwrap_or("PubMed");
        let resp = service.add_knowledge(&doc.content, source).await;
        tracing::debug!(message = %resp.message, "demo knowledge");
    }

    for query in DEMO_QUERIES {
        println!("\nQ: {query}");
        let resp = service.query(query).await;
        println!("A: {}", resp.response);
    }
}

async fn run_chat(service: &AgingGptService) -> anyhow::Result<()> {
    println!("Ask about the biology of aging. Type 'exit' to quit.");
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();

    loop {
        print!("> ");
        stdout.flush().context("failed to flush stdout")?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line).context("failed to read stdin")? == 0 {
            break;
        }
        let line = line.trim();
        if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
            break;
        }
        if line.is_empty() {
            continue;
        }
        let resp = service.query(line).await;
        println!("{}\n", resp.response);
    }
    Ok(())
}

fn init_subscriber() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_query_words() {
        let cli = Cli::parse_from(["aging-gpt", "query", "what", "is", "NAD?"]);
        let Commands::Query { text } = cli.command else {
            panic!("expected query");
        };
        assert_eq!(text.join(" "), "what is NAD?");
    }

    #[test]
    fn parses_init_kb_options() {
        let cli = Cli::parse_from([
            "aging-gpt",
            "--config",
            "custom.toml",
            "init-kb",
            "--kb-path",
            "/tmp/kb",
            "--text",
            "a.md",
            "--text",
            "b.txt",
        ]);
        assert_eq!(cli.config, Some(PathBuf::from("custom.toml")));
        let Commands::InitKb {
            kb_path,
            sample_json,
            text,
        } = cli.command
        else {
            panic!("expected init-kb");
        };
        assert_eq!(kb_path, Some(PathBuf::from("/tmp/kb")));
        assert_eq!(text.len(), 2);
        assert!(sample_json.is_none());
    }

    #[test]
    fn demo_covers_five_topics() {
        assert_eq!(DEMO_QUERIES.len(), 5);
    }
}
