//! # docrag CLI
//!
//! Command-line interface for docrag: retrieve the passages of a document
//! folder most relevant to a query or message.
//!
//! Each invocation scans the folder, chunks the text, builds an in-memory
//! embedding index once, and answers from it. Nothing is persisted.
//!
//! ## Commands
//!
//! - `docrag chunks <FOLDER>` - Show the chunks a folder produces
//! - `docrag search <FOLDER> <QUERY>` - Rank chunks against a query
//! - `docrag context <FOLDER> <MESSAGE>` - Render a reply prompt with retrieved context
//! - `docrag repl <FOLDER>` - Build once, then answer one query per input line
//! - `docrag config show|init|path` - Inspect configuration
//!
//! ## Examples
//!
//! ```bash
//! docrag search ~/Documents "quarterly revenue" -k 5
//! docrag context ~/Documents "Can you summarize the contract?" --format json
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use docrag_chunker::FolderChunker;
use docrag_core::{Embedder, RetrievedChunk};
use docrag_embed::HashingEmbedder;
#[cfg(feature = "candle")]
use docrag_embed::CandleEmbedder;
use docrag_index::{EmbeddingIndex, RetrievalContext};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

mod config;

use config::{Config, EmbeddingBackend};

#[derive(Parser)]
#[command(name = "docrag")]
#[command(about = "Retrieve relevant passages from a folder of documents")]
#[command(version)]
struct Cli {
    /// Path to config file (default: ~/.config/docrag/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (text, json)
    #[arg(short, long, global = true, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Chunk a folder and print the chunks
    Chunks {
        /// Folder to scan
        folder: PathBuf,

        /// Words per chunk (default from config)
        #[arg(long)]
        chunk_size: Option<usize>,
    },

    /// Build an index over a folder and rank chunks for a query
    Search {
        /// Folder to scan
        folder: PathBuf,

        /// Query string
        query: String,

        /// Number of chunks to return (default from config)
        #[arg(short)]
        k: Option<usize>,

        /// Words per chunk (default from config)
        #[arg(long)]
        chunk_size: Option<usize>,
    },

    /// Render a reply prompt with context retrieved for a message
    Context {
        /// Folder to scan
        folder: PathBuf,

        /// Message to reply to
        message: String,

        /// Number of chunks to include (default from config)
        #[arg(short)]
        k: Option<usize>,
    },

    /// Build once, then answer one query per line of standard input
    Repl {
        /// Folder to scan
        folder: PathBuf,

        /// Number of chunks per answer (default from config)
        #[arg(short)]
        k: Option<usize>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration
    Show,
    /// Print sample configuration file
    Init,
    /// Show config file path
    Path,
}

/// Output structure for the chunks command.
#[derive(Serialize)]
struct ChunksOutput {
    folder: String,
    chunk_size: usize,
    count: usize,
    chunks: Vec<String>,
}

/// Output structure for search results.
#[derive(Serialize)]
struct SearchOutput {
    query: String,
    results: Vec<RetrievedChunk>,
}

/// Output structure for the context command.
#[derive(Serialize)]
struct ContextOutput {
    message: String,
    chunks: Vec<String>,
    prompt: String,
}

/// Load config from the CLI-specified path or the default location.
fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Config::load().context("Failed to load config"),
    }
}

/// Construct the configured embedder.
async fn create_embedder(config: &Config) -> Result<Arc<dyn Embedder>> {
    match config.embedding.backend {
        EmbeddingBackend::Hashing => Ok(Arc::new(HashingEmbedder::new(config.embedding.dimension))),
        #[cfg(feature = "candle")]
        EmbeddingBackend::Candle => {
            let cache_dir = config::cache_dir().map(|dir| dir.join("models"));
            info!("Loading embedding model (this may download it on first run)...");
            let embedder = CandleEmbedder::load(&config.embedding.model, cache_dir)
                .await
                .context("Failed to load embedding model")?;
            Ok(Arc::new(embedder))
        }
        #[cfg(not(feature = "candle"))]
        EmbeddingBackend::Candle => {
            anyhow::bail!("The candle backend requires docrag to be built with --features candle")
        }
    }
}

/// Scan a folder into chunks.
async fn chunk_folder(folder: &Path, chunk_size: usize) -> Result<Vec<String>> {
    if !folder.exists() {
        anyhow::bail!("Directory does not exist: {}", folder.display());
    }

    let chunker = FolderChunker::with_chunk_size(chunk_size).context("Invalid chunk size")?;
    chunker
        .chunk_folder(folder)
        .await
        .with_context(|| format!("Failed to scan {}", folder.display()))
}

/// Chunk a folder and build an index over it.
async fn build_index(folder: &Path, chunk_size: usize, config: &Config) -> Result<EmbeddingIndex> {
    let chunks = chunk_folder(folder, chunk_size).await?;
    let embedder = create_embedder(config).await?;

    let index = EmbeddingIndex::new(embedder, config.index_config());
    if !index.build(&chunks).await {
        warn!("No index built for {}", folder.display());
    }
    Ok(index)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).context("Failed to serialize output")?
    );
    Ok(())
}

fn print_results(format: OutputFormat, query: &str, results: Vec<RetrievedChunk>) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(&SearchOutput {
            query: query.to_string(),
            results,
        }),
        OutputFormat::Text => {
            println!("Query: {query}\n");
            if results.is_empty() {
                println!("No results found.");
            } else {
                for (i, result) in results.iter().enumerate() {
                    println!(
                        "{}. chunk #{} (distance: {:.4})",
                        i + 1,
                        result.position,
                        result.distance
                    );
                    println!("   {}", truncate(&result.text, 200));
                    println!();
                }
            }
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        config.logging.level.parse().unwrap_or(Level::INFO)
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    match cli.command {
        Commands::Chunks { folder, chunk_size } => {
            let chunk_size = chunk_size.unwrap_or(config.chunking.chunk_size);
            let chunks = chunk_folder(&folder, chunk_size).await?;

            match cli.format {
                OutputFormat::Json => print_json(&ChunksOutput {
                    folder: folder.to_string_lossy().to_string(),
                    chunk_size,
                    count: chunks.len(),
                    chunks,
                })?,
                OutputFormat::Text => {
                    println!("{} chunks from {}\n", chunks.len(), folder.display());
                    for (i, chunk) in chunks.iter().enumerate() {
                        println!("[{i}] {}", truncate(chunk, 200));
                    }
                }
            }
        }

        Commands::Search {
            folder,
            query,
            k,
            chunk_size,
        } => {
            let chunk_size = chunk_size.unwrap_or(config.chunking.chunk_size);
            let k = k.unwrap_or(config.retrieval.top_k);
            let index = build_index(&folder, chunk_size, &config).await?;

            let results = index.retrieve_scored(&query, k).await;
            print_results(cli.format, &query, results)?;
        }

        Commands::Context { folder, message, k } => {
            let k = k.unwrap_or(config.retrieval.top_k);
            let index = build_index(&folder, config.chunking.chunk_size, &config).await?;

            let chunks = index.retrieve(&message, k).await;
            let context = RetrievalContext::from_chunks(&chunks);
            let prompt = context.prompt_for(&message);

            match cli.format {
                OutputFormat::Json => print_json(&ContextOutput {
                    message,
                    chunks,
                    prompt,
                })?,
                OutputFormat::Text => println!("{prompt}"),
            }
        }

        Commands::Repl { folder, k } => {
            let k = k.unwrap_or(config.retrieval.top_k);
            let index = build_index(&folder, config.chunking.chunk_size, &config).await?;
            info!("Ready: {} chunks indexed", index.len().await);

            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            while let Some(line) = lines.next_line().await.context("Failed to read input")? {
                let query = line.trim();
                if query.is_empty() {
                    continue;
                }
                let results = index.retrieve_scored(query, k).await;
                print_results(cli.format, query, results)?;
            }
        }

        Commands::Config { action } => match action {
            ConfigAction::Show => match cli.format {
                OutputFormat::Json => print_json(&config)?,
                OutputFormat::Text => {
                    println!(
                        "{}",
                        toml::to_string_pretty(&config).context("Failed to serialize config")?
                    );
                }
            },
            ConfigAction::Init => {
                println!("{}", Config::sample_toml());
            }
            ConfigAction::Path => {
                if let Some(path) = Config::config_path() {
                    println!("{}", path.display());
                } else {
                    println!("Could not determine config directory");
                }
            }
        },
    }

    Ok(())
}

/// Flatten a string to one line and cap it at `max_chars`, adding an ellipsis.
fn truncate(s: &str, max_chars: usize) -> String {
    let s = s.replace('\n', " ").replace('\r', "");
    if s.chars().count() <= max_chars {
        s
    } else {
        let kept: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_string_unchanged() {
        assert_eq!(truncate("hello", 10), "hello");
    }

    #[test]
    fn test_truncate_long_string() {
        assert_eq!(truncate("abcdefghij", 6), "abc...");
    }

    #[test]
    fn test_truncate_is_char_safe() {
        assert_eq!(truncate("ééééé", 4), "é...");
    }

    #[test]
    fn test_truncate_flattens_newlines() {
        assert_eq!(truncate("a\nb\r\nc", 20), "a b c");
    }

    #[test]
    fn test_cli_parses_search() {
        let cli = Cli::try_parse_from(["docrag", "search", "/tmp/docs", "cats", "-k", "5"]).unwrap();
        match cli.command {
            Commands::Search { query, k, .. } => {
                assert_eq!(query, "cats");
                assert_eq!(k, Some(5));
            }
            _ => panic!("expected search command"),
        }
    }

    #[tokio::test]
    async fn test_chunk_folder_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");
        assert!(chunk_folder(&missing, 200).await.is_err());
    }
}
