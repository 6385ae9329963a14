//! # siteqa CLI Application
//!
//! Command-line interface for sitemap-driven website question answering.
//!
//! ## Subcommands
//!
//! - `ingest`: resolve a site's sitemap and index every page's content
//! - `ask`: answer a question from the indexed content
//! - `resolve`: show the URLs a site's sitemap resolves to, flat or as a tree
//! - `list`: show which URLs are indexed
//!
//! Configuration is assembled once per command from CLI arguments and the
//! environment into an [`AppConfig`], then passed by reference to everything
//! downstream.

#![recursion_limit = "256"]

mod telemetry;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use siteqa::config::{AppConfig, GEMINI_API_KEY_ENV};
use siteqa::crawler::PageScraper;
use siteqa::index::Database;
use siteqa::model::{DEFAULT_COMPLETION_MODEL, GeminiClient};
use siteqa::resolver::{SitemapResolver, TraversalOrder};
use siteqa::search::{answer_with_context, retrieve};
use tokio::sync::mpsc;
use tracing::instrument;

#[derive(Parser, Debug)]
#[command(author, version, about = "Sitemap-driven website ingestion and question answering", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve a site's sitemap and index every page's content
    Ingest(IngestArgs),

    /// Answer a question from the indexed content
    Ask(AskArgs),

    /// Show the URLs a site's sitemap resolves to
    Resolve(ResolveArgs),

    /// List indexed URLs
    List(ListArgs),
}

#[derive(Args, Debug)]
struct IngestArgs {
    /// Site URL to ingest
    #[arg(required = true)]
    url: String,

    /// Database path
    #[arg(long, default_value = "siteqa.db")]
    database: String,

    /// Maximum chunk size in bytes
    #[arg(short, long, default_value = "36000")]
    chunk_bytes: usize,

    /// Number of concurrent embedding operations per page
    #[arg(long, default_value = "5")]
    concurrency: usize,

    /// User agent for sitemap fetches and page scraping
    #[arg(long, default_value = "Mozilla/5.0")]
    user_agent: String,

    /// Disable the headless-browser fallback for script-rendered pages
    #[arg(long)]
    no_render: bool,
}

#[derive(Args, Debug)]
struct AskArgs {
    /// Question to answer
    #[arg(required = true)]
    question: String,

    /// Database path
    #[arg(long, default_value = "siteqa.db")]
    database: String,

    /// Number of chunks to retrieve
    #[arg(short = 'k', long, default_value = "3")]
    top_k: usize,

    /// Completion model to use
    #[arg(short, long, default_value = DEFAULT_COMPLETION_MODEL)]
    model: String,

    /// Output format (text|json)
    #[arg(short, long, default_value = "text", value_parser = ["text", "json"])]
    format: String,
}

#[derive(Args, Debug)]
struct ResolveArgs {
    /// Site URL to resolve
    #[arg(required = true)]
    url: String,

    /// Print the sitemap hierarchy as a JSON tree instead of a flat list
    #[arg(short, long)]
    tree: bool,

    /// Order of same-level URLs relative to nested sitemaps
    #[arg(long, default_value = "finals-first", value_parser = ["finals-first", "nested-first"])]
    order: String,

    /// Output format for the flat list (text|json)
    #[arg(short, long, default_value = "text", value_parser = ["text", "json"])]
    format: String,
}

#[derive(Args, Debug)]
struct ListArgs {
    /// Database path
    #[arg(long, default_value = "siteqa.db")]
    database: String,

    /// Show chunk counts per URL
    #[arg(short, long)]
    details: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init_tracing_subscriber();

    let cli = Cli::parse();
    match cli.command {
        Commands::Ingest(args) => {
            ingest_command(args).await?;
        }
        Commands::Ask(args) => {
            ask_command(args).await?;
        }
        Commands::Resolve(args) => {
            resolve_command(args).await?;
        }
        Commands::List(args) => {
            list_command(args).await?;
        }
    }

    Ok(())
}

fn api_key_from_env() -> anyhow::Result<String> {
    std::env::var(GEMINI_API_KEY_ENV)
        .with_context(|| format!("{} environment variable must be set", GEMINI_API_KEY_ENV))
}

#[instrument]
async fn ingest_command(args: IngestArgs) -> anyhow::Result<()> {
    let config = AppConfig::builder()
        .gemini_api_key(api_key_from_env()?)
        .database_path(args.database)
        .max_chunk_bytes(args.chunk_bytes)
        .embed_concurrency(args.concurrency)
        .user_agent(args.user_agent)
        .render_fallback(!args.no_render)
        .build();

    println!("Ingesting {}...", args.url);

    let client = GeminiClient::new_gemini(&config.gemini_api_key, &config.completion_model);
    let db = Database::new_from_path(&config.database_path).await?;
    let resolver = SitemapResolver::default();
    let scraper = PageScraper::new(config.crawler_config());
    let processor_config = config.processor_config();

    // Page count is unknown until resolution finishes, so show a spinner fed
    // by per-page progress updates.
    let progress_bar = ProgressBar::new_spinner();
    progress_bar.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner} [{elapsed_precise}] {pos} pages {msg}")
            .expect("valid progress template"),
    );

    let (progress_sender, mut progress_receiver) = mpsc::channel(100);
    let progress_handle = tokio::spawn({
        let progress_bar = progress_bar.clone();
        async move {
            while let Some((url, chunks)) = progress_receiver.recv().await {
                progress_bar.inc(1);
                if chunks == 0 {
                    progress_bar.set_message(format!("skipped {}", url));
                } else {
                    progress_bar.set_message(format!("indexed {} chunks from {}", chunks, url));
                }
            }
            progress_bar.finish_with_message("done");
        }
    });

    let report = siteqa::pipeline::ingest_site(
        &resolver,
        &scraper,
        &client,
        &db,
        &processor_config,
        &args.url,
        Some(progress_sender),
    )
    .await?;

    let _ = progress_handle.await;

    println!(
        "Indexed {} chunks across {} pages ({} pages skipped)",
        report.chunks_indexed, report.pages_ingested, report.pages_skipped
    );

    Ok(())
}

#[instrument]
async fn ask_command(args: AskArgs) -> anyhow::Result<()> {
    let config = AppConfig::builder()
        .gemini_api_key(api_key_from_env()?)
        .database_path(args.database)
        .completion_model(args.model)
        .top_k(args.top_k)
        .build();

    let client = GeminiClient::new_gemini(&config.gemini_api_key, &config.completion_model);
    let db = Database::new_from_path(&config.database_path).await?;

    let chunks = retrieve(&db, &client, &args.question, &config.search_options()).await?;
    let context = chunks
        .iter()
        .map(|c| c.text.as_str())
        .collect::<Vec<_>>()
        .join("\n");

    let answer = answer_with_context(client.completion().clone(), &context, &args.question).await?;

    match args.format.as_str() {
        "json" => {
            let json_response = serde_json::json!({
                "question": args.question,
                "answer": answer,
                "sources": chunks.iter().map(|c| {
                    serde_json::json!({
                        "url": c.url,
                        "position": c.position,
                    })
                }).collect::<Vec<_>>(),
            });
            println!("{}", serde_json::to_string_pretty(&json_response)?);
        }
        _ => {
            println!("\nAnswer:");
            println!("{}", answer);
            println!("\nSources:");
            for (i, chunk) in chunks.iter().enumerate() {
                println!("{}. {} (chunk {})", i + 1, chunk.url, chunk.position);
            }
            println!();
        }
    }

    Ok(())
}

#[instrument]
async fn resolve_command(args: ResolveArgs) -> anyhow::Result<()> {
    let order = match args.order.as_str() {
        "nested-first" => TraversalOrder::NestedFirst,
        _ => TraversalOrder::FinalsFirst,
    };
    let resolver = SitemapResolver::default().with_order(order);

    if args.tree {
        let tree = resolver.tree(&args.url).await;
        println!("{}", serde_json::to_string_pretty(&tree)?);
        return Ok(());
    }

    let urls = resolver.resolve(&args.url).await;
    match args.format.as_str() {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&urls)?);
        }
        _ => {
            println!("Resolved {} URLs", urls.len());
            for url in urls {
                println!("{}", url);
            }
        }
    }

    Ok(())
}

#[instrument]
async fn list_command(args: ListArgs) -> anyhow::Result<()> {
    let db = Database::new_from_path(&args.database).await?;
    let urls = db.list_urls().await?;

    println!("Indexed URLs: {}", urls.len());
    for url in urls {
        if args.details {
            let count = db.count_chunks_for_url(&url).await?;
            println!("{} - {} chunks", url, count);
        } else {
            println!("{}", url);
        }
    }

    Ok(())
}
