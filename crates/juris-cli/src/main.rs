//! `juris`: detect contradictory decisions across electoral courts.
//!
//! # Usage
//!
//! ```text
//! juris ingest --file cases.json
//! juris detect "registro de candidatura" --court TRE-MG --court TRE-SP
//! juris serve --port 8080
//! ```

mod settings;
mod summary;

use std::{path::PathBuf, sync::Arc};

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use juris_api::AppState;
use juris_core::{case::NewCase, court::Court};
use juris_detect::ContradictionDetector;
use juris_openai::OpenAiClient;
use juris_store_sqlite::{SemanticRetriever, SqliteCaseStore};
use settings::Settings;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "juris", version, about = "Cross-court contradiction detection")]
struct Cli {
  /// Path to a TOML config file (default: ./juris.toml when present).
  #[arg(short, long, global = true, value_name = "FILE")]
  config: Option<PathBuf>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Embed and store decisions from a JSON array of case records.
  Ingest {
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,
  },

  /// Run contradiction detection for a query.
  Detect {
    query: String,

    /// Minimum pairwise similarity, in [0, 1].
    #[arg(long)]
    threshold: Option<f32>,

    #[arg(long)]
    max_cases: Option<usize>,

    /// Restrict retrieval to a court; repeatable.
    #[arg(long = "court", value_name = "CODE")]
    courts: Vec<Court>,

    /// Print the full report as JSON.
    #[arg(long)]
    json: bool,
  },

  /// Serve the HTTP API.
  Serve {
    #[arg(long)]
    host: Option<String>,

    #[arg(long)]
    port: Option<u16>,
  },
}

type Retriever = SemanticRetriever<OpenAiClient>;

// ─── Entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();
  let settings = Settings::load(cli.config)?;

  let store = SqliteCaseStore::open(&settings.store_path)
    .await
    .with_context(|| format!("failed to open store at {:?}", settings.store_path))?;
  let client = OpenAiClient::new(settings.openai.clone())
    .context("failed to build OpenAI client")?;

  match cli.command {
    Command::Ingest { file } => ingest(SemanticRetriever::new(store, client), file).await,
    Command::Detect { query, threshold, max_cases, courts, json } => {
      let mut options = settings.detection.options();
      if let Some(t) = threshold {
        options.similarity_threshold = t;
      }
      if let Some(n) = max_cases {
        options.max_cases = n;
      }
      if !courts.is_empty() {
        options.courts = Some(courts.into_iter().collect());
      }

      let detector = detector(&settings, store, client);
      let report = detector.detect(&query, &options).await?;
      if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
      } else {
        print!("{}", summary::render(&report));
      }
      Ok(())
    }
    Command::Serve { host, port } => {
      let state = AppState {
        detector: Arc::new(detector(&settings, store.clone(), client)),
        store,
        defaults: Arc::new(settings.detection.options()),
      };
      let app = juris_api::router(state);
      let address = format!(
        "{}:{}",
        host.unwrap_or(settings.server.host),
        port.unwrap_or(settings.server.port)
      );

      tracing::info!("Listening on http://{address}");
      let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;
      axum::serve(listener, app).await.context("server error")?;
      Ok(())
    }
  }
}

fn detector(
  settings: &Settings,
  store: SqliteCaseStore,
  client: OpenAiClient,
) -> ContradictionDetector<Retriever, OpenAiClient> {
  let retriever = SemanticRetriever::new(store, client.clone());
  ContradictionDetector::new(retriever, client, settings.detection.analyzer())
}

async fn ingest(retriever: Retriever, file: PathBuf) -> Result<()> {
  let raw = std::fs::read_to_string(&file)
    .with_context(|| format!("reading {}", file.display()))?;
  let cases: Vec<NewCase> = serde_json::from_str(&raw)
    .with_context(|| format!("parsing case records in {}", file.display()))?;

  let total = cases.len();
  let mut stored = 0;
  for case in &cases {
    if !case.court.is_known() {
      tracing::warn!(case = %case.id, court = %case.court, "unknown court code");
    }
    match retriever.ingest(case).await {
      Ok(_) => stored += 1,
      Err(e) => tracing::warn!(case = %case.id, "case not stored: {e}"),
    }
  }

  let corpus = retriever.store().count().await?;
  tracing::info!(stored, total, corpus, "ingest finished");
  println!("Stored {stored} of {total} case(s); corpus now holds {corpus}.");
  Ok(())
}
