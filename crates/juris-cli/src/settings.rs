//! Layered configuration: optional TOML file, then `JURIS_*` environment
//! variables (`__` separates nesting levels, e.g. `JURIS_OPENAI__API_KEY`).

use std::{path::PathBuf, time::Duration};

use anyhow::Context as _;
use juris_core::court::Court;
use juris_detect::{AnalyzerConfig, DetectOptions};
use juris_openai::OpenAiConfig;
use serde::Deserialize;

/// Config file read when `--config` is not given, if it exists.
pub const DEFAULT_CONFIG_FILE: &str = "juris.toml";

#[derive(Debug, Deserialize)]
pub struct Settings {
  #[serde(default = "default_store_path")]
  pub store_path: PathBuf,
  pub openai:     OpenAiConfig,
  #[serde(default)]
  pub detection:  DetectionConfig,
  #[serde(default)]
  pub server:     ServerConfig,
}

fn default_store_path() -> PathBuf { PathBuf::from("juris.db") }

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
  pub similarity_threshold: f32,
  pub max_cases:            usize,
  /// Empty means every court.
  pub courts:               Vec<Court>,
  pub max_concurrency:      usize,
  pub call_timeout_secs:    u64,
  pub deadline_secs:        Option<u64>,
  pub analysis_budget:      Option<usize>,
  pub max_case_chars:       usize,
}

impl Default for DetectionConfig {
  fn default() -> Self {
    let options = DetectOptions::default();
    let analyzer = AnalyzerConfig::default();
    Self {
      similarity_threshold: options.similarity_threshold,
      max_cases:            options.max_cases,
      courts:               Vec::new(),
      max_concurrency:      analyzer.max_concurrency,
      call_timeout_secs:    analyzer.call_timeout.as_secs(),
      deadline_secs:        None,
      analysis_budget:      None,
      max_case_chars:       analyzer.max_case_chars,
    }
  }
}

impl DetectionConfig {
  pub fn options(&self) -> DetectOptions {
    DetectOptions {
      similarity_threshold: self.similarity_threshold,
      max_cases:            self.max_cases,
      courts:               (!self.courts.is_empty())
        .then(|| self.courts.iter().cloned().collect()),
      deadline:             self.deadline_secs.map(Duration::from_secs),
      analysis_budget:      self.analysis_budget,
    }
  }

  pub fn analyzer(&self) -> AnalyzerConfig {
    AnalyzerConfig {
      max_concurrency: self.max_concurrency,
      call_timeout:    Duration::from_secs(self.call_timeout_secs),
      max_case_chars:  self.max_case_chars,
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
  pub host: String,
  pub port: u16,
}

impl Default for ServerConfig {
  fn default() -> Self { Self { host: "127.0.0.1".into(), port: 8080 } }
}

impl Settings {
  /// Load settings from `path` (required when given) or from
  /// [`DEFAULT_CONFIG_FILE`] when present, then overlay the environment.
  pub fn load(path: Option<PathBuf>) -> anyhow::Result<Self> {
    let file = match path {
      Some(path) => config::File::from(path).required(true),
      None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
    };
    Self::from_builder(config::Config::builder().add_source(file))
  }

  fn from_builder(
    builder: config::ConfigBuilder<config::builder::DefaultState>,
  ) -> anyhow::Result<Self> {
    let settings = builder
      .add_source(
        config::Environment::with_prefix("JURIS")
          .separator("__")
          .list_separator(",")
          .with_list_parse_key("detection.courts")
          .try_parsing(true),
      )
      .build()
      .context("failed to read configuration")?;

    settings
      .try_deserialize()
      .context("failed to deserialise settings")
  }
}
