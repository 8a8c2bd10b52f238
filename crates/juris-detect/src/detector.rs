//! [`ContradictionDetector`]: sequences the detection pipeline.
//!
//! retrieval → pairing → polarity check → deep analysis → clustering.
//!
//! Retrieval and deep analysis are the only suspension points. Deep analyses
//! run concurrently in a [`JoinSet`], capped by a semaphore shared by every
//! run on the same detector. Results carry their pair index and are put back
//! into pair order before clustering, so completion order never leaks into
//! the report.

use std::{
  collections::{BTreeMap, HashSet},
  sync::Arc,
  time::Duration,
};

use chrono::Utc;
use juris_core::{
  Error, GenerationError, Result,
  case::{Case, CasePair},
  collab::{CaseRetriever, TextGenerator},
  contradiction::Contradiction,
  court::CourtFilter,
  report::{DetectionReport, DetectionStats, FailureKind, PairFailure},
};
use tokio::{sync::Semaphore, task::JoinSet, time::Instant};

use crate::{
  analyzer::DeepAnalyzer,
  checker::ContradictionChecker,
  cluster::{ClusterEngine, fallback_theme},
  pairs::PairGenerator,
  prompt::PromptBuilder,
  report::court_stats,
};

// ─── Configuration ───────────────────────────────────────────────────────────

/// Per-run options.
#[derive(Debug, Clone)]
pub struct DetectOptions {
  /// Minimum pairwise similarity for a pair to exist, in `[0, 1]`.
  pub similarity_threshold: f32,
  /// Upper bound on retrieved cases; bounds pairing cost quadratically.
  pub max_cases:            usize,
  /// Restrict retrieval to these courts.
  pub courts:               Option<CourtFilter>,
  /// Overall deadline for the run, measured from the start of
  /// [`ContradictionDetector::detect`]. Retrieval time counts against it.
  pub deadline:             Option<Duration>,
  /// Maximum opposed pairs sent to deep analysis; defaults to `max_cases`.
  pub analysis_budget:      Option<usize>,
}

impl Default for DetectOptions {
  fn default() -> Self {
    Self {
      similarity_threshold: 0.75,
      max_cases:            50,
      courts:               None,
      deadline:             None,
      analysis_budget:      None,
    }
  }
}

impl DetectOptions {
  pub fn validate(&self) -> Result<()> {
    if !(0.0..=1.0).contains(&self.similarity_threshold) {
      return Err(Error::InvalidInput(format!(
        "similarity threshold {} is outside [0, 1]",
        self.similarity_threshold
      )));
    }
    if self.max_cases == 0 {
      return Err(Error::InvalidInput("max_cases must be positive".into()));
    }
    Ok(())
  }

  fn budget(&self) -> usize { self.analysis_budget.unwrap_or(self.max_cases) }
}

/// Detector-wide settings for the deep-analysis stage.
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
  /// Maximum in-flight generation calls across all runs.
  pub max_concurrency: usize,
  pub call_timeout:    Duration,
  /// Maximum characters of decision text sent per case.
  pub max_case_chars:  usize,
}

impl Default for AnalyzerConfig {
  fn default() -> Self {
    Self {
      max_concurrency: 4,
      call_timeout:    Duration::from_secs(30),
      max_case_chars:  4000,
    }
  }
}

// ─── Detector ────────────────────────────────────────────────────────────────

pub struct ContradictionDetector<R, G> {
  retriever: R,
  analyzer:  Arc<DeepAnalyzer<G>>,
  pairs:     PairGenerator,
  checker:   ContradictionChecker,
  clusters:  ClusterEngine,
  limiter:   Arc<Semaphore>,
}

type Outcome = (usize, Result<Option<Contradiction>, GenerationError>);

impl<R, G> ContradictionDetector<R, G>
where
  R: CaseRetriever,
  G: TextGenerator + 'static,
{
  pub fn new(retriever: R, generator: G, config: AnalyzerConfig) -> Self {
    let checker = ContradictionChecker::default();
    let analyzer = DeepAnalyzer::new(generator)
      .with_checker(checker.clone())
      .with_prompts(PromptBuilder::default().with_max_case_chars(config.max_case_chars))
      .with_call_timeout(config.call_timeout);
    Self {
      retriever,
      analyzer: Arc::new(analyzer),
      pairs: PairGenerator::default(),
      checker,
      clusters: ClusterEngine,
      limiter: Arc::new(Semaphore::new(config.max_concurrency.max(1))),
    }
  }

  pub fn retriever(&self) -> &R { &self.retriever }

  pub fn generator(&self) -> &G { self.analyzer.generator() }

  /// Run the full pipeline for `query`.
  ///
  /// Fails only when the options are invalid, retrieval itself fails, or
  /// retrieval returns no cases. Every per-pair failure is recorded in the
  /// report instead.
  pub async fn detect(
    &self,
    query: &str,
    options: &DetectOptions,
  ) -> Result<DetectionReport> {
    options.validate()?;
    let deadline = options.deadline.map(|d| Instant::now() + d);
    tracing::info!(
      query,
      threshold = options.similarity_threshold,
      max_cases = options.max_cases,
      "starting contradiction detection"
    );

    let cases = self.retrieve(query, options).await?;
    tracing::info!(count = cases.len(), "cases retrieved");

    let pair_set = self.pairs.generate(&cases, options.similarity_threshold);
    let mut failures = pair_set.failures;
    let pairs_generated = pair_set.pairs.len();

    let opposed: Vec<CasePair> = pair_set
      .pairs
      .into_iter()
      .filter(|p| self.checker.is_opposed(p))
      .collect();
    let pairs_opposed = opposed.len();
    tracing::info!(
      compared = pair_set.compared,
      generated = pairs_generated,
      opposed = pairs_opposed,
      "pairs filtered"
    );

    let budget = options.budget();
    let (to_analyze, over_budget) = opposed.split_at(budget.min(opposed.len()));
    failures.extend(over_budget.iter().map(|p| PairFailure {
      pair_id: p.pair_id(),
      kind:    FailureKind::BudgetExceeded,
      message: format!("analysis budget of {budget} opposed pairs exhausted"),
    }));

    let (confirmed, pairs_analyzed, analysis_failures) =
      self.analyze_all(to_analyze, deadline).await;
    failures.extend(analysis_failures);

    for f in &failures {
      tracing::warn!(pair = %f.pair_id, kind = %f.kind, "pair skipped: {}", f.message);
    }

    let clusters = self
      .clusters
      .cluster(confirmed.clone(), &fallback_theme(query));

    let stats = DetectionStats {
      cases_retrieved: cases.len(),
      pairs_compared: pair_set.compared,
      pairs_generated,
      pairs_opposed,
      pairs_analyzed,
      pairs_skipped: failures.len(),
      contradictions_confirmed: confirmed.len(),
    };
    tracing::info!(
      cases = stats.cases_retrieved,
      pairs = stats.pairs_compared,
      skipped = stats.pairs_skipped,
      contradictions = stats.contradictions_confirmed,
      clusters = clusters.len(),
      "contradiction detection finished"
    );

    Ok(DetectionReport {
      query: query.to_string(),
      generated_at: Utc::now(),
      court_stats: court_stats(&cases, &confirmed),
      contradictions: confirmed,
      clusters,
      stats,
      failures,
    })
  }

  async fn retrieve(
    &self,
    query: &str,
    options: &DetectOptions,
  ) -> Result<Vec<Arc<Case>>> {
    let retrieved = self
      .retriever
      .retrieve(query, options.max_cases, options.courts.as_ref())
      .await
      .map_err(|e| Error::Retrieval(Box::new(e)))?;

    let mut seen = HashSet::new();
    let cases: Vec<Arc<Case>> = retrieved
      .into_iter()
      .filter(|c| seen.insert(c.id.clone()))
      .take(options.max_cases)
      .map(Arc::new)
      .collect();

    if cases.is_empty() {
      return Err(Error::EmptyRetrieval { query: query.to_string() });
    }
    Ok(cases)
  }

  /// Deep-analyse `pairs` concurrently. Returns confirmed contradictions and
  /// per-pair failures, both in pair order, and the number of completed
  /// analyses.
  async fn analyze_all(
    &self,
    pairs: &[CasePair],
    deadline: Option<Instant>,
  ) -> (Vec<Contradiction>, usize, Vec<PairFailure>) {
    if deadline.is_some_and(|at| Instant::now() >= at) {
      let failures = pairs.iter().map(|p| deadline_failure(p.pair_id())).collect();
      return (Vec::new(), 0, failures);
    }

    let mut outstanding: BTreeMap<usize, String> = BTreeMap::new();
    let mut set: JoinSet<Outcome> = JoinSet::new();

    for (index, pair) in pairs.iter().enumerate() {
      outstanding.insert(index, pair.pair_id());
      let analyzer = Arc::clone(&self.analyzer);
      let limiter = Arc::clone(&self.limiter);
      let pair = pair.clone();
      set.spawn(async move {
        let Ok(_permit) = limiter.acquire_owned().await else {
          return (index, Err(GenerationError::Transport("concurrency limiter closed".into())));
        };
        (index, analyzer.analyze(&pair).await)
      });
    }

    let mut confirmed: Vec<(usize, Contradiction)> = Vec::new();
    let mut failures: Vec<(usize, PairFailure)> = Vec::new();
    let mut analyzed = 0;
    let mut timed_out = false;

    loop {
      let next = match deadline {
        Some(at) => match tokio::time::timeout_at(at, set.join_next()).await {
          Ok(next) => next,
          Err(_) => {
            timed_out = true;
            set.abort_all();
            break;
          }
        },
        None => set.join_next().await,
      };
      let Some(joined) = next else { break };

      let (index, outcome) = match joined {
        Ok(done) => done,
        Err(e) => {
          // The pair stays in `outstanding` and is reported below.
          tracing::error!("deep analysis task failed: {e}");
          continue;
        }
      };
      let pair_id = outstanding.remove(&index).unwrap_or_default();

      match outcome {
        Ok(Some(c)) => {
          analyzed += 1;
          tracing::debug!(pair = %pair_id, severity = %c.severity, "contradiction confirmed");
          confirmed.push((index, c));
        }
        Ok(None) => analyzed += 1,
        Err(e) => failures.push((index, PairFailure {
          pair_id,
          kind: match e {
            GenerationError::Timeout => FailureKind::Timeout,
            _ => FailureKind::Generation,
          },
          message: e.to_string(),
        })),
      }
    }

    for (index, pair_id) in outstanding {
      failures.push((index, if timed_out {
        deadline_failure(pair_id)
      } else {
        PairFailure {
          pair_id,
          kind: FailureKind::Generation,
          message: "analysis task aborted".into(),
        }
      }));
    }

    confirmed.sort_by_key(|(index, _)| *index);
    failures.sort_by_key(|(index, _)| *index);
    let confirmed = confirmed.into_iter().map(|(_, c)| c).collect();
    let failures = failures.into_iter().map(|(_, f)| f).collect();
    (confirmed, analyzed, failures)
  }
}

fn deadline_failure(pair_id: String) -> PairFailure {
  PairFailure {
    pair_id,
    kind: FailureKind::DeadlineExceeded,
    message: "run deadline passed before analysis completed".into(),
  }
}
