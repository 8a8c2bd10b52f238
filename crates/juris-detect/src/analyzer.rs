//! The expensive stage of the funnel: deep analysis by a text-generation
//! service.
//!
//! The generator sees both decisions and either confirms the contradiction,
//! with a type, severity, and explanatory text, or vetoes it. Opposed
//! polarity is necessary but not sufficient: two decisions may reach
//! opposite outcomes on non-comparable grounds.

use std::time::Duration;

use chrono::Utc;
use juris_core::{
  GenerationError,
  case::CasePair,
  collab::TextGenerator,
  contradiction::{Contradiction, ContradictionType, Severity},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{checker::ContradictionChecker, prompt::PromptBuilder};

/// The structured judgment the generator must return.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Verdict {
  pub is_contradiction:   bool,
  #[serde(rename = "type", default)]
  pub kind:               Option<ContradictionType>,
  #[serde(default)]
  pub severity:           Option<Severity>,
  #[serde(default)]
  pub explanation:        String,
  #[serde(default)]
  pub legal_impact:       String,
  #[serde(default, alias = "recommendation")]
  pub recommended_action: String,
}

/// Parse a generator response into a [`Verdict`].
///
/// Tolerates code fences and prose around the JSON object. A confirmed
/// contradiction must carry both a type and a severity.
pub fn parse_verdict(raw: &str) -> Result<Verdict, GenerationError> {
  let json = extract_json(raw)
    .ok_or_else(|| GenerationError::Malformed("no JSON object in response".into()))?;
  let verdict: Verdict = serde_json::from_str(json)
    .map_err(|e| GenerationError::Malformed(e.to_string()))?;
  if verdict.is_contradiction && (verdict.kind.is_none() || verdict.severity.is_none()) {
    return Err(GenerationError::Malformed(
      "confirmed contradiction without type or severity".into(),
    ));
  }
  Ok(verdict)
}

fn extract_json(raw: &str) -> Option<&str> {
  let start = raw.find('{')?;
  let end = raw.rfind('}')?;
  (start < end).then(|| &raw[start..=end])
}

/// Confirms or vetoes opposed pairs through a [`TextGenerator`].
pub struct DeepAnalyzer<G> {
  generator:    G,
  checker:      ContradictionChecker,
  prompts:      PromptBuilder,
  call_timeout: Duration,
}

impl<G: TextGenerator> DeepAnalyzer<G> {
  pub fn new(generator: G) -> Self {
    Self {
      generator,
      checker: ContradictionChecker::default(),
      prompts: PromptBuilder::default(),
      call_timeout: Duration::from_secs(30),
    }
  }

  pub fn with_checker(mut self, checker: ContradictionChecker) -> Self {
    self.checker = checker;
    self
  }

  pub fn with_prompts(mut self, prompts: PromptBuilder) -> Self {
    self.prompts = prompts;
    self
  }

  pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
    self.call_timeout = timeout;
    self
  }

  pub fn generator(&self) -> &G { &self.generator }

  /// Analyse `pair`. Returns `Ok(None)` when the generator vetoes it, and
  /// also, without calling the generator, when the pair is not opposed.
  pub async fn analyze(
    &self,
    pair: &CasePair,
  ) -> Result<Option<Contradiction>, GenerationError> {
    let polarities = self.checker.polarities(pair);
    if !polarities.0.opposes(polarities.1) {
      return Ok(None);
    }

    let prompt = self.prompts.build(pair, polarities);
    let raw = tokio::time::timeout(self.call_timeout, self.generator.complete(&prompt))
      .await
      .map_err(|_| GenerationError::Timeout)??;
    let verdict = parse_verdict(&raw)?;

    if !verdict.is_contradiction {
      tracing::debug!(pair = %pair, "contradiction vetoed by deep analysis");
      return Ok(None);
    }

    // parse_verdict guarantees both are present for a confirmed verdict.
    let (Some(kind), Some(severity)) = (verdict.kind, verdict.severity) else {
      return Err(GenerationError::Malformed("missing type or severity".into()));
    };

    Ok(Some(Contradiction {
      id: Uuid::new_v4(),
      case1: pair.case_a.clone(),
      case2: pair.case_b.clone(),
      similarity_score: pair.similarity,
      kind,
      severity,
      explanation: verdict.explanation,
      legal_impact: verdict.legal_impact,
      recommended_action: verdict.recommended_action,
      detected_at: Utc::now(),
    }))
  }
}

#[cfg(test)]
mod tests {
  use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
  };

  use juris_core::{
    case::{Case, SimilarityMethod},
    collab::Prompt,
    court::Court,
  };

  use super::*;

  struct Canned {
    response: Result<String, GenerationError>,
    calls:    AtomicUsize,
  }

  impl Canned {
    fn ok(body: &str) -> Self {
      Self { response: Ok(body.into()), calls: AtomicUsize::new(0) }
    }
  }

  impl TextGenerator for Canned {
    async fn complete(&self, _prompt: &Prompt) -> Result<String, GenerationError> {
      self.calls.fetch_add(1, Ordering::SeqCst);
      self.response.clone()
    }
  }

  struct Stalled;

  impl TextGenerator for Stalled {
    async fn complete(&self, _prompt: &Prompt) -> Result<String, GenerationError> {
      tokio::time::sleep(Duration::from_secs(10)).await;
      Ok(String::new())
    }
  }

  fn pair(text_a: &str, text_b: &str) -> CasePair {
    let case = |id: &str, court: &str, text: &str| {
      Arc::new(Case {
        id:              id.into(),
        court:           Court::new(court).unwrap(),
        title:           id.into(),
        text:            text.into(),
        theme:           Some("registro".into()),
        number:          None,
        year:            None,
        embedding:       None,
        retrieval_score: 0.0,
      })
    };
    CasePair::new(
      case("a", "TRE-MG", text_a),
      case("b", "TRE-SP", text_b),
      0.88,
      SimilarityMethod::Cosine,
    )
    .unwrap()
  }

  const CONFIRMED: &str = r#"{
    "is_contradiction": true,
    "type": "opposite_decision",
    "severity": "high",
    "explanation": "Opposite outcomes on identical facts.",
    "legal_impact": "Legal uncertainty for candidates.",
    "recommended_action": "Cite the more recent precedent."
  }"#;

  #[test]
  fn parses_fenced_portuguese_response() {
    let raw = "```json\n{\"is_contradiction\": true, \"type\": \"decisao_oposta\", \
               \"severity\": \"crítica\", \"explanation\": \"x\", \
               \"legal_impact\": \"y\", \"recommendation\": \"z\"}\n```";
    let verdict = parse_verdict(raw).unwrap();
    assert_eq!(verdict.kind, Some(ContradictionType::OppositeDecision));
    assert_eq!(verdict.severity, Some(Severity::Critical));
    assert_eq!(verdict.recommended_action, "z");
  }

  #[test]
  fn veto_needs_no_classification() {
    let verdict = parse_verdict(r#"{"is_contradiction": false}"#).unwrap();
    assert!(!verdict.is_contradiction);
  }

  #[test]
  fn malformed_responses_are_rejected() {
    assert!(matches!(parse_verdict("no idea"), Err(GenerationError::Malformed(_))));
    assert!(matches!(
      parse_verdict(r#"{"is_contradiction": true}"#),
      Err(GenerationError::Malformed(_))
    ));
    assert!(matches!(
      parse_verdict(r#"{"is_contradiction": true, "type": "bogus", "severity": "low"}"#),
      Err(GenerationError::Malformed(_))
    ));
  }

  #[tokio::test]
  async fn confirmed_pair_becomes_contradiction() {
    let analyzer = DeepAnalyzer::new(Canned::ok(CONFIRMED));
    let p = pair("registro deferido", "registro indeferido");
    let c = analyzer.analyze(&p).await.unwrap().unwrap();
    assert_eq!(c.kind, ContradictionType::OppositeDecision);
    assert_eq!(c.severity, Severity::High);
    assert_eq!(c.similarity_score, 0.88);
    assert_eq!(c.case1.id, "a");
    assert!(Arc::ptr_eq(&c.case2, &p.case_b));
  }

  #[tokio::test]
  async fn vetoed_pair_yields_nothing() {
    let analyzer = DeepAnalyzer::new(Canned::ok(r#"{"is_contradiction": false}"#));
    let p = pair("registro deferido", "registro indeferido");
    assert!(analyzer.analyze(&p).await.unwrap().is_none());
  }

  #[tokio::test]
  async fn unopposed_pair_never_reaches_the_generator() {
    let analyzer = DeepAnalyzer::new(Canned::ok(CONFIRMED));
    let p = pair("registro deferido", "registro deferido");
    assert!(analyzer.analyze(&p).await.unwrap().is_none());
    assert_eq!(analyzer.generator().calls.load(Ordering::SeqCst), 0);
  }

  #[tokio::test]
  async fn generator_errors_propagate() {
    let analyzer = DeepAnalyzer::new(Canned {
      response: Err(GenerationError::Quota("rate limited".into())),
      calls:    AtomicUsize::new(0),
    });
    let p = pair("recurso provido", "recurso não provido");
    assert_eq!(
      analyzer.analyze(&p).await.unwrap_err(),
      GenerationError::Quota("rate limited".into())
    );
  }

  #[tokio::test]
  async fn slow_generator_times_out() {
    let analyzer =
      DeepAnalyzer::new(Stalled).with_call_timeout(Duration::from_millis(20));
    let p = pair("recurso provido", "recurso não provido");
    assert_eq!(analyzer.analyze(&p).await.unwrap_err(), GenerationError::Timeout);
  }
}
