//! Prompt construction for deep analysis.

use juris_core::{
  case::{Case, CasePair},
  collab::Prompt,
  contradiction::Polarity,
};

const DEFAULT_SYSTEM_PROMPT: &str = "You are an expert in Brazilian electoral \
jurisprudence. You compare two court decisions and decide whether they \
contradict each other on comparable facts and legal questions. Decisions with \
opposite outcomes on unrelated or non-comparable grounds are not \
contradictions. Answer with a single JSON object and nothing else.";

const RESPONSE_SCHEMA: &str = r#"{
  "is_contradiction": true | false,
  "type": "opposite_decision" | "divergent_grounds" | "divergent_interpretation" | "conflicting_criteria",
  "severity": "low" | "medium" | "high" | "critical",
  "explanation": "2-3 sentences explaining the contradiction",
  "legal_impact": "legal impact of this contradiction",
  "recommended_action": "strategic recommendation for practitioners"
}"#;

/// Builds the deep-analysis prompt for a case pair.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
  system_prompt:  String,
  /// Maximum characters of decision text included per case.
  max_case_chars: usize,
}

impl Default for PromptBuilder {
  fn default() -> Self {
    Self {
      system_prompt:  DEFAULT_SYSTEM_PROMPT.to_string(),
      max_case_chars: 4000,
    }
  }
}

impl PromptBuilder {
  pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
    self.system_prompt = prompt.into();
    self
  }

  pub fn with_max_case_chars(mut self, chars: usize) -> Self {
    self.max_case_chars = chars;
    self
  }

  pub fn build(&self, pair: &CasePair, polarities: (Polarity, Polarity)) -> Prompt {
    let user = format!(
      "Analyze whether these two decisions contradict each other.\n\
       Pairwise similarity: {similarity:.2}\n\n\
       {case1}\n\
       {case2}\n\
       Respond in JSON with exactly this shape:\n{RESPONSE_SCHEMA}",
      similarity = pair.similarity,
      case1 = self.case_section(1, &pair.case_a, polarities.0),
      case2 = self.case_section(2, &pair.case_b, polarities.1),
    );
    Prompt { system: self.system_prompt.clone(), user }
  }

  fn case_section(&self, n: usize, case: &Case, polarity: Polarity) -> String {
    let court = match case.court.name() {
      Some(name) => format!("{} – {name}", case.court),
      None => case.court.to_string(),
    };
    format!(
      "CASE {n} ({court})\nTitle: {title}\nDetected outcome: {polarity}\nText: {text}\n",
      title = case.title,
      text = truncate(&case.text, self.max_case_chars),
    )
  }
}

/// Truncate to at most `max` characters, backing off to the last word
/// boundary and marking the cut with an ellipsis.
fn truncate(text: &str, max: usize) -> String {
  let Some((cut, _)) = text.char_indices().nth(max) else {
    return text.to_string();
  };
  let head = &text[..cut];
  let head = head.rfind(char::is_whitespace).map_or(head, |i| &head[..i]);
  format!("{}...", head.trim_end())
}
