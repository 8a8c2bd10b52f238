//! Decision polarity extraction.
//!
//! Scans decision text for a fixed, ordered table of outcome markers.
//! Negated markers come first in the table and are blanked out of the text
//! once found, so `não provido` can never also count as `provido`, and
//! `indeferido` never as `deferido`. Text and markers are compared in NFC,
//! so decomposed accents (`na\u{303}o`) match their composed forms.

use juris_core::contradiction::Polarity;
use unicode_normalization::UnicodeNormalization as _;

/// One entry of the marker table: a lower-case substring and the outcome it
/// signals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
  pub pattern:  String,
  pub polarity: Polarity,
}

impl Marker {
  pub fn new(pattern: impl AsRef<str>, polarity: Polarity) -> Self {
    Self { pattern: normalize(pattern.as_ref()), polarity }
  }
}

/// Default markers, in evaluation order. Every marker that contains another
/// marker as a substring must appear before it.
pub const DEFAULT_MARKERS: &[(&str, Polarity)] = &[
  // ── Negated / denied ────────────────────────────────────────────────────
  ("não provido", Polarity::Denied),
  ("não provida", Polarity::Denied),
  ("nao provido", Polarity::Denied),
  ("nao provida", Polarity::Denied),
  ("não-provido", Polarity::Denied),
  ("nao-provido", Polarity::Denied),
  ("não deferido", Polarity::Denied),
  ("não deferida", Polarity::Denied),
  ("nao deferido", Polarity::Denied),
  ("nao deferida", Polarity::Denied),
  ("não acolhido", Polarity::Denied),
  ("não acolhida", Polarity::Denied),
  ("nao acolhido", Polarity::Denied),
  ("nao acolhida", Polarity::Denied),
  ("não procedente", Polarity::Denied),
  ("nao procedente", Polarity::Denied),
  ("negou-se provimento", Polarity::Denied),
  ("negaram provimento", Polarity::Denied),
  ("negar provimento", Polarity::Denied),
  ("nego provimento", Polarity::Denied),
  ("desprovido", Polarity::Denied),
  ("desprovida", Polarity::Denied),
  ("improvido", Polarity::Denied),
  ("improvida", Polarity::Denied),
  ("indeferido", Polarity::Denied),
  ("indeferida", Polarity::Denied),
  ("indefere-se", Polarity::Denied),
  ("indefiro", Polarity::Denied),
  ("improcedente", Polarity::Denied),
  ("rejeitado", Polarity::Denied),
  ("rejeitada", Polarity::Denied),
  // ── Granted ─────────────────────────────────────────────────────────────
  ("provido", Polarity::Granted),
  ("provida", Polarity::Granted),
  ("deu-se provimento", Polarity::Granted),
  ("deram provimento", Polarity::Granted),
  ("dar provimento", Polarity::Granted),
  ("dou provimento", Polarity::Granted),
  ("deferido", Polarity::Granted),
  ("deferida", Polarity::Granted),
  ("defere-se", Polarity::Granted),
  ("defiro", Polarity::Granted),
  ("procedente", Polarity::Granted),
  ("acolhido", Polarity::Granted),
  ("acolhida", Polarity::Granted),
];

/// Extracts a [`Polarity`] from decision text. Total and deterministic.
#[derive(Debug, Clone)]
pub struct DecisionClassifier {
  markers: Vec<Marker>,
}

impl Default for DecisionClassifier {
  fn default() -> Self {
    Self::with_markers(
      DEFAULT_MARKERS
        .iter()
        .map(|(pattern, polarity)| Marker::new(pattern, *polarity)),
    )
  }
}

impl DecisionClassifier {
  /// Build a classifier from a custom table, evaluated in iteration order.
  pub fn with_markers(markers: impl IntoIterator<Item = Marker>) -> Self {
    Self {
      markers: markers
        .into_iter()
        .filter(|m| !m.pattern.is_empty())
        .collect(),
    }
  }

  pub fn markers(&self) -> &[Marker] { &self.markers }

  /// Classify `text`. Returns [`Polarity::Unknown`] when no marker matches or
  /// when markers of both outcomes are present.
  pub fn classify(&self, text: &str) -> Polarity {
    let mut haystack = normalize(text);
    let (mut granted, mut denied) = (false, false);

    for marker in &self.markers {
      if !haystack.contains(&marker.pattern) {
        continue;
      }
      match marker.polarity {
        Polarity::Granted => granted = true,
        Polarity::Denied => denied = true,
        Polarity::Unknown => {}
      }
      // Blank the match so shorter markers cannot re-match inside it.
      let blank = " ".repeat(marker.pattern.len());
      haystack = haystack.replace(&marker.pattern, &blank);
    }

    match (granted, denied) {
      (true, false) => Polarity::Granted,
      (false, true) => Polarity::Denied,
      _ => Polarity::Unknown,
    }
  }
}

fn normalize(text: &str) -> String { text.nfc().collect::<String>().to_lowercase() }
