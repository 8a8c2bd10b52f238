//! Court codes: the issuing tribunal of a decision.
//!
//! Codes are normalised on construction (trimmed, upper-cased) so `tre-mg`
//! and `TRE-MG ` compare equal. The electoral courts are listed in
//! [`Court::KNOWN`]; other codes are accepted because the retrieval corpus,
//! not this crate, decides which courts exist.

use std::{collections::BTreeSet, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::Error;

/// A normalised court code, e.g. `TSE` or `TRE-MG`.
#[derive(
  Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct Court(String);

/// An allowlist of courts used to restrict retrieval.
pub type CourtFilter = BTreeSet<Court>;

impl Court {
  /// The electoral courts: the superior court and the 27 regional courts.
  pub const KNOWN: &'static [(&'static str, &'static str)] = &[
    ("TSE", "Tribunal Superior Eleitoral"),
    ("TRE-AC", "Tribunal Regional Eleitoral do Acre"),
    ("TRE-AL", "Tribunal Regional Eleitoral de Alagoas"),
    ("TRE-AP", "Tribunal Regional Eleitoral do Amapá"),
    ("TRE-AM", "Tribunal Regional Eleitoral do Amazonas"),
    ("TRE-BA", "Tribunal Regional Eleitoral da Bahia"),
    ("TRE-CE", "Tribunal Regional Eleitoral do Ceará"),
    ("TRE-DF", "Tribunal Regional Eleitoral do Distrito Federal"),
    ("TRE-ES", "Tribunal Regional Eleitoral do Espírito Santo"),
    ("TRE-GO", "Tribunal Regional Eleitoral de Goiás"),
    ("TRE-MA", "Tribunal Regional Eleitoral do Maranhão"),
    ("TRE-MT", "Tribunal Regional Eleitoral de Mato Grosso"),
    ("TRE-MS", "Tribunal Regional Eleitoral de Mato Grosso do Sul"),
    ("TRE-MG", "Tribunal Regional Eleitoral de Minas Gerais"),
    ("TRE-PA", "Tribunal Regional Eleitoral do Pará"),
    ("TRE-PB", "Tribunal Regional Eleitoral da Paraíba"),
    ("TRE-PR", "Tribunal Regional Eleitoral do Paraná"),
    ("TRE-PE", "Tribunal Regional Eleitoral de Pernambuco"),
    ("TRE-PI", "Tribunal Regional Eleitoral do Piauí"),
    ("TRE-RJ", "Tribunal Regional Eleitoral do Rio de Janeiro"),
    ("TRE-RN", "Tribunal Regional Eleitoral do Rio Grande do Norte"),
    ("TRE-RS", "Tribunal Regional Eleitoral do Rio Grande do Sul"),
    ("TRE-RO", "Tribunal Regional Eleitoral de Rondônia"),
    ("TRE-RR", "Tribunal Regional Eleitoral de Roraima"),
    ("TRE-SC", "Tribunal Regional Eleitoral de Santa Catarina"),
    ("TRE-SP", "Tribunal Regional Eleitoral de São Paulo"),
    ("TRE-SE", "Tribunal Regional Eleitoral de Sergipe"),
    ("TRE-TO", "Tribunal Regional Eleitoral do Tocantins"),
  ];

  /// Normalise and wrap a court code. Fails on a blank code.
  pub fn new(code: impl AsRef<str>) -> Result<Self, Error> {
    let code = code.as_ref().trim().to_uppercase();
    if code.is_empty() {
      return Err(Error::InvalidInput("court code is empty".into()));
    }
    Ok(Self(code))
  }

  pub fn code(&self) -> &str { &self.0 }

  /// Display name for a known court, `None` otherwise.
  pub fn name(&self) -> Option<&'static str> {
    Self::KNOWN
      .iter()
      .find(|(code, _)| *code == self.0)
      .map(|(_, name)| *name)
  }

  pub fn is_known(&self) -> bool { self.name().is_some() }
}

impl fmt::Display for Court {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl FromStr for Court {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> { Self::new(s) }
}

impl TryFrom<String> for Court {
  type Error = Error;

  fn try_from(value: String) -> Result<Self, Self::Error> { Self::new(value) }
}

impl From<Court> for String {
  fn from(court: Court) -> Self { court.0 }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn codes_are_normalised() {
    let a = Court::new(" tre-mg ").unwrap();
    let b: Court = "TRE-MG".parse().unwrap();
    assert_eq!(a, b);
    assert_eq!(a.code(), "TRE-MG");
  }

  #[test]
  fn blank_code_is_rejected() {
    assert!(Court::new("   ").is_err());
  }

  #[test]
  fn known_courts_have_names() {
    assert_eq!(
      Court::new("tse").unwrap().name(),
      Some("Tribunal Superior Eleitoral")
    );
    assert!(!Court::new("X").unwrap().is_known());
    assert_eq!(Court::KNOWN.len(), 28);
  }

  #[test]
  fn serde_round_trips_through_normalisation() {
    let court: Court = serde_json::from_str("\"tre-sp\"").unwrap();
    assert_eq!(court.code(), "TRE-SP");
    assert_eq!(serde_json::to_string(&court).unwrap(), "\"TRE-SP\"");
  }
}
