//! The report payload handed to the presentation layer.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::analysis::AnalysisType;
use crate::entities::EntitySet;
use crate::error::SynthesisError;
use crate::intent::QueryIntent;

/// Whole-number percentage, serialized as `"62%"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Percent(pub u8);

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

impl From<Percent> for String {
    fn from(p: Percent) -> Self {
        p.to_string()
    }
}

impl TryFrom<String> for Percent {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.strip_suffix('%')
            .and_then(|n| n.trim().parse().ok())
            .map(Percent)
            .ok_or_else(|| format!("invalid percentage: {s}"))
    }
}

/// Duration in months with one decimal digit, serialized as `"8.4 months"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Months {
    pub whole: u8,
    pub tenth: u8,
}

impl Months {
    pub fn as_f64(&self) -> f64 {
        f64::from(self.whole) + f64::from(self.tenth) / 10.0
    }
}

impl fmt::Display for Months {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{} months", self.whole, self.tenth)
    }
}

impl From<Months> for String {
    fn from(m: Months) -> Self {
        m.to_string()
    }
}

impl TryFrom<String> for Months {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        let parsed = s.strip_suffix(" months").and_then(|n| {
            let (whole, tenth) = n.split_once('.')?;
            Some(Months {
                whole: whole.parse().ok()?,
                tenth: tenth.parse().ok()?,
            })
        });
        parsed
            .filter(|m| m.tenth < 10)
            .ok_or_else(|| format!("invalid duration: {s}"))
    }
}

/// Narrative summary of the analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Narrative {
    pub overview: String,
    pub key_findings: Vec<String>,
    pub conclusion: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrialActivity {
    Active,
    Completed,
}

/// One drug's aggregated metrics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub drug: String,
    pub orr: Percent,
    pub pfs: Months,
    pub os: Months,
    pub ae_rate: Percent,
    pub status: TrialActivity,
    pub trial_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drug_class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

/// A normalized trial card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialRecord {
    pub id: String,
    pub title: String,
    pub phase: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase_description: Option<String>,
    pub status: String,
    pub enrollment: u32,
    pub primary_endpoint: String,
    pub secondary_endpoints: Vec<String>,
    pub orr: Percent,
    pub pfs: Months,
    pub ae_rate: Percent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeverityGrade {
    #[serde(rename = "1-2")]
    Mild,
    #[serde(rename = "3-4")]
    Severe,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdverseEvent {
    pub event: String,
    pub rate: Percent,
    pub grade: SeverityGrade,
}

impl AdverseEvent {
    pub fn new(event: &str, rate: u8, grade: SeverityGrade) -> Self {
        Self {
            event: event.to_string(),
            rate: Percent(rate),
            grade,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetyProfile {
    pub common: Vec<AdverseEvent>,
    pub serious: Vec<AdverseEvent>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceCitation {
    pub name: String,
    pub url: String,
}

/// The complete answer to one query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub query: String,
    pub intent: QueryIntent,
    pub entities: EntitySet,
    pub analysis_type: AnalysisType,
    pub narrative: Narrative,
    pub comparison: Vec<ComparisonRow>,
    pub trials: Vec<TrialRecord>,
    pub safety: SafetyProfile,
    pub sources: Vec<SourceCitation>,
}

/// `NCT` followed by exactly eight ASCII digits.
pub fn is_nct_id(id: &str) -> bool {
    id.strip_prefix("NCT")
        .is_some_and(|digits| digits.len() == 8 && digits.bytes().all(|b| b.is_ascii_digit()))
}

fn violated(message: impl Into<String>) -> SynthesisError {
    SynthesisError::InvariantViolated {
        message: message.into(),
    }
}

fn check_percent(label: &str, p: Percent) -> Result<(), SynthesisError> {
    if p.0 > 100 {
        return Err(violated(format!("{label} {p} above 100%")));
    }
    Ok(())
}

fn check_months(label: &str, m: Months) -> Result<(), SynthesisError> {
    if m.tenth > 9 {
        return Err(violated(format!("{label} has tenth digit {}", m.tenth)));
    }
    Ok(())
}

impl Report {
    /// Check the structural guarantees every report must meet.
    pub fn validate(&self) -> Result<(), SynthesisError> {
        let drugs = self.entities.drugs();
        if drugs.is_empty() || self.entities.conditions().is_empty() {
            return Err(violated("entity set is empty"));
        }

        if self.comparison.len() != drugs.len() {
            return Err(violated(format!(
                "{} comparison rows for {} drugs",
                self.comparison.len(),
                drugs.len()
            )));
        }
        for (row, drug) in self.comparison.iter().zip(drugs) {
            if &row.drug != drug {
                return Err(violated(format!(
                    "comparison row {} out of order, expected {drug}",
                    row.drug
                )));
            }
            check_percent("ORR", row.orr)?;
            check_percent("AE rate", row.ae_rate)?;
            check_months("PFS", row.pfs)?;
            check_months("OS", row.os)?;
        }

        if self.trials.is_empty() {
            return Err(violated("no trial cards"));
        }
        for trial in &self.trials {
            if !is_nct_id(&trial.id) {
                return Err(violated(format!("malformed trial id {}", trial.id)));
            }
            if trial.enrollment == 0 {
                return Err(violated(format!("trial {} has zero enrollment", trial.id)));
            }
            check_percent("ORR", trial.orr)?;
            check_percent("AE rate", trial.ae_rate)?;
            check_months("PFS", trial.pfs)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_and_months_format() {
        assert_eq!(Percent(62).to_string(), "62%");
        let m = Months { whole: 8, tenth: 4 };
        assert_eq!(m.to_string(), "8.4 months");
        assert!((m.as_f64() - 8.4).abs() < 1e-9);
    }

    #[test]
    fn test_metric_serde() {
        let json = serde_json::to_string(&Percent(7)).unwrap();
        assert_eq!(json, "\"7%\"");
        let back: Months = serde_json::from_str("\"12.0 months\"").unwrap();
        assert_eq!(back, Months { whole: 12, tenth: 0 });
        assert!(serde_json::from_str::<Percent>("\"seven\"").is_err());
        assert!(serde_json::from_str::<Months>("\"12 months\"").is_err());
    }

    #[test]
    fn test_severity_serde() {
        assert_eq!(serde_json::to_string(&SeverityGrade::Mild).unwrap(), "\"1-2\"");
        assert_eq!(serde_json::to_string(&SeverityGrade::Severe).unwrap(), "\"3-4\"");
    }

    #[test]
    fn test_is_nct_id() {
        assert!(is_nct_id("NCT01234567"));
        assert!(!is_nct_id("NCT1234567"));
        assert!(!is_nct_id("NCT0123456A"));
        assert!(!is_nct_id("nct01234567"));
        assert!(!is_nct_id("NCT012345678"));
    }
}
