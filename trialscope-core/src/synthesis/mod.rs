//! Report synthesis.
//!
//! Combines the intent, entities, analysis branch and gathered evidence into
//! one immutable `Report`. All randomness comes from the caller's generator.

pub mod metrics;
pub mod narrative;
pub mod report;

use std::sync::Arc;

use rand::Rng;

use crate::analysis::AnalysisType;
use crate::entities::{EntitySet, FALLBACK_CONDITION, FALLBACK_DRUG};
use crate::evidence::synthetic::{self, DEFAULT_PRIMARY_ENDPOINT, DEFAULT_SECONDARY_ENDPOINTS};
use crate::evidence::{Evidence, RawLabelRecord, RawTrialRecord};
use crate::intent::QueryIntent;
use crate::lexicon::Lexicon;

pub use metrics::{MetricRanges, OutcomeMetrics};
pub use report::{
    AdverseEvent, ComparisonRow, Months, Narrative, Percent, Report, SafetyProfile,
    SeverityGrade, SourceCitation, TrialActivity, TrialRecord,
};

/// Label warnings appended to the baseline safety profile, at most.
pub const MAX_LABEL_WARNINGS: usize = 2;

const DEFAULT_TITLE: &str = "Clinical Trial";
const DEFAULT_PHASE: &str = "Phase 2";
const DEFAULT_STATUS: &str = "Recruiting";

const CITATIONS: [(&str, &str); 4] = [
    ("ClinicalTrials.gov", "https://clinicaltrials.gov"),
    ("PubMed", "https://pubmed.ncbi.nlm.nih.gov"),
    ("ChEMBL", "https://www.ebi.ac.uk/chembl"),
    ("FDA Drug Labels", "https://www.fda.gov/drugs"),
];

/// The fixed citation list attached to every report.
pub fn citations() -> Vec<SourceCitation> {
    CITATIONS
        .iter()
        .map(|(name, url)| SourceCitation {
            name: name.to_string(),
            url: url.to_string(),
        })
        .collect()
}

/// Baseline adverse events and warnings, extended by the label and the branch.
pub fn safety_profile(label: &RawLabelRecord, analysis: AnalysisType) -> SafetyProfile {
    let mut common = vec![
        AdverseEvent::new("Fatigue", 45, SeverityGrade::Mild),
        AdverseEvent::new("Nausea", 38, SeverityGrade::Mild),
        AdverseEvent::new("Rash", 32, SeverityGrade::Mild),
        AdverseEvent::new("Diarrhea", 28, SeverityGrade::Mild),
    ];
    let serious = vec![
        AdverseEvent::new("Pneumonitis", 8, SeverityGrade::Severe),
        AdverseEvent::new("Hepatotoxicity", 5, SeverityGrade::Severe),
        AdverseEvent::new("Cardiac toxicity", 3, SeverityGrade::Severe),
    ];
    let mut warnings: Vec<String> = [
        "Monitor for immune-related adverse events",
        "Regular liver function tests required",
        "Cardiac monitoring recommended",
    ]
    .iter()
    .map(|w| w.to_string())
    .collect();

    warnings.extend(label.warnings.iter().take(MAX_LABEL_WARNINGS).cloned());

    if analysis == AnalysisType::Safety {
        common.push(AdverseEvent::new("Infusion reactions", 15, SeverityGrade::Mild));
        common.push(AdverseEvent::new("Hypersensitivity", 12, SeverityGrade::Mild));
        warnings.push("Premedication recommended for infusion reactions".to_string());
    }

    SafetyProfile {
        common,
        serious,
        warnings,
    }
}

fn first_non_empty(values: &[String]) -> Option<&str> {
    values
        .first()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
}

pub struct ReportSynthesizer {
    lexicon: Arc<Lexicon>,
}

impl ReportSynthesizer {
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self { lexicon }
    }

    /// Assemble the report. Comparison metrics are drawn before card metrics.
    pub fn synthesize<R: Rng + ?Sized>(
        &self,
        query: &str,
        intent: QueryIntent,
        entities: EntitySet,
        analysis: AnalysisType,
        evidence: &Evidence,
        rng: &mut R,
    ) -> Report {
        let narrative = narrative::compose(
            analysis,
            &entities,
            evidence.trials.len(),
            evidence.publications.len(),
        );
        let comparison = self.comparison_rows(&entities, &evidence.trials, analysis, rng);
        let trials = self.trial_cards(&evidence.trials, rng);

        Report {
            query: query.to_string(),
            intent,
            entities,
            analysis_type: analysis,
            narrative,
            comparison,
            trials,
            safety: safety_profile(&evidence.label, analysis),
            sources: citations(),
        }
    }

    /// One row per drug, in entity order.
    pub fn comparison_rows<R: Rng + ?Sized>(
        &self,
        entities: &EntitySet,
        trials: &[RawTrialRecord],
        analysis: AnalysisType,
        rng: &mut R,
    ) -> Vec<ComparisonRow> {
        let ranges = MetricRanges::for_analysis(analysis);
        entities
            .drugs()
            .iter()
            .map(|drug| {
                let trial_count = trials
                    .iter()
                    .filter(|t| t.mentions_intervention(drug))
                    .count();
                let m = metrics::draw(&ranges, rng);
                let profile = self.lexicon.drug(drug);
                ComparisonRow {
                    drug: drug.clone(),
                    orr: m.orr,
                    pfs: m.pfs,
                    os: m.os,
                    ae_rate: m.ae_rate,
                    status: if trial_count > 0 {
                        TrialActivity::Active
                    } else {
                        TrialActivity::Completed
                    },
                    trial_count,
                    drug_class: profile.map(|p| p.class.clone()),
                    target: profile.map(|p| p.target.clone()),
                }
            })
            .collect()
    }

    /// Normalize raw records into cards. An empty list yields placeholder
    /// cards built from the sentinel entities.
    pub fn trial_cards<R: Rng + ?Sized>(
        &self,
        trials: &[RawTrialRecord],
        rng: &mut R,
    ) -> Vec<TrialRecord> {
        if trials.is_empty() {
            let placeholders = synthetic::synthetic_trials(
                &[FALLBACK_DRUG.to_string()],
                &[FALLBACK_CONDITION.to_string()],
                rng,
            );
            return placeholders.iter().map(|t| self.trial_card(t, rng)).collect();
        }
        trials.iter().map(|t| self.trial_card(t, rng)).collect()
    }

    fn trial_card<R: Rng + ?Sized>(&self, raw: &RawTrialRecord, rng: &mut R) -> TrialRecord {
        let id = first_non_empty(&raw.nct_id)
            .filter(|id| report::is_nct_id(id))
            .map(str::to_string)
            .unwrap_or_else(|| synthetic::nct_id(rng));
        let enrollment = first_non_empty(&raw.enrollment_count)
            .and_then(|n| n.parse::<u32>().ok())
            .filter(|n| *n > 0)
            .unwrap_or_else(|| synthetic::enrollment(rng));
        let phase = first_non_empty(&raw.phase).unwrap_or(DEFAULT_PHASE).to_string();
        let secondary_endpoints: Vec<String> = raw
            .secondary_outcome_measure
            .iter()
            .filter(|s| !s.trim().is_empty())
            .cloned()
            .collect();
        let m = metrics::draw_card(rng);

        TrialRecord {
            id,
            title: first_non_empty(&raw.brief_title)
                .unwrap_or(DEFAULT_TITLE)
                .to_string(),
            phase_description: self.lexicon.phase_description(&phase).map(str::to_string),
            phase,
            status: first_non_empty(&raw.status)
                .unwrap_or(DEFAULT_STATUS)
                .to_string(),
            enrollment,
            primary_endpoint: first_non_empty(&raw.primary_outcome_measure)
                .unwrap_or(DEFAULT_PRIMARY_ENDPOINT)
                .to_string(),
            secondary_endpoints: if secondary_endpoints.is_empty() {
                DEFAULT_SECONDARY_ENDPOINTS
                    .iter()
                    .map(|s| s.to_string())
                    .collect()
            } else {
                secondary_endpoints
            },
            orr: m.orr,
            pfs: m.pfs,
            ae_rate: m.ae_rate,
        }
    }
}
