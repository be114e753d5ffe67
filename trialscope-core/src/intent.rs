//! Intent classification of free-text clinical-research questions.
//!
//! Derives a structured `QueryIntent` from the raw query using
//! case-insensitive keyword and pattern matching only. The base profile is a
//! pure function of the text; sentiment enrichment is attached separately.

use std::sync::Arc;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::enrichment::Enrichment;
use crate::lexicon::Lexicon;

/// Upper bound on the clinical-relevance score.
pub const MAX_CLINICAL_RELEVANCE: u8 = 10;

/// Coarse size of the query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComplexityTier {
    #[default]
    Low,
    Medium,
    High,
}

impl ComplexityTier {
    /// High above 15 words, medium above 8.
    pub fn from_word_count(words: usize) -> Self {
        if words > 15 {
            ComplexityTier::High
        } else if words > 8 {
            ComplexityTier::Medium
        } else {
            ComplexityTier::Low
        }
    }
}

/// How specialised the question is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SophisticationTier {
    #[default]
    Basic,
    Intermediate,
    Expert,
}

impl SophisticationTier {
    pub fn from_scores(specificity_score: usize, molecular_complexity: usize) -> Self {
        if molecular_complexity > 0 {
            SophisticationTier::Expert
        } else if specificity_score > 2 {
            SophisticationTier::Intermediate
        } else {
            SophisticationTier::Basic
        }
    }
}

/// Size and specificity measurements of the query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Complexity {
    pub word_count: usize,
    pub specificity_score: usize,
    pub molecular_complexity: usize,
    /// A comparison keyword is present.
    pub has_multiple_drugs: bool,
    pub complexity_tier: ComplexityTier,
    pub sophistication_tier: SophisticationTier,
}

/// Structured classification of what kind of clinical question was asked.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryIntent {
    pub is_comparison: bool,
    pub is_safety_analysis: bool,
    pub is_efficacy_analysis: bool,
    pub is_phase_specific: bool,
    pub is_combination: bool,
    pub is_specific_outcome: bool,
    pub is_population_specific: bool,
    pub has_molecular_markers: bool,
    pub has_cancer_stages: bool,
    pub has_treatment_lines: bool,
    pub has_dosing_info: bool,
    pub has_population_info: bool,
    pub complexity: Complexity,
    /// Number of distinct clinical terms present, clamped to [0, 10].
    pub clinical_relevance: u8,
    /// Full names of outcome abbreviations named in the query.
    #[serde(default)]
    pub mentioned_outcomes: Vec<String>,
    #[serde(default)]
    pub enrichment: Enrichment,
}

impl QueryIntent {
    pub fn is_clinical_trial_query(&self) -> bool {
        self.clinical_relevance > 3
    }

    pub fn has_clinical_terminology(&self) -> bool {
        self.clinical_relevance > 0
    }

    pub fn with_enrichment(mut self, enrichment: Enrichment) -> Self {
        self.enrichment = enrichment;
        self
    }
}

const COMPARISON: &str = r"(?i)\b(?:compare[sd]?|comparing|vs|versus)\b";
const SAFETY: &str = r"(?i)\b(?:safety|adverse|toxicit(?:y|ies))\b";
const EFFICACY: &str = r"(?i)\b(?:efficacy|responses?|survival)\b";
const PHASE: &str = r"(?i)\bphase[\s-]?(?:1|2|3|i{1,3})[ab]?\b";
const COMBINATION: &str = r"(?i)\b(?:combination|combined|plus)\b";
const OUTCOME: &str = r"(?i)\b(?:orr|pfs|os|dorr?)\b";
const POPULATION_SPECIFIC: &str = r"(?i)(?:\bher2\+|\b(?:egfr|metastatic)\b)";
const MOLECULAR_MARKERS: &str = r"(?i)(?:\bher2\+|\b(?:egfr|alk|ros1|braf|kras|pik3ca|met|ret)\b)";
const CANCER_STAGES: &str = r"(?i)\b(?:stage\s+(?:iv|iii|ii|i)[a-c]?|metastatic|advanced|localized)\b";
const TREATMENT_LINES: &str = r"(?i)\b(?:first-line|second-line|third-line|refractory|relapsed)\b";
const DOSING: &str = r"(?i)(?:\d\s*mg\b|\b(?:mg|doses?|dosing|schedules?|cycles?)\b)";
const POPULATION_INFO: &str = r"(?i)\b(?:elderly|pediatric|adults?|geriatric)\b";
const SPECIFICITY: &str = r"(?i)\b(?:phase|safety|efficacy|orr|pfs|os|her2|egfr)\b";
const MOLECULAR_COMPLEXITY: &str = r"(?i)(?:\bher2\+|\b(?:egfr|alk|braf|kras)\b)";

fn pattern(re: &str) -> Regex {
    Regex::new(re).expect("built-in intent pattern is valid")
}

/// Compiled intent patterns plus the shared lexicon.
pub struct IntentClassifier {
    lexicon: Arc<Lexicon>,
    comparison: Regex,
    safety: Regex,
    efficacy: Regex,
    phase: Regex,
    combination: Regex,
    outcome: Regex,
    population_specific: Regex,
    molecular_markers: Regex,
    cancer_stages: Regex,
    treatment_lines: Regex,
    dosing: Regex,
    population_info: Regex,
    specificity: Regex,
    molecular_complexity: Regex,
    outcome_terms: Vec<(Regex, String)>,
}

impl IntentClassifier {
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        let outcome_terms = lexicon
            .outcomes()
            .iter()
            .filter_map(|o| {
                Regex::new(&format!(r"(?i)\b{}\b", regex::escape(&o.abbreviation)))
                    .ok()
                    .map(|re| (re, o.name.clone()))
            })
            .collect();

        Self {
            lexicon,
            comparison: pattern(COMPARISON),
            safety: pattern(SAFETY),
            efficacy: pattern(EFFICACY),
            phase: pattern(PHASE),
            combination: pattern(COMBINATION),
            outcome: pattern(OUTCOME),
            population_specific: pattern(POPULATION_SPECIFIC),
            molecular_markers: pattern(MOLECULAR_MARKERS),
            cancer_stages: pattern(CANCER_STAGES),
            treatment_lines: pattern(TREATMENT_LINES),
            dosing: pattern(DOSING),
            population_info: pattern(POPULATION_INFO),
            specificity: pattern(SPECIFICITY),
            molecular_complexity: pattern(MOLECULAR_COMPLEXITY),
            outcome_terms,
        }
    }

    /// Build the base intent profile. Enrichment is left `Unavailable`.
    pub fn classify(&self, text: &str) -> QueryIntent {
        let is_comparison = self.comparison.is_match(text);

        QueryIntent {
            is_comparison,
            is_safety_analysis: self.safety.is_match(text),
            is_efficacy_analysis: self.efficacy.is_match(text),
            is_phase_specific: self.phase.is_match(text),
            is_combination: self.combination.is_match(text),
            is_specific_outcome: self.outcome.is_match(text),
            is_population_specific: self.population_specific.is_match(text),
            has_molecular_markers: self.molecular_markers.is_match(text),
            has_cancer_stages: self.cancer_stages.is_match(text),
            has_treatment_lines: self.treatment_lines.is_match(text),
            has_dosing_info: self.dosing.is_match(text),
            has_population_info: self.population_info.is_match(text),
            complexity: self.complexity(text, is_comparison),
            clinical_relevance: self.clinical_relevance(text),
            mentioned_outcomes: self.mentioned_outcomes(text),
            enrichment: Enrichment::Unavailable,
        }
    }

    fn complexity(&self, text: &str, has_multiple_drugs: bool) -> Complexity {
        let word_count = text.split_whitespace().count();
        let specificity_score = self.specificity.find_iter(text).count();
        let molecular_complexity = self.molecular_complexity.find_iter(text).count();

        Complexity {
            word_count,
            specificity_score,
            molecular_complexity,
            has_multiple_drugs,
            complexity_tier: ComplexityTier::from_word_count(word_count),
            sophistication_tier: SophisticationTier::from_scores(
                specificity_score,
                molecular_complexity,
            ),
        }
    }

    /// One point per clinical term present, clamped to `MAX_CLINICAL_RELEVANCE`.
    pub fn clinical_relevance(&self, text: &str) -> u8 {
        let lower = text.to_lowercase();
        let hits = self
            .lexicon
            .clinical_terms()
            .iter()
            .filter(|term| lower.contains(term.as_str()))
            .count();
        hits.min(MAX_CLINICAL_RELEVANCE as usize) as u8
    }

    fn mentioned_outcomes(&self, text: &str) -> Vec<String> {
        self.outcome_terms
            .iter()
            .filter(|(re, _)| re.is_match(text))
            .map(|(_, name)| name.clone())
            .collect()
    }
}
