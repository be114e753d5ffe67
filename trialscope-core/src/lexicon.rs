//! Static clinical reference data.
//!
//! The lexicon is built once per process and shared read-only (behind an
//! `Arc`) by the classifier, the extractor, and the synthesizer. It holds no
//! behavior beyond lookups.

use serde::{Deserialize, Serialize};

/// Known drug with its pharmacological profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrugProfile {
    /// Lower-case generic name, as matched against queries.
    pub name: String,
    /// Drug class (e.g. "checkpoint inhibitor").
    pub class: String,
    /// Molecular target (e.g. "PD-1").
    pub target: String,
    /// Approved or studied indications.
    pub indications: Vec<String>,
}

/// Outcome-metric abbreviation and its expansion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeMetric {
    pub abbreviation: String,
    pub name: String,
}

/// Trial phase and what it is designed to establish.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseDescription {
    pub phase: String,
    pub description: String,
}

/// Immutable clinical reference tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lexicon {
    drugs: Vec<DrugProfile>,
    cancer_types: Vec<String>,
    clinical_terms: Vec<String>,
    outcomes: Vec<OutcomeMetric>,
    phases: Vec<PhaseDescription>,
    non_drug_words: Vec<String>,
}

fn drug(name: &str, class: &str, target: &str, indications: &[&str]) -> DrugProfile {
    DrugProfile {
        name: name.to_string(),
        class: class.to_string(),
        target: target.to_string(),
        indications: indications.iter().map(|s| s.to_string()).collect(),
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Lexicon {
    /// The built-in oncology lexicon.
    pub fn builtin() -> Self {
        let drugs = vec![
            drug(
                "trastuzumab",
                "monoclonal antibody",
                "HER2",
                &["breast cancer", "gastric cancer"],
            ),
            drug(
                "pembrolizumab",
                "checkpoint inhibitor",
                "PD-1",
                &["melanoma", "lung cancer", "bladder cancer"],
            ),
            drug(
                "nivolumab",
                "checkpoint inhibitor",
                "PD-1",
                &["melanoma", "lung cancer", "renal cell carcinoma"],
            ),
            drug(
                "atezolizumab",
                "checkpoint inhibitor",
                "PD-L1",
                &["lung cancer", "bladder cancer"],
            ),
            drug(
                "durvalumab",
                "checkpoint inhibitor",
                "PD-L1",
                &["lung cancer", "bladder cancer"],
            ),
            drug(
                "ipilimumab",
                "checkpoint inhibitor",
                "CTLA-4",
                &["melanoma"],
            ),
            drug(
                "bevacizumab",
                "monoclonal antibody",
                "VEGF-A",
                &["colorectal cancer", "lung cancer", "ovarian cancer"],
            ),
            drug(
                "cetuximab",
                "monoclonal antibody",
                "EGFR",
                &["colorectal cancer", "head and neck cancer"],
            ),
            drug(
                "rituximab",
                "monoclonal antibody",
                "CD20",
                &["lymphoma", "leukemia"],
            ),
            drug(
                "daratumumab",
                "monoclonal antibody",
                "CD38",
                &["multiple myeloma"],
            ),
            drug(
                "osimertinib",
                "tyrosine kinase inhibitor",
                "EGFR",
                &["NSCLC"],
            ),
            drug(
                "erlotinib",
                "tyrosine kinase inhibitor",
                "EGFR",
                &["NSCLC", "pancreatic cancer"],
            ),
            drug(
                "gefitinib",
                "tyrosine kinase inhibitor",
                "EGFR",
                &["NSCLC"],
            ),
            drug(
                "alectinib",
                "tyrosine kinase inhibitor",
                "ALK",
                &["NSCLC"],
            ),
            drug(
                "lorlatinib",
                "tyrosine kinase inhibitor",
                "ALK",
                &["NSCLC"],
            ),
            drug(
                "dabrafenib",
                "kinase inhibitor",
                "BRAF V600",
                &["melanoma", "NSCLC"],
            ),
            drug(
                "sotorasib",
                "small-molecule inhibitor",
                "KRAS G12C",
                &["NSCLC"],
            ),
            drug(
                "olaparib",
                "PARP inhibitor",
                "PARP1/2",
                &["ovarian cancer", "breast cancer", "prostate cancer"],
            ),
            drug(
                "palbociclib",
                "CDK4/6 inhibitor",
                "CDK4/6",
                &["breast cancer"],
            ),
            drug(
                "car-t",
                "cell therapy",
                "CD19",
                &["lymphoma", "leukemia"],
            ),
        ];

        let cancer_types = strings(&[
            "nsclc",
            "melanoma",
            "breast cancer",
            "hematologic malignancies",
            "leukemia",
            "lymphoma",
            "multiple myeloma",
            "colorectal cancer",
            "ovarian cancer",
            "prostate cancer",
            "pancreatic cancer",
            "gastric cancer",
            "bladder cancer",
            "lung cancer",
            "head and neck cancer",
            "cervical cancer",
            "endometrial cancer",
        ]);

        let clinical_terms = strings(&[
            "clinical trial",
            "randomized",
            "double-blind",
            "placebo",
            "control",
            "endpoint",
            "primary",
            "secondary",
            "adverse event",
            "toxicity",
            "response rate",
            "survival",
            "progression",
            "remission",
        ]);

        let outcomes = [
            ("orr", "Overall Response Rate"),
            ("pfs", "Progression-Free Survival"),
            ("os", "Overall Survival"),
            ("dor", "Duration of Response"),
            ("dorr", "Duration of Response"),
        ]
        .iter()
        .map(|(abbreviation, name)| OutcomeMetric {
            abbreviation: abbreviation.to_string(),
            name: name.to_string(),
        })
        .collect();

        let phases = [
            ("phase 1", "Safety and dosing"),
            ("phase 2", "Efficacy and safety"),
            ("phase 3", "Confirmatory efficacy"),
            ("phase 4", "Post-marketing surveillance"),
        ]
        .iter()
        .map(|(phase, description)| PhaseDescription {
            phase: phase.to_string(),
            description: description.to_string(),
        })
        .collect();

        let non_drug_words = strings(&[
            "Phase", "Stage", "Grade", "Cycle", "Line", "Day", "Week", "Month", "Year",
        ]);

        Self {
            drugs,
            cancer_types,
            clinical_terms,
            outcomes,
            phases,
            non_drug_words,
        }
    }

    /// Build a lexicon from explicit tables. `non_drug_words` is the
    /// stop-list for the "Name 12" code-name rule.
    pub fn new(
        drugs: Vec<DrugProfile>,
        cancer_types: Vec<String>,
        clinical_terms: Vec<String>,
        outcomes: Vec<OutcomeMetric>,
        phases: Vec<PhaseDescription>,
        non_drug_words: Vec<String>,
    ) -> Self {
        Self {
            drugs,
            cancer_types,
            clinical_terms,
            outcomes,
            phases,
            non_drug_words,
        }
    }

    pub fn drugs(&self) -> &[DrugProfile] {
        &self.drugs
    }

    /// Look up a drug profile by name, ignoring case.
    pub fn drug(&self, name: &str) -> Option<&DrugProfile> {
        self.drugs
            .iter()
            .find(|d| d.name.eq_ignore_ascii_case(name))
    }

    pub fn cancer_types(&self) -> &[String] {
        &self.cancer_types
    }

    pub fn clinical_terms(&self) -> &[String] {
        &self.clinical_terms
    }

    pub fn outcomes(&self) -> &[OutcomeMetric] {
        &self.outcomes
    }

    /// Describe a trial phase label such as "Phase 2" or "PHASE2".
    pub fn phase_description(&self, phase: &str) -> Option<&str> {
        let wanted = compact_lower(phase);
        self.phases
            .iter()
            .find(|p| compact_lower(&p.phase) == wanted)
            .map(|p| p.description.as_str())
    }

    /// Capitalized clinical nouns that look like "Name 12" drug codes but are not.
    pub fn is_non_drug_word(&self, word: &str) -> bool {
        self.non_drug_words.iter().any(|w| w == word)
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::builtin()
    }
}

fn compact_lower(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}
