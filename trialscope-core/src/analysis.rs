//! Selection of the single analysis branch for a query.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::intent::{QueryIntent, SophisticationTier};

/// The narrative and metric branch a report is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnalysisType {
    Safety,
    Efficacy,
    Comparison,
    PhaseSpecific,
    Combination,
    OutcomeSpecific,
    MolecularSpecific,
    ExpertAnalysis,
    Comprehensive,
}

impl AnalysisType {
    pub const ALL: [AnalysisType; 9] = [
        AnalysisType::Safety,
        AnalysisType::Efficacy,
        AnalysisType::Comparison,
        AnalysisType::PhaseSpecific,
        AnalysisType::Combination,
        AnalysisType::OutcomeSpecific,
        AnalysisType::MolecularSpecific,
        AnalysisType::ExpertAnalysis,
        AnalysisType::Comprehensive,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisType::Safety => "safety",
            AnalysisType::Efficacy => "efficacy",
            AnalysisType::Comparison => "comparison",
            AnalysisType::PhaseSpecific => "phase-specific",
            AnalysisType::Combination => "combination",
            AnalysisType::OutcomeSpecific => "outcome-specific",
            AnalysisType::MolecularSpecific => "molecular-specific",
            AnalysisType::ExpertAnalysis => "expert-analysis",
            AnalysisType::Comprehensive => "comprehensive",
        }
    }
}

impl fmt::Display for AnalysisType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// First matching flag wins; `Comprehensive` when none is set.
pub fn select_analysis_type(intent: &QueryIntent) -> AnalysisType {
    if intent.is_safety_analysis {
        AnalysisType::Safety
    } else if intent.is_efficacy_analysis {
        AnalysisType::Efficacy
    } else if intent.is_comparison {
        AnalysisType::Comparison
    } else if intent.is_phase_specific {
        AnalysisType::PhaseSpecific
    } else if intent.is_combination {
        AnalysisType::Combination
    } else if intent.is_specific_outcome {
        AnalysisType::OutcomeSpecific
    } else if intent.has_molecular_markers {
        AnalysisType::MolecularSpecific
    } else if intent.complexity.sophistication_tier == SophisticationTier::Expert {
        AnalysisType::ExpertAnalysis
    } else {
        AnalysisType::Comprehensive
    }
}
