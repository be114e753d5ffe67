//! Property-based tests for the query pipeline using proptest.

use std::sync::Arc;

use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

use trialscope_core::analysis::{AnalysisType, select_analysis_type};
use trialscope_core::entities::EntityExtractor;
use trialscope_core::intent::{IntentClassifier, QueryIntent, SophisticationTier};
use trialscope_core::{Lexicon, TrialScopeEngine};

fn lexicon() -> Arc<Lexicon> {
    Arc::new(Lexicon::builtin())
}

/// Queries assembled from clinical vocabulary and filler words.
fn clinical_query() -> impl Strategy<Value = String> {
    let words = prop::sample::select(vec![
        "pembrolizumab", "nivolumab", "Tucatinib", "CAR-T", "vs", "versus", "safety",
        "efficacy", "phase", "3", "plus", "ORR", "PFS", "OS", "HER2+", "EGFR", "metastatic",
        "stage", "IV", "relapsed", "nsclc", "melanoma", "randomized", "placebo", "survival",
        "in", "with", "the", "patients", "elderly", "200mg", "Week", "12",
    ]);
    prop::collection::vec(words, 1..20).prop_map(|w| w.join(" "))
}

// --- Entity extraction ---

proptest! {
    #[test]
    fn extraction_is_never_empty(text in "\\PC{1,80}") {
        let lex = lexicon();
        let intent = IntentClassifier::new(Arc::clone(&lex)).classify(&text);
        let extractor = EntityExtractor::new(lex);
        prop_assert!(!extractor.extract_drugs(&text, &intent).is_empty());
        prop_assert!(!extractor.extract_conditions(&text, &intent).is_empty());
    }

    #[test]
    fn extraction_has_no_duplicates(text in clinical_query()) {
        let lex = lexicon();
        let intent = IntentClassifier::new(Arc::clone(&lex)).classify(&text);
        let entities = EntityExtractor::new(lex).extract(&text, &intent);
        for list in [entities.drugs(), entities.conditions()] {
            for (i, item) in list.iter().enumerate() {
                prop_assert!(!list[i + 1..].contains(item), "duplicate {item} in {list:?}");
            }
        }
    }
}

// --- Intent classification ---

proptest! {
    #[test]
    fn clinical_relevance_is_clamped(text in clinical_query(), repeats in 1usize..5) {
        let text = text.repeat(repeats);
        let intent = IntentClassifier::new(lexicon()).classify(&text);
        prop_assert!(intent.clinical_relevance <= 10);
    }

    #[test]
    fn classification_is_deterministic(text in "\\PC{0,120}") {
        let classifier = IntentClassifier::new(lexicon());
        prop_assert_eq!(classifier.classify(&text), classifier.classify(&text));
    }

    #[test]
    fn word_count_matches_whitespace_tokens(words in prop::collection::vec("[a-z]{1,8}", 0..30)) {
        let text = words.join("  ");
        let intent = IntentClassifier::new(lexicon()).classify(&text);
        prop_assert_eq!(intent.complexity.word_count, words.len());
    }
}

// --- Analysis-type selection ---

fn intent_from_flags(flags: [bool; 8], expert: bool) -> QueryIntent {
    let mut intent = QueryIntent {
        is_safety_analysis: flags[0],
        is_efficacy_analysis: flags[1],
        is_comparison: flags[2],
        is_phase_specific: flags[3],
        is_combination: flags[4],
        is_specific_outcome: flags[5],
        has_molecular_markers: flags[6],
        has_dosing_info: flags[7],
        ..Default::default()
    };
    if expert {
        intent.complexity.sophistication_tier = SophisticationTier::Expert;
    }
    intent
}

proptest! {
    #[test]
    fn safety_dominates_lower_flags(flags in any::<[bool; 8]>(), expert in any::<bool>()) {
        let mut intent = intent_from_flags(flags, expert);
        intent.is_safety_analysis = true;
        prop_assert_eq!(select_analysis_type(&intent), AnalysisType::Safety);
    }

    #[test]
    fn selection_follows_first_set_flag(flags in any::<[bool; 8]>(), expert in any::<bool>()) {
        let intent = intent_from_flags(flags, expert);
        let chain = [
            AnalysisType::Safety,
            AnalysisType::Efficacy,
            AnalysisType::Comparison,
            AnalysisType::PhaseSpecific,
            AnalysisType::Combination,
            AnalysisType::OutcomeSpecific,
            AnalysisType::MolecularSpecific,
        ];
        let expected = flags[..7]
            .iter()
            .position(|f| *f)
            .map(|i| chain[i])
            .unwrap_or(if expert {
                AnalysisType::ExpertAnalysis
            } else {
                AnalysisType::Comprehensive
            });
        prop_assert_eq!(select_analysis_type(&intent), expected);
    }
}

// --- Whole pipeline under total source failure ---

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn offline_reports_are_complete(text in clinical_query(), seed in any::<u64>()) {
        let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
        let engine = TrialScopeEngine::offline();
        let report = rt
            .block_on(engine.analyze(&text, &mut StdRng::seed_from_u64(seed)))
            .unwrap();

        prop_assert_eq!(report.trials.len(), 6);
        prop_assert_eq!(report.comparison.len(), report.entities.drugs().len());
        prop_assert!(report.validate().is_ok());
    }

    #[test]
    fn non_numeric_output_ignores_the_seed(text in clinical_query(), a in any::<u64>(), b in any::<u64>()) {
        let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
        let engine = TrialScopeEngine::offline();
        let first = rt.block_on(engine.analyze(&text, &mut StdRng::seed_from_u64(a))).unwrap();
        let second = rt.block_on(engine.analyze(&text, &mut StdRng::seed_from_u64(b))).unwrap();

        prop_assert_eq!(first.entities, second.entities);
        prop_assert_eq!(first.analysis_type, second.analysis_type);
        prop_assert_eq!(first.narrative, second.narrative);
    }
}
