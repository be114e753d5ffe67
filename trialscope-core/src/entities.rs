//! Drug and condition extraction.
//!
//! Each extraction rule proposes candidates independently; a single
//! combinator unions them in rule order and drops exact duplicates. Empty
//! results fall back to sentinel entities so downstream stages always have
//! something to name.

use std::sync::Arc;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::intent::QueryIntent;
use crate::lexicon::Lexicon;

/// Drug entity used when no drug is recognized.
pub const FALLBACK_DRUG: &str = "Standard of Care";
/// Condition entity used when no condition is recognized.
pub const FALLBACK_CONDITION: &str = "Cancer";

/// Ordered-unique drug and condition names. Neither list is ever empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySet {
    drugs: Vec<String>,
    conditions: Vec<String>,
}

impl EntitySet {
    /// Build a set, substituting the sentinel for an empty list.
    pub fn new(drugs: Vec<String>, conditions: Vec<String>) -> Self {
        Self {
            drugs: or_fallback(drugs, FALLBACK_DRUG),
            conditions: or_fallback(conditions, FALLBACK_CONDITION),
        }
    }

    /// The set used when nothing at all was recognized.
    pub fn fallback() -> Self {
        Self::new(Vec::new(), Vec::new())
    }

    pub fn drugs(&self) -> &[String] {
        &self.drugs
    }

    pub fn conditions(&self) -> &[String] {
        &self.conditions
    }

    /// First drug, used for label lookups and narrative subjects.
    pub fn primary_drug(&self) -> &str {
        self.drugs.first().map(String::as_str).unwrap_or(FALLBACK_DRUG)
    }

    /// Drugs then conditions, space-joined, as sent to the search sources.
    pub fn search_terms(&self) -> String {
        self.drugs
            .iter()
            .chain(self.conditions.iter())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn or_fallback(items: Vec<String>, sentinel: &str) -> Vec<String> {
    if items.is_empty() {
        vec![sentinel.to_string()]
    } else {
        items
    }
}

/// One independent way of spotting entities in a query.
pub trait ExtractionRule: Send + Sync {
    fn name(&self) -> &'static str;

    /// Candidates in the order they should appear in the result.
    fn candidates(&self, text: &str, intent: &QueryIntent) -> Vec<String>;
}

/// Union the candidates of `rules` in order, keeping the first occurrence of
/// each literal string.
pub fn union_candidates(
    rules: &[Box<dyn ExtractionRule>],
    text: &str,
    intent: &QueryIntent,
) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for rule in rules {
        for candidate in rule.candidates(text, intent) {
            if !out.contains(&candidate) {
                out.push(candidate);
            }
        }
    }
    out
}

/// Lexicon terms contained in `text`, ordered by first occurrence.
fn contained_terms<'a>(text: &str, terms: impl Iterator<Item = &'a str>) -> Vec<String> {
    let lower = text.to_lowercase();
    let mut hits: Vec<(usize, &str)> = terms
        .filter_map(|term| lower.find(term).map(|pos| (pos, term)))
        .collect();
    hits.sort_by_key(|(pos, _)| *pos);
    hits.into_iter().map(|(_, term)| term.to_string()).collect()
}

/// Case-insensitive containment of known drug names.
pub struct LexiconDrugRule {
    lexicon: Arc<Lexicon>,
}

impl ExtractionRule for LexiconDrugRule {
    fn name(&self) -> &'static str {
        "lexicon-drug"
    }

    fn candidates(&self, text: &str, _intent: &QueryIntent) -> Vec<String> {
        contained_terms(text, self.lexicon.drugs().iter().map(|d| d.name.as_str()))
    }
}

/// Case-insensitive containment of known cancer types.
pub struct CancerTypeRule {
    lexicon: Arc<Lexicon>,
}

impl ExtractionRule for CancerTypeRule {
    fn name(&self) -> &'static str {
        "cancer-type"
    }

    fn candidates(&self, text: &str, _intent: &QueryIntent) -> Vec<String> {
        contained_terms(text, self.lexicon.cancer_types().iter().map(String::as_str))
    }
}

/// Every match of a regular expression, in order.
pub struct PatternRule {
    name: &'static str,
    pattern: Regex,
    lowercase: bool,
}

impl PatternRule {
    fn new(name: &'static str, pattern: &str, lowercase: bool) -> Self {
        Self {
            name,
            pattern: Regex::new(pattern).expect("built-in extraction pattern is valid"),
            lowercase,
        }
    }
}

impl ExtractionRule for PatternRule {
    fn name(&self) -> &'static str {
        self.name
    }

    fn candidates(&self, text: &str, _intent: &QueryIntent) -> Vec<String> {
        let haystack = if self.lowercase {
            text.to_lowercase()
        } else {
            text.to_string()
        };
        self.pattern
            .find_iter(&haystack)
            .map(|m| m.as_str().to_string())
            .collect()
    }
}

/// Capitalized "Name 12" / "Name-12" codes, minus common clinical nouns.
pub struct CodeNameRule {
    lexicon: Arc<Lexicon>,
    pattern: Regex,
}

impl ExtractionRule for CodeNameRule {
    fn name(&self) -> &'static str {
        "code-name"
    }

    fn candidates(&self, text: &str, _intent: &QueryIntent) -> Vec<String> {
        self.pattern
            .captures_iter(text)
            .filter(|caps| !self.lexicon.is_non_drug_word(&caps[1]))
            .map(|caps| caps[0].to_string())
            .collect()
    }
}

/// "X vs Y" taken as two drugs. Only consulted for comparison queries.
pub struct ComparisonRule {
    pattern: Regex,
}

impl ExtractionRule for ComparisonRule {
    fn name(&self) -> &'static str {
        "comparison"
    }

    fn candidates(&self, text: &str, intent: &QueryIntent) -> Vec<String> {
        if !intent.is_comparison {
            return Vec::new();
        }
        self.pattern
            .captures(text)
            .map(|caps| vec![caps[1].to_string(), caps[2].to_string()])
            .unwrap_or_default()
    }
}

/// Runs the drug and condition rules over a query.
pub struct EntityExtractor {
    drug_rules: Vec<Box<dyn ExtractionRule>>,
    comparison_rule: ComparisonRule,
    condition_rules: Vec<Box<dyn ExtractionRule>>,
}

impl EntityExtractor {
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        let drug_rules: Vec<Box<dyn ExtractionRule>> = vec![
            Box::new(LexiconDrugRule {
                lexicon: Arc::clone(&lexicon),
            }),
            Box::new(PatternRule::new(
                "drug-suffix",
                r"\b[A-Z][a-z]+(?:mab|nib|tinib|zumab|ximab|ib|ab)\b",
                false,
            )),
            Box::new(PatternRule::new(
                "cell-therapy",
                r"\b(?:CAR[- ]T|[A-Z][a-z]+-T)\b",
                false,
            )),
            Box::new(CodeNameRule {
                lexicon: Arc::clone(&lexicon),
                pattern: Regex::new(r"\b([A-Z][a-z]+)(?:-| )\d+\b")
                    .expect("built-in extraction pattern is valid"),
            }),
        ];

        let condition_rules: Vec<Box<dyn ExtractionRule>> = vec![
            Box::new(CancerTypeRule { lexicon }),
            Box::new(PatternRule::new(
                "molecular-subtype",
                r"(?:\bher2\+|\b(?:egfr|alk|ros1|braf|kras|pik3ca|met|ret|ntrk)\b)",
                true,
            )),
            Box::new(PatternRule::new(
                "stage",
                r"\b(?:stage\s+(?:iv|iii|ii|i)[a-c]?|metastatic|advanced|localized|early|late)\b",
                true,
            )),
            Box::new(PatternRule::new(
                "treatment-line",
                r"\b(?:first-line|second-line|third-line|refractory|relapsed|resistant)\b",
                true,
            )),
        ];

        Self {
            drug_rules,
            comparison_rule: ComparisonRule {
                pattern: Regex::new(r"(?i)(\w+)\s+(?:vs|versus|compare)\s+(\w+)")
                    .expect("built-in extraction pattern is valid"),
            },
            condition_rules,
        }
    }

    /// Drug names in the query, or `["Standard of Care"]`.
    pub fn extract_drugs(&self, text: &str, intent: &QueryIntent) -> Vec<String> {
        let mut drugs = union_candidates(&self.drug_rules, text, intent);
        if drugs.is_empty() {
            drugs = self.comparison_rule.candidates(text, intent);
            drugs.dedup();
        }
        or_fallback(drugs, FALLBACK_DRUG)
    }

    /// Condition terms in the query, or `["Cancer"]`.
    pub fn extract_conditions(&self, text: &str, intent: &QueryIntent) -> Vec<String> {
        or_fallback(
            union_candidates(&self.condition_rules, text, intent),
            FALLBACK_CONDITION,
        )
    }

    pub fn extract(&self, text: &str, intent: &QueryIntent) -> EntitySet {
        EntitySet::new(
            self.extract_drugs(text, intent),
            self.extract_conditions(text, intent),
        )
    }
}
