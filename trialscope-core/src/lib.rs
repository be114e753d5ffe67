//! # TrialScope Core
//!
//! Query understanding and evidence synthesis for clinical-research
//! questions. Classifies a free-text query, extracts the drugs and conditions
//! it names, gathers records from ClinicalTrials.gov, PubMed and openFDA, and
//! assembles a structured `Report`.

pub mod analysis;
pub mod config;
pub mod enrichment;
pub mod entities;
pub mod error;
pub mod evidence;
pub mod intent;
pub mod lexicon;
pub mod pipeline;
pub mod synthesis;

// Re-export commonly used types at the crate root.
pub use analysis::{AnalysisType, select_analysis_type};
pub use config::{TrialScopeConfig, config_exists, load_config};
pub use enrichment::{Enrichment, SentimentScorer};
pub use entities::{EntityExtractor, EntitySet};
pub use error::{Result, TrialScopeError};
pub use evidence::{Evidence, EvidenceGateway, LabelLookup, LiteratureIndex, TrialRegistry};
pub use intent::{IntentClassifier, QueryIntent};
pub use lexicon::Lexicon;
pub use pipeline::TrialScopeEngine;
pub use synthesis::{Report, ReportSynthesizer};
