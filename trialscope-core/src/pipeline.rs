//! End-to-end query pipeline.
//!
//! Validate the query, classify it, extract entities, pick the analysis
//! branch, gather evidence (with enrichment alongside), then synthesize and
//! check the report. Nothing is shared between calls except read-only state.

use std::sync::Arc;

use rand::Rng;
use tracing::{debug, info};

use crate::analysis::select_analysis_type;
use crate::config::TrialScopeConfig;
use crate::enrichment::{self, Enrichment, HttpSentimentScorer, SentimentScorer};
use crate::entities::EntityExtractor;
use crate::error::{InputError, Result};
use crate::evidence::{EvidenceGateway, HttpSource};
use crate::intent::IntentClassifier;
use crate::lexicon::Lexicon;
use crate::synthesis::{Report, ReportSynthesizer};

pub struct TrialScopeEngine {
    lexicon: Arc<Lexicon>,
    classifier: IntentClassifier,
    extractor: EntityExtractor,
    gateway: EvidenceGateway,
    synthesizer: ReportSynthesizer,
    scorer: Option<Arc<dyn SentimentScorer>>,
}

impl TrialScopeEngine {
    /// Engine over `gateway` with enrichment disabled.
    pub fn new(lexicon: Arc<Lexicon>, gateway: EvidenceGateway) -> Self {
        Self {
            classifier: IntentClassifier::new(Arc::clone(&lexicon)),
            extractor: EntityExtractor::new(Arc::clone(&lexicon)),
            synthesizer: ReportSynthesizer::new(Arc::clone(&lexicon)),
            lexicon,
            gateway,
            scorer: None,
        }
    }

    /// Engine over the public HTTP sources described by `config`.
    pub fn from_config(config: &TrialScopeConfig) -> Result<Self> {
        let http = HttpSource::new(&config.sources)?;
        let gateway = EvidenceGateway::over_http(http.clone(), &config.sources);
        let engine = Self::new(Arc::new(Lexicon::builtin()), gateway);
        if config.enrichment.enabled {
            let scorer = HttpSentimentScorer::new(http, &config.enrichment);
            Ok(engine.with_scorer(Arc::new(scorer)))
        } else {
            Ok(engine)
        }
    }

    /// Engine that never touches the network; all evidence is fallback data.
    pub fn offline() -> Self {
        Self::new(Arc::new(Lexicon::builtin()), EvidenceGateway::offline())
    }

    pub fn with_scorer(mut self, scorer: Arc<dyn SentimentScorer>) -> Self {
        self.scorer = Some(scorer);
        self
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// Run the whole pipeline for one query.
    ///
    /// Empty or whitespace-only queries are rejected before any work starts.
    /// Source failures are absorbed; the only other error is a report that
    /// fails its own structural checks.
    pub async fn analyze<R: Rng + ?Sized>(&self, query: &str, rng: &mut R) -> Result<Report> {
        let query = query.trim();
        if query.is_empty() {
            return Err(InputError::EmptyQuery.into());
        }

        info!(words = query.split_whitespace().count(), "Analyzing query");
        debug!(query, "Query text");

        let intent = self.classifier.classify(query);
        let analysis = select_analysis_type(&intent);
        let entities = self.extractor.extract(query, &intent);
        debug!(
            analysis_type = %analysis,
            relevance = intent.clinical_relevance,
            drugs = ?entities.drugs(),
            conditions = ?entities.conditions(),
            "Query classified"
        );

        let enrich = async {
            match &self.scorer {
                Some(scorer) => enrichment::enrich(scorer.as_ref(), query).await,
                None => Enrichment::Unavailable,
            }
        };
        let (enriched, evidence) = tokio::join!(enrich, self.gateway.gather(&entities, rng));
        let intent = intent.with_enrichment(enriched);

        let report = self
            .synthesizer
            .synthesize(query, intent, entities, analysis, &evidence, rng);
        report.validate()?;

        info!(
            analysis_type = %report.analysis_type,
            drugs = report.comparison.len(),
            trials = report.trials.len(),
            publications = evidence.publications.len(),
            fallbacks = evidence.provenance.fallback_count(),
            "Report ready"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TrialScopeError;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[tokio::test]
    async fn test_whitespace_query_is_rejected() {
        let engine = TrialScopeEngine::offline();
        let err = engine
            .analyze("   \t\n", &mut StdRng::seed_from_u64(0))
            .await
            .unwrap_err();
        assert!(matches!(err, TrialScopeError::Input(InputError::EmptyQuery)));
        assert_eq!(err.user_message(), "Please enter a clinical trial query");
    }

    #[tokio::test]
    async fn test_offline_report_is_valid() {
        let engine = TrialScopeEngine::offline();
        let report = engine
            .analyze("  olaparib in ovarian cancer  ", &mut StdRng::seed_from_u64(1))
            .await
            .unwrap();
        assert_eq!(report.query, "olaparib in ovarian cancer");
        assert_eq!(report.entities.drugs(), ["olaparib"]);
        assert_eq!(report.trials.len(), 6);
        assert_eq!(report.intent.enrichment, Enrichment::Unavailable);
        assert!(report.validate().is_ok());
    }

    #[test]
    fn test_from_config_without_enrichment() {
        let mut config = TrialScopeConfig::default();
        config.enrichment.enabled = false;
        let engine = TrialScopeEngine::from_config(&config).unwrap();
        assert!(engine.scorer.is_none());
        assert!(engine.lexicon().drug("olaparib").is_some());
    }
}
