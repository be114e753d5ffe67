//! Evidence gateway: concurrent fetches from the three public sources.
//!
//! Each source sits behind its own trait so tests and offline runs can swap
//! it out. The gateway fires all three requests together, waits for every
//! one to settle, then replaces each failure with that source's fallback.
//! Failures never leave this module.

pub mod clinical_trials;
pub mod http;
pub mod openfda;
pub mod pubmed;
pub mod synthetic;

use std::sync::Arc;

use async_trait::async_trait;
use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::SourcesConfig;
use crate::entities::EntitySet;
use crate::error::SourceError;

pub use clinical_trials::{ClinicalTrialsClient, RawTrialRecord};
pub use http::HttpSource;
pub use openfda::{OpenFdaClient, RawLabelRecord};
pub use pubmed::PubMedClient;

/// Drug name sent to the label source when no drug is known.
pub const LABEL_FALLBACK_DRUG: &str = "drug";

/// Clinical-trial registry search.
#[async_trait]
pub trait TrialRegistry: Send + Sync {
    fn name(&self) -> &str;
    async fn search_trials(&self, terms: &str) -> Result<Vec<RawTrialRecord>, SourceError>;
}

/// Literature search returning publication identifiers.
#[async_trait]
pub trait LiteratureIndex: Send + Sync {
    fn name(&self) -> &str;
    async fn search_publications(&self, terms: &str) -> Result<Vec<String>, SourceError>;
}

/// Regulatory label lookup by generic drug name.
#[async_trait]
pub trait LabelLookup: Send + Sync {
    fn name(&self) -> &str;
    async fn fetch_label(&self, drug: &str) -> Result<RawLabelRecord, SourceError>;
}

/// Whether a source answered or its fallback was substituted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceOutcome {
    Live,
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provenance {
    pub trials: SourceOutcome,
    pub publications: SourceOutcome,
    pub label: SourceOutcome,
}

impl Provenance {
    pub fn fallback_count(&self) -> usize {
        [self.trials, self.publications, self.label]
            .iter()
            .filter(|o| **o == SourceOutcome::Fallback)
            .count()
    }
}

/// Everything the synthesizer needs from the outside world.
#[derive(Debug, Clone, PartialEq)]
pub struct Evidence {
    pub trials: Vec<RawTrialRecord>,
    pub publications: Vec<String>,
    pub label: RawLabelRecord,
    pub provenance: Provenance,
}

/// A source that always fails, for runs without network access.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineSource;

impl OfflineSource {
    fn error() -> SourceError {
        SourceError::Request {
            source_name: "offline".into(),
            message: "network access disabled".into(),
        }
    }
}

#[async_trait]
impl TrialRegistry for OfflineSource {
    fn name(&self) -> &str {
        "offline"
    }

    async fn search_trials(&self, _terms: &str) -> Result<Vec<RawTrialRecord>, SourceError> {
        Err(Self::error())
    }
}

#[async_trait]
impl LiteratureIndex for OfflineSource {
    fn name(&self) -> &str {
        "offline"
    }

    async fn search_publications(&self, _terms: &str) -> Result<Vec<String>, SourceError> {
        Err(Self::error())
    }
}

#[async_trait]
impl LabelLookup for OfflineSource {
    fn name(&self) -> &str {
        "offline"
    }

    async fn fetch_label(&self, _drug: &str) -> Result<RawLabelRecord, SourceError> {
        Err(Self::error())
    }
}

pub struct EvidenceGateway {
    trials: Arc<dyn TrialRegistry>,
    literature: Arc<dyn LiteratureIndex>,
    labels: Arc<dyn LabelLookup>,
}

impl EvidenceGateway {
    pub fn new(
        trials: Arc<dyn TrialRegistry>,
        literature: Arc<dyn LiteratureIndex>,
        labels: Arc<dyn LabelLookup>,
    ) -> Self {
        Self {
            trials,
            literature,
            labels,
        }
    }

    /// Gateway over the public HTTP sources, sharing one connection pool.
    pub fn from_config(config: &SourcesConfig) -> Result<Self, SourceError> {
        Ok(Self::over_http(HttpSource::new(config)?, config))
    }

    pub fn over_http(http: HttpSource, config: &SourcesConfig) -> Self {
        Self::new(
            Arc::new(ClinicalTrialsClient::new(http.clone(), config)),
            Arc::new(PubMedClient::new(http.clone(), config)),
            Arc::new(OpenFdaClient::new(http, config)),
        )
    }

    /// Gateway whose every source fails, so all evidence is fallback data.
    pub fn offline() -> Self {
        Self::new(
            Arc::new(OfflineSource),
            Arc::new(OfflineSource),
            Arc::new(OfflineSource),
        )
    }

    /// Fetch from all three sources concurrently and substitute fallbacks.
    pub async fn gather<R: Rng + ?Sized>(&self, entities: &EntitySet, rng: &mut R) -> Evidence {
        let terms = entities.search_terms();
        let label_drug = entities
            .drugs()
            .first()
            .map(String::as_str)
            .unwrap_or(LABEL_FALLBACK_DRUG);

        let (trials, publications, label) = tokio::join!(
            self.trials.search_trials(&terms),
            self.literature.search_publications(&terms),
            self.labels.fetch_label(label_drug),
        );

        let (trials, trials_outcome) = match trials {
            Ok(records) => {
                debug!(source = self.trials.name(), count = records.len(), "Trials fetched");
                (records, SourceOutcome::Live)
            }
            Err(e) => {
                warn!(source = self.trials.name(), error = %e, "Trial registry unavailable, using synthetic trials");
                (
                    synthetic::synthetic_trials(entities.drugs(), entities.conditions(), rng),
                    SourceOutcome::Fallback,
                )
            }
        };

        let (publications, publications_outcome) = match publications {
            Ok(ids) => {
                debug!(source = self.literature.name(), count = ids.len(), "Publications fetched");
                (ids, SourceOutcome::Live)
            }
            Err(e) => {
                warn!(source = self.literature.name(), error = %e, "Literature index unavailable, reporting no publications");
                (Vec::new(), SourceOutcome::Fallback)
            }
        };

        let (label, label_outcome) = match label {
            Ok(record) => (record, SourceOutcome::Live),
            Err(e) => {
                warn!(source = self.labels.name(), error = %e, "Label lookup unavailable, using empty label");
                (RawLabelRecord::default(), SourceOutcome::Fallback)
            }
        };

        Evidence {
            trials,
            publications,
            label,
            provenance: Provenance {
                trials: trials_outcome,
                publications: publications_outcome,
                label: label_outcome,
            },
        }
    }
}

pub(crate) fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Accept a list of strings or numbers, a single scalar, or null.
pub(crate) fn lenient_strings<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items.iter().filter_map(scalar_to_string).collect(),
        Some(other) => scalar_to_string(&other).into_iter().collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedTrials(Vec<RawTrialRecord>);

    #[async_trait]
    impl TrialRegistry for FixedTrials {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn search_trials(&self, _terms: &str) -> Result<Vec<RawTrialRecord>, SourceError> {
            Ok(self.0.clone())
        }
    }

    struct RecordingLabels {
        calls: AtomicUsize,
        last_drug: std::sync::Mutex<String>,
    }

    #[async_trait]
    impl LabelLookup for RecordingLabels {
        fn name(&self) -> &str {
            "recording"
        }

        async fn fetch_label(&self, drug: &str) -> Result<RawLabelRecord, SourceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_drug.lock().unwrap() = drug.to_string();
            Ok(RawLabelRecord {
                warnings: vec!["Boxed".into()],
                ..Default::default()
            })
        }
    }

    #[tokio::test]
    async fn test_offline_gateway_uses_every_fallback() {
        let gateway = EvidenceGateway::offline();
        let entities = EntitySet::new(vec!["olaparib".into()], vec!["ovarian cancer".into()]);
        let evidence = gateway
            .gather(&entities, &mut StdRng::seed_from_u64(11))
            .await;

        assert_eq!(evidence.trials.len(), synthetic::SYNTHETIC_TRIAL_COUNT);
        assert!(evidence.publications.is_empty());
        assert!(evidence.label.is_empty());
        assert_eq!(evidence.provenance.fallback_count(), 3);
    }

    #[tokio::test]
    async fn test_one_failure_does_not_touch_the_others() {
        let labels = Arc::new(RecordingLabels {
            calls: AtomicUsize::new(0),
            last_drug: std::sync::Mutex::new(String::new()),
        });
        let gateway = EvidenceGateway::new(
            Arc::new(FixedTrials(Vec::new())),
            Arc::new(OfflineSource),
            labels.clone(),
        );
        let entities = EntitySet::new(vec!["osimertinib".into(), "erlotinib".into()], vec![]);
        let evidence = gateway
            .gather(&entities, &mut StdRng::seed_from_u64(5))
            .await;

        assert!(evidence.trials.is_empty());
        assert_eq!(evidence.provenance.trials, SourceOutcome::Live);
        assert_eq!(evidence.provenance.publications, SourceOutcome::Fallback);
        assert_eq!(evidence.provenance.label, SourceOutcome::Live);
        assert_eq!(evidence.label.warnings, vec!["Boxed"]);
        assert_eq!(labels.calls.load(Ordering::SeqCst), 1);
        assert_eq!(*labels.last_drug.lock().unwrap(), "osimertinib");
    }

    /// Answers only once all three sources are in flight at the same time.
    struct Rendezvous(Arc<tokio::sync::Barrier>);

    #[async_trait]
    impl TrialRegistry for Rendezvous {
        fn name(&self) -> &str {
            "rendezvous"
        }

        async fn search_trials(&self, _terms: &str) -> Result<Vec<RawTrialRecord>, SourceError> {
            self.0.wait().await;
            Ok(Vec::new())
        }
    }

    #[async_trait]
    impl LiteratureIndex for Rendezvous {
        fn name(&self) -> &str {
            "rendezvous"
        }

        async fn search_publications(&self, _terms: &str) -> Result<Vec<String>, SourceError> {
            self.0.wait().await;
            Ok(vec!["1".into()])
        }
    }

    #[async_trait]
    impl LabelLookup for Rendezvous {
        fn name(&self) -> &str {
            "rendezvous"
        }

        async fn fetch_label(&self, _drug: &str) -> Result<RawLabelRecord, SourceError> {
            self.0.wait().await;
            Ok(RawLabelRecord::default())
        }
    }

    #[tokio::test]
    async fn test_sources_are_fetched_concurrently() {
        let source = Arc::new(Rendezvous(Arc::new(tokio::sync::Barrier::new(3))));
        let gateway = EvidenceGateway::new(source.clone(), source.clone(), source);
        let entities = EntitySet::new(vec!["olaparib".into()], vec![]);
        let mut rng = StdRng::seed_from_u64(9);

        let evidence = tokio::time::timeout(
            std::time::Duration::from_secs(5),
            gateway.gather(&entities, &mut rng),
        )
        .await
        .expect("all three sources should be awaited together");

        assert_eq!(evidence.provenance.fallback_count(), 0);
        assert_eq!(evidence.publications, vec!["1"]);
    }

    #[test]
    fn test_lenient_strings_accepts_scalars() {
        let record: RawTrialRecord = serde_json::from_value(serde_json::json!({
            "NCTId": "NCT00000001",
            "EnrollmentCount": [120, "80"],
            "Phase": null
        }))
        .unwrap();
        assert_eq!(record.nct_id, vec!["NCT00000001"]);
        assert_eq!(record.enrollment_count, vec!["120", "80"]);
        assert!(record.phase.is_empty());
    }
}
