//! ClinicalTrials.gov study-fields client.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::http::{self, HttpSource};
use super::{TrialRegistry, lenient_strings};
use crate::config::SourcesConfig;
use crate::error::SourceError;

pub const SOURCE_NAME: &str = "ClinicalTrials.gov";

const STUDY_FIELDS: &str = "NCTId,BriefTitle,Phase,Status,EnrollmentCount,PrimaryOutcomeMeasure,SecondaryOutcomeMeasure,InterventionName";

/// One study as returned by the registry: every field is a list of values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawTrialRecord {
    #[serde(rename = "NCTId", default, deserialize_with = "lenient_strings")]
    pub nct_id: Vec<String>,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub brief_title: Vec<String>,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub phase: Vec<String>,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub status: Vec<String>,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub enrollment_count: Vec<String>,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub primary_outcome_measure: Vec<String>,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub secondary_outcome_measure: Vec<String>,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub intervention_name: Vec<String>,
}

impl RawTrialRecord {
    /// Whether any intervention name contains `drug`, ignoring case.
    pub fn mentions_intervention(&self, drug: &str) -> bool {
        let drug = drug.to_lowercase();
        self.intervention_name
            .iter()
            .any(|name| name.to_lowercase().contains(&drug))
    }
}

/// Read `StudyFieldsResponse.StudyFields`. A missing path means no studies.
pub fn parse_study_fields(body: &Value) -> Result<Vec<RawTrialRecord>, SourceError> {
    match body.pointer("/StudyFieldsResponse/StudyFields") {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(fields) => serde_json::from_value(fields.clone())
            .map_err(|e| http::parse_error(SOURCE_NAME, &e.to_string())),
    }
}

pub struct ClinicalTrialsClient {
    http: HttpSource,
    base_url: String,
    page_size: usize,
}

impl ClinicalTrialsClient {
    pub fn new(http: HttpSource, config: &SourcesConfig) -> Self {
        Self {
            http,
            base_url: config.trial_registry_url.clone(),
            page_size: config.trial_page_size,
        }
    }

    pub fn search_url(&self, terms: &str) -> String {
        format!(
            "{}?expr={}&fields={}&min_rnk=1&max_rnk={}&fmt=json",
            self.base_url,
            http::encode_query(terms),
            STUDY_FIELDS,
            self.page_size
        )
    }
}

#[async_trait]
impl TrialRegistry for ClinicalTrialsClient {
    fn name(&self) -> &str {
        SOURCE_NAME
    }

    async fn search_trials(&self, terms: &str) -> Result<Vec<RawTrialRecord>, SourceError> {
        let body = self.http.get_json(SOURCE_NAME, &self.search_url(terms)).await?;
        parse_study_fields(&body)
    }
}
