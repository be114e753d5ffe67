//! openFDA drug label client.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::http::{self, HttpSource};
use super::{LabelLookup, lenient_strings};
use crate::config::SourcesConfig;
use crate::error::SourceError;

pub const SOURCE_NAME: &str = "openFDA";

/// The label sections the synthesizer reads. Empty when the lookup fails.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawLabelRecord {
    #[serde(default, deserialize_with = "lenient_strings")]
    pub warnings: Vec<String>,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub boxed_warning: Vec<String>,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub adverse_reactions: Vec<String>,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub indications_and_usage: Vec<String>,
}

impl RawLabelRecord {
    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
            && self.boxed_warning.is_empty()
            && self.adverse_reactions.is_empty()
            && self.indications_and_usage.is_empty()
    }
}

/// Read `results[0]`, or an empty record when there is none.
pub fn parse_label(body: &Value) -> Result<RawLabelRecord, SourceError> {
    match body.pointer("/results/0") {
        None | Some(Value::Null) => Ok(RawLabelRecord::default()),
        Some(first) => serde_json::from_value(first.clone())
            .map_err(|e| http::parse_error(SOURCE_NAME, &e.to_string())),
    }
}

pub struct OpenFdaClient {
    http: HttpSource,
    base_url: String,
}

impl OpenFdaClient {
    pub fn new(http: HttpSource, config: &SourcesConfig) -> Self {
        Self {
            http,
            base_url: config.label_url.clone(),
        }
    }

    pub fn lookup_url(&self, drug: &str) -> String {
        format!(
            "{}?search=openfda.generic_name:{}&limit=1",
            self.base_url,
            http::encode_query(drug)
        )
    }
}

#[async_trait]
impl LabelLookup for OpenFdaClient {
    fn name(&self) -> &str {
        SOURCE_NAME
    }

    async fn fetch_label(&self, drug: &str) -> Result<RawLabelRecord, SourceError> {
        let body = self.http.get_json(SOURCE_NAME, &self.lookup_url(drug)).await?;
        parse_label(&body)
    }
}
