//! PubMed E-utilities search client.

use async_trait::async_trait;
use serde_json::Value;

use super::http::{self, HttpSource};
use super::{LiteratureIndex, scalar_to_string};
use crate::config::SourcesConfig;
use crate::error::SourceError;

pub const SOURCE_NAME: &str = "PubMed";

/// Read `esearchresult.idlist`. A missing path means no publications.
pub fn parse_id_list(body: &Value) -> Result<Vec<String>, SourceError> {
    match body.pointer("/esearchresult/idlist") {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(ids)) => Ok(ids.iter().filter_map(scalar_to_string).collect()),
        Some(_) => Err(http::parse_error(SOURCE_NAME, "idlist is not a list")),
    }
}

pub struct PubMedClient {
    http: HttpSource,
    base_url: String,
    limit: usize,
}

impl PubMedClient {
    pub fn new(http: HttpSource, config: &SourcesConfig) -> Self {
        Self {
            http,
            base_url: config.literature_url.clone(),
            limit: config.publication_limit,
        }
    }

    pub fn search_url(&self, terms: &str) -> String {
        format!(
            "{}?db=pubmed&term={}&retmode=json&retmax={}&sort=relevance",
            self.base_url,
            http::encode_query(terms),
            self.limit
        )
    }
}

#[async_trait]
impl LiteratureIndex for PubMedClient {
    fn name(&self) -> &str {
        SOURCE_NAME
    }

    async fn search_publications(&self, terms: &str) -> Result<Vec<String>, SourceError> {
        let body = self.http.get_json(SOURCE_NAME, &self.search_url(terms)).await?;
        parse_id_list(&body)
    }
}
