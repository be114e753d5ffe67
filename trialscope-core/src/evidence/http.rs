//! Shared HTTP transport for the evidence sources and the enricher.

use std::time::Duration;

use serde_json::Value;

use crate::config::SourcesConfig;
use crate::error::SourceError;

/// A configured `reqwest` client. Cheap to clone; clones share the pool.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
}

impl HttpSource {
    pub fn new(config: &SourcesConfig) -> Result<Self, SourceError> {
        let mut builder = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .user_agent(config.user_agent.clone());
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().map_err(|e| SourceError::ClientBuild {
            message: e.to_string(),
        })?;
        Ok(Self { client })
    }

    /// GET `url` and decode the body as JSON.
    pub async fn get_json(&self, source_name: &str, url: &str) -> Result<Value, SourceError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| request_error(source_name, e))?;
        decode(source_name, response).await
    }

    /// POST `body` as JSON to `url` and decode the response as JSON.
    pub async fn post_json(
        &self,
        source_name: &str,
        url: &str,
        body: &Value,
    ) -> Result<Value, SourceError> {
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| request_error(source_name, e))?;
        decode(source_name, response).await
    }
}

async fn decode(source_name: &str, response: reqwest::Response) -> Result<Value, SourceError> {
    if !response.status().is_success() {
        return Err(SourceError::Status {
            source_name: source_name.to_string(),
            status: response.status().as_u16(),
        });
    }
    response
        .json()
        .await
        .map_err(|e| parse_error(source_name, &e.to_string()))
}

fn request_error(source_name: &str, e: reqwest::Error) -> SourceError {
    SourceError::Request {
        source_name: source_name.to_string(),
        message: e.to_string(),
    }
}

pub fn parse_error(source_name: &str, message: &str) -> SourceError {
    SourceError::Parse {
        source_name: source_name.to_string(),
        message: message.to_string(),
    }
}

/// Percent-encode a search expression for a query string.
pub fn encode_query(terms: &str) -> String {
    urlencoding::encode(terms).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_builds_with_and_without_timeout() {
        let mut config = SourcesConfig::default();
        assert!(HttpSource::new(&config).is_ok());
        config.request_timeout_secs = Some(30);
        assert!(HttpSource::new(&config).is_ok());
    }

    #[test]
    fn test_encode_query() {
        assert_eq!(encode_query("pembrolizumab nsclc"), "pembrolizumab%20nsclc");
        assert_eq!(encode_query("her2+"), "her2%2B");
    }

    #[test]
    fn test_parse_error_names_source() {
        let err = parse_error("PubMed", "bad shape");
        assert_eq!(err.source_name(), Some("PubMed"));
    }
}
