//! Optional sentiment enrichment of the intent profile.
//!
//! A single best-effort POST to a hosted text-classification model. Any
//! failure collapses into `Enrichment::Unavailable`; classification never
//! depends on the outcome.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::EnrichmentConfig;
use crate::error::SourceError;
use crate::evidence::http::{self, HttpSource};

const SOURCE_NAME: &str = "sentiment model";

/// A sentiment label and the model's confidence in it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sentiment {
    pub label: String,
    /// Confidence in [0, 1].
    pub score: f64,
}

/// Outcome of the enrichment attempt, kept on the intent profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Enrichment {
    Enriched {
        sentiment_label: String,
        confidence_score: f64,
    },
    #[default]
    Unavailable,
}

impl Enrichment {
    pub fn is_enriched(&self) -> bool {
        matches!(self, Enrichment::Enriched { .. })
    }
}

impl From<Sentiment> for Enrichment {
    fn from(sentiment: Sentiment) -> Self {
        Enrichment::Enriched {
            sentiment_label: sentiment.label,
            confidence_score: sentiment.score,
        }
    }
}

/// Something that can score the sentiment of a query.
#[async_trait]
pub trait SentimentScorer: Send + Sync {
    async fn score(&self, text: &str) -> Result<Sentiment, SourceError>;
}

/// Run one enrichment attempt and fold every failure into `Unavailable`.
pub async fn enrich(scorer: &dyn SentimentScorer, text: &str) -> Enrichment {
    match scorer.score(text).await {
        Ok(sentiment) => {
            debug!(label = %sentiment.label, score = sentiment.score, "Query enriched");
            sentiment.into()
        }
        Err(e) => {
            warn!(error = %e, "Sentiment enrichment unavailable");
            Enrichment::Unavailable
        }
    }
}

/// Hosted inference endpoint client.
pub struct HttpSentimentScorer {
    http: HttpSource,
    endpoint: String,
}

impl HttpSentimentScorer {
    pub fn new(http: HttpSource, config: &EnrichmentConfig) -> Self {
        Self {
            http,
            endpoint: config.endpoint.clone(),
        }
    }
}

#[async_trait]
impl SentimentScorer for HttpSentimentScorer {
    async fn score(&self, text: &str) -> Result<Sentiment, SourceError> {
        let body = serde_json::json!({ "inputs": text });
        let response = self
            .http
            .post_json(SOURCE_NAME, &self.endpoint, &body)
            .await?;
        parse_sentiment(&response)
    }
}

/// Read `[{label, score}, ...]` (or the nested `[[{label, score}, ...]]`
/// shape) and take the first element.
pub fn parse_sentiment(body: &serde_json::Value) -> Result<Sentiment, SourceError> {
    let first = body
        .as_array()
        .and_then(|arr| arr.first())
        .ok_or_else(|| http::parse_error(SOURCE_NAME, "expected a non-empty list"))?;

    let first = match first.as_array() {
        Some(inner) => inner
            .first()
            .ok_or_else(|| http::parse_error(SOURCE_NAME, "nested list is empty"))?,
        None => first,
    };

    let label = first
        .get("label")
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| http::parse_error(SOURCE_NAME, "missing label"))?;
    let score = first
        .get("score")
        .and_then(|v| v.as_f64())
        .ok_or_else(|| http::parse_error(SOURCE_NAME, "missing score"))?;

    if !(0.0..=1.0).contains(&score) {
        return Err(http::parse_error(
            SOURCE_NAME,
            &format!("score {score} outside [0, 1]"),
        ));
    }

    Ok(Sentiment {
        label: label.to_string(),
        score,
    })
}
