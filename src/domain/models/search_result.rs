use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

use super::Item;
use crate::domain::DomainError;

/// An item paired with its similarity score. Produced by search, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    item: Item,
    score: f32,
}

impl SearchResult {
    pub fn new(item: Item, score: f32) -> Self {
        Self { item, score }
    }

    pub fn item(&self) -> &Item {
        &self.item
    }

    pub fn score(&self) -> f32 {
        self.score
    }

    pub fn is_relevant(&self, threshold: f32) -> bool {
        self.score >= threshold
    }
}

/// Result-count cap: a positive integer or an explicit "all" sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaxResults {
    All,
    Limit(usize),
}

impl MaxResults {
    pub fn cap(&self) -> usize {
        match self {
            MaxResults::All => usize::MAX,
            MaxResults::Limit(n) => *n,
        }
    }

    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        if raw.trim().eq_ignore_ascii_case("all") {
            return Ok(MaxResults::All);
        }
        match raw.trim().parse::<usize>() {
            Ok(n) if n > 0 => Ok(MaxResults::Limit(n)),
            _ => Err(DomainError::validation(format!(
                "maxResults must be a positive integer or \"all\", got: {}",
                raw
            ))),
        }
    }
}

impl Serialize for MaxResults {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            MaxResults::All => serializer.serialize_str("all"),
            MaxResults::Limit(n) => serializer.serialize_u64(*n as u64),
        }
    }
}

impl<'de> Deserialize<'de> for MaxResults {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(u64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(0) => Err(de::Error::custom("maxResults must be positive")),
            Raw::Number(n) => Ok(MaxResults::Limit(n as usize)),
            Raw::Text(s) if s.eq_ignore_ascii_case("all") => Ok(MaxResults::All),
            Raw::Text(s) => Err(de::Error::custom(format!(
                "maxResults must be a positive integer or \"all\", got: {}",
                s
            ))),
        }
    }
}

/// Similarity-search parameters shared by the text and image variants.
#[derive(Debug, Clone, Copy)]
pub struct SearchQuery {
    threshold: f32,
    max_results: MaxResults,
}

impl SearchQuery {
    pub fn new(threshold: f32, max_results: MaxResults) -> Self {
        Self {
            threshold,
            max_results,
        }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn max_results(&self) -> MaxResults {
        self.max_results
    }

    /// Parameter validation: threshold must be in [0, 1]. NaN fails the range
    /// check and is rejected with everything else out of range.
    pub fn validate(&self) -> Result<(), DomainError> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(DomainError::validation(format!(
                "threshold must be within [0, 1], got: {}",
                self.threshold
            )));
        }
        Ok(())
    }
}
