//! Free-text descriptions of aircraft and airports from a language model.
//!
//! The dataset only validates the selection and forwards it; whatever the
//! generator returns (text or error) reaches the caller unchanged.
pub mod openai;

use std::fmt;

use log::debug;

use crate::data::model::FlightDataset;
use crate::error::{DescribeError, QueryError};

pub use openai::OpenAiClient;

// ---------------------------------------------------------------------------
// Credential
// ---------------------------------------------------------------------------

/// User-supplied API key. Lives in session memory only.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// `None` for blank input.
    pub fn new(key: &str) -> Option<Self> {
        let key = key.trim();
        (!key.is_empty()).then(|| ApiKey(key.to_string()))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

// ---------------------------------------------------------------------------
// Generator seam
// ---------------------------------------------------------------------------

/// What to describe.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Subject {
    Aircraft(String),
    Airport(String),
}

impl Subject {
    pub fn prompt(&self) -> String {
        match self {
            Subject::Aircraft(model) => format!(
                "Describe the aircraft model '{model}': manufacturer, first flight, \
                 typical seating capacity, range and notable operators."
            ),
            Subject::Airport(name) => format!(
                "Describe the airport '{name}': location, main airlines and hubs, \
                 passenger traffic, runways and anything notable about it."
            ),
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Subject::Aircraft(model) => write!(f, "aircraft {model}"),
            Subject::Airport(name) => write!(f, "airport {name}"),
        }
    }
}

pub trait TextGenerator {
    fn generate(&self, subject: &Subject, key: &ApiKey) -> Result<String, DescribeError>;
}

impl FlightDataset {
    /// Describe an airplane model by name.
    pub fn describe_aircraft(
        &self,
        generator: &dyn TextGenerator,
        key: &ApiKey,
        model: &str,
    ) -> Result<String, DescribeError> {
        if !self.airplanes.iter().any(|p| p.name == model) {
            return Err(QueryError::Validation(format!("unknown aircraft model '{model}'")).into());
        }
        let subject = Subject::Aircraft(model.to_string());
        debug!("Describing {subject}");
        generator.generate(&subject, key)
    }

    /// Describe an airport by display name ("Name (CODE)") or plain name.
    pub fn describe_airport(
        &self,
        generator: &dyn TextGenerator,
        key: &ApiKey,
        name: &str,
    ) -> Result<String, DescribeError> {
        let known = self
            .airports
            .iter()
            .any(|a| a.name == name || a.display_name() == name);
        if !known {
            return Err(QueryError::Validation(format!("unknown airport '{name}'")).into());
        }
        let subject = Subject::Airport(name.to_string());
        debug!("Describing {subject}");
        generator.generate(&subject, key)
    }
}
