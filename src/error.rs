use thiserror::Error;

/// Errors raised by dataset queries.
///
/// `Validation` means the caller passed something the dataset does not know
/// about; `NotFound` means a well-formed selector resolved to no record. A
/// valid query that matches nothing is not an error at all.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("invalid selection: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
}

/// Errors from describing an aircraft or airport through the text generator.
#[derive(Debug, Error)]
pub enum DescribeError {
    #[error(transparent)]
    Query(#[from] QueryError),
    #[error("rate limit or quota exceeded")]
    RateLimited,
    #[error("authentication failed, check the API key")]
    Unauthenticated,
    #[error("text generation failed: {0}")]
    Collaborator(String),
}

impl From<reqwest::Error> for DescribeError {
    fn from(e: reqwest::Error) -> Self {
        DescribeError::Collaborator(e.to_string())
    }
}
