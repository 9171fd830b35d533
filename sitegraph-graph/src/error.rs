use thiserror::Error;

/// Why a single raw link could not become a graph edge candidate.
///
/// These never escape a record: the builder counts them and moves on to the
/// next link.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LinkError {
    #[error("Empty link")]
    Empty,

    #[error("Fragment-only link: {0}")]
    FragmentOnly(String),

    #[error("Malformed link '{link}': {source}")]
    Malformed {
        link: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Page URL has no origin: {0}")]
    NoOrigin(String),
}

/// Errors raised while decoding page records supplied by a collaborator.
#[derive(Error, Debug)]
pub enum RecordError {
    #[error("Invalid record JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Record is missing a url")]
    MissingUrl,
}

pub type Result<T> = std::result::Result<T, LinkError>;
