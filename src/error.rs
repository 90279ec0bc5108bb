//! Client-facing error taxonomy
//!
//! Every resolver layer speaks [`ClientError`]: a classification tag from a
//! closed set, a detail message, and an optional wrapped cause. A layer either
//! passes a classified error through unchanged or re-wraps it under a new tag
//! while keeping the original reachable through the cause chain. Raw transport
//! or decoding failures must be classified before they cross a layer boundary.

use std::error::Error as StdError;
use std::fmt;

use thiserror::Error;

/// Classification tags for [`ClientError`]
///
/// The set is closed: the HTTP layer maps these (and nothing else) to status
/// codes, so adding a variant means revisiting that mapping.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// The requested object does not exist in the resource store
    ResourceNotFound,
    /// A kind string is not in any supported-kind table
    KindNotFound,
    /// An object exists but its content could not be used
    InvalidResource,
    /// An object is missing required references or fields
    InvalidConfiguration,
    /// A list operation produced no usable items
    EmptyResponse,
    /// Anything that arrived unclassified (transport failures and the like)
    UnexpectedError,
}

impl ErrorKind {
    /// Stable wire tag, surfaced as `errortype` in error responses
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::ResourceNotFound => "RESOURCE_NOT_FOUND",
            ErrorKind::KindNotFound => "KIND_NOT_FOUND",
            ErrorKind::InvalidResource => "INVALID_RESOURCE",
            ErrorKind::InvalidConfiguration => "INVALID_CONFIGURATION",
            ErrorKind::EmptyResponse => "EMPTY_RESPONSE",
            ErrorKind::UnexpectedError => "UNEXPECTED_ERROR",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified, cause-chained error
///
/// The classification must survive re-wrapping: wrapping layers may pick a tag
/// that is more meaningful at their level, but the wrapped error stays
/// reachable via [`std::error::Error::source`].
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct ClientError {
    kind: ErrorKind,
    message: String,
    #[source]
    cause: Option<Box<dyn StdError + Send + Sync>>,
}

impl ClientError {
    /// Create an error with an explicit classification
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            cause: None,
        }
    }

    /// Create a `ResourceNotFound` error
    pub fn resource_not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ResourceNotFound, message)
    }

    /// Create a `KindNotFound` error
    pub fn kind_not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::KindNotFound, message)
    }

    /// Create an `InvalidResource` error
    pub fn invalid_resource(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidResource, message)
    }

    /// Create an `InvalidConfiguration` error
    pub fn invalid_configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidConfiguration, message)
    }

    /// Create an `EmptyResponse` error
    pub fn empty_response(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::EmptyResponse, message)
    }

    /// Create an `UnexpectedError` error
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnexpectedError, message)
    }

    /// Attach the error that caused this one
    pub fn with_cause(mut self, cause: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
        self.cause = Some(cause.into());
        self
    }

    /// The classification tag
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The detail message, without the tag prefix
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The direct cause, if it is itself a classified error
    ///
    /// Used by layers that route on the classification of what a dependency
    /// reported, and by tests asserting that re-wrapping kept the original.
    pub fn classified_cause(&self) -> Option<&ClientError> {
        self.cause
            .as_deref()
            .and_then(|c| c.downcast_ref::<ClientError>())
    }
}
