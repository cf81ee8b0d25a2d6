use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Coarse classification of a [`CalmapError`].
///
/// Every failure of a remap request falls into exactly one of these kinds.
/// The embedder-facing surface collapses all of them into the same generic
/// rejection, but tests and logs rely on the distinction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Malformed or missing request fields, unsupported enumerated values.
    Validation,
    /// No accepted date format parses every requested date.
    Parse,
    /// The price-series provider failed or returned nothing usable.
    Upstream,
    /// The pipeline could not produce a value (empty collapse, dates before the series).
    Computation,
}

/// Unified error type for the calmap workspace.
///
/// This wraps request validation and date parsing failures, provider-tagged
/// failures, timeouts, and pipeline computation failures.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CalmapError {
    /// A request field is missing, malformed, or carries an unsupported value.
    #[error("invalid request: {0}")]
    Validation(String),

    /// The requested dates could not be parsed under any accepted format.
    #[error("unparseable dates: {0}")]
    Parse(String),

    /// Issues with the returned or expected data (unsorted series, ragged rows, etc.).
    #[error("data issue: {0}")]
    Data(String),

    /// The requested capability is not implemented by the target connector.
    #[error("unsupported capability: {capability}")]
    Unsupported {
        /// A capability string describing what was requested (e.g. "series").
        capability: String,
    },

    /// An individual connector returned an error.
    #[error("{connector} failed: {msg}")]
    Connector {
        /// Connector name that failed.
        connector: String,
        /// Human-readable error message.
        msg: String,
    },

    /// A symbol or column could not be found upstream.
    #[error("not found: {what}")]
    NotFound {
        /// Description of missing resource, e.g. "series for LBMA/GOLD".
        what: String,
    },

    /// The provider answered but the series holds no observations for the range.
    #[error("empty series: {what}")]
    EmptySeries {
        /// Description of the empty request, e.g. "LBMA/GOLD 2020-01-01..2020-02-01".
        what: String,
    },

    /// All selected providers failed; contains the individual failures.
    #[error("all providers failed: {0:?}")]
    AllProvidersFailed(Vec<CalmapError>),

    /// An individual provider call exceeded the configured timeout.
    #[error("provider timed out: {capability} via {connector}")]
    ProviderTimeout {
        /// Connector name that timed out.
        connector: String,
        /// Capability label (e.g. "series").
        capability: String,
    },

    /// The overall provider phase exceeded the configured deadline.
    #[error("request timed out: {capability}")]
    RequestTimeout {
        /// Capability label for which the request timed out.
        capability: String,
    },

    /// All attempted providers timed out for the requested capability.
    #[error("all providers timed out: {capability}")]
    AllProvidersTimedOut {
        /// Capability label that timed out across all providers.
        capability: String,
    },

    /// The pipeline produced no value where one was required.
    #[error("computation failed: {0}")]
    Computation(String),
}

impl CalmapError {
    /// Body returned to embedders for every rejected request.
    pub const EXTERNAL_MESSAGE: &'static str = "invalid request";

    /// The message shown to embedders for this error, identical for every kind.
    #[must_use]
    pub const fn external_message(&self) -> &'static str {
        Self::EXTERNAL_MESSAGE
    }

    /// Helper: build a `Validation` error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Helper: build a `Parse` error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Helper: build a `Computation` error.
    pub fn computation(msg: impl Into<String>) -> Self {
        Self::Computation(msg.into())
    }

    /// Helper: build an `Unsupported` error for a capability string.
    #[must_use]
    pub fn unsupported(cap: impl Into<String>) -> Self {
        Self::Unsupported {
            capability: cap.into(),
        }
    }

    /// Helper: build a `Connector` error with the connector name and message.
    pub fn connector(connector: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Connector {
            connector: connector.into(),
            msg: msg.into(),
        }
    }

    /// Helper: build a `NotFound` error for a description of the missing resource.
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }

    /// Helper: build an `EmptySeries` error.
    pub fn empty_series(what: impl Into<String>) -> Self {
        Self::EmptySeries { what: what.into() }
    }

    /// Helper: build a `ProviderTimeout` error.
    pub fn provider_timeout(connector: impl Into<String>, capability: impl Into<String>) -> Self {
        Self::ProviderTimeout {
            connector: connector.into(),
            capability: capability.into(),
        }
    }

    /// Helper: build a `RequestTimeout` error.
    #[must_use]
    pub fn request_timeout(capability: impl Into<String>) -> Self {
        Self::RequestTimeout {
            capability: capability.into(),
        }
    }

    /// Classify this error into the request-level taxonomy.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Parse(_) => ErrorKind::Parse,
            Self::Computation(_) => ErrorKind::Computation,
            Self::Data(_)
            | Self::Unsupported { .. }
            | Self::Connector { .. }
            | Self::NotFound { .. }
            | Self::EmptySeries { .. }
            | Self::AllProvidersFailed(_)
            | Self::ProviderTimeout { .. }
            | Self::RequestTimeout { .. }
            | Self::AllProvidersTimedOut { .. } => ErrorKind::Upstream,
        }
    }

    /// Returns true if the request was rejected before any provider was called.
    #[must_use]
    pub const fn is_request_error(&self) -> bool {
        matches!(self.kind(), ErrorKind::Validation | ErrorKind::Parse)
    }

    /// Flatten nested `AllProvidersFailed` structures into a plain vector.
    ///
    /// This preserves other error variants as-is and unwraps recursively.
    #[must_use]
    pub fn flatten(self) -> Vec<Self> {
        match self {
            Self::AllProvidersFailed(list) => list.into_iter().flat_map(Self::flatten).collect(),
            other => vec![other],
        }
    }
}

impl From<serde_json::Error> for CalmapError {
    fn from(e: serde_json::Error) -> Self {
        Self::Validation(e.to_string())
    }
}
