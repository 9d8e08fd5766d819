//! Negotiator-level error types shared across the extractor, transport, and flow.
//!
//! Absence of an assertion is never modeled as an error: pages without actionable content and
//! exhausted redirect budgets surface as [`NegotiationOutcome`](crate::flow::NegotiationOutcome)
//! variants. Errors are reserved for transport failures and caller-input problems.

// self
use crate::_prelude::*;

/// Negotiator-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical negotiator error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration or caller-input problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS); propagated, never retried.
	#[error(transparent)]
	Transport(#[from] TransportError),
}

/// Configuration and validation failures raised by the negotiator.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// Service provider URL was empty.
	#[error("Service provider URL must not be empty.")]
	EmptySpUrl,
	/// Service provider URL could not be parsed.
	#[error("Service provider URL is invalid.")]
	InvalidSpUrl {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Form `action` could not be resolved against the current URL.
	#[error("Form action `{action}` could not be resolved against the current URL.")]
	InvalidFormAction {
		/// Action attribute exactly as it appeared in the document.
		action: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Form carried an empty `action` while the profile rejects those.
	#[error("Form action is empty and the profile rejects empty actions.")]
	EmptyFormAction,
	/// Meta-refresh target could not be resolved against the current URL.
	#[error("Redirect target `{target}` could not be resolved against the current URL.")]
	InvalidRedirectTarget {
		/// Target exactly as it appeared in the document.
		target: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while fetching the page.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while fetching the page.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}
