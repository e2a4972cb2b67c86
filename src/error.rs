//! Crate-level error types shared by the manager, ports, and classifier.
//!
//! [`Error::is_retryable`] separates "fix your configuration" failures from "try again later"
//! ones. Nothing in this crate retries on its own.

// self
use crate::{
	_prelude::*,
	auth::{AccessToken, IdentifierError},
	cache::CacheError,
};

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Application identity or secret rejected by the server; not retryable.
	#[error(transparent)]
	Credential(#[from] CredentialError),
	/// Transport failure (DNS, TCP, TLS, timeout).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Temporary upstream failure; retry with backoff.
	#[error(transparent)]
	Transient(#[from] TransientError),
	/// Cache read failure.
	#[error("{0}")]
	Cache(
		#[from]
		#[source]
		CacheError,
	),
	/// A token was issued but could not be cached.
	///
	/// The token is still valid and can be recovered with [`Error::into_unpersisted_token`].
	#[error("Access token was issued but could not be cached: {source}")]
	CacheWrite {
		/// Underlying cache failure.
		#[source]
		source: CacheError,
		/// Token obtained by the failed call.
		token: AccessToken,
	},
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
}
impl Error {
	/// Returns `true` when the same call may succeed later without any configuration change.
	pub fn is_retryable(&self) -> bool {
		match self {
			Self::Credential(_) | Self::Config(_) => false,
			Self::Transport(_) | Self::Transient(_) | Self::Cache(_) | Self::CacheWrite { .. } =>
				true,
		}
	}

	/// Returns the token carried by [`Error::CacheWrite`], if any.
	pub fn into_unpersisted_token(self) -> Option<AccessToken> {
		match self {
			Self::CacheWrite { token, .. } => Some(token),
			_ => None,
		}
	}
}
impl From<IdentifierError> for Error {
	fn from(e: IdentifierError) -> Self {
		ConfigError::from(e).into()
	}
}

/// The authorization server rejected the application credentials.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum CredentialError {
	/// The corp identifier is unknown or malformed.
	#[error(
		"Authorization server rejected the corp identifier (errcode {code}: {message}); check application identity."
	)]
	InvalidIdentity {
		/// Vendor error code.
		code: i64,
		/// Vendor error message.
		message: String,
	},
	/// The application secret is wrong, unset, or has been reset.
	#[error(
		"Authorization server rejected the application secret (errcode {code}: {message}); check application secret."
	)]
	InvalidSecret {
		/// Vendor error code.
		code: i64,
		/// Vendor error message.
		message: String,
	},
}

/// Vendor-reported failure other than a credential rejection.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("Authorization server reported errcode {code}: {message}.")]
pub struct ServerFault {
	/// Vendor error code.
	pub code: i64,
	/// Vendor error message.
	pub message: String,
	/// Whether the code is the vendor's "system busy" signal.
	pub busy: bool,
}

/// Reasons a response could not be turned into a cacheable token.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum MalformedReason {
	/// Zero-length body.
	#[error("empty body from authorization server")]
	EmptyBody,
	/// Success code without a token.
	#[error("authorization server returned no access token")]
	MissingAccessToken,
	/// Declared lifetime does not exceed the safety margin.
	#[error(
		"token lifetime of {expires_in_secs}s does not exceed the {margin_secs}s safety margin"
	)]
	ImplausibleLifetime {
		/// Server-declared lifetime in seconds.
		expires_in_secs: i64,
		/// Safety margin in seconds.
		margin_secs: i64,
	},
	/// Declared lifetime exceeds the longest lifetime the manager will cache.
	#[error("token lifetime of {expires_in_secs}s exceeds the {max_secs}s upper bound")]
	LifetimeOutOfRange {
		/// Server-declared lifetime in seconds.
		expires_in_secs: i64,
		/// Largest accepted lifetime in seconds.
		max_secs: i64,
	},
}

/// Temporary failure variants (safe to retry).
#[derive(Debug, ThisError)]
pub enum TransientError {
	/// Server is busy or reported another non-credential error code.
	#[error(transparent)]
	Server(#[from] ServerFault),
	/// Response cannot be used as-is.
	#[error("Authorization server returned a malformed response: {0}.")]
	Malformed(#[from] MalformedReason),
	/// Response body was not valid JSON.
	#[error("Authorization server returned malformed JSON.")]
	ResponseParse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the authorization endpoint.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the authorization endpoint.")]
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

/// Configuration and validation failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// Application identity failed validation.
	#[error("Application identity is invalid.")]
	InvalidIdentity(#[from] IdentifierError),
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
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
