//! Response classification: maps an authorization response onto fatal or retryable outcomes.
//!
//! Classification is a pure function of the decoded body, its raw length, and the vendor's
//! error-code table. Nothing here performs I/O or decides whether to retry.

// self
use crate::{
	_prelude::*,
	error::{CredentialError, MalformedReason, ServerFault},
	response::AuthorizationResponse,
};

/// Strategy hook that maps authorization responses into [`ResponseClass`] outcomes.
///
/// Implementors must be `Send + Sync` so one classifier can be shared by every clone of a
/// [`TokenManager`](crate::TokenManager).
pub trait ResponseClassifier: Send + Sync {
	/// Classifies a decoded response given the raw body length in bytes.
	fn classify(&self, response: &AuthorizationResponse, body_len: usize) -> ResponseClass;
}

/// Outcome of classifying one authorization response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResponseClass {
	/// A usable token was issued.
	Success {
		/// Issued token value.
		access_token: String,
		/// Server-declared lifetime in seconds.
		expires_in_secs: i64,
	},
	/// The application identity or secret is wrong; retrying cannot help.
	FatalCredential(CredentialError),
	/// The server reported a failure that may clear up later.
	TransientServer(ServerFault),
	/// The response cannot be used as-is.
	Malformed(MalformedReason),
}

/// Vendor error codes the classifier recognizes.
///
/// Defaults follow the WeCom global error-code table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ErrorCodes {
	/// Code returned for an unknown or invalid corp identifier.
	pub credential_invalid: i64,
	/// Code returned for an invalid application secret.
	pub secret_invalid: i64,
	/// Code returned while the service is overloaded.
	pub system_busy: i64,
}
impl Default for ErrorCodes {
	fn default() -> Self {
		Self { credential_invalid: 40_013, secret_invalid: 40_001, system_busy: -1 }
	}
}

/// Classifier driven by an [`ErrorCodes`] table.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultResponseClassifier {
	/// Vendor codes consulted during classification.
	pub codes: ErrorCodes,
}
impl DefaultResponseClassifier {
	/// Creates a classifier for a custom code table.
	pub const fn new(codes: ErrorCodes) -> Self {
		Self { codes }
	}
}
impl Display for DefaultResponseClassifier {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("default-response-classifier")
	}
}
impl ResponseClassifier for DefaultResponseClassifier {
	fn classify(&self, response: &AuthorizationResponse, body_len: usize) -> ResponseClass {
		classify(&self.codes, response, body_len)
	}
}

/// Classifies `response` against `codes`.
///
/// An empty body wins over any error code, since a zero-length reply carries no trustworthy
/// fields. Unrecognized non-zero codes are treated as server faults.
pub fn classify(
	codes: &ErrorCodes,
	response: &AuthorizationResponse,
	body_len: usize,
) -> ResponseClass {
	if body_len == 0 {
		return ResponseClass::Malformed(MalformedReason::EmptyBody);
	}

	let code = response.error_code;
	let message = || response.error_message.clone();

	if code == codes.credential_invalid {
		return ResponseClass::FatalCredential(CredentialError::InvalidIdentity {
			code,
			message: message(),
		});
	}
	if code == codes.secret_invalid {
		return ResponseClass::FatalCredential(CredentialError::InvalidSecret {
			code,
			message: message(),
		});
	}
	if code == codes.system_busy {
		return ResponseClass::TransientServer(ServerFault { code, message: message(), busy: true });
	}
	if code != 0 {
		return ResponseClass::TransientServer(ServerFault {
			code,
			message: message(),
			busy: false,
		});
	}
	if response.access_token.is_empty() {
		return ResponseClass::Malformed(MalformedReason::MissingAccessToken);
	}

	ResponseClass::Success {
		access_token: response.access_token.clone(),
		expires_in_secs: response.expires_in_secs,
	}
}
