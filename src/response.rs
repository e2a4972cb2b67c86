//! Wire types returned by the authorization endpoint.

// self
use crate::{_prelude::*, error::TransientError};

/// Structured body of a `gettoken` response.
///
/// Missing fields default to zero/empty so vendor error bodies (which omit the token fields)
/// decode the same way as successful ones.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthorizationResponse {
	/// `0` on success, otherwise a vendor error code.
	#[serde(rename = "errcode")]
	pub error_code: i64,
	/// Human-readable vendor message.
	#[serde(rename = "errmsg")]
	pub error_message: String,
	/// Issued access token; empty on failure.
	pub access_token: String,
	/// Server-declared token lifetime in seconds.
	#[serde(rename = "expires_in")]
	pub expires_in_secs: i64,
}

/// Result of one exchange with the authorization endpoint.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TokenExchange {
	/// Decoded response body.
	pub response: AuthorizationResponse,
	/// Length of the raw response body in bytes.
	pub body_len: usize,
}
impl TokenExchange {
	/// Wraps an already decoded response.
	pub fn new(response: AuthorizationResponse, body_len: usize) -> Self {
		Self { response, body_len }
	}

	/// Decodes a raw response body.
	///
	/// An empty body yields a default response with `body_len == 0`, leaving the verdict to the
	/// classifier. A non-empty body that is not valid JSON fails with
	/// [`TransientError::ResponseParse`].
	pub fn from_body(body: &[u8], status: Option<u16>) -> Result<Self> {
		if body.is_empty() {
			return Ok(Self::default());
		}

		let mut deserializer = serde_json::Deserializer::from_slice(body);
		let response = serde_path_to_error::deserialize(&mut deserializer)
			.map_err(|source| TransientError::ResponseParse { source, status })?;

		Ok(Self { response, body_len: body.len() })
	}
}
