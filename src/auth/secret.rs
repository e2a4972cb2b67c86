//! Secret wrappers that redact sensitive material.

// self
use crate::{
	_prelude::*,
	auth::{IdentifierError, id},
};

/// Application secret (`corpsecret`) paired with a corp identifier.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct CorpSecret(String);
impl CorpSecret {
	/// Wraps a secret after checking it is non-empty and free of whitespace.
	pub fn new(value: impl Into<String>) -> Result<Self, IdentifierError> {
		Self::try_from(value.into())
	}

	/// Returns the raw secret. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl TryFrom<String> for CorpSecret {
	type Error = IdentifierError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		id::validate_view("Secret", &value)?;

		Ok(Self(value))
	}
}
impl Debug for CorpSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("CorpSecret").field(&"<redacted>").finish()
	}
}
impl Display for CorpSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// Bearer token handed out by [`TokenManager::get_token`](crate::TokenManager::get_token).
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct AccessToken(String);
impl AccessToken {
	/// Wraps a token string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the token value for embedding into downstream requests.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl AsRef<str> for AccessToken {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for AccessToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("AccessToken").field(&"<redacted>").finish()
	}
}
impl Display for AccessToken {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn secret_formatters_redact() {
		let secret = CorpSecret::new("super-secret").expect("Secret fixture should be valid.");
		let token = AccessToken::new("bearer-value");

		assert_eq!(format!("{secret:?}"), "CorpSecret(\"<redacted>\")");
		assert_eq!(format!("{secret}"), "<redacted>");
		assert_eq!(format!("{token:?}"), "AccessToken(\"<redacted>\")");
		assert_eq!(format!("{token}"), "<redacted>");
		assert_eq!(token.expose(), "bearer-value");
	}

	#[test]
	fn empty_secrets_are_rejected() {
		assert_eq!(CorpSecret::new(""), Err(IdentifierError::Empty { kind: "Secret" }));
		assert!(serde_json::from_str::<CorpSecret>("\"\"").is_err());
	}
}
