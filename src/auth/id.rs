//! Strongly typed identifiers for the application identity.

// std
use std::{borrow::Borrow, ops::Deref};
// self
use crate::_prelude::*;

const IDENTIFIER_MAX_LEN: usize = 128;

/// Error returned when identifier validation fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum IdentifierError {
	/// The identifier was empty.
	#[error("{kind} identifier cannot be empty.")]
	Empty {
		/// Kind of identifier (corp, secret).
		kind: &'static str,
	},
	/// The identifier contains whitespace characters.
	#[error("{kind} identifier contains whitespace.")]
	ContainsWhitespace {
		/// Kind of identifier (corp, secret).
		kind: &'static str,
	},
	/// The identifier exceeded the allowed character count.
	#[error("{kind} identifier exceeds {max} characters.")]
	TooLong {
		/// Kind of identifier (corp, secret).
		kind: &'static str,
		/// Maximum permitted character count.
		max: usize,
	},
}

/// Corporation identifier issued by the authorization service (`corpid`).
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CorpId(String);
impl CorpId {
	/// Creates a new identifier after validation.
	pub fn new(value: impl AsRef<str>) -> Result<Self, IdentifierError> {
		let view = value.as_ref();

		validate_view("Corp", view)?;

		Ok(Self(view.to_owned()))
	}
}
impl Deref for CorpId {
	type Target = str;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
impl AsRef<str> for CorpId {
	fn as_ref(&self) -> &str {
		&self.0
	}
}
impl Borrow<str> for CorpId {
	fn borrow(&self) -> &str {
		&self.0
	}
}
impl From<CorpId> for String {
	fn from(value: CorpId) -> Self {
		value.0
	}
}
impl TryFrom<String> for CorpId {
	type Error = IdentifierError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		validate_view("Corp", &value)?;

		Ok(Self(value))
	}
}
impl FromStr for CorpId {
	type Err = IdentifierError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::new(s)
	}
}
impl Debug for CorpId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "Corp({})", self.0)
	}
}
impl Display for CorpId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}

/// Numeric application (agent) identifier inside a corporation.
///
/// Token issuance does not need it, but it partitions the cache: each agent owns its own
/// secret and therefore its own access token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentId(i64);
impl AgentId {
	/// Wraps a raw agent identifier.
	pub const fn new(value: i64) -> Self {
		Self(value)
	}

	/// Returns the raw numeric value.
	pub const fn get(self) -> i64 {
		self.0
	}
}
impl From<i64> for AgentId {
	fn from(value: i64) -> Self {
		Self(value)
	}
}
impl Display for AgentId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		Display::fmt(&self.0, f)
	}
}

pub(crate) fn validate_view(kind: &'static str, view: &str) -> Result<(), IdentifierError> {
	if view.is_empty() {
		return Err(IdentifierError::Empty { kind });
	}
	if view.chars().any(char::is_whitespace) {
		return Err(IdentifierError::ContainsWhitespace { kind });
	}
	if view.len() > IDENTIFIER_MAX_LEN {
		return Err(IdentifierError::TooLong { kind, max: IDENTIFIER_MAX_LEN });
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn corp_ids_reject_whitespace_and_empty_values() {
		assert!(CorpId::new(" ww123").is_err(), "Leading whitespace must be rejected.");
		assert!(CorpId::new("ww123 ").is_err(), "Trailing whitespace must be rejected.");
		assert_eq!(CorpId::new(""), Err(IdentifierError::Empty { kind: "Corp" }));

		let corp = CorpId::new("ww8a1b2c3d").expect("Corp fixture should be considered valid.");

		assert_eq!(corp.as_ref(), "ww8a1b2c3d");
		assert_eq!(format!("{corp:?}"), "Corp(ww8a1b2c3d)");
	}

	#[test]
	fn deserialization_enforces_validation() {
		let corp: CorpId =
			serde_json::from_str("\"ww42\"").expect("Corp id should deserialize successfully.");

		assert_eq!(corp.as_ref(), "ww42");
		assert!(serde_json::from_str::<CorpId>("\"with space\"").is_err());

		let too_long = format!("\"{}\"", "a".repeat(IDENTIFIER_MAX_LEN + 1));

		assert!(serde_json::from_str::<CorpId>(&too_long).is_err());
	}

	#[test]
	fn agent_ids_are_transparent_numbers() {
		let agent: AgentId =
			serde_json::from_str("1000002").expect("Agent id should deserialize from a number.");

		assert_eq!(agent, AgentId::new(1_000_002));
		assert_eq!(agent.to_string(), "1000002");
	}
}
