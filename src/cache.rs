//! Cache port contract and the built-in in-memory implementation.
//!
//! The manager only relies on `get`/`set` with a per-entry TTL. A cache never distinguishes
//! "never set" from "expired": both read as absent.

pub mod memory;

pub use memory::MemoryCache;

// self
use crate::{_prelude::*, auth::AgentId};

/// Boxed future returned by [`TokenCache`] operations.
pub type CacheFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, CacheError>> + 'a + Send>>;

/// Key/value store with per-entry time-to-live used to share access tokens.
pub trait TokenCache
where
	Self: Send + Sync,
{
	/// Returns the live value stored under `key`, or `None` when absent or expired.
	fn get<'a>(&'a self, key: &'a CacheKey) -> CacheFuture<'a, Option<String>>;

	/// Stores `value` under `key` for `ttl`.
	///
	/// The TTL is expressed in whole seconds and must be positive; implementations reject
	/// anything else with [`CacheError::InvalidTtl`].
	fn set<'a>(&'a self, key: &'a CacheKey, value: String, ttl: Duration) -> CacheFuture<'a, ()>;
}

/// Error type produced by [`TokenCache`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum CacheError {
	/// TTL was zero, negative, or not a whole number of seconds.
	#[error("Cache TTL must be a positive whole number of seconds, got {ttl_secs}s.")]
	InvalidTtl {
		/// Rejected TTL, truncated to whole seconds.
		ttl_secs: i64,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}
impl CacheError {
	/// Returns [`CacheError::InvalidTtl`] unless `ttl` is a positive whole number of seconds.
	pub fn check_ttl(ttl: Duration) -> Result<(), Self> {
		if ttl.is_positive() && ttl.subsec_nanoseconds() == 0 {
			Ok(())
		} else {
			Err(Self::InvalidTtl { ttl_secs: ttl.whole_seconds() })
		}
	}
}

/// Deterministic, human-readable key under which an agent's token is cached.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CacheKey(String);
impl CacheKey {
	const ACCESS_TOKEN_PREFIX: &'static str = "access_token_";

	/// Builds the access-token key for an agent (`access_token_<agent_id>`).
	pub fn for_agent(agent_id: AgentId) -> Self {
		Self(format!("{}{agent_id}", Self::ACCESS_TOKEN_PREFIX))
	}

	/// Returns the key as a string slice.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}
impl AsRef<str> for CacheKey {
	fn as_ref(&self) -> &str {
		&self.0
	}
}
impl Display for CacheKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn cache_error_converts_into_crate_error_with_source() {
		let cache_error = CacheError::Backend { message: "redis unreachable".into() };
		let error: Error = cache_error.clone().into();

		assert!(matches!(error, Error::Cache(_)));
		assert!(error.to_string().contains("redis unreachable"));

		let source = StdError::source(&error)
			.expect("Crate error should expose the original cache error as its source.");

		assert_eq!(source.to_string(), cache_error.to_string());
	}

	#[test]
	fn ttl_must_be_positive_whole_seconds() {
		assert_eq!(CacheError::check_ttl(Duration::seconds(5700)), Ok(()));
		assert_eq!(
			CacheError::check_ttl(Duration::ZERO),
			Err(CacheError::InvalidTtl { ttl_secs: 0 })
		);
		assert_eq!(
			CacheError::check_ttl(Duration::seconds(-3)),
			Err(CacheError::InvalidTtl { ttl_secs: -3 })
		);
		assert!(CacheError::check_ttl(Duration::milliseconds(1_500)).is_err());
	}

	#[test]
	fn keys_are_stable_per_agent() {
		let key = CacheKey::for_agent(AgentId::new(1_000_002));

		assert_eq!(key.as_str(), "access_token_1000002");
		assert_eq!(key, CacheKey::for_agent(AgentId::new(1_000_002)));
		assert_ne!(key, CacheKey::for_agent(AgentId::new(1_000_003)));
	}
}
