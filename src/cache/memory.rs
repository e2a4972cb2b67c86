//! Thread-safe in-memory [`TokenCache`] for single-process deployments and tests.

// self
use crate::{
	_prelude::*,
	cache::{CacheError, CacheFuture, CacheKey, TokenCache},
};

type CacheMap = Arc<RwLock<HashMap<CacheKey, Entry>>>;

#[derive(Clone, Debug)]
struct Entry {
	value: String,
	expires_at: OffsetDateTime,
}

/// Process-local cache that keeps entries until their TTL elapses.
///
/// Expired entries read as absent and are pruned lazily on writes.
#[derive(Clone, Debug, Default)]
pub struct MemoryCache(CacheMap);
impl MemoryCache {
	/// Returns the number of entries still held, expired ones included.
	pub fn len(&self) -> usize {
		self.0.read().len()
	}

	/// Returns `true` when nothing is held.
	pub fn is_empty(&self) -> bool {
		self.0.read().is_empty()
	}

	pub(crate) fn get_at(&self, key: &CacheKey, now: OffsetDateTime) -> Option<String> {
		self.0.read().get(key).filter(|entry| entry.expires_at > now).map(|entry| entry.value.clone())
	}

	pub(crate) fn set_at(
		&self,
		key: &CacheKey,
		value: String,
		ttl: Duration,
		now: OffsetDateTime,
	) -> Result<(), CacheError> {
		CacheError::check_ttl(ttl)?;

		let expires_at = now
			.checked_add(ttl)
			.ok_or(CacheError::InvalidTtl { ttl_secs: ttl.whole_seconds() })?;
		let mut map = self.0.write();

		map.retain(|_, entry| entry.expires_at > now);
		map.insert(key.clone(), Entry { value, expires_at });

		Ok(())
	}
}
impl TokenCache for MemoryCache {
	fn get<'a>(&'a self, key: &'a CacheKey) -> CacheFuture<'a, Option<String>> {
		Box::pin(async move { Ok(self.get_at(key, OffsetDateTime::now_utc())) })
	}

	fn set<'a>(&'a self, key: &'a CacheKey, value: String, ttl: Duration) -> CacheFuture<'a, ()> {
		Box::pin(async move { self.set_at(key, value, ttl, OffsetDateTime::now_utc()) })
	}
}
