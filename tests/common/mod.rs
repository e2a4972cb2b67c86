//! Shared fixtures for manager integration tests.

#![allow(dead_code)]

// std
use std::{
	sync::{
		Arc,
		atomic::{AtomicBool, AtomicUsize, Ordering},
	},
	time::Duration as StdDuration,
};
// crates.io
use parking_lot::Mutex;
use time::Duration;
// self
use wecom_token::{
	TokenManager,
	auth::ApplicationIdentity,
	cache::{CacheError, CacheFuture, CacheKey, MemoryCache, TokenCache},
	error::TransportError,
	http::{AuthorizerFuture, TokenAuthorizer},
	response::{AuthorizationResponse, TokenExchange},
};

pub const AGENT_ID: i64 = 1_000_002;

pub fn identity() -> ApplicationIdentity {
	ApplicationIdentity::parse("ww-corp", "s3cret", AGENT_ID)
		.expect("Identity fixture should be valid.")
}

pub fn manager(authorizer: Arc<CountingAuthorizer>, cache: Arc<RecordingCache>) -> TokenManager {
	TokenManager::with_authorizer(identity(), cache, authorizer)
}

enum Reply {
	/// Issues `<prefix>-<call number>` with the given lifetime.
	Token { prefix: &'static str, expires_in_secs: i64 },
	/// Returns a fixed exchange.
	Fixed(TokenExchange),
	/// Fails at the transport layer.
	Unreachable,
}

/// Authorizer that counts invocations and optionally stalls before replying.
pub struct CountingAuthorizer {
	reply: Reply,
	delay: Option<StdDuration>,
	calls: AtomicUsize,
	in_flight: AtomicUsize,
	peak_in_flight: AtomicUsize,
}
impl CountingAuthorizer {
	pub fn issuing(prefix: &'static str, expires_in_secs: i64) -> Self {
		Self::from_reply(Reply::Token { prefix, expires_in_secs })
	}

	pub fn responding(response: AuthorizationResponse, body_len: usize) -> Self {
		Self::from_reply(Reply::Fixed(TokenExchange::new(response, body_len)))
	}

	pub fn error_code(code: i64, message: &str) -> Self {
		let response = AuthorizationResponse {
			error_code: code,
			error_message: message.into(),
			..Default::default()
		};

		Self::responding(response, 48)
	}

	pub fn unreachable() -> Self {
		Self::from_reply(Reply::Unreachable)
	}

	pub fn with_delay(mut self, delay: StdDuration) -> Self {
		self.delay = Some(delay);

		self
	}

	pub fn calls(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}

	/// Highest number of fetches observed running at the same time.
	pub fn peak_in_flight(&self) -> usize {
		self.peak_in_flight.load(Ordering::SeqCst)
	}

	fn from_reply(reply: Reply) -> Self {
		Self {
			reply,
			delay: None,
			calls: AtomicUsize::new(0),
			in_flight: AtomicUsize::new(0),
			peak_in_flight: AtomicUsize::new(0),
		}
	}
}
impl TokenAuthorizer for CountingAuthorizer {
	fn fetch<'a>(&'a self, _identity: &'a ApplicationIdentity) -> AuthorizerFuture<'a> {
		Box::pin(async move {
			let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
			let in_flight = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;

			self.peak_in_flight.fetch_max(in_flight, Ordering::SeqCst);

			if let Some(delay) = self.delay {
				tokio::time::sleep(delay).await;
			}

			self.in_flight.fetch_sub(1, Ordering::SeqCst);

			match &self.reply {
				Reply::Token { prefix, expires_in_secs } => {
					let response = AuthorizationResponse {
						error_code: 0,
						error_message: "ok".into(),
						access_token: format!("{prefix}-{call}"),
						expires_in_secs: *expires_in_secs,
					};

					Ok(TokenExchange::new(response, 96))
				},
				Reply::Fixed(exchange) => Ok(exchange.clone()),
				Reply::Unreachable => Err(TransportError::Io(std::io::Error::new(
					std::io::ErrorKind::ConnectionRefused,
					"connection refused",
				))
				.into()),
			}
		})
	}
}

/// [`MemoryCache`] wrapper that records writes and can be told to fail.
#[derive(Default)]
pub struct RecordingCache {
	inner: MemoryCache,
	sets: Mutex<Vec<(String, String, Duration)>>,
	fail_sets: AtomicBool,
	fail_gets: AtomicBool,
}
impl RecordingCache {
	pub fn failing_sets() -> Self {
		let cache = Self::default();

		cache.fail_sets.store(true, Ordering::SeqCst);

		cache
	}

	pub fn failing_gets() -> Self {
		let cache = Self::default();

		cache.fail_gets.store(true, Ordering::SeqCst);

		cache
	}

	pub async fn seed(&self, key: &CacheKey, value: &str) {
		self.inner
			.set(key, value.into(), Duration::seconds(600))
			.await
			.expect("Seeding the cache should succeed.");
	}

	pub fn sets(&self) -> Vec<(String, String, Duration)> {
		self.sets.lock().clone()
	}
}
impl TokenCache for RecordingCache {
	fn get<'a>(&'a self, key: &'a CacheKey) -> CacheFuture<'a, Option<String>> {
		if self.fail_gets.load(Ordering::SeqCst) {
			return Box::pin(async {
				Err(CacheError::Backend { message: "cache offline".into() })
			});
		}

		self.inner.get(key)
	}

	fn set<'a>(&'a self, key: &'a CacheKey, value: String, ttl: Duration) -> CacheFuture<'a, ()> {
		self.sets.lock().push((key.to_string(), value.clone(), ttl));

		if self.fail_sets.load(Ordering::SeqCst) {
			return Box::pin(async {
				Err(CacheError::Backend { message: "cache is read-only".into() })
			});
		}

		self.inner.set(key, value, ttl)
	}
}
