//! Access token manager: cache-first acquisition behind a per-identity single-flight lock.
//!
//! [`TokenManager::get_token`] takes the manager's lock, checks the cache, and only on a miss
//! asks the [`TokenAuthorizer`] for a new token. Successful responses are cached for their
//! declared lifetime minus a safety margin. Because the lock covers the whole
//! check-fetch-store sequence, at most one fetch per identity is in flight and callers queued
//! behind it are served from the cache it just filled. A failed fetch leaves the cache cold,
//! so the next queued caller makes its own (serialized) attempt.
//!
//! The lock guard is released on every exit path, including when a caller drops its
//! `get_token` future mid-fetch.

mod metrics;

pub use metrics::ManagerMetrics;

// self
use crate::{
	_prelude::*,
	auth::{AccessToken, ApplicationIdentity},
	cache::{CacheKey, TokenCache},
	classify::{DefaultResponseClassifier, ResponseClass, ResponseClassifier},
	config::{DEFAULT_SAFETY_MARGIN_SECS, TokenConfig},
	error::{MalformedReason, TransientError},
	http::TokenAuthorizer,
	obs::{self, TokenOutcome, TokenSpan},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestAuthorizer;

const MIN_SAFETY_MARGIN_SECS: i64 = 1;
/// Longest lifetime accepted from the server (one year).
const MAX_EXPIRES_IN_SECS: i64 = 365 * 24 * 60 * 60;

/// Manages the access token of one [`ApplicationIdentity`].
///
/// Clones share the lock, the ports, and the metrics, so a single manager can be handed to
/// every task that needs a token. Managers built for different identities never contend.
#[derive(Clone)]
pub struct TokenManager {
	identity: Arc<ApplicationIdentity>,
	cache_key: CacheKey,
	cache: Arc<dyn TokenCache>,
	authorizer: Arc<dyn TokenAuthorizer>,
	classifier: Arc<dyn ResponseClassifier>,
	safety_margin_secs: i64,
	metrics: Arc<ManagerMetrics>,
	fetch_guard: Arc<AsyncMutex<()>>,
}
impl TokenManager {
	/// Creates a manager that fetches through the caller-provided authorizer.
	pub fn with_authorizer(
		identity: ApplicationIdentity,
		cache: Arc<dyn TokenCache>,
		authorizer: Arc<dyn TokenAuthorizer>,
	) -> Self {
		let cache_key = identity.cache_key();

		Self {
			identity: Arc::new(identity),
			cache_key,
			cache,
			authorizer,
			classifier: Arc::new(DefaultResponseClassifier::default()),
			safety_margin_secs: DEFAULT_SAFETY_MARGIN_SECS,
			metrics: Default::default(),
			fetch_guard: Arc::new(AsyncMutex::new(())),
		}
	}

	/// Builds a manager from configuration and an explicit authorizer.
	///
	/// The authorizer settings in `config` are ignored; use [`TokenManager::from_config`] to
	/// have them applied to the reqwest authorizer.
	pub fn from_config_with(
		config: TokenConfig,
		cache: Arc<dyn TokenCache>,
		authorizer: Arc<dyn TokenAuthorizer>,
	) -> Self {
		let margin = config.safety_margin();
		let classifier = DefaultResponseClassifier::new(config.error_codes);

		Self::with_authorizer(config.identity, cache, authorizer)
			.with_safety_margin(margin)
			.with_classifier(Arc::new(classifier))
	}

	/// Overrides the safety margin (defaults to 1500 seconds).
	///
	/// The margin is truncated to whole seconds and clamped to at least one second so a cached
	/// entry always expires before the server invalidates the token.
	pub fn with_safety_margin(mut self, margin: Duration) -> Self {
		self.safety_margin_secs = margin.whole_seconds().max(MIN_SAFETY_MARGIN_SECS);

		self
	}

	/// Replaces the response classifier.
	pub fn with_classifier(mut self, classifier: Arc<dyn ResponseClassifier>) -> Self {
		self.classifier = classifier;

		self
	}

	/// Returns the managed identity.
	pub fn identity(&self) -> &ApplicationIdentity {
		&self.identity
	}

	/// Returns the cache key used for this identity.
	pub fn cache_key(&self) -> &CacheKey {
		&self.cache_key
	}

	/// Returns the effective safety margin.
	pub fn safety_margin(&self) -> Duration {
		Duration::seconds(self.safety_margin_secs)
	}

	/// Returns the in-process counters shared by all clones.
	pub fn metrics(&self) -> &ManagerMetrics {
		&self.metrics
	}

	/// Returns a valid access token, fetching and caching one if the cache is cold.
	///
	/// Errors are never retried here; see [`Error::is_retryable`] to decide whether to call
	/// again later.
	pub async fn get_token(&self) -> Result<AccessToken> {
		let span = TokenSpan::new(self.identity.agent_id, "get_token");

		obs::record_token_outcome(TokenOutcome::Attempt);
		self.metrics.record_attempt();

		let result = span.instrument(self.acquire()).await;

		if let Err(err) = &result {
			obs::record_token_outcome(TokenOutcome::Failure);
			obs::report_failure(err);
			self.metrics.record_failure();
		}

		result
	}

	async fn acquire(&self) -> Result<AccessToken> {
		let _singleflight = self.fetch_guard.lock().await;

		if let Some(token) = self.cache.get(&self.cache_key).await? {
			obs::record_token_outcome(TokenOutcome::CacheHit);
			self.metrics.record_cache_hit();

			return Ok(AccessToken::new(token));
		}

		self.metrics.record_fetch();

		let exchange = self.authorizer.fetch(&self.identity).await?;
		let (access_token, expires_in_secs) =
			match self.classifier.classify(&exchange.response, exchange.body_len) {
				ResponseClass::Success { access_token, expires_in_secs } =>
					(access_token, expires_in_secs),
				ResponseClass::FatalCredential(err) => return Err(err.into()),
				ResponseClass::TransientServer(fault) =>
					return Err(TransientError::from(fault).into()),
				ResponseClass::Malformed(reason) => return Err(TransientError::from(reason).into()),
			};
		let ttl = self.safe_ttl(expires_in_secs)?;
		let token = AccessToken::new(access_token);

		if let Err(source) = self.cache.set(&self.cache_key, token.expose().to_owned(), ttl).await {
			return Err(Error::CacheWrite { source, token });
		}

		obs::report_cached(ttl);
		obs::record_token_outcome(TokenOutcome::Fetched);

		Ok(token)
	}

	fn safe_ttl(&self, expires_in_secs: i64) -> Result<Duration> {
		let margin_secs = self.safety_margin_secs;

		if expires_in_secs > MAX_EXPIRES_IN_SECS {
			return Err(TransientError::from(MalformedReason::LifetimeOutOfRange {
				expires_in_secs,
				max_secs: MAX_EXPIRES_IN_SECS,
			})
			.into());
		}

		let ttl_secs = expires_in_secs.saturating_sub(margin_secs);

		if ttl_secs <= 0 {
			return Err(TransientError::from(MalformedReason::ImplausibleLifetime {
				expires_in_secs,
				margin_secs,
			})
			.into());
		}

		Ok(Duration::seconds(ttl_secs))
	}
}
#[cfg(feature = "reqwest")]
impl TokenManager {
	/// Creates a manager that calls the default WeCom endpoint through reqwest.
	pub fn new(identity: ApplicationIdentity, cache: Arc<dyn TokenCache>) -> Self {
		Self::with_authorizer(identity, cache, Arc::new(ReqwestAuthorizer::default()))
	}

	/// Builds a manager and its reqwest authorizer from configuration.
	pub fn from_config(config: TokenConfig, cache: Arc<dyn TokenCache>) -> Result<Self> {
		let authorizer = ReqwestAuthorizer::from_config(&config.authorizer)?;

		Ok(Self::from_config_with(config, cache, Arc::new(authorizer)))
	}
}
impl Debug for TokenManager {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenManager")
			.field("identity", &self.identity)
			.field("cache_key", &self.cache_key)
			.field("safety_margin_secs", &self.safety_margin_secs)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{
		cache::MemoryCache,
		http::AuthorizerFuture,
		response::{AuthorizationResponse, TokenExchange},
	};

	struct StaticAuthorizer(TokenExchange);
	impl TokenAuthorizer for StaticAuthorizer {
		fn fetch<'a>(&'a self, _identity: &'a ApplicationIdentity) -> AuthorizerFuture<'a> {
			let exchange = self.0.clone();

			Box::pin(async move { Ok(exchange) })
		}
	}

	fn manager(expires_in_secs: i64) -> TokenManager {
		let identity = ApplicationIdentity::parse("ww-corp", "s3cret", 1_000_002)
			.expect("Identity fixture should be valid.");
		let response = AuthorizationResponse {
			access_token: "tok".into(),
			expires_in_secs,
			..Default::default()
		};

		TokenManager::with_authorizer(
			identity,
			Arc::new(MemoryCache::default()),
			Arc::new(StaticAuthorizer(TokenExchange::new(response, 64))),
		)
	}

	#[test]
	fn safe_ttl_subtracts_the_margin() {
		let manager = manager(7_200);

		assert_eq!(manager.safe_ttl(7_200).ok(), Some(Duration::seconds(5_700)));
		assert!(matches!(
			manager.safe_ttl(1_500),
			Err(Error::Transient(TransientError::Malformed(
				MalformedReason::ImplausibleLifetime { expires_in_secs: 1_500, margin_secs: 1_500 }
			)))
		));
	}

	#[test]
	fn safe_ttl_rejects_lifetimes_beyond_a_year() {
		let manager = manager(7_200);

		assert_eq!(
			manager.safe_ttl(MAX_EXPIRES_IN_SECS).ok(),
			Some(Duration::seconds(MAX_EXPIRES_IN_SECS - 1_500))
		);
		assert!(matches!(
			manager.safe_ttl(i64::MAX),
			Err(Error::Transient(TransientError::Malformed(
				MalformedReason::LifetimeOutOfRange { expires_in_secs: i64::MAX, .. }
			)))
		));
	}

	#[test]
	fn margin_is_clamped_to_one_second() {
		let manager = manager(7_200).with_safety_margin(Duration::seconds(-30));

		assert_eq!(manager.safety_margin(), Duration::seconds(1));
		assert_eq!(manager.safe_ttl(7_200).ok(), Some(Duration::seconds(7_199)));
	}

	#[tokio::test]
	async fn clones_share_counters() {
		let manager = manager(7_200);
		let clone = manager.clone();

		manager.get_token().await.expect("First call should fetch a token.");
		clone.get_token().await.expect("Second call should hit the cache.");

		assert_eq!(manager.metrics().attempts(), 2);
		assert_eq!(manager.metrics().fetches(), 1);
		assert_eq!(manager.metrics().cache_hits(), 1);
		assert_eq!(manager.metrics().failures(), 0);
	}

	#[test]
	fn debug_output_hides_the_secret() {
		let rendered = format!("{:?}", manager(7_200));

		assert!(rendered.contains("access_token_1000002"));
		assert!(!rendered.contains("s3cret"));
	}
}
