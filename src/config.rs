//! Deserializable configuration for building a [`TokenManager`](crate::TokenManager).
//!
//! Applications embed [`TokenConfig`] in their own settings file; every field other than the
//! identity has a default.

// std
use std::time::Duration as StdDuration;
// self
use crate::{_prelude::*, auth::ApplicationIdentity, classify::ErrorCodes};

/// Seconds subtracted from the server-declared lifetime before caching a token.
pub const DEFAULT_SAFETY_MARGIN_SECS: i64 = 1_500;

const DEFAULT_ENDPOINT: &str = "https://qyapi.weixin.qq.com/cgi-bin/gettoken";

/// Top-level settings for one managed credential.
#[derive(Clone, Debug, Deserialize)]
pub struct TokenConfig {
	/// Credential to manage.
	pub identity: ApplicationIdentity,
	/// Safety margin in seconds (defaults to [`DEFAULT_SAFETY_MARGIN_SECS`]).
	#[serde(default = "default_safety_margin_secs")]
	pub safety_margin_secs: i64,
	/// Remote authorizer settings.
	#[serde(default)]
	pub authorizer: AuthorizerConfig,
	/// Vendor error-code table used for classification.
	#[serde(default)]
	pub error_codes: ErrorCodes,
}
impl TokenConfig {
	/// Returns the safety margin as a [`Duration`].
	pub fn safety_margin(&self) -> Duration {
		Duration::seconds(self.safety_margin_secs)
	}
}

/// Settings for the HTTP authorizer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizerConfig {
	/// Full URL of the `gettoken` endpoint.
	#[serde(default = "AuthorizerConfig::default_endpoint")]
	pub endpoint: Url,
	/// Optional whole-request timeout in seconds.
	#[serde(default)]
	pub timeout_secs: Option<u64>,
}
impl AuthorizerConfig {
	/// Returns the default WeCom `gettoken` endpoint.
	pub fn default_endpoint() -> Url {
		Url::parse(DEFAULT_ENDPOINT).expect("Default authorizer endpoint must be a valid URL.")
	}

	/// Returns the configured request timeout, if any.
	pub fn timeout(&self) -> Option<StdDuration> {
		self.timeout_secs.map(StdDuration::from_secs)
	}
}
impl Default for AuthorizerConfig {
	fn default() -> Self {
		Self { endpoint: Self::default_endpoint(), timeout_secs: None }
	}
}

fn default_safety_margin_secs() -> i64 {
	DEFAULT_SAFETY_MARGIN_SECS
}
