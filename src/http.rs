//! Remote authorizer port and its reqwest-backed implementation.
//!
//! [`TokenAuthorizer`] is the manager's only dependency on the network. Implementations
//! perform exactly one exchange per call and never retry; transport failures surface as
//! [`Error::Transport`], while application-level error codes travel inside the returned
//! [`TokenExchange`] for the classifier to judge.

// self
use crate::{_prelude::*, auth::ApplicationIdentity, response::TokenExchange};
#[cfg(feature = "reqwest")]
use crate::{
	config::AuthorizerConfig,
	error::{ConfigError, TransportError},
};

/// Boxed future returned by [`TokenAuthorizer::fetch`].
pub type AuthorizerFuture<'a> = Pin<Box<dyn Future<Output = Result<TokenExchange>> + 'a + Send>>;

/// Exchanges application credentials for an access token.
pub trait TokenAuthorizer
where
	Self: Send + Sync,
{
	/// Performs one exchange for `identity`.
	fn fetch<'a>(&'a self, identity: &'a ApplicationIdentity) -> AuthorizerFuture<'a>;
}

/// Authorizer that calls the `gettoken` endpoint over reqwest.
///
/// Redirects are never followed, so the secret-bearing query string only reaches the configured
/// endpoint; a custom [`ReqwestClient`] passed to [`ReqwestAuthorizer::with_client`] should be
/// built the same way. Request timeouts belong to the client, not to the manager.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug)]
pub struct ReqwestAuthorizer {
	client: ReqwestClient,
	endpoint: Url,
}
#[cfg(feature = "reqwest")]
impl ReqwestAuthorizer {
	/// Creates an authorizer targeting the default WeCom endpoint.
	///
	/// Panics under the same conditions as [`ReqwestClient::new`]; use
	/// [`ReqwestAuthorizer::from_config`] to handle client construction errors.
	pub fn new() -> Self {
		let client = client_builder().build().unwrap_or_default();

		Self { client, endpoint: AuthorizerConfig::default_endpoint() }
	}

	/// Builds an authorizer from configuration, applying the optional request timeout.
	pub fn from_config(config: &AuthorizerConfig) -> Result<Self> {
		let mut builder = client_builder();

		if let Some(timeout) = config.timeout() {
			builder = builder.timeout(timeout);
		}

		let client = builder.build().map_err(ConfigError::from)?;

		Ok(Self { client, endpoint: config.endpoint.clone() })
	}

	/// Replaces the underlying reqwest client.
	pub fn with_client(mut self, client: ReqwestClient) -> Self {
		self.client = client;

		self
	}

	/// Points the authorizer at a different endpoint.
	pub fn with_endpoint(mut self, endpoint: Url) -> Self {
		self.endpoint = endpoint;

		self
	}

	/// Returns the endpoint being called.
	pub fn endpoint(&self) -> &Url {
		&self.endpoint
	}

	async fn exchange(&self, identity: &ApplicationIdentity) -> Result<TokenExchange> {
		let response = self
			.client
			.get(self.endpoint.clone())
			.query(&[
				("corpid", identity.corp_id.as_ref()),
				("corpsecret", identity.corp_secret.expose()),
			])
			.send()
			.await
			.map_err(TransportError::from)?;
		let status = response.status().as_u16();
		let body = response.bytes().await.map_err(TransportError::from)?;

		TokenExchange::from_body(&body, Some(status))
	}
}
#[cfg(feature = "reqwest")]
impl Default for ReqwestAuthorizer {
	fn default() -> Self {
		Self::new()
	}
}
#[cfg(feature = "reqwest")]
impl TokenAuthorizer for ReqwestAuthorizer {
	fn fetch<'a>(&'a self, identity: &'a ApplicationIdentity) -> AuthorizerFuture<'a> {
		Box::pin(self.exchange(identity))
	}
}

#[cfg(feature = "reqwest")]
fn client_builder() -> reqwest::ClientBuilder {
	ReqwestClient::builder().redirect(reqwest::redirect::Policy::none())
}
