//! Demonstrates acquiring a cached access token through the reqwest authorizer and the
//! in-memory cache, against a local mock of the `gettoken` endpoint.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
// self
use wecom_token::{
	TokenManager,
	auth::ApplicationIdentity,
	cache::{MemoryCache, TokenCache},
	http::ReqwestAuthorizer,
	url::Url,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/cgi-bin/gettoken")
				.query_param("corpid", "ww-demo-corp")
				.query_param("corpsecret", "demo-secret");
			then.status(200).header("content-type", "application/json").body(
				"{\"errcode\":0,\"errmsg\":\"ok\",\"access_token\":\"demo-access\",\"expires_in\":7200}",
			);
		})
		.await;
	let cache: Arc<dyn TokenCache> = Arc::new(MemoryCache::default());
	let authorizer =
		ReqwestAuthorizer::new().with_endpoint(Url::parse(&server.url("/cgi-bin/gettoken"))?);
	let identity = ApplicationIdentity::parse("ww-demo-corp", "demo-secret", 1_000_002)?;
	let manager = TokenManager::with_authorizer(identity, cache, Arc::new(authorizer));
	let first = manager.get_token().await?;
	let second = manager.get_token().await?;

	println!("Access token: {}.", first.expose());
	println!("Served from cache on the second call: {}.", first == second);
	println!("Metrics: {:?}.", manager.metrics());

	token_mock.assert_async().await;

	Ok(())
}
