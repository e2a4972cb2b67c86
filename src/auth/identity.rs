//! Application identity: the credential tuple a [`TokenManager`](crate::TokenManager) manages.

// self
use crate::{
	_prelude::*,
	auth::{AgentId, CorpId, CorpSecret, IdentifierError},
	cache::CacheKey,
};

/// Identifies which credential is being managed (`corpid`, `corpsecret`, `agentid`).
///
/// The identity is immutable once a manager is built for it; the derived [`CacheKey`] stays
/// stable for the identity's lifetime.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct ApplicationIdentity {
	/// Corporation identifier.
	pub corp_id: CorpId,
	/// Application secret bound to the agent.
	pub corp_secret: CorpSecret,
	/// Agent (application) identifier.
	pub agent_id: AgentId,
}
impl ApplicationIdentity {
	/// Creates an identity from pre-validated parts.
	pub fn new(corp_id: CorpId, corp_secret: CorpSecret, agent_id: impl Into<AgentId>) -> Self {
		Self { corp_id, corp_secret, agent_id: agent_id.into() }
	}

	/// Validates raw strings and builds an identity.
	pub fn parse(
		corp_id: impl AsRef<str>,
		corp_secret: impl Into<String>,
		agent_id: i64,
	) -> Result<Self, IdentifierError> {
		Ok(Self::new(CorpId::new(corp_id)?, CorpSecret::new(corp_secret)?, agent_id))
	}

	/// Returns the cache key under which this identity's token lives.
	pub fn cache_key(&self) -> CacheKey {
		CacheKey::for_agent(self.agent_id)
	}
}
impl Debug for ApplicationIdentity {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ApplicationIdentity")
			.field("corp_id", &self.corp_id)
			.field("corp_secret", &self.corp_secret)
			.field("agent_id", &self.agent_id)
			.finish()
	}
}
