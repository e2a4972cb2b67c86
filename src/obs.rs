//! Optional observability helpers for token acquisition.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to wrap each acquisition in a span named `wecom_token.acquire` with the
//!   `agent_id` and `stage` fields, and to log failures (credential rejections at `error`,
//!   everything else at `warn`).
//! - Enable `metrics` to increment the `wecom_token_requests_total` counter for every
//!   attempt/cache hit/fetch/failure, labeled by `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Outcome labels recorded for each `get_token` call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenOutcome {
	/// Entry to `get_token`.
	Attempt,
	/// Served from the cache without a network call.
	CacheHit,
	/// Fetched from the authorization server and cached.
	Fetched,
	/// Failure propagated back to the caller.
	Failure,
}
impl TokenOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			TokenOutcome::Attempt => "attempt",
			TokenOutcome::CacheHit => "cache_hit",
			TokenOutcome::Fetched => "fetched",
			TokenOutcome::Failure => "failure",
		}
	}
}
impl Display for TokenOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
