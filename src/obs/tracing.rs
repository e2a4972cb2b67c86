// self
use crate::{_prelude::*, auth::AgentId};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedAcquire<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedAcquire<F> = F;

/// A span builder used around token acquisition.
#[derive(Clone, Debug)]
pub struct TokenSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl TokenSpan {
	/// Creates a new span tagged with the agent and call site.
	pub fn new(agent_id: AgentId, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("wecom_token.acquire", agent_id = agent_id.get(), stage);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (agent_id, stage);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedAcquire<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Logs a freshly cached token's TTL.
pub fn report_cached(ttl: Duration) {
	#[cfg(feature = "tracing")]
	{
		tracing::debug!(ttl_secs = ttl.whole_seconds(), "cached freshly issued access token");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = ttl;
	}
}

/// Logs an acquisition failure; configuration problems are raised at `error` level.
pub fn report_failure(error: &Error) {
	#[cfg(feature = "tracing")]
	{
		if error.is_retryable() {
			tracing::warn!(%error, "access token acquisition failed");
		} else {
			tracing::error!(%error, "access token acquisition failed; check configuration");
		}
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = error;
	}
}
