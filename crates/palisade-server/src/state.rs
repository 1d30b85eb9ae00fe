//! Application state for the gateway server.

use std::sync::Arc;
use std::time::Instant;

use palisade_core::{GatewayPolicy, SecurityStats};

use crate::upstream::UpstreamClient;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Inspection policy over the shared pattern catalog.
    pub policy: Arc<GatewayPolicy>,
    /// Security counters, shared with the policy.
    pub stats: Arc<SecurityStats>,
    /// Client for the proxied backend.
    pub upstream: UpstreamClient,
    /// Process start, for the metrics uptime field.
    pub started_at: Instant,
}

impl AppState {
    /// Creates application state with the built-in catalog and fresh counters.
    pub fn new(upstream_url: impl Into<String>) -> Self {
        let stats = Arc::new(SecurityStats::new());
        Self::with_parts(GatewayPolicy::new(stats.clone()), stats, upstream_url)
    }

    /// Creates application state from pre-built components.
    ///
    /// The policy and stats are expected to share the same counter set;
    /// tests use this to observe the counters the policy writes.
    pub fn with_parts(
        policy: GatewayPolicy,
        stats: Arc<SecurityStats>,
        upstream_url: impl Into<String>,
    ) -> Self {
        Self {
            policy: Arc::new(policy),
            stats,
            upstream: UpstreamClient::new(upstream_url),
            started_at: Instant::now(),
        }
    }

    /// Seconds since the state was created.
    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
