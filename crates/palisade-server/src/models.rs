//! API response models.

use chrono::{DateTime, Utc};
use palisade_core::{BlockReason, StatsSnapshot};
use serde::{Deserialize, Serialize};

/// Security policy identifier reported on blocked requests.
pub const SECURITY_POLICY: &str = "Palisade v1.0";

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always "healthy" when the process is serving.
    pub status: &'static str,
    /// Service identifier.
    pub service: &'static str,
    /// Current time.
    pub timestamp: DateTime<Utc>,
    /// Whether inspection is active.
    pub security_status: &'static str,
}

/// Response body for GET /metrics.
#[derive(Debug, Serialize)]
pub struct MetricsResponse {
    /// Security counters.
    #[serde(flatten)]
    pub stats: StatsSnapshot,
    /// Seconds since process start.
    pub uptime_seconds: u64,
    /// Current time.
    pub timestamp: DateTime<Utc>,
}

/// Response body for requests denied by the security policy.
#[derive(Debug, Serialize, Deserialize)]
pub struct BlockedResponse {
    /// Human-readable denial message.
    pub error: String,
    /// Machine-readable denial reason.
    pub blocked_reason: BlockReason,
    /// Policy identifier.
    pub security_policy: String,
}

/// Response body for the security demo endpoints.
#[derive(Debug, Serialize)]
pub struct TestEndpointResponse {
    /// Description of what the endpoint demonstrates.
    pub error: &'static str,
    /// Example queries that trip the corresponding detector.
    pub test_queries: Vec<&'static str>,
}
