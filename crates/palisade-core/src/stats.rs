//! Process-wide security counters.
//!
//! Counters use relaxed atomics: under concurrent load the totals are a
//! metrics signal, not security-critical accounting. They start at zero,
//! are never reset, and are read through [`SecurityStats::snapshot`].

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Shared mutable security counters.
///
/// Owned explicitly by the caller (typically behind an `Arc`) and injected
/// into the policy orchestrator, so tests can instantiate isolated instances.
#[derive(Debug, Default)]
pub struct SecurityStats {
    requests_total: AtomicU64,
    blocked_requests: AtomicU64,
    secrets_detected: AtomicU64,
    injections_blocked: AtomicU64,
    rate_limits_hit: AtomicU64,
}

impl SecurityStats {
    /// Creates a new set of zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a request reaching the classifier.
    pub fn record_request(&self) {
        self.requests_total.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a blocked request.
    pub fn record_block(&self) {
        self.blocked_requests.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a secret-pattern detection.
    pub fn record_secret_detected(&self) {
        self.secrets_detected.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a prompt-injection detection.
    pub fn record_injection_blocked(&self) {
        self.injections_blocked.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a rate-limit rejection.
    ///
    /// The gateway core does not rate-limit; this is a hook for an outer
    /// HTTP layer that does.
    pub fn record_rate_limit_hit(&self) {
        self.rate_limits_hit.fetch_add(1, Ordering::Relaxed);
    }

    /// Returns a point-in-time copy of all counters.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            requests_total: self.requests_total.load(Ordering::Relaxed),
            blocked_requests: self.blocked_requests.load(Ordering::Relaxed),
            secrets_detected: self.secrets_detected.load(Ordering::Relaxed),
            injections_blocked: self.injections_blocked.load(Ordering::Relaxed),
            rate_limits_hit: self.rate_limits_hit.load(Ordering::Relaxed),
        }
    }
}

/// Read-only snapshot of [`SecurityStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    /// Requests that reached the classifier.
    pub requests_total: u64,
    /// Requests denied by policy.
    pub blocked_requests: u64,
    /// Classifications that matched a secret rule.
    pub secrets_detected: u64,
    /// Classifications that matched an injection rule.
    pub injections_blocked: u64,
    /// Requests rejected by an outer rate limiter.
    pub rate_limits_hit: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_start_at_zero() {
        let stats = SecurityStats::new();
        assert_eq!(stats.snapshot(), StatsSnapshot::default());
    }

    #[test]
    fn counters_increment_independently() {
        let stats = SecurityStats::new();
        stats.record_request();
        stats.record_request();
        stats.record_block();
        stats.record_secret_detected();
        stats.record_injection_blocked();
        stats.record_rate_limit_hit();

        let snap = stats.snapshot();
        assert_eq!(snap.requests_total, 2);
        assert_eq!(snap.blocked_requests, 1);
        assert_eq!(snap.secrets_detected, 1);
        assert_eq!(snap.injections_blocked, 1);
        assert_eq!(snap.rate_limits_hit, 1);
    }

    #[test]
    fn snapshot_serializes_all_fields() {
        let stats = SecurityStats::new();
        stats.record_request();
        let json = serde_json::to_value(stats.snapshot()).unwrap();
        assert_eq!(json["requests_total"], 1);
        assert_eq!(json["blocked_requests"], 0);
        assert_eq!(json["rate_limits_hit"], 0);
    }

    #[test]
    fn concurrent_increments_are_all_counted() {
        use std::sync::Arc;
        use std::thread;

        let stats = Arc::new(SecurityStats::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let s = stats.clone();
                thread::spawn(move || {
                    for _ in 0..100 {
                        s.record_request();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(stats.snapshot().requests_total, 800);
    }
}
