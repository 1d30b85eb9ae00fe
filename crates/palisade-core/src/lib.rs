//! Palisade Core - request inspection and sanitization.
//!
//! The inspection pipeline for the Palisade gateway: a pattern catalog
//! shared by a [`Classifier`] (inbound text, blocks) and a [`Redactor`]
//! (outbound text, substitutes), orchestrated per request by
//! [`GatewayPolicy`] with accounting in [`SecurityStats`].
//!
//! This crate knows nothing about HTTP. The surrounding web layer hands it
//! plain text and acts on the returned [`Decision`] or [`Redaction`].
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use palisade_core::{GatewayPolicy, SecurityStats};
//!
//! let stats = Arc::new(SecurityStats::new());
//! let policy = GatewayPolicy::new(stats.clone());
//!
//! let decision = policy.inspect("password: hunter2");
//! assert!(decision.is_blocked());
//!
//! let sanitized = policy.sanitize("api_key: sk-1234567890abcdefghij");
//! assert_eq!(sanitized.text, "api_key: [REDACTED]");
//! ```

pub mod classifier;
pub mod patterns;
pub mod policy;
pub mod redactor;
pub mod stats;

pub use classifier::{Classification, Classifier};
pub use patterns::{PatternCatalog, PatternError, PatternRule, RuleCategory};
pub use policy::{BlockReason, Decision, GatewayPolicy};
pub use redactor::{Redaction, Redactor, REDACTED_MARKER};
pub use stats::{SecurityStats, StatsSnapshot};
