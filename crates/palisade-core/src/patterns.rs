//! The pattern catalog: the rule table shared by the classifier and redactor.
//!
//! Rules are data, not control flow: the catalog is an ordered list of
//! compiled patterns built once at startup, and both matching and redaction
//! iterate over it without knowing what the individual rules look for. New
//! rules can be appended without touching either algorithm.

use regex::{Regex, RegexBuilder};
use thiserror::Error;

/// Name of the optional capture group that marks the key/label portion of a
/// secret match. Redaction preserves this group and replaces the rest.
pub const LABEL_GROUP: &str = "label";

/// Pattern errors.
#[derive(Debug, Error)]
pub enum PatternError {
    /// The rule's matching expression failed to compile.
    #[error("invalid pattern for rule '{kind}': {source}")]
    InvalidPattern {
        /// The sub-kind label of the offending rule.
        kind: String,
        /// The underlying regex error.
        #[source]
        source: regex::Error,
    },
}

/// Category of content a rule detects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleCategory {
    /// Embedded credentials: API keys, passwords, tokens.
    Secret,
    /// Prompt-injection phrasing aimed at an LLM-consuming client.
    Injection,
}

impl RuleCategory {
    /// Returns the category as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Secret => "secret",
            Self::Injection => "injection",
        }
    }
}

/// A single immutable detection rule.
#[derive(Debug, Clone)]
pub struct PatternRule {
    category: RuleCategory,
    kind: String,
    regex: Regex,
    has_label: bool,
}

impl PatternRule {
    /// Compiles a new rule from a matching expression.
    ///
    /// The expression is compiled case-insensitively. If it contains a
    /// `label` named capture group, redaction will preserve the captured
    /// key/label text and replace only the remainder of the match.
    pub fn new(
        category: RuleCategory,
        kind: impl Into<String>,
        pattern: &str,
    ) -> Result<Self, PatternError> {
        let kind = kind.into();
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|source| PatternError::InvalidPattern {
                kind: kind.clone(),
                source,
            })?;
        let has_label = regex.capture_names().any(|n| n == Some(LABEL_GROUP));
        Ok(Self {
            category,
            kind,
            regex,
            has_label,
        })
    }

    /// Returns the rule's category.
    pub fn category(&self) -> RuleCategory {
        self.category
    }

    /// Returns the rule's sub-kind label (e.g. `"api_key"`).
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Returns the compiled matching expression.
    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    /// Returns true if the rule captures a key/label group.
    pub fn has_label(&self) -> bool {
        self.has_label
    }

    /// Returns true if the rule matches anywhere in the text.
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

/// Ordered, immutable collection of detection rules.
///
/// Order is significant: the first matching rule wins during classification,
/// and redaction applies rules in catalog order.
#[derive(Debug, Clone, Default)]
pub struct PatternCatalog {
    rules: Vec<PatternRule>,
}

impl PatternCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the built-in catalog of secret and injection rules.
    pub fn builtin() -> Self {
        let mut catalog = Self::new();
        for (kind, pattern) in BUILTIN_SECRET_PATTERNS {
            catalog.push(
                PatternRule::new(RuleCategory::Secret, *kind, pattern)
                    .expect("invalid built-in secret pattern"),
            );
        }
        for (kind, pattern) in BUILTIN_INJECTION_PATTERNS {
            catalog.push(
                PatternRule::new(RuleCategory::Injection, *kind, pattern)
                    .expect("invalid built-in injection pattern"),
            );
        }
        catalog
    }

    /// Appends a rule to the catalog, after all existing rules.
    pub fn push(&mut self, rule: PatternRule) {
        self.rules.push(rule);
    }

    /// Returns all rules in catalog order.
    pub fn rules(&self) -> &[PatternRule] {
        &self.rules
    }

    /// Returns the secret rules in catalog order.
    pub fn secret_rules(&self) -> impl Iterator<Item = &PatternRule> {
        self.rules
            .iter()
            .filter(|r| r.category() == RuleCategory::Secret)
    }

    /// Returns the injection rules in catalog order.
    pub fn injection_rules(&self) -> impl Iterator<Item = &PatternRule> {
        self.rules
            .iter()
            .filter(|r| r.category() == RuleCategory::Injection)
    }

    /// Returns the number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if the catalog has no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Built-in secret patterns, in precedence order.
///
/// The `label` group marks the key name so redaction can keep it. Vendor
/// token rules have no label; the whole match is sensitive. The optional
/// quote after the label accepts JSON-serialized keys (`"api_key":"..."`).
/// Value classes exclude the characters of the redaction marker so a
/// substituted match can never re-match its own rule.
const BUILTIN_SECRET_PATTERNS: &[(&str, &str)] = &[
    (
        "api_key",
        r#"(?P<label>api[_-]?key|apikey|access[_-]?token|secret[_-]?key)['"]?\s*[:=]\s*['"]*[A-Za-z0-9_-]{10,}['"]*"#,
    ),
    (
        "password",
        r#"(?P<label>password|passwd|pwd)['"]?\s*[:=]\s*['"]*[^\s'"\[\]{}]{3,}['"]*"#,
    ),
    ("bearer_token", r"bearer\s+[A-Za-z0-9\-\._~\+/]+=*"),
    ("vendor_token", r"sk-[A-Za-z0-9]{20,}"),
    ("vendor_token", r"ghp_[A-Za-z0-9]{36}"),
    ("vendor_token", r"gho_[A-Za-z0-9]{36}"),
];

/// Built-in prompt-injection patterns, in precedence order.
const BUILTIN_INJECTION_PATTERNS: &[(&str, &str)] = &[
    (
        "ignore_instructions",
        r"ignore\s+(previous|all|above)\s+(instructions|prompts|rules)",
    ),
    ("system_override", r"system\s*:*\s*(overr?ide|bypass|disable)"),
    (
        "role_override",
        r"act\s+as\s+a\s+(different|new)\s+(assistant|ai|bot)",
    ),
    (
        "forget_context",
        r"forget\s+(everything|all)\s+(above|before|previous)",
    ),
    ("new_instructions", r"new\s+(instructions|prompt|system|role)"),
    ("privileged_mode", r"(developer|admin|debug)\s+mode"),
    (
        "reveal_secrets",
        r"show\s+(me\s+)?(all\s+)?(secrets|keys|passwords|tokens)",
    ),
    ("execute_code", r"execute\s+(code|command|script)"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_compiles() {
        let catalog = PatternCatalog::builtin();
        assert!(!catalog.is_empty());
        assert_eq!(
            catalog.len(),
            BUILTIN_SECRET_PATTERNS.len() + BUILTIN_INJECTION_PATTERNS.len()
        );
    }

    #[test]
    fn secret_rules_precede_injection_rules() {
        let catalog = PatternCatalog::builtin();
        let first_secret = catalog.secret_rules().next().unwrap();
        assert_eq!(first_secret.kind(), "api_key");
        let first_injection = catalog.injection_rules().next().unwrap();
        assert_eq!(first_injection.kind(), "ignore_instructions");
    }

    #[test]
    fn label_group_detected() {
        let catalog = PatternCatalog::builtin();
        let api_key = catalog.secret_rules().next().unwrap();
        assert!(api_key.has_label());
        let bearer = catalog
            .secret_rules()
            .find(|r| r.kind() == "bearer_token")
            .unwrap();
        assert!(!bearer.has_label());
    }

    #[test]
    fn rules_match_case_insensitively() {
        let catalog = PatternCatalog::builtin();
        let password = catalog
            .secret_rules()
            .find(|r| r.kind() == "password")
            .unwrap();
        assert!(password.is_match("password: secretXYZ"));
        assert!(password.is_match("PASSWORD: secretXYZ"));
    }

    #[test]
    fn custom_rule_is_appended_after_builtins() {
        let mut catalog = PatternCatalog::builtin();
        let before = catalog.len();
        let rule =
            PatternRule::new(RuleCategory::Secret, "slack_token", r"xox[bp]-[A-Za-z0-9-]{10,}")
                .unwrap();
        catalog.push(rule);
        assert_eq!(catalog.len(), before + 1);
        let last = catalog.secret_rules().last().unwrap();
        assert_eq!(last.kind(), "slack_token");
    }

    #[test]
    fn invalid_pattern_is_rejected() {
        let err = PatternRule::new(RuleCategory::Secret, "broken", r"(unclosed").unwrap_err();
        assert!(matches!(err, PatternError::InvalidPattern { .. }));
        assert!(err.to_string().contains("broken"));
    }

    #[test]
    fn category_as_str() {
        assert_eq!(RuleCategory::Secret.as_str(), "secret");
        assert_eq!(RuleCategory::Injection.as_str(), "injection");
    }
}
