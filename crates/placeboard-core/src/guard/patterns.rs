//! Key classification rules.
//!
//! Patterns match on the key name only, never the value, and ignore case.
//! The allow-list is checked before any blocked pattern.

use crate::kinds::CACHE_KEY_PREFIX;

/// Keys owned by UI preference code, always permitted
pub const ALLOWED_KEYS: &[&str] = &["theme", "darkMode"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyPattern {
    Contains(&'static str),
    Prefix(&'static str),
}

impl KeyPattern {
    /// `key` must already be lowercased
    fn matches(&self, key: &str) -> bool {
        match self {
            KeyPattern::Contains(needle) => key.contains(needle),
            KeyPattern::Prefix(prefix) => key.starts_with(prefix),
        }
    }
}

/// Reserved prefix of the auth provider's session keys
const SESSION_PREFIX: KeyPattern = KeyPattern::Prefix("sb-");

/// Startup sweep: broad, may remove stale non-auth leftovers.
const SWEEP_PATTERNS: &[KeyPattern] = &[
    KeyPattern::Contains("token"),
    KeyPattern::Contains("auth"),
    KeyPattern::Contains("jwt"),
    KeyPattern::Contains("refresh"),
    KeyPattern::Contains("access"),
    SESSION_PREFIX,
];

/// Write path: narrow, so unrelated future keys are not dropped.
const WRITE_PATTERNS: &[KeyPattern] = &[
    KeyPattern::Contains("token"),
    KeyPattern::Contains("jwt"),
    SESSION_PREFIX,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyClass {
    Allowed,
    Blocked,
    Unclassified,
}

/// Explicitly allow-listed key or any cache key
pub fn is_allowed(key: &str) -> bool {
    key.starts_with(CACHE_KEY_PREFIX) || ALLOWED_KEYS.contains(&key)
}

fn classify(key: &str, patterns: &[KeyPattern]) -> KeyClass {
    if is_allowed(key) {
        return KeyClass::Allowed;
    }
    let lowered = key.to_lowercase();
    if patterns.iter().any(|p| p.matches(&lowered)) {
        KeyClass::Blocked
    } else {
        KeyClass::Unclassified
    }
}

pub fn classify_for_sweep(key: &str) -> KeyClass {
    classify(key, SWEEP_PATTERNS)
}

pub fn classify_for_write(key: &str) -> KeyClass {
    classify(key, WRITE_PATTERNS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allow_list() {
        assert!(is_allowed("theme"));
        assert!(is_allowed("darkMode"));
        assert!(is_allowed("cache_companies"));
        assert!(is_allowed("cache_token_lookalike"));
        assert!(!is_allowed("Theme"));
        assert!(!is_allowed("darkmode"));
        assert!(!is_allowed("my_cache_companies"));
    }

    #[test]
    fn test_allow_list_wins_over_patterns() {
        assert_eq!(classify_for_write("cache_access_token"), KeyClass::Allowed);
        assert_eq!(classify_for_sweep("cache_access_token"), KeyClass::Allowed);
    }

    #[test]
    fn test_sweep_patterns_case_insensitive() {
        for key in [
            "token",
            "ACCESS_TOKEN",
            "AuthState",
            "myJWT",
            "refresh",
            "lastAccess",
            "sb-abc-auth-token",
            "SB-session",
        ] {
            assert_eq!(classify_for_sweep(key), KeyClass::Blocked, "{}", key);
        }
        assert_eq!(classify_for_sweep("language"), KeyClass::Unclassified);
        assert_eq!(classify_for_sweep("xsb-session"), KeyClass::Unclassified);
    }

    #[test]
    fn test_write_patterns_are_narrower() {
        assert_eq!(classify_for_write("idToken"), KeyClass::Blocked);
        assert_eq!(classify_for_write("user_jwt"), KeyClass::Blocked);
        assert_eq!(classify_for_write("sb-session"), KeyClass::Blocked);

        // Caught by the sweep, not by the write path
        assert_eq!(classify_for_write("authorFilter"), KeyClass::Unclassified);
        assert_eq!(classify_for_write("refreshInterval"), KeyClass::Unclassified);
        assert_eq!(classify_for_write("accessibility"), KeyClass::Unclassified);
        assert_eq!(classify_for_sweep("authorFilter"), KeyClass::Blocked);
    }
}
