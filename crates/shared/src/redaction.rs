//! Secret detection and redaction for metric names and log fields.
//!
//! Publishing adapters run every property name through [`is_secret_key`]
//! before emitting it, so a caller that labels a recorder with a bearer
//! token or a password never leaks the raw value into a sink.

/// The redacted placeholder string.
pub const REDACTED: &str = "[REDACTED]";

/// Checks if a metric or field name likely refers to a secret.
///
/// Matching is case-insensitive and works on both `SCREAMING_CASE` and
/// `PascalCase` names.
///
/// # Examples
///
/// ```
/// use metric_recorder_shared::is_secret_key;
///
/// assert!(is_secret_key("AuthToken"));
/// assert!(is_secret_key("db_password"));
/// assert!(!is_secret_key("Operation"));
/// ```
pub fn is_secret_key(key: &str) -> bool {
    let key = key.to_ascii_uppercase();
    key.contains("KEY")
        || key.contains("TOKEN")
        || key.contains("SECRET")
        || key.contains("PASSWORD")
        || key.contains("CREDENTIAL")
        || key.contains("AUTH")
}

/// Redacts a value if the name is likely a secret.
///
/// # Examples
///
/// ```
/// use metric_recorder_shared::redact_if_secret;
///
/// assert_eq!(redact_if_secret("ApiKey", "sk-123"), "[REDACTED]");
/// assert_eq!(redact_if_secret("Region", "eu-west-1"), "eu-west-1");
/// ```
pub fn redact_if_secret(key: &str, value: &str) -> String {
    if is_secret_key(key) {
        REDACTED.to_string()
    } else {
        value.to_string()
    }
}
