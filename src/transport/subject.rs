//! Subject grammar and well-known topics
//!
//! Subjects are dot-separated token sequences (`data.get.incidents`).
//! Subscription patterns may use `*` to match exactly one token and a
//! trailing `>` to match one or more remaining tokens.

use super::errors::{TransportError, TransportResult};

/// Validates a concrete subject: non-empty tokens, no wildcards
pub fn validate_subject(subject: &str) -> TransportResult<()> {
    if subject.is_empty() {
        return Err(invalid(subject, "empty subject"));
    }
    for token in subject.split('.') {
        if token.is_empty() {
            return Err(invalid(subject, "empty token"));
        }
        if token == "*" || token == ">" {
            return Err(invalid(subject, "wildcard in concrete subject"));
        }
    }
    Ok(())
}

/// Validates a subscription pattern: `*` anywhere, `>` only terminal
pub fn validate_pattern(pattern: &str) -> TransportResult<()> {
    if pattern.is_empty() {
        return Err(invalid(pattern, "empty pattern"));
    }
    let tokens: Vec<&str> = pattern.split('.').collect();
    for (index, token) in tokens.iter().enumerate() {
        if token.is_empty() {
            return Err(invalid(pattern, "empty token"));
        }
        if *token == ">" && index != tokens.len() - 1 {
            return Err(invalid(pattern, "'>' must be the final token"));
        }
    }
    Ok(())
}

fn invalid(subject: &str, reason: &'static str) -> TransportError {
    TransportError::InvalidSubject {
        subject: subject.to_string(),
        reason,
    }
}

/// True when `subject` matches `pattern`
pub fn matches(pattern: &str, subject: &str) -> bool {
    let mut pattern_tokens = pattern.split('.').peekable();
    let mut subject_tokens = subject.split('.');

    loop {
        match (pattern_tokens.next(), subject_tokens.next()) {
            (Some(">"), Some(_)) => return true,
            (Some("*"), Some(_)) => continue,
            (Some(p), Some(s)) if p == s => continue,
            (None, None) => return true,
            _ => return false,
        }
    }
}

/// The token at `index`, if present
pub fn token(subject: &str, index: usize) -> Option<&str> {
    subject.split('.').nth(index)
}

/// Well-known topic constructors, module-parameterized
pub mod topics {
    /// Request topic for a module's definition
    pub fn definitions_get(module: &str) -> String {
        format!("definitions.get.{}", module)
    }

    /// Request topic for a module's current records
    pub fn data_get(module: &str) -> String {
        format!("data.get.{}", module)
    }

    /// Command topic for one verb on a module
    pub fn command(module: &str, verb: &str) -> String {
        format!("commands.{}.{}", module, verb)
    }

    /// Push channel for a module's change notifications
    pub fn updated(module: &str) -> String {
        format!("{}.updated", module)
    }

    /// Pattern matching every definition request
    pub const DEFINITIONS_PATTERN: &str = "definitions.get.*";
    /// Pattern matching every data request
    pub const DATA_PATTERN: &str = "data.get.*";
    /// Pattern matching every command
    pub const COMMANDS_PATTERN: &str = "commands.>";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_matching() {
        assert!(matches("data.get.incidents", "data.get.incidents"));
        assert!(!matches("data.get.incidents", "data.get.instructions"));
        assert!(!matches("data.get", "data.get.incidents"));
        assert!(!matches("data.get.incidents", "data.get"));
    }

    #[test]
    fn star_matches_exactly_one_token() {
        assert!(matches("definitions.get.*", "definitions.get.incidents"));
        assert!(matches("*.updated", "incidents.updated"));
        assert!(!matches("definitions.get.*", "definitions.get"));
        assert!(!matches("definitions.get.*", "definitions.get.a.b"));
    }

    #[test]
    fn arrow_matches_the_rest() {
        assert!(matches("commands.>", "commands.incidents.acknowledge"));
        assert!(matches("commands.>", "commands.x"));
        assert!(!matches("commands.>", "commands"));
        assert!(!matches("commands.>", "queries.incidents.get"));
    }

    #[test]
    fn subject_validation() {
        assert!(validate_subject("data.get.incidents").is_ok());
        assert!(validate_subject("").is_err());
        assert!(validate_subject("a..b").is_err());
        assert!(validate_subject("data.*").is_err());
    }

    #[test]
    fn pattern_validation() {
        assert!(validate_pattern("commands.>").is_ok());
        assert!(validate_pattern("definitions.get.*").is_ok());
        assert!(validate_pattern(">.commands").is_err());
        assert!(validate_pattern("a..b").is_err());
    }

    #[test]
    fn topic_constructors() {
        assert_eq!(topics::definitions_get("incidents"), "definitions.get.incidents");
        assert_eq!(topics::data_get("incidents"), "data.get.incidents");
        assert_eq!(
            topics::command("incidents", "acknowledge"),
            "commands.incidents.acknowledge"
        );
        assert_eq!(topics::updated("incidents"), "incidents.updated");
    }

    #[test]
    fn token_extraction() {
        assert_eq!(token("definitions.get.incidents", 2), Some("incidents"));
        assert_eq!(token("definitions.get", 2), None);
    }
}
