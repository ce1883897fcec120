//! Command payloads and replies

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Payload of `commands.<module>.acknowledge`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcknowledgePayload {
    /// Target record id
    pub id: String,
}

/// Payload of `commands.<module>.update`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePayload {
    /// Target record id
    pub id: String,
    /// Partial record: top-level fields to replace
    pub updates: Map<String, Value>,
}

/// Reply to every command request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandReply {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CommandReply {
    /// A successful reply
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    /// A failure reply carrying its reason
    pub fn fail(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
        }
    }

    /// The reply as a JSON value
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|_| {
            // CommandReply serialization cannot fail; keep the reply
            // channel alive regardless
            serde_json::json!({"success": false, "error": "reply serialization failed"})
        })
    }
}

/// Recognized command verbs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandVerb {
    /// Fixed status transition `open|any → acknowledged`
    Acknowledge,
    /// Shallow field merge
    Update,
}

impl CommandVerb {
    /// Parses a verb token from a command subject
    pub fn parse(verb: &str) -> Option<Self> {
        match verb {
            "acknowledge" => Some(Self::Acknowledge),
            "update" => Some(Self::Update),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reply_shapes() {
        assert_eq!(
            CommandReply::ok().to_value(),
            json!({"success": true})
        );
        assert_eq!(
            CommandReply::fail("nope").to_value(),
            json!({"success": false, "error": "nope"})
        );
    }

    #[test]
    fn reply_parses_back() {
        let reply: CommandReply =
            serde_json::from_value(json!({"success": false, "error": "x"})).unwrap();
        assert!(!reply.success);
        assert_eq!(reply.error.as_deref(), Some("x"));
    }

    #[test]
    fn verb_parsing() {
        assert_eq!(CommandVerb::parse("acknowledge"), Some(CommandVerb::Acknowledge));
        assert_eq!(CommandVerb::parse("update"), Some(CommandVerb::Update));
        assert_eq!(CommandVerb::parse("delete"), None);
    }

    #[test]
    fn update_payload_shape() {
        let payload: UpdatePayload = serde_json::from_value(json!({
            "id": "INC-002",
            "updates": {"status": "resolved", "description": "fixed"}
        }))
        .unwrap();
        assert_eq!(payload.id, "INC-002");
        assert_eq!(payload.updates.len(), 2);
    }
}
