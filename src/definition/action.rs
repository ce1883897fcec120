//! Action definitions
//!
//! Actions are what interactive components trigger. The union is closed;
//! adding a variant is a compile-time-checked extension point for the
//! dispatcher.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::binding::Bindable;

/// One user-triggerable effect, discriminated by `action`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Action {
    /// Request a route change from the router collaborator
    Navigate {
        /// Target route
        to: String,
    },
    /// Send a command over the transport and await its reply
    Publish {
        /// Command topic, e.g. `commands.incidents.acknowledge`
        topic: String,
        /// JSON payload; embedded `$bind`/`$ref` objects are resolved at
        /// dispatch time
        payload: Value,
        /// Chained action dispatched only on a successful reply
        #[serde(default, skip_serializing_if = "Option::is_none")]
        then: Option<Box<Action>>,
    },
    /// Open or close a named overlay
    Modal {
        /// Modal name as declared by a modal component
        modal: String,
        /// Close instead of open
        #[serde(default, skip_serializing_if = "std::ops::Not::not")]
        close: bool,
    },
    /// Select the record whose id the expression resolves to
    ShowDetail {
        /// Id expression, usually `{"$ref": "id"}` on a table row
        id: Bindable,
    },
    /// Clear the current selection
    ShowEmpty,
}

/// Recognized `action` discriminators, used by the validator
pub const ACTION_NAMES: &[&str] = &["navigate", "publish", "modal", "showDetail", "showEmpty"];

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn navigate_shape() {
        let action: Action =
            serde_json::from_value(json!({"action": "navigate", "to": "/incidents"})).unwrap();
        assert_eq!(
            action,
            Action::Navigate {
                to: "/incidents".into()
            }
        );
    }

    #[test]
    fn publish_with_chained_then() {
        let action: Action = serde_json::from_value(json!({
            "action": "publish",
            "topic": "commands.incidents.update",
            "payload": {"id": {"$ref": "id"}, "updates": {"status": "resolved"}},
            "then": {"action": "showEmpty"}
        }))
        .unwrap();
        match &action {
            Action::Publish { topic, then, .. } => {
                assert_eq!(topic, "commands.incidents.update");
                assert_eq!(then.as_deref(), Some(&Action::ShowEmpty));
            }
            other => panic!("unexpected parse: {:?}", other),
        }
        // then is omitted when absent
        let bare: Action = serde_json::from_value(json!({
            "action": "publish", "topic": "t", "payload": {}
        }))
        .unwrap();
        let round = serde_json::to_value(&bare).unwrap();
        assert!(round.get("then").is_none());
    }

    #[test]
    fn modal_close_defaults_false() {
        let action: Action =
            serde_json::from_value(json!({"action": "modal", "modal": "edit"})).unwrap();
        assert_eq!(
            action,
            Action::Modal {
                modal: "edit".into(),
                close: false
            }
        );
    }

    #[test]
    fn show_detail_and_empty_shapes() {
        let detail: Action =
            serde_json::from_value(json!({"action": "showDetail", "id": {"$ref": "id"}})).unwrap();
        assert!(matches!(detail, Action::ShowDetail { .. }));

        let empty: Action = serde_json::from_value(json!({"action": "showEmpty"})).unwrap();
        assert_eq!(empty, Action::ShowEmpty);
        assert_eq!(
            serde_json::to_value(&empty).unwrap(),
            json!({"action": "showEmpty"})
        );
    }
}
