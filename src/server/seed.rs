//! Seed data
//!
//! Initial records and built-in definitions for the two shipped
//! modules. Seeding is an overwrite of the seeded keys only; records
//! added since keep their values.

use serde_json::{json, Value};

use chrono::Utc;

use crate::store::{Record, RecordStore, StoreResult};

/// Module name for incident records
pub const INCIDENTS: &str = "incidents";
/// Module name for instruction records
pub const INSTRUCTIONS: &str = "instructions";

/// Seed records per module
pub fn seed_records() -> Vec<(&'static str, Vec<Value>)> {
    let created_at = Utc::now().to_rfc3339();
    vec![
        (
            INCIDENTS,
            vec![
                json!({
                    "id": "INC-001",
                    "title": "Network outage",
                    "city": "New York",
                    "severity": "high",
                    "status": "open",
                    "description": "Critical network infrastructure failure",
                    "createdAt": created_at
                }),
                json!({
                    "id": "INC-002",
                    "title": "Database slow",
                    "city": "LA",
                    "severity": "medium",
                    "status": "acknowledged",
                    "description": "Database performance degradation",
                    "createdAt": created_at
                }),
                json!({
                    "id": "INC-003",
                    "title": "Security alert",
                    "city": "Chicago",
                    "severity": "critical",
                    "status": "open",
                    "description": "Suspicious activity detected",
                    "createdAt": created_at
                }),
            ],
        ),
        (
            INSTRUCTIONS,
            vec![
                json!({
                    "id": "INST-001",
                    "title": "Emergency Protocol",
                    "category": "emergency",
                    "status": "active",
                    "content": "Step 1: Assess the situation immediately..."
                }),
                json!({
                    "id": "INST-002",
                    "title": "Database Maintenance",
                    "category": "maintenance",
                    "status": "active",
                    "content": "Check logs for performance issues..."
                }),
            ],
        ),
    ]
}

/// Writes all seed records through the store
pub fn apply_seed(store: &RecordStore) -> StoreResult<usize> {
    let mut written = 0;
    for (module, values) in seed_records() {
        for value in values {
            let record = Record::from_value(value)?;
            store.put(module, &record)?;
            written += 1;
        }
    }
    Ok(written)
}

/// Built-in definition for a module, when one ships with the backend
pub fn builtin_definition(module: &str) -> Option<Value> {
    match module {
        INCIDENTS => Some(incidents_definition()),
        INSTRUCTIONS => Some(instructions_definition()),
        _ => None,
    }
}

/// All built-in definitions as `(module, raw)` pairs
pub fn builtin_definitions() -> Vec<(&'static str, Value)> {
    vec![
        (INCIDENTS, incidents_definition()),
        (INSTRUCTIONS, instructions_definition()),
    ]
}

fn incidents_definition() -> Value {
    json!({
        "layout": "splitscreen",
        "views": {
            "list": {
                "tag": "view",
                "name": "list",
                "children": [
                    {"tag": "text", "content": "Incidents", "htmlTag": "h1"},
                    {"tag": "table", "bind": "incidents", "class": "incident-table",
                     "columns": [
                        {"key": "id", "title": "Id", "width": 110},
                        {"key": "title", "title": "Title"},
                        {"key": "city", "title": "City"},
                        {"key": "severity", "title": "Severity", "width": 90},
                        {"key": "status", "title": "Status", "width": 120}
                     ],
                     "onRowClick": {"action": "showDetail", "id": {"$ref": "id"}}}
                ]
            },
            "detail": {
                "tag": "view",
                "name": "detail",
                "children": [
                    {"tag": "group", "class": "detail-header", "children": [
                        {"tag": "text", "content": {"$ref": "title"}, "htmlTag": "h2"},
                        {"tag": "text", "content": {"$ref": "status"}, "label": "Status"},
                        {"tag": "text", "content": {"$ref": "severity"}, "label": "Severity"}
                    ]},
                    {"tag": "text", "content": {"$ref": "description"}, "htmlTag": "p"},
                    {"tag": "button", "text": "Acknowledge", "variant": "primary",
                     "disabledWhen": {"eq": [{"$ref": "status"}, "acknowledged"]},
                     "onClick": {"action": "publish",
                                 "topic": "commands.incidents.acknowledge",
                                 "payload": {"id": {"$ref": "id"}}}},
                    {"tag": "button", "text": "Resolve", "variant": "success",
                     "visibleWhen": {"neq": [{"$ref": "status"}, "resolved"]},
                     "onClick": {"action": "publish",
                                 "topic": "commands.incidents.update",
                                 "payload": {"id": {"$ref": "id"},
                                             "updates": {"status": "resolved"}},
                                 "then": {"action": "showEmpty"}}},
                    {"tag": "button", "text": "Back", "variant": "secondary",
                     "onClick": {"action": "showEmpty"}}
                ]
            },
            "empty": {
                "tag": "view",
                "name": "empty",
                "children": [
                    {"tag": "text", "content": "Select an incident", "htmlTag": "p"}
                ]
            }
        }
    })
}

fn instructions_definition() -> Value {
    json!({
        "layout": "splitscreen",
        "views": {
            "list": {
                "tag": "view",
                "name": "list",
                "children": [
                    {"tag": "text", "content": "Instructions", "htmlTag": "h1"},
                    {"tag": "table", "bind": "instructions",
                     "columns": [
                        {"key": "id", "title": "Id", "width": 110},
                        {"key": "title", "title": "Title"},
                        {"key": "category", "title": "Category"},
                        {"key": "status", "title": "Status", "width": 100}
                     ],
                     "onRowClick": {"action": "showDetail", "id": {"$ref": "id"}}}
                ]
            },
            "detail": {
                "tag": "view",
                "name": "detail",
                "children": [
                    {"tag": "text", "content": {"$ref": "title"}, "htmlTag": "h2"},
                    {"tag": "text", "content": {"$ref": "content"}, "htmlTag": "p"},
                    {"tag": "button", "text": "Archive", "variant": "danger",
                     "visibleWhen": {"neq": [{"$ref": "status"}, "archived"]},
                     "onClick": {"action": "publish",
                                 "topic": "commands.instructions.update",
                                 "payload": {"id": {"$ref": "id"},
                                             "updates": {"status": "archived"}},
                                 "then": {"action": "showEmpty"}}},
                    {"tag": "button", "text": "Back", "variant": "secondary",
                     "onClick": {"action": "showEmpty"}}
                ]
            },
            "empty": {
                "tag": "view",
                "name": "empty",
                "children": [
                    {"tag": "text", "content": "Select an instruction", "htmlTag": "p"}
                ]
            }
        }
    })
}
