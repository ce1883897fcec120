//! Render walk
//!
//! Interprets a view's component tree against a scope, producing a tree
//! of rendered nodes: bindings resolved, visibility and disabled state
//! computed, table rows materialized. The walk owns no state and never
//! mutates the scope; narrowing to a row produces a child scope.
//!
//! This is the semantic half of rendering; visual layout is someone
//! else's problem.

use serde_json::Value;

use crate::definition::{Action, Component, TableComponent, ViewDefinition};

use super::evaluator::{is_disabled, is_visible};
use super::resolver::{resolve_bindable, resolve_state_path};
use super::scope::Scope;

/// One interpreted component instance
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedNode {
    /// The component tag (`text`, `table`, `row`, `cell`, ...)
    pub kind: String,
    /// Styling hook carried through from the definition
    pub class: Option<String>,
    /// Caption: label, title, or button text
    pub label: Option<String>,
    /// Resolved display value, if the component has one
    pub value: Option<Value>,
    /// Whether interaction is disabled
    pub disabled: bool,
    /// Action to dispatch on interaction
    pub action: Option<Action>,
    /// The record backing this node (set on table rows)
    pub record: Option<Value>,
    /// Interpreted children in definition order
    pub children: Vec<RenderedNode>,
}

impl RenderedNode {
    fn new(kind: &str) -> Self {
        Self {
            kind: kind.to_string(),
            class: None,
            label: None,
            value: None,
            disabled: false,
            action: None,
            record: None,
            children: Vec::new(),
        }
    }
}

/// Interpret a whole view against a scope
pub fn render_view(view: &ViewDefinition, scope: &Scope<'_>) -> Vec<RenderedNode> {
    view.children
        .iter()
        .filter_map(|component| render_component(component, scope))
        .collect()
}

/// Interpret one component; `None` when hidden by `visibleWhen`
pub fn render_component(component: &Component, scope: &Scope<'_>) -> Option<RenderedNode> {
    let common = component.common();
    if !is_visible(common, scope) {
        return None;
    }

    let mut node = RenderedNode::new(component.tag());
    node.class = common.class.clone();
    node.disabled = is_disabled(common, scope);

    match component {
        Component::Text(text) => {
            node.label = text.label.clone();
            node.value = resolve_bindable(&text.content, scope);
        }
        Component::Input(input) => {
            node.label = input.label.clone();
            node.value = input
                .value
                .as_ref()
                .and_then(|value| resolve_bindable(value, scope));
            node.disabled = node.disabled || input.disabled;
        }
        Component::Select(select) => {
            node.label = select.label.clone();
            node.value = select
                .value
                .as_ref()
                .and_then(|value| resolve_bindable(value, scope));
        }
        Component::Button(button) => {
            node.label = Some(button.text.clone());
            node.action = Some(button.on_click.clone());
        }
        Component::Card(card) => {
            node.label = Some(card.title.clone());
            node.value = resolve_bindable(&card.value, scope);
        }
        Component::Table(table) => {
            node.children = render_rows(table, scope);
        }
        Component::Group(_) | Component::Form(_) | Component::Modal(_) => {
            node.children = component
                .children()
                .iter()
                .filter_map(|child| render_component(child, scope))
                .collect();
            if let Component::Modal(modal) = component {
                node.label = Some(modal.title.clone());
            }
        }
    }

    Some(node)
}

/// Materialize table rows: each element of the bound collection becomes
/// a row node whose cells project the configured columns. The row value
/// becomes the record scope for anything dispatched from it.
fn render_rows(table: &TableComponent, scope: &Scope<'_>) -> Vec<RenderedNode> {
    let bound = table
        .common
        .bind
        .as_ref()
        .and_then(|path| resolve_state_path(path, scope));
    let rows = match bound.as_ref().and_then(Value::as_array) {
        Some(rows) => rows,
        // unbound or non-array resolves to an empty table, not a failure
        None => return Vec::new(),
    };

    rows.iter()
        .map(|row| {
            let mut rendered = RenderedNode::new("row");
            rendered.record = Some(row.clone());
            rendered.action = table.on_row_click.clone();
            rendered.children = table
                .columns
                .iter()
                .map(|column| {
                    let mut cell = RenderedNode::new("cell");
                    cell.label = Some(column.title.clone());
                    cell.value = row.get(&column.key).cloned();
                    cell
                })
                .collect();
            rendered
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::parse_module;
    use serde_json::json;

    fn definition_with_list(children: Value) -> ViewDefinition {
        let raw = json!({
            "layout": "splitscreen",
            "views": {
                "list": {"tag": "view", "name": "list", "children": children},
                "detail": {"tag": "view", "name": "detail", "children": []},
                "empty": {"tag": "view", "name": "empty", "children": []}
            }
        });
        parse_module(&raw).unwrap().views.list
    }

    #[test]
    fn resolves_text_content_from_record_scope() {
        let view = definition_with_list(json!([
            {"tag": "text", "content": {"$ref": "title"}, "label": "Title"}
        ]));
        let state = json!({});
        let record = json!({"title": "Network outage"});
        let nodes = render_view(&view, &Scope::with_record(&state, &record));
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].value, Some(json!("Network outage")));
        assert_eq!(nodes[0].label.as_deref(), Some("Title"));
    }

    #[test]
    fn hidden_component_produces_no_node() {
        let view = definition_with_list(json!([
            {"tag": "text", "content": "never",
             "visibleWhen": {"eq": [{"$ref": "status"}, "resolved"]}},
            {"tag": "text", "content": "always"}
        ]));
        let state = json!({});
        let record = json!({"status": "open"});
        let nodes = render_view(&view, &Scope::with_record(&state, &record));
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].value, Some(json!("always")));
    }

    #[test]
    fn hidden_container_hides_its_subtree() {
        let view = definition_with_list(json!([
            {"tag": "group",
             "visibleWhen": {"eq": [{"$bind": "show"}, "yes"]},
             "children": [{"tag": "text", "content": "inner"}]}
        ]));
        let hidden_state = json!({"show": "no"});
        assert!(render_view(&view, &Scope::of_state(&hidden_state)).is_empty());

        let shown_state = json!({"show": "yes"});
        let nodes = render_view(&view, &Scope::of_state(&shown_state));
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].children.len(), 1);
    }

    #[test]
    fn table_materializes_rows_and_cells() {
        let view = definition_with_list(json!([
            {"tag": "table", "bind": "incidents",
             "columns": [{"key": "id", "title": "Id"}, {"key": "city", "title": "City"}],
             "onRowClick": {"action": "showDetail", "id": {"$ref": "id"}}}
        ]));
        let state = json!({"incidents": [
            {"id": "INC-001", "city": "New York"},
            {"id": "INC-002", "city": "LA"}
        ]});
        let nodes = render_view(&view, &Scope::of_state(&state));
        let table = &nodes[0];
        assert_eq!(table.kind, "table");
        assert_eq!(table.children.len(), 2);

        let row = &table.children[1];
        assert_eq!(row.kind, "row");
        assert_eq!(row.record, Some(json!({"id": "INC-002", "city": "LA"})));
        assert!(row.action.is_some());
        assert_eq!(row.children[0].value, Some(json!("INC-002")));
        assert_eq!(row.children[1].value, Some(json!("LA")));
    }

    #[test]
    fn unbound_table_renders_empty() {
        let view = definition_with_list(json!([
            {"tag": "table", "bind": "missing", "columns": [{"key": "id", "title": "Id"}]}
        ]));
        let state = json!({});
        let nodes = render_view(&view, &Scope::of_state(&state));
        assert!(nodes[0].children.is_empty());
    }

    #[test]
    fn button_carries_action_and_disabled_state() {
        let view = definition_with_list(json!([
            {"tag": "button", "text": "Acknowledge",
             "disabledWhen": {"eq": [{"$ref": "status"}, "acknowledged"]},
             "onClick": {"action": "showEmpty"}}
        ]));
        let state = json!({});
        let record = json!({"status": "acknowledged"});
        let nodes = render_view(&view, &Scope::with_record(&state, &record));
        assert!(nodes[0].disabled);
        assert_eq!(nodes[0].action, Some(Action::ShowEmpty));
        assert_eq!(nodes[0].label.as_deref(), Some("Acknowledge"));
    }
}
