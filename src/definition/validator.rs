//! Definition validator
//!
//! Parses raw JSON into the typed definition tree. The walk tracks the
//! dotted path of the node being parsed so every rejection names its
//! location (`views.list.children[2].onClick`). Parsing is
//! all-or-nothing: a failure constructs no partial tree.
//!
//! Discriminators (`tag`, `action`, condition keys) and structural rules
//! (view names, required views, table `bind`) are checked explicitly;
//! field-level parsing is delegated to serde.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::action::ACTION_NAMES;
use super::condition::CONDITION_KEYS;
use super::errors::{DefinitionError, DefinitionResult};
use super::types::{
    Component, ComponentCommon, FormComponent, GroupComponent, Layout, ModalComponent,
    ModuleDefinition, ViewDefinition, ViewName, Views, COMPONENT_TAGS,
};

/// Parse and validate a raw module definition
pub fn parse_module(raw: &Value) -> DefinitionResult<ModuleDefinition> {
    let obj = expect_object(raw, "$")?;

    let layout_raw = require(obj, "layout", "$")?;
    let layout: Layout = from_value_at(layout_raw.clone(), "layout")?;

    let views_raw = expect_object(require(obj, "views", "$")?, "views")?;
    for key in views_raw.keys() {
        if !ViewName::ALL.iter().any(|v| v.as_str() == key) {
            return Err(DefinitionError::UnknownView {
                path: format!("views.{}", key),
                view: key.clone(),
            });
        }
    }

    let mut parsed = Vec::with_capacity(ViewName::ALL.len());
    for name in ViewName::ALL {
        let path = format!("views.{}", name.as_str());
        let view_raw = views_raw.get(name.as_str()).ok_or(DefinitionError::MissingView {
            path: "views".to_string(),
            view: name.as_str().to_string(),
        })?;
        parsed.push(parse_view(view_raw, name, &path)?);
    }
    let empty = parsed.pop().unwrap_or_else(|| unreachable_view(ViewName::Empty));
    let detail = parsed.pop().unwrap_or_else(|| unreachable_view(ViewName::Detail));
    let list = parsed.pop().unwrap_or_else(|| unreachable_view(ViewName::List));

    Ok(ModuleDefinition {
        layout,
        views: Views { list, detail, empty },
    })
}

// parsed is built from ViewName::ALL, so the pops always succeed
fn unreachable_view(name: ViewName) -> ViewDefinition {
    ViewDefinition {
        name,
        children: Vec::new(),
    }
}

/// Parse one view under its fixed key
fn parse_view(raw: &Value, expected: ViewName, path: &str) -> DefinitionResult<ViewDefinition> {
    let obj = expect_object(raw, path)?;

    if let Some(tag) = obj.get("tag") {
        if tag.as_str() != Some("view") {
            return Err(DefinitionError::malformed(
                path,
                format!("expected tag 'view', found {}", tag),
            ));
        }
    }

    let name = require_str(obj, "name", path)?;
    if name != expected.as_str() {
        return Err(DefinitionError::ViewNameMismatch {
            path: path.to_string(),
            expected: expected.as_str().to_string(),
            found: name.to_string(),
        });
    }

    let children = parse_children(obj, path)?;
    Ok(ViewDefinition {
        name: expected,
        children,
    })
}

/// Parse one component, dispatching on its `tag`
fn parse_component(raw: &Value, path: &str) -> DefinitionResult<Component> {
    let obj = expect_object(raw, path)?;
    let tag = require_str(obj, "tag", path)?;

    check_conditions(obj, path)?;

    match tag {
        "text" => Ok(Component::Text(from_value_at(raw.clone(), path)?)),
        "input" => Ok(Component::Input(from_value_at(raw.clone(), path)?)),
        "select" => Ok(Component::Select(from_value_at(raw.clone(), path)?)),
        "card" => Ok(Component::Card(from_value_at(raw.clone(), path)?)),
        "button" => {
            let action = require(obj, "onClick", path)?;
            check_action(action, &format!("{}.onClick", path))?;
            Ok(Component::Button(from_value_at(raw.clone(), path)?))
        }
        "table" => {
            if let Some(action) = obj.get("onRowClick") {
                check_action(action, &format!("{}.onRowClick", path))?;
            }
            let table: super::types::TableComponent = from_value_at(raw.clone(), path)?;
            if table.common.bind.is_none() {
                return Err(DefinitionError::malformed(path, "table requires 'bind'"));
            }
            Ok(Component::Table(table))
        }
        "group" => {
            let common = parse_common(raw, path)?;
            let children = parse_children(obj, path)?;
            Ok(Component::Group(GroupComponent { common, children }))
        }
        "form" => {
            let common = parse_common(raw, path)?;
            let form_ref = match obj.get("ref") {
                Some(value) => Some(from_value_at(value.clone(), &format!("{}.ref", path))?),
                None => None,
            };
            let children = parse_children(obj, path)?;
            Ok(Component::Form(FormComponent {
                common,
                form_ref,
                children,
            }))
        }
        "modal" => {
            let common = parse_common(raw, path)?;
            let name = require_str(obj, "name", path)?.to_string();
            let title = require_str(obj, "title", path)?.to_string();
            let size = match obj.get("size") {
                Some(value) => Some(from_value_at(value.clone(), &format!("{}.size", path))?),
                None => None,
            };
            let children = parse_children(obj, path)?;
            Ok(Component::Modal(ModalComponent {
                common,
                name,
                title,
                size,
                children,
            }))
        }
        other => {
            debug_assert!(!COMPONENT_TAGS.contains(&other));
            Err(DefinitionError::unknown_tag(path, other))
        }
    }
}

/// Parse the shared envelope of a container variant
fn parse_common(raw: &Value, path: &str) -> DefinitionResult<ComponentCommon> {
    from_value_at(raw.clone(), path)
}

/// Parse the ordered `children` array of a view or container
fn parse_children(obj: &Map<String, Value>, path: &str) -> DefinitionResult<Vec<Component>> {
    let raw = require(obj, "children", path)?;
    let items = raw.as_array().ok_or_else(|| {
        DefinitionError::malformed(format!("{}.children", path), "expected an array")
    })?;
    let mut children = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        children.push(parse_component(item, &format!("{}.children[{}]", path, index))?);
    }
    Ok(children)
}

/// Verify `action` discriminators before serde parses the node
fn check_action(raw: &Value, path: &str) -> DefinitionResult<()> {
    let obj = expect_object(raw, path)?;
    let name = require_str(obj, "action", path)?;
    if !ACTION_NAMES.contains(&name) {
        return Err(DefinitionError::unknown_action(path, name));
    }
    if let Some(then) = obj.get("then") {
        check_action(then, &format!("{}.then", path))?;
    }
    Ok(())
}

/// Verify condition keys of `visibleWhen` / `disabledWhen` subtrees
fn check_conditions(obj: &Map<String, Value>, path: &str) -> DefinitionResult<()> {
    for key in ["visibleWhen", "disabledWhen"] {
        if let Some(condition) = obj.get(key) {
            check_condition(condition, &format!("{}.{}", path, key))?;
        }
    }
    Ok(())
}

/// Recursively verify a condition tree's discriminating keys
fn check_condition(raw: &Value, path: &str) -> DefinitionResult<()> {
    let obj = expect_object(raw, path)?;
    if obj.len() != 1 {
        return Err(DefinitionError::malformed(
            path,
            "a condition must have exactly one key",
        ));
    }
    // len() == 1 was just checked
    let (key, body) = match obj.iter().next() {
        Some(entry) => entry,
        None => return Ok(()),
    };
    match key.as_str() {
        "and" | "or" => {
            let items = body.as_array().ok_or_else(|| {
                DefinitionError::malformed(format!("{}.{}", path, key), "expected an array")
            })?;
            for (index, item) in items.iter().enumerate() {
                check_condition(item, &format!("{}.{}[{}]", path, key, index))?;
            }
        }
        "not" => check_condition(body, &format!("{}.not", path))?,
        "eq" | "neq" | "gt" | "lt" => {
            let len = body.as_array().map(Vec::len);
            if len != Some(2) {
                return Err(DefinitionError::malformed(
                    format!("{}.{}", path, key),
                    "expected two operands",
                ));
            }
        }
        other => {
            debug_assert!(!CONDITION_KEYS.contains(&other));
            return Err(DefinitionError::unknown_condition(path, other));
        }
    }
    Ok(())
}

fn expect_object<'v>(raw: &'v Value, path: &str) -> DefinitionResult<&'v Map<String, Value>> {
    raw.as_object()
        .ok_or_else(|| DefinitionError::malformed(path, "expected an object"))
}

fn require<'v>(obj: &'v Map<String, Value>, key: &str, path: &str) -> DefinitionResult<&'v Value> {
    obj.get(key)
        .ok_or_else(|| DefinitionError::malformed(path, format!("missing field '{}'", key)))
}

fn require_str<'v>(obj: &'v Map<String, Value>, key: &str, path: &str) -> DefinitionResult<&'v str> {
    require(obj, key, path)?.as_str().ok_or_else(|| {
        DefinitionError::malformed(path, format!("field '{}' must be a string", key))
    })
}

fn from_value_at<T: DeserializeOwned>(value: Value, path: &str) -> DefinitionResult<T> {
    serde_json::from_value(value)
        .map_err(|e| DefinitionError::malformed(path, e.to_string()))
}
