//! # Definition Model
//!
//! Declarative module definitions: views as trees of typed components
//! with data bindings, visibility/disabled conditions, and actions.
//!
//! - **types**: the closed tagged-union tree
//! - **binding**: validated paths and `$bind`/`$ref` expressions
//! - **condition**: boolean expression trees
//! - **action**: the action union
//! - **validator**: raw JSON → typed tree, with dotted error paths
//! - **loader**: directory-backed registry, loaded once at startup

pub mod action;
pub mod binding;
pub mod condition;
pub mod errors;
pub mod loader;
pub mod types;
pub mod validator;

pub use action::Action;
pub use binding::{Bindable, Binding, Path, PathError};
pub use condition::{Condition, Operand};
pub use errors::{DefinitionError, DefinitionResult};
pub use loader::{DefinitionLoader, DefinitionRegistry};
pub use types::{
    ButtonComponent, CardComponent, Component, ComponentCommon, FormComponent, GroupComponent,
    InputComponent, Layout, ModalComponent, ModuleDefinition, SelectComponent, TableColumn,
    TableComponent, TextComponent, ViewDefinition, ViewName, Views,
};
pub use validator::parse_module;
