//! Definition tree types
//!
//! A module definition describes a split list/detail/empty screen as a
//! tree of typed components. The union over component variants is
//! closed and discriminated by `tag`; containers own ordered children.
//!
//! Deserialization of the whole tree goes through
//! [`super::validator::parse_module`], which walks the raw JSON and
//! reports dotted paths on failure. The leaf structs here still derive
//! `Deserialize` so the validator can delegate field parsing to serde.

use serde::{Deserialize, Serialize};

use super::action::Action;
use super::binding::{Bindable, Path};
use super::condition::Condition;

/// Fixed screen layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// Split list/detail/empty screen
    Splitscreen,
}

/// The three fixed view slots of a splitscreen layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewName {
    List,
    Detail,
    Empty,
}

impl ViewName {
    /// All view slots in declaration order
    pub const ALL: [ViewName; 3] = [ViewName::List, ViewName::Detail, ViewName::Empty];

    /// String form, matching the `views` key
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewName::List => "list",
            ViewName::Detail => "detail",
            ViewName::Empty => "empty",
        }
    }
}

/// A complete module definition, immutable for the client session
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModuleDefinition {
    /// Screen layout tag
    pub layout: Layout,
    /// The three views keyed by their fixed names
    pub views: Views,
}

impl ModuleDefinition {
    /// The view for a given slot
    pub fn view(&self, name: ViewName) -> &ViewDefinition {
        match name {
            ViewName::List => &self.views.list,
            ViewName::Detail => &self.views.detail,
            ViewName::Empty => &self.views.empty,
        }
    }
}

/// The fixed view mapping; all three slots are required
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Views {
    pub list: ViewDefinition,
    pub detail: ViewDefinition,
    pub empty: ViewDefinition,
}

/// One named view: an ordered sequence of components
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewDefinition {
    /// Must equal the key this view sits under
    pub name: ViewName,
    /// Ordered component tree roots
    pub children: Vec<Component>,
}

/// Envelope fields shared by every component variant
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentCommon {
    /// Styling hook, uninterpreted here
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    /// Implicit data source path, resolved against application state
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bind: Option<Path>,
    /// Show the component only while this evaluates true
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible_when: Option<Condition>,
    /// Disable the component while this evaluates true
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disabled_when: Option<Condition>,
}

/// The closed component union, discriminated by `tag`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "tag", rename_all = "lowercase")]
pub enum Component {
    Text(TextComponent),
    Input(InputComponent),
    Select(SelectComponent),
    Button(ButtonComponent),
    Table(TableComponent),
    Card(CardComponent),
    Group(GroupComponent),
    Form(FormComponent),
    Modal(ModalComponent),
}

impl Component {
    /// The `tag` discriminator string
    pub fn tag(&self) -> &'static str {
        match self {
            Component::Text(_) => "text",
            Component::Input(_) => "input",
            Component::Select(_) => "select",
            Component::Button(_) => "button",
            Component::Table(_) => "table",
            Component::Card(_) => "card",
            Component::Group(_) => "group",
            Component::Form(_) => "form",
            Component::Modal(_) => "modal",
        }
    }

    /// The shared envelope of any variant
    pub fn common(&self) -> &ComponentCommon {
        match self {
            Component::Text(c) => &c.common,
            Component::Input(c) => &c.common,
            Component::Select(c) => &c.common,
            Component::Button(c) => &c.common,
            Component::Table(c) => &c.common,
            Component::Card(c) => &c.common,
            Component::Group(c) => &c.common,
            Component::Form(c) => &c.common,
            Component::Modal(c) => &c.common,
        }
    }

    /// Child components of container variants, empty otherwise
    pub fn children(&self) -> &[Component] {
        match self {
            Component::Group(c) => &c.children,
            Component::Form(c) => &c.children,
            Component::Modal(c) => &c.children,
            _ => &[],
        }
    }
}

/// Static or bound text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextComponent {
    #[serde(flatten)]
    pub common: ComponentCommon,
    /// Text content, literal or bound
    pub content: Bindable,
    /// Semantic element hint (h1, h2, h3, p, div, span)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html_tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Single-value form input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputComponent {
    #[serde(flatten)]
    pub common: ComponentCommon,
    /// Field name within the owning form
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub disabled: bool,
    /// Initial value, literal or bound
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Bindable>,
    /// Input kind (text, email, password, number, date, textarea)
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub input_type: Option<String>,
    /// Row count for textarea inputs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

/// Option-list form input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectComponent {
    #[serde(flatten)]
    pub common: ComponentCommon,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub multiple: bool,
    /// Option values, literal array or bound
    pub options: Bindable,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Bindable>,
}

/// Action trigger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ButtonComponent {
    #[serde(flatten)]
    pub common: ComponentCommon,
    /// Button caption
    pub text: String,
    /// Styling variant (primary, secondary, danger, success)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
    /// Action fired on click
    pub on_click: Action,
}

/// Column of a table component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableColumn {
    /// Record field to project into this column
    pub key: String,
    /// Header caption
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    /// Custom cell renderer name, uninterpreted here
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,
}

/// Record collection rendered as rows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableComponent {
    #[serde(flatten)]
    pub common: ComponentCommon,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub virtualized: bool,
    /// Action fired with the clicked row as record scope
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_row_click: Option<Action>,
    pub columns: Vec<TableColumn>,
}

/// Single labeled value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardComponent {
    #[serde(flatten)]
    pub common: ComponentCommon,
    pub title: String,
    pub value: Bindable,
}

/// Plain container
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupComponent {
    #[serde(flatten)]
    pub common: ComponentCommon,
    pub children: Vec<Component>,
}

/// Form container
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormComponent {
    #[serde(flatten)]
    pub common: ComponentCommon,
    /// Record path the form edits
    #[serde(rename = "ref", default, skip_serializing_if = "Option::is_none")]
    pub form_ref: Option<Path>,
    pub children: Vec<Component>,
}

/// Named overlay container
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModalComponent {
    #[serde(flatten)]
    pub common: ComponentCommon,
    /// Name used by modal actions to address this overlay
    pub name: String,
    pub title: String,
    /// Size hint (sm, md, lg, xl)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    pub children: Vec<Component>,
}

/// Recognized `tag` discriminators, used by the validator
pub const COMPONENT_TAGS: &[&str] = &[
    "text", "input", "select", "button", "table", "card", "group", "form", "modal",
];
