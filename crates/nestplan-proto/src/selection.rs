//! Selection tree types supplied by the query-language front end.
//!
//! A selection is a list of [`Selection`] nodes. Each node is either a
//! concrete field (possibly with arguments and a nested selection) or a
//! spread of a named fragment that has to be expanded before planning.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Named, reusable selection lists keyed by fragment name.
pub type Fragments = HashMap<String, Vec<Selection>>;

/// Variable bindings for one request, already resolved to literal values.
pub type Variables = serde_json::Map<String, serde_json::Value>;

/// A node in a selection list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Selection {
    /// A concrete field.
    Field(FieldSelection),
    /// A reference to a named fragment.
    Spread(FragmentSpread),
}

impl Selection {
    /// Create a leaf field selection.
    pub fn field(name: impl Into<String>) -> Self {
        Selection::Field(FieldSelection::new(name))
    }

    /// Create a nested object selection.
    pub fn object(name: impl Into<String>, selection: Vec<Selection>) -> Self {
        Selection::Field(FieldSelection::new(name).with_selection(selection))
    }

    /// Create a fragment spread.
    pub fn spread(name: impl Into<String>) -> Self {
        Selection::Spread(FragmentSpread { name: name.into() })
    }

    /// Get the field if this node is one.
    pub fn as_field(&self) -> Option<&FieldSelection> {
        match self {
            Selection::Field(field) => Some(field),
            Selection::Spread(_) => None,
        }
    }
}

impl From<FieldSelection> for Selection {
    fn from(field: FieldSelection) -> Self {
        Selection::Field(field)
    }
}

/// A concrete field in a selection list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldSelection {
    /// Field name as declared on the entity (attribute or association).
    pub name: String,
    /// Unresolved arguments.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<Argument>,
    /// Nested selection; present only when the field denotes an object.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selection: Option<Vec<Selection>>,
}

impl FieldSelection {
    /// Create a leaf field with no arguments.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: vec![],
            selection: None,
        }
    }

    /// Set the nested selection.
    pub fn with_selection(mut self, selection: Vec<Selection>) -> Self {
        self.selection = Some(selection);
        self
    }

    /// Add an argument.
    pub fn with_argument(mut self, name: impl Into<String>, value: impl Into<ArgValue>) -> Self {
        self.arguments.push(Argument {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    /// Check if this field has no nested selection.
    pub fn is_leaf(&self) -> bool {
        self.selection.is_none()
    }

    /// Nested selection, or an empty slice for leaf fields.
    pub fn children(&self) -> &[Selection] {
        self.selection.as_deref().unwrap_or(&[])
    }
}

/// A reference to a named fragment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FragmentSpread {
    /// Fragment name.
    #[serde(rename = "spread")]
    pub name: String,
}

/// A named argument on a field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Argument {
    /// Argument name.
    pub name: String,
    /// Unresolved argument value.
    pub value: ArgValue,
}

/// An argument value that may still contain variable references.
///
/// In JSON a variable is written as `{"$var": "name"}`; every other JSON value
/// maps onto the literal variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArgValue {
    /// Reference to a request variable.
    Variable {
        #[serde(rename = "$var")]
        name: String,
    },
    /// Null literal.
    Null,
    /// Boolean literal.
    Bool(bool),
    /// Integer literal.
    Int(i64),
    /// Floating point literal.
    Float(f64),
    /// String literal.
    String(String),
    /// Enum literal (e.g. `DESC`); resolves to a string.
    Enum(String),
    /// List literal.
    List(Vec<ArgValue>),
    /// Object literal.
    Object(BTreeMap<String, ArgValue>),
}

impl ArgValue {
    /// Create a variable reference.
    pub fn variable(name: impl Into<String>) -> Self {
        ArgValue::Variable { name: name.into() }
    }

    /// Create an object literal from key/value pairs.
    pub fn object<K: Into<String>>(entries: impl IntoIterator<Item = (K, ArgValue)>) -> Self {
        ArgValue::Object(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl From<bool> for ArgValue {
    fn from(v: bool) -> Self {
        ArgValue::Bool(v)
    }
}

impl From<i64> for ArgValue {
    fn from(v: i64) -> Self {
        ArgValue::Int(v)
    }
}

impl From<i32> for ArgValue {
    fn from(v: i32) -> Self {
        ArgValue::Int(v as i64)
    }
}

impl From<f64> for ArgValue {
    fn from(v: f64) -> Self {
        ArgValue::Float(v)
    }
}

impl From<&str> for ArgValue {
    fn from(v: &str) -> Self {
        ArgValue::String(v.to_string())
    }
}

impl From<String> for ArgValue {
    fn from(v: String) -> Self {
        ArgValue::String(v)
    }
}

impl From<Vec<ArgValue>> for ArgValue {
    fn from(v: Vec<ArgValue>) -> Self {
        ArgValue::List(v)
    }
}

/// The resolution context for one request: the root selection, the fragment
/// table it may reference, and the variable bindings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestContext {
    /// Root selection list.
    pub selection: Vec<Selection>,
    /// Fragment lookup table.
    #[serde(default)]
    pub fragments: Fragments,
    /// Variable bindings.
    #[serde(default)]
    pub variables: Variables,
}

impl RequestContext {
    /// Create a context for a root selection.
    pub fn new(selection: Vec<Selection>) -> Self {
        Self {
            selection,
            fragments: Fragments::new(),
            variables: Variables::new(),
        }
    }

    /// Register a fragment.
    pub fn with_fragment(mut self, name: impl Into<String>, selection: Vec<Selection>) -> Self {
        self.fragments.insert(name.into(), selection);
        self
    }

    /// Bind a variable.
    pub fn with_variable(mut self, name: impl Into<String>, value: serde_json::Value) -> Self {
        self.variables.insert(name.into(), value);
        self
    }
}
