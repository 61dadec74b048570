// Syntax tree and value types for URI templates

use serde::ser::{Serialize, SerializeMap, Serializer};
use std::sync::Arc;

/// A named variable, optionally exploded (`{name*}`).
///
/// Query parameters use it directly; path variables wrap it in
/// [`Component::Variable`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarSpec {
    pub name: String,
    pub exploded: bool,
}

impl VarSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            exploded: false,
        }
    }

    pub fn with_exploded(mut self, exploded: bool) -> Self {
        self.exploded = exploded;
        self
    }

    /// Name as written inside braces, including the explode marker.
    pub(crate) fn expression(&self) -> String {
        if self.exploded {
            format!("{}*", self.name)
        } else {
            self.name.clone()
        }
    }

    /// Unresolved placeholder form, e.g. `{name}`.
    pub fn text(&self) -> String {
        format!("{{{}}}", self.expression())
    }
}

/// One piece of a template path, in left-to-right order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Component {
    /// Fixed text, including its terminating `/` when there is one
    Literal(String),
    /// A placeholder occupying a whole path segment
    Variable { spec: VarSpec, trailing_slash: bool },
}

impl Component {
    pub fn literal(text: impl Into<String>) -> Self {
        Component::Literal(text.into())
    }

    pub fn variable(spec: VarSpec, trailing_slash: bool) -> Self {
        Component::Variable {
            spec,
            trailing_slash,
        }
    }

    pub fn var_spec(&self) -> Option<&VarSpec> {
        match self {
            Component::Literal(_) => None,
            Component::Variable { spec, .. } => Some(spec),
        }
    }

    /// Unresolved text, as it appears in template grammar.
    pub fn text(&self) -> String {
        self.resolve(None)
    }

    /// Resolved text for an already comma-joined value, or the placeholder
    /// when the variable has no value.
    pub fn resolve(&self, value: Option<&str>) -> String {
        match self {
            Component::Literal(text) => text.clone(),
            Component::Variable {
                spec,
                trailing_slash,
            } => {
                let mut out = match value {
                    Some(value) => value.to_string(),
                    None => spec.text(),
                };
                if *trailing_slash {
                    out.push('/');
                }
                out
            }
        }
    }

    pub fn ends_with_slash(&self) -> bool {
        match self {
            Component::Literal(text) => text.ends_with('/'),
            Component::Variable { trailing_slash, .. } => *trailing_slash,
        }
    }
}

/// A query parameter: the emitted key and the variable that feeds it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryParam {
    pub key: String,
    pub spec: VarSpec,
}

impl QueryParam {
    pub fn new(key: impl Into<String>, spec: VarSpec) -> Self {
        Self {
            key: key.into(),
            spec,
        }
    }

    /// A parameter whose key is the variable's own name.
    pub fn named(spec: VarSpec) -> Self {
        Self {
            key: spec.name.clone(),
            spec,
        }
    }
}

/// Ordered multimap of variable name to value.
///
/// Used both for the values bound on a template and for the captures
/// returned by a successful match. Entries keep insertion order and a name
/// may appear many times.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bindings {
    entries: Arc<[(String, String)]>,
}

impl Bindings {
    pub fn new() -> Self {
        Self {
            entries: Arc::from(Vec::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// All values for `name`, in order.
    pub fn values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.entries
            .iter()
            .filter(move |(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn first<'a>(&'a self, name: &'a str) -> Option<&'a str> {
        self.values(name).next()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == name)
    }

    /// Distinct names in order of first appearance.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for (k, _) in self.entries.iter() {
            if !names.contains(&k.as_str()) {
                names.push(k);
            }
        }
        names
    }

    pub(crate) fn shares_storage(&self, other: &Bindings) -> bool {
        Arc::ptr_eq(&self.entries, &other.entries)
    }
}

impl Default for Bindings {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<(String, String)> for Bindings {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect::<Vec<_>>().into(),
        }
    }
}

impl Serialize for Bindings {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let names = self.names();
        let mut map = serializer.serialize_map(Some(names.len()))?;
        for name in names {
            let values: Vec<&str> = self.values(name).collect();
            map.serialize_entry(name, &values)?;
        }
        map.end()
    }
}

/// A parsed URI template.
///
/// The path and query structure is fixed at construction and shared between
/// every template derived from it by [`Template::bind`]; only the bindings
/// differ between derived values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pub(crate) path: Arc<[Component]>,
    pub(crate) mandatory: Arc<[QueryParam]>,
    pub(crate) optional: Arc<[QueryParam]>,
    pub(crate) bindings: Bindings,
}

impl Template {
    /// Assemble a template from explicit parts, with no bindings.
    pub fn from_parts(
        path: Vec<Component>,
        mandatory: Vec<QueryParam>,
        optional: Vec<QueryParam>,
    ) -> Self {
        Self {
            path: path.into(),
            mandatory: mandatory.into(),
            optional: optional.into(),
            bindings: Bindings::new(),
        }
    }

    pub fn path_segments(&self) -> &[Component] {
        &self.path
    }

    pub fn mandatory_params(&self) -> &[QueryParam] {
        &self.mandatory
    }

    pub fn optional_params(&self) -> &[QueryParam] {
        &self.optional
    }

    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    /// Every declared variable, path first, then mandatory, then optional
    /// query parameters. Repeated names are listed once.
    pub fn variable_names(&self) -> Vec<&str> {
        let path = self.path.iter().filter_map(Component::var_spec);
        let query = self
            .mandatory
            .iter()
            .chain(self.optional.iter())
            .map(|param| &param.spec);

        let mut names: Vec<&str> = Vec::new();
        for spec in path.chain(query) {
            if !names.contains(&spec.name.as_str()) {
                names.push(&spec.name);
            }
        }
        names
    }

    pub fn is_declared(&self, name: &str) -> bool {
        self.path
            .iter()
            .filter_map(Component::var_spec)
            .chain(self.mandatory.iter().map(|p| &p.spec))
            .chain(self.optional.iter().map(|p| &p.spec))
            .any(|spec| spec.name == name)
    }

    /// True when every path variable and every mandatory query variable has
    /// at least one bound value. Optional parameters never block this.
    pub fn is_fully_bound(&self) -> bool {
        self.path
            .iter()
            .filter_map(Component::var_spec)
            .chain(self.mandatory.iter().map(|p| &p.spec))
            .all(|spec| self.bindings.contains(&spec.name))
    }

    /// True when both templates use the same backing path and query lists.
    pub fn shares_structure(&self, other: &Template) -> bool {
        Arc::ptr_eq(&self.path, &other.path)
            && Arc::ptr_eq(&self.mandatory, &other.mandatory)
            && Arc::ptr_eq(&self.optional, &other.optional)
    }

    /// Structural equality, ignoring bindings.
    pub fn same_shape(&self, other: &Template) -> bool {
        self.path == other.path
            && self.mandatory == other.mandatory
            && self.optional == other.optional
    }
}
