// Link relation types

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

/// A link relation type.
///
/// Registered relations get their own variant; anything else (usually an
/// extension relation written as a URI) is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Relation {
    SelfLink,
    Next,
    Prev,
    First,
    Last,
    Collection,
    Item,
    Edit,
    Related,
    Alternate,
    Search,
    Up,
    DescribedBy,
    Extension(String),
}

const REGISTERED: [Relation; 13] = [
    Relation::SelfLink,
    Relation::Next,
    Relation::Prev,
    Relation::First,
    Relation::Last,
    Relation::Collection,
    Relation::Item,
    Relation::Edit,
    Relation::Related,
    Relation::Alternate,
    Relation::Search,
    Relation::Up,
    Relation::DescribedBy,
];

/// Registered names to relations, built once on first lookup
static REGISTRY: LazyLock<HashMap<&'static str, Relation>> = LazyLock::new(|| {
    let mut registry: HashMap<&'static str, Relation> = REGISTERED
        .iter()
        .filter_map(|rel| rel.registered_name().map(|name| (name, rel.clone())))
        .collect();
    registry.insert("previous", Relation::Prev);
    registry
});

impl Relation {
    /// Look up a relation name, falling back to an extension relation.
    /// Registered names are matched ASCII case-insensitively.
    pub fn parse(name: &str) -> Relation {
        REGISTRY
            .get(name.to_ascii_lowercase().as_str())
            .cloned()
            .unwrap_or_else(|| Relation::Extension(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        match self {
            Relation::Extension(name) => name,
            registered => registered.registered_name().unwrap_or_default(),
        }
    }

    pub fn is_registered(&self) -> bool {
        !matches!(self, Relation::Extension(_))
    }

    fn registered_name(&self) -> Option<&'static str> {
        let name = match self {
            Relation::SelfLink => "self",
            Relation::Next => "next",
            Relation::Prev => "prev",
            Relation::First => "first",
            Relation::Last => "last",
            Relation::Collection => "collection",
            Relation::Item => "item",
            Relation::Edit => "edit",
            Relation::Related => "related",
            Relation::Alternate => "alternate",
            Relation::Search => "search",
            Relation::Up => "up",
            Relation::DescribedBy => "describedby",
            Relation::Extension(_) => return None,
        };
        Some(name)
    }
}

impl From<&str> for Relation {
    fn from(name: &str) -> Self {
        Relation::parse(name)
    }
}

impl From<String> for Relation {
    fn from(name: String) -> Self {
        Relation::parse(&name)
    }
}

impl From<Relation> for String {
    fn from(rel: Relation) -> Self {
        rel.as_str().to_string()
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
