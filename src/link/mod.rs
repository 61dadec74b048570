// Hyperlinks: relation types and links wrapping URI templates

#[allow(clippy::module_inception)]
mod link;
mod relation;

pub use link::Link;
pub use relation::Relation;
