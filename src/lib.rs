//! Restricted URI templates: parse, bind, render, and match.
//!
//! ```
//! use uritmpl::Template;
//!
//! let template = Template::parse("/category/{id}{?lang}")?;
//! let bound = template.bind("id", ["42"])?.bind("lang", ["en"])?;
//! assert_eq!(bound.render(true), "/category/42?lang=en");
//!
//! let captures = template.match_uri("/category/7?lang=fr").unwrap();
//! assert_eq!(captures.first("id"), Some("7"));
//! # Ok::<(), uritmpl::TemplateError>(())
//! ```

pub mod config;
pub mod error;
pub mod link;
pub mod template;

pub use error::{Result, TemplateError};
pub use link::{Link, Relation};
pub use template::{Bindings, Component, QueryParam, Template, TemplateParser, Uri, VarSpec};

/// Parse template grammar.
pub fn parse(text: &str) -> Result<Template> {
    Template::parse(text)
}

/// Bind `name` to `values` on a copy of `template`.
pub fn bind<I, S>(template: &Template, name: &str, values: I) -> Result<Template>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    template.bind(name, values)
}

/// Render resolved (`true`) or unresolved (`false`) text.
pub fn render(template: &Template, resolve: bool) -> String {
    template.render(resolve)
}

/// The resolved form as a URI value.
pub fn to_uri(template: &Template) -> Result<Uri> {
    template.to_uri()
}

/// Match a concrete URI; `None` means the URI does not fit the template.
pub fn match_uri(template: &Template, candidate: impl AsRef<str>) -> Option<Bindings> {
    template.match_uri(candidate)
}
