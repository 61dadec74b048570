// URI template engine
//
// This module parses restricted RFC 6570-style templates, binds values to
// their variables, renders them back to grammar or to URIs, and matches
// concrete URIs against them to recover the bindings.

mod ast;
mod binder;
mod matcher;
mod parser;
mod renderer;
mod uri;

pub use ast::{Bindings, Component, QueryParam, Template, VarSpec};
pub use parser::TemplateParser;
pub use uri::Uri;
