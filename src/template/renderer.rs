// Template rendering to grammar text or to a URI

use std::fmt;

use super::ast::{Component, QueryParam, Template};
use super::uri::Uri;
use crate::error::Result;

/// Appends `key=value` pairs, opening with `?` and joining with `&`.
struct QueryWriter<'a> {
    out: &'a mut String,
    started: bool,
}

impl<'a> QueryWriter<'a> {
    fn new(out: &'a mut String) -> Self {
        Self {
            out,
            started: false,
        }
    }

    fn pair(&mut self, key: &str, value: &str) {
        self.out.push(if self.started { '&' } else { '?' });
        self.started = true;
        self.out.push_str(key);
        self.out.push('=');
        self.out.push_str(value);
    }
}

impl Template {
    /// Render as a URI string when `resolve` is true, otherwise as template
    /// grammar that ignores bindings.
    pub fn render(&self, resolve: bool) -> String {
        if resolve {
            self.render_resolved()
        } else {
            self.render_unresolved()
        }
    }

    /// The resolved form as a URI value.
    pub fn to_uri(&self) -> Result<Uri> {
        Uri::parse(&self.render_resolved())
    }

    fn render_unresolved(&self) -> String {
        let mut out: String = self.path.iter().map(Component::text).collect();

        if !self.mandatory.is_empty() {
            let pairs: Vec<String> = self
                .mandatory
                .iter()
                .map(|param| format!("{}={}", param.key, param.spec.text()))
                .collect();
            out.push('?');
            out.push_str(&pairs.join("&"));
        }

        if !self.optional.is_empty() {
            let opener = if self.mandatory.is_empty() { '?' } else { '&' };
            let names: Vec<String> = self.optional.iter().map(group_entry).collect();
            out.push('{');
            out.push(opener);
            out.push_str(&names.join(","));
            out.push('}');
        }

        out
    }

    fn render_resolved(&self) -> String {
        let mut out = String::new();

        for component in self.path.iter() {
            let joined = component
                .var_spec()
                .and_then(|spec| self.joined_values(&spec.name));
            out.push_str(&component.resolve(joined.as_deref()));
        }

        let mut query = QueryWriter::new(&mut out);

        for param in self.mandatory.iter() {
            let values: Vec<&str> = self.bindings.values(&param.spec.name).collect();
            if param.spec.exploded && !values.is_empty() {
                for value in values {
                    query.pair(&param.key, value);
                }
            } else {
                query.pair(&param.key, &values.join(","));
            }
        }

        for param in self.optional.iter() {
            let values: Vec<&str> = self.bindings.values(&param.spec.name).collect();
            if param.spec.exploded {
                for value in values {
                    query.pair(&param.key, value);
                }
            } else if values.iter().any(|value| !value.is_empty()) {
                query.pair(&param.key, &values.join(","));
            }
        }

        out
    }

    fn joined_values(&self, name: &str) -> Option<String> {
        let values: Vec<&str> = self.bindings.values(name).collect();
        if values.is_empty() {
            None
        } else {
            Some(values.join(","))
        }
    }
}

fn group_entry(param: &QueryParam) -> String {
    if param.spec.exploded {
        format!("{}*", param.key)
    } else {
        param.key.clone()
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_unresolved())
    }
}
