// Variable binding with structural sharing

use tracing::debug;

use super::ast::{Bindings, Template};
use crate::error::{Result, TemplateError};

impl Template {
    /// Bind `name` to `values`, replacing any values it already had.
    ///
    /// Returns a new template sharing this one's path and query structure.
    /// Binding an empty list to a name that has no values returns an
    /// unchanged copy.
    pub fn bind<I, S>(&self, name: &str, values: I) -> Result<Template>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.bind_optional(name, values.into_iter().map(Some))
    }

    /// Like [`Template::bind`], dropping `None` entries instead of storing them.
    pub fn bind_optional<I, S>(&self, name: &str, values: I) -> Result<Template>
    where
        I: IntoIterator<Item = Option<S>>,
        S: AsRef<str>,
    {
        if !self.is_declared(name) {
            return Err(TemplateError::undefined(name));
        }

        let values: Vec<String> = values
            .into_iter()
            .flatten()
            .map(|value| value.as_ref().to_string())
            .collect();

        if values.is_empty() && !self.bindings.contains(name) {
            return Ok(self.clone());
        }

        debug!(name, count = values.len(), "Binding template variable");

        Ok(Template {
            path: self.path.clone(),
            mandatory: self.mandatory.clone(),
            optional: self.optional.clone(),
            bindings: self.bindings.replaced(name, values),
        })
    }

    /// Remove every value bound to `name`.
    pub fn unbind(&self, name: &str) -> Result<Template> {
        self.bind(name, std::iter::empty::<&str>())
    }
}

impl Bindings {
    /// Drop every entry for `name`, then append `values` in order.
    fn replaced(&self, name: &str, values: Vec<String>) -> Bindings {
        self.iter()
            .filter(|(key, _)| *key != name)
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .chain(values.into_iter().map(|value| (name.to_string(), value)))
            .collect()
    }
}
