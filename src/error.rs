// Error handling for uritmpl

use thiserror::Error;

/// Result type alias for template operations.
pub type Result<T> = std::result::Result<T, TemplateError>;

/// Errors raised while building, binding or converting a template.
///
/// A failed match is not an error: `Template::match_uri` returns `None`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TemplateError {
    #[error("Malformed template '{template}' at position {position}: {reason}")]
    Malformed {
        template: String,
        position: usize,
        reason: String,
    },

    #[error("Undefined variable: {name}")]
    UndefinedVariable { name: String },

    #[error("Invalid URI '{uri}': {source}")]
    InvalidUri {
        uri: String,
        #[source]
        source: url::ParseError,
    },
}

impl TemplateError {
    pub(crate) fn malformed(template: &str, position: usize, reason: impl Into<String>) -> Self {
        TemplateError::Malformed {
            template: template.to_string(),
            position,
            reason: reason.into(),
        }
    }

    pub(crate) fn undefined(name: &str) -> Self {
        TemplateError::UndefinedVariable {
            name: name.to_string(),
        }
    }
}
