// URI value produced by rendering a template

use serde::{Serialize, Serializer};
use std::fmt;
use url::Url;

use crate::error::{Result, TemplateError};

/// Authority used to resolve relative references when only their path and
/// query are of interest.
pub(crate) const PLACEHOLDER_BASE: &str = "http://localhost/";

/// An absolute URL or a relative reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Uri {
    Absolute(Url),
    Relative(String),
}

impl Uri {
    pub fn parse(text: &str) -> Result<Uri> {
        match Url::parse(text) {
            Ok(url) => Ok(Uri::Absolute(url)),
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                resolve_relative(text).map_err(|source| TemplateError::InvalidUri {
                    uri: text.to_string(),
                    source,
                })?;
                Ok(Uri::Relative(text.to_string()))
            }
            Err(source) => Err(TemplateError::InvalidUri {
                uri: text.to_string(),
                source,
            }),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Uri::Absolute(url) => url.as_str(),
            Uri::Relative(text) => text,
        }
    }

    pub fn is_absolute(&self) -> bool {
        matches!(self, Uri::Absolute(_))
    }

    pub fn as_url(&self) -> Option<&Url> {
        match self {
            Uri::Absolute(url) => Some(url),
            Uri::Relative(_) => None,
        }
    }
}

/// Resolve a relative reference against the placeholder authority.
pub(crate) fn resolve_relative(text: &str) -> std::result::Result<Url, url::ParseError> {
    Url::parse(PLACEHOLDER_BASE)?.join(text)
}

impl fmt::Display for Uri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for Uri {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Serialize for Uri {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
