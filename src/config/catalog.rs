use std::collections::HashSet;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::{config::link_settings::LinkSettings, error::TemplateError, link::Link};

/// Errors raised while loading a link catalog.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Could not read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid yaml configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Duplicate link name: {0}")]
    DuplicateName(String),

    #[error("Invalid template for link '{name}': {source}")]
    Template {
        name: String,
        #[source]
        source: TemplateError,
    },
}

/// Named links loaded from a YAML list, kept in file order.
#[derive(Debug, Clone, Default)]
pub struct LinkCatalog {
    entries: Vec<(String, Link)>,
}

impl LinkCatalog {
    /// Build a catalog, rejecting duplicate names and malformed templates.
    pub fn from_settings(settings: Vec<LinkSettings>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        let mut entries = Vec::with_capacity(settings.len());

        for entry in settings {
            if !seen.insert(entry.name.clone()) {
                return Err(CatalogError::DuplicateName(entry.name));
            }
            let name = entry.name.clone();
            let link = Link::try_from(entry).map_err(|source| CatalogError::Template {
                name: name.clone(),
                source,
            })?;
            debug!(name = %name, rel = %link.rel(), "Loaded catalog link");
            entries.push((name, link));
        }

        Ok(Self { entries })
    }

    pub fn from_yaml_str(yml: &str) -> Result<Self, CatalogError> {
        let settings: Vec<LinkSettings> = serde_yaml::from_str(yml)?;
        Self::from_settings(settings)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let yml = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_yaml_str(&yml)?;
        info!(path = %path.display(), links = catalog.len(), "Loaded link catalog");
        Ok(catalog)
    }

    pub fn get(&self, name: &str) -> Option<&Link> {
        self.entries
            .iter()
            .find(|(entry, _)| entry == name)
            .map(|(_, link)| link)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Link)> {
        self.entries.iter().map(|(name, link)| (name.as_str(), link))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
