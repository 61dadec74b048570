// YAML link catalog

pub mod catalog;
pub mod link_settings;

pub use catalog::{CatalogError, LinkCatalog};
pub use link_settings::LinkSettings;
