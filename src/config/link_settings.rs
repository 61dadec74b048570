use serde::{Deserialize, Serialize};

use crate::error::TemplateError;
use crate::link::Link;

/// One catalog entry as written in YAML.
#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct LinkSettings {
    pub name: String,
    pub rel: String,
    pub template: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hreflang: Option<String>,
}

impl TryFrom<LinkSettings> for Link {
    type Error = TemplateError;

    fn try_from(value: LinkSettings) -> Result<Self, Self::Error> {
        let mut link = Link::parse(value.rel.as_str(), &value.template)?;
        if let Some(title) = value.title {
            link = link.with_title(title);
        }
        if let Some(media_type) = value.media_type {
            link = link.with_media_type(media_type);
        }
        if let Some(hreflang) = value.hreflang {
            link = link.with_hreflang(hreflang);
        }
        Ok(link)
    }
}
