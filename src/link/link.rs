// Hyperlinks built on URI templates

use serde::{Serialize, Serializer};

use super::relation::Relation;
use crate::error::Result;
use crate::template::{Bindings, Template, Uri};

/// A typed hyperlink: a relation plus a (possibly partly bound) template.
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    rel: Relation,
    template: Template,
    title: Option<String>,
    media_type: Option<String>,
    hreflang: Option<String>,
}

impl Link {
    pub fn new(rel: impl Into<Relation>, template: Template) -> Self {
        Self {
            rel: rel.into(),
            template,
            title: None,
            media_type: None,
            hreflang: None,
        }
    }

    /// Parse `template` and wrap it in a link.
    pub fn parse(rel: impl Into<Relation>, template: &str) -> Result<Self> {
        Ok(Self::new(rel, Template::parse(template)?))
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_media_type(mut self, media_type: impl Into<String>) -> Self {
        self.media_type = Some(media_type.into());
        self
    }

    pub fn with_hreflang(mut self, hreflang: impl Into<String>) -> Self {
        self.hreflang = Some(hreflang.into());
        self
    }

    pub fn rel(&self) -> &Relation {
        &self.rel
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn media_type(&self) -> Option<&str> {
        self.media_type.as_deref()
    }

    pub fn hreflang(&self) -> Option<&str> {
        self.hreflang.as_deref()
    }

    pub fn bind<I, S>(&self, name: &str, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(self.with_template(self.template.bind(name, values)?))
    }

    pub fn bind_optional<I, S>(&self, name: &str, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = Option<S>>,
        S: AsRef<str>,
    {
        Ok(self.with_template(self.template.bind_optional(name, values)?))
    }

    pub fn unbind(&self, name: &str) -> Result<Self> {
        Ok(self.with_template(self.template.unbind(name)?))
    }

    /// The resolved target of this link.
    pub fn href(&self) -> Result<Uri> {
        self.template.to_uri()
    }

    /// True while a path or mandatory query variable is still unbound.
    pub fn is_templated(&self) -> bool {
        !self.template.is_fully_bound()
    }

    /// Match a concrete URI against this link's template.
    pub fn match_uri(&self, candidate: impl AsRef<str>) -> Option<Bindings> {
        self.template.match_uri(candidate)
    }

    fn with_template(&self, template: Template) -> Self {
        Self {
            template,
            ..self.clone()
        }
    }
}

/// HAL-style wire form of a link
#[derive(Serialize)]
struct LinkObject<'a> {
    rel: &'a str,
    href: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    templated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    media_type: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    hreflang: Option<&'a str>,
}

impl Serialize for Link {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let templated = self.is_templated();
        LinkObject {
            rel: self.rel.as_str(),
            href: self.template.render(!templated),
            templated,
            title: self.title(),
            media_type: self.media_type(),
            hreflang: self.hreflang(),
        }
        .serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TemplateError;

    #[test]
    fn test_builder_attributes() {
        let link = Link::parse("self", "/category/{id}")
            .unwrap()
            .with_title("Category")
            .with_media_type("application/json")
            .with_hreflang("en");

        assert_eq!(link.rel(), &Relation::SelfLink);
        assert_eq!(link.title(), Some("Category"));
        assert_eq!(link.media_type(), Some("application/json"));
        assert_eq!(link.hreflang(), Some("en"));
    }

    #[test]
    fn test_bind_keeps_attributes() {
        let link = Link::parse("item", "/category/{id}")
            .unwrap()
            .with_title("Category");
        let bound = link.bind("id", ["42"]).unwrap();

        assert_eq!(bound.title(), Some("Category"));
        assert_eq!(bound.href().unwrap().as_str(), "/category/42");
        assert!(link.is_templated());
        assert!(!bound.is_templated());
    }

    #[test]
    fn test_bind_undeclared_fails() {
        let link = Link::parse("item", "/category/{id}").unwrap();
        assert!(matches!(
            link.bind("lang", ["en"]),
            Err(TemplateError::UndefinedVariable { .. })
        ));
    }

    #[test]
    fn test_optional_params_do_not_make_link_templated() {
        let link = Link::parse("search", "/search{?q}").unwrap();
        assert!(!link.is_templated());
    }

    #[test]
    fn test_serialize_templated_link() {
        let link = Link::parse("next", "/category/{id}{?lang}")
            .unwrap()
            .with_title("Next");
        let json = serde_json::to_value(&link).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "rel": "next",
                "href": "/category/{id}{?lang}",
                "templated": true,
                "title": "Next"
            })
        );
    }

    #[test]
    fn test_serialize_resolved_link() {
        let link = Link::parse("self", "/category/{id}{?lang}")
            .unwrap()
            .with_media_type("text/html")
            .bind("id", ["42"])
            .unwrap()
            .bind("lang", ["en"])
            .unwrap();
        let json = serde_json::to_value(&link).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "rel": "self",
                "href": "/category/42?lang=en",
                "type": "text/html"
            })
        );
    }
}
