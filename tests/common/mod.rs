// Common test utilities shared across test files

use uritmpl::Template;

/// Parse a template that is known to be valid
#[allow(dead_code)]
pub fn template(text: &str) -> Template {
    Template::parse(text).unwrap_or_else(|e| panic!("Failed to parse '{}': {}", text, e))
}

/// Parse a template and bind each `(name, values)` pair in order
#[allow(dead_code)]
pub fn bound(text: &str, bindings: &[(&str, &[&str])]) -> Template {
    bindings.iter().fold(template(text), |t, (name, values)| {
        t.bind(name, values.iter())
            .unwrap_or_else(|e| panic!("Failed to bind '{}': {}", name, e))
    })
}

/// Catalog shared by the link tests
#[allow(dead_code)]
pub const CATALOG_YAML: &str = r#"
- name: category
  rel: item
  template: /category/{id}{?lang}
  title: Category
  hreflang: en
- name: search
  rel: search
  template: /search{?q,page}
  type: text/html
- name: self
  rel: self
  template: https://shop.example.com/items/{id}/?fields={field*}
"#;
