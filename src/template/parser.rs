// Single-pass template parser

use std::str::FromStr;

use tracing::debug;

use super::ast::{Component, QueryParam, Template, VarSpec};
use crate::error::{Result, TemplateError};

/// Scans a template string left to right into path components and
/// mandatory/optional query parameters.
///
/// Accepted shapes:
/// - `/`-terminated literal text, and one trailing literal with no `/`
/// - `{name}` or `{name*}` occupying a whole path segment, optionally followed by `/`
/// - `?key={name}&key2={name2}` mandatory query parameters
/// - `{?a,b*}` optional parameters, or `{&a,b}` after mandatory ones
pub struct TemplateParser {
    input: String,
    pos: usize,
}

impl TemplateParser {
    pub fn parse(template: &str) -> Result<Template> {
        let mut parser = Self {
            input: template.to_string(),
            pos: 0,
        };
        let parsed = parser.parse_template()?;
        debug!(
            template,
            segments = parsed.path_segments().len(),
            mandatory = parsed.mandatory_params().len(),
            optional = parsed.optional_params().len(),
            "Parsed template"
        );
        Ok(parsed)
    }

    fn parse_template(&mut self) -> Result<Template> {
        let mut path = Vec::new();
        let mut literal_buf = String::new();

        while let Some(ch) = self.peek_char() {
            match ch {
                '/' => {
                    literal_buf.push(self.consume_char()?);
                    path.push(Component::Literal(std::mem::take(&mut literal_buf)));
                }
                '?' => break,
                '{' if self.peek_ahead(1) == Some('?') => break,
                '{' if self.peek_ahead(1) == Some('&') => {
                    return Err(self.error("'{&' group must follow a mandatory query parameter"));
                }
                '{' => {
                    if !literal_buf.is_empty() {
                        return Err(self.error(format!(
                            "Variable must start a path segment, found literal '{}' before it",
                            literal_buf
                        )));
                    }
                    let spec = self.parse_braced_var()?;
                    let trailing_slash = match self.peek_char() {
                        Some('/') => {
                            self.consume_char()?;
                            true
                        }
                        Some('?') => true,
                        None => false,
                        Some('{') if self.peek_ahead(1) == Some('?') => false,
                        Some(ch) => {
                            return Err(self.error(format!(
                                "Expected '/' after variable '{}' but found '{}'",
                                spec.name, ch
                            )));
                        }
                    };
                    path.push(Component::variable(spec, trailing_slash));
                }
                '}' => return Err(self.error("Unexpected closing brace")),
                '#' => return Err(self.error("Fragments are not supported")),
                _ => literal_buf.push(self.consume_char()?),
            }
        }

        // Flush remaining literal
        if !literal_buf.is_empty() {
            path.push(Component::Literal(literal_buf));
        }

        let mut mandatory = Vec::new();
        let mut optional = Vec::new();

        match self.peek_char() {
            Some('?') => {
                self.consume_char()?;
                self.parse_query_string(&mut mandatory, &mut optional)?;
            }
            Some('{') => optional = self.parse_optional_group('?')?,
            _ => {}
        }

        self.expect_end()?;

        Ok(Template::from_parts(path, mandatory, optional))
    }

    /// `key={var}` pairs joined by `&`, optionally closed by a `{&...}` group.
    fn parse_query_string(
        &mut self,
        mandatory: &mut Vec<QueryParam>,
        optional: &mut Vec<QueryParam>,
    ) -> Result<()> {
        loop {
            let key = self.parse_param_key()?;
            self.expect_char('=')?;
            let spec = self.parse_braced_var()?;
            mandatory.push(QueryParam::new(key, spec));

            match self.peek_char() {
                None => return Ok(()),
                Some('&') => {
                    self.consume_char()?;
                }
                Some('{') if self.peek_ahead(1) == Some('&') => {
                    *optional = self.parse_optional_group('&')?;
                    return Ok(());
                }
                Some(ch) => {
                    return Err(self.error(format!(
                        "Expected '&' or '{{&' after query parameter but found '{}'",
                        ch
                    )));
                }
            }
        }
    }

    fn parse_optional_group(&mut self, opener: char) -> Result<Vec<QueryParam>> {
        self.expect_char('{')?;
        self.expect_char(opener)?;

        let mut params = Vec::new();
        loop {
            let spec = self.parse_var_spec()?;
            params.push(QueryParam::named(spec));

            match self.peek_char() {
                Some(',') => {
                    self.consume_char()?;
                }
                Some('}') => {
                    self.consume_char()?;
                    return Ok(params);
                }
                Some(ch) => {
                    return Err(self.error(format!(
                        "Expected ',' or '}}' in parameter group but found '{}'",
                        ch
                    )));
                }
                None => return Err(self.error("Unterminated parameter group")),
            }
        }
    }

    fn parse_braced_var(&mut self) -> Result<VarSpec> {
        self.expect_char('{')?;
        let spec = self.parse_var_spec()?;
        self.expect_char('}')?;
        Ok(spec)
    }

    fn parse_var_spec(&mut self) -> Result<VarSpec> {
        let name = self.parse_variable_name()?;
        let exploded = if self.peek_char() == Some('*') {
            self.consume_char()?;
            true
        } else {
            false
        };
        Ok(VarSpec::new(name).with_exploded(exploded))
    }

    fn parse_variable_name(&mut self) -> Result<String> {
        let mut name = String::new();

        while let Some(ch) = self.peek_char() {
            if ch.is_ascii_alphanumeric() || ch == '_' || ch == '.' || ch == '%' {
                name.push(self.consume_char()?);
            } else {
                break;
            }
        }

        if name.is_empty() {
            return Err(match self.peek_char() {
                Some(ch) => self.error(format!("Expected variable name but found '{}'", ch)),
                None => self.error("Expected variable name but found end of input"),
            });
        }

        Ok(name)
    }

    fn parse_param_key(&mut self) -> Result<String> {
        let mut key = String::new();

        while let Some(ch) = self.peek_char() {
            match ch {
                '=' => break,
                '{' | '}' | '&' | '?' | '#' | '/' | ',' => {
                    return Err(self.error(format!(
                        "Invalid character '{}' in query parameter name",
                        ch
                    )));
                }
                _ => key.push(self.consume_char()?),
            }
        }

        if key.is_empty() {
            return Err(self.error("Expected query parameter name"));
        }

        Ok(key)
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_ahead(&self, offset: usize) -> Option<char> {
        self.input[self.pos..].chars().nth(offset)
    }

    fn consume_char(&mut self) -> Result<char> {
        let ch = self
            .peek_char()
            .ok_or_else(|| self.error("Unexpected end of input"))?;
        self.pos += ch.len_utf8();
        Ok(ch)
    }

    fn expect_char(&mut self, expected: char) -> Result<()> {
        match self.peek_char() {
            Some(ch) if ch == expected => {
                self.consume_char()?;
                Ok(())
            }
            Some(ch) => Err(self.error(format!("Expected '{}' but found '{}'", expected, ch))),
            None => Err(self.error(format!("Expected '{}' but found end of input", expected))),
        }
    }

    fn expect_end(&self) -> Result<()> {
        match self.peek_char() {
            None => Ok(()),
            Some(ch) => Err(self.error(format!("Unexpected '{}' after query string", ch))),
        }
    }

    fn error(&self, reason: impl Into<String>) -> TemplateError {
        TemplateError::malformed(&self.input, self.pos, reason)
    }
}

impl Template {
    /// Parse template grammar into a template with no bindings.
    pub fn parse(template: &str) -> Result<Self> {
        TemplateParser::parse(template)
    }
}

impl FromStr for Template {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self> {
        TemplateParser::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn literal(text: &str) -> Component {
        Component::literal(text)
    }

    fn var(name: &str, trailing_slash: bool) -> Component {
        Component::variable(VarSpec::new(name), trailing_slash)
    }

    fn reason(result: Result<Template>) -> String {
        match result {
            Err(TemplateError::Malformed { reason, .. }) => reason,
            other => panic!("Expected malformed template error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_literal_segments_keep_slash() {
        let template = TemplateParser::parse("/category/list").unwrap();
        assert_eq!(
            template.path_segments(),
            &[literal("/"), literal("category/"), literal("list")]
        );
        assert!(template.mandatory_params().is_empty());
        assert!(template.optional_params().is_empty());
        assert!(template.bindings().is_empty());
    }

    #[test]
    fn test_parse_final_variable_has_no_trailing_slash() {
        let template = TemplateParser::parse("/category/{id}").unwrap();
        assert_eq!(
            template.path_segments(),
            &[literal("/"), literal("category/"), var("id", false)]
        );
    }

    #[test]
    fn test_parse_variable_followed_by_slash() {
        let template = TemplateParser::parse("/category/{id}/").unwrap();
        assert_eq!(template.path_segments()[2], var("id", true));
        assert_eq!(template.path_segments().len(), 3);
    }

    #[test]
    fn test_parse_exploded_path_variable() {
        let template = TemplateParser::parse("/tags/{tag*}").unwrap();
        match &template.path_segments()[2] {
            Component::Variable { spec, .. } => {
                assert_eq!(spec.name, "tag");
                assert!(spec.exploded);
            }
            _ => panic!("Expected variable"),
        }
    }

    #[test]
    fn test_parse_adjacent_optional_group() {
        let template = TemplateParser::parse("/category/{id}{?lang}").unwrap();
        assert_eq!(template.path_segments()[2], var("id", false));
        assert_eq!(
            template.optional_params(),
            &[QueryParam::named(VarSpec::new("lang"))]
        );
        assert!(template.mandatory_params().is_empty());
    }

    #[test]
    fn test_parse_optional_group_after_literal() {
        let template = TemplateParser::parse("/search{?q,page*}").unwrap();
        assert_eq!(template.path_segments(), &[literal("/"), literal("search")]);
        let optional = template.optional_params();
        assert_eq!(optional.len(), 2);
        assert_eq!(optional[0].key, "q");
        assert!(!optional[0].spec.exploded);
        assert_eq!(optional[1].key, "page");
        assert!(optional[1].spec.exploded);
    }

    #[test]
    fn test_parse_mandatory_params() {
        let template = TemplateParser::parse("/items?lang={language}&tag={tag*}").unwrap();
        let mandatory = template.mandatory_params();
        assert_eq!(mandatory.len(), 2);
        assert_eq!(mandatory[0], QueryParam::new("lang", VarSpec::new("language")));
        assert_eq!(mandatory[1].key, "tag");
        assert!(mandatory[1].spec.exploded);
    }

    #[test]
    fn test_parse_mandatory_then_continuation_group() {
        let template = TemplateParser::parse("/items/{id}?lang={lang}{&page,size}").unwrap();
        assert_eq!(template.path_segments()[2], var("id", true));
        assert_eq!(template.mandatory_params().len(), 1);
        let names: Vec<&str> = template
            .optional_params()
            .iter()
            .map(|p| p.key.as_str())
            .collect();
        assert_eq!(names, vec!["page", "size"]);
    }

    #[test]
    fn test_parse_question_mark_after_variable_sets_trailing_slash() {
        let template = TemplateParser::parse("/category/{id}?lang={lang}").unwrap();
        assert_eq!(template.path_segments()[2], var("id", true));
        assert_eq!(template.mandatory_params().len(), 1);
    }

    #[test]
    fn test_parse_absolute_template() {
        let template = TemplateParser::parse("http://example.com/{id}").unwrap();
        assert_eq!(
            template.path_segments(),
            &[
                literal("http:/"),
                literal("/"),
                literal("example.com/"),
                var("id", false)
            ]
        );
    }

    #[test]
    fn test_parse_empty_template() {
        let template = TemplateParser::parse("").unwrap();
        assert!(template.path_segments().is_empty());
    }

    #[test]
    fn test_parse_from_str() {
        let template: Template = "/a/{b}".parse().unwrap();
        assert_eq!(template.path_segments().len(), 3);
    }

    #[test]
    fn test_unterminated_variable_fails() {
        let result = TemplateParser::parse("/category/{id");
        assert!(reason(result).contains("end of input"));
    }

    #[test]
    fn test_nested_brace_fails() {
        let result = TemplateParser::parse("/category/{{id}}");
        assert!(reason(result).contains("Expected variable name"));
    }

    #[test]
    fn test_stray_closing_brace_fails() {
        let result = TemplateParser::parse("/category/id}");
        assert!(reason(result).contains("Unexpected closing brace"));
    }

    #[test]
    fn test_literal_prefix_before_variable_fails() {
        let result = TemplateParser::parse("/category/item-{id}");
        assert!(reason(result).contains("must start a path segment"));
    }

    #[test]
    fn test_text_after_variable_fails() {
        let result = TemplateParser::parse("/category/{id}.json");
        assert!(reason(result).contains("Expected '/' after variable 'id'"));
    }

    #[test]
    fn test_misplaced_explode_marker_fails() {
        assert!(TemplateParser::parse("/{*id}").is_err());
        assert!(TemplateParser::parse("/{id**}").is_err());
        assert!(TemplateParser::parse("/{i*d}").is_err());
    }

    #[test]
    fn test_continuation_group_without_mandatory_fails() {
        let result = TemplateParser::parse("/search{&q}");
        assert!(reason(result).contains("must follow a mandatory"));
    }

    #[test]
    fn test_optional_group_after_mandatory_must_use_ampersand() {
        let result = TemplateParser::parse("/search?a={a}{?q}");
        assert!(reason(result).contains("Expected '&' or '{&'"));
    }

    #[test]
    fn test_mandatory_param_requires_variable() {
        let result = TemplateParser::parse("/search?format=json");
        assert!(reason(result).contains("Expected '{' but found 'j'"));
    }

    #[test]
    fn test_trailing_text_after_group_fails() {
        let result = TemplateParser::parse("/search{?q}/more");
        assert!(reason(result).contains("Unexpected '/'"));
    }

    #[test]
    fn test_empty_name_in_group_fails() {
        assert!(TemplateParser::parse("/search{?q,}").is_err());
        assert!(TemplateParser::parse("/search{?}").is_err());
    }

    #[test]
    fn test_bare_question_mark_fails() {
        let result = TemplateParser::parse("/search?");
        assert!(reason(result).contains("Expected query parameter name"));
    }

    #[test]
    fn test_error_reports_position() {
        match TemplateParser::parse("/a/{b}c") {
            Err(TemplateError::Malformed {
                template, position, ..
            }) => {
                assert_eq!(template, "/a/{b}c");
                assert_eq!(position, 6);
            }
            other => panic!("Expected malformed template error, got {:?}", other),
        }
    }
}
