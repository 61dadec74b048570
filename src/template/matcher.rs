// Recover variable bindings from a concrete URI

use tracing::trace;
use url::{Position, Url};

use super::ast::{Bindings, Component, QueryParam, Template};
use super::uri::resolve_relative;

impl Template {
    /// Match `candidate` against this template's structure.
    ///
    /// Returns the captured values, or `None` when the URI could not have
    /// been produced by this template. Path variables come first, last
    /// segment to first, then mandatory and optional parameters in declared
    /// order. Bound values on `self` are not consulted.
    pub fn match_uri(&self, candidate: impl AsRef<str>) -> Option<Bindings> {
        let candidate = candidate.as_ref();
        let (url, relative) = normalize(candidate)?;

        let path = if self.has_scheme() {
            if relative {
                trace!(candidate, "Relative candidate cannot match an absolute template");
                return None;
            }
            &url[..Position::AfterPath]
        } else if relative && !candidate.starts_with('/') {
            url.path().trim_start_matches('/')
        } else {
            url.path()
        };

        let segments = split_segments(path);
        let expected = self.path.len() + usize::from(self.ends_with_slash());
        if segments.len() != expected {
            trace!(
                candidate,
                expected,
                found = segments.len(),
                "Path segment count differs"
            );
            return None;
        }

        // Path segments are walked last to first
        let mut captures: Vec<(String, String)> = Vec::new();
        for (component, &segment) in self.path.iter().zip(&segments[..self.path.len()]).rev() {
            match component {
                Component::Literal(text) => {
                    let segment = decode(segment);
                    if !literal_matches(text, &segment) {
                        trace!(candidate, literal = %text, segment = %segment, "Literal segment differs");
                        return None;
                    }
                }
                Component::Variable { spec, .. } => {
                    let raw = segment.strip_suffix('/').unwrap_or(segment);
                    captures.extend(
                        raw.split(',')
                            .map(|token| (spec.name.clone(), decode(token))),
                    );
                }
            }
        }

        let pairs = query_pairs(&url);
        for param in self.mandatory.iter() {
            if !capture_param(param, &pairs, &mut captures) {
                trace!(candidate, key = %param.key, "Mandatory query parameter missing");
                return None;
            }
        }
        for param in self.optional.iter() {
            capture_param(param, &pairs, &mut captures);
        }

        Some(captures.into_iter().collect())
    }

    fn has_scheme(&self) -> bool {
        matches!(
            self.path.first(),
            Some(Component::Literal(text)) if text.trim_end_matches('/').contains(':')
        )
    }

    fn ends_with_slash(&self) -> bool {
        self.path.last().is_some_and(Component::ends_with_slash)
    }
}

/// Parse the candidate, resolving relative references against a placeholder
/// authority. The flag is true for relative candidates.
fn normalize(candidate: &str) -> Option<(Url, bool)> {
    match Url::parse(candidate) {
        Ok(url) => Some((url, false)),
        Err(url::ParseError::RelativeUrlWithoutBase) => match resolve_relative(candidate) {
            Ok(url) => Some((url, true)),
            Err(e) => {
                trace!(candidate, error = %e, "Candidate is not a valid relative reference");
                None
            }
        },
        Err(e) => {
            trace!(candidate, error = %e, "Candidate is not a valid URI");
            None
        }
    }
}

/// Split after every `/`. A path ending in `/` has an empty final segment.
fn split_segments(path: &str) -> Vec<&str> {
    let mut segments: Vec<&str> = path.split_inclusive('/').collect();
    if path.ends_with('/') {
        segments.push("");
    }
    segments
}

/// Same length, and each character either equal or the candidate character
/// is an ASCII letter exactly 32 code points above the template character.
fn literal_matches(expected: &str, actual: &str) -> bool {
    expected.chars().count() == actual.chars().count()
        && expected.chars().zip(actual.chars()).all(|(e, a)| {
            e == a || (a.is_ascii_alphabetic() && a as u32 == e as u32 + 32)
        })
}

fn query_pairs(url: &Url) -> Vec<(String, &str)> {
    url.query()
        .map(|query| {
            query
                .split('&')
                .filter(|pair| !pair.is_empty())
                .map(|pair| {
                    let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
                    (decode(key), value)
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Push one capture per comma-separated token of every occurrence of the
/// parameter's key. Returns false when the key is absent.
fn capture_param(
    param: &QueryParam,
    pairs: &[(String, &str)],
    captures: &mut Vec<(String, String)>,
) -> bool {
    let mut found = false;
    for (_, value) in pairs.iter().filter(|(key, _)| *key == param.key) {
        found = true;
        captures.extend(
            value
                .split(',')
                .map(|token| (param.spec.name.clone(), decode(token))),
        );
    }
    found
}

fn decode(raw: &str) -> String {
    urlencoding::decode(raw)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| raw.to_string())
}
