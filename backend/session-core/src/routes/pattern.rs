use crate::error::RouteError;

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;

/// `:name`, `:name(custom)`, optionally followed by `?`, `*` or `+`.
static PARAM_SEGMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^:([A-Za-z_][A-Za-z0-9_]*)(?:\(([^)]*)\))?([*+?])?$")
        .expect("param segment pattern is a valid regex")
});

const DEFAULT_PARAM_PATTERN: &str = "[^/]+";

/// A route path compiled into an anchored regex.
///
/// Static segments match literally, `:param` matches one segment and a
/// custom pattern such as `(.*)` may span several. `?` and `*` make the
/// segment optional. A trailing slash on the target is ignored.
#[derive(Debug, Clone)]
pub struct PathPattern {
    source: String,
    regex: Regex,
}

impl PathPattern {
    pub fn compile(path: &str) -> Result<Self, RouteError> {
        let mut expression = String::from("^");

        for segment in path.split('/').filter(|segment| !segment.is_empty()) {
            if let Some(captures) = PARAM_SEGMENT.captures(segment) {
                let name = &captures[1];
                let inner = captures
                    .get(2)
                    .map_or(DEFAULT_PARAM_PATTERN, |custom| custom.as_str());
                if inner.is_empty() {
                    return Err(RouteError::invalid_pattern(path, "empty custom parameter pattern"));
                }

                match captures.get(3).map(|modifier| modifier.as_str()) {
                    Some("?") | Some("*") => {
                        expression.push_str(&format!("(?:/(?P<{name}>{inner}))?"));
                    }
                    _ => expression.push_str(&format!("/(?P<{name}>{inner})")),
                }
            } else if segment.starts_with(':') {
                return Err(RouteError::invalid_pattern(
                    path,
                    format!("malformed parameter segment '{segment}'"),
                ));
            } else {
                expression.push('/');
                expression.push_str(&regex::escape(segment));
            }
        }

        expression.push_str("/?$");

        let regex =
            Regex::new(&expression).map_err(|e| RouteError::invalid_pattern(path, e.to_string()))?;

        Ok(Self {
            source: path.to_string(),
            regex,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Match a normalized path, returning the captured parameters.
    pub fn matches(&self, path: &str) -> Option<BTreeMap<String, String>> {
        let captures = self.regex.captures(path)?;

        let params = self
            .regex
            .capture_names()
            .flatten()
            .filter_map(|name| {
                captures
                    .name(name)
                    .map(|value| (name.to_string(), value.as_str().to_string()))
            })
            .collect();

        Some(params)
    }
}
