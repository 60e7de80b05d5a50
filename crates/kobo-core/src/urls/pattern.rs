//! `path()` and `re_path()` patterns.

use crate::urls::conf::{Target, UrlPattern};
use crate::urls::error::RoutingError;
use regex::{Captures, Regex};
use std::collections::HashMap;
use std::fmt;

/// Result of matching a pattern against the remaining request path.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PatternMatch {
    /// Byte offset where the match ended; includes resolve the rest
    pub end: usize,
    /// Named captures
    pub kwargs: HashMap<String, String>,
}

/// Compiled URL pattern.
#[derive(Debug, Clone)]
pub enum Pattern {
    /// Anchored route with `<converter:name>` segments
    Route { route: String, regex: Regex },
    /// Regex searched anywhere in the remaining path
    Regex {
        source: String,
        regex: Regex,
        /// Whole-path variant used by endpoints whose regex ends with `$`
        full: Option<Regex>,
    },
}

impl Pattern {
    /// Compile a `path()` route. Endpoints must consume the whole path,
    /// includes only a prefix.
    pub fn route(route: &str, is_endpoint: bool) -> Result<Self, RoutingError> {
        let mut regex_str = String::from("^");
        let mut rest = route;

        while let Some(start) = rest.find('<') {
            regex_str.push_str(&regex::escape(&rest[..start]));
            let end = rest[start..]
                .find('>')
                .map(|i| start + i)
                .ok_or_else(|| RoutingError::MalformedRoute {
                    route: route.to_string(),
                })?;
            let segment = &rest[start + 1..end];
            let (converter, name) = segment.split_once(':').unwrap_or(("str", segment));
            if name.is_empty() {
                return Err(RoutingError::MalformedRoute {
                    route: route.to_string(),
                });
            }
            let converter_regex = converter_regex(converter).ok_or_else(|| {
                RoutingError::UnknownConverter {
                    route: route.to_string(),
                    converter: converter.to_string(),
                }
            })?;
            regex_str.push_str(&format!("(?P<{name}>{converter_regex})"));
            rest = &rest[end + 1..];
        }
        regex_str.push_str(&regex::escape(rest));
        if is_endpoint {
            regex_str.push_str(r"\z");
        }

        let regex = compile(route, &regex_str)?;
        Ok(Pattern::Route {
            route: route.to_string(),
            regex,
        })
    }

    /// Compile a `re_path()` regex.
    pub fn regex(source: &str, is_endpoint: bool) -> Result<Self, RoutingError> {
        let regex = compile(source, source)?;
        let full = if is_endpoint && source.ends_with('$') {
            Some(compile(source, &format!(r"\A(?:{source})\z"))?)
        } else {
            None
        };
        Ok(Pattern::Regex {
            source: source.to_string(),
            regex,
            full,
        })
    }

    /// Match against the remaining request path (no leading slash).
    pub fn match_path(&self, path: &str) -> Option<PatternMatch> {
        let (regex, caps) = match self {
            Pattern::Route { regex, .. } => (regex, regex.captures(path)?),
            Pattern::Regex {
                full: Some(full), ..
            } => (full, full.captures(path)?),
            Pattern::Regex { regex, .. } => (regex, regex.captures(path)?),
        };

        let end = caps.get(0).map(|m| m.end()).unwrap_or_default();
        Some(PatternMatch {
            end,
            kwargs: named_captures(regex, &caps),
        })
    }

    /// Pattern source text.
    pub fn as_str(&self) -> &str {
        match self {
            Pattern::Route { route, .. } => route,
            Pattern::Regex { source, .. } => source,
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Django-style `path()` entry.
pub fn path(route: &str, target: Target) -> Result<UrlPattern, RoutingError> {
    let pattern = Pattern::route(route, target.is_endpoint())?;
    Ok(UrlPattern::new(pattern, target))
}

/// Django-style `re_path()` entry.
pub fn re_path(regex: &str, target: Target) -> Result<UrlPattern, RoutingError> {
    let pattern = Pattern::regex(regex, target.is_endpoint())?;
    Ok(UrlPattern::new(pattern, target))
}

fn converter_regex(converter: &str) -> Option<&'static str> {
    match converter {
        "str" => Some("[^/]+"),
        "int" => Some("[0-9]+"),
        "slug" => Some("[-a-zA-Z0-9_]+"),
        "uuid" => Some("[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}"),
        "path" => Some(".+"),
        _ => None,
    }
}

fn compile(pattern: &str, regex_str: &str) -> Result<Regex, RoutingError> {
    Regex::new(regex_str).map_err(|e| RoutingError::InvalidRegex {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })
}

fn named_captures(regex: &Regex, caps: &Captures<'_>) -> HashMap<String, String> {
    regex
        .capture_names()
        .flatten()
        .filter_map(|name| caps.name(name).map(|m| (name.to_owned(), m.as_str().to_owned())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("accounts/", false, "accounts/login/", Some(9), &[])]
    #[case("accounts/", false, "api/accounts/", None, &[])]
    #[case("", false, "anything/at/all", Some(0), &[])]
    #[case("metrics", true, "metrics", Some(7), &[])]
    #[case("metrics", true, "metrics/extra", None, &[])]
    #[case("assets/<uid>/", true, "assets/aXyZ/", Some(12), &[("uid", "aXyZ")])]
    #[case("assets/<str:uid>/", true, "assets/a/b/", None, &[])]
    #[case("users/<int:pk>/", true, "users/42/", Some(9), &[("pk", "42")])]
    #[case("users/<int:pk>/", true, "users/abc/", None, &[])]
    #[case("tags/<slug:tag>/", true, "tags/my-tag_1/", Some(14), &[("tag", "my-tag_1")])]
    #[case("files/<path:rest>", true, "files/a/b/c.mp3", Some(15), &[("rest", "a/b/c.mp3")])]
    #[case(
        "s/<uuid:id>",
        true,
        "s/12345678-1234-1234-1234-1234567890ab",
        Some(38),
        &[("id", "12345678-1234-1234-1234-1234567890ab")]
    )]
    #[case("api.json", true, "apiXjson", None, &[])]
    fn test_route_pattern(
        #[case] route: &str,
        #[case] is_endpoint: bool,
        #[case] path: &str,
        #[case] end: Option<usize>,
        #[case] kwargs: &[(&str, &str)],
    ) {
        let pattern = Pattern::route(route, is_endpoint).expect("Should compile");
        let result = pattern.match_path(path);
        assert_eq!(result.as_ref().map(|m| m.end), end);
        if let Some(m) = result {
            for (k, v) in kwargs {
                assert_eq!(m.kwargs.get(*k), Some(&(*v).to_owned()));
            }
        }
    }

    #[rstest]
    #[case("^admin/", false, "admin/login/", Some(6))]
    #[case("^admin/", false, "api/admin/", None)]
    #[case("kobocat/", true, "kobocat/", Some(8))]
    #[case("kobocat/", true, "api/v1/kobocat/forms", Some(15))]
    #[case("^accounts/register/?", true, "accounts/register", Some(17))]
    #[case("^accounts/register/?", true, "accounts/register/", Some(18))]
    #[case("^accounts/register/?", true, "accounts/registered", Some(17))]
    #[case("^done/$", true, "done/", Some(5))]
    #[case("^done/$", true, "done/more", None)]
    #[case("^", false, "", Some(0))]
    fn test_regex_pattern_is_searched(
        #[case] source: &str,
        #[case] is_endpoint: bool,
        #[case] path: &str,
        #[case] end: Option<usize>,
    ) {
        let pattern = Pattern::regex(source, is_endpoint).expect("Should compile");
        assert_eq!(pattern.match_path(path).map(|m| m.end), end);
    }

    #[rstest]
    fn test_regex_named_groups_become_kwargs() {
        let pattern = Pattern::regex(r"^forms/(?P<uid>\w+)/", false).unwrap();
        let m = pattern.match_path("forms/aBc123/data/").expect("Should match");
        assert_eq!(m.kwargs.get("uid").map(String::as_str), Some("aBc123"));
        assert_eq!(m.end, 13);
    }

    #[rstest]
    #[case("users/<int:pk", RoutingError::MalformedRoute { route: "users/<int:pk".into() })]
    #[case("users/<int:>/", RoutingError::MalformedRoute { route: "users/<int:>/".into() })]
    #[case(
        "users/<float:pk>/",
        RoutingError::UnknownConverter { route: "users/<float:pk>/".into(), converter: "float".into() }
    )]
    fn test_route_pattern_errors(#[case] route: &str, #[case] expected: RoutingError) {
        assert_eq!(Pattern::route(route, true).unwrap_err(), expected);
    }

    #[rstest]
    fn test_invalid_regex() {
        let err = Pattern::regex("^admin/(", false).unwrap_err();
        assert!(matches!(err, RoutingError::InvalidRegex { .. }));
    }
}
