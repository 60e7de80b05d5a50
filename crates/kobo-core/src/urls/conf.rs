//! Ordered URL configuration and resolution.

use crate::urls::pattern::Pattern;
use std::collections::HashMap;

/// Access check applied before a view runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Guard {
    /// Only active staff members pass; everyone else is redirected to `login_url`
    StaffMemberRequired { login_url: String },
}

/// Named view handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    pub name: String,
    pub guard: Option<Guard>,
}

impl View {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            guard: None,
        }
    }
}

/// Redirect handler. A missing `url` answers 410 Gone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectView {
    pub url: Option<String>,
    pub permanent: bool,
}

/// What a URL pattern points at.
#[derive(Debug, Clone)]
pub enum Target {
    View(View),
    Include(UrlConf),
    Redirect(RedirectView),
}

impl Target {
    pub fn view(name: impl Into<String>) -> Self {
        Target::View(View::new(name))
    }

    pub fn redirect(url: Option<String>, permanent: bool) -> Self {
        Target::Redirect(RedirectView { url, permanent })
    }

    /// Endpoints must consume the whole path; includes only a prefix.
    pub fn is_endpoint(&self) -> bool {
        !matches!(self, Target::Include(_))
    }
}

/// Single entry of a [`UrlConf`].
#[derive(Debug, Clone)]
pub struct UrlPattern {
    pub pattern: Pattern,
    pub target: Target,
}

impl UrlPattern {
    pub fn new(pattern: Pattern, target: Target) -> Self {
        Self { pattern, target }
    }
}

/// Leaf handler of a successful resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedTarget {
    View(View),
    Redirect(RedirectView),
}

/// Successful resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverMatch {
    pub target: ResolvedTarget,
    /// Named captures collected along the include chain
    pub kwargs: HashMap<String, String>,
    /// Concatenated pattern text of every entry on the way down
    pub route: String,
    /// Namespaces of the included confs, outermost first
    pub namespaces: Vec<String>,
}

impl ResolverMatch {
    /// View name, if the match is a view.
    pub fn view_name(&self) -> Option<&str> {
        match &self.target {
            ResolvedTarget::View(view) => Some(&view.name),
            ResolvedTarget::Redirect(_) => None,
        }
    }

    /// `namespace:view` name as used for reversing.
    pub fn qualified_name(&self) -> Option<String> {
        let name = self.view_name()?;
        if self.namespaces.is_empty() {
            Some(name.to_string())
        } else {
            Some(format!("{}:{}", self.namespaces.join(":"), name))
        }
    }
}

/// Outcome of [`UrlConf::resolve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Match(ResolverMatch),
    /// No entry matched; `tried` lists every leaf route that was attempted
    NotFound { tried: Vec<String> },
}

impl Resolution {
    pub fn into_match(self) -> Option<ResolverMatch> {
        match self {
            Resolution::Match(m) => Some(m),
            Resolution::NotFound { .. } => None,
        }
    }
}

/// Ordered list of URL patterns, evaluated top to bottom.
#[derive(Debug, Clone, Default)]
pub struct UrlConf {
    namespace: Option<String>,
    patterns: Vec<UrlPattern>,
}

impl UrlConf {
    pub fn new() -> Self {
        Self::default()
    }

    /// Conf whose views resolve under `namespace:`.
    pub fn with_namespace(namespace: impl Into<String>) -> Self {
        Self {
            namespace: Some(namespace.into()),
            patterns: Vec::new(),
        }
    }

    pub fn from_patterns(patterns: Vec<UrlPattern>) -> Self {
        Self {
            namespace: None,
            patterns,
        }
    }

    pub fn push(&mut self, pattern: UrlPattern) {
        self.patterns.push(pattern);
    }

    pub fn patterns(&self) -> &[UrlPattern] {
        &self.patterns
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Attach `guard` to every view named `name` in this conf (not in includes).
    ///
    /// Returns whether any view was wrapped.
    pub fn guard_view(&mut self, name: &str, guard: Guard) -> bool {
        let mut wrapped = false;
        for entry in &mut self.patterns {
            if let Target::View(view) = &mut entry.target {
                if view.name == name {
                    view.guard = Some(guard.clone());
                    wrapped = true;
                }
            }
        }
        wrapped
    }

    /// Resolve a request path. One leading `/` is ignored.
    pub fn resolve(&self, path: &str) -> Resolution {
        let path = path.strip_prefix('/').unwrap_or(path);
        let mut tried = Vec::new();
        let resolved = self.resolve_inner(path, "", &HashMap::new(), &[], &mut tried);

        match resolved {
            Some(m) => {
                tracing::debug!(path, route = %m.route, "resolved path");
                Resolution::Match(m)
            }
            None => {
                tracing::debug!(path, tried = tried.len(), "no route matched");
                Resolution::NotFound { tried }
            }
        }
    }

    fn resolve_inner(
        &self,
        path: &str,
        route_prefix: &str,
        kwargs: &HashMap<String, String>,
        namespaces: &[String],
        tried: &mut Vec<String>,
    ) -> Option<ResolverMatch> {
        let mut namespaces = namespaces.to_vec();
        if let Some(ns) = &self.namespace {
            namespaces.push(ns.clone());
        }

        for entry in &self.patterns {
            let route = format!("{route_prefix}{}", entry.pattern);
            let Some(matched) = entry.pattern.match_path(path) else {
                if entry.target.is_endpoint() {
                    tried.push(route);
                }
                continue;
            };

            let mut merged = kwargs.clone();
            merged.extend(matched.kwargs);

            let target = match &entry.target {
                Target::Include(conf) => {
                    let rest = &path[matched.end..];
                    match conf.resolve_inner(rest, &route, &merged, &namespaces, tried) {
                        Some(m) => return Some(m),
                        None => continue,
                    }
                }
                Target::View(view) => ResolvedTarget::View(view.clone()),
                Target::Redirect(redirect) => ResolvedTarget::Redirect(redirect.clone()),
            };

            return Some(ResolverMatch {
                target,
                kwargs: merged,
                route,
                namespaces,
            });
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::urls::pattern::{path, re_path};
    use rstest::rstest;

    fn nested() -> UrlConf {
        let mut forms = UrlConf::with_namespace("forms");
        forms.push(path("<str:uid>/", Target::view("detail")).unwrap());
        forms.push(path("<str:uid>/data/", Target::view("data")).unwrap());

        let mut root = UrlConf::new();
        root.push(re_path(r"^api/(?P<version>v[0-9])/forms/", Target::Include(forms)).unwrap());
        root.push(path("api/<str:anything>/", Target::view("api-fallback")).unwrap());
        root.push(re_path("^old/", Target::redirect(Some("/new/".into()), true)).unwrap());
        root
    }

    #[rstest]
    #[case("/api/v2/forms/abc/", Some("forms:detail"), "^api/(?P<version>v[0-9])/forms/<str:uid>/")]
    #[case("api/v2/forms/abc/data/", Some("forms:data"), "^api/(?P<version>v[0-9])/forms/<str:uid>/data/")]
    #[case("api/v2/", Some("api-fallback"), "api/<str:anything>/")]
    #[case("old/page", None, "^old/")]
    fn test_resolve(#[case] url: &str, #[case] name: Option<&str>, #[case] route: &str) {
        let m = nested().resolve(url).into_match().expect("Should resolve");
        assert_eq!(m.qualified_name().as_deref(), name);
        assert_eq!(m.route, route);
    }

    #[rstest]
    fn test_include_kwargs_are_merged() {
        let m = nested().resolve("api/v3/forms/xyz/data/").into_match().unwrap();
        assert_eq!(m.kwargs.get("version").map(String::as_str), Some("v3"));
        assert_eq!(m.kwargs.get("uid").map(String::as_str), Some("xyz"));
        assert_eq!(m.namespaces, vec!["forms".to_string()]);
    }

    #[rstest]
    fn test_include_without_match_falls_through() {
        // Include prefix matches but no child does; the next entry wins
        let m = nested().resolve("api/v1/forms/").into_match();
        assert!(m.is_none());

        let m = nested().resolve("api/forms/").into_match().unwrap();
        assert_eq!(m.view_name(), Some("api-fallback"));
    }

    #[rstest]
    fn test_not_found_lists_tried_routes() {
        let Resolution::NotFound { tried } = nested().resolve("missing/") else {
            panic!("Should not resolve");
        };
        assert_eq!(tried, vec!["api/<str:anything>/".to_string(), "^old/".to_string()]);
    }

    #[rstest]
    fn test_redirect_target() {
        let m = nested().resolve("old/x").into_match().unwrap();
        assert_eq!(
            m.target,
            ResolvedTarget::Redirect(RedirectView {
                url: Some("/new/".into()),
                permanent: true
            })
        );
    }

    #[rstest]
    fn test_guard_view() {
        let mut conf = UrlConf::new();
        conf.push(path("login/", Target::view("login")).unwrap());
        conf.push(path("logout/", Target::view("logout")).unwrap());

        let guard = Guard::StaffMemberRequired {
            login_url: "/accounts/login/".into(),
        };
        assert!(conf.guard_view("login", guard.clone()));
        assert!(!conf.guard_view("missing", guard.clone()));

        let m = conf.resolve("login/").into_match().unwrap();
        assert_eq!(m.target, ResolvedTarget::View(View { name: "login".into(), guard: Some(guard) }));
        let m = conf.resolve("logout/").into_match().unwrap();
        assert_eq!(m.target, ResolvedTarget::View(View::new("logout")));
    }
}
