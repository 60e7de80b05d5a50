//! The kobo route table.
//!
//! Third-party and sibling apps are opaque: their URL confs are registered
//! in an [`AppRegistry`] under their module names and included here in a
//! fixed order. Order matters, the first matching entry wins.

use crate::config::Settings;
use crate::urls::{path, re_path, Guard, RoutingError, Target, UrlConf};
use std::collections::HashMap;

pub const LOGINAS_URLS: &str = "loginas.urls";
pub const ADMIN_URLS: &str = "admin.site.urls";
pub const MFA_URLS: &str = "kobo.apps.accounts.mfa.urls";
pub const ALLAUTH_URLS: &str = "allauth.urls";
pub const SUBSEQUENCES_URLS: &str = "kobo.apps.subsequences.urls";
pub const KPI_URLS: &str = "kpi.urls";
pub const MARKDOWNX_URLS: &str = "markdownx.urls";
pub const MARKDOWNX_UPLOADER_URLS: &str = "kobo.apps.markdownx_uploader.urls";
pub const HELP_URLS: &str = "kobo.apps.help.urls";
pub const PROMETHEUS_URLS: &str = "django_prometheus.urls";

/// Name of the admin site's login view, wrapped with the staff guard.
pub const ADMIN_LOGIN_VIEW: &str = "login";
/// Target of the legacy registration path.
pub const SIGNUP_URL: &str = "/accounts/signup/";

/// URL confs of the included apps, keyed by module name.
#[derive(Debug, Clone, Default)]
pub struct AppRegistry {
    confs: HashMap<String, UrlConf>,
}

impl AppRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, module: impl Into<String>, conf: UrlConf) {
        self.confs.insert(module.into(), conf);
    }

    pub fn contains(&self, module: &str) -> bool {
        self.confs.contains_key(module)
    }

    fn conf(&self, module: &str) -> Result<UrlConf, RoutingError> {
        self.confs
            .get(module)
            .cloned()
            .ok_or_else(|| RoutingError::UnknownUrlConf(module.to_string()))
    }

    fn include(&self, module: &str) -> Result<Target, RoutingError> {
        self.conf(module).map(Target::Include)
    }
}

/// Build the root URL conf.
///
/// The metrics exporter is mounted only when `settings.enable_metrics` is set.
pub fn kobo_urlpatterns(settings: &Settings, apps: &AppRegistry) -> Result<UrlConf, RoutingError> {
    // The admin site must not render its own login form
    let mut admin = apps.conf(ADMIN_URLS)?;
    let guarded = admin.guard_view(
        ADMIN_LOGIN_VIEW,
        Guard::StaffMemberRequired {
            login_url: settings.login_url.clone(),
        },
    );
    if !guarded {
        tracing::warn!("admin site has no login view to guard");
    }

    let mut patterns = vec![
        re_path("^admin/", apps.include(LOGINAS_URLS)?)?,
        re_path("^admin/", Target::Include(admin))?,
        path("", apps.include(MFA_URLS)?)?,
        // Must come after the MFA routes so their account paths win
        path("accounts/", apps.include(ALLAUTH_URLS)?)?,
        re_path(
            "^accounts/register/?",
            Target::redirect(Some(SIGNUP_URL.to_string()), true),
        )?,
        re_path("^", apps.include(SUBSEQUENCES_URLS)?)?,
        re_path("^", apps.include(KPI_URLS)?)?,
        re_path("^markdownx/", apps.include(MARKDOWNX_URLS)?)?,
        re_path("^markdownx-uploader/", apps.include(MARKDOWNX_UPLOADER_URLS)?)?,
        re_path("^help/", apps.include(HELP_URLS)?)?,
        // Unanchored: matches `kobocat/` anywhere in the path
        re_path("kobocat/", Target::redirect(settings.kobocat_url.clone(), true))?,
    ];

    if settings.enable_metrics {
        patterns.push(path("", apps.include(PROMETHEUS_URLS)?)?);
    }

    tracing::debug!(
        entries = patterns.len(),
        enable_metrics = settings.enable_metrics,
        "built kobo url patterns"
    );
    Ok(UrlConf::from_patterns(patterns))
}
