//! Page route table and route guard
//!
//! Each client route declares who may see it and which layout wraps it.
//! [`guard`] combines a route with the caller's [`AuthState`] and decides
//! whether to render a [`PageManifest`], redirect, or ask the client to
//! retry while the session is still being resolved.

use common::token::AuthUser;
use serde::Serialize;

/// Where unauthenticated visitors are sent
pub const AUTH_ENTRY: &str = "/auth";

/// Session state of the caller
#[derive(Debug, Clone, PartialEq)]
pub enum AuthState {
    /// The session could not be checked yet (for example the token store
    /// is unreachable)
    Resolving,
    Anonymous,
    Authenticated(AuthUser),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Only visitors without a session; signed-in users go elsewhere
    GuestOnly { authenticated_redirect: &'static str },
    Authenticated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    /// Page content only
    Bare,
    /// Side navigation around the page content
    Dashboard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteTarget {
    Redirect(&'static str),
    Page {
        page: &'static str,
        access: Access,
        layout: Layout,
        /// Independent data endpoints the page loads
        data: &'static [&'static str],
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub path: &'static str,
    pub target: RouteTarget,
}

pub const ROUTES: &[Route] = &[
    Route {
        path: "/",
        target: RouteTarget::Redirect("/dashboard"),
    },
    Route {
        path: "/auth",
        target: RouteTarget::Page {
            page: "auth",
            access: Access::GuestOnly {
                authenticated_redirect: "/onboarding",
            },
            layout: Layout::Bare,
            data: &[],
        },
    },
    Route {
        path: "/onboarding",
        target: RouteTarget::Page {
            page: "onboarding",
            access: Access::Authenticated,
            layout: Layout::Bare,
            data: &["/api/onboarding"],
        },
    },
    Route {
        path: "/dashboard",
        target: RouteTarget::Page {
            page: "dashboard",
            access: Access::Authenticated,
            layout: Layout::Dashboard,
            data: &[
                "/api/profile",
                "/api/dashboard/stats",
                "/api/goals",
                "/api/recipes/recommended",
            ],
        },
    },
    Route {
        path: "/goals",
        target: RouteTarget::Page {
            page: "goals",
            access: Access::Authenticated,
            layout: Layout::Dashboard,
            data: &["/api/goals"],
        },
    },
    Route {
        path: "/achievements",
        target: RouteTarget::Page {
            page: "achievements",
            access: Access::Authenticated,
            layout: Layout::Dashboard,
            data: &["/api/dashboard/stats"],
        },
    },
    Route {
        path: "/settings",
        target: RouteTarget::Page {
            page: "settings",
            access: Access::Authenticated,
            layout: Layout::Dashboard,
            data: &["/api/profile", "/api/preferences"],
        },
    },
];

/// Entries of the dashboard side navigation
const NAVIGATION: &[(&str, &str)] = &[
    ("Dashboard", "/dashboard"),
    ("Goals", "/goals"),
    ("Achievements", "/achievements"),
    ("Settings", "/settings"),
];

pub fn resolve(path: &str) -> Option<&'static Route> {
    let path = match path.trim_end_matches('/') {
        "" => "/",
        trimmed => trimmed,
    };
    ROUTES.iter().find(|route| route.path == path)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavItem {
    pub title: &'static str,
    pub href: &'static str,
    pub active: bool,
}

/// What the client needs to render a page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageManifest {
    pub page: &'static str,
    pub path: &'static str,
    pub layout: Layout,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub navigation: Vec<NavItem>,
    pub data: Vec<&'static str>,
}

impl PageManifest {
    fn new(route: &Route, page: &'static str, layout: Layout, data: &[&'static str]) -> Self {
        let navigation = match layout {
            Layout::Bare => Vec::new(),
            Layout::Dashboard => NAVIGATION
                .iter()
                .map(|&(title, href)| NavItem {
                    title,
                    href,
                    active: href == route.path,
                })
                .collect(),
        };

        Self {
            page,
            path: route.path,
            layout,
            navigation,
            data: data.to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GuardOutcome {
    /// Show a loading placeholder and retry
    Loading,
    Redirect(&'static str),
    Render(PageManifest),
    NotFound,
}

pub fn guard(path: &str, auth: &AuthState) -> GuardOutcome {
    let Some(route) = resolve(path) else {
        return GuardOutcome::NotFound;
    };

    let (page, access, layout, data) = match route.target {
        RouteTarget::Redirect(to) => return GuardOutcome::Redirect(to),
        RouteTarget::Page {
            page,
            access,
            layout,
            data,
        } => (page, access, layout, data),
    };

    match (access, auth) {
        (_, AuthState::Resolving) => GuardOutcome::Loading,
        (Access::Authenticated, AuthState::Anonymous) => GuardOutcome::Redirect(AUTH_ENTRY),
        (
            Access::GuestOnly {
                authenticated_redirect,
            },
            AuthState::Authenticated(_),
        ) => GuardOutcome::Redirect(authenticated_redirect),
        _ => GuardOutcome::Render(PageManifest::new(route, page, layout, data)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn signed_in() -> AuthState {
        AuthState::Authenticated(AuthUser {
            id: Uuid::new_v4(),
            email: "cook@example.com".to_string(),
            roles: vec!["user".to_string()],
        })
    }

    #[test]
    fn test_anonymous_dashboard_redirects_to_auth() {
        assert_eq!(
            guard("/dashboard", &AuthState::Anonymous),
            GuardOutcome::Redirect("/auth")
        );
    }

    #[test]
    fn test_every_protected_page_redirects_anonymous() {
        for path in ["/onboarding", "/dashboard", "/goals", "/achievements", "/settings"] {
            assert_eq!(
                guard(path, &AuthState::Anonymous),
                GuardOutcome::Redirect(AUTH_ENTRY),
                "{}",
                path
            );
        }
    }

    #[test]
    fn test_resolving_shows_loading() {
        assert_eq!(
            guard("/settings", &AuthState::Resolving),
            GuardOutcome::Loading
        );
        assert_eq!(guard("/auth", &AuthState::Resolving), GuardOutcome::Loading);
    }

    #[test]
    fn test_root_redirects_to_dashboard() {
        assert_eq!(
            guard("/", &AuthState::Anonymous),
            GuardOutcome::Redirect("/dashboard")
        );
    }

    #[test]
    fn test_auth_page_is_guest_only() {
        assert!(matches!(
            guard("/auth", &AuthState::Anonymous),
            GuardOutcome::Render(PageManifest { page: "auth", .. })
        ));
        assert_eq!(
            guard("/auth", &signed_in()),
            GuardOutcome::Redirect("/onboarding")
        );
    }

    #[test]
    fn test_dashboard_manifest() {
        let GuardOutcome::Render(manifest) = guard("/dashboard/", &signed_in()) else {
            panic!("expected a rendered page");
        };

        assert_eq!(manifest.page, "dashboard");
        assert_eq!(manifest.layout, Layout::Dashboard);
        assert_eq!(manifest.data.len(), 4);
        assert_eq!(manifest.navigation.len(), 4);
        let active: Vec<_> = manifest
            .navigation
            .iter()
            .filter(|item| item.active)
            .map(|item| item.href)
            .collect();
        assert_eq!(active, vec!["/dashboard"]);
    }

    #[test]
    fn test_onboarding_uses_bare_layout() {
        let GuardOutcome::Render(manifest) = guard("/onboarding", &signed_in()) else {
            panic!("expected a rendered page");
        };
        assert_eq!(manifest.layout, Layout::Bare);
        assert!(manifest.navigation.is_empty());
        assert_eq!(manifest.data, vec!["/api/onboarding"]);
    }

    #[test]
    fn test_unknown_path_is_not_found() {
        assert_eq!(guard("/recipes/42", &signed_in()), GuardOutcome::NotFound);
        assert_eq!(guard("/nope", &AuthState::Anonymous), GuardOutcome::NotFound);
    }
}
