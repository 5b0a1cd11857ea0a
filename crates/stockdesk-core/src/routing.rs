//! # Route Guard
//!
//! Decides, from the path alone and whether a refresh token exists, if a
//! request may proceed or must bounce.
//!
//! ```text
//! /dashboard/...  + no refresh token  ──► Redirect "/" (remember path)
//! "/"             + refresh token     ──► Redirect "/dashboard"
//! anything else                       ──► Allow
//! ```
//!
//! Only the refresh token counts: an expired access token is renewed by
//! the client on the first request, so it is not a reason to bounce.

use url::form_urlencoded;

use crate::navigation::DASHBOARD_HOME;

/// Where the login page lives.
pub const LOGIN_PATH: &str = "/";

/// Query parameter carrying the post-login destination.
pub const REDIRECT_PARAM: &str = "redirectAfterLogin";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    Allow,
    Redirect {
        to: String,
        /// Path to return to after signing in.
        redirect_after_login: Option<String>,
    },
}

impl RouteDecision {
    /// Redirect target rendered as a URL path with query, e.g.
    /// `/?redirectAfterLogin=%2Fdashboard%2Forders`. The remembered path is
    /// form-encoded so its own query survives.
    pub fn location(&self) -> Option<String> {
        match self {
            RouteDecision::Allow => None,
            RouteDecision::Redirect {
                to,
                redirect_after_login: Some(path),
            } => {
                let query = form_urlencoded::Serializer::new(String::new())
                    .append_pair(REDIRECT_PARAM, path)
                    .finish();
                Some(format!("{}?{}", to, query))
            }
            RouteDecision::Redirect { to, .. } => Some(to.clone()),
        }
    }
}

pub fn is_protected(pathname: &str) -> bool {
    pathname.starts_with(DASHBOARD_HOME)
}

pub fn guard(pathname: &str, has_refresh_token: bool) -> RouteDecision {
    if !has_refresh_token && is_protected(pathname) {
        return RouteDecision::Redirect {
            to: LOGIN_PATH.to_string(),
            redirect_after_login: Some(pathname.to_string()),
        };
    }

    if pathname == LOGIN_PATH && has_refresh_token {
        return RouteDecision::Redirect {
            to: DASHBOARD_HOME.to_string(),
            redirect_after_login: None,
        };
    }

    RouteDecision::Allow
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protected_without_token_redirects_to_login() {
        let decision = guard("/dashboard/orders", false);
        assert_eq!(
            decision,
            RouteDecision::Redirect {
                to: "/".to_string(),
                redirect_after_login: Some("/dashboard/orders".to_string()),
            }
        );
        assert_eq!(
            decision.location().as_deref(),
            Some("/?redirectAfterLogin=%2Fdashboard%2Forders")
        );
    }

    #[test]
    fn test_redirect_keeps_query_of_remembered_path() {
        let decision = guard("/dashboard/orders?status=pending&page=2", false);
        let location = decision.location().unwrap();
        assert_eq!(
            location,
            "/?redirectAfterLogin=%2Fdashboard%2Forders%3Fstatus%3Dpending%26page%3D2"
        );

        let (_, query) = location.split_once('?').unwrap();
        let pairs: Vec<(String, String)> = form_urlencoded::parse(query.as_bytes())
            .into_owned()
            .collect();
        assert_eq!(
            pairs,
            vec![(
                REDIRECT_PARAM.to_string(),
                "/dashboard/orders?status=pending&page=2".to_string()
            )]
        );
    }

    #[test]
    fn test_login_page_with_token_goes_to_dashboard() {
        let decision = guard("/", true);
        assert_eq!(decision.location().as_deref(), Some("/dashboard"));
    }

    #[test]
    fn test_everything_else_allowed() {
        assert_eq!(guard("/dashboard", true), RouteDecision::Allow);
        assert_eq!(guard("/", false), RouteDecision::Allow);
        assert_eq!(guard("/signup", false), RouteDecision::Allow);
        assert_eq!(RouteDecision::Allow.location(), None);
    }
}
