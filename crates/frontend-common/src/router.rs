//! Application routes and navigation outcomes

use once_cell::sync::Lazy;
use std::fmt;
use trabuddy_core::pattern::split_query;
use trabuddy_core::{PathParams, PathPattern};

/// Path of the landing page, which doubles as the login entry point
pub const HOME_PATH: &str = "/";

/// Routes known to the client
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Search,
    Plan { plan_id: i64 },
    /// Invitation link; never rendered, it forwards to the landing page
    Invite { invite_code: String },
    MyPage,
}

type Builder = fn(&PathParams) -> Option<Route>;

static ROUTES: Lazy<Vec<(PathPattern, Builder)>> = Lazy::new(|| {
    vec![
        (PathPattern::new("/"), home as Builder),
        (PathPattern::new("/search"), search as Builder),
        (PathPattern::new("/plan/:planId"), plan as Builder),
        (PathPattern::new("/invite/:inviteCode"), invite as Builder),
        (PathPattern::new("/my-page"), my_page as Builder),
    ]
});

fn home(_: &PathParams) -> Option<Route> {
    Some(Route::Home)
}

fn search(_: &PathParams) -> Option<Route> {
    Some(Route::Search)
}

fn plan(params: &PathParams) -> Option<Route> {
    let plan_id = params.get("planId")?.parse().ok()?;
    Some(Route::Plan { plan_id })
}

fn invite(params: &PathParams) -> Option<Route> {
    Some(Route::Invite {
        invite_code: params.get("inviteCode")?.clone(),
    })
}

fn my_page(_: &PathParams) -> Option<Route> {
    Some(Route::MyPage)
}

impl Route {
    /// Resolve a path, with or without query string
    pub fn recognize(path: &str) -> Option<Route> {
        let (path, _) = split_query(path);
        ROUTES
            .iter()
            .find_map(|(pattern, build)| pattern.matches(path).and_then(|params| build(&params)))
    }

    pub fn to_path(&self) -> String {
        match self {
            Route::Home => HOME_PATH.to_string(),
            Route::Search => "/search".to_string(),
            Route::Plan { plan_id } => format!("/plan/{plan_id}"),
            Route::Invite { invite_code } => format!("/invite/{invite_code}"),
            Route::MyPage => "/my-page".to_string(),
        }
    }

    /// Route name as used in navigation logs
    pub fn name(&self) -> &'static str {
        match self {
            Route::Home => "home",
            Route::Search => "search",
            Route::Plan { .. } => "plan",
            Route::Invite { .. } => "invite",
            Route::MyPage => "my-page",
        }
    }

    /// Whether entering the route needs a known identity
    pub fn requires_auth(&self) -> bool {
        matches!(self, Route::MyPage)
    }

    /// Static redirect declared by the route itself
    pub fn redirect(&self) -> Option<String> {
        match self {
            Route::Invite { invite_code } => {
                let query = url::form_urlencoded::Serializer::new(String::new())
                    .append_pair("inviteCode", invite_code)
                    .finish();
                Some(format!("{HOME_PATH}?{query}"))
            }
            _ => None,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_path())
    }
}

/// A navigation target split into path and query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    path: String,
    query: Option<String>,
}

impl Location {
    pub fn parse(full_path: &str) -> Self {
        let (path, query) = split_query(full_path);
        let path = if path.is_empty() { HOME_PATH } else { path };
        Self {
            path: path.to_string(),
            query: query.filter(|query| !query.is_empty()).map(str::to_string),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// Path plus query string, as stored for post-login redirects
    pub fn full_path(&self) -> String {
        match &self.query {
            Some(query) => format!("{}?{}", self.path, query),
            None => self.path.clone(),
        }
    }

    /// First decoded value of a query parameter
    pub fn query_param(&self, name: &str) -> Option<String> {
        let query = self.query.as_deref()?;
        url::form_urlencoded::parse(query.as_bytes())
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    }

    pub fn route(&self) -> Option<Route> {
        Route::recognize(&self.path)
    }
}

/// Outcome of the navigation guard
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationDecision {
    Proceed,
    Redirect(String),
}
