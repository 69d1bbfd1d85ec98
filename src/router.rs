//! Route table module
//!
//! Maps request paths to handlers by prefix. A pattern ending in `/`
//! matches any path it is a prefix of; a pattern without a trailing `/`
//! matches that path exactly. When several patterns match, the longest
//! one wins, so more specific routes shadow broader ones regardless of
//! registration order.

/// The handlers a route can dispatch to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteTarget {
    Home,
    Item,
    Generic,
}

#[derive(Debug, Clone)]
struct Route {
    pattern: String,
    target: RouteTarget,
}

#[derive(Debug, Clone, Default)]
pub struct Router {
    routes: Vec<Route>,
}

impl Router {
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    /// The three routes the server registers at startup.
    pub fn with_default_routes() -> Self {
        let mut router = Self::new();
        router.register("/home", RouteTarget::Home);
        router.register("/item/", RouteTarget::Item);
        router.register("/generic/", RouteTarget::Generic);
        router
    }

    pub fn register(&mut self, pattern: &str, target: RouteTarget) {
        self.routes.push(Route {
            pattern: pattern.to_string(),
            target,
        });
    }

    /// Find the handler for a path, or `None` for the default 404.
    pub fn route(&self, path: &str) -> Option<RouteTarget> {
        self.routes
            .iter()
            .filter(|route| pattern_matches(&route.pattern, path))
            .max_by_key(|route| route.pattern.len())
            .map(|route| route.target)
    }
}

fn pattern_matches(pattern: &str, path: &str) -> bool {
    if pattern.ends_with('/') {
        path.starts_with(pattern)
    } else {
        path == pattern
    }
}
