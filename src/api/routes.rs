//! Static prefix table for the reverse proxy.
//!
//! Mirrors the public API surface: each inbound prefix rewrites to a target
//! prefix on one backing service. `/tasks` is a compatibility alias for older
//! clients; it maps onto list-service and marks the request so the service
//! accepts it without a token (demo-mode trust, preserved knowingly).

/// Marker header the list service honors to skip token validation.
pub const SKIP_AUTH_HEADER: &str = "x-skip-auth";

/// One proxy mapping from an inbound prefix to a service-local prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProxyRoute {
    pub prefix: &'static str,
    pub service: &'static str,
    pub target_prefix: &'static str,
    /// Inject the skip-auth marker before forwarding
    pub inject_skip_auth: bool,
}

/// Prefix table in match order. More specific gateway routes (media images,
/// dashboard, search) are registered directly on the router and never reach
/// this table.
pub const PROXY_ROUTES: &[ProxyRoute] = &[
    ProxyRoute {
        prefix: "/api/auth",
        service: "user-service",
        target_prefix: "/auth",
        inject_skip_auth: false,
    },
    ProxyRoute {
        prefix: "/api/users",
        service: "user-service",
        target_prefix: "/users",
        inject_skip_auth: false,
    },
    ProxyRoute {
        prefix: "/api/items",
        service: "item-service",
        target_prefix: "/items",
        inject_skip_auth: false,
    },
    ProxyRoute {
        prefix: "/api/lists",
        service: "list-service",
        target_prefix: "/lists",
        inject_skip_auth: false,
    },
    ProxyRoute {
        prefix: "/api/media",
        service: "media-service",
        target_prefix: "/media",
        inject_skip_auth: false,
    },
    ProxyRoute {
        prefix: "/tasks",
        service: "list-service",
        target_prefix: "/lists",
        inject_skip_auth: true,
    },
];

/// Resolve an inbound path against the prefix table.
///
/// A prefix matches the exact path or a path-segment boundary, so
/// `/api/itemsonly` does not match `/api/items`. Returns the route and the
/// rewritten service-local path.
pub fn resolve(path: &str) -> Option<(&'static ProxyRoute, String)> {
    for route in PROXY_ROUTES {
        if let Some(rest) = strip_prefix_on_boundary(path, route.prefix) {
            return Some((route, format!("{}{}", route.target_prefix, rest)));
        }
    }
    None
}

fn strip_prefix_on_boundary<'a>(path: &'a str, prefix: &str) -> Option<&'a str> {
    let rest = path.strip_prefix(prefix)?;
    if rest.is_empty() || rest.starts_with('/') {
        Some(rest)
    } else {
        None
    }
}
