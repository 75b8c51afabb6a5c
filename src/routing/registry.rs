//! Route and status handler registry
//!
//! Registrations append to an immutable [`RouteTable`] snapshot held in an
//! [`ArcSwap`]; each request resolves against whichever snapshot it loaded.

use arc_swap::ArcSwap;
use hyper::{Method, StatusCode};
use std::fmt;
use std::sync::Arc;

use super::matcher::{match_path, PathMatch};
use crate::handler::{Handler, SharedHandler};

/// A handler bound to a method and path pattern
pub struct RouteEntry {
    pub method: Method,
    pub pattern: String,
    pub handler: SharedHandler,
}

impl RouteEntry {
    pub fn new(method: Method, pattern: impl Into<String>, handler: impl Handler) -> Self {
        Self {
            method,
            pattern: pattern.into(),
            handler: Arc::new(handler),
        }
    }

    /// Method names compare case-insensitively ("get" == "GET").
    fn accepts(&self, method: &Method) -> bool {
        self.method.as_str().eq_ignore_ascii_case(method.as_str())
    }
}

impl fmt::Debug for RouteEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteEntry")
            .field("method", &self.method)
            .field("pattern", &self.pattern)
            .finish_non_exhaustive()
    }
}

/// A handler bound to a response status code
pub struct StatusEntry {
    pub status: StatusCode,
    pub handler: SharedHandler,
}

impl StatusEntry {
    pub fn new(status: StatusCode, handler: impl Handler) -> Self {
        Self {
            status,
            handler: Arc::new(handler),
        }
    }
}

impl fmt::Debug for StatusEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatusEntry")
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

/// Registered routes and status handlers, in registration order
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<Arc<RouteEntry>>,
    statuses: Vec<Arc<StatusEntry>>,
}

impl RouteTable {
    /// Find the route for a request
    ///
    /// Searches newest registration first, so a later route shadows an
    /// earlier overlapping one.
    pub fn find_route(&self, method: &Method, path: &str) -> Option<(Arc<RouteEntry>, PathMatch)> {
        self.routes.iter().rev().find_map(|route| {
            if !route.accepts(method) {
                return None;
            }
            match_path(&route.pattern, path).map(|m| (Arc::clone(route), m))
        })
    }

    /// Find the handler for a status code
    ///
    /// Unlike routes, the first registration for a code wins.
    pub fn find_status(&self, status: StatusCode) -> Option<Arc<StatusEntry>> {
        self.statuses
            .iter()
            .find(|entry| entry.status == status)
            .cloned()
    }

    pub fn routes(&self) -> &[Arc<RouteEntry>] {
        &self.routes
    }

    pub fn statuses(&self) -> &[Arc<StatusEntry>] {
        &self.statuses
    }
}

/// Append-only registry owned by one server instance
#[derive(Debug, Default)]
pub struct Registry {
    table: ArcSwap<RouteTable>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_routes(&self, entries: impl IntoIterator<Item = RouteEntry>) {
        let entries: Vec<Arc<RouteEntry>> = entries.into_iter().map(Arc::new).collect();
        self.table.rcu(|table| {
            let mut next = RouteTable::clone(table);
            next.routes.extend(entries.iter().cloned());
            next
        });
    }

    pub fn add_statuses(&self, entries: impl IntoIterator<Item = StatusEntry>) {
        let entries: Vec<Arc<StatusEntry>> = entries.into_iter().map(Arc::new).collect();
        self.table.rcu(|table| {
            let mut next = RouteTable::clone(table);
            next.statuses.extend(entries.iter().cloned());
            next
        });
    }

    /// Current table; later registrations do not affect it.
    pub fn snapshot(&self) -> Arc<RouteTable> {
        self.table.load_full()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::Request;

    async fn noop(request: Request) -> crate::Result<()> {
        drop(request);
        Ok(())
    }

    #[test]
    fn test_later_route_shadows_earlier() {
        let registry = Registry::new();
        registry.add_routes([RouteEntry::new(Method::GET, "/a/:x", noop)]);
        registry.add_routes([RouteEntry::new(Method::GET, "/a/fixed", noop)]);

        let table = registry.snapshot();
        let (route, m) = table.find_route(&Method::GET, "/a/fixed").unwrap();
        assert_eq!(route.pattern, "/a/fixed");
        assert_eq!(m.path_segments, vec!["a".to_string(), "fixed".to_string()]);

        let (route, _) = table.find_route(&Method::GET, "/a/other").unwrap();
        assert_eq!(route.pattern, "/a/:x");
    }

    #[test]
    fn test_lookup_does_not_reorder_storage() {
        let registry = Registry::new();
        registry.add_routes([
            RouteEntry::new(Method::GET, "/one", noop),
            RouteEntry::new(Method::GET, "/two", noop),
        ]);
        let table = registry.snapshot();
        for _ in 0..3 {
            table.find_route(&Method::GET, "/two");
        }
        let patterns: Vec<_> = table.routes().iter().map(|r| r.pattern.as_str()).collect();
        assert_eq!(patterns, ["/one", "/two"]);
    }

    #[test]
    fn test_method_must_match() {
        let registry = Registry::new();
        registry.add_routes([RouteEntry::new(Method::POST, "/items", noop)]);
        let table = registry.snapshot();
        assert!(table.find_route(&Method::GET, "/items").is_none());
        assert!(table.find_route(&Method::POST, "/items").is_some());

        let lowercase = Method::from_bytes(b"post").unwrap();
        assert!(table.find_route(&lowercase, "/items").is_some());
    }

    #[test]
    fn test_status_lookup_first_registered_wins() {
        let registry = Registry::new();
        registry.add_statuses([
            StatusEntry::new(StatusCode::NOT_FOUND, noop),
            StatusEntry::new(StatusCode::NOT_FOUND, noop),
        ]);
        registry.add_routes([
            RouteEntry::new(Method::GET, "/:any", noop),
            RouteEntry::new(Method::GET, "/page", noop),
        ]);

        let table = registry.snapshot();
        let found = table.find_status(StatusCode::NOT_FOUND).unwrap();
        assert!(Arc::ptr_eq(&found, &table.statuses()[0]));

        let (route, _) = table.find_route(&Method::GET, "/page").unwrap();
        assert!(Arc::ptr_eq(&route, &table.routes()[1]));

        assert!(table.find_status(StatusCode::INTERNAL_SERVER_ERROR).is_none());
    }

    #[test]
    fn test_snapshot_is_isolated_from_later_registration() {
        let registry = Registry::new();
        let before = registry.snapshot();
        registry.add_routes([RouteEntry::new(Method::GET, "/late", noop)]);
        assert!(before.find_route(&Method::GET, "/late").is_none());
        assert!(registry.snapshot().find_route(&Method::GET, "/late").is_some());
    }
}
