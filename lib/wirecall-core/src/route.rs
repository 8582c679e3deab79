//! Request descriptor: logical name, method and path template.

use std::fmt;

use crate::Method;

/// Static description of an HTTP call.
///
/// Stored in the extensions of every generated request, so middleware can
/// log the logical name and the path template instead of the expanded URL.
///
/// ```ignore
/// if let Some(route) = request.extensions().get::<RouteInfo>() {
///     tracing::info!(name = route.name, path = route.path, "calling");
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RouteInfo {
    /// Logical name, used in diagnostics.
    pub name: &'static str,
    /// HTTP method.
    pub method: Method,
    /// Path template with `{name}` placeholders, relative to the base URL.
    pub path: &'static str,
}

impl RouteInfo {
    /// Creates a route.
    #[must_use]
    pub const fn new(name: &'static str, method: Method, path: &'static str) -> Self {
        Self { name, method, path }
    }

    /// Names of the `{...}` placeholders of the path template, in order.
    #[must_use]
    pub fn placeholders(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        let mut rest = self.path;
        while let Some((_, after)) = rest.split_once('{') {
            let Some((name, tail)) = after.split_once('}') else {
                break;
            };
            names.push(name);
            rest = tail;
        }
        names
    }
}

impl fmt::Display for RouteInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} {})", self.name, self.method, self.path)
    }
}
