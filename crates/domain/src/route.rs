use std::collections::HashSet;
use std::str::FromStr;

use paas_core::{AppError, AppResult};

/// Named console routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteName {
    /// Sign-in screen.
    Login,
    /// Instance listing, the default landing route.
    Instances,
    /// Instance creation form.
    CreateInstance,
    /// Single instance view.
    InstanceDetail,
    /// Audit log listing.
    AuditLogs,
    /// Service log listing.
    ServiceLogs,
}

impl RouteName {
    /// Returns the stable route name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Instances => "instances",
            Self::CreateInstance => "create-instance",
            Self::InstanceDetail => "instance-detail",
            Self::AuditLogs => "audit-logs",
            Self::ServiceLogs => "service-logs",
        }
    }
}

impl FromStr for RouteName {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "login" => Ok(Self::Login),
            "instances" => Ok(Self::Instances),
            "create-instance" => Ok(Self::CreateInstance),
            "instance-detail" => Ok(Self::InstanceDetail),
            "audit-logs" => Ok(Self::AuditLogs),
            "service-logs" => Ok(Self::ServiceLogs),
            _ => Err(AppError::Validation(format!("unknown route '{value}'"))),
        }
    }
}

/// Who may enter a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteAccess {
    /// Requires a session.
    Authenticated,
    /// Only reachable without a session; signed-in users are sent to landing.
    GuestOnly,
    /// Reachable with or without a session.
    Public,
}

/// Static route configuration entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteDefinition {
    /// Route name.
    pub name: RouteName,
    /// Path pattern; `:param` segments match any single segment.
    pub path: &'static str,
    /// Access rule for the route.
    pub access: RouteAccess,
}

impl RouteDefinition {
    /// Creates a route that requires a session.
    #[must_use]
    pub const fn authenticated(name: RouteName, path: &'static str) -> Self {
        Self {
            name,
            path,
            access: RouteAccess::Authenticated,
        }
    }

    /// Creates a route exempt from the session requirement.
    #[must_use]
    pub const fn exempt(name: RouteName, path: &'static str, access: RouteAccess) -> Self {
        Self { name, path, access }
    }

    fn matches(&self, segments: &[&str]) -> bool {
        let pattern = split_segments(self.path);
        pattern.len() == segments.len()
            && pattern
                .iter()
                .zip(segments)
                .all(|(expected, actual)| expected.starts_with(':') || expected == actual)
    }
}

const CONSOLE_ROUTES: &[RouteDefinition] = &[
    RouteDefinition::exempt(RouteName::Login, "/", RouteAccess::GuestOnly),
    RouteDefinition::authenticated(RouteName::Instances, "/instances"),
    RouteDefinition::authenticated(RouteName::CreateInstance, "/instances/new"),
    RouteDefinition::authenticated(RouteName::InstanceDetail, "/instances/:id"),
    RouteDefinition::authenticated(RouteName::AuditLogs, "/audit-logs"),
    RouteDefinition::authenticated(RouteName::ServiceLogs, "/service-logs"),
];

/// Immutable route table consulted by the navigation guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTable {
    routes: Vec<RouteDefinition>,
}

impl RouteTable {
    /// Creates a table from definitions, rejecting duplicate names or bad paths.
    pub fn new(routes: Vec<RouteDefinition>) -> AppResult<Self> {
        let mut seen = HashSet::new();
        for route in &routes {
            if !route.path.starts_with('/') {
                return Err(AppError::Validation(format!(
                    "route '{}' path must start with '/'",
                    route.name.as_str()
                )));
            }

            if !seen.insert(route.name) {
                return Err(AppError::Validation(format!(
                    "route '{}' is declared more than once",
                    route.name.as_str()
                )));
            }
        }

        Ok(Self { routes })
    }

    /// Returns the console route table.
    #[must_use]
    pub fn console() -> Self {
        Self {
            routes: CONSOLE_ROUTES.to_vec(),
        }
    }

    /// Returns all definitions in declaration order.
    #[must_use]
    pub fn routes(&self) -> &[RouteDefinition] {
        self.routes.as_slice()
    }

    /// Returns the definition for a route name.
    #[must_use]
    pub fn definition(&self, name: RouteName) -> Option<&RouteDefinition> {
        self.routes.iter().find(|route| route.name == name)
    }

    /// Returns the access rule for a route; undeclared routes require a session.
    #[must_use]
    pub fn access(&self, name: RouteName) -> RouteAccess {
        self.definition(name)
            .map_or(RouteAccess::Authenticated, |route| route.access)
    }

    /// Resolves a browser path to a route name.
    ///
    /// Query strings, fragments and trailing slashes are ignored. The first
    /// matching definition wins.
    #[must_use]
    pub fn resolve(&self, path: &str) -> Option<RouteName> {
        let path = path
            .split(['?', '#'])
            .next()
            .unwrap_or_default();
        let segments = split_segments(path);

        self.routes
            .iter()
            .find(|route| route.matches(&segments))
            .map(|route| route.name)
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::console()
    }
}

fn split_segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|segment| !segment.is_empty()).collect()
}

/// Verdict returned for one navigation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationDecision {
    /// Let the navigation through.
    Proceed,
    /// Replace the navigation with another route.
    Redirect(RouteName),
}
