use paas_core::{AppError, AppResult};
use paas_domain::{NavigationDecision, RouteAccess, RouteName, RouteTable};
use tracing::debug;

use crate::AuthenticationState;

/// Navigation gate consulted before every route change.
///
/// Decisions depend only on the route table and whether a session exists, and
/// never suspend.
#[derive(Debug, Clone)]
pub struct RouteGuard {
    table: RouteTable,
    login: RouteName,
    landing: RouteName,
}

impl RouteGuard {
    /// Creates a guard that sends guests to `login` and signed-in users to `instances`.
    #[must_use]
    pub fn new(table: RouteTable) -> Self {
        Self {
            table,
            login: RouteName::Login,
            landing: RouteName::Instances,
        }
    }

    /// Overrides the route signed-in users land on.
    ///
    /// The landing route must require a session; anything else would bounce
    /// signed-in users between guest-only routes.
    pub fn with_landing(mut self, landing: RouteName) -> AppResult<Self> {
        if self.table.access(landing) != RouteAccess::Authenticated {
            return Err(AppError::Validation(format!(
                "landing route '{}' must require a session",
                landing.as_str()
            )));
        }

        self.landing = landing;
        Ok(self)
    }

    /// Returns the route table backing the guard.
    #[must_use]
    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    /// Decides whether navigation to `target` may proceed.
    pub fn decide<S>(&self, target: RouteName, session: &S) -> NavigationDecision
    where
        S: AuthenticationState + ?Sized,
    {
        let authenticated = session.is_authenticated();
        let decision = match (self.table.access(target), authenticated) {
            (RouteAccess::Authenticated, false) => NavigationDecision::Redirect(self.login),
            (RouteAccess::GuestOnly, true) => NavigationDecision::Redirect(self.landing),
            _ => NavigationDecision::Proceed,
        };

        debug!(
            route = target.as_str(),
            authenticated,
            ?decision,
            "navigation decided"
        );
        decision
    }

    /// Resolves `path` and decides as [`RouteGuard::decide`].
    ///
    /// Paths outside the table require a session and send signed-in users to
    /// the landing route.
    pub fn decide_path<S>(&self, path: &str, session: &S) -> NavigationDecision
    where
        S: AuthenticationState + ?Sized,
    {
        match self.table.resolve(path) {
            Some(target) => self.decide(target, session),
            None if session.is_authenticated() => NavigationDecision::Redirect(self.landing),
            None => NavigationDecision::Redirect(self.login),
        }
    }
}

impl Default for RouteGuard {
    fn default() -> Self {
        Self::new(RouteTable::console())
    }
}
