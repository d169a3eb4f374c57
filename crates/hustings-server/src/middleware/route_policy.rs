//! Per-route authorization declarations.
//!
//! Every operation is registered together with a [`RoutePolicy`] through
//! [`PolicyRouter`], which yields a plain axum [`Router`] and an immutable
//! [`RouteRegistry`] consulted by the authorization middleware.

use std::collections::HashMap;
use std::sync::Arc;

use axum::Router;
use axum::handler::Handler;
use axum::http::Method;
use axum::routing::{MethodRouter, delete, get, patch, post, put};

use crate::extract::Permission;
use crate::service::FeatureFlag;

/// What a route requires from the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoutePolicy {
    /// Anyone may call the route; overrides `permissions`.
    pub public: bool,
    /// The caller needs at least one of these. Empty means any identity.
    pub permissions: Vec<Permission>,
    /// The route only exists while this feature is enabled.
    pub feature: Option<FeatureFlag>,
}

impl RoutePolicy {
    /// A route open to anonymous callers.
    pub fn public() -> Self {
        Self {
            public: true,
            ..Self::default()
        }
    }

    /// A route open to any authenticated caller regardless of role.
    pub fn authenticated() -> Self {
        Self::default()
    }

    /// A route open to callers holding at least one of `permissions`.
    pub fn require(permissions: impl IntoIterator<Item = Permission>) -> Self {
        Self {
            permissions: permissions.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Hides the route unless `feature` is enabled.
    pub fn with_feature(mut self, feature: FeatureFlag) -> Self {
        self.feature = Some(feature);
        self
    }

    /// Returns whether this declaration settles the permission question:
    /// it is public or names at least one permission.
    #[inline]
    fn is_conclusive(&self) -> bool {
        self.public || !self.permissions.is_empty()
    }
}

/// Lookup table from `(method, route template)` to [`RoutePolicy`].
///
/// Route templates are the paths given at registration, such as
/// `/articles/{article_id}`, matching axum's `MatchedPath`.
#[derive(Debug, Clone, Default)]
pub struct RouteRegistry {
    operations: HashMap<(Method, String), RoutePolicy>,
    scopes: Vec<(String, RoutePolicy)>,
}

impl RouteRegistry {
    /// Declares the policy of a single operation.
    pub fn declare(&mut self, method: Method, path: impl Into<String>, policy: RoutePolicy) {
        self.operations.insert((method, path.into()), policy);
    }

    /// Declares the policy of every route under a path prefix.
    pub fn declare_scope(&mut self, prefix: impl Into<String>, policy: RoutePolicy) {
        let prefix = normalize_prefix(&prefix.into());
        self.scopes.retain(|(existing, _)| *existing != prefix);
        self.scopes.push((prefix, policy));
        self.scopes.sort_by(|(a, _), (b, _)| b.len().cmp(&a.len()));
    }

    /// Merges another registry into this one. Entries of `other` win.
    pub fn merge(&mut self, other: RouteRegistry) {
        self.operations.extend(other.operations);
        for (prefix, policy) in other.scopes {
            self.declare_scope(prefix, policy);
        }
    }

    /// Returns whether `method` has its own declaration on `path`.
    ///
    /// `HEAD` counts as declared wherever `GET` is.
    pub fn declares(&self, method: &Method, path: &str) -> bool {
        let declared = |method: Method| self.operations.contains_key(&(method, path.to_owned()));
        declared(method.clone()) || (*method == Method::HEAD && declared(Method::GET))
    }

    /// Returns the number of declared operations.
    #[inline]
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Returns whether no operation has been declared.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Resolves the effective policy for a request.
    ///
    /// Candidates are the operation itself, then enclosing scopes from the
    /// longest prefix to the shortest. The first conclusive candidate sets
    /// `public` and `permissions`; the first candidate naming a feature sets
    /// `feature`. `HEAD` requests use the `GET` declaration when they have
    /// none of their own. Nothing conclusive means authenticated-only.
    pub fn resolve(&self, method: &Method, path: &str) -> RoutePolicy {
        let operation = self
            .operations
            .get(&(method.clone(), path.to_owned()))
            .or_else(|| {
                (*method == Method::HEAD)
                    .then(|| self.operations.get(&(Method::GET, path.to_owned())))
                    .flatten()
            });

        let scopes = self
            .scopes
            .iter()
            .filter(|(prefix, _)| is_segment_prefix(prefix, path))
            .map(|(_, policy)| policy);

        let candidates: Vec<&RoutePolicy> = operation.into_iter().chain(scopes).collect();

        let mut resolved = candidates
            .iter()
            .find(|policy| policy.is_conclusive())
            .map(|policy| RoutePolicy {
                feature: None,
                ..(*policy).clone()
            })
            .unwrap_or_default();

        resolved.feature = candidates.iter().find_map(|policy| policy.feature);
        resolved
    }
}

fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim_end_matches('/');
    if trimmed.starts_with('/') {
        trimmed.to_owned()
    } else {
        format!("/{trimmed}")
    }
}

/// Returns whether `prefix` covers `path` on a segment boundary, so `/users`
/// covers `/users` and `/users/{user_id}` but not `/usersettings`.
fn is_segment_prefix(prefix: &str, path: &str) -> bool {
    if prefix == "/" {
        return true;
    }

    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

/// Router builder that records a [`RoutePolicy`] for every operation.
#[must_use]
pub struct PolicyRouter<S = ()> {
    router: Router<S>,
    registry: RouteRegistry,
}

impl<S> PolicyRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    /// Creates an empty router.
    pub fn new() -> Self {
        Self {
            router: Router::new(),
            registry: RouteRegistry::default(),
        }
    }

    fn operation(
        mut self,
        method: Method,
        path: &str,
        method_router: MethodRouter<S>,
        policy: RoutePolicy,
    ) -> Self {
        self.registry.declare(method, path, policy);
        self.router = self.router.route(path, method_router);
        self
    }

    /// Registers a `GET` handler. `HEAD` is answered by the same handler.
    pub fn get<H, T>(self, path: &str, handler: H, policy: RoutePolicy) -> Self
    where
        H: Handler<T, S>,
        T: 'static,
    {
        self.operation(Method::GET, path, get(handler), policy)
    }

    /// Registers a `POST` handler.
    pub fn post<H, T>(self, path: &str, handler: H, policy: RoutePolicy) -> Self
    where
        H: Handler<T, S>,
        T: 'static,
    {
        self.operation(Method::POST, path, post(handler), policy)
    }

    /// Registers a `PUT` handler.
    pub fn put<H, T>(self, path: &str, handler: H, policy: RoutePolicy) -> Self
    where
        H: Handler<T, S>,
        T: 'static,
    {
        self.operation(Method::PUT, path, put(handler), policy)
    }

    /// Registers a `PATCH` handler.
    pub fn patch<H, T>(self, path: &str, handler: H, policy: RoutePolicy) -> Self
    where
        H: Handler<T, S>,
        T: 'static,
    {
        self.operation(Method::PATCH, path, patch(handler), policy)
    }

    /// Registers a `DELETE` handler.
    pub fn delete<H, T>(self, path: &str, handler: H, policy: RoutePolicy) -> Self
    where
        H: Handler<T, S>,
        T: 'static,
    {
        self.operation(Method::DELETE, path, delete(handler), policy)
    }

    /// Declares a policy for every route under `prefix`.
    ///
    /// Operation declarations and longer scopes take precedence.
    pub fn scope(mut self, prefix: &str, policy: RoutePolicy) -> Self {
        self.registry.declare_scope(prefix, policy);
        self
    }

    /// Merges the routes and declarations of another router.
    pub fn merge(mut self, other: PolicyRouter<S>) -> Self {
        self.router = self.router.merge(other.router);
        self.registry.merge(other.registry);
        self
    }

    /// Returns the axum router and the frozen declaration table.
    pub fn into_parts(self) -> (Router<S>, Arc<RouteRegistry>) {
        (self.router, Arc::new(self.registry))
    }
}

impl<S> Default for PolicyRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> RouteRegistry {
        let mut registry = RouteRegistry::default();
        registry.declare(Method::GET, "/articles", RoutePolicy::public());
        registry.declare(
            Method::POST,
            "/articles",
            RoutePolicy::require([Permission::BlogCreate]),
        );
        registry.declare(Method::GET, "/users/{user_id}", RoutePolicy::authenticated());
        registry.declare(
            Method::POST,
            "/users/{user_id}/ban",
            RoutePolicy::require([Permission::UserBan]),
        );
        registry.declare_scope("/users", RoutePolicy::require([Permission::UserRead]));
        registry.declare(
            Method::GET,
            "/events",
            RoutePolicy::public().with_feature(FeatureFlag::Events),
        );
        registry
    }

    #[test]
    fn declares_only_registered_methods() {
        let registry = registry();
        assert!(registry.declares(&Method::POST, "/users/{user_id}/ban"));
        assert!(!registry.declares(&Method::PUT, "/users/{user_id}/ban"));
        assert!(!registry.declares(&Method::GET, "/nowhere"));
    }

    #[test]
    fn operation_beats_scope() {
        let resolved = registry().resolve(&Method::POST, "/users/{user_id}/ban");
        assert_eq!(resolved.permissions, vec![Permission::UserBan]);
    }

    #[test]
    fn empty_operation_falls_through_to_scope() {
        let resolved = registry().resolve(&Method::GET, "/users/{user_id}");
        assert!(!resolved.public);
        assert_eq!(resolved.permissions, vec![Permission::UserRead]);
    }

    #[test]
    fn inner_scope_beats_outer_scope() {
        let mut registry = registry();
        registry.declare_scope("/", RoutePolicy::require([Permission::BlogRead]));
        registry.declare_scope("/users/{user_id}", RoutePolicy::require([Permission::UserBan]));

        let resolved = registry.resolve(&Method::GET, "/users/{user_id}/history");
        assert_eq!(resolved.permissions, vec![Permission::UserBan]);

        let resolved = registry.resolve(&Method::GET, "/users");
        assert_eq!(resolved.permissions, vec![Permission::UserRead]);

        let resolved = registry.resolve(&Method::GET, "/elsewhere");
        assert_eq!(resolved.permissions, vec![Permission::BlogRead]);
    }

    #[test]
    fn public_short_circuits_scope_permissions() {
        let mut registry = registry();
        registry.declare(Method::GET, "/users/count", RoutePolicy::public());

        let resolved = registry.resolve(&Method::GET, "/users/count");
        assert!(resolved.public);
    }

    #[test]
    fn prefixes_are_segment_aligned() {
        let resolved = registry().resolve(&Method::GET, "/usersettings");
        assert_eq!(resolved, RoutePolicy::authenticated());
        assert!(is_segment_prefix("/users", "/users"));
        assert!(is_segment_prefix("/users", "/users/{user_id}"));
        assert!(!is_segment_prefix("/users", "/usersettings"));
    }

    #[test]
    fn head_falls_back_to_get() {
        let resolved = registry().resolve(&Method::HEAD, "/articles");
        assert!(resolved.public);
    }

    #[test]
    fn undeclared_routes_are_authenticated_only() {
        let resolved = registry().resolve(&Method::DELETE, "/articles");
        assert_eq!(resolved, RoutePolicy::authenticated());
    }

    #[test]
    fn feature_resolves_independently() {
        let mut registry = registry();
        registry.declare_scope(
            "/events",
            RoutePolicy::authenticated().with_feature(FeatureFlag::Events),
        );
        registry.declare(
            Method::POST,
            "/events",
            RoutePolicy::require([Permission::EventCreate]),
        );

        let resolved = registry.resolve(&Method::POST, "/events");
        assert_eq!(resolved.permissions, vec![Permission::EventCreate]);
        assert_eq!(resolved.feature, Some(FeatureFlag::Events));

        let resolved = registry.resolve(&Method::GET, "/articles");
        assert_eq!(resolved.feature, None);
    }

    #[test]
    fn scopes_are_normalized() {
        let mut registry = RouteRegistry::default();
        registry.declare_scope("moderation/", RoutePolicy::require([Permission::ModerationLogRead]));

        let resolved = registry.resolve(&Method::GET, "/moderation/logs");
        assert_eq!(resolved.permissions, vec![Permission::ModerationLogRead]);
    }

    #[test]
    fn policy_router_records_every_operation() {
        async fn ok() -> &'static str {
            "ok"
        }

        let router = PolicyRouter::<()>::new()
            .get("/articles", ok, RoutePolicy::public())
            .post("/articles", ok, RoutePolicy::require([Permission::BlogCreate]))
            .merge(PolicyRouter::new().delete(
                "/comments/{comment_id}",
                ok,
                RoutePolicy::require([Permission::CommentDeleteOwn]),
            ));

        let (_, registry) = router.into_parts();
        assert_eq!(registry.len(), 3);
        assert!(registry.resolve(&Method::GET, "/articles").public);
    }
}
