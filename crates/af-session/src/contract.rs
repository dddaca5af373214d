//! The session contract shared by parent and federated sessions.

use std::any::Any;
use std::fmt::Debug;
use std::sync::Arc;

use crate::model::{AuthSpace, Principal, ProjectRef};
use crate::parent::ParentSession;

/// Capability set every session satisfies.
///
/// This is the only interface request handlers and authorization checks
/// should depend on. All accessors are pure reads; an absent principal,
/// space or project is `None`, never an error.
pub trait Session: Send + Sync + Debug {
    /// Returns the authorization space this session operates in.
    fn session_space(&self) -> Option<AuthSpace>;

    /// Returns the identity behind this session.
    fn session_principal(&self) -> Option<Arc<Principal>>;

    /// Returns whether the session represents the application itself
    /// rather than a user.
    fn is_application_session(&self) -> bool;

    /// Returns the project this session is pinned to, if any.
    fn singleton_project(&self) -> Option<Arc<ProjectRef>>;
}

/// A per-provider session attached to a [`ParentSession`].
///
/// Federated sessions never define a session id, principal or singleton
/// project of their own. Those come from the parent on every call.
///
/// ## Lifecycle
///
/// 1. Created by a provider's authentication flow against a parent
/// 2. Attached with [`ParentSession::attach_federated`]
/// 3. `close()` - Called when replaced, detached, or when the parent closes
pub trait FederatedSession: Session + Any {
    /// Returns the id of the provider that produced this session.
    fn provider_id(&self) -> &str;

    /// Returns the owning parent session, `None` once it has been dropped.
    fn parent(&self) -> Option<Arc<ParentSession>>;

    /// Returns the parent's session id.
    fn session_id(&self) -> Option<String> {
        self.parent().map(|parent| parent.session_id().to_string())
    }

    /// Returns whether the parent is still alive and open.
    fn is_valid(&self) -> bool {
        self.parent().is_some_and(|parent| !parent.is_closed())
    }

    /// Releases provider-held resources.
    ///
    /// Must be synchronous and fast; providers with blocking teardown own
    /// their timeout policy.
    fn close(&self) {}

    /// Returns a reference to self as Any for downcasting.
    fn as_any(&self) -> &dyn Any;
}

impl dyn FederatedSession {
    /// Downcasts to a concrete provider variant.
    ///
    /// Only for callers that need a variant-specific accessor such as
    /// [`LocalSession::user_id`](crate::LocalSession::user_id).
    #[must_use]
    pub fn downcast_ref<T: FederatedSession>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }
}
