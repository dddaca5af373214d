//! Session for the built-in credential store.

use std::any::Any;
use std::sync::{Arc, Weak};

use crate::contract::{FederatedSession, Session};
use crate::model::{AuthSpace, Principal, ProjectRef};
use crate::parent::ParentSession;

/// Provider id of the built-in credential store.
pub const LOCAL_PROVIDER_ID: &str = "local";

/// Local provider session.
///
/// The local provider has no external authorization boundary, so its space
/// is the parent's singleton project. A local session is never itself
/// project-scoped: [`Session::singleton_project`] is always `None`.
#[derive(Debug, Clone)]
pub struct LocalSession {
    parent: Weak<ParentSession>,
    user_id: String,
}

impl LocalSession {
    /// Creates a local session for `user_id` attached to `parent`.
    #[must_use]
    pub fn new(parent: &Arc<ParentSession>, user_id: impl Into<String>) -> Self {
        Self {
            parent: Arc::downgrade(parent),
            user_id: user_id.into(),
        }
    }

    /// Returns the local user id.
    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.user_id
    }
}

impl Session for LocalSession {
    fn session_space(&self) -> Option<AuthSpace> {
        let project = self.parent.upgrade()?.singleton_project()?;
        Some(AuthSpace::Project(ProjectRef::clone(&project)))
    }

    fn session_principal(&self) -> Option<Arc<Principal>> {
        self.parent.upgrade()?.session_principal()
    }

    fn is_application_session(&self) -> bool {
        false
    }

    fn singleton_project(&self) -> Option<Arc<ProjectRef>> {
        None
    }
}

impl FederatedSession for LocalSession {
    fn provider_id(&self) -> &str {
        LOCAL_PROVIDER_ID
    }

    fn parent(&self) -> Option<Arc<ParentSession>> {
        self.parent.upgrade()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
