//! The user-facing parent session.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use parking_lot::RwLock;
use uuid::Uuid;

use crate::contract::{FederatedSession, Session};
use crate::error::{SessionError, SessionResult};
use crate::model::{AuthSpace, Principal, ProjectRef};

/// The session a user holds.
///
/// Owns the principal, the optional singleton project and the federated
/// sessions attached to it, keyed by provider id. It is the only source of
/// the session id.
///
/// ## Re-authentication
///
/// At most one federated session per provider id is active. Attaching a new
/// session for a provider that already has one replaces and closes the old
/// session.
#[derive(Debug)]
pub struct ParentSession {
    /// Unique session identifier.
    id: String,

    /// Default authorization space.
    space: AuthSpace,

    /// Whether this session represents the application itself.
    application: bool,

    /// When the session was created.
    started_at: DateTime<Utc>,

    /// Identity behind this session.
    principal: RwLock<Option<Arc<Principal>>>,

    /// Project this session is pinned to.
    singleton_project: RwLock<Option<Arc<ProjectRef>>>,

    /// Active federated sessions by provider id.
    federated: DashMap<String, Arc<dyn FederatedSession>>,

    /// Whether this session has been closed.
    closed: RwLock<bool>,
}

impl ParentSession {
    /// Creates a user session in the given default space.
    #[must_use]
    pub fn new(space: AuthSpace) -> Arc<Self> {
        Self::builder(space).build()
    }

    /// Creates a new session builder.
    #[must_use]
    pub fn builder(space: AuthSpace) -> ParentSessionBuilder {
        ParentSessionBuilder::new(space)
    }

    /// Returns the session ID.
    #[must_use]
    pub fn session_id(&self) -> &str {
        &self.id
    }

    /// Returns when the session was created.
    #[must_use]
    pub const fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Replaces the principal. Federated sessions see the change immediately.
    pub fn set_principal(&self, principal: Option<Principal>) {
        *self.principal.write() = principal.map(Arc::new);
    }

    /// Replaces the singleton project. Federated sessions see the change immediately.
    pub fn set_singleton_project(&self, project: Option<ProjectRef>) {
        *self.singleton_project.write() = project.map(Arc::new);
    }

    /// Attaches a federated session, returning the one it replaced.
    ///
    /// The replaced session is closed before it is returned.
    ///
    /// ## Errors
    ///
    /// - `SessionError::Closed` if this session has been closed
    /// - `SessionError::ForeignParent` if the session was created for another parent
    pub fn attach_federated(
        &self,
        session: Arc<dyn FederatedSession>,
    ) -> SessionResult<Option<Arc<dyn FederatedSession>>> {
        let closed = self.closed.read();
        if *closed {
            return Err(SessionError::Closed(self.id.clone()));
        }

        let provider_id = session.provider_id().to_string();
        let owned = session
            .parent()
            .is_some_and(|parent| std::ptr::eq(Arc::as_ptr(&parent), self));
        if !owned {
            return Err(SessionError::ForeignParent(provider_id));
        }

        let previous = self
            .federated
            .insert(provider_id.clone(), Arc::clone(&session));
        drop(closed);

        match &previous {
            Some(old) if !same_session(old, &session) => {
                tracing::info!(
                    session_id = %self.id,
                    provider = %provider_id,
                    "Federated session replaced on re-authentication"
                );
                old.close();
            }
            Some(_) => {}
            None => {
                tracing::debug!(
                    session_id = %self.id,
                    provider = %provider_id,
                    "Federated session attached"
                );
            }
        }

        Ok(previous)
    }

    /// Returns the active federated session for a provider.
    #[must_use]
    pub fn federated_session(&self, provider_id: &str) -> Option<Arc<dyn FederatedSession>> {
        self.federated
            .get(provider_id)
            .map(|entry| Arc::clone(entry.value()))
    }

    /// Returns all active federated sessions, ordered by provider id.
    #[must_use]
    pub fn federated_sessions(&self) -> Vec<Arc<dyn FederatedSession>> {
        let mut sessions: Vec<_> = self
            .federated
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();
        sessions.sort_by(|a, b| a.provider_id().cmp(b.provider_id()));
        sessions
    }

    /// Returns the ids of providers with an active federated session, sorted.
    #[must_use]
    pub fn federated_provider_ids(&self) -> Vec<String> {
        let mut ids: Vec<_> = self.federated.iter().map(|e| e.key().clone()).collect();
        ids.sort();
        ids
    }

    /// Returns the number of active federated sessions.
    #[must_use]
    pub fn federated_count(&self) -> usize {
        self.federated.len()
    }

    /// Detaches and closes the federated session for a provider.
    pub fn detach_federated(&self, provider_id: &str) -> Option<Arc<dyn FederatedSession>> {
        let (_, session) = self.federated.remove(provider_id)?;
        tracing::debug!(
            session_id = %self.id,
            provider = %provider_id,
            "Federated session detached"
        );
        session.close();
        Some(session)
    }

    /// Returns whether the session has been closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        *self.closed.read()
    }

    /// Closes the session and every attached federated session.
    pub fn close(&self) {
        let sessions: Vec<_> = {
            let mut closed = self.closed.write();
            if *closed {
                return;
            }
            *closed = true;
            // Only sessions removed here are closed here; a concurrent
            // detach owns whatever it removed first.
            let keys: Vec<String> = self.federated.iter().map(|e| e.key().clone()).collect();
            keys.iter()
                .filter_map(|key| self.federated.remove(key))
                .map(|(_, session)| session)
                .collect()
        };

        for session in &sessions {
            session.close();
        }
        tracing::debug!(
            session_id = %self.id,
            federated = sessions.len(),
            "Session closed"
        );
    }
}

impl Session for ParentSession {
    fn session_space(&self) -> Option<AuthSpace> {
        Some(self.space.clone())
    }

    fn session_principal(&self) -> Option<Arc<Principal>> {
        self.principal.read().clone()
    }

    fn is_application_session(&self) -> bool {
        self.application
    }

    fn singleton_project(&self) -> Option<Arc<ProjectRef>> {
        self.singleton_project.read().clone()
    }
}

impl Drop for ParentSession {
    fn drop(&mut self) {
        if !*self.closed.read() {
            self.close();
        }
    }
}

fn same_session(a: &Arc<dyn FederatedSession>, b: &Arc<dyn FederatedSession>) -> bool {
    std::ptr::eq(Arc::as_ptr(a).cast::<()>(), Arc::as_ptr(b).cast::<()>())
}

/// Builder for [`ParentSession`].
#[derive(Debug)]
pub struct ParentSessionBuilder {
    id: Option<String>,
    space: AuthSpace,
    application: bool,
    principal: Option<Principal>,
    singleton_project: Option<ProjectRef>,
}

impl ParentSessionBuilder {
    /// Creates a new builder for a session in the given space.
    #[must_use]
    pub const fn new(space: AuthSpace) -> Self {
        Self {
            id: None,
            space,
            application: false,
            principal: None,
            singleton_project: None,
        }
    }

    /// Sets an explicit session id instead of a generated one.
    #[must_use]
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Marks the session as the application's own session.
    #[must_use]
    pub const fn application(mut self, application: bool) -> Self {
        self.application = application;
        self
    }

    /// Sets the principal.
    #[must_use]
    pub fn principal(mut self, principal: Principal) -> Self {
        self.principal = Some(principal);
        self
    }

    /// Pins the session to a project.
    #[must_use]
    pub fn singleton_project(mut self, project: ProjectRef) -> Self {
        self.singleton_project = Some(project);
        self
    }

    /// Builds the session.
    #[must_use]
    pub fn build(self) -> Arc<ParentSession> {
        let id = self.id.unwrap_or_else(|| Uuid::now_v7().to_string());
        tracing::debug!(session_id = %id, space = %self.space, "Session created");

        Arc::new(ParentSession {
            id,
            space: self.space,
            application: self.application,
            started_at: Utc::now(),
            principal: RwLock::new(self.principal.map(Arc::new)),
            singleton_project: RwLock::new(self.singleton_project.map(Arc::new)),
            federated: DashMap::new(),
            closed: RwLock::new(false),
        })
    }
}
