//! Generic federated session.
//!
//! [`FederatedSessionBase`] carries what every provider-specific session
//! needs: the parent back-reference, the authorization space the federation
//! was established for, and the provider's authentication parameters.
//! Provider variants embed it and forward the [`Session`] accessors,
//! overriding `close()` when they hold resources.

use std::any::Any;
use std::sync::{Arc, Weak};

use crate::contract::{FederatedSession, Session};
use crate::error::{SessionError, SessionResult};
use crate::model::{AuthSpace, Principal, ProjectRef};
use crate::params::AuthParameters;
use crate::parent::ParentSession;

/// A federated session for an external provider.
#[derive(Debug, Clone)]
pub struct FederatedSessionBase {
    provider_id: String,
    parent: Weak<ParentSession>,
    space: AuthSpace,
    auth_parameters: AuthParameters,
}

impl FederatedSessionBase {
    /// Creates a federated session for `provider_id` attached to `parent`.
    ///
    /// `space` may differ from the parent's default space.
    #[must_use]
    pub fn new(
        provider_id: impl Into<String>,
        parent: &Arc<ParentSession>,
        space: AuthSpace,
        auth_parameters: AuthParameters,
    ) -> Self {
        Self {
            provider_id: provider_id.into(),
            parent: Arc::downgrade(parent),
            space,
            auth_parameters,
        }
    }

    /// Creates a builder that checks every input is present.
    #[must_use]
    pub fn builder(provider_id: impl Into<String>) -> FederatedSessionBuilder {
        FederatedSessionBuilder::new(provider_id)
    }

    /// Returns the parameters the provider supplied at sign-in.
    #[must_use]
    pub const fn auth_parameters(&self) -> &AuthParameters {
        &self.auth_parameters
    }

    /// Returns the space this federation was established for.
    #[must_use]
    pub const fn auth_space(&self) -> &AuthSpace {
        &self.space
    }
}

impl Session for FederatedSessionBase {
    fn session_space(&self) -> Option<AuthSpace> {
        Some(self.space.clone())
    }

    fn session_principal(&self) -> Option<Arc<Principal>> {
        self.parent.upgrade()?.session_principal()
    }

    fn is_application_session(&self) -> bool {
        false
    }

    fn singleton_project(&self) -> Option<Arc<ProjectRef>> {
        self.parent.upgrade()?.singleton_project()
    }
}

impl FederatedSession for FederatedSessionBase {
    fn provider_id(&self) -> &str {
        &self.provider_id
    }

    fn parent(&self) -> Option<Arc<ParentSession>> {
        self.parent.upgrade()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Builder for [`FederatedSessionBase`].
///
/// Used where inputs arrive optionally, e.g. from a provider callback.
#[derive(Debug)]
pub struct FederatedSessionBuilder {
    provider_id: String,
    parent: Option<Arc<ParentSession>>,
    space: Option<AuthSpace>,
    auth_parameters: Option<AuthParameters>,
}

impl FederatedSessionBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new(provider_id: impl Into<String>) -> Self {
        Self {
            provider_id: provider_id.into(),
            parent: None,
            space: None,
            auth_parameters: None,
        }
    }

    /// Sets the owning parent session.
    #[must_use]
    pub fn parent(mut self, parent: &Arc<ParentSession>) -> Self {
        self.parent = Some(Arc::clone(parent));
        self
    }

    /// Sets the authorization space.
    #[must_use]
    pub fn space(mut self, space: AuthSpace) -> Self {
        self.space = Some(space);
        self
    }

    /// Sets the authentication parameters.
    #[must_use]
    pub fn auth_parameters(mut self, params: impl Into<AuthParameters>) -> Self {
        self.auth_parameters = Some(params.into());
        self
    }

    /// Builds the session.
    ///
    /// ## Errors
    ///
    /// Returns `SessionError::MissingInput` naming the first absent input.
    pub fn build(self) -> SessionResult<FederatedSessionBase> {
        let parent = self.parent.ok_or(SessionError::MissingInput("parent"))?;
        let space = self.space.ok_or(SessionError::MissingInput("space"))?;
        let auth_parameters = self
            .auth_parameters
            .ok_or(SessionError::MissingInput("auth_parameters"))?;

        Ok(FederatedSessionBase::new(
            self.provider_id,
            &parent,
            space,
            auth_parameters,
        ))
    }
}
