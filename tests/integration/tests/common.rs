//! Common test utilities and fixtures.

use std::any::Any;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use af_core::{AppConfiguration, SharedConfiguration};
use af_provider::{
    CredentialProfile, DescriptorRegistry, PropertyDescriptor, PropertyType, ProviderDescriptor,
};
use af_session::{
    AuthParameters, AuthSpace, FederatedSession, FederatedSessionBase, ParentSession, Principal,
    ProjectRef, Session,
};

/// Configuration shared by the catalog tests.
pub const CONFIG_JSON: &str = r#"{
    "defaultAuthProvider": "local",
    "authProviderConfigurations": {
        "corp": { "provider": "ldap", "displayName": "Corporate directory" },
        "legacy": { "provider": "ldap", "disabled": true },
        "partners": { "provider": "ldap", "displayName": "Partner directory" },
        "okta": { "provider": "sso", "parameters": { "tenant": "acme" } }
    }
}"#;

/// Initializes tracing once for the test binary.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("af_session=debug,af_provider=debug,af_core=debug")
        .with_test_writer()
        .try_init();
}

/// Registry with the local, LDAP and SSO providers.
pub fn registry() -> anyhow::Result<Arc<DescriptorRegistry>> {
    let registry = DescriptorRegistry::new();

    registry.register(
        ProviderDescriptor::builder("local", "Local")
            .icon("platform:/plugin/auth.local/icons/local.png")
            .description("Built-in user store")
            .credential_profile(
                CredentialProfile::new("password", "Password")
                    .with_parameter(PropertyDescriptor::new("user", "User").user(true).required(true))
                    .with_parameter(
                        PropertyDescriptor::new("password", "Password")
                            .with_type(PropertyType::Password)
                            .user(true)
                            .required(true),
                    ),
            )
            .credential_parameter(PropertyDescriptor::new("user", "User").user(true))
            .build(),
    )?;

    registry.register(
        ProviderDescriptor::builder("ldap", "LDAP")
            .icon("platform:/plugin/auth.ldap/icons/ldap.png")
            .description("External LDAP directory")
            .configurable(true)
            .build(),
    )?;

    registry.register_json(
        r#"{ "id": "sso", "label": "Single sign-on", "configurable": true, "icon": "https://cdn/sso.svg" }"#,
    )?;

    Ok(Arc::new(registry))
}

/// Live configuration parsed from [`CONFIG_JSON`].
pub fn shared_config() -> anyhow::Result<Arc<SharedConfiguration>> {
    let config = AppConfiguration::from_json_str(CONFIG_JSON)?;
    Ok(Arc::new(SharedConfiguration::new(config)))
}

/// Parent session for user `u1` pinned to project `p1`.
pub fn user_session() -> Arc<ParentSession> {
    ParentSession::builder(AuthSpace::application("app"))
        .principal(Principal::new("u1").with_display_name("Ursula"))
        .singleton_project(ProjectRef::new("p1", "Sales"))
        .build()
}

/// External provider session that tracks how often it was closed.
///
/// Embeds [`FederatedSessionBase`] and overrides `close()`, the way a
/// provider holding a connection would.
#[derive(Debug)]
pub struct DirectorySession {
    base: FederatedSessionBase,
    closes: Arc<AtomicUsize>,
}

impl DirectorySession {
    /// Creates a session for `provider_id` with a bind token parameter.
    pub fn new(parent: &Arc<ParentSession>, provider_id: &str, token: &str) -> Arc<Self> {
        let params: AuthParameters = [("bindToken", token)].into_iter().collect();
        let space = AuthSpace::application(format!("{provider_id}-realm"));
        Arc::new(Self {
            base: FederatedSessionBase::new(provider_id, parent, space, params),
            closes: Arc::new(AtomicUsize::new(0)),
        })
    }

    /// Returns the bind token the provider issued.
    pub fn bind_token(&self) -> Option<&str> {
        self.base.auth_parameters().get_str("bindToken")
    }

    /// Returns how many times the session was closed.
    pub fn close_count(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

impl Session for DirectorySession {
    fn session_space(&self) -> Option<AuthSpace> {
        self.base.session_space()
    }

    fn session_principal(&self) -> Option<Arc<Principal>> {
        self.base.session_principal()
    }

    fn is_application_session(&self) -> bool {
        self.base.is_application_session()
    }

    fn singleton_project(&self) -> Option<Arc<ProjectRef>> {
        self.base.singleton_project()
    }
}

impl FederatedSession for DirectorySession {
    fn provider_id(&self) -> &str {
        self.base.provider_id()
    }

    fn parent(&self) -> Option<Arc<ParentSession>> {
        self.base.parent()
    }

    fn close(&self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
