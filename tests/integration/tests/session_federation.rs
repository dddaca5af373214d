//! Parent and federated session integration tests.

use std::collections::HashMap;
use std::sync::Arc;
use std::thread;

use af_session::{
    AuthSpace, FederatedSession, FederatedSessionBase, LocalSession, ParentSession, Principal,
    ProjectRef, Session, SessionError, LOCAL_PROVIDER_ID,
};
use serde_json::json;

use crate::common::{init_tracing, user_session, DirectorySession};

/// Resolves the principal the way an authorization check would: through
/// the contract only.
fn principal_of<S: Session + ?Sized>(session: &S) -> Option<String> {
    session.session_principal().map(|p| p.user_id.clone())
}

#[test]
fn parent_backed_by_several_providers() -> anyhow::Result<()> {
    init_tracing();
    let parent = user_session();

    parent.attach_federated(Arc::new(LocalSession::new(&parent, "u1")))?;
    parent.attach_federated(DirectorySession::new(&parent, "ldap", "bind-1"))?;
    parent.attach_federated(DirectorySession::new(&parent, "sso", "bind-2"))?;

    assert_eq!(parent.federated_provider_ids(), vec!["ldap", "local", "sso"]);
    for session in parent.federated_sessions() {
        assert_eq!(principal_of(session.as_ref()), Some("u1".to_string()));
        assert!(!session.is_application_session());
        assert_eq!(session.session_id().as_deref(), Some(parent.session_id()));
    }
    Ok(())
}

#[test]
fn delegation_follows_parent_changes() -> anyhow::Result<()> {
    init_tracing();
    let parent = user_session();
    let directory = DirectorySession::new(&parent, "ldap", "bind-1");
    parent.attach_federated(directory.clone())?;

    parent.set_principal(Some(Principal::new("u2")));
    parent.set_singleton_project(Some(ProjectRef::new("p2", "Ops")));

    assert_eq!(directory.session_principal(), parent.session_principal());
    assert_eq!(directory.singleton_project(), parent.singleton_project());
    assert_eq!(
        directory.session_space(),
        Some(AuthSpace::application("ldap-realm"))
    );
    Ok(())
}

#[test]
fn local_session_contract() -> anyhow::Result<()> {
    init_tracing();
    let parent = user_session();
    parent.attach_federated(Arc::new(LocalSession::new(&parent, "u1")))?;

    let session = parent
        .federated_session(LOCAL_PROVIDER_ID)
        .ok_or_else(|| anyhow::anyhow!("local session missing"))?;
    let local = session
        .downcast_ref::<LocalSession>()
        .ok_or_else(|| anyhow::anyhow!("not a local session"))?;

    assert_eq!(local.user_id(), "u1");
    assert!(local.singleton_project().is_none());
    assert_eq!(
        local.session_space(),
        parent
            .singleton_project()
            .map(|p| AuthSpace::Project(ProjectRef::clone(&p)))
    );
    assert!(session.downcast_ref::<DirectorySession>().is_none());
    Ok(())
}

#[test]
fn reauthentication_replaces_previous_session() -> anyhow::Result<()> {
    init_tracing();
    let parent = user_session();
    let first = DirectorySession::new(&parent, "ldap", "bind-1");
    let second = DirectorySession::new(&parent, "ldap", "bind-2");

    parent.attach_federated(first.clone())?;
    let replaced = parent.attach_federated(second.clone())?;

    assert!(replaced.is_some());
    assert_eq!(first.close_count(), 1);
    assert_eq!(second.close_count(), 0);

    let active = parent
        .federated_session("ldap")
        .ok_or_else(|| anyhow::anyhow!("ldap session missing"))?;
    let active = active
        .downcast_ref::<DirectorySession>()
        .ok_or_else(|| anyhow::anyhow!("not a directory session"))?;
    assert_eq!(active.bind_token(), Some("bind-2"));
    Ok(())
}

#[test]
fn logout_closes_every_federated_session() -> anyhow::Result<()> {
    init_tracing();
    let parent = user_session();
    let ldap = DirectorySession::new(&parent, "ldap", "bind-1");
    let sso = DirectorySession::new(&parent, "sso", "bind-2");
    parent.attach_federated(ldap.clone())?;
    parent.attach_federated(sso.clone())?;

    parent.close();

    assert_eq!(ldap.close_count(), 1);
    assert_eq!(sso.close_count(), 1);
    assert!(!ldap.is_valid());

    let late = Arc::new(LocalSession::new(&parent, "u1"));
    assert!(matches!(
        parent.attach_federated(late),
        Err(SessionError::Closed(_))
    ));
    Ok(())
}

#[test]
fn missing_constructor_inputs_create_nothing() {
    init_tracing();
    let parent = user_session();
    let mut params = HashMap::new();
    params.insert("token".to_string(), json!("t"));

    let cases = [
        (
            FederatedSessionBase::builder("ldap")
                .space(AuthSpace::application("app"))
                .auth_parameters(&params),
            "parent",
        ),
        (
            FederatedSessionBase::builder("ldap")
                .parent(&parent)
                .auth_parameters(&params),
            "space",
        ),
        (
            FederatedSessionBase::builder("ldap")
                .parent(&parent)
                .space(AuthSpace::application("app")),
            "auth_parameters",
        ),
    ];

    for (builder, missing) in cases {
        let error = builder.build().unwrap_err();
        assert!(error.is_precondition());
        assert_eq!(error, SessionError::MissingInput(missing));
    }
    assert_eq!(parent.federated_count(), 0);
}

#[test]
fn concurrent_readers_see_consistent_principal() {
    init_tracing();
    let parent = ParentSession::builder(AuthSpace::application("app"))
        .principal(Principal::new("u0"))
        .build();
    let sessions: Vec<Arc<dyn FederatedSession>> = (0..4)
        .map(|i| DirectorySession::new(&parent, &format!("p{i}"), "t") as Arc<dyn FederatedSession>)
        .collect();

    let readers: Vec<_> = sessions
        .iter()
        .map(|session| {
            let session = Arc::clone(session);
            thread::spawn(move || {
                for _ in 0..500 {
                    let principal = session.session_principal();
                    assert!(principal.is_some_and(|p| p.user_id.starts_with('u')));
                }
            })
        })
        .collect();

    for i in 1..50 {
        parent.set_principal(Some(Principal::new(format!("u{i}"))));
    }

    for reader in readers {
        assert!(reader.join().is_ok());
    }
    for session in &sessions {
        assert_eq!(session.session_principal(), parent.session_principal());
    }
}
