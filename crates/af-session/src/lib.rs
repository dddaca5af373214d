//! # af-session
//!
//! Session management for authfed.
//!
//! A user holds one [`ParentSession`]. Each identity provider the user has
//! authenticated against contributes one federated session attached to that
//! parent. Request handlers only see the [`Session`] contract and never need
//! to know which provider produced a session.
//!
//! ## Design
//!
//! - [`Session`] - Capability set shared by every session
//! - [`FederatedSession`] - Per-provider sessions that delegate to a parent
//! - [`FederatedSessionBase`] - Generic federated session carrying auth parameters
//! - [`LocalSession`] - Session for the built-in credential store
//!
//! Federated sessions keep a weak back-reference to their parent and read the
//! principal and singleton project through it on every call, so they never
//! diverge from the parent.

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod contract;
pub mod error;
pub mod federated;
pub mod local;
pub mod model;
pub mod params;
pub mod parent;

pub use contract::{FederatedSession, Session};
pub use error::{SessionError, SessionResult};
pub use federated::{FederatedSessionBase, FederatedSessionBuilder};
pub use local::{LocalSession, LOCAL_PROVIDER_ID};
pub use model::{AuthSpace, Principal, ProjectRef};
pub use params::AuthParameters;
pub use parent::{ParentSession, ParentSessionBuilder};
