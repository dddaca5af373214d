//! # af-core
//!
//! Core configuration and error handling for authfed.
//!
//! This crate owns the application-wide authentication settings that the
//! session and provider crates read: the default provider, the enabled
//! provider list and the registered provider configurations.
//!
//! Consumers never reach for a global. They receive a [`ConfigSource`]
//! (usually a [`SharedConfiguration`]) and read through it on every call.

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod config;
pub mod error;

pub use config::{
    AppConfiguration, AuthProviderConfig, AuthProviderConfigBuilder, ConfigSource,
    ProviderConfigurations, SharedConfiguration,
};
pub use error::{Error, Result};
