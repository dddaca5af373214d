//! # af-provider
//!
//! Authentication provider catalog for authfed.
//!
//! Provider descriptors are static metadata registered once at startup.
//! Provider configurations are dynamic and live in the application
//! configuration. The catalog joins the two at presentation time:
//!
//! - [`DescriptorRegistry`] - Registered provider descriptors
//! - [`ProviderCatalogEntry`] - One descriptor plus its enabled configurations
//! - [`ProviderCatalog`] - Entries for every provider users may sign in with
//!
//! Entries read configuration on every call and cache nothing, so a change
//! to the default provider or to a configuration is visible immediately.

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod catalog;
pub mod descriptor;
pub mod error;
pub mod icon;
pub mod registry;

pub use catalog::{ProviderCatalog, ProviderCatalogEntry, ProviderConfigurationInfo};
pub use descriptor::{
    CredentialProfile, PropertyDescriptor, PropertyType, ProviderDescriptor,
    ProviderDescriptorBuilder,
};
pub use error::{ProviderError, ProviderResult};
pub use icon::{DefaultIconResolver, IconResolver};
pub use registry::{DescriptorRegistry, DescriptorSource};
