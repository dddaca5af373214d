//! Provider catalog entries.
//!
//! A [`ProviderCatalogEntry`] is a read-only view joining one descriptor
//! with the enabled configurations that point at it. Entries hold no derived
//! state: the default-provider flag and the configuration list are read from
//! the [`ConfigSource`] on every call.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use af_core::{AuthProviderConfig, ConfigSource};
use serde::Serialize;
use serde_json::Value;

use crate::descriptor::{CredentialProfile, PropertyDescriptor, ProviderDescriptor};
use crate::icon::{DefaultIconResolver, IconResolver};
use crate::registry::DescriptorSource;

// ============================================================================
// Configuration view
// ============================================================================

/// One enabled configuration of a provider, as presented at sign-in.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderConfigurationInfo {
    /// Configuration key.
    pub id: String,
    /// Provider the configuration belongs to.
    pub provider_id: String,
    /// Configured display name, else the provider label.
    pub display_name: String,
    /// Configured description, else the provider description.
    pub description: Option<String>,
    /// Configured icon URL, else the resolved provider icon.
    pub icon: Option<String>,
    /// Provider-specific settings.
    pub parameters: HashMap<String, Value>,
}

impl ProviderConfigurationInfo {
    /// Builds the view of `config` stored under `id`.
    #[must_use]
    pub fn new(
        descriptor: &ProviderDescriptor,
        id: impl Into<String>,
        config: &AuthProviderConfig,
        icons: &dyn IconResolver,
    ) -> Self {
        Self {
            id: id.into(),
            provider_id: config.provider.clone(),
            display_name: config
                .display_name
                .clone()
                .unwrap_or_else(|| descriptor.label().to_string()),
            description: config
                .description
                .clone()
                .or_else(|| descriptor.description().map(String::from)),
            icon: config
                .icon_url
                .clone()
                .or_else(|| descriptor.icon().map(|icon| icons.resolve(icon))),
            parameters: config.parameters.clone(),
        }
    }
}

// ============================================================================
// Catalog entry
// ============================================================================

/// Read-only facade over one provider descriptor and its live configuration.
#[derive(Clone)]
pub struct ProviderCatalogEntry {
    descriptor: Arc<ProviderDescriptor>,
    config: Arc<dyn ConfigSource>,
    icons: Arc<dyn IconResolver>,
}

impl ProviderCatalogEntry {
    /// Creates an entry for `descriptor` reading configuration from `config`.
    #[must_use]
    pub fn new(
        descriptor: Arc<ProviderDescriptor>,
        config: Arc<dyn ConfigSource>,
        icons: Arc<dyn IconResolver>,
    ) -> Self {
        Self {
            descriptor,
            config,
            icons,
        }
    }

    /// Returns the underlying descriptor.
    #[must_use]
    pub fn descriptor(&self) -> &ProviderDescriptor {
        &self.descriptor
    }

    /// Returns the provider id.
    #[must_use]
    pub fn id(&self) -> &str {
        self.descriptor.id()
    }

    /// Returns the provider label.
    #[must_use]
    pub fn label(&self) -> &str {
        self.descriptor.label()
    }

    /// Returns the provider description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.descriptor.description()
    }

    /// Returns the resolved icon identifier.
    #[must_use]
    pub fn icon(&self) -> Option<String> {
        self.descriptor.icon().map(|icon| self.icons.resolve(icon))
    }

    /// Returns whether this provider is the configured default.
    ///
    /// Evaluated against the live configuration on every call. An unset
    /// default means no provider is the default.
    #[must_use]
    pub fn is_default_provider(&self) -> bool {
        self.config
            .default_auth_provider()
            .is_some_and(|id| id == self.id())
    }

    /// Returns whether administrators can create configurations of this provider.
    #[must_use]
    pub fn is_configurable(&self) -> bool {
        self.descriptor.is_configurable()
    }

    /// Returns the enabled configurations of this provider in store order.
    #[must_use]
    pub fn configurations(&self) -> Vec<ProviderConfigurationInfo> {
        self.config
            .auth_provider_configurations()
            .enabled_for(self.id())
            .into_iter()
            .map(|(key, config)| {
                ProviderConfigurationInfo::new(&self.descriptor, key, &config, self.icons.as_ref())
            })
            .collect()
    }

    /// Returns the credential profiles in declaration order.
    #[must_use]
    pub fn credential_profiles(&self) -> &[CredentialProfile] {
        self.descriptor.credential_profiles()
    }

    /// Returns the legacy credential parameters.
    #[deprecated(note = "use credential_profiles")]
    #[must_use]
    pub fn credential_parameters(&self) -> Vec<PropertyDescriptor> {
        self.descriptor.credential_parameters(&HashSet::new())
    }
}

impl fmt::Debug for ProviderCatalogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderCatalogEntry")
            .field("id", &self.id())
            .field("label", &self.label())
            .finish_non_exhaustive()
    }
}

impl fmt::Display for ProviderCatalogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// Catalog
// ============================================================================

/// Lists the providers users may currently sign in with.
#[derive(Clone)]
pub struct ProviderCatalog {
    descriptors: Arc<dyn DescriptorSource>,
    config: Arc<dyn ConfigSource>,
    icons: Arc<dyn IconResolver>,
}

impl ProviderCatalog {
    /// Creates a catalog over the given collaborators.
    #[must_use]
    pub fn new(
        descriptors: Arc<dyn DescriptorSource>,
        config: Arc<dyn ConfigSource>,
        icons: Arc<dyn IconResolver>,
    ) -> Self {
        Self {
            descriptors,
            config,
            icons,
        }
    }

    /// Creates a catalog that uses [`DefaultIconResolver`].
    #[must_use]
    pub fn with_default_icons(
        descriptors: Arc<dyn DescriptorSource>,
        config: Arc<dyn ConfigSource>,
    ) -> Self {
        Self::new(descriptors, config, Arc::new(DefaultIconResolver))
    }

    fn make_entry(&self, descriptor: Arc<ProviderDescriptor>) -> ProviderCatalogEntry {
        ProviderCatalogEntry::new(descriptor, Arc::clone(&self.config), Arc::clone(&self.icons))
    }

    /// Returns entries for enabled providers, ordered by id.
    #[must_use]
    pub fn entries(&self) -> Vec<ProviderCatalogEntry> {
        self.descriptors
            .descriptors()
            .into_iter()
            .filter(|d| self.config.is_provider_enabled(d.id()))
            .map(|d| self.make_entry(d))
            .collect()
    }

    /// Returns entries for every registered provider, ordered by id.
    #[must_use]
    pub fn all_entries(&self) -> Vec<ProviderCatalogEntry> {
        self.descriptors
            .descriptors()
            .into_iter()
            .map(|d| self.make_entry(d))
            .collect()
    }

    /// Gets the entry for a registered provider, enabled or not.
    #[must_use]
    pub fn entry(&self, id: &str) -> Option<ProviderCatalogEntry> {
        self.descriptors.descriptor(id).map(|d| self.make_entry(d))
    }

    /// Returns whether users may proceed without choosing a provider.
    #[must_use]
    pub fn allows_anonymous_access(&self) -> bool {
        self.config.anonymous_access_enabled()
    }

    /// Returns the entry for the configured default provider.
    ///
    /// `None` when no default is set, or it is unknown or disabled.
    #[must_use]
    pub fn default_entry(&self) -> Option<ProviderCatalogEntry> {
        let id = self.config.default_auth_provider()?;
        if !self.config.is_provider_enabled(&id) {
            tracing::warn!(provider = %id, "Default auth provider is not enabled");
            return None;
        }
        self.entry(&id)
    }
}

impl fmt::Debug for ProviderCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderCatalog").finish_non_exhaustive()
    }
}
