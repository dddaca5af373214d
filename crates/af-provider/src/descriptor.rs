//! Static provider metadata.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Value type of a credential property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    /// Free text.
    #[default]
    String,
    /// Secret text, never echoed back.
    Password,
    /// Yes/no flag.
    Boolean,
    /// Whole number.
    Integer,
}

/// Describes one credential input a provider asks for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDescriptor {
    /// Property identifier.
    pub id: String,
    /// Label shown next to the input.
    pub display_name: String,
    /// Help text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Value type.
    #[serde(default)]
    pub property_type: PropertyType,
    /// Whether a value must be supplied.
    #[serde(default)]
    pub required: bool,
    /// Whether the user enters this value (as opposed to an administrator).
    #[serde(default)]
    pub user: bool,
}

impl PropertyDescriptor {
    /// Creates an optional text property.
    #[must_use]
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            description: None,
            property_type: PropertyType::String,
            required: false,
            user: false,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the value type.
    #[must_use]
    pub const fn with_type(mut self, property_type: PropertyType) -> Self {
        self.property_type = property_type;
        self
    }

    /// Marks the property as required.
    #[must_use]
    pub const fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Marks the property as user-supplied.
    #[must_use]
    pub const fn user(mut self, user: bool) -> Self {
        self.user = user;
        self
    }
}

/// A named set of credentials a provider accepts, e.g. "password" or "token".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialProfile {
    /// Profile identifier.
    pub id: String,
    /// Profile label.
    pub label: String,
    /// Profile description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Inputs the profile requires.
    #[serde(default)]
    pub credential_parameters: Vec<PropertyDescriptor>,
}

impl CredentialProfile {
    /// Creates a profile with no parameters.
    #[must_use]
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            description: None,
            credential_parameters: Vec::new(),
        }
    }

    /// Adds a parameter.
    #[must_use]
    pub fn with_parameter(mut self, parameter: PropertyDescriptor) -> Self {
        self.credential_parameters.push(parameter);
        self
    }
}

/// Static, registry-sourced metadata about an authentication provider type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderDescriptor {
    id: String,
    label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default)]
    configurable: bool,
    #[serde(default)]
    credential_profiles: Vec<CredentialProfile>,
    #[serde(default)]
    credential_parameters: Vec<PropertyDescriptor>,
}

impl ProviderDescriptor {
    /// Creates a new descriptor builder.
    #[must_use]
    pub fn builder(id: impl Into<String>, label: impl Into<String>) -> ProviderDescriptorBuilder {
        ProviderDescriptorBuilder::new(id, label)
    }

    /// Returns the provider id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the provider label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns the raw icon reference.
    #[must_use]
    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }

    /// Returns the provider description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns whether administrators can create configurations of this provider.
    #[must_use]
    pub const fn is_configurable(&self) -> bool {
        self.configurable
    }

    /// Returns the credential profiles in declaration order.
    #[must_use]
    pub fn credential_profiles(&self) -> &[CredentialProfile] {
        &self.credential_profiles
    }

    /// Gets a credential profile by id.
    #[must_use]
    pub fn credential_profile(&self, id: &str) -> Option<&CredentialProfile> {
        self.credential_profiles.iter().find(|p| p.id == id)
    }

    /// Returns the legacy credential parameters not named in `exclude`.
    #[must_use]
    pub fn credential_parameters(&self, exclude: &HashSet<String>) -> Vec<PropertyDescriptor> {
        self.credential_parameters
            .iter()
            .filter(|p| !exclude.contains(&p.id))
            .cloned()
            .collect()
    }
}

/// Builder for [`ProviderDescriptor`].
#[derive(Debug)]
pub struct ProviderDescriptorBuilder {
    descriptor: ProviderDescriptor,
}

impl ProviderDescriptorBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            descriptor: ProviderDescriptor {
                id: id.into(),
                label: label.into(),
                icon: None,
                description: None,
                configurable: false,
                credential_profiles: Vec::new(),
                credential_parameters: Vec::new(),
            },
        }
    }

    /// Sets the raw icon reference.
    #[must_use]
    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.descriptor.icon = Some(icon.into());
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.descriptor.description = Some(description.into());
        self
    }

    /// Sets the configurable flag.
    #[must_use]
    pub const fn configurable(mut self, configurable: bool) -> Self {
        self.descriptor.configurable = configurable;
        self
    }

    /// Adds a credential profile.
    #[must_use]
    pub fn credential_profile(mut self, profile: CredentialProfile) -> Self {
        self.descriptor.credential_profiles.push(profile);
        self
    }

    /// Adds a legacy credential parameter.
    #[must_use]
    pub fn credential_parameter(mut self, parameter: PropertyDescriptor) -> Self {
        self.descriptor.credential_parameters.push(parameter);
        self
    }

    /// Builds the descriptor.
    #[must_use]
    pub fn build(self) -> ProviderDescriptor {
        self.descriptor
    }
}
