//! Application configuration for authentication providers.
//!
//! Configuration is loaded from a JSON file and environment variables and is
//! read at runtime through the [`ConfigSource`] trait. Nothing in this module
//! caches derived values; callers re-read on every call so that edits made
//! through [`SharedConfiguration`] are visible immediately.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use parking_lot::RwLock;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::error::{Error, Result};

/// Environment variable naming the JSON configuration file.
pub const ENV_CONFIG_FILE: &str = "AF_CONFIG_FILE";
/// Environment variable overriding the default provider id.
pub const ENV_DEFAULT_AUTH_PROVIDER: &str = "AF_DEFAULT_AUTH_PROVIDER";
/// Environment variable overriding the enabled provider list (comma-separated).
pub const ENV_ENABLED_AUTH_PROVIDERS: &str = "AF_ENABLED_AUTH_PROVIDERS";
/// Environment variable toggling anonymous access.
pub const ENV_ANONYMOUS_ACCESS: &str = "AF_ANONYMOUS_ACCESS";

// ============================================================================
// Provider configuration
// ============================================================================

/// A dynamic, enableable instance of a provider type.
///
/// Several configurations may point at the same provider id, e.g. two
/// external directories served by one provider implementation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthProviderConfig {
    /// Id of the provider this configuration belongs to.
    pub provider: String,

    /// Display name shown instead of the provider label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    /// Description shown instead of the provider description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Icon shown instead of the provider icon.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,

    /// Whether this configuration is switched off.
    #[serde(default)]
    pub disabled: bool,

    /// Provider-specific settings.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub parameters: HashMap<String, Value>,
}

impl AuthProviderConfig {
    /// Creates an enabled configuration for the given provider.
    #[must_use]
    pub fn new(provider: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            display_name: None,
            description: None,
            icon_url: None,
            disabled: false,
            parameters: HashMap::new(),
        }
    }

    /// Creates a new configuration builder.
    #[must_use]
    pub fn builder(provider: impl Into<String>) -> AuthProviderConfigBuilder {
        AuthProviderConfigBuilder::new(provider)
    }

    /// Returns whether the configuration is enabled.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        !self.disabled
    }

    /// Checks that the configuration names a provider.
    ///
    /// ## Errors
    ///
    /// Returns `Error::Config` naming `key` if the provider id is blank.
    pub fn validate(&self, key: &str) -> Result<()> {
        if self.provider.trim().is_empty() {
            return Err(Error::config(format!(
                "provider configuration {key} has no provider id"
            )));
        }
        Ok(())
    }

    /// Gets a parameter by key.
    #[must_use]
    pub fn parameter(&self, key: &str) -> Option<&Value> {
        self.parameters.get(key)
    }

    /// Gets a string parameter by key.
    #[must_use]
    pub fn parameter_str(&self, key: &str) -> Option<&str> {
        self.parameters.get(key).and_then(Value::as_str)
    }
}

/// Builder for [`AuthProviderConfig`].
#[derive(Debug)]
pub struct AuthProviderConfigBuilder {
    config: AuthProviderConfig,
}

impl AuthProviderConfigBuilder {
    /// Creates a new builder for the given provider.
    #[must_use]
    pub fn new(provider: impl Into<String>) -> Self {
        Self {
            config: AuthProviderConfig::new(provider),
        }
    }

    /// Sets the display name.
    #[must_use]
    pub fn display_name(mut self, name: impl Into<String>) -> Self {
        self.config.display_name = Some(name.into());
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.config.description = Some(description.into());
        self
    }

    /// Sets the icon URL.
    #[must_use]
    pub fn icon_url(mut self, icon: impl Into<String>) -> Self {
        self.config.icon_url = Some(icon.into());
        self
    }

    /// Sets the disabled flag.
    #[must_use]
    pub const fn disabled(mut self, disabled: bool) -> Self {
        self.config.disabled = disabled;
        self
    }

    /// Adds a provider-specific parameter.
    #[must_use]
    pub fn parameter(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.config.parameters.insert(key.into(), value.into());
        self
    }

    /// Builds the configuration.
    #[must_use]
    pub fn build(self) -> AuthProviderConfig {
        self.config
    }
}

// ============================================================================
// Ordered configuration map
// ============================================================================

/// Provider configurations keyed by configuration id, in insertion order.
///
/// Re-inserting an existing key replaces the value and keeps its position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProviderConfigurations {
    entries: Vec<(String, AuthProviderConfig)>,
}

impl ProviderConfigurations {
    /// Creates an empty map.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Inserts a configuration, returning the one it replaced.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        config: AuthProviderConfig,
    ) -> Option<AuthProviderConfig> {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => Some(std::mem::replace(existing, config)),
            None => {
                self.entries.push((key, config));
                None
            }
        }
    }

    /// Gets a configuration by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&AuthProviderConfig> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, c)| c)
    }

    /// Gets a mutable configuration by key.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut AuthProviderConfig> {
        self.entries
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, c)| c)
    }

    /// Removes a configuration, keeping the order of the others.
    pub fn remove(&mut self, key: &str) -> Option<AuthProviderConfig> {
        let index = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(index).1)
    }

    /// Checks whether a key is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Iterates over `(key, configuration)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AuthProviderConfig)> {
        self.entries.iter().map(|(k, c)| (k.as_str(), c))
    }

    /// Iterates over the keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Returns the number of configurations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether there are no configurations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the enabled configurations of one provider, in insertion order.
    #[must_use]
    pub fn enabled_for(&self, provider_id: &str) -> Vec<(String, AuthProviderConfig)> {
        self.iter()
            .filter(|(_, c)| c.is_enabled() && c.provider == provider_id)
            .map(|(k, c)| (k.to_string(), c.clone()))
            .collect()
    }
}

impl<K: Into<String>> FromIterator<(K, AuthProviderConfig)> for ProviderConfigurations {
    fn from_iter<I: IntoIterator<Item = (K, AuthProviderConfig)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, config) in iter {
            map.insert(key, config);
        }
        map
    }
}

impl Serialize for ProviderConfigurations {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, config) in &self.entries {
            map.serialize_entry(key, config)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ProviderConfigurations {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct OrderedVisitor;

        impl<'de> Visitor<'de> for OrderedVisitor {
            type Value = ProviderConfigurations;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of provider configurations")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut access: A,
            ) -> std::result::Result<Self::Value, A::Error> {
                let mut map = ProviderConfigurations::new();
                while let Some((key, config)) =
                    access.next_entry::<String, AuthProviderConfig>()?
                {
                    map.insert(key, config);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(OrderedVisitor)
    }
}

// ============================================================================
// Application configuration
// ============================================================================

/// Application-wide authentication settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppConfiguration {
    /// Id of the provider offered first at sign-in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_auth_provider: Option<String>,

    /// Providers users may sign in with. `None` enables every provider.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled_auth_providers: Option<Vec<String>>,

    /// Whether unauthenticated users may use the application.
    pub anonymous_access_enabled: bool,

    /// Registered provider configurations.
    pub auth_provider_configurations: ProviderConfigurations,
}

impl AppConfiguration {
    /// Parses configuration from a JSON string.
    ///
    /// ## Errors
    ///
    /// Returns an error if the JSON is malformed.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that every provider configuration names a provider.
    ///
    /// ## Errors
    ///
    /// Returns `Error::Config` for the first configuration with a blank provider id.
    pub fn validate(&self) -> Result<()> {
        self.auth_provider_configurations
            .iter()
            .try_for_each(|(key, config)| config.validate(key))
    }

    /// Loads configuration from a JSON file.
    ///
    /// ## Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&content)?;
        tracing::info!(
            path = %path.display(),
            configurations = config.auth_provider_configurations.len(),
            "Loaded authentication configuration"
        );
        Ok(config)
    }

    /// Loads configuration from the environment.
    ///
    /// Reads `.env` if present, then the file named by `AF_CONFIG_FILE`
    /// (defaults otherwise), then applies variable overrides.
    ///
    /// ## Errors
    ///
    /// Returns an error if the configuration file cannot be loaded.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();

        let mut config = match std::env::var(ENV_CONFIG_FILE) {
            Ok(path) => Self::from_file(path)?,
            Err(_) => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Applies overrides looked up by variable name.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(provider) = lookup(ENV_DEFAULT_AUTH_PROVIDER) {
            tracing::debug!(provider = %provider, "Default auth provider overridden");
            self.default_auth_provider = Some(provider);
        }

        if let Some(list) = lookup(ENV_ENABLED_AUTH_PROVIDERS) {
            self.enabled_auth_providers = Some(
                list.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect(),
            );
        }

        if let Some(flag) = lookup(ENV_ANONYMOUS_ACCESS) {
            match flag.trim().to_lowercase().parse::<bool>() {
                Ok(enabled) => self.anonymous_access_enabled = enabled,
                Err(_) => tracing::warn!(
                    value = %flag,
                    "Ignoring {ENV_ANONYMOUS_ACCESS}: expected true or false"
                ),
            }
        }
    }

    /// Returns the default provider id, treating blank values as unset.
    ///
    /// Non-blank values are returned verbatim and compared exactly.
    #[must_use]
    pub fn default_provider(&self) -> Option<&str> {
        self.default_auth_provider
            .as_deref()
            .filter(|s| !s.trim().is_empty())
    }

    /// Returns whether users may sign in with the given provider.
    #[must_use]
    pub fn is_provider_enabled(&self, provider_id: &str) -> bool {
        self.enabled_auth_providers
            .as_ref()
            .map_or(true, |ids| ids.iter().any(|id| id == provider_id))
    }
}

// ============================================================================
// Config source
// ============================================================================

/// Read access to the current authentication configuration.
///
/// Implementations must return live values; callers do not cache.
pub trait ConfigSource: Send + Sync {
    /// Returns the default provider id, `None` when unset or blank.
    fn default_auth_provider(&self) -> Option<String>;

    /// Returns all registered provider configurations in insertion order.
    fn auth_provider_configurations(&self) -> ProviderConfigurations;

    /// Returns the enabled provider list, `None` when every provider is enabled.
    fn enabled_auth_providers(&self) -> Option<Vec<String>>;

    /// Returns whether unauthenticated users may use the application.
    fn anonymous_access_enabled(&self) -> bool;

    /// Returns whether users may sign in with the given provider.
    fn is_provider_enabled(&self, provider_id: &str) -> bool {
        self.enabled_auth_providers()
            .map_or(true, |ids| ids.iter().any(|id| id == provider_id))
    }
}

impl ConfigSource for AppConfiguration {
    fn default_auth_provider(&self) -> Option<String> {
        self.default_provider().map(String::from)
    }

    fn auth_provider_configurations(&self) -> ProviderConfigurations {
        self.auth_provider_configurations.clone()
    }

    fn enabled_auth_providers(&self) -> Option<Vec<String>> {
        self.enabled_auth_providers.clone()
    }

    fn anonymous_access_enabled(&self) -> bool {
        self.anonymous_access_enabled
    }
}

impl<T: ConfigSource + ?Sized> ConfigSource for std::sync::Arc<T> {
    fn default_auth_provider(&self) -> Option<String> {
        (**self).default_auth_provider()
    }

    fn auth_provider_configurations(&self) -> ProviderConfigurations {
        (**self).auth_provider_configurations()
    }

    fn enabled_auth_providers(&self) -> Option<Vec<String>> {
        (**self).enabled_auth_providers()
    }

    fn anonymous_access_enabled(&self) -> bool {
        (**self).anonymous_access_enabled()
    }
}

/// Runtime-editable configuration shared across request handlers.
#[derive(Debug, Default)]
pub struct SharedConfiguration {
    inner: RwLock<AppConfiguration>,
}

impl SharedConfiguration {
    /// Wraps a loaded configuration.
    #[must_use]
    pub fn new(config: AppConfiguration) -> Self {
        Self {
            inner: RwLock::new(config),
        }
    }

    /// Returns a copy of the current configuration.
    #[must_use]
    pub fn snapshot(&self) -> AppConfiguration {
        self.inner.read().clone()
    }

    /// Replaces the whole configuration.
    ///
    /// ## Errors
    ///
    /// Returns `Error::Config` if any configuration has a blank provider id;
    /// the current configuration is kept.
    pub fn replace(&self, config: AppConfiguration) -> Result<()> {
        config.validate()?;
        *self.inner.write() = config;
        tracing::info!("Authentication configuration replaced");
        Ok(())
    }

    /// Sets or clears the default provider.
    pub fn set_default_auth_provider(&self, provider: Option<impl Into<String>>) {
        let provider = provider.map(Into::into);
        tracing::debug!(provider = ?provider, "Default auth provider changed");
        self.inner.write().default_auth_provider = provider;
    }

    /// Sets the enabled provider list; `None` enables every provider.
    pub fn set_enabled_auth_providers(&self, providers: Option<Vec<String>>) {
        self.inner.write().enabled_auth_providers = providers;
    }

    /// Adds or replaces a provider configuration, returning the one it replaced.
    ///
    /// ## Errors
    ///
    /// Returns `Error::Config` if the configuration has a blank provider id.
    pub fn upsert_provider_configuration(
        &self,
        key: impl Into<String>,
        config: AuthProviderConfig,
    ) -> Result<Option<AuthProviderConfig>> {
        let key = key.into();
        config.validate(&key)?;
        tracing::debug!(key = %key, provider = %config.provider, "Provider configuration saved");
        Ok(self
            .inner
            .write()
            .auth_provider_configurations
            .insert(key, config))
    }

    /// Removes a provider configuration.
    pub fn remove_provider_configuration(&self, key: &str) -> Option<AuthProviderConfig> {
        self.inner.write().auth_provider_configurations.remove(key)
    }

    /// Switches a configuration on or off. Returns `false` if the key is unknown.
    pub fn set_configuration_disabled(&self, key: &str, disabled: bool) -> bool {
        let mut inner = self.inner.write();
        match inner.auth_provider_configurations.get_mut(key) {
            Some(config) => {
                config.disabled = disabled;
                true
            }
            None => {
                tracing::warn!(key = %key, "Unknown provider configuration");
                false
            }
        }
    }
}

impl ConfigSource for SharedConfiguration {
    fn default_auth_provider(&self) -> Option<String> {
        self.inner.read().default_provider().map(String::from)
    }

    fn auth_provider_configurations(&self) -> ProviderConfigurations {
        self.inner.read().auth_provider_configurations.clone()
    }

    fn enabled_auth_providers(&self) -> Option<Vec<String>> {
        self.inner.read().enabled_auth_providers.clone()
    }

    fn anonymous_access_enabled(&self) -> bool {
        self.inner.read().anonymous_access_enabled
    }
}

impl From<AppConfiguration> for SharedConfiguration {
    fn from(config: AppConfiguration) -> Self {
        Self::new(config)
    }
}
