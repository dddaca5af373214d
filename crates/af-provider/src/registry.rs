//! Registry of provider descriptors.

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::descriptor::ProviderDescriptor;
use crate::error::{ProviderError, ProviderResult};

/// Supplies provider descriptors to the catalog.
pub trait DescriptorSource: Send + Sync {
    /// Returns every descriptor, ordered by id.
    fn descriptors(&self) -> Vec<Arc<ProviderDescriptor>>;

    /// Gets a descriptor by provider id.
    fn descriptor(&self, id: &str) -> Option<Arc<ProviderDescriptor>>;
}

/// Registry for provider descriptors.
///
/// Descriptors are registered once at startup by whatever discovers
/// providers and are read concurrently afterwards.
#[derive(Debug, Default)]
pub struct DescriptorRegistry {
    descriptors: DashMap<String, Arc<ProviderDescriptor>>,
}

impl DescriptorRegistry {
    /// Creates a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a descriptor.
    ///
    /// ## Errors
    ///
    /// Returns `ProviderError::InvalidDescriptor` if the id is blank, or
    /// `ProviderError::DuplicateProvider` if the id is taken.
    pub fn register(&self, descriptor: ProviderDescriptor) -> ProviderResult<Arc<ProviderDescriptor>> {
        if descriptor.id().trim().is_empty() {
            return Err(ProviderError::invalid("provider id is blank"));
        }
        let descriptor = Arc::new(descriptor);
        match self.descriptors.entry(descriptor.id().to_string()) {
            Entry::Occupied(entry) => Err(ProviderError::DuplicateProvider(entry.key().clone())),
            Entry::Vacant(entry) => {
                tracing::debug!(provider = %descriptor.id(), "Auth provider registered");
                entry.insert(Arc::clone(&descriptor));
                Ok(descriptor)
            }
        }
    }

    /// Parses and registers a JSON descriptor.
    ///
    /// ## Errors
    ///
    /// Returns `ProviderError::InvalidDescriptor` if the JSON does not describe
    /// a provider, or `ProviderError::DuplicateProvider` if the id is taken.
    pub fn register_json(&self, json: &str) -> ProviderResult<Arc<ProviderDescriptor>> {
        let descriptor: ProviderDescriptor =
            serde_json::from_str(json).map_err(|e| ProviderError::invalid(e.to_string()))?;
        self.register(descriptor)
    }

    /// Removes a descriptor.
    pub fn unregister(&self, id: &str) -> Option<Arc<ProviderDescriptor>> {
        self.descriptors.remove(id).map(|(_, descriptor)| descriptor)
    }

    /// Checks if a provider is registered.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.descriptors.contains_key(id)
    }

    /// Returns all registered provider ids, sorted.
    #[must_use]
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<_> = self.descriptors.iter().map(|e| e.key().clone()).collect();
        ids.sort();
        ids
    }

    /// Returns the number of registered providers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Returns whether no provider is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Validates that required providers are registered.
    ///
    /// ## Errors
    ///
    /// Returns `ProviderError::ProviderNotFound` for the first missing id.
    pub fn validate_required(&self, ids: &[&str]) -> ProviderResult<()> {
        match ids.iter().find(|id| !self.contains(id)) {
            Some(id) => Err(ProviderError::ProviderNotFound((*id).to_string())),
            None => Ok(()),
        }
    }
}

impl DescriptorSource for DescriptorRegistry {
    fn descriptors(&self) -> Vec<Arc<ProviderDescriptor>> {
        let mut descriptors: Vec<_> = self
            .descriptors
            .iter()
            .map(|e| Arc::clone(e.value()))
            .collect();
        descriptors.sort_by(|a, b| a.id().cmp(b.id()));
        descriptors
    }

    fn descriptor(&self, id: &str) -> Option<Arc<ProviderDescriptor>> {
        self.descriptors.get(id).map(|e| Arc::clone(e.value()))
    }
}
