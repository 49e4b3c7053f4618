use super::{AdditionalPropertiesResolver, PropertyMap, ResolutionError};
use crate::message::AnyMessage;

/// Runs every registered resolver that supports a message and merges the results.
///
/// Resolvers run in registration order; on key collisions the later
/// resolver wins. With no supporting resolver the result is an empty map.
/// The first resolver error aborts resolution.
#[derive(Default)]
pub struct DelegatingAdditionalPropertiesResolver {
    resolvers: Vec<Box<dyn AdditionalPropertiesResolver>>,
}

impl DelegatingAdditionalPropertiesResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_resolvers(resolvers: Vec<Box<dyn AdditionalPropertiesResolver>>) -> Self {
        Self { resolvers }
    }

    /// Register a resolver after all previously registered ones.
    pub fn with<R: AdditionalPropertiesResolver + 'static>(mut self, resolver: R) -> Self {
        self.push(resolver);
        self
    }

    pub fn push<R: AdditionalPropertiesResolver + 'static>(&mut self, resolver: R) {
        self.resolvers.push(Box::new(resolver));
    }

    pub fn len(&self) -> usize {
        self.resolvers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolvers.is_empty()
    }

    pub fn resolve_additional_properties_for(
        &self,
        message: &dyn AnyMessage,
    ) -> Result<PropertyMap, ResolutionError> {
        let mut merged = PropertyMap::new();
        for resolver in self.resolvers.iter().filter(|r| r.supports(message)) {
            merged.extend(resolver.resolve(message)?);
        }
        Ok(merged)
    }
}

impl AdditionalPropertiesResolver for DelegatingAdditionalPropertiesResolver {
    fn resolve(&self, message: &dyn AnyMessage) -> Result<PropertyMap, ResolutionError> {
        self.resolve_additional_properties_for(message)
    }
}
