use std::collections::BTreeSet;

use super::{PropertyMap, PropertyValue, ResolutionError};
use crate::message::{AnyMessage, Message};

/// Computes extra transport properties for a message.
///
/// `resolve` is only called when `supports` returns `true` for the same
/// message. Implementations should be pure functions of the message and
/// their own configuration.
pub trait AdditionalPropertiesResolver: Send + Sync {
    fn supports(&self, _message: &dyn AnyMessage) -> bool {
        true
    }

    fn resolve(&self, message: &dyn AnyMessage) -> Result<PropertyMap, ResolutionError>;
}

impl<R: AdditionalPropertiesResolver + ?Sized> AdditionalPropertiesResolver for Box<R> {
    fn supports(&self, message: &dyn AnyMessage) -> bool {
        (**self).supports(message)
    }

    fn resolve(&self, message: &dyn AnyMessage) -> Result<PropertyMap, ResolutionError> {
        (**self).resolve(message)
    }
}

/// Applies the same fixed properties to every message.
///
/// Typically used for broker-level defaults such as `content_type` or
/// `delivery_mode`.
#[derive(Debug, Clone, Default)]
pub struct StaticPropertiesResolver {
    properties: PropertyMap,
}

impl StaticPropertiesResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(properties: PropertyMap) -> Self {
        Self { properties }
    }

    pub fn property(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }
}

impl AdditionalPropertiesResolver for StaticPropertiesResolver {
    fn resolve(&self, _message: &dyn AnyMessage) -> Result<PropertyMap, ResolutionError> {
        Ok(self.properties.clone())
    }
}

/// Applies fixed properties to an explicit set of message types.
#[derive(Debug, Clone, Default)]
pub struct MessagePropertiesResolver {
    messages: BTreeSet<&'static str>,
    properties: PropertyMap,
}

impl MessagePropertiesResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply the properties to messages of type `M`.
    pub fn message<M: Message>(self) -> Self {
        self.message_named(M::NAME)
    }

    /// Apply the properties to messages whose `NAME` is `name`.
    pub fn message_named(mut self, name: &'static str) -> Self {
        self.messages.insert(name);
        self
    }

    pub fn property(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }
}

impl AdditionalPropertiesResolver for MessagePropertiesResolver {
    fn supports(&self, message: &dyn AnyMessage) -> bool {
        self.messages.contains(message.message_name())
    }

    fn resolve(&self, _message: &dyn AnyMessage) -> Result<PropertyMap, ResolutionError> {
        Ok(self.properties.clone())
    }
}

/// Closure-backed resolver, for properties computed from message contents.
///
/// ```
/// use bus_bridge::properties::{AdditionalPropertiesResolver, FnPropertiesResolver, PropertyMap};
/// # use bus_bridge::message::Message;
/// # use serde::{Deserialize, Serialize};
/// # #[derive(Serialize, Deserialize)] struct Invoice { tenant: String }
/// # impl Message for Invoice { const NAME: &'static str = "Invoice"; }
///
/// let resolver = FnPropertiesResolver::new(|message| {
///     let mut properties = PropertyMap::new();
///     if let Some(invoice) = message.downcast_ref::<Invoice>() {
///         properties.insert("tenant".into(), invoice.tenant.clone().into());
///     }
///     Ok(properties)
/// })
/// .only::<Invoice>();
///
/// let invoice = Invoice { tenant: "acme".into() };
/// assert!(resolver.supports(&invoice));
/// ```
pub struct FnPropertiesResolver<F> {
    only: Option<BTreeSet<&'static str>>,
    resolve: F,
}

impl<F> FnPropertiesResolver<F>
where
    F: Fn(&dyn AnyMessage) -> Result<PropertyMap, ResolutionError> + Send + Sync,
{
    /// Resolver that supports every message.
    pub fn new(resolve: F) -> Self {
        Self {
            only: None,
            resolve,
        }
    }

    /// Restrict the resolver to `M` (may be called more than once).
    pub fn only<M: Message>(mut self) -> Self {
        self.only.get_or_insert_with(BTreeSet::new).insert(M::NAME);
        self
    }
}

impl<F> AdditionalPropertiesResolver for FnPropertiesResolver<F>
where
    F: Fn(&dyn AnyMessage) -> Result<PropertyMap, ResolutionError> + Send + Sync,
{
    fn supports(&self, message: &dyn AnyMessage) -> bool {
        match &self.only {
            Some(names) => names.contains(message.message_name()),
            None => true,
        }
    }

    fn resolve(&self, message: &dyn AnyMessage) -> Result<PropertyMap, ResolutionError> {
        (self.resolve)(message)
    }
}
