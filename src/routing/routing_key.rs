use crate::message::AnyMessage;

/// Computes the broker routing key for a message.
pub trait RoutingKeyResolver: Send + Sync {
    fn resolve_routing_key_for(&self, message: &dyn AnyMessage) -> String;
}

/// Always routes with an empty key (direct-to-queue publishing).
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyRoutingKeyResolver;

impl RoutingKeyResolver for EmptyRoutingKeyResolver {
    fn resolve_routing_key_for(&self, _message: &dyn AnyMessage) -> String {
        String::new()
    }
}

/// Routes with the message name, `::` path separators turned into dots.
///
/// Suited to topic exchanges: `billing::InvoicePaid` becomes `billing.InvoicePaid`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MessageNameRoutingKeyResolver;

impl RoutingKeyResolver for MessageNameRoutingKeyResolver {
    fn resolve_routing_key_for(&self, message: &dyn AnyMessage) -> String {
        message.message_name().replace("::", ".")
    }
}
