//! Additional transport properties, resolved per message just before publish.
//!
//! Each [`AdditionalPropertiesResolver`] contributes a [`PropertyMap`] for
//! the messages it supports. The [`DelegatingAdditionalPropertiesResolver`]
//! runs every registered resolver in registration order and merges their
//! output, later resolvers overwriting earlier ones on key collisions.
//!
//! ## Example
//!
//! ```
//! use bus_bridge::properties::{
//!     DelegatingAdditionalPropertiesResolver, MessagePropertiesResolver, StaticPropertiesResolver,
//! };
//! # use bus_bridge::message::Message;
//! # use serde::{Deserialize, Serialize};
//! # #[derive(Serialize, Deserialize)] struct AsynchronousCommand;
//! # impl Message for AsynchronousCommand { const NAME: &'static str = "AsynchronousCommand"; }
//!
//! let resolver = DelegatingAdditionalPropertiesResolver::new()
//!     .with(StaticPropertiesResolver::new().property("content_type", "application/json"))
//!     .with(
//!         MessagePropertiesResolver::new()
//!             .message::<AsynchronousCommand>()
//!             .property("debug", "string"),
//!     );
//!
//! let properties = resolver
//!     .resolve_additional_properties_for(&AsynchronousCommand)
//!     .unwrap();
//! assert_eq!(properties.len(), 2);
//! ```

mod delegating;
mod error;
mod resolver;
mod value;

pub use delegating::DelegatingAdditionalPropertiesResolver;
pub use error::ResolutionError;
pub use resolver::{
    AdditionalPropertiesResolver, FnPropertiesResolver, MessagePropertiesResolver,
    StaticPropertiesResolver,
};
pub use value::{PropertyMap, PropertyValue};
