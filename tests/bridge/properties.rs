use bus_bridge::properties::{
    DelegatingAdditionalPropertiesResolver, PropertyMap, PropertyValue, StaticPropertiesResolver,
};

use crate::messages::{AsynchronousCommand, Event};
use crate::support::properties_resolver;

#[test]
fn resolves_properties() {
    let resolved = properties_resolver()
        .resolve_additional_properties_for(&AsynchronousCommand::default())
        .unwrap();

    let mut expected = PropertyMap::new();
    expected.insert("debug".into(), PropertyValue::from("string"));
    assert_eq!(resolved, expected);
}

#[test]
fn messages_without_configured_properties_resolve_empty() {
    let resolved = properties_resolver()
        .resolve_additional_properties_for(&Event::default())
        .unwrap();

    assert!(resolved.is_empty());
}

#[test]
fn later_resolvers_override_earlier_ones() {
    let resolver = properties_resolver()
        .with(StaticPropertiesResolver::new().property("debug", "override"))
        .with(StaticPropertiesResolver::new().property("priority", 5));

    let resolved = resolver
        .resolve_additional_properties_for(&AsynchronousCommand::default())
        .unwrap();

    assert_eq!(resolved["debug"], PropertyValue::from("override"));
    assert_eq!(resolved["priority"].as_i64(), Some(5));
}

#[test]
fn empty_resolver_set_resolves_nothing() {
    let resolved = DelegatingAdditionalPropertiesResolver::new()
        .resolve_additional_properties_for(&AsynchronousCommand::default())
        .unwrap();

    assert_eq!(resolved, PropertyMap::new());
}
