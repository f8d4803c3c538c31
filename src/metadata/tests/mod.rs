//! Unit tests for the metadata model
//!
//! No filesystem dependencies - all in-memory.

#![allow(clippy::panic)]

use crate::metadata::{
    ComponentDescriptor, Condition, ConfigurationProperty, Operator, Predicate, PropertyNode,
};

#[test]
fn predicate_drops_repeated_values() {
    let predicate = Predicate::one_of("type", ["mysql", "oracle", "mysql"]);

    assert_eq!(predicate.values(), ["mysql".to_string(), "oracle".to_string()]);
    assert_eq!(predicate.operator(), Operator::OneOf);
}

#[test]
fn emptiness_predicates_take_no_values() {
    assert!(Predicate::is_empty("query").check_arity().is_ok());
    assert!(Predicate::is_not_empty("query").check_arity().is_ok());
    assert!(
        Predicate::new("query", Operator::IsEmpty, ["x"])
            .check_arity()
            .is_err()
    );
}

#[test]
fn equals_requires_exactly_one_value() {
    assert!(Predicate::equals("advanced", "false").check_arity().is_ok());
    assert!(
        Predicate::new("advanced", Operator::Equals, Vec::<String>::new())
            .check_arity()
            .is_err()
    );
}

#[test]
fn condition_keeps_declared_order() {
    let condition = Condition::all([
        Predicate::equals("toggle", "true"),
        Predicate::is_empty("query"),
        Predicate::equals("toggle", "true"),
    ]);

    let targets: Vec<&str> = condition.predicates().iter().map(Predicate::target).collect();

    assert_eq!(targets, ["toggle", "query", "toggle"]);
    assert!(!condition.is_empty());
    assert!(Condition::default().is_empty());
}

#[test]
fn operator_display_matches_serialized_name() {
    for operator in [
        Operator::Equals,
        Operator::OneOf,
        Operator::IsEmpty,
        Operator::IsNotEmpty,
    ] {
        let serialized = serde_json::to_value(operator).unwrap();
        assert_eq!(serialized.as_str(), Some(operator.to_string().as_str()));
    }
}

#[test]
fn property_count_includes_nested_nodes() {
    let descriptor = ComponentDescriptor::new("my").with_property(
        PropertyNode::new("configuration", "root")
            .with_child(PropertyNode::new("input", "leaf"))
            .with_child(
                PropertyNode::new("nested", "inner").with_child(PropertyNode::new("user", "leaf")),
            ),
    );

    assert_eq!(descriptor.property_count(), 4);
}

#[test]
fn parent_path_strips_last_segment() {
    let nested = ConfigurationProperty {
        path: "configuration.nested.user".to_string(),
        description: String::new(),
        default: None,
        condition: None,
    };
    let root = ConfigurationProperty {
        path: "configuration".to_string(),
        ..nested.clone()
    };

    assert_eq!(nested.parent_path(), Some("configuration.nested"));
    assert_eq!(root.parent_path(), None);
}
