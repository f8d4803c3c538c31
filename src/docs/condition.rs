use std::collections::HashSet;

use tracing::warn;

use crate::{
    DocgenError, Result,
    config::ConditionPolicy,
    metadata::{Condition, ConfigurationProperty, Operator, Predicate},
};

/// Text of a property without visibility condition.
pub const ALWAYS_ENABLED: &str = "Always enabled";

/// Header introducing a list of two or more clauses.
pub const ALL_CONDITIONS_MET: &str = "All of the following conditions are met:";

const PARENT_SEGMENT: &str = "../";

/// Renders a condition as AsciiDoc prose.
///
/// One predicate renders as a single clause. Two or more render as a header,
/// a blank line and one `- ` bullet per predicate in declared order, closed by
/// a newline so the surrounding table cell ends with a blank line.
pub fn render_condition(condition: Option<&Condition>) -> String {
    let predicates = condition.map(Condition::predicates).unwrap_or_default();

    match predicates {
        [] => ALWAYS_ENABLED.to_string(),
        [single] => render_clause(single),
        many => {
            let bullets = many
                .iter()
                .map(|predicate| format!("- {}", render_clause(predicate)))
                .collect::<Vec<_>>()
                .join("\n");
            format!("{ALL_CONDITIONS_MET}\n\n{bullets}\n")
        }
    }
}

/// Renders one predicate, citing its target as declared.
pub fn render_clause(predicate: &Predicate) -> String {
    let target = predicate.target();
    match predicate.operator() {
        Operator::Equals | Operator::OneOf => {
            let values = predicate
                .values()
                .iter()
                .map(|value| format!("`{value}`"))
                .collect::<Vec<_>>()
                .join(" or ");
            format!("`{target}` is equal to {values}")
        }
        Operator::IsEmpty => format!("`{target}` is empty"),
        Operator::IsNotEmpty => format!("`{target}` is not empty"),
    }
}

/// Checks condition targets against one component's flattened paths and
/// renders condition text.
pub struct ConditionResolver<'a> {
    component: &'a str,
    paths: HashSet<&'a str>,
    policy: ConditionPolicy,
}

impl<'a> ConditionResolver<'a> {
    /// Creates a resolver over the flattened properties of `component`.
    pub fn new(
        component: &'a str,
        properties: &'a [ConfigurationProperty],
        policy: ConditionPolicy,
    ) -> Self {
        Self {
            component,
            paths: properties.iter().map(|p| p.path.as_str()).collect(),
            policy,
        }
    }

    /// Resolves a predicate target declared on `property` to a full path.
    ///
    /// Targets are sibling-relative: `advanced` declared on
    /// `configuration.query` means `configuration.advanced`. Each leading
    /// `../` climbs one level further. A target that already is a full path
    /// of the component resolves to itself.
    pub fn resolve_target(&self, property: &ConfigurationProperty, target: &str) -> Option<String> {
        let mut base: Vec<&str> = property
            .parent_path()
            .map(|parent| parent.split('.').collect())
            .unwrap_or_default();

        let mut rest = target;
        while let Some(stripped) = rest.strip_prefix(PARENT_SEGMENT) {
            base.pop()?;
            rest = stripped;
        }

        let relative = if base.is_empty() {
            rest.to_string()
        } else {
            format!("{}.{rest}", base.join("."))
        };

        if self.paths.contains(relative.as_str()) {
            Some(relative)
        } else if self.paths.contains(target) {
            Some(target.to_string())
        } else {
            None
        }
    }

    /// Renders the condition text of one property.
    ///
    /// # Errors
    ///
    /// Returns `DocgenError::MalformedMetadata` when a target does not resolve
    /// and the policy is strict.
    pub fn render(&self, property: &ConfigurationProperty) -> Result<String> {
        if let Some(condition) = &property.condition {
            for predicate in condition.predicates() {
                self.check(property, predicate)?;
            }
        }

        Ok(render_condition(property.condition.as_ref()))
    }

    fn check(&self, property: &ConfigurationProperty, predicate: &Predicate) -> Result<()> {
        if self.resolve_target(property, predicate.target()).is_some() {
            return Ok(());
        }

        match self.policy {
            ConditionPolicy::Strict => Err(DocgenError::malformed(
                self.component,
                &property.path,
                format!("condition target `{}` does not exist", predicate.target()),
            )),
            ConditionPolicy::Lenient => {
                warn!(
                    component = self.component,
                    property = %property.path,
                    target = predicate.target(),
                    "Condition target not found, rendering as written"
                );
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn property(path: &str, condition: Option<Condition>) -> ConfigurationProperty {
        ConfigurationProperty {
            path: path.to_string(),
            description: String::new(),
            default: None,
            condition,
        }
    }

    #[test]
    fn absent_and_empty_conditions_are_always_enabled() {
        assert_eq!(render_condition(None), ALWAYS_ENABLED);
        assert_eq!(render_condition(Some(&Condition::default())), ALWAYS_ENABLED);
    }

    #[test]
    fn single_predicate_has_no_header() {
        let condition = Condition::all([Predicate::equals("toggle", "true")]);

        let text = render_condition(Some(&condition));

        assert_eq!(text, "`toggle` is equal to `true`");
        assert!(!text.contains(ALL_CONDITIONS_MET));
    }

    #[test]
    fn one_of_joins_values_with_or() {
        let clause = render_clause(&Predicate::one_of("type", ["mysql", "oracle"]));

        assert_eq!(clause, "`type` is equal to `mysql` or `oracle`");
    }

    #[test]
    fn emptiness_clauses() {
        assert_eq!(render_clause(&Predicate::is_empty("query")), "`query` is empty");
        assert_eq!(
            render_clause(&Predicate::is_not_empty("query")),
            "`query` is not empty"
        );
    }

    #[test]
    fn several_predicates_render_bullets_in_order() {
        let condition = Condition::all([
            Predicate::equals("advanced", "false"),
            Predicate::is_empty("query"),
        ]);

        let text = render_condition(Some(&condition));

        assert_eq!(
            text,
            "All of the following conditions are met:\n\n- `advanced` is equal to `false`\n- `query` is empty\n"
        );
    }

    #[test]
    fn repeated_predicates_are_not_deduplicated() {
        let condition = Condition::all([
            Predicate::is_empty("query"),
            Predicate::is_empty("query"),
            Predicate::is_empty("query"),
        ]);

        let text = render_condition(Some(&condition));

        assert_eq!(text.lines().filter(|l| l.starts_with("- ")).count(), 3);
    }

    #[test]
    fn resolves_sibling_parent_and_absolute_targets() {
        let properties = vec![
            property("configuration", None),
            property("configuration.advanced", None),
            property("configuration.nested", None),
            property("configuration.nested.user", None),
        ];
        let resolver = ConditionResolver::new("c", &properties, ConditionPolicy::Strict);
        let user = &properties[3];

        assert_eq!(
            resolver.resolve_target(user, "../advanced").as_deref(),
            Some("configuration.advanced")
        );
        assert_eq!(
            resolver.resolve_target(&properties[1], "nested").as_deref(),
            Some("configuration.nested")
        );
        assert_eq!(
            resolver.resolve_target(user, "configuration.advanced").as_deref(),
            Some("configuration.advanced")
        );
        assert_eq!(resolver.resolve_target(user, "../../../advanced"), None);
        assert_eq!(resolver.resolve_target(user, "missing"), None);
    }

    #[test]
    fn strict_policy_rejects_unknown_targets() {
        let properties = vec![property(
            "configuration.query",
            Some(Condition::all([Predicate::equals("ghost", "x")])),
        )];
        let resolver = ConditionResolver::new("c", &properties, ConditionPolicy::Strict);

        let err = resolver.render(&properties[0]).unwrap_err();

        assert!(matches!(err, DocgenError::MalformedMetadata { .. }));
    }

    #[test]
    fn lenient_policy_renders_unknown_targets_as_written() {
        let properties = vec![property(
            "configuration.query",
            Some(Condition::all([Predicate::equals("ghost", "x")])),
        )];
        let resolver = ConditionResolver::new("c", &properties, ConditionPolicy::Lenient);

        let text = resolver.render(&properties[0]).unwrap();

        assert_eq!(text, "`ghost` is equal to `x`");
    }
}
