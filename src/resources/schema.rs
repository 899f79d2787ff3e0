//! Attribute schemas and plan computation.
//!
//! A [`Schema`] describes what the host may put in a resource block. The
//! planning rules mirror the host's own: configured values win, then static
//! defaults, then (for computed attributes marked `UseStateForUnknown`) the
//! prior value. Anything else computed is unknown until apply.

// Standard library
use std::collections::BTreeMap;

// 3rd party crates
use serde::Serialize;
use serde_json::{Map, Value};

// Current module imports
use super::types::Diagnostics;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeKind {
    String,
    Int64,
    Bool,
    /// A list of objects with the given attribute kinds.
    ObjectList(BTreeMap<&'static str, AttributeKind>),
}

impl AttributeKind {
    fn matches(&self, value: &Value) -> bool {
        match self {
            AttributeKind::String => value.is_string(),
            AttributeKind::Int64 => value.is_i64(),
            AttributeKind::Bool => value.is_boolean(),
            AttributeKind::ObjectList(_) => value.is_array(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanModifier {
    /// A change to this attribute destroys and recreates the resource.
    RequiresReplace,
    /// Keep the prior value instead of marking the attribute unknown.
    UseStateForUnknown,
}

#[derive(Debug, Clone, Serialize)]
pub struct Attribute {
    pub kind: AttributeKind,
    pub description: &'static str,
    pub required: bool,
    pub optional: bool,
    pub computed: bool,
    pub sensitive: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub plan_modifiers: Vec<PlanModifier>,
}

impl Attribute {
    fn new(kind: AttributeKind) -> Self {
        Self {
            kind,
            description: "",
            required: false,
            optional: false,
            computed: false,
            sensitive: false,
            default: None,
            plan_modifiers: Vec::new(),
        }
    }

    pub fn required(kind: AttributeKind) -> Self {
        Self {
            required: true,
            ..Self::new(kind)
        }
    }

    pub fn optional(kind: AttributeKind) -> Self {
        Self {
            optional: true,
            ..Self::new(kind)
        }
    }

    pub fn computed(kind: AttributeKind) -> Self {
        Self {
            computed: true,
            ..Self::new(kind)
        }
    }

    /// Optional attribute that takes `value` when left out of the configuration.
    pub fn with_default(kind: AttributeKind, value: Value) -> Self {
        Self {
            optional: true,
            computed: true,
            default: Some(value),
            ..Self::new(kind)
        }
    }

    pub fn description(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    pub fn requires_replace(mut self) -> Self {
        self.plan_modifiers.push(PlanModifier::RequiresReplace);
        self
    }

    pub fn use_state_for_unknown(mut self) -> Self {
        self.plan_modifiers.push(PlanModifier::UseStateForUnknown);
        self
    }

    fn has_modifier(&self, modifier: PlanModifier) -> bool {
        self.plan_modifiers.contains(&modifier)
    }

    fn configurable(&self) -> bool {
        self.required || self.optional
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Schema {
    pub version: i64,
    pub description: &'static str,
    pub attributes: BTreeMap<&'static str, Attribute>,
}

/// How the host should reconcile a resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum PlanAction {
    Create,
    Update,
    Replace { attributes: Vec<String> },
    Delete,
    NoOp,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlannedChange {
    #[serde(flatten)]
    pub action: PlanAction,
    pub planned_state: Value,
    /// Computed attributes whose value is only known after apply.
    pub unknown: Vec<String>,
    pub diagnostics: Diagnostics,
}

impl Schema {
    pub fn new(description: &'static str) -> Self {
        Self {
            version: 0,
            description,
            attributes: BTreeMap::new(),
        }
    }

    pub fn attribute(mut self, name: &'static str, attribute: Attribute) -> Self {
        self.attributes.insert(name, attribute);
        self
    }

    /// Checks a configuration block against the schema.
    pub fn validate_config(&self, config: &Value) -> Diagnostics {
        let mut diagnostics = Diagnostics::new();

        let Some(config) = config.as_object() else {
            diagnostics.add_error(
                "Invalid configuration",
                "The resource configuration must be an object.",
            );
            return diagnostics;
        };

        for name in config.keys() {
            if !self.attributes.contains_key(name.as_str()) {
                diagnostics.add_error(
                    "Unsupported argument",
                    format!("An argument named \"{}\" is not expected here.", name),
                );
            }
        }

        for (name, attribute) in &self.attributes {
            match config.get(*name).filter(|v| !v.is_null()) {
                None if attribute.required => diagnostics.add_error(
                    "Missing required argument",
                    format!(
                        "The argument \"{}\" is required, but no definition was found.",
                        name
                    ),
                ),
                Some(_) if !attribute.configurable() => diagnostics.add_error(
                    "Invalid configuration",
                    format!("\"{}\" is computed and cannot be set.", name),
                ),
                Some(value) if !attribute.kind.matches(value) => diagnostics.add_error(
                    "Incorrect attribute value type",
                    format!("Inappropriate value for attribute \"{}\".", name),
                ),
                _ => {}
            }
        }

        diagnostics
    }

    /// Computes the planned state for `config` against `prior`.
    ///
    /// `prior == None` plans a creation; `config == None` plans a destroy.
    pub fn plan(&self, prior: Option<&Value>, config: Option<&Value>) -> PlannedChange {
        let prior = prior.filter(|p| !p.is_null());

        let Some(config) = config.filter(|c| !c.is_null()) else {
            return PlannedChange {
                action: if prior.is_some() {
                    PlanAction::Delete
                } else {
                    PlanAction::NoOp
                },
                planned_state: Value::Null,
                unknown: Vec::new(),
                diagnostics: Diagnostics::new(),
            };
        };

        let diagnostics = self.validate_config(config);
        let prior_value = |name: &str| {
            prior
                .and_then(|p| p.get(name))
                .filter(|v| !v.is_null())
                .cloned()
        };

        let mut planned = Map::new();
        let mut unknown = Vec::new();
        for (name, attribute) in &self.attributes {
            let configured = config
                .get(*name)
                .filter(|v| !v.is_null() && attribute.configurable())
                .cloned();
            let value = configured
                .or_else(|| attribute.default.clone())
                .or_else(|| {
                    if attribute.has_modifier(PlanModifier::UseStateForUnknown) {
                        prior_value(*name)
                    } else {
                        None
                    }
                });

            if value.is_none() && attribute.computed {
                unknown.push(name.to_string());
            }
            planned.insert(name.to_string(), value.unwrap_or(Value::Null));
        }

        let Some(prior) = prior else {
            return PlannedChange {
                action: PlanAction::Create,
                planned_state: Value::Object(planned),
                unknown,
                diagnostics,
            };
        };

        let changed: Vec<&str> = self
            .attributes
            .keys()
            .copied()
            .filter(|name| !unknown.iter().any(|u| u.as_str() == *name))
            .filter(|name| planned.get(*name) != Some(&prior_value(*name).unwrap_or(Value::Null)))
            .collect();

        if changed.is_empty() {
            return PlannedChange {
                action: PlanAction::NoOp,
                planned_state: prior.clone(),
                unknown: Vec::new(),
                diagnostics,
            };
        }

        let replaced: Vec<String> = changed
            .iter()
            .filter(|name| self.attributes[**name].has_modifier(PlanModifier::RequiresReplace))
            .map(|name| name.to_string())
            .collect();

        PlannedChange {
            action: if replaced.is_empty() {
                PlanAction::Update
            } else {
                PlanAction::Replace {
                    attributes: replaced,
                }
            },
            planned_state: Value::Object(planned),
            unknown,
            diagnostics,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema() -> Schema {
        Schema::new("test")
            .attribute(
                "name",
                Attribute::required(AttributeKind::String).requires_replace(),
            )
            .attribute("label", Attribute::optional(AttributeKind::String))
            .attribute(
                "enabled",
                Attribute::with_default(AttributeKind::Bool, json!(true)),
            )
            .attribute(
                "id",
                Attribute::computed(AttributeKind::Int64).use_state_for_unknown(),
            )
    }

    #[test]
    fn create_fills_defaults_and_leaves_id_unknown() {
        let change = schema().plan(None, Some(&json!({"name": "a"})));

        assert_eq!(change.action, PlanAction::Create);
        assert_eq!(change.planned_state["enabled"], json!(true));
        assert_eq!(change.planned_state["label"], Value::Null);
        assert_eq!(change.unknown, vec!["id".to_string()]);
        assert!(!change.diagnostics.has_error());
    }

    #[test]
    fn unchanged_config_is_a_no_op() {
        let prior = json!({"name": "a", "label": null, "enabled": true, "id": 3});
        let change = schema().plan(Some(&prior), Some(&json!({"name": "a"})));

        assert_eq!(change.action, PlanAction::NoOp);
        assert_eq!(change.planned_state, prior);
    }

    #[test]
    fn optional_change_updates_in_place_and_keeps_id() {
        let prior = json!({"name": "a", "label": null, "enabled": true, "id": 3});
        let change = schema().plan(Some(&prior), Some(&json!({"name": "a", "label": "b"})));

        assert_eq!(change.action, PlanAction::Update);
        assert_eq!(change.planned_state["id"], json!(3));
        assert!(change.unknown.is_empty());
    }

    #[test]
    fn replace_modifier_forces_replacement() {
        let prior = json!({"name": "a", "label": null, "enabled": true, "id": 3});
        let change = schema().plan(Some(&prior), Some(&json!({"name": "b"})));

        assert_eq!(
            change.action,
            PlanAction::Replace {
                attributes: vec!["name".to_string()]
            }
        );
    }

    #[test]
    fn missing_config_plans_a_delete() {
        let prior = json!({"name": "a", "id": 3});
        assert_eq!(schema().plan(Some(&prior), None).action, PlanAction::Delete);
        assert_eq!(schema().plan(None, None).action, PlanAction::NoOp);
    }

    #[test]
    fn config_errors_are_reported() {
        let diagnostics = schema().validate_config(&json!({"label": 1, "id": 4, "extra": true}));
        let summaries: Vec<&str> = diagnostics.errors().map(|d| d.summary.as_str()).collect();

        assert!(summaries.contains(&"Missing required argument"));
        assert!(summaries.contains(&"Incorrect attribute value type"));
        assert!(summaries.contains(&"Invalid configuration"));
        assert!(summaries.contains(&"Unsupported argument"));
    }
}
