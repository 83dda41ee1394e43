//! Node declarations as the host sees them.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CoreError;

/// Named arguments passed by the host to a node's entry point.
pub type NodeArgs = serde_json::Map<String, Value>;

/// Type tag of a connectable slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SlotType {
    /// Accepts any value.
    #[serde(rename = "*")]
    Any,
    #[serde(rename = "BOOLEAN")]
    Boolean,
    #[serde(rename = "INT")]
    Int,
    /// Batched image tensor, shipped by the host as nested arrays.
    #[serde(rename = "IMAGE")]
    Image,
}

impl SlotType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SlotType::Any => "*",
            SlotType::Boolean => "BOOLEAN",
            SlotType::Int => "INT",
            SlotType::Image => "IMAGE",
        }
    }

    /// Whether `value` can travel through a slot of this type.
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            SlotType::Any => true,
            SlotType::Boolean => value.is_boolean(),
            SlotType::Int => value.is_i64() || value.is_u64(),
            SlotType::Image => value.is_array() || value.is_object(),
        }
    }
}

/// How an input field is edited and what it accepts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldKind {
    /// A link from an upstream node.
    Payload { slot: SlotType },
    /// A checkbox widget.
    Boolean { default: bool },
    /// A bounded integer widget.
    Int { default: i64, min: i64, max: i64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputField {
    pub name: String,
    #[serde(flatten)]
    pub kind: FieldKind,
}

impl InputField {
    pub fn payload(name: &str, slot: SlotType) -> Self {
        Self {
            name: name.to_string(),
            kind: FieldKind::Payload { slot },
        }
    }

    pub fn boolean(name: &str, default: bool) -> Self {
        Self {
            name: name.to_string(),
            kind: FieldKind::Boolean { default },
        }
    }

    pub fn int(name: &str, default: i64, min: i64, max: i64) -> Self {
        Self {
            name: name.to_string(),
            kind: FieldKind::Int { default, min, max },
        }
    }

    fn check(&self, value: &Value) -> Result<(), CoreError> {
        let name = &self.name;
        match &self.kind {
            FieldKind::Payload { slot } => {
                if !slot.accepts(value) {
                    return Err(CoreError::Validation(format!(
                        "{name} expects a {} value",
                        slot.as_str()
                    )));
                }
            }
            FieldKind::Boolean { .. } => {
                if !value.is_boolean() {
                    return Err(CoreError::Validation(format!("{name} must be a boolean")));
                }
            }
            FieldKind::Int { min, max, .. } => {
                let n = value.as_i64().ok_or_else(|| {
                    CoreError::Validation(format!("{name} must be an integer"))
                })?;
                if !(*min..=*max).contains(&n) {
                    return Err(CoreError::Validation(format!(
                        "{name} must be between {min} and {max}, got {n}"
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Whether the host may skip a node whose inputs did not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CachePolicy {
    /// Run on every graph execution; the node exists for its side effects.
    AlwaysRun,
    /// Reuse the previous output when inputs are unchanged.
    #[default]
    MemoizeOnInputs,
}

impl CachePolicy {
    pub fn should_execute(&self, inputs_unchanged: bool) -> bool {
        match self {
            CachePolicy::AlwaysRun => true,
            CachePolicy::MemoizeOnInputs => !inputs_unchanged,
        }
    }
}

/// Everything the host needs to list, render, and invoke a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDescriptor {
    /// Unique registry key.
    pub name: String,
    pub display_name: String,
    /// UI grouping label.
    pub category: String,
    /// Entry point name, informational only.
    pub function: String,
    pub inputs: Vec<InputField>,
    pub outputs: Vec<SlotType>,
    /// Terminal nodes are executed even with nothing downstream.
    pub output_node: bool,
    pub cache_policy: CachePolicy,
}

impl NodeDescriptor {
    pub fn input(&self, name: &str) -> Option<&InputField> {
        self.inputs.iter().find(|f| f.name == name)
    }

    /// Check `args` against the declared inputs.
    ///
    /// Every declared input must be present and well-typed, integer widgets
    /// must be within bounds, and undeclared arguments are rejected.
    pub fn validate_args(&self, args: &NodeArgs) -> Result<(), CoreError> {
        for field in &self.inputs {
            let value = args.get(&field.name).ok_or_else(|| {
                CoreError::Validation(format!(
                    "{} is missing required input {}",
                    self.name, field.name
                ))
            })?;
            field.check(value)?;
        }

        if let Some(extra) = args.keys().find(|k| self.input(k).is_none()) {
            return Err(CoreError::Validation(format!(
                "{} has no input named {extra}",
                self.name
            )));
        }
        Ok(())
    }
}
