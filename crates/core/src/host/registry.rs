//! Node registration and dispatch.

use std::collections::BTreeMap;

use serde_json::Value;

use super::descriptor::{NodeArgs, NodeDescriptor};
use crate::error::CoreError;

/// A node the host can invoke.
pub trait HostNode: Send + Sync {
    fn descriptor(&self) -> &NodeDescriptor;

    /// Run the node with already-validated arguments.
    ///
    /// Returns one value per declared output slot.
    fn execute(&self, args: NodeArgs) -> Result<Vec<Value>, CoreError>;
}

/// Host-provided sink for node registrations.
pub trait NodeRegistry {
    fn register(&mut self, node: Box<dyn HostNode>) -> Result<(), CoreError>;
}

/// Simple registry keyed by node name.
#[derive(Default)]
pub struct InMemoryRegistry {
    nodes: BTreeMap<String, Box<dyn HostNode>>,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&dyn HostNode> {
        self.nodes.get(name).map(|n| n.as_ref())
    }

    /// Descriptors of all registered nodes, ordered by name.
    pub fn descriptors(&self) -> Vec<&NodeDescriptor> {
        self.nodes.values().map(|n| n.descriptor()).collect()
    }

    /// Whether the host should run `name` given its input fingerprint state.
    pub fn should_execute(&self, name: &str, inputs_unchanged: bool) -> Result<bool, CoreError> {
        let node = self
            .get(name)
            .ok_or_else(|| CoreError::NotFound(name.to_string()))?;
        Ok(node.descriptor().cache_policy.should_execute(inputs_unchanged))
    }

    /// Validate `args` against the node's schema and execute it.
    pub fn invoke(&self, name: &str, args: NodeArgs) -> Result<Vec<Value>, CoreError> {
        let node = self
            .get(name)
            .ok_or_else(|| CoreError::NotFound(name.to_string()))?;
        node.descriptor().validate_args(&args)?;

        tracing::debug!(node = name, "Invoking node");
        let outputs = node.execute(args)?;

        let declared = node.descriptor().outputs.len();
        if outputs.len() != declared {
            return Err(CoreError::Internal(format!(
                "{name} returned {} outputs, declared {declared}",
                outputs.len()
            )));
        }
        Ok(outputs)
    }
}

impl NodeRegistry for InMemoryRegistry {
    fn register(&mut self, node: Box<dyn HostNode>) -> Result<(), CoreError> {
        let name = node.descriptor().name.clone();
        if self.nodes.contains_key(&name) {
            return Err(CoreError::Conflict(format!("node {name} is already registered")));
        }
        tracing::info!(node = %name, category = %node.descriptor().category, "Registered node");
        self.nodes.insert(name, node);
        Ok(())
    }
}
