//! Host plugin contract.
//!
//! The workflow host discovers nodes through an explicit
//! [`NodeRegistry::register`] call carrying a [`NodeDescriptor`]. The host
//! owns schema validation and caching decisions; nodes only execute.

pub mod descriptor;
pub mod registry;

pub use descriptor::{CachePolicy, FieldKind, InputField, NodeArgs, NodeDescriptor, SlotType};
pub use registry::{HostNode, InMemoryRegistry, NodeRegistry};
