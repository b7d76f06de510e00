// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node definitions for the graph model.

use crate::port::{Port, PortType};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum length of a node name
pub const MAX_NAME_LENGTH: usize = 30;

/// Unique identifier for a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub Uuid);

impl NodeId {
    /// Create a new random node ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

/// A node in the graph
///
/// Every node can act as a network: its children are the nodes whose
/// `parent` points back at it. A node has an ordered list of inputs and
/// exactly one implicit output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Unique instance ID
    pub id: NodeId,
    /// Name, unique within the parent network
    pub name: String,
    /// Image name used to look up the node's icon
    pub image: Option<String>,
    /// Position in the parent network
    pub position: [f32; 2],
    /// Input ports in declared order
    pub inputs: Vec<Port>,
    /// Type of the single output
    pub output_type: PortType,
    /// Whether the last evaluation of this node failed
    pub has_error: bool,
    /// Parent network
    pub parent: Option<NodeId>,
    /// Child rendered when this node is evaluated as a network
    pub rendered_child: Option<NodeId>,
}

impl Node {
    /// Create a new unparented node
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: NodeId::new(),
            name: name.into(),
            image: None,
            position: [0.0, 0.0],
            inputs: Vec::new(),
            output_type: PortType::Any,
            has_error: false,
            parent: None,
            rendered_child: None,
        }
    }

    /// Set the position
    pub fn with_position(mut self, x: f32, y: f32) -> Self {
        self.position = [x, y];
        self
    }

    /// Append an input port
    pub fn with_input(mut self, port: Port) -> Self {
        self.inputs.push(port);
        self
    }

    /// Set the output type
    pub fn with_output_type(mut self, output_type: PortType) -> Self {
        self.output_type = output_type;
        self
    }

    /// Set the icon image name
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Get an input port by label
    pub fn input(&self, label: &str) -> Option<&Port> {
        self.inputs.iter().find(|p| p.label == label)
    }

    /// Get the declared index of an input port
    pub fn input_index(&self, label: &str) -> Option<usize> {
        self.inputs.iter().position(|p| p.label == label)
    }

    /// First input label that appears more than once
    pub fn duplicate_input(&self) -> Option<&str> {
        self.inputs
            .iter()
            .enumerate()
            .find(|(i, port)| self.inputs[..*i].iter().any(|p| p.label == port.label))
            .map(|(_, port)| port.label.as_str())
    }
}

/// Check that a name is usable for a node
///
/// Names start with a letter or underscore, continue with ASCII letters,
/// digits or underscores, and are at most [`MAX_NAME_LENGTH`] long.
pub fn validate_name(name: &str) -> Result<(), crate::graph::InvalidNameError> {
    use crate::graph::InvalidNameError;

    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return Err(InvalidNameError::Empty);
    };
    if name.len() > MAX_NAME_LENGTH {
        return Err(InvalidNameError::Malformed(name.to_string()));
    }
    if !(first.is_ascii_alphabetic() || first == '_') {
        return Err(InvalidNameError::Malformed(name.to_string()));
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(InvalidNameError::Malformed(name.to_string()));
    }
    Ok(())
}
