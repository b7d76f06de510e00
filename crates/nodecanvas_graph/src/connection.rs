// SPDX-License-Identifier: MIT OR Apache-2.0
//! Connection (edge) definitions for the graph.

use crate::node::NodeId;
use serde::{Deserialize, Serialize};

/// A connection from a node's output to one input port of another node
///
/// The triple is the connection's identity; an input port holds at most
/// one incoming connection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Connection {
    /// Node whose output feeds the connection
    pub output_node: NodeId,
    /// Node receiving the value
    pub input_node: NodeId,
    /// Label of the receiving port
    pub input_port: String,
}

impl Connection {
    /// Create a new connection
    pub fn new(output_node: NodeId, input_node: NodeId, input_port: impl Into<String>) -> Self {
        Self {
            output_node,
            input_node,
            input_port: input_port.into(),
        }
    }

    /// Check if this connection involves a specific node
    pub fn involves_node(&self, node_id: NodeId) -> bool {
        self.output_node == node_id || self.input_node == node_id
    }

    /// Check if this connection ends at a specific port
    pub fn targets(&self, node_id: NodeId, port: &str) -> bool {
        self.input_node == node_id && self.input_port == port
    }
}
