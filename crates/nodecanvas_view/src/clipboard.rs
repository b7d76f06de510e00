// SPDX-License-Identifier: MIT OR Apache-2.0
//! Copied nodes and the connections between them.
//!
//! The clipboard can be exchanged with other canvases as RON text.

use nodecanvas_graph::{Connection, GraphModel, Node, NodeId};
use serde::{Deserialize, Serialize};

/// Snapshot of copied nodes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Clipboard {
    /// Copied nodes in selection order
    pub nodes: Vec<Node>,
    /// Connections whose both ends were copied
    pub connections: Vec<Connection>,
}

impl Clipboard {
    /// Copy nodes of a network from the model
    pub fn from_nodes<M: GraphModel>(model: &M, network: NodeId, ids: &[NodeId]) -> Self {
        let nodes: Vec<Node> = ids.iter().filter_map(|id| model.node(*id).cloned()).collect();
        let connections = model
            .connections(network)
            .into_iter()
            .filter(|c| ids.contains(&c.output_node) && ids.contains(&c.input_node))
            .collect();
        Self { nodes, connections }
    }

    /// Check if nothing was copied
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Copies of the nodes moved by an offset
    pub fn offset_nodes(&self, offset: f32) -> Vec<Node> {
        self.nodes
            .iter()
            .cloned()
            .map(|mut node| {
                node.position[0] += offset;
                node.position[1] += offset;
                node
            })
            .collect()
    }

    /// Serialize to RON
    pub fn to_ron(&self) -> Result<String, ron::Error> {
        ron::to_string(self)
    }

    /// Parse from RON
    pub fn from_ron(text: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(text)
    }
}
