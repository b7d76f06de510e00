// SPDX-License-Identifier: MIT OR Apache-2.0
//! The interface the canvas uses to query and mutate a graph.

use crate::connection::Connection;
use crate::event::GraphEvent;
use crate::graph::{ConnectionError, GraphError};
use crate::node::{Node, NodeId};

/// Authoritative store of nodes, ports and connections
///
/// Every mutation that changes the graph queues one or more [`GraphEvent`]s,
/// which the caller collects with [`GraphModel::drain_events`]. Mutations
/// issued between [`GraphModel::begin_edits`] and [`GraphModel::end_edits`]
/// form a single named edit step.
pub trait GraphModel {
    /// Get a node by ID
    fn node(&self, id: NodeId) -> Option<&Node>;

    /// Get the children of a network in insertion order
    fn children(&self, network: NodeId) -> Vec<NodeId>;

    /// Get the parent network of a node
    fn parent(&self, id: NodeId) -> Option<NodeId>;

    /// Get the network currently open for editing
    fn active_network(&self) -> NodeId;

    /// Get the slash-separated path of a node, e.g. `/root/net1`
    fn network_path(&self, id: NodeId) -> Option<String>;

    /// Find a node by its path
    fn resolve_path(&self, path: &str) -> Option<NodeId>;

    /// Get the rendered child of a network
    fn rendered_child(&self, network: NodeId) -> Option<NodeId>;

    /// Get all connections between children of a network
    fn connections(&self, network: NodeId) -> Vec<Connection>;

    /// Check if a network or any of its children is in error
    fn has_error_in(&self, network: NodeId) -> bool;

    /// Connect a node's output to an input port of another node
    fn connect(
        &mut self,
        output_node: NodeId,
        input_node: NodeId,
        input_port: &str,
    ) -> Result<Connection, ConnectionError>;

    /// Remove a connection, returning whether it existed
    fn disconnect(&mut self, connection: &Connection) -> bool;

    /// Remove a node together with its connections and descendants
    fn remove_node(&mut self, id: NodeId) -> Result<(), GraphError>;

    /// Move a node
    fn set_node_position(&mut self, id: NodeId, position: [f32; 2]) -> Result<(), GraphError>;

    /// Rename a node
    fn set_node_name(&mut self, id: NodeId, name: &str) -> Result<(), GraphError>;

    /// Make a node the rendered child of its network
    fn set_rendered_node(&mut self, id: NodeId) -> Result<(), GraphError>;

    /// Open the network at `path` for editing
    fn set_active_network(&mut self, path: &str) -> Result<(), GraphError>;

    /// Copy nodes and the connections between them into a network
    ///
    /// Copies receive fresh IDs and names unique in the target network.
    /// Returns the IDs of the copies in the order of `nodes`.
    fn paste_children(
        &mut self,
        network: NodeId,
        nodes: &[Node],
        connections: &[Connection],
    ) -> Result<Vec<NodeId>, GraphError>;

    /// Start a named group of edits
    fn begin_edits(&mut self, description: &str);

    /// Close the current group of edits
    fn end_edits(&mut self);

    /// Take all queued notifications in emission order
    fn drain_events(&mut self) -> Vec<GraphEvent>;
}
