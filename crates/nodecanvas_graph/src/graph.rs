// SPDX-License-Identifier: MIT OR Apache-2.0
//! In-memory graph containing a tree of networks and their connections.

use crate::connection::Connection;
use crate::event::{Attribute, GraphEvent};
use crate::history::EditLog;
use crate::model::GraphModel;
use crate::node::{validate_name, Node, NodeId};
use crate::port::Port;
use indexmap::IndexMap;
use std::collections::HashSet;

/// Name of the root network
pub const ROOT_NAME: &str = "root";

/// Name given to pasted nodes whose own name is not valid
pub const PASTE_FALLBACK_NAME: &str = "node";

/// A node graph
///
/// The graph is a tree of networks rooted at a node named [`ROOT_NAME`].
/// Connections always join two children of the same network.
#[derive(Debug)]
pub struct Graph {
    /// Graph name
    pub name: String,
    /// All nodes, in creation order
    nodes: IndexMap<NodeId, Node>,
    /// Connections between nodes
    connections: Vec<Connection>,
    root: NodeId,
    active: NodeId,
    /// Notifications not yet drained
    events: Vec<GraphEvent>,
    history: EditLog,
}

impl Graph {
    /// Create a new graph holding only the root network
    pub fn new(name: impl Into<String>) -> Self {
        let root = Node::new(ROOT_NAME);
        let root_id = root.id;
        let mut nodes = IndexMap::new();
        nodes.insert(root_id, root);
        Self {
            name: name.into(),
            nodes,
            connections: Vec::new(),
            root: root_id,
            active: root_id,
            events: Vec::new(),
            history: EditLog::new(),
        }
    }

    /// Get the root network
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Add a node to a network
    ///
    /// The node keeps its name if it is valid and free, otherwise
    /// the call fails.
    pub fn add_node(&mut self, network: NodeId, mut node: Node) -> Result<NodeId, GraphError> {
        if !self.nodes.contains_key(&network) {
            return Err(GraphError::NodeNotFound(network));
        }
        if self.nodes.contains_key(&node.id) {
            return Err(GraphError::DuplicateId(node.id));
        }
        validate_name(&node.name)?;
        if self.child_named(network, &node.name).is_some() {
            return Err(InvalidNameError::Duplicate(node.name).into());
        }
        if let Some(label) = node.duplicate_input() {
            return Err(GraphError::DuplicatePort(label.to_string()));
        }
        node.parent = Some(network);
        let id = node.id;
        self.nodes.insert(id, node);
        self.history.record("Create Node");
        self.events.push(GraphEvent::ChildAdded { parent: network, child: id });
        Ok(id)
    }

    /// Find a child of a network by name
    pub fn child_named(&self, network: NodeId, name: &str) -> Option<NodeId> {
        self.nodes
            .values()
            .find(|n| n.parent == Some(network) && n.name == name)
            .map(|n| n.id)
    }

    /// Get all connections in the graph
    pub fn all_connections(&self) -> &[Connection] {
        &self.connections
    }

    /// Get the number of connections
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Get the number of nodes, root included
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Get the edit-step log
    pub fn history(&self) -> &EditLog {
        &self.history
    }

    /// Set a node's error flag
    pub fn set_node_error(&mut self, id: NodeId, has_error: bool) -> Result<(), GraphError> {
        let node = self.nodes.get_mut(&id).ok_or(GraphError::NodeNotFound(id))?;
        if node.has_error == has_error {
            return Ok(());
        }
        node.has_error = has_error;
        self.events.push(GraphEvent::NodeUpdated { node: id });
        Ok(())
    }

    /// Replace a node's input ports
    ///
    /// Connections into ports that no longer exist are removed.
    pub fn set_input_ports(&mut self, id: NodeId, inputs: Vec<Port>) -> Result<(), GraphError> {
        let mut labels = HashSet::new();
        if let Some(port) = inputs.iter().find(|p| !labels.insert(p.label.clone())) {
            return Err(GraphError::DuplicatePort(port.label.clone()));
        }
        let node = self.nodes.get_mut(&id).ok_or(GraphError::NodeNotFound(id))?;
        node.inputs = inputs;
        let parent = node.parent;

        self.history.begin("Change Ports");
        let dropped: Vec<Connection> = self
            .connections
            .iter()
            .filter(|c| c.input_node == id && !labels.contains(&c.input_port))
            .cloned()
            .collect();
        for connection in dropped {
            self.remove_connection(parent, &connection);
        }
        self.history.record("Set Ports");
        self.history.end();

        self.events.push(GraphEvent::AttributeChanged { node: id, attribute: Attribute::Port });
        Ok(())
    }

    /// Set a node's icon image name
    pub fn set_node_image(&mut self, id: NodeId, image: Option<String>) -> Result<(), GraphError> {
        let node = self.nodes.get_mut(&id).ok_or(GraphError::NodeNotFound(id))?;
        if node.image == image {
            return Ok(());
        }
        node.image = image;
        self.history.record("Set Image");
        self.events.push(GraphEvent::AttributeChanged { node: id, attribute: Attribute::Image });
        Ok(())
    }

    /// Pick a name that is free in `network`, based on `base`
    ///
    /// A taken name has its trailing digits replaced by the lowest free
    /// counter, starting at 1: `rect` becomes `rect1`, `rect1` becomes `rect2`.
    pub fn unique_name(&self, network: NodeId, base: &str) -> String {
        if self.child_named(network, base).is_none() {
            return base.to_string();
        }
        let stem = base.trim_end_matches(|c: char| c.is_ascii_digit());
        let mut counter = 1;
        loop {
            let candidate = format!("{stem}{counter}");
            if self.child_named(network, &candidate).is_none() {
                return candidate;
            }
            counter += 1;
        }
    }

    fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut found = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            for node in self.nodes.values().filter(|n| n.parent == Some(current)) {
                found.push(node.id);
                stack.push(node.id);
            }
        }
        found
    }

    /// Check if `to` is reachable from `from` by following outputs downstream
    fn reaches(&self, from: NodeId, to: NodeId) -> bool {
        let mut visited = HashSet::new();
        let mut stack = vec![from];
        while let Some(current) = stack.pop() {
            if current == to {
                return true;
            }
            if !visited.insert(current) {
                continue;
            }
            stack.extend(
                self.connections
                    .iter()
                    .filter(|c| c.output_node == current)
                    .map(|c| c.input_node),
            );
        }
        false
    }

    fn remove_connection(&mut self, network: Option<NodeId>, connection: &Connection) {
        let before = self.connections.len();
        self.connections.retain(|c| c != connection);
        if self.connections.len() == before {
            return;
        }
        self.history.record("Disconnect");
        if let Some(network) = network {
            self.events.push(GraphEvent::ConnectionRemoved {
                network,
                connection: connection.clone(),
            });
        }
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new("Untitled")
    }
}

impl GraphModel for Graph {
    fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    fn children(&self, network: NodeId) -> Vec<NodeId> {
        self.nodes
            .values()
            .filter(|n| n.parent == Some(network))
            .map(|n| n.id)
            .collect()
    }

    fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(&id).and_then(|n| n.parent)
    }

    fn active_network(&self) -> NodeId {
        self.active
    }

    fn network_path(&self, id: NodeId) -> Option<String> {
        let mut names = Vec::new();
        let mut current = Some(id);
        while let Some(current_id) = current {
            let node = self.nodes.get(&current_id)?;
            names.push(node.name.as_str());
            current = node.parent;
        }
        names.reverse();
        Some(format!("/{}", names.join("/")))
    }

    fn resolve_path(&self, path: &str) -> Option<NodeId> {
        let mut segments = path.split('/').filter(|s| !s.is_empty());
        if segments.next()? != self.nodes.get(&self.root)?.name {
            return None;
        }
        segments.try_fold(self.root, |network, name| self.child_named(network, name))
    }

    fn rendered_child(&self, network: NodeId) -> Option<NodeId> {
        self.nodes.get(&network).and_then(|n| n.rendered_child)
    }

    fn connections(&self, network: NodeId) -> Vec<Connection> {
        self.connections
            .iter()
            .filter(|c| self.parent(c.input_node) == Some(network))
            .cloned()
            .collect()
    }

    fn has_error_in(&self, network: NodeId) -> bool {
        let own = self.nodes.get(&network).is_some_and(|n| n.has_error);
        own || self
            .nodes
            .values()
            .any(|n| n.parent == Some(network) && n.has_error)
    }

    fn connect(
        &mut self,
        output_node: NodeId,
        input_node: NodeId,
        input_port: &str,
    ) -> Result<Connection, ConnectionError> {
        // Validate nodes exist
        let source = self
            .nodes
            .get(&output_node)
            .ok_or(ConnectionError::NodeNotFound(output_node))?;
        let target = self
            .nodes
            .get(&input_node)
            .ok_or(ConnectionError::NodeNotFound(input_node))?;

        if output_node == input_node {
            return Err(ConnectionError::SelfLoop);
        }
        if source.parent != target.parent {
            return Err(ConnectionError::DifferentNetworks);
        }

        let port = target
            .input(input_port)
            .ok_or_else(|| ConnectionError::PortNotFound(input_port.to_string()))?;
        if !port.accepts(&source.output_type) {
            return Err(ConnectionError::IncompatiblePorts(input_port.to_string()));
        }

        if self.connections.iter().any(|c| c.targets(input_node, input_port)) {
            return Err(ConnectionError::PortOccupied(input_port.to_string()));
        }

        if self.reaches(input_node, output_node) {
            return Err(ConnectionError::Cycle);
        }

        let network = target.parent;
        let connection = Connection::new(output_node, input_node, input_port);
        self.connections.push(connection.clone());
        self.history.record("Connect");
        if let Some(network) = network {
            self.events.push(GraphEvent::ConnectionAdded {
                network,
                connection: connection.clone(),
            });
        }
        Ok(connection)
    }

    fn disconnect(&mut self, connection: &Connection) -> bool {
        let exists = self.connections.contains(connection);
        if exists {
            let network = self.parent(connection.input_node);
            self.remove_connection(network, connection);
        }
        exists
    }

    fn remove_node(&mut self, id: NodeId) -> Result<(), GraphError> {
        if id == self.root {
            return Err(GraphError::CannotRemoveRoot);
        }
        let parent = self.parent(id).ok_or(GraphError::NodeNotFound(id))?;

        let mut doomed = self.descendants(id);
        doomed.push(id);

        self.history.begin("Remove Node");

        if doomed.contains(&self.active) {
            self.active = parent;
            self.events.push(GraphEvent::ActiveNetworkChanged { network: parent });
        }

        let cut: Vec<Connection> = self
            .connections
            .iter()
            .filter(|c| doomed.iter().any(|d| c.involves_node(*d)))
            .cloned()
            .collect();
        for connection in cut {
            let network = self.parent(connection.input_node);
            self.remove_connection(network, &connection);
        }

        if self.rendered_child(parent) == Some(id) {
            if let Some(network) = self.nodes.get_mut(&parent) {
                network.rendered_child = None;
            }
            self.events.push(GraphEvent::RenderedChildChanged { network: parent, child: None });
        }

        for node_id in doomed {
            if let Some(node) = self.nodes.shift_remove(&node_id) {
                if let Some(node_parent) = node.parent {
                    self.events.push(GraphEvent::ChildRemoved { parent: node_parent, child: node_id });
                }
            }
        }
        self.history.record("Remove Node");
        self.history.end();

        tracing::debug!("Removed node {:?} from {:?}", id, parent);
        Ok(())
    }

    fn set_node_position(&mut self, id: NodeId, position: [f32; 2]) -> Result<(), GraphError> {
        let node = self.nodes.get_mut(&id).ok_or(GraphError::NodeNotFound(id))?;
        if node.position == position {
            return Ok(());
        }
        node.position = position;
        self.history.record("Move Node");
        self.events.push(GraphEvent::AttributeChanged { node: id, attribute: Attribute::Position });
        Ok(())
    }

    fn set_node_name(&mut self, id: NodeId, name: &str) -> Result<(), GraphError> {
        let node = self.nodes.get(&id).ok_or(GraphError::NodeNotFound(id))?;
        if node.name == name {
            return Ok(());
        }
        validate_name(name)?;
        if let Some(parent) = node.parent {
            if self.child_named(parent, name).is_some() {
                return Err(InvalidNameError::Duplicate(name.to_string()).into());
            }
        }
        if let Some(node) = self.nodes.get_mut(&id) {
            node.name = name.to_string();
        }
        self.history.record("Rename Node");
        self.events.push(GraphEvent::AttributeChanged { node: id, attribute: Attribute::Name });
        Ok(())
    }

    fn set_rendered_node(&mut self, id: NodeId) -> Result<(), GraphError> {
        let parent = match self.nodes.get(&id) {
            Some(node) => node.parent.ok_or(GraphError::NotInNetwork(id))?,
            None => return Err(GraphError::NodeNotFound(id)),
        };
        let network = self.nodes.get_mut(&parent).ok_or(GraphError::NodeNotFound(parent))?;
        if network.rendered_child == Some(id) {
            return Ok(());
        }
        network.rendered_child = Some(id);
        self.history.record("Set Rendered");
        self.events.push(GraphEvent::RenderedChildChanged { network: parent, child: Some(id) });
        Ok(())
    }

    fn set_active_network(&mut self, path: &str) -> Result<(), GraphError> {
        let network = self
            .resolve_path(path)
            .ok_or_else(|| GraphError::PathNotFound(path.to_string()))?;
        if network == self.active {
            return Ok(());
        }
        self.active = network;
        self.events.push(GraphEvent::ActiveNetworkChanged { network });
        Ok(())
    }

    fn paste_children(
        &mut self,
        network: NodeId,
        nodes: &[Node],
        connections: &[Connection],
    ) -> Result<Vec<NodeId>, GraphError> {
        if !self.nodes.contains_key(&network) {
            return Err(GraphError::NodeNotFound(network));
        }

        self.history.begin("Paste");
        let mut mapping = IndexMap::new();
        for original in nodes {
            if let Some(label) = original.duplicate_input() {
                tracing::debug!("Skipped pasted node {:?}: port {} repeats", original.name, label);
                continue;
            }
            let base = match validate_name(&original.name) {
                Ok(()) => original.name.as_str(),
                Err(_) => PASTE_FALLBACK_NAME,
            };
            let mut copy = original.clone();
            copy.id = NodeId::new();
            copy.name = self.unique_name(network, base);
            copy.parent = Some(network);
            copy.rendered_child = None;
            let copy_id = copy.id;
            mapping.insert(original.id, copy_id);
            self.nodes.insert(copy_id, copy);
            self.history.record("Create Node");
            self.events.push(GraphEvent::ChildAdded { parent: network, child: copy_id });
        }

        for connection in connections {
            let (Some(&output), Some(&input)) = (
                mapping.get(&connection.output_node),
                mapping.get(&connection.input_node),
            ) else {
                continue;
            };
            if let Err(e) = self.connect(output, input, &connection.input_port) {
                tracing::debug!("Skipped pasted connection: {}", e);
            }
        }
        self.history.end();

        Ok(mapping.into_values().collect())
    }

    fn begin_edits(&mut self, description: &str) {
        self.history.begin(description);
    }

    fn end_edits(&mut self) {
        self.history.end();
    }

    fn drain_events(&mut self) -> Vec<GraphEvent> {
        std::mem::take(&mut self.events)
    }
}

/// Error when creating a connection
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConnectionError {
    /// Node not found
    #[error("Node not found: {0:?}")]
    NodeNotFound(NodeId),

    /// Input port not found on the target node
    #[error("Port not found: {0}")]
    PortNotFound(String),

    /// Endpoints live in different networks
    #[error("Nodes are in different networks")]
    DifferentNetworks,

    /// Output type not accepted by the input port
    #[error("Port {0} does not accept the output type")]
    IncompatiblePorts(String),

    /// Input port already has a connection
    #[error("Port {0} is already connected")]
    PortOccupied(String),

    /// Self-loop not allowed
    #[error("Self-loop not allowed")]
    SelfLoop,

    /// Connection would create a cycle
    #[error("Connection would create a cycle")]
    Cycle,
}

/// Error when naming a node
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvalidNameError {
    /// Name is empty
    #[error("Name cannot be empty")]
    Empty,

    /// Name contains invalid characters or is too long
    #[error("Name {0:?} is not a valid node name")]
    Malformed(String),

    /// Another node in the network has this name
    #[error("Name {0:?} is already in use")]
    Duplicate(String),
}

/// Error from a graph mutation
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GraphError {
    /// Node not found
    #[error("Node not found: {0:?}")]
    NodeNotFound(NodeId),

    /// No node at the given path
    #[error("No network at path {0}")]
    PathNotFound(String),

    /// The root network cannot be removed
    #[error("The root network cannot be removed")]
    CannotRemoveRoot,

    /// A node with this ID is already in the graph
    #[error("Node already exists: {0:?}")]
    DuplicateId(NodeId),

    /// A node declares the same input label twice
    #[error("Input port {0} is declared more than once")]
    DuplicatePort(String),

    /// Operation needs a node that lives inside a network
    #[error("Node {0:?} is not inside a network")]
    NotInNetwork(NodeId),

    /// Invalid name
    #[error(transparent)]
    InvalidName(#[from] InvalidNameError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::PortType;

    fn two_nodes() -> (Graph, NodeId, NodeId) {
        let mut graph = Graph::new("test");
        let root = graph.root();
        let a = graph.add_node(root, Node::new("a")).unwrap();
        let b = graph
            .add_node(
                root,
                Node::new("b").with_input(Port::any("in1")).with_input(Port::any("in2")),
            )
            .unwrap();
        graph.drain_events();
        (graph, a, b)
    }

    #[test]
    fn test_add_node_emits_child_added() {
        let mut graph = Graph::new("test");
        let root = graph.root();
        let id = graph.add_node(root, Node::new("rect")).unwrap();
        assert_eq!(graph.drain_events(), vec![GraphEvent::ChildAdded { parent: root, child: id }]);
        assert!(graph.drain_events().is_empty());
    }

    #[test]
    fn test_add_node_rejects_duplicate_name() {
        let (mut graph, _, _) = two_nodes();
        let root = graph.root();
        let err = graph.add_node(root, Node::new("a")).unwrap_err();
        assert_eq!(err, GraphError::InvalidName(InvalidNameError::Duplicate("a".into())));
    }

    #[test]
    fn test_connect_and_occupied_port() {
        let (mut graph, a, b) = two_nodes();
        let connection = graph.connect(a, b, "in2").unwrap();
        assert_eq!(connection, Connection::new(a, b, "in2"));
        assert_eq!(
            graph.drain_events(),
            vec![GraphEvent::ConnectionAdded { network: graph.root(), connection }]
        );

        let err = graph.connect(a, b, "in2").unwrap_err();
        assert_eq!(err, ConnectionError::PortOccupied("in2".into()));
        assert_eq!(graph.connection_count(), 1);
        assert!(graph.drain_events().is_empty());
    }

    #[test]
    fn test_connect_rejects_cycle_and_self_loop() {
        let (mut graph, a, b) = two_nodes();
        graph
            .set_input_ports(a, vec![Port::any("in")])
            .unwrap();
        graph.connect(a, b, "in1").unwrap();
        assert_eq!(graph.connect(b, a, "in"), Err(ConnectionError::Cycle));
        assert_eq!(graph.connect(a, a, "in"), Err(ConnectionError::SelfLoop));
    }

    #[test]
    fn test_connect_rejects_incompatible_type() {
        let mut graph = Graph::new("test");
        let root = graph.root();
        let color = graph
            .add_node(root, Node::new("color").with_output_type(PortType::Color))
            .unwrap();
        let shape = graph
            .add_node(root, Node::new("shape").with_input(Port::new("shape", PortType::Geometry)))
            .unwrap();
        assert_eq!(
            graph.connect(color, shape, "shape"),
            Err(ConnectionError::IncompatiblePorts("shape".into()))
        );
    }

    #[test]
    fn test_remove_node_cuts_connections() {
        let (mut graph, a, b) = two_nodes();
        graph.connect(a, b, "in1").unwrap();
        graph.set_rendered_node(a).unwrap();
        graph.drain_events();

        graph.remove_node(a).unwrap();
        let events = graph.drain_events();
        let root = graph.root();
        assert!(events.contains(&GraphEvent::ConnectionRemoved {
            network: root,
            connection: Connection::new(a, b, "in1"),
        }));
        assert!(events.contains(&GraphEvent::RenderedChildChanged { network: root, child: None }));
        assert_eq!(events.last(), Some(&GraphEvent::ChildRemoved { parent: root, child: a }));
        assert_eq!(graph.connection_count(), 0);
        assert_eq!(graph.history().last().map(|s| s.description.as_str()), Some("Remove Node"));
    }

    #[test]
    fn test_remove_root_fails() {
        let mut graph = Graph::new("test");
        assert_eq!(graph.remove_node(graph.root()), Err(GraphError::CannotRemoveRoot));
    }

    #[test]
    fn test_paths() {
        let mut graph = Graph::new("test");
        let root = graph.root();
        let net = graph.add_node(root, Node::new("net1")).unwrap();
        let inner = graph.add_node(net, Node::new("rect")).unwrap();
        assert_eq!(graph.network_path(inner).as_deref(), Some("/root/net1/rect"));
        assert_eq!(graph.resolve_path("/root/net1"), Some(net));
        assert_eq!(graph.resolve_path("/root"), Some(root));
        assert_eq!(graph.resolve_path("/root/missing"), None);
        assert_eq!(graph.resolve_path("/other"), None);

        graph.drain_events();
        graph.set_active_network("/root/net1").unwrap();
        assert_eq!(graph.active_network(), net);
        assert_eq!(graph.drain_events(), vec![GraphEvent::ActiveNetworkChanged { network: net }]);
        assert!(matches!(
            graph.set_active_network("/root/nope"),
            Err(GraphError::PathNotFound(_))
        ));
    }

    #[test]
    fn test_rename() {
        let (mut graph, a, _) = two_nodes();
        assert!(matches!(
            graph.set_node_name(a, "b"),
            Err(GraphError::InvalidName(InvalidNameError::Duplicate(_)))
        ));
        assert!(matches!(
            graph.set_node_name(a, "not valid"),
            Err(GraphError::InvalidName(InvalidNameError::Malformed(_)))
        ));
        graph.set_node_name(a, "alpha").unwrap();
        assert_eq!(graph.node(a).unwrap().name, "alpha");
        assert_eq!(
            graph.drain_events(),
            vec![GraphEvent::AttributeChanged { node: a, attribute: Attribute::Name }]
        );
    }

    #[test]
    fn test_unique_name() {
        let (graph, _, _) = two_nodes();
        let root = graph.root();
        assert_eq!(graph.unique_name(root, "c"), "c");
        assert_eq!(graph.unique_name(root, "a"), "a1");
    }

    #[test]
    fn test_paste_children_remaps_connections() {
        let (mut graph, a, b) = two_nodes();
        let connection = graph.connect(a, b, "in1").unwrap();
        let nodes = vec![graph.node(a).unwrap().clone(), graph.node(b).unwrap().clone()];
        graph.drain_events();
        let steps_before = graph.history().len();

        let root = graph.root();
        let copies = graph.paste_children(root, &nodes, &[connection]).unwrap();
        assert_eq!(copies.len(), 2);
        assert_eq!(graph.node(copies[0]).unwrap().name, "a1");
        assert_eq!(graph.node(copies[1]).unwrap().name, "b1");
        assert!(graph
            .all_connections()
            .contains(&Connection::new(copies[0], copies[1], "in1")));
        assert_eq!(graph.history().len(), steps_before + 1);
    }

    #[test]
    fn test_paste_children_repairs_names_and_skips_bad_ports() {
        let mut graph = Graph::new("test");
        let root = graph.root();
        let nodes = vec![
            Node::new("not valid!").with_input(Port::any("x")),
            Node::new(""),
            Node::new("twins").with_input(Port::any("x")).with_input(Port::any("x")),
        ];

        let copies = graph.paste_children(root, &nodes, &[]).unwrap();
        let names: Vec<&str> = copies
            .iter()
            .map(|id| graph.node(*id).unwrap().name.as_str())
            .collect();
        assert_eq!(names, ["node", "node1"]);
        assert!(names.iter().all(|name| validate_name(name).is_ok()));
        assert_eq!(graph.child_named(root, "twins"), None);
    }

    #[test]
    fn test_add_node_rejects_existing_id_and_repeated_ports() {
        let (mut graph, a, _) = two_nodes();
        let root = graph.root();

        let mut again = graph.node(a).unwrap().clone();
        again.name = "other".to_string();
        assert_eq!(graph.add_node(root, again), Err(GraphError::DuplicateId(a)));
        assert_eq!(graph.node(a).unwrap().name, "a");

        let twins = Node::new("twins").with_input(Port::any("x")).with_input(Port::any("x"));
        assert_eq!(
            graph.add_node(root, twins),
            Err(GraphError::DuplicatePort("x".to_string()))
        );
        assert_eq!(
            graph.set_input_ports(a, vec![Port::any("y"), Port::any("y")]),
            Err(GraphError::DuplicatePort("y".to_string()))
        );
    }

    #[test]
    fn test_error_aggregate() {
        let (mut graph, a, _) = two_nodes();
        let root = graph.root();
        assert!(!graph.has_error_in(root));
        graph.set_node_error(a, true).unwrap();
        assert!(graph.has_error_in(root));
        assert_eq!(graph.drain_events(), vec![GraphEvent::NodeUpdated { node: a }]);
        graph.set_node_error(a, true).unwrap();
        assert!(graph.drain_events().is_empty());
    }

    #[test]
    fn test_changing_ports_drops_stale_connections() {
        let (mut graph, a, b) = two_nodes();
        graph.connect(a, b, "in2").unwrap();
        graph.drain_events();
        graph.set_input_ports(b, vec![Port::any("in1")]).unwrap();
        assert_eq!(graph.connection_count(), 0);
        let events = graph.drain_events();
        assert_eq!(
            events.last(),
            Some(&GraphEvent::AttributeChanged { node: b, attribute: Attribute::Port })
        );
    }
}
