// SPDX-License-Identifier: MIT OR Apache-2.0
//! Change notifications emitted by a graph model.

use crate::connection::Connection;
use crate::node::NodeId;

/// Node attribute whose change is reported individually
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    /// Input ports were added, removed or reordered
    Port,
    /// Name changed
    Name,
    /// Icon image changed
    Image,
    /// Position changed
    Position,
}

/// A single change notification
///
/// Events are queued by the model in the order the mutations happened and
/// handed out by [`crate::GraphModel::drain_events`].
#[derive(Debug, Clone, PartialEq)]
pub enum GraphEvent {
    /// A child node was added to a network
    ChildAdded {
        /// Network the child was added to
        parent: NodeId,
        /// The new child
        child: NodeId,
    },
    /// A child node was removed from a network
    ChildRemoved {
        /// Network the child was removed from
        parent: NodeId,
        /// The removed child
        child: NodeId,
    },
    /// A node attribute changed
    AttributeChanged {
        /// Changed node
        node: NodeId,
        /// Which attribute changed
        attribute: Attribute,
    },
    /// A connection was made inside a network
    ConnectionAdded {
        /// Network containing both endpoints
        network: NodeId,
        /// The new connection
        connection: Connection,
    },
    /// A connection was removed from a network
    ConnectionRemoved {
        /// Network containing both endpoints
        network: NodeId,
        /// The removed connection
        connection: Connection,
    },
    /// A network's rendered child changed
    RenderedChildChanged {
        /// The network
        network: NodeId,
        /// New rendered child
        child: Option<NodeId>,
    },
    /// A node's error state changed
    NodeUpdated {
        /// The node
        node: NodeId,
    },
    /// The network shown for editing changed
    ActiveNetworkChanged {
        /// The new active network
        network: NodeId,
    },
}
