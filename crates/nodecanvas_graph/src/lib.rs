// SPDX-License-Identifier: MIT OR Apache-2.0
//! Graph model for the node canvas.
//!
//! This crate holds the authoritative side of the canvas:
//! - Nodes with ordered input ports and a single implicit output
//! - Connections from an output to one input port
//! - The [`GraphModel`] interface the canvas queries and mutates
//! - [`GraphEvent`] change notifications
//!
//! ## Architecture
//!
//! [`Graph`] is an in-memory implementation that validates connections
//! (type compatibility, occupied ports, cycles), keeps a tree of networks
//! and queues a notification for every change. Edits can be grouped so an
//! undo system sees one step per user action.

pub mod node;
pub mod port;
pub mod connection;
pub mod event;
pub mod model;
pub mod graph;
pub mod history;

pub use node::{Node, NodeId};
pub use port::{Port, PortType};
pub use connection::Connection;
pub use event::{Attribute, GraphEvent};
pub use model::GraphModel;
pub use graph::{ConnectionError, Graph, GraphError, InvalidNameError};
pub use history::{EditGroup, EditLog};
