// SPDX-License-Identifier: MIT OR Apache-2.0
//! Applying model notifications to the views.
//!
//! Each notification updates only what it names. Switching the active
//! network is the one case that rebuilds every view.

use crate::drag::DragController;
use crate::node_view::NodeView;
use crate::signals::RepaintRequest;
use crate::view_state::ViewState;
use egui::Pos2;
use nodecanvas_graph::{Attribute, GraphEvent, GraphModel, NodeId};

/// Keeps [`ViewState`] consistent with a [`GraphModel`]
pub struct SyncAdapter<'a, M: GraphModel> {
    view: &'a mut ViewState,
    drag: &'a mut DragController,
    model: &'a M,
}

impl<'a, M: GraphModel> SyncAdapter<'a, M> {
    /// Create an adapter over borrowed canvas parts
    pub fn new(view: &'a mut ViewState, drag: &'a mut DragController, model: &'a M) -> Self {
        Self { view, drag, model }
    }

    /// Apply one notification
    pub fn apply(&mut self, event: &GraphEvent) {
        match event {
            GraphEvent::ChildAdded { parent, child } => {
                if !self.is_shown(*parent) {
                    return;
                }
                if let Some(node) = self.model.node(*child) {
                    let node_view = NodeView::new(node, self.view.config());
                    if !self.view.insert_view(node_view) {
                        tracing::debug!("View for {} already exists", node.name);
                    }
                }
            }
            GraphEvent::ChildRemoved { parent, child } => {
                if !self.is_shown(*parent) {
                    return;
                }
                self.drag.forget_node(*child);
                self.view.remove_view(*child);
            }
            GraphEvent::AttributeChanged { node, attribute } => {
                self.attribute_changed(*node, *attribute);
            }
            GraphEvent::ConnectionAdded { network, .. } => {
                if self.is_shown(*network) {
                    self.view.repaint(RepaintRequest::ConnectionLayer);
                }
            }
            GraphEvent::ConnectionRemoved {
                network,
                connection,
            } => {
                if self.is_shown(*network) {
                    self.view.forget_connection(connection);
                    self.view.repaint(RepaintRequest::ConnectionLayer);
                }
            }
            GraphEvent::RenderedChildChanged { network, .. } => {
                if self.is_shown(*network) {
                    self.view.repaint(RepaintRequest::Network);
                }
            }
            GraphEvent::NodeUpdated { node } => {
                let Some(network) = self.view.network() else {
                    return;
                };
                if *node != network && self.model.parent(*node) != Some(network) {
                    return;
                }
                if self.view.set_network_error(self.model.has_error_in(network)) {
                    self.view.repaint(RepaintRequest::Network);
                }
            }
            GraphEvent::ActiveNetworkChanged { network } => {
                self.rebuild(*network);
            }
        }
    }

    /// Apply notifications in order
    pub fn apply_all(&mut self, events: &[GraphEvent]) {
        for event in events {
            self.apply(event);
        }
    }

    /// Recreate every view for a network
    pub fn rebuild(&mut self, network: NodeId) {
        self.drag.reset();
        self.view.clear();
        self.view.set_network(Some(network));
        for child in self.model.children(network) {
            if let Some(node) = self.model.node(child) {
                self.view.insert_view(NodeView::new(node, self.view.config()));
            }
        }
        self.view.set_network_error(self.model.has_error_in(network));
        self.view.repaint(RepaintRequest::Network);
        tracing::info!(
            "Showing network {} with {} node(s)",
            self.model.network_path(network).unwrap_or_default(),
            self.view.view_count()
        );
    }

    fn is_shown(&self, network: NodeId) -> bool {
        self.view.network() == Some(network)
    }

    fn attribute_changed(&mut self, id: NodeId, attribute: Attribute) {
        let model = self.model;
        let Some(node) = model.node(id) else {
            return;
        };
        let config = self.view.config().clone();
        let Some(node_view) = self.view.view_mut(id) else {
            return;
        };
        match attribute {
            Attribute::Port => {
                node_view.update_icon(node, &config);
                self.view.repaint(RepaintRequest::Node(id));
                self.view.repaint(RepaintRequest::ConnectionLayer);
            }
            Attribute::Image => {
                node_view.update_icon(node, &config);
                self.view.repaint(RepaintRequest::Node(id));
            }
            Attribute::Name => {
                self.view.repaint(RepaintRequest::Node(id));
            }
            Attribute::Position => {
                let model_pos = Pos2::new(node.position[0], node.position[1]);
                if node_view.true_position() != model_pos {
                    node_view.set_position(model_pos);
                }
                self.view.repaint(RepaintRequest::Node(id));
                self.view.repaint(RepaintRequest::ConnectionLayer);
            }
        }
    }
}
