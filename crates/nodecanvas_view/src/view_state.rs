// SPDX-License-Identifier: MIT OR Apache-2.0
//! Views of the active network and the selection.
//!
//! Every selection operation ignores IDs without a view and emits at most one
//! selection-changed notification, and none when nothing changed.

use crate::config::CanvasConfig;
use crate::geometry::distance_to_segment;
use crate::node_view::NodeView;
use crate::signals::{CanvasSignals, RepaintRequest};
use egui::{Pos2, Rect, Vec2};
use indexmap::{IndexMap, IndexSet};
use nodecanvas_graph::{Connection, GraphModel, NodeId};

/// Container of node views, selection and host listeners
#[derive(Debug, Default)]
pub struct ViewState {
    network: Option<NodeId>,
    views: IndexMap<NodeId, NodeView>,
    selection: IndexSet<NodeId>,
    selected_connections: IndexSet<Connection>,
    network_error: bool,
    config: CanvasConfig,
    signals: CanvasSignals,
}

impl ViewState {
    /// Create an empty view state
    pub fn new(config: CanvasConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Layout and hit-testing settings
    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    /// Listener registry
    pub fn signals_mut(&mut self) -> &mut CanvasSignals {
        &mut self.signals
    }

    /// Network whose children are shown
    pub fn network(&self) -> Option<NodeId> {
        self.network
    }

    pub(crate) fn set_network(&mut self, network: Option<NodeId>) {
        self.network = network;
    }

    /// Whether the network or any of its children is in error
    pub fn network_error(&self) -> bool {
        self.network_error
    }

    /// Store the aggregate error flag, returning whether it changed
    pub(crate) fn set_network_error(&mut self, has_error: bool) -> bool {
        let changed = self.network_error != has_error;
        self.network_error = has_error;
        changed
    }

    pub(crate) fn repaint(&mut self, request: RepaintRequest) {
        self.signals.emit_repaint(request);
    }

    // ===== Views =====

    /// Get the view of a node
    pub fn view(&self, id: NodeId) -> Option<&NodeView> {
        self.views.get(&id)
    }

    /// Get the view of a node mutably
    pub fn view_mut(&mut self, id: NodeId) -> Option<&mut NodeView> {
        self.views.get_mut(&id)
    }

    /// All views, bottom to top
    pub fn views(&self) -> impl Iterator<Item = &NodeView> {
        self.views.values()
    }

    /// Number of views
    pub fn view_count(&self) -> usize {
        self.views.len()
    }

    /// Topmost view containing a canvas point
    pub fn view_at(&self, pos: Pos2) -> Option<NodeId> {
        self.views
            .values()
            .rev()
            .find(|view| view.contains(pos, &self.config))
            .map(NodeView::node_id)
    }

    /// Add a view, returning false if the node already has one
    pub(crate) fn insert_view(&mut self, view: NodeView) -> bool {
        let id = view.node_id();
        if self.views.contains_key(&id) {
            return false;
        }
        self.views.insert(id, view);
        self.repaint(RepaintRequest::Node(id));
        true
    }

    /// Remove a view together with its selection state
    pub(crate) fn remove_view(&mut self, id: NodeId) -> Option<NodeView> {
        let view = self.views.shift_remove(&id)?;
        if self.selection.shift_remove(&id) {
            self.notify_selection();
        }
        self.selected_connections
            .retain(|connection| !connection.involves_node(id));
        self.repaint(RepaintRequest::ConnectionLayer);
        Some(view)
    }

    /// Drop every view, the selection and the connection selection
    pub(crate) fn clear(&mut self) {
        self.views.clear();
        self.selected_connections.clear();
        if !self.selection.is_empty() {
            self.selection.clear();
            self.notify_selection();
        }
    }

    /// Move every selected view by the same delta
    pub fn drag_selection(&mut self, delta: Vec2) -> usize {
        let ids: Vec<NodeId> = self.selection.iter().copied().collect();
        for id in &ids {
            if let Some(view) = self.views.get_mut(id) {
                view.translate(delta);
            }
            self.repaint(RepaintRequest::Node(*id));
        }
        if !ids.is_empty() {
            self.repaint(RepaintRequest::ConnectionLayer);
        }
        ids.len()
    }

    /// True positions of the selected views
    pub(crate) fn selection_positions(&self) -> IndexMap<NodeId, Pos2> {
        self.selection
            .iter()
            .filter_map(|id| Some((*id, self.views.get(id)?.true_position())))
            .collect()
    }

    /// Put views back at previously recorded true positions
    pub(crate) fn restore_positions(&mut self, positions: &IndexMap<NodeId, Pos2>) {
        for (id, pos) in positions {
            if let Some(view) = self.views.get_mut(id) {
                view.set_position(*pos);
                self.repaint(RepaintRequest::Node(*id));
            }
        }
        if !positions.is_empty() {
            self.repaint(RepaintRequest::ConnectionLayer);
        }
    }

    // ===== Selection =====

    /// Check if a node is selected
    pub fn is_selected(&self, id: NodeId) -> bool {
        self.selection.contains(&id)
    }

    /// Selected nodes in selection order
    pub fn selection(&self) -> &IndexSet<NodeId> {
        &self.selection
    }

    /// Selected node IDs in selection order
    pub fn selected_ids(&self) -> Vec<NodeId> {
        self.selection.iter().copied().collect()
    }

    /// Add a node's view to the selection
    pub fn select_node(&mut self, id: NodeId) {
        self.add_to_selection(id);
    }

    /// Make a node the only selected one
    pub fn single_select(&mut self, id: NodeId) {
        if !self.views.contains_key(&id) {
            return;
        }
        if self.selection.len() == 1 && self.selection.contains(&id) {
            return;
        }
        for selected in std::mem::take(&mut self.selection) {
            self.set_flag(selected, false);
        }
        self.deselect_connections();
        self.selection.insert(id);
        self.set_flag(id, true);
        self.notify_selection();
    }

    /// Replace the selection
    pub fn select(&mut self, ids: impl IntoIterator<Item = NodeId>) {
        let target: IndexSet<NodeId> = ids
            .into_iter()
            .filter(|id| self.views.contains_key(id))
            .collect();
        let unchanged = target.len() == self.selection.len()
            && target.iter().all(|id| self.selection.contains(id));
        if unchanged {
            return;
        }
        let previous = std::mem::replace(&mut self.selection, target);
        for id in previous {
            self.set_flag(id, false);
        }
        let current: Vec<NodeId> = self.selection.iter().copied().collect();
        for id in current {
            self.set_flag(id, true);
        }
        self.notify_selection();
    }

    /// Add a node to the selection
    pub fn add_to_selection(&mut self, id: NodeId) {
        if !self.views.contains_key(&id) || !self.selection.insert(id) {
            return;
        }
        self.set_flag(id, true);
        self.notify_selection();
    }

    /// Add several nodes to the selection
    pub fn add_all_to_selection(&mut self, ids: impl IntoIterator<Item = NodeId>) {
        let mut changed = false;
        for id in ids {
            if self.views.contains_key(&id) && self.selection.insert(id) {
                self.set_flag(id, true);
                changed = true;
            }
        }
        if changed {
            self.notify_selection();
        }
    }

    /// Remove a node from the selection
    pub fn deselect(&mut self, id: NodeId) {
        if !self.selection.shift_remove(&id) {
            return;
        }
        self.set_flag(id, false);
        self.notify_selection();
    }

    /// Select every view
    pub fn select_all(&mut self) {
        let all: Vec<NodeId> = self.views.keys().copied().collect();
        self.select(all);
    }

    /// Clear the node and connection selection
    pub fn deselect_all(&mut self) {
        self.deselect_connections();
        if self.selection.is_empty() {
            return;
        }
        for id in std::mem::take(&mut self.selection) {
            self.set_flag(id, false);
        }
        self.notify_selection();
    }

    /// Mark views inside a rectangle as selected without committing them
    ///
    /// Membership is computed from scratch for every view. Returns the views
    /// that intersect the rectangle.
    pub(crate) fn preview_selection(&mut self, rect: Rect) -> IndexSet<NodeId> {
        let mut hits = IndexSet::new();
        let config = &self.config;
        for view in self.views.values_mut() {
            let inside = view.bounds(config).intersects(rect);
            if inside {
                hits.insert(view.node_id());
            }
            if view.set_selected(inside) {
                self.signals.emit_repaint(RepaintRequest::Node(view.node_id()));
            }
        }
        hits
    }

    /// Reset every view's flag to the committed selection
    pub(crate) fn restore_selection_flags(&mut self) {
        let ids: Vec<NodeId> = self.views.keys().copied().collect();
        for id in ids {
            let selected = self.selection.contains(&id);
            self.set_flag(id, selected);
        }
    }

    fn set_flag(&mut self, id: NodeId, selected: bool) {
        let changed = self
            .views
            .get_mut(&id)
            .is_some_and(|view| view.set_selected(selected));
        if changed {
            self.repaint(RepaintRequest::Node(id));
        }
    }

    fn notify_selection(&mut self) {
        let ids = self.selected_ids();
        self.signals.emit_selection_changed(&ids);
    }

    // ===== Connections =====

    /// Selected connections
    pub fn selected_connections(&self) -> &IndexSet<Connection> {
        &self.selected_connections
    }

    /// Select a connection in the connection layer
    pub fn select_connection(&mut self, connection: Connection) {
        if self.selected_connections.insert(connection) {
            self.repaint(RepaintRequest::ConnectionLayer);
        }
    }

    /// Drop a removed connection from the connection-layer selection
    pub(crate) fn forget_connection(&mut self, connection: &Connection) {
        if self.selected_connections.shift_remove(connection) {
            self.repaint(RepaintRequest::ConnectionLayer);
        }
    }

    /// Clear the connection-layer selection
    pub fn deselect_connections(&mut self) {
        if !self.selected_connections.is_empty() {
            self.selected_connections.clear();
            self.repaint(RepaintRequest::ConnectionLayer);
        }
    }

    /// Start and end points of a connection between two shown nodes
    pub fn connection_endpoints<M: GraphModel>(
        &self,
        connection: &Connection,
        model: &M,
    ) -> Option<(Pos2, Pos2)> {
        let output = self.views.get(&connection.output_node)?;
        let input = self.views.get(&connection.input_node)?;
        let index = model
            .node(connection.input_node)?
            .input_index(&connection.input_port)?;
        Some((
            output.output_anchor(&self.config),
            input.input_anchor(index, &self.config)?,
        ))
    }

    /// Connection of the shown network passing near a canvas point
    pub fn connection_at<M: GraphModel>(&self, pos: Pos2, model: &M) -> Option<Connection> {
        let network = self.network?;
        let tolerance = self.config.connection_hit_tolerance;
        model
            .connections(network)
            .into_iter()
            .filter_map(|connection| {
                let (start, end) = self.connection_endpoints(&connection, model)?;
                let distance = distance_to_segment(pos, start, end);
                (distance <= tolerance).then_some((connection, distance))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(connection, _)| connection)
    }
}
