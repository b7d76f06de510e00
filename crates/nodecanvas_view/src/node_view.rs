// SPDX-License-Identifier: MIT OR Apache-2.0
//! Visual proxy for one node of the active network.

use crate::assets::{asset_table, IconAsset};
use crate::config::CanvasConfig;
use crate::geometry::{output_zone, port_offset, snap_pos};
use egui::{Pos2, Rect, Vec2};
use nodecanvas_graph::{Node, NodeId};

/// Icon composed from a node's image and its input port slots
#[derive(Debug, Clone, PartialEq)]
pub struct NodeIcon {
    /// Image drawn in the node body
    pub image: &'static IconAsset,
    /// Vertical offset of each input port slot, in declared order
    pub port_slots: Vec<f32>,
}

impl NodeIcon {
    /// Compose the icon for a node
    pub fn compose(node: &Node, config: &CanvasConfig) -> Self {
        let count = node.inputs.len();
        Self {
            image: asset_table().icon_for(node.image.as_deref()),
            port_slots: (0..count).map(|i| port_offset(i, count, config)).collect(),
        }
    }
}

/// Per-node view state
///
/// A view refers to its node by ID only. It keeps two positions: the true
/// position, which accumulates drag deltas exactly, and the rendered
/// position, which is the true position snapped to the grid. Deltas are
/// always applied to the true position so sub-grid motions add up instead
/// of being swallowed by snapping.
#[derive(Debug, Clone)]
pub struct NodeView {
    node: NodeId,
    true_pos: Pos2,
    rendered_pos: Pos2,
    grid_size: f32,
    selected: bool,
    code_changed: bool,
    icon: NodeIcon,
}

impl NodeView {
    /// Create a view for a node at the node's model position
    pub fn new(node: &Node, config: &CanvasConfig) -> Self {
        let mut view = Self {
            node: node.id,
            true_pos: Pos2::ZERO,
            rendered_pos: Pos2::ZERO,
            grid_size: config.grid_size,
            selected: false,
            code_changed: false,
            icon: NodeIcon::compose(node, config),
        };
        view.set_position(Pos2::new(node.position[0], node.position[1]));
        view
    }

    /// ID of the node this view shows
    pub fn node_id(&self) -> NodeId {
        self.node
    }

    /// Unsnapped position
    pub fn true_position(&self) -> Pos2 {
        self.true_pos
    }

    /// Snapped position used for display and hit-testing
    pub fn rendered_position(&self) -> Pos2 {
        self.rendered_pos
    }

    /// Store a true position and recompute the rendered one
    pub fn set_position(&mut self, pos: Pos2) {
        self.true_pos = pos;
        self.rendered_pos = snap_pos(pos, self.grid_size);
    }

    /// Move the true position by a delta
    pub fn translate(&mut self, delta: Vec2) {
        self.set_position(self.true_pos + delta);
    }

    /// Whether the view is drawn as selected
    pub fn is_selected(&self) -> bool {
        self.selected
    }

    /// Set the selected flag, returning whether it changed
    pub(crate) fn set_selected(&mut self, selected: bool) -> bool {
        let changed = self.selected != selected;
        self.selected = selected;
        changed
    }

    /// Whether the node's code has unsaved changes
    pub fn has_code_changed(&self) -> bool {
        self.code_changed
    }

    /// Set the code-changed flag, returning whether it changed
    pub fn set_code_changed(&mut self, changed: bool) -> bool {
        let was = self.code_changed;
        self.code_changed = changed;
        was != changed
    }

    /// Composed icon
    pub fn icon(&self) -> &NodeIcon {
        &self.icon
    }

    /// Recompose the icon after the node's ports or image changed
    pub fn update_icon(&mut self, node: &Node, config: &CanvasConfig) {
        self.icon = NodeIcon::compose(node, config);
    }

    /// Full bounds, label included
    pub fn bounds(&self, config: &CanvasConfig) -> Rect {
        Rect::from_min_size(
            self.rendered_pos,
            Vec2::new(config.node_size, config.node_height()),
        )
    }

    /// Check if a canvas point is inside the view
    pub fn contains(&self, pos: Pos2, config: &CanvasConfig) -> bool {
        self.bounds(config).contains(pos)
    }

    /// Check if a canvas point is inside the output hit-zone
    pub fn in_output_zone(&self, pos: Pos2, config: &CanvasConfig) -> bool {
        let local = (pos - self.rendered_pos).to_pos2();
        output_zone(config).contains(local)
    }

    /// Check if a canvas point is on the name label below the body
    pub fn in_label(&self, pos: Pos2, config: &CanvasConfig) -> bool {
        pos.y - self.rendered_pos.y > config.node_size - config.label_hit_margin
    }

    /// Point where outgoing connections start
    pub fn output_anchor(&self, config: &CanvasConfig) -> Pos2 {
        self.rendered_pos + Vec2::new(config.node_size, config.node_size / 2.0)
    }

    /// Point where a connection into the input at `index` ends
    pub fn input_anchor(&self, index: usize, config: &CanvasConfig) -> Option<Pos2> {
        let slot = self.icon.port_slots.get(index)?;
        Some(self.rendered_pos + Vec2::new(0.0, slot + config.port_height / 2.0))
    }
}
