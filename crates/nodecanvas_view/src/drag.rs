// SPDX-License-Identifier: MIT OR Apache-2.0
//! Pointer gesture state machine.
//!
//! A gesture starts on a primary press and ends on release or Escape:
//! - Press in a node's output zone starts a connection drag
//! - Press elsewhere on a node starts a node drag
//! - Press on empty canvas starts rubber-band selection
//!
//! Only one gesture is active at a time.

use crate::error::CanvasError;
use crate::geometry::span_rect;
use crate::port_resolver::{resolve, PortChoice, PortResolution, PortResolver};
use crate::signals::RepaintRequest;
use crate::view_state::ViewState;
use egui::{Pos2, Vec2};
use indexmap::{IndexMap, IndexSet};
use nodecanvas_graph::{Connection, GraphModel, NodeId};

/// Edit group name used when dragged positions are written back
pub const MOVE_NODES: &str = "Move Nodes";

/// Pointer button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    /// Left button or touch
    Primary,
    /// Right button
    Secondary,
    /// Wheel button
    Middle,
}

/// Keyboard command understood by the canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    /// Abort the current gesture
    Escape,
    /// Delete the selected nodes and connections
    Delete,
    /// Open the parent network
    GoUp,
    /// Open the selected node as a network
    GoDown,
    /// Select every node
    SelectAll,
}

/// Input delivered to the canvas, positions in canvas coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CanvasEvent {
    /// A button went down
    Press {
        /// Pointer position
        pos: Pos2,
        /// Pressed button
        button: PointerButton,
    },
    /// The pointer moved
    Move {
        /// Pointer position
        pos: Pos2,
    },
    /// A button went up
    Release {
        /// Pointer position
        pos: Pos2,
        /// Released button
        button: PointerButton,
    },
    /// A press and release without movement
    Click {
        /// Pointer position
        pos: Pos2,
        /// 1 for a single click, 2 for a double click
        count: u32,
        /// Clicked button
        button: PointerButton,
    },
    /// A key command
    Key(KeyCommand),
}

/// Current pointer gesture
#[derive(Debug, Clone, Default, PartialEq)]
pub enum DragState {
    /// No gesture
    #[default]
    Idle,
    /// Moving the selected nodes
    DraggingNodes {
        /// Press position
        anchor: Pos2,
        /// Last pointer position
        last: Pos2,
        /// True positions of the dragged views at press time
        origins: IndexMap<NodeId, Pos2>,
    },
    /// Dragging a new connection out of a node's output
    DraggingConnection {
        /// Node whose output is dragged
        source: NodeId,
        /// Pointer position
        pointer: Pos2,
        /// Node under the pointer, never the source
        target: Option<NodeId>,
    },
    /// Selecting with a rectangle
    RubberBandSelecting {
        /// Press position
        anchor: Pos2,
        /// Pointer position
        current: Pos2,
        /// Views inside the rectangle, not yet committed
        temporary: IndexSet<NodeId>,
    },
}

impl DragState {
    /// Check if no gesture is active
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}

/// Result of finishing a gesture
#[derive(Debug, Clone, PartialEq)]
pub enum GestureOutcome {
    /// The gesture had no effect
    Nothing,
    /// Positions of this many nodes were written back
    NodesMoved(usize),
    /// A connection was made
    Connected(Connection),
    /// The model refused the connection
    ConnectionRejected(CanvasError),
    /// The user has to pick the input port
    PortChoice(PortChoice),
    /// The rubber band selection was committed
    SelectionCommitted(usize),
    /// Escape aborted the gesture
    Cancelled,
}

/// Drives [`DragState`] from pointer input
#[derive(Debug, Default)]
pub struct DragController {
    state: DragState,
}

impl DragController {
    /// Create an idle controller
    pub fn new() -> Self {
        Self::default()
    }

    /// Current gesture
    pub fn state(&self) -> &DragState {
        &self.state
    }

    /// Begin a gesture
    pub fn press(&mut self, pos: Pos2, button: PointerButton, view: &mut ViewState) {
        if button != PointerButton::Primary || !self.state.is_idle() {
            return;
        }

        let Some(id) = view.view_at(pos) else {
            tracing::debug!("Rubber band started at {:?}", pos);
            self.state = DragState::RubberBandSelecting {
                anchor: pos,
                current: pos,
                temporary: IndexSet::new(),
            };
            return;
        };

        let in_output = view
            .view(id)
            .is_some_and(|node_view| node_view.in_output_zone(pos, view.config()));
        if in_output {
            tracing::debug!("Connection drag started from {:?}", id);
            self.state = DragState::DraggingConnection {
                source: id,
                pointer: pos,
                target: None,
            };
            view.repaint(RepaintRequest::ConnectionLayer);
        } else {
            if !view.is_selected(id) {
                view.single_select(id);
            }
            tracing::debug!("Node drag started with {} node(s)", view.selection().len());
            self.state = DragState::DraggingNodes {
                anchor: pos,
                last: pos,
                origins: view.selection_positions(),
            };
        }
    }

    /// Update the gesture with a new pointer position
    pub fn pointer_moved(&mut self, pos: Pos2, view: &mut ViewState) {
        match &mut self.state {
            DragState::Idle => {}
            DragState::DraggingNodes { last, .. } => {
                let delta = pos - *last;
                *last = pos;
                if delta != Vec2::ZERO {
                    view.drag_selection(delta);
                }
            }
            DragState::DraggingConnection {
                source,
                pointer,
                target,
            } => {
                *pointer = pos;
                let hit = view.view_at(pos).filter(|id| *id != *source);
                if hit != *target {
                    if let Some(old) = target.take() {
                        view.repaint(RepaintRequest::Node(old));
                    }
                    if let Some(new) = hit {
                        view.repaint(RepaintRequest::Node(new));
                    }
                    *target = hit;
                }
                view.repaint(RepaintRequest::ConnectionLayer);
            }
            DragState::RubberBandSelecting {
                anchor,
                current,
                temporary,
            } => {
                *current = pos;
                *temporary = view.preview_selection(span_rect(*anchor, pos));
                view.repaint(RepaintRequest::Network);
            }
        }
    }

    /// Finish the gesture
    pub fn release<M: GraphModel>(
        &mut self,
        pos: Pos2,
        button: PointerButton,
        view: &mut ViewState,
        model: &mut M,
        resolver: &dyn PortResolver,
    ) -> GestureOutcome {
        if button != PointerButton::Primary {
            return GestureOutcome::Nothing;
        }
        self.pointer_moved(pos, view);

        match std::mem::take(&mut self.state) {
            DragState::Idle => GestureOutcome::Nothing,
            DragState::DraggingNodes { anchor, last, .. } => {
                if anchor == last {
                    return GestureOutcome::Nothing;
                }
                GestureOutcome::NodesMoved(write_back_positions(view, model))
            }
            DragState::DraggingConnection { source, target, .. } => {
                view.repaint(RepaintRequest::ConnectionLayer);
                let Some(target) = target else {
                    tracing::debug!("Connection drag released over nothing");
                    return GestureOutcome::Nothing;
                };
                view.repaint(RepaintRequest::Node(target));
                let (Some(output), Some(input)) = (model.node(source), model.node(target)) else {
                    return GestureOutcome::Nothing;
                };
                match resolve(resolver, output, input) {
                    PortResolution::NoPort => {
                        tracing::debug!("{} has no compatible input for {}", input.name, output.name);
                        GestureOutcome::Nothing
                    }
                    PortResolution::Single(port) => {
                        match request_connection(view, model, source, target, &port) {
                            Ok(connection) => GestureOutcome::Connected(connection),
                            Err(err) => GestureOutcome::ConnectionRejected(err),
                        }
                    }
                    PortResolution::Choose(choice) => GestureOutcome::PortChoice(choice),
                }
            }
            DragState::RubberBandSelecting { temporary, .. } => {
                let count = temporary.len();
                view.deselect_connections();
                view.select(temporary);
                view.repaint(RepaintRequest::Network);
                GestureOutcome::SelectionCommitted(count)
            }
        }
    }

    /// Abort the gesture without touching the model
    pub fn cancel(&mut self, view: &mut ViewState) -> GestureOutcome {
        match std::mem::take(&mut self.state) {
            DragState::Idle => return GestureOutcome::Nothing,
            DragState::DraggingNodes { origins, .. } => {
                view.restore_positions(&origins);
            }
            DragState::DraggingConnection { target, .. } => {
                if let Some(target) = target {
                    view.repaint(RepaintRequest::Node(target));
                }
                view.repaint(RepaintRequest::ConnectionLayer);
            }
            DragState::RubberBandSelecting { .. } => {
                view.restore_selection_flags();
                view.repaint(RepaintRequest::Network);
            }
        }
        tracing::debug!("Gesture cancelled");
        GestureOutcome::Cancelled
    }

    /// Drop every reference to a removed node
    pub fn forget_node(&mut self, id: NodeId) {
        match &mut self.state {
            DragState::DraggingConnection { source, .. } if *source == id => {
                self.state = DragState::Idle;
            }
            DragState::DraggingConnection { target, .. } => {
                if *target == Some(id) {
                    *target = None;
                }
            }
            DragState::RubberBandSelecting { temporary, .. } => {
                temporary.shift_remove(&id);
            }
            DragState::DraggingNodes { origins, .. } => {
                origins.shift_remove(&id);
            }
            DragState::Idle => {}
        }
    }

    /// Return to idle without side effects
    pub fn reset(&mut self) {
        self.state = DragState::Idle;
    }
}

/// Write the true position of every selected view back to the model
fn write_back_positions<M: GraphModel>(view: &ViewState, model: &mut M) -> usize {
    model.begin_edits(MOVE_NODES);
    let mut moved = 0;
    for id in view.selection() {
        let Some(node_view) = view.view(*id) else {
            continue;
        };
        let pos = node_view.true_position();
        match model.set_node_position(*id, [pos.x, pos.y]) {
            Ok(()) => moved += 1,
            Err(err) => tracing::warn!("Failed to store position of {:?}: {}", id, err),
        }
    }
    model.end_edits();
    tracing::debug!("Moved {} node(s)", moved);
    moved
}

/// Ask the model for a connection, reporting a refusal once
pub(crate) fn request_connection<M: GraphModel>(
    view: &mut ViewState,
    model: &mut M,
    output: NodeId,
    input: NodeId,
    port: &str,
) -> Result<Connection, CanvasError> {
    match model.connect(output, input, port) {
        Ok(connection) => {
            tracing::debug!("Connected into port {}", port);
            Ok(connection)
        }
        Err(err) => {
            let err = CanvasError::from(err);
            tracing::warn!("{}", err);
            view.signals_mut().emit_error(&err);
            Err(err)
        }
    }
}
