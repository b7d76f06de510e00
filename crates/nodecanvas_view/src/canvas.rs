// SPDX-License-Identifier: MIT OR Apache-2.0
//! The canvas facade.
//!
//! [`NetworkCanvas`] owns a graph model and everything needed to present and
//! edit its active network. Input goes in through
//! [`NetworkCanvas::handle_event`]; model notifications are drained and
//! applied by [`NetworkCanvas::pump`], which every mutating operation calls
//! before returning.

use crate::camera::Camera;
use crate::clipboard::Clipboard;
use crate::commands::{network_menu, node_menu, CanvasCommand, CommandOutcome, MenuItem};
use crate::config::CanvasConfig;
use crate::drag::{
    request_connection, CanvasEvent, DragController, DragState, GestureOutcome, KeyCommand,
    PointerButton,
};
use crate::error::{CanvasError, Result};
use crate::port_resolver::{AllInputs, PortChoice, PortResolver, TypeChecked};
use crate::signals::{CanvasSignals, RepaintRequest};
use crate::sync::SyncAdapter;
use crate::view_state::ViewState;
use egui::{Pos2, Rect};
use nodecanvas_graph::{Connection, GraphError, GraphEvent, GraphModel, NodeId};

/// Edit group name used when deleting the selection
pub const DELETE_NODES: &str = "Delete Nodes";

/// Edit group name used when cutting the selection
pub const CUT_NODES: &str = "Cut";

/// Result of handling one input event
#[derive(Debug, Clone, PartialEq)]
pub enum EventOutcome {
    /// Nothing for the host to do
    Nothing,
    /// A gesture finished
    Gesture(GestureOutcome),
    /// A command ran
    Command(CommandOutcome),
}

/// Interactive view of a graph model's active network
pub struct NetworkCanvas<M: GraphModel> {
    model: M,
    view: ViewState,
    drag: DragController,
    camera: Camera,
    resolver: Box<dyn PortResolver>,
    clipboard: Clipboard,
    pending_choice: Option<PortChoice>,
}

impl<M: GraphModel> NetworkCanvas<M> {
    /// Create a canvas showing the model's active network
    pub fn new(mut model: M, config: CanvasConfig) -> Self {
        let resolver: Box<dyn PortResolver> = if config.type_checked_ports {
            Box::new(TypeChecked)
        } else {
            Box::new(AllInputs)
        };
        // Everything queued so far is covered by the rebuild
        model.drain_events();

        let mut canvas = Self {
            model,
            view: ViewState::new(config),
            drag: DragController::new(),
            camera: Camera::new(),
            resolver,
            clipboard: Clipboard::default(),
            pending_choice: None,
        };
        let network = canvas.model.active_network();
        canvas.sync().rebuild(network);
        canvas
    }

    /// Replace the port resolver
    pub fn with_resolver(mut self, resolver: impl PortResolver + 'static) -> Self {
        self.resolver = Box::new(resolver);
        self
    }

    /// The graph model
    pub fn model(&self) -> &M {
        &self.model
    }

    /// The graph model, mutably
    ///
    /// Call [`Self::pump`] after mutating it directly.
    pub fn model_mut(&mut self) -> &mut M {
        &mut self.model
    }

    /// Views and selection
    pub fn view(&self) -> &ViewState {
        &self.view
    }

    /// Views and selection, mutably
    pub fn view_mut(&mut self) -> &mut ViewState {
        &mut self.view
    }

    /// Listener registry
    pub fn signals_mut(&mut self) -> &mut CanvasSignals {
        self.view.signals_mut()
    }

    /// Current pointer gesture
    pub fn drag_state(&self) -> &DragState {
        self.drag.state()
    }

    /// Pan and zoom
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Pan and zoom, mutably
    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    /// Zoom by wheel steps around a screen position
    pub fn zoom_about(&mut self, screen_pos: Pos2, rect: Rect, steps: f32) {
        let config = self.view.config();
        let (min, max) = (config.min_zoom, config.max_zoom);
        self.camera.zoom_about(screen_pos, rect, steps, min, max);
        self.view.repaint(RepaintRequest::Network);
    }

    /// Port choice waiting for [`Self::choose_port`]
    pub fn pending_choice(&self) -> Option<&PortChoice> {
        self.pending_choice.as_ref()
    }

    /// Current clipboard
    pub fn clipboard(&self) -> &Clipboard {
        &self.clipboard
    }

    fn sync(&mut self) -> SyncAdapter<'_, M> {
        SyncAdapter::new(&mut self.view, &mut self.drag, &self.model)
    }

    /// Apply queued model notifications, returning how many were applied
    pub fn pump(&mut self) -> usize {
        let events = self.model.drain_events();
        self.sync().apply_all(&events);

        let network_changed = events
            .iter()
            .any(|event| matches!(event, GraphEvent::ActiveNetworkChanged { .. }));
        let stale = self.pending_choice.as_ref().is_some_and(|choice| {
            network_changed
                || self.model.node(choice.output).is_none()
                || self.model.node(choice.input).is_none()
        });
        if stale {
            tracing::debug!("Dropping port choice for a node no longer shown");
            self.pending_choice = None;
        }
        events.len()
    }

    /// Handle one input event
    pub fn handle_event(&mut self, event: CanvasEvent) -> EventOutcome {
        let outcome = match event {
            CanvasEvent::Press { pos, button } => {
                self.drag.press(pos, button, &mut self.view);
                EventOutcome::Nothing
            }
            CanvasEvent::Move { pos } => {
                self.drag.pointer_moved(pos, &mut self.view);
                EventOutcome::Nothing
            }
            CanvasEvent::Release { pos, button } => {
                let outcome = self.drag.release(
                    pos,
                    button,
                    &mut self.view,
                    &mut self.model,
                    self.resolver.as_ref(),
                );
                match outcome {
                    GestureOutcome::Nothing => EventOutcome::Nothing,
                    GestureOutcome::PortChoice(choice) => {
                        self.pending_choice = Some(choice.clone());
                        EventOutcome::Gesture(GestureOutcome::PortChoice(choice))
                    }
                    other => EventOutcome::Gesture(other),
                }
            }
            CanvasEvent::Click { pos, count, button } => self.click(pos, count, button),
            CanvasEvent::Key(key) => self.key(key),
        };
        self.pump();
        outcome
    }

    fn click(&mut self, pos: Pos2, count: u32, button: PointerButton) -> EventOutcome {
        if button != PointerButton::Primary {
            return EventOutcome::Nothing;
        }
        let Some(id) = self.view.view_at(pos) else {
            if count == 1 {
                self.view.deselect_all();
                if let Some(connection) = self.view.connection_at(pos, &self.model) {
                    self.view.select_connection(connection);
                }
            }
            return EventOutcome::Nothing;
        };

        if count == 1 {
            self.view.single_select(id);
            return EventOutcome::Nothing;
        }
        let on_label = self
            .view
            .view(id)
            .is_some_and(|node_view| node_view.in_label(pos, self.view.config()));
        let command = if on_label {
            CanvasCommand::Rename(id)
        } else {
            CanvasCommand::SetRendered(id)
        };
        match self.execute(command) {
            Ok(outcome) => EventOutcome::Command(outcome),
            Err(_) => EventOutcome::Nothing,
        }
    }

    fn key(&mut self, key: KeyCommand) -> EventOutcome {
        let result = match key {
            KeyCommand::Escape => {
                self.pending_choice = None;
                return match self.drag.cancel(&mut self.view) {
                    GestureOutcome::Nothing => EventOutcome::Nothing,
                    other => EventOutcome::Gesture(other),
                };
            }
            KeyCommand::Delete => self.delete_selected().map(|_| ()),
            KeyCommand::GoUp => self.go_up(),
            KeyCommand::GoDown => self.go_down(),
            KeyCommand::SelectAll => {
                self.view.select_all();
                Ok(())
            }
        };
        if let Err(err) = result {
            tracing::debug!("{:?} ignored: {}", key, err);
        }
        EventOutcome::Nothing
    }

    /// Menu for the node at a position, or the network menu on empty canvas
    pub fn context_menu(&self, pos: Pos2) -> Vec<MenuItem> {
        match self.view.view_at(pos) {
            Some(id) => node_menu(id),
            None => network_menu(),
        }
    }

    /// Connect the pending choice's output to the port at `index`
    pub fn choose_port(&mut self, index: usize) -> Result<Connection> {
        let choice = self.pending_choice.take().ok_or(CanvasError::NoPendingChoice)?;
        let Some(CanvasCommand::Connect {
            output,
            input,
            port,
        }) = choice.command(index).cloned()
        else {
            let len = choice.len();
            self.pending_choice = Some(choice);
            return Err(CanvasError::ChoiceOutOfRange { index, len });
        };
        self.connect(output, input, &port)
    }

    fn connect(&mut self, output: NodeId, input: NodeId, port: &str) -> Result<Connection> {
        let result = request_connection(&mut self.view, &mut self.model, output, input, port);
        self.pump();
        result
    }

    /// Run a command
    pub fn execute(&mut self, command: CanvasCommand) -> Result<CommandOutcome> {
        tracing::debug!("Executing {:?}", command);
        match command {
            CanvasCommand::Connect {
                output,
                input,
                port,
            } => {
                self.pending_choice = None;
                self.connect(output, input, &port)?;
            }
            CanvasCommand::SetRendered(id) => self.set_rendered_node(id)?,
            CanvasCommand::Rename(id) => {
                let node = self
                    .model
                    .node(id)
                    .ok_or(CanvasError::Graph(GraphError::NodeNotFound(id)))?;
                return Ok(CommandOutcome::PromptRename {
                    node: id,
                    current_name: node.name.clone(),
                });
            }
            CanvasCommand::Delete(id) => {
                let result = self.model.remove_node(id);
                self.report(result)?;
                self.pump();
            }
            CanvasCommand::EditChildren(id) => self.open_network(id)?,
            CanvasCommand::GoUp => self.go_up()?,
            CanvasCommand::ResetView => {
                self.camera.reset();
                self.view.repaint(RepaintRequest::Network);
            }
        }
        Ok(CommandOutcome::Done)
    }

    /// Delete the selected nodes and connections as one edit
    pub fn delete_selected(&mut self) -> Result<usize> {
        let nodes = self.view.selected_ids();
        let connections: Vec<Connection> =
            self.view.selected_connections().iter().cloned().collect();
        if nodes.is_empty() && connections.is_empty() {
            return Ok(0);
        }

        self.model.begin_edits(DELETE_NODES);
        for connection in &connections {
            self.model.disconnect(connection);
        }
        let mut removed = 0;
        let mut failure = None;
        for id in nodes {
            match self.model.remove_node(id) {
                Ok(()) => removed += 1,
                Err(err) => failure = Some(err),
            }
        }
        self.model.end_edits();
        self.view.deselect_connections();
        self.pump();

        if let Some(err) = failure {
            self.report::<(), _>(Err(err))?;
        }
        tracing::debug!("Deleted {} node(s)", removed);
        Ok(removed)
    }

    /// Copy the selected nodes, returning how many were copied
    pub fn copy_selected(&mut self) -> usize {
        let Some(network) = self.view.network() else {
            return 0;
        };
        self.clipboard = Clipboard::from_nodes(&self.model, network, &self.view.selected_ids());
        self.clipboard.nodes.len()
    }

    /// Copy then delete the selected nodes as one edit
    pub fn cut_selected(&mut self) -> Result<usize> {
        self.copy_selected();
        self.model.begin_edits(CUT_NODES);
        let result = self.delete_selected();
        self.model.end_edits();
        result
    }

    /// Paste the clipboard into the active network and select the copies
    pub fn paste(&mut self) -> Result<usize> {
        let Some(network) = self.view.network() else {
            return Ok(0);
        };
        if self.clipboard.is_empty() {
            return Ok(0);
        }
        let nodes = self.clipboard.offset_nodes(self.view.config().paste_offset);
        let result = self
            .model
            .paste_children(network, &nodes, &self.clipboard.connections);
        let pasted = self.report(result)?;
        self.pump();
        self.view.select(pasted.iter().copied());
        Ok(pasted.len())
    }

    /// The clipboard as RON text
    pub fn clipboard_text(&self) -> Result<String> {
        self.clipboard
            .to_ron()
            .map_err(|err| CanvasError::Clipboard(err.to_string()))
    }

    /// Paste nodes from RON text; text that does not parse pastes nothing
    pub fn paste_text(&mut self, text: &str) -> Result<usize> {
        match Clipboard::from_ron(text) {
            Ok(clipboard) => {
                self.clipboard = clipboard;
                self.paste()
            }
            Err(err) => {
                tracing::debug!("Ignoring clipboard text: {}", err);
                Ok(0)
            }
        }
    }

    /// Rename a node
    pub fn rename_node(&mut self, id: NodeId, name: &str) -> Result<()> {
        let result = self.model.set_node_name(id, name);
        self.report(result)?;
        self.pump();
        Ok(())
    }

    /// Make a node the rendered child of its network
    pub fn set_rendered_node(&mut self, id: NodeId) -> Result<()> {
        let result = self.model.set_rendered_node(id);
        self.report(result)?;
        self.pump();
        Ok(())
    }

    /// Open the parent of the active network and select the network left
    pub fn go_up(&mut self) -> Result<()> {
        let current = self.model.active_network();
        let parent = self
            .model
            .parent(current)
            .ok_or(CanvasError::NoParentNetwork)?;
        self.open_network(parent)?;
        self.view.single_select(current);
        Ok(())
    }

    /// Open the single selected node as the active network
    pub fn go_down(&mut self) -> Result<()> {
        let selection = self.view.selected_ids();
        let [id] = selection.as_slice() else {
            return Err(CanvasError::NeedsSingleSelection(selection.len()));
        };
        self.open_network(*id)
    }

    fn open_network(&mut self, id: NodeId) -> Result<()> {
        let path = self
            .model
            .network_path(id)
            .ok_or(CanvasError::Graph(GraphError::NodeNotFound(id)))?;
        let result = self.model.set_active_network(&path);
        self.report(result)?;
        self.pump();
        Ok(())
    }

    /// Mark a node's code as changed or saved
    pub fn code_changed(&mut self, id: NodeId, changed: bool) {
        let updated = self
            .view
            .view_mut(id)
            .is_some_and(|node_view| node_view.set_code_changed(changed));
        if updated {
            self.view.repaint(RepaintRequest::Node(id));
        }
    }

    fn report<T, E: Into<CanvasError>>(&mut self, result: std::result::Result<T, E>) -> Result<T> {
        result.map_err(|err| {
            let err = err.into();
            tracing::warn!("{}", err);
            self.view.signals_mut().emit_error(&err);
            err
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port_resolver::PortResolution;
    use nodecanvas_graph::{
        ConnectionError, Graph, GraphEvent, InvalidNameError, Node, Port, PortType,
    };
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Graph wrapper that records every connect call
    struct CountingModel {
        inner: Graph,
        connects: Vec<(NodeId, NodeId, String)>,
    }

    impl GraphModel for CountingModel {
        fn node(&self, id: NodeId) -> Option<&Node> {
            self.inner.node(id)
        }
        fn children(&self, network: NodeId) -> Vec<NodeId> {
            self.inner.children(network)
        }
        fn parent(&self, id: NodeId) -> Option<NodeId> {
            self.inner.parent(id)
        }
        fn active_network(&self) -> NodeId {
            self.inner.active_network()
        }
        fn network_path(&self, id: NodeId) -> Option<String> {
            self.inner.network_path(id)
        }
        fn resolve_path(&self, path: &str) -> Option<NodeId> {
            self.inner.resolve_path(path)
        }
        fn rendered_child(&self, network: NodeId) -> Option<NodeId> {
            self.inner.rendered_child(network)
        }
        fn connections(&self, network: NodeId) -> Vec<Connection> {
            self.inner.connections(network)
        }
        fn has_error_in(&self, network: NodeId) -> bool {
            self.inner.has_error_in(network)
        }
        fn connect(
            &mut self,
            output_node: NodeId,
            input_node: NodeId,
            input_port: &str,
        ) -> std::result::Result<Connection, ConnectionError> {
            self.connects
                .push((output_node, input_node, input_port.to_string()));
            self.inner.connect(output_node, input_node, input_port)
        }
        fn disconnect(&mut self, connection: &Connection) -> bool {
            self.inner.disconnect(connection)
        }
        fn remove_node(&mut self, id: NodeId) -> std::result::Result<(), GraphError> {
            self.inner.remove_node(id)
        }
        fn set_node_position(
            &mut self,
            id: NodeId,
            position: [f32; 2],
        ) -> std::result::Result<(), GraphError> {
            self.inner.set_node_position(id, position)
        }
        fn set_node_name(&mut self, id: NodeId, name: &str) -> std::result::Result<(), GraphError> {
            self.inner.set_node_name(id, name)
        }
        fn set_rendered_node(&mut self, id: NodeId) -> std::result::Result<(), GraphError> {
            self.inner.set_rendered_node(id)
        }
        fn set_active_network(&mut self, path: &str) -> std::result::Result<(), GraphError> {
            self.inner.set_active_network(path)
        }
        fn paste_children(
            &mut self,
            network: NodeId,
            nodes: &[Node],
            connections: &[Connection],
        ) -> std::result::Result<Vec<NodeId>, GraphError> {
            self.inner.paste_children(network, nodes, connections)
        }
        fn begin_edits(&mut self, description: &str) {
            self.inner.begin_edits(description);
        }
        fn end_edits(&mut self) {
            self.inner.end_edits();
        }
        fn drain_events(&mut self) -> Vec<GraphEvent> {
            self.inner.drain_events()
        }
    }

    fn graph_with(nodes: Vec<Node>) -> (Graph, Vec<NodeId>) {
        let mut graph = Graph::new("test");
        let root = graph.root();
        let ids = nodes
            .into_iter()
            .map(|node| graph.add_node(root, node).unwrap())
            .collect();
        (graph, ids)
    }

    fn canvas_with(nodes: Vec<Node>) -> (NetworkCanvas<Graph>, Vec<NodeId>) {
        let (graph, ids) = graph_with(nodes);
        (NetworkCanvas::new(graph, CanvasConfig::default()), ids)
    }

    fn counting_canvas(nodes: Vec<Node>) -> (NetworkCanvas<CountingModel>, Vec<NodeId>) {
        let (graph, ids) = graph_with(nodes);
        let model = CountingModel {
            inner: graph,
            connects: Vec::new(),
        };
        (NetworkCanvas::new(model, CanvasConfig::default()), ids)
    }

    fn source() -> Node {
        Node::new("a").with_position(0.0, 0.0)
    }

    fn target(inputs: &[&str]) -> Node {
        inputs
            .iter()
            .fold(Node::new("b").with_position(200.0, 0.0), |node, label| {
                node.with_input(Port::any(*label))
            })
    }

    fn drag<M: GraphModel>(canvas: &mut NetworkCanvas<M>, from: Pos2, to: Pos2) -> EventOutcome {
        canvas.handle_event(CanvasEvent::Press {
            pos: from,
            button: PointerButton::Primary,
        });
        canvas.handle_event(CanvasEvent::Move { pos: to });
        canvas.handle_event(CanvasEvent::Release {
            pos: to,
            button: PointerButton::Primary,
        })
    }

    fn click<M: GraphModel>(canvas: &mut NetworkCanvas<M>, pos: Pos2, count: u32) -> EventOutcome {
        canvas.handle_event(CanvasEvent::Click {
            pos,
            count,
            button: PointerButton::Primary,
        })
    }

    const OUTPUT: Pos2 = Pos2::new(65.0, 30.0);
    const OVER_B: Pos2 = Pos2::new(230.0, 30.0);

    #[test]
    fn test_connection_to_node_without_inputs_never_connects() {
        let (mut canvas, _) = counting_canvas(vec![source(), target(&[])]);

        let outcome = drag(&mut canvas, OUTPUT, OVER_B);

        assert_eq!(outcome, EventOutcome::Nothing);
        assert!(canvas.model().connects.is_empty());
        assert_eq!(canvas.model().inner.connection_count(), 0);
        assert!(canvas.drag_state().is_idle());
    }

    #[test]
    fn test_single_compatible_port_connects_immediately() {
        let (mut canvas, ids) = counting_canvas(vec![source(), target(&["shape"])]);

        let outcome = drag(&mut canvas, OUTPUT, OVER_B);

        let expected = Connection::new(ids[0], ids[1], "shape");
        assert_eq!(outcome, EventOutcome::Gesture(GestureOutcome::Connected(expected)));
        assert_eq!(
            canvas.model().connects,
            vec![(ids[0], ids[1], "shape".to_string())]
        );
    }

    #[test]
    fn test_several_ports_connect_only_after_choice() {
        let (mut canvas, ids) = counting_canvas(vec![source(), target(&["in1", "in2"])]);

        let outcome = drag(&mut canvas, OUTPUT, OVER_B);
        assert!(matches!(
            outcome,
            EventOutcome::Gesture(GestureOutcome::PortChoice(_))
        ));
        assert!(canvas.model().connects.is_empty());

        canvas.choose_port(0).unwrap();
        assert_eq!(
            canvas.model().connects,
            vec![(ids[0], ids[1], "in1".to_string())]
        );
        assert!(canvas.pending_choice().is_none());
    }

    #[test]
    fn test_port_choice_end_to_end() {
        let (mut canvas, ids) = canvas_with(vec![source(), target(&["in1", "in2"])]);
        let repaints = Rc::new(RefCell::new(Vec::new()));
        let sink = repaints.clone();
        canvas
            .signals_mut()
            .on_repaint(move |request| sink.borrow_mut().push(request));

        let EventOutcome::Gesture(GestureOutcome::PortChoice(choice)) =
            drag(&mut canvas, OUTPUT, OVER_B)
        else {
            panic!("expected a port choice");
        };
        assert_eq!(choice.labels(), ["in1", "in2"]);
        assert_eq!((choice.output, choice.input), (ids[0], ids[1]));

        repaints.borrow_mut().clear();
        let connection = canvas.choose_port(1).unwrap();

        assert_eq!(connection, Connection::new(ids[0], ids[1], "in2"));
        assert_eq!(
            canvas.model().connections(canvas.model().root()),
            vec![connection]
        );
        assert!(repaints
            .borrow()
            .contains(&RepaintRequest::ConnectionLayer));
    }

    #[test]
    fn test_choice_out_of_range_keeps_choice() {
        let (mut canvas, _) = canvas_with(vec![source(), target(&["in1", "in2"])]);
        drag(&mut canvas, OUTPUT, OVER_B);

        assert_eq!(
            canvas.choose_port(5),
            Err(CanvasError::ChoiceOutOfRange { index: 5, len: 2 })
        );
        assert!(canvas.pending_choice().is_some());

        canvas.handle_event(CanvasEvent::Key(KeyCommand::Escape));
        assert_eq!(canvas.choose_port(0), Err(CanvasError::NoPendingChoice));
    }

    #[test]
    fn test_leaving_network_drops_port_choice() {
        let (mut canvas, ids) = canvas_with(vec![source(), target(&["in1", "in2"])]);
        drag(&mut canvas, OUTPUT, OVER_B);
        assert!(canvas.pending_choice().is_some());

        canvas.view_mut().single_select(ids[0]);
        canvas.go_down().unwrap();

        assert!(canvas.pending_choice().is_none());
        assert_eq!(canvas.choose_port(0), Err(CanvasError::NoPendingChoice));
        assert_eq!(canvas.model().connection_count(), 0);
    }

    #[test]
    fn test_rejected_connection_is_reported_once() {
        let (mut canvas, ids) = canvas_with(vec![
            source(),
            target(&["shape"]),
            Node::new("c").with_position(0.0, 200.0),
        ]);
        canvas
            .model_mut()
            .connect(ids[2], ids[1], "shape")
            .unwrap();
        canvas.pump();
        let errors = Rc::new(RefCell::new(Vec::new()));
        let sink = errors.clone();
        canvas
            .signals_mut()
            .on_error(move |err| sink.borrow_mut().push(err.clone()));

        let outcome = drag(&mut canvas, OUTPUT, OVER_B);

        let expected = CanvasError::Connection(ConnectionError::PortOccupied("shape".to_string()));
        assert_eq!(
            outcome,
            EventOutcome::Gesture(GestureOutcome::ConnectionRejected(expected.clone()))
        );
        assert_eq!(*errors.borrow(), vec![expected]);
        assert_eq!(canvas.model().connection_count(), 1);
    }

    #[test]
    fn test_type_checked_resolver_from_config() {
        let (graph, ids) = graph_with(vec![
            Node::new("a").with_output_type(PortType::Geometry),
            Node::new("b")
                .with_position(200.0, 0.0)
                .with_input(Port::new("amount", PortType::Float))
                .with_input(Port::new("shape", PortType::Geometry)),
        ]);
        let config = CanvasConfig {
            type_checked_ports: true,
            ..CanvasConfig::default()
        };
        let mut canvas = NetworkCanvas::new(graph, config);

        let outcome = drag(&mut canvas, OUTPUT, OVER_B);
        assert_eq!(
            outcome,
            EventOutcome::Gesture(GestureOutcome::Connected(Connection::new(
                ids[0], ids[1], "shape"
            )))
        );
    }

    #[test]
    fn test_custom_resolver() {
        struct LastPortOnly;
        impl PortResolver for LastPortOnly {
            fn compatible_ports<'a>(&self, _output: &Node, input: &'a Node) -> Vec<&'a Port> {
                input.inputs.last().into_iter().collect()
            }
        }
        let (graph, ids) = graph_with(vec![source(), target(&["in1", "in2"])]);
        let mut canvas = NetworkCanvas::new(graph, CanvasConfig::default()).with_resolver(LastPortOnly);

        let outcome = drag(&mut canvas, OUTPUT, OVER_B);
        assert_eq!(
            outcome,
            EventOutcome::Gesture(GestureOutcome::Connected(Connection::new(ids[0], ids[1], "in2")))
        );
        assert!(matches!(
            crate::port_resolver::resolve(&LastPortOnly, &source(), &target(&[])),
            PortResolution::NoPort
        ));
    }

    #[test]
    fn test_removing_dragged_nodes_clears_state() {
        let (mut canvas, ids) = canvas_with(vec![source(), target(&["in1"])]);
        canvas.view_mut().select(ids.clone());
        canvas.handle_event(CanvasEvent::Press {
            pos: OUTPUT,
            button: PointerButton::Primary,
        });
        canvas.handle_event(CanvasEvent::Move { pos: OVER_B });

        canvas.model_mut().remove_node(ids[1]).unwrap();
        canvas.pump();
        assert!(matches!(
            canvas.drag_state(),
            DragState::DraggingConnection { target: None, .. }
        ));
        assert_eq!(canvas.view().selected_ids(), vec![ids[0]]);

        canvas.model_mut().remove_node(ids[0]).unwrap();
        canvas.pump();
        assert!(canvas.drag_state().is_idle());
        assert!(canvas.view().selection().is_empty());
        assert!(canvas.view().view(ids[0]).is_none());
    }

    #[test]
    fn test_node_drag_through_events() {
        let (mut canvas, ids) = canvas_with(vec![source()]);
        let outcome = drag(&mut canvas, Pos2::new(10.0, 10.0), Pos2::new(23.0, 10.0));

        assert_eq!(outcome, EventOutcome::Gesture(GestureOutcome::NodesMoved(1)));
        assert_eq!(canvas.model().node(ids[0]).unwrap().position, [13.0, 0.0]);
        let node_view = canvas.view().view(ids[0]).unwrap();
        assert_eq!(node_view.true_position(), Pos2::new(13.0, 0.0));
        assert_eq!(node_view.rendered_position(), Pos2::new(20.0, 0.0));
    }

    #[test]
    fn test_delete_selected_is_one_edit() {
        let (mut canvas, ids) = canvas_with(vec![source(), target(&["in1"])]);
        canvas.model_mut().connect(ids[0], ids[1], "in1").unwrap();
        canvas.pump();
        let steps_before = canvas.model().history().len();

        canvas.view_mut().select_all();
        canvas.handle_event(CanvasEvent::Key(KeyCommand::Delete));

        assert_eq!(canvas.view().view_count(), 0);
        assert_eq!(canvas.model().connection_count(), 0);
        assert_eq!(canvas.model().history().len(), steps_before + 1);
        assert_eq!(canvas.model().history().last().unwrap().description, DELETE_NODES);
    }

    #[test]
    fn test_click_selects_connection_and_delete_removes_it() {
        let (mut canvas, ids) = canvas_with(vec![source(), target(&["in1"])]);
        let connection = canvas.model_mut().connect(ids[0], ids[1], "in1").unwrap();
        canvas.pump();

        click(&mut canvas, Pos2::new(135.0, 36.0), 1);
        assert!(canvas.view().selected_connections().contains(&connection));

        assert_eq!(canvas.delete_selected(), Ok(0));
        assert_eq!(canvas.model().connection_count(), 0);
        assert_eq!(canvas.view().view_count(), 2);
    }

    #[test]
    fn test_clicks() {
        let (mut canvas, ids) = canvas_with(vec![source(), target(&[])]);

        click(&mut canvas, Pos2::new(20.0, 20.0), 1);
        assert_eq!(canvas.view().selected_ids(), vec![ids[0]]);

        click(&mut canvas, Pos2::new(500.0, 500.0), 1);
        assert!(canvas.view().selection().is_empty());

        click(&mut canvas, Pos2::new(20.0, 20.0), 2);
        let root = canvas.model().root();
        assert_eq!(canvas.model().rendered_child(root), Some(ids[0]));

        let outcome = click(&mut canvas, Pos2::new(220.0, 78.0), 2);
        assert_eq!(
            outcome,
            EventOutcome::Command(CommandOutcome::PromptRename {
                node: ids[1],
                current_name: "b".to_string(),
            })
        );
    }

    #[test]
    fn test_rename_reports_invalid_name() {
        let (mut canvas, ids) = canvas_with(vec![source(), target(&[])]);
        let errors = Rc::new(RefCell::new(0));
        let sink = errors.clone();
        canvas.signals_mut().on_error(move |_| *sink.borrow_mut() += 1);

        let result = canvas.rename_node(ids[0], "b");
        assert_eq!(
            result,
            Err(CanvasError::Graph(GraphError::InvalidName(
                InvalidNameError::Duplicate("b".to_string())
            )))
        );
        assert_eq!(*errors.borrow(), 1);

        canvas.rename_node(ids[0], "circle1").unwrap();
        assert_eq!(canvas.model().node(ids[0]).unwrap().name, "circle1");
        assert_eq!(*errors.borrow(), 1);
    }

    #[test]
    fn test_copy_paste_selects_offset_copies() {
        let (mut canvas, ids) = canvas_with(vec![source()]);
        canvas.view_mut().single_select(ids[0]);
        assert_eq!(canvas.copy_selected(), 1);

        assert_eq!(canvas.paste(), Ok(1));

        let pasted = canvas.view().selected_ids();
        assert_eq!(pasted.len(), 1);
        assert_ne!(pasted[0], ids[0]);
        let node = canvas.model().node(pasted[0]).unwrap();
        assert_eq!(node.position, [5.0, 5.0]);
        assert_eq!(node.name, "a1");
        assert_eq!(canvas.view().view_count(), 2);
    }

    #[test]
    fn test_cut_and_paste_text() {
        let (mut canvas, ids) = canvas_with(vec![source(), target(&["in1"])]);
        canvas.model_mut().connect(ids[0], ids[1], "in1").unwrap();
        canvas.pump();
        canvas.view_mut().select_all();

        assert_eq!(canvas.cut_selected(), Ok(2));
        assert_eq!(canvas.view().view_count(), 0);
        assert_eq!(canvas.model().history().last().unwrap().description, CUT_NODES);

        let text = canvas.clipboard_text().unwrap();
        assert_eq!(canvas.paste_text("garbage"), Ok(0));
        assert_eq!(canvas.paste_text(&text), Ok(2));
        assert_eq!(canvas.view().view_count(), 2);
        assert_eq!(canvas.model().connection_count(), 1);
    }

    #[test]
    fn test_paste_text_only_inserts_valid_nodes() {
        let (mut canvas, _) = canvas_with(vec![]);
        let clipboard = Clipboard {
            nodes: vec![
                Node::new("not valid!").with_input(Port::any("x")).with_input(Port::any("x")),
                Node::new(""),
            ],
            connections: Vec::new(),
        };
        let text = clipboard.to_ron().unwrap();

        assert_eq!(canvas.paste_text(&text), Ok(1));
        let root = canvas.model().root();
        let names: Vec<String> = canvas
            .model()
            .children(root)
            .into_iter()
            .map(|id| canvas.model().node(id).unwrap().name.clone())
            .collect();
        assert_eq!(names, ["node"]);
        assert_eq!(canvas.view().selected_ids().len(), 1);
    }

    #[test]
    fn test_navigation() {
        let mut graph = Graph::new("test");
        let root = graph.root();
        let net = graph.add_node(root, Node::new("net")).unwrap();
        graph.add_node(net, Node::new("inner")).unwrap();
        graph.add_node(root, Node::new("other").with_position(200.0, 0.0)).unwrap();
        let mut canvas = NetworkCanvas::new(graph, CanvasConfig::default());

        assert_eq!(canvas.go_down(), Err(CanvasError::NeedsSingleSelection(0)));

        canvas.view_mut().single_select(net);
        canvas.handle_event(CanvasEvent::Key(KeyCommand::GoDown));
        assert_eq!(canvas.view().network(), Some(net));
        assert_eq!(canvas.view().view_count(), 1);
        assert!(canvas.view().selection().is_empty());

        canvas.handle_event(CanvasEvent::Key(KeyCommand::GoUp));
        assert_eq!(canvas.view().network(), Some(root));
        assert_eq!(canvas.view().view_count(), 2);
        assert_eq!(canvas.view().selected_ids(), vec![net]);

        assert_eq!(canvas.go_up(), Err(CanvasError::NoParentNetwork));
        assert_eq!(
            canvas.handle_event(CanvasEvent::Key(KeyCommand::GoUp)),
            EventOutcome::Nothing
        );
    }

    #[test]
    fn test_code_changed_repaints_node() {
        let (mut canvas, ids) = canvas_with(vec![source()]);
        let repaints = Rc::new(RefCell::new(Vec::new()));
        let sink = repaints.clone();
        canvas
            .signals_mut()
            .on_repaint(move |request| sink.borrow_mut().push(request));

        canvas.code_changed(ids[0], true);
        canvas.code_changed(ids[0], true);

        assert!(canvas.view().view(ids[0]).unwrap().has_code_changed());
        assert_eq!(*repaints.borrow(), vec![RepaintRequest::Node(ids[0])]);
    }

    #[test]
    fn test_context_menus_and_reset_view() {
        let (mut canvas, ids) = canvas_with(vec![source()]);
        assert_eq!(canvas.context_menu(Pos2::new(20.0, 20.0)), node_menu(ids[0]));
        assert_eq!(canvas.context_menu(Pos2::new(500.0, 500.0)), network_menu());

        canvas.camera_mut().pan_by(egui::Vec2::new(40.0, 0.0));
        canvas.execute(CanvasCommand::ResetView).unwrap();
        assert_eq!(*canvas.camera(), Camera::new());

        canvas.execute(CanvasCommand::Delete(ids[0])).unwrap();
        assert_eq!(canvas.view().view_count(), 0);
    }
}
