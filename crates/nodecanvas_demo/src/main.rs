// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node canvas demo.
//!
//! Drives a canvas headlessly through a short editing session:
//! - Connecting two nodes through the port choice
//! - Dragging a node in sub-grid steps
//! - Rubber-band selection, copy and paste
//!
//! Set `RUST_LOG` to adjust the log output.

use egui::Pos2;
use nodecanvas_graph::{Graph, GraphModel, Node, NodeId, Port, PortType};
use nodecanvas_view::{
    assets, AssetTable, CanvasConfig, CanvasEvent, EventOutcome, GestureOutcome, NetworkCanvas,
    PointerButton,
};
use std::cell::RefCell;
use std::error::Error;
use std::rc::Rc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const CONFIG: &str = "(grid_size: 20.0, paste_offset: 5.0, type_checked_ports: false)";

fn main() {
    let mut env_filter = tracing_subscriber::EnvFilter::from_default_env();
    for directive in ["nodecanvas_view=debug", "nodecanvas_demo=info"] {
        match directive.parse::<tracing_subscriber::filter::Directive>() {
            Ok(directive) => env_filter = env_filter.add_directive(directive),
            Err(e) => eprintln!("Ignoring log directive {directive}: {e}"),
        }
    }

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting node canvas demo v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run() {
        tracing::error!("Demo failed: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let config = CanvasConfig::from_ron(CONFIG)?;
    if assets::install(AssetTable::builtin().with_icon("rect", [70, 70])).is_err() {
        tracing::warn!("Asset table already installed");
    }

    let mut graph = Graph::new("demo");
    let root = graph.root();
    let rect = graph.add_node(
        root,
        Node::new("rect1")
            .with_image("rect")
            .with_output_type(PortType::Geometry),
    )?;
    let merge = graph.add_node(
        root,
        Node::new("merge1")
            .with_position(200.0, 0.0)
            .with_input(Port::new("in1", PortType::Geometry))
            .with_input(Port::new("in2", PortType::Geometry)),
    )?;

    let mut canvas = NetworkCanvas::new(graph, config);
    let repaints = Rc::new(RefCell::new(0_usize));
    let counter = repaints.clone();
    canvas.signals_mut().on_repaint(move |_| *counter.borrow_mut() += 1);
    canvas
        .signals_mut()
        .on_selection_changed(|selection| tracing::info!("Selection: {} node(s)", selection.len()));
    canvas
        .signals_mut()
        .on_error(|err| tracing::info!("Canvas reported: {err}"));

    connect_through_choice(&mut canvas, "in2")?;
    drag_in_small_steps(&mut canvas, rect);

    // Rubber band around both nodes, then duplicate them
    gesture(&mut canvas, Pos2::new(-10.0, -10.0), Pos2::new(300.0, 100.0));
    canvas.copy_selected();
    let pasted = canvas.paste()?;
    tracing::info!("Pasted {} node(s)", pasted);

    let model = canvas.model();
    for id in model.children(root) {
        if let Some(node) = model.node(id) {
            tracing::info!("{} at {:?}", node.name, node.position);
        }
    }
    for connection in model.connections(root) {
        tracing::info!(
            "{} -> {}.{}",
            name_of(model, connection.output_node),
            name_of(model, connection.input_node),
            connection.input_port
        );
    }
    for step in model.history().steps() {
        tracing::info!("Edit step: {}", step.description);
    }
    tracing::info!(
        "{} repaint request(s), merge node shown: {}",
        repaints.borrow(),
        canvas.view().view(merge).is_some()
    );
    Ok(())
}

fn gesture(canvas: &mut NetworkCanvas<Graph>, from: Pos2, to: Pos2) -> EventOutcome {
    let button = PointerButton::Primary;
    canvas.handle_event(CanvasEvent::Press { pos: from, button });
    canvas.handle_event(CanvasEvent::Move { pos: to });
    canvas.handle_event(CanvasEvent::Release { pos: to, button })
}

fn connect_through_choice(
    canvas: &mut NetworkCanvas<Graph>,
    port: &str,
) -> Result<(), Box<dyn Error>> {
    let outcome = gesture(canvas, Pos2::new(65.0, 30.0), Pos2::new(230.0, 30.0));
    let EventOutcome::Gesture(GestureOutcome::PortChoice(choice)) = outcome else {
        tracing::warn!("Expected a port choice, got {:?}", outcome);
        return Ok(());
    };
    tracing::info!("Offered ports: {:?}", choice.labels());
    let Some(index) = choice.labels().iter().position(|label| *label == port) else {
        tracing::warn!("Port {} was not offered", port);
        return Ok(());
    };
    let connection = canvas.choose_port(index)?;
    tracing::info!("Connected into {}", connection.input_port);
    Ok(())
}

fn drag_in_small_steps(canvas: &mut NetworkCanvas<Graph>, id: NodeId) {
    let button = PointerButton::Primary;
    let start = Pos2::new(10.0, 10.0);
    canvas.handle_event(CanvasEvent::Press { pos: start, button });
    for step in 1..=10 {
        let pos = start + egui::Vec2::splat(3.0 * step as f32);
        canvas.handle_event(CanvasEvent::Move { pos });
    }
    canvas.handle_event(CanvasEvent::Release {
        pos: start + egui::Vec2::splat(30.0),
        button,
    });
    if let Some(view) = canvas.view().view(id) {
        tracing::info!(
            "Dragged to {:?}, drawn at {:?}",
            view.true_position(),
            view.rendered_position()
        );
    }
}

fn name_of(model: &Graph, id: NodeId) -> &str {
    model.node(id).map_or("?", |node| node.name.as_str())
}
