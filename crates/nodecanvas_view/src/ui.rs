// SPDX-License-Identifier: MIT OR Apache-2.0
//! egui host adapter.
//!
//! Features:
//! - Translating egui pointer and key input into [`CanvasEvent`]s
//! - Grid, connection, node and rubber band rendering
//! - Pan with the middle button, zoom with the wheel
//! - Node and network context menus
//! - Port choice popup

use crate::camera::Camera;
use crate::canvas::{EventOutcome, NetworkCanvas};
use crate::commands::{CommandOutcome, MenuItem};
use crate::drag::{CanvasEvent, DragState, GestureOutcome, KeyCommand, PointerButton};
use crate::geometry::span_rect;
use crate::node_view::NodeView;
use egui::{Color32, Pos2, Rect, Stroke, Vec2};
use nodecanvas_graph::{GraphModel, NodeId};

const NODE_ROUNDING: f32 = 4.0;
const CONNECTION_THICKNESS: f32 = 2.0;
const PORT_WIDTH: f32 = 5.0;

const BACKGROUND: Color32 = Color32::from_rgb(40, 40, 42);
const NODE_FILL: Color32 = Color32::from_rgb(70, 70, 74);
const NODE_ERROR_FILL: Color32 = Color32::from_rgb(120, 50, 50);
const SELECTION: Color32 = Color32::from_rgb(100, 150, 255);
const RENDERED: Color32 = Color32::from_rgb(240, 200, 60);
const CONNECTION: Color32 = Color32::from_rgb(170, 170, 170);

/// Pointer and key input of one frame, in screen space
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameInput {
    /// Pointer position
    pub pointer: Option<Pos2>,
    /// Primary button went down
    pub pressed: bool,
    /// Primary button went up
    pub released: bool,
    /// Pointer moved since the last frame
    pub moved: bool,
    /// 1 for a click, 2 for a double click
    pub clicks: u32,
    /// Key commands
    pub keys: Vec<KeyCommand>,
}

impl FrameInput {
    /// Read this frame's input for a canvas response
    pub fn from_egui(ui: &egui::Ui, response: &egui::Response) -> Self {
        let clicks = if response.double_clicked() {
            2
        } else if response.clicked() {
            1
        } else {
            0
        };
        ui.input(|i| {
            let mut keys = Vec::new();
            if response.hovered() {
                if i.key_pressed(egui::Key::Escape) {
                    keys.push(KeyCommand::Escape);
                }
                if i.key_pressed(egui::Key::Delete) || i.key_pressed(egui::Key::Backspace) {
                    keys.push(KeyCommand::Delete);
                }
                if i.key_pressed(egui::Key::U) {
                    keys.push(KeyCommand::GoUp);
                }
                if i.key_pressed(egui::Key::Enter) {
                    keys.push(KeyCommand::GoDown);
                }
                if i.modifiers.command && i.key_pressed(egui::Key::A) {
                    keys.push(KeyCommand::SelectAll);
                }
            }
            Self {
                pointer: i.pointer.latest_pos(),
                pressed: response.hovered() && i.pointer.button_pressed(egui::PointerButton::Primary),
                released: i.pointer.button_released(egui::PointerButton::Primary),
                moved: i.pointer.delta() != Vec2::ZERO,
                clicks,
                keys,
            }
        })
    }
}

/// Convert one frame of input into canvas events
///
/// Pointer events come first, in press, move, release, click order, followed
/// by key commands. Without a pointer position a release is still delivered
/// at `last_pointer`, the last known screen position, so a gesture can end.
pub fn translate_input(
    input: &FrameInput,
    last_pointer: Option<Pos2>,
    camera: &Camera,
    rect: Rect,
) -> Vec<CanvasEvent> {
    let mut events = Vec::new();
    let button = PointerButton::Primary;
    if let Some(screen) = input.pointer {
        let pos = camera.screen_to_canvas(screen, rect);
        if input.pressed {
            events.push(CanvasEvent::Press { pos, button });
        }
        if input.moved {
            events.push(CanvasEvent::Move { pos });
        }
        if input.released {
            events.push(CanvasEvent::Release { pos, button });
        }
        if input.clicks > 0 {
            events.push(CanvasEvent::Click {
                pos,
                count: input.clicks,
                button,
            });
        }
    } else if let Some(screen) = last_pointer.filter(|_| input.released) {
        let pos = camera.screen_to_canvas(screen, rect);
        events.push(CanvasEvent::Release { pos, button });
    }
    events.extend(input.keys.iter().copied().map(CanvasEvent::Key));
    events
}

/// Draws a [`NetworkCanvas`] and feeds it egui input
#[derive(Debug)]
pub struct CanvasUi {
    menu: Vec<MenuItem>,
    choice_pos: Pos2,
    last_pointer: Option<Pos2>,
    show_grid: bool,
}

impl CanvasUi {
    /// Create the adapter
    pub fn new() -> Self {
        Self {
            menu: Vec::new(),
            choice_pos: Pos2::ZERO,
            last_pointer: None,
            show_grid: true,
        }
    }

    /// Show or hide the grid
    pub fn set_show_grid(&mut self, show: bool) {
        self.show_grid = show;
    }

    /// Handle input and draw the canvas, returning what happened this frame
    pub fn show<M: GraphModel>(
        &mut self,
        ui: &mut egui::Ui,
        canvas: &mut NetworkCanvas<M>,
    ) -> Vec<EventOutcome> {
        let rect = ui.available_rect_before_wrap();
        let response = ui.allocate_rect(rect, egui::Sense::click_and_drag());
        let painter = ui.painter_at(rect);

        let mut outcomes = self.handle_input(ui, &response, rect, canvas);
        outcomes.extend(self.context_menu(&response, canvas));
        if let Some(outcome) = self.port_choice_popup(ui, canvas) {
            outcomes.push(outcome);
        }

        painter.rect_filled(rect, 0.0, BACKGROUND);
        if self.show_grid {
            draw_grid(&painter, canvas, rect);
        }
        draw_connections(&painter, canvas, rect);
        draw_pending_connection(&painter, canvas, rect);
        draw_nodes(&painter, canvas, rect);
        draw_rubber_band(&painter, canvas, rect);

        outcomes
    }

    fn handle_input<M: GraphModel>(
        &mut self,
        ui: &egui::Ui,
        response: &egui::Response,
        rect: Rect,
        canvas: &mut NetworkCanvas<M>,
    ) -> Vec<EventOutcome> {
        // Zoom with scroll wheel
        let (scroll, hover) = ui.input(|i| (i.raw_scroll_delta.y, i.pointer.hover_pos()));
        if let Some(mouse_pos) = hover.filter(|pos| rect.contains(*pos)) {
            if scroll != 0.0 {
                canvas.zoom_about(mouse_pos, rect, -scroll.signum());
            }
        }

        if response.dragged_by(egui::PointerButton::Middle) {
            canvas.camera_mut().pan_by(response.drag_delta());
        }

        let input = FrameInput::from_egui(ui, response);
        let events = translate_input(&input, self.last_pointer, canvas.camera(), rect);
        if input.pointer.is_some() {
            self.last_pointer = input.pointer;
        }
        let mut outcomes = Vec::new();
        for event in events {
            let outcome = canvas.handle_event(event);
            if matches!(outcome, EventOutcome::Gesture(GestureOutcome::PortChoice(_))) {
                self.choice_pos = input.pointer.unwrap_or(rect.center());
            }
            if outcome != EventOutcome::Nothing {
                outcomes.push(outcome);
            }
        }
        outcomes
    }

    fn context_menu<M: GraphModel>(
        &mut self,
        response: &egui::Response,
        canvas: &mut NetworkCanvas<M>,
    ) -> Option<EventOutcome> {
        if response.secondary_clicked() {
            if let Some(screen) = response.interact_pointer_pos() {
                let pos = canvas.camera().screen_to_canvas(screen, response.rect);
                self.menu = canvas.context_menu(pos);
            }
        }

        let mut chosen = None;
        response.context_menu(|ui| {
            for item in &self.menu {
                let label = match item.shortcut {
                    Some(shortcut) => format!("{}  ({})", item.label, shortcut),
                    None => item.label.clone(),
                };
                if ui.button(label).clicked() {
                    chosen = Some(item.command.clone());
                    ui.close_menu();
                }
            }
        });

        let command = chosen?;
        match canvas.execute(command) {
            Ok(CommandOutcome::Done) => None,
            Ok(outcome) => Some(EventOutcome::Command(outcome)),
            Err(err) => {
                tracing::debug!("Menu command failed: {}", err);
                None
            }
        }
    }

    fn port_choice_popup<M: GraphModel>(
        &mut self,
        ui: &egui::Ui,
        canvas: &mut NetworkCanvas<M>,
    ) -> Option<EventOutcome> {
        let labels: Vec<String> = canvas
            .pending_choice()?
            .labels()
            .into_iter()
            .map(str::to_string)
            .collect();

        let mut picked = None;
        egui::Area::new(ui.id().with("port_choice"))
            .fixed_pos(self.choice_pos)
            .show(ui.ctx(), |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.label("Select input");
                    for (index, label) in labels.iter().enumerate() {
                        if ui.button(label).clicked() {
                            picked = Some(index);
                        }
                    }
                });
            });

        let connection = canvas.choose_port(picked?).ok()?;
        Some(EventOutcome::Gesture(GestureOutcome::Connected(connection)))
    }
}

impl Default for CanvasUi {
    fn default() -> Self {
        Self::new()
    }
}

fn draw_grid<M: GraphModel>(painter: &egui::Painter, canvas: &NetworkCanvas<M>, rect: Rect) {
    let camera = canvas.camera();
    let spacing = canvas.view().config().grid_size * camera.zoom;
    if spacing < 4.0 {
        return;
    }
    let color = Color32::from_rgba_unmultiplied(60, 60, 60, 100);
    let offset_x = (camera.pan.x * camera.zoom).rem_euclid(spacing);
    let offset_y = (camera.pan.y * camera.zoom).rem_euclid(spacing);

    let mut x = rect.left() + offset_x;
    while x < rect.right() {
        painter.line_segment(
            [Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())],
            Stroke::new(1.0, color),
        );
        x += spacing;
    }

    let mut y = rect.top() + offset_y;
    while y < rect.bottom() {
        painter.line_segment(
            [Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)],
            Stroke::new(1.0, color),
        );
        y += spacing;
    }
}

fn draw_connections<M: GraphModel>(painter: &egui::Painter, canvas: &NetworkCanvas<M>, rect: Rect) {
    let view = canvas.view();
    let Some(network) = view.network() else {
        return;
    };
    let camera = canvas.camera();
    for connection in canvas.model().connections(network) {
        let Some((start, end)) = view.connection_endpoints(&connection, canvas.model()) else {
            continue;
        };
        let color = if view.selected_connections().contains(&connection) {
            SELECTION
        } else {
            CONNECTION
        };
        painter.line_segment(
            [camera.canvas_to_screen(start, rect), camera.canvas_to_screen(end, rect)],
            Stroke::new(CONNECTION_THICKNESS * camera.zoom, color),
        );
    }
}

fn draw_pending_connection<M: GraphModel>(
    painter: &egui::Painter,
    canvas: &NetworkCanvas<M>,
    rect: Rect,
) {
    let DragState::DraggingConnection {
        source, pointer, ..
    } = canvas.drag_state()
    else {
        return;
    };
    let view = canvas.view();
    let Some(source_view) = view.view(*source) else {
        return;
    };
    let camera = canvas.camera();
    let start = camera.canvas_to_screen(source_view.output_anchor(view.config()), rect);
    let end = camera.canvas_to_screen(*pointer, rect);
    painter.line_segment([start, end], Stroke::new(CONNECTION_THICKNESS * camera.zoom, SELECTION));
}

fn draw_nodes<M: GraphModel>(painter: &egui::Painter, canvas: &NetworkCanvas<M>, rect: Rect) {
    let view = canvas.view();
    let rendered = view
        .network()
        .and_then(|network| canvas.model().rendered_child(network));
    let target = match canvas.drag_state() {
        DragState::DraggingConnection { target, .. } => *target,
        _ => None,
    };
    for node_view in view.views() {
        let id = node_view.node_id();
        let Some(node) = canvas.model().node(id) else {
            continue;
        };
        let style = NodeStyle {
            has_error: node.has_error,
            rendered: rendered == Some(id),
            is_target: target == Some(id),
        };
        draw_node(painter, canvas, rect, node_view, &node.name, style);
    }
}

#[derive(Debug, Clone, Copy)]
struct NodeStyle {
    has_error: bool,
    rendered: bool,
    is_target: bool,
}

fn draw_node<M: GraphModel>(
    painter: &egui::Painter,
    canvas: &NetworkCanvas<M>,
    rect: Rect,
    node_view: &NodeView,
    name: &str,
    style: NodeStyle,
) {
    let config = canvas.view().config();
    let camera = canvas.camera();
    let zoom = camera.zoom;
    let origin = camera.canvas_to_screen(node_view.rendered_position(), rect);
    let body = Rect::from_min_size(origin, Vec2::splat(config.node_size * zoom));
    if !body.expand(config.text_height * zoom).intersects(rect) {
        return;
    }

    let fill = if style.has_error { NODE_ERROR_FILL } else { NODE_FILL };
    painter.rect_filled(body, NODE_ROUNDING * zoom, fill);

    if node_view.is_selected() || style.is_target {
        painter.rect_stroke(body, NODE_ROUNDING * zoom, Stroke::new(2.0, SELECTION));
    }
    if style.rendered {
        painter.rect_stroke(
            body.shrink(3.0 * zoom),
            NODE_ROUNDING * zoom,
            Stroke::new(1.5, RENDERED),
        );
    }
    if node_view.has_code_changed() {
        painter.circle_filled(body.right_top() + Vec2::new(-6.0, 6.0) * zoom, 3.0 * zoom, RENDERED);
    }

    // Icon
    painter.text(
        body.center(),
        egui::Align2::CENTER_CENTER,
        &node_view.icon().image.name,
        egui::FontId::proportional(9.0 * zoom),
        Color32::from_gray(150),
    );

    // Input ports
    for slot in &node_view.icon().port_slots {
        let port = Rect::from_min_size(
            origin + Vec2::new(0.0, *slot) * zoom,
            Vec2::new(PORT_WIDTH, config.port_height) * zoom,
        );
        painter.rect_filled(port, 0.0, Color32::from_gray(200));
    }

    // Output port
    let output = Rect::from_center_size(
        camera.canvas_to_screen(node_view.output_anchor(config), rect),
        Vec2::new(PORT_WIDTH, config.port_height) * zoom,
    );
    painter.rect_filled(output, 0.0, Color32::from_gray(200));

    painter.text(
        Pos2::new(body.center().x, body.bottom() + config.text_height * zoom / 2.0),
        egui::Align2::CENTER_CENTER,
        name,
        egui::FontId::proportional(11.0 * zoom),
        Color32::WHITE,
    );
}

fn draw_rubber_band<M: GraphModel>(painter: &egui::Painter, canvas: &NetworkCanvas<M>, rect: Rect) {
    let DragState::RubberBandSelecting {
        anchor, current, ..
    } = canvas.drag_state()
    else {
        return;
    };
    let camera = canvas.camera();
    let band = span_rect(
        camera.canvas_to_screen(*anchor, rect),
        camera.canvas_to_screen(*current, rect),
    );
    painter.rect_filled(band, 0.0, Color32::from_rgba_unmultiplied(100, 150, 255, 30));
    painter.rect_stroke(band, 0.0, Stroke::new(1.0, SELECTION));
}

/// Node under a screen position, for hosts building their own overlays
pub fn node_at_screen<M: GraphModel>(
    canvas: &NetworkCanvas<M>,
    screen_pos: Pos2,
    rect: Rect,
) -> Option<NodeId> {
    let pos = canvas.camera().screen_to_canvas(screen_pos, rect);
    canvas.view().view_at(pos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CanvasConfig;
    use nodecanvas_graph::{Graph, Node};

    fn rect() -> Rect {
        Rect::from_min_size(Pos2::new(100.0, 50.0), Vec2::new(800.0, 600.0))
    }

    #[test]
    fn test_pointer_events_are_in_canvas_space() {
        let camera = Camera {
            pan: Vec2::new(10.0, 0.0),
            zoom: 0.5,
        };
        let input = FrameInput {
            pointer: Some(Pos2::new(150.0, 70.0)),
            pressed: true,
            ..FrameInput::default()
        };

        let events = translate_input(&input, None, &camera, rect());
        assert_eq!(
            events,
            vec![CanvasEvent::Press {
                pos: Pos2::new(90.0, 40.0),
                button: PointerButton::Primary,
            }]
        );
    }

    #[test]
    fn test_event_order() {
        let input = FrameInput {
            pointer: Some(Pos2::new(100.0, 50.0)),
            pressed: true,
            moved: true,
            released: true,
            clicks: 2,
            keys: vec![KeyCommand::Escape],
        };

        let events = translate_input(&input, None, &Camera::new(), rect());
        let pos = Pos2::ZERO;
        let button = PointerButton::Primary;
        assert_eq!(
            events,
            vec![
                CanvasEvent::Press { pos, button },
                CanvasEvent::Move { pos },
                CanvasEvent::Release { pos, button },
                CanvasEvent::Click {
                    pos,
                    count: 2,
                    button
                },
                CanvasEvent::Key(KeyCommand::Escape),
            ]
        );
    }

    #[test]
    fn test_keys_without_pointer() {
        let input = FrameInput {
            pointer: None,
            pressed: true,
            keys: vec![KeyCommand::Delete, KeyCommand::SelectAll],
            ..FrameInput::default()
        };

        let events = translate_input(&input, None, &Camera::new(), rect());
        assert_eq!(
            events,
            vec![
                CanvasEvent::Key(KeyCommand::Delete),
                CanvasEvent::Key(KeyCommand::SelectAll),
            ]
        );
    }

    #[test]
    fn test_release_without_pointer_uses_last_position() {
        let input = FrameInput {
            pointer: None,
            released: true,
            ..FrameInput::default()
        };

        let events = translate_input(&input, Some(Pos2::new(110.0, 60.0)), &Camera::new(), rect());
        assert_eq!(
            events,
            vec![CanvasEvent::Release {
                pos: Pos2::new(10.0, 10.0),
                button: PointerButton::Primary,
            }]
        );
    }

    #[test]
    fn test_release_outside_window_ends_node_drag() {
        let mut graph = Graph::new("test");
        let root = graph.root();
        graph.add_node(root, Node::new("a")).unwrap();
        let mut canvas = NetworkCanvas::new(graph, CanvasConfig::default());
        let camera = Camera::new();

        let press = FrameInput {
            pointer: Some(Pos2::new(110.0, 60.0)),
            pressed: true,
            ..FrameInput::default()
        };
        for event in translate_input(&press, None, &camera, rect()) {
            canvas.handle_event(event);
        }
        assert!(!canvas.drag_state().is_idle());

        let gone = FrameInput {
            pointer: None,
            released: true,
            ..FrameInput::default()
        };
        for event in translate_input(&gone, press.pointer, &camera, rect()) {
            canvas.handle_event(event);
        }
        assert!(canvas.drag_state().is_idle());
    }
}
