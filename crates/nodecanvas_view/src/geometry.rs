// SPDX-License-Identifier: MIT OR Apache-2.0
//! Grid snapping, port layout and hit-testing helpers.

use crate::config::CanvasConfig;
use egui::{Pos2, Rect, Vec2};

/// Snap a coordinate to the grid
///
/// The value is first rounded to a whole unit, so `snap(snap(v)) == snap(v)`.
pub fn snap(value: f32, grid_size: f32) -> f32 {
    (value.round() / grid_size).round() * grid_size
}

/// Snap both components of a point
pub fn snap_pos(pos: Pos2, grid_size: f32) -> Pos2 {
    Pos2::new(snap(pos.x, grid_size), snap(pos.y, grid_size))
}

/// Rectangle spanned by two corners, whichever direction they were dragged
pub fn span_rect(anchor: Pos2, current: Pos2) -> Rect {
    Rect::from_min_max(
        Pos2::new(anchor.x.min(current.x), anchor.y.min(current.y)),
        Pos2::new(anchor.x.max(current.x), anchor.y.max(current.y)),
    )
}

/// Vertical offset of an input port slot from the top of the node body
///
/// Ports form a vertically centered stack in declared order.
pub fn port_offset(index: usize, count: usize, config: &CanvasConfig) -> f32 {
    let count = count.max(1) as f32;
    let stack = count * config.port_height + (count - 1.0) * config.port_margin;
    (config.node_size - stack) / 2.0 + index as f32 * (config.port_height + config.port_margin)
}

/// Output hit-zone relative to the node's top-left corner
pub fn output_zone(config: &CanvasConfig) -> Rect {
    Rect::from_min_size(
        Pos2::new(config.node_size - config.output_zone_width, 0.0),
        Vec2::new(config.output_zone_width, config.node_size),
    )
}

/// Shortest distance from a point to a line segment
pub fn distance_to_segment(point: Pos2, start: Pos2, end: Pos2) -> f32 {
    let segment = end - start;
    let length_sq = segment.length_sq();
    if length_sq == 0.0 {
        return point.distance(start);
    }
    let t = ((point - start).dot(segment) / length_sq).clamp(0.0, 1.0);
    point.distance(start + segment * t)
}
