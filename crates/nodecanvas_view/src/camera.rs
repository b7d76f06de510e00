// SPDX-License-Identifier: MIT OR Apache-2.0
//! Pan and zoom of the canvas.

use egui::{Pos2, Rect, Vec2};

/// Zoom change per wheel step
pub const ZOOM_STEP: f32 = 0.1;

/// Maps between screen space and canvas space
///
/// Canvas point `p` appears at `rect.min + (p + pan) * zoom` on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// Pan offset (canvas space)
    pub pan: Vec2,
    /// Zoom level
    pub zoom: f32,
}

impl Camera {
    /// Create a camera at the origin without zoom
    pub fn new() -> Self {
        Self {
            pan: Vec2::ZERO,
            zoom: 1.0,
        }
    }

    /// Convert a screen position to canvas space
    pub fn screen_to_canvas(&self, screen_pos: Pos2, rect: Rect) -> Pos2 {
        Pos2::new(
            (screen_pos.x - rect.min.x) / self.zoom - self.pan.x,
            (screen_pos.y - rect.min.y) / self.zoom - self.pan.y,
        )
    }

    /// Convert a canvas position to screen space
    pub fn canvas_to_screen(&self, canvas_pos: Pos2, rect: Rect) -> Pos2 {
        Pos2::new(
            (canvas_pos.x + self.pan.x) * self.zoom + rect.min.x,
            (canvas_pos.y + self.pan.y) * self.zoom + rect.min.y,
        )
    }

    /// Pan by a screen-space delta
    pub fn pan_by(&mut self, screen_delta: Vec2) {
        self.pan += screen_delta / self.zoom;
    }

    /// Zoom by wheel steps, keeping the canvas point under `screen_pos` fixed
    ///
    /// Positive steps zoom out. The result is clamped to `min..=max`.
    pub fn zoom_about(&mut self, screen_pos: Pos2, rect: Rect, steps: f32, min: f32, max: f32) {
        let anchor = self.screen_to_canvas(screen_pos, rect);
        let old_zoom = self.zoom;
        self.zoom = (self.zoom * (1.0 - ZOOM_STEP * steps)).clamp(min, max);
        if self.zoom != old_zoom {
            self.pan = (anchor.to_vec2() + self.pan) * (old_zoom / self.zoom) - anchor.to_vec2();
        }
    }

    /// Back to the origin without zoom
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect() -> Rect {
        Rect::from_min_size(Pos2::new(10.0, 20.0), Vec2::new(800.0, 600.0))
    }

    #[test]
    fn test_transforms_are_inverse() {
        let camera = Camera {
            pan: Vec2::new(-30.0, 15.0),
            zoom: 0.5,
        };
        let canvas = Pos2::new(120.0, -40.0);
        let screen = camera.canvas_to_screen(canvas, rect());
        let back = camera.screen_to_canvas(screen, rect());
        assert!((back - canvas).length() < 1e-4);
    }

    #[test]
    fn test_zoom_keeps_point_under_cursor() {
        let mut camera = Camera::new();
        let cursor = Pos2::new(310.0, 220.0);
        let before = camera.screen_to_canvas(cursor, rect());

        camera.zoom_about(cursor, rect(), 3.0, 0.2, 1.0);
        assert!((camera.zoom - 0.7).abs() < 1e-5);
        let after = camera.screen_to_canvas(cursor, rect());
        assert!((after - before).length() < 1e-3);
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut camera = Camera::new();
        camera.zoom_about(Pos2::ZERO, rect(), -5.0, 0.2, 1.0);
        assert_eq!(camera.zoom, 1.0);
        for _ in 0..50 {
            camera.zoom_about(Pos2::ZERO, rect(), 1.0, 0.2, 1.0);
        }
        assert_eq!(camera.zoom, 0.2);

        camera.pan_by(Vec2::new(10.0, 0.0));
        camera.reset();
        assert_eq!(camera, Camera::new());
    }
}
