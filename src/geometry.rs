//! World <-> pixel transform for a canvas viewport.
//!
//! World space is in meters with the origin at the floor center and +Y up.
//! Pixel space has its origin at the top-left corner and +Y down.

use crate::config::EditorConfig;
use crate::object::SceneObject;
use bevy_math::Rect;
use glam::Vec2;

/// Scale and offset mapping the world floor onto a canvas of a given size.
///
/// The whole floor plus a margin always fits in the smaller canvas dimension.
/// Call [`Viewport::resize`] whenever the canvas changes size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    canvas: Vec2,
    world: Vec2,
    margin: f32,
    ppm: f32,
    offset: Vec2,
}

impl Viewport {
    pub fn new(canvas_width: f32, canvas_height: f32, config: &EditorConfig) -> Self {
        let mut viewport = Self {
            canvas: Vec2::ZERO,
            world: config.world_size,
            margin: config.viewport_margin,
            ppm: 0.0,
            offset: Vec2::ZERO,
        };
        viewport.resize(canvas_width, canvas_height);
        viewport
    }

    /// Viewport for the configured default canvas size.
    pub fn from_config(config: &EditorConfig) -> Self {
        Self::new(config.default_viewport.x, config.default_viewport.y, config)
    }

    /// Re-derives pixels-per-meter and the center offset for a new canvas size.
    pub fn resize(&mut self, canvas_width: f32, canvas_height: f32) {
        self.canvas = Vec2::new(canvas_width.max(0.0), canvas_height.max(0.0));
        let extent = self.world + Vec2::splat(self.margin);
        let ppm = (self.canvas / extent).min_element();
        self.ppm = if ppm.is_finite() { ppm.max(0.0) } else { 0.0 };
        self.offset = self.canvas / 2.0;
    }

    /// Pixels per meter. Zero for a degenerate (empty) canvas.
    pub fn ppm(&self) -> f32 {
        self.ppm
    }

    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    pub fn canvas_size(&self) -> Vec2 {
        self.canvas
    }

    /// Whether the transform can be inverted.
    pub fn is_valid(&self) -> bool {
        self.ppm > 0.0
    }

    pub fn world_to_pixel(&self, world: Vec2) -> Vec2 {
        Vec2::new(
            world.x * self.ppm + self.offset.x,
            -world.y * self.ppm + self.offset.y,
        )
    }

    /// Inverse of [`world_to_pixel`](Self::world_to_pixel). `None` when the
    /// viewport is degenerate.
    pub fn pixel_to_world(&self, pixel: Vec2) -> Option<Vec2> {
        if !self.is_valid() {
            return None;
        }
        Some(Vec2::new(
            (pixel.x - self.offset.x) / self.ppm,
            -(pixel.y - self.offset.y) / self.ppm,
        ))
    }

    /// Converts a world-space length (meters) into pixels.
    pub fn length_to_pixels(&self, meters: f32) -> f32 {
        meters * self.ppm
    }

    /// Pixel-space bounding rectangle of an object.
    pub fn object_rect(&self, object: &SceneObject) -> Rect {
        self.world_rect(object.position, object.size)
    }

    /// Pixel-space rectangle of the floor.
    pub fn floor_rect(&self) -> Rect {
        self.world_rect(Vec2::ZERO, self.world)
    }

    fn world_rect(&self, center: Vec2, size: Vec2) -> Rect {
        let center_px = self.world_to_pixel(center);
        // Rect normalizes min/max, so degenerate or negative sizes are fine.
        Rect::from_center_size(center_px, (size * self.ppm).abs())
    }
}
