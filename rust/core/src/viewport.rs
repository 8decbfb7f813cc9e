// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! 2D view transform between world inches and screen pixels

use crate::segment::Point2D;

/// Zoom step applied per wheel notch
pub const ZOOM_STEP: f64 = 1.1;
pub const MIN_SCALE: f64 = 0.1;
pub const MAX_SCALE: f64 = 20.0;

/// Pan/zoom state of the plan view.
///
/// `offset` is the world point shown at the screen origin and `scale` is
/// pixels per inch: `screen = (world - offset) * scale`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub scale: f64,
    pub offset: Point2D,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            scale: 1.0,
            offset: Point2D::new(0.0, 0.0),
        }
    }
}

impl Viewport {
    pub fn new(scale: f64, offset: Point2D) -> Self {
        Self {
            scale: scale.clamp(MIN_SCALE, MAX_SCALE),
            offset,
        }
    }

    pub fn world_to_screen(&self, p: Point2D) -> Point2D {
        Point2D::new(
            (p.x - self.offset.x) * self.scale,
            (p.y - self.offset.y) * self.scale,
        )
    }

    pub fn screen_to_world(&self, s: Point2D) -> Point2D {
        Point2D::new(
            s.x / self.scale + self.offset.x,
            s.y / self.scale + self.offset.y,
        )
    }

    /// World distance covered by `pixels` on screen
    #[inline]
    pub fn pixels_to_world(&self, pixels: f64) -> f64 {
        pixels / self.scale
    }

    /// Zoom in (`steps > 0`) or out about a screen point, keeping the world
    /// point under it fixed
    pub fn zoom_at(&mut self, screen: Point2D, steps: i32) {
        let anchor = self.screen_to_world(screen);
        self.scale = (self.scale * ZOOM_STEP.powi(steps)).clamp(MIN_SCALE, MAX_SCALE);
        self.offset = Point2D::new(
            anchor.x - screen.x / self.scale,
            anchor.y - screen.y / self.scale,
        );
    }

    /// Move the view by a screen-space drag delta
    pub fn pan(&mut self, dx_screen: f64, dy_screen: f64) {
        self.offset.x -= dx_screen / self.scale;
        self.offset.y -= dy_screen / self.scale;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_round_trip_conversion() {
        let vp = Viewport::new(2.5, Point2D::new(-30.0, 12.0));
        let w = Point2D::new(17.0, -4.0);
        let back = vp.screen_to_world(vp.world_to_screen(w));
        assert_relative_eq!(back.x, w.x, epsilon = 1e-9);
        assert_relative_eq!(back.y, w.y, epsilon = 1e-9);
    }

    #[test]
    fn test_zoom_keeps_anchor_fixed() {
        let mut vp = Viewport::default();
        let cursor = Point2D::new(300.0, 200.0);
        let before = vp.screen_to_world(cursor);
        vp.zoom_at(cursor, 3);
        let after = vp.screen_to_world(cursor);
        assert_relative_eq!(before.x, after.x, epsilon = 1e-9);
        assert_relative_eq!(before.y, after.y, epsilon = 1e-9);
        assert_relative_eq!(vp.scale, 1.331, epsilon = 1e-12);
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut vp = Viewport::default();
        vp.zoom_at(Point2D::new(0.0, 0.0), 200);
        assert_eq!(vp.scale, MAX_SCALE);
        vp.zoom_at(Point2D::new(0.0, 0.0), -400);
        assert_eq!(vp.scale, MIN_SCALE);
    }

    #[test]
    fn test_pan_moves_opposite_to_drag() {
        let mut vp = Viewport::new(2.0, Point2D::new(0.0, 0.0));
        vp.pan(10.0, -4.0);
        assert_eq!(vp.offset, Point2D::new(-5.0, 2.0));
    }
}
