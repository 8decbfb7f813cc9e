// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Orbit and first-person cameras for the 3D view
//!
//! Both work in plan coordinates (Z-up, inches). Input is pointer deltas in
//! pixels and wheel deltas in the browser convention (positive zooms out).

use crate::scene::PlanBounds;
use nalgebra::{Point3, Vector3};
use plan_lite_core::Point2D;
use plan_lite_geometry::collision::{
    resolve_walk_step, walk_delta, WalkInput, EYE_HEIGHT, WALK_RADIUS, WALK_SPEED,
};
use plan_lite_geometry::WallCollider;
use std::f64::consts::FRAC_PI_2;

/// Radians per pixel of orbit drag
pub const ORBIT_SPEED: f64 = 0.01;

/// Radians per pixel of mouse-look
pub const LOOK_SPEED: f64 = 0.0025;

/// Elevation and pitch stay this far from straight up or down
pub const POLE_MARGIN: f64 = 0.1;

pub const MIN_ORBIT_RADIUS: f64 = 50.0;
pub const MAX_ORBIT_RADIUS: f64 = 5000.0;

/// Orbit camera elevation relative to the ceiling on framing
pub const FRAMING_HEIGHT_FACTOR: f64 = 1.2;

fn clamp_to_poles(angle: f64) -> f64 {
    angle.clamp(-(FRAC_PI_2 - POLE_MARGIN), FRAC_PI_2 - POLE_MARGIN)
}

/// Camera orbiting a target point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitCamera {
    pub target: Point3<f64>,
    pub radius: f64,
    /// Azimuth around +Z
    pub phi: f64,
    /// Elevation above the floor plane
    pub theta: f64,
}

impl OrbitCamera {
    /// Frame the plan from the corner diagonal to its centre
    pub fn framing(bounds: &PlanBounds, ceiling_height: f64) -> Self {
        let c = bounds.center();
        let radius = bounds.orbit_radius();
        let target = Point3::new(c.x, c.y, 0.0);
        let offset = Vector3::new(radius, radius, ceiling_height * FRAMING_HEIGHT_FACTOR);
        Self::looking_from(target, offset)
    }

    /// Orbit that places the eye at `target + offset`
    pub fn looking_from(target: Point3<f64>, offset: Vector3<f64>) -> Self {
        let radius = offset.norm().clamp(MIN_ORBIT_RADIUS, MAX_ORBIT_RADIUS);
        let phi = offset.y.atan2(offset.x);
        let theta = clamp_to_poles((offset.z / radius).clamp(-1.0, 1.0).asin());
        Self {
            target,
            radius,
            phi,
            theta,
        }
    }

    pub fn rotate(&mut self, dx: f64, dy: f64) {
        self.phi -= dx * ORBIT_SPEED;
        self.theta = clamp_to_poles(self.theta + dy * ORBIT_SPEED);
    }

    pub fn zoom(&mut self, wheel_delta: f64) {
        let factor = if wheel_delta > 0.0 { 1.1 } else { 0.9 };
        self.radius = (self.radius * factor).clamp(MIN_ORBIT_RADIUS, MAX_ORBIT_RADIUS);
    }

    pub fn position(&self) -> Point3<f64> {
        let (st, ct) = self.theta.sin_cos();
        let (sp, cp) = self.phi.sin_cos();
        self.target + Vector3::new(ct * cp, ct * sp, st) * self.radius
    }
}

/// First-person walker confined by wall colliders
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WalkCamera {
    pub position: Point2D,
    pub yaw: f64,
    pub pitch: f64,
}

impl WalkCamera {
    /// Start at the plan centre looking along +Y
    pub fn enter(bounds: &PlanBounds) -> Self {
        Self {
            position: bounds.center(),
            yaw: 0.0,
            pitch: 0.0,
        }
    }

    pub fn look(&mut self, dx: f64, dy: f64) {
        self.yaw -= dx * LOOK_SPEED;
        self.pitch = clamp_to_poles(self.pitch - dy * LOOK_SPEED);
    }

    /// Move one step, sliding along walls that block the full move
    pub fn step(&mut self, colliders: &[WallCollider], input: WalkInput) {
        let delta = walk_delta(self.yaw, input, WALK_SPEED);
        if delta.x == 0.0 && delta.y == 0.0 {
            return;
        }
        self.position = resolve_walk_step(colliders, &self.position, delta, WALK_RADIUS);
    }

    pub fn eye(&self) -> Point3<f64> {
        Point3::new(self.position.x, self.position.y, EYE_HEIGHT)
    }

    pub fn look_direction(&self) -> Vector3<f64> {
        let (sp, cp) = self.pitch.sin_cos();
        Vector3::new(self.yaw.sin() * cp, self.yaw.cos() * cp, sp)
    }
}
