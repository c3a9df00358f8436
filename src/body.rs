use std::f32::consts::PI;

use nalgebra::{Point2, Vector2};

use crate::collision;
use crate::math::{clamp, polar_to_cartesian};
use crate::world::Bounds;

/// Drag coefficient of a sphere.
pub const DRAG_COEFFICIENT: f32 = 0.47;

/// Largest speed that can still be squared without overflowing.
pub fn max_safe_speed() -> f32 {
    f32::MAX.sqrt().floor()
}

// All points/vectors are in world coordinates, 1 unit = 1 pixel.
// Velocities are in units per frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub pos: Point2<f32>,
    pub v: Vector2<f32>,
    pub friction: f32, // Fraction of speed kept on every bounce
    pub color: [f32; 4],

    prev_pos: Point2<f32>, // Position before the last advance, for trails
    mass: f32,
    radius: f32,
}

impl Body {
    /// Creates a disc of unit density, so `mass = PI * radius^2`.
    ///
    /// Panics if `radius` is not positive.
    pub fn new(pos: Point2<f32>, v: Vector2<f32>, radius: f32,
               friction: f32, color: [f32; 4]) -> Body {
        assert!(radius > 0.0, "body radius must be positive, got {}", radius);
        Body {
            pos, v, friction, color,
            prev_pos: pos,
            mass: PI * radius * radius,
            radius
        }
    }

    pub fn mass(&self) -> f32 {
        self.mass
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn prev_pos(&self) -> Point2<f32> {
        self.prev_pos
    }

    /// Current speed, clamped to [`max_safe_speed`] when squaring the
    /// velocity would overflow.
    pub fn speed(&self) -> f32 {
        let limit = max_safe_speed();
        let squared = self.v.x * self.v.x + self.v.y * self.v.y;
        if !squared.is_finite() {
            return limit;
        }
        clamp(squared.sqrt(), 0.0, limit)
    }

    pub fn heading(&self) -> f32 {
        self.v.y.atan2(self.v.x)
    }

    /// Applies `force` along `angle` as a one-frame impulse.
    pub fn apply_force(&mut self, force: f32, angle: f32) {
        self.v += polar_to_cartesian(force, angle) / self.mass;
    }

    // Mass stands in for the cross-sectional area, so it cancels out of the
    // velocity change and the force itself is never formed
    pub fn apply_drag(&mut self, air_density: f32, speed: f32) {
        let decel = 0.5 * air_density * speed * speed * DRAG_COEFFICIENT;
        self.v -= polar_to_cartesian(decel, self.heading());
    }

    pub fn apply_friction(&mut self) {
        let speed = self.speed() * self.friction;
        self.v = polar_to_cartesian(speed, self.heading());
    }

    /// Bounces off the side walls and the floor. There is no ceiling.
    pub fn bound(&mut self, bounds: &Bounds) {
        let (w, h) = (bounds.width, bounds.height);

        if self.pos.x < self.radius || self.pos.x > w - self.radius {
            self.v.x = -self.v.x;
            self.apply_friction();
        }

        if self.pos.y > h - self.radius {
            self.v.y = -self.v.y;
            self.pos.y = h - self.radius;
            self.apply_friction();
        }

        self.pos.x = clamp(self.pos.x, self.radius, w - self.radius);
    }

    // Semi-implicit Euler: velocity first, then position
    pub fn integrate(&mut self, gravity: f32) {
        self.v.y += gravity;
        self.pos += self.v;
    }

    /// Drag, gravity, position update and wall handling for one frame.
    /// Collisions with other bodies are left to the world.
    pub fn advance(&mut self, gravity: f32, air_density: f32, bounds: &Bounds) {
        self.prev_pos = self.pos;
        let speed = self.speed();
        self.apply_drag(air_density, speed);
        self.integrate(gravity);
        self.bound(bounds);
    }

    /// Strict overlap with a probe circle; `radius` may be 0 for a point.
    pub fn overlaps(&self, center: &Point2<f32>, radius: f32) -> bool {
        collision::circles_overlap(&self.pos, self.radius, center, radius)
    }
}
