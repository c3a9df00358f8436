use log::{debug, info};
use nalgebra::{Point2, Vector2};
use rand::rngs::StdRng;
use rand::Rng;

use crate::body::Body;
use crate::math::hue_color;
use crate::world::World;

/// What to spawn. Every field left as `None` is randomised.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SpawnRequest {
    pub pos: Option<Point2<f32>>,
    pub v: Option<Vector2<f32>>,
    pub radius: Option<f32>,
}

impl SpawnRequest {
    pub fn random() -> SpawnRequest {
        SpawnRequest::default()
    }

    pub fn at(pos: Point2<f32>) -> SpawnRequest {
        SpawnRequest { pos: Some(pos), ..SpawnRequest::default() }
    }

    pub fn with_velocity(mut self, v: Vector2<f32>) -> SpawnRequest {
        self.v = Some(v);
        self
    }

    pub fn with_radius(mut self, radius: f32) -> SpawnRequest {
        self.radius = Some(radius);
        self
    }
}

// Uniform in [lo, hi], or `lo` when the range is empty
fn sample_span(rng: &mut StdRng, lo: f32, hi: f32) -> f32 {
    if hi > lo {
        rng.random_range(lo..=hi)
    } else {
        lo
    }
}

impl World {
    /// Appends an already built body and returns its index.
    pub fn push(&mut self, body: Body) -> usize {
        self.bodies.push(body);
        self.bodies.len() - 1
    }

    /// Builds a body from `req`, filling the gaps randomly, and returns its
    /// index. Mass follows from the radius and the color from a random hue.
    pub fn spawn(&mut self, req: SpawnRequest) -> usize {
        let radius = req.radius.unwrap_or_else(|| self.random_radius());
        let pos = req.pos.unwrap_or_else(|| self.random_position(radius));
        let v = req.v.unwrap_or_else(|| self.random_velocity());
        let color = hue_color(self.rng.random_range(0.0..360.0));

        let idx = self.push(Body::new(pos, v, radius, self.population.friction, color));
        debug!("spawned body {} at ({:.1}, {:.1}) with radius {}", idx, pos.x, pos.y, radius);
        idx
    }

    /// Adds `count` bodies at random places, at rest.
    pub fn seed(&mut self, count: usize) {
        for _ in 0..count {
            let radius = self.random_radius();
            let pos = self.random_position(radius);
            self.spawn(SpawnRequest::at(pos)
                .with_velocity(Vector2::new(0.0, 0.0))
                .with_radius(radius));
        }
        info!("seeded {} bodies, {} total", count, self.bodies.len());
    }

    /// Removes every body overlapping the probe circle and returns how many
    /// went. A selection pointing past the end is pulled back to the last
    /// body, or cleared when none are left.
    pub fn remove_in_radius(&mut self, center: &Point2<f32>, radius: f32) -> usize {
        let before = self.bodies.len();
        self.bodies.retain(|b| !b.overlaps(center, radius));
        let removed = before - self.bodies.len();

        if let Some(idx) = self.selected {
            if idx >= self.bodies.len() {
                self.selected = self.bodies.len().checked_sub(1);
            }
        }

        if removed > 0 {
            debug!("removed {} bodies around ({:.1}, {:.1})", removed, center.x, center.y);
        }
        removed
    }

    pub fn reset(&mut self) {
        self.bodies.clear();
        self.selected = None;
        debug!("world reset");
    }

    /// Selects the last body under `point`, if any, and returns its index.
    pub fn select_at(&mut self, point: &Point2<f32>) -> Option<usize> {
        self.selected = self.bodies.iter().rposition(|b| b.overlaps(point, 0.0));
        self.selected
    }

    pub fn release(&mut self) {
        self.selected = None;
    }

    /// Stops every body in place.
    pub fn halt(&mut self) {
        for b in self.bodies.iter_mut() {
            b.v = Vector2::new(0.0, 0.0);
        }
    }

    // Spawns at the cursor at most once every `spawn_cooldown + 1` frames
    pub(crate) fn spawn_at_cursor(&mut self, cursor: Point2<f32>) {
        if self.interaction.spawning && self.cooldown == 0 {
            self.spawn(SpawnRequest::at(cursor)
                .with_velocity(self.interaction.spawn_velocity)
                .with_radius(self.interaction.spawn_size));
            self.cooldown = self.population.spawn_cooldown;
        } else if self.cooldown > 0 {
            self.cooldown -= 1;
        }
    }

    fn random_radius(&mut self) -> f32 {
        let lo = self.population.min_radius.ceil();
        let hi = self.population.max_radius.floor();
        if hi < lo {
            return self.population.min_radius;
        }
        self.rng.random_range(lo as u32..=hi as u32) as f32
    }

    fn random_position(&mut self, radius: f32) -> Point2<f32> {
        let (w, h) = (self.bounds.width, self.bounds.height);
        Point2::new(
            sample_span(&mut self.rng, radius, w - radius),
            sample_span(&mut self.rng, radius, h - radius),
        )
    }

    fn random_velocity(&mut self) -> Vector2<f32> {
        let max = self.population.max_spawn_speed;
        Vector2::new(
            sample_span(&mut self.rng, -max, max),
            sample_span(&mut self.rng, -max, max),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use approx::assert_relative_eq;
    use std::f32::consts::PI;

    fn world() -> World {
        let mut settings = Settings::default();
        settings.world.seed = Some(3);
        World::new(&settings)
    }

    fn still(world: &mut World, x: f32, y: f32, radius: f32) -> usize {
        world.spawn(SpawnRequest::at(Point2::new(x, y))
            .with_velocity(Vector2::new(0.0, 0.0))
            .with_radius(radius))
    }

    #[test]
    fn explicit_spawn() {
        let mut world = world();
        let before = world.len();
        let idx = still(&mut world, 100.0, 100.0, 15.0);

        assert_eq!(world.len(), before + 1);
        let b = world.body(idx).unwrap();
        assert_relative_eq!(b.mass(), PI * 225.0);
        assert_eq!(b.pos, Point2::new(100.0, 100.0));
        assert_eq!(b.v, Vector2::new(0.0, 0.0));
        assert_eq!(b.friction, 0.9);
    }

    #[test]
    fn random_spawn_respects_population_config() {
        let mut world = world();
        for _ in 0..200 {
            world.spawn(SpawnRequest::random());
        }
        for b in world.bodies() {
            let r = b.radius();
            assert!(r >= 5.0 && r <= 30.0 && r.fract() == 0.0);
            assert!(b.pos.x >= r && b.pos.x <= 1200.0 - r);
            assert!(b.pos.y >= r && b.pos.y <= 600.0 - r);
            assert!(b.v.x.abs() <= 10.0 && b.v.y.abs() <= 10.0);
        }
    }

    #[test]
    fn seed_starts_at_rest() {
        let mut world = world();
        world.seed(25);
        assert_eq!(world.len(), 25);
        assert!(world.bodies().iter().all(|b| b.v == Vector2::new(0.0, 0.0)));
    }

    #[test]
    fn point_probe_removes_body_under_it() {
        let mut world = world();
        still(&mut world, 100.0, 100.0, 10.0);
        still(&mut world, 300.0, 100.0, 10.0);

        assert_eq!(world.remove_in_radius(&Point2::new(100.0, 100.0), 0.0), 1);
        assert_eq!(world.len(), 1);
        assert_eq!(world.bodies()[0].pos.x, 300.0);
    }

    #[test]
    fn tangent_body_is_kept() {
        let mut world = world();
        still(&mut world, 100.0, 100.0, 10.0);
        assert_eq!(world.remove_in_radius(&Point2::new(115.0, 100.0), 5.0), 0);
        assert_eq!(world.len(), 1);
    }

    #[test]
    fn removal_clamps_selection() {
        let mut world = world();
        still(&mut world, 100.0, 100.0, 10.0);
        still(&mut world, 300.0, 100.0, 10.0);
        still(&mut world, 500.0, 100.0, 10.0);

        assert_eq!(world.select_at(&Point2::new(500.0, 100.0)), Some(2));
        world.remove_in_radius(&Point2::new(500.0, 100.0), 1.0);
        assert_eq!(world.selected(), Some(1));

        world.remove_in_radius(&Point2::new(200.0, 100.0), 150.0);
        assert!(world.is_empty());
        assert_eq!(world.selected(), None);
    }

    #[test]
    fn selection_prefers_last_match() {
        let mut world = world();
        still(&mut world, 100.0, 100.0, 20.0);
        still(&mut world, 110.0, 100.0, 20.0);
        assert_eq!(world.select_at(&Point2::new(105.0, 100.0)), Some(1));
        assert_eq!(world.select_at(&Point2::new(700.0, 100.0)), None);

        world.select_at(&Point2::new(100.0, 100.0));
        world.release();
        assert_eq!(world.selected(), None);
    }

    #[test]
    fn reset_empties_without_reseeding() {
        let mut world = world();
        world.seed(10);
        let grabbed = world.bodies()[3].pos;
        assert!(world.select_at(&grabbed).is_some());
        world.reset();
        assert!(world.is_empty());
        assert_eq!(world.selected(), None);
        world.step(Point2::new(0.0, 0.0));
        assert!(world.is_empty());
    }

    #[test]
    fn halt_zeroes_velocities() {
        let mut world = world();
        for _ in 0..5 {
            world.spawn(SpawnRequest::random().with_velocity(Vector2::new(3.0, -2.0)));
        }
        world.halt();
        assert!(world.bodies().iter().all(|b| b.v == Vector2::new(0.0, 0.0)));
    }

    #[test]
    fn spawning_respects_cooldown() {
        let mut world = world();
        world.interaction.spawning = true;
        world.interaction.spawn_velocity = Vector2::new(1.0, -1.0);

        for _ in 0..4 {
            world.step(Point2::new(600.0, 100.0));
        }
        // Cooldown of one frame: spawns on frames 0 and 2
        assert_eq!(world.len(), 2);
        assert_relative_eq!(world.bodies()[0].radius(), 10.0);

        world.interaction.spawning = false;
        world.step(Point2::new(600.0, 100.0));
        assert_eq!(world.len(), 2);
    }

    #[test]
    fn removing_uses_spawn_size_probe() {
        let mut world = world();
        still(&mut world, 600.0, 300.0, 5.0);
        still(&mut world, 900.0, 300.0, 5.0);
        world.interaction.removing = true;
        world.step(Point2::new(610.0, 300.0));
        assert_eq!(world.len(), 1);
    }
}
