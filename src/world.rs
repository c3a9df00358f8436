use nalgebra::{Point2, Vector2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::body::Body;
use crate::collision::{self, pair_mut};
use crate::config::{PopulationConfig, Settings};
use crate::state::{Interaction, Trigger};

/// Size of the box bodies live in. The origin is the top-left corner and
/// y grows downwards, so the floor is at `height`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(width: f32, height: f32) -> Bounds {
        Bounds { width, height }
    }

    pub fn center(&self) -> Point2<f32> {
        Point2::new(self.width / 2.0, self.height / 2.0)
    }
}

#[derive(Debug, Clone)]
pub struct World {
    pub bounds: Bounds,
    pub gravity: f32, // Added to vertical velocity each frame
    pub air_density: f32,
    pub interaction: Interaction,

    pub(crate) bodies: Vec<Body>,
    pub(crate) selected: Option<usize>, // Body being dragged by the cursor
    pub(crate) population: PopulationConfig,
    pub(crate) cooldown: u32, // Frames left before the next spawn
    pub(crate) rng: StdRng,

    impulse: f32,
    nudge: f32,
}

impl World {
    /// Empty world. Seeded from `settings.world.seed` when set, otherwise
    /// from the operating system.
    pub fn new(settings: &Settings) -> World {
        let rng = match settings.world.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        World {
            bounds: Bounds::new(settings.world.width, settings.world.height),
            gravity: settings.world.gravity,
            air_density: settings.world.air_density,
            interaction: Interaction::new(&settings.interaction),
            bodies: Vec::new(),
            selected: None,
            population: settings.population.clone(),
            cooldown: 0,
            rng,
            impulse: settings.interaction.impulse,
            nudge: settings.interaction.nudge,
        }
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn bodies_mut(&mut self) -> &mut [Body] {
        &mut self.bodies
    }

    pub fn body(&self, idx: usize) -> Option<&Body> {
        self.bodies.get(idx)
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_body(&self) -> Option<&Body> {
        self.selected.and_then(|idx| self.bodies.get(idx))
    }

    /// Advances the world by one frame. `cursor` must already be clamped to
    /// the world bounds.
    pub fn step(&mut self, cursor: Point2<f32>) {
        self.spawn_at_cursor(cursor);
        if self.interaction.removing {
            let radius = self.interaction.spawn_size;
            self.remove_in_radius(&cursor, radius);
        }

        let gravity = self.gravity * self.interaction.gravity_scale();
        for i in 0..self.bodies.len() {
            if self.selected == Some(i) {
                self.drag_towards(i, cursor);
            }
            self.bodies[i].advance(gravity, self.air_density, &self.bounds);

            for j in 0..self.bodies.len() {
                if i == j {
                    continue;
                }
                let (a, b) = pair_mut(&mut self.bodies, i, j);
                collision::collide(a, b);
            }
        }

        self.apply_interactions(cursor);
    }

    // Spring-like pull: steers the velocity towards the cursor offset
    fn drag_towards(&mut self, idx: usize, cursor: Point2<f32>) {
        let strength = self.interaction.spawn_size / 10.0;
        let body = &mut self.bodies[idx];
        let correction = ((cursor - body.pos) - body.v) / (body.mass() * 0.01);
        body.v += correction * strength;
    }

    fn apply_interactions(&mut self, cursor: Point2<f32>) {
        let input = &self.interaction;

        if input.is_active(Trigger::Impulse) {
            for b in self.bodies.iter_mut() {
                let kick = Vector2::new(
                    self.rng.random_range(-1.0f32..1.0),
                    self.rng.random_range(-1.0f32..1.0),
                );
                b.v += kick * self.impulse;
            }
        }

        // Gravitate wins when both are held
        let radial = if input.is_active(Trigger::Gravitate) {
            Some(1.0)
        } else if input.is_active(Trigger::Push) {
            Some(-1.0)
        } else {
            None
        };
        if let Some(sign) = radial {
            for b in self.bodies.iter_mut() {
                let force = sign * input.spawn_size * 0.1 / b.mass();
                b.v -= (b.pos - cursor) * force;
            }
        }

        let mut nudge = Vector2::new(0.0, 0.0);
        if input.is_active(Trigger::NudgeUp) {
            nudge.y -= self.nudge;
        }
        if input.is_active(Trigger::NudgeDown) {
            nudge.y += self.nudge;
        }
        if input.is_active(Trigger::NudgeLeft) {
            nudge.x -= self.nudge;
        }
        if input.is_active(Trigger::NudgeRight) {
            nudge.x += self.nudge;
        }
        if nudge != Vector2::new(0.0, 0.0) {
            for b in self.bodies.iter_mut() {
                b.v += nudge;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::population::SpawnRequest;
    use approx::assert_relative_eq;

    fn settings() -> Settings {
        let mut settings = Settings::default();
        settings.world.seed = Some(11);
        settings
    }

    fn world_with(bodies: &[(f32, f32, f32, f32, f32)]) -> World {
        let mut world = World::new(&settings());
        for &(x, y, vx, vy, r) in bodies {
            world.spawn(SpawnRequest::at(Point2::new(x, y))
                .with_velocity(Vector2::new(vx, vy))
                .with_radius(r));
        }
        world
    }

    #[test]
    fn empty_world_step_is_a_noop() {
        let mut world = World::new(&settings());
        let before = world.interaction.clone();
        world.step(Point2::new(10.0, 10.0));
        assert!(world.is_empty());
        assert_eq!(world.selected(), None);
        assert_eq!(world.interaction, before);
    }

    #[test]
    fn gravity_applies_when_idle() {
        let mut world = world_with(&[(600.0, 100.0, 0.0, 0.0, 10.0)]);
        world.step(Point2::new(0.0, 0.0));
        assert_relative_eq!(world.bodies()[0].v.y, 0.2);
        assert_relative_eq!(world.bodies()[0].pos.y, 100.2);
    }

    #[test]
    fn held_trigger_suspends_gravity() {
        let mut world = world_with(&[(600.0, 100.0, 0.0, 0.0, 10.0)]);
        world.interaction.activate(Trigger::NudgeLeft);
        world.step(Point2::new(0.0, 0.0));

        let b = &world.bodies()[0];
        assert_eq!(b.v.y, 0.0);
        assert_eq!(b.pos.y, 100.0);
        assert_relative_eq!(b.v.x, -1.0);

        world.interaction.deactivate(Trigger::NudgeLeft);
        world.step(Point2::new(0.0, 0.0));
        assert!(world.bodies()[0].v.y > 0.0);
    }

    #[test]
    fn nudges_add_constant_velocity() {
        let mut world = world_with(&[(600.0, 100.0, 0.0, 0.0, 10.0)]);
        world.air_density = 0.0;
        world.interaction.activate(Trigger::NudgeUp);
        world.interaction.activate(Trigger::NudgeRight);
        for _ in 0..3 {
            world.step(Point2::new(0.0, 0.0));
        }
        let b = &world.bodies()[0];
        assert_relative_eq!(b.v.x, 3.0, epsilon = 1e-5);
        assert_relative_eq!(b.v.y, -3.0, epsilon = 1e-5);
    }

    #[test]
    fn gravitate_pulls_and_push_repels() {
        let cursor = Point2::new(300.0, 100.0);

        let mut world = world_with(&[(100.0, 100.0, 0.0, 0.0, 10.0)]);
        world.air_density = 0.0;
        world.interaction.activate(Trigger::Gravitate);
        world.step(cursor);
        let mass = world.bodies()[0].mass();
        assert_relative_eq!(world.bodies()[0].v.x, 200.0 * 10.0 * 0.1 / mass, epsilon = 1e-5);

        let mut world = world_with(&[(100.0, 100.0, 0.0, 0.0, 10.0)]);
        world.air_density = 0.0;
        world.interaction.activate(Trigger::Push);
        world.step(cursor);
        assert!(world.bodies()[0].v.x < 0.0);
    }

    #[test]
    fn gravitate_takes_priority_over_push() {
        let mut world = world_with(&[(100.0, 100.0, 0.0, 0.0, 10.0)]);
        world.interaction.activate(Trigger::Push);
        world.interaction.activate(Trigger::Gravitate);
        world.step(Point2::new(300.0, 100.0));
        assert!(world.bodies()[0].v.x > 0.0);
    }

    #[test]
    fn impulse_is_bounded() {
        let mut world = world_with(&[
            (200.0, 200.0, 0.0, 0.0, 10.0),
            (600.0, 200.0, 0.0, 0.0, 10.0),
            (1000.0, 200.0, 0.0, 0.0, 10.0),
        ]);
        world.interaction.activate(Trigger::Impulse);
        world.step(Point2::new(0.0, 0.0));
        for b in world.bodies() {
            assert!(b.v.x.abs() <= 20.0 && b.v.y.abs() <= 20.0);
        }
        assert!(world.bodies().iter().any(|b| b.v.norm() > 0.0));
    }

    #[test]
    fn grabbed_body_follows_cursor() {
        let mut world = world_with(&[(300.0, 300.0, 0.0, 0.0, 20.0)]);
        world.gravity = 0.0;
        assert_eq!(world.select_at(&Point2::new(305.0, 300.0)), Some(0));
        world.step(Point2::new(400.0, 300.0));
        assert!(world.bodies()[0].v.x > 0.0);
        assert!(world.bodies()[0].pos.x > 300.0);
    }

    #[test]
    fn grab_steers_velocity_towards_cursor_offset() {
        let mut world = world_with(&[(300.0, 300.0, 2.0, -1.0, 20.0)]);
        world.gravity = 0.0;
        world.air_density = 0.0;
        world.interaction.spawn_size = 14.0;
        assert_eq!(world.select_at(&Point2::new(300.0, 300.0)), Some(0));

        let cursor = Point2::new(400.0, 250.0);
        let v0 = Vector2::new(2.0f32, -1.0);
        let mass = world.bodies()[0].mass();
        let expected = v0 + ((cursor - Point2::new(300.0, 300.0)) - v0) / (mass * 0.01) * 1.4;

        world.step(cursor);
        let b = &world.bodies()[0];
        assert_relative_eq!(b.v.x, expected.x, epsilon = 1e-4);
        assert_relative_eq!(b.v.y, expected.y, epsilon = 1e-4);
        assert_relative_eq!(b.pos.x, 300.0 + expected.x, epsilon = 1e-3);
        assert_relative_eq!(b.pos.y, 300.0 + expected.y, epsilon = 1e-3);
    }

    #[test]
    fn overlapping_bodies_separate_during_step() {
        let mut world = world_with(&[
            (500.0, 300.0, 0.0, 0.0, 10.0),
            (512.0, 300.0, 0.0, 0.0, 10.0),
        ]);
        world.gravity = 0.0;
        world.step(Point2::new(0.0, 0.0));
        let (a, b) = (&world.bodies()[0], &world.bodies()[1]);
        assert!((a.pos - b.pos).norm() >= 20.0);
    }

    #[test]
    fn single_body_stays_within_side_walls() {
        let mut world = world_with(&[(600.0, 300.0, 37.0, -12.0, 15.0)]);
        for frame in 0..2000 {
            if frame % 97 == 0 {
                world.bodies_mut()[0].v.x += 40.0;
            }
            world.step(Point2::new(0.0, 0.0));
            let b = &world.bodies()[0];
            assert!(b.pos.x >= b.radius() && b.pos.x <= 1200.0 - b.radius());
            assert!(b.pos.y <= 600.0 - b.radius());
        }
    }
}
