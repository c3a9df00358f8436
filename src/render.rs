use ggez::graphics::{self, Color, DrawMode, DrawParam, MeshBuilder};
use ggez::nalgebra::Point2;
use ggez::{Context, GameResult};

use ballpit::World;

// Frames the spawn-size circle stays visible after a scroll
const SIZE_INDICATOR_FRAMES: u32 = 120;
const TETHER_DOTS: usize = 20;

// Presentation-only state, never read by the simulation
pub struct Overlay {
    pub cursor: Point2<f32>,
    pub trails: bool,
    pub paused: bool,
    pub show_controls: bool,
    pub gesture_start: Option<Point2<f32>>, // Where the spawn velocity drag began
    size_timer: u32,
}

impl Overlay {
    pub fn new(trails: bool, cursor: Point2<f32>) -> Overlay {
        Overlay {
            cursor,
            trails,
            paused: false,
            show_controls: true,
            gesture_start: None,
            size_timer: 0,
        }
    }

    pub fn show_size(&mut self) {
        self.size_timer = SIZE_INDICATOR_FRAMES;
    }

    pub fn tick(&mut self) {
        self.size_timer = self.size_timer.saturating_sub(1);
    }
}

pub fn draw_bodies(ctx: &mut Context, world: &World, trails: bool) -> GameResult<()> {
    if world.is_empty() {
        return Ok(());
    }

    let mut mb = MeshBuilder::new();
    for b in world.bodies() {
        let color = Color::from(b.color);
        let prev = b.prev_pos();
        if trails && (b.pos - prev).norm() > 0.5 {
            mb.circle(DrawMode::fill(), prev, b.radius(), 0.1, color);
            mb.line(&[prev, b.pos], b.radius() * 2.0, color)?;
        }
        mb.circle(DrawMode::fill(), b.pos, b.radius(), 0.1, color);
    }

    let mesh = mb.build(ctx)?;
    graphics::draw(ctx, &mesh, DrawParam::default())
}

pub fn draw_overlay(ctx: &mut Context, world: &World, overlay: &Overlay) -> GameResult<()> {
    let mut mb = MeshBuilder::new();
    let mut empty = true;
    let cursor = overlay.cursor;
    let size = world.interaction.spawn_size;

    if let Some(start) = overlay.gesture_start {
        if (cursor - start).norm() > 0.0 {
            mb.line(&[start, cursor], 2.0, Color::new(1.0, 1.0, 1.0, 0.8))?;
            empty = false;
        }
    }

    if overlay.size_timer > 0 {
        mb.circle(DrawMode::fill(), cursor, size, 0.1, Color::new(1.0, 1.0, 1.0, 0.4));
        empty = false;
    }

    if world.interaction.removing {
        mb.circle(DrawMode::fill(), cursor, size, 0.1, Color::new(1.0, 0.08, 0.08, 0.4));
        empty = false;
    }

    // Dots shrinking from the grabbed body towards the cursor
    if let Some(body) = world.selected_body() {
        let step = (body.pos - cursor) / TETHER_DOTS as f32;
        for i in 0..TETHER_DOTS {
            let dot = cursor + step * i as f32;
            let radius = (step * (TETHER_DOTS - i) as f32).norm() / 30.0 + 1.0;
            mb.circle(DrawMode::fill(), dot, radius, 0.1, Color::new(1.0, 1.0, 1.0, 0.8));
        }
        empty = false;
    }

    if empty {
        return Ok(());
    }
    let mesh = mb.build(ctx)?;
    graphics::draw(ctx, &mesh, DrawParam::default())
}
