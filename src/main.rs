use std::path::PathBuf;

use clap::Parser;
use log::info;

use ggez;
use ggez::conf;
use ggez::event::{self, KeyCode, KeyMods, MouseButton};
use ggez::graphics::{self, Color};
use ggez::nalgebra::Point2;
use ggez::timer;
use ggez::{Context, ContextBuilder, GameError, GameResult};

use ballpit::math::clamp;
use ballpit::{Settings, Trigger, World};

mod render;
mod ui;

use crate::render::Overlay;
use crate::ui::UiWrapper;

#[derive(Parser, Debug)]
#[command(name = "ballpit", about = "Interactive bouncing ball sandbox")]
struct Args {
    /// TOML settings file; built-in defaults are used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of balls seeded at startup
    #[arg(short, long)]
    bodies: Option<usize>,

    /// Seed for reproducible runs
    #[arg(short, long)]
    seed: Option<u64>,
}

struct Sandbox {
    // Data is organised this way so `world`, `overlay` and `ui` can be
    // borrowed at the same time
    world: World,
    overlay: Overlay,
    ui: UiWrapper,
    fps: u32,
}

// Keys that are held down to act on every ball
fn trigger_for(key: KeyCode) -> Option<Trigger> {
    match key {
        KeyCode::Space => Some(Trigger::Impulse),
        KeyCode::A => Some(Trigger::Gravitate),
        KeyCode::D => Some(Trigger::Push),
        KeyCode::Up => Some(Trigger::NudgeUp),
        KeyCode::Down => Some(Trigger::NudgeDown),
        KeyCode::Left => Some(Trigger::NudgeLeft),
        KeyCode::Right => Some(Trigger::NudgeRight),
        _ => None
    }
}

impl Sandbox {
    fn new(ctx: &mut Context, settings: &Settings, hidpi_factor: f32) -> GameResult<Sandbox> {
        let mut world = World::new(settings);
        world.seed(settings.population.initial);
        let overlay = Overlay::new(settings.display.trails, world.bounds.center());

        Ok(Sandbox {
            world,
            overlay,
            ui: UiWrapper::new(ctx, hidpi_factor)?,
            fps: settings.display.fps,
        })
    }

    fn track_cursor(&mut self, x: f32, y: f32) {
        let bounds = self.world.bounds;
        self.overlay.cursor = Point2::new(
            clamp(x, 0.0, bounds.width),
            clamp(y, 0.0, bounds.height)
        );
    }
}

impl event::EventHandler for Sandbox {
    fn update(&mut self, ctx: &mut Context) -> GameResult<()> {
        while timer::check_update_time(ctx, self.fps) {
            self.overlay.tick();
            if !self.overlay.paused {
                self.world.step(self.overlay.cursor);
            }
        }

        Ok(())
    }

    fn draw(&mut self, ctx: &mut Context) -> GameResult<()> {
        graphics::clear(ctx, Color::new(0.0, 0.0, 0.0, 1.0));

        render::draw_bodies(ctx, &self.world, self.overlay.trails)?;
        render::draw_overlay(ctx, &self.world, &self.overlay)?;
        self.ui.update_ui(ctx, &self.world, &self.overlay)?;

        graphics::present(ctx)?;

        Ok(())
    }

    fn key_down_event(&mut self, ctx: &mut Context,
                      key: KeyCode, _mods: KeyMods, repeat: bool) {
        if let Some(trigger) = trigger_for(key) {
            self.world.interaction.activate(trigger);
            return;
        }
        if repeat {
            return;
        }

        match key {
            KeyCode::Escape | KeyCode::Q => event::quit(ctx),
            KeyCode::C => self.world.halt(),
            KeyCode::V => self.world.interaction.spawning = true,
            KeyCode::R => self.world.reset(),
            KeyCode::B => self.world.interaction.removing = true,
            KeyCode::G => self.overlay.gesture_start = Some(self.overlay.cursor),
            KeyCode::T => self.overlay.trails = !self.overlay.trails,
            KeyCode::P => self.overlay.paused = !self.overlay.paused,
            KeyCode::H => self.overlay.show_controls = !self.overlay.show_controls,
            _ => ()
        }
    }

    fn key_up_event(&mut self, _ctx: &mut Context, key: KeyCode, _mods: KeyMods) {
        if let Some(trigger) = trigger_for(key) {
            self.world.interaction.deactivate(trigger);
            return;
        }

        match key {
            KeyCode::V => self.world.interaction.spawning = false,
            KeyCode::B => self.world.interaction.removing = false,
            KeyCode::G => {
                if let Some(start) = self.overlay.gesture_start.take() {
                    self.world.interaction.spawn_velocity = (self.overlay.cursor - start) / 10.0;
                }
            }
            _ => ()
        }
    }

    fn mouse_button_down_event(&mut self, _ctx: &mut Context,
                               button: MouseButton, x: f32, y: f32) {
        self.ui.update_mouse_down(button);
        self.track_cursor(x, y);
        if button == MouseButton::Left && !self.ui.wants_mouse() {
            self.world.select_at(&self.overlay.cursor);
        }
    }

    fn mouse_button_up_event(&mut self, _ctx: &mut Context,
                             button: MouseButton, _x: f32, _y: f32) {
        self.ui.update_mouse_up(button);
        if button == MouseButton::Left {
            self.world.release();
        }
    }

    fn mouse_motion_event(&mut self, _ctx: &mut Context,
                          x: f32, y: f32, _dx: f32, _dy: f32) {
        self.ui.update_mouse_pos(x, y);
        self.track_cursor(x, y);
    }

    fn mouse_wheel_event(&mut self, _ctx: &mut Context, x: f32, y: f32) {
        self.ui.update_scroll(x, y);
        if y > 0.0 {
            self.world.interaction.grow_spawn_size();
        } else if y < 0.0 {
            self.world.interaction.shrink_spawn_size();
        }
        self.overlay.show_size();
    }
}

fn load_settings(args: &Args) -> GameResult<Settings> {
    let mut settings = match &args.config {
        Some(path) => Settings::load(path)
            .map_err(|e| GameError::ConfigError(format!("{}: {}", path.display(), e)))?,
        None => Settings::default()
    };

    if let Some(n) = args.bodies {
        settings.population.initial = n;
    }
    if args.seed.is_some() {
        settings.world.seed = args.seed;
    }
    Ok(settings)
}

fn main() -> GameResult {
    env_logger::init();

    let args = Args::parse();
    let settings = load_settings(&args)?;
    info!("starting with {:?}", settings);

    let (w, h) = (settings.world.width, settings.world.height);
    let cb = ContextBuilder::new("ballpit", "ggez")
        .window_setup(conf::WindowSetup::default().title("Ball Physics"))
        .window_mode(conf::WindowMode::default().dimensions(w, h));
    let (ctx, event_loop) = &mut cb.build()?;
    graphics::set_screen_coordinates(ctx, graphics::Rect::new(0.0, 0.0, w, h))?;

    let hidpi_factor = event_loop.get_primary_monitor().get_hidpi_factor() as f32;
    let game = &mut Sandbox::new(ctx, &settings, hidpi_factor)?;
    event::run(ctx, event_loop, game)
}
