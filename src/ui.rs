use std::time::Instant;

use ggez;
use ggez::event::MouseButton;
use ggez::graphics;
use ggez::{GameError, GameResult};

use gfx_core::{handle::RenderTargetView, memory::Typed};
use gfx_device_gl;

use imgui;
use imgui::*;
use imgui_gfx_renderer::*;

use ballpit::World;

use crate::render::Overlay;

const CONTROLS: &[(&str, &str)] = &[
    ("Space", "Randomize velocities"),
    ("C", "Stop all balls"),
    ("V", "Spawn balls"),
    ("R", "Reset balls"),
    ("B", "Remove balls"),
    ("G", "Drag to set spawn velocity"),
    ("A", "Gravitate balls"),
    ("D", "Push balls"),
    ("Arrows", "Nudge balls"),
    ("Scroll", "Spawn and effect size"),
    ("Mouse", "Grab and fling"),
    ("T", "Toggle trails"),
    ("P", "Pause"),
    ("H", "Toggle this window"),
];

#[derive(Default)]
struct MouseState {
    pos: (i32, i32),
    /// mouse buttons: (left, right, middle)
    pressed: (bool, bool, bool),
    wheel: f32,
    wheel_h: f32,
}

pub struct UiWrapper {
    pub imgui: imgui::Context,
    pub renderer: Renderer<gfx_core::format::Rgba8, gfx_device_gl::Resources>,
    hidpi_factor: f32,
    fps: f32,
    last_frame: Instant,
    mouse_state: MouseState,
}

fn menu_label(ui: &Ui, text: String) {
    let label = ImString::new(text);
    ui.menu(&label, false, || {});
}

fn build_main_menu(ui: &Ui, world: &World, overlay: &Overlay, fps: f32) {
    // Menus in main menu bar are disabled as they only serve to
    // display information
    let token = ui.push_style_color(StyleColor::TextDisabled, [1.0, 1.0, 1.0, 1.0]);
    ui.main_menu_bar(|| {
        if overlay.paused {
            ui.menu(im_str!("PAUSED"), false, || {});
        }

        menu_label(ui, format!("FPS: {:.0}", fps));
        menu_label(ui, format!("Balls: {}", world.len()));
        menu_label(ui, format!("Weightless: {}", world.interaction.weightless_count()));
        menu_label(ui, format!("Size: {}", world.interaction.spawn_size));

        let v = world.interaction.spawn_velocity;
        menu_label(ui, format!("Spawn velocity: ({:.1}, {:.1})", v.x, v.y));
    });
    token.pop(&ui);
}

fn build_controls(ui: &Ui, overlay: &Overlay) {
    Window::new(im_str!("Controls"))
        .position([10.0, 30.0], Condition::FirstUseEver)
        .size([320.0, 320.0], Condition::FirstUseEver)
        .resizable(false)
        .build(ui, || {
            for (key, action) in CONTROLS {
                ui.text(format!("{:<8} {}", key, action));
            }
            ui.separator();
            ui.text(format!("Trails: {}", if overlay.trails { "on" } else { "off" }));
        });
}

fn render_ui(ctx: &mut ggez::Context, ui: Ui,
             renderer: &mut Renderer<gfx_core::format::Rgba8, gfx_device_gl::Resources>)
             -> GameResult<()> {
    let (factory, _, encoder, _, render_target) = graphics::gfx_objects(ctx);
    let draw_data = ui.render();
    renderer.render(
        &mut *factory,
        encoder,
        &mut RenderTargetView::new(render_target.clone()),
        draw_data
    ).map_err(|e| GameError::RenderError(format!("imgui render failed: {:?}", e)))
}

impl UiWrapper {
    pub fn new(ctx: &mut ggez::Context, hidpi_factor: f32) -> GameResult<Self> {
        let mut imgui = imgui::Context::create();
        imgui.set_ini_filename(None);
        let (factory, gfx_device, _, _, _) = graphics::gfx_objects(ctx);
        let shaders = {
            let version = gfx_device.get_info().shading_language;
            if version.is_embedded {
                if version.major >= 3 {
                    Shaders::GlSlEs300
                } else {
                    Shaders::GlSlEs100
                }
            } else if version.major >= 4 {
                Shaders::GlSl400
            } else if version.major >= 3 {
                Shaders::GlSl130
            } else {
                Shaders::GlSl110
            }
        };
        let renderer = Renderer::init(&mut imgui, &mut *factory, shaders)
            .map_err(|e| GameError::RenderError(format!("imgui init failed: {:?}", e)))?;

        Ok(Self {
            imgui,
            renderer,
            hidpi_factor,
            fps: 0.0,
            last_frame: Instant::now(),
            mouse_state: MouseState::default()
        })
    }

    pub fn update_ui(&mut self, ctx: &mut ggez::Context,
                     world: &World, overlay: &Overlay) -> GameResult<()> {
        // Manually update ImGui state
        self.update_mouse();
        self.create_new_frame(ctx);

        let ui = self.imgui.frame();
        build_main_menu(&ui, world, overlay, self.fps);
        if overlay.show_controls {
            build_controls(&ui, overlay);
        }

        render_ui(ctx, ui, &mut self.renderer)
    }

    /// Whether the cursor is over an ImGui window, so clicks should not
    /// reach the world.
    pub fn wants_mouse(&self) -> bool {
        self.imgui.io().want_capture_mouse
    }

    fn create_new_frame(&mut self, ctx: &mut ggez::Context) {
        let io = self.imgui.io_mut();
        let now = Instant::now();
        let delta = now - self.last_frame;
        let delta_s = delta.as_secs_f32().max(f32::EPSILON);
        self.fps = 1.0 / delta_s;
        self.last_frame = now;

        let (draw_width, draw_height) = graphics::drawable_size(ctx);
        io.display_size = [draw_width, draw_height];
        io.display_framebuffer_scale =
            [self.hidpi_factor, self.hidpi_factor];
        io.delta_time = delta_s;
    }

    //
    // The functions below manually populate ImGui mouse state by
    // checking ggez events
    //
    fn update_mouse(&mut self) {
        let io = self.imgui.io_mut();

        io.mouse_pos = [self.mouse_state.pos.0 as f32, self.mouse_state.pos.1 as f32];
        io.mouse_down = [
            self.mouse_state.pressed.0,
            self.mouse_state.pressed.1,
            self.mouse_state.pressed.2,
            false,
            false,
        ];

        io.mouse_wheel = self.mouse_state.wheel;
        self.mouse_state.wheel = 0.0;

        io.mouse_wheel_h = self.mouse_state.wheel_h;
        self.mouse_state.wheel_h = 0.0;
    }

    pub fn update_mouse_pos(&mut self, x: f32, y: f32) {
        self.mouse_state.pos = (x as i32, y as i32);
    }

    pub fn update_mouse_down(&mut self, button: MouseButton) {
        match button {
            MouseButton::Left => self.mouse_state.pressed.0 = true,
            MouseButton::Right => self.mouse_state.pressed.1 = true,
            MouseButton::Middle => self.mouse_state.pressed.2 = true,
            _ => ()
        }
    }

    pub fn update_mouse_up(&mut self, button: MouseButton) {
        match button {
            MouseButton::Left => self.mouse_state.pressed.0 = false,
            MouseButton::Right => self.mouse_state.pressed.1 = false,
            MouseButton::Middle => self.mouse_state.pressed.2 = false,
            _ => ()
        }
    }

    pub fn update_scroll(&mut self, x: f32, y: f32) {
        self.mouse_state.wheel += y;
        self.mouse_state.wheel_h += x;
    }
}
