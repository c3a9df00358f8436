use nalgebra::Vector2;

use crate::config::InteractionConfig;

/// Held interactions that act on every body and suspend gravity while held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    Impulse,
    Gravitate,
    Push,
    NudgeUp,
    NudgeDown,
    NudgeLeft,
    NudgeRight,
}

impl Trigger {
    pub const ALL: [Trigger; 7] = [
        Trigger::Impulse,
        Trigger::Gravitate,
        Trigger::Push,
        Trigger::NudgeUp,
        Trigger::NudgeDown,
        Trigger::NudgeLeft,
        Trigger::NudgeRight,
    ];
}

// Everything the input layer can switch on or off between frames.
// Trigger flags only move through `activate`/`deactivate` so the
// weightless counter always matches them.
#[derive(Debug, Clone, PartialEq)]
pub struct Interaction {
    pub spawning: bool,
    pub removing: bool,

    pub spawn_size: f32, // Radius of spawned bodies, also the effect intensity
    pub spawn_velocity: Vector2<f32>,

    impulse: bool,
    gravitate: bool,
    push: bool,
    nudge_up: bool,
    nudge_down: bool,
    nudge_left: bool,
    nudge_right: bool,
    weightless: u32, // Number of held triggers
    spawn_size_step: f32,
}

impl Interaction {
    pub fn new(config: &InteractionConfig) -> Interaction {
        Interaction {
            impulse: false,
            gravitate: false,
            push: false,
            nudge_up: false,
            nudge_down: false,
            nudge_left: false,
            nudge_right: false,
            spawning: false,
            removing: false,
            spawn_size: config.spawn_size,
            spawn_velocity: Vector2::new(0.0, 0.0),
            weightless: 0,
            spawn_size_step: config.spawn_size_step,
        }
    }

    fn flag_mut(&mut self, trigger: Trigger) -> &mut bool {
        match trigger {
            Trigger::Impulse => &mut self.impulse,
            Trigger::Gravitate => &mut self.gravitate,
            Trigger::Push => &mut self.push,
            Trigger::NudgeUp => &mut self.nudge_up,
            Trigger::NudgeDown => &mut self.nudge_down,
            Trigger::NudgeLeft => &mut self.nudge_left,
            Trigger::NudgeRight => &mut self.nudge_right,
        }
    }

    pub fn is_active(&self, trigger: Trigger) -> bool {
        match trigger {
            Trigger::Impulse => self.impulse,
            Trigger::Gravitate => self.gravitate,
            Trigger::Push => self.push,
            Trigger::NudgeUp => self.nudge_up,
            Trigger::NudgeDown => self.nudge_down,
            Trigger::NudgeLeft => self.nudge_left,
            Trigger::NudgeRight => self.nudge_right,
        }
    }

    /// Switches a trigger on. Repeated activation (key repeat) is ignored
    /// so the weightless counter only moves on real transitions.
    pub fn activate(&mut self, trigger: Trigger) {
        let flag = self.flag_mut(trigger);
        if !*flag {
            *flag = true;
            self.weightless += 1;
        }
    }

    pub fn deactivate(&mut self, trigger: Trigger) {
        let flag = self.flag_mut(trigger);
        if *flag {
            *flag = false;
            self.weightless -= 1;
        }
    }

    pub fn weightless_count(&self) -> u32 {
        self.weightless
    }

    pub fn is_weightless(&self) -> bool {
        self.weightless > 0
    }

    /// Multiplier applied to the world's gravity this frame.
    pub fn gravity_scale(&self) -> f32 {
        if self.is_weightless() { 0.0 } else { 1.0 }
    }

    pub fn grow_spawn_size(&mut self) {
        self.spawn_size += self.spawn_size_step;
    }

    pub fn shrink_spawn_size(&mut self) {
        self.spawn_size = (self.spawn_size - self.spawn_size_step).max(1.0);
    }
}

impl Default for Interaction {
    fn default() -> Interaction {
        Interaction::new(&InteractionConfig::default())
    }
}
