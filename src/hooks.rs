//! Outbound notifications to the rendering / audio / UI collaborators.

use crate::config::Level;
use crate::entities::Entity;

/// Read-only view handed to the renderer.
pub struct SimView<'a> {
    pub entities: &'a [Entity],
    pub level: Level,
    pub message: &'a str,
    pub waiting: bool,
}

impl<'a> SimView<'a> {
    /// Living entities in draw order.
    pub fn living(&self) -> impl Iterator<Item = &'a Entity> {
        self.entities.iter().filter(|e| e.alive)
    }

    pub fn level_label(&self) -> &'static str {
        self.level.label()
    }
}

/// Callbacks the core invokes during a tick.  All default to no-ops.
pub trait Hooks {
    fn render(&mut self, _view: &SimView<'_>) {}
    fn explosion(&mut self, _x: f64, _y: f64) {}
    fn game_over(&mut self, _message: &str) {}
    fn win(&mut self, _message: &str) {}
}

/// Hooks that ignore everything.
impl Hooks for () {}

#[derive(Clone, Debug, PartialEq)]
pub enum SimEvent {
    Render,
    Explosion { x: f64, y: f64 },
    GameOver(String),
    Win(String),
}

/// Records every notification, in order.
#[derive(Clone, Debug, Default)]
pub struct EventLog {
    pub events: Vec<SimEvent>,
}

impl EventLog {
    pub fn explosions(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, SimEvent::Explosion { .. }))
            .count()
    }

    pub fn game_overs(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, SimEvent::GameOver(_)))
            .count()
    }

    pub fn wins(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, SimEvent::Win(_)))
            .count()
    }
}

impl Hooks for EventLog {
    fn render(&mut self, _view: &SimView<'_>) {
        self.events.push(SimEvent::Render);
    }

    fn explosion(&mut self, x: f64, y: f64) {
        self.events.push(SimEvent::Explosion { x, y });
    }

    fn game_over(&mut self, message: &str) {
        self.events.push(SimEvent::GameOver(message.to_string()));
    }

    fn win(&mut self, message: &str) {
        self.events.push(SimEvent::Win(message.to_string()));
    }
}
