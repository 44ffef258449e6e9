//! Pointer and keyboard collection
//!
//! Browser events arrive at arbitrary times between frames; they are folded
//! into a [`PointerInput`] and turned into one [`TickInput`] per simulation
//! tick. Clicks queue so that two fast clicks inside one frame still become
//! two separate ticks with `click` set.

use glam::IVec2;

use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::sim::TickInput;

/// Clicks held beyond this are dropped (a stalled tab shouldn't replay a burst)
const MAX_QUEUED_CLICKS: u32 = 4;

/// Where the canvas sits on the page, in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    /// Map a client-space position onto the logical 1280x960 screen
    pub fn to_logical(&self, client_x: f64, client_y: f64) -> IVec2 {
        if self.width <= 0.0 || self.height <= 0.0 {
            return IVec2::ZERO;
        }
        let x = (client_x - self.left) * SCREEN_WIDTH as f64 / self.width;
        let y = (client_y - self.top) * SCREEN_HEIGHT as f64 / self.height;
        IVec2::new(x.floor() as i32, y.floor() as i32)
    }
}

/// What a key press asks the frontend to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Quit,
    ToggleFullscreen,
    ToggleIdle,
    ToggleDebug,
    ToggleFps,
    Ignored,
}

/// Map a `KeyboardEvent.key` value
pub fn key_action(key: &str) -> KeyAction {
    match key {
        "Escape" => KeyAction::Quit,
        "f" | "F" => KeyAction::ToggleFullscreen,
        "i" | "I" => KeyAction::ToggleIdle,
        "d" | "D" => KeyAction::ToggleDebug,
        "p" | "P" => KeyAction::ToggleFps,
        _ => KeyAction::Ignored,
    }
}

/// Accumulated input between simulation ticks
#[derive(Debug, Clone, Default)]
pub struct PointerInput {
    pointer: IVec2,
    queued_clicks: u32,
    quit: bool,
    pub idle_mode: bool,
}

impl PointerInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pointer(&self) -> IVec2 {
        self.pointer
    }

    pub fn on_pointer_move(&mut self, viewport: &Viewport, client_x: f64, client_y: f64) {
        self.pointer = viewport.to_logical(client_x, client_y);
    }

    /// Primary button went down
    pub fn on_pointer_down(&mut self, viewport: &Viewport, client_x: f64, client_y: f64) {
        self.on_pointer_move(viewport, client_x, client_y);
        self.queued_clicks = (self.queued_clicks + 1).min(MAX_QUEUED_CLICKS);
    }

    pub fn request_quit(&mut self) {
        self.quit = true;
    }

    pub fn toggle_idle(&mut self) -> bool {
        self.idle_mode = !self.idle_mode;
        self.idle_mode
    }

    /// Input for the next tick; consumes at most one queued click
    pub fn next_tick(&mut self) -> TickInput {
        let click = self.queued_clicks > 0;
        if click {
            self.queued_clicks -= 1;
        }
        TickInput {
            pointer: self.pointer,
            click,
            quit: self.quit,
            idle_mode: self.idle_mode,
        }
    }
}
