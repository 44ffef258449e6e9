//! Lunar Defence - an orbital arcade defence game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (orbits, collisions, waves, timers)
//! - `render`: Pure draw-list generation from game state, plus the browser surface
//! - `platform`: Input collection and per-tick input snapshots
//! - `config`: Gameplay tunables loaded from TOML / LocalStorage
//! - `settings`: Player preferences (audio, overlays)
//! - `assets`: Sprite catalogue and bounding sizes

pub mod assets;
#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod config;
pub mod error;
pub mod platform;
pub mod render;
pub mod settings;
pub mod sim;

pub use config::GameConfig;
pub use error::{GameError, GameResult};
pub use settings::Settings;

use glam::{IVec2, Vec2};

/// Game configuration constants
pub mod consts {
    /// Simulation rate (ticks per second)
    pub const TICKS_PER_SECOND: u32 = 60;
    /// Fixed simulation timestep
    pub const SIM_DT: f32 = 1.0 / TICKS_PER_SECOND as f32;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Logical screen size; the planet sits at its center
    pub const SCREEN_WIDTH: i32 = 1280;
    pub const SCREEN_HEIGHT: i32 = 960;

    /// Distance an asteroid closes on the planet each tick
    pub const ASTEROID_STEP: f32 = 1.0;

    /// Lockout after a missed shot
    pub const COOLDOWN_SECS: f32 = 1.0;
    /// Pause after game over before a restart click is accepted
    pub const GAME_OVER_PAUSE_SECS: f32 = 1.0;
    /// Delay between a player kill and its explosion sound
    pub const KILL_SOUND_DELAY_SECS: f32 = 0.1;

    /// Explosion strip: fixed frame width, frames 1..=LAST (frame 0 is blank)
    pub const EXPLOSION_FRAME_SIZE: u32 = 87;
    pub const EXPLOSION_FIRST_FRAME: u32 = 1;
    pub const EXPLOSION_LAST_FRAME: u32 = 7;

    /// Largest field a wave may spawn
    pub const MAX_ASTEROIDS: u32 = 1000;

    // Tunable defaults (overridable through `GameConfig`)
    pub const HOW_MANY_START: u32 = 5;
    pub const EDGE_OF_SCREEN_OFFSET: f32 = 3.0;
    pub const DISTANCE_VARIANCE: f32 = 7.0;
    pub const TIME_BETWEEN_WAVES: f32 = 2.0;
    pub const WAVE_MULTIPLIER: u32 = 2;
    pub const ROTATION_SPEED: f32 = 0.02;
    pub const MOON_ORBIT_RATIO: f32 = 2.0;
    pub const MOON_ORBIT_DISTANCE: f32 = 5.0;
    pub const ASTEROID_SPIN_RATIO: f32 = 3.0;
}

/// Convert a duration in seconds to whole simulation ticks
#[inline]
pub fn secs_to_ticks(secs: f32) -> u64 {
    (secs.max(0.0) * consts::TICKS_PER_SECOND as f32).round() as u64
}

/// Center of the logical screen
#[inline]
pub fn screen_center() -> IVec2 {
    IVec2::new(consts::SCREEN_WIDTH / 2, consts::SCREEN_HEIGHT / 2)
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Place a point at polar (r, theta) around `origin`, truncating the offset
/// to whole pixels. Saturates at the edges of the `i32` range.
#[inline]
pub fn polar_around(origin: IVec2, r: f32, theta: f32) -> IVec2 {
    let offset = polar_to_cartesian(r, theta);
    IVec2::new(
        origin.x.saturating_add(offset.x as i32),
        origin.y.saturating_add(offset.y as i32),
    )
}
