//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Delays run on the tick-driven timer queue, never on wall-clock time
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod explosion;
pub mod state;
pub mod tick;
pub mod timer;

pub use collision::{Body, center_distance};
pub use explosion::Explosion;
pub use state::{
    Asteroid, Asteroids, Crosshair, Earth, GameEvent, GameState, Moon, Phase, Sound, Turret,
};
pub use tick::{TickFlow, TickInput, tick};
pub use timer::{TimerEvent, Timers};
