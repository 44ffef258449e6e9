//! Idle/demo mode: the game plays itself
//!
//! Aims at the asteroid closest to impact, fires every
//! [`FIRE_INTERVAL_TICKS`], and clicks through the title and game-over screens.

use super::state::{Asteroid, GameState, Phase};
use super::tick::TickInput;

/// Ticks between autopilot shots
pub const FIRE_INTERVAL_TICKS: u64 = 12;

/// The asteroid that will hit the planet first, if any can still be shot
pub fn most_dangerous(state: &GameState) -> Option<&Asteroid> {
    state
        .asteroids
        .iter()
        .filter(|a| a.is_target())
        .min_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
}

/// Replace the player's pointer and click with the autopilot's
pub fn drive(state: &GameState, input: &TickInput) -> TickInput {
    let mut input = input.clone();
    input.click = false;

    match state.phase() {
        Phase::WaitingToStart | Phase::GameOver => {
            input.click = true;
        }
        Phase::WaveActive => {
            if let Some(target) = most_dangerous(state) {
                input.pointer = target.body.center;
                input.click = !state.crosshair.cooling_down
                    && state.time_ticks % FIRE_INTERVAL_TICKS == 0;
            }
        }
        Phase::BetweenWaves | Phase::GameOverPause => {}
    }

    // Park the reticle on the planet when there is nothing to shoot
    if !input.click && most_dangerous(state).is_none() {
        input.pointer = state.earth.body.center;
    }

    input
}
