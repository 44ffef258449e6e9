//! Fixed timestep simulation tick
//!
//! Advances the whole game by one frame: due timers first, then the planet
//! and wave checks, then every entity in a fixed order (asteroids, moon,
//! planet, reticle), then the start/restart clicks.

use glam::IVec2;

use super::autopilot;
use super::state::{GameEvent, GameState, Sound};
use super::timer::TimerEvent;
use crate::config::GameConfig;
use crate::consts::*;
use crate::secs_to_ticks;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pointer position in logical screen pixels
    pub pointer: IVec2,
    /// Pointer pressed since the last tick (edge-triggered)
    pub click: bool,
    /// Quit requested (Escape)
    pub quit: bool,
    /// Idle/demo mode - the autopilot plays the game
    pub idle_mode: bool,
}

/// Whether the frontend should keep running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickFlow {
    Continue,
    Quit,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, config: &GameConfig) -> TickFlow {
    if input.quit {
        log::info!("quit requested");
        return TickFlow::Quit;
    }

    let input = if input.idle_mode {
        autopilot::drive(state, input)
    } else {
        input.clone()
    };

    state.time_ticks += 1;
    for event in state.timers.drain_due(state.time_ticks) {
        fire_timer(state, event, config);
    }

    check_planet(state);
    check_wave_cleared(state, config);

    state.rotation -= config.rotation_speed;

    update_entities(state, &input, config);

    if state.wave == 0 && input.click {
        state.wave = 1;
        state.restart(config);
    }

    if state.game_over && input.click && !state.breathless {
        log::info!("restarting wave {}", state.wave);
        state.restart(config);
    }

    TickFlow::Continue
}

fn fire_timer(state: &mut GameState, event: TimerEvent, config: &GameConfig) {
    match event {
        TimerEvent::WaveAdvance => {
            state.how_many = state
                .how_many
                .saturating_mul(config.wave_multiplier)
                .min(MAX_ASTEROIDS);
            state.restart(config);
            // Only after the new field exists, or the wave check would see it empty
            state.breathless = false;
        }
        TimerEvent::CooldownExpired => {
            state.crosshair.cooling_down = false;
        }
        TimerEvent::GameOverSettle => {
            state.breathless = false;
        }
        TimerEvent::Sound(sound) => state.play(sound),
    }
}

/// Impact cascade and game-over latch
fn check_planet(state: &mut GameState) {
    if state.asteroids.alive() && state.asteroids.impacting() {
        if !state.earth.impacted {
            log::info!("planet hit on wave {}", state.wave);
            state.emit(GameEvent::PlanetImpacted);
            state.play(Sound::ExplosionLow);
        }
        state.earth.impacted = true;
    }

    if !state.earth.impacted {
        return;
    }

    if state.asteroids.alive() {
        state.asteroids.detonate_all();
    } else if !state.game_over {
        log::info!("game over on wave {}", state.wave);
        state.game_over = true;
        state.breathless = true;
        state.timers.schedule(
            state.time_ticks,
            secs_to_ticks(GAME_OVER_PAUSE_SECS),
            TimerEvent::GameOverSettle,
        );
        state.emit(GameEvent::GameOver { wave: state.wave });
    }
}

fn check_wave_cleared(state: &mut GameState, config: &GameConfig) {
    if state.game_over || state.breathless || state.wave == 0 || state.asteroids.alive() {
        return;
    }

    log::info!("wave {} cleared", state.wave);
    state.emit(GameEvent::WaveCleared { wave: state.wave });
    state.wave += 1;
    state.breathless = true;
    state.timers.schedule(
        state.time_ticks,
        secs_to_ticks(config.time_between_waves),
        TimerEvent::WaveAdvance,
    );
}

fn update_entities(state: &mut GameState, input: &TickInput, config: &GameConfig) {
    let rotation = state.rotation;

    state.asteroids.update(rotation, &state.earth, config);

    // Moon: orbit, then graze anything in its path
    state.moon.update_orbit(rotation, &state.earth, config);
    let grazed = state.asteroids.explode_overlapping(&state.moon.body);
    if grazed > 0 {
        log::debug!("moon grazed {grazed} asteroid(s)");
        state.count = state.count.saturating_sub(grazed);
        for _ in 0..grazed {
            state.play(Sound::ExplosionHigh);
        }
    }
    let moon_center = state.moon.body.center;
    let reticle = state.crosshair.body.center;
    let hold = state.crosshair.cooling_down;
    state.moon.turret.update(moon_center, reticle, hold);

    state.earth.update(rotation);

    update_crosshair(state, input);
}

fn update_crosshair(state: &mut GameState, input: &TickInput) {
    let moon_center = state.moon.body.center;
    let can_shoot = !state.breathless
        && !state.crosshair.cooling_down
        && !state.game_over
        && state.wave > 0;

    let crosshair = &mut state.crosshair;
    crosshair.shooting = false;
    crosshair.missing = false;
    crosshair.body.center = input.pointer;

    if input.click && can_shoot {
        crosshair.shooting = true;
        crosshair.shooting_from = moon_center;
        state.events.push(GameEvent::Sound(Sound::Laser));

        let hits = state.asteroids.explode_overlapping(&state.crosshair.body);
        for _ in 0..hits {
            state.timers.schedule(
                state.time_ticks,
                secs_to_ticks(KILL_SOUND_DELAY_SECS),
                TimerEvent::Sound(Sound::ExplosionMid),
            );
        }
        state.count = state.count.saturating_sub(hits);

        if hits == 0 {
            log::debug!("missed at {:?}; cooling down", input.pointer);
            state.crosshair.missing = true;
            state.crosshair.cooling_down = true;
            state.crosshair.explosion.trigger();
            state.timers.schedule(
                state.time_ticks,
                secs_to_ticks(COOLDOWN_SECS),
                TimerEvent::CooldownExpired,
            );
        } else {
            log::debug!("shot hit {hits} asteroid(s), {} left", state.count);
        }
    }

    state.crosshair.explosion.update(moon_center);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::SpriteSizes;
    use crate::sim::state::{Asteroid, Asteroids, Phase};

    fn new_game(seed: u64) -> (GameState, GameConfig) {
        let config = GameConfig::default();
        let state = GameState::new(&config, &SpriteSizes::default(), seed);
        (state, config)
    }

    fn click_at(pointer: IVec2) -> TickInput {
        TickInput {
            pointer,
            click: true,
            ..Default::default()
        }
    }

    /// A game one click past the title screen
    fn started(seed: u64) -> (GameState, GameConfig) {
        let (mut state, config) = new_game(seed);
        tick(&mut state, &click_at(IVec2::ZERO), &config);
        state.drain_events();
        (state, config)
    }

    /// Replace the field with asteroids at the given (angle, distance) pairs
    fn field(state: &mut GameState, placements: &[(f32, f32)]) {
        let members = placements
            .iter()
            .map(|&(angle, distance)| {
                let mut asteroid = Asteroid::new(20.0, 43.5, angle, distance);
                asteroid.place(&state.earth);
                asteroid
            })
            .collect();
        state.asteroids = Asteroids::from_vec(members);
        state.count = placements.len() as u32;
    }

    #[test]
    fn test_first_click_starts_wave_one() {
        let (mut state, config) = new_game(7);
        tick(&mut state, &TickInput::default(), &config);
        assert_eq!(state.phase(), Phase::WaitingToStart);
        assert!(state.asteroids.is_empty());

        tick(&mut state, &click_at(IVec2::new(10, 10)), &config);
        assert_eq!(state.phase(), Phase::WaveActive);
        assert_eq!(state.wave, 1);
        assert_eq!(state.asteroids.len(), HOW_MANY_START as usize);
        assert_eq!(state.count, HOW_MANY_START);
        // The start click never counts as a shot
        assert!(!state.crosshair.shooting);
        assert!(!state.crosshair.cooling_down);
        assert!(state.drain_events().contains(&GameEvent::WaveStarted {
            wave: 1,
            asteroids: HOW_MANY_START,
        }));
    }

    #[test]
    fn test_quit_stops_without_advancing() {
        let (mut state, config) = started(1);
        let before = state.time_ticks;
        let input = TickInput {
            quit: true,
            ..Default::default()
        };
        assert_eq!(tick(&mut state, &input, &config), TickFlow::Quit);
        assert_eq!(state.time_ticks, before);
    }

    #[test]
    fn test_rotation_decreases_each_tick() {
        let (mut state, config) = new_game(1);
        for _ in 0..10 {
            tick(&mut state, &TickInput::default(), &config);
        }
        assert!((state.rotation + 10.0 * config.rotation_speed).abs() < 1e-5);
    }

    #[test]
    fn test_cleared_wave_doubles_spawn_count() {
        let (mut state, config) = started(3);
        for asteroid in state.asteroids.iter_mut() {
            asteroid.alive = false;
        }

        tick(&mut state, &TickInput::default(), &config);
        assert_eq!(state.phase(), Phase::BetweenWaves);
        assert_eq!(state.wave, 2);
        assert!(state.timers.is_pending(TimerEvent::WaveAdvance));
        assert!(state.drain_events().contains(&GameEvent::WaveCleared { wave: 1 }));

        let pause = secs_to_ticks(config.time_between_waves);
        for _ in 1..pause {
            tick(&mut state, &TickInput::default(), &config);
        }
        assert!(state.breathless);
        assert_eq!(state.how_many, HOW_MANY_START);

        tick(&mut state, &TickInput::default(), &config);
        assert!(!state.breathless);
        assert_eq!(state.how_many, HOW_MANY_START * WAVE_MULTIPLIER);
        assert_eq!(state.asteroids.len(), 10);
        assert_eq!(state.count, 10);
        assert_eq!(state.wave, 2);

        let planet_radius = state.earth.body.radius();
        for asteroid in state.asteroids.iter() {
            assert!((0.0..std::f32::consts::TAU).contains(&asteroid.angle));
            // One step already taken since spawning
            assert!(
                asteroid.distance + ASTEROID_STEP >= config.edge_of_screen_offset * planet_radius
            );
        }
    }

    #[test]
    fn test_shot_through_two_asteroids_kills_both() {
        let (mut state, config) = started(5);
        field(&mut state, &[(0.0, 300.0), (0.0, 310.0), (3.0, 400.0)]);

        // After this tick's step the two sit at x = 640 + 80 + 299 and + 309
        let pointer = IVec2::new(1024, 480);
        tick(&mut state, &click_at(pointer), &config);

        assert!(state.crosshair.shooting);
        assert!(!state.crosshair.missing);
        assert!(!state.crosshair.cooling_down);
        assert_eq!(state.count, 1);
        let exploding: Vec<bool> = state.asteroids.iter().map(|a| a.explosion.exploding).collect();
        assert_eq!(exploding, vec![true, true, false]);
        assert_eq!(state.crosshair.shooting_from, state.moon.body.center);
        assert_eq!(state.drain_events(), vec![GameEvent::Sound(Sound::Laser)]);

        // Kill cues arrive 100 ms later, one per asteroid
        let delay = secs_to_ticks(KILL_SOUND_DELAY_SECS);
        let mut cues = Vec::new();
        for _ in 0..delay {
            tick(&mut state, &TickInput { pointer, ..Default::default() }, &config);
            cues.extend(state.drain_events());
        }
        assert_eq!(
            cues,
            vec![
                GameEvent::Sound(Sound::ExplosionMid),
                GameEvent::Sound(Sound::ExplosionMid)
            ]
        );
        assert!(!state.crosshair.shooting);
    }

    #[test]
    fn test_miss_engages_cooldown() {
        let (mut state, config) = started(9);
        field(&mut state, &[(0.0, 300.0)]);

        tick(&mut state, &click_at(IVec2::new(5, 5)), &config);
        assert!(state.crosshair.shooting);
        assert!(state.crosshair.missing);
        assert!(state.crosshair.cooling_down);
        assert!(state.crosshair.explosion.exploding);
        assert_eq!(state.count, 1);

        // Clicks during the cooldown are ignored
        tick(&mut state, &click_at(IVec2::new(5, 5)), &config);
        assert!(!state.crosshair.shooting);

        let cooldown = secs_to_ticks(COOLDOWN_SECS);
        for _ in 2..cooldown {
            tick(&mut state, &TickInput::default(), &config);
        }
        assert!(state.crosshair.cooling_down);
        tick(&mut state, &TickInput::default(), &config);
        assert!(!state.crosshair.cooling_down);
    }

    #[test]
    fn test_turret_holds_aim_while_cooling_down() {
        let (mut state, config) = started(11);
        field(&mut state, &[(2.0, 300.0)]);

        tick(&mut state, &TickInput { pointer: IVec2::new(1200, 480), ..Default::default() }, &config);
        tick(&mut state, &click_at(IVec2::new(1200, 480)), &config);
        assert!(state.crosshair.cooling_down);
        let held = state.moon.turret.angle;

        for _ in 0..10 {
            tick(&mut state, &TickInput { pointer: IVec2::new(0, 0), ..Default::default() }, &config);
            assert_eq!(state.moon.turret.angle, held);
        }
    }

    #[test]
    fn test_moon_graze_counts_as_kill() {
        let (mut state, config) = started(13);
        let next_rotation = state.rotation - config.rotation_speed;
        let angle = next_rotation / config.moon_orbit_ratio;
        let orbit = state.moon.orbit_radius(&state.earth, &config);
        // Lands exactly on the moon after this tick's step
        let distance = orbit - state.earth.body.radius() + ASTEROID_STEP;
        field(&mut state, &[(angle, distance), (angle + 3.0, 400.0)]);

        tick(&mut state, &TickInput::default(), &config);
        assert_eq!(state.count, 1);
        assert!(state.asteroids.iter().next().unwrap().explosion.exploding);
        assert_eq!(state.drain_events(), vec![GameEvent::Sound(Sound::ExplosionHigh)]);
    }

    #[test]
    fn test_impact_cascades_to_game_over() {
        let (mut state, config) = started(17);
        field(&mut state, &[(0.5, 0.0), (2.0, 400.0), (4.0, 350.0)]);

        // First tick: the low asteroid starts impacting
        tick(&mut state, &TickInput::default(), &config);
        assert!(state.asteroids.impacting());
        assert!(!state.earth.impacted);

        // Second tick: planet hit, every other asteroid goes up with it
        tick(&mut state, &TickInput::default(), &config);
        assert!(state.earth.impacted);
        assert!(state.asteroids.iter().all(|a| a.explosion.exploding));
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::PlanetImpacted));
        assert!(events.contains(&GameEvent::Sound(Sound::ExplosionLow)));

        let mut ticks = 0;
        while !state.game_over {
            tick(&mut state, &TickInput::default(), &config);
            ticks += 1;
            assert!(ticks < 20, "cascade never finished");
        }
        assert_eq!(state.phase(), Phase::GameOverPause);
        assert!(!state.asteroids.alive());
        assert!(state.drain_events().contains(&GameEvent::GameOver { wave: 1 }));

        // Restart locked during the pause
        let count = state.count;
        tick(&mut state, &click_at(IVec2::ZERO), &config);
        assert!(state.game_over);
        assert_eq!(state.count, count);
        assert_eq!(state.asteroids.alive_count(), 0);

        let pause = secs_to_ticks(GAME_OVER_PAUSE_SECS);
        for _ in 1..pause {
            tick(&mut state, &TickInput::default(), &config);
        }
        assert_eq!(state.phase(), Phase::GameOver);

        // Restart keeps the wave number and spawn count
        tick(&mut state, &click_at(IVec2::ZERO), &config);
        assert_eq!(state.phase(), Phase::WaveActive);
        assert_eq!(state.wave, 1);
        assert!(!state.earth.impacted);
        assert_eq!(state.asteroids.len(), HOW_MANY_START as usize);
        assert_eq!(state.count, HOW_MANY_START);
    }

    #[test]
    fn test_wave_not_cleared_while_game_over() {
        let (mut state, config) = started(19);
        field(&mut state, &[(0.5, 0.0)]);
        for _ in 0..30 {
            tick(&mut state, &TickInput::default(), &config);
        }
        assert!(state.game_over);
        assert_eq!(state.wave, 1);
        assert!(!state.timers.is_pending(TimerEvent::WaveAdvance));
    }

    /// Tick a clicked and an unclicked copy of `state`; both must agree
    fn assert_click_ignored(state: &GameState, config: &GameConfig) {
        let mut clicked = state.clone();
        let mut idle = state.clone();
        let target = state
            .asteroids
            .iter()
            .next()
            .map_or(IVec2::ZERO, |a| a.body.center);
        tick(&mut clicked, &click_at(target), config);
        tick(
            &mut idle,
            &TickInput {
                pointer: target,
                ..Default::default()
            },
            config,
        );

        assert_eq!(clicked.asteroids, idle.asteroids);
        assert_eq!(clicked.wave, idle.wave);
        assert_eq!(clicked.how_many, idle.how_many);
        assert_eq!(clicked.count, idle.count);
        assert_eq!(clicked.phase(), idle.phase());
        assert!(!clicked.crosshair.shooting);
        assert!(!clicked.crosshair.cooling_down);
    }

    #[test]
    fn test_click_while_breathless_changes_nothing() {
        let (mut state, config) = started(23);
        for asteroid in state.asteroids.iter_mut() {
            asteroid.alive = false;
        }
        tick(&mut state, &TickInput::default(), &config);
        assert!(state.breathless);
        assert_eq!(state.phase(), Phase::BetweenWaves);

        assert_click_ignored(&state, &config);
    }

    #[test]
    fn test_click_during_game_over_pause_changes_nothing() {
        let (mut state, config) = started(29);
        field(&mut state, &[(0.5, 0.0), (2.0, 300.0)]);
        for _ in 0..60 {
            tick(&mut state, &TickInput::default(), &config);
            if state.game_over {
                break;
            }
        }
        assert_eq!(state.phase(), Phase::GameOverPause);

        assert_click_ignored(&state, &config);
    }

    #[test]
    fn test_extreme_config_does_not_panic() {
        // Out of range for `validate`, built directly to exercise the geometry
        let config = GameConfig {
            edge_of_screen_offset: 1e30,
            distance_variance: 1e-30,
            moon_orbit_distance: 1e30,
            ..Default::default()
        };
        let mut state = GameState::new(&config, &SpriteSizes::default(), 7);
        tick(&mut state, &click_at(IVec2::new(700, 400)), &config);
        assert_eq!(state.phase(), Phase::WaveActive);
        for _ in 0..120 {
            tick(&mut state, &click_at(IVec2::new(700, 400)), &config);
        }
        assert!(!state.earth.impacted);
    }

    #[test]
    fn test_spawn_count_growth_is_capped() {
        let config = GameConfig {
            wave_multiplier: 10,
            ..Default::default()
        };
        let (mut state, _) = started(31);
        state.how_many = MAX_ASTEROIDS / 2;
        for asteroid in state.asteroids.iter_mut() {
            asteroid.alive = false;
        }
        for _ in 0..=secs_to_ticks(config.time_between_waves) {
            tick(&mut state, &TickInput::default(), &config);
        }
        assert_eq!(state.wave, 2);
        assert_eq!(state.how_many, MAX_ASTEROIDS);
        assert_eq!(state.asteroids.len(), MAX_ASTEROIDS as usize);
    }

    #[test]
    fn test_determinism() {
        let (mut a, config) = new_game(99999);
        let (mut b, _) = new_game(99999);

        let inputs = [
            click_at(IVec2::new(300, 300)),
            TickInput::default(),
            click_at(IVec2::new(700, 200)),
            TickInput {
                pointer: IVec2::new(900, 100),
                ..Default::default()
            },
        ];
        for input in &inputs {
            tick(&mut a, input, &config);
            tick(&mut b, input, &config);
        }

        assert_eq!(a.time_ticks, b.time_ticks);
        assert_eq!(a.count, b.count);
        let angles = |s: &GameState| s.asteroids.iter().map(|x| x.angle).collect::<Vec<_>>();
        assert_eq!(angles(&a), angles(&b));
    }
}
