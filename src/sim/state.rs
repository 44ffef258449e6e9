//! Game state and entity types
//!
//! Entities hold a [`Body`] for position and collision and carry their own
//! per-tick update logic. The wave/game state machine that ties them together
//! lives in `tick.rs`.

use std::f32::consts::TAU;

use glam::IVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::collision::Body;
use super::explosion::Explosion;
use super::timer::Timers;
use crate::assets::{Sprite, SpriteSizes};
use crate::config::GameConfig;
use crate::consts::ASTEROID_STEP;
use crate::{polar_around, screen_center};

/// Audio cues the simulation asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sound {
    /// Turret fires
    Laser,
    /// Moon grazed an asteroid
    ExplosionHigh,
    /// Player shot an asteroid
    ExplosionMid,
    /// An asteroid reached the planet
    ExplosionLow,
}

/// Notifications for the frontend, drained once per frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Sound(Sound),
    /// A fresh asteroid field was spawned
    WaveStarted { wave: u32, asteroids: u32 },
    /// Every asteroid of the wave is gone and the planet survived
    WaveCleared { wave: u32 },
    /// An asteroid hit the planet; the rest are going up with it
    PlanetImpacted,
    /// The cascade finished and the run is over
    GameOver { wave: u32 },
}

/// Coarse phase of play, derived from the state flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Before the first click
    WaitingToStart,
    /// Asteroids falling
    WaveActive,
    /// Wave cleared, next one pending
    BetweenWaves,
    /// Game over, restart locked until the pause ends
    GameOverPause,
    /// Game over, click to try again
    GameOver,
}

/// The planet being defended
#[derive(Debug, Clone)]
pub struct Earth {
    pub body: Body,
    /// Cosmetic spin (radians), follows the global rotation
    pub spin: f32,
    /// Destroyed for the rest of this wave
    pub impacted: bool,
}

impl Earth {
    pub fn new(radius: f32) -> Self {
        Self {
            body: Body::at(Sprite::Earth, radius, screen_center()),
            spin: 0.0,
            impacted: false,
        }
    }

    pub fn update(&mut self, rotation: f32) {
        self.spin = rotation;
    }
}

/// Turret riding on the moon
#[derive(Debug, Clone)]
pub struct Turret {
    pub body: Body,
    /// Aim direction (radians), from the moon toward the reticle
    pub angle: f32,
}

impl Turret {
    /// Follow the moon; re-aim at `target` unless `hold` is set
    pub fn update(&mut self, center: IVec2, target: IVec2, hold: bool) {
        self.body.center = center;
        if !hold {
            let to_target = target.as_vec2() - center.as_vec2();
            self.angle = to_target.y.atan2(to_target.x);
        }
    }
}

/// The moon: orbits the planet, carries the turret, indestructible
#[derive(Debug, Clone)]
pub struct Moon {
    pub body: Body,
    /// Orbit angle (radians), also used for the moon's own spin
    pub orbit_angle: f32,
    pub turret: Turret,
}

impl Moon {
    pub fn new(radius: f32, turret_radius: f32) -> Self {
        Self {
            body: Body::new(Sprite::Moon, radius),
            orbit_angle: 0.0,
            turret: Turret {
                body: Body::new(Sprite::Turret, turret_radius),
                angle: 0.0,
            },
        }
    }

    /// Orbit radius measured from the planet center
    pub fn orbit_radius(&self, earth: &Earth, config: &GameConfig) -> f32 {
        earth.body.radius() + self.body.radius() * config.moon_orbit_distance
    }

    /// Recompute the orbital position from the global rotation
    pub fn update_orbit(&mut self, rotation: f32, earth: &Earth, config: &GameConfig) {
        self.orbit_angle = rotation / config.moon_orbit_ratio;
        let distance = self.orbit_radius(earth, config);
        self.body.center = polar_around(earth.body.center, distance, self.orbit_angle);
    }
}

/// An asteroid falling straight at the planet
#[derive(Debug, Clone, PartialEq)]
pub struct Asteroid {
    pub body: Body,
    /// Bearing from the planet center (radians), fixed for life
    pub angle: f32,
    /// Distance above the planet surface
    pub distance: f32,
    /// Cosmetic spin (radians)
    pub spin: f32,
    pub explosion: Explosion,
    pub alive: bool,
    /// Reached the planet and is blowing up
    pub impacting: bool,
}

impl Asteroid {
    pub fn new(radius: f32, explosion_radius: f32, angle: f32, distance: f32) -> Self {
        Self {
            body: Body::new(Sprite::Asteroid, radius),
            angle,
            distance,
            spin: 0.0,
            explosion: Explosion::new(explosion_radius),
            alive: true,
            impacting: false,
        }
    }

    /// Can still be hit (by the moon or by a shot)
    #[inline]
    pub fn is_target(&self) -> bool {
        self.alive && !self.explosion.exploding
    }

    /// Recompute the center from bearing and distance
    pub fn place(&mut self, earth: &Earth) {
        self.body.center = polar_around(
            earth.body.center,
            self.distance + earth.body.radius(),
            self.angle,
        );
    }

    /// Close in, reposition, animate, and retire once the explosion ends
    pub fn update(&mut self, rotation: f32, earth: &Earth, config: &GameConfig) {
        if self.distance > 0.0 {
            self.distance -= ASTEROID_STEP;
        } else if self.alive {
            self.impacting = true;
            self.explosion.trigger();
        }

        self.place(earth);
        self.spin = rotation * config.asteroid_spin_ratio;

        self.explosion.update(self.body.center);
        if self.explosion.done && self.alive {
            self.alive = false;
        }
    }
}

/// All asteroids of the current wave
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Asteroids {
    members: Vec<Asteroid>,
}

impl Asteroids {
    /// Spawn a fresh field of `how_many` asteroids around the planet
    pub fn spawn(
        rng: &mut Pcg32,
        earth_radius: f32,
        how_many: u32,
        sizes: &SpriteSizes,
        config: &GameConfig,
    ) -> Self {
        let asteroid_radius = sizes.radius(Sprite::Asteroid);
        let explosion_radius = sizes.explosion_radius();
        let edge_of_screen = earth_radius * config.edge_of_screen_offset;
        let band = earth_radius * how_many as f32 / config.distance_variance;

        let members = (0..how_many)
            .map(|_| {
                let angle = rng.random::<f32>() * TAU;
                // f32 rounding can land exactly on TAU
                let angle = if angle >= TAU { 0.0 } else { angle };
                let distance = edge_of_screen + rng.random::<f32>() * band;
                Asteroid::new(asteroid_radius, explosion_radius, angle, distance)
            })
            .collect();

        Self { members }
    }

    pub fn from_vec(members: Vec<Asteroid>) -> Self {
        Self { members }
    }

    /// Any asteroid still in play (including ones mid-explosion)
    pub fn alive(&self) -> bool {
        self.members.iter().any(|a| a.alive)
    }

    /// Any asteroid that has reached the planet
    pub fn impacting(&self) -> bool {
        self.members.iter().any(|a| a.impacting)
    }

    pub fn alive_count(&self) -> usize {
        self.members.iter().filter(|a| a.alive).count()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Asteroid> {
        self.members.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Asteroid> {
        self.members.iter_mut()
    }

    pub fn update(&mut self, rotation: f32, earth: &Earth, config: &GameConfig) {
        for asteroid in &mut self.members {
            asteroid.update(rotation, earth, config);
        }
    }

    /// Blow up everything still in play (planet lost)
    pub fn detonate_all(&mut self) {
        for asteroid in self.members.iter_mut().filter(|a| a.alive) {
            asteroid.explosion.trigger();
        }
    }

    /// Explode every live target overlapping `body`; returns how many were hit
    pub fn explode_overlapping(&mut self, body: &Body) -> u32 {
        let mut hits = 0;
        for asteroid in self.members.iter_mut() {
            if asteroid.is_target() && body.overlaps(&asteroid.body) {
                asteroid.explosion.trigger();
                hits += 1;
            }
        }
        hits
    }
}

/// The player's reticle
#[derive(Debug, Clone)]
pub struct Crosshair {
    pub body: Body,
    /// Locked out after a miss
    pub cooling_down: bool,
    /// A shot was fired this tick
    pub shooting: bool,
    /// This tick's shot hit nothing
    pub missing: bool,
    /// Laser origin (moon center when the shot was fired)
    pub shooting_from: IVec2,
    /// Flash at the turret on a miss
    pub explosion: Explosion,
}

impl Crosshair {
    pub fn new(radius: f32, explosion_radius: f32) -> Self {
        Self {
            body: Body::at(Sprite::Crosshair, radius, screen_center()),
            cooling_down: false,
            shooting: false,
            missing: false,
            shooting_from: IVec2::ZERO,
            explosion: Explosion::new(explosion_radius),
        }
    }
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    rng: Pcg32,
    /// Sprite sizes the radii were derived from (needed for respawns)
    pub sprites: SpriteSizes,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Global rotation accumulator driving all orbits and spins
    pub rotation: f32,
    /// Asteroids left to destroy this wave
    pub count: u32,
    /// Current wave (0 before the first click)
    pub wave: u32,
    /// Asteroids to spawn in the next (re)started wave
    pub how_many: u32,
    pub game_over: bool,
    /// Transition pause: blocks shooting, restarts and wave checks
    pub breathless: bool,
    pub earth: Earth,
    pub moon: Moon,
    pub asteroids: Asteroids,
    pub crosshair: Crosshair,
    /// Pending delayed transitions
    pub timers: Timers,
    /// Events produced since the last drain
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new game waiting for the first click
    pub fn new(config: &GameConfig, sprites: &SpriteSizes, seed: u64) -> Self {
        let explosion_radius = sprites.explosion_radius();
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            sprites: sprites.clone(),
            time_ticks: 0,
            rotation: 0.0,
            count: 0,
            wave: 0,
            how_many: config.how_many_start,
            game_over: false,
            breathless: false,
            earth: Earth::new(sprites.radius(Sprite::Earth)),
            moon: Moon::new(sprites.radius(Sprite::Moon), sprites.radius(Sprite::Turret)),
            asteroids: Asteroids::default(),
            crosshair: Crosshair::new(sprites.radius(Sprite::Crosshair), explosion_radius),
            timers: Timers::new(),
            events: Vec::new(),
        }
    }

    pub fn phase(&self) -> Phase {
        match (self.wave, self.game_over, self.breathless) {
            (0, _, _) => Phase::WaitingToStart,
            (_, true, true) => Phase::GameOverPause,
            (_, true, false) => Phase::GameOver,
            (_, false, true) => Phase::BetweenWaves,
            (_, false, false) => Phase::WaveActive,
        }
    }

    /// Start (or restart) a wave at the current spawn count
    pub fn restart(&mut self, config: &GameConfig) {
        log::info!("new wave {}: {} asteroids", self.wave, self.how_many);
        self.count = self.how_many;
        self.asteroids = Asteroids::spawn(
            &mut self.rng,
            self.earth.body.radius(),
            self.how_many,
            &self.sprites,
            config,
        );
        for asteroid in self.asteroids.iter_mut() {
            asteroid.place(&self.earth);
        }
        self.earth.impacted = false;
        self.game_over = false;
        self.events.push(GameEvent::WaveStarted {
            wave: self.wave,
            asteroids: self.how_many,
        });
    }

    /// Take every event produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub(crate) fn play(&mut self, sound: Sound) {
        self.events.push(GameEvent::Sound(sound));
    }
}
