//! Runtime gameplay configuration.
//!
//! [`GameConfig`] mirrors the tunable constants in [`crate::consts`]. It is
//! built once at startup and handed by reference to every simulation tick.
//! Missing keys fall back to the compiled defaults, so a config file can
//! override just the values you care about:
//!
//! ```toml
//! how_many_start = 8
//! wave_multiplier = 3
//! ```
//!
//! Native builds read `lunar-defence.toml` next to the executable's working
//! directory. The browser build reads a JSON object of the same shape from
//! LocalStorage.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{GameError, GameResult};

/// Default config file name for native builds
pub const CONFIG_FILE: &str = "lunar-defence.toml";

/// Gameplay tunables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // ── Waves ────────────────────────────────────────────────────────────────
    /// Asteroids in the first wave
    pub how_many_start: u32,
    /// Spawn count multiplier applied after each cleared wave
    pub wave_multiplier: u32,
    /// Pause between waves (seconds)
    pub time_between_waves: f32,

    // ── Spawning ─────────────────────────────────────────────────────────────
    /// Minimum spawn distance, in planet radii
    pub edge_of_screen_offset: f32,
    /// Divisor for the random spawn band (bigger = tighter band)
    pub distance_variance: f32,

    // ── Motion ───────────────────────────────────────────────────────────────
    /// Global rotation step per tick (radians)
    pub rotation_speed: f32,
    /// How much slower the moon revolves than the global rotation
    pub moon_orbit_ratio: f32,
    /// Moon orbit distance above the planet surface, in moon radii
    pub moon_orbit_distance: f32,
    /// Asteroid spin relative to the global rotation
    pub asteroid_spin_ratio: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            how_many_start: HOW_MANY_START,
            wave_multiplier: WAVE_MULTIPLIER,
            time_between_waves: TIME_BETWEEN_WAVES,
            edge_of_screen_offset: EDGE_OF_SCREEN_OFFSET,
            distance_variance: DISTANCE_VARIANCE,
            rotation_speed: ROTATION_SPEED,
            moon_orbit_ratio: MOON_ORBIT_RATIO,
            moon_orbit_distance: MOON_ORBIT_DISTANCE,
            asteroid_spin_ratio: ASTEROID_SPIN_RATIO,
        }
    }
}

impl GameConfig {
    /// Parse a TOML document; missing keys keep their defaults
    pub fn from_toml_str(contents: &str, source_name: &str) -> GameResult<Self> {
        let config: GameConfig = toml::from_str(contents).map_err(|e| GameError::ConfigParse {
            source_name: source_name.to_string(),
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a JSON object; missing keys keep their defaults
    pub fn from_json_str(contents: &str, source_name: &str) -> GameResult<Self> {
        let config: GameConfig =
            serde_json::from_str(contents).map_err(|e| GameError::ConfigParse {
                source_name: source_name.to_string(),
                reason: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML file
    pub fn from_file(path: &Path) -> GameResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| GameError::ConfigRead {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml_str(&contents, &path.display().to_string())
    }

    /// Load from `path`, recovering from every failure with the defaults.
    ///
    /// A missing file is normal and only logged at info level; unreadable,
    /// malformed or out-of-range files are logged as warnings.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            log::info!("No {} found; using compiled defaults", path.display());
            return Self::default();
        }
        match Self::from_file(path) {
            Ok(config) => {
                log::info!("Loaded game config from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("{e}; using defaults");
                Self::default()
            }
        }
    }

    /// Reject values that would make the simulation divide by zero, stall,
    /// or push entities outside the integer coordinate space
    pub fn validate(&self) -> GameResult<()> {
        validate_count("how_many_start", self.how_many_start, 1, MAX_ASTEROIDS, "[1, 1000]")?;
        validate_count("wave_multiplier", self.wave_multiplier, 1, 10, "[1, 10]")?;
        validate_range("time_between_waves", self.time_between_waves, 0.0, 60.0, "[0, 60]")?;
        validate_range("edge_of_screen_offset", self.edge_of_screen_offset, 0.0, 20.0, "[0, 20]")?;
        validate_range("distance_variance", self.distance_variance, 0.5, 1000.0, "[0.5, 1000]")?;
        validate_range("rotation_speed", self.rotation_speed, -1.0, 1.0, "[-1, 1]")?;
        validate_range("moon_orbit_ratio", self.moon_orbit_ratio, 0.1, 100.0, "[0.1, 100]")?;
        validate_range("moon_orbit_distance", self.moon_orbit_distance, 0.0, 20.0, "[0, 20]")?;
        validate_range("asteroid_spin_ratio", self.asteroid_spin_ratio, -100.0, 100.0, "[-100, 100]")?;
        Ok(())
    }

    /// Render as TOML (for `--print-config`)
    pub fn to_toml_string(&self) -> String {
        toml::to_string(self).unwrap_or_default()
    }

    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "lunar_defence_config";

    /// Load overrides from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json_str(&json, Self::STORAGE_KEY) {
                    Ok(config) => {
                        log::info!("Loaded game config from LocalStorage");
                        return config;
                    }
                    Err(e) => log::warn!("{e}; using defaults"),
                }
            }
        }

        log::info!("Using default game config");
        Self::default()
    }

    /// Load overrides from the default config file
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::load_or_default(Path::new(CONFIG_FILE))
    }
}

fn validate_range(
    name: &'static str,
    value: f32,
    min: f32,
    max: f32,
    expected: &'static str,
) -> GameResult<()> {
    // NaN fails both comparisons
    if value >= min && value <= max {
        Ok(())
    } else {
        Err(GameError::InvalidConfig {
            name,
            value: value as f64,
            expected,
        })
    }
}

fn validate_count(
    name: &'static str,
    value: u32,
    min: u32,
    max: u32,
    expected: &'static str,
) -> GameResult<()> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(GameError::InvalidConfig {
            name,
            value: value as f64,
            expected,
        })
    }
}
