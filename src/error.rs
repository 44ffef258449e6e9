//! Game error types.
//!
//! Startup failures (assets, surface) are fatal and bubble up to the entry
//! point. Config failures are reported through the same type but the loaders
//! recover from them locally and fall back to compiled defaults.

use std::fmt;

use crate::assets::Sprite;

/// Top-level error enum for Lunar Defence.
#[derive(Debug)]
pub enum GameError {
    /// A sprite could not be produced or has unusable dimensions.
    Asset {
        sprite: Sprite,
        reason: String,
    },

    /// The drawing surface (canvas, context) could not be set up.
    Surface(String),

    /// The config source could not be read.
    ConfigRead {
        path: String,
        reason: String,
    },

    /// The config source was read but is not valid TOML/JSON for `GameConfig`.
    ConfigParse {
        source_name: String,
        reason: String,
    },

    /// A tunable is outside the range the simulation can handle.
    InvalidConfig {
        /// Name of the tunable (for logging).
        name: &'static str,
        /// The value that was rejected.
        value: f64,
        /// Human-readable description of the accepted range.
        expected: &'static str,
    },
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::Asset { sprite, reason } => {
                write!(f, "sprite '{}' unavailable: {}", sprite.name(), reason)
            }
            GameError::Surface(reason) => write!(f, "drawing surface unavailable: {}", reason),
            GameError::ConfigRead { path, reason } => {
                write!(f, "could not read config '{}': {}", path, reason)
            }
            GameError::ConfigParse {
                source_name,
                reason,
            } => write!(f, "could not parse config '{}': {}", source_name, reason),
            GameError::InvalidConfig {
                name,
                value,
                expected,
            } => write!(
                f,
                "config value '{}' = {} is outside accepted range {}",
                name, value, expected
            ),
        }
    }
}

impl std::error::Error for GameError {}

/// Convenience alias: a `Result` using `GameError` as the error type.
pub type GameResult<T> = Result<T, GameError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_offending_value() {
        let err = GameError::InvalidConfig {
            name: "distance_variance",
            value: 0.0,
            expected: "(0, ∞)",
        };
        let msg = err.to_string();
        assert!(msg.contains("distance_variance"));
        assert!(msg.contains("(0, ∞)"));
    }

    #[test]
    fn test_display_asset_uses_sprite_name() {
        let err = GameError::Asset {
            sprite: Sprite::Explosion,
            reason: "zero width".into(),
        };
        assert_eq!(err.to_string(), "sprite 'explosion' unavailable: zero width");
    }
}
