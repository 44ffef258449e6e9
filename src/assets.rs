//! Sprite catalogue
//!
//! The simulation never touches pixels; it only needs each sprite's bounding
//! size so collision radii can be derived from it. Frontends supply the sizes
//! of whatever bitmaps they actually loaded through [`SpriteSource`].

use serde::{Deserialize, Serialize};

use crate::consts::{EXPLOSION_FRAME_SIZE, EXPLOSION_LAST_FRAME};
use crate::error::{GameError, GameResult};

/// Logical sprite names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sprite {
    Earth,
    Moon,
    Turret,
    Asteroid,
    Crosshair,
    /// Horizontal strip of fixed-width frames
    Explosion,
    GameOver,
}

impl Sprite {
    pub const ALL: [Sprite; 7] = [
        Sprite::Earth,
        Sprite::Moon,
        Sprite::Turret,
        Sprite::Asteroid,
        Sprite::Crosshair,
        Sprite::Explosion,
        Sprite::GameOver,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Sprite::Earth => "earth",
            Sprite::Moon => "moon",
            Sprite::Turret => "turret",
            Sprite::Asteroid => "asteroid",
            Sprite::Crosshair => "crosshair",
            Sprite::Explosion => "explosion",
            Sprite::GameOver => "gameover",
        }
    }
}

/// Width and height of a decoded bitmap, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpriteSize {
    pub width: u32,
    pub height: u32,
}

impl SpriteSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Anything that can report the size of a loaded sprite
pub trait SpriteSource {
    fn size_of(&self, sprite: Sprite) -> Option<SpriteSize>;
}

/// Resolved sizes for every sprite the game needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpriteSizes {
    pub earth: SpriteSize,
    pub moon: SpriteSize,
    pub turret: SpriteSize,
    pub asteroid: SpriteSize,
    pub crosshair: SpriteSize,
    pub explosion: SpriteSize,
    pub game_over: SpriteSize,
}

impl Default for SpriteSizes {
    /// Sizes of the built-in procedural sprites
    fn default() -> Self {
        Self {
            earth: SpriteSize::new(160, 160),
            moon: SpriteSize::new(48, 48),
            turret: SpriteSize::new(48, 48),
            asteroid: SpriteSize::new(40, 40),
            crosshair: SpriteSize::new(48, 48),
            explosion: SpriteSize::new(
                EXPLOSION_FRAME_SIZE * (EXPLOSION_LAST_FRAME + 1),
                EXPLOSION_FRAME_SIZE,
            ),
            game_over: SpriteSize::new(640, 128),
        }
    }
}

impl SpriteSource for SpriteSizes {
    fn size_of(&self, sprite: Sprite) -> Option<SpriteSize> {
        Some(self.get(sprite))
    }
}

impl SpriteSizes {
    pub fn get(&self, sprite: Sprite) -> SpriteSize {
        match sprite {
            Sprite::Earth => self.earth,
            Sprite::Moon => self.moon,
            Sprite::Turret => self.turret,
            Sprite::Asteroid => self.asteroid,
            Sprite::Crosshair => self.crosshair,
            Sprite::Explosion => self.explosion,
            Sprite::GameOver => self.game_over,
        }
    }

    /// Collect sizes from a loader; any missing or empty sprite is fatal
    pub fn resolve(source: &impl SpriteSource) -> GameResult<Self> {
        let fetch = |sprite: Sprite| -> GameResult<SpriteSize> {
            let size = source.size_of(sprite).ok_or_else(|| GameError::Asset {
                sprite,
                reason: "not loaded".into(),
            })?;
            if size.width == 0 || size.height == 0 {
                return Err(GameError::Asset {
                    sprite,
                    reason: format!("empty bitmap {}x{}", size.width, size.height),
                });
            }
            log::debug!("sprite {} is {}x{}", sprite.name(), size.width, size.height);
            Ok(size)
        };

        let explosion = fetch(Sprite::Explosion)?;
        if explosion.width < EXPLOSION_FRAME_SIZE * (EXPLOSION_LAST_FRAME + 1) {
            return Err(GameError::Asset {
                sprite: Sprite::Explosion,
                reason: format!(
                    "strip is {}px wide, need {} frames of {}px",
                    explosion.width,
                    EXPLOSION_LAST_FRAME + 1,
                    EXPLOSION_FRAME_SIZE
                ),
            });
        }

        Ok(Self {
            earth: fetch(Sprite::Earth)?,
            moon: fetch(Sprite::Moon)?,
            turret: fetch(Sprite::Turret)?,
            asteroid: fetch(Sprite::Asteroid)?,
            crosshair: fetch(Sprite::Crosshair)?,
            explosion,
            game_over: fetch(Sprite::GameOver)?,
        })
    }

    /// Collision radius for a sprite: half its width
    pub fn radius(&self, sprite: Sprite) -> f32 {
        self.get(sprite).width as f32 / 2.0
    }

    /// The explosion strip is laid out horizontally, so its radius comes from the height
    pub fn explosion_radius(&self) -> f32 {
        self.explosion.height as f32 / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct Loaded(HashMap<Sprite, SpriteSize>);

    impl SpriteSource for Loaded {
        fn size_of(&self, sprite: Sprite) -> Option<SpriteSize> {
            self.0.get(&sprite).copied()
        }
    }

    fn full() -> Loaded {
        let defaults = SpriteSizes::default();
        Loaded(Sprite::ALL.iter().map(|&s| (s, defaults.get(s))).collect())
    }

    #[test]
    fn test_resolve_all_present() {
        let sizes = SpriteSizes::resolve(&full()).unwrap();
        assert_eq!(sizes, SpriteSizes::default());
        assert_eq!(sizes.radius(Sprite::Earth), 80.0);
        assert_eq!(sizes.explosion_radius(), EXPLOSION_FRAME_SIZE as f32 / 2.0);
    }

    #[test]
    fn test_resolve_missing_sprite_is_fatal() {
        let mut loaded = full();
        loaded.0.remove(&Sprite::Turret);
        let err = SpriteSizes::resolve(&loaded).unwrap_err();
        assert!(matches!(err, GameError::Asset { sprite: Sprite::Turret, .. }));
    }

    #[test]
    fn test_resolve_rejects_short_explosion_strip() {
        let mut loaded = full();
        loaded
            .0
            .insert(Sprite::Explosion, SpriteSize::new(EXPLOSION_FRAME_SIZE * 3, EXPLOSION_FRAME_SIZE));
        assert!(SpriteSizes::resolve(&loaded).is_err());
    }
}
