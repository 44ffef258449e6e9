//! One-shot explosion animation
//!
//! Frames advance once per tick while exploding and stop at the last frame,
//! raising `done`. Owners poll `done` after updating to finalise their own
//! state, so animation timing stays separate from gameplay transitions.

use glam::IVec2;

use super::collision::Body;
use crate::assets::Sprite;
use crate::consts::{EXPLOSION_FIRST_FRAME, EXPLOSION_LAST_FRAME};

#[derive(Debug, Clone, PartialEq)]
pub struct Explosion {
    pub body: Body,
    /// Current frame in `EXPLOSION_FIRST_FRAME..=EXPLOSION_LAST_FRAME`
    pub frame: u32,
    pub exploding: bool,
    /// Set once the last frame has been shown
    pub done: bool,
}

impl Explosion {
    pub fn new(radius: f32) -> Self {
        Self {
            body: Body::new(Sprite::Explosion, radius),
            frame: EXPLOSION_FIRST_FRAME,
            exploding: false,
            done: false,
        }
    }

    /// Start exploding. No-op while a cycle is already running.
    pub fn trigger(&mut self) {
        if self.exploding {
            return;
        }
        self.exploding = true;
        self.done = false;
        self.frame = EXPLOSION_FIRST_FRAME;
    }

    /// Re-anchor on `center` and advance one frame if exploding
    pub fn update(&mut self, center: IVec2) {
        self.body.center = center;

        if self.exploding {
            if self.frame < EXPLOSION_LAST_FRAME {
                self.frame += 1;
            } else {
                self.exploding = false;
                self.done = true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_explosion_does_not_advance() {
        let mut explosion = Explosion::new(43.0);
        for _ in 0..20 {
            explosion.update(IVec2::new(5, 5));
        }
        assert_eq!(explosion.frame, EXPLOSION_FIRST_FRAME);
        assert!(!explosion.done);
        assert_eq!(explosion.body.center, IVec2::new(5, 5));
    }

    #[test]
    fn test_full_cycle_reaches_last_frame_once() {
        let mut explosion = Explosion::new(43.0);
        explosion.trigger();

        let mut last_frame_hits = 0;
        let mut previous = explosion.frame;
        let mut ticks = 0;
        while !explosion.done {
            explosion.update(IVec2::ZERO);
            ticks += 1;
            assert!(explosion.frame >= previous, "frame went backwards");
            previous = explosion.frame;
            if explosion.frame == EXPLOSION_LAST_FRAME && explosion.exploding {
                last_frame_hits += 1;
            }
            assert!(ticks < 100, "explosion never finished");
        }

        assert_eq!(last_frame_hits, 1);
        assert!(!explosion.exploding);
        // LAST - FIRST advances plus the tick that retires the final frame
        assert_eq!(ticks, EXPLOSION_LAST_FRAME - EXPLOSION_FIRST_FRAME + 1);

        // Frozen until retriggered
        explosion.update(IVec2::ZERO);
        assert_eq!(explosion.frame, EXPLOSION_LAST_FRAME);
        assert!(explosion.done);
    }

    #[test]
    fn test_trigger_while_running_keeps_progress() {
        let mut explosion = Explosion::new(43.0);
        explosion.trigger();
        explosion.update(IVec2::ZERO);
        explosion.update(IVec2::ZERO);
        let frame = explosion.frame;
        explosion.trigger();
        assert_eq!(explosion.frame, frame);
    }

    #[test]
    fn test_retrigger_after_done_restarts() {
        let mut explosion = Explosion::new(43.0);
        explosion.trigger();
        while !explosion.done {
            explosion.update(IVec2::ZERO);
        }
        explosion.trigger();
        assert!(explosion.exploding);
        assert!(!explosion.done);
        assert_eq!(explosion.frame, EXPLOSION_FIRST_FRAME);
    }
}
