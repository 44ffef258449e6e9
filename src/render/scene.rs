//! Frame composition
//!
//! Entities draw themselves through [`Draw`]; [`build_scene`] layers them
//! with the HUD, the title screen and the optional overlays.

use glam::IVec2;

use super::{Color, Draw, DrawCmd, TextMeasure};
use crate::assets::Sprite;
use crate::consts::{EXPLOSION_FRAME_SIZE, SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::screen_center;
use crate::sim::{Asteroid, Asteroids, Crosshair, Earth, Explosion, GameState, Moon, Turret};

/// Gap between HUD numbers and the screen edge
const HUD_PADDING: i32 = 20;

pub const TITLE_TEXT: &str = "Lunar Defence";
pub const CREDITS_TEXT: &str = "Original game by Siôn le Roux";
pub const START_TEXT: &str = "CLICK TO START";
pub const LOADING_TEXT: &str = "LOADING...";
pub const COOLDOWN_TEXT: &str = "MISSED: COOLING DOWN!";
pub const TRY_AGAIN_TEXT: &str = "CLICK TO TRY AGAIN";

/// Optional extras drawn over the HUD
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HudOverlay {
    /// Frames per second to show, if the counter is on
    pub fps: Option<u32>,
    /// Collision/position debug markers
    pub debug: bool,
}

impl Draw for Earth {
    fn draw(&self, out: &mut Vec<DrawCmd>) {
        if !self.impacted {
            out.push(DrawCmd::Sprite {
                sprite: self.body.sprite,
                center: self.body.center,
                angle: self.spin,
            });
        }
    }
}

impl Draw for Turret {
    fn draw(&self, out: &mut Vec<DrawCmd>) {
        out.push(DrawCmd::Sprite {
            sprite: self.body.sprite,
            center: self.body.center,
            angle: self.angle,
        });
    }
}

impl Draw for Moon {
    fn draw(&self, out: &mut Vec<DrawCmd>) {
        out.push(DrawCmd::Sprite {
            sprite: self.body.sprite,
            center: self.body.center,
            angle: self.orbit_angle,
        });
        self.turret.draw(out);
    }
}

impl Draw for Explosion {
    fn draw(&self, out: &mut Vec<DrawCmd>) {
        if self.exploding {
            out.push(DrawCmd::SpriteFrame {
                sprite: self.body.sprite,
                frame: self.frame,
                frame_size: EXPLOSION_FRAME_SIZE,
                center: self.body.center,
            });
        }
    }
}

impl Draw for Asteroid {
    fn draw(&self, out: &mut Vec<DrawCmd>) {
        if !self.alive {
            return;
        }
        out.push(DrawCmd::Sprite {
            sprite: self.body.sprite,
            center: self.body.center,
            angle: self.spin,
        });
        self.explosion.draw(out);
    }
}

impl Draw for Asteroids {
    fn draw(&self, out: &mut Vec<DrawCmd>) {
        for asteroid in self.iter() {
            asteroid.draw(out);
        }
    }
}

impl Draw for Crosshair {
    fn draw(&self, out: &mut Vec<DrawCmd>) {
        out.push(DrawCmd::Sprite {
            sprite: self.body.sprite,
            center: self.body.center,
            angle: 0.0,
        });
        self.explosion.draw(out);

        if self.shooting {
            out.push(DrawCmd::Line {
                from: self.shooting_from,
                to: self.body.center,
                color: Color::RED,
            });
        }
    }
}

fn text(out: &mut Vec<DrawCmd>, text: impl Into<String>, origin: IVec2) {
    out.push(DrawCmd::Text {
        text: text.into(),
        origin,
        color: Color::WHITE,
    });
}

/// Horizontally centered text on baseline `y`
fn centered_text(out: &mut Vec<DrawCmd>, metrics: &impl TextMeasure, label: &str, y: i32) {
    let half_width = metrics.bounds(label).x / 2;
    text(out, label, IVec2::new(SCREEN_WIDTH / 2 - half_width, y));
}

/// The only frame shown before sprites exist
pub fn loading_scene(metrics: &impl TextMeasure) -> Vec<DrawCmd> {
    let bounds = metrics.bounds(LOADING_TEXT);
    let origin = IVec2::new(
        SCREEN_WIDTH / 2 - bounds.x / 2,
        SCREEN_HEIGHT / 2 - bounds.y / 2,
    );
    let mut out = Vec::with_capacity(1);
    text(&mut out, LOADING_TEXT, origin);
    out
}

fn title_screen(out: &mut Vec<DrawCmd>, metrics: &impl TextMeasure) {
    let line = |label: &str| metrics.bounds(label).y * 2;
    centered_text(out, metrics, START_TEXT, line(START_TEXT));
    centered_text(
        out,
        metrics,
        CREDITS_TEXT,
        SCREEN_HEIGHT - line(CREDITS_TEXT),
    );
    centered_text(out, metrics, TITLE_TEXT, SCREEN_HEIGHT - line(TITLE_TEXT) * 2);
}

fn hud(out: &mut Vec<DrawCmd>, state: &GameState, metrics: &impl TextMeasure) -> i32 {
    let digits = metrics.bounds("00");
    let baseline = digits.y * 2;
    let right_column = digits.x + HUD_PADDING;

    text(out, state.count.to_string(), IVec2::new(HUD_PADDING, baseline));
    text(
        out,
        state.wave.to_string(),
        IVec2::new(SCREEN_WIDTH - right_column, baseline),
    );

    if state.crosshair.cooling_down && !state.breathless {
        centered_text(out, metrics, COOLDOWN_TEXT, baseline);
    }
    if !state.game_over && state.breathless {
        centered_text(out, metrics, &format!("WAVE {}", state.wave), baseline);
    }
    if state.game_over && !state.breathless {
        centered_text(out, metrics, TRY_AGAIN_TEXT, baseline);
    }
    baseline
}

fn debug_overlay(out: &mut Vec<DrawCmd>, state: &GameState, baseline: i32) {
    let center = screen_center();
    let marker = IVec2::splat(40);
    out.push(DrawCmd::Rect {
        min: center - marker / 2,
        size: marker,
        color: Color::YELLOW,
    });
    let pointer = state.crosshair.body.center;
    out.push(DrawCmd::Rect {
        min: pointer - marker / 2,
        size: marker,
        color: Color::GREEN,
    });

    let earth = state.earth.body.center;
    out.push(DrawCmd::Line {
        from: earth,
        to: earth + IVec2::new(state.earth.body.radius() as i32, 0),
        color: Color::RED,
    });
    out.push(DrawCmd::Line {
        from: earth,
        to: pointer,
        color: Color::CYAN,
    });

    let offset = pointer - center;
    let distance = offset.as_vec2().length();
    text(
        out,
        format!("({}, {}) d{:.0}", offset.x, offset.y, distance),
        IVec2::new(HUD_PADDING, baseline * 2),
    );
}

/// Compose a full frame from the post-tick state
pub fn build_scene(
    state: &GameState,
    metrics: &impl TextMeasure,
    overlay: HudOverlay,
) -> Vec<DrawCmd> {
    let mut out = Vec::with_capacity(state.asteroids.len() * 2 + 16);

    if state.wave == 0 {
        title_screen(&mut out, metrics);
    }

    state.asteroids.draw(&mut out);
    state.moon.draw(&mut out);
    state.earth.draw(&mut out);
    state.crosshair.draw(&mut out);

    if state.game_over {
        out.push(DrawCmd::Sprite {
            sprite: Sprite::GameOver,
            center: screen_center(),
            angle: 0.0,
        });
    }

    let baseline = hud(&mut out, state, metrics);

    if overlay.debug {
        debug_overlay(&mut out, state, baseline);
    }
    if let Some(fps) = overlay.fps {
        text(
            &mut out,
            format!("FPS: {fps}"),
            IVec2::new(HUD_PADDING, baseline * 3),
        );
    }

    out
}
