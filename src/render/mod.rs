//! Rendering
//!
//! The frame is built as a flat list of [`DrawCmd`]s from the post-tick game
//! state, then replayed onto a [`Surface`]. Building the list is pure, so
//! layout and visibility rules are tested without a browser.

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod scene;

use glam::IVec2;

use crate::assets::Sprite;
use crate::error::GameResult;

pub use scene::{HudOverlay, build_scene, loading_scene};

/// RGBA color, 8 bits per channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const GREEN: Color = Color::rgb(0, 255, 0);
    pub const YELLOW: Color = Color::rgb(255, 255, 0);
    pub const CYAN: Color = Color::rgb(0, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// CSS color string
    pub fn css(&self) -> String {
        format!(
            "rgba({}, {}, {}, {:.3})",
            self.r,
            self.g,
            self.b,
            self.a as f32 / 255.0
        )
    }
}

/// One drawing operation, in logical screen pixels
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    /// Whole sprite centered on `center`, rotated by `angle` radians about it
    Sprite {
        sprite: Sprite,
        center: IVec2,
        angle: f32,
    },
    /// One square frame of a horizontal strip, centered on `center`
    SpriteFrame {
        sprite: Sprite,
        frame: u32,
        frame_size: u32,
        center: IVec2,
    },
    Line {
        from: IVec2,
        to: IVec2,
        color: Color,
    },
    /// `origin` is the left end of the text baseline
    Text {
        text: String,
        origin: IVec2,
        color: Color,
    },
    Rect {
        min: IVec2,
        size: IVec2,
        color: Color,
    },
}

/// Glyph-bound text measurement
pub trait TextMeasure {
    /// Width and height of the ink box of `text`, rounded up to whole pixels
    fn bounds(&self, text: &str) -> IVec2;
}

/// Fixed-advance metrics for monospace fonts
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonospaceMetrics {
    pub advance: f32,
    pub height: f32,
}

impl MonospaceMetrics {
    pub const fn new(advance: f32, height: f32) -> Self {
        Self { advance, height }
    }
}

impl Default for MonospaceMetrics {
    fn default() -> Self {
        Self::new(19.0, 23.0)
    }
}

impl TextMeasure for MonospaceMetrics {
    fn bounds(&self, text: &str) -> IVec2 {
        let width = text.chars().count() as f32 * self.advance;
        IVec2::new(width.ceil() as i32, self.height.ceil() as i32)
    }
}

/// Something that can be drawn into a frame
pub trait Draw {
    fn draw(&self, out: &mut Vec<DrawCmd>);
}

/// A render target able to replay draw commands
pub trait Surface {
    fn clear(&mut self) -> GameResult<()>;
    fn draw(&mut self, cmd: &DrawCmd) -> GameResult<()>;
}

/// Clear `surface` and replay `cmds` in order, stopping at the first failure
pub fn present(surface: &mut impl Surface, cmds: &[DrawCmd]) -> GameResult<()> {
    surface.clear()?;
    for cmd in cmds {
        surface.draw(cmd)?;
    }
    Ok(())
}
