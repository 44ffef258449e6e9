//! Canvas 2D surface and procedural sprites (browser only)
//!
//! Every sprite is painted once at startup onto its own offscreen canvas.
//! The canvas sizes are what the simulation derives its collision radii from.

use std::collections::HashMap;
use std::f64::consts::TAU;

use glam::IVec2;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement};

use super::{DrawCmd, MonospaceMetrics, Surface, TextMeasure};
use crate::assets::{Sprite, SpriteSize, SpriteSource, SpriteSizes};
use crate::consts::{EXPLOSION_FIRST_FRAME, EXPLOSION_LAST_FRAME, SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::error::{GameError, GameResult};

/// HUD font
const FONT: &str = "28px monospace";

fn surface_err(what: &'static str) -> impl Fn(JsValue) -> GameError {
    move |e| GameError::Surface(format!("{what}: {e:?}"))
}

fn asset_err(sprite: Sprite) -> impl Fn(JsValue) -> GameError {
    move |e| GameError::Asset {
        sprite,
        reason: format!("{e:?}"),
    }
}

fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, JsValue> {
    canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(JsValue::from)
}

fn circle(ctx: &CanvasRenderingContext2d, x: f64, y: f64, r: f64) -> Result<(), JsValue> {
    ctx.begin_path();
    ctx.arc(x, y, r, 0.0, TAU)?;
    Ok(())
}

/// Offscreen bitmaps for every sprite
pub struct SpriteAtlas {
    sheets: HashMap<Sprite, HtmlCanvasElement>,
}

impl SpriteAtlas {
    /// Paint every sprite at its default size
    pub fn generate(document: &Document) -> GameResult<Self> {
        let sizes = SpriteSizes::default();
        let mut sheets = HashMap::new();

        for sprite in Sprite::ALL {
            let size = sizes.get(sprite);
            let canvas: HtmlCanvasElement = document
                .create_element("canvas")
                .map_err(asset_err(sprite))?
                .dyn_into()
                .map_err(|_| GameError::Asset {
                    sprite,
                    reason: "not a canvas element".into(),
                })?;
            canvas.set_width(size.width);
            canvas.set_height(size.height);
            let ctx = context_2d(&canvas).map_err(asset_err(sprite))?;
            paint(sprite, &ctx, size).map_err(asset_err(sprite))?;
            sheets.insert(sprite, canvas);
        }

        log::info!("Generated {} sprites", sheets.len());
        Ok(Self { sheets })
    }

    fn sheet(&self, sprite: Sprite) -> GameResult<&HtmlCanvasElement> {
        self.sheets.get(&sprite).ok_or_else(|| GameError::Asset {
            sprite,
            reason: "not loaded".into(),
        })
    }
}

impl SpriteSource for SpriteAtlas {
    fn size_of(&self, sprite: Sprite) -> Option<SpriteSize> {
        self.sheets
            .get(&sprite)
            .map(|c| SpriteSize::new(c.width(), c.height()))
    }
}

fn paint(sprite: Sprite, ctx: &CanvasRenderingContext2d, size: SpriteSize) -> Result<(), JsValue> {
    let w = size.width as f64;
    let h = size.height as f64;
    let r = w / 2.0;

    match sprite {
        Sprite::Earth => {
            circle(ctx, r, r, r)?;
            ctx.set_fill_style_str("#2a6fd6");
            ctx.fill();
            ctx.set_fill_style_str("#3c9a3c");
            for (dx, dy, size) in [(-0.35, -0.2, 0.38), (0.3, 0.25, 0.3), (0.1, -0.45, 0.2)] {
                circle(ctx, r + dx * r, r + dy * r, size * r)?;
                ctx.fill();
            }
            ctx.set_fill_style_str("#f0f4ff");
            ctx.begin_path();
            ctx.ellipse(r, r * 0.12, r * 0.35, r * 0.1, 0.0, 0.0, TAU)?;
            ctx.fill();
            circle(ctx, r, r, r - 1.5)?;
            ctx.set_stroke_style_str("rgba(150, 200, 255, 0.7)");
            ctx.set_line_width(3.0);
            ctx.stroke();
        }
        Sprite::Moon => {
            circle(ctx, r, r, r - 1.0)?;
            ctx.set_fill_style_str("#b8b8b8");
            ctx.fill();
            ctx.set_fill_style_str("#8c8c8c");
            for (dx, dy, size) in [(-0.3, -0.25, 0.22), (0.35, 0.1, 0.16), (-0.05, 0.45, 0.12)] {
                circle(ctx, r + dx * r, r + dy * r, size * r)?;
                ctx.fill();
            }
        }
        Sprite::Turret => {
            // Barrel points along +x so an angle of 0 aims right
            ctx.set_fill_style_str("#e0e0e0");
            ctx.fill_rect(r, r - 3.0, r - 2.0, 6.0);
            circle(ctx, r, r, r * 0.35)?;
            ctx.set_fill_style_str("#505a66");
            ctx.fill();
        }
        Sprite::Asteroid => {
            const SHAPE: [f64; 9] = [1.0, 0.82, 0.95, 0.78, 1.0, 0.88, 0.75, 0.93, 0.86];
            ctx.begin_path();
            for (i, k) in SHAPE.iter().enumerate() {
                let t = i as f64 / SHAPE.len() as f64 * TAU;
                let x = r + t.cos() * k * (r - 1.0);
                let y = r + t.sin() * k * (r - 1.0);
                if i == 0 {
                    ctx.move_to(x, y);
                } else {
                    ctx.line_to(x, y);
                }
            }
            ctx.close_path();
            ctx.set_fill_style_str("#8b6b4a");
            ctx.fill();
            ctx.set_stroke_style_str("#5a4330");
            ctx.set_line_width(2.0);
            ctx.stroke();
        }
        Sprite::Crosshair => {
            ctx.set_stroke_style_str("#39ff14");
            ctx.set_line_width(3.0);
            circle(ctx, r, r, r * 0.6)?;
            ctx.stroke();
            ctx.begin_path();
            for (from, to) in [((0.0, r), (r * 0.55, r)), ((w, r), (w - r * 0.55, r))] {
                ctx.move_to(from.0, from.1);
                ctx.line_to(to.0, to.1);
            }
            for (from, to) in [((r, 0.0), (r, r * 0.55)), ((r, h), (r, h - r * 0.55))] {
                ctx.move_to(from.0, from.1);
                ctx.line_to(to.0, to.1);
            }
            ctx.stroke();
        }
        Sprite::Explosion => {
            // Frame 0 stays blank
            let frame = h;
            let frames = (EXPLOSION_LAST_FRAME - EXPLOSION_FIRST_FRAME + 1) as f64;
            for i in EXPLOSION_FIRST_FRAME..=EXPLOSION_LAST_FRAME {
                let progress = (i - EXPLOSION_FIRST_FRAME + 1) as f64 / frames;
                let cx = i as f64 * frame + frame / 2.0;
                let cy = frame / 2.0;
                let radius = (frame / 2.0 - 2.0) * (0.3 + 0.7 * progress);
                let alpha = 1.0 - 0.75 * progress;

                circle(ctx, cx, cy, radius)?;
                ctx.set_fill_style_str(&format!("rgba(255, 140, 30, {alpha:.2})"));
                ctx.fill();
                circle(ctx, cx, cy, radius * (0.7 - 0.4 * progress))?;
                ctx.set_fill_style_str(&format!("rgba(255, 240, 140, {alpha:.2})"));
                ctx.fill();
            }
        }
        Sprite::GameOver => {
            ctx.set_font("bold 96px monospace");
            ctx.set_text_align("center");
            ctx.set_text_baseline("middle");
            ctx.set_fill_style_str("#ff3030");
            ctx.fill_text("GAME OVER", w / 2.0, h / 2.0)?;
        }
    }
    Ok(())
}

/// The visible game canvas, fixed at the logical resolution and scaled by CSS
pub struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
    atlas: Option<SpriteAtlas>,
}

impl CanvasSurface {
    pub fn new(canvas: &HtmlCanvasElement) -> GameResult<Self> {
        canvas.set_width(SCREEN_WIDTH as u32);
        canvas.set_height(SCREEN_HEIGHT as u32);
        let ctx = context_2d(canvas).map_err(surface_err("canvas context"))?;
        ctx.set_font(FONT);
        ctx.set_text_baseline("alphabetic");
        Ok(Self { ctx, atlas: None })
    }

    pub fn set_atlas(&mut self, atlas: SpriteAtlas) {
        self.atlas = Some(atlas);
    }

    fn sheet(&self, sprite: Sprite) -> GameResult<&HtmlCanvasElement> {
        match &self.atlas {
            Some(atlas) => atlas.sheet(sprite),
            None => Err(GameError::Asset {
                sprite,
                reason: "sprites not generated yet".into(),
            }),
        }
    }
}

impl TextMeasure for CanvasSurface {
    fn bounds(&self, text: &str) -> IVec2 {
        match self.ctx.measure_text(text) {
            Ok(m) => IVec2::new(
                (m.actual_bounding_box_left() + m.actual_bounding_box_right()).ceil() as i32,
                (m.actual_bounding_box_ascent() + m.actual_bounding_box_descent()).ceil() as i32,
            ),
            Err(_) => MonospaceMetrics::default().bounds(text),
        }
    }
}

impl Surface for CanvasSurface {
    fn clear(&mut self) -> GameResult<()> {
        self.ctx.set_fill_style_str("#000008");
        self.ctx
            .fill_rect(0.0, 0.0, SCREEN_WIDTH as f64, SCREEN_HEIGHT as f64);
        Ok(())
    }

    fn draw(&mut self, cmd: &DrawCmd) -> GameResult<()> {
        let ctx = &self.ctx;
        match cmd {
            DrawCmd::Sprite {
                sprite,
                center,
                angle,
            } => {
                let sheet = self.sheet(*sprite)?;
                let (w, h) = (sheet.width() as f64, sheet.height() as f64);
                ctx.save();
                let drawn = ctx
                    .translate(center.x as f64, center.y as f64)
                    .and_then(|_| ctx.rotate(*angle as f64))
                    .and_then(|_| {
                        ctx.draw_image_with_html_canvas_element(sheet, -w / 2.0, -h / 2.0)
                    });
                ctx.restore();
                drawn.map_err(surface_err("sprite"))?;
            }
            DrawCmd::SpriteFrame {
                sprite,
                frame,
                frame_size,
                center,
            } => {
                let sheet = self.sheet(*sprite)?;
                let size = *frame_size as f64;
                ctx.draw_image_with_html_canvas_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
                    sheet,
                    *frame as f64 * size,
                    0.0,
                    size,
                    size,
                    center.x as f64 - size / 2.0,
                    center.y as f64 - size / 2.0,
                    size,
                    size,
                )
                .map_err(surface_err("sprite frame"))?;
            }
            DrawCmd::Line { from, to, color } => {
                ctx.begin_path();
                ctx.move_to(from.x as f64 + 0.5, from.y as f64 + 0.5);
                ctx.line_to(to.x as f64 + 0.5, to.y as f64 + 0.5);
                ctx.set_stroke_style_str(&color.css());
                ctx.set_line_width(1.0);
                ctx.stroke();
            }
            DrawCmd::Text {
                text,
                origin,
                color,
            } => {
                ctx.set_fill_style_str(&color.css());
                ctx.fill_text(text, origin.x as f64, origin.y as f64)
                    .map_err(surface_err("text"))?;
            }
            DrawCmd::Rect { min, size, color } => {
                ctx.set_fill_style_str(&color.css());
                ctx.fill_rect(min.x as f64, min.y as f64, size.x as f64, size.y as f64);
            }
        }
        Ok(())
    }
}
