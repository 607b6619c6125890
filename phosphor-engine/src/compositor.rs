//! Compositor - generator dispatch and scanline packing
//!
//! `Demo` owns the layers, the palette and geometry banks, and the scheduler,
//! and turns them into finished scanlines. Generation runs a fixed few rows
//! ahead of the row being packed, so the presenter always finds the row it
//! wants already composited.

use phosphor_fx::{
    chess, fire, font, fractal, plasma, wireframe, Fluid, GeometryBank, Layer, PaletteBank, Shape,
    Spin, VIDEO_H, VIDEO_W,
};

use crate::effect::Effect;
use crate::ring::FrameRing;
use crate::scheduler::Scheduler;

/// How many rows generation leads the packed output. The presenter trails
/// the producer by at least this margin.
pub const LEAD_ROWS: usize = 3;

/// Drift applied to the fractal's frame-relative sweep so the zoom starts
/// mid-flight instead of at the parameter's resting point.
const FRACTAL_SWEEP_BIAS: u32 = 110;

const TITLE: &str = "PHOSPHOR";
const TITLE_Y: usize = 50;
const TITLE_X: usize = 45;
/// Horizontal step between revealed title glyphs, in pixels.
const TITLE_ADVANCE: usize = 9;
const TITLE_SCALE: usize = 2;
const TITLE_SHADE: u8 = 250;
/// Frame the title starts spelling out, one glyph every `TITLE_STEP` frames.
const TITLE_REVEAL_START: u32 = 120;
const TITLE_STEP: u32 = 4;
/// Frame the finished title is stamped whole, in case the reveal raced a
/// wipe.
const TITLE_RESTAMP: u32 = 160;

const WIRE_SHADE: u8 = 210;
const CHESS_WIRE_SHADE: u8 = 254;
const CREDITS_SHADE: u8 = 128;

pub struct Demo {
    scheduler: Scheduler,
    bg: Layer,
    fg: Layer,
    palettes: PaletteBank,
    geometry: GeometryBank,
    row_buf: Box<[u16]>,
}

impl Demo {
    pub fn new() -> Self {
        let mut demo = Self {
            scheduler: Scheduler::new(),
            bg: Layer::new(),
            fg: Layer::new(),
            palettes: PaletteBank::new(),
            geometry: GeometryBank::new(),
            row_buf: vec![0u16; VIDEO_W].into_boxed_slice(),
        };
        // Arm the first frame before any scanline is produced.
        demo.scheduler.begin_frame(&mut demo.bg, &mut demo.fg);
        demo
    }

    #[inline]
    pub fn effect(&self) -> Effect {
        self.scheduler.effect()
    }

    #[inline]
    pub fn frame(&self) -> u32 {
        self.scheduler.frame()
    }

    /// Produce the next scanline into the ring. Runs the frame prologue when
    /// the scan position wraps; returns the new effect when that prologue
    /// performed a transition.
    pub fn render_scanline(&mut self, ring: &FrameRing) -> Option<Effect> {
        let mut switched = None;
        if self.scheduler.row() >= VIDEO_H {
            self.scheduler.rearm();
            switched = self.scheduler.begin_frame(&mut self.bg, &mut self.fg);
        }

        let y = self.scheduler.take_row();
        let frame = self.scheduler.frame();
        let effect = self.scheduler.effect();

        // Generate ahead of the packed row.
        let gen_row = (y + LEAD_ROWS) % VIDEO_H;
        for x in 0..VIDEO_W {
            self.draw_pixel(effect, frame, gen_row, x);
        }

        self.composite_row(y);
        ring.publish(y, frame, &self.row_buf);
        switched
    }

    /// Per-pixel generator dispatch for the active effect. Whole-frame
    /// generators (wireframe redraw, text) are gated on the first generated
    /// pixel so they run once per frame.
    fn draw_pixel(&mut self, effect: Effect, frame: u32, y: usize, x: usize) {
        match effect {
            Effect::Start => {}
            Effect::Water => {
                fire::step_cell(Fluid::Water, frame, y, x, &mut self.bg);
                if y == 0 && x == 0 {
                    self.title_reveal(frame);
                }
            }
            Effect::Acid => {
                fire::step_cell(Fluid::Acid, frame, y, x, &mut self.bg);
            }
            Effect::Wireframe => {
                self.bg.set(y as i32, x as i32, chess::shade(frame, y, x));
                if frame % 4 == 0 && y == 0 && x == 0 {
                    wireframe::render(
                        &mut self.fg,
                        &self.geometry,
                        Shape::Gem,
                        Spin::Warped,
                        frame / 4,
                        CHESS_WIRE_SHADE,
                    );
                }
            }
            Effect::FireA => {
                fire::step_cell(Fluid::Flame, frame, y, x, &mut self.bg);
                if y == 0 && x == 0 {
                    wireframe::render(
                        &mut self.fg,
                        &self.geometry,
                        Shape::Cube,
                        Spin::Regular,
                        frame,
                        WIRE_SHADE,
                    );
                }
            }
            Effect::Fractal => {
                if y % 2 == 0 && x % 2 == 0 {
                    let rel = frame.saturating_sub(Effect::Fractal.start_frame())
                        + FRACTAL_SWEEP_BIAS;
                    fractal::render_block(rel, y, x, &mut self.bg);
                }
            }
            Effect::FireB | Effect::FireC => {
                if y % 4 == 0 && x % 4 == 0 {
                    plasma::render_block(frame, y, x, &mut self.bg);
                }
                if y == 0 && x == 0 {
                    let spin = if effect == Effect::FireC {
                        Spin::Warped
                    } else {
                        Spin::Regular
                    };
                    wireframe::render(
                        &mut self.fg,
                        &self.geometry,
                        Shape::Gem,
                        spin,
                        frame,
                        WIRE_SHADE,
                    );
                }
            }
            Effect::End => {
                if y % 4 == 0 && x % 4 == 0 {
                    plasma::render_block(frame, y, x, &mut self.bg);
                }
                if y == 0 && x == 0 {
                    self.credits();
                }
            }
        }
    }

    /// Pack one display row: both layers through the active palette, ORed
    /// together. Index 0 is color 0 in every palette, so an empty foreground
    /// cell lets the background through untouched.
    fn composite_row(&mut self, y: usize) {
        let palette = self.scheduler.palette();
        let bg_row = self.bg.row(y);
        let fg_row = self.fg.row(y);
        for x in 0..VIDEO_W {
            self.row_buf[x] = self.palettes.color(palette, bg_row[x])
                | self.palettes.color(palette, fg_row[x]);
        }
    }

    fn title_reveal(&mut self, frame: u32) {
        let glyphs = TITLE.len() as u32;
        let reveal_end = TITLE_REVEAL_START + glyphs * TITLE_STEP;
        if frame % TITLE_STEP == 0 && frame >= TITLE_REVEAL_START && frame < reveal_end {
            let idx = ((frame - TITLE_REVEAL_START) / TITLE_STEP) as usize;
            self.stamp_title_glyph(idx);
        }
        if frame == TITLE_RESTAMP {
            for idx in 0..TITLE.len() {
                self.stamp_title_glyph(idx);
            }
        }
    }

    fn stamp_title_glyph(&mut self, idx: usize) {
        font::draw_text(
            &mut self.fg,
            TITLE_Y,
            TITLE_X + idx * TITLE_ADVANCE,
            TITLE_SCALE,
            TITLE_SHADE,
            &TITLE[idx..=idx],
        );
    }

    fn credits(&mut self) {
        font::draw_text(&mut self.fg, 36, 46, 1, CREDITS_SHADE, "PHOSPHOR  DEMO");
        font::draw_text(&mut self.fg, 44, 46, 1, CREDITS_SHADE, "     WILD     ");
        font::draw_text(&mut self.fg, 52, 46, 1, CREDITS_SHADE, "   TERMINAL   ");
        font::draw_text(&mut self.fg, 64, 46, 1, CREDITS_SHADE, " CODE: OXIDIZE");
        font::draw_text(&mut self.fg, 72, 46, 1, CREDITS_SHADE, "MUSIC: SQUARES");
    }
}

impl Default for Demo {
    fn default() -> Self {
        Self::new()
    }
}
