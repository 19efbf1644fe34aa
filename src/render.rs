//! Terminal rendering: the playfield is scaled onto a half-block pixel grid.

use crate::game::GameState;
use crate::geometry::Rect;
use crossterm::{
    cursor, queue,
    style::{self, Color as CColor},
};
use std::io::{self, Write};

// ── Colors ──────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    const fn lerp(a: Rgb, b: Rgb, t_256: u16) -> Rgb {
        let t = t_256 as i32;
        Rgb(
            (a.0 as i32 + (b.0 as i32 - a.0 as i32) * t / 256) as u8,
            (a.1 as i32 + (b.1 as i32 - a.1 as i32) * t / 256) as u8,
            (a.2 as i32 + (b.2 as i32 - a.2 as i32) * t / 256) as u8,
        )
    }

    const fn dim(self) -> Rgb {
        Rgb(self.0 / 2, self.1 / 2, self.2 / 2)
    }

    fn to_crossterm(self) -> CColor {
        CColor::Rgb {
            r: self.0,
            g: self.1,
            b: self.2,
        }
    }
}

const LETTERBOX: Rgb = Rgb(18, 22, 30);
const SKY_TOP: Rgb = Rgb(70, 180, 200);
const SKY_BOT: Rgb = Rgb(190, 232, 245);
const PIPE_L: Rgb = Rgb(74, 122, 26);
const PIPE_M: Rgb = Rgb(100, 170, 40);
const PIPE_R: Rgb = Rgb(115, 191, 46);
const PIPE_HI: Rgb = Rgb(145, 215, 62);
const CAP_DARK: Rgb = Rgb(60, 100, 20);
const BIRD_Y: Rgb = Rgb(245, 200, 66);
const BIRD_HI: Rgb = Rgb(255, 225, 100);
const BIRD_WING: Rgb = Rgb(215, 165, 35);
const BIRD_EYE: Rgb = Rgb(255, 255, 255);
const BIRD_PUPIL: Rgb = Rgb(20, 20, 20);
const BIRD_BEAK: Rgb = Rgb(225, 75, 35);
const HILL_FAR: Rgb = Rgb(120, 195, 75);
const HILL_NEAR: Rgb = Rgb(95, 175, 55);
const PANEL: Rgb = Rgb(220, 195, 120);
const PANEL_EDGE: Rgb = Rgb(210, 185, 110);
const WHITE: Rgb = Rgb(255, 255, 255);
const SHADOW: Rgb = Rgb(30, 30, 30);

// ── Pixel buffer with half-block rendering ──────────────────────────────────

pub struct PixelBuf {
    w: usize,
    h: usize, // pixel height = terminal rows * 2
    px: Vec<Rgb>,
}

impl PixelBuf {
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            px: vec![LETTERBOX; w * h],
        }
    }

    pub fn resize(&mut self, w: usize, h: usize) {
        self.w = w;
        self.h = h;
        self.px.clear();
        self.px.resize(w * h, LETTERBOX);
    }

    pub fn width(&self) -> usize {
        self.w
    }

    pub fn height(&self) -> usize {
        self.h
    }

    fn clear(&mut self, c: Rgb) {
        self.px.fill(c);
    }

    fn set(&mut self, x: i32, y: i32, c: Rgb) {
        if x >= 0 && y >= 0 && (x as usize) < self.w && (y as usize) < self.h {
            self.px[y as usize * self.w + x as usize] = c;
        }
    }

    pub fn get(&self, x: usize, y: usize) -> Rgb {
        self.px[y * self.w + x]
    }

    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, c: Rgb) {
        for dy in 0..h {
            for dx in 0..w {
                self.set(x + dx, y + dy, c);
            }
        }
    }

    /// Emit the buffer as `▀` cells: foreground = upper pixel, background =
    /// lower pixel. Color escapes are only sent when the color changes.
    pub fn render(&self, out: &mut impl Write) -> io::Result<()> {
        queue!(out, cursor::MoveTo(0, 0))?;
        let rows = self.h / 2;
        let mut fg: Option<Rgb> = None;
        let mut bg: Option<Rgb> = None;

        for row in 0..rows {
            for col in 0..self.w {
                let top = self.get(col, row * 2);
                let bot = self.get(col, row * 2 + 1);

                if bg != Some(bot) {
                    queue!(out, style::SetBackgroundColor(bot.to_crossterm()))?;
                    bg = Some(bot);
                }
                if top == bot {
                    queue!(out, style::Print(' '))?;
                    continue;
                }
                if fg != Some(top) {
                    queue!(out, style::SetForegroundColor(top.to_crossterm()))?;
                    fg = Some(top);
                }
                queue!(out, style::Print('\u{2580}'))?;
            }
            if row + 1 < rows {
                queue!(out, style::ResetColor, style::Print("\r\n"))?;
                fg = None;
                bg = None;
            }
        }
        queue!(out, style::ResetColor)?;
        out.flush()
    }
}

// ── 3x5 bitmap font ─────────────────────────────────────────────────────────

#[rustfmt::skip]
const DIGITS: [[u8; 15]; 10] = [
    [1,1,1, 1,0,1, 1,0,1, 1,0,1, 1,1,1], // 0
    [0,1,0, 1,1,0, 0,1,0, 0,1,0, 1,1,1], // 1
    [1,1,1, 0,0,1, 1,1,1, 1,0,0, 1,1,1], // 2
    [1,1,1, 0,0,1, 0,1,1, 0,0,1, 1,1,1], // 3
    [1,0,1, 1,0,1, 1,1,1, 0,0,1, 0,0,1], // 4
    [1,1,1, 1,0,0, 1,1,1, 0,0,1, 1,1,1], // 5
    [1,1,1, 1,0,0, 1,1,1, 1,0,1, 1,1,1], // 6
    [1,1,1, 0,0,1, 0,1,0, 0,1,0, 0,1,0], // 7
    [1,1,1, 1,0,1, 1,1,1, 1,0,1, 1,1,1], // 8
    [1,1,1, 1,0,1, 1,1,1, 0,0,1, 1,1,1], // 9
];

#[rustfmt::skip]
fn glyph(ch: char) -> Option<[u8; 15]> {
    let g = match ch {
        '0'..='9' => DIGITS[(ch as u8 - b'0') as usize],
        'A' => [0,1,0, 1,0,1, 1,1,1, 1,0,1, 1,0,1],
        'C' => [1,1,1, 1,0,0, 1,0,0, 1,0,0, 1,1,1],
        'E' => [1,1,1, 1,0,0, 1,1,1, 1,0,0, 1,1,1],
        'G' => [1,1,1, 1,0,0, 1,0,1, 1,0,1, 1,1,1],
        'M' => [1,0,1, 1,1,1, 1,1,1, 1,0,1, 1,0,1],
        'O' => DIGITS[0],
        'P' => [1,1,1, 1,0,1, 1,1,1, 1,0,0, 1,0,0],
        'R' => [1,1,0, 1,0,1, 1,1,0, 1,0,1, 1,0,1],
        'S' => DIGITS[5],
        'V' => [1,0,1, 1,0,1, 1,0,1, 1,0,1, 0,1,0],
        _ => return None,
    };
    Some(g)
}

fn draw_glyph(buf: &mut PixelBuf, x: i32, y: i32, glyph: &[u8; 15], fg: Rgb) {
    for row in 0..5 {
        for col in 0..3 {
            if glyph[row * 3 + col] == 1 {
                let px = x + col as i32;
                let py = y + row as i32;
                buf.set(px + 1, py + 1, SHADOW);
                buf.set(px, py, fg);
            }
        }
    }
}

/// Draw `text` horizontally centered on `cx`. Unknown characters leave a blank.
fn draw_text(buf: &mut PixelBuf, cx: i32, y: i32, text: &str, fg: Rgb) {
    let len = text.chars().count() as i32;
    let start_x = cx - (len * 4 - 1) / 2; // 3px per glyph + 1px spacing
    for (i, ch) in text.chars().enumerate() {
        if let Some(g) = glyph(ch) {
            draw_glyph(buf, start_x + i as i32 * 4, y, &g, fg);
        }
    }
}

// ── Viewport ────────────────────────────────────────────────────────────────

/// Uniform scale from playfield units to pixels, centered in the buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub scale: f64,
    pub ox: i32,
    pub oy: i32,
    pub w: i32,
    pub h: i32,
}

impl Viewport {
    pub fn fit(pw: usize, ph: usize, field_w: f64, field_h: f64) -> Self {
        let scale = (pw as f64 / field_w).min(ph as f64 / field_h);
        let w = (field_w * scale).round() as i32;
        let h = (field_h * scale).round() as i32;
        Self {
            scale,
            ox: (pw as i32 - w) / 2,
            oy: (ph as i32 - h) / 2,
            w,
            h,
        }
    }

    pub fn px_x(&self, x: f64) -> i32 {
        self.ox + (x * self.scale).floor() as i32
    }

    pub fn px_y(&self, y: f64) -> i32 {
        self.oy + (y * self.scale).floor() as i32
    }

    /// Pixel span of a world rect, clipped to the viewport: (x0, y0, x1, y1).
    fn span(&self, r: &Rect) -> (i32, i32, i32, i32) {
        (
            self.px_x(r.x).max(self.ox),
            self.px_y(r.y).max(self.oy),
            self.px_x(r.right()).min(self.ox + self.w),
            self.px_y(r.bottom()).min(self.oy + self.h),
        )
    }

    fn center_x(&self) -> i32 {
        self.ox + self.w / 2
    }
}

// ── Renderer ────────────────────────────────────────────────────────────────

pub struct Renderer {
    buf: PixelBuf,
    /// Parallax offset; only advances while a round is live.
    scroll: f64,
    frame: u64,
}

impl Renderer {
    pub fn new(pw: usize, ph: usize) -> Self {
        Self {
            buf: PixelBuf::new(pw, ph),
            scroll: 0.0,
            frame: 0,
        }
    }

    pub fn resize(&mut self, pw: usize, ph: usize) {
        self.buf.resize(pw, ph);
    }

    pub fn buffer(&self) -> &PixelBuf {
        &self.buf
    }

    pub fn present(&self, out: &mut impl Write) -> io::Result<()> {
        self.buf.render(out)
    }

    pub fn draw(&mut self, game: &GameState) {
        self.frame += 1;
        if !game.is_over() {
            self.scroll += game.tuning().pipe_speed;
        }

        let tuning = game.tuning();
        let vp = Viewport::fit(
            self.buf.width(),
            self.buf.height(),
            tuning.field_width,
            tuning.field_height,
        );

        self.buf.clear(LETTERBOX);
        self.draw_sky(&vp);
        self.draw_hills(&vp);
        self.draw_pipes(&vp, game);
        self.draw_bird(&vp, game);
        draw_text(
            &mut self.buf,
            vp.center_x(),
            vp.oy + ((50.0 * vp.scale) as i32).max(2),
            &game.score().to_string(),
            WHITE,
        );

        if game.is_over() {
            self.draw_game_over(&vp, game);
        }
    }

    fn draw_sky(&mut self, vp: &Viewport) {
        for y in 0..vp.h {
            let t = (y as u32 * 256 / vp.h.max(1) as u32) as u16;
            let c = Rgb::lerp(SKY_TOP, SKY_BOT, t);
            for x in 0..vp.w {
                self.buf.set(vp.ox + x, vp.oy + y, c);
            }
        }
    }

    fn draw_hills(&mut self, vp: &Viewport) {
        let base = vp.oy + vp.h;
        let layers = [(HILL_FAR, 0.2, 0.02, 60.0), (HILL_NEAR, 0.4, 0.03, 30.0)];
        for (color, parallax, freq, lift) in layers {
            for x in 0..vp.w {
                let wx = x as f64 / vp.scale + self.scroll * parallax;
                let h = lift + (wx * freq).sin() * 18.0 + (wx * freq * 1.7).sin() * 9.0;
                let top = base - (h * vp.scale) as i32;
                for y in top..base {
                    self.buf.set(vp.ox + x, y, color);
                }
            }
        }
    }

    fn draw_pipes(&mut self, vp: &Viewport, game: &GameState) {
        let tuning = game.tuning();
        let tex_h = f64::from(tuning.pipe_texture_height);
        let cap_h = ((24.0 * vp.scale) as i32).max(1);
        let cap_extra = ((4.0 * vp.scale) as i32).max(1);

        for pipe in game.pipes() {
            let w = f64::from(pipe.width());
            let top = f64::from(pipe.top_height());
            let bottom = f64::from(pipe.bottom_y());

            // Sprites are pipe_texture_height tall, anchored at the gap edges
            let top_body = Rect::new(pipe.x(), top - tex_h, w, tex_h);
            let bottom_body = Rect::new(pipe.x(), bottom, w, tex_h);
            self.fill_pipe(vp, &top_body);
            self.fill_pipe(vp, &bottom_body);

            let x0 = vp.px_x(pipe.x());
            let x1 = vp.px_x(pipe.x() + w);
            let gap_top = vp.px_y(top);
            let gap_bot = vp.px_y(bottom);
            self.fill_cap(vp, x0 - cap_extra, x1 + cap_extra, gap_top - cap_h, gap_top);
            self.fill_cap(vp, x0 - cap_extra, x1 + cap_extra, gap_bot, gap_bot + cap_h);
        }
    }

    fn fill_pipe(&mut self, vp: &Viewport, body: &Rect) {
        let (x0, y0, x1, y1) = vp.span(body);
        let full_w = (body.w * vp.scale).round() as i32;
        let left = vp.px_x(body.x);
        for x in x0..x1 {
            let c = pipe_shade(x - left, full_w);
            for y in y0..y1 {
                self.buf.set(x, y, c);
            }
        }
    }

    fn fill_cap(&mut self, vp: &Viewport, x0: i32, x1: i32, y0: i32, y1: i32) {
        let cx0 = x0.max(vp.ox);
        let cx1 = x1.min(vp.ox + vp.w);
        let cy0 = y0.max(vp.oy);
        let cy1 = y1.min(vp.oy + vp.h);
        for x in cx0..cx1 {
            let c = pipe_shade(x - x0, x1 - x0);
            for y in cy0..cy1 {
                let edge = y == y0 || y == y1 - 1;
                self.buf.set(x, y, if edge { CAP_DARK } else { c });
            }
        }
    }

    fn draw_bird(&mut self, vp: &Viewport, game: &GameState) {
        let bird = game.bird();
        let (x0, y0, x1, y1) = vp.span(&bird.rect(game.tuning()));
        let bw = (x1 - x0).max(2);
        let bh = (y1 - y0).max(2);

        // Nose up shifts the beak and wing up a pixel, nose down shifts them down
        let tilt = (-bird.rotation() / 30.0).clamp(-1.0, 1.0).round() as i32;

        self.buf.fill_rect(x0, y0, bw, bh, BIRD_Y);
        self.buf.fill_rect(x0 + 1, y0, (bw - 2).max(1), 1, BIRD_HI);

        let flap = if self.frame % 8 < 4 { -1 } else { 0 };
        let wing_y = y0 + bh / 2 + flap + tilt;
        self.buf
            .fill_rect(x0, wing_y, (bw / 3).max(1), (bh / 3).max(1), BIRD_WING);

        let ex = x0 + bw - (bw / 3).max(1) - 1;
        let ey = y0 + bh / 4;
        let eye = (bw / 6).max(1);
        self.buf.fill_rect(ex, ey, eye + 1, eye + 1, BIRD_EYE);
        self.buf.set(ex + eye, ey + eye, BIRD_PUPIL);

        let beak_w = (bw / 4).max(1);
        let beak_h = (bh / 3).max(1);
        self.buf
            .fill_rect(x0 + bw, y0 + bh / 2 - beak_h / 2 + tilt, beak_w, beak_h, BIRD_BEAK);
    }

    fn draw_game_over(&mut self, vp: &Viewport, game: &GameState) {
        for y in vp.oy..vp.oy + vp.h {
            for x in vp.ox..vp.ox + vp.w {
                let (ux, uy) = (x as usize, y as usize);
                if x >= 0 && y >= 0 && ux < self.buf.w && uy < self.buf.h {
                    let c = self.buf.get(ux, uy);
                    self.buf.set(x, y, c.dim());
                }
            }
        }

        let cx = vp.center_x();
        let cy = vp.oy + vp.h / 2;
        let panel_w = 40;
        let panel_h = 24;
        let px = cx - panel_w / 2;
        let py = cy - panel_h / 2;
        self.buf
            .fill_rect(px - 1, py - 1, panel_w + 2, panel_h + 2, SHADOW);
        self.buf.fill_rect(px, py, panel_w, panel_h, PANEL_EDGE);
        self.buf
            .fill_rect(px + 1, py + 1, panel_w - 2, panel_h - 2, PANEL);

        draw_text(&mut self.buf, cx, py + 2, "GAME OVER", WHITE);
        draw_text(&mut self.buf, cx, py + 9, &game.score().to_string(), BIRD_Y);
        if (self.frame / 30) % 2 == 0 {
            draw_text(&mut self.buf, cx, py + 16, "SPACE", WHITE);
        }
    }
}

fn pipe_shade(x: i32, total_w: i32) -> Rgb {
    if total_w <= 1 {
        return PIPE_M;
    }
    let t = (x.clamp(0, total_w - 1) as f64 / (total_w - 1) as f64 * 256.0) as u16;
    if t < 64 {
        Rgb::lerp(PIPE_L, PIPE_M, (t * 4).min(256))
    } else if t < 100 {
        Rgb::lerp(PIPE_M, PIPE_HI, ((t - 64) * 7).min(256))
    } else if t < 160 {
        Rgb::lerp(PIPE_HI, PIPE_R, ((t - 100) * 4).min(256))
    } else {
        Rgb::lerp(PIPE_R, PIPE_L, ((t - 160) * 3).min(256))
    }
}
