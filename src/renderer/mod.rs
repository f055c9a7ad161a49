//! Rendering abstraction layer.
//!
//! *The rest of the program never touches a pixel buffer directly.*
//! It hands a [`Level`], the viewing [`Entity`] and an animation tick to a
//! type that implements [`Renderer`] and receives the finished frame back.
//!
//! * Back-ends (`renderer::software`, …) can be swapped without changing
//!   game logic.
//! * A helper blanket-impl [`RendererExt`] adds `draw_frame` so call-sites
//!   stay short.

use crate::world::{Entity, Level, TextureBank};

/// Pixel format of the software frame-buffer (0xAARRGGBB).
pub type Rgba = u32;

/// Axis-aligned screen or texture rectangle in (sub-)pixel units.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    #[inline]
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        !(self.w > 0.0 && self.h > 0.0)
    }
}

/*──────────────────────── colour helpers ─────────────────────────────*/

#[inline(always)]
fn channels(c: Rgba) -> [u32; 4] {
    [c >> 24, (c >> 16) & 0xFF, (c >> 8) & 0xFF, c & 0xFF]
}

/// Darken `c` towards black by `intensity` (0 = unchanged, 1 = black).
/// Alpha is kept.
#[inline]
pub fn shade(c: Rgba, intensity: f32) -> Rgba {
    let k = (1.0 - intensity.clamp(0.0, 1.0)) * 256.0;
    let k = k as u32;
    let [a, r, g, b] = channels(c);
    (a << 24) | (((r * k) >> 8) << 16) | (((g * k) >> 8) << 8) | ((b * k) >> 8)
}

/// Composite `src` over `dst` using `src`'s alpha.
#[inline]
pub fn blend(dst: Rgba, src: Rgba) -> Rgba {
    let [sa, sr, sg, sb] = channels(src);
    match sa {
        0 => dst,
        255 => src,
        _ => {
            let [da, dr, dg, db] = channels(dst);
            let inv = 255 - sa;
            let mix = |s: u32, d: u32| (s * sa + d * inv) / 255;
            (da.max(sa) << 24) | (mix(sr, dr) << 16) | (mix(sg, dg) << 8) | mix(sb, db)
        }
    }
}

/// Linear interpolation between two colours, all four channels.
#[inline]
pub fn lerp_color(a: Rgba, b: Rgba, t: f32) -> Rgba {
    let t = t.clamp(0.0, 1.0);
    let ca = channels(a);
    let cb = channels(b);
    let f = |x: u32, y: u32| -> u32 { ((x as f32) * (1.0 - t) + (y as f32) * t).round() as u32 };
    (f(ca[0], cb[0]) << 24) | (f(ca[1], cb[1]) << 16) | (f(ca[2], cb[2]) << 8) | f(ca[3], cb[3])
}

/*──────────────────────── backend contract ───────────────────────────*/

/// A renderer that owns an internal scratch buffer for the whole frame.
///
/// `end_frame` hands the finished buffer to a user-supplied closure.
/// Software callers typically forward it to their window-manager.
pub trait Renderer {
    /// (Re)allocate internal scratch for the requested resolution and clear it.
    fn begin_frame(&mut self, width: usize, height: usize);

    /// Draw the level as seen by `entity`. `anim_frame` drives animated
    /// textures.
    fn draw_level(&mut self, entity: &Entity, level: &Level, bank: &TextureBank, anim_frame: u32);

    /// Finish the frame and **loan** the finished buffer to `submit`.
    ///
    /// * `submit(&[Rgba], w, h)` is run exactly once per frame.
    /// * Software caller passes `|fb, w, h| window.update_with_buffer(fb, w, h)`.
    fn end_frame<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize);
}

/// Convenience blanket-impl with a one-liner `draw_frame` adaptor.
pub trait RendererExt: Renderer {
    fn draw_frame<F>(
        &mut self,
        width: usize,
        height: usize,
        entity: &Entity,
        level: &Level,
        bank: &TextureBank,
        anim_frame: u32,
        submit: F,
    ) where
        F: FnOnce(&[Rgba], usize, usize),
    {
        self.begin_frame(width, height);
        self.draw_level(entity, level, bank, anim_frame);
        self.end_frame(submit);
    }
}
impl<T: Renderer + ?Sized> RendererExt for T {}

pub mod software;

pub use software::{CastResult, DepthBuffer, Software, cast_ray};
