//! Pixel-copy and composite primitives over a borrowed frame.
//!
//! Every routine clips against the target; none keeps state.

use crate::{
    renderer::{Rect, Rgba, blend, lerp_color, shade},
    world::Texture,
};

/// Mutable view of a row-major pixel buffer.
pub struct Target<'a> {
    pub pixels: &'a mut [Rgba],
    pub width: usize,
    pub height: usize,
}

impl<'a> Target<'a> {
    pub fn new(pixels: &'a mut [Rgba], width: usize, height: usize) -> Self {
        debug_assert_eq!(pixels.len(), width * height);
        Self {
            pixels,
            width,
            height,
        }
    }

    #[inline(always)]
    fn put(&mut self, x: usize, y: usize, c: Rgba) {
        let px = &mut self.pixels[y * self.width + x];
        *px = blend(*px, c);
    }

    /// Integer pixel range covered by `r`, clipped to the target.
    /// A pixel is covered when its centre lies inside the rectangle.
    #[inline]
    fn span(&self, r: &Rect) -> Option<(usize, usize, usize, usize)> {
        let x0 = (r.x - 0.5).ceil().max(0.0);
        let y0 = (r.y - 0.5).ceil().max(0.0);
        let x1 = (r.right() - 0.5).ceil().min(self.width as f32);
        let y1 = (r.bottom() - 0.5).ceil().min(self.height as f32);
        if r.is_empty() || x0 >= x1 || y0 >= y1 {
            return None;
        }
        Some((x0 as usize, y0 as usize, x1 as usize, y1 as usize))
    }
}

/// Copy `src` (texel rectangle inside the packed image) scaled onto `dst`.
///
/// Nearest-neighbour; fully transparent texels are skipped, partially
/// transparent ones are blended.
pub fn draw_texture(target: &mut Target, tex: &Texture, src: Rect, dst: Rect) {
    let Some((x0, y0, x1, y1)) = target.span(&dst) else {
        return;
    };
    let img_h = tex.pixels.len() / tex.image_width;
    let u_step = src.w / dst.w;
    let v_step = src.h / dst.h;

    // texel columns are constant per destination column
    for x in x0..x1 {
        let u = src.x + (x as f32 + 0.5 - dst.x) * u_step;
        let tx = (u.max(0.0) as usize).min(tex.image_width - 1);
        for y in y0..y1 {
            let v = src.y + (y as f32 + 0.5 - dst.y) * v_step;
            let ty = (v.max(0.0) as usize).min(img_h - 1);
            target.put(x, y, tex.texel(tx, ty));
        }
    }
}

/// Darken everything inside `rect` by `intensity`.
pub fn draw_tint(target: &mut Target, rect: Rect, intensity: f32) {
    if intensity <= 0.0 {
        return;
    }
    let Some((x0, y0, x1, y1)) = target.span(&rect) else {
        return;
    };
    for y in y0..y1 {
        let row = &mut target.pixels[y * target.width..][..target.width];
        for px in &mut row[x0..x1] {
            *px = shade(*px, intensity);
        }
    }
}

/// Full-width vertical gradient blended over rows `y0 → y1`; `color_a`
/// applies at `y0`, `color_b` at `y1`. `y1` may be above `y0`.
pub fn draw_gradient(target: &mut Target, y0: f32, y1: f32, color_a: Rgba, color_b: Rgba) {
    let (top, bottom) = if y0 <= y1 { (y0, y1) } else { (y1, y0) };
    let rect = Rect::new(0.0, top, target.width as f32, bottom - top);
    let Some((x0, r0, x1, r1)) = target.span(&rect) else {
        return;
    };
    let len = y1 - y0;
    for y in r0..r1 {
        let t = (y as f32 + 0.5 - y0) / len;
        let c = lerp_color(color_a, color_b, t);
        for x in x0..x1 {
            target.put(x, y, c);
        }
    }
}

/// One-pixel outline of `rect`.
pub fn draw_border_rectangle(target: &mut Target, rect: Rect, color: Rgba) {
    let Some((x0, y0, x1, y1)) = target.span(&rect) else {
        return;
    };
    for x in x0..x1 {
        target.put(x, y0, color);
        target.put(x, y1 - 1, color);
    }
    for y in y0..y1 {
        target.put(x0, y, color);
        target.put(x1 - 1, y, color);
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
#[cfg(test)]
mod tests {
    use super::*;

    const W: usize = 8;
    const H: usize = 8;

    fn quad() -> Texture {
        // 2×2: red green / blue transparent
        Texture::single(
            "QUAD",
            2,
            2,
            vec![0xFF_FF_00_00, 0xFF_00_FF_00, 0xFF_00_00_FF, 0x00_00_00_00],
        )
        .unwrap()
    }

    #[test]
    fn texture_scales_and_skips_transparent() {
        let mut fb = vec![0xFF_20_20_20; W * H];
        let mut t = Target::new(&mut fb, W, H);
        draw_texture(
            &mut t,
            &quad(),
            Rect::new(0.0, 0.0, 2.0, 2.0),
            Rect::new(0.0, 0.0, 4.0, 4.0),
        );
        assert_eq!(fb[0], 0xFF_FF_00_00);
        assert_eq!(fb[1 * W + 1], 0xFF_FF_00_00);
        assert_eq!(fb[3], 0xFF_00_FF_00);
        assert_eq!(fb[3 * W], 0xFF_00_00_FF);
        // transparent quarter kept the clear colour
        assert_eq!(fb[3 * W + 3], 0xFF_20_20_20);
        // outside the destination untouched
        assert_eq!(fb[4], 0xFF_20_20_20);
    }

    #[test]
    fn texture_clipped_at_screen_edge_keeps_mapping() {
        let mut fb = vec![0; W * H];
        let mut t = Target::new(&mut fb, W, H);
        // half of the destination hangs off the left edge
        draw_texture(
            &mut t,
            &quad(),
            Rect::new(0.0, 0.0, 2.0, 2.0),
            Rect::new(-4.0, 0.0, 8.0, 8.0),
        );
        // the visible part is the right texel column
        assert_eq!(fb[0], 0xFF_00_FF_00);
        assert_eq!(fb[3], 0xFF_00_FF_00);
        assert_eq!(fb[4], 0);
    }

    #[test]
    fn tint_only_inside_rect() {
        let mut fb = vec![0xFF_80_80_80; W * H];
        let mut t = Target::new(&mut fb, W, H);
        draw_tint(&mut t, Rect::new(2.0, 0.0, 1.0, 8.0), 0.5);
        assert_eq!(fb[2], 0xFF_40_40_40);
        assert_eq!(fb[7 * W + 2], 0xFF_40_40_40);
        assert_eq!(fb[1], 0xFF_80_80_80);
        assert_eq!(fb[3], 0xFF_80_80_80);
    }

    #[test]
    fn gradient_fades_between_rows() {
        let mut fb = vec![0xFF_FF_FF_FF; W * H];
        let mut t = Target::new(&mut fb, W, H);
        // opaque black at row 0 → transparent at row 8
        draw_gradient(&mut t, 0.0, 8.0, 0xFF_00_00_00, 0x00_00_00_00);
        let r = |p: Rgba| (p >> 16) & 0xFF;
        assert!(r(fb[0]) < r(fb[4 * W]));
        assert!(r(fb[4 * W]) < r(fb[7 * W]));
        // reversed direction darkens the bottom instead
        let mut fb = vec![0xFF_FF_FF_FF; W * H];
        let mut t = Target::new(&mut fb, W, H);
        draw_gradient(&mut t, 8.0, 0.0, 0xFF_00_00_00, 0x00_00_00_00);
        assert!(r(fb[7 * W]) < r(fb[0]));
    }

    #[test]
    fn border_draws_outline_only() {
        let mut fb = vec![0; W * H];
        let mut t = Target::new(&mut fb, W, H);
        draw_border_rectangle(&mut t, Rect::new(1.0, 1.0, 4.0, 4.0), 0xFF_FF_FF_FF);
        assert_eq!(fb[1 * W + 1], 0xFF_FF_FF_FF);
        assert_eq!(fb[4 * W + 4], 0xFF_FF_FF_FF);
        assert_eq!(fb[1 * W + 4], 0xFF_FF_FF_FF);
        assert_eq!(fb[2 * W + 2], 0);
        assert_eq!(fb[0], 0);
    }
}
