//! Floor and ceiling pass.
//!
//! For every row below the horizon the distance to the floor is constant,
//! so the world point under the leftmost pixel is found once and then
//! advanced by a fixed step per column.  Ceiling rows are the mirror image
//! of floor rows around the horizon.  Everything lands in an off-screen
//! image first (0 = nothing) and is composited onto the frame in one blit,
//! followed by a fog band on each side of the horizon.

use glam::Vec2;

use crate::{
    renderer::{
        Rect,
        software::{
            Software,
            blit::{Target, draw_gradient, draw_texture},
        },
    },
    world::{Entity, Face, Level, TextureBank},
};

impl Software {
    pub fn draw_planes(
        &mut self,
        entity: &Entity,
        level: &Level,
        bank: &TextureBank,
        anim_frame: u32,
    ) {
        let (w, h) = (self.width, self.height);
        let horizon = h / 2;
        let buf = &mut self.planes.pixels;
        buf.fill(0);

        // outermost rays of the view
        let ray_l = entity.direction - entity.camera;
        let ray_r = entity.direction + entity.camera;
        let spread = (ray_r - ray_l) / self.width_f;

        for p in 0..h - horizon {
            let floor_y = horizon + p;
            // mirrored row above the horizon (may not exist on odd heights)
            let ceil_y = horizon.checked_sub(p + 1);

            // row 0 sits on the horizon; treat it like row 1
            let row_distance = self.half_h / p.max(1) as f32;
            let step = spread * row_distance;
            let mut world = entity.position + ray_l * row_distance;

            for x in 0..w {
                let map = world.floor().as_ivec2();
                let cell = level.get_cell(map.x, map.y);
                let state = cell.map_or(0, |c| c.state()) as usize;

                let floor = cell.and_then(|c| c.texture(Face::Bottom)).or(level.floor);
                if let Some(id) = floor {
                    let tex = bank.texture_or_missing(id);
                    let (u, v) = wrap(world, tex.width, tex.height);
                    buf[floor_y * w + x] = tex.sample(u, v, tex.frame_at(anim_frame), state);
                }

                if let Some(cy) = ceil_y {
                    let ceiling = cell.and_then(|c| c.texture(Face::Top)).or(level.ceiling);
                    if let Some(id) = ceiling {
                        let tex = bank.texture_or_missing(id);
                        let (u, v) = wrap(world, tex.width, tex.height);
                        buf[cy * w + x] =
                            tex.sample(tex.width - 1 - u, v, tex.frame_at(anim_frame), state);
                    }
                }

                world += step;
            }
        }

        let mut target = Target::new(&mut self.scratch, w, h);
        let full = Rect::new(0.0, 0.0, self.width_f, self.height_f);
        draw_texture(&mut target, &self.planes, full, full);

        // fog: opaque at the horizon, fading out towards the screen edges
        let fog = self.config.fog_color;
        let clear = fog & 0x00_FF_FF_FF;
        let band = self.half_h * self.config.fog_height;
        if band > 0.0 {
            draw_gradient(&mut target, self.half_h, self.half_h + band, fog, clear);
            draw_gradient(&mut target, self.half_h, self.half_h - band, fog, clear);
        }
    }
}

/// Texel coordinates of world point `p` on a `w × h` texture tiled once per
/// cell.  Power-of-two sizes wrap with a mask, anything else with `rem_euclid`.
#[inline(always)]
fn wrap(p: Vec2, w: usize, h: usize) -> (usize, usize) {
    (wrap_axis(p.x, w), wrap_axis(p.y, h))
}

#[inline(always)]
fn wrap_axis(t: f32, size: usize) -> usize {
    let i = (t * size as f32).floor() as i32;
    let n = size as i32;
    if size.is_power_of_two() {
        (i & (n - 1)) as usize
    } else {
        i.rem_euclid(n) as usize
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
