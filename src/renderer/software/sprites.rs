//! Billboard sprites.
//!
//! Sprites are drawn after the walls, far to near, each one clipped against
//! the per-column wall depth so a sprite is only visible between the first
//! and last column where it stands in front of the wall.

use std::{collections::HashMap, f32::consts::TAU};

use glam::Mat2;

use crate::{
    renderer::{
        Rect, Rgba,
        software::{
            Software,
            blit::{Target, draw_border_rectangle, draw_texture},
        },
    },
    world::{Align, Entity, Level, Sprite, SpriteFlags, Texture, TextureBank, TextureId},
};

/// Number of pre-darkened copies kept per tinted sprite texture.
pub const TINT_BUCKETS: u8 = 16;

const DEST_BORDER: Rgba = 0xFF_FF_00_00;
const CLIP_BORDER: Rgba = 0xFF_00_FF_00;

/// One entry of the per-frame draw order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisSprite {
    /// Index into `Level::sprites`.
    pub index: usize,
    /// Euclidean distance from the viewer.
    pub distance: f32,
}

/// Screen placement of a sprite for the current frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpriteProjection {
    /// Depth along the view direction.
    pub depth: f32,
    /// Height of a full-size sprite at this depth.
    pub full: f32,
    /// Where the whole sprite would land.
    pub dest: Rect,
    /// Part of `dest` in front of the walls.
    pub clip: Rect,
}

/// Darkened copies of sprite textures, keyed by texture and tint bucket.
#[derive(Default)]
pub struct TintCache {
    map: HashMap<(TextureId, u8), Texture>,
}

impl TintCache {
    /// Bucket used for tint `intensity` in `0.0..=1.0`.
    #[inline]
    pub fn bucket(intensity: f32) -> u8 {
        (intensity.clamp(0.0, 1.0) * f32::from(TINT_BUCKETS - 1)).round() as u8
    }

    /// Texture `id` darkened by `intensity`, built on first use.
    pub fn get<'a>(
        &'a mut self,
        bank: &'a TextureBank,
        id: TextureId,
        intensity: f32,
    ) -> &'a Texture {
        let bucket = Self::bucket(intensity);
        if bucket == 0 {
            return bank.texture_or_missing(id);
        }
        self.map.entry((id, bucket)).or_insert_with(|| {
            log::debug!("tint cache: texture {id} bucket {bucket}");
            bank.texture_or_missing(id)
                .tinted(f32::from(bucket) / f32::from(TINT_BUCKETS - 1))
        })
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Frame of a static sprite as seen from `viewer`: frame 0 faces +X and
/// frames advance counter-clockwise, each covering an equal arc centred
/// on its own direction.
fn angle_frame(sprite: &Sprite, viewer: glam::Vec2, frames: usize) -> usize {
    let to_viewer = viewer - sprite.position;
    let angle = to_viewer.y.atan2(to_viewer.x);
    let n = frames as f32;
    ((angle / TAU * n + 0.5).floor().rem_euclid(n) as usize).min(frames - 1)
}

impl Software {
    /// Fill the draw order with every sprite of the level, farthest first.
    /// Ties keep level order.
    pub fn collect_sprites(&mut self, entity: &Entity, level: &Level) {
        self.sprites.clear();
        self.sprites.extend(level.sprites.iter().enumerate().map(|(index, s)| VisSprite {
            index,
            distance: s.position.distance(entity.position),
        }));
        // far-to-near painter’s algorithm so we overdraw correctly
        self.sprites
            .sort_by(|a, b| b.distance.total_cmp(&a.distance));
    }

    /// Project `sprite` to the screen and clip it against the depth buffer.
    ///
    /// `None` when it is behind the viewer, off-screen, or fully hidden.
    pub fn project_sprite(
        &self,
        entity: &Entity,
        basis: &Mat2,
        sprite: &Sprite,
    ) -> Option<SpriteProjection> {
        let view = *basis * (sprite.position - entity.position);
        let depth = view.y;
        if depth <= 0.0 || !depth.is_finite() {
            return None;
        }

        let screen_x = self.half_w * (1.0 + view.x / depth);
        let full = (self.height_f / depth).abs();
        let size = full * sprite.scale + self.config.sprite_padding;

        let y = match sprite.align {
            Align::None => self.half_h - size * 0.5,
            Align::Top => self.half_h - full * 0.5,
            Align::Bottom => self.half_h + full * 0.5 - size,
        };
        let dest = Rect::new(screen_x - size * 0.5, y, size, size);
        if dest.right() <= 0.0 || dest.x >= self.width_f {
            return None;
        }

        // columns the sprite touches
        let first = dest.x.max(0.0).floor() as usize;
        let last = (dest.right().ceil() as usize).min(self.width);
        let visible = |c: &usize| self.depth.get(*c) > depth;

        let left = (first..last).find(visible)?;
        let right = (first..last).rev().find(visible)?;

        let x0 = (left as f32).max(dest.x);
        let x1 = ((right + 1) as f32).min(dest.right());
        Some(SpriteProjection {
            depth,
            full,
            dest,
            clip: Rect::new(x0, y, x1 - x0, size),
        })
    }

    /// Draw the active sprites in the order left by [`Self::collect_sprites`].
    pub fn draw_sprites(
        &mut self,
        entity: &Entity,
        level: &Level,
        bank: &TextureBank,
        anim_frame: u32,
    ) {
        if self.sprites.is_empty() {
            return;
        }
        let Some(basis) = entity.view_basis() else {
            log::warn!(
                "sprite pass skipped: degenerate view basis (dir {}, plane {})",
                entity.direction,
                entity.camera
            );
            return;
        };

        let order = std::mem::take(&mut self.sprites);
        for vs in &order {
            let Some(sprite) = level.sprites.get(vs.index) else {
                continue;
            };
            if !sprite.is_active() {
                continue;
            }
            let Some(proj) = self.project_sprite(entity, &basis, sprite) else {
                continue;
            };

            let tex = if sprite.flags.contains(SpriteFlags::TINTED) {
                let intensity =
                    self.config.wall_tint * (1.0 - proj.full / self.height_f).clamp(0.0, 1.0);
                self.tint_cache.get(bank, sprite.texture, intensity)
            } else {
                bank.texture_or_missing(sprite.texture)
            };

            let frame = if sprite.flags.contains(SpriteFlags::STATIC) {
                angle_frame(sprite, entity.position, tex.frames)
            } else {
                tex.frame_at(anim_frame)
            };
            let (ox, oy) = tex.frame_origin(frame, 0);

            // crop the source in proportion to what survived the depth test
            let tw = tex.width as f32;
            let src = Rect::new(
                ox as f32 + (proj.clip.x - proj.dest.x) / proj.dest.w * tw,
                oy as f32,
                proj.clip.w / proj.dest.w * tw,
                tex.height as f32,
            );

            let mut target = Target::new(&mut self.scratch, self.width, self.height);
            draw_texture(&mut target, tex, src, proj.clip);

            if self.config.debug {
                draw_border_rectangle(&mut target, proj.dest, DEST_BORDER);
                draw_border_rectangle(&mut target, proj.clip, CLIP_BORDER);
            }
        }
        self.sprites = order;
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
