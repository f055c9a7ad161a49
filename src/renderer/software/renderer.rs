use std::ops::Deref;

use crate::{
    config::RenderConfig,
    renderer::{Renderer, RendererExt, Rgba, software::{TintCache, VisSprite}},
    world::{Entity, Level, Texture, TextureBank},
};

/// Nearest wall distance per screen column.
///
/// Written once per column by the wall pass, read by the sprite pass.
#[derive(Default, Debug)]
pub struct DepthBuffer {
    cols: Vec<f32>,
    sentinel: f32,
}

impl DepthBuffer {
    /// Resize to `width` columns and mark every column as empty.
    pub fn reset(&mut self, width: usize, sentinel: f32) {
        self.sentinel = sentinel;
        self.cols.clear();
        self.cols.resize(width, sentinel);
    }

    #[inline]
    pub fn set(&mut self, x: usize, distance: f32) {
        self.cols[x] = distance;
    }

    /// Distance recorded for column `x`; columns off-screen read as empty.
    #[inline]
    pub fn get(&self, x: usize) -> f32 {
        self.cols.get(x).copied().unwrap_or(self.sentinel)
    }

    /// Value of columns no wall was drawn in.
    #[inline]
    pub fn sentinel(&self) -> f32 {
        self.sentinel
    }
}

impl Deref for DepthBuffer {
    type Target = [f32];
    fn deref(&self) -> &[f32] {
        &self.cols
    }
}

/// Grid raycasting backend.
pub struct Software {
    pub scratch: Vec<Rgba>,
    pub depth: DepthBuffer,
    /// Off-screen floor/ceiling image, blitted once per frame.
    pub planes: Texture,
    /// Draw order of the level's sprites for the current frame.
    pub sprites: Vec<VisSprite>,
    pub tint_cache: TintCache,
    pub config: RenderConfig,

    pub width: usize,
    pub height: usize,

    pub width_f: f32,
    pub height_f: f32,
    pub half_w: f32,
    pub half_h: f32,
}

impl Default for Software {
    fn default() -> Self {
        Self::new(RenderConfig::default())
    }
}

impl Renderer for Software {
    fn begin_frame(&mut self, w: usize, h: usize) {
        if w != self.width || h != self.height {
            log::debug!("software renderer: {}x{} -> {w}x{h}", self.width, self.height);
            self.width = w;
            self.height = h;
            self.width_f = w as f32;
            self.height_f = h as f32;
            self.half_w = self.width_f * 0.5;
            self.half_h = self.height_f * 0.5;
            self.scratch.resize(w * h, 0);
            self.planes = Texture {
                name: "PLANES".into(),
                width: w,
                height: h,
                image_width: w,
                frames: 1,
                states: 1,
                pixels: vec![0; w * h],
            };
        }
        // no-hit columns and untextured rows keep this colour
        self.scratch.fill(self.config.background);

        self.depth.reset(w, self.config.depth_sentinel());
        self.sprites.clear();
    }

    fn draw_level(&mut self, entity: &Entity, level: &Level, bank: &TextureBank, anim_frame: u32) {
        if self.width == 0 || self.height == 0 {
            return;
        }
        self.draw_planes(entity, level, bank, anim_frame);
        self.draw_walls(entity, level, bank, anim_frame);

        self.collect_sprites(entity, level);
        self.draw_sprites(entity, level, bank, anim_frame);
    }

    fn end_frame<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize),
    {
        submit(&self.scratch, self.width, self.height);
    }
}

impl Software {
    pub fn new(config: RenderConfig) -> Self {
        Self {
            scratch: Vec::new(),
            depth: DepthBuffer::default(),
            planes: Texture::default(),
            sprites: Vec::new(),
            tint_cache: TintCache::default(),
            config,
            width: 0,
            height: 0,
            width_f: 0.0,
            height_f: 0.0,
            half_w: 0.0,
            half_h: 0.0,
        }
    }

    /// Render one frame straight into `target` (`width * height` pixels).
    ///
    /// A target of any other length is left untouched.
    pub fn render_into(
        &mut self,
        target: &mut [Rgba],
        width: usize,
        height: usize,
        entity: &Entity,
        level: &Level,
        bank: &TextureBank,
        anim_frame: u32,
    ) {
        if target.len() != width * height {
            log::warn!(
                "render_into: target holds {} pixels, {width}x{height} needs {}",
                target.len(),
                width * height
            );
            return;
        }
        self.draw_frame(width, height, entity, level, bank, anim_frame, |fb, _, _| {
            target.copy_from_slice(fb); // one fast memcpy
        });
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
