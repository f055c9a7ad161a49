use crate::{
    renderer::{
        Rect,
        software::{
            Software,
            blit::{Target, draw_texture, draw_tint},
            raycast::cast_ray,
        },
    },
    world::{Entity, Face, Level, TextureBank},
};

/// Hits closer than this are drawn as if they were this far away.
const MIN_DISTANCE: f32 = 1e-3;

impl Software {
    /// One textured, distance-tinted strip per screen column; records the
    /// wall distance of every column in the depth buffer.
    pub fn draw_walls(
        &mut self,
        entity: &Entity,
        level: &Level,
        bank: &TextureBank,
        anim_frame: u32,
    ) {
        let height_f = self.height_f;
        let half_h = self.half_h;
        let tint = self.config.wall_tint;
        let max_depth = self.config.max_depth;

        let mut target = Target::new(&mut self.scratch, self.width, self.height);

        for x in 0..self.width {
            let Some(hit) = cast_ray(self.width, x, entity, level, max_depth) else {
                continue; // background shows through
            };
            let distance = hit.distance.max(MIN_DISTANCE);
            self.depth.set(x, distance);

            let Some(id) = hit.cell.texture(hit.face) else {
                continue;
            };
            let tex = bank.texture_or_missing(id);

            let mut tx = ((hit.wall * tex.width as f32) as usize).min(tex.width - 1);
            // keep textures reading left-to-right from every side
            if matches!(hit.face, Face::North | Face::East) {
                tx = tex.width - 1 - tx;
            }

            let (ox, oy) = tex.frame_origin(tex.frame_at(anim_frame), hit.cell.state() as usize);
            let wall_h = (height_f / distance).abs();
            let strip = Rect::new(x as f32, half_h - wall_h * 0.5, 1.0, wall_h);

            draw_texture(
                &mut target,
                tex,
                Rect::new((ox + tx) as f32, oy as f32, 1.0, tex.height as f32),
                strip,
            );
            draw_tint(&mut target, strip, tint * (1.0 - wall_h / height_f).clamp(0.0, 1.0));
        }
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::RenderConfig,
        renderer::Renderer,
        world::{Cell, Texture},
    };
    use glam::vec2;

    fn quiet() -> Software {
        Software::new(RenderConfig {
            wall_tint: 0.0,
            fog_height: 0.0,
            ..RenderConfig::default()
        })
    }

    /// 3 wide stripes: texel column 0 red, 1 green, 2 blue.
    fn stripes() -> Texture {
        let row = [0xFF_FF_00_00, 0xFF_00_FF_00, 0xFF_00_00_FF];
        Texture::single("STRIPES", 3, 3, row.repeat(3)).unwrap()
    }

    fn corridor(cell: Cell) -> Level {
        let mut cells = vec![Cell::default(); 8];
        cells[3] = cell.clone();
        cells[7] = cell;
        Level::new("corridor", 4, 2, cells).unwrap()
    }

    #[test]
    fn wall_height_and_depth_follow_distance() {
        let mut bank = TextureBank::default_with_checker();
        let id = bank.insert("S", stripes()).unwrap();
        let level = corridor(Cell::Wall(id));
        let e = Entity::new(vec2(1.0, 1.0), vec2(1.0, 0.0), vec2(0.0, 0.66)).unwrap();

        let mut sw = quiet();
        sw.begin_frame(8, 40);
        sw.draw_walls(&e, &level, &bank, 0);
        // wall 2 units ahead → 20 px tall strip centred on the horizon
        assert!((sw.depth.get(4) - 2.0).abs() < 1e-4);
        let bg = sw.config.background;
        let col = |y: usize| sw.scratch[y * 8 + 4];
        assert_eq!(col(9), bg);
        assert_ne!(col(10), bg);
        assert_ne!(col(29), bg);
        assert_eq!(col(30), bg);
    }

    #[test]
    fn tint_grows_as_walls_shrink() {
        let mut bank = TextureBank::default_with_checker();
        let id = bank
            .insert("W", Texture::single("W", 1, 1, vec![0xFF_FF_FF_FF]).unwrap())
            .unwrap();
        let level = corridor(Cell::Wall(id));
        let mut sw = Software::new(RenderConfig {
            wall_tint: 1.0,
            ..RenderConfig::default()
        });
        let red = |p: u32| (p >> 16) & 0xFF;

        let near = Entity::new(vec2(2.5, 1.0), vec2(1.0, 0.0), vec2(0.0, 0.66)).unwrap();
        sw.begin_frame(8, 40);
        sw.draw_walls(&near, &level, &bank, 0);
        let near_px = sw.scratch[20 * 8 + 4];

        let far = Entity::new(vec2(0.5, 1.0), vec2(1.0, 0.0), vec2(0.0, 0.66)).unwrap();
        sw.begin_frame(8, 40);
        sw.draw_walls(&far, &level, &bank, 0);
        let far_px = sw.scratch[20 * 8 + 4];

        assert!(red(far_px) < red(near_px));
        // a wall filling the whole screen is not tinted at all
        assert_eq!(near_px, 0xFF_FF_FF_FF);
    }

    #[test]
    fn east_face_is_mirrored() {
        let mut bank = TextureBank::default_with_checker();
        let id = bank.insert("S", stripes()).unwrap();
        let mut cells = vec![Cell::default(); 8];
        cells[0] = Cell::Wall(id);
        cells[4] = Cell::Wall(id);
        let level = Level::new("mirror", 4, 2, cells).unwrap();

        // looking west at the east face of x = 0; centre ray at y = 1.2
        // hits wall 0.2 → texel 0, mirrored to texel 2 (blue)
        let e = Entity::new(vec2(3.0, 1.2), vec2(-1.0, 0.0), vec2(0.0, -0.66)).unwrap();
        let mut sw = quiet();
        sw.begin_frame(2, 20);
        sw.draw_walls(&e, &level, &bank, 0);
        assert_eq!(sw.scratch[10 * 2 + 1], 0xFF_00_00_FF);
    }

    #[test]
    fn switch_state_selects_texture_row() {
        // 1×1 texel, 2 states: off red, on green
        let mut bank = TextureBank::default_with_checker();
        let id = bank
            .insert(
                "SW",
                Texture::new("SW", 1, 1, 1, 2, vec![0xFF_FF_00_00, 0xFF_00_FF_00]).unwrap(),
            )
            .unwrap();
        let mut level = corridor(Cell::Switch {
            texture: id,
            state: 0,
            cycle: vec![0, 1],
        });
        let e = Entity::new(vec2(1.0, 1.0), vec2(1.0, 0.0), vec2(0.0, 0.66)).unwrap();
        let mut sw = quiet();

        sw.begin_frame(2, 20);
        sw.draw_walls(&e, &level, &bank, 0);
        assert_eq!(sw.scratch[10 * 2 + 1], 0xFF_FF_00_00);

        level.cell_mut(3, 1).unwrap().toggle();
        sw.begin_frame(2, 20);
        sw.draw_walls(&e, &level, &bank, 0);
        assert_eq!(sw.scratch[10 * 2 + 1], 0xFF_00_FF_00);
    }

    #[test]
    fn animated_wall_follows_frame_index() {
        // 1×1 texel, 2 frames: red then green
        let mut bank = TextureBank::default_with_checker();
        let id = bank
            .insert(
                "ANIM",
                Texture::new("ANIM", 1, 1, 2, 1, vec![0xFF_FF_00_00, 0xFF_00_FF_00]).unwrap(),
            )
            .unwrap();
        let level = corridor(Cell::Wall(id));
        let e = Entity::new(vec2(1.0, 1.0), vec2(1.0, 0.0), vec2(0.0, 0.66)).unwrap();
        let mut sw = quiet();

        sw.begin_frame(2, 20);
        sw.draw_walls(&e, &level, &bank, 0);
        assert_eq!(sw.scratch[10 * 2 + 1], 0xFF_FF_00_00);

        sw.begin_frame(2, 20);
        sw.draw_walls(&e, &level, &bank, 1);
        assert_eq!(sw.scratch[10 * 2 + 1], 0xFF_00_FF_00);

        // frame index wraps around
        sw.begin_frame(2, 20);
        sw.draw_walls(&e, &level, &bank, 2);
        assert_eq!(sw.scratch[10 * 2 + 1], 0xFF_FF_00_00);
    }
}
