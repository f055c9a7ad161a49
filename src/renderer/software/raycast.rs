//! Grid ray casting (DDA).
//!
//! One ray per screen column walks the level cell by cell, always crossing
//! the nearer of the next vertical or horizontal grid line, until it stops
//! on a solid cell, leaves the grid, or runs out of steps.

use glam::{IVec2, Vec2};

use crate::world::{Cell, Entity, Face, Level};

/// Default step budget of a ray.
pub const MAX_DEPTH: u32 = 50;

/// Step length used for an axis the ray never advances along.
/// Finite so `0 × step` stays 0 instead of NaN.
const NO_STEP: f32 = 1e30;

/// First solid surface met by a ray.
#[derive(Clone, Copy, Debug)]
pub struct CastResult<'a> {
    pub cell: &'a Cell,
    /// Grid coordinates of `cell`.
    pub map: IVec2,
    pub face: Face,
    /// Position across the face in `0.0..1.0` (texture U).
    pub wall: f32,
    /// Perpendicular distance along the view direction.
    pub distance: f32,
}

/// Which grid line family was crossed last.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Axis {
    X,
    Y,
}

/// Cast the ray for screen `column` of a `screen_width` wide view.
///
/// Returns `None` when the ray leaves the grid or takes `max_depth` steps
/// without meeting anything solid.
pub fn cast_ray<'a>(
    screen_width: usize,
    column: usize,
    entity: &Entity,
    level: &'a Level,
    max_depth: u32,
) -> Option<CastResult<'a>> {
    // camera-plane offset in -1..1
    let camera = 2.0 * column as f32 / screen_width as f32 - 1.0;
    let dir = entity.direction + entity.camera * camera;
    let pos = entity.position;

    let delta = Vec2::new(step_len(dir.x), step_len(dir.y));

    let mut map = pos.floor().as_ivec2();
    let step = IVec2::new(sign(dir.x), sign(dir.y));

    // distance along the ray to the first x / y grid line
    let mut side = Vec2::new(
        if step.x < 0 {
            pos.x - map.x as f32
        } else {
            map.x as f32 + 1.0 - pos.x
        } * delta.x,
        if step.y < 0 {
            pos.y - map.y as f32
        } else {
            map.y as f32 + 1.0 - pos.y
        } * delta.y,
    );

    for _ in 0..max_depth {
        let (axis, face) = if side.x < side.y {
            side.x += delta.x;
            map.x += step.x;
            (Axis::X, if step.x > 0 { Face::West } else { Face::East })
        } else {
            side.y += delta.y;
            map.y += step.y;
            (Axis::Y, if step.y > 0 { Face::North } else { Face::South })
        };

        let cell = level.get_cell(map.x, map.y)?;
        if !cell.is_solid() {
            continue;
        }

        // `side` already points at the far line of this cell; back up one step
        let (along, other, stride) = match axis {
            Axis::X => (side.x, side.y, delta.x),
            Axis::Y => (side.y, side.x, delta.y),
        };
        let mut distance = along - stride;

        if cell.is_thin() {
            // the centre line lies half a step further in; if the ray leaves
            // through a perpendicular side first it passes beside the wall
            let centre = along - stride * 0.5;
            if other < centre {
                continue;
            }
            distance = centre;
        }

        let hit = match axis {
            Axis::X => pos.y + distance * dir.y,
            Axis::Y => pos.x + distance * dir.x,
        };
        let mut wall = hit - hit.floor();

        if let Some(open) = cell.door_open() {
            // the leaf has slid `open` of the way along the face
            if wall < open {
                continue;
            }
            wall -= open;
        }

        return Some(CastResult {
            cell,
            map,
            face,
            wall,
            distance,
        });
    }
    None
}

#[inline(always)]
fn step_len(d: f32) -> f32 {
    if d == 0.0 { NO_STEP } else { (1.0 / d).abs() }
}

#[inline(always)]
fn sign(d: f32) -> i32 {
    if d < 0.0 { -1 } else { 1 }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
#[cfg(test)]
mod tests {
    use super::*;
    use glam::vec2;

    const EPS: f32 = 1e-4;

    /// Build a level from text rows: `#` wall, `|` thin wall, `D` door,
    /// `T` thin door (both `door_percent` open), anything else open.
    fn grid(rows: &[&str], door_percent: u8) -> Level {
        let cells = rows
            .iter()
            .flat_map(|r| r.chars())
            .map(|c| match c {
                '#' => Cell::Wall(1),
                '|' => Cell::Thin(2),
                'D' => Cell::Door {
                    texture: 3,
                    percent: door_percent,
                    thin: false,
                },
                'T' => Cell::Door {
                    texture: 3,
                    percent: door_percent,
                    thin: true,
                },
                _ => Cell::default(),
            })
            .collect();
        Level::new("test", rows[0].len(), rows.len(), cells).unwrap()
    }

    fn looking_east(pos: Vec2) -> Entity {
        Entity::new(pos, vec2(1.0, 0.0), vec2(0.0, 0.66)).unwrap()
    }

    #[test]
    fn perpendicular_distance_for_every_column() {
        // wall face at x = 3, entity at x = 1.5 → 1.5 units straight ahead
        let level = grid(&["...#", "...#", "...#", "...#", "...#"], 0);
        let e = looking_east(vec2(1.5, 2.5));
        for col in 0..32 {
            let hit = cast_ray(32, col, &e, &level, MAX_DEPTH).expect("wall ahead");
            assert!((hit.distance - 1.5).abs() < EPS, "column {col}: {}", hit.distance);
            assert_eq!(hit.face, Face::West);
            assert_eq!(hit.map.x, 3);
        }
    }

    #[test]
    fn faces_follow_step_direction() {
        let level = grid(&["###", "#.#", "###"], 0);
        let centre = vec2(1.5, 1.5);
        let cases = [
            (vec2(1.0, 0.0), Face::West),
            (vec2(-1.0, 0.0), Face::East),
            (vec2(0.0, 1.0), Face::North),
            (vec2(0.0, -1.0), Face::South),
        ];
        for (dir, face) in cases {
            let e = Entity::new(centre, dir, dir.perp() * 0.66).unwrap();
            let hit = cast_ray(2, 1, &e, &level, MAX_DEPTH).unwrap();
            assert_eq!(hit.face, face);
            assert!((hit.distance - 0.5).abs() < EPS);
        }
    }

    #[test]
    fn one_cell_room_every_column_agrees() {
        let level = grid(&["###", "#.#", "###"], 0);
        let e = looking_east(vec2(1.5, 1.5));
        let first = cast_ray(4, 0, &e, &level, MAX_DEPTH).unwrap();
        for col in 1..4 {
            let hit = cast_ray(4, col, &e, &level, MAX_DEPTH).unwrap();
            assert!((hit.distance - first.distance).abs() < EPS);
            assert_eq!(hit.face, first.face);
        }
        assert!((first.distance - 0.5).abs() < EPS);
    }

    #[test]
    fn wall_fraction_tracks_hit_point() {
        let level = grid(&["....#", "....#", "....#"], 0);
        // looking east from y = 1.25: centre column hits y = 1.25 → 0.25
        let e = looking_east(vec2(0.5, 1.25));
        let hit = cast_ray(2, 1, &e, &level, MAX_DEPTH).unwrap();
        assert!((hit.wall - 0.25).abs() < EPS);
        assert!((hit.distance - 3.5).abs() < EPS);
    }

    #[test]
    fn axis_aligned_ray_on_grid_line_is_finite() {
        // direction has a zero component and the entity sits on a grid line
        let level = grid(&["....#"], 0);
        let e = looking_east(vec2(1.0, 0.0));
        let hit = cast_ray(2, 1, &e, &level, MAX_DEPTH).unwrap();
        assert!(hit.distance.is_finite());
        assert!((hit.distance - 3.0).abs() < EPS);
    }

    #[test]
    fn leaving_grid_or_exhausting_depth_misses() {
        let open = grid(&["....", "....", "...."], 0);
        let e = looking_east(vec2(0.5, 1.5));
        for col in 0..8 {
            assert!(cast_ray(8, col, &e, &open, MAX_DEPTH).is_none());
        }
        let far = grid(&["......#"], 0);
        let e = looking_east(vec2(0.5, 0.5));
        assert!(cast_ray(2, 1, &e, &far, 3).is_none());
        assert!(cast_ray(2, 1, &e, &far, 6).is_some());
    }

    #[test]
    fn thin_wall_hit_on_centre_line() {
        let level = grid(&["...", ".|.", "..."], 0);
        // straight through the middle of the thin cell
        let e = looking_east(vec2(0.5, 1.5));
        let hit = cast_ray(2, 1, &e, &level, MAX_DEPTH).unwrap();
        assert!(hit.cell.is_thin());
        // cell starts at x = 1, centre plane at x = 1.5
        assert!((hit.distance - 1.0).abs() < EPS);
        assert!((hit.wall - 0.5).abs() < EPS);
        assert_eq!(hit.face, Face::West);
    }

    #[test]
    fn thin_wall_passed_beside() {
        let level = grid(&["...", ".|.", "..."], 0);
        // enters the thin cell near its top edge going steeply up-right,
        // leaves through the top before reaching the centre line
        let e = Entity::new(vec2(0.9, 1.1), vec2(1.0, -1.0), vec2(0.5, 0.5)).unwrap();
        let hit = cast_ray(2, 1, &e, &level, MAX_DEPTH);
        assert!(hit.is_none_or(|h| !h.cell.is_thin()));
    }

    #[test]
    fn closed_door_behaves_like_wall() {
        let level = grid(&["..D.", "..D.", "..D."], 0);
        let e = looking_east(vec2(0.5, 1.5));
        for col in 0..16 {
            let hit = cast_ray(16, col, &e, &level, MAX_DEPTH).expect("closed door");
            assert!(hit.cell.is_door());
            assert!((hit.distance - 1.5).abs() < EPS);
            assert!((0.0..1.0).contains(&hit.wall));
        }
    }

    #[test]
    fn open_door_lets_rays_through() {
        let level = grid(&["..D.#", "..D.#", "..D.#", "..D.#", "..D.#"], 100);
        let e = looking_east(vec2(1.5, 2.5));
        for col in 0..16 {
            let hit = cast_ray(16, col, &e, &level, MAX_DEPTH).expect("wall behind door");
            assert!(!hit.cell.is_door());
            assert!((hit.distance - 2.5).abs() < EPS);
        }
    }

    #[test]
    fn half_open_door_slides_texture() {
        let level = grid(&["..D.#", "..D.#", "..D.#"], 50);
        // centre ray meets the face at y = 1.75 → wall 0.75, leaf offset 0.25
        let e = looking_east(vec2(0.5, 1.75));
        let hit = cast_ray(2, 1, &e, &level, MAX_DEPTH).unwrap();
        assert!(hit.cell.is_door());
        assert!((hit.wall - 0.25).abs() < EPS);
        // y = 1.25 → inside the gap, falls through to the far wall
        let e = looking_east(vec2(0.5, 1.25));
        let hit = cast_ray(2, 1, &e, &level, MAX_DEPTH).unwrap();
        assert!(!hit.cell.is_door());
    }

    #[test]
    fn thin_door_gap_reverts_to_traversal() {
        let level = grid(&["..T.#"], 100);
        let e = looking_east(vec2(0.5, 0.5));
        let hit = cast_ray(2, 1, &e, &level, MAX_DEPTH).unwrap();
        assert_eq!(hit.map.x, 4);
        assert!((hit.distance - 3.5).abs() < EPS);

        let closed = grid(&["..T.#"], 0);
        let hit = cast_ray(2, 1, &e, &closed, MAX_DEPTH).unwrap();
        assert_eq!(hit.map.x, 2);
        assert!((hit.distance - 2.0).abs() < EPS);
    }
}
