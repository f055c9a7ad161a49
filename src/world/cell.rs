use crate::world::texture::TextureId;

/// Side of a cell a ray (or a floor/ceiling sample) touches.
///
/// Vertical faces are named after the compass side of the *cell* that was
/// crossed: a ray travelling towards +X enters through the `West` face.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Face {
    North,
    South,
    East,
    West,
    Top,
    Bottom,
}

/// Per-face texture table of a [`Cell::Textured`] wall.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Faces {
    pub north: Option<TextureId>,
    pub south: Option<TextureId>,
    pub east: Option<TextureId>,
    pub west: Option<TextureId>,
    pub top: Option<TextureId>,
    pub bottom: Option<TextureId>,
}

impl Faces {
    /// Same texture on every vertical face, nothing above or below.
    pub fn sides(tex: TextureId) -> Self {
        Self {
            north: Some(tex),
            south: Some(tex),
            east: Some(tex),
            west: Some(tex),
            top: None,
            bottom: None,
        }
    }

    #[inline]
    pub fn get(&self, face: Face) -> Option<TextureId> {
        match face {
            Face::North => self.north,
            Face::South => self.south,
            Face::East => self.east,
            Face::West => self.west,
            Face::Top => self.top,
            Face::Bottom => self.bottom,
        }
    }
}

/// One square of the level grid.
#[derive(Clone, Debug, PartialEq)]
pub enum Cell {
    /// Walkable floor. `floor`/`ceiling` override the level defaults.
    Open {
        floor: Option<TextureId>,
        ceiling: Option<TextureId>,
    },
    /// Solid block with one texture on every side.
    Wall(TextureId),
    /// Solid block with per-face textures.
    Textured(Faces),
    /// Wall occupying only the centre plane of the cell (fences, grates).
    Thin(TextureId),
    /// Sliding door. `percent` is how far the leaf is open, 0 = closed.
    Door {
        texture: TextureId,
        percent: u8,
        thin: bool,
    },
    /// Wall cycling through texture states. `state` is the texture state
    /// currently shown; `cycle` lists the states `toggle` walks through.
    Switch {
        texture: TextureId,
        state: u16,
        cycle: Vec<u16>,
    },
}

impl Default for Cell {
    fn default() -> Self {
        Cell::Open {
            floor: None,
            ceiling: None,
        }
    }
}

impl Cell {
    /// True for every cell that can stop a ray.
    #[inline]
    pub fn is_solid(&self) -> bool {
        !matches!(self, Cell::Open { .. })
    }

    #[inline]
    pub fn is_thin(&self) -> bool {
        matches!(self, Cell::Thin(_) | Cell::Door { thin: true, .. })
    }

    #[inline]
    pub fn is_door(&self) -> bool {
        matches!(self, Cell::Door { .. })
    }

    /// Opening of a door as a fraction in `0.0..=1.0`.
    #[inline]
    pub fn door_open(&self) -> Option<f32> {
        match self {
            Cell::Door { percent, .. } => Some(f32::from((*percent).min(100)) / 100.0),
            _ => None,
        }
    }

    /// Texture state index; wrapped against the texture's state count by the sampler.
    #[inline]
    pub fn state(&self) -> u16 {
        match self {
            Cell::Switch { state, .. } => *state,
            _ => 0,
        }
    }

    /// Texture to use when the given face of this cell is drawn.
    pub fn texture(&self, face: Face) -> Option<TextureId> {
        match self {
            Cell::Open { floor, ceiling } => match face {
                Face::Bottom => *floor,
                Face::Top => *ceiling,
                _ => None,
            },
            Cell::Wall(tex) | Cell::Thin(tex) => match face {
                Face::Top | Face::Bottom => None,
                _ => Some(*tex),
            },
            Cell::Textured(faces) => faces.get(face),
            Cell::Door { texture, .. } | Cell::Switch { texture, .. } => match face {
                Face::Top | Face::Bottom => None,
                _ => Some(*texture),
            },
        }
    }

    /// Advance a switch to the next entry of its cycle table.
    ///
    /// Returns the new state, or `None` for cells that are not switches.
    pub fn toggle(&mut self) -> Option<u16> {
        match self {
            Cell::Switch { state, cycle, .. } => {
                if cycle.is_empty() {
                    return Some(*state);
                }
                let next = cycle
                    .iter()
                    .position(|s| s == state)
                    .map_or(0, |i| (i + 1) % cycle.len());
                *state = cycle[next];
                Some(*state)
            }
            _ => None,
        }
    }

    /// Set the door opening, clamped to `0..=100`. No-op for other cells.
    pub fn set_door_percent(&mut self, value: u8) {
        if let Cell::Door { percent, .. } = self {
            *percent = value.min(100);
        }
    }
}
