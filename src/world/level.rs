use bitflags::bitflags;
use glam::Vec2;

use crate::world::{cell::Cell, texture::TextureId};

/// Runtime snapshot of one map.
///
/// The grid shape is fixed after load. Door and switch cells may be mutated
/// by game logic *between* frames; the renderer only reads.
#[derive(Clone, Debug)]
pub struct Level {
    pub name: String,
    pub width: usize,
    pub height: usize,
    /// Row-major, `width * height` entries.
    pub cells: Vec<Cell>,
    /// Fallback floor texture for samples outside the grid or on cells
    /// without their own.
    pub floor: Option<TextureId>,
    pub ceiling: Option<TextureId>,
    pub sprites: Vec<Sprite>,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LevelError {
    #[error("grid is {width}x{height} but {cells} cells were supplied")]
    GridSize {
        width: usize,
        height: usize,
        cells: usize,
    },

    #[error("door at ({x}, {y}) is {percent}% open, expected 0..=100")]
    DoorPercent { x: usize, y: usize, percent: u8 },
}

/*------------------------- game objects -----------------------------*/

/// Vertical anchoring of a sprite that is smaller than a full cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub enum Align {
    /// Centred on the horizon.
    #[default]
    None,
    /// Hangs from the ceiling.
    Top,
    /// Stands on the floor.
    Bottom,
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct SpriteFlags: u8 {
        /// Frame is picked from the viewing angle instead of the clock.
        const STATIC = 0x01;
        /// Darkened with distance like walls.
        const TINTED = 0x02;
        /// Drawn at all.
        const ACTIVE = 0x04;
    }
}

impl Default for SpriteFlags {
    fn default() -> Self {
        SpriteFlags::ACTIVE
    }
}

/// World-space billboard.
#[derive(Clone, Debug, PartialEq)]
pub struct Sprite {
    pub position: Vec2,
    pub texture: TextureId,
    /// Fraction of a full wall height.
    pub scale: f32,
    pub align: Align,
    pub flags: SpriteFlags,
}

impl Sprite {
    pub fn new(position: Vec2, texture: TextureId) -> Self {
        Self {
            position,
            texture,
            scale: 1.0,
            align: Align::None,
            flags: SpriteFlags::default(),
        }
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.flags.contains(SpriteFlags::ACTIVE)
    }
}

/*------------------------- grid access ------------------------------*/

impl Level {
    /// Build a level, checking grid shape and door values.
    pub fn new<S: Into<String>>(
        name: S,
        width: usize,
        height: usize,
        cells: Vec<Cell>,
    ) -> Result<Self, LevelError> {
        if cells.len() != width * height {
            return Err(LevelError::GridSize {
                width,
                height,
                cells: cells.len(),
            });
        }
        for (i, cell) in cells.iter().enumerate() {
            if let Cell::Door { percent, .. } = cell {
                if *percent > 100 {
                    return Err(LevelError::DoorPercent {
                        x: i % width,
                        y: i / width,
                        percent: *percent,
                    });
                }
            }
        }
        Ok(Self {
            name: name.into(),
            width,
            height,
            cells,
            floor: None,
            ceiling: None,
            sprites: Vec::new(),
        })
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        Some(y as usize * self.width + x as usize)
    }

    /// Bounds-checked lookup; anything outside the grid is `None`.
    #[inline]
    pub fn get_cell(&self, x: i32, y: i32) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    #[inline]
    pub fn cell_mut(&mut self, x: i32, y: i32) -> Option<&mut Cell> {
        self.index(x, y).map(|i| &mut self.cells[i])
    }
}
