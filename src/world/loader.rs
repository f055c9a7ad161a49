// ──────────────────────────────────────────────────────────────────────────
// world/loader.rs
//
//  *   LevelDesc  (RON text)               ──╮
//  *   TextureBank (names → ids)             │   --->  world::level::Level
//                                            ╯          + spawn Entity
// ──────────────────────────────────────────────────────────────────────────

use std::{collections::BTreeMap, fs, io, path::Path};

use glam::Vec2;
use serde::Deserialize;
use thiserror::Error;

use crate::world::{
    camera::{Entity, EntityError},
    cell::{Cell, Faces},
    level::{Align, Level, LevelError, Sprite, SpriteFlags},
    texture::{NO_TEXTURE, TextureBank, TextureId},
};

/*──────────────────────────── Error type ───────────────────────────*/

#[derive(Error, Debug)]
pub enum LoadError {
    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Parse(#[from] ron::error::SpannedError),

    #[error(transparent)]
    Level(#[from] LevelError),

    #[error(transparent)]
    Entity(#[from] EntityError),

    #[error("row {row} column {col}: symbol `{symbol}` is not in the legend")]
    UnknownSymbol { row: usize, col: usize, symbol: char },

    #[error("row {row} is {len} cells wide, expected {width}")]
    RaggedRow { row: usize, len: usize, width: usize },
}

/*──────────────────────────── RON schema ───────────────────────────*/

/// Text description of a level: a legend of symbols and the rows that use them.
///
/// ```ron
/// (
///     name: "yard",
///     floor: Some("FLOOR"),
///     legend: { '#': Wall("BRICK"), '.': Open },
///     rows: ["###", "#.#", "###"],
///     spawn: (position: (1.5, 1.5), angle: 0.0),
/// )
/// ```
#[derive(Debug, Deserialize)]
pub struct LevelDesc {
    pub name: String,
    #[serde(default)]
    pub floor: Option<String>,
    #[serde(default)]
    pub ceiling: Option<String>,
    pub legend: BTreeMap<char, CellDesc>,
    pub rows: Vec<String>,
    #[serde(default)]
    pub sprites: Vec<SpriteDesc>,
    pub spawn: SpawnDesc,
}

#[derive(Debug, Deserialize)]
pub enum CellDesc {
    /// Floor using the level defaults.
    Open,
    /// Floor with its own floor and/or ceiling texture.
    Floor {
        #[serde(default)]
        floor: Option<String>,
        #[serde(default)]
        ceiling: Option<String>,
    },
    Wall(String),
    Textured {
        north: String,
        south: String,
        east: String,
        west: String,
    },
    Thin(String),
    Door {
        texture: String,
        #[serde(default)]
        percent: u8,
        #[serde(default)]
        thin: bool,
    },
    Switch {
        texture: String,
        #[serde(default)]
        state: u16,
        #[serde(default)]
        cycle: Vec<u16>,
    },
}

#[derive(Debug, Deserialize)]
pub struct SpriteDesc {
    pub position: (f32, f32),
    pub texture: String,
    #[serde(default = "one")]
    pub scale: f32,
    #[serde(default)]
    pub align: Align,
    #[serde(default, rename = "static")]
    pub is_static: bool,
    #[serde(default)]
    pub tinted: bool,
    #[serde(default = "yes")]
    pub active: bool,
}

#[derive(Debug, Deserialize)]
pub struct SpawnDesc {
    pub position: (f32, f32),
    /// Degrees, 0 = +X, 90 = +Y.
    pub angle: f32,
    #[serde(default = "default_fov")]
    pub fov: f32,
}

fn one() -> f32 {
    1.0
}

fn yes() -> bool {
    true
}

fn default_fov() -> f32 {
    66.0
}

/// A level ready to render plus the entity it starts from.
#[derive(Debug)]
pub struct LoadedLevel {
    pub level: Level,
    pub spawn: Entity,
}

/*====================================================================*/
/*                       Public API                                   */
/*====================================================================*/

/// Read and resolve a RON level file.
pub fn load_level_file<P: AsRef<Path>>(
    path: P,
    bank: &TextureBank,
) -> Result<LoadedLevel, LoadError> {
    let src = fs::read_to_string(path)?;
    load_level_str(&src, bank)
}

pub fn load_level_str(src: &str, bank: &TextureBank) -> Result<LoadedLevel, LoadError> {
    let desc: LevelDesc = ron::from_str(src)?;
    load_level(desc, bank)
}

/// Resolve a parsed description against `bank`.  Unknown texture names are
/// replaced by the bank’s checkerboard id (0).
pub fn load_level(desc: LevelDesc, bank: &TextureBank) -> Result<LoadedLevel, LoadError> {
    let tex_id = |name: &str| -> TextureId {
        bank.id(name).unwrap_or_else(|| {
            log::warn!("level `{}`: unknown texture `{name}`", desc.name);
            NO_TEXTURE
        })
    };
    let opt_tex = |name: &Option<String>| name.as_deref().map(tex_id);

    /*----- 1. Legend → prototype cells ---------------------------------*/
    let legend: BTreeMap<char, Cell> = desc
        .legend
        .iter()
        .map(|(&symbol, cd)| {
            let cell = match cd {
                CellDesc::Open => Cell::default(),
                CellDesc::Floor { floor, ceiling } => Cell::Open {
                    floor: opt_tex(floor),
                    ceiling: opt_tex(ceiling),
                },
                CellDesc::Wall(t) => Cell::Wall(tex_id(t)),
                CellDesc::Textured {
                    north,
                    south,
                    east,
                    west,
                } => Cell::Textured(Faces {
                    north: Some(tex_id(north)),
                    south: Some(tex_id(south)),
                    east: Some(tex_id(east)),
                    west: Some(tex_id(west)),
                    top: None,
                    bottom: None,
                }),
                CellDesc::Thin(t) => Cell::Thin(tex_id(t)),
                CellDesc::Door {
                    texture,
                    percent,
                    thin,
                } => Cell::Door {
                    texture: tex_id(texture),
                    percent: *percent,
                    thin: *thin,
                },
                CellDesc::Switch {
                    texture,
                    state,
                    cycle,
                } => Cell::Switch {
                    texture: tex_id(texture),
                    state: *state,
                    cycle: cycle.clone(),
                },
            };
            (symbol, cell)
        })
        .collect();

    /*----- 2. Rows → grid ------------------------------------------------*/
    let width = desc.rows.first().map_or(0, |r| r.chars().count());
    let height = desc.rows.len();
    let mut cells = Vec::with_capacity(width * height);
    for (row, line) in desc.rows.iter().enumerate() {
        let len = line.chars().count();
        if len != width {
            return Err(LoadError::RaggedRow { row, len, width });
        }
        for (col, symbol) in line.chars().enumerate() {
            let cell = legend
                .get(&symbol)
                .cloned()
                .ok_or(LoadError::UnknownSymbol { row, col, symbol })?;
            cells.push(cell);
        }
    }

    let mut level = Level::new(desc.name.clone(), width, height, cells)?;
    level.floor = opt_tex(&desc.floor);
    level.ceiling = opt_tex(&desc.ceiling);

    /*----- 3. Sprites ----------------------------------------------------*/
    level.sprites = desc
        .sprites
        .iter()
        .map(|sd| {
            let mut flags = SpriteFlags::empty();
            flags.set(SpriteFlags::STATIC, sd.is_static);
            flags.set(SpriteFlags::TINTED, sd.tinted);
            flags.set(SpriteFlags::ACTIVE, sd.active);
            Sprite {
                position: Vec2::new(sd.position.0, sd.position.1),
                texture: tex_id(&sd.texture),
                scale: sd.scale,
                align: sd.align,
                flags,
            }
        })
        .collect();

    /*----- 4. Spawn ------------------------------------------------------*/
    let spawn = Entity::from_angle(
        Vec2::new(desc.spawn.position.0, desc.spawn.position.1),
        desc.spawn.angle.to_radians(),
        desc.spawn.fov.to_radians(),
    )?;

    log::info!(
        "level `{}` loaded: {}x{} cells, {} sprites",
        level.name,
        level.width,
        level.height,
        level.sprites.len()
    );

    Ok(LoadedLevel { level, spawn })
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
