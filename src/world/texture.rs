// Format-agnostic repository of textures produced by the asset side.
// The renderer and world logic interact through `TextureId` only.

use std::collections::HashMap;

use crate::renderer::{Rgba, shade};

/// Runtime handle for a texture in this bank.
///
/// *Guaranteed* to remain stable for the lifetime of the bank.
pub type TextureId = u16;

/// `TextureId` whose pixels are the checkerboard fallback.
/// Always = 0 because `TextureBank::new()` inserts it first.
pub const NO_TEXTURE: TextureId = 0;

/// CPU-side storage: 32-bit **ARGB** (0xAARRGGBB) in row-major order.
///
/// One image may pack several animation *frames* side by side and several
/// discrete *states* (door positions, switch lights) stacked vertically:
///
/// ```text
///  image_width = width * frames
///  +---------+---------+---------+
///  | f0 s0   | f1 s0   | f2 s0   |  height
///  +---------+---------+---------+
///  | f0 s1   | f1 s1   | f2 s1   |  height
///  +---------+---------+---------+
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Texture {
    pub name: String,
    /// Size of one frame/state cell.
    pub width: usize,
    pub height: usize,
    /// Row stride of `pixels`.
    pub image_width: usize,
    pub frames: usize,
    pub states: usize,
    pub pixels: Vec<Rgba>,
}

/// Convenience checkerboard 8×8 (dark/light grey).
impl Default for Texture {
    fn default() -> Self {
        const LIGHT: Rgba = 0xFF_90_90_90;
        const DARK: Rgba = 0xFF_40_40_40;
        let mut pix = vec![0; 8 * 8];
        for y in 0..8 {
            for x in 0..8 {
                pix[y * 8 + x] = if (x ^ y) & 1 == 0 { LIGHT } else { DARK };
            }
        }
        Texture {
            name: "CHECKER".to_string(),
            width: 8,
            height: 8,
            image_width: 8,
            frames: 1,
            states: 1,
            pixels: pix,
        }
    }
}

/// Things that can go wrong when using the bank.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextureError {
    /// Attempted to insert a second texture with an existing name.
    #[error("texture name `{0}` already present in bank")]
    Duplicate(String),

    /// Requested ID is outside `0 .. bank.len()`.
    #[error("texture id {0} out of range")]
    BadId(TextureId),

    /// Width, height, frame or state count of zero.
    #[error("texture `{0}` has a zero dimension")]
    Empty(String),

    /// Pixel buffer does not match `width*frames × height*states`.
    #[error("texture `{name}` expects {expected} pixels, got {actual}")]
    BadSize {
        name: String,
        expected: usize,
        actual: usize,
    },
}

impl Texture {
    /// Build a texture from a packed pixel buffer, validating its size.
    pub fn new<S: Into<String>>(
        name: S,
        width: usize,
        height: usize,
        frames: usize,
        states: usize,
        pixels: Vec<Rgba>,
    ) -> Result<Self, TextureError> {
        let name = name.into();
        if width == 0 || height == 0 || frames == 0 || states == 0 {
            return Err(TextureError::Empty(name));
        }
        let expected = width * frames * height * states;
        if pixels.len() != expected {
            return Err(TextureError::BadSize {
                name,
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            name,
            width,
            height,
            image_width: width * frames,
            frames,
            states,
            pixels,
        })
    }

    /// Single-frame, single-state texture.
    pub fn single<S: Into<String>>(
        name: S,
        width: usize,
        height: usize,
        pixels: Vec<Rgba>,
    ) -> Result<Self, TextureError> {
        Self::new(name, width, height, 1, 1, pixels)
    }

    #[inline]
    pub fn is_animated(&self) -> bool {
        self.frames > 1
    }

    #[inline]
    pub fn is_stateful(&self) -> bool {
        self.states > 1
    }

    /// Top-left texel of the given frame/state cell (both wrap).
    #[inline]
    pub fn frame_origin(&self, frame: usize, state: usize) -> (usize, usize) {
        (
            (frame % self.frames) * self.width,
            (state % self.states) * self.height,
        )
    }

    /// Texel `(u, v)` of one frame/state cell. `u`/`v` wrap inside the cell.
    #[inline]
    pub fn sample(&self, u: usize, v: usize, frame: usize, state: usize) -> Rgba {
        let (ox, oy) = self.frame_origin(frame, state);
        self.texel(ox + u % self.width, oy + v % self.height)
    }

    /// Raw access into the packed image.
    #[inline(always)]
    pub fn texel(&self, x: usize, y: usize) -> Rgba {
        self.pixels[y * self.image_width + x]
    }

    /// Frame an animated texture shows at animation tick `clock`.
    #[inline]
    pub fn frame_at(&self, clock: u32) -> usize {
        if self.is_animated() {
            clock as usize % self.frames
        } else {
            0
        }
    }

    /// Copy of this texture darkened by `intensity` (0 = unchanged, 1 = black).
    pub fn tinted(&self, intensity: f32) -> Texture {
        Texture {
            name: format!("{}@tint", self.name),
            pixels: self.pixels.iter().map(|&p| shade(p, intensity)).collect(),
            ..self.clone()
        }
    }
}

/// A format-agnostic cache of textures.
///
/// * Does **not** know about files or image formats; that is the loader’s job.
/// * Stores exactly one copy of every name.
/// * ID **0** is always the “missing” checkerboard.
///
/// **Thread-safety:** access `TextureBank` from a single thread or wrap it
/// in `RwLock`; it is never mutated while a frame is rendered.
pub struct TextureBank {
    by_name: HashMap<String, TextureId>,
    data: Vec<Texture>,
}

impl TextureBank {
    // ---------------------------------------------------------------------
    // Constructors
    // ---------------------------------------------------------------------

    /// Create an empty bank with a mandatory *missing* texture used as
    /// fallback.  The texture is inserted under the fixed name `"MISSING"`
    /// and obtains the handle **0**.
    pub fn new(missing_tex: Texture) -> Self {
        let mut by_name = HashMap::new();
        by_name.insert("MISSING".into(), NO_TEXTURE);
        Self {
            by_name,
            data: vec![missing_tex],
        }
    }

    pub fn default_with_checker() -> Self {
        Self::new(Texture::default())
    }

    // ---------------------------------------------------------------------
    // Query helpers
    // ---------------------------------------------------------------------

    /// Number of textures stored (including the “missing” one).
    pub fn len(&self) -> usize {
        self.data.len()
    }
    pub fn is_empty(&self) -> bool {
        self.data.len() == 1
    } // only checker

    /// Obtain the id for a *loaded* texture by name.
    /// Returns `None` if the name is unknown.
    pub fn id(&self, name: &str) -> Option<TextureId> {
        self.by_name.get(name).copied()
    }

    /// Borrow a texture by id, with bounds-checking.
    pub fn texture(&self, id: TextureId) -> Result<&Texture, TextureError> {
        self.data.get(id as usize).ok_or(TextureError::BadId(id))
    }

    /// Fallback-safe lookup: unknown ids resolve to the checkerboard.
    #[inline]
    pub fn texture_or_missing(&self, id: TextureId) -> &Texture {
        self.data
            .get(id as usize)
            .unwrap_or(&self.data[NO_TEXTURE as usize])
    }

    // ---------------------------------------------------------------------
    // Mutations
    // ---------------------------------------------------------------------

    /// Insert a texture under `name`.
    ///
    /// * Returns the newly assigned `TextureId`.
    /// * Fails if the name already exists (`Duplicate`).
    pub fn insert<S: Into<String>>(
        &mut self,
        name: S,
        tex: Texture,
    ) -> Result<TextureId, TextureError> {
        let name = name.into();
        if self.by_name.contains_key(&name) {
            return Err(TextureError::Duplicate(name));
        }
        let id = self.data.len() as TextureId;
        log::debug!(
            "texture `{name}` -> id {id} ({}x{}, {} frames, {} states)",
            tex.width,
            tex.height,
            tex.frames,
            tex.states
        );
        self.data.push(tex);
        self.by_name.insert(name, id);
        Ok(id)
    }
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
