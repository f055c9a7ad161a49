mod camera;
mod cell;
mod clock;
mod level;
pub mod loader;
mod texture;

pub use camera::{Entity, EntityError};

pub use cell::{Cell, Face, Faces};

pub use clock::{ANIM_FPS, AnimationClock};

pub use level::{Align, Level, LevelError, Sprite, SpriteFlags};

pub use loader::{LoadError, LoadedLevel, load_level_file, load_level_str};

pub use texture::{NO_TEXTURE, Texture, TextureBank, TextureError, TextureId};
