//! CPU back-end.
//!
//! A frame is built in a fixed order:
//!
//! 1. clear to the background colour, reset the depth buffer
//! 2. floor / ceiling (`planes`)
//! 3. one wall strip per column (`walls`, via [`cast_ray`])
//! 4. sprites, far to near, clipped against the depth buffer (`sprites`)

mod blit;
mod planes;
mod raycast;
mod renderer;
mod sprites;
mod walls;

pub use blit::{Target, draw_border_rectangle, draw_gradient, draw_texture, draw_tint};
pub use raycast::{CastResult, MAX_DEPTH, cast_ray};
pub use renderer::{DepthBuffer, Software};
pub use sprites::{SpriteProjection, TINT_BUCKETS, TintCache, VisSprite};
