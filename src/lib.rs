//! Grid raycasting renderer.
//!
//! * [`world`]    – level grid, cells, sprites, viewer and textures
//! * [`renderer`] – the [`renderer::Renderer`] contract and its CPU back-end
//! * [`config`]   – tunables loaded from RON

pub mod config;
pub mod renderer;
pub mod world;
