//! Pixel generators and static tables for Phosphor
//!
//! Everything here is per-pixel math over intensity layers:
//! - Layer: the 8-bit intensity grids the generators mutate
//! - Palette: write-once intensity-to-color ramps
//! - Geometry: write-once wireframe vertex sets
//! - Font: 3x5 bitmap glyphs for titles and credits
//! - Fire/Fractal/Plasma/Chess/Wireframe: the effect generators

pub mod chess;
pub mod fire;
pub mod font;
pub mod fractal;
pub mod geometry;
pub mod layer;
pub mod palette;
pub mod plasma;
pub mod wireframe;

/// Frame width in pixels.
pub const VIDEO_W: usize = 160;
/// Frame height in pixels.
pub const VIDEO_H: usize = 120;

pub use fire::{energy_transfer, Fluid};
pub use geometry::{GeometryBank, Shape, Triangle};
pub use layer::Layer;
pub use palette::{pack_rgb, PaletteBank, PALETTE_COUNT};
pub use wireframe::Spin;
