/// Tilescape Core Library - image tiles as 3D geometry
///
/// This library provides the renderer-independent parts of the tile scene:
/// pixel buffers, the pixel-to-mesh conversion, placements, shading config,
/// image loading, the tile table, scene assembly, camera and orbit controls.

pub mod controls;
pub mod geometry;
#[cfg(not(target_arch = "wasm32"))]
pub mod loader;
pub mod pixels;
pub mod projection;
pub mod scene;
pub mod shading;
pub mod table;
pub mod tile;
pub mod transform;

// Re-export commonly used types
pub use controls::OrbitControls;
pub use geometry::{LineSegments, TileMesh, Triangle};
#[cfg(not(target_arch = "wasm32"))]
pub use loader::{ImageLoadFailure, LoadOutcome};
pub use pixels::{PixelBuffer, PixelBufferError};
pub use projection::{Camera, ScreenPoint};
#[cfg(not(target_arch = "wasm32"))]
pub use scene::SceneAssembler;
pub use scene::{RedrawRequest, Scene, SceneObject};
pub use shading::{Material, Shading};
pub use table::{default_table, TileEntry};
pub use tile::build;
pub use transform::{EulerXyz, Placement, Transform};
