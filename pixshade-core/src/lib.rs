//! pixshade Core Library - per-pixel scenes and the transform pipeline
//!
//! This library provides the stateless core: matrix builders, the
//! world-to-screen pipeline, point rasterization, 2D lighting, the built-in
//! scenes and a frame evaluator that runs a scene once per pixel.

pub mod error;
pub mod frame;
pub mod geometry;
pub mod lighting;
pub mod projection;
pub mod raster;
pub mod scene;
pub mod transform;

// Re-export commonly used types
pub use error::{Error, Result};
pub use frame::Frame;
pub use projection::{Camera, HomogeneousDivide, Pipeline};
pub use scene::{Color, GlowScene, ProjectionScene, SceneKind, Shader, ShadowScene};
pub use transform::{AxisAngle, Transform};
