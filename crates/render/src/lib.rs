//! wgpu render backends for the spindle demos.
//!
//! Two renderers: an instanced, depth-tested field of textured cubes driven
//! by a dolly or fly camera, and a single textured triangle spun by an
//! accumulating per-frame transform.
//!
//! # Invariants
//! - Every GPU resource is created once at startup; the per-frame path only
//!   rewrites uniform and instance data.
//! - Shader and pipeline failures are terminal and carry a capped
//!   diagnostic.

pub mod camera;
pub mod gpu;
pub mod mesh;
pub mod pipeline;
pub mod shaders;
pub mod spin;
pub mod texture;

pub use camera::{DollyCamera, FlyCamera};
pub use gpu::{CubeRenderer, SpinRenderer};
pub use pipeline::{PipelineConfig, ShaderError, ShaderProgram};
pub use spin::SpinTransform;
pub use texture::{CpuImage, GpuTexture, TextureError};
