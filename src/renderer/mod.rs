//! Rendering
//!
//! Scene code draws into a [`Surface`]. The WebGPU backend records a
//! [`DrawList`], tessellates it and uploads the triangles each frame.

pub mod draw;
pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use draw::{DrawCommand, DrawList, Surface, TextAnchor};
pub use pipeline::{RenderInitError, RenderState};
pub use shapes::tessellate;
pub use vertex::Vertex;
