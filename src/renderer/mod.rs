//! WebGPU rendering module
//!
//! Sprites are drawn as flat-colored shapes; texts live in the DOM.

pub mod frame;
pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use frame::build_frame;
pub use pipeline::RenderState;
pub use vertex::Vertex;
