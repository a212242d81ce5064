//! Camera and matrix state feeding the render pipelines

pub mod camera;
pub mod matrices;

pub use camera::{Camera, CameraMode};
pub use matrices::{MatrixConsumer, MatrixHandler};
