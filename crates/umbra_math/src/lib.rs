// Re-export glam for convenience
pub use glam::*;

// Umbra math types
mod aabb;
mod interval;
mod ray;

pub use aabb::Aabb;
pub use interval::Interval;
pub use ray::Ray;

/// Linear RGB color, one channel per component.
pub type Color = Vec3;
