//! Umbra Core - textures and scene descriptions.
//!
//! This crate provides:
//!
//! - **Textures**: `Texture` trait with solid, checker and image textures
//! - **Scene description**: serializable cameras, materials and spheres
//! - **Built-in scenes**: ready-made descriptions for demos and tests
//!
//! # Example
//!
//! ```ignore
//! use umbra_core::SceneDescription;
//!
//! let scene = SceneDescription::load("scene.json")?;
//! println!("Loaded {} spheres", scene.spheres.len());
//! ```

pub mod builtin;
pub mod scene;
pub mod texture;

// Re-export commonly used types
pub use scene::{
    BackgroundDescription, CameraDescription, MaterialDescription, SceneDescription, SceneError,
    SceneResult, SphereDescription, TextureDescription,
};
pub use texture::{CheckerTexture, ImageTexture, SolidColor, Texture, TextureError, TextureResult};
