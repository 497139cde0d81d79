//! Mintrace Core - Scene model, text format and shared scene store.
//!
//! This crate provides:
//!
//! - **Scene types**: `Scene`, `Material`, `Sphere`, `Plane`, `Light`
//! - **Text format**: `write_scene` / `parse_scene` for the `.scene` format
//! - **Scene store**: `SceneStore`, the swap-on-publish owner of the live scene
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use mint_core::SceneStore;
//!
//! let store = Arc::new(SceneStore::default());
//! store.edit(|scene| scene.spheres[0].radius = 1.5);
//! store.save_to("box.scene")?;
//! ```

pub mod scene;
pub mod store;
pub mod text;

// Re-export commonly used types
pub use scene::{Light, LightKind, Material, Plane, Scene, Sphere};
pub use store::{load_scene, SceneStore, StoreError, StoreResult};
pub use text::{parse_scene, write_scene, ParseError, ParseResult};
