//! mintrace renderer: a Whitted-style CPU ray tracer.
//!
//! Primary rays from a pinhole camera get Phong shading with hard shadows
//! plus bounded reflection and refraction chains. Rows are traced in
//! parallel and the result can be resampled and written as a bitmap.

mod bitmap;
mod buffer;
mod camera;
mod hit;
mod intersect;
mod render;
mod session;
mod shading;
mod trace;

pub use bitmap::{bitmap_file_size, encode_bitmap, write_bitmap, BITMAP_HEADER_SIZE};
pub use buffer::{round_scale_factor, ImageBuffer};
pub use camera::PinholeCamera;
pub use hit::{HitInfo, T_MISS};
pub use intersect::{intersect_plane, intersect_scene, intersect_sphere};
pub use render::{partition_rows, render, RenderConfig, RenderError, RenderStatus, RowBand};
pub use session::{DisplaySurface, FrameStatus, NullSurface, RenderSession, SessionConfig, SessionError};
pub use shading::{shade, trace_for_each_light};
pub use trace::{fresnel_reflectance, reflection_chain, refraction_chain, trace, BounceBasis};

/// Re-export the math types used in the public API
pub use mint_math::{Color, Ray, Vec3};
