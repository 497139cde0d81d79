//! Render session: the entry points a front end drives.
//!
//! A session owns the shared [`SceneStore`], a display surface and the
//! session settings. Each render takes one snapshot of the scene, so
//! concurrent edits or loads never tear a frame.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::thread::JoinHandle;

use mint_core::{SceneStore, StoreResult};
use thiserror::Error;

use crate::bitmap::write_bitmap;
use crate::buffer::ImageBuffer;
use crate::render::{render, RenderConfig, RenderError, RenderStatus};

/// Somewhere finished frames are shown.
pub trait DisplaySurface {
    fn present(&mut self, image: &ImageBuffer);
}

/// Surface that discards every frame.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSurface;

impl DisplaySurface for NullSurface {
    fn present(&mut self, _image: &ImageBuffer) {}
}

/// Session settings.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub render: RenderConfig,
    /// Internal render resolution relative to the target. Values below 1
    /// render a coarse preview that is enlarged; values above 1 supersample.
    pub resolution_scale: f32,
    /// Bitmap written after every completed frame
    pub output: PathBuf,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            render: RenderConfig::default(),
            resolution_scale: 1.0,
            output: PathBuf::from("output.bmp"),
        }
    }
}

impl SessionConfig {
    pub fn with_render(mut self, render: RenderConfig) -> Self {
        self.render = render;
        self
    }

    pub fn with_resolution_scale(mut self, scale: f32) -> Self {
        self.resolution_scale = scale;
        self
    }

    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = output.into();
        self
    }
}

/// Errors from a session render.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("Failed to write bitmap {path}: {source}")]
    Bitmap {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Outcome of a session render.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameStatus {
    /// A frame was presented and written.
    Completed {
        width: u32,
        height: u32,
        /// Resampling factor actually applied to the raw render
        scale: f32,
    },
    Cancelled,
}

/// Front-end facing renderer.
pub struct RenderSession<S: DisplaySurface> {
    store: Arc<SceneStore>,
    surface: S,
    config: SessionConfig,
}

impl<S: DisplaySurface> RenderSession<S> {
    pub fn new(store: Arc<SceneStore>, surface: S, config: SessionConfig) -> Self {
        Self {
            store,
            surface,
            config,
        }
    }

    pub fn store(&self) -> &Arc<SceneStore> {
        &self.store
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut SessionConfig {
        &mut self.config
    }

    /// Render the current scene for a `target_width`×`target_height` view,
    /// present it and write it as a bitmap.
    ///
    /// A cancelled render neither presents nor writes anything. Callers must
    /// not run two renders at once.
    pub fn render(
        &mut self,
        target_width: u32,
        target_height: u32,
        cancel: &AtomicBool,
    ) -> Result<FrameStatus, SessionError> {
        let scene = self.store.snapshot();
        let resolution_scale = self.config.resolution_scale;
        let width = (target_width as f32 * resolution_scale) as u32;
        let height = (target_height as f32 * resolution_scale) as u32;

        let image = match render(&scene, width, height, &self.config.render, cancel)? {
            RenderStatus::Completed(image) => image,
            RenderStatus::Cancelled => return Ok(FrameStatus::Cancelled),
        };

        let (image, scale) = if resolution_scale != 1.0 {
            let (scaled, applied) = image.scale(1.0 / resolution_scale);
            log::info!(
                "Resampled {}x{} render by {}x to {}x{}",
                width,
                height,
                applied,
                scaled.width,
                scaled.height
            );
            (scaled, applied)
        } else {
            (image, 1.0)
        };

        self.surface.present(&image);

        let path = self.config.output.as_path();
        write_bitmap(&image, path).map_err(|source| SessionError::Bitmap {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Wrote {}", path.display());

        Ok(FrameStatus::Completed {
            width: image.width,
            height: image.height,
            scale,
        })
    }

    /// Save the current scene in the background.
    pub fn save_scene<F>(&self, path: impl AsRef<Path>, on_complete: F) -> io::Result<JoinHandle<()>>
    where
        F: FnOnce(StoreResult<()>) + Send + 'static,
    {
        self.store.save(path.as_ref(), on_complete)
    }

    /// Load and publish a scene in the background.
    pub fn open_scene<F>(&self, path: impl AsRef<Path>, on_complete: F) -> io::Result<JoinHandle<()>>
    where
        F: FnOnce(StoreResult<()>) + Send + 'static,
    {
        self.store.open(path.as_ref(), on_complete)
    }
}
