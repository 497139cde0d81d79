//! Row-parallel renderer.
//!
//! The image rows are split into contiguous bands, one per worker. Each
//! worker owns an exclusive `&mut` slice of the output buffer, so the buffer
//! needs no locking. A monitor task alongside the workers polls a shared row
//! counter and logs progress.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use mint_core::Scene;
use mint_math::{Color, Ray, Vec3};
use thiserror::Error;

use crate::camera::PinholeCamera;
use crate::buffer::ImageBuffer;
use crate::trace::{trace, BounceBasis};

/// Render configuration.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Number of worker threads sharing the rows
    pub workers: usize,
    /// Incident direction used for reflection and refraction bounces
    pub bounce_basis: BounceBasis,
    /// How often the progress monitor polls
    pub progress_interval: Duration,
    pub camera: PinholeCamera,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            workers: 4,
            bounce_basis: BounceBasis::default(),
            progress_interval: Duration::from_millis(100),
            camera: PinholeCamera::default(),
        }
    }
}

impl RenderConfig {
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_bounce_basis(mut self, basis: BounceBasis) -> Self {
        self.bounce_basis = basis;
        self
    }

    pub fn with_progress_interval(mut self, interval: Duration) -> Self {
        self.progress_interval = interval;
        self
    }

    pub fn with_camera(mut self, camera: PinholeCamera) -> Self {
        self.camera = camera;
        self
    }
}

/// Errors that stop a render from starting.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Cannot render an empty {width}x{height} image")]
    EmptyTarget { width: u32, height: u32 },

    #[error("Failed to build render thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Outcome of a render call.
#[derive(Debug)]
pub enum RenderStatus {
    Completed(ImageBuffer),
    /// The cancel flag was raised; the partial buffer is discarded.
    Cancelled,
}

impl RenderStatus {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, RenderStatus::Cancelled)
    }

    pub fn into_image(self) -> Option<ImageBuffer> {
        match self {
            RenderStatus::Completed(image) => Some(image),
            RenderStatus::Cancelled => None,
        }
    }
}

/// A contiguous range of image rows rendered by one worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowBand {
    /// First row
    pub start: u32,
    /// One past the last row
    pub end: u32,
    /// Worker index
    pub index: usize,
}

impl RowBand {
    pub fn row_count(&self) -> u32 {
        self.end - self.start
    }
}

/// Split `height` rows into at most `workers` equal bands.
///
/// The worker count is clamped to `1..=height`; the last band absorbs the
/// remainder rows.
pub fn partition_rows(height: u32, workers: usize) -> Vec<RowBand> {
    if height == 0 {
        return Vec::new();
    }

    let workers = workers.clamp(1, height as usize) as u32;
    let rows_per_worker = height / workers;

    (0..workers)
        .map(|i| RowBand {
            start: i * rows_per_worker,
            end: if i + 1 == workers {
                height
            } else {
                (i + 1) * rows_per_worker
            },
            index: i as usize,
        })
        .collect()
}

/// Render `scene` into a new `width`×`height` buffer.
///
/// Blocks until every worker has finished or observed `cancel`. The flag
/// is polled before each row and each pixel.
pub fn render(
    scene: &Scene,
    width: u32,
    height: u32,
    config: &RenderConfig,
    cancel: &AtomicBool,
) -> Result<RenderStatus, RenderError> {
    if width == 0 || height == 0 {
        return Err(RenderError::EmptyTarget { width, height });
    }

    let bands = partition_rows(height, config.workers);
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(bands.len() + 1)
        .thread_name(|i| format!("mint-render-{}", i))
        .build()?;

    log::info!(
        "Rendering {}x{} with {} workers ({} spheres, {} planes, {} lights)",
        width,
        height,
        bands.len(),
        scene.sphere_count(),
        scene.plane_count(),
        scene.light_count()
    );
    for band in &bands {
        log::debug!("Worker {} takes rows {}..{}", band.index, band.start, band.end);
    }

    let start = Instant::now();
    let directions = config.camera.ray_directions(width, height);
    let mut image = ImageBuffer::new(width, height);
    let rows_done = AtomicUsize::new(0);
    let bands_done = AtomicUsize::new(0);

    {
        let directions = &directions;
        let rows_done = &rows_done;
        let bands_done = &bands_done;
        let band_count = bands.len();
        let basis = config.bounce_basis;
        let buffer: &mut [Color] = &mut image.pixels;

        pool.scope(|s| {
            s.spawn(move |_| {
                monitor_progress(
                    rows_done,
                    bands_done,
                    height,
                    band_count,
                    cancel,
                    config.progress_interval,
                )
            });

            let mut rest = buffer;
            for band in bands.iter().copied() {
                let (pixels, tail) =
                    std::mem::take(&mut rest).split_at_mut(band.row_count() as usize * width as usize);
                rest = tail;

                s.spawn(move |_| {
                    render_band(scene, band, pixels, directions, width, basis, cancel, rows_done);
                    bands_done.fetch_add(1, Ordering::Release);
                });
            }
        });
    }

    if cancel.load(Ordering::Acquire) {
        log::info!(
            "Render cancelled after {} of {} rows",
            rows_done.load(Ordering::Relaxed),
            height
        );
        return Ok(RenderStatus::Cancelled);
    }

    log::info!("Render complete in {:.2?}", start.elapsed());
    Ok(RenderStatus::Completed(image))
}

/// Trace every pixel of `band` into `pixels`, which holds exactly its rows.
#[allow(clippy::too_many_arguments)]
fn render_band(
    scene: &Scene,
    band: RowBand,
    pixels: &mut [Color],
    directions: &[Vec3],
    width: u32,
    basis: BounceBasis,
    cancel: &AtomicBool,
    rows_done: &AtomicUsize,
) {
    let width = width as usize;

    for (y, row) in (band.start as usize..).zip(pixels.chunks_mut(width)) {
        if cancel.load(Ordering::Relaxed) {
            return;
        }

        for (x, pixel) in row.iter_mut().enumerate() {
            if cancel.load(Ordering::Relaxed) {
                return;
            }
            let ray = Ray::new(Vec3::ZERO, directions[y * width + x]).normalized();
            *pixel = trace(scene, &ray, basis);
        }

        rows_done.fetch_add(1, Ordering::Relaxed);
    }
}

/// Log "Tracing N% complete" at each new 10% step until the workers finish
/// or the render is cancelled.
fn monitor_progress(
    rows_done: &AtomicUsize,
    bands_done: &AtomicUsize,
    height: u32,
    band_count: usize,
    cancel: &AtomicBool,
    interval: Duration,
) {
    let mut reported = None;

    loop {
        if cancel.load(Ordering::Relaxed) {
            return;
        }

        let rows = rows_done.load(Ordering::Relaxed);
        let step = (rows * 10 / height as usize) * 10;
        if reported != Some(step) {
            log::info!("Tracing {}% complete", step);
            reported = Some(step);
        }

        if rows >= height as usize || bands_done.load(Ordering::Acquire) >= band_count {
            return;
        }

        std::thread::sleep(interval);
    }
}
