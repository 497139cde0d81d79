//! mintrace command-line front end.
//!
//! Stands in for an interactive editor: it loads or builds a scene, renders
//! it through a [`RenderSession`] and writes the results to disk.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use mint_core::{load_scene, Scene, SceneStore};
use mint_renderer::{
    BounceBasis, DisplaySurface, FrameStatus, ImageBuffer, PinholeCamera, RenderConfig,
    RenderSession, SessionConfig,
};

#[derive(Parser)]
#[command(name = "mintrace", version, about = "Whitted-style ray tracer")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render a scene to a bitmap
    Render(RenderArgs),

    /// Write the built-in scene as a scene file
    ExportDefault {
        /// Destination scene file
        path: PathBuf,
    },

    /// Parse a scene file and report what it contains
    Inspect {
        /// Scene file to read
        path: PathBuf,
    },
}

#[derive(Args)]
struct RenderArgs {
    /// Scene file to render (the built-in scene if omitted)
    #[arg(short, long)]
    scene: Option<PathBuf>,

    /// Width of the output image
    #[arg(long, default_value_t = 840)]
    width: u32,

    /// Height of the output image
    #[arg(long, default_value_t = 680)]
    height: u32,

    /// Internal resolution relative to the output size
    #[arg(long, default_value_t = 1.0)]
    scale: f32,

    /// Vertical field of view in degrees
    #[arg(long, default_value_t = 60.0)]
    fov: f32,

    /// Number of render worker threads
    #[arg(short = 'j', long, default_value_t = 4)]
    workers: usize,

    /// Incident direction for reflection and refraction bounces
    #[arg(long, value_enum, default_value_t = Basis::Primary)]
    basis: Basis,

    /// Bitmap output path
    #[arg(short, long, default_value = "output.bmp")]
    output: PathBuf,

    /// Also save the frame as a PNG
    #[arg(long)]
    png: Option<PathBuf>,

    /// Cancel the render after this many seconds
    #[arg(long)]
    time_limit: Option<f64>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Basis {
    /// Reflect and refract the camera ray on every bounce
    Primary,
    /// Reflect and refract the previous bounce's ray
    Previous,
}

impl From<Basis> for BounceBasis {
    fn from(basis: Basis) -> Self {
        match basis {
            Basis::Primary => BounceBasis::PrimaryRay,
            Basis::Previous => BounceBasis::PreviousBounce,
        }
    }
}

/// Keeps the last presented frame so it can be saved after the render.
#[derive(Default)]
struct FrameCapture {
    frame: Option<image::RgbaImage>,
}

impl DisplaySurface for FrameCapture {
    fn present(&mut self, image: &ImageBuffer) {
        self.frame = Some(image.to_rgba_image());
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    match Cli::parse().command {
        Command::Render(args) => run_render(args),
        Command::ExportDefault { path } => {
            SceneStore::default()
                .save_to(&path)
                .with_context(|| format!("Failed to export default scene to {}", path.display()))
        }
        Command::Inspect { path } => inspect(path),
    }
}

fn run_render(args: RenderArgs) -> Result<()> {
    let scale = positive("--scale", args.scale)?;
    let fov = positive("--fov", args.fov)?.to_radians();

    let store = Arc::new(SceneStore::default());
    if let Some(path) = &args.scene {
        store
            .open_from(path)
            .with_context(|| format!("Failed to open scene {}", path.display()))?;
    }

    let config = SessionConfig::default()
        .with_render(
            RenderConfig::default()
                .with_workers(args.workers)
                .with_bounce_basis(args.basis.into())
                .with_camera(PinholeCamera::new().with_fov(fov)),
        )
        .with_resolution_scale(scale)
        .with_output(&args.output);
    let mut session = RenderSession::new(store, FrameCapture::default(), config);

    let cancel = Arc::new(AtomicBool::new(false));
    if let Some(seconds) = args.time_limit {
        let limit = Duration::try_from_secs_f64(seconds)
            .with_context(|| format!("Invalid time limit {}", seconds))?;
        let cancel = Arc::clone(&cancel);
        thread::Builder::new()
            .name("mint-timer".to_string())
            .spawn(move || {
                thread::sleep(limit);
                cancel.store(true, Ordering::Release);
            })
            .context("Failed to start render timer")?;
    }

    match session
        .render(args.width, args.height, &cancel)
        .context("Render failed")?
    {
        FrameStatus::Completed {
            width,
            height,
            scale,
        } => {
            log::info!(
                "Finished {}x{} frame (resampled {}x) -> {}",
                width,
                height,
                scale,
                args.output.display()
            );
        }
        FrameStatus::Cancelled => {
            log::warn!("Render cancelled, nothing written");
            return Ok(());
        }
    }

    if let Some(png) = &args.png {
        if let Some(frame) = session.surface_mut().frame.take() {
            frame
                .save(png)
                .with_context(|| format!("Failed to write {}", png.display()))?;
            log::info!("Wrote {}", png.display());
        }
    }

    Ok(())
}

/// Rejects NaN, zero and negative values for a numeric flag.
fn positive(flag: &str, value: f32) -> Result<f32> {
    if value.is_nan() || value <= 0.0 {
        bail!("{} must be positive, got {}", flag, value);
    }
    Ok(value)
}

fn inspect(path: PathBuf) -> Result<()> {
    let scene: Scene =
        load_scene(&path).with_context(|| format!("Failed to read scene {}", path.display()))?;

    log::info!("{}", path.display());
    log::info!(
        "  bounces: {} reflection, {} refraction; Fresnel power {}",
        scene.reflection_bounce_count,
        scene.refraction_bounce_count,
        scene.fresnel_power
    );
    log::info!(
        "  {} materials, {} lights ({} point), {} spheres, {} planes",
        scene.material_count(),
        scene.light_count(),
        scene.lights.iter().filter(|light| light.is_point()).count(),
        scene.sphere_count(),
        scene.plane_count()
    );

    Ok(())
}
